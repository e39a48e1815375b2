//! Client for the news aggregation API (top headlines and full-text search).
//!
//! Both operations share one policy: any failure is logged with its
//! classification and the caller gets an empty list. The presentation layer
//! always renders zero-or-more articles and never branches on an error.
//!
//! Requests are scoped to a trailing 24-hour window (sent as calendar dates),
//! ask upstream to sort by publish time, and are re-sorted locally newest
//! first regardless of what order comes back.

use chrono::Utc;
use tracing::{debug, error, info, instrument};

use crate::api::{HttpGet, HttpResponse, QueryParams};
use crate::config::NewsSettings;
use crate::error::{ConfigError, NewsError};
use crate::models::{Article, Category, NewsApiResponse, NewsApiStatus};
use crate::utils::{DateWindow, truncate_for_log};

/// Fixed page size for every news request.
pub const PAGE_SIZE: u32 = 100;

/// Top headlines are always requested for this country.
pub const COUNTRY: &str = "us";

const SORT_BY: &str = "publishedAt";
const SEARCH_LANGUAGE: &str = "en";

/// Fetches and normalises articles from the news aggregation API.
pub struct HeadlinesClient<T> {
    transport: T,
    api_key: String,
    base_url: String,
}

impl<T> std::fmt::Debug for HeadlinesClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlinesClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl<T: HttpGet> HeadlinesClient<T> {
    /// Build a client, failing before any request if the credential is missing.
    pub fn new(settings: &NewsSettings, transport: T) -> Result<Self, ConfigError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingCredential {
                name: "NEWS_API_KEY",
            })?;

        Ok(Self {
            transport,
            api_key,
            base_url: settings.base_url.clone(),
        })
    }

    /// Top headlines for [`COUNTRY`], optionally narrowed to a category.
    ///
    /// Never fails: errors are logged and yield an empty list.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch_top_headlines(&self, category: Option<Category>, page: u32) -> Vec<Article> {
        let window = DateWindow::trailing_day(Utc::now());

        let mut query: QueryParams = vec![("country", COUNTRY.to_string())];
        if let Some(category) = category {
            query.push(("category", category.as_str().to_string()));
        }
        query.push(("page", page.to_string()));
        query.push(("pageSize", PAGE_SIZE.to_string()));
        query.push(("apiKey", self.api_key.clone()));
        query.push(("from", window.from_param()));
        query.push(("to", window.to_param()));
        query.push(("sortBy", SORT_BY.to_string()));

        match self.fetch_articles("top-headlines", &query).await {
            Ok(articles) => {
                info!(count = articles.len(), "Fetched top headlines");
                articles
            }
            Err(e) => {
                error!(kind = e.label(), error = %e, "Error fetching top headlines");
                Vec::new()
            }
        }
    }

    /// Full-text search over English-language articles from the last day.
    ///
    /// A blank query returns an empty list without touching the network.
    #[instrument(level = "info", skip(self, query), fields(query = %truncate_for_log(query, 80)))]
    pub async fn search_articles(&self, query: &str, page: u32) -> Vec<Article> {
        if query.trim().is_empty() {
            debug!("Blank search query; skipping request");
            return Vec::new();
        }

        let window = DateWindow::trailing_day(Utc::now());
        let params: QueryParams = vec![
            ("q", query.to_string()),
            ("language", SEARCH_LANGUAGE.to_string()),
            ("page", page.to_string()),
            ("pageSize", PAGE_SIZE.to_string()),
            ("sortBy", SORT_BY.to_string()),
            ("from", window.from_param()),
            ("to", window.to_param()),
            ("apiKey", self.api_key.clone()),
        ];

        match self.fetch_articles("everything", &params).await {
            Ok(articles) => {
                info!(count = articles.len(), "Fetched search results");
                articles
            }
            Err(e) => {
                error!(kind = e.label(), error = %e, "Error searching news");
                Vec::new()
            }
        }
    }

    async fn fetch_articles(
        &self,
        endpoint: &str,
        query: &QueryParams,
    ) -> Result<Vec<Article>, NewsError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let resp = self
            .transport
            .get(&url, query)
            .await
            .map_err(|e| NewsError::Request(e.to_string()))?;

        let body = classify_response(resp)?;
        let mut articles = body.articles.unwrap_or_default();
        debug!(
            total_results = ?body.total_results,
            returned = articles.len(),
            "Decoded news response"
        );
        sort_newest_first(&mut articles);
        Ok(articles)
    }
}

/// Map an HTTP exchange to a decoded body or a classified error.
fn classify_response(resp: HttpResponse) -> Result<NewsApiResponse, NewsError> {
    match resp.status {
        401 => return Err(NewsError::InvalidCredential),
        429 => return Err(NewsError::RateLimited),
        _ => {}
    }

    if !resp.is_success() {
        let message = serde_json::from_str::<NewsApiResponse>(&resp.body)
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| format!("HTTP {}", resp.status));
        return Err(NewsError::Request(message));
    }

    let body: NewsApiResponse = serde_json::from_str(&resp.body)?;
    if body.status == NewsApiStatus::Error {
        debug!(code = ?body.code, "News API reported status=error");
        return Err(NewsError::Upstream(
            body.message
                .unwrap_or_else(|| "Failed to fetch news".to_string()),
        ));
    }
    Ok(body)
}

/// Stable sort, newest `publishedAt` first. Unparseable timestamps sink to the end.
pub fn sort_newest_first(articles: &mut [Article]) {
    articles.sort_by_cached_key(|a| std::cmp::Reverse(a.published_at_utc()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::FakeTransport;

    fn settings() -> NewsSettings {
        NewsSettings {
            api_key: Some("test-key".to_string()),
            base_url: "https://news.example/v2".to_string(),
        }
    }

    fn article_json(title: &str, published_at: &str) -> String {
        format!(
            r#"{{"source":{{"id":null,"name":"Wire"}},"author":null,"title":"{title}","description":"d","url":"https://wire.example/{title}","urlToImage":null,"publishedAt":"{published_at}","content":"c"}}"#
        )
    }

    fn ok_body(articles: &[String]) -> String {
        format!(
            r#"{{"status":"ok","totalResults":{},"articles":[{}]}}"#,
            articles.len(),
            articles.join(",")
        )
    }

    #[test]
    fn test_missing_credential_fails_at_construction() {
        let fake = FakeTransport::respond(200, ok_body(&[]));
        let mut s = settings();
        s.api_key = None;
        let err = HeadlinesClient::new(&s, &fake).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingCredential {
                name: "NEWS_API_KEY"
            }
        ));
        assert_eq!(fake.request_count(), 0);
    }

    #[test]
    fn test_blank_credential_is_missing() {
        let fake = FakeTransport::respond(200, ok_body(&[]));
        let mut s = settings();
        s.api_key = Some("  ".to_string());
        assert!(HeadlinesClient::new(&s, &fake).is_err());
    }

    #[tokio::test]
    async fn test_top_headlines_sorted_newest_first() {
        let body = ok_body(&[
            article_json("middle", "2026-10-18T08:00:00Z"),
            article_json("oldest", "2026-10-17T22:00:00Z"),
            article_json("newest", "2026-10-18T11:30:00+01:00"),
        ]);
        let fake = FakeTransport::respond(200, body);
        let client = HeadlinesClient::new(&settings(), &fake).unwrap();

        let articles = client.fetch_top_headlines(None, 1).await;
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["newest", "middle", "oldest"]);
    }

    #[tokio::test]
    async fn test_top_headlines_request_parameters() {
        let fake = FakeTransport::respond(200, ok_body(&[]));
        let client = HeadlinesClient::new(&settings(), &fake).unwrap();

        client.fetch_top_headlines(Some(Category::Technology), 2).await;

        let requests = fake.requests();
        assert_eq!(requests.len(), 1);
        let req = &requests[0];
        assert_eq!(req.url, "https://news.example/v2/top-headlines");
        assert_eq!(req.param("category"), Some("technology"));
        assert_eq!(req.param("country"), Some("us"));
        assert_eq!(req.param("page"), Some("2"));
        assert_eq!(req.param("pageSize"), Some("100"));
        assert_eq!(req.param("apiKey"), Some("test-key"));
        assert_eq!(req.param("sortBy"), Some("publishedAt"));

        let window = DateWindow::trailing_day(Utc::now());
        assert_eq!(req.param("from"), Some(window.from_param().as_str()));
        assert_eq!(req.param("to"), Some(window.to_param().as_str()));
    }

    #[tokio::test]
    async fn test_top_headlines_without_category_omits_parameter() {
        let fake = FakeTransport::respond(200, ok_body(&[]));
        let client = HeadlinesClient::new(&settings(), &fake).unwrap();

        client.fetch_top_headlines(None, 1).await;

        let req = &fake.requests()[0];
        assert!(!req.has_param("category"));
        assert!(req.query.iter().all(|(_, v)| !v.is_empty()));
    }

    #[tokio::test]
    async fn test_api_error_status_is_swallowed() {
        let fake = FakeTransport::respond(200, r#"{"status":"error","message":"X"}"#);
        let client = HeadlinesClient::new(&settings(), &fake).unwrap();
        assert!(client.fetch_top_headlines(None, 1).await.is_empty());
    }

    #[tokio::test]
    async fn test_http_500_is_swallowed() {
        let fake = FakeTransport::respond(500, "Internal Server Error");
        let client = HeadlinesClient::new(&settings(), &fake).unwrap();
        assert!(client.fetch_top_headlines(None, 1).await.is_empty());
        assert_eq!(fake.request_count(), 1);
    }

    #[tokio::test]
    async fn test_transport_failure_is_swallowed() {
        let fake = FakeTransport::fail("connection refused");
        let client = HeadlinesClient::new(&settings(), &fake).unwrap();
        assert!(client.fetch_top_headlines(Some(Category::Sports), 1).await.is_empty());
        assert!(client.search_articles("election", 1).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_articles_field_is_empty() {
        let fake = FakeTransport::respond(200, r#"{"status":"ok","totalResults":0}"#);
        let client = HeadlinesClient::new(&settings(), &fake).unwrap();
        assert!(client.fetch_top_headlines(None, 1).await.is_empty());
    }

    #[tokio::test]
    async fn test_blank_search_issues_no_request() {
        let fake = FakeTransport::respond(200, ok_body(&[]));
        let client = HeadlinesClient::new(&settings(), &fake).unwrap();

        assert!(client.search_articles("", 1).await.is_empty());
        assert!(client.search_articles("   ", 1).await.is_empty());
        assert_eq!(fake.request_count(), 0);
    }

    #[tokio::test]
    async fn test_search_request_parameters_and_order() {
        let body = ok_body(&[
            article_json("older", "2026-10-17T09:00:00Z"),
            article_json("newer", "2026-10-18T09:00:00Z"),
        ]);
        let fake = FakeTransport::respond(200, body);
        let client = HeadlinesClient::new(&settings(), &fake).unwrap();

        let articles = client.search_articles("rust lang", 1).await;
        assert_eq!(articles[0].title, "newer");
        assert_eq!(articles[1].title, "older");

        let req = &fake.requests()[0];
        assert_eq!(req.url, "https://news.example/v2/everything");
        assert_eq!(req.param("q"), Some("rust lang"));
        assert_eq!(req.param("language"), Some("en"));
        assert_eq!(req.param("pageSize"), Some("100"));
        assert_eq!(req.param("sortBy"), Some("publishedAt"));
        assert!(req.has_param("from"));
        assert!(req.has_param("to"));
        assert!(!req.has_param("country"));
    }

    #[test]
    fn test_classify_401_and_429() {
        let unauthorized = HttpResponse {
            status: 401,
            body: r#"{"status":"error","code":"apiKeyInvalid","message":"bad key"}"#.to_string(),
        };
        assert!(matches!(
            classify_response(unauthorized),
            Err(NewsError::InvalidCredential)
        ));

        let limited = HttpResponse {
            status: 429,
            body: String::new(),
        };
        assert!(matches!(
            classify_response(limited),
            Err(NewsError::RateLimited)
        ));
    }

    #[test]
    fn test_classify_takes_message_from_error_body() {
        let resp = HttpResponse {
            status: 400,
            body: r#"{"status":"error","code":"parameterInvalid","message":"bad from"}"#.to_string(),
        };
        match classify_response(resp) {
            Err(NewsError::Request(message)) => assert_eq!(message, "bad from"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_classify_upstream_error_status() {
        let resp = HttpResponse {
            status: 200,
            body: r#"{"status":"error","message":"X"}"#.to_string(),
        };
        match classify_response(resp) {
            Err(NewsError::Upstream(message)) => assert_eq!(message, "X"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_sort_is_stable_and_sinks_invalid_dates() {
        let parse = |json: String| serde_json::from_str::<Article>(&json).unwrap();
        let mut articles = vec![
            parse(article_json("bad", "not-a-date")),
            parse(article_json("tie-a", "2026-10-18T09:00:00Z")),
            parse(article_json("tie-b", "2026-10-18T09:00:00Z")),
            parse(article_json("latest", "2026-10-18T10:00:00Z")),
        ];
        sort_newest_first(&mut articles);
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["latest", "tie-a", "tie-b", "bad"]);
    }
}
