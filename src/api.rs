//! HTTP transport used by the upstream clients.
//!
//! The clients only ever issue parameterised GET requests and need the status
//! code plus the raw body to classify failures, so the seam is a single
//! trait:
//! - [`HttpGet`]: issue a GET with ordered query pairs
//! - [`ReqwestTransport`]: the production implementation over `reqwest`
//!
//! No timeout or retry is layered on top; whatever `reqwest` does by default
//! applies, and a failed call fails once.

use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Ordered query parameters. Absent optional parameters are simply not pushed.
pub type QueryParams = Vec<(&'static str, String)>;

/// Status and body of a completed HTTP exchange, whatever the status.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// `true` for any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request that never produced a response (DNS, TLS, connection reset, ...).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Trait for issuing GET requests against an upstream API.
pub trait HttpGet {
    /// Send a GET to `url` with `query` appended, returning the response for
    /// any status code. Only failures to obtain a response are errors.
    async fn get(&self, url: &str, query: &QueryParams) -> Result<HttpResponse, TransportError>;
}

impl<T: HttpGet> HttpGet for &T {
    async fn get(&self, url: &str, query: &QueryParams) -> Result<HttpResponse, TransportError> {
        (**self).get(url, query).await
    }
}

/// [`HttpGet`] over a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Build a transport over a fresh `reqwest::Client` with its default
    /// connection pool and TLS settings.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HttpGet for ReqwestTransport {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn get(&self, url: &str, query: &QueryParams) -> Result<HttpResponse, TransportError> {
        let t0 = Instant::now();
        let resp = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                // the URL carries the credential in its query string
                let e = e.without_url();
                warn!(elapsed_ms = t0.elapsed().as_millis() as u64, error = %e, "HTTP request failed");
                TransportError(e.to_string())
            })?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError(e.without_url().to_string()))?;

        debug!(
            status,
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "HTTP response received"
        );
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
pub mod testing {
    //! Recording fake transport for client tests.

    use super::*;
    use std::sync::Mutex;

    /// One recorded outbound request.
    #[derive(Debug, Clone)]
    pub struct RecordedRequest {
        pub url: String,
        pub query: QueryParams,
    }

    impl RecordedRequest {
        /// Value of the first query pair named `key`.
        pub fn param(&self, key: &str) -> Option<&str> {
            self.query
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.as_str())
        }

        pub fn has_param(&self, key: &str) -> bool {
            self.param(key).is_some()
        }
    }

    /// Replies with a canned outcome and records every request.
    #[derive(Debug)]
    pub struct FakeTransport {
        reply: Result<HttpResponse, TransportError>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl FakeTransport {
        /// Answer every request with `status` and `body`.
        pub fn respond(status: u16, body: impl Into<String>) -> Self {
            Self {
                reply: Ok(HttpResponse {
                    status,
                    body: body.into(),
                }),
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Fail every request before any response arrives.
        pub fn fail(message: &str) -> Self {
            Self {
                reply: Err(TransportError(message.to_string())),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    impl HttpGet for FakeTransport {
        async fn get(
            &self,
            url: &str,
            query: &QueryParams,
        ) -> Result<HttpResponse, TransportError> {
            self.requests.lock().unwrap().push(RecordedRequest {
                url: url.to_string(),
                query: query.clone(),
            });
            self.reply.clone()
        }
    }
}
