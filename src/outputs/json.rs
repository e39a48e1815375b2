//! JSON output of fetched results.
//!
//! Articles keep the upstream camelCase field names so the output can be fed
//! back to anything that already understands the news API's shape.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::models::Article;

/// Pretty-print any serializable result.
#[instrument(level = "debug", skip_all)]
pub fn render<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string_pretty(value)?;
    debug!(bytes = json.len(), "Rendered JSON");
    Ok(json)
}

/// Article list, honouring the display limit.
pub fn render_articles(
    articles: &[Article],
    limit: Option<usize>,
) -> Result<String, serde_json::Error> {
    let shown = &articles[..limit.unwrap_or(articles.len()).min(articles.len())];
    render(shown)
}
