//! Plain-text rendering for the terminal.
//!
//! Each article is a numbered block: title (with a `NEW` badge for the last
//! 24 hours), byline and date, description, link. With `details` on, the
//! content preview and image link are included as well.
//!
//! Writes into a `String` cannot fail, so `writeln!` results are unwrapped.

use std::fmt::Write;

use crate::error::WeatherError;
use crate::models::{Article, Brief, ConditionKind, WeatherSnapshot};
use crate::utils::format_display_date;

/// Display switches shared by every listing.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextOptions {
    pub limit: Option<usize>,
    pub details: bool,
}

/// Render a numbered article listing.
///
/// # Arguments
///
/// * `articles` - Articles in display order
/// * `options` - Limit and detail switches
///
/// # Returns
///
/// The listing, `"No articles found."` when `articles` is empty, followed by a
/// `… N more` line when the limit hides some of them.
pub fn render_articles(articles: &[Article], options: TextOptions) -> String {
    let mut out = String::new();
    if articles.is_empty() {
        out.push_str("No articles found.\n");
        return out;
    }

    let shown = options.limit.unwrap_or(articles.len()).min(articles.len());
    for (i, article) in articles.iter().take(shown).enumerate() {
        write_article(&mut out, &format!("{}.", i + 1), article, options.details);
    }

    if shown < articles.len() {
        writeln!(out, "… {} more", articles.len() - shown).unwrap();
    }
    out
}

fn write_article(out: &mut String, marker: &str, article: &Article, details: bool) {
    let badge = if article.is_recent() { " [NEW]" } else { "" };
    let date = article
        .published_at_utc()
        .map(|dt| format_display_date(&dt))
        .unwrap_or_else(|| "date unknown".to_string());

    writeln!(out, "{} {}{}", marker, article.title, badge).unwrap();
    writeln!(out, "   {} • {}", article.byline(), date).unwrap();
    if !article.description.trim().is_empty() {
        writeln!(out, "   {}", article.description.trim()).unwrap();
    }
    if details {
        let preview = article.content_preview();
        if !preview.is_empty() {
            writeln!(out, "   {}", preview).unwrap();
        }
        writeln!(out, "   image: {}", article.image_url_or_fallback()).unwrap();
    }
    writeln!(out, "   {}", article.url).unwrap();
    out.push('\n');
}

/// One-line weather summary with a condition icon and the rounded temperature.
pub fn render_weather(snapshot: &WeatherSnapshot) -> String {
    let icon = match snapshot.condition_kind() {
        ConditionKind::Clear => "☀",
        ConditionKind::Rain => "☂",
        ConditionKind::Cloud => "☁",
    };
    format!(
        "{} {}: {}°C, {}\n",
        icon,
        snapshot.location,
        snapshot.rounded_temperature(),
        snapshot.description
    )
}

/// Message shown in place of the weather line.
pub fn render_weather_error(err: &WeatherError) -> String {
    format!("Weather unavailable: {err}\n")
}

/// Render a brief: the weather line (or why it is missing), the lead story,
/// then the remaining headlines as a numbered list.
///
/// # Arguments
///
/// * `brief` - The combined result to render
/// * `options` - The limit counts the lead story; `details` is always on for it
///
/// # Returns
///
/// The rendered brief. An empty headline list renders as `"No articles found."`.
pub fn render_brief(brief: &Brief, options: TextOptions) -> String {
    let mut out = String::new();
    match (&brief.weather, &brief.weather_error) {
        (Some(snapshot), _) => out.push_str(&render_weather(snapshot)),
        (None, Some(message)) => writeln!(out, "Weather unavailable: {message}").unwrap(),
        (None, None) => {}
    }
    out.push('\n');

    let Some((lead, rest)) = brief.articles.split_first() else {
        out.push_str(&render_articles(&[], options));
        return out;
    };
    if options.limit == Some(0) {
        writeln!(out, "… {} more", brief.articles.len()).unwrap();
        return out;
    }

    write_article(&mut out, "Lead:", lead, true);
    if !rest.is_empty() {
        let rest_options = TextOptions {
            limit: options.limit.map(|n| n - 1),
            ..options
        };
        out.push_str(&render_articles(rest, rest_options));
    }
    out
}
