//! Clients for the two upstream APIs.
//!
//! | Client | Upstream | On failure |
//! |--------|----------|------------|
//! | [`HeadlinesClient`] | news aggregation API | logs, returns an empty list |
//! | [`WeatherClient`] | current-weather API | returns a typed [`crate::error::WeatherError`] |
//!
//! Neither client holds mutable state; concurrent calls do not interact.

pub mod headlines;
pub mod weather;

pub use headlines::HeadlinesClient;
pub use weather::WeatherClient;
