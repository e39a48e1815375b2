//! Command-line interface definitions for newsdesk.
//!
//! Credentials and base URLs can be provided via flags or environment
//! variables; everything else optional can also live in the YAML config file.

use clap::{Args, Parser, Subcommand};

use crate::models::{Category, Locator};

/// Command-line arguments for newsdesk.
///
/// # Examples
///
/// ```sh
/// # Today's technology headlines
/// newsdesk headlines --category technology
///
/// # Search the last day of English-language coverage
/// newsdesk search "interest rates"
///
/// # Weather by coordinates, refreshed every five minutes
/// newsdesk weather --lat 28.61 --lon 77.21 --watch
///
/// # Headlines plus weather, refreshed until Ctrl-C
/// newsdesk brief --city Lisbon --watch
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// News API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true, global = true)]
    pub news_api_key: Option<String>,

    /// OpenWeatherMap API key
    #[arg(long, env = "WEATHER_API_KEY", hide_env_values = true, global = true)]
    pub weather_api_key: Option<String>,

    /// Override the news API base URL
    #[arg(long, env = "NEWS_API_BASE_URL", global = true)]
    pub news_base_url: Option<String>,

    /// Override the weather API base URL
    #[arg(long, env = "WEATHER_API_BASE_URL", global = true)]
    pub weather_base_url: Option<String>,

    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Render at most this many articles
    #[arg(short, long, global = true)]
    pub limit: Option<usize>,

    /// Include content preview and image link for each article
    #[arg(short, long, global = true)]
    pub details: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Top headlines from the last 24 hours
    Headlines {
        /// Restrict to one category (all categories when omitted)
        #[arg(short = 'C', long, value_enum)]
        category: Option<Category>,

        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,

        /// Refresh at the configured interval
        #[arg(short, long)]
        watch: bool,
    },

    /// Full-text search over the last 24 hours
    Search {
        query: String,

        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
    },

    /// Current weather for a city or coordinate
    Weather {
        #[command(flatten)]
        location: LocationArgs,

        /// Keep polling at the configured interval
        #[arg(short, long)]
        watch: bool,
    },

    /// Headlines and weather together
    Brief {
        #[arg(short = 'C', long, value_enum)]
        category: Option<Category>,

        #[command(flatten)]
        location: LocationArgs,

        /// Refresh at the configured interval
        #[arg(short, long)]
        watch: bool,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct LocationArgs {
    /// City name (defaults to the configured city)
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub city: Option<String>,

    /// Latitude in decimal degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl LocationArgs {
    /// Coordinates win when given, then an explicit city, then `default_city`.
    pub fn locator(&self, default_city: &str) -> Locator {
        match (self.lat, self.lon, &self.city) {
            (Some(lat), Some(lon), _) => Locator::Coordinates { lat, lon },
            (_, _, Some(city)) if !city.trim().is_empty() => Locator::City(city.trim().to_string()),
            _ => Locator::City(default_city.to_string()),
        }
    }
}
