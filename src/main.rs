//! # newsdesk
//!
//! Today's headlines, news search and current weather in the terminal.
//!
//! ## Features
//!
//! - Top US headlines, optionally narrowed to a category
//! - Full-text search over the last 24 hours of English-language coverage
//! - Current weather by city name or coordinates, with optional polling
//! - A combined brief that fetches headlines and weather concurrently
//! - Text or JSON output
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... WEATHER_API_KEY=... newsdesk brief --city Lisbon
//! ```
//!
//! ## Architecture
//!
//! `main` is the composition root: it resolves configuration once, builds only
//! the clients the chosen subcommand needs (each validates its credential at
//! construction) and renders whatever they return.
//! 1. **Config**: CLI/env over YAML file over defaults
//! 2. **Clients**: [`clients::HeadlinesClient`] swallows failures to an empty
//!    list, [`clients::WeatherClient`] returns typed errors
//! 3. **Output**: text or JSON on stdout, logs on stderr

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod clients;
mod config;
mod error;
mod models;
mod outputs;
mod utils;

use api::{HttpGet, ReqwestTransport};
use cli::{Cli, Command};
use clients::{HeadlinesClient, WeatherClient};
use config::{AppConfig, FileConfig, Overrides};
use models::{Article, Brief, Category, Locator, WeatherSnapshot};
use outputs::text::TextOptions;
use outputs::{json, text};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    debug!(
        config = ?args.config,
        json = args.json,
        limit = ?args.limit,
        "Parsed CLI arguments"
    );

    let file = match args.config.as_deref() {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let overrides = Overrides {
        news_api_key: args.news_api_key.clone(),
        weather_api_key: args.weather_api_key.clone(),
        news_base_url: args.news_base_url.clone(),
        weather_base_url: args.weather_base_url.clone(),
    };
    let config = AppConfig::resolve(file, overrides)?;
    let transport = ReqwestTransport::new();
    let options = TextOptions {
        limit: args.limit,
        details: args.details,
    };
    let as_json = args.json;
    let period = Duration::from_secs(config.poll_interval_secs);

    let result = match &args.command {
        Command::Headlines {
            category,
            page,
            watch,
        } => {
            let client = HeadlinesClient::new(&config.news, transport.clone())?;
            let (category, page) = (*category, *page);
            if *watch {
                info!(secs = config.poll_interval_secs, "Polling top headlines");
                poll_until(period, tokio::signal::ctrl_c(), || {
                    headlines_tick(&client, category, page, as_json, options)
                })
                .await
                .map(|_| ())
            } else {
                headlines_tick(&client, category, page, as_json, options).await
            }
        }
        Command::Search { query, page } => {
            let client = HeadlinesClient::new(&config.news, transport.clone())?;
            let articles = client.search_articles(query, *page).await;
            print_articles(&articles, as_json, options)
        }
        Command::Weather { location, watch } => {
            let client = WeatherClient::new(&config.weather, transport.clone())?;
            let locator = location.locator(&config.default_city);
            if *watch {
                info!(secs = config.poll_interval_secs, %locator, "Polling current weather");
                poll_until(period, tokio::signal::ctrl_c(), || {
                    weather_tick(&client, &locator, as_json)
                })
                .await
                .map(|_| ())
            } else {
                let snapshot = client.fetch_current_weather(&locator).await?;
                print_weather(&snapshot, as_json)
            }
        }
        Command::Brief {
            category,
            location,
            watch,
        } => {
            let headlines = HeadlinesClient::new(&config.news, transport.clone())?;
            let weather = WeatherClient::new(&config.weather, transport.clone())?;
            let locator = location.locator(&config.default_city);
            let category = *category;
            if *watch {
                info!(secs = config.poll_interval_secs, %locator, "Polling brief");
                poll_until(period, tokio::signal::ctrl_c(), || {
                    brief_tick(&headlines, &weather, category, &locator, as_json, options)
                })
                .await
                .map(|_| ())
            } else {
                brief_tick(&headlines, &weather, category, &locator, as_json, options).await
            }
        }
    };

    let elapsed = start_time.elapsed();
    info!(?elapsed, millis = elapsed.as_millis() as u64, "Execution complete");
    result
}

fn print_articles(
    articles: &[Article],
    as_json: bool,
    options: TextOptions,
) -> Result<(), Box<dyn Error>> {
    if as_json {
        println!("{}", json::render_articles(articles, options.limit)?);
    } else {
        print!("{}", text::render_articles(articles, options));
    }
    Ok(())
}

fn print_weather(snapshot: &WeatherSnapshot, as_json: bool) -> Result<(), Box<dyn Error>> {
    if as_json {
        println!("{}", json::render(snapshot)?);
    } else {
        print!("{}", text::render_weather(snapshot));
    }
    Ok(())
}

/// Run `tick` immediately and then once per `period` until `shutdown` resolves.
///
/// `shutdown` is pinned once, outside the loop, and raced against both the
/// wait for the next tick and the tick itself. An interrupt that arrives while
/// a request is in flight abandons that request and ends polling. When both
/// are ready at once the interrupt wins.
///
/// # Arguments
///
/// * `period` - Time between the starts of consecutive ticks
/// * `shutdown` - Resolves when polling should stop (Ctrl-C in production)
/// * `tick` - One fetch-and-render pass; per-request failures are reported
///   inside it, so only rendering errors come back as `Err`
///
/// # Returns
///
/// The number of ticks that ran to completion.
#[instrument(level = "info", skip(shutdown, tick))]
async fn poll_until<S, F, Fut>(
    period: Duration,
    shutdown: S,
    mut tick: F,
) -> Result<u64, Box<dyn Error>>
where
    S: Future,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), Box<dyn Error>>>,
{
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut completed = 0;

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            _ = ticker.tick() => {}
        }
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                debug!("Interrupted while a request was in flight");
                break;
            }
            outcome = tick() => {
                outcome?;
                completed += 1;
            }
        }
    }

    info!(ticks = completed, "Interrupted; stopping polling");
    Ok(completed)
}

async fn headlines_tick<T: HttpGet>(
    client: &HeadlinesClient<T>,
    category: Option<Category>,
    page: u32,
    as_json: bool,
    options: TextOptions,
) -> Result<(), Box<dyn Error>> {
    let articles = client.fetch_top_headlines(category, page).await;
    print_articles(&articles, as_json, options)
}

/// One weather poll: render the snapshot, or report the failure and carry on.
async fn weather_tick<T: HttpGet>(
    client: &WeatherClient<T>,
    locator: &Locator,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    match client.fetch_current_weather(locator).await {
        Ok(snapshot) => print_weather(&snapshot, as_json),
        Err(e) => {
            warn!(kind = ?e.kind(), error = %e, "Weather poll failed");
            eprint!("{}", text::render_weather_error(&e));
            Ok(())
        }
    }
}

async fn brief_tick<H: HttpGet, W: HttpGet>(
    headlines: &HeadlinesClient<H>,
    weather: &WeatherClient<W>,
    category: Option<Category>,
    locator: &Locator,
    as_json: bool,
    options: TextOptions,
) -> Result<(), Box<dyn Error>> {
    let brief = build_brief(headlines, weather, category, locator).await;
    if as_json {
        println!("{}", json::render(&brief)?);
    } else {
        print!("{}", text::render_brief(&brief, options));
    }
    Ok(())
}

/// Headlines and weather in flight together; neither waits on the other.
///
/// A weather failure is carried as `weather_error` and never drops the
/// headlines.
#[instrument(level = "info", skip_all)]
async fn build_brief<H: HttpGet, W: HttpGet>(
    headlines: &HeadlinesClient<H>,
    weather: &WeatherClient<W>,
    category: Option<Category>,
    locator: &Locator,
) -> Brief {
    let (articles, weather_result) = futures::join!(
        headlines.fetch_top_headlines(category, 1),
        weather.fetch_current_weather(locator)
    );

    let (weather, weather_error) = match weather_result {
        Ok(snapshot) => (Some(snapshot), None),
        Err(e) => {
            error!(kind = ?e.kind(), error = %e, "Weather unavailable for brief");
            (None, Some(e.to_string()))
        }
    };

    Brief {
        generated_at: Utc::now().to_rfc3339(),
        articles,
        weather,
        weather_error,
    }
}
