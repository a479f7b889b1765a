use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use forecast_core::{
    Config, FetchMode, JsonFileStore, LocationStore, WeatherFetchError, WeatherFetcher,
    WeatherViewModel, build,
    config::MAX_FORECAST_DAYS, fetch_or_cancel, fetcher_from_config,
};
use inquire::{CustomType, Password, PasswordDisplayMode, Select, Text};
use tokio::{
    sync::watch,
    time::{MissedTickBehavior, interval},
};
use tracing::{info, warn};

use crate::render;

/// Location shown when neither an argument nor a favorite is available.
const FALLBACK_LOCATION: &str = "London";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "forecast", version, about = "Weather forecasts powered by WeatherAPI.com")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively configure the API key and fetch defaults.
    Configure,

    /// Show current conditions and the forecast for a location.
    Show {
        /// City name, "city,country", coordinates, ...; defaults to the first favorite.
        location: Option<String>,

        /// Number of forecast days (1-14); defaults to the configured value.
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=MAX_FORECAST_DAYS as i64))]
        days: Option<u8>,

        /// Fetch current conditions and the forecast with separate requests.
        #[arg(long)]
        split: bool,

        /// Print the view-model as JSON instead of text.
        #[arg(long)]
        json: bool,

        /// Keep running and refresh on the configured interval until Ctrl-C.
        #[arg(long)]
        watch: bool,

        /// Add the resolved location to favorites after a successful fetch.
        #[arg(long)]
        favorite: bool,
    },

    /// Manage favorite cities.
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },

    /// Show or clear recent searches.
    History {
        #[arg(long)]
        clear: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum FavoritesAction {
    /// List favorites (default).
    List,
    /// Add a favorite city.
    Add { city: String, country: String },
    /// Remove a favorite city.
    Remove { city: String, country: String },
}

/// Everything a single `show` render needs.
struct ShowContext {
    fetcher: Box<dyn WeatherFetcher>,
    store: Box<dyn LocationStore>,
    location: String,
    days: u8,
    json: bool,
    favorite: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure()?,
            Command::Show { location, days, split, json, watch, favorite } => {
                let mut config = Config::load()?;
                if split {
                    config.fetch_mode = FetchMode::Split;
                }

                let store: Box<dyn LocationStore> = Box::new(JsonFileStore::open_default()?);
                let location = match location {
                    Some(l) => l,
                    None => store
                        .favorites()?
                        .first()
                        .map(|f| f.city.clone())
                        .unwrap_or_else(|| FALLBACK_LOCATION.to_string()),
                };

                let mut ctx = ShowContext {
                    fetcher: fetcher_from_config(&config)?,
                    store,
                    location,
                    days: days.unwrap_or(config.days),
                    json,
                    favorite,
                };

                let shutdown = shutdown_signal();
                if watch {
                    watch_loop(&mut ctx, &config, shutdown).await?;
                } else {
                    match show_once(&mut ctx, shutdown).await {
                        Ok(vm) => {
                            print_view(&vm, ctx.json)?;
                            if remember_favorite(&mut ctx, &vm)? && !ctx.json {
                                println!(
                                    "Added {}, {} to favorites!",
                                    vm.location.name, vm.location.country
                                );
                            }
                        }
                        Err(err) => bail!(describe_failure(&ctx, &err)),
                    }
                }
            }
            Command::Favorites { action } => {
                let mut store = JsonFileStore::open_default()?;
                match action.unwrap_or(FavoritesAction::List) {
                    FavoritesAction::List => print!("{}", render::favorites(&store.favorites()?)),
                    FavoritesAction::Add { city, country } => {
                        if store.add_favorite(&city, &country)? {
                            println!("Added {city}, {country} to favorites!");
                        } else {
                            println!("{city}, {country} is already a favorite.");
                        }
                    }
                    FavoritesAction::Remove { city, country } => {
                        if store.remove_favorite(&city, &country)? {
                            println!("Removed {city}, {country} from favorites.");
                        } else {
                            println!("{city}, {country} is not a favorite.");
                        }
                    }
                }
            }
            Command::History { clear } => {
                let mut store = JsonFileStore::open_default()?;
                if clear {
                    store.clear_recent_searches()?;
                    println!("Search history cleared.");
                } else {
                    print!("{}", render::history(&store.recent_searches()?));
                }
            }
        }

        Ok(())
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let base_url = Text::new("Base URL:")
        .with_default(&config.base_url)
        .prompt()
        .context("Failed to read base URL")?;
    config.base_url = base_url;

    config.days = CustomType::<u8>::new("Default forecast days:")
        .with_default(config.days)
        .with_error_message("Please type a number between 1 and 14")
        .prompt()
        .context("Failed to read forecast days")?;

    let modes = FetchMode::all().to_vec();
    let cursor = modes.iter().position(|m| *m == config.fetch_mode).unwrap_or(0);
    config.fetch_mode = Select::new("Fetch mode:", modes)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Failed to read fetch mode")?;

    config.validate()?;
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Fetch and build one view-model, recording the search on success.
async fn show_once(
    ctx: &mut ShowContext,
    shutdown: watch::Receiver<bool>,
) -> Result<WeatherViewModel, WeatherFetchError> {
    let payload =
        fetch_or_cancel(ctx.fetcher.as_ref(), &ctx.location, ctx.days, cancelled(shutdown))
            .await?;
    let vm = build(&payload, usize::from(ctx.days));

    if let Err(err) = ctx.store.add_recent_search(&ctx.location) {
        warn!(error = %err, "could not record recent search");
    }

    Ok(vm)
}

/// Store the location the provider resolved, not the raw query, when `--favorite` is set.
fn remember_favorite(ctx: &mut ShowContext, vm: &WeatherViewModel) -> anyhow::Result<bool> {
    if !ctx.favorite {
        return Ok(false);
    }
    ctx.store.add_favorite(&vm.location.name, &vm.location.country)
}

fn print_view(vm: &WeatherViewModel, json: bool) -> anyhow::Result<()> {
    if json {
        let out = serde_json::to_string_pretty(vm).context("Failed to serialize weather view")?;
        println!("{out}");
    } else {
        print!("{}", render::weather(vm));
    }
    Ok(())
}

fn describe_failure(ctx: &ShowContext, err: &WeatherFetchError) -> String {
    let favorites = ctx.store.favorites().unwrap_or_default();
    render::fetch_error(err, &favorites)
}

/// Timer-driven refresh; failures are reported and the next tick tries again.
async fn watch_loop(
    ctx: &mut ShowContext,
    config: &Config,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let mut ticker = interval(config.refresh_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!(location = %ctx.location, every = ?config.refresh_interval(), "watching");

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            Ok(_) = shutdown.wait_for(|stop| *stop) => break,
        }

        if !ctx.json {
            println!("── {} ──", Local::now().format("%Y-%m-%d %H:%M:%S"));
        }
        match show_once(ctx, shutdown.clone()).await {
            Ok(vm) => {
                print_view(&vm, ctx.json)?;
                remember_favorite(ctx, &vm)?;
            }
            Err(err) => eprintln!("{}", describe_failure(ctx, &err)),
        }

        if *shutdown.borrow() {
            break;
        }
    }

    Ok(())
}

/// Flips to `true` once Ctrl-C is received.
fn shutdown_signal() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(true);
        }
    });
    rx
}

async fn cancelled(mut shutdown: watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        // Signal listener is gone; nothing can cancel us anymore.
        std::future::pending::<()>().await;
    }
}
