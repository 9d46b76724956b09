use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{error, info, warn};

use skypaper_core::backend::create_backend;
use skypaper_core::changer::{CycleOutcome, WallpaperChanger};
use skypaper_core::config::{ChangerConfig, Config, Interval};
use skypaper_core::models::BackendType;
use skypaper_core::paths::{absolute_save_dir, SkypaperPaths};
use skypaper_core::scheduler::Scheduler;
use skypaper_core::sources::{build_client, ProviderRegistry};

#[derive(Parser, Debug)]
#[command(name = "skypaper", about = "Keep the desktop background in sync with a remote image")]
struct Cli {
    /// Directory downloaded wallpapers are saved to (must exist)
    #[arg(long)]
    path: Option<PathBuf>,
    /// Wallpaper source, see --show-source
    #[arg(long)]
    source: Option<String>,
    /// Minutes between checks; zero or negative checks once and exits
    #[arg(long, allow_negative_numbers = true)]
    interval: Option<i64>,
    /// How to apply the wallpaper: swww, hyprpaper or none
    #[arg(long)]
    backend: Option<BackendType>,
    /// Debug logging
    #[arg(long)]
    verbose: bool,
    /// List wallpaper sources and exit
    #[arg(long)]
    show_source: bool,
}

fn build_registry() -> ProviderRegistry {
    let mut registry = ProviderRegistry::new();
    skypaper_source_nsmc::register(&mut registry);
    skypaper_source_bing::register(&mut registry);
    registry
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let default_filter = format!(
        "skypaper={level},skypaper_core={level},skypaper_source_nsmc={level},skypaper_source_bing={level}"
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();
}

fn load_config() -> Config {
    let loaded = SkypaperPaths::new().and_then(|paths| Config::load_or_default(&paths));
    match loaded {
        Ok(config) => config,
        Err(e) => {
            warn!("using default settings: {e}");
            Config::default()
        }
    }
}

fn changer_config(cli: &Cli, config: &Config) -> Result<ChangerConfig> {
    let save_path = cli.path.as_ref().unwrap_or(&config.general.save_path);
    let cwd = std::env::current_dir()?;
    Ok(ChangerConfig {
        save_dir: absolute_save_dir(save_path, &cwd),
        source: cli
            .source
            .clone()
            .unwrap_or_else(|| config.general.source.clone()),
        interval: Interval::from_minutes(cli.interval.unwrap_or(config.general.interval)),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let registry = build_registry();
    info!("available sources: {}", registry.names().join(", "));

    if cli.show_source {
        for (name, description) in registry.describe() {
            println!("{name:<22}{description}");
        }
        return Ok(());
    }

    let config = load_config();
    let run = changer_config(&cli, &config)?;
    info!(source = %run.source, save_dir = %run.save_dir.display(), interval = %run.interval, "starting skypaper");

    let client = build_client(Duration::from_secs(config.general.timeout_secs))?;
    let provider = match registry.create(&run.source, client) {
        Ok(p) => p,
        Err(e) => {
            error!("{} not found, see --show-source", run.source);
            return Err(e.into());
        }
    };
    let backend = create_backend(cli.backend.unwrap_or(config.general.backend), &config);

    let changer = WallpaperChanger::new(run.save_dir, provider, backend);
    let mut scheduler = Scheduler::new(changer, run.interval);

    match run.interval {
        Interval::Once => match scheduler.run_once().await? {
            CycleOutcome::Applied(path) => info!(path = %path.display(), "wallpaper updated"),
            CycleOutcome::Unchanged => info!("wallpaper already current"),
            CycleOutcome::Failed(reason) => warn!(reason = %reason, "wallpaper not updated"),
            CycleOutcome::Empty(Some(reason)) => {
                warn!(reason = %reason, "wallpaper not updated: empty image")
            }
            CycleOutcome::Empty(None) => warn!("wallpaper not updated: empty image"),
        },
        Interval::Every(_) => {
            let handle = scheduler.spawn();
            tokio::signal::ctrl_c().await?;
            info!("received ctrl+c, shutting down");
            handle.stop().await;
        }
    }

    info!("finished");
    Ok(())
}
