mod config;
mod dashboard;
mod export;
mod extract;
mod models;
mod scrapers;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};
use config::{CollectSettings, Credentials, DashboardSettings};
use export::RunSummary;
use extract::ListingExtractor;
use scrapers::{ChromeSession, MarketplaceCollector};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rental-scout", version, about = "Antananarivo rental listings: collection and rent prediction")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect rental listings from the marketplace into a CSV file
    Collect {
        /// Marketplace search query
        #[arg(long, default_value = "Location Antananarivo")]
        query: String,

        /// Maximum number of listings to collect
        #[arg(long, default_value_t = 20)]
        max_announcements: usize,

        /// Scrolls without new content before giving up
        #[arg(long, default_value_t = 10)]
        max_scroll_attempts: u32,

        /// Directory receiving the CSV file
        #[arg(long, default_value = "data/raw")]
        output_dir: PathBuf,

        /// Show the browser window instead of running headless
        #[arg(long)]
        show_browser: bool,

        /// Chrome binary to use
        #[arg(long, env = "CHROME_PATH")]
        chrome_path: Option<PathBuf>,

        /// Known neighborhood, repeatable (replaces the built-in list)
        #[arg(long = "neighborhood")]
        neighborhoods: Vec<String>,
    },

    /// Serve the rent prediction dashboard
    Dashboard {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value_t = 8501)]
        port: u16,

        /// Model artifact (JSON linear model)
        #[arg(long, default_value = "modele_loyer.json")]
        model: PathBuf,

        /// Reference dataset (CSV)
        #[arg(long, default_value = "data_mock/logement.csv")]
        data: PathBuf,
    },
}

impl Commands {
    fn collect_settings(self) -> Option<CollectSettings> {
        let Commands::Collect {
            query,
            max_announcements,
            max_scroll_attempts,
            output_dir,
            show_browser,
            chrome_path,
            neighborhoods,
        } = self
        else {
            return None;
        };

        let mut settings = CollectSettings {
            output_dir,
            credentials: Credentials::from_env(),
            ..CollectSettings::default()
        };
        settings.params.search_query = query;
        settings.params.max_announcements = max_announcements;
        settings.params.max_scroll_attempts = max_scroll_attempts;
        settings.chrome.headless = !show_browser;
        settings.chrome.binary_path = chrome_path;
        if !neighborhoods.is_empty() {
            settings.known_neighborhoods = neighborhoods;
        }
        Some(settings)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(_) => info!("No .env file, using the process environment"),
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Dashboard {
            host,
            port,
            model,
            data,
        } => {
            let settings = DashboardSettings {
                host,
                port,
                model_path: model,
                data_path: data,
            };
            dashboard::serve(&settings).await
        }
        command => {
            let settings = command
                .collect_settings()
                .context("collect command without settings")?;
            collect(settings).await
        }
    }
}

async fn collect(settings: CollectSettings) -> anyhow::Result<()> {
    info!("🏠 Rental Scout - Marketplace collector");
    info!("========================================");

    if !settings.credentials.is_complete() {
        warn!("Login credentials are not set!");
        warn!("Set FB_PHONE, FB_EMAIL or FB_USERNAME, and FB_PASSWORD (environment or .env file)");
    } else if let Some(kind) = settings.credentials.login_kind() {
        info!("Logging in with {:?} identifier", kind);
    }

    let CollectSettings {
        output_dir,
        known_neighborhoods,
        credentials,
        chrome,
        params,
    } = settings;

    let records = tokio::task::spawn_blocking(move || -> anyhow::Result<_> {
        let session = ChromeSession::launch(&chrome).context("Failed to launch Chrome browser")?;
        let extractor = ListingExtractor::new(&known_neighborhoods);
        let mut collector = MarketplaceCollector::new(session, extractor, credentials, params);
        // The browser shuts down when the collector is dropped
        Ok(collector.collect())
    })
    .await
    .context("Collection task panicked")??;

    if records.is_empty() {
        warn!("No listings collected. Check the credentials and the search parameters.");
        return Ok(());
    }

    for record in records.iter().take(5) {
        info!(
            "  {} | {:?} m² | {:?} ch | {:?} Ar",
            record.neighborhood, record.area_sqm, record.room_count, record.monthly_rent
        );
    }

    let path = export::write_listings_csv(&records, &output_dir, &Local::now())
        .context("Failed to write the CSV file")?;
    RunSummary::new(&records).log();

    info!("✅ Collection finished, data in {}", path.display());
    Ok(())
}
