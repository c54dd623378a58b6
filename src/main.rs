mod backends;
mod config;
mod config_persistence;
mod credential_keyring;
mod db_manager;
mod enrichment;
mod error;
mod matching;
mod protocol;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use log::{debug, info};

use backends::igdb::{IgdbClient, IgdbCredentials};
use backends::translation::GoogleTranslateClient;
use config::Config;
use config_persistence::{
    default_config_path, load_config_file, load_overrides_file, resolve_database_path,
    stopword_filter_from_config,
};
use db_manager::DbManager;
use enrichment::batch_runner::{BatchRunner, RunOptions};
use enrichment::cover_matcher::{CoverMatchSettings, CoverMatcher};
use enrichment::detail_matcher::DetailMatcher;
use error::EnrichError;
use matching::aliases::AliasTable;
use matching::genre_mapper::GenreMapper;
use matching::TokenPipeline;
use protocol::{ImageSize, OverrideMap, RunSummary};

const CLIENT_ID_ENV: &str = "IGDB_CLIENT_ID";
const CLIENT_SECRET_ENV: &str = "IGDB_CLIENT_SECRET";

#[derive(Debug, Parser)]
#[command(name = "catalog-enricher", version, about = "Fill catalog covers, synopses and genres from IGDB")]
struct Cli {
    /// Config file (defaults to `<config dir>/catalog-enricher/config.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve cover art for records without a cover.
    Covers {
        #[arg(long)]
        dry_run: bool,
        /// Overrides `[matching] min_score`.
        #[arg(long)]
        min_score: Option<f64>,
        #[arg(long, value_enum, default_value_t = ImageSize::Normal)]
        size: ImageSize,
        #[arg(long)]
        limit: Option<usize>,
        /// JSON object of title to cover URL, checked before any search.
        #[arg(long)]
        overrides: Option<PathBuf>,
    },
    /// Resolve synopsis and genres for records missing either.
    Details {
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        limit: Option<usize>,
        /// Replace fields that already hold a value.
        #[arg(long)]
        overwrite: bool,
    },
    /// Add titles to the local catalog.
    Add {
        #[arg(required = true)]
        titles: Vec<String>,
    },
    /// Store the IGDB client secret in the OS keyring.
    SetSecret {
        #[arg(long)]
        client_id: String,
        #[arg(long)]
        secret: String,
    },
}

fn init_logging(verbose: bool) {
    let mut clog = colog::default_builder();
    clog.filter(
        None,
        if verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        },
    );
    clog.init();

    std::panic::set_hook(Box::new(|panic_info| {
        let current_thread = std::thread::current();
        let thread_name = current_thread.name().unwrap_or("unnamed");
        log::error!("panic in thread '{}': {}", thread_name, panic_info);
    }));
}

fn load_config(path: Option<PathBuf>) -> Result<Config, EnrichError> {
    let path = match path.or_else(default_config_path) {
        Some(path) => path,
        None => {
            info!("No config directory available. Using built-in defaults.");
            return Ok(Config::default());
        }
    };
    debug!("Loading config from {}", path.display());
    load_config_file(&path)
}

fn open_store(config: &Config) -> Result<DbManager, EnrichError> {
    let database_path = resolve_database_path(config)?;
    info!("Using catalog database {}", database_path.display());
    DbManager::open(&database_path)
}

fn build_igdb_client(config: &Config) -> Result<IgdbClient, EnrichError> {
    let client_id =
        credential_keyring::resolve_client_id(std::env::var(CLIENT_ID_ENV).ok(), &config.igdb.client_id)
            .ok_or_else(|| {
                EnrichError::Configuration(format!(
                    "missing IGDB client id; set {CLIENT_ID_ENV} or [igdb] client_id"
                ))
            })?;
    let client_secret =
        credential_keyring::resolve_client_secret(std::env::var(CLIENT_SECRET_ENV).ok(), &client_id)?
            .ok_or_else(|| {
                EnrichError::Configuration(format!(
                    "missing IGDB client secret; set {CLIENT_SECRET_ENV} or run `set-secret`"
                ))
            })?;
    let credentials = IgdbCredentials::new(&client_id, &client_secret)?;
    Ok(IgdbClient::new(&config.igdb, credentials))
}

fn run_covers(
    config: &Config,
    options: RunOptions,
    min_score: Option<f64>,
    size: ImageSize,
    overrides_path: Option<PathBuf>,
) -> Result<RunSummary, EnrichError> {
    let igdb = build_igdb_client(config)?;
    let store = open_store(config)?;
    let pipeline = TokenPipeline::new(stopword_filter_from_config(&config.matching));
    let overrides = match overrides_path {
        Some(path) => load_overrides_file(&path)?,
        None => OverrideMap::default(),
    };
    if !overrides.is_empty() {
        info!("Loaded {} cover overrides", overrides.len());
    }
    let settings = CoverMatchSettings::from_config(config, size, min_score);
    let matcher = CoverMatcher::new(&igdb, &pipeline, &overrides, settings);
    BatchRunner::new(&igdb, &store, options).run_covers(&matcher)
}

fn run_details(config: &Config, options: RunOptions) -> Result<RunSummary, EnrichError> {
    let igdb = build_igdb_client(config)?;
    let store = open_store(config)?;
    let translator = GoogleTranslateClient::new(&config.detail);
    let aliases = AliasTable::builtin().merged_with(&config.detail.aliases);
    let genres = GenreMapper::new();
    let matcher = DetailMatcher::new(
        &igdb,
        &translator,
        &aliases,
        &genres,
        Duration::from_millis(config.detail.retry_delay_ms),
    );
    BatchRunner::new(&igdb, &store, options).run_details(&matcher)
}

fn print_summary(summary: &RunSummary) -> Result<(), EnrichError> {
    println!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config)?;

    match cli.command {
        Commands::Covers {
            dry_run,
            min_score,
            size,
            limit,
            overrides,
        } => {
            let options = RunOptions {
                dry_run,
                limit,
                overwrite: false,
            };
            let summary = run_covers(&config, options, min_score, size, overrides)?;
            print_summary(&summary)?;
        }
        Commands::Details {
            dry_run,
            limit,
            overwrite,
        } => {
            let options = RunOptions {
                dry_run,
                limit,
                overwrite,
            };
            let summary = run_details(&config, options)?;
            print_summary(&summary)?;
        }
        Commands::Add { titles } => {
            let store = open_store(&config)?;
            for title in titles {
                let title = title.trim();
                if title.is_empty() {
                    continue;
                }
                let id = store.insert_game(title)?;
                info!("Added '{}' as #{}", title, id);
            }
        }
        Commands::SetSecret { client_id, secret } => {
            credential_keyring::set_igdb_client_secret(client_id.trim(), secret.trim())?;
            info!("Stored IGDB client secret for {}", client_id.trim());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Commands};
    use crate::protocol::ImageSize;

    #[test]
    fn test_covers_arguments_parse() {
        let cli = Cli::try_parse_from([
            "catalog-enricher",
            "--verbose",
            "covers",
            "--dry-run",
            "--min-score",
            "0.6",
            "--size",
            "retina",
            "--limit",
            "5",
        ])
        .expect("parse");
        assert!(cli.verbose);
        match cli.command {
            Commands::Covers {
                dry_run,
                min_score,
                size,
                limit,
                overrides,
            } => {
                assert!(dry_run);
                assert_eq!(min_score, Some(0.6));
                assert_eq!(size, ImageSize::Retina);
                assert_eq!(limit, Some(5));
                assert!(overrides.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_details_defaults_to_fill_only() {
        let cli = Cli::try_parse_from(["catalog-enricher", "details"]).expect("parse");
        match cli.command {
            Commands::Details {
                dry_run,
                limit,
                overwrite,
            } => {
                assert!(!dry_run);
                assert_eq!(limit, None);
                assert!(!overwrite);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_add_requires_a_title() {
        assert!(Cli::try_parse_from(["catalog-enricher", "add"]).is_err());
    }
}
