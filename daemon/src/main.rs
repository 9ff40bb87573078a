//! govlens: entry point for querying governance and validator data.

mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use govlens_client::LcdClient;
use govlens_governance::{split_active, Paginator};
use govlens_service::{init_logging, GovernanceService, LogFormat, PageLoad, ServiceConfig};
use govlens_store_lmdb::{LmdbEnvironment, DEFAULT_MAP_SIZE};
use govlens_types::SystemClock;

#[derive(Parser)]
#[command(name = "govlens", about = "Governance and validator data from a Cosmos SDK LCD")]
struct Cli {
    /// LCD REST endpoint (defaults to the config file value).
    #[arg(long, env = "GOVLENS_LCD")]
    lcd: Option<String>,

    /// Directory of the on-disk cache.
    #[arg(long, env = "GOVLENS_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "GOVLENS_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, env = "GOVLENS_LOG_FORMAT")]
    log_format: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "GOVLENS_CONFIG")]
    config: Option<PathBuf>,

    /// Print JSON instead of a human summary.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Bonded validators ranked by voting power.
    Validators {
        /// Only show the N largest.
        #[arg(long)]
        top: Option<usize>,
    },
    /// Governance proposals, newest first.
    Proposals {
        /// Only proposals currently in their voting period.
        #[arg(long)]
        active: bool,
        /// Page to show (1-based).
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Proposals per page.
        #[arg(long, default_value_t = 6)]
        per_page: usize,
    },
    /// One proposal, refined against its live tally.
    Proposal {
        /// Proposal id.
        id: String,
    },
    /// Governance parameters.
    Params,
    /// Refetch the proposal listing, bypassing every cache.
    Refresh,
}

fn load_config(cli: &Cli) -> anyhow::Result<ServiceConfig> {
    let mut config = match cli.config {
        Some(ref path) => ServiceConfig::from_toml_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => ServiceConfig::default(),
    };
    if let Some(ref lcd) = cli.lcd {
        config.lcd_endpoint = lcd.clone();
    }
    if let Some(ref dir) = cli.cache_dir {
        config.cache_dir = dir.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.log_format = format.clone();
    }
    Ok(config)
}

/// Serve the page snapshot, refreshing it first when it has gone stale.
/// A failed refresh falls back to the stale snapshot.
async fn load_proposals<A, B, C>(
    service: &GovernanceService<A, B, C>,
) -> anyhow::Result<PageLoad>
where
    A: govlens_client::ChainApi,
    B: govlens_store::CacheBackend,
    C: govlens_types::Clock,
{
    let page = service.load_page().await?;
    if !page.needs_revalidation {
        return Ok(page);
    }
    match service.revalidate_page().await {
        Ok(fresh) => Ok(fresh),
        Err(e) => {
            tracing::warn!(error = %e, retryable = e.is_retryable(), "revalidation failed, showing cached proposals");
            Ok(page)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let log_format: LogFormat = config.log_format.parse()?;
    init_logging(log_format, &config.log_level);

    tracing::info!(
        "Using LCD {} (cache at {})",
        config.lcd_endpoint,
        config.cache_dir.display()
    );

    let env = LmdbEnvironment::open(&config.cache_dir, DEFAULT_MAP_SIZE)
        .with_context(|| format!("opening cache at {}", config.cache_dir.display()))?;
    let client = LcdClient::with_timeouts(
        config.lcd_endpoint.clone(),
        config.request_timeout(),
        config.connect_timeout(),
    )
    .with_fallback_tally(config.default_thresholds);
    let service = GovernanceService::new(
        client,
        Arc::new(env.cache_backend()),
        Arc::new(SystemClock),
        config,
    );

    match cli.command {
        Command::Validators { top } => {
            let mut ranked = service.validators().await?;
            if let Some(n) = top {
                ranked.truncate(n);
            }
            if cli.json {
                print_json(&ranked)?;
            } else {
                print!("{}", render::validators(&ranked));
            }
        }
        Command::Proposals {
            active,
            page,
            per_page,
        } => {
            let loaded = load_proposals(&service).await?;
            let proposals = if active {
                split_active(loaded.proposals).0
            } else {
                loaded.proposals
            };
            let pager = Paginator::new(per_page, proposals.len());
            let shown = pager.slice(&proposals, page);
            if cli.json {
                print_json(&shown)?;
            } else {
                print!("{}", render::proposals(shown, &pager, pager.clamp(page)));
            }
        }
        Command::Proposal { id } => {
            let detail = service
                .proposal_by_id(&id)
                .await?
                .with_context(|| format!("proposal {id} not found"))?;
            if cli.json {
                print_json(&detail)?;
            } else {
                print!("{}", render::proposal(&detail));
            }
        }
        Command::Params => {
            let params = service.gov_params().await?;
            if cli.json {
                print_json(&params)?;
            } else {
                print!("{}", render::params(&params));
            }
        }
        Command::Refresh => {
            let proposals = service.refresh_proposals().await?;
            let (active, past) = split_active(proposals);
            tracing::info!(active = active.len(), past = past.len(), "proposal cache refreshed");
            if cli.json {
                print_json(&serde_json::json!({ "active": active.len(), "past": past.len() }))?;
            } else {
                println!("Refreshed: {} active, {} past proposals", active.len(), past.len());
            }
        }
    }

    Ok(())
}
