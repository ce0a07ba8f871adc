use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use snaplink::clock::{Clock, SystemClock};
use snaplink::config::{StaticConfig, get_config, init_config, init_config_from};
use snaplink::errors::SnaplinkError;
use snaplink::event_log::{EventLog, LogLevel};
use snaplink::registry::{ExpirySweeper, UrlRegistry};
use snaplink::services::{CreateLinkRequest, LinkService, RedirectOutcome};
use snaplink::storage::StorageFactory;
use snaplink::system::init_logging;

#[derive(Parser, Debug)]
#[command(name = "snaplink", version, about = "Shorten URLs with expiring short codes")]
struct Cli {
    /// Configuration file (default: snaplink.toml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    #[command(flatten)]
    Link(LinkCommand),
    /// Print a sample configuration file
    Config,
}

#[derive(Subcommand, Debug)]
enum LinkCommand {
    /// Create a short link
    Shorten {
        url: String,
        #[arg(long)]
        code: Option<String>,
        /// Lifetime in minutes
        #[arg(long)]
        minutes: Option<i64>,
    },
    /// Follow a short code like a browser would, recording the click
    Open {
        code: String,
        #[arg(long, default_value = "snaplink-cli")]
        user_agent: String,
        #[arg(long, default_value = "")]
        referrer: String,
    },
    /// List every link, newest first
    List,
    /// Delete a link by id
    Delete { id: String },
    /// Show dashboard counters
    Stats,
    /// Run one expiry sweep
    Sweep,
    /// Show the event log
    Logs {
        #[arg(long)]
        level: Option<LogLevel>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// Keep sweeping expired links until Ctrl+C
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let command = match cli.command {
        Command::Config => {
            print!("{}", StaticConfig::generate_sample_config());
            return Ok(());
        }
        Command::Link(command) => command,
    };

    match cli.config.as_deref() {
        Some(path) => init_config_from(path),
        None => init_config(),
    }
    let config = get_config();
    let guard = init_logging(&config.logging).context("failed to initialise logging")?;

    if let Err(e) = run(command, &config).await {
        eprintln!("{}", e.format_colored());
        // exit() skips destructors; flush buffered log lines first
        drop(guard);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(command: LinkCommand, config: &StaticConfig) -> Result<(), SnaplinkError> {
    let store = StorageFactory::create(&config.storage)?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let events = Arc::new(EventLog::open(
        store.clone(),
        clock.clone(),
        config.event_log.capacity,
        &config.privacy,
    ));
    let registry = Arc::new(UrlRegistry::open(
        store,
        events.clone(),
        clock,
        config.registry.clone(),
        config.privacy.clone(),
    ));
    let service = LinkService::new(registry.clone(), events, config.redirect.clone());

    match command {
        LinkCommand::Shorten { url, code, minutes } => {
            let created = service.create_link(CreateLinkRequest {
                url,
                custom_code: code,
                expiry_minutes: minutes,
            })?;
            println!("{}", created.short_url);
            println!("  id:      {}", created.link.id);
            println!("  target:  {}", created.link.original_url);
            println!("  expires: {}", created.link.expires_at.to_rfc3339());
        }
        LinkCommand::Open {
            code,
            user_agent,
            referrer,
        } => match service.resolve(&code, &user_agent, &referrer) {
            RedirectOutcome::Redirect { target, delay } => {
                println!("Redirecting in {:?}...", delay);
                tokio::time::sleep(delay).await;
                println!("{}", target);
            }
            RedirectOutcome::NotFound => {
                return Err(SnaplinkError::not_found(format!(
                    "Short link '{}' does not exist or has expired",
                    code
                )));
            }
        },
        LinkCommand::List => {
            for link in service.list_links() {
                let status = if link.is_active { "active" } else { "expired" };
                println!(
                    "{:<8} {:<22} {:>5} clicks  {}  {}",
                    status,
                    link.short_code,
                    link.click_count,
                    link.id,
                    link.original_url
                );
            }
        }
        LinkCommand::Delete { id } => {
            service.delete_link(&id)?;
            println!("Deleted {}", id);
        }
        LinkCommand::Stats => {
            let stats = service.stats();
            println!("total:    {}", stats.total);
            println!("active:   {}", stats.active);
            println!("inactive: {}", stats.inactive);
            println!("clicks:   {}", stats.total_clicks);
        }
        LinkCommand::Sweep => {
            let flipped = registry.sweep_expired();
            println!("Deactivated {} expired links", flipped);
        }
        LinkCommand::Logs { level, limit } => {
            let events = service.events();
            let matching: Vec<_> = events
                .iter()
                .filter(|e| level.is_none_or(|l| e.level == l))
                .collect();
            let skip = matching.len().saturating_sub(limit);
            for event in matching.into_iter().skip(skip) {
                println!(
                    "{} {:<5} {:<24} {}",
                    event.timestamp.to_rfc3339(),
                    event.level,
                    event.action,
                    serde_json::Value::Object(event.details.clone())
                );
            }
        }
        LinkCommand::Watch => {
            let period = Duration::from_secs(config.registry.sweep_interval_secs.max(1));
            let handle = ExpirySweeper::spawn(registry, period);
            info!("Watching for expired links, press Ctrl+C to stop");
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl+C: {}", e);
            }
            handle.shutdown().await;
        }
    }

    Ok(())
}
