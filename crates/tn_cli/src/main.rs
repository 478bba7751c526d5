use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tn_core::Result;
use tn_sources::{config, IngestConfig, IngestionPipeline};
use tn_web::AppState;
use tracing::{error, info};

/// Duration flag in "1h30m" form.
#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut total_seconds = 0u64;
        let mut current_number = String::new();
        let mut has_unit = false;

        for c in s.chars() {
            if c.is_ascii_digit() {
                current_number.push(c);
            } else if let Ok(num) = current_number.parse::<u64>() {
                match c {
                    's' => total_seconds += num,
                    'm' => total_seconds += num * 60,
                    'h' => total_seconds += num * 3600,
                    'd' => total_seconds += num * 86400,
                    _ => return Err(format!("Invalid duration unit: {}", c)),
                }
                current_number.clear();
                has_unit = true;
            } else if !c.is_whitespace() {
                return Err(format!("Invalid character in duration: {}", c));
            }
        }

        // A trailing bare number counts as seconds
        if !current_number.is_empty() {
            match current_number.parse::<u64>() {
                Ok(num) => {
                    total_seconds += num;
                    has_unit = true;
                }
                Err(_) => return Err("Invalid number in duration".to_string()),
            }
        }

        if !has_unit {
            return Err("Duration must include a number".to_string());
        }

        Ok(HumanDuration(Duration::from_secs(total_seconds)))
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, default_value = "sqlite", help = "Storage backend: sqlite or memory")]
    storage: String,
    #[arg(long, default_value = "news.db")]
    db_path: String,
    /// News API credential. Without one, ingestion is RSS-only.
    #[arg(long, env = "NEWS_API_KEY")]
    api_key: Option<String>,
    /// RSS/Atom feed URL; repeat the flag for multiple feeds.
    #[arg(long = "feed")]
    feeds: Vec<String>,
    #[arg(long, default_value = "us")]
    country: String,
    #[arg(long, default_value = "technology")]
    category: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server with the periodic ingestion scheduler
    Serve {
        #[arg(long, default_value = "0.0.0.0:8000")]
        addr: String,
        /// Interval between scheduled ingestion runs (e.g. 15m, 1h30m)
        #[arg(long, default_value = "15m")]
        interval: HumanDuration,
    },
    /// Run a single ingestion pass and exit
    Ingest,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let store = tn_storage::create_store(&cli.storage, Some(&cli.db_path)).await?;
    info!("💾 storage initialized (using {})", cli.storage);

    let ingest_config = IngestConfig {
        api_key: cli.api_key,
        country: cli.country,
        category: cli.category,
        feeds: if cli.feeds.is_empty() {
            vec![config::DEFAULT_FEED.to_string()]
        } else {
            cli.feeds
        },
        ..Default::default()
    };
    if ingest_config.api_key.is_none() {
        info!("no NEWS_API_KEY configured, ingesting from RSS feeds only");
    }

    let sources = ingest_config.build_sources();
    info!("🗞️  {} sources configured", sources.len());
    let pipeline = Arc::new(IngestionPipeline::new(store.clone(), sources));

    match cli.command {
        Commands::Ingest => {
            let report = pipeline.run().await?;
            println!(
                "fetched {}, inserted {}, skipped {}, {} errors",
                report.fetched,
                report.inserted,
                report.skipped,
                report.errors.len()
            );
            for err in &report.errors {
                eprintln!("  {}: {}", err.source, err.message);
            }
        }
        Commands::Serve { addr, interval } => {
            // The scheduler and POST /ingest share the pipeline; its
            // internal lock keeps their runs from overlapping.
            let scheduled = pipeline.clone();
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval.0);
                // consume the immediate first tick
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    match scheduled.run().await {
                        Ok(report) => info!(
                            "scheduled run: {} inserted, {} skipped",
                            report.inserted, report.skipped
                        ),
                        Err(e) => error!("scheduled ingestion failed: {}", e),
                    }
                }
            });

            let app = tn_web::create_app(AppState { store, pipeline });
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            info!("📰 listening on {}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_duration() {
        assert_eq!(
            "15m".parse::<HumanDuration>().unwrap().0,
            Duration::from_secs(900)
        );
        assert_eq!(
            "1h30m".parse::<HumanDuration>().unwrap().0,
            Duration::from_secs(5400)
        );
        assert_eq!(
            "45".parse::<HumanDuration>().unwrap().0,
            Duration::from_secs(45)
        );
        assert!("".parse::<HumanDuration>().is_err());
        assert!("1x".parse::<HumanDuration>().is_err());
    }
}
