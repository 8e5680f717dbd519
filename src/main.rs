use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use kindling_composer::Composer;
use kindling_core::{config, shellexpand};
use kindling_history::HistoryStore;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "kindling",
    version,
    about = "Kindling — one fresh community prompt per day"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the prompt library config.
    #[arg(short, long, global = true, default_value = "prompts.toml")]
    config: String,

    /// Path to the SQLite history file.
    #[arg(short, long, global = true, default_value = "data/daily_prompts.sqlite")]
    state: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose the prompt for a date and print it as JSON.
    Generate {
        /// Target date (YYYY-MM-DD). Defaults to today.
        #[arg(short, long)]
        date: Option<NaiveDate>,
        /// Override the configured candidate count.
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Select a prompt without recording it in history.
        #[arg(long)]
        dry_run: bool,
    },
    /// Print the most recent history records, one JSON object per line.
    History {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Validate the config and summarize its pools.
    Check,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries JSON only.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Generate {
            date,
            count,
            dry_run,
        } => {
            let cfg = config::load(&cli.config)?;
            let store = HistoryStore::open(&shellexpand(&cli.state)).await?;
            let composer = Composer::new(cfg, store);

            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let chosen = if dry_run {
                info!("dry run: history will not be updated");
                composer.preview(date, count).await?
            } else {
                composer.compose(date, count).await?
            };
            println!("{}", serde_json::to_string_pretty(&chosen)?);
            composer.store().close().await;
        }
        Commands::History { limit } => {
            let store = HistoryStore::open(&shellexpand(&cli.state)).await?;
            for record in store.fetch_recent(limit).await? {
                println!("{}", serde_json::to_string(&record)?);
            }
            store.close().await;
        }
        Commands::Check => {
            let cfg = config::load(&cli.config)?;
            println!("Kindling — Config Check\n");
            println!("Config: {}", cli.config);
            println!("  templates:   {}", cfg.templates.len());
            println!("  topics:      {}", cfg.topics.len());
            println!("  tones:       {}", cfg.tones.len());
            println!("  constraints: {}", cfg.constraints.len());
            println!("  twists:      {}", cfg.twists.len());
            println!(
                "  similarity:  {:?} (threshold {}, window {})",
                cfg.similarity.mode, cfg.similarity.threshold, cfg.similarity.history_size
            );
            println!(
                "  sensitive templates: {}",
                if cfg.flags.allow_sensitive {
                    "allowed"
                } else {
                    "excluded"
                }
            );
        }
    }

    Ok(())
}
