use clap::{Parser, Subcommand};
use sqlx::PgPool;

mod briefs;
mod copy;
mod scan;
mod trends;

#[derive(Debug, Parser)]
#[command(name = "vimark-cli")]
#[command(about = "Vimark trend-to-content command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan trends and queue content briefs for approval
    Scan {
        /// Product category to match (repeatable; defaults to the catalog's categories)
        #[arg(long = "category")]
        categories: Vec<String>,
        /// Relevance threshold override (0.0 to 1.0)
        #[arg(long)]
        min_score: Option<f64>,
        /// Maximum number of trends that get a strategy session
        #[arg(long)]
        max_briefs: Option<usize>,
        /// Score and rank without writing to the database or index
        #[arg(long)]
        dry_run: bool,
    },
    /// Show recently discovered trends
    Trends {
        /// Maximum number of snapshots to show
        #[arg(long, default_value = "20")]
        limit: u32,
    },
    /// Manage the content brief approval queue
    Briefs {
        #[command(subcommand)]
        command: briefs::BriefsCommands,
    },
    /// Generate platform copy for an approved brief
    Copy {
        /// Public brief id
        #[arg(long)]
        brief: uuid::Uuid,
        /// Target platform (repeatable, e.g. facebook, tiktok, shopee)
        #[arg(long = "platform")]
        platforms: Vec<String>,
        /// Generate A/B variants in addition to the default copy
        #[arg(long)]
        variants: bool,
        /// Print copy without recording it
        #[arg(long)]
        dry_run: bool,
    },
}

async fn connect(config: &vimark_core::AppConfig) -> anyhow::Result<PgPool> {
    let pool = vimark_db::connect_pool(
        &config.database_url,
        vimark_db::PoolConfig::from_app_config(config),
    )
    .await?;
    Ok(pool)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = vimark_core::load_app_config()?;

    match cli.command {
        Commands::Scan {
            categories,
            min_score,
            max_briefs,
            dry_run,
        } => {
            if let Some(score) = min_score {
                if !(0.0..=1.0).contains(&score) {
                    anyhow::bail!("--min-score must be between 0 and 1");
                }
            }
            let pool = if dry_run {
                None
            } else {
                Some(connect(&config).await?)
            };
            scan::run_scan(pool.as_ref(), &config, &categories, min_score, max_briefs).await
        }
        Commands::Trends { limit } => {
            let pool = connect(&config).await?;
            trends::run_trends_status(&pool, i64::from(limit)).await
        }
        Commands::Briefs { command } => {
            let pool = connect(&config).await?;
            briefs::run(&pool, command).await
        }
        Commands::Copy {
            brief,
            platforms,
            variants,
            dry_run,
        } => {
            let pool = connect(&config).await?;
            copy::run_copy(&pool, brief, &platforms, variants, dry_run).await
        }
    }
}
