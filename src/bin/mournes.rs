use anyhow::Result;
use clap::{Parser, Subcommand};
use explore_mournes::database_ops::Db;
use explore_mournes::migrate::{self, MigrationSummary};
use explore_mournes::storage::StorageClient;
use explore_mournes::tracing::init_tracing;
use explore_mournes::util::env::{self as env_util, redact_db_url, resolve_database_url, SiteConfig};
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "mournes", version, about = "Explore the Mournes migration CLI")]
struct Cli {
    /// Optional override for the database URL
    #[arg(long, global = true)]
    db_url: Option<String>,
    /// Legacy site directory (defaults to LEGACY_SITE_PATH)
    #[arg(long, global = true)]
    site_path: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Import mountain pages and their starting points
    MigrateContent {
        #[arg(long, default_value_t = 100)]
        delay_ms: u64,
    },
    /// Re-encode legacy images as WebP, upload them and record metadata
    MigrateImages {
        #[arg(long, default_value_t = 200)]
        delay_ms: u64,
    },
    /// Import activity and place pages
    MigratePages {
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
    },
    /// Link orphaned images to mountains by slug heuristics
    FixImageLinks {
        #[arg(long, default_value_t = 50)]
        delay_ms: u64,
    },
    /// Print images that still have no mountain, grouped by directory
    ListUnlinkedImages,
}

fn print_summary(title: &str, summary: &MigrationSummary) {
    let rule = "=".repeat(50);
    println!("\n{rule}\n{title} complete!\n{summary}\n{rule}");
}

#[tokio::main]
async fn main() -> Result<()> {
    env_util::init_env();
    init_tracing("info,sqlx=warn", true)?;

    let cli = Cli::parse();
    let database_url = resolve_database_url(cli.db_url.clone())?;
    info!(url = %redact_db_url(&database_url), "connecting");
    let max_connections: u32 = env_util::env_parse("DB_MAX_CONNS", 5u32);
    let db = Db::connect(&database_url, max_connections).await?;

    let site_root = || -> Result<PathBuf> {
        Ok(match &cli.site_path {
            Some(p) => p.clone(),
            None => SiteConfig::from_env()?.legacy_site_path,
        })
    };

    match cli.command {
        Commands::MigrateContent { delay_ms } => {
            let summary =
                migrate::migrate_content(&db, &site_root()?, Duration::from_millis(delay_ms)).await?;
            print_summary("Content migration", &summary);
        }
        Commands::MigrateImages { delay_ms } => {
            let cfg = SiteConfig::from_env()?;
            let storage = StorageClient::new(&cfg)?;
            let root = cli.site_path.clone().unwrap_or(cfg.legacy_site_path.clone());
            let summary =
                migrate::migrate_images(&db, &storage, &root, Duration::from_millis(delay_ms)).await?;
            print_summary("Image migration", &summary);
        }
        Commands::MigratePages { delay_ms } => {
            let summary =
                migrate::migrate_pages(&db, &site_root()?, Duration::from_millis(delay_ms)).await?;
            print_summary("Activities & places migration", &summary);
        }
        Commands::FixImageLinks { delay_ms } => {
            let summary = migrate::fix_image_links(&db, Duration::from_millis(delay_ms)).await?;
            print_summary("Image link fix", &summary);
        }
        Commands::ListUnlinkedImages => {
            print!("{}", migrate::list_unlinked_images(&db).await?);
        }
    }
    Ok(())
}
