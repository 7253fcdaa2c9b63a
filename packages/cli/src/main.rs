use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use catalog_server::config::AppConfig;
use catalog_server::database::init_db;
use catalog_server::error::AppError;
use catalog_server::import::import_photos;
use catalog_server::utils::accounts;

#[derive(Parser)]
#[command(name = "catalog")]
#[command(about = "Operational commands for the photo catalog")]
#[command(version)]
struct Cli {
    /// Database URL, overriding the configured one
    #[arg(long, global = true, env = "CATALOG__DATABASE__URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import photos and photographers from a CSV export
    ImportPhotos {
        /// CSV file to read
        #[arg(long, default_value = "photos.csv")]
        file: PathBuf,
    },
    /// Create an active staff account
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long, env = "CATALOG_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let database_url = match cli.database_url {
        Some(url) => url,
        None => {
            AppConfig::load()
                .context("Failed to load configuration")?
                .database
                .url
        }
    };
    tracing::debug!("Connecting to database");
    let db = init_db(&database_url)
        .await
        .context("Failed to initialize database")?;

    match cli.command {
        Commands::ImportPhotos { file } => {
            let summary = import_photos(&db, &file).await?;
            println!(
                "Imported {} photos and {} photographers.",
                summary.photos_created, summary.photographers_created
            );
            if summary.rows_skipped > 0 {
                tracing::warn!(
                    skipped = summary.rows_skipped,
                    "Some rows were skipped; see the warnings above"
                );
            }
        }
        Commands::CreateAdmin { email, password } => {
            let user = match accounts::create_user(&db, &email, &password, true).await {
                Ok(user) => user,
                Err(AppError::EmailTaken) => bail!("A user with email {email} already exists"),
                Err(AppError::Validation(msg)) => bail!(msg),
                Err(e) => bail!("Failed to create admin: {e:?}"),
            };
            tracing::info!(user_id = %user.id, email = %user.email, "Created staff user");
        }
    }

    Ok(())
}
