/// Main application entry point
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use perseus::config::AppConfig;
use perseus::handlers::AppState;
use perseus::pagination::PageLinks;
use perseus::repo::{init_db, BodyRepository, MemoryBodyRepo, PgBodyRepo};
use perseus::routes::{build_router, BODIES_PAGE_ROUTE};
use perseus::seed;
use perseus::services::BodyService;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Debug, Parser)]
#[command(name = "perseus", version, about = "Celestial body catalogue API")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API
    Serve {
        /// Serve from an in-memory catalogue seeded from --data-dir
        #[arg(long)]
        memory: bool,

        #[arg(long, env = "PERSEUS_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
    },
    /// Populate the database from the catalogue JSON files
    Seed {
        #[arg(long, env = "PERSEUS_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
    },
    /// Write the star files as normalised records to stars/stars.json
    Dump {
        #[arg(long, env = "PERSEUS_DATA_DIR", default_value = "data")]
        data_dir: PathBuf,
    },
    /// Delete every body from the database
    Flush,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let args = Args::parse();

    // Load configuration
    let config = AppConfig::from_env()?;
    info!("Configuration loaded successfully");

    match args.command.unwrap_or(Command::Serve {
        memory: false,
        data_dir: PathBuf::from("data"),
    }) {
        Command::Serve { memory, data_dir } => {
            let repo: Arc<dyn BodyRepository> = if memory {
                let repo = Arc::new(MemoryBodyRepo::new());
                seed::seed_catalogue(repo.as_ref(), &data_dir).await?;
                info!("Serving in-memory catalogue of {} bodies", repo.len());
                repo
            } else {
                Arc::new(PgBodyRepo::new(connect(&config).await?))
            };
            serve(config, repo).await
        }
        Command::Seed { data_dir } => {
            let repo = PgBodyRepo::new(connect(&config).await?);
            let written = seed::seed_catalogue(&repo, &data_dir).await?;
            info!("Populating initial API data success ({} bodies)", written);
            Ok(())
        }
        Command::Dump { data_dir } => {
            seed::dump_stars(&data_dir).await?;
            Ok(())
        }
        Command::Flush => {
            let repo = PgBodyRepo::new(connect(&config).await?);
            seed::flush(&repo).await?;
            Ok(())
        }
    }
}

/// Open the connection pool and make sure the schema exists
async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connect_url()?)
        .await
        .context("cannot connect to the database")?;
    info!("Database connection pool established");

    init_db(&pool).await?;
    info!("Database schema initialized");

    Ok(pool)
}

async fn serve(config: AppConfig, repo: Arc<dyn BodyRepository>) -> anyhow::Result<()> {
    let links = PageLinks::new(
        config.server_host.clone(),
        format!("{}{}", config.api_v1_str, BODIES_PAGE_ROUTE),
    );

    let state = AppState {
        body_service: Arc::new(BodyService::new(repo, links)),
        project_name: config.project_name.clone(),
        api_v1_str: config.api_v1_str.clone(),
        api_version: config.api_version.clone(),
    };

    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("perseus listening on {}", config.bind_addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutting down");
}
