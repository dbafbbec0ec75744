use actix_web::{App, HttpServer, web};
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use sqlx::{Pool, Postgres};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer, filter::LevelFilter};
mod api;
use crate::api::{
    health::health_config,
    job::{JobService, dto::ScrapeResponse, handlers::job_config},
    validation,
};
mod config;
mod db;
mod export;
mod extract;
mod shutdown;
use crate::db::{JobStore, MemoryStore, PgJobStore};
use crate::extract::HttpFetcher;
use crate::shutdown::ShutdownCoordinator;

#[derive(Parser)]
#[command(name = "job-scraper")]
#[command(about = "Scrapes job listings, stores them and exports them as SQL")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Run one scrape and print the outcome as JSON
    Scrape {
        #[arg(long = "function")]
        job_function: String,
    },

    /// Write the SQL dump of every stored record
    Export {
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Apply database migrations and exit
    Migrate,
}

fn init_tracing(log_dir: &str) -> anyhow::Result<()> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create logs directory {}", log_dir))?;

    // Files roll daily: logs/info.log.2024-12-22, logs/error.log.2024-12-22, ...
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_file = tracing_appender::rolling::daily(log_dir, "info.log");
    let warn_file = tracing_appender::rolling::daily(log_dir, "warn.log");
    let error_file = tracing_appender::rolling::daily(log_dir, "error.log");
    let debug_file = tracing_appender::rolling::daily(log_dir, "debug.log");

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(info_file)
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(warn_file)
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(error_file)
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(debug_file)
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    // stderr, so `export` can stream SQL on stdout
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .with(debug_layer)
        .init();

    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = config::Config::from_env()
        .map_err(anyhow::Error::msg)
        .context("Failed to load configuration")?;

    init_tracing(&config.log_dir)?;

    info!("Configuration loaded successfully:");
    info!("  - Scrape target: {}", config.scrape_target_url);
    info!("  - Fetch timeout: {}s", config.fetch_timeout_secs);
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);

    let pool = match &config.database_url {
        Some(database_url) => {
            let pool = db::connection::get_connection(database_url, config.max_db_connections)
                .await
                .context("Failed to connect to database")?;
            info!("Database connection pool established");

            db::migrations::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            Some(pool)
        }
        None => {
            warn!("DATABASE_URL not set, records are kept in memory for this process only");
            None
        }
    };

    let command = cli.command.unwrap_or(Commands::Serve);
    if let Commands::Migrate = command {
        if pool.is_none() {
            bail!("migrate requires DATABASE_URL");
        }
        info!("Migrations are up to date");
        return Ok(());
    }

    let store: Arc<dyn JobStore> = match &pool {
        Some(pool) => Arc::new(PgJobStore::new(pool.clone())),
        None => Arc::new(MemoryStore::new()),
    };
    let fetcher = HttpFetcher::new(
        &config.user_agent,
        Duration::from_secs(config.fetch_timeout_secs),
    )
    .context("Failed to build HTTP client")?;
    let service = JobService::new(store.clone(), Arc::new(fetcher), &config.scrape_target_url);

    match command {
        Commands::Scrape { job_function } => run_scrape(&service, &job_function).await,
        Commands::Export { output } => run_export(&service, output.as_deref()).await,
        _ => serve(config, service, store, pool).await,
    }
}

async fn run_scrape(service: &JobService, job_function: &str) -> anyhow::Result<()> {
    let response = match service.scrape(job_function).await {
        Ok(outcome) => ScrapeResponse::success(job_function, outcome),
        Err(err) => ScrapeResponse::failure(job_function, &err),
    };
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.success {
        bail!("{}", response.message);
    }
    Ok(())
}

async fn run_export(service: &JobService, output: Option<&Path>) -> anyhow::Result<()> {
    let dump = service.export_sql().await?;
    match output {
        Some(path) => {
            std::fs::write(path, &dump)
                .with_context(|| format!("Failed to write export to {}", path.display()))?;
            info!("SQL export written to {}", path.display());
        }
        None => print!("{}", dump),
    }
    Ok(())
}

async fn serve(
    config: config::Config,
    service: JobService,
    store: Arc<dyn JobStore>,
    pool: Option<Pool<Postgres>>,
) -> anyhow::Result<()> {
    let max_payload_size = config.max_payload_size;
    let job_service = web::Data::new(service);
    let store_data: web::Data<dyn JobStore> = web::Data::from(store);

    let server = HttpServer::new(move || {
        let payload_config = web::PayloadConfig::default()
            .limit(max_payload_size);

        App::new()
            .app_data(job_service.clone())
            .app_data(store_data.clone())
            .app_data(payload_config)
            .app_data(validation::query_config())
            .configure(health_config)
            .configure(job_config)
    });

    info!("Server starting on http://{}:{}", config.bind_address, config.port);

    let server = server
        .bind((config.bind_address.as_str(), config.port))
        .with_context(|| format!("Failed to bind {}:{}", config.bind_address, config.port))?
        .run();

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    ShutdownCoordinator::new(server_handle, server_task, pool)
        .wait_for_shutdown()
        .await?;
    Ok(())
}
