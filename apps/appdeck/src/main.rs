use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use tracing::info;

use appdeck_assistant::Gateway;
use appdeck_common::GlobalConfigPatch;
use appdeck_router::{AdminKeyAuth, AssistantState, assistant_router};
use appdeck_storage::SqlSettings;

mod cli;

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("appdeck failed: {err}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let dsn = resolve_dsn(cli.dsn.as_deref(), &cli.data_dir)?;

    let config = GlobalConfigPatch {
        host: cli.host,
        port: cli.port,
        admin_key_hash: Some(AdminKeyAuth::hash_key(&cli.admin_key)),
        dsn: Some(dsn),
        proxy: cli.proxy,
        auth_file: cli.auth_file,
    }
    .into_config()?;

    let settings = SqlSettings::connect(&config.dsn).await?;
    settings.sync().await?;
    info!(dsn = %config.dsn, "db connected");

    let gateway = Gateway::new(
        Arc::new(settings),
        config.proxy.as_deref(),
        config.auth_file.clone(),
    )?;
    let state = AssistantState {
        gateway: Arc::new(gateway),
        sessions: Arc::new(AdminKeyAuth::new(config.admin_key_hash.clone())),
    };

    let router = assistant_router(state)
        .route("/api/health", axum::routing::get(|| async { "ok" }));

    let bind = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(addr = %bind, "listening");
    axum::serve(listener, router).await?;
    Ok(())
}

fn resolve_dsn(dsn: Option<&str>, data_dir: &str) -> Result<String, std::io::Error> {
    if let Some(dsn) = dsn {
        return Ok(dsn.to_string());
    }
    std::fs::create_dir_all(data_dir)?;
    Ok(format!("sqlite://{data_dir}/appdeck.db?mode=rwc"))
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
