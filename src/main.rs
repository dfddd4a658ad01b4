use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Context;
use clap::Parser;
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod shared;
mod domain;
mod ports;
mod infrastructure;
mod services;
mod presentation;

use shared::config::Config;
use shared::error::RepoError;
use shared::result::Result;
use infrastructure::keys::RsaKeyProvisioner;
use infrastructure::sqlite::repository_repo::SqliteRepositoryRepository;
use presentation::routes::AppContext;
use services::repository::RepositoryService;


#[derive(Parser, Debug)]
#[clap(name = "repohub")]
#[clap(version)]
#[clap(about = "Repository registry with per-repository deploy keys for CI")]
pub struct Args {
    /// Configuration file (TOML)
    #[clap(short, long, value_parser, default_value = "config.toml")]
    config: PathBuf,

    /// The SQLite database path
    #[clap(short, long, value_parser)]
    db_path: Option<PathBuf>,

    /// Server bind address
    #[clap(short, long)]
    bind_address: Option<SocketAddr>,

    /// RSA modulus size for generated keys (at least 2048)
    #[clap(short = 'k', long)]
    key_bits: Option<usize>,
}


#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .pretty()
        .init();

    // 加载配置
    let config = Config::from_args_and_file(
        &args.config,
        args.db_path.clone(),
        args.bind_address,
        args.key_bits,
    )?;
    let config = Arc::new(config);

    info!("Starting repohub server...");
    info!("Configuration loaded: {:?}", config);

    // 初始化 SQLite 数据库
    let sqlite_pool = infrastructure::sqlite::create_pool(
        &config.database.sqlite_path,
        config.database.max_connections,
    )
    .await
    .with_context(|| format!("failed to open {}", config.database.sqlite_path.display()))?;

    info!("Running database migrations...");
    infrastructure::sqlite::run_migrations(&sqlite_pool).await?;
    info!("Database migrations completed");

    let repository_store = Arc::new(SqliteRepositoryRepository::new(sqlite_pool));
    let keys = Arc::new(RsaKeyProvisioner::new(config.keys.bits)?);
    info!("Generating {}-bit RSA keys for new repositories", keys.bits());

    let repository_service = Arc::new(RepositoryService::new(
        config.clone(),
        repository_store,
        keys,
    ));

    let app_context = Arc::new(AppContext { repository_service });

    let origins = config
        .server
        .cors_origins
        .iter()
        .map(|o| o.parse::<HeaderValue>().map_err(|e| RepoError::Config(e.to_string())))
        .collect::<Result<Vec<_>>>()?;

    let app = presentation::routes::create_app_router(app_context)
        .layer(CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE]));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind_address))?;

    info!("Server listening on {}", config.server.bind_address);
    info!("API available at: http://{}/api/", config.server.bind_address);

    axum::serve(listener, app)
        .await
        .map_err(|e| RepoError::Internal(e.to_string()))?;

    Ok(())
}
