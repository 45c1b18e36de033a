use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{config::Config, error::AppError, playback::lavalink::LavalinkNode};

/// Installs the global tracing subscriber.
///
/// Filters by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Connects to the Sqlite database and runs pending migrations.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(AppError::DbErr)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Builds the HTTP client used for audio node requests.
///
/// Redirects are disabled; the node is addressed directly.
pub fn setup_reqwest_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Creates the audio node client and checks that the node is reachable.
///
/// An unreachable node is logged but not fatal; requests are retried per track.
///
/// # Arguments
/// - `config` - Application configuration containing the node URL and password
/// - `http_client` - HTTP client shared by all node requests
///
/// # Returns
/// - `Arc<LavalinkNode>` - Node client shared by the engine and player glue
pub async fn connect_to_audio_node(config: &Config, http_client: reqwest::Client) -> Arc<LavalinkNode> {
    let node = Arc::new(LavalinkNode::new(
        http_client,
        &config.lavalink_url,
        &config.lavalink_password,
    ));

    match node.info().await {
        Ok(info) => tracing::info!(
            "Connected to audio node at {} (version {})",
            config.lavalink_url,
            info["version"]["semver"].as_str().unwrap_or("unknown")
        ),
        Err(e) => tracing::warn!(
            "Audio node at {} is not reachable yet: {}",
            config.lavalink_url,
            e
        ),
    }

    node
}
