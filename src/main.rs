mod bot;
mod config;
mod data;
mod error;
mod model;
mod playback;
mod service;
mod startup;
mod util;

use crate::{config::Config, error::AppError, playback::PlaybackManager};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    startup::init_tracing();

    let config = Config::from_env()?;

    let db = startup::connect_to_database(&config).await?;
    let http_client = startup::setup_reqwest_client();
    let node = startup::connect_to_audio_node(&config, http_client).await;

    let manager = PlaybackManager::new(node.clone(), config.playback.clone());

    bot::start::start_bot(&config, db, manager, node).await?;

    Ok(())
}
