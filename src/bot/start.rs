use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::all::{Client, GatewayIntents};
use songbird::{SerenityInit, Songbird};

use crate::{
    bot::handler::Handler,
    config::Config,
    error::AppError,
    playback::{lavalink::LavalinkNode, manager::PlaybackManager},
};

/// Starts the Discord bot and blocks until the gateway connection ends.
///
/// # Arguments
/// - `config` - Application configuration containing the bot token
/// - `db` - Database connection for the music settings
/// - `manager` - Playback engine receiving voice lifecycle events
/// - `node` - Audio node the guilds' players are created on
///
/// # Returns
/// - `Ok(())` - The bot shut down
/// - `Err(AppError::DiscordErr)` - Failed to build the client or connect
pub async fn start_bot(
    config: &Config,
    db: DatabaseConnection,
    manager: Arc<PlaybackManager>,
    node: Arc<LavalinkNode>,
) -> Result<(), AppError> {
    let intents = GatewayIntents::GUILDS | GatewayIntents::GUILD_VOICE_STATES;

    let songbird = Songbird::serenity();
    let handler = Handler::new(
        db,
        manager,
        node,
        Arc::clone(&songbird),
        config.default_volume,
    );

    let mut client = Client::builder(&config.discord_bot_token, intents)
        .event_handler(handler)
        .register_songbird_with(songbird)
        .await?;

    tracing::info!("Starting Discord bot...");

    client.start().await?;

    Ok(())
}
