//! Slash command interactions.

use std::sync::Arc;

use serenity::all::{
    ChannelId, CommandInteraction, Context, EditInteractionResponse, GuildId, Interaction, UserId,
};

use crate::{
    bot::{
        command::{
            bool_option, string_option, volume_option, AUTOPLAY_COMMAND, LEAVE_COMMAND,
            PLAY_COMMAND, VOLUME_COMMAND,
        },
        handler::Handler,
    },
    error::{playback::PlaybackError, AppError},
    playback::{
        display::NowPlayingChannel,
        lifecycle::PlayerEvent,
        node::{AudioNode, Player},
    },
    service::{music::MusicService, now_playing::DiscordNowPlayingChannel, voice::VoiceService},
};

/// Handles an interaction, answering commands ephemerally.
///
/// The response is deferred first since joining voice and searching the node can
/// outlast Discord's initial response window.
///
/// # Arguments
/// - `handler` - Event handler holding the database, node and playback engine
/// - `ctx` - Discord context for responding
/// - `interaction` - The received interaction
pub async fn handle_interaction(handler: &Handler, ctx: Context, interaction: Interaction) {
    let Interaction::Command(command) = interaction else {
        return;
    };

    if let Err(e) = command.defer_ephemeral(&ctx.http).await {
        tracing::error!("Failed to defer /{}: {:?}", command.data.name, e);
        return;
    }

    let reply = match run_command(handler, &ctx, &command).await {
        Ok(reply) => reply,
        Err(AppError::BadRequest(message)) => message,
        Err(e) => {
            tracing::error!("Failed to run /{}: {}", command.data.name, e);
            "Something went wrong, please try again later.".to_string()
        }
    };

    let response = EditInteractionResponse::new().content(reply);

    if let Err(e) = command.edit_response(&ctx.http, response).await {
        tracing::error!("Failed to respond to /{}: {:?}", command.data.name, e);
    }
}

async fn run_command(
    handler: &Handler,
    ctx: &Context,
    command: &CommandInteraction,
) -> Result<String, AppError> {
    let Some(guild_id) = command.guild_id else {
        return Err(AppError::BadRequest(
            "This command can only be used in a server.".to_string(),
        ));
    };

    let service = MusicService::new(&handler.db, &handler.manager, handler.default_volume);
    let options = command.data.options();

    match command.data.name.as_str() {
        AUTOPLAY_COMMAND => {
            let enabled = bool_option(&options, "enabled")
                .ok_or_else(|| AppError::BadRequest("Missing option `enabled`.".to_string()))?;

            service.set_autoplay(guild_id, enabled).await?;

            Ok(format!(
                "Autoplay is now {}.",
                if enabled { "on" } else { "off" }
            ))
        }
        VOLUME_COMMAND => {
            let volume = volume_option(&options, "level").ok_or_else(|| {
                AppError::BadRequest("Volume must be between 0 and 100.".to_string())
            })?;

            service.set_default_volume(guild_id, volume).await?;

            Ok(format!("New players will start at volume {}.", volume))
        }
        PLAY_COMMAND => {
            let query = string_option(&options, "query")
                .ok_or_else(|| AppError::BadRequest("Missing option `query`.".to_string()))?;

            let channel_id = user_voice_channel(ctx, guild_id, command.user.id).ok_or_else(|| {
                AppError::BadRequest("Join a voice channel first.".to_string())
            })?;

            play(handler, ctx, command, &service, guild_id, channel_id, query).await
        }
        LEAVE_COMMAND => {
            handler
                .manager
                .handle_event(guild_id, PlayerEvent::PlayerDestroy)
                .await;

            let voice = VoiceService::new(&handler.songbird, &handler.node, &handler.players);
            if !voice.disconnect(guild_id).await? {
                return Err(AppError::BadRequest("Nothing is playing.".to_string()));
            }

            Ok("Left the voice channel.".to_string())
        }
        other => Err(AppError::BadRequest(format!("Unknown command /{}.", other))),
    }
}

/// Joins voice if needed, queues the first search result and starts it when idle.
async fn play(
    handler: &Handler,
    ctx: &Context,
    command: &CommandInteraction,
    service: &MusicService<'_>,
    guild_id: GuildId,
    channel_id: ChannelId,
    query: &str,
) -> Result<String, AppError> {
    let voice = VoiceService::new(&handler.songbird, &handler.node, &handler.players);
    let (player, created) = voice.connect(guild_id, channel_id).await?;

    if created {
        let channel: Arc<dyn NowPlayingChannel> = Arc::new(DiscordNowPlayingChannel::new(
            Arc::clone(&ctx.http),
            command.channel_id,
            handler.manager.config().progress_bar_width,
        ));

        service
            .register_player(player.clone(), Some(channel))
            .await?;
    }

    let track = handler
        .node
        .search(query, command.user.id)
        .await
        .map_err(PlaybackError::from)?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::BadRequest(format!("No results for `{}`.", query)))?;

    let title = track.title.clone();
    player.enqueue(track);

    if player.current_track().is_some() {
        return Ok(format!(
            "Queued **{}** at position {}.",
            title,
            player.queue_len()
        ));
    }

    player.advance().await.map_err(PlaybackError::from)?;

    Ok(format!("Now playing **{}**.", title))
}

/// Voice channel `user_id` is connected to in `guild_id`, from the cache.
fn user_voice_channel(ctx: &Context, guild_id: GuildId, user_id: UserId) -> Option<ChannelId> {
    let guild = ctx.cache.guild(guild_id)?;

    guild
        .voice_states
        .get(&user_id)
        .and_then(|state| state.channel_id)
}
