//! Ready event handler for bot initialization.
//!
//! Logs the connection, starts reading the audio node's event websocket and
//! registers the global slash commands.

use std::sync::{atomic::Ordering, Arc};

use serenity::all::{Command, Context, Ready};

use crate::{
    bot::{command::commands, handler::Handler},
    playback::lavalink::LavalinkSocket,
};

/// Handles the ready event when the bot connects to Discord.
///
/// The node websocket needs the bot's user ID, so it is started here; later ready
/// events after a gateway reconnect leave the running task alone.
///
/// # Arguments
/// - `handler` - Event handler holding the node and playback engine
/// - `ctx` - Discord context for registering commands
/// - `ready` - Ready event data containing bot user information
pub async fn handle_ready(handler: &Handler, ctx: Context, ready: Ready) {
    tracing::info!("{} is connected to Discord", ready.user.name);

    if !handler.socket_started.swap(true, Ordering::SeqCst) {
        let socket = LavalinkSocket::new(
            Arc::clone(&handler.node),
            Arc::clone(&handler.players),
            ready.user.id,
        );
        tokio::spawn(socket.run(Arc::clone(&handler.manager)));
    }

    match Command::set_global_commands(&ctx.http, commands()).await {
        Ok(registered) => tracing::debug!("Registered {} global commands", registered.len()),
        Err(e) => tracing::error!("Failed to register global commands: {:?}", e),
    }
}
