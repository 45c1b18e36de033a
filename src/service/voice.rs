//! Voice connections backing the guilds' Lavalink players.

use std::sync::Arc;

use serenity::all::{ChannelId, GuildId};
use songbird::{error::JoinError, Songbird};

use crate::{
    error::{playback::PlaybackError, AppError},
    playback::{
        lavalink::{model::VoiceUpdate, LavalinkNode, LavalinkPlayer, LavalinkPlayers},
        node::Player,
    },
};

/// Volume the node gives a freshly created player.
const NODE_DEFAULT_VOLUME: u8 = 100;

/// Service joining voice channels and creating the matching node players.
///
/// Songbird only handles the gateway side of the connection; the node receives the
/// voice server credentials and streams the audio itself.
pub struct VoiceService<'a> {
    songbird: &'a Arc<Songbird>,
    node: &'a Arc<LavalinkNode>,
    players: &'a Arc<LavalinkPlayers>,
}

impl<'a> VoiceService<'a> {
    pub fn new(
        songbird: &'a Arc<Songbird>,
        node: &'a Arc<LavalinkNode>,
        players: &'a Arc<LavalinkPlayers>,
    ) -> Self {
        Self {
            songbird,
            node,
            players,
        }
    }

    /// Joins `channel_id` and creates the guild's player on the node.
    ///
    /// A guild that already has a player keeps it.
    ///
    /// # Returns
    /// - `Ok((player, true))` - A new player was created and must be registered
    /// - `Ok((player, false))` - The guild's existing player
    /// - `Err(AppError::VoiceErr)` - Discord did not hand out voice credentials
    /// - `Err(AppError::PlaybackErr)` - The node rejected the voice update
    pub async fn connect(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<(Arc<LavalinkPlayer>, bool), AppError> {
        if let Some(player) = self.players.get(guild_id) {
            return Ok((player, false));
        }

        let (info, _call) = self.songbird.join_gateway(guild_id, channel_id).await?;

        let player = LavalinkPlayer::new(Arc::clone(self.node), guild_id, NODE_DEFAULT_VOLUME);
        let voice = VoiceUpdate {
            token: info.token,
            endpoint: info.endpoint,
            session_id: info.session_id,
        };

        if let Err(e) = player.connect(voice).await {
            if let Err(leave) = self.songbird.remove(guild_id).await {
                tracing::debug!("Failed to leave voice in guild {}: {}", guild_id, leave);
            }
            return Err(PlaybackError::from(e).into());
        }

        self.players.insert(Arc::clone(&player));
        tracing::info!("Joined voice channel {} in guild {}", channel_id, guild_id);

        Ok((player, true))
    }

    /// Destroys the guild's player and leaves voice.
    ///
    /// # Returns
    /// - `Ok(true)` - A player existed and was destroyed
    /// - `Ok(false)` - The guild had no player
    pub async fn disconnect(&self, guild_id: GuildId) -> Result<bool, AppError> {
        let player = self.players.remove(guild_id);

        if let Some(player) = &player {
            player.destroy().await.map_err(PlaybackError::from)?;
        }

        match self.songbird.remove(guild_id).await {
            Ok(()) | Err(JoinError::NoCall) => {}
            Err(e) => return Err(e.into()),
        }

        Ok(player.is_some())
    }
}
