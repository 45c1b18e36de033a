//! The playback continuity manager.
//!
//! Owns the preload cache and one [`PlayerSession`] per registered player. The
//! algorithms live in sibling modules as further `impl PlaybackManager` blocks:
//! - `preload` - lookahead resolution of the next queued track
//! - `crossfade` - volume-ramped transition into a track
//! - `progress` - elapsed-time clock and render loop
//! - `lifecycle` - player event handling and cleanup

use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;
use serenity::all::GuildId;

use crate::{
    error::playback::PlaybackError,
    playback::{
        cache::PreloadCache,
        config::PlaybackConfig,
        display::NowPlayingChannel,
        node::{AudioNode, Player},
        session::PlayerSession,
        track::Track,
    },
};

pub struct PlaybackManager {
    pub(super) node: Arc<dyn AudioNode>,
    pub(super) config: PlaybackConfig,
    pub(super) cache: PreloadCache,
    pub(super) sessions: Mutex<HashMap<GuildId, PlayerSession>>,
}

impl PlaybackManager {
    /// Creates the manager with an empty preload cache.
    ///
    /// # Arguments
    /// - `node` - Audio node used for preload and autoplay searches
    /// - `config` - Engine tunables
    ///
    /// # Returns
    /// - `Arc<PlaybackManager>` - Shared manager; timer tasks hold clones of it
    pub fn new(node: Arc<dyn AudioNode>, config: PlaybackConfig) -> Arc<Self> {
        Arc::new(Self {
            node,
            cache: PreloadCache::new(config.preload_capacity),
            config,
            sessions: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn cache(&self) -> &PreloadCache {
        &self.cache
    }

    /// Starts tracking a player.
    ///
    /// Replaces any previous session for the same guild; the old session's timers
    /// are aborted when it is dropped. The player's current volume becomes the
    /// volume crossfades return to.
    ///
    /// # Arguments
    /// - `player` - The guild's playback controller
    /// - `channel` - Where now-playing messages are posted, `None` to disable them
    /// - `autoplay` - Whether queue end continues with a related track
    pub fn register_player(
        &self,
        player: Arc<dyn Player>,
        channel: Option<Arc<dyn NowPlayingChannel>>,
        autoplay: bool,
    ) {
        let guild_id = player.guild_id();
        let session = PlayerSession::new(player, channel, autoplay);

        if self.sessions.lock().insert(guild_id, session).is_some() {
            tracing::debug!("Replaced existing playback session for guild {}", guild_id);
        }
    }

    /// Stops tracking a player, aborting all of its timers.
    ///
    /// # Returns
    /// - `true` - A session existed and was removed
    /// - `false` - No session was registered for the guild
    pub fn unregister_player(&self, guild_id: GuildId) -> bool {
        self.sessions.lock().remove(&guild_id).is_some()
    }

    pub fn has_session(&self, guild_id: GuildId) -> bool {
        self.sessions.lock().contains_key(&guild_id)
    }

    pub fn player(&self, guild_id: GuildId) -> Option<Arc<dyn Player>> {
        self.sessions
            .lock()
            .get(&guild_id)
            .map(|session| Arc::clone(&session.player))
    }

    /// Enables or disables autoplay continuation for a registered player.
    pub fn set_autoplay(&self, guild_id: GuildId, enabled: bool) -> Result<(), PlaybackError> {
        let mut sessions = self.sessions.lock();
        let session = sessions
            .get_mut(&guild_id)
            .ok_or(PlaybackError::NoSession(guild_id))?;

        session.autoplay = enabled;

        Ok(())
    }

    pub fn autoplay_enabled(&self, guild_id: GuildId) -> Option<bool> {
        self.sessions.lock().get(&guild_id).map(|s| s.autoplay)
    }

    /// Number of running timers for the guild's player.
    pub fn active_timers(&self, guild_id: GuildId) -> usize {
        self.sessions
            .lock()
            .get(&guild_id)
            .map_or(0, |session| session.timers.active())
    }

    /// Whether the current now-playing message stopped accepting edits.
    pub fn is_message_stale(&self, guild_id: GuildId) -> bool {
        self.sessions
            .lock()
            .get(&guild_id)
            .is_some_and(|session| session.message_stale)
    }

    /// Resolves the next queued track in the background.
    pub fn preload_next_track(self: &Arc<Self>, guild_id: GuildId) {
        let Some(player) = self.player(guild_id) else {
            tracing::debug!("Skipping preload for guild {} without a player", guild_id);
            return;
        };

        let manager = Arc::clone(self);
        tokio::spawn(async move {
            manager.preload_next(player.as_ref()).await;
        });
    }

    /// Crossfades into `next` in the background, logging a failed fallback.
    pub fn do_crossfade(self: &Arc<Self>, guild_id: GuildId, next: Track) {
        let manager = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = manager.crossfade(guild_id, next).await {
                tracing::error!("Crossfade failed in guild {}: {}", guild_id, e);
            }
        });
    }

    /// Puts the player back to its normal volume after an interrupted ramp.
    ///
    /// Skipped when a newer ramp already climbs to that volume. Until the restore
    /// lands, crossfades keep the stored normal volume instead of reading the
    /// player's current one.
    pub(super) fn spawn_volume_restore(self: &Arc<Self>, guild_id: GuildId) {
        let manager = Arc::clone(self);

        tokio::spawn(async move {
            let (player, volume) = {
                let mut sessions = manager.sessions.lock();
                let Some(session) = sessions.get_mut(&guild_id) else {
                    return;
                };
                if !session.volume_restore_pending {
                    return;
                }
                if session.timers.fade.is_some() {
                    session.volume_restore_pending = false;
                    return;
                }
                (Arc::clone(&session.player), session.normal_volume)
            };

            if let Err(e) = player.set_volume(volume).await {
                tracing::warn!(
                    "Failed to restore volume {} in guild {}: {}",
                    volume,
                    guild_id,
                    e
                );
            }

            if let Some(session) = manager.sessions.lock().get_mut(&guild_id) {
                session.volume_restore_pending = false;
            }
        });
    }
}
