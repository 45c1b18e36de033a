//! Player lifecycle events and the cleanup that retires per-track state.

use std::sync::Arc;

use serenity::all::GuildId;
use tokio::time::Instant;

use crate::playback::{
    manager::PlaybackManager,
    progress::{started_at, ProgressView},
    track::Track,
};

/// Events emitted by the audio node for a player.
#[derive(Debug, Clone)]
pub enum PlayerEvent {
    TrackStart(Track),
    TrackError { track: Track, message: String },
    TrackStuck { track: Track, threshold_ms: u64 },
    /// The queue ran dry; `track` is the one that just ended, if known.
    QueueEnd { track: Option<Track> },
    PlayerDestroy,
    PlayerDisconnect,
}

impl PlaybackManager {
    /// Single ingress for player events.
    ///
    /// Events for guilds without a registered player are ignored.
    pub async fn handle_event(self: &Arc<Self>, guild_id: GuildId, event: PlayerEvent) {
        match event {
            PlayerEvent::TrackStart(track) => self.on_track_start(guild_id, track).await,
            PlayerEvent::TrackError { track, message } => {
                tracing::warn!(
                    "Track '{}' failed in guild {}: {}",
                    track.title,
                    guild_id,
                    message
                );
                self.cleanup_player(guild_id);
            }
            PlayerEvent::TrackStuck {
                track,
                threshold_ms,
            } => {
                tracing::warn!(
                    "Track '{}' stuck for {}ms in guild {}",
                    track.title,
                    threshold_ms,
                    guild_id
                );
                self.cleanup_player(guild_id);
            }
            PlayerEvent::QueueEnd { track } => {
                self.cleanup_player(guild_id);

                if let Some(ended) = track {
                    self.continue_with_related(guild_id, &ended).await;
                }
            }
            PlayerEvent::PlayerDestroy | PlayerEvent::PlayerDisconnect => {
                // Dropping the session aborts its timers; the volume is left alone.
                if self.unregister_player(guild_id) {
                    tracing::debug!("Removed playback session for guild {}", guild_id);
                }
            }
        }
    }

    /// Retires every timer and the track-start timestamp of the guild's player.
    ///
    /// Idempotent. A crossfade aborted before its last step has the player's
    /// normal volume restored in the background.
    ///
    /// # Returns
    /// - `true` - The guild has a registered player
    /// - `false` - Nothing to clean up
    pub fn cleanup_player(self: &Arc<Self>, guild_id: GuildId) -> bool {
        let mut sessions = self.sessions.lock();
        let Some(session) = sessions.get_mut(&guild_id) else {
            return false;
        };

        if session.retire(None) {
            self.spawn_volume_restore(guild_id);
        }

        true
    }

    async fn on_track_start(self: &Arc<Self>, guild_id: GuildId, track: Track) {
        let (channel, generation, position_ms) = {
            let mut sessions = self.sessions.lock();
            let Some(session) = sessions.get_mut(&guild_id) else {
                tracing::debug!("Ignoring track start in guild {} without a session", guild_id);
                return;
            };

            if session.retire(Some(track.identifier.as_str())) {
                self.spawn_volume_restore(guild_id);
            }

            session.generation += 1;
            session.message = None;
            session.message_stale = false;

            let position_ms = session.player.position_ms();
            session.track_started_at = Some(started_at(Instant::now(), position_ms));

            if let Some(duration_ms) = track.duration_ms() {
                let delay = self.config.preload_delay(duration_ms, position_ms);
                session.timers.preload = Some(self.spawn_preload_timer(
                    Arc::clone(&session.player),
                    &track,
                    delay,
                ));
            }

            (session.channel.clone(), session.generation, position_ms)
        };

        let Some(channel) = channel else {
            return;
        };

        let progress = match track.duration_ms() {
            Some(duration_ms) => ProgressView::timed(position_ms, duration_ms),
            None => ProgressView::Live,
        };

        let message = match channel.announce(&track, &progress).await {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(
                    "Failed to announce '{}' in guild {}: {}",
                    track.title,
                    guild_id,
                    e
                );
                return;
            }
        };

        let mut sessions = self.sessions.lock();
        let Some(session) = sessions.get_mut(&guild_id) else {
            return;
        };
        if session.generation != generation {
            tracing::debug!("Discarding late announcement of '{}'", track.title);
            return;
        }

        session.message = Some(Arc::clone(&message));

        if track.duration_ms().is_some() {
            session.timers.progress =
                Some(self.spawn_progress_loop(guild_id, generation, track, message));
        }
    }
}
