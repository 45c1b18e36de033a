//! Lookahead resolution of the next queued track.

use std::{sync::Arc, time::Duration};

use tokio::task::JoinHandle;

use crate::{
    error::playback::NodeError,
    playback::{
        manager::PlaybackManager,
        node::{is_current, Player},
        track::Track,
    },
};

/// Result of a single preload attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreloadOutcome {
    /// Nothing is queued after the current track.
    EmptyQueue,
    /// The queued track was resolved earlier and is still cached.
    AlreadyCached,
    /// The queued track was resolved and cached.
    Cached,
    /// The search succeeded but returned no tracks.
    NotFound,
    /// The search failed; playback is unaffected.
    Failed,
}

impl PlaybackManager {
    /// Resolves the head of the player's queue into the preload cache.
    ///
    /// Never fails: search errors are logged and only cost the later transition a
    /// fresh resolve.
    pub async fn preload_next(&self, player: &dyn Player) -> PreloadOutcome {
        let Some(next) = player.peek_queue() else {
            return PreloadOutcome::EmptyQueue;
        };

        if self.cache.contains(&next.identifier) {
            tracing::debug!("'{}' is already preloaded", next.title);
            return PreloadOutcome::AlreadyCached;
        }

        match self.node.search(next.resolve_query(), next.requester).await {
            Ok(tracks) => match tracks.into_iter().next() {
                Some(resolved) => {
                    self.cache.insert(next.identifier.clone(), resolved);
                    tracing::debug!(
                        "Preloaded '{}' for guild {} ({} cached)",
                        next.title,
                        player.guild_id(),
                        self.cache.len()
                    );
                    PreloadOutcome::Cached
                }
                None => {
                    tracing::warn!("Preload search for '{}' returned no tracks", next.title);
                    PreloadOutcome::NotFound
                }
            },
            Err(e) => {
                tracing::warn!("Failed to preload '{}': {}", next.title, e);
                PreloadOutcome::Failed
            }
        }
    }

    /// Plays `track`, preferring its preloaded handle.
    ///
    /// A cached handle the node rejects is resolved again; the fresh result
    /// overwrites the cache entry and is played instead. Without a usable fresh
    /// result `track` itself is played.
    pub async fn play_resolved(&self, player: &dyn Player, track: &Track) -> Result<(), NodeError> {
        let Some(cached) = self.cache.get(&track.identifier) else {
            return player.play(track).await;
        };

        let Err(e) = player.play(&cached).await else {
            return Ok(());
        };

        tracing::warn!(
            "Preloaded handle for '{}' was rejected, resolving again: {}",
            track.title,
            e
        );

        let fresh = match self.node.search(track.resolve_query(), track.requester).await {
            Ok(tracks) => tracks.into_iter().next(),
            Err(e) => {
                tracing::warn!("Failed to resolve '{}' again: {}", track.title, e);
                None
            }
        };

        match fresh {
            Some(fresh) => {
                self.cache.insert(track.identifier.clone(), fresh.clone());
                player.play(&fresh).await
            }
            None => player.play(track).await,
        }
    }

    /// Spawns the one-shot timer that preloads the next track after `delay`.
    ///
    /// Does nothing when it fires after `track` stopped being current.
    pub(super) fn spawn_preload_timer(
        self: &Arc<Self>,
        player: Arc<dyn Player>,
        track: &Track,
        delay: Duration,
    ) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        let identifier = track.identifier.clone();

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            if !is_current(player.as_ref(), &identifier) {
                tracing::debug!(
                    "Skipping preload for guild {}, track {} is no longer playing",
                    player.guild_id(),
                    identifier
                );
                return;
            }

            manager.preload_next(player.as_ref()).await;
        })
    }
}
