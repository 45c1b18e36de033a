//! Seams to the external audio node.
//!
//! The engine never constructs or destroys players; it reads their state and
//! drives them through these traits. `lavalink` provides the production
//! implementation, tests use recording mocks.

use serenity::{
    all::{GuildId, UserId},
    async_trait,
};

use crate::{error::playback::NodeError, playback::track::Track};

/// Search/resolve interface of an audio node.
#[async_trait]
pub trait AudioNode: Send + Sync {
    /// Resolves a URL or free-text query into playable tracks.
    ///
    /// An empty result is not an error.
    async fn search(&self, query: &str, requester: UserId) -> Result<Vec<Track>, NodeError>;
}

/// One voice session's playback controller.
///
/// State accessors are synchronous snapshots of the controller's mirror.
#[async_trait]
pub trait Player: Send + Sync {
    fn guild_id(&self) -> GuildId;

    /// Track currently loaded in the player, paused or not.
    fn current_track(&self) -> Option<Track>;

    /// Head of the upcoming queue without dequeuing it.
    fn peek_queue(&self) -> Option<Track>;

    /// Last position reported by the node, in milliseconds.
    fn position_ms(&self) -> u64;

    fn is_paused(&self) -> bool;

    /// Current volume, 0–100.
    fn volume(&self) -> u8;

    async fn play(&self, track: &Track) -> Result<(), NodeError>;

    async fn pause(&self, paused: bool) -> Result<(), NodeError>;

    async fn set_volume(&self, volume: u8) -> Result<(), NodeError>;

    async fn stop(&self) -> Result<(), NodeError>;

    async fn destroy(&self) -> Result<(), NodeError>;
}

/// Returns `true` if `player` still has the track identified by `identifier` loaded.
pub fn is_current(player: &dyn Player, identifier: &str) -> bool {
    player
        .current_track()
        .is_some_and(|track| track.identifier == identifier)
}
