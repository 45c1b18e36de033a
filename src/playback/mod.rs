//! Playback continuity engine.
//!
//! Keeps a guild's music flowing across track boundaries: resolves the next
//! queued track ahead of time, crossfades autoplay transitions, keeps the
//! now-playing message's progress bar current and retires all per-track timers
//! whenever the player's state changes.

pub mod autoplay;
pub mod cache;
pub mod config;
pub mod crossfade;
pub mod display;
pub mod lavalink;
pub mod lifecycle;
pub mod manager;
pub mod node;
pub mod preload;
pub mod progress;
pub mod track;

mod session;

#[cfg(test)]
pub(crate) mod test;

pub use config::PlaybackConfig;
pub use lifecycle::PlayerEvent;
pub use manager::PlaybackManager;
pub use track::Track;
