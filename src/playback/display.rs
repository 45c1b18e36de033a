//! Seams to the now-playing display.
//!
//! The progress tracker only knows how to compute a [`ProgressView`]; turning it
//! into a chat message is the host's business.

use std::sync::Arc;

use serenity::async_trait;

use crate::{
    error::playback::DisplayError,
    playback::{progress::ProgressView, track::Track},
};

/// Where now-playing messages for a player are announced.
#[async_trait]
pub trait NowPlayingChannel: Send + Sync {
    /// Sends a fresh now-playing message and returns a handle for editing it.
    async fn announce(
        &self,
        track: &Track,
        progress: &ProgressView,
    ) -> Result<Arc<dyn NowPlayingMessage>, DisplayError>;
}

/// A previously announced now-playing message.
#[async_trait]
pub trait NowPlayingMessage: Send + Sync {
    /// Edits the message in place with a new progress view.
    async fn update(&self, track: &Track, progress: &ProgressView) -> Result<(), DisplayError>;
}
