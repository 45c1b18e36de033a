//! Discord implementation of the now-playing display.
//!
//! Announces each track with an embed in the guild's music channel and edits that
//! embed as the progress tracker ticks.
//!
//! The module is organized by concern:
//! - `builder` - Embed building

pub mod builder;

use std::sync::Arc;

use serenity::{
    all::{ChannelId, CreateMessage, EditMessage, MessageId},
    async_trait,
    http::Http,
};

use crate::{
    error::playback::DisplayError,
    playback::{
        display::{NowPlayingChannel, NowPlayingMessage},
        progress::ProgressView,
        track::Track,
    },
    service::now_playing::builder::build_now_playing_embed,
};

/// Discord text channel receiving now-playing messages.
pub struct DiscordNowPlayingChannel {
    http: Arc<Http>,
    channel_id: ChannelId,
    bar_width: usize,
}

impl DiscordNowPlayingChannel {
    /// Creates a new DiscordNowPlayingChannel instance.
    ///
    /// # Arguments
    /// - `http` - Arc-wrapped Discord HTTP client
    /// - `channel_id` - Text channel to post in
    /// - `bar_width` - Segments of the rendered progress bar
    pub fn new(http: Arc<Http>, channel_id: ChannelId, bar_width: usize) -> Self {
        Self {
            http,
            channel_id,
            bar_width,
        }
    }
}

#[async_trait]
impl NowPlayingChannel for DiscordNowPlayingChannel {
    async fn announce(
        &self,
        track: &Track,
        progress: &ProgressView,
    ) -> Result<Arc<dyn NowPlayingMessage>, DisplayError> {
        let embed = build_now_playing_embed(track, progress, self.bar_width);

        let message = self
            .channel_id
            .send_message(&self.http, CreateMessage::new().embed(embed))
            .await?;

        tracing::debug!(
            "Posted now playing message {} in channel {}",
            message.id,
            self.channel_id
        );

        Ok(Arc::new(DiscordNowPlayingMessage {
            http: Arc::clone(&self.http),
            channel_id: self.channel_id,
            message_id: message.id,
            bar_width: self.bar_width,
        }))
    }
}

/// A posted now-playing embed.
pub struct DiscordNowPlayingMessage {
    http: Arc<Http>,
    channel_id: ChannelId,
    message_id: MessageId,
    bar_width: usize,
}

#[async_trait]
impl NowPlayingMessage for DiscordNowPlayingMessage {
    async fn update(&self, track: &Track, progress: &ProgressView) -> Result<(), DisplayError> {
        let embed = build_now_playing_embed(track, progress, self.bar_width);
        let edit = EditMessage::new().embed(embed);

        if let Err(e) = self
            .http
            .edit_message(self.channel_id, self.message_id, &edit, vec![])
            .await
        {
            tracing::warn!(
                "Failed to update now playing message {} in channel {}: {}",
                self.message_id,
                self.channel_id,
                e
            );
            return Err(e.into());
        }

        Ok(())
    }
}
