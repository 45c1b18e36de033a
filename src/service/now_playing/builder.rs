//! Now-playing embed builder.

use serenity::all::{CreateEmbed, CreateEmbedFooter, Mention};

use crate::playback::{progress::ProgressView, track::Track};

/// Embed color of now-playing messages.
pub const NOW_PLAYING_COLOR: u32 = 0x5865F2;

/// Builds the now-playing embed for a track.
///
/// # Arguments
/// - `track` - Track being played
/// - `progress` - Progress line to show
/// - `bar_width` - Segments of the progress bar
///
/// # Returns
/// - `CreateEmbed` - Embed ready for sending or editing
pub fn build_now_playing_embed(
    track: &Track,
    progress: &ProgressView,
    bar_width: usize,
) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title(&track.title)
        .description(format!("by **{}**", track.author))
        .color(NOW_PLAYING_COLOR)
        .field("Progress", progress.render(bar_width), false)
        .field(
            "Requested by",
            Mention::from(track.requester).to_string(),
            true,
        )
        .footer(CreateEmbedFooter::new("Now playing"));

    if let Some(uri) = track.uri.as_deref().filter(|uri| !uri.is_empty()) {
        embed = embed.url(uri);
    }

    embed
}
