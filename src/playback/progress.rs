//! Elapsed-time clock and the periodic now-playing refresh.

use std::{sync::Arc, time::Duration};

use serenity::all::GuildId;
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};

use crate::playback::{
    display::NowPlayingMessage, manager::PlaybackManager, node::is_current, track::Track,
};

/// What the now-playing message shows for the current track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressView {
    Timed { elapsed_ms: u64, duration_ms: u64 },
    Live,
}

impl ProgressView {
    /// Timed view with `elapsed_ms` clamped to the duration.
    pub fn timed(elapsed_ms: u64, duration_ms: u64) -> Self {
        Self::Timed {
            elapsed_ms: elapsed_ms.min(duration_ms),
            duration_ms,
        }
    }

    /// Renders the view as a single line, e.g. `▰▰▰▱▱▱ 1:05 / 3:30`.
    pub fn render(&self, bar_width: usize) -> String {
        match *self {
            Self::Timed {
                elapsed_ms,
                duration_ms,
            } => format!(
                "{} {} / {}",
                render_bar(elapsed_ms, duration_ms, bar_width),
                format_timestamp(elapsed_ms),
                format_timestamp(duration_ms)
            ),
            Self::Live => "🔴 LIVE".to_string(),
        }
    }
}

/// Milliseconds elapsed since `started_at`, never more than `duration_ms`.
pub fn elapsed_ms(started_at: Instant, now: Instant, duration_ms: u64) -> u64 {
    let elapsed = now.saturating_duration_since(started_at).as_millis();
    u64::try_from(elapsed).unwrap_or(u64::MAX).min(duration_ms)
}

/// Start instant of a track that is `position_ms` in at `now`.
pub fn started_at(now: Instant, position_ms: u64) -> Instant {
    now.checked_sub(Duration::from_millis(position_ms))
        .unwrap_or(now)
}

/// Fixed-width bar with `floor(elapsed / duration * width)` filled segments.
pub fn render_bar(elapsed_ms: u64, duration_ms: u64, width: usize) -> String {
    let filled = if duration_ms == 0 {
        0
    } else {
        let ratio = u128::from(elapsed_ms.min(duration_ms)) * width as u128;
        (ratio / u128::from(duration_ms)) as usize
    };

    let mut bar = "▰".repeat(filled);
    bar.push_str(&"▱".repeat(width - filled));
    bar
}

/// Formats milliseconds as `m:ss`, or `h:mm:ss` from one hour on.
pub fn format_timestamp(ms: u64) -> String {
    let total_secs = ms / 1000;
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

impl PlaybackManager {
    /// Current progress of `track` if it is still the session's live track.
    ///
    /// Returns `None` once the session is gone, a newer track started or the
    /// player no longer has `track` loaded.
    pub(super) fn progress_snapshot(
        &self,
        guild_id: GuildId,
        generation: u64,
        track: &Track,
    ) -> Option<ProgressView> {
        let sessions = self.sessions.lock();
        let session = sessions.get(&guild_id)?;

        if session.generation != generation || !is_current(session.player.as_ref(), &track.identifier)
        {
            return None;
        }

        let started_at = session.track_started_at?;
        let duration_ms = track.duration_ms()?;

        Some(ProgressView::timed(
            elapsed_ms(started_at, Instant::now(), duration_ms),
            duration_ms,
        ))
    }

    /// Flags the message as no longer editable and drops it from the session.
    pub(super) fn mark_message_stale(&self, guild_id: GuildId, generation: u64) {
        let mut sessions = self.sessions.lock();
        let Some(session) = sessions.get_mut(&guild_id) else {
            return;
        };
        if session.generation != generation {
            return;
        }

        session.message_stale = true;
        session.message = None;
        // Detach rather than abort; the caller is the progress task itself.
        session.timers.progress.take();
    }

    /// Spawns the loop that edits `message` once per progress interval.
    ///
    /// The loop ends by itself when the track is no longer current or when an
    /// edit fails; it is otherwise aborted by the next cleanup.
    pub(super) fn spawn_progress_loop(
        self: &Arc<Self>,
        guild_id: GuildId,
        generation: u64,
        track: Track,
        message: Arc<dyn NowPlayingMessage>,
    ) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        let period = self.config.progress_interval;

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                let Some(progress) = manager.progress_snapshot(guild_id, generation, &track)
                else {
                    tracing::debug!(
                        "Stopping progress updates for '{}' in guild {}",
                        track.title,
                        guild_id
                    );
                    break;
                };

                if let Err(e) = message.update(&track, &progress).await {
                    tracing::debug!(
                        "Stopping progress updates for guild {}, message is stale: {}",
                        guild_id,
                        e
                    );
                    manager.mark_message_stale(guild_id, generation);
                    break;
                }
            }
        })
    }
}
