//! Per-player state owned by the engine.

use std::sync::Arc;

use tokio::{task::JoinHandle, time::Instant};

use crate::playback::{
    display::{NowPlayingChannel, NowPlayingMessage},
    node::Player,
};

/// Engine state for one registered player.
pub(super) struct PlayerSession {
    pub(super) player: Arc<dyn Player>,
    pub(super) channel: Option<Arc<dyn NowPlayingChannel>>,
    pub(super) message: Option<Arc<dyn NowPlayingMessage>>,
    /// Set once editing the now-playing message failed; cleared by the next track start.
    pub(super) message_stale: bool,
    pub(super) autoplay: bool,
    /// Volume the player returns to after a crossfade.
    pub(super) normal_volume: u8,
    /// An interrupted ramp left the player below `normal_volume` and the restore
    /// has not landed yet.
    pub(super) volume_restore_pending: bool,
    /// Bumped whenever per-track state is retired; lets late tasks detect that
    /// they are stale.
    pub(super) generation: u64,
    /// `now - reported position` when the current track started.
    pub(super) track_started_at: Option<Instant>,
    pub(super) timers: TimerSet,
}

impl PlayerSession {
    pub(super) fn new(
        player: Arc<dyn Player>,
        channel: Option<Arc<dyn NowPlayingChannel>>,
        autoplay: bool,
    ) -> Self {
        let normal_volume = player.volume();

        Self {
            player,
            channel,
            message: None,
            message_stale: false,
            autoplay,
            normal_volume,
            volume_restore_pending: false,
            generation: 0,
            track_started_at: None,
            timers: TimerSet::default(),
        }
    }

    /// Retires all per-track state.
    ///
    /// A fade ramping in `keep_fade_for` survives; it belongs to the track that is
    /// starting. Returns `true` when a fade was cut short and the normal volume
    /// needs restoring.
    pub(super) fn retire(&mut self, keep_fade_for: Option<&str>) -> bool {
        let interrupted = self.timers.clear(keep_fade_for);
        self.track_started_at = None;
        self.generation += 1;

        if interrupted {
            self.volume_restore_pending = true;
        }

        interrupted
    }
}

/// A running crossfade ramp and the track it ramps in.
pub(super) struct FadeTimer {
    pub(super) target: String,
    pub(super) task: JoinHandle<()>,
}

/// The at-most-one-of-each timer slots of a player.
#[derive(Default)]
pub(super) struct TimerSet {
    pub(super) progress: Option<JoinHandle<()>>,
    pub(super) preload: Option<JoinHandle<()>>,
    pub(super) fade: Option<FadeTimer>,
}

impl TimerSet {
    /// Number of timers that are still running.
    pub(super) fn active(&self) -> usize {
        let progress = self.progress.as_ref().is_some_and(|t| !t.is_finished());
        let preload = self.preload.as_ref().is_some_and(|t| !t.is_finished());
        let fade = self.fade.as_ref().is_some_and(|f| !f.task.is_finished());

        [progress, preload, fade].into_iter().filter(|x| *x).count()
    }

    /// Aborts the fade. Returns `true` if it had not finished its last step.
    pub(super) fn abort_fade(&mut self) -> bool {
        match self.fade.take() {
            Some(fade) => {
                let running = !fade.task.is_finished();
                fade.task.abort();
                running
            }
            None => false,
        }
    }

    /// Installs a new fade, aborting any previous one.
    pub(super) fn replace_fade(&mut self, fade: FadeTimer) {
        self.abort_fade();
        self.fade = Some(fade);
    }

    /// Aborts every timer except a fade targeting `keep_fade_for`.
    ///
    /// Returns `true` if an unfinished fade was aborted.
    pub(super) fn clear(&mut self, keep_fade_for: Option<&str>) -> bool {
        if let Some(task) = self.progress.take() {
            task.abort();
        }
        if let Some(task) = self.preload.take() {
            task.abort();
        }

        let keep_fade = match (&self.fade, keep_fade_for) {
            (Some(fade), Some(identifier)) => fade.target == identifier,
            _ => false,
        };
        if keep_fade {
            return false;
        }

        self.abort_fade()
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.clear(None);
    }
}
