use std::time::Duration;

/// Volume the crossfade drops to before ramping the incoming track up.
pub const FADE_FLOOR_VOLUME: u8 = 10;

/// Cadence of the progress render loop.
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(1000);

/// Number of segments in the rendered progress bar.
pub const PROGRESS_BAR_WIDTH: usize = 15;

/// Maximum number of resolved tracks kept by the preload cache.
pub const PRELOAD_CACHE_CAPACITY: usize = 20;

/// Tunables for the playback engine.
///
/// Built by the host from its own configuration; the engine never reads the
/// environment itself.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Total length of the crossfade volume ramp.
    pub crossfade_duration: Duration,
    /// Number of equal volume steps in the ramp.
    pub crossfade_steps: u32,
    /// Volume the incoming track starts at.
    pub fade_floor_volume: u8,
    /// Pause before the non-faded retry after a failed crossfade start.
    pub transition_pause: Duration,
    /// Fraction of a track's duration after which the next queued track is preloaded.
    pub preload_fraction: f64,
    /// Capacity of the shared preload cache.
    pub preload_capacity: usize,
    /// Cadence of the progress render loop.
    pub progress_interval: Duration,
    /// Segments in the rendered progress bar.
    pub progress_bar_width: usize,
}

impl PlaybackConfig {
    /// Interval between two crossfade volume steps.
    pub fn fade_step_interval(&self) -> Duration {
        self.crossfade_duration / self.crossfade_steps.max(1)
    }

    /// Delay after track start at which the preload timeout fires.
    ///
    /// Measured from the position the player reported when the track started, so a
    /// resumed track preloads at the same point of the track as a fresh one.
    pub fn preload_delay(&self, duration_ms: u64, position_ms: u64) -> Duration {
        let trigger_ms = (duration_ms as f64 * self.preload_fraction) as u64;
        Duration::from_millis(trigger_ms.saturating_sub(position_ms))
    }
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            crossfade_duration: Duration::from_millis(3000),
            crossfade_steps: 10,
            fade_floor_volume: FADE_FLOOR_VOLUME,
            transition_pause: Duration::from_millis(300),
            preload_fraction: 0.85,
            preload_capacity: PRELOAD_CACHE_CAPACITY,
            progress_interval: PROGRESS_INTERVAL,
            progress_bar_width: PROGRESS_BAR_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fade_steps_are_300ms_apart() {
        let config = PlaybackConfig::default();
        assert_eq!(config.fade_step_interval(), Duration::from_millis(300));
    }

    #[test]
    fn zero_steps_do_not_divide_by_zero() {
        let config = PlaybackConfig {
            crossfade_steps: 0,
            ..PlaybackConfig::default()
        };
        assert_eq!(config.fade_step_interval(), Duration::from_millis(3000));
    }

    #[test]
    fn preload_delay_accounts_for_start_position() {
        let config = PlaybackConfig::default();
        assert_eq!(config.preload_delay(10_000, 0), Duration::from_millis(8_500));
        assert_eq!(config.preload_delay(10_000, 2_000), Duration::from_millis(6_500));
        assert_eq!(config.preload_delay(10_000, 9_000), Duration::ZERO);
    }
}
