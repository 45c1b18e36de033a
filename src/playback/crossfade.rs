//! Volume-ramped transition into a new track.

use std::sync::Arc;

use serenity::all::GuildId;
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant},
};

use crate::{
    error::playback::{NodeError, PlaybackError},
    playback::{manager::PlaybackManager, node::Player, session::FadeTimer, track::Track},
};

/// Volume at `step` of a ramp from `floor` to `target` over `steps` steps.
///
/// Step `steps` is exactly `target`; intermediate steps are truncated.
pub fn fade_volume(floor: u8, target: u8, step: u32, steps: u32) -> u8 {
    let steps = i64::from(steps.max(1));
    let step = i64::from(step).min(steps);
    let floor = i64::from(floor);
    let target = i64::from(target);

    (floor + (target - floor) * step / steps).clamp(0, 100) as u8
}

impl PlaybackManager {
    /// Starts `next` at the floor volume and ramps it up to the normal volume.
    ///
    /// If the faded start fails, the volume is restored, the transition pause is
    /// awaited and `next` is played once without fading.
    ///
    /// # Arguments
    /// - `guild_id` - Guild of a registered player
    /// - `next` - Track to transition into
    ///
    /// # Returns
    /// - `Ok(())` - Playback of `next` started, faded or not
    /// - `Err(PlaybackError::NoSession)` - No player is registered for the guild
    /// - `Err(PlaybackError::CrossfadeRetryFailed)` - The non-faded retry failed too
    pub async fn crossfade(
        self: &Arc<Self>,
        guild_id: GuildId,
        next: Track,
    ) -> Result<(), PlaybackError> {
        let (player, normal_volume) = {
            let mut sessions = self.sessions.lock();
            let session = sessions
                .get_mut(&guild_id)
                .ok_or(PlaybackError::NoSession(guild_id))?;

            // An unfinished ramp, or one whose restore has not landed, leaves the
            // player below its normal volume.
            let interrupted = session.timers.abort_fade();
            if !interrupted && !session.volume_restore_pending {
                session.normal_volume = session.player.volume();
            }

            (Arc::clone(&session.player), session.normal_volume)
        };

        tracing::debug!(
            "Crossfading into '{}' in guild {} ({} -> {})",
            next.title,
            guild_id,
            self.config.fade_floor_volume,
            normal_volume
        );

        let Err(e) = self
            .start_faded(guild_id, &player, &next, normal_volume)
            .await
        else {
            return Ok(());
        };

        tracing::warn!(
            "Crossfade into '{}' failed, retrying without fade: {}",
            next.title,
            e
        );

        if let Some(session) = self.sessions.lock().get_mut(&guild_id) {
            session.timers.abort_fade();
        }
        if let Err(e) = player.set_volume(normal_volume).await {
            tracing::warn!("Failed to restore volume in guild {}: {}", guild_id, e);
        }

        tokio::time::sleep(self.config.transition_pause).await;

        player
            .play(&next)
            .await
            .map_err(|source| PlaybackError::CrossfadeRetryFailed {
                track: next.title.clone(),
                source,
            })
    }

    async fn start_faded(
        self: &Arc<Self>,
        guild_id: GuildId,
        player: &Arc<dyn Player>,
        next: &Track,
        normal_volume: u8,
    ) -> Result<(), NodeError> {
        let floor = self.config.fade_floor_volume;

        player.set_volume(floor).await?;
        self.play_resolved(player.as_ref(), next).await?;

        let task = self.spawn_fade(Arc::clone(player), floor, normal_volume);

        let mut sessions = self.sessions.lock();
        match sessions.get_mut(&guild_id) {
            Some(session) => session.timers.replace_fade(FadeTimer {
                target: next.identifier.clone(),
                task,
            }),
            None => task.abort(),
        }

        Ok(())
    }

    /// Spawns the ramp task: one volume step per step interval, ending on `target`.
    fn spawn_fade(&self, player: Arc<dyn Player>, floor: u8, target: u8) -> JoinHandle<()> {
        let steps = self.config.crossfade_steps.max(1);
        let period = self.config.fade_step_interval();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);

            for step in 1..=steps {
                ticker.tick().await;

                let volume = fade_volume(floor, target, step, steps);
                if let Err(e) = player.set_volume(volume).await {
                    tracing::warn!(
                        "Crossfade step {}/{} failed in guild {}: {}",
                        step,
                        steps,
                        player.guild_id(),
                        e
                    );
                }
            }
        })
    }
}
