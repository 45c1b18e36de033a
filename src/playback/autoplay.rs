use std::sync::Arc;

use serenity::all::GuildId;

use crate::playback::{manager::PlaybackManager, track::Track};

/// First candidate that is not the track that just ended.
pub fn pick_related(candidates: Vec<Track>, ended: &Track) -> Option<Track> {
    candidates
        .into_iter()
        .find(|candidate| !candidate.is_same(ended))
}

impl PlaybackManager {
    /// Continues an ended queue with a related track, crossfading into it.
    ///
    /// No-op unless autoplay is enabled for the guild.
    pub(super) async fn continue_with_related(self: &Arc<Self>, guild_id: GuildId, ended: &Track) {
        if self.autoplay_enabled(guild_id) != Some(true) {
            return;
        }

        let query = format!("{} {}", ended.author, ended.title);
        let candidates = match self.node.search(&query, ended.requester).await {
            Ok(tracks) => tracks,
            Err(e) => {
                tracing::warn!("Autoplay search for '{}' failed: {}", query, e);
                return;
            }
        };

        let Some(next) = pick_related(candidates, ended) else {
            tracing::info!(
                "No related track found after '{}' in guild {}",
                ended.title,
                guild_id
            );
            return;
        };

        tracing::info!("Autoplay continuing with '{}' in guild {}", next.title, guild_id);

        if let Err(e) = self.crossfade(guild_id, next).await {
            tracing::error!("Autoplay failed in guild {}: {}", guild_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::test::mock::track;

    #[test]
    fn skips_the_ended_track() {
        let ended = track("a", 1_000);
        let picked = pick_related(vec![track("a", 1_000), track("b", 2_000)], &ended);

        assert_eq!(picked.map(|t| t.identifier), Some("b".to_string()));
    }

    #[test]
    fn nothing_to_pick_when_only_the_ended_track_matches() {
        let ended = track("a", 1_000);

        assert!(pick_related(vec![track("a", 1_000)], &ended).is_none());
        assert!(pick_related(Vec::new(), &ended).is_none());
    }
}
