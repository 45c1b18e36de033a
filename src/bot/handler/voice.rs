//! Voice state handler.
//!
//! Retires the guild's player when the bot itself leaves voice, whether it was
//! kicked, moved out or the channel was deleted.

use serenity::all::{Context, GuildId, UserId, VoiceState};

use crate::{
    bot::handler::Handler,
    playback::{lifecycle::PlayerEvent, node::Player},
};

/// Handles a voice state update.
///
/// # Arguments
/// - `handler` - Event handler holding the node players and playback engine
/// - `ctx` - Discord context for resolving the bot's own user ID
/// - `_old` - Previous voice state if cached
/// - `new` - New voice state
pub async fn handle_voice_state_update(
    handler: &Handler,
    ctx: Context,
    _old: Option<VoiceState>,
    new: VoiceState,
) {
    let bot_id = ctx.cache.current_user().id;

    let Some(guild_id) = bot_left_voice(bot_id, &new) else {
        return;
    };

    if let Some(player) = handler.players.remove(guild_id) {
        if let Err(e) = player.destroy().await {
            tracing::debug!("Failed to destroy player in guild {}: {}", guild_id, e);
        }
    }

    if !handler.manager.has_session(guild_id) {
        return;
    }

    tracing::info!("Bot left voice in guild {}, retiring player session", guild_id);
    handler
        .manager
        .handle_event(guild_id, PlayerEvent::PlayerDisconnect)
        .await;
}

/// Guild the bot just left voice in, if `state` describes that.
pub fn bot_left_voice(bot_id: UserId, state: &VoiceState) -> Option<GuildId> {
    if state.user_id != bot_id || state.channel_id.is_some() {
        return None;
    }

    state.guild_id
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::serenity::create_test_voice_state;

    #[test]
    fn detects_bot_leaving_voice() {
        let state = create_test_voice_state(1, 10, None);

        assert_eq!(
            bot_left_voice(UserId::new(10), &state),
            Some(GuildId::new(1))
        );
    }

    #[test]
    fn ignores_bot_joining_or_moving() {
        let state = create_test_voice_state(1, 10, Some(500));

        assert_eq!(bot_left_voice(UserId::new(10), &state), None);
    }

    #[test]
    fn ignores_other_users() {
        let state = create_test_voice_state(1, 11, None);

        assert_eq!(bot_left_voice(UserId::new(10), &state), None);
    }
}
