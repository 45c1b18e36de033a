//! Test factory for creating Serenity VoiceState objects.

use serenity::all::VoiceState;

/// Creates a test Serenity VoiceState for a user in a guild.
///
/// # Arguments
/// - `guild_id` - Discord guild ID (snowflake)
/// - `user_id` - Discord user ID whose voice state changed
/// - `channel_id` - Voice channel the user is in, `None` when they left voice
///
/// # Returns
/// - `VoiceState` - A valid Serenity VoiceState struct for testing
///
/// # Panics
/// - If the JSON cannot be deserialized into a VoiceState (indicates invalid test data)
///
/// # Examples
///
/// ```rust,ignore
/// use test_utils::serenity::create_test_voice_state;
///
/// let joined = create_test_voice_state(1, 2, Some(3));
/// let left = create_test_voice_state(1, 2, None);
/// ```
pub fn create_test_voice_state(guild_id: u64, user_id: u64, channel_id: Option<u64>) -> VoiceState {
    serde_json::from_value(serde_json::json!({
        "guild_id": guild_id.to_string(),
        "channel_id": channel_id.map(|id| id.to_string()),
        "user_id": user_id.to_string(),
        "session_id": "test-session",
        "deaf": false,
        "mute": false,
        "self_deaf": false,
        "self_mute": false,
        "self_stream": false,
        "self_video": false,
        "suppress": false,
        "request_to_speak_timestamp": null
    }))
    .expect("Failed to create test VoiceState from JSON")
}
