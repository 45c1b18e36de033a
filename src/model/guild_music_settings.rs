//! Domain & parameter models for per-guild music settings
//!
//! Defines the guild music settings domain model, its upsert parameters and the
//! conversion from the entity model

use chrono::{DateTime, Utc};

use crate::{error::AppError, util::parse::parse_u64_from_string};

/// The guild music settings domain model
///
/// Settings applied when a guild's player is registered with the playback engine
#[derive(Debug, Clone)]
pub struct GuildMusicSettings {
    pub id: i32,
    pub guild_id: u64,
    /// Continue with a related track when the queue runs dry
    pub autoplay: bool,
    /// Volume a new player starts at, 0-100
    pub default_volume: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GuildMusicSettings {
    /// Converts an entity model to the guild music settings domain model
    ///
    /// Stored volumes outside 0-100 are clamped.
    ///
    /// # Arguments
    /// - `entity` - The entity model from the database
    ///
    /// # Returns
    /// - `Ok(GuildMusicSettings)` - The converted domain model
    /// - `Err(AppError::InternalErr(ParseStringId))` - Failed to parse guild ID to u64
    pub fn from_entity(entity: entity::guild_music_settings::Model) -> Result<Self, AppError> {
        let guild_id = parse_u64_from_string(entity.guild_id)?;

        Ok(Self {
            id: entity.id,
            guild_id,
            autoplay: entity.autoplay,
            default_volume: entity.default_volume.clamp(0, 100) as u8,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

/// Parameters for creating or replacing a guild's music settings
#[derive(Debug, Clone)]
pub struct UpsertGuildMusicSettingsParam {
    pub guild_id: u64,
    pub autoplay: bool,
    pub default_volume: u8,
}
