//! Guild music settings data repository for database operations.
//!
//! Provides the `GuildMusicSettingsRepository` for reading and writing the
//! per-guild playback settings, converting entity models into domain models at
//! the infrastructure boundary.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::{
    error::AppError,
    model::guild_music_settings::{GuildMusicSettings, UpsertGuildMusicSettingsParam},
};

/// Repository providing database operations for guild music settings.
pub struct GuildMusicSettingsRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> GuildMusicSettingsRepository<'a> {
    /// Creates a new GuildMusicSettingsRepository instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    ///
    /// # Returns
    /// - `GuildMusicSettingsRepository` - New repository instance
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets the music settings of a guild.
    ///
    /// # Arguments
    /// - `guild_id` - Discord guild ID
    ///
    /// # Returns
    /// - `Ok(Some(GuildMusicSettings))` - Settings stored for the guild
    /// - `Ok(None)` - The guild never changed its settings
    /// - `Err(AppError::DbErr)` - Database error during query
    /// - `Err(AppError::InternalErr)` - Stored guild ID is not numeric
    pub async fn get_by_guild_id(
        &self,
        guild_id: u64,
    ) -> Result<Option<GuildMusicSettings>, AppError> {
        let entity = entity::prelude::GuildMusicSettings::find()
            .filter(entity::guild_music_settings::Column::GuildId.eq(guild_id.to_string()))
            .one(self.db)
            .await?;

        entity.map(GuildMusicSettings::from_entity).transpose()
    }

    /// Creates or updates the music settings of a guild.
    ///
    /// Updates keep the original `created_at` and refresh `updated_at`.
    ///
    /// # Arguments
    /// - `param` - Guild ID and the settings to store
    ///
    /// # Returns
    /// - `Ok(GuildMusicSettings)` - The created or updated settings
    /// - `Err(AppError::DbErr)` - Database error during upsert
    pub async fn upsert(
        &self,
        param: UpsertGuildMusicSettingsParam,
    ) -> Result<GuildMusicSettings, AppError> {
        let existing = self.get_by_guild_id(param.guild_id).await?;

        let now = Utc::now();

        let entity = if let Some(existing) = existing {
            entity::guild_music_settings::ActiveModel {
                id: ActiveValue::Set(existing.id),
                guild_id: ActiveValue::Set(existing.guild_id.to_string()),
                autoplay: ActiveValue::Set(param.autoplay),
                default_volume: ActiveValue::Set(i32::from(param.default_volume)),
                created_at: ActiveValue::Set(existing.created_at),
                updated_at: ActiveValue::Set(now),
            }
            .update(self.db)
            .await?
        } else {
            entity::guild_music_settings::ActiveModel {
                id: ActiveValue::NotSet,
                guild_id: ActiveValue::Set(param.guild_id.to_string()),
                autoplay: ActiveValue::Set(param.autoplay),
                default_volume: ActiveValue::Set(i32::from(param.default_volume)),
                created_at: ActiveValue::Set(now),
                updated_at: ActiveValue::Set(now),
            }
            .insert(self.db)
            .await?
        };

        GuildMusicSettings::from_entity(entity)
    }
}
