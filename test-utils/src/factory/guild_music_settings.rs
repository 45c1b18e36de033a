//! Guild music settings factory for creating test settings rows.

use crate::factory::helpers::next_id;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue, DatabaseConnection, DbErr};

/// Factory for creating test guild music settings with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::factory::guild_music_settings::GuildMusicSettingsFactory;
///
/// let settings = GuildMusicSettingsFactory::new(&db)
///     .guild_id("987654321")
///     .autoplay(true)
///     .build()
///     .await?;
/// ```
pub struct GuildMusicSettingsFactory<'a> {
    db: &'a DatabaseConnection,
    guild_id: String,
    autoplay: bool,
    default_volume: i32,
}

impl<'a> GuildMusicSettingsFactory<'a> {
    /// Creates a new factory with default values.
    ///
    /// Defaults:
    /// - guild_id: auto-incremented numeric string
    /// - autoplay: `false`
    /// - default_volume: `80`
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self {
            db,
            guild_id: next_id().to_string(),
            autoplay: false,
            default_volume: 80,
        }
    }

    /// Sets the guild ID.
    pub fn guild_id(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    /// Sets whether autoplay continuation is enabled.
    pub fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    /// Sets the volume applied when a player is registered.
    pub fn default_volume(mut self, default_volume: i32) -> Self {
        self.default_volume = default_volume;
        self
    }

    /// Builds and inserts the settings row into the database.
    ///
    /// # Returns
    /// - `Ok(entity::guild_music_settings::Model)` - Created settings row
    /// - `Err(DbErr)` - Database error during insert
    pub async fn build(self) -> Result<entity::guild_music_settings::Model, DbErr> {
        let now = Utc::now();

        entity::guild_music_settings::ActiveModel {
            id: ActiveValue::NotSet,
            guild_id: ActiveValue::Set(self.guild_id),
            autoplay: ActiveValue::Set(self.autoplay),
            default_volume: ActiveValue::Set(self.default_volume),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await
    }
}

/// Creates guild music settings with default values.
///
/// Shorthand for `GuildMusicSettingsFactory::new(db).build().await`.
pub async fn create_guild_music_settings(
    db: &DatabaseConnection,
) -> Result<entity::guild_music_settings::Model, DbErr> {
    GuildMusicSettingsFactory::new(db).build().await
}
