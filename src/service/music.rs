//! Music service applying persisted guild settings to the playback engine.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serenity::all::GuildId;

use crate::{
    data::guild_music_settings::GuildMusicSettingsRepository,
    error::{playback::PlaybackError, AppError},
    model::guild_music_settings::{GuildMusicSettings, UpsertGuildMusicSettingsParam},
    playback::{display::NowPlayingChannel, manager::PlaybackManager, node::Player},
};

/// Service coordinating guild music settings and player registration.
///
/// Reads and writes settings through the repository and mirrors them onto the
/// sessions held by the [`PlaybackManager`].
pub struct MusicService<'a> {
    db: &'a DatabaseConnection,
    manager: &'a Arc<PlaybackManager>,
    /// Volume used for guilds without stored settings
    default_volume: u8,
}

impl<'a> MusicService<'a> {
    /// Creates a new MusicService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    /// - `manager` - Playback engine players are registered with
    /// - `default_volume` - Volume for guilds without stored settings
    ///
    /// # Returns
    /// - `MusicService` - New service instance
    pub fn new(
        db: &'a DatabaseConnection,
        manager: &'a Arc<PlaybackManager>,
        default_volume: u8,
    ) -> Self {
        Self {
            db,
            manager,
            default_volume,
        }
    }

    /// Registers a new player with the engine using the guild's settings.
    ///
    /// The guild's default volume is applied before registration so crossfades
    /// return to it.
    ///
    /// # Arguments
    /// - `player` - The guild's freshly created player
    /// - `channel` - Channel for now-playing messages, `None` to disable them
    ///
    /// # Returns
    /// - `Ok(())` - The player is registered
    /// - `Err(AppError::PlaybackErr)` - The node rejected the volume change
    /// - `Err(AppError::DbErr)` - Failed to read the guild's settings
    pub async fn register_player(
        &self,
        player: Arc<dyn Player>,
        channel: Option<Arc<dyn NowPlayingChannel>>,
    ) -> Result<(), AppError> {
        let guild_id = player.guild_id();
        let (autoplay, volume) = self.effective_settings(guild_id).await?;

        player
            .set_volume(volume)
            .await
            .map_err(PlaybackError::from)?;

        self.manager.register_player(player, channel, autoplay);

        tracing::info!(
            "Registered player for guild {} (volume {}, autoplay {})",
            guild_id,
            volume,
            autoplay
        );

        Ok(())
    }

    /// Enables or disables autoplay for a guild.
    ///
    /// Persists the setting and applies it to the guild's active player, if any.
    ///
    /// # Returns
    /// - `Ok(GuildMusicSettings)` - The stored settings
    /// - `Err(AppError::DbErr)` - Database error during upsert
    pub async fn set_autoplay(
        &self,
        guild_id: GuildId,
        enabled: bool,
    ) -> Result<GuildMusicSettings, AppError> {
        let (_, volume) = self.effective_settings(guild_id).await?;

        let settings = GuildMusicSettingsRepository::new(self.db)
            .upsert(UpsertGuildMusicSettingsParam {
                guild_id: guild_id.get(),
                autoplay: enabled,
                default_volume: volume,
            })
            .await?;

        if self.manager.has_session(guild_id) {
            self.manager.set_autoplay(guild_id, enabled)?;
        }

        Ok(settings)
    }

    /// Stores the volume new players of a guild start at.
    ///
    /// # Returns
    /// - `Ok(GuildMusicSettings)` - The stored settings
    /// - `Err(AppError::BadRequest)` - Volume above 100
    /// - `Err(AppError::DbErr)` - Database error during upsert
    pub async fn set_default_volume(
        &self,
        guild_id: GuildId,
        volume: u8,
    ) -> Result<GuildMusicSettings, AppError> {
        if volume > 100 {
            return Err(AppError::BadRequest(format!(
                "Volume must be between 0 and 100, got {}",
                volume
            )));
        }

        let (autoplay, _) = self.effective_settings(guild_id).await?;

        GuildMusicSettingsRepository::new(self.db)
            .upsert(UpsertGuildMusicSettingsParam {
                guild_id: guild_id.get(),
                autoplay,
                default_volume: volume,
            })
            .await
    }

    /// Stored `(autoplay, default_volume)` of a guild, or the defaults.
    async fn effective_settings(&self, guild_id: GuildId) -> Result<(bool, u8), AppError> {
        let settings = GuildMusicSettingsRepository::new(self.db)
            .get_by_guild_id(guild_id.get())
            .await?;

        Ok(settings.map_or((false, self.default_volume), |s| {
            (s.autoplay, s.default_volume)
        }))
    }
}
