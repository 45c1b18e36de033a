pub use super::guild_music_settings::Entity as GuildMusicSettings;
