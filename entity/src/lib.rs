//! SeaORM entity models for the bot's persistent settings.

pub mod prelude;

pub mod guild_music_settings;
