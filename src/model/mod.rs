pub mod guild_music_settings;
