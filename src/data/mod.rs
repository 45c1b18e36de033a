pub mod guild_music_settings;

#[cfg(test)]
mod test;
