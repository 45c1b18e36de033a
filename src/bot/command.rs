//! Slash commands for playback and the persisted music settings.

use serenity::all::{
    CommandOptionType, CreateCommand, CreateCommandOption, ResolvedOption, ResolvedValue,
};

pub const AUTOPLAY_COMMAND: &str = "autoplay";
pub const VOLUME_COMMAND: &str = "volume";
pub const PLAY_COMMAND: &str = "play";
pub const LEAVE_COMMAND: &str = "leave";

/// Global commands registered on ready.
pub fn commands() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new(AUTOPLAY_COMMAND)
            .description("Continue with related tracks when the queue ends")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Boolean,
                    "enabled",
                    "Turn autoplay on or off",
                )
                .required(true),
            ),
        CreateCommand::new(VOLUME_COMMAND)
            .description("Set the volume new players start at")
            .add_option(
                CreateCommandOption::new(CommandOptionType::Integer, "level", "Volume from 0 to 100")
                    .min_int_value(0)
                    .max_int_value(100)
                    .required(true),
            ),
        CreateCommand::new(PLAY_COMMAND)
            .description("Queue a track in your voice channel")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "query",
                    "Search terms or a link",
                )
                .required(true),
            ),
        CreateCommand::new(LEAVE_COMMAND).description("Stop playback and leave voice"),
    ]
}

/// Value of the boolean option `name`.
pub fn bool_option(options: &[ResolvedOption], name: &str) -> Option<bool> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::Boolean(value) if option.name == name => Some(value),
        _ => None,
    })
}

/// Value of the string option `name`.
pub fn string_option<'a>(options: &[ResolvedOption<'a>], name: &str) -> Option<&'a str> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::String(value) if option.name == name => Some(value),
        _ => None,
    })
}

/// Value of the integer option `name`, if it fits a volume.
pub fn volume_option(options: &[ResolvedOption], name: &str) -> Option<u8> {
    options.iter().find_map(|option| match option.value {
        ResolvedValue::Integer(value) if option.name == name => u8::try_from(value).ok(),
        _ => None,
    })
}
