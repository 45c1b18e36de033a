use crate::{
    data::guild_music_settings::GuildMusicSettingsRepository, error::AppError,
    model::guild_music_settings::UpsertGuildMusicSettingsParam,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory::guild_music_settings::GuildMusicSettingsFactory};

mod get_by_guild_id;
mod upsert;
