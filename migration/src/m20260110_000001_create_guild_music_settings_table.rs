use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(GuildMusicSettings::Table)
                    .if_not_exists()
                    .col(pk_auto(GuildMusicSettings::Id))
                    .col(string(GuildMusicSettings::GuildId))
                    .col(boolean(GuildMusicSettings::Autoplay))
                    .col(integer(GuildMusicSettings::DefaultVolume))
                    .col(timestamp(GuildMusicSettings::CreatedAt))
                    .col(timestamp(GuildMusicSettings::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_guild_music_settings_guild_id")
                    .table(GuildMusicSettings::Table)
                    .col(GuildMusicSettings::GuildId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_guild_music_settings_guild_id")
                    .table(GuildMusicSettings::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(GuildMusicSettings::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum GuildMusicSettings {
    Table,
    Id,
    GuildId,
    Autoplay,
    DefaultVolume,
    CreatedAt,
    UpdatedAt,
}
