use super::*;

/// Tests storing settings for a guild without a row.
///
/// Verifies that the repository inserts a new row with the provided values.
///
/// Expected: Ok with one row created
#[tokio::test]
async fn creates_new_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildMusicSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildMusicSettingsRepository::new(db);
    let settings = repo
        .upsert(UpsertGuildMusicSettingsParam {
            guild_id: 123456789,
            autoplay: true,
            default_volume: 65,
        })
        .await?;

    assert_eq!(settings.guild_id, 123456789);
    assert!(settings.autoplay);
    assert_eq!(settings.default_volume, 65);
    assert_eq!(settings.created_at, settings.updated_at);

    let count = entity::prelude::GuildMusicSettings::find().count(db).await?;
    assert_eq!(count, 1);

    Ok(())
}

/// Tests storing settings for a guild that already has a row.
///
/// Verifies that the existing row is updated in place and keeps its creation
/// timestamp.
///
/// Expected: Ok with the same row updated
#[tokio::test]
async fn updates_existing_record() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildMusicSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let existing = GuildMusicSettingsFactory::new(db)
        .guild_id("123456789")
        .autoplay(false)
        .default_volume(80)
        .build()
        .await?;

    let repo = GuildMusicSettingsRepository::new(db);
    let settings = repo
        .upsert(UpsertGuildMusicSettingsParam {
            guild_id: 123456789,
            autoplay: true,
            default_volume: 40,
        })
        .await?;

    assert_eq!(settings.id, existing.id);
    assert!(settings.autoplay);
    assert_eq!(settings.default_volume, 40);
    assert_eq!(settings.created_at, existing.created_at);
    assert!(settings.updated_at >= existing.updated_at);

    let count = entity::prelude::GuildMusicSettings::find().count(db).await?;
    assert_eq!(count, 1);

    Ok(())
}

/// Tests that settings of different guilds are kept apart.
///
/// Expected: Ok with one row per guild
#[tokio::test]
async fn keeps_guilds_separate() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildMusicSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = GuildMusicSettingsRepository::new(db);
    repo.upsert(UpsertGuildMusicSettingsParam {
        guild_id: 111111111,
        autoplay: true,
        default_volume: 30,
    })
    .await?;
    repo.upsert(UpsertGuildMusicSettingsParam {
        guild_id: 222222222,
        autoplay: false,
        default_volume: 90,
    })
    .await?;

    let first = repo.get_by_guild_id(111111111).await?.unwrap();
    let second = repo.get_by_guild_id(222222222).await?.unwrap();

    assert!(first.autoplay);
    assert_eq!(first.default_volume, 30);
    assert!(!second.autoplay);
    assert_eq!(second.default_volume, 90);

    let count = entity::prelude::GuildMusicSettings::find().count(db).await?;
    assert_eq!(count, 2);

    Ok(())
}
