use super::*;

/// Tests reading settings stored for a guild.
///
/// Verifies that the repository returns the stored row converted into the
/// domain model.
///
/// Expected: Ok(Some) with the stored values
#[tokio::test]
async fn returns_stored_settings() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildMusicSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    GuildMusicSettingsFactory::new(db)
        .guild_id("123456789")
        .autoplay(true)
        .default_volume(55)
        .build()
        .await?;

    let repo = GuildMusicSettingsRepository::new(db);
    let result = repo.get_by_guild_id(123456789).await?;

    assert!(result.is_some());
    let settings = result.unwrap();
    assert_eq!(settings.guild_id, 123456789);
    assert!(settings.autoplay);
    assert_eq!(settings.default_volume, 55);

    Ok(())
}

/// Tests reading settings of a guild that never stored any.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_guild() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildMusicSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    GuildMusicSettingsFactory::new(db)
        .guild_id("111111111")
        .build()
        .await?;

    let repo = GuildMusicSettingsRepository::new(db);
    let result = repo.get_by_guild_id(222222222).await?;

    assert!(result.is_none());

    Ok(())
}

/// Tests reading a row whose stored volume is out of range.
///
/// Verifies that the conversion clamps the volume into 0-100.
///
/// Expected: Ok(Some) with volume 100
#[tokio::test]
async fn clamps_out_of_range_volume() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildMusicSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    GuildMusicSettingsFactory::new(db)
        .guild_id("123456789")
        .default_volume(250)
        .build()
        .await?;

    let repo = GuildMusicSettingsRepository::new(db);
    let settings = repo.get_by_guild_id(123456789).await?.unwrap();

    assert_eq!(settings.default_volume, 100);

    Ok(())
}

/// Tests reading a row with a malformed guild ID.
///
/// Expected: Err(AppError::InternalErr)
#[tokio::test]
async fn fails_on_non_numeric_guild_id() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::GuildMusicSettings)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let stored = GuildMusicSettingsFactory::new(db)
        .guild_id("not-a-guild")
        .build()
        .await?;

    let result = crate::model::guild_music_settings::GuildMusicSettings::from_entity(stored);

    assert!(matches!(result, Err(AppError::InternalErr(_))));

    Ok(())
}
