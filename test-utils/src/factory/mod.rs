//! Factory methods for creating test data.
//!
//! Each persisted entity has its own factory module with both a `Factory` struct for
//! customization and a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let settings = factory::create_guild_music_settings(&db).await?;
//!
//! let settings = factory::guild_music_settings::GuildMusicSettingsFactory::new(&db)
//!     .guild_id("987654321")
//!     .autoplay(true)
//!     .default_volume(55)
//!     .build()
//!     .await?;
//! ```

pub mod guild_music_settings;
pub mod helpers;

pub use guild_music_settings::create_guild_music_settings;
