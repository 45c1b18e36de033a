//! Encore Test Utils
//!
//! Provides shared testing utilities for the encore bot. This crate offers a builder for
//! creating test contexts with in-memory SQLite databases, factories for persisted music
//! settings, and factories for the Serenity payloads the bot reacts to.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing the database connection
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Database row factories
//! - **serenity**: Serenity model factories built from JSON
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//! use entity::prelude::GuildMusicSettings;
//!
//! #[tokio::test]
//! async fn test_settings() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_table(GuildMusicSettings)
//!         .build()
//!         .await?;
//!
//!     let db = test.db.unwrap();
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod serenity;
