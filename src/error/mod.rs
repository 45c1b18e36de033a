//! Error types for the bot.
//!
//! `AppError` is the top-level error returned from startup and the service layer. It
//! wraps the domain-specific errors below it. Playback faults that the engine swallows
//! never reach this type; only the ones that must reach a caller do.

pub mod config;
pub mod internal;
pub mod playback;

use thiserror::Error;

use crate::error::{config::ConfigError, internal::InternalError, playback::PlaybackError};

/// Top-level application error type.
///
/// Aggregates all possible error types that can occur in the application. Most variants
/// use `#[from]` for automatic error conversion.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error during startup or environment variable loading.
    #[error(transparent)]
    ConfigErr(#[from] ConfigError),

    /// Database operation error from SeaORM.
    #[error(transparent)]
    DbErr(#[from] sea_orm::DbErr),

    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    DiscordErr(#[from] Box<serenity::Error>),

    /// Failed to join or leave a voice channel.
    #[error(transparent)]
    VoiceErr(#[from] songbird::error::JoinError),

    /// Playback engine error that could not be recovered locally.
    #[error(transparent)]
    PlaybackErr(#[from] PlaybackError),

    /// Unexpected internal state, usually malformed stored data.
    #[error(transparent)]
    InternalErr(#[from] InternalError),

    /// Invalid input from a caller.
    ///
    /// # Fields
    /// - Message describing what was invalid about the request
    #[error("{0}")]
    BadRequest(String),
}

/// Manual conversion from serenity::Error to AppError.
///
/// Boxes the error to reduce the size of the AppError enum, as serenity::Error
/// is very large and would make all AppError variants larger if not boxed.
impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::DiscordErr(Box::new(err))
    }
}
