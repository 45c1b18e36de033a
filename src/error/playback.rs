//! Errors raised by the audio node, the playback engine and the now-playing display.

use serenity::all::GuildId;
use thiserror::Error;

/// Failure reported by the external audio node or one of its players.
#[derive(Error, Debug)]
pub enum NodeError {
    /// Transport-level failure talking to the node.
    #[error(transparent)]
    Request(#[from] reqwest::Error),

    /// The node answered with a non-success status code.
    #[error("Audio node rejected request with status {status}: {body}")]
    Status {
        /// HTTP status code returned by the node
        status: u16,
        /// Response body, usually a JSON error document
        body: String,
    },

    /// The node could not load the requested identifier.
    #[error("Audio node failed to load track: {0}")]
    LoadFailed(String),

    /// Player operations require a websocket session id that has not been received yet.
    #[error("Audio node session has not been established")]
    NoSession,

    /// Failure on the node's event websocket.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    Socket(#[from] Box<tokio_tungstenite::tungstenite::Error>),
}

impl From<tokio_tungstenite::tungstenite::Error> for NodeError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        NodeError::Socket(Box::new(err))
    }
}

/// Playback engine error surfaced to the command layer.
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// No player has been registered for the guild.
    #[error("No active player for guild {0}")]
    NoSession(GuildId),

    /// Audio node failure outside of the locally recovered paths.
    #[error(transparent)]
    Node(#[from] NodeError),

    /// Both the faded start and the plain retry of a crossfade failed.
    #[error("Failed to start '{track}' after crossfade fallback: {source}")]
    CrossfadeRetryFailed {
        /// Title of the track that could not be started
        track: String,
        /// Error from the plain retry
        #[source]
        source: NodeError,
    },
}

/// Failure sending or editing a now-playing message.
#[derive(Error, Debug)]
pub enum DisplayError {
    /// Discord API error from Serenity.
    ///
    /// Boxed due to large size.
    #[error(transparent)]
    Discord(#[from] Box<serenity::Error>),
}

impl From<serenity::Error> for DisplayError {
    fn from(err: serenity::Error) -> Self {
        DisplayError::Discord(Box::new(err))
    }
}
