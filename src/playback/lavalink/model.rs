//! Wire types of the Lavalink v4 REST and websocket APIs.

use serde::{Deserialize, Serialize};
use serenity::all::UserId;

use crate::playback::track::Track;

/// Response of `GET /v4/loadtracks`.
#[derive(Debug, Deserialize)]
#[serde(tag = "loadType", content = "data", rename_all = "lowercase")]
pub enum LoadResult {
    Track(TrackData),
    Playlist(PlaylistData),
    Search(Vec<TrackData>),
    Empty(EmptyData),
    Error(LoadException),
}

impl LoadResult {
    /// Flattens the result into its tracks; `Error` becomes the exception message and severity.
    pub fn into_tracks(self) -> Result<Vec<TrackData>, String> {
        match self {
            Self::Track(track) => Ok(vec![track]),
            Self::Playlist(playlist) => Ok(playlist.tracks),
            Self::Search(tracks) => Ok(tracks),
            Self::Empty(_) => Ok(Vec::new()),
            Self::Error(exception) => {
                Err(exception.to_string())
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EmptyData {}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackData {
    pub encoded: String,
    pub info: TrackInfo,
}

impl TrackData {
    pub fn into_track(self, requester: UserId) -> Track {
        Track {
            identifier: self.info.identifier,
            encoded: self.encoded,
            title: self.info.title,
            author: self.info.author,
            uri: self.info.uri,
            length_ms: self.info.length,
            is_stream: self.info.is_stream,
            requester,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
    pub identifier: String,
    pub author: String,
    /// Milliseconds; meaningless for streams.
    pub length: u64,
    pub is_stream: bool,
    pub title: String,
    #[serde(default)]
    pub uri: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistData {
    pub tracks: Vec<TrackData>,
}

#[derive(Debug, Deserialize)]
pub struct LoadException {
    #[serde(default)]
    pub message: Option<String>,
    pub severity: String,
}

impl std::fmt::Display for LoadException {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({})",
            self.message.as_deref().unwrap_or("unknown error"),
            self.severity
        )
    }
}

/// Message received on `/v4/websocket`.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum IncomingOp {
    #[serde(rename_all = "camelCase")]
    Ready { resumed: bool, session_id: String },
    #[serde(rename_all = "camelCase")]
    PlayerUpdate {
        guild_id: String,
        state: PlayerUpdateState,
    },
    Event(NodeEvent),
    /// `stats` and ops added by later node versions.
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct PlayerUpdateState {
    /// Milliseconds into the current track.
    #[serde(default)]
    pub position: u64,
}

/// Payload of an `event` op.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum NodeEvent {
    #[serde(rename = "TrackStartEvent", rename_all = "camelCase")]
    TrackStart { guild_id: String, track: TrackData },
    #[serde(rename = "TrackEndEvent", rename_all = "camelCase")]
    TrackEnd {
        guild_id: String,
        track: TrackData,
        reason: TrackEndReason,
    },
    #[serde(rename = "TrackExceptionEvent", rename_all = "camelCase")]
    TrackException {
        guild_id: String,
        track: TrackData,
        exception: LoadException,
    },
    #[serde(rename = "TrackStuckEvent", rename_all = "camelCase")]
    TrackStuck {
        guild_id: String,
        track: TrackData,
        threshold_ms: u64,
    },
    #[serde(rename = "WebSocketClosedEvent", rename_all = "camelCase")]
    WebSocketClosed {
        guild_id: String,
        code: u16,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackEndReason {
    Finished,
    LoadFailed,
    Stopped,
    Replaced,
    Cleanup,
}

impl TrackEndReason {
    /// Whether the next queued track should be started.
    pub fn may_start_next(self) -> bool {
        matches!(self, Self::Finished | Self::LoadFailed)
    }
}

/// Body of `PATCH /v4/sessions/{session}/players/{guild}`.
///
/// Unset fields are left unchanged by the node.
#[derive(Debug, Default, Serialize)]
pub struct UpdatePlayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<UpdatePlayerTrack>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceUpdate>,
}

/// Discord voice server credentials the node connects with.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceUpdate {
    pub token: String,
    pub endpoint: String,
    pub session_id: String,
}

/// Track to load; `encoded: None` is sent as `null` and stops playback.
#[derive(Debug, Serialize)]
pub struct UpdatePlayerTrack {
    pub encoded: Option<String>,
}
