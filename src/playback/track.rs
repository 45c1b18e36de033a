use serenity::all::UserId;

/// A playable track as returned by an audio node search.
///
/// Immutable once resolved. `encoded` is the node's opaque playable handle; it can
/// expire upstream, which is why a cached handle may need to be resolved again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    /// Globally unique identifier assigned by the source provider.
    pub identifier: String,
    /// Opaque handle the node needs to start playback.
    pub encoded: String,
    pub title: String,
    pub author: String,
    pub uri: Option<String>,
    /// Length in milliseconds, `0` when unknown.
    pub length_ms: u64,
    pub is_stream: bool,
    /// User who queued the track.
    pub requester: UserId,
}

impl Track {
    /// Finite duration of the track, `None` for live streams and unknown lengths.
    pub fn duration_ms(&self) -> Option<u64> {
        (!self.is_stream && self.length_ms > 0).then_some(self.length_ms)
    }

    /// Query used to resolve this track again: its URI, or its title when it has none.
    pub fn resolve_query(&self) -> &str {
        self.uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
            .unwrap_or(&self.title)
    }

    /// Returns `true` if both values refer to the same upstream track.
    pub fn is_same(&self, other: &Track) -> bool {
        self.identifier == other.identifier
    }
}
