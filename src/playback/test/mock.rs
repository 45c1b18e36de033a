//! Recording test doubles for the engine's seams.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use parking_lot::Mutex;
use serenity::{
    all::{GuildId, UserId},
    async_trait,
};

use crate::{
    error::playback::{DisplayError, NodeError},
    playback::{
        config::PlaybackConfig,
        display::{NowPlayingChannel, NowPlayingMessage},
        manager::PlaybackManager,
        node::{AudioNode, Player},
        progress::ProgressView,
        track::Track,
    },
};

pub(crate) fn guild() -> GuildId {
    GuildId::new(1)
}

/// Finite track with identifier `id`.
pub(crate) fn track(id: &str, length_ms: u64) -> Track {
    Track {
        identifier: id.to_string(),
        encoded: format!("encoded-{}", id),
        title: format!("Title {}", id),
        author: "Artist".to_string(),
        uri: Some(format!("https://example.com/{}", id)),
        length_ms,
        is_stream: false,
        requester: UserId::new(42),
    }
}

/// `base` as returned by a search, with its own playable handle.
pub(crate) fn resolved(base: &Track, encoded: &str) -> Track {
    Track {
        encoded: encoded.to_string(),
        ..base.clone()
    }
}

/// Live stream with identifier `id`.
pub(crate) fn stream(id: &str) -> Track {
    Track {
        is_stream: true,
        length_ms: 0,
        ..track(id, 0)
    }
}

pub(crate) fn manager(node: &Arc<MockNode>) -> Arc<PlaybackManager> {
    PlaybackManager::new(node.clone(), PlaybackConfig::default())
}

#[derive(Default)]
struct PlayerState {
    queue: VecDeque<Track>,
    current: Option<Track>,
    position_ms: u64,
    paused: bool,
    volume: u8,
    volume_calls: Vec<u8>,
    play_calls: Vec<String>,
    failing_plays: usize,
    destroyed: bool,
}

/// Player that records every call and plays instantly.
pub(crate) struct MockPlayer {
    guild_id: GuildId,
    state: Mutex<PlayerState>,
}

impl MockPlayer {
    pub(crate) fn new(volume: u8) -> Arc<Self> {
        Arc::new(Self {
            guild_id: guild(),
            state: Mutex::new(PlayerState {
                volume,
                ..Default::default()
            }),
        })
    }

    pub(crate) fn enqueue(&self, track: Track) {
        self.state.lock().queue.push_back(track);
    }

    pub(crate) fn dequeue(&self) -> Option<Track> {
        self.state.lock().queue.pop_front()
    }

    pub(crate) fn set_current(&self, track: Option<Track>) {
        self.state.lock().current = track;
    }

    pub(crate) fn set_position(&self, position_ms: u64) {
        self.state.lock().position_ms = position_ms;
    }

    /// Makes the next `count` calls to `play` fail.
    pub(crate) fn fail_plays(&self, count: usize) {
        self.state.lock().failing_plays = count;
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.state.lock().destroyed
    }

    pub(crate) fn volume_calls(&self) -> Vec<u8> {
        self.state.lock().volume_calls.clone()
    }

    /// Encoded handles passed to `play`, failed attempts included.
    pub(crate) fn play_calls(&self) -> Vec<String> {
        self.state.lock().play_calls.clone()
    }
}

#[async_trait]
impl Player for MockPlayer {
    fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    fn current_track(&self) -> Option<Track> {
        self.state.lock().current.clone()
    }

    fn peek_queue(&self) -> Option<Track> {
        self.state.lock().queue.front().cloned()
    }

    fn position_ms(&self) -> u64 {
        self.state.lock().position_ms
    }

    fn is_paused(&self) -> bool {
        self.state.lock().paused
    }

    fn volume(&self) -> u8 {
        self.state.lock().volume
    }

    async fn play(&self, track: &Track) -> Result<(), NodeError> {
        let mut state = self.state.lock();
        state.play_calls.push(track.encoded.clone());

        if state.failing_plays > 0 {
            state.failing_plays -= 1;
            return Err(NodeError::LoadFailed("mock play failure".to_string()));
        }

        state.current = Some(track.clone());
        state.position_ms = 0;
        Ok(())
    }

    async fn pause(&self, paused: bool) -> Result<(), NodeError> {
        self.state.lock().paused = paused;
        Ok(())
    }

    async fn set_volume(&self, volume: u8) -> Result<(), NodeError> {
        let mut state = self.state.lock();
        state.volume = volume;
        state.volume_calls.push(volume);
        Ok(())
    }

    async fn stop(&self) -> Result<(), NodeError> {
        self.state.lock().current = None;
        Ok(())
    }

    async fn destroy(&self) -> Result<(), NodeError> {
        let mut state = self.state.lock();
        state.current = None;
        state.destroyed = true;
        Ok(())
    }
}

/// Node whose search returns a configurable result list.
#[derive(Default)]
pub(crate) struct MockNode {
    results: Mutex<Vec<Track>>,
    failing: AtomicBool,
    queries: Mutex<Vec<String>>,
}

impl MockNode {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn returning(tracks: Vec<Track>) -> Arc<Self> {
        let node = Self::new();
        node.set_results(tracks);
        node
    }

    pub(crate) fn set_results(&self, tracks: Vec<Track>) {
        *self.results.lock() = tracks;
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl AudioNode for MockNode {
    async fn search(&self, query: &str, _requester: UserId) -> Result<Vec<Track>, NodeError> {
        self.queries.lock().push(query.to_string());

        if self.failing.load(Ordering::SeqCst) {
            return Err(NodeError::LoadFailed("mock search failure".to_string()));
        }

        Ok(self.results.lock().clone())
    }
}

/// Channel that hands out recording messages.
#[derive(Default)]
pub(crate) struct MockChannel {
    messages: Mutex<Vec<Arc<MockMessage>>>,
    failing_updates: AtomicBool,
    announce_delay: Duration,
}

impl MockChannel {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Channel whose announcements take `delay` to complete.
    pub(crate) fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            announce_delay: delay,
            ..Self::default()
        })
    }

    /// Makes every message announced from now on reject edits.
    pub(crate) fn fail_updates(&self) {
        self.failing_updates.store(true, Ordering::SeqCst);
    }

    pub(crate) fn messages(&self) -> Vec<Arc<MockMessage>> {
        self.messages.lock().clone()
    }

    pub(crate) fn last_message(&self) -> Option<Arc<MockMessage>> {
        self.messages.lock().last().cloned()
    }
}

#[async_trait]
impl NowPlayingChannel for MockChannel {
    async fn announce(
        &self,
        track: &Track,
        progress: &ProgressView,
    ) -> Result<Arc<dyn NowPlayingMessage>, DisplayError> {
        if !self.announce_delay.is_zero() {
            tokio::time::sleep(self.announce_delay).await;
        }

        let message = Arc::new(MockMessage {
            track_id: track.identifier.clone(),
            initial: *progress,
            updates: Mutex::new(Vec::new()),
            failing: self.failing_updates.load(Ordering::SeqCst),
        });
        self.messages.lock().push(Arc::clone(&message));

        Ok(message)
    }
}

pub(crate) struct MockMessage {
    pub(crate) track_id: String,
    pub(crate) initial: ProgressView,
    updates: Mutex<Vec<ProgressView>>,
    failing: bool,
}

impl MockMessage {
    /// Edit attempts, failed ones included.
    pub(crate) fn updates(&self) -> Vec<ProgressView> {
        self.updates.lock().clone()
    }
}

#[async_trait]
impl NowPlayingMessage for MockMessage {
    async fn update(&self, _track: &Track, progress: &ProgressView) -> Result<(), DisplayError> {
        self.updates.lock().push(*progress);

        if self.failing {
            return Err(serenity::Error::Other("message deleted").into());
        }

        Ok(())
    }
}
