use std::{
    collections::{HashMap, VecDeque},
    sync::Arc,
};

use parking_lot::Mutex;
use serenity::{all::GuildId, async_trait};

use crate::{
    error::playback::NodeError,
    playback::{
        lavalink::{
            model::{UpdatePlayer, UpdatePlayerTrack, VoiceUpdate},
            node::LavalinkNode,
        },
        node::Player,
        track::Track,
    },
};

#[derive(Default)]
struct PlayerState {
    queue: VecDeque<Track>,
    current: Option<Track>,
    position_ms: u64,
    paused: bool,
    volume: u8,
}

/// A guild's Lavalink player with a local mirror of its queue and state.
///
/// The mirror is updated after each successful request. Position and track-end
/// updates come from the node's event websocket.
pub struct LavalinkPlayer {
    node: Arc<LavalinkNode>,
    guild_id: GuildId,
    state: Mutex<PlayerState>,
}

impl LavalinkPlayer {
    pub fn new(node: Arc<LavalinkNode>, guild_id: GuildId, volume: u8) -> Arc<Self> {
        Arc::new(Self {
            node,
            guild_id,
            state: Mutex::new(PlayerState {
                volume,
                ..Default::default()
            }),
        })
    }

    /// Hands the guild's voice server credentials to the node, creating the player there.
    pub async fn connect(&self, voice: VoiceUpdate) -> Result<(), NodeError> {
        let update = UpdatePlayer {
            voice: Some(voice),
            ..Default::default()
        };

        self.node.update_player(self.guild_id, &update).await
    }

    pub fn enqueue(&self, track: Track) {
        self.state.lock().queue.push_back(track);
    }

    pub fn queue_len(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Plays the head of the queue.
    ///
    /// # Returns
    /// - `Ok(Some(Track))` - The dequeued track that is now playing
    /// - `Ok(None)` - The queue was empty
    /// - `Err(NodeError)` - The node refused the track; it stays dequeued
    pub async fn advance(&self) -> Result<Option<Track>, NodeError> {
        let next = self.state.lock().queue.pop_front();
        let Some(next) = next else {
            return Ok(None);
        };

        self.play(&next).await?;

        Ok(Some(next))
    }

    /// Records the position from a websocket `playerUpdate`.
    pub fn update_position(&self, position_ms: u64) {
        self.state.lock().position_ms = position_ms;
    }

    /// Records that the node finished the current track.
    pub fn track_ended(&self) {
        let mut state = self.state.lock();
        state.current = None;
        state.position_ms = 0;
    }
}

/// Lavalink players of the current node session, by guild.
#[derive(Default)]
pub struct LavalinkPlayers {
    players: Mutex<HashMap<GuildId, Arc<LavalinkPlayer>>>,
}

impl LavalinkPlayers {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn get(&self, guild_id: GuildId) -> Option<Arc<LavalinkPlayer>> {
        self.players.lock().get(&guild_id).cloned()
    }

    pub fn insert(&self, player: Arc<LavalinkPlayer>) {
        self.players.lock().insert(player.guild_id, player);
    }

    pub fn remove(&self, guild_id: GuildId) -> Option<Arc<LavalinkPlayer>> {
        self.players.lock().remove(&guild_id)
    }

    /// Forgets every player, returning their guilds.
    pub fn clear(&self) -> Vec<GuildId> {
        self.players.lock().drain().map(|(guild_id, _)| guild_id).collect()
    }
}

#[async_trait]
impl Player for LavalinkPlayer {
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
        let update = UpdatePlayer {
            track: Some(UpdatePlayerTrack {
                encoded: Some(track.encoded.clone()),
            }),
            position: Some(0),
            paused: Some(false),
            ..Default::default()
        };
        self.node.update_player(self.guild_id, &update).await?;

        let mut state = self.state.lock();
        state.current = Some(track.clone());
        state.position_ms = 0;
        state.paused = false;

        Ok(())
    }

    async fn pause(&self, paused: bool) -> Result<(), NodeError> {
        let update = UpdatePlayer {
            paused: Some(paused),
            ..Default::default()
        };
        self.node.update_player(self.guild_id, &update).await?;

        self.state.lock().paused = paused;

        Ok(())
    }

    async fn set_volume(&self, volume: u8) -> Result<(), NodeError> {
        let volume = volume.min(100);
        let update = UpdatePlayer {
            volume: Some(u16::from(volume)),
            ..Default::default()
        };
        self.node.update_player(self.guild_id, &update).await?;

        self.state.lock().volume = volume;

        Ok(())
    }

    async fn stop(&self) -> Result<(), NodeError> {
        let update = UpdatePlayer {
            track: Some(UpdatePlayerTrack { encoded: None }),
            ..Default::default()
        };
        self.node.update_player(self.guild_id, &update).await?;

        self.track_ended();

        Ok(())
    }

    async fn destroy(&self) -> Result<(), NodeError> {
        self.node.destroy_player(self.guild_id).await?;

        let mut state = self.state.lock();
        state.queue.clear();
        state.current = None;
        state.position_ms = 0;

        Ok(())
    }
}
