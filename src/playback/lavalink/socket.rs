//! Reader for the node's `/v4/websocket` event stream.

use std::{collections::HashMap, sync::Arc, time::Duration};

use futures::StreamExt;
use serenity::all::{GuildId, UserId};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{self, client::IntoClientRequest, http::HeaderValue, Message},
};

use crate::{
    error::playback::NodeError,
    playback::{
        lavalink::{
            model::{IncomingOp, NodeEvent, TrackData, TrackEndReason},
            node::LavalinkNode,
            player::{LavalinkPlayer, LavalinkPlayers},
        },
        lifecycle::PlayerEvent,
        manager::PlaybackManager,
        node::Player,
        track::Track,
    },
    util::parse::parse_u64_from_string,
};

const RECONNECT_DELAY: Duration = Duration::from_secs(5);

const CLIENT_NAME: &str = concat!("encore/", env!("CARGO_PKG_VERSION"));

/// Event websocket of one Lavalink node.
pub struct LavalinkSocket {
    node: Arc<LavalinkNode>,
    players: Arc<LavalinkPlayers>,
    /// Bot user the node's voice connections belong to.
    user_id: UserId,
}

impl LavalinkSocket {
    pub fn new(node: Arc<LavalinkNode>, players: Arc<LavalinkPlayers>, user_id: UserId) -> Self {
        Self {
            node,
            players,
            user_id,
        }
    }

    /// Reads the websocket forever, reconnecting after failures.
    ///
    /// Lifecycle events are handed to `manager` in order per guild; a slow guild
    /// does not hold up the others.
    pub async fn run(self, manager: Arc<PlaybackManager>) {
        let mut router = EventRouter::new(manager);

        loop {
            match self.read_session(&mut router).await {
                Ok(()) => tracing::warn!(
                    "Audio node websocket closed, reconnecting in {}s",
                    RECONNECT_DELAY.as_secs()
                ),
                Err(e) => tracing::warn!(
                    "Audio node websocket failed, reconnecting in {}s: {}",
                    RECONNECT_DELAY.as_secs(),
                    e
                ),
            }

            tokio::time::sleep(RECONNECT_DELAY).await;
        }
    }

    async fn read_session(&self, router: &mut EventRouter) -> Result<(), NodeError> {
        let url = self.node.websocket_url();
        let mut request = url.as_str().into_client_request()?;
        let headers = request.headers_mut();
        headers.insert("authorization", header_value(self.node.password())?);
        headers.insert("user-id", header_value(&self.user_id.to_string())?);
        headers.insert("client-name", HeaderValue::from_static(CLIENT_NAME));

        let (mut stream, _) = connect_async(request).await?;
        tracing::info!("Connected to audio node websocket at {}", url);

        while let Some(message) = stream.next().await {
            let text = match message? {
                Message::Text(text) => text,
                Message::Close(_) => break,
                _ => continue,
            };

            let op = match serde_json::from_str::<IncomingOp>(&text) {
                Ok(op) => op,
                Err(e) => {
                    tracing::debug!("Ignoring unreadable audio node message: {}", e);
                    continue;
                }
            };

            for (guild_id, event) in self.handle_op(op).await {
                router.route(guild_id, event);
            }
        }

        Ok(())
    }

    /// Applies one websocket op to the node session and the player mirrors.
    ///
    /// # Returns
    /// - Lifecycle events for the manager, in the order they happened
    pub async fn handle_op(&self, op: IncomingOp) -> Vec<(GuildId, PlayerEvent)> {
        match op {
            IncomingOp::Ready {
                resumed,
                session_id,
            } => {
                tracing::info!(
                    "Audio node session {} is ready (resumed: {})",
                    session_id,
                    resumed
                );
                self.node.set_session_id(session_id);

                if resumed {
                    return Vec::new();
                }

                // Players of an earlier session no longer exist on the node.
                self.players
                    .clear()
                    .into_iter()
                    .map(|guild_id| (guild_id, PlayerEvent::PlayerDestroy))
                    .collect()
            }
            IncomingOp::PlayerUpdate { guild_id, state } => {
                if let Some(player) = parse_guild_id(&guild_id).and_then(|id| self.players.get(id))
                {
                    player.update_position(state.position);
                }
                Vec::new()
            }
            IncomingOp::Event(event) => self.handle_node_event(event).await.into_iter().collect(),
            IncomingOp::Other => Vec::new(),
        }
    }

    async fn handle_node_event(&self, event: NodeEvent) -> Option<(GuildId, PlayerEvent)> {
        match event {
            NodeEvent::TrackStart { guild_id, track } => {
                let guild_id = parse_guild_id(&guild_id)?;
                let track = self.known_track(guild_id, track);

                Some((guild_id, PlayerEvent::TrackStart(track)))
            }
            NodeEvent::TrackEnd {
                guild_id,
                track,
                reason,
            } => {
                let guild_id = parse_guild_id(&guild_id)?;
                let player = self.players.get(guild_id)?;

                // The mirror already holds the replacing track.
                if reason == TrackEndReason::Replaced {
                    return None;
                }

                let ended = self.known_track(guild_id, track);
                player.track_ended();

                if !reason.may_start_next() {
                    return None;
                }

                self.advance(&player, ended).await
            }
            NodeEvent::TrackException {
                guild_id,
                track,
                exception,
            } => {
                let guild_id = parse_guild_id(&guild_id)?;
                let track = self.known_track(guild_id, track);

                Some((
                    guild_id,
                    PlayerEvent::TrackError {
                        track,
                        message: exception.to_string(),
                    },
                ))
            }
            NodeEvent::TrackStuck {
                guild_id,
                track,
                threshold_ms,
            } => {
                let guild_id = parse_guild_id(&guild_id)?;
                let track = self.known_track(guild_id, track);

                Some((
                    guild_id,
                    PlayerEvent::TrackStuck {
                        track,
                        threshold_ms,
                    },
                ))
            }
            NodeEvent::WebSocketClosed {
                guild_id,
                code,
                reason,
            } => {
                let guild_id = parse_guild_id(&guild_id)?;
                tracing::info!(
                    "Voice connection in guild {} closed ({}: {})",
                    guild_id,
                    code,
                    reason
                );

                if let Some(player) = self.players.remove(guild_id) {
                    if let Err(e) = player.destroy().await {
                        tracing::debug!("Failed to destroy player in guild {}: {}", guild_id, e);
                    }
                }

                Some((guild_id, PlayerEvent::PlayerDisconnect))
            }
        }
    }

    /// Plays the next queued track, or reports the end of the queue.
    async fn advance(
        &self,
        player: &LavalinkPlayer,
        ended: Track,
    ) -> Option<(GuildId, PlayerEvent)> {
        let guild_id = player.guild_id();

        match player.advance().await {
            Ok(Some(next)) => {
                tracing::debug!("Advanced to '{}' in guild {}", next.title, guild_id);
                None
            }
            Ok(None) => Some((guild_id, PlayerEvent::QueueEnd { track: Some(ended) })),
            Err(e) => {
                tracing::warn!(
                    "Failed to start the next queued track in guild {}: {}",
                    guild_id,
                    e
                );
                Some((guild_id, PlayerEvent::QueueEnd { track: Some(ended) }))
            }
        }
    }

    /// The mirror's copy of `data` if it is the current track, so the requester is kept.
    fn known_track(&self, guild_id: GuildId, data: TrackData) -> Track {
        let current = self
            .players
            .get(guild_id)
            .and_then(|player| player.current_track());

        match current {
            Some(track) if track.identifier == data.info.identifier => track,
            _ => data.into_track(self.user_id),
        }
    }
}

/// Per-guild event queues feeding the manager.
struct EventRouter {
    manager: Arc<PlaybackManager>,
    routes: HashMap<GuildId, mpsc::UnboundedSender<PlayerEvent>>,
}

impl EventRouter {
    fn new(manager: Arc<PlaybackManager>) -> Self {
        Self {
            manager,
            routes: HashMap::new(),
        }
    }

    fn route(&mut self, guild_id: GuildId, event: PlayerEvent) {
        let closing = matches!(
            event,
            PlayerEvent::PlayerDestroy | PlayerEvent::PlayerDisconnect
        );

        let undelivered = match self.routes.get(&guild_id) {
            Some(sender) => sender.send(event).err().map(|e| e.0),
            None => Some(event),
        };

        if let Some(event) = undelivered {
            let sender = self.spawn_worker(guild_id);
            if sender.send(event).is_err() {
                tracing::debug!("Dropped player event for guild {}", guild_id);
            }
            self.routes.insert(guild_id, sender);
        }

        // The worker drains what is queued and exits once its sender is gone.
        if closing {
            self.routes.remove(&guild_id);
        }
    }

    fn spawn_worker(&self, guild_id: GuildId) -> mpsc::UnboundedSender<PlayerEvent> {
        let (sender, mut receiver) = mpsc::unbounded_channel();
        let manager = Arc::clone(&self.manager);

        tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                manager.handle_event(guild_id, event).await;
            }
        });

        sender
    }
}

fn parse_guild_id(value: &str) -> Option<GuildId> {
    parse_u64_from_string(value.to_string())
        .ok()
        .filter(|id| *id != 0)
        .map(GuildId::new)
}

fn header_value(value: &str) -> Result<HeaderValue, NodeError> {
    HeaderValue::from_str(value)
        .map_err(|e| NodeError::from(tungstenite::Error::HttpFormat(e.into())))
}
