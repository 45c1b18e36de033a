use std::sync::{atomic::AtomicBool, Arc};

use sea_orm::DatabaseConnection;
use serenity::all::{Context, EventHandler, Interaction, Ready, VoiceState};
use serenity::async_trait;
use songbird::Songbird;

use crate::playback::{
    lavalink::{LavalinkNode, LavalinkPlayers},
    manager::PlaybackManager,
};

pub mod interaction;
pub mod ready;
pub mod voice;

/// Discord bot event handler
pub struct Handler {
    pub db: DatabaseConnection,
    pub manager: Arc<PlaybackManager>,
    pub node: Arc<LavalinkNode>,
    pub players: Arc<LavalinkPlayers>,
    pub songbird: Arc<Songbird>,
    pub default_volume: u8,
    /// Set once the audio node websocket task has been spawned
    socket_started: AtomicBool,
}

impl Handler {
    pub fn new(
        db: DatabaseConnection,
        manager: Arc<PlaybackManager>,
        node: Arc<LavalinkNode>,
        songbird: Arc<Songbird>,
        default_volume: u8,
    ) -> Self {
        Self {
            db,
            manager,
            node,
            players: LavalinkPlayers::new(),
            songbird,
            default_volume,
            socket_started: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl EventHandler for Handler {
    /// Called when the bot is ready and connected to Discord
    async fn ready(&self, ctx: Context, ready: Ready) {
        ready::handle_ready(self, ctx, ready).await;
    }

    /// Called when a slash command or component is used
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        interaction::handle_interaction(self, ctx, interaction).await;
    }

    /// Called when a user joins, leaves or moves between voice channels
    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        voice::handle_voice_state_update(self, ctx, old, new).await;
    }
}
