//! Lavalink v4 REST adapter.
//!
//! [`LavalinkNode`] resolves tracks through `/v4/loadtracks`, [`LavalinkPlayer`]
//! drives one guild's player through the session's player endpoints and keeps a
//! local mirror of its queue and state. [`LavalinkSocket`] reads the node's event
//! websocket: it stores the session id, keeps the player mirrors current and
//! forwards lifecycle events to the manager.

pub mod model;
pub mod node;
pub mod player;
pub mod socket;

pub use node::LavalinkNode;
pub use player::{LavalinkPlayer, LavalinkPlayers};
pub use socket::LavalinkSocket;
