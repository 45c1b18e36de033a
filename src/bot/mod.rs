//! Discord bot integration.
//!
//! The bot connects Discord to the playback engine. `/play` joins the caller's
//! voice channel through songbird, creates and registers the guild's node player
//! and queues the search result; `/leave` and removal from voice retire it. The
//! node's event websocket is started on ready and feeds the engine. Settings
//! commands persist autoplay and the default volume.
//!
//! # Gateway Intents
//!
//! - `GUILDS` - Guild availability and slash command interactions
//! - `GUILD_VOICE_STATES` - Voice channel joins and leaves, including the bot's own

pub mod command;
pub mod handler;
pub mod start;
