//! Test factories for creating Serenity API objects.
//!
//! These factories create valid Serenity structs by deserializing JSON, simulating
//! what Discord's gateway would deliver.
//!
//! # Available Factories
//!
//! - `voice_state::create_test_voice_state` - Create Serenity VoiceState objects

pub mod voice_state;

pub use voice_state::create_test_voice_state;
