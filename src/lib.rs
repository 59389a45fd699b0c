//! daft: a Discord bot that plays playlists and YouTube streams into voice
//! channels through slash commands.

pub mod commands;
pub mod config;
pub mod discord;
pub mod error;
pub mod player;
pub mod slash;
#[cfg(feature = "voice")]
pub mod voice;

pub use error::{CommandError, CommandResult};
