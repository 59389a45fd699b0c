//! This module aggregates all the slash commands the bot serves.

/// Skip the current song
pub mod next;
/// Pause the current song
pub mod pause;
/// Liveness check
pub mod ping;
/// Play a playlist directory
pub mod play;
/// Show what is playing
pub mod queue;
/// Resume a paused song
pub mod resume;
/// Stop playback
pub mod stop;
/// Set the playback volume
pub mod volume;
/// Play a YouTube video or playlist
pub mod youtube;

use std::path::PathBuf;
use std::sync::Arc;

use serenity::all::{ChannelId, GuildId};

use crate::error::CommandError;
use crate::player::GuildPlayers;
use crate::slash::{Invocation, Registry, Session};

/// State shared by the music commands
#[derive(Clone)]
pub struct Music {
    pub players: Arc<GuildPlayers>,
    /// Directory that playlist names are resolved against
    pub library: PathBuf,
    pub resolver: Arc<dyn youtube::SourceResolver>,
}

/// Build a registry holding every command.
pub fn registry(music: Music) -> Registry {
    let mut registry = Registry::default();
    register_all(&mut registry, music);
    registry
}

pub fn register_all(registry: &mut Registry, music: Music) {
    registry.add_command(ping::command());
    registry.add_command(play::command(music.clone()));
    registry.add_command(youtube::command(music.clone()));
    registry.add_command(next::command(music.clone()));
    registry.add_command(stop::command(music.clone()));
    registry.add_command(pause::command(music.clone()));
    registry.add_command(resume::command(music.clone()));
    registry.add_command(volume::command(music.clone()));
    registry.add_command(queue::command(music));
}

pub(crate) fn require_guild(invocation: &Invocation) -> Result<GuildId, CommandError> {
    invocation
        .guild_id
        .ok_or_else(|| CommandError::usage("cannot start music from a DM"))
}

/// Voice channel of the user that invoked the command
pub(crate) fn caller_voice_channel(
    session: &dyn Session,
    guild_id: GuildId,
    invocation: &Invocation,
) -> Result<ChannelId, CommandError> {
    invocation
        .acting_user()
        .and_then(|user| session.voice_channel_of(guild_id, user.id))
        .ok_or_else(|| CommandError::usage("could not find voice channel to join"))
}
