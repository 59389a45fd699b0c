use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serenity::all::GuildId;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use super::{AudioSink, PlaybackError, Player};
use crate::error::CommandError;

/// Active players keyed by guild. Shared by every command handler and the
/// playback tasks, which remove their own entry when they finish.
#[derive(Default)]
pub struct GuildPlayers {
    players: DashMap<GuildId, Arc<Player>>,
}

impl GuildPlayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, guild_id: GuildId) -> Option<Arc<Player>> {
        self.players
            .get(&guild_id)
            .map(|player| Arc::clone(player.value()))
    }

    pub fn is_playing(&self, guild_id: GuildId) -> bool {
        self.players.contains_key(&guild_id)
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Start playing `sources` in a guild.
    ///
    /// The table entry is claimed before `open_sink` runs, so two concurrent
    /// starts for one guild cannot both get through. If the guild is already
    /// playing the existing player is left alone. Playback itself runs on a
    /// spawned task; the returned handle resolves once it has finished and
    /// the entry is gone.
    pub async fn start<F>(
        self: &Arc<Self>,
        guild_id: GuildId,
        sources: Vec<String>,
        open_sink: F,
    ) -> Result<JoinHandle<()>, CommandError>
    where
        F: Future<Output = Result<Box<dyn AudioSink>, CommandError>>,
    {
        let player = Arc::new(Player::new(sources));

        match self.players.entry(guild_id) {
            Entry::Occupied(_) => {
                return Err(CommandError::usage("already playing in this guild"));
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&player));
            }
        }

        let sink = match open_sink.await {
            Ok(sink) => sink,
            Err(err) => {
                self.remove(guild_id, &player);
                return Err(err);
            }
        };

        info!("Starting playback for guild {}", guild_id);

        let players = Arc::clone(self);
        Ok(tokio::spawn(async move {
            if let Err(err) = player.play(sink).await {
                error!("Playback failed for guild {}: {}", guild_id, err);
            }
            players.remove(guild_id, &player);
            debug!("Playback finished for guild {}", guild_id);
        }))
    }

    /// Skip the current source of the guild's player.
    pub async fn next(&self, guild_id: GuildId) -> Result<(), CommandError> {
        let player = self.get(guild_id).ok_or(CommandError::NotPlaying)?;
        if !player.next().await {
            debug!("Skip for guild {} arrived between songs", guild_id);
        }
        Ok(())
    }

    /// Clear the guild's queue and cut off the current source.
    pub async fn stop(&self, guild_id: GuildId) -> Result<(), CommandError> {
        let player = self.get(guild_id).ok_or(CommandError::NotPlaying)?;
        player.stop().await;
        Ok(())
    }

    /// Pause the guild's current source. `Ok(false)` when nothing was
    /// streaming or it was already paused.
    pub async fn pause(&self, guild_id: GuildId) -> Result<bool, CommandError> {
        let player = self.get(guild_id).ok_or(CommandError::NotPlaying)?;
        player.pause().await.map_err(control_failed)
    }

    /// Resume the guild's paused source. `Ok(false)` when nothing was paused.
    pub async fn resume(&self, guild_id: GuildId) -> Result<bool, CommandError> {
        let player = self.get(guild_id).ok_or(CommandError::NotPlaying)?;
        player.resume().await.map_err(control_failed)
    }

    pub async fn set_volume(&self, guild_id: GuildId, volume: f32) -> Result<(), CommandError> {
        let player = self.get(guild_id).ok_or(CommandError::NotPlaying)?;
        player.set_volume(volume).await.map_err(control_failed)
    }

    // Only removes the entry if it still belongs to `player`.
    fn remove(&self, guild_id: GuildId, player: &Arc<Player>) {
        self.players
            .remove_if(&guild_id, |_, current| Arc::ptr_eq(current, player));
    }
}

fn control_failed(err: PlaybackError) -> CommandError {
    CommandError::external(format!("could not control playback: {}", err))
}
