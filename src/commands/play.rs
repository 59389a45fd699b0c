use std::path::{Component, Path, PathBuf};

use serenity::async_trait;
use tracing::{debug, info};

use super::{Music, caller_voice_channel, require_guild};
use crate::error::{CommandError, CommandResult};
use crate::slash::{
    Command, CommandHandler, CommandParameter, Invocation, ParameterKind, Session, Visibility,
};

pub fn command(music: Music) -> Command {
    Command::new("play", "Play some music", Play { music }).parameter(
        CommandParameter::new(ParameterKind::String, "playlist", "Playlist to start")
            .required(true),
    )
}

struct Play {
    music: Music,
}

#[async_trait]
impl CommandHandler for Play {
    async fn run(&self, session: &dyn Session, invocation: &Invocation) -> CommandResult {
        let guild_id = require_guild(invocation)?;

        if self.music.players.is_playing(guild_id) {
            return Err(CommandError::usage("already playing in this guild"));
        }

        let name = invocation.string("playlist")?;
        let songs = load_playlist(&self.music.library, name).await?;
        debug!("Loaded {} songs from playlist {}", songs.len(), name);

        let channel_id = caller_voice_channel(session, guild_id, invocation)?;

        self.music
            .players
            .start(guild_id, songs, async {
                session
                    .join_voice(guild_id, channel_id)
                    .await
                    .map_err(CommandError::from)
            })
            .await?;

        info!("Started playlist {} in guild {}", name, guild_id);
        session
            .respond(&format!("Started playlist {}", name), Visibility::Public)
            .await?;

        Ok(())
    }
}

/// List the songs of a playlist directory: every non-hidden regular file,
/// sorted by file name.
pub async fn load_playlist(library: &Path, name: &str) -> Result<Vec<String>, CommandError> {
    let relative = Path::new(name);
    if name.is_empty()
        || !relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
    {
        return Err(CommandError::usage(format!("invalid playlist name {}", name)));
    }

    let dir = library.join(relative);
    read_songs(&dir)
        .await
        .map_err(|e| CommandError::external(format!("could not load songs for {}: {}", name, e)))
}

async fn read_songs(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut songs: Vec<PathBuf> = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if entry.file_type().await?.is_file() {
            songs.push(entry.path());
        }
    }

    songs.sort();
    Ok(songs
        .into_iter()
        .map(|song| song.to_string_lossy().into_owned())
        .collect())
}
