use std::path::Path;

use serenity::async_trait;
use url::Url;

use super::Music;
use crate::error::{CommandError, CommandResult};
use crate::slash::{Command, CommandHandler, Invocation, Session, Visibility};

/// How many upcoming songs are listed
const SHOWN: usize = 5;

pub fn command(music: Music) -> Command {
    Command::new("queue", "See song queue", Queue { music })
}

struct Queue {
    music: Music,
}

#[async_trait]
impl CommandHandler for Queue {
    async fn run(&self, session: &dyn Session, invocation: &Invocation) -> CommandResult {
        let player = invocation
            .guild_id
            .and_then(|guild_id| self.music.players.get(guild_id))
            .ok_or(CommandError::NotPlaying)?;

        let current = player.current().await;
        let pending = player.pending().await;
        let paused = player.is_paused().await;

        session
            .respond(
                &describe(current.as_deref(), paused, &pending),
                Visibility::Public,
            )
            .await?;
        Ok(())
    }
}

fn display_name(location: &str) -> &str {
    if Url::parse(location).is_ok() {
        return location;
    }
    Path::new(location)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(location)
}

fn describe(current: Option<&str>, paused: bool, pending: &[String]) -> String {
    let mut message = match current {
        Some(location) if paused => format!("Paused on **{}**", display_name(location)),
        Some(location) => format!("Playing **{}**", display_name(location)),
        None => "Nothing is currently playing.".to_string(),
    };

    if !pending.is_empty() {
        message.push('\n');
        for (index, location) in pending.iter().take(SHOWN).enumerate() {
            message.push_str(&format!("\n{}) {}", index + 1, display_name(location)));
        }
        if pending.len() > SHOWN {
            message.push_str(&format!("\n…and {} more", pending.len() - SHOWN));
        }
    }

    message
}
