use serenity::async_trait;

use super::Music;
use crate::error::{CommandError, CommandResult};
use crate::slash::{Command, CommandHandler, Invocation, Session, Visibility};

pub fn command(music: Music) -> Command {
    Command::new("stop", "Stop music", Stop { music })
}

struct Stop {
    music: Music,
}

#[async_trait]
impl CommandHandler for Stop {
    async fn run(&self, session: &dyn Session, invocation: &Invocation) -> CommandResult {
        let guild_id = invocation.guild_id.ok_or(CommandError::NotPlaying)?;

        self.music.players.stop(guild_id).await?;

        session
            .respond("Playlist stopped", Visibility::Ephemeral)
            .await?;
        Ok(())
    }
}
