use serenity::async_trait;

use super::Music;
use crate::error::{CommandError, CommandResult};
use crate::slash::{Command, CommandHandler, Invocation, Session, Visibility};

pub fn command(music: Music) -> Command {
    Command::new("pause", "Pause the playlist", Pause { music })
}

struct Pause {
    music: Music,
}

#[async_trait]
impl CommandHandler for Pause {
    async fn run(&self, session: &dyn Session, invocation: &Invocation) -> CommandResult {
        let guild_id = invocation.guild_id.ok_or(CommandError::NotPlaying)?;

        if !self.music.players.pause(guild_id).await? {
            return Err(CommandError::usage("nothing to pause"));
        }

        session.respond("Playback paused", Visibility::Public).await?;
        Ok(())
    }
}
