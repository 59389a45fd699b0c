use serenity::async_trait;

use super::Music;
use crate::error::{CommandError, CommandResult};
use crate::slash::{Command, CommandHandler, Invocation, Session, Visibility};

pub fn command(music: Music) -> Command {
    Command::new("resume", "Resume the playlist", Resume { music })
}

struct Resume {
    music: Music,
}

#[async_trait]
impl CommandHandler for Resume {
    async fn run(&self, session: &dyn Session, invocation: &Invocation) -> CommandResult {
        let guild_id = invocation.guild_id.ok_or(CommandError::NotPlaying)?;

        if !self.music.players.resume(guild_id).await? {
            return Err(CommandError::usage("nothing to resume"));
        }

        session.respond("Playback resumed", Visibility::Public).await?;
        Ok(())
    }
}
