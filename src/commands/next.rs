use serenity::async_trait;

use super::Music;
use crate::error::{CommandError, CommandResult};
use crate::slash::{Command, CommandHandler, Invocation, Session, Visibility};

pub fn command(music: Music) -> Command {
    Command::new("next", "Skip current song", Next { music })
}

struct Next {
    music: Music,
}

#[async_trait]
impl CommandHandler for Next {
    async fn run(&self, session: &dyn Session, invocation: &Invocation) -> CommandResult {
        let guild_id = invocation.guild_id.ok_or(CommandError::NotPlaying)?;

        self.music.players.next(guild_id).await?;

        session
            .respond("Skipped to next song", Visibility::Public)
            .await?;
        Ok(())
    }
}
