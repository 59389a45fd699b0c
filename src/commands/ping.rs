use serenity::async_trait;

use crate::error::CommandResult;
use crate::slash::{Command, CommandHandler, Invocation, Session, Visibility};

pub fn command() -> Command {
    Command::new("ping", "Check that the bot is alive", Ping)
}

struct Ping;

#[async_trait]
impl CommandHandler for Ping {
    async fn run(&self, session: &dyn Session, _invocation: &Invocation) -> CommandResult {
        session.respond("Pong!", Visibility::Ephemeral).await?;
        Ok(())
    }
}
