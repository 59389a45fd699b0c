use serenity::async_trait;

use super::Music;
use crate::error::{CommandError, CommandResult};
use crate::slash::{
    Command, CommandHandler, CommandParameter, Invocation, ParameterKind, Session, Visibility,
};

const MAX_PERCENT: i64 = 100;

pub fn command(music: Music) -> Command {
    Command::new("volume", "Set the playback volume", Volume { music }).parameter(
        CommandParameter::new(ParameterKind::Integer, "volume", "Volume in percent, up to 100")
            .required(true),
    )
}

struct Volume {
    music: Music,
}

#[async_trait]
impl CommandHandler for Volume {
    async fn run(&self, session: &dyn Session, invocation: &Invocation) -> CommandResult {
        let guild_id = invocation.guild_id.ok_or(CommandError::NotPlaying)?;
        let percent = clamp_percent(invocation.integer("volume")?)?;

        self.music
            .players
            .set_volume(guild_id, percent as f32 / 100.0)
            .await?;

        session
            .respond(&format!("Volume set to {}%", percent), Visibility::Public)
            .await?;
        Ok(())
    }
}

/// Anything above 100% is played at 100%.
fn clamp_percent(percent: i64) -> Result<i64, CommandError> {
    if percent < 0 {
        return Err(CommandError::usage("volume cannot be negative"));
    }
    Ok(percent.min(MAX_PERCENT))
}
