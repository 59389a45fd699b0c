//! Glue between the serenity gateway and the slash command registry.

use std::sync::Arc;

use serenity::all::{
    ActivityData, ChannelId, CommandInteraction, Context, CreateInteractionResponse,
    CreateInteractionResponseFollowup, CreateInteractionResponseMessage, EditInteractionResponse,
    EventHandler, GuildId, Interaction, Ready, UserId,
};
use serenity::async_trait;
use tracing::{debug, info};

use crate::player::AudioSink;
use crate::slash::{Invocation, Registry, Session, SessionError, Visibility};

impl From<serenity::Error> for SessionError {
    fn from(err: serenity::Error) -> Self {
        match &err {
            serenity::Error::Http(http) if http.status_code().map(|s| s.as_u16()) == Some(404) => {
                SessionError::NotFound
            }
            _ => SessionError::Http(err.to_string()),
        }
    }
}

/// Session capabilities for one command interaction
pub struct DiscordSession {
    ctx: Context,
    interaction: CommandInteraction,
}

impl DiscordSession {
    pub fn new(ctx: Context, interaction: CommandInteraction) -> Self {
        Self { ctx, interaction }
    }
}

#[async_trait]
impl Session for DiscordSession {
    async fn respond(&self, content: &str, visibility: Visibility) -> Result<(), SessionError> {
        let message = CreateInteractionResponseMessage::new()
            .content(content)
            .ephemeral(visibility == Visibility::Ephemeral);

        self.interaction
            .create_response(&self.ctx, CreateInteractionResponse::Message(message))
            .await?;
        Ok(())
    }

    async fn edit_response(&self, content: &str) -> Result<(), SessionError> {
        self.interaction
            .edit_response(&self.ctx, EditInteractionResponse::new().content(content))
            .await?;
        Ok(())
    }

    async fn followup(&self, content: &str, visibility: Visibility) -> Result<(), SessionError> {
        let message = CreateInteractionResponseFollowup::new()
            .content(content)
            .ephemeral(visibility == Visibility::Ephemeral);

        self.interaction.create_followup(&self.ctx, message).await?;
        Ok(())
    }

    async fn has_responded(&self) -> Result<bool, SessionError> {
        self.interaction.get_response(&self.ctx).await?;
        Ok(true)
    }

    fn voice_channel_of(&self, guild_id: GuildId, user_id: UserId) -> Option<ChannelId> {
        let guild = self.ctx.cache.guild(guild_id)?;
        guild
            .voice_states
            .get(&user_id)
            .and_then(|voice_state| voice_state.channel_id)
    }

    #[cfg(feature = "voice")]
    async fn join_voice(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Box<dyn AudioSink>, SessionError> {
        let manager = songbird::get(&self.ctx)
            .await
            .ok_or_else(|| SessionError::Voice("voice client is not registered".into()))?;

        let call = manager
            .join(guild_id, channel_id)
            .await
            .map_err(|e| SessionError::Voice(e.to_string()))?;

        if let Err(e) = call.lock().await.deafen(true).await {
            tracing::warn!("Could not self-deafen in guild {}: {}", guild_id, e);
        }

        Ok(Box::new(crate::voice::VoiceSink::new(manager, guild_id, call)))
    }

    #[cfg(not(feature = "voice"))]
    async fn join_voice(
        &self,
        _guild_id: GuildId,
        _channel_id: ChannelId,
    ) -> Result<Box<dyn AudioSink>, SessionError> {
        Err(SessionError::Voice("built without voice support".into()))
    }
}

/// Gateway event handler that feeds slash commands into the registry
pub struct Handler {
    registry: Arc<Registry>,
}

impl Handler {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is running", ready.user.name);
        ctx.set_activity(Some(ActivityData::playing("🎶 music 🎶")));
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            debug!("Ignoring non-command interaction {}", interaction.id());
            return;
        };

        let invocation = Invocation::from(&command);
        let session = DiscordSession::new(ctx, command);
        self.registry.dispatch(&session, &invocation).await;
    }
}
