use serenity::all::{ChannelId, GuildId, UserId};
use serenity::async_trait;
use thiserror::Error;

use crate::player::AudioSink;

/// Who gets to see a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Public,
    /// Only the invoking user
    Ephemeral,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The platform has no record of the thing asked about (usually: no
    /// response has been sent for this interaction yet).
    #[error("not found")]
    NotFound,

    #[error("discord request failed: {0}")]
    Http(String),

    #[error("voice connection failed: {0}")]
    Voice(String),
}

/// Capabilities a command handler gets for the interaction it is serving.
///
/// A session is bound to a single interaction, so responses always go to the
/// invocation that is being dispatched.
#[async_trait]
pub trait Session: Send + Sync {
    /// Send the initial response.
    async fn respond(&self, content: &str, visibility: Visibility) -> Result<(), SessionError>;

    /// Replace the content of the initial response.
    async fn edit_response(&self, content: &str) -> Result<(), SessionError>;

    /// Send an additional message after the initial response.
    async fn followup(&self, content: &str, visibility: Visibility) -> Result<(), SessionError>;

    /// Whether an initial response exists. Implementations may report a
    /// missing response as `Err(SessionError::NotFound)` instead of `Ok(false)`.
    async fn has_responded(&self) -> Result<bool, SessionError>;

    /// Voice channel the user is currently connected to in the guild.
    fn voice_channel_of(&self, guild_id: GuildId, user_id: UserId) -> Option<ChannelId>;

    /// Join a voice channel and hand back a sink that plays into it.
    async fn join_voice(
        &self,
        guild_id: GuildId,
        channel_id: ChannelId,
    ) -> Result<Box<dyn AudioSink>, SessionError>;
}
