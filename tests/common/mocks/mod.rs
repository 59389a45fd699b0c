//! Mock implementations for testing
use std::sync::{Arc, Mutex};

use daft::CommandError;
use daft::player::AudioSink;
use daft::slash::{ErrorHandler, Invocation, Session, SessionError, Visibility};
use mockall::mock;
use serenity::all::{ChannelId, GuildId, UserId};
use serenity::async_trait;

mock! {
    pub Discord {}

    #[async_trait]
    impl Session for Discord {
        async fn respond(&self, content: &str, visibility: Visibility) -> Result<(), SessionError>;
        async fn edit_response(&self, content: &str) -> Result<(), SessionError>;
        async fn followup(&self, content: &str, visibility: Visibility) -> Result<(), SessionError>;
        async fn has_responded(&self) -> Result<bool, SessionError>;
        fn voice_channel_of(&self, guild_id: GuildId, user_id: UserId) -> Option<ChannelId>;
        async fn join_voice(
            &self,
            guild_id: GuildId,
            channel_id: ChannelId,
        ) -> Result<Box<dyn AudioSink>, SessionError>;
    }
}

/// Error handler that only remembers what it was given
#[derive(Clone, Default)]
pub struct RecordingErrorHandler {
    pub seen: Arc<Mutex<Vec<CommandError>>>,
}

impl RecordingErrorHandler {
    pub fn seen(&self) -> Vec<CommandError> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ErrorHandler for RecordingErrorHandler {
    async fn handle(
        &self,
        error: &CommandError,
        _session: &dyn Session,
        _invocation: &Invocation,
    ) -> Result<(), SessionError> {
        self.seen.lock().unwrap().push(error.clone());
        Ok(())
    }
}

/// Error handler whose reply never makes it out
pub struct BrokenErrorHandler;

#[async_trait]
impl ErrorHandler for BrokenErrorHandler {
    async fn handle(
        &self,
        _error: &CommandError,
        _session: &dyn Session,
        _invocation: &Invocation,
    ) -> Result<(), SessionError> {
        Err(SessionError::Http("429 Too Many Requests".into()))
    }
}
