use thiserror::Error;

use crate::slash::SessionError;

/// Errors a command handler can return to the dispatcher.
///
/// The `Display` output is what the user ends up seeing, so variants carry
/// a finished, human-readable message rather than a code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Bad or missing parameter, or a command used in the wrong context.
    #[error("{0}")]
    Usage(String),

    /// Something outside the bot failed (filesystem, resolver, Discord).
    #[error("{0}")]
    External(String),

    /// Skip/stop/queue with no active player for the guild.
    #[error("not currently playing in this guild")]
    NotPlaying,
}

impl CommandError {
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage(message.into())
    }

    pub fn external(message: impl Into<String>) -> Self {
        Self::External(message.into())
    }
}

impl From<SessionError> for CommandError {
    fn from(err: SessionError) -> Self {
        Self::External(err.to_string())
    }
}

/// Result type for command handlers
pub type CommandResult = Result<(), CommandError>;
