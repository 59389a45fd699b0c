use std::sync::Arc;

use indexmap::IndexMap;
use serenity::async_trait;
use tracing::{debug, error, warn};

use super::{Command, Invocation, Session, SessionError, Visibility};
use crate::error::CommandError;

/// Turns a failed command into something the user gets to see.
#[async_trait]
pub trait ErrorHandler: Send + Sync {
    async fn handle(
        &self,
        error: &CommandError,
        session: &dyn Session,
        invocation: &Invocation,
    ) -> Result<(), SessionError>;
}

/// Replies with `An error occurred: <error>`, editing the existing response
/// when the command already sent one.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultErrorHandler;

#[async_trait]
impl ErrorHandler for DefaultErrorHandler {
    async fn handle(
        &self,
        error: &CommandError,
        session: &dyn Session,
        invocation: &Invocation,
    ) -> Result<(), SessionError> {
        let content = format!("An error occurred: {}", error);

        let responded = match session.has_responded().await {
            Ok(responded) => responded,
            Err(SessionError::NotFound) => false,
            Err(err) => {
                warn!(
                    "Could not check for an existing response to interaction {}: {}",
                    invocation.id, err
                );
                false
            }
        };

        if responded {
            session.edit_response(&content).await
        } else {
            session.respond(&content, Visibility::Ephemeral).await
        }
    }
}

/// Name-keyed table of slash commands.
///
/// Built with `&mut` access during startup, then shared behind an `Arc`
/// with whatever receives interactions.
pub struct Registry {
    commands: IndexMap<String, Command>,
    error_handler: Arc<dyn ErrorHandler>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::with_error_handler(DefaultErrorHandler)
    }
}

impl Registry {
    pub fn with_error_handler(error_handler: impl ErrorHandler + 'static) -> Self {
        Self {
            commands: IndexMap::new(),
            error_handler: Arc::new(error_handler),
        }
    }

    /// Add a command, replacing any existing command with the same name.
    pub fn add_command(&mut self, command: Command) {
        debug!("Registering command {}", command.name);
        self.commands.insert(command.name.clone(), command);
    }

    pub fn set_error_handler(&mut self, error_handler: impl ErrorHandler + 'static) {
        self.error_handler = Arc::new(error_handler);
    }

    pub fn get(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// Commands in the order they were first added
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.commands.values()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Route an interaction to its command.
    ///
    /// Unknown commands are ignored: they can still arrive after a command is
    /// removed remotely. Failures go through the error handler and never
    /// escape this call.
    pub async fn dispatch(&self, session: &dyn Session, invocation: &Invocation) {
        let name = invocation.command_name.as_str();
        let user = invocation
            .acting_user()
            .map(ToString::to_string)
            .unwrap_or_default();

        debug!(
            "Interaction {} created: command={} guild={:?} channel={} user={}",
            invocation.id, name, invocation.guild_id, invocation.channel_id, user
        );

        let Some(command) = self.commands.get(name) else {
            debug!("No command registered for {}, ignoring", name);
            return;
        };

        let Err(err) = command.handler.run(session, invocation).await else {
            return;
        };

        error!(
            "Command {} failed for interaction {} (guild={:?} channel={} user={}): {}",
            name, invocation.id, invocation.guild_id, invocation.channel_id, user, err
        );

        if let Err(handler_err) = self.error_handler.handle(&err, session, invocation).await {
            error!(
                "Could not respond to interaction {} for command {}: {}",
                invocation.id, name, handler_err
            );
        }
    }
}
