use std::fmt;
use std::sync::Arc;

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption};
use serenity::async_trait;

use super::{Invocation, Session};
use crate::error::CommandResult;

/// The code behind a slash command.
///
/// Handlers run on the dispatcher's task. Anything long-running (playback)
/// must be spawned so the handler can respond and return.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn run(&self, session: &dyn Session, invocation: &Invocation) -> CommandResult;
}

/// Type of a single slash command parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    String,
    Integer,
    Number,
    Boolean,
}

impl From<ParameterKind> for CommandOptionType {
    fn from(kind: ParameterKind) -> Self {
        match kind {
            ParameterKind::String => CommandOptionType::String,
            ParameterKind::Integer => CommandOptionType::Integer,
            ParameterKind::Number => CommandOptionType::Number,
            ParameterKind::Boolean => CommandOptionType::Boolean,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandParameter {
    pub name: String,
    pub description: String,
    pub kind: ParameterKind,
    pub required: bool,
}

impl CommandParameter {
    pub fn new(kind: ParameterKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// A slash command: the metadata Discord needs to show it, and its handler.
#[derive(Clone)]
pub struct Command {
    pub name: String,
    pub description: String,
    pub parameters: Vec<CommandParameter>,
    pub handler: Arc<dyn CommandHandler>,
}

impl Command {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
            handler: Arc::new(handler),
        }
    }

    /// Append a parameter. Order is kept when the command is installed.
    pub fn parameter(mut self, parameter: CommandParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Build the registration payload for this command.
    pub fn to_create_command(&self) -> CreateCommand {
        self.parameters.iter().fold(
            CreateCommand::new(&self.name).description(&self.description),
            |command, parameter| {
                command.add_option(
                    CreateCommandOption::new(
                        parameter.kind.into(),
                        &parameter.name,
                        &parameter.description,
                    )
                    .required(parameter.required),
                )
            },
        )
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}
