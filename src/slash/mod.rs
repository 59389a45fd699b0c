//! Slash command plumbing: command descriptors, the registry that routes
//! interactions to them, and the session capabilities handlers work with.

pub mod command;
pub mod install;
pub mod interaction;
pub mod registry;
pub mod session;

pub use command::{Command, CommandHandler, CommandParameter, ParameterKind};
pub use interaction::{Actor, Invocation, OptionValue, ParameterValue};
pub use registry::{DefaultErrorHandler, ErrorHandler, Registry};
pub use session::{Session, SessionError, Visibility};
