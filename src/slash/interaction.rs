use std::fmt;

use serenity::all::{
    ChannelId, CommandDataOptionValue, CommandInteraction, GuildId, InteractionId, User, UserId,
};

use crate::error::CommandError;

/// The user behind an interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub name: String,
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
        }
    }
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    String(String),
    Integer(i64),
    Number(f64),
    Boolean(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OptionValue {
    pub name: String,
    pub value: ParameterValue,
}

impl OptionValue {
    pub fn string(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: ParameterValue::String(value.into()),
        }
    }
}

/// An inbound slash command invocation, detached from the gateway types.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    pub id: InteractionId,
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    pub command_name: String,
    pub options: Vec<OptionValue>,
    /// Set when invoked inside a guild
    pub member: Option<Actor>,
    /// Set when invoked from a direct message
    pub user: Option<Actor>,
}

impl Invocation {
    /// The user that created the interaction either in a DM or guild
    pub fn acting_user(&self) -> Option<&Actor> {
        self.member.as_ref().or(self.user.as_ref())
    }

    pub fn option(&self, name: &str) -> Option<&ParameterValue> {
        self.options
            .iter()
            .find(|option| option.name == name)
            .map(|option| &option.value)
    }

    /// Fetch a required string option.
    pub fn string(&self, name: &str) -> Result<&str, CommandError> {
        match self.option(name) {
            Some(ParameterValue::String(value)) => Ok(value.as_str()),
            Some(_) => Err(CommandError::usage(format!("{name} must be text"))),
            None => Err(CommandError::usage(format!("missing required option {name}"))),
        }
    }

    /// Fetch a required integer option.
    pub fn integer(&self, name: &str) -> Result<i64, CommandError> {
        match self.option(name) {
            Some(ParameterValue::Integer(value)) => Ok(*value),
            Some(_) => Err(CommandError::usage(format!("{name} must be a whole number"))),
            None => Err(CommandError::usage(format!("missing required option {name}"))),
        }
    }
}

impl From<&CommandInteraction> for Invocation {
    fn from(interaction: &CommandInteraction) -> Self {
        let options = interaction
            .data
            .options
            .iter()
            .filter_map(|option| {
                let value = match &option.value {
                    CommandDataOptionValue::String(value) => ParameterValue::String(value.clone()),
                    CommandDataOptionValue::Integer(value) => ParameterValue::Integer(*value),
                    CommandDataOptionValue::Number(value) => ParameterValue::Number(*value),
                    CommandDataOptionValue::Boolean(value) => ParameterValue::Boolean(*value),
                    // subcommands, mentions and attachments are not used by any command
                    _ => return None,
                };
                Some(OptionValue {
                    name: option.name.clone(),
                    value,
                })
            })
            .collect();

        let member = interaction
            .member
            .as_ref()
            .map(|member| Actor::from(&member.user));
        let user = member.is_none().then(|| Actor::from(&interaction.user));

        Self {
            id: interaction.id,
            guild_id: interaction.guild_id,
            channel_id: interaction.channel_id,
            command_name: interaction.data.name.clone(),
            options,
            member,
            user,
        }
    }
}
