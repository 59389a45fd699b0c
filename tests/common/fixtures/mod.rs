//! Invocations and canned collaborators used across the suites
use std::sync::{Arc, Mutex};

use daft::CommandError;
use daft::commands::youtube::{ResolveError, SourceResolver};
use daft::player::{AudioSink, GuildPlayers};
use daft::slash::{Actor, Invocation, OptionValue, ParameterValue};
use serenity::all::{ChannelId, GuildId, InteractionId, UserId};
use serenity::async_trait;

use super::ScriptedSink;

pub const GUILD: u64 = 110_000_000_000_000_001;
pub const TEXT_CHANNEL: u64 = 220_000_000_000_000_002;
pub const VOICE_CHANNEL: u64 = 330_000_000_000_000_003;
pub const USER: u64 = 440_000_000_000_000_004;

pub fn guild_id() -> GuildId {
    GuildId::new(GUILD)
}

fn actor() -> Actor {
    Actor {
        id: UserId::new(USER),
        name: "dj_kaj".to_string(),
    }
}

/// `/command` run by a member of [`GUILD`]
pub fn guild_invocation(command: &str, options: &[(&str, &str)]) -> Invocation {
    Invocation {
        id: InteractionId::new(1),
        guild_id: Some(guild_id()),
        channel_id: ChannelId::new(TEXT_CHANNEL),
        command_name: command.to_string(),
        options: options
            .iter()
            .map(|(name, value)| OptionValue::string(*name, *value))
            .collect(),
        member: Some(actor()),
        user: None,
    }
}

/// `/command` run from a direct message
pub fn dm_invocation(command: &str, options: &[(&str, &str)]) -> Invocation {
    Invocation {
        guild_id: None,
        member: None,
        user: Some(actor()),
        ..guild_invocation(command, options)
    }
}

/// Add an integer option, as Discord sends for integer parameters
pub fn with_integer(mut invocation: Invocation, name: &str, value: i64) -> Invocation {
    invocation.options.push(OptionValue {
        name: name.to_string(),
        value: ParameterValue::Integer(value),
    });
    invocation
}

pub fn sources(locations: &[&str]) -> Vec<String> {
    locations.iter().map(|location| location.to_string()).collect()
}

/// Resolver returning a fixed answer and remembering what it was asked
pub struct FakeResolver {
    urls: Option<Vec<String>>,
    pub queries: Mutex<Vec<String>>,
    /// Playback started in [`GUILD`] while resolving
    rival: Mutex<Option<(Arc<GuildPlayers>, ScriptedSink)>>,
}

impl FakeResolver {
    pub fn resolving_to(urls: &[&str]) -> Self {
        Self {
            urls: Some(sources(urls)),
            queries: Mutex::new(Vec::new()),
            rival: Mutex::new(None),
        }
    }

    /// While resolving, someone else starts `rival.mp3` in [`GUILD`]
    pub fn racing(mut self, players: Arc<GuildPlayers>, sink: ScriptedSink) -> Self {
        self.rival = Mutex::new(Some((players, sink)));
        self
    }

    pub fn failing() -> Self {
        Self {
            urls: None,
            queries: Mutex::new(Vec::new()),
            rival: Mutex::new(None),
        }
    }
}

#[async_trait]
impl SourceResolver for FakeResolver {
    async fn resolve(&self, query: &str) -> Result<Vec<String>, ResolveError> {
        self.queries.lock().unwrap().push(query.to_string());

        let rival = self.rival.lock().unwrap().take();
        if let Some((players, sink)) = rival {
            players
                .start(guild_id(), sources(&["rival.mp3"]), async move {
                    Ok::<Box<dyn AudioSink>, CommandError>(Box::new(sink))
                })
                .await
                .expect("rival playback should start");
        }

        self.urls
            .clone()
            .ok_or_else(|| ResolveError::Empty(query.to_string()))
    }
}
