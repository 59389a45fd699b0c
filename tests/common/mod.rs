//! Common test utilities, fixtures, and fakes
//! Shared by the dispatcher, player and command test suites.
#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use daft::player::{AudioSink, PlaybackError, SinkControls};
use daft::slash::{Session, SessionError, Visibility};
use serenity::all::{ChannelId, GuildId, UserId};
use serenity::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Upper bound for anything a test waits on
pub const WAIT: Duration = Duration::from_secs(5);

/// Something a command sent back through the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Response(String, Visibility),
    Edit(String),
    Followup(String, Visibility),
}

/// Session that records every message and behaves like Discord when asked
/// about a response that was never sent.
#[derive(Default)]
pub struct FakeSession {
    sent: Mutex<Vec<Sent>>,
    responded: AtomicBool,
    failing: bool,
    voice_channel: Option<ChannelId>,
    sinks: Mutex<VecDeque<ScriptedSink>>,
    joins: AtomicUsize,
}

impl FakeSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put the caller in a voice channel
    pub fn in_voice(mut self, channel_id: u64) -> Self {
        self.voice_channel = Some(ChannelId::new(channel_id));
        self
    }

    /// Hand out `sink` on the next voice join
    pub fn with_sink(self, sink: ScriptedSink) -> Self {
        self.sinks.lock().unwrap().push_back(sink);
        self
    }

    /// Every outgoing message fails
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    /// How many times a command asked to join voice
    pub fn joins(&self) -> usize {
        self.joins.load(Ordering::SeqCst)
    }

    fn record(&self, message: Sent) -> Result<(), SessionError> {
        if self.failing {
            return Err(SessionError::Http("503 Service Unavailable".into()));
        }
        self.sent.lock().unwrap().push(message);
        self.responded.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl Session for FakeSession {
    async fn respond(&self, content: &str, visibility: Visibility) -> Result<(), SessionError> {
        self.record(Sent::Response(content.to_string(), visibility))
    }

    async fn edit_response(&self, content: &str) -> Result<(), SessionError> {
        self.record(Sent::Edit(content.to_string()))
    }

    async fn followup(&self, content: &str, visibility: Visibility) -> Result<(), SessionError> {
        self.record(Sent::Followup(content.to_string(), visibility))
    }

    async fn has_responded(&self) -> Result<bool, SessionError> {
        if self.responded.load(Ordering::SeqCst) {
            Ok(true)
        } else {
            Err(SessionError::NotFound)
        }
    }

    fn voice_channel_of(&self, _guild_id: GuildId, _user_id: UserId) -> Option<ChannelId> {
        self.voice_channel
    }

    async fn join_voice(
        &self,
        _guild_id: GuildId,
        _channel_id: ChannelId,
    ) -> Result<Box<dyn AudioSink>, SessionError> {
        self.joins.fetch_add(1, Ordering::SeqCst);
        match self.sinks.lock().unwrap().pop_front() {
            Some(sink) => Ok(Box::new(sink)),
            None => Err(SessionError::Voice("no voice server".into())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Started(String),
    Finished(String),
    Halted,
    Released,
    Paused,
    Resumed,
    Volume(f32),
}

/// Sink whose songs only end when the test says so.
pub struct ScriptedSink {
    log: Arc<Mutex<Vec<SinkEvent>>>,
    started: UnboundedSender<String>,
    finish: UnboundedReceiver<()>,
    fail_on: Option<String>,
}

/// Test side of a [`ScriptedSink`]
pub struct SinkRemote {
    log: Arc<Mutex<Vec<SinkEvent>>>,
    pub started: UnboundedReceiver<String>,
    finish: UnboundedSender<()>,
}

pub fn scripted_sink() -> (ScriptedSink, SinkRemote) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (started_tx, started_rx) = mpsc::unbounded_channel();
    let (finish_tx, finish_rx) = mpsc::unbounded_channel();

    (
        ScriptedSink {
            log: log.clone(),
            started: started_tx,
            finish: finish_rx,
            fail_on: None,
        },
        SinkRemote {
            log,
            started: started_rx,
            finish: finish_tx,
        },
    )
}

impl ScriptedSink {
    /// Fail as soon as `location` starts streaming
    pub fn failing_on(mut self, location: &str) -> Self {
        self.fail_on = Some(location.to_string());
        self
    }

    fn push(&self, event: SinkEvent) {
        self.log.lock().unwrap().push(event);
    }
}

#[async_trait]
impl AudioSink for ScriptedSink {
    async fn stream(&mut self, location: &str) -> Result<(), PlaybackError> {
        self.push(SinkEvent::Started(location.to_string()));
        let _ = self.started.send(location.to_string());

        if self.fail_on.as_deref() == Some(location) {
            return Err(PlaybackError::Stream {
                location: location.to_string(),
                reason: "corrupt frame".into(),
            });
        }

        self.finish.recv().await;
        self.push(SinkEvent::Finished(location.to_string()));
        Ok(())
    }

    async fn halt(&mut self) -> Result<(), PlaybackError> {
        self.push(SinkEvent::Halted);
        Ok(())
    }

    async fn release(&mut self) -> Result<(), PlaybackError> {
        self.push(SinkEvent::Released);
        Ok(())
    }

    fn controls(&self) -> Arc<dyn SinkControls> {
        Arc::new(ScriptedControls {
            log: self.log.clone(),
        })
    }
}

/// Controls that only log what they were asked to do
struct ScriptedControls {
    log: Arc<Mutex<Vec<SinkEvent>>>,
}

impl ScriptedControls {
    fn push(&self, event: SinkEvent) -> Result<(), PlaybackError> {
        self.log.lock().unwrap().push(event);
        Ok(())
    }
}

impl SinkControls for ScriptedControls {
    fn pause(&self) -> Result<(), PlaybackError> {
        self.push(SinkEvent::Paused)
    }

    fn resume(&self) -> Result<(), PlaybackError> {
        self.push(SinkEvent::Resumed)
    }

    fn set_volume(&self, volume: f32) -> Result<(), PlaybackError> {
        self.push(SinkEvent::Volume(volume))
    }
}

impl SinkRemote {
    /// Wait for the next song to start streaming
    pub async fn next_started(&mut self) -> String {
        tokio::time::timeout(WAIT, self.started.recv())
            .await
            .expect("timed out waiting for a song to start")
            .expect("sink was dropped")
    }

    /// Let the song currently streaming run out
    pub fn finish_current(&self) {
        let _ = self.finish.send(());
    }

    pub fn events(&self) -> Vec<SinkEvent> {
        self.log.lock().unwrap().clone()
    }
}
