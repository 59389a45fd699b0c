//! Songbird-backed [`AudioSink`].

use std::sync::{Arc, PoisonError};

use serenity::all::GuildId;
use serenity::async_trait;
use songbird::input::{File, HttpRequest, Input};
use songbird::tracks::TrackHandle;
use songbird::{Call, Event, EventContext, Songbird, TrackEvent};
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, warn};
use url::Url;

use crate::player::{AudioSink, PlaybackError, SinkControls};

#[derive(Debug, Clone, Copy)]
enum TrackEnd {
    Finished,
    Failed,
}

type EndSlot = Arc<std::sync::Mutex<Option<oneshot::Sender<TrackEnd>>>>;

/// Reports the first end-of-track event songbird raises for a track
struct TrackEndNotifier {
    slot: EndSlot,
    end: TrackEnd,
}

#[async_trait]
impl songbird::EventHandler for TrackEndNotifier {
    async fn act(&self, _ctx: &EventContext<'_>) -> Option<Event> {
        let sender = self.slot.lock().ok().and_then(|mut slot| slot.take());
        if let Some(sender) = sender {
            let _ = sender.send(self.end);
        }
        None
    }
}

struct TrackState {
    track: Option<TrackHandle>,
    volume: f32,
}

/// The track currently playing, shared with whoever adjusts it.
struct VoiceControls {
    state: std::sync::Mutex<TrackState>,
}

impl VoiceControls {
    fn with_state<T>(&self, f: impl FnOnce(&mut TrackState) -> T) -> T {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut state)
    }

    fn on_track(
        &self,
        f: impl FnOnce(&TrackHandle) -> songbird::tracks::TrackResult<()>,
    ) -> Result<(), PlaybackError> {
        self.with_state(|state| match &state.track {
            Some(track) => f(track).map_err(|e| PlaybackError::Sink(e.to_string())),
            None => Ok(()),
        })
    }

    fn take_track(&self) -> Option<TrackHandle> {
        self.with_state(|state| state.track.take())
    }
}

impl SinkControls for VoiceControls {
    fn pause(&self) -> Result<(), PlaybackError> {
        self.on_track(TrackHandle::pause)
    }

    fn resume(&self) -> Result<(), PlaybackError> {
        self.on_track(TrackHandle::play)
    }

    fn set_volume(&self, volume: f32) -> Result<(), PlaybackError> {
        self.with_state(|state| state.volume = volume);
        self.on_track(|track| track.set_volume(volume))
    }
}

/// Plays into a joined voice channel. Releasing it leaves the channel.
pub struct VoiceSink {
    manager: Arc<Songbird>,
    guild_id: GuildId,
    call: Arc<Mutex<Call>>,
    http: reqwest::Client,
    controls: Arc<VoiceControls>,
}

impl VoiceSink {
    pub fn new(manager: Arc<Songbird>, guild_id: GuildId, call: Arc<Mutex<Call>>) -> Self {
        Self {
            manager,
            guild_id,
            call,
            http: reqwest::Client::new(),
            controls: Arc::new(VoiceControls {
                state: std::sync::Mutex::new(TrackState {
                    track: None,
                    volume: 1.0,
                }),
            }),
        }
    }

    async fn open(&self, location: &str) -> Result<Input, PlaybackError> {
        if Url::parse(location).is_ok() {
            return Ok(HttpRequest::new(self.http.clone(), location.to_string()).into());
        }

        tokio::fs::metadata(location)
            .await
            .map_err(|e| PlaybackError::Open {
                location: location.to_string(),
                reason: e.to_string(),
            })?;

        Ok(File::new(location.to_string()).into())
    }
}

#[async_trait]
impl AudioSink for VoiceSink {
    async fn stream(&mut self, location: &str) -> Result<(), PlaybackError> {
        let input = self.open(location).await?;

        let track = self.call.lock().await.play_only_input(input);
        let volume = self.controls.with_state(|state| {
            state.track = Some(track.clone());
            state.volume
        });
        if let Err(e) = track.set_volume(volume) {
            warn!("Could not set volume in guild {}: {}", self.guild_id, e);
        }

        let (tx, rx) = oneshot::channel();
        let slot: EndSlot = Arc::new(std::sync::Mutex::new(Some(tx)));

        for (event, end) in [
            (TrackEvent::End, TrackEnd::Finished),
            (TrackEvent::Error, TrackEnd::Failed),
        ] {
            track
                .add_event(
                    Event::Track(event),
                    TrackEndNotifier {
                        slot: Arc::clone(&slot),
                        end,
                    },
                )
                .map_err(|e| PlaybackError::Sink(e.to_string()))?;
        }

        let end = rx.await;
        self.controls.take_track();

        match end {
            Ok(TrackEnd::Finished) => {
                debug!("Finished {} in guild {}", location, self.guild_id);
                Ok(())
            }
            Ok(TrackEnd::Failed) => Err(PlaybackError::Stream {
                location: location.to_string(),
                reason: "songbird reported a playback error".into(),
            }),
            Err(_) => Err(PlaybackError::Sink(
                "track dropped without reporting an end".into(),
            )),
        }
    }

    async fn halt(&mut self) -> Result<(), PlaybackError> {
        if let Some(track) = self.controls.take_track() {
            track
                .stop()
                .map_err(|e| PlaybackError::Sink(e.to_string()))?;
        }
        Ok(())
    }

    async fn release(&mut self) -> Result<(), PlaybackError> {
        if let Some(track) = self.controls.take_track() {
            if let Err(e) = track.stop() {
                warn!("Could not stop track for guild {}: {}", self.guild_id, e);
            }
        }

        self.manager
            .remove(self.guild_id)
            .await
            .map_err(|e| PlaybackError::Sink(format!("failed to leave voice channel: {}", e)))
    }

    fn controls(&self) -> Arc<dyn SinkControls> {
        self.controls.clone()
    }
}
