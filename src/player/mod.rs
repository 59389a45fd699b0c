//! Per-guild playback: a queue of sources streamed one at a time into an
//! [`AudioSink`], with skip and stop signalled from other tasks.

mod sink;
mod table;

pub use sink::{AudioSink, PlaybackError, SinkControls};
pub use table::GuildPlayers;

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::{Mutex, oneshot};
use tracing::debug;

#[derive(Default)]
struct Queue {
    current: Option<String>,
    pending: VecDeque<String>,
    /// Only populated while an item is streaming
    interrupt: Option<oneshot::Sender<()>>,
    /// Present for the whole run, from before the first item until release
    controls: Option<Arc<dyn SinkControls>>,
    paused: bool,
    volume: Option<f32>,
}

impl Queue {
    /// Fire the interrupt slot if an item is in flight.
    fn interrupt(&mut self) -> bool {
        match self.interrupt.take() {
            // the receiver may already be gone if the item just finished
            Some(interrupt) => interrupt.send(()).is_ok(),
            None => false,
        }
    }

    /// Controls of the sink, but only while an item is streaming.
    fn streaming_controls(&self) -> Option<Arc<dyn SinkControls>> {
        self.interrupt.as_ref().and(self.controls.clone())
    }
}

enum Outcome {
    Finished(Result<(), PlaybackError>),
    Interrupted,
}

/// Plays an ordered list of sources. Consumed front to back, no repeat.
///
/// Runs are started through [`GuildPlayers::start`], which gives each player
/// exactly one run.
pub struct Player {
    queue: Mutex<Queue>,
}

impl Player {
    pub fn new(sources: impl IntoIterator<Item = String>) -> Self {
        Self {
            queue: Mutex::new(Queue {
                pending: sources.into_iter().collect(),
                ..Default::default()
            }),
        }
    }

    /// Stream every queued source into `sink`, then release it.
    ///
    /// The sink is released on every path out of here, including errors.
    pub(crate) async fn play(&self, mut sink: Box<dyn AudioSink>) -> Result<(), PlaybackError> {
        let result = match self.attach(sink.controls()).await {
            Ok(()) => self.run(sink.as_mut()).await,
            Err(err) => Err(err),
        };

        {
            let mut queue = self.queue.lock().await;
            queue.current = None;
            queue.interrupt = None;
            queue.controls = None;
            queue.paused = false;
        }

        let released = sink.release().await;
        result.and(released)
    }

    // A volume chosen before the run started still applies.
    async fn attach(&self, controls: Arc<dyn SinkControls>) -> Result<(), PlaybackError> {
        let mut queue = self.queue.lock().await;
        if let Some(volume) = queue.volume {
            controls.set_volume(volume)?;
        }
        queue.controls = Some(controls);
        Ok(())
    }

    async fn run(&self, sink: &mut dyn AudioSink) -> Result<(), PlaybackError> {
        loop {
            let (location, mut interrupted) = {
                let mut queue = self.queue.lock().await;
                let Some(location) = queue.pending.pop_front() else {
                    return Ok(());
                };

                let (tx, rx) = oneshot::channel();
                queue.current = Some(location.clone());
                queue.interrupt = Some(tx);
                queue.paused = false;

                debug!(
                    "Starting song {} ({} more queued)",
                    location,
                    queue.pending.len()
                );
                (location, rx)
            };

            let outcome = tokio::select! {
                result = sink.stream(&location) => Outcome::Finished(result),
                Ok(()) = &mut interrupted => Outcome::Interrupted,
            };

            // Drop this item's slot before anything else can observe it.
            self.queue.lock().await.interrupt = None;

            match outcome {
                Outcome::Finished(result) => result?,
                Outcome::Interrupted => {
                    debug!("Interrupted {}", location);
                    sink.halt().await?;
                }
            }
        }
    }

    /// Skip to the next queued source. Returns whether a playing item was
    /// signalled; with nothing playing this does nothing.
    pub async fn next(&self) -> bool {
        self.queue.lock().await.interrupt()
    }

    /// Drop everything queued and cut off the current source.
    pub async fn stop(&self) -> bool {
        let mut queue = self.queue.lock().await;
        queue.pending.clear();
        queue.interrupt()
    }

    /// Pause the source currently streaming. Returns whether anything was
    /// paused; `false` when already paused or between sources.
    pub async fn pause(&self) -> Result<bool, PlaybackError> {
        let mut queue = self.queue.lock().await;
        let Some(controls) = queue.streaming_controls() else {
            return Ok(false);
        };
        if queue.paused {
            return Ok(false);
        }

        controls.pause()?;
        queue.paused = true;
        Ok(true)
    }

    /// Resume a paused source. Returns whether anything was resumed.
    pub async fn resume(&self) -> Result<bool, PlaybackError> {
        let mut queue = self.queue.lock().await;
        let Some(controls) = queue.streaming_controls() else {
            return Ok(false);
        };
        if !queue.paused {
            return Ok(false);
        }

        controls.resume()?;
        queue.paused = false;
        Ok(true)
    }

    /// Set the volume for the rest of the run, `1.0` being unchanged.
    pub async fn set_volume(&self, volume: f32) -> Result<(), PlaybackError> {
        let mut queue = self.queue.lock().await;
        if let Some(controls) = &queue.controls {
            controls.set_volume(volume)?;
        }
        queue.volume = Some(volume);
        Ok(())
    }

    pub async fn is_paused(&self) -> bool {
        self.queue.lock().await.paused
    }

    /// Source currently streaming
    pub async fn current(&self) -> Option<String> {
        self.queue.lock().await.current.clone()
    }

    /// Sources still waiting, next first
    pub async fn pending(&self) -> Vec<String> {
        self.queue.lock().await.pending.iter().cloned().collect()
    }
}
