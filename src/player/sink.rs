use std::sync::Arc;

use serenity::async_trait;
use thiserror::Error;

/// Errors that can occur while a player is streaming
#[derive(Error, Debug)]
pub enum PlaybackError {
    #[error("could not open {location}: {reason}")]
    Open { location: String, reason: String },

    #[error("streaming {location} failed: {reason}")]
    Stream { location: String, reason: String },

    #[error("audio sink error: {0}")]
    Sink(String),
}

/// Destination for a player's audio, normally a voice connection.
///
/// A sink is owned by exactly one playback run and released exactly once at
/// the end of it.
#[async_trait]
pub trait AudioSink: Send {
    /// Play `location` until it runs out.
    ///
    /// The returned future may be dropped part way through when the item is
    /// interrupted; `halt` is called right after.
    async fn stream(&mut self, location: &str) -> Result<(), PlaybackError>;

    /// Cut off whatever is currently playing.
    async fn halt(&mut self) -> Result<(), PlaybackError>;

    /// Disconnect. No other method is called afterwards.
    async fn release(&mut self) -> Result<(), PlaybackError>;

    /// Handle for adjusting playback while `stream` is running.
    fn controls(&self) -> Arc<dyn SinkControls>;
}

/// Live adjustments to a sink, usable from other tasks while it streams.
pub trait SinkControls: Send + Sync {
    fn pause(&self) -> Result<(), PlaybackError>;

    fn resume(&self) -> Result<(), PlaybackError>;

    /// Set the volume, where `1.0` is unchanged. Sticks for later items.
    fn set_volume(&self, volume: f32) -> Result<(), PlaybackError>;
}
