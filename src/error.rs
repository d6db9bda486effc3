use gstreamer as gst;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] gst::glib::BoolError),

    #[error("State change failed: {0}")]
    StateChange(#[from] gst::StateChangeError),

    /// The element refused to start, e.g. its source failed to load.
    #[error("Playback rejected for {source_uri}: {reason}")]
    PlaybackRejected { source_uri: String, reason: String },

    #[error("Invalid position: {0}")]
    InvalidPosition(f64),

    #[error("Invalid playback rate: {0}")]
    InvalidRate(f64),

    #[error("Invalid media source: {0}")]
    InvalidSource(String),

    #[error("Race card has no races")]
    EmptyRaceCard,

    #[error("Synchronizer is not mounted")]
    NotMounted,
}

pub type PlayerResult<T> = Result<T, PlayerError>;
