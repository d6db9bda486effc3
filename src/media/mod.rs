pub mod gst_element;
#[cfg(test)]
pub mod mock;

use crate::error::PlayerResult;

/// Notifications a media element raises after its playback state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    Play,
    Pause,
    Seeked,
    Ended,
    RateChange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

/// The part of a playable media element the synchronizer drives.
///
/// Controls that succeed queue the matching [`MediaEvent`]; end of stream
/// queues [`MediaEvent::Ended`]. Events are collected with `take_events`.
pub trait MediaElement {
    fn kind(&self) -> MediaKind;
    fn source(&self) -> &str;

    fn play(&mut self) -> PlayerResult<()>;
    fn pause(&mut self) -> PlayerResult<()>;
    fn is_paused(&self) -> bool;

    /// Position in seconds.
    fn current_time(&self) -> f64;
    fn seek(&mut self, seconds: f64) -> PlayerResult<()>;

    fn playback_rate(&self) -> f64;
    /// Rejects rates that are not finite and positive.
    fn set_playback_rate(&mut self, rate: f64) -> PlayerResult<()>;

    fn is_muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);

    fn duration(&self) -> Option<f64>;

    fn take_events(&mut self) -> Vec<MediaEvent>;
}

/// Opens media elements for a mount.
pub trait MediaBackend {
    type Video: MediaElement;
    type Audio: MediaElement;

    fn open_video(&mut self, uri: &str) -> PlayerResult<Self::Video>;
    fn open_audio(&mut self, uri: &str) -> PlayerResult<Self::Audio>;
}
