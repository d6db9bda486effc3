use crate::media::MediaElement;

/// Snapshot of the master element's playback. Never stored; read fresh from
/// the video whenever needed.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    pub is_playing: bool,
    pub current_time: f64,
    pub playback_rate: f64,
}

impl PlaybackState {
    pub fn of<E: MediaElement + ?Sized>(element: &E) -> Self {
        Self {
            is_playing: !element.is_paused(),
            current_time: element.current_time(),
            playback_rate: element.playback_rate(),
        }
    }
}
