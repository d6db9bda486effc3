pub mod playback_state;
pub mod race_media;
