//! In-memory media elements for exercising the synchronizer without GStreamer.

use super::{MediaBackend, MediaElement, MediaEvent, MediaKind};
use crate::error::{PlayerError, PlayerResult};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
pub struct MockRecord {
    pub play_calls: usize,
    pub pause_calls: usize,
    pub seek_calls: Vec<f64>,
    pub rate_calls: Vec<f64>,
    pub dropped: bool,
}

/// Element whose calls are recorded into a shared [`MockRecord`], so tests can
/// inspect an element after the synchronizer has dropped it.
#[derive(Debug)]
pub struct MockElement {
    kind: MediaKind,
    source: String,
    paused: bool,
    ended: bool,
    time: f64,
    rate: f64,
    muted: bool,
    pub reject_play: bool,
    events: Vec<MediaEvent>,
    pub record: Rc<RefCell<MockRecord>>,
}

impl MockElement {
    pub fn new(kind: MediaKind, source: &str) -> Self {
        Self {
            kind,
            source: source.to_string(),
            paused: true,
            ended: false,
            time: 0.0,
            rate: 1.0,
            muted: false,
            reject_play: false,
            events: Vec::new(),
            record: Rc::new(RefCell::new(MockRecord::default())),
        }
    }

    /// Moves the clock without raising an event, like natural playback does.
    pub fn advance_to(&mut self, seconds: f64) {
        self.time = seconds;
    }

    /// Simulates reaching end of stream.
    pub fn finish(&mut self) {
        self.paused = true;
        self.ended = true;
        self.events.push(MediaEvent::Ended);
    }
}

impl MediaElement for MockElement {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn play(&mut self) -> PlayerResult<()> {
        self.record.borrow_mut().play_calls += 1;
        if self.reject_play {
            return Err(PlayerError::PlaybackRejected {
                source_uri: self.source.clone(),
                reason: "autoplay blocked".to_string(),
            });
        }
        if self.ended {
            self.seek(0.0)?;
        }
        self.paused = false;
        self.events.push(MediaEvent::Play);
        Ok(())
    }

    fn pause(&mut self) -> PlayerResult<()> {
        self.record.borrow_mut().pause_calls += 1;
        self.paused = true;
        self.events.push(MediaEvent::Pause);
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.time
    }

    fn seek(&mut self, seconds: f64) -> PlayerResult<()> {
        if !seconds.is_finite() {
            return Err(PlayerError::InvalidPosition(seconds));
        }
        self.record.borrow_mut().seek_calls.push(seconds);
        self.ended = false;
        self.time = seconds.max(0.0);
        self.events.push(MediaEvent::Seeked);
        Ok(())
    }

    fn playback_rate(&self) -> f64 {
        self.rate
    }

    fn set_playback_rate(&mut self, rate: f64) -> PlayerResult<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(PlayerError::InvalidRate(rate));
        }
        self.record.borrow_mut().rate_calls.push(rate);
        self.rate = rate;
        self.events.push(MediaEvent::RateChange);
        Ok(())
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn duration(&self) -> Option<f64> {
        Some(120.0)
    }

    fn take_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Drop for MockElement {
    fn drop(&mut self) {
        self.record.borrow_mut().dropped = true;
    }
}

/// Hands out mock elements and keeps a handle on every record it created.
#[derive(Default)]
pub struct MockBackend {
    pub videos: Vec<Rc<RefCell<MockRecord>>>,
    pub audios: Vec<Rc<RefCell<MockRecord>>>,
    pub reject_audio_play: bool,
    pub reject_open_audio: bool,
}

impl MediaBackend for MockBackend {
    type Video = MockElement;
    type Audio = MockElement;

    fn open_video(&mut self, uri: &str) -> PlayerResult<MockElement> {
        let element = MockElement::new(MediaKind::Video, uri);
        self.videos.push(element.record.clone());
        Ok(element)
    }

    fn open_audio(&mut self, uri: &str) -> PlayerResult<MockElement> {
        if self.reject_open_audio {
            return Err(PlayerError::InvalidSource(format!("{}: not found", uri)));
        }
        let mut element = MockElement::new(MediaKind::Audio, uri);
        element.reject_play = self.reject_audio_play;
        self.audios.push(element.record.clone());
        Ok(element)
    }
}
