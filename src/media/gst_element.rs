use super::{MediaBackend, MediaElement, MediaEvent, MediaKind};
use crate::error::{PlayerError, PlayerResult};
use crate::renderer::frame_sink::{FrameSink, VideoFrame};
use crate::types::race_media::resolve_uri;
use gst::prelude::*;
use gstreamer as gst;

/// A media element backed by a single `playbin`.
pub struct GstMediaElement {
    kind: MediaKind,
    source: String,
    playbin: gst::Element,
    bus: gst::Bus,
    frame_sink: Option<FrameSink>,
    paused: bool,
    ended: bool,
    rate: f64,
    // Position reported until the pipeline finishes the seek
    seek_target: Option<f64>,
    load_error: Option<String>,
    events: Vec<MediaEvent>,
}

impl GstMediaElement {
    /// Builds the pipeline and prerolls it in PAUSED.
    pub fn open(kind: MediaKind, uri: &str) -> PlayerResult<Self> {
        let _ = gst::init(); // Safe to call multiple times

        let playbin = gst::ElementFactory::make("playbin")
            .property("uri", uri)
            .build()?;

        let frame_sink = match kind {
            MediaKind::Video => {
                let sink = FrameSink::new();
                playbin.set_property("video-sink", sink.element());
                Some(sink)
            }
            MediaKind::Audio => {
                let fakesink = gst::ElementFactory::make("fakesink").build()?;
                playbin.set_property("video-sink", &fakesink);
                None
            }
        };

        let bus = playbin.bus().ok_or_else(|| {
            PlayerError::InvalidSource(format!("{}: pipeline has no bus", uri))
        })?;

        playbin.set_state(gst::State::Paused)?;
        tracing::debug!(?kind, uri, "pipeline prerolling");

        Ok(Self {
            kind,
            source: uri.to_string(),
            playbin,
            bus,
            frame_sink,
            paused: true,
            ended: false,
            rate: 1.0,
            seek_target: None,
            load_error: None,
            events: Vec::new(),
        })
    }

    pub fn pull_frame(&self) -> Option<VideoFrame> {
        self.frame_sink.as_ref()?.pull_frame()
    }

    fn position(&self) -> gst::ClockTime {
        self.playbin
            .query_position::<gst::ClockTime>()
            .unwrap_or(gst::ClockTime::ZERO)
    }

    fn seek_with_rate(&self, rate: f64, position: gst::ClockTime) -> PlayerResult<()> {
        self.playbin.seek(
            rate,
            gst::SeekFlags::FLUSH | gst::SeekFlags::ACCURATE,
            gst::SeekType::Set,
            position,
            gst::SeekType::End,
            gst::ClockTime::ZERO,
        )?;
        Ok(())
    }

    fn drain_bus(&mut self) {
        while let Some(msg) = self.bus.pop() {
            match msg.view() {
                gst::MessageView::Eos(..) => {
                    // Park the pipeline so a later seek does not resume it
                    if let Err(err) = self.playbin.set_state(gst::State::Paused) {
                        tracing::warn!(source = %self.source, error = %err, "failed to pause at end of stream");
                    }
                    self.paused = true;
                    self.ended = true;
                    self.events.push(MediaEvent::Ended);
                }
                gst::MessageView::AsyncDone(..) => {
                    self.seek_target = None;
                }
                gst::MessageView::Error(err) => {
                    let reason = err.error().to_string();
                    tracing::warn!(source = %self.source, %reason, "media element error");
                    self.load_error = Some(reason);
                }
                gst::MessageView::Warning(warn) => {
                    tracing::debug!(source = %self.source, warning = %warn.error(), "media element warning");
                }
                _ => {}
            }
        }
    }
}

// Far beyond any race, and well clear of GST_CLOCK_TIME_NONE
const MAX_POSITION_SECS: f64 = 1.0e9;

fn to_clock_time(seconds: f64) -> gst::ClockTime {
    let seconds = if seconds.is_nan() {
        0.0
    } else {
        seconds.clamp(0.0, MAX_POSITION_SECS)
    };
    gst::ClockTime::from_nseconds((seconds * 1_000_000_000.0) as u64)
}

impl MediaElement for GstMediaElement {
    fn kind(&self) -> MediaKind {
        self.kind
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn play(&mut self) -> PlayerResult<()> {
        self.drain_bus();
        if let Some(reason) = &self.load_error {
            return Err(PlayerError::PlaybackRejected {
                source_uri: self.source.clone(),
                reason: reason.clone(),
            });
        }
        if self.ended {
            // Playing an ended element starts it over
            self.seek(0.0)?;
        }
        self.playbin.set_state(gst::State::Playing)?;
        self.paused = false;
        self.events.push(MediaEvent::Play);
        Ok(())
    }

    fn pause(&mut self) -> PlayerResult<()> {
        self.playbin.set_state(gst::State::Paused)?;
        self.paused = true;
        self.events.push(MediaEvent::Pause);
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        match self.seek_target {
            Some(target) => target,
            None => self.position().nseconds() as f64 / 1_000_000_000.0,
        }
    }

    fn seek(&mut self, seconds: f64) -> PlayerResult<()> {
        if !seconds.is_finite() {
            return Err(PlayerError::InvalidPosition(seconds));
        }
        let seconds = seconds.max(0.0);
        self.seek_with_rate(self.rate, to_clock_time(seconds))?;
        self.ended = false;
        self.seek_target = Some(seconds);
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
        let position = match self.seek_target {
            Some(target) => to_clock_time(target),
            None => self.position(),
        };
        self.seek_with_rate(rate, position)?;
        self.rate = rate;
        self.events.push(MediaEvent::RateChange);
        Ok(())
    }

    fn is_muted(&self) -> bool {
        self.playbin.property::<bool>("mute")
    }

    fn set_muted(&mut self, muted: bool) {
        self.playbin.set_property("mute", muted);
        self.playbin
            .set_property("volume", if muted { 0.0f64 } else { 1.0f64 });
    }

    fn duration(&self) -> Option<f64> {
        self.playbin
            .query_duration::<gst::ClockTime>()
            .map(|d| d.nseconds() as f64 / 1_000_000_000.0)
    }

    fn take_events(&mut self) -> Vec<MediaEvent> {
        self.drain_bus();
        std::mem::take(&mut self.events)
    }
}

impl Drop for GstMediaElement {
    fn drop(&mut self) {
        self.playbin.set_state(gst::State::Null).ok();
    }
}

/// Opens `playbin` elements from URIs or local paths.
#[derive(Debug, Default)]
pub struct GstBackend;

impl MediaBackend for GstBackend {
    type Video = GstMediaElement;
    type Audio = GstMediaElement;

    fn open_video(&mut self, uri: &str) -> PlayerResult<GstMediaElement> {
        GstMediaElement::open(MediaKind::Video, &resolve_uri(uri)?)
    }

    fn open_audio(&mut self, uri: &str) -> PlayerResult<GstMediaElement> {
        GstMediaElement::open(MediaKind::Audio, &resolve_uri(uri)?)
    }
}
