use crate::error::{PlayerError, PlayerResult};
use crate::media::{MediaBackend, MediaElement, MediaEvent};
use crate::sync::binding::FollowerBinding;
use crate::types::playback_state::PlaybackState;
use crate::types::race_media::RaceMedia;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Bound { has_commentary: bool },
    TornDown,
}

pub type CompletionCallback = Box<dyn FnMut(&RaceMedia)>;

struct Mounted<B: MediaBackend> {
    media: RaceMedia,
    video: B::Video,
    commentary: Option<FollowerBinding<B::Audio>>,
}

/// Plays a race's footage with its commentary track slaved to it.
///
/// The video is the master clock. With commentary present the video is kept
/// muted and every play, pause, seek, end and rate change on it is mirrored
/// onto the commentary. Without commentary the video plays with its own sound
/// and no audio element exists.
pub struct MediaSynchronizer<B: MediaBackend> {
    backend: B,
    mounted: Option<Mounted<B>>,
    torn_down: bool,
    on_complete: Option<CompletionCallback>,
}

impl<B: MediaBackend> MediaSynchronizer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            mounted: None,
            torn_down: false,
            on_complete: None,
        }
    }

    /// Called once for every time the video reaches its end.
    pub fn with_completion(mut self, callback: impl FnMut(&RaceMedia) + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    pub fn state(&self) -> SyncState {
        match (&self.mounted, self.torn_down) {
            (Some(mounted), _) => SyncState::Bound {
                has_commentary: mounted.commentary.is_some(),
            },
            (None, true) => SyncState::TornDown,
            (None, false) => SyncState::Idle,
        }
    }

    pub fn mount(&mut self, media: &RaceMedia) -> PlayerResult<()> {
        if self.mounted.is_some() {
            return self.update(media);
        }

        let mut video = self.backend.open_video(&media.video_source)?;
        let commentary = match media.commentary() {
            Some(source) => {
                video.set_muted(true);
                let audio = self.backend.open_audio(source)?;
                Some(bind_commentary(&video, audio))
            }
            None => {
                video.set_muted(false);
                None
            }
        };

        tracing::info!(
            race = %media.race_id,
            has_commentary = commentary.is_some(),
            "race media mounted"
        );
        self.mounted = Some(Mounted {
            media: media.clone(),
            video,
            commentary,
        });
        self.torn_down = false;
        Ok(())
    }

    /// Applies new race media. A different video means a fresh mount; a
    /// different commentary source replaces the binding.
    pub fn update(&mut self, media: &RaceMedia) -> PlayerResult<()> {
        let Some(mounted) = self.mounted.as_mut() else {
            return self.mount(media);
        };

        if mounted.media.video_source != media.video_source {
            self.mounted = None;
            return self.mount(media);
        }

        // A commentary that failed to open earlier is retried
        let unbound = media.has_commentary() && mounted.commentary.is_none();
        let changed = mounted.media.commentary() != media.commentary();
        mounted.media = media.clone();
        if !changed && !unbound {
            return Ok(());
        }

        // The old follower goes before anything else can touch it
        mounted.commentary = None;
        match media.commentary() {
            Some(source) => {
                // Stays muted even if the open fails: race audio never plays
                // while a commentary source is set
                mounted.video.set_muted(true);
                let audio = self.backend.open_audio(source)?;
                mounted.commentary = Some(bind_commentary(&mounted.video, audio));
            }
            None => mounted.video.set_muted(false),
        }
        Ok(())
    }

    pub fn unmount(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            tracing::info!(race = %mounted.media.race_id, "race media unmounted");
            self.torn_down = true;
        }
    }

    /// Mirrors one video transition onto the commentary.
    pub fn dispatch(&mut self, event: MediaEvent) {
        let Some(mounted) = self.mounted.as_mut() else {
            tracing::debug!(?event, "no media mounted, event ignored");
            return;
        };
        tracing::debug!(?event, race = %mounted.media.race_id, "video event");

        if let Some(binding) = mounted.commentary.as_mut() {
            binding.follow(&mounted.video, event);
            if !mounted.video.is_muted() {
                tracing::warn!(race = %mounted.media.race_id, "video unmuted under commentary, muting again");
                mounted.video.set_muted(true);
            }
        }

        if event == MediaEvent::Ended {
            if let Some(callback) = self.on_complete.as_mut() {
                callback(&mounted.media);
            }
        }
    }

    /// Dispatches everything the video has raised since the last pump.
    pub fn pump(&mut self) {
        let events = match self.mounted.as_mut() {
            Some(mounted) => {
                if let Some(binding) = mounted.commentary.as_mut() {
                    binding.follower_mut().take_events();
                }
                mounted.video.take_events()
            }
            None => return,
        };
        for event in events {
            self.dispatch(event);
        }
    }

    /// See [`FollowerBinding::correct_drift`]. No-op without commentary.
    pub fn resync_drift(&mut self, tolerance: f64) -> bool {
        match self.mounted.as_mut() {
            Some(Mounted {
                video,
                commentary: Some(binding),
                ..
            }) => binding.correct_drift(&*video, tolerance),
            _ => false,
        }
    }

    pub fn has_commentary(&self) -> bool {
        matches!(
            self.state(),
            SyncState::Bound {
                has_commentary: true
            }
        )
    }

    pub fn media(&self) -> Option<&RaceMedia> {
        self.mounted.as_ref().map(|m| &m.media)
    }

    pub fn playback_state(&self) -> Option<PlaybackState> {
        self.mounted.as_ref().map(|m| PlaybackState::of(&m.video))
    }

    pub fn video(&self) -> Option<&B::Video> {
        self.mounted.as_ref().map(|m| &m.video)
    }

    pub fn video_mut(&mut self) -> PlayerResult<&mut B::Video> {
        self.mounted
            .as_mut()
            .map(|m| &mut m.video)
            .ok_or(PlayerError::NotMounted)
    }

    pub fn follower(&self) -> Option<&B::Audio> {
        self.mounted
            .as_ref()
            .and_then(|m| m.commentary.as_ref())
            .map(|b| b.follower())
    }

    pub fn follower_failures(&self) -> usize {
        self.mounted
            .as_ref()
            .and_then(|m| m.commentary.as_ref())
            .map_or(0, |b| b.failures())
    }

    #[cfg(test)]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[cfg(test)]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

/// Binds a freshly opened follower, catching it up if the video is already
/// under way.
fn bind_commentary<V: MediaElement, A: MediaElement>(video: &V, audio: A) -> FollowerBinding<A> {
    let mut binding = FollowerBinding::new(audio);
    if video.current_time() > 0.0 {
        binding.follow(video, MediaEvent::Seeked);
    }
    if video.playback_rate() != 1.0 {
        binding.follow(video, MediaEvent::RateChange);
    }
    if !video.is_paused() {
        binding.follow(video, MediaEvent::Play);
    }
    binding
}
