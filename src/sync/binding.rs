use crate::media::{MediaElement, MediaEvent};

/// One-way link from a master element to a follower. The follower mirrors the
/// master's transitions; nothing on the follower ever reaches the master.
pub struct FollowerBinding<A: MediaElement> {
    follower: A,
    failures: usize,
}

impl<A: MediaElement> FollowerBinding<A> {
    pub fn new(follower: A) -> Self {
        tracing::info!(
            source = follower.source(),
            kind = ?follower.kind(),
            "commentary bound to video"
        );
        Self {
            follower,
            failures: 0,
        }
    }

    pub fn follower(&self) -> &A {
        &self.follower
    }

    pub fn follower_mut(&mut self) -> &mut A {
        &mut self.follower
    }

    /// Number of follower controls that failed and were swallowed.
    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Applies one master transition to the follower. Failures are logged and
    /// counted, never returned: the master keeps playing regardless.
    pub fn follow<M: MediaElement + ?Sized>(&mut self, master: &M, event: MediaEvent) {
        let result = match event {
            MediaEvent::Play => self.follower.play(),
            MediaEvent::Pause => self.follower.pause(),
            MediaEvent::Seeked => self.follower.seek(master.current_time()),
            MediaEvent::Ended => self
                .follower
                .pause()
                .and_then(|_| self.follower.seek(0.0)),
            MediaEvent::RateChange => self.follower.set_playback_rate(master.playback_rate()),
        };

        if let Err(err) = result {
            self.failures += 1;
            tracing::warn!(?event, error = %err, "commentary failed to follow video");
        }

        // Follower notifications are never fed back
        let echoed = self.follower.take_events();
        if !echoed.is_empty() {
            tracing::trace!(?echoed, "discarding follower events");
        }
    }

    /// Hard-seeks the follower back onto the master once they drift apart by
    /// more than `tolerance` seconds. Returns whether a correction was made.
    pub fn correct_drift<M: MediaElement + ?Sized>(&mut self, master: &M, tolerance: f64) -> bool {
        if master.is_paused() {
            return false;
        }
        let target = master.current_time();
        let drift = (self.follower.current_time() - target).abs();
        if drift <= tolerance {
            return false;
        }
        tracing::debug!(drift, target, "resyncing commentary");
        if let Err(err) = self.follower.seek(target) {
            self.failures += 1;
            tracing::warn!(error = %err, "commentary resync failed");
            return false;
        }
        self.follower.take_events();
        true
    }
}

impl<A: MediaElement> Drop for FollowerBinding<A> {
    fn drop(&mut self) {
        tracing::info!(source = self.follower.source(), "commentary binding torn down");
    }
}
