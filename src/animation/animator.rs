use instant::Instant;
use std::time::Duration;

use crate::animation::interpolation::Interpolator;

/// What an [`Animator`] produced for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimatorTick {
    /// Not started yet, or still inside the configured delay
    Pending,
    /// Running; carries the eased progress value
    Frame(f64),
    /// Terminal frame; carries the exact terminal value (1.0, or 0.0 when
    /// reversed). Produced exactly once.
    Finished(f64),
    /// The animator already completed or was cancelled
    Done,
}

/// Drives one time-boxed property transition.
///
/// An animator is a one-shot: `start` it once, then poll `tick` from the
/// frame loop until it reports [`AnimatorTick::Finished`]. The owner applies
/// the eased value to whatever property it animates; the animator itself
/// never touches engine state, which keeps it deterministic under a fixed
/// clock.
pub struct Animator {
    duration: Duration,
    delay: Duration,
    interpolator: Interpolator,
    reverse: bool,
    started_at: Option<Instant>,
    finish_requested: bool,
    done: bool,
    end_action: Option<Box<dyn FnOnce() + Send>>,
}

impl Animator {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            delay: Duration::ZERO,
            interpolator: Interpolator::Linear,
            reverse: false,
            started_at: None,
            finish_requested: false,
            done: false,
            end_action: None,
        }
    }

    /// Delays the first frame; the animator reports `Pending` until then
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_interpolator(mut self, interpolator: Interpolator) -> Self {
        self.interpolator = interpolator;
        self
    }

    /// Runs the transition backwards: eased values fall from 1 to 0 and the
    /// terminal value is 0.0
    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }

    /// Action invoked once, on the terminal frame
    pub fn with_end_action(mut self, action: impl FnOnce() + Send + 'static) -> Self {
        self.end_action = Some(Box::new(action));
        self
    }

    /// Records the start time. Each animator is started at most once.
    pub fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    /// Requests that the next tick jump straight to the terminal value
    pub fn finish(&mut self) {
        self.finish_requested = true;
    }

    /// Stops the animator without emitting the terminal frame or running
    /// the end action
    pub fn cancel(&mut self) {
        self.done = true;
        self.end_action = None;
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Advances the animator to `now`.
    ///
    /// If the finish flag and natural expiry race, a single `Finished` is
    /// produced.
    pub fn tick(&mut self, now: Instant) -> AnimatorTick {
        if self.done {
            return AnimatorTick::Done;
        }
        let Some(started_at) = self.started_at else {
            return AnimatorTick::Pending;
        };

        let elapsed = now.duration_since(started_at);

        if self.finish_requested || elapsed >= self.duration + self.delay {
            self.done = true;
            if let Some(action) = self.end_action.take() {
                action();
            }
            let terminal = if self.reverse { 0.0 } else { 1.0 };
            return AnimatorTick::Finished(terminal);
        }

        if elapsed < self.delay {
            return AnimatorTick::Pending;
        }

        let ratio =
            (elapsed - self.delay).as_secs_f64() / self.duration.as_secs_f64();
        let ratio = ratio.clamp(0.0, 1.0);
        let ratio = if self.reverse { 1.0 - ratio } else { ratio };

        AnimatorTick::Frame(self.interpolator.apply(ratio))
    }
}

impl std::fmt::Debug for Animator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animator")
            .field("duration", &self.duration)
            .field("delay", &self.delay)
            .field("interpolator", &self.interpolator)
            .field("reverse", &self.reverse)
            .field("done", &self.done)
            .finish()
    }
}
