use crate::error::ReviewResult;
use crate::playback::timer::{Scheduler, TimerHandle};
use crate::playback::{AutoplayConfig, AutoplayDelay, AutoplayState};
use crate::review::ReviewSession;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of handling a timer firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Moved one ply forward and scheduled the next cycle
    Advanced,
    /// Nothing left to play; autoplay stopped
    Ended,
    /// The handle was cancelled or replaced before it was delivered
    Stale,
}

/// Steps a review forward on a timer until the current line runs out
pub struct AutoplayController<S: Scheduler> {
    /// Delay mode of the current or most recent run
    pub delay: Option<AutoplayDelay>,
    timer: Option<TimerHandle>,
    scheduler: S,
    config: AutoplayConfig,
}

impl<S: Scheduler> AutoplayController<S> {
    pub fn new(scheduler: S, config: AutoplayConfig) -> Self {
        Self {
            delay: None,
            timer: None,
            scheduler,
            config,
        }
    }

    /// Get current autoplay state
    pub fn state(&self) -> AutoplayState {
        if self.timer.is_some() {
            AutoplayState::Running
        } else {
            AutoplayState::Stopped
        }
    }

    /// Whether autoplay is running, optionally with exactly `delay`
    pub fn active(&self, delay: Option<AutoplayDelay>) -> bool {
        self.timer.is_some() && delay.map_or(true, |d| self.delay == Some(d))
    }

    /// Stop a run with the same delay, or start one.
    ///
    /// `None` stops any run. When nothing is running, one ply is played
    /// immediately before the first timed cycle is scheduled.
    pub fn toggle<R: ReviewSession>(
        &mut self,
        delay: Option<AutoplayDelay>,
        review: &mut R,
    ) -> ReviewResult<()> {
        if self.active(delay) {
            self.stop();
            return Ok(());
        }
        if !self.active(None) {
            self.step(review)?;
        }
        self.start(delay, review);
        Ok(())
    }

    /// Cancel the pending cycle, if any. Does not redraw.
    pub fn stop(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.scheduler.cancel(handle);
            info!("Autoplay stopped");
        }
    }

    /// Handle a fired timer.
    ///
    /// A failing jump leaves autoplay stopped; the cycle is not rescheduled.
    pub fn on_timer<R: ReviewSession>(
        &mut self,
        handle: TimerHandle,
        review: &mut R,
    ) -> ReviewResult<Step> {
        if self.timer != Some(handle) {
            debug!("Ignoring stale timer {:?}", handle);
            return Ok(Step::Stale);
        }
        self.timer = None;

        let step = self.step(review).inspect_err(|e| {
            warn!("Autoplay cycle failed: {}", e);
        })?;
        match step {
            Step::Advanced => self.schedule(review),
            Step::Ended => info!("Autoplay stopped at end of line {}", review.path()),
            Step::Stale => {}
        }
        Ok(step)
    }

    /// Delay before the next cycle, computed from the current position
    pub fn next_delay<R: ReviewSession>(&self, review: &R) -> Duration {
        match self.delay {
            Some(AutoplayDelay::VariationRelative) => {
                let path = review.path();
                if path.in_variation() {
                    return self.config.fallback_delay;
                }
                path.root()
                    .and_then(|root| review.move_time(root.ply))
                    .filter(|&units| units > 0)
                    .map(|units| self.config.move_time_unit * units)
                    .unwrap_or(self.config.fallback_delay)
            }
            Some(AutoplayDelay::Fixed(delay)) => delay.max(self.config.min_delay),
            None => self.config.min_delay,
        }
    }

    fn start<R: ReviewSession>(&mut self, delay: Option<AutoplayDelay>, review: &R) {
        self.delay = delay;
        self.stop();
        info!("Autoplay started with {:?}", delay);
        self.schedule(review);
    }

    fn schedule<R: ReviewSession>(&mut self, review: &R) {
        let delay = self.next_delay(review);
        self.timer = Some(self.scheduler.schedule(delay));
    }

    fn step<R: ReviewSession>(&mut self, review: &mut R) -> ReviewResult<Step> {
        if review.can_advance() {
            let mut path = review.path().clone();
            path.advance();
            review.jump(path)?;
            review.redraw();
            Ok(Step::Advanced)
        } else {
            self.stop();
            review.redraw();
            Ok(Step::Ended)
        }
    }

    #[cfg(test)]
    pub(crate) fn scheduler(&self) -> &S {
        &self.scheduler
    }

    #[cfg(test)]
    pub(crate) fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}
