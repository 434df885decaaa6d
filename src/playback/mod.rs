pub mod engine;
pub mod timer;

pub use engine::AutoplayController;
pub use timer::{Scheduler, TokioScheduler};

use std::time::Duration;

/// Autoplay state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayState {
    Stopped,
    Running,
}

/// How long autoplay waits between plies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoplayDelay {
    /// Follow the recorded move times on the mainline
    VariationRelative,
    /// Wait a fixed duration
    Fixed(Duration),
}

impl AutoplayDelay {
    pub fn fixed_ms(ms: u64) -> Self {
        Self::Fixed(Duration::from_millis(ms))
    }
}

/// Autoplay timing configuration
#[derive(Debug, Clone)]
pub struct AutoplayConfig {
    /// Delay used inside variations and when no move time was recorded
    pub fallback_delay: Duration,
    /// Length of one recorded move time unit
    pub move_time_unit: Duration,
    /// Lower bound applied to fixed and unset delays
    pub min_delay: Duration,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            fallback_delay: Duration::from_millis(2000),
            move_time_unit: Duration::from_millis(100),
            min_delay: Duration::ZERO,
        }
    }
}
