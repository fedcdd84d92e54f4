//! Synthetic wait record.
//!
//! Hardware never produces this. Remap policies insert it between other
//! records to pace replay; it holds its position in the ordered stream like
//! any other record.

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::params::sole::Sole;
use crate::params::tracker::{AllocationTracker, Registration};
use crate::params::{caught_tag, LOG_TARGET};

/// Pause replay for a number of milliseconds
#[derive(Debug)]
pub struct WaitParams {
    milliseconds: u32,
    registration: Registration,
}

impl WaitParams {
    /// Allocate a wait record
    pub fn alloc(tracker: &Arc<AllocationTracker>, milliseconds: u32) -> Sole<Self> {
        Sole::new(Self {
            milliseconds,
            registration: Registration::new(tracker),
        })
    }

    /// Allocate an independent copy registered with the same tracker
    pub fn duplicate(&self) -> Sole<Self> {
        Self::alloc(self.registration.tracker(), self.milliseconds)
    }

    /// Wait length in milliseconds
    pub fn milliseconds(&self) -> u32 {
        self.milliseconds
    }

    /// Wait length
    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.milliseconds))
    }

    /// Build the diagnostic line for a wait record
    pub fn format_log(is_caught: bool, milliseconds: u32) -> String {
        format!(
            "WaitCallback [{:>7}]: milliseconds {}",
            caught_tag(is_caught),
            milliseconds
        )
    }

    /// Emit the diagnostic line for a wait record
    pub fn log(is_caught: bool, milliseconds: u32) {
        debug!(target: LOG_TARGET, "{}", Self::format_log(is_caught, milliseconds));
    }

    /// Emit the diagnostic line for this record
    pub fn log_self(&self, is_caught: bool) {
        Self::log(is_caught, self.milliseconds);
    }
}

impl PartialEq for WaitParams {
    fn eq(&self, other: &Self) -> bool {
        self.milliseconds == other.milliseconds
    }
}
