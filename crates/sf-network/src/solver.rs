//! Traits the external hydraulic solver implements.
//!
//! A backend loads a network definition into an independent instance; the
//! instance is configured (initial link states, timed controls, duration),
//! solved once over the whole horizon, then released. Instances are not
//! reentrant and are only shared across threads when the backend says so.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sf_core::LinkIndex;

use crate::error::NetworkResult;
use crate::series::HydraulicSeries;

/// Open/closed state of a pump or valve link, in solver encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkStatus {
    Closed = 0,
    Open = 1,
}

impl LinkStatus {
    pub fn from_open(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }

    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Timed link status change applied by the solver during an EPS run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimpleControl {
    pub link: LinkIndex,
    pub link_id: String,
    pub status: LinkStatus,
    pub at_time_s: u64,
}

impl fmt::Display for SimpleControl {
    /// Solver control-line syntax, e.g. `LINK PUMP_4 0 AT TIME 21600`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LINK {} {} AT TIME {}",
            self.link_id,
            self.status.code(),
            self.at_time_s
        )
    }
}

/// Loads network definitions into independent solver instances.
pub trait SolverBackend: Send + Sync {
    type Handle: NetworkHandle;

    /// Load a network definition file into a fresh instance.
    fn load(&self, path: &Path) -> NetworkResult<Self::Handle>;

    /// Whether several instances may be solved concurrently on different threads.
    fn supports_concurrent_instances(&self) -> bool {
        false
    }
}

/// One loaded solver instance.
pub trait NetworkHandle: Send {
    /// Link names in solver index order.
    fn link_names(&self) -> NetworkResult<Vec<String>>;

    /// Node names in solver index order.
    fn node_names(&self) -> NetworkResult<Vec<String>>;

    fn set_link_initial_status(&mut self, link: LinkIndex, status: LinkStatus)
    -> NetworkResult<()>;

    fn add_control(&mut self, control: &SimpleControl) -> NetworkResult<()>;

    /// Simulation horizon in seconds; 0 means a single steady snapshot.
    fn set_duration(&mut self, seconds: u64) -> NetworkResult<()>;

    /// Run the hydraulic solution over the configured horizon.
    fn compute_time_series(&mut self) -> NetworkResult<HydraulicSeries>;

    /// Free solver resources. Must be idempotent.
    fn release(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_line_format() {
        let control = SimpleControl {
            link: LinkIndex::new(7).unwrap(),
            link_id: "PUMP_4".to_string(),
            status: LinkStatus::Closed,
            at_time_s: 21_600,
        };
        assert_eq!(control.to_string(), "LINK PUMP_4 0 AT TIME 21600");
    }

    #[test]
    fn status_codes() {
        assert_eq!(LinkStatus::Open.code(), 1);
        assert_eq!(LinkStatus::Closed.code(), 0);
        assert_eq!(LinkStatus::from_open(true), LinkStatus::Open);
        assert!(!LinkStatus::from_open(false).is_open());
    }
}
