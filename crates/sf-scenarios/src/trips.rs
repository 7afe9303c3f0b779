//! Scheduled pump trips for extended-period runs.

use serde::{Deserialize, Serialize};
use sf_catalog::{EPS_HORIZON_H, PUMP_IDS};

use crate::error::{ScenarioError, ScenarioResult};

/// A pump forced closed at `trip_hour` and reopened at `restore_hour`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpTripEvent {
    pub pump_id: String,
    pub trip_hour: f64,
    pub restore_hour: f64,
}

impl PumpTripEvent {
    pub fn new(pump_id: impl Into<String>, trip_hour: f64, restore_hour: f64) -> ScenarioResult<Self> {
        let event = Self {
            pump_id: pump_id.into(),
            trip_hour,
            restore_hour,
        };
        event.validate()?;
        Ok(event)
    }

    /// Known pump, finite hours, `0 <= trip < restore <= horizon`.
    pub fn validate(&self) -> ScenarioResult<()> {
        let invalid = |reason: String| ScenarioError::InvalidTrip {
            pump_id: self.pump_id.clone(),
            reason,
        };
        if !PUMP_IDS.contains(&self.pump_id.as_str()) {
            return Err(invalid("unknown pump".to_string()));
        }
        if !self.trip_hour.is_finite() || !self.restore_hour.is_finite() {
            return Err(invalid("hours must be finite".to_string()));
        }
        if self.trip_hour < 0.0 || self.restore_hour > EPS_HORIZON_H {
            return Err(invalid(format!(
                "hours must lie within [0, {EPS_HORIZON_H}]"
            )));
        }
        if self.trip_hour >= self.restore_hour {
            return Err(invalid(format!(
                "trip hour {} is not before restore hour {}",
                self.trip_hour, self.restore_hour
            )));
        }
        Ok(())
    }

    pub fn trip_seconds(&self) -> u64 {
        hours_to_seconds(self.trip_hour)
    }

    pub fn restore_seconds(&self) -> u64 {
        hours_to_seconds(self.restore_hour)
    }
}

/// Whole seconds for a (validated, non-negative) hour value.
pub fn hours_to_seconds(hours: f64) -> u64 {
    (hours * 3600.0).round().max(0.0) as u64
}

/// Standard schedule: one duty pump tripped for two hours in each of three shifts.
pub fn default_trips() -> Vec<PumpTripEvent> {
    [("PUMP_4", 6.0, 8.0), ("PUMP_3", 12.0, 14.0), ("PUMP_2", 18.0, 20.0)]
        .into_iter()
        .map(|(pump_id, trip_hour, restore_hour)| PumpTripEvent {
            pump_id: pump_id.to_string(),
            trip_hour,
            restore_hour,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schedule_is_valid() {
        let trips = default_trips();
        assert_eq!(trips.len(), 3);
        for t in &trips {
            t.validate().unwrap();
        }
        assert_eq!(trips[0].trip_seconds(), 21_600);
        assert_eq!(trips[0].restore_seconds(), 28_800);
    }

    #[test]
    fn seconds_are_rounded() {
        assert_eq!(hours_to_seconds(1.0 / 3.0), 1200);
        assert_eq!(hours_to_seconds(0.0001), 0);
        assert_eq!(hours_to_seconds(6.5), 23_400);
    }

    #[test]
    fn rejects_bad_windows() {
        assert!(PumpTripEvent::new("PUMP_4", 8.0, 6.0).is_err());
        assert!(PumpTripEvent::new("PUMP_4", 6.0, 6.0).is_err());
        assert!(PumpTripEvent::new("PUMP_4", -1.0, 6.0).is_err());
        assert!(PumpTripEvent::new("PUMP_4", 20.0, 25.0).is_err());
        assert!(PumpTripEvent::new("PUMP_4", f64::NAN, 6.0).is_err());
        assert!(PumpTripEvent::new("PUMP_9", 6.0, 8.0).is_err());
        assert!(PumpTripEvent::new("PUMP_5", 0.0, 24.0).is_ok());
    }
}
