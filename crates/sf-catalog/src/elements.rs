//! Solver element identifiers for pumps and valve-opening control elements.
//!
//! Pipe and junction identifiers depend on the network variant and live with
//! the topology adapter.

/// All pumps in canonical order: duty pumps first, standby last.
pub const PUMP_IDS: [&str; 5] = ["PUMP_1", "PUMP_2", "PUMP_3", "PUMP_4", "PUMP_5"];
pub const DUTY_PUMP_IDS: [&str; 4] = ["PUMP_1", "PUMP_2", "PUMP_3", "PUMP_4"];
pub const STANDBY_PUMP_ID: &str = "PUMP_5";

/// Valve-opening elements of the canonical catalog, in scan priority order.
pub const VALVE_IDS: [&str; 4] = ["RIKO_44", "RIKO_38", "RIKO_30", "RIKO_22"];
/// Valve-opening elements of the extended catalog, in scan priority order.
pub const VALVE_IDS_ALL: [&str; 7] = [
    "RIKO_44", "RIKO_40", "RIKO_38", "RIKO_34", "RIKO_30", "RIKO_26", "RIKO_22",
];

const VALVE_PREFIX: &str = "RIKO_";

/// Display label for a valve element: `RIKO_44` -> `44%`.
pub fn valve_label(valve_id: &str) -> String {
    let opening = valve_id.strip_prefix(VALVE_PREFIX).unwrap_or(valve_id);
    format!("{opening}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(valve_label("RIKO_44"), "44%");
        assert_eq!(valve_label("RIKO_38"), "38%");
        assert_eq!(valve_label("RIKO_30"), "30%");
        assert_eq!(valve_label("RIKO_22"), "22%");
    }

    #[test]
    fn standby_is_last_pump() {
        assert_eq!(PUMP_IDS[N_LAST], STANDBY_PUMP_ID);
        assert_eq!(&PUMP_IDS[..N_LAST], &DUTY_PUMP_IDS);
    }

    const N_LAST: usize = 4;

    #[test]
    fn canonical_valves_are_subset() {
        for id in VALVE_IDS {
            assert!(VALVE_IDS_ALL.contains(&id));
        }
    }
}
