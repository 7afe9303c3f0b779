//! Design parameters for the intake station.

// Physical
/// Seawater density at 20 °C (kg/m³).
pub const RHO_SEAWATER: f64 = 1025.0;
/// Gravitational acceleration used by the hand calculations (m/s²).
pub const G: f64 = 9.81;
/// Kv headloss constant, 3.6² × 10.197.
pub const KV_CONSTANT: f64 = 132.15;
pub const SPECIFIC_GRAVITY: f64 = 1.025;
/// Kinematic viscosity ratio seawater / fresh water.
pub const RELATIVE_VISCOSITY: f64 = 1.050;

// Pumps: 4 duty + 1 standby vertical turbine pumps
pub const N_TOTAL_PUMPS: usize = 5;
pub const N_DUTY_PUMPS: usize = 4;
pub const Q_RATED_LPS: f64 = 1256.0;
pub const H_RATED_M: f64 = 26.07;
pub const H_SHUTOFF_M: f64 = 46.54;
/// Efficiency at the best-efficiency point. Not the duty-point value.
pub const ETA_BEP_PCT: f64 = 89.0;
/// Efficiency at the duty point; default for energy figures.
pub const ETA_DUTY_PCT: f64 = 88.0;
pub const Q_BEP_BOWL_LPS: f64 = 1237.0;
/// Minimum stable continuous flow per pump (l/s).
pub const Q_MIN_STABLE_LPS: f64 = 845.4;
pub const MOTOR_POWER_KW: f64 = 447.0;
pub const MOTOR_SERVICE_FACTOR: f64 = 1.15;
pub const PUMP_SPEED_RPM: f64 = 885.0;

// Control valve sizing range (m³/h)
pub const VALVE_QMIN_M3H: f64 = 4500.0;
pub const VALVE_QMAX_M3H: f64 = 18000.0;

// Reservoir heads (m)
pub const H_SEA_M: f64 = 0.0;
pub const H_PLANT_M: f64 = 18.17;

/// Horizon of an extended-period run (hours).
pub const EPS_HORIZON_H: f64 = 24.0;
