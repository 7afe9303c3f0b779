//! sf-catalog: static design data for the intake station.
//!
//! Everything here is process-wide, immutable, and safe to share between
//! concurrent scenario runs without locking.

pub mod constants;
pub mod curve;
pub mod elements;
pub mod openings;
pub mod reference;
pub mod valve;

pub use constants::*;
pub use curve::PumpCurve;
pub use elements::*;
pub use openings::{
    CatalogSet, OPENINGS_ALL, OperatingPoint, opening_for_phi, opening_for_pumps,
    opening_for_valve,
};
pub use reference::{REFERENCE_POINTS_ALL, ReferencePoint, reference_for_phi, reference_for_pumps};
pub use valve::kv_headloss_m;
