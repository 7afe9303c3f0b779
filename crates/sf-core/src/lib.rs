//! sf-core: shared foundation for the intake scenario workspace.
//!
//! Contains:
//! - units (uom SI types, l/s and m³/h helpers)
//! - numeric (Real + tolerances + float guards)
//! - ids (1-based solver element indices)
//! - timing (stage timers reported through tracing)
//! - error (shared error types)

pub mod error;
pub mod ids;
pub mod numeric;
pub mod timing;
pub mod units;

pub use error::{SfError, SfResult};
pub use ids::*;
pub use numeric::*;
pub use units::*;
