//! sf-network: boundary to the external hydraulic network solver.
//!
//! Provides:
//! - `SolverBackend` / `NetworkHandle` traits the solver collaborator implements
//! - name → 1-based index maps for links and nodes
//! - `HydraulicSeries`, the raw (timestep × element) solver output
//! - `SolverSession`, a scoped solver instance released on every exit path
//! - `Topology`, the adapter that hides the simplified/subdivided network variants

pub mod error;
pub mod index;
pub mod series;
pub mod session;
pub mod solver;
pub mod topology;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use error::{NetworkError, NetworkResult};
pub use index::{ElementKind, NameIndex};
pub use series::{HydraulicSeries, LinkQuantity};
pub use session::SolverSession;
pub use solver::{LinkStatus, NetworkHandle, SimpleControl, SolverBackend};
pub use topology::{KeyHeads, PipeResults, PipeSeries, ResolvedTopology, Topology};
