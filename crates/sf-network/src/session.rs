//! Scoped solver instance.
//!
//! A `SolverSession` owns one loaded network and releases it when dropped, so
//! the instance is freed on success, on error, and on panic unwind alike.

use std::path::{Path, PathBuf};

use sf_core::timing::Timer;
use tracing::debug;

use crate::error::NetworkResult;
use crate::index::{ElementKind, NameIndex};
use crate::series::HydraulicSeries;
use crate::solver::{LinkStatus, NetworkHandle, SimpleControl, SolverBackend};

pub struct SolverSession<H: NetworkHandle> {
    handle: H,
    path: PathBuf,
    links: NameIndex,
    nodes: NameIndex,
}

impl<H: NetworkHandle> SolverSession<H> {
    /// Load `path` into a fresh instance and read its element names.
    pub fn open<B>(backend: &B, path: &Path) -> NetworkResult<Self>
    where
        B: SolverBackend<Handle = H>,
    {
        let handle = backend.load(path)?;
        debug!(path = %path.display(), "solver instance loaded");

        // Guard exists before the name queries so a failing query still releases.
        let mut session = Self {
            handle,
            path: path.to_path_buf(),
            links: NameIndex::empty(ElementKind::Link),
            nodes: NameIndex::empty(ElementKind::Node),
        };
        session.links = NameIndex::from_names(ElementKind::Link, session.handle.link_names()?)?;
        session.nodes = NameIndex::from_names(ElementKind::Node, session.handle.node_names()?)?;
        Ok(session)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn links(&self) -> &NameIndex {
        &self.links
    }

    pub fn nodes(&self) -> &NameIndex {
        &self.nodes
    }

    /// Set the initial status of a named link.
    pub fn set_link_status(&mut self, link_id: &str, status: LinkStatus) -> NetworkResult<()> {
        let link = self.links.require(link_id)?;
        self.handle.set_link_initial_status(link, status)
    }

    /// Schedule `link_id` to switch to `status` at `at_time_s`.
    pub fn add_link_control(
        &mut self,
        link_id: &str,
        status: LinkStatus,
        at_time_s: u64,
    ) -> NetworkResult<()> {
        let control = SimpleControl {
            link: self.links.require(link_id)?,
            link_id: link_id.to_string(),
            status,
            at_time_s,
        };
        debug!(%control, "adding control");
        self.handle.add_control(&control)
    }

    pub fn set_duration(&mut self, seconds: u64) -> NetworkResult<()> {
        self.handle.set_duration(seconds)
    }

    /// Solve over the configured horizon and check the output shape.
    pub fn compute(&mut self) -> NetworkResult<HydraulicSeries> {
        let timer = Timer::start("solver.compute_time_series");
        let series = self.handle.compute_time_series()?;
        timer.stop();
        series.validate(self.links.len(), self.nodes.len())?;
        Ok(series)
    }
}

impl<H: NetworkHandle> Drop for SolverSession<H> {
    fn drop(&mut self) {
        self.handle.release();
        debug!(path = %self.path.display(), "solver instance released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NetworkError;
    use crate::testing::{ScriptedBackend, ScriptedNetwork};

    fn backend() -> ScriptedBackend {
        ScriptedBackend::new(ScriptedNetwork::simplified(), |net, _state| {
            Ok(HydraulicSeries::zeros(
                vec![0.0],
                net.link_names.len(),
                net.node_names.len(),
            ))
        })
    }

    #[test]
    fn drop_releases_exactly_once() {
        let backend = backend();
        {
            let mut session = SolverSession::open(&backend, Path::new("intake.inp")).unwrap();
            session.set_link_status("PUMP_1", LinkStatus::Open).unwrap();
            session.compute().unwrap();
        }
        assert_eq!(backend.stats().loads(), 1);
        assert_eq!(backend.stats().releases(), 1);
    }

    #[test]
    fn unknown_link_fails_but_still_releases() {
        let backend = backend();
        let result = (|| -> NetworkResult<()> {
            let mut session = SolverSession::open(&backend, Path::new("intake.inp"))?;
            session.set_link_status("PUMP_9", LinkStatus::Open)?;
            Ok(())
        })();
        assert!(matches!(result, Err(NetworkError::MissingElement { .. })));
        assert_eq!(backend.stats().releases(), 1);
    }

    #[test]
    fn controls_are_forwarded() {
        let backend = backend();
        let mut session = SolverSession::open(&backend, Path::new("intake.inp")).unwrap();
        session
            .add_link_control("PUMP_4", LinkStatus::Closed, 21_600)
            .unwrap();
        session.compute().unwrap();
        let last = backend.last_state().unwrap();
        assert_eq!(last.controls.len(), 1);
        assert_eq!(last.controls[0].to_string(), "LINK PUMP_4 0 AT TIME 21600");
    }
}
