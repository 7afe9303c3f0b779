//! Raw solver output: one row per reported timestep, one column per element.

use sf_core::{ElementIndex, LinkIndex, NodeIndex};

use crate::error::{NetworkError, NetworkResult};

/// Per-link scalar quantities reported by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkQuantity {
    /// l/s
    Flow,
    /// m/s
    Velocity,
    /// m
    Headloss,
}

impl LinkQuantity {
    fn label(self) -> &'static str {
        match self {
            LinkQuantity::Flow => "flow",
            LinkQuantity::Velocity => "velocity",
            LinkQuantity::Headloss => "headloss",
        }
    }
}

/// Time series of link and node results, indexed `[step][column]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HydraulicSeries {
    pub time_s: Vec<f64>,
    pub flow: Vec<Vec<f64>>,
    pub velocity: Vec<Vec<f64>>,
    pub headloss: Vec<Vec<f64>>,
    pub status: Vec<Vec<i32>>,
    pub head: Vec<Vec<f64>>,
}

impl HydraulicSeries {
    /// All-zero series for the given timestamps. Link statuses start closed.
    pub fn zeros(time_s: Vec<f64>, link_count: usize, node_count: usize) -> Self {
        let steps = time_s.len();
        Self {
            time_s,
            flow: vec![vec![0.0; link_count]; steps],
            velocity: vec![vec![0.0; link_count]; steps],
            headloss: vec![vec![0.0; link_count]; steps],
            status: vec![vec![0; link_count]; steps],
            head: vec![vec![0.0; node_count]; steps],
        }
    }

    pub fn steps(&self) -> usize {
        self.time_s.len()
    }

    /// Check every table has one row per timestep of the expected width and
    /// that timestamps are finite and non-decreasing.
    pub fn validate(&self, link_count: usize, node_count: usize) -> NetworkResult<()> {
        let steps = self.steps();
        check_table("flow", &self.flow, steps, link_count)?;
        check_table("velocity", &self.velocity, steps, link_count)?;
        check_table("headloss", &self.headloss, steps, link_count)?;
        check_table("status", &self.status, steps, link_count)?;
        check_table("head", &self.head, steps, node_count)?;

        let mut prev = f64::NEG_INFINITY;
        for &t in &self.time_s {
            if !t.is_finite() || t < prev {
                return Err(NetworkError::SeriesShape {
                    what: format!("timestamps not monotonic at {t}"),
                });
            }
            prev = t;
        }
        Ok(())
    }

    fn link_table(&self, q: LinkQuantity) -> &[Vec<f64>] {
        match q {
            LinkQuantity::Flow => &self.flow,
            LinkQuantity::Velocity => &self.velocity,
            LinkQuantity::Headloss => &self.headloss,
        }
    }

    fn link_table_mut(&mut self, q: LinkQuantity) -> &mut [Vec<f64>] {
        match q {
            LinkQuantity::Flow => &mut self.flow,
            LinkQuantity::Velocity => &mut self.velocity,
            LinkQuantity::Headloss => &mut self.headloss,
        }
    }

    pub fn link_value(&self, q: LinkQuantity, step: usize, link: LinkIndex) -> NetworkResult<f64> {
        cell(self.link_table(q), q.label(), step, link)
    }

    pub fn link_series(&self, q: LinkQuantity, link: LinkIndex) -> NetworkResult<Vec<f64>> {
        column(self.link_table(q), q.label(), link)
    }

    pub fn status_series(&self, link: LinkIndex) -> NetworkResult<Vec<i32>> {
        column(&self.status, "status", link)
    }

    pub fn head_value(&self, step: usize, node: NodeIndex) -> NetworkResult<f64> {
        cell(&self.head, "head", step, node)
    }

    pub fn head_series(&self, node: NodeIndex) -> NetworkResult<Vec<f64>> {
        column(&self.head, "head", node)
    }

    pub fn set_link_value(
        &mut self,
        q: LinkQuantity,
        step: usize,
        link: LinkIndex,
        value: f64,
    ) -> NetworkResult<()> {
        set_cell(self.link_table_mut(q), q.label(), step, link, value)
    }

    pub fn set_status(&mut self, step: usize, link: LinkIndex, code: i32) -> NetworkResult<()> {
        set_cell(&mut self.status, "status", step, link, code)
    }

    pub fn set_head(&mut self, step: usize, node: NodeIndex, value: f64) -> NetworkResult<()> {
        set_cell(&mut self.head, "head", step, node, value)
    }
}

fn check_table<T>(name: &str, table: &[Vec<T>], steps: usize, width: usize) -> NetworkResult<()> {
    if table.len() != steps {
        return Err(NetworkError::SeriesShape {
            what: format!("{name} has {} rows, expected {steps}", table.len()),
        });
    }
    if let Some((step, row)) = table.iter().enumerate().find(|(_, r)| r.len() != width) {
        return Err(NetworkError::SeriesShape {
            what: format!("{name} row {step} has {} columns, expected {width}", row.len()),
        });
    }
    Ok(())
}

fn out_of_bounds(name: &str, step: usize, idx: ElementIndex) -> NetworkError {
    NetworkError::SeriesShape {
        what: format!("{name} has no value at step {step} for element {idx}"),
    }
}

fn cell<T: Copy>(table: &[Vec<T>], name: &str, step: usize, idx: ElementIndex) -> NetworkResult<T> {
    table
        .get(step)
        .and_then(|row| row.get(idx.column()))
        .copied()
        .ok_or_else(|| out_of_bounds(name, step, idx))
}

fn column<T: Copy>(table: &[Vec<T>], name: &str, idx: ElementIndex) -> NetworkResult<Vec<T>> {
    table
        .iter()
        .enumerate()
        .map(|(step, row)| {
            row.get(idx.column())
                .copied()
                .ok_or_else(|| out_of_bounds(name, step, idx))
        })
        .collect()
}

fn set_cell<T>(
    table: &mut [Vec<T>],
    name: &str,
    step: usize,
    idx: ElementIndex,
    value: T,
) -> NetworkResult<()> {
    let slot = table
        .get_mut(step)
        .and_then(|row| row.get_mut(idx.column()))
        .ok_or_else(|| out_of_bounds(name, step, idx))?;
    *slot = value;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idx(i: usize) -> ElementIndex {
        ElementIndex::new(i).unwrap()
    }

    #[test]
    fn zeros_validates() {
        let s = HydraulicSeries::zeros(vec![0.0, 3600.0], 3, 2);
        assert_eq!(s.steps(), 2);
        s.validate(3, 2).unwrap();
        assert!(s.validate(4, 2).is_err());
    }

    #[test]
    fn set_and_read_back() {
        let mut s = HydraulicSeries::zeros(vec![0.0, 3600.0], 2, 1);
        s.set_link_value(LinkQuantity::Flow, 1, idx(2), 5017.0).unwrap();
        s.set_status(0, idx(1), 1).unwrap();
        s.set_head(1, idx(1), 44.0).unwrap();

        assert_eq!(s.link_value(LinkQuantity::Flow, 1, idx(2)).unwrap(), 5017.0);
        assert_eq!(s.link_series(LinkQuantity::Flow, idx(2)).unwrap(), vec![0.0, 5017.0]);
        assert_eq!(s.status_series(idx(1)).unwrap(), vec![1, 0]);
        assert_eq!(s.head_value(1, idx(1)).unwrap(), 44.0);
    }

    #[test]
    fn out_of_range_column_is_an_error() {
        let s = HydraulicSeries::zeros(vec![0.0], 2, 1);
        assert!(matches!(
            s.link_value(LinkQuantity::Velocity, 0, idx(3)),
            Err(NetworkError::SeriesShape { .. })
        ));
        assert!(s.head_series(idx(2)).is_err());
    }

    #[test]
    fn non_monotonic_time_rejected() {
        let s = HydraulicSeries::zeros(vec![3600.0, 0.0], 1, 1);
        assert!(s.validate(1, 1).is_err());
    }
}
