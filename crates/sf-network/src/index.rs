//! Name → index maps for solver elements.
//!
//! The solver reports element names in index order; position `i` in that list
//! is solver index `i + 1`.

use std::collections::HashMap;
use std::fmt;

use sf_core::ElementIndex;

use crate::error::{NetworkError, NetworkResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Link,
    Node,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Link => write!(f, "link"),
            ElementKind::Node => write!(f, "node"),
        }
    }
}

/// Bidirectional lookup between element names and solver indices.
#[derive(Debug, Clone)]
pub struct NameIndex {
    kind: ElementKind,
    /// index - 1 -> name
    names: Vec<String>,
    lookup: HashMap<String, ElementIndex>,
}

impl NameIndex {
    /// Empty map, used before the solver has reported its names.
    pub fn empty(kind: ElementKind) -> Self {
        Self {
            kind,
            names: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Build from names in solver order.
    pub fn from_names(kind: ElementKind, names: Vec<String>) -> NetworkResult<Self> {
        let mut lookup = HashMap::with_capacity(names.len());
        for (position, name) in names.iter().enumerate() {
            let idx = ElementIndex::from_position(position)?;
            if lookup.insert(name.clone(), idx).is_some() {
                return Err(NetworkError::DuplicateElement {
                    kind,
                    id: name.clone(),
                });
            }
        }
        Ok(Self {
            kind,
            names,
            lookup,
        })
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<ElementIndex> {
        self.lookup.get(name).copied()
    }

    /// Index for `name`, or `MissingElement`.
    pub fn require(&self, name: &str) -> NetworkResult<ElementIndex> {
        self.get(name).ok_or_else(|| NetworkError::MissingElement {
            kind: self.kind,
            id: name.to_string(),
        })
    }

    /// Name at a solver index.
    pub fn name(&self, idx: ElementIndex) -> Option<&str> {
        self.names.get(idx.column()).map(String::as_str)
    }

    /// Names in solver order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links() -> NameIndex {
        NameIndex::from_names(
            ElementKind::Link,
            vec!["P_INTAKE".into(), "PUMP_1".into(), "P_DS".into()],
        )
        .unwrap()
    }

    #[test]
    fn indices_are_one_based() {
        let idx = links();
        assert_eq!(idx.require("P_INTAKE").unwrap().get(), 1);
        assert_eq!(idx.require("P_DS").unwrap().get(), 3);
        assert_eq!(idx.require("P_DS").unwrap().column(), 2);
    }

    #[test]
    fn name_round_trip() {
        let idx = links();
        for name in idx.names().to_vec() {
            let i = idx.require(&name).unwrap();
            assert_eq!(idx.name(i), Some(name.as_str()));
        }
    }

    #[test]
    fn missing_name_is_an_error() {
        let err = links().require("P_DS_1").unwrap_err();
        assert!(matches!(
            err,
            NetworkError::MissingElement {
                kind: ElementKind::Link,
                ..
            }
        ));
    }

    #[test]
    fn duplicates_rejected() {
        let err = NameIndex::from_names(ElementKind::Node, vec!["A".into(), "A".into()]);
        assert!(matches!(err, Err(NetworkError::DuplicateElement { .. })));
    }
}
