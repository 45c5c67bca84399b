// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port requests, directions and neighbor maps.

use crate::node::WeakNodeRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Neighbor map of one side of a node: port index to non-owning reference.
///
/// Ordered by port so that iteration (and therefore search order) is
/// deterministic.
pub type NodeMap = BTreeMap<usize, WeakNodeRef>;

/// Side of a node a binding lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Inbound side: bindings to nodes that feed this one
    Upstream,
    /// Outbound side: bindings to nodes this one feeds
    Downstream,
}

impl Direction {
    /// The other side
    pub fn reverse(self) -> Self {
        match self {
            Self::Upstream => Self::Downstream,
            Self::Downstream => Self::Upstream,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstream => f.write_str("upstream"),
            Self::Downstream => f.write_str("downstream"),
        }
    }
}

/// A caller-supplied port request.
///
/// `Any` asks the allocation policy to pick a port. It is never stored as a
/// map key; registration refuses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PortRequest {
    /// Let the allocation policy choose
    #[default]
    Any,
    /// A concrete port index
    Index(usize),
}

impl PortRequest {
    /// The concrete index, if any
    pub fn index(self) -> Option<usize> {
        match self {
            Self::Any => None,
            Self::Index(port) => Some(port),
        }
    }

    /// Whether this is the "any" sentinel
    pub fn is_any(self) -> bool {
        matches!(self, Self::Any)
    }
}

impl From<usize> for PortRequest {
    fn from(port: usize) -> Self {
        Self::Index(port)
    }
}

impl fmt::Display for PortRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("any"),
            Self::Index(port) => write!(f, "{port}"),
        }
    }
}

/// Lowest port index not present as a key in `map`.
pub fn first_free_port(map: &NodeMap) -> usize {
    first_free_port_below(map, usize::MAX).unwrap_or(usize::MAX)
}

/// Lowest port index below `limit` not present in `map`.
pub fn first_free_port_below(map: &NodeMap, limit: usize) -> Option<usize> {
    // Keys are sorted, so the first gap in 0, 1, 2, ... is the answer
    let mut candidate = 0;
    for &port in map.keys() {
        if port != candidate {
            break;
        }
        candidate += 1;
    }
    (candidate < limit).then_some(candidate)
}

/// Resolve a port request against `map` with the default policy.
///
/// "Any" becomes the lowest unused index; a concrete index is returned
/// unchanged, even when it is already bound. Conflicts are caught at
/// registration.
pub fn resolve_port(map: &NodeMap, suggested: PortRequest) -> PortRequest {
    match suggested {
        PortRequest::Any => PortRequest::Index(first_free_port(map)),
        concrete @ PortRequest::Index(_) => concrete,
    }
}
