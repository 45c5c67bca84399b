// SPDX-License-Identifier: MIT OR Apache-2.0
//! Error types for topology and configuration changes.

use crate::node::Capability;
use crate::port::Direction;

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Error raised by a connect, configuration or factory call.
///
/// Every variant is local to the call that produced it; the graph is left
/// exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GraphError {
    /// A concrete port was required but the "any" request was supplied
    #[error("Invalid {direction} port number on node {node}: a concrete port is required")]
    InvalidPort {
        /// Node the registration was attempted on
        node: String,
        /// Side of the node being registered
        direction: Direction,
    },

    /// The requested port already carries a binding
    #[error("On node {node}, {direction} port {port} is already connected")]
    PortInUse {
        /// Node owning the port
        node: String,
        /// Side of the node the port belongs to
        direction: Direction,
        /// Port index
        port: usize,
    },

    /// The connection target lacks the capability its role requires
    #[error("Attempting to register non-{required} block {target} as {direction} of {node}")]
    CapabilityMismatch {
        /// Node the registration was attempted on
        node: String,
        /// Node that was offered as neighbor
        target: String,
        /// Side of `node` the target would have been bound to
        direction: Direction,
        /// Capability the target is missing
        required: Capability,
    },

    /// A configuration hook rejected new arguments
    #[error("Invalid arguments for node {node}: {reason}")]
    Validation {
        /// Node whose configuration was rejected
        node: String,
        /// Human-readable rejection reason
        reason: String,
    },

    /// The block registry has no entry for the requested block type
    #[error("Unknown block type: {0}")]
    UnknownBlock(String),
}

impl GraphError {
    /// Shorthand for a [`GraphError::Validation`] raised by a configuration hook.
    pub fn validation(node: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            node: node.into(),
            reason: reason.into(),
        }
    }
}
