// SPDX-License-Identifier: MIT OR Apache-2.0
//! Outbound connection logic for nodes that can emit downstream.

use crate::args::BlockArgs;
use crate::error::GraphResult;
use crate::node::{NodeCtrl, NodeRef};
use crate::port::{resolve_port, Direction, PortRequest};

/// A node that can be connected to a downstream sink.
///
/// `request_output_port` and `register_downstream` are the customization
/// points. Overrides of `register_downstream` should finish by delegating to
/// [`NodeCore::bind`](crate::node::NodeCore::bind) so that the validation
/// rules stay in force.
pub trait SourceNode: NodeCtrl {
    /// Connect `node` downstream of this one on `port`.
    ///
    /// Port allocation and registration happen under this node's output
    /// lock, so concurrent "any" requests on the same node never collide.
    /// Returns the port that was actually used.
    fn connect_downstream(
        &self,
        node: &NodeRef,
        port: PortRequest,
        args: &BlockArgs,
    ) -> GraphResult<usize> {
        let _guard = self.core().output_guard();
        let port = self.request_output_port(port, args);
        self.register_downstream(node, port)
    }

    /// Allocation policy for output ports.
    ///
    /// The default turns "any" into the lowest unused downstream port and
    /// passes a concrete port through unchanged.
    fn request_output_port(&self, suggested: PortRequest, _args: &BlockArgs) -> PortRequest {
        resolve_port(&self.core().neighbors(Direction::Downstream), suggested)
    }

    /// Validate and store `node` as downstream neighbor on `port`.
    fn register_downstream(&self, node: &NodeRef, port: PortRequest) -> GraphResult<usize> {
        self.core()
            .bind(&self.unique_id(), Direction::Downstream, node, port)
    }
}
