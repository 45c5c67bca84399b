// SPDX-License-Identifier: MIT OR Apache-2.0
//! Inbound connection logic for nodes that can be a downstream endpoint.
//!
//! Mirrors [`SourceNode`](crate::source::SourceNode): a per-node input lock,
//! an overridable allocation policy and a single validated insertion.

use crate::args::BlockArgs;
use crate::error::GraphResult;
use crate::node::{NodeCtrl, NodeRef};
use crate::port::{resolve_port, Direction, PortRequest};

/// A node that can be connected to an upstream source.
pub trait SinkNode: NodeCtrl {
    /// Record `node` as upstream of this one on `port`, returning the port used
    fn connect_upstream(
        &self,
        node: &NodeRef,
        port: PortRequest,
        args: &BlockArgs,
    ) -> GraphResult<usize> {
        let _guard = self.core().input_guard();
        let port = self.request_input_port(port, args);
        self.register_upstream(node, port)
    }

    /// Allocation policy for input ports; lowest unused on "any"
    fn request_input_port(&self, suggested: PortRequest, _args: &BlockArgs) -> PortRequest {
        resolve_port(&self.core().neighbors(Direction::Upstream), suggested)
    }

    /// Validate and store `node` as upstream neighbor on `port`
    fn register_upstream(&self, node: &NodeRef, port: PortRequest) -> GraphResult<usize> {
        self.core()
            .bind(&self.unique_id(), Direction::Upstream, node, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::{FifoBlock, RadioBlock, RxStreamer, TxStreamer};
    use crate::error::GraphError;
    use crate::node::{Capability, NodeCore, NodeCtrlExt};
    use crate::source::SourceNode;
    use std::sync::Arc;

    #[test]
    fn test_connect_upstream_any() {
        let rx = RxStreamer::new(NodeCore::new("RxStreamer", 0));
        let r0: NodeRef = Arc::new(RadioBlock::new(NodeCore::new("Radio", 0)));
        let r1: NodeRef = Arc::new(RadioBlock::new(NodeCore::new("Radio", 1)));

        assert_eq!(
            rx.connect_upstream(&r0, PortRequest::Any, &BlockArgs::new())
                .unwrap(),
            0
        );
        assert_eq!(
            rx.connect_upstream(&r1, PortRequest::Any, &BlockArgs::new())
                .unwrap(),
            1
        );
        assert_eq!(rx.list_upstream().len(), 2);
        assert!(rx.list_downstream().is_empty());
    }

    #[test]
    fn test_connect_upstream_requires_source() {
        let fifo = FifoBlock::new(NodeCore::new("FIFO", 0));
        let rx: NodeRef = Arc::new(RxStreamer::new(NodeCore::new("RxStreamer", 0)));

        let err = fifo
            .connect_upstream(&rx, PortRequest::Index(0), &BlockArgs::new())
            .unwrap_err();
        assert_eq!(
            err,
            GraphError::CapabilityMismatch {
                node: "FIFO_0".into(),
                target: "RxStreamer_0".into(),
                direction: Direction::Upstream,
                required: Capability::Source,
            }
        );
        assert!(fifo.list_upstream().is_empty());
    }

    #[test]
    fn test_connect_upstream_port_in_use() {
        let fifo = FifoBlock::new(NodeCore::new("FIFO", 0));
        let tx: NodeRef = Arc::new(TxStreamer::new(NodeCore::new("TxStreamer", 0)));
        let radio: NodeRef = Arc::new(RadioBlock::new(NodeCore::new("Radio", 0)));

        fifo.connect_upstream(&tx, PortRequest::Index(0), &BlockArgs::new())
            .unwrap();
        let err = fifo
            .connect_upstream(&radio, PortRequest::Index(0), &BlockArgs::new())
            .unwrap_err();
        assert!(matches!(err, GraphError::PortInUse { port: 0, .. }));

        let bound = fifo.list_upstream()[&0].upgrade().unwrap();
        assert!(Arc::ptr_eq(&bound, &tx));
    }

    #[test]
    fn test_upstream_and_downstream_numbering_independent() {
        let fifo = FifoBlock::new(NodeCore::new("FIFO", 0));
        let tx: NodeRef = Arc::new(TxStreamer::new(NodeCore::new("TxStreamer", 0)));
        let rx: NodeRef = Arc::new(RxStreamer::new(NodeCore::new("RxStreamer", 0)));

        assert_eq!(
            fifo.connect_upstream(&tx, PortRequest::Any, &BlockArgs::new())
                .unwrap(),
            0
        );
        assert_eq!(
            fifo.connect_downstream(&rx, PortRequest::Any, &BlockArgs::new())
                .unwrap(),
            0
        );
    }
}
