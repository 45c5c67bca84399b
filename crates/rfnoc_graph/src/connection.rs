// SPDX-License-Identifier: MIT OR Apache-2.0
//! Two-sided connections and topology snapshots.

use crate::args::BlockArgs;
use crate::error::{GraphError, GraphResult};
use crate::node::{Capability, NodeCtrlExt, NodeRef};
use crate::port::{Direction, PortRequest};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// Connect `source` to `sink`, recording the binding on both nodes.
///
/// The source side is registered first under the source's output lock, then
/// the sink side under the sink's input lock. If the sink side refuses, the
/// source binding made by this call is withdrawn under the output lock
/// before the error is returned, unless the port was cleared and rebound in
/// the meantime. Returns `(output_port, input_port)`.
pub fn connect(
    source: &NodeRef,
    output_port: PortRequest,
    sink: &NodeRef,
    input_port: PortRequest,
    args: &BlockArgs,
) -> GraphResult<(usize, usize)> {
    let Some(source_side) = source.as_source() else {
        return Err(GraphError::CapabilityMismatch {
            node: sink.unique_id(),
            target: source.unique_id(),
            direction: Direction::Upstream,
            required: Capability::Source,
        });
    };
    let output = source_side.connect_downstream(sink, output_port, args)?;

    let input = match sink.as_sink() {
        Some(sink_side) => sink_side.connect_upstream(source, input_port, args),
        None => Err(GraphError::CapabilityMismatch {
            node: source.unique_id(),
            target: sink.unique_id(),
            direction: Direction::Downstream,
            required: Capability::Sink,
        }),
    };

    match input {
        Ok(input) => {
            debug!(
                from = %source.unique_id(),
                output,
                to = %sink.unique_id(),
                input,
                "Connected"
            );
            Ok((output, input))
        }
        Err(err) => {
            warn!(
                from = %source.unique_id(),
                to = %sink.unique_id(),
                error = %err,
                "Sink side refused connection, withdrawing source binding"
            );
            let core = source.core();
            let _guard = core.output_guard();
            core.unbind(Direction::Downstream, output, sink);
            Err(err)
        }
    }
}

/// A directed edge between two ports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Source node identity
    pub from_node: String,
    /// Source output port
    pub from_port: usize,
    /// Sink node identity
    pub to_node: String,
    /// Sink input port, if the sink recorded the reverse binding
    pub to_port: Option<usize>,
}

impl Connection {
    /// Check if this connection involves a specific node
    pub fn involves_node(&self, node_id: &str) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }
}

/// A node as it appears in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSummary {
    /// Node identity
    pub id: String,
    /// Capabilities the node satisfies
    pub capabilities: Vec<Capability>,
    /// Arguments at capture time
    pub args: BlockArgs,
}

/// Point-in-time description of a set of nodes and their outbound edges.
///
/// Used for diagnostics only; nothing reads a snapshot back into a graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologySnapshot {
    /// Captured nodes, in the order given
    pub nodes: Vec<NodeSummary>,
    /// Outbound edges of the captured nodes, by node then output port
    pub connections: Vec<Connection>,
}

impl TopologySnapshot {
    /// Capture `nodes` and every live downstream binding they hold
    pub fn capture<'a>(nodes: impl IntoIterator<Item = &'a NodeRef>) -> Self {
        let mut snapshot = Self::default();
        let mut claimed = HashSet::new();

        for node in nodes {
            let id = node.unique_id();
            for (from_port, target) in node.resolve_neighbors(Direction::Downstream) {
                let Some(target) = target else {
                    continue;
                };
                snapshot.connections.push(Connection {
                    from_node: id.clone(),
                    from_port,
                    to_node: target.unique_id(),
                    to_port: claim_input_port(&target, node, &mut claimed),
                });
            }
            snapshot.nodes.push(NodeSummary {
                id,
                capabilities: node.capabilities(),
                args: node.args(),
            });
        }

        snapshot
    }

    /// Connections leaving or entering `node_id`
    pub fn connections_for_node<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a Connection> + 'a {
        self.connections
            .iter()
            .filter(move |c| c.involves_node(node_id))
    }

    /// Render as pretty-printed RON
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}

/// Lowest unclaimed port on which `sink` recorded `source` as upstream
/// neighbor. Parallel edges between the same pair each get their own port.
fn claim_input_port(
    sink: &NodeRef,
    source: &NodeRef,
    claimed: &mut HashSet<(usize, usize)>,
) -> Option<usize> {
    let sink_addr = Arc::as_ptr(sink) as *const () as usize;
    let source = Arc::downgrade(source);
    let port = sink
        .list_upstream()
        .into_iter()
        .filter(|(_, upstream)| Weak::ptr_eq(upstream, &source))
        .map(|(port, _)| port)
        .find(|&port| !claimed.contains(&(sink_addr, port)))?;
    claimed.insert((sink_addr, port));
    Some(port)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::default_registry;

    #[test]
    fn test_connect_records_both_sides() {
        let mut registry = default_registry();
        let radio = registry.create("Radio", &BlockArgs::new()).unwrap();
        let rx = registry.create("RxStreamer", &BlockArgs::new()).unwrap();

        let ports = connect(
            &radio,
            PortRequest::Index(1),
            &rx,
            PortRequest::Any,
            &BlockArgs::new(),
        )
        .unwrap();
        assert_eq!(ports, (1, 0));

        let down = radio.list_downstream()[&1].upgrade().unwrap();
        assert!(Arc::ptr_eq(&down, &rx));
        let up = rx.list_upstream()[&0].upgrade().unwrap();
        assert!(Arc::ptr_eq(&up, &radio));
    }

    #[test]
    fn test_connect_withdraws_on_sink_refusal() {
        let mut registry = default_registry();
        let radio = registry.create("Radio", &BlockArgs::new()).unwrap();
        let fifo = registry.create("FIFO", &BlockArgs::new()).unwrap();
        let other = registry.create("TxStreamer", &BlockArgs::new()).unwrap();

        // Occupy the FIFO's input 0 so the sink side fails
        fifo.as_sink()
            .unwrap()
            .connect_upstream(&other, PortRequest::Index(0), &BlockArgs::new())
            .unwrap();

        let err = connect(
            &radio,
            PortRequest::Any,
            &fifo,
            PortRequest::Index(0),
            &BlockArgs::new(),
        )
        .unwrap_err();
        assert!(matches!(err, GraphError::PortInUse { .. }));
        assert!(radio.list_downstream().is_empty());
        assert_eq!(fifo.list_upstream().len(), 1);
    }

    #[test]
    fn test_connect_requires_source() {
        let mut registry = default_registry();
        let rx = registry.create("RxStreamer", &BlockArgs::new()).unwrap();
        let fifo = registry.create("FIFO", &BlockArgs::new()).unwrap();

        let err = connect(
            &rx,
            PortRequest::Any,
            &fifo,
            PortRequest::Any,
            &BlockArgs::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GraphError::CapabilityMismatch {
                required: Capability::Source,
                ..
            }
        ));
        assert!(fifo.list_upstream().is_empty());
    }

    #[test]
    fn test_snapshot_edges() {
        let mut registry = default_registry();
        let radio = registry
            .create("Radio", &BlockArgs::new().with("spp", 364))
            .unwrap();
        let ddc = registry.create("DDC", &BlockArgs::new()).unwrap();
        let rx = registry.create("RxStreamer", &BlockArgs::new()).unwrap();

        connect(&radio, PortRequest::Any, &ddc, PortRequest::Any, &BlockArgs::new()).unwrap();
        // One-sided binding: the sink never hears about it
        ddc.as_source()
            .unwrap()
            .connect_downstream(&rx, PortRequest::Index(1), &BlockArgs::new())
            .unwrap();

        let snapshot = TopologySnapshot::capture([&radio, &ddc, &rx]);
        assert_eq!(snapshot.nodes.len(), 3);
        assert_eq!(snapshot.nodes[0].args.get("spp"), Some("364"));
        assert_eq!(
            snapshot.connections,
            [
                Connection {
                    from_node: "Radio_0".into(),
                    from_port: 0,
                    to_node: "DDC_0".into(),
                    to_port: Some(0),
                },
                Connection {
                    from_node: "DDC_0".into(),
                    from_port: 1,
                    to_node: "RxStreamer_0".into(),
                    to_port: None,
                },
            ]
        );
        assert_eq!(snapshot.connections_for_node("DDC_0").count(), 2);

        let ron = snapshot.to_ron().unwrap();
        assert!(ron.contains("RxStreamer_0"));
    }

    #[test]
    fn test_snapshot_parallel_edges() {
        let mut registry = default_registry();
        let radio = registry.create("Radio", &BlockArgs::new()).unwrap();
        let ddc = registry.create("DDC", &BlockArgs::new()).unwrap();

        connect(
            &radio,
            PortRequest::Index(0),
            &ddc,
            PortRequest::Index(0),
            &BlockArgs::new(),
        )
        .unwrap();
        connect(
            &radio,
            PortRequest::Index(1),
            &ddc,
            PortRequest::Index(1),
            &BlockArgs::new(),
        )
        .unwrap();

        let snapshot = TopologySnapshot::capture([&radio]);
        let edges: Vec<_> = snapshot
            .connections
            .iter()
            .map(|c| (c.from_port, c.to_port))
            .collect();
        assert_eq!(edges, [(0, Some(0)), (1, Some(1))]);
    }

    #[test]
    fn test_snapshot_omits_dropped_targets() {
        let mut registry = default_registry();
        let radio = registry.create("Radio", &BlockArgs::new()).unwrap();
        let fifo = registry.create("FIFO", &BlockArgs::new()).unwrap();
        connect(&radio, PortRequest::Any, &fifo, PortRequest::Any, &BlockArgs::new()).unwrap();
        drop(fifo);

        let snapshot = TopologySnapshot::capture([&radio]);
        assert!(snapshot.connections.is_empty());
    }
}
