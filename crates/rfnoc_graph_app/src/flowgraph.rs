// SPDX-License-Identifier: MIT OR Apache-2.0
//! Flowgraph descriptions and their instantiation.

use indexmap::IndexMap;
use rfnoc_graph::{connect, BlockArgs, BlockRegistry, GraphError, NodeRef, PortRequest};
use serde::Deserialize;
use thiserror::Error;

/// Flowgraph errors
#[derive(Debug, Error)]
pub enum FlowgraphError {
    /// The description could not be parsed
    #[error("Malformed flowgraph description: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The description file could not be read
    #[error("Failed to read flowgraph file: {0}")]
    Io(#[from] std::io::Error),

    /// Two blocks share a name
    #[error("Duplicate block name: {0}")]
    DuplicateName(String),

    /// A connection names a block that was never declared
    #[error("Connection references undeclared block: {0}")]
    UnknownName(String),

    /// The graph rejected a block or a connection
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Block instance in a description
#[derive(Debug, Clone, Deserialize)]
pub struct BlockDesc {
    /// Local name used by connections
    pub name: String,
    /// Registry block type
    pub block: String,
    /// Arguments applied at creation
    #[serde(default)]
    pub args: BlockArgs,
}

/// Connection in a description
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionDesc {
    /// Local name of the source block
    pub from: String,
    /// Requested output port
    #[serde(default)]
    pub from_port: PortRequest,
    /// Local name of the sink block
    pub to: String,
    /// Requested input port
    #[serde(default)]
    pub to_port: PortRequest,
    /// Arguments passed to the connect calls
    #[serde(default)]
    pub args: BlockArgs,
}

/// A whole flowgraph description
#[derive(Debug, Clone, Deserialize)]
pub struct FlowgraphDesc {
    /// Blocks, created in order
    pub blocks: Vec<BlockDesc>,
    /// Connections, made in order
    #[serde(default)]
    pub connections: Vec<ConnectionDesc>,
}

impl FlowgraphDesc {
    /// Parse a RON description
    pub fn from_ron(text: &str) -> Result<Self, FlowgraphError> {
        Ok(ron::from_str(text)?)
    }

    /// Read and parse a RON description from disk
    pub fn load(path: &std::path::Path) -> Result<Self, FlowgraphError> {
        Self::from_ron(&std::fs::read_to_string(path)?)
    }
}

/// Instantiated flowgraph. Owns every node it created.
pub struct Flowgraph {
    nodes: IndexMap<String, NodeRef>,
}

impl Flowgraph {
    /// Create every block through `registry`, then make every connection
    pub fn build(
        desc: &FlowgraphDesc,
        registry: &mut BlockRegistry,
    ) -> Result<Self, FlowgraphError> {
        let mut nodes = IndexMap::new();
        for block in &desc.blocks {
            if nodes.contains_key(&block.name) {
                return Err(FlowgraphError::DuplicateName(block.name.clone()));
            }
            let node = registry.create(&block.block, &block.args)?;
            nodes.insert(block.name.clone(), node);
        }

        let graph = Self { nodes };
        for conn in &desc.connections {
            let source = graph.require(&conn.from)?;
            let sink = graph.require(&conn.to)?;
            connect(source, conn.from_port, sink, conn.to_port, &conn.args)?;
        }

        Ok(graph)
    }

    /// Node by local name
    pub fn node(&self, name: &str) -> Option<&NodeRef> {
        self.nodes.get(name)
    }

    /// All nodes in declaration order
    pub fn nodes(&self) -> impl Iterator<Item = &NodeRef> {
        self.nodes.values()
    }

    fn require(&self, name: &str) -> Result<&NodeRef, FlowgraphError> {
        self.node(name)
            .ok_or_else(|| FlowgraphError::UnknownName(name.to_string()))
    }
}

/// The flowgraph shipped with the binary
pub const DEFAULT_FLOWGRAPH: &str = include_str!("../flowgraphs/rx_chain.ron");

#[cfg(test)]
mod tests {
    use super::*;
    use rfnoc_graph::blocks::{default_registry, RadioBlock};
    use rfnoc_graph::{NodeCtrl, NodeCtrlExt};

    #[test]
    fn test_default_flowgraph_builds() {
        let desc = FlowgraphDesc::from_ron(DEFAULT_FLOWGRAPH).unwrap();
        let graph = Flowgraph::build(&desc, &mut default_registry()).unwrap();

        let rx = graph.node("rx").unwrap();
        let ids: Vec<_> = rx
            .find_upstream::<RadioBlock>()
            .iter()
            .map(|r| r.unique_id())
            .collect();
        assert_eq!(ids, ["Radio_1", "Radio_0"]);

        let radio0 = graph.node("radio0").unwrap();
        assert_eq!(radio0.list_upstream().len(), 1);
        assert_eq!(radio0.args().get("freq"), Some("2.4e9"));
    }

    #[test]
    fn test_undeclared_block() {
        let desc = FlowgraphDesc::from_ron(
            r#"(blocks: [(name: "a", block: "FIFO")], connections: [(from: "a", to: "b")])"#,
        )
        .unwrap();
        let err = Flowgraph::build(&desc, &mut default_registry()).err().unwrap();
        assert!(matches!(err, FlowgraphError::UnknownName(name) if name == "b"));
    }

    #[test]
    fn test_graph_error_surfaces() {
        let desc = FlowgraphDesc::from_ron(
            r#"(
                blocks: [(name: "rx", block: "RxStreamer"), (name: "fifo", block: "FIFO")],
                connections: [(from: "rx", to: "fifo")],
            )"#,
        )
        .unwrap();
        let err = Flowgraph::build(&desc, &mut default_registry()).err().unwrap();
        assert!(matches!(
            err,
            FlowgraphError::Graph(GraphError::CapabilityMismatch { .. })
        ));
    }

    #[test]
    fn test_duplicate_name() {
        let desc = FlowgraphDesc::from_ron(
            r#"(blocks: [(name: "a", block: "FIFO"), (name: "a", block: "DDC")])"#,
        )
        .unwrap();
        let err = Flowgraph::build(&desc, &mut default_registry()).err().unwrap();
        assert!(matches!(err, FlowgraphError::DuplicateName(_)));
    }
}
