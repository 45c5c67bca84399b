// SPDX-License-Identifier: MIT OR Apache-2.0
//! Block registry: the factory that hands out shared node handles.

use crate::args::BlockArgs;
use crate::error::{GraphError, GraphResult};
use crate::node::{Capability, NodeCore, NodeCtrlExt, NodeRef};
use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::debug;

/// Builds a node around a fresh core
pub type BlockConstructor = fn(NodeCore) -> NodeRef;

/// Block type definition
#[derive(Clone)]
pub struct BlockType {
    /// Unique type identifier, also the prefix of instance identities
    pub id: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Capabilities every instance advertises
    pub capabilities: Vec<Capability>,
    /// Instance constructor
    pub constructor: BlockConstructor,
}

/// Registry of available block types
#[derive(Default)]
pub struct BlockRegistry {
    /// Registered block types by ID
    types: IndexMap<String, BlockType>,
    /// Next instance index per block type
    next_index: HashMap<String, usize>,
}

impl BlockRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a block type, replacing any previous entry with the same ID
    pub fn register(&mut self, block_type: BlockType) {
        self.types.insert(block_type.id.clone(), block_type);
    }

    /// Get a block type by ID
    pub fn get(&self, id: &str) -> Option<&BlockType> {
        self.types.get(id)
    }

    /// Get all registered types
    pub fn types(&self) -> impl Iterator<Item = &BlockType> {
        self.types.values()
    }

    /// Get types advertising `capability`
    pub fn types_with(&self, capability: Capability) -> impl Iterator<Item = &BlockType> {
        self.types
            .values()
            .filter(move |t| t.capabilities.contains(&capability))
    }

    /// Instantiate the next node of `type_id` and apply `args` to it.
    ///
    /// Instances are numbered per type from 0, so identities read
    /// `<type>_<n>`. The index is consumed even if `args` are rejected.
    pub fn create(&mut self, type_id: &str, args: &BlockArgs) -> GraphResult<NodeRef> {
        let block_type = self
            .types
            .get(type_id)
            .ok_or_else(|| GraphError::UnknownBlock(type_id.to_string()))?;

        let slot = self.next_index.entry(type_id.to_string()).or_default();
        let index = *slot;
        *slot += 1;

        let node = (block_type.constructor)(NodeCore::new(&block_type.id, index));
        node.set_args(args)?;
        debug!(node = %node.unique_id(), "Created block");
        Ok(node)
    }
}
