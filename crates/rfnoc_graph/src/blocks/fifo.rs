// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sample buffer block.

use crate::node::{NodeCore, NodeCtrl};
use crate::sink::SinkNode;
use crate::source::SourceNode;

/// Pass-through buffer with no tunable arguments
#[derive(Debug)]
pub struct FifoBlock {
    core: NodeCore,
}

impl FifoBlock {
    /// Create a FIFO around `core`
    pub fn new(core: NodeCore) -> Self {
        Self { core }
    }
}

impl NodeCtrl for FifoBlock {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn as_source(&self) -> Option<&dyn SourceNode> {
        Some(self)
    }

    fn as_sink(&self) -> Option<&dyn SinkNode> {
        Some(self)
    }
}

impl SourceNode for FifoBlock {}

impl SinkNode for FifoBlock {}
