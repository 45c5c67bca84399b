// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in block types.
//!
//! These cover the common shapes of a receive/transmit chain: a radio front
//! end, a down-converter, a buffer and the host-side streamer endpoints.

pub mod ddc;
pub mod fifo;
pub mod radio;
pub mod streamer;

pub use ddc::DdcBlock;
pub use fifo::FifoBlock;
pub use radio::RadioBlock;
pub use streamer::{RxStreamer, TxStreamer};

use crate::node::{Capability, NodeCore, NodeRef};
use crate::registry::{BlockRegistry, BlockType};
use std::sync::Arc;

/// Create a registry with every built-in block type
pub fn default_registry() -> BlockRegistry {
    let mut registry = BlockRegistry::new();

    registry.register(BlockType {
        id: "Radio".to_string(),
        name: "Radio".to_string(),
        description: "RF front end; receives into the graph and transmits out of it".to_string(),
        capabilities: vec![Capability::Source, Capability::Sink],
        constructor: |core: NodeCore| -> NodeRef { Arc::new(RadioBlock::new(core)) },
    });

    registry.register(BlockType {
        id: "DDC".to_string(),
        name: "Digital Down-Converter".to_string(),
        description: "Frequency shift and decimation".to_string(),
        capabilities: vec![Capability::Source, Capability::Sink],
        constructor: |core: NodeCore| -> NodeRef { Arc::new(DdcBlock::new(core)) },
    });

    registry.register(BlockType {
        id: "FIFO".to_string(),
        name: "FIFO".to_string(),
        description: "Sample buffer".to_string(),
        capabilities: vec![Capability::Source, Capability::Sink],
        constructor: |core: NodeCore| -> NodeRef { Arc::new(FifoBlock::new(core)) },
    });

    registry.register(BlockType {
        id: "RxStreamer".to_string(),
        name: "Host Receive Streamer".to_string(),
        description: "Delivers samples to the host".to_string(),
        capabilities: vec![Capability::Sink],
        constructor: |core: NodeCore| -> NodeRef { Arc::new(RxStreamer::new(core)) },
    });

    registry.register(BlockType {
        id: "TxStreamer".to_string(),
        name: "Host Transmit Streamer".to_string(),
        description: "Feeds samples from the host".to_string(),
        capabilities: vec![Capability::Source],
        constructor: |core: NodeCore| -> NodeRef { Arc::new(TxStreamer::new(core)) },
    });

    registry
}
