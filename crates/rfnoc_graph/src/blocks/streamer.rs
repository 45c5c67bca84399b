// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host-side streamer endpoints.
//!
//! These terminate a chain on the host: the receive streamer can only be
//! connected to, the transmit streamer can only connect onward.

use crate::node::{NodeCore, NodeCtrl};
use crate::sink::SinkNode;
use crate::source::SourceNode;

/// Receive endpoint; sink only
#[derive(Debug)]
pub struct RxStreamer {
    core: NodeCore,
}

impl RxStreamer {
    /// Create a receive streamer around `core`
    pub fn new(core: NodeCore) -> Self {
        Self { core }
    }
}

impl NodeCtrl for RxStreamer {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn as_sink(&self) -> Option<&dyn SinkNode> {
        Some(self)
    }
}

impl SinkNode for RxStreamer {}

/// Transmit endpoint; source only
#[derive(Debug)]
pub struct TxStreamer {
    core: NodeCore,
}

impl TxStreamer {
    /// Create a transmit streamer around `core`
    pub fn new(core: NodeCore) -> Self {
        Self { core }
    }
}

impl NodeCtrl for TxStreamer {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn as_source(&self) -> Option<&dyn SourceNode> {
        Some(self)
    }
}

impl SourceNode for TxStreamer {}
