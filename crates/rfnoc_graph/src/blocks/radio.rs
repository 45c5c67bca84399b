// SPDX-License-Identifier: MIT OR Apache-2.0
//! Radio front-end block.

use crate::args::BlockArgs;
use crate::error::{GraphError, GraphResult};
use crate::node::{NodeCore, NodeCtrl};
use crate::sink::SinkNode;
use crate::source::SourceNode;

/// Radio front end.
///
/// Receive samples leave on its output ports, transmit samples arrive on its
/// input ports. Accepts `spp` (samples per packet) as a positive integer.
#[derive(Debug)]
pub struct RadioBlock {
    core: NodeCore,
}

impl RadioBlock {
    /// Create a radio around `core`
    pub fn new(core: NodeCore) -> Self {
        Self { core }
    }

    /// Configured samples per packet, if set
    pub fn spp(&self) -> Option<usize> {
        self.core.args().get_as("spp").and_then(Result::ok)
    }
}

impl NodeCtrl for RadioBlock {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn post_args_hook(&self, args: &BlockArgs) -> GraphResult<()> {
        match args.get_as::<usize>("spp") {
            None | Some(Ok(1..)) => Ok(()),
            Some(_) => Err(GraphError::validation(
                self.unique_id(),
                "spp must be a positive integer",
            )),
        }
    }

    fn as_source(&self) -> Option<&dyn SourceNode> {
        Some(self)
    }

    fn as_sink(&self) -> Option<&dyn SinkNode> {
        Some(self)
    }
}

impl SourceNode for RadioBlock {}

impl SinkNode for RadioBlock {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NodeCtrlExt;

    #[test]
    fn test_spp_validation() {
        let radio = RadioBlock::new(NodeCore::new("Radio", 0));
        radio.set_args(&BlockArgs::new().with("spp", 364)).unwrap();
        assert_eq!(radio.spp(), Some(364));

        assert!(radio.set_args(&BlockArgs::new().with("spp", 0)).is_err());
        assert!(radio.set_args(&BlockArgs::new().with("spp", "lots")).is_err());
        assert_eq!(radio.spp(), Some(364));
    }
}
