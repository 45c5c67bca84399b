// SPDX-License-Identifier: MIT OR Apache-2.0
//! Digital down-converter block.
//!
//! Recognised arguments:
//! - `decim`: decimation factor, positive integer
//! - `output_ports`: number of output ports the hardware provides
//!   (defaults to [`DEFAULT_OUTPUT_PORTS`])

use crate::args::BlockArgs;
use crate::error::{GraphError, GraphResult};
use crate::node::{NodeCore, NodeCtrl};
use crate::port::{first_free_port_below, Direction, PortRequest};
use crate::sink::SinkNode;
use crate::source::SourceNode;

/// Output ports on a DDC unless `output_ports` says otherwise
pub const DEFAULT_OUTPUT_PORTS: usize = 2;

/// Digital down-converter.
#[derive(Debug)]
pub struct DdcBlock {
    core: NodeCore,
}

impl DdcBlock {
    /// Create a DDC around `core`
    pub fn new(core: NodeCore) -> Self {
        Self { core }
    }

    /// Configured decimation, 1 when unset
    pub fn decimation(&self) -> u32 {
        self.core
            .args()
            .get_as("decim")
            .and_then(Result::ok)
            .unwrap_or(1)
    }

    /// Number of hardware output ports
    pub fn output_ports(&self) -> usize {
        self.core
            .args()
            .get_as("output_ports")
            .and_then(Result::ok)
            .unwrap_or(DEFAULT_OUTPUT_PORTS)
    }
}

impl NodeCtrl for DdcBlock {
    fn core(&self) -> &NodeCore {
        &self.core
    }

    fn post_args_hook(&self, args: &BlockArgs) -> GraphResult<()> {
        for key in ["decim", "output_ports"] {
            if let Some(value) = args.get_as::<u32>(key) {
                if !matches!(value, Ok(1..)) {
                    return Err(GraphError::validation(
                        self.unique_id(),
                        format!("{key} must be a positive integer"),
                    ));
                }
            }
        }
        Ok(())
    }

    fn as_source(&self) -> Option<&dyn SourceNode> {
        Some(self)
    }

    fn as_sink(&self) -> Option<&dyn SinkNode> {
        Some(self)
    }
}

impl SourceNode for DdcBlock {
    /// Only hand out ports the hardware has.
    ///
    /// When every port below `output_ports` is bound, "any" stays unresolved
    /// and registration rejects it. Concrete requests pass through untouched.
    fn request_output_port(&self, suggested: PortRequest, _args: &BlockArgs) -> PortRequest {
        match suggested {
            PortRequest::Any => first_free_port_below(
                &self.core.neighbors(Direction::Downstream),
                self.output_ports(),
            )
            .map_or(PortRequest::Any, PortRequest::Index),
            concrete @ PortRequest::Index(_) => concrete,
        }
    }
}

impl SinkNode for DdcBlock {}
