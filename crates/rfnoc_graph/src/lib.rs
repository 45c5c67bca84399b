// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection graph for streaming signal-processing blocks.
//!
//! This crate tracks *who is connected to whom* in a pipeline of hardware
//! processing blocks. It does not move samples.
//!
//! ## Architecture
//!
//! - Each block embeds a [`NodeCore`] holding its identity, arguments and
//!   two neighbor maps (upstream, downstream) of non-owning handles.
//! - Blocks advertise the [`Source`](Capability::Source) and
//!   [`Sink`](Capability::Sink) capabilities by implementing [`SourceNode`]
//!   and [`SinkNode`]; capabilities are checked at connection time.
//! - Connecting allocates a port, validates, then performs a single insert.
//! - A branch-limited breadth-first search finds blocks of a given type or
//!   capability in either direction.
//!
//! ```
//! use rfnoc_graph::blocks::{default_registry, RadioBlock};
//! use rfnoc_graph::{connect, BlockArgs, NodeCtrlExt, PortRequest};
//!
//! let mut registry = default_registry();
//! let radio = registry.create("Radio", &BlockArgs::new().with("spp", 364)).unwrap();
//! let ddc = registry.create("DDC", &BlockArgs::new().with("decim", 4)).unwrap();
//! let rx = registry.create("RxStreamer", &BlockArgs::new()).unwrap();
//!
//! connect(&radio, PortRequest::Any, &ddc, PortRequest::Any, &BlockArgs::new()).unwrap();
//! connect(&ddc, PortRequest::Any, &rx, PortRequest::Any, &BlockArgs::new()).unwrap();
//!
//! let radios = rx.find_upstream::<RadioBlock>();
//! assert_eq!(radios.len(), 1);
//! assert_eq!(radios[0].spp(), Some(364));
//! ```

pub mod args;
pub mod blocks;
pub mod connection;
pub mod error;
pub mod node;
pub mod port;
pub mod registry;
pub mod search;
pub mod sink;
pub mod source;

pub use args::BlockArgs;
pub use connection::{connect, Connection, TopologySnapshot};
pub use error::{GraphError, GraphResult};
pub use node::{Capability, NodeCore, NodeCtrl, NodeCtrlExt, NodeRef, WeakNodeRef};
pub use port::{Direction, NodeMap, PortRequest};
pub use registry::{BlockRegistry, BlockType};
pub use sink::SinkNode;
pub use source::SourceNode;
