// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the connection graph.
//!
//! A concrete block embeds a [`NodeCore`] and implements [`NodeCtrl`]. The
//! core owns the block's identity, arguments and the two neighbor maps; the
//! trait carries the customization points (identity, argument hook,
//! capabilities). Everything a caller does with a node on top of that lives
//! in [`NodeCtrlExt`], which every node gets for free.

use crate::args::BlockArgs;
use crate::error::{GraphError, GraphResult};
use crate::port::{Direction, NodeMap, PortRequest};
use crate::search;
use crate::sink::SinkNode;
use crate::source::SourceNode;
use parking_lot::{Mutex, MutexGuard, RwLock};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt;
use std::sync::{Arc, Weak};
use tracing::{debug, warn};

/// Shared handle to a node, as handed out by the owning subsystem
pub type NodeRef = Arc<dyn NodeCtrl>;

/// Non-owning handle stored in neighbor maps
pub type WeakNodeRef = Weak<dyn NodeCtrl>;

/// Behavioral contract a node may satisfy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Capability {
    /// Can emit to a downstream node
    Source,
    /// Can be the downstream endpoint of a connection
    Sink,
}

impl Capability {
    /// Capability a neighbor must have to be bound on `direction`.
    pub fn required_for(direction: Direction) -> Self {
        match direction {
            Direction::Downstream => Self::Sink,
            Direction::Upstream => Self::Source,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Sink => f.write_str("sink"),
        }
    }
}

/// Type-erasure helper so nodes can be found and downcast by concrete type.
pub trait AsAny: Any + Send + Sync {
    /// Borrow as `Any`
    fn as_any(&self) -> &dyn Any;
    /// Convert a shared handle into a shared `Any` handle
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// State shared by every node: identity, arguments and bindings.
pub struct NodeCore {
    block_name: String,
    index: usize,
    args: RwLock<BlockArgs>,
    /// Serializes argument updates so a rollback never clobbers a later update
    args_update: Mutex<()>,
    upstream: RwLock<NodeMap>,
    downstream: RwLock<NodeMap>,
    input_lock: Mutex<()>,
    output_lock: Mutex<()>,
}

impl NodeCore {
    /// Create the core of the `index`-th instance of `block_name`
    pub fn new(block_name: impl Into<String>, index: usize) -> Self {
        Self {
            block_name: block_name.into(),
            index,
            args: RwLock::new(BlockArgs::new()),
            args_update: Mutex::new(()),
            upstream: RwLock::new(NodeMap::new()),
            downstream: RwLock::new(NodeMap::new()),
            input_lock: Mutex::new(()),
            output_lock: Mutex::new(()),
        }
    }

    /// Block type name
    pub fn block_name(&self) -> &str {
        &self.block_name
    }

    /// Instance index within the block type
    pub fn index(&self) -> usize {
        self.index
    }

    /// Default identity label, `<block>_<index>`
    pub fn default_id(&self) -> String {
        format!("{}_{}", self.block_name, self.index)
    }

    /// Snapshot of the current arguments
    pub fn args(&self) -> BlockArgs {
        self.args.read().clone()
    }

    /// Snapshot of the bindings on one side
    pub fn neighbors(&self, direction: Direction) -> NodeMap {
        self.map(direction).read().clone()
    }

    /// Empty both neighbor maps
    pub fn clear(&self) {
        self.upstream.write().clear();
        self.downstream.write().clear();
    }

    /// Validate and store a binding on `direction`.
    ///
    /// This is the single mutation point for neighbor maps. `owner` is the
    /// identity of the node this core belongs to and only feeds diagnostics.
    /// Fails without touching the map if `port` is "any", if the port is
    /// already bound, or if `target` lacks the capability the side requires.
    pub fn bind(
        &self,
        owner: &str,
        direction: Direction,
        target: &NodeRef,
        port: PortRequest,
    ) -> GraphResult<usize> {
        let Some(port) = port.index() else {
            return Err(GraphError::InvalidPort {
                node: owner.to_string(),
                direction,
            });
        };

        let mut map = self.map(direction).write();
        if map.contains_key(&port) {
            return Err(GraphError::PortInUse {
                node: owner.to_string(),
                direction,
                port,
            });
        }

        let required = Capability::required_for(direction);
        if !target.has_capability(required) {
            return Err(GraphError::CapabilityMismatch {
                node: owner.to_string(),
                target: target.unique_id(),
                direction,
                required,
            });
        }

        map.insert(port, Arc::downgrade(target));
        debug!(
            node = owner,
            %direction,
            port,
            neighbor = %target.unique_id(),
            "Registered binding"
        );
        Ok(port)
    }

    /// Withdraw a binding made moments ago by a connect that could not complete.
    ///
    /// Only removes `port` if it still points at `target`; a binding made by
    /// someone else after a `clear()` is left alone. Callers hold the lock of
    /// `direction`.
    pub(crate) fn unbind(&self, direction: Direction, port: usize, target: &NodeRef) -> bool {
        let target = Arc::downgrade(target);
        let mut map = self.map(direction).write();
        match map.get(&port) {
            Some(bound) if Weak::ptr_eq(bound, &target) => {
                map.remove(&port);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn output_guard(&self) -> MutexGuard<'_, ()> {
        self.output_lock.lock()
    }

    pub(crate) fn input_guard(&self) -> MutexGuard<'_, ()> {
        self.input_lock.lock()
    }

    fn map(&self, direction: Direction) -> &RwLock<NodeMap> {
        match direction {
            Direction::Upstream => &self.upstream,
            Direction::Downstream => &self.downstream,
        }
    }
}

impl fmt::Debug for NodeCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeCore")
            .field("id", &self.default_id())
            .field("args", &*self.args.read())
            .field("upstream", &self.upstream.read().keys().collect::<Vec<_>>())
            .field("downstream", &self.downstream.read().keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A streaming block as seen by the connection graph.
///
/// Implementors only have to hand out their [`NodeCore`]; every other method
/// has a default. Override `as_source` / `as_sink` to advertise the
/// corresponding capability.
pub trait NodeCtrl: AsAny {
    /// The embedded core
    fn core(&self) -> &NodeCore;

    /// Stable identity for diagnostics
    fn unique_id(&self) -> String {
        self.core().default_id()
    }

    /// Called after every argument update with the merged arguments.
    ///
    /// Runs before the arguments are stored; `args()` still reports the
    /// previous ones. Return an error to reject the update.
    fn post_args_hook(&self, _args: &BlockArgs) -> GraphResult<()> {
        Ok(())
    }

    /// Source view of this node, if it can emit downstream
    fn as_source(&self) -> Option<&dyn SourceNode> {
        None
    }

    /// Sink view of this node, if it can be a downstream endpoint
    fn as_sink(&self) -> Option<&dyn SinkNode> {
        None
    }

    /// Drop every binding on both sides. Neighbors are not notified.
    fn clear(&self) {
        self.core().clear();
    }

    /// Whether this node satisfies `capability`
    fn has_capability(&self, capability: Capability) -> bool {
        match capability {
            Capability::Source => self.as_source().is_some(),
            Capability::Sink => self.as_sink().is_some(),
        }
    }

    /// Every capability this node satisfies
    fn capabilities(&self) -> Vec<Capability> {
        [Capability::Source, Capability::Sink]
            .into_iter()
            .filter(|&cap| self.has_capability(cap))
            .collect()
    }
}

/// Operations available on every node, concrete or type-erased.
pub trait NodeCtrlExt: NodeCtrl {
    /// Merge `args` into the node's arguments and run the post-update hook.
    ///
    /// Supplied keys overwrite, other keys are kept. The merged arguments are
    /// stored only once the hook accepts them, so readers never observe a
    /// rejected update. If the hook fails its error is returned and the
    /// previous arguments stay in place.
    fn set_args(&self, args: &BlockArgs) -> GraphResult<()> {
        let core = self.core();
        let _update = core.args_update.lock();

        let mut merged = core.args();
        merged.merge(args);

        if let Err(err) = self.post_args_hook(&merged) {
            warn!(node = %self.unique_id(), error = %err, "Arguments rejected");
            return Err(err);
        }
        *core.args.write() = merged;

        debug!(node = %self.unique_id(), count = args.len(), "Arguments updated");
        Ok(())
    }

    /// Snapshot of the current arguments
    fn args(&self) -> BlockArgs {
        self.core().args()
    }

    /// Copy of the downstream map
    fn list_downstream(&self) -> NodeMap {
        self.core().neighbors(Direction::Downstream)
    }

    /// Copy of the upstream map
    fn list_upstream(&self) -> NodeMap {
        self.core().neighbors(Direction::Upstream)
    }

    /// Bindings on `direction` with their handles resolved.
    ///
    /// A `None` entry means the neighbor has been dropped by its owner.
    fn resolve_neighbors(&self, direction: Direction) -> Vec<(usize, Option<NodeRef>)> {
        self.core()
            .neighbors(direction)
            .into_iter()
            .map(|(port, weak)| (port, weak.upgrade()))
            .collect()
    }

    /// Nodes of type `T` downstream of this one, first match per branch
    fn find_downstream<T: NodeCtrl>(&self) -> Vec<Arc<T>> {
        search::find_typed(self, Direction::Downstream)
    }

    /// Nodes of type `T` upstream of this one, first match per branch
    fn find_upstream<T: NodeCtrl>(&self) -> Vec<Arc<T>> {
        search::find_typed(self, Direction::Upstream)
    }

    /// Nodes satisfying `capability` downstream of this one
    fn find_downstream_with(&self, capability: Capability) -> Vec<NodeRef> {
        search::find_matching(self, Direction::Downstream, |node| {
            node.has_capability(capability)
        })
    }

    /// Nodes satisfying `capability` upstream of this one
    fn find_upstream_with(&self, capability: Capability) -> Vec<NodeRef> {
        search::find_matching(self, Direction::Upstream, |node| {
            node.has_capability(capability)
        })
    }
}

impl<N: NodeCtrl + ?Sized> NodeCtrlExt for N {}
