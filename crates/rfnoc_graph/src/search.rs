// SPDX-License-Identifier: MIT OR Apache-2.0
//! Branch-limited breadth-first search over neighbor maps.
//!
//! Starting from the direct neighbors of a root node, the search walks one
//! direction level by level. A branch stops at its first match:
//!
//! ```text
//! A -> B -> C -> C
//! ```
//!
//! Searching from `A` for `C` yields only the first `C`. Sibling branches
//! are explored independently, visited nodes (the root included) are never
//! revisited, and neighbors dropped by their owner are skipped.

use crate::node::{AsAny, NodeCtrl, NodeRef, WeakNodeRef};
use crate::port::Direction;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::trace;

/// Find nodes in `direction` from `root` for which `matches` holds.
///
/// Results are in discovery order; within a level, branches follow ascending
/// port order.
pub fn find_matching<N, F>(root: &N, direction: Direction, mut matches: F) -> Vec<NodeRef>
where
    N: NodeCtrl + ?Sized,
    F: FnMut(&NodeRef) -> bool,
{
    let mut visited = HashSet::from([address_of(root)]);
    let mut queue: VecDeque<WeakNodeRef> =
        root.core().neighbors(direction).into_values().collect();
    let mut found = Vec::new();

    while let Some(handle) = queue.pop_front() {
        let Some(node) = handle.upgrade() else {
            trace!(root = %root.unique_id(), "Skipping dropped neighbor");
            continue;
        };
        if !visited.insert(address_of(&*node)) {
            continue;
        }
        if matches(&node) {
            trace!(root = %root.unique_id(), found = %node.unique_id(), "Search hit");
            found.push(node);
            continue;
        }
        queue.extend(node.core().neighbors(direction).into_values());
    }

    found
}

/// Find nodes of concrete type `T` in `direction` from `root`.
pub fn find_typed<T, N>(root: &N, direction: Direction) -> Vec<Arc<T>>
where
    T: NodeCtrl,
    N: NodeCtrl + ?Sized,
{
    find_matching(root, direction, |node| (**node).as_any().is::<T>())
        .into_iter()
        .filter_map(|node| AsAny::into_any(node).downcast::<T>().ok())
        .collect()
}

/// Identity of a node for the visited set: the address of its data.
fn address_of<N: NodeCtrl + ?Sized>(node: &N) -> usize {
    node as *const N as *const () as usize
}
