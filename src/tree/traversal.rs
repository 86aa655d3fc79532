//! Depth-first and breadth-first walks.
//!
//! Walks never hold a lock while the visitor runs, so a visitor may read or
//! replace payloads. It must not change the shape of the subtree being walked.

use std::collections::VecDeque;

use tracing::trace;

use crate::identity::Identity;

use super::Node;

impl<T> Node<T> {
    /// Visits this node and then each child subtree in order (pre-order).
    pub fn walk_depth<F>(&self, mut visit: F)
    where
        F: FnMut(&Node<T>),
    {
        trace!(root = %self.id(), "Depth-first walk");
        // Stack instead of recursion so deep trees cannot overflow
        let mut stack = vec![self.clone()];

        while let Some(node) = stack.pop() {
            visit(&node);
            stack.extend(node.children().into_iter().rev());
        }
    }

    /// Visits nodes level by level, left to right.
    pub fn walk_breadth<F>(&self, mut visit: F)
    where
        F: FnMut(&Node<T>),
    {
        trace!(root = %self.id(), "Breadth-first walk");
        let mut queue = VecDeque::from([self.clone()]);

        while let Some(node) = queue.pop_front() {
            visit(&node);
            queue.extend(node.children());
        }
    }

    /// Number of nodes in this subtree, including this node.
    pub fn size(&self) -> usize {
        let mut count = 0;
        self.walk_depth(|_| count += 1);
        count
    }

    /// Identities of this subtree in pre-order.
    pub fn descendant_ids(&self) -> Vec<Identity> {
        let mut ids = Vec::new();
        self.walk_depth(|node| ids.push(node.id()));
        ids
    }

    /// Flattens the subtree into its payloads, parents before their children.
    pub fn flatten(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut payloads = Vec::new();
        self.walk_depth(|node| payloads.push(node.payload().clone()));
        payloads
    }
}
