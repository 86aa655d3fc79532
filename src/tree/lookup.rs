//! Identity-based lookup.
//!
//! No index is kept: every lookup is a pre-order scan of the subtree, so it is
//! linear in the subtree size. Callers that look up often should build their
//! own map from identities to handles.

use tracing::trace;

use crate::identity::Identity;

use super::Node;

impl<T> Node<T> {
    /// Recursively searches this subtree for a node with the given identity.
    /// Returns None if no node with the identity is found.
    ///
    /// # Arguments
    /// * `id` - The identity of the node to find
    ///
    /// # Returns
    /// * `Option<Node<T>>` - The first match in pre-order, if any
    pub fn find_by_id(&self, id: Identity) -> Option<Node<T>> {
        let mut stack = vec![self.clone()];

        while let Some(node) = stack.pop() {
            if node.id() == id {
                trace!(root = %self.id(), node = %id, "Found node");
                return Some(node);
            }
            // Reverse so the first child is examined next
            stack.extend(node.children().into_iter().rev());
        }

        trace!(root = %self.id(), node = %id, "Node not in subtree");
        None
    }

    /// Overwrites the payload of the node with the given identity.
    ///
    /// # Returns
    /// * `bool` - Whether a node was found and updated
    pub fn update_by_id(&self, id: Identity, payload: T) -> bool {
        match self.find_by_id(id) {
            Some(node) => {
                *node.payload_mut() = payload;
                true
            }
            None => false,
        }
    }

    /// Whether a node with the given identity lies in this subtree.
    pub fn contains(&self, id: Identity) -> bool {
        self.find_by_id(id).is_some()
    }
}
