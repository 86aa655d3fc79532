//! Path and name addressed variants of lookup and mutation.
//!
//! A path is a `/`-separated list of type tags resolved greedily from the
//! receiver: each segment picks the first child whose type tag equals the
//! segment, with or without the container marker. There is no backtracking,
//! so a path can miss a node that a later sibling would have led to.
//!
//! Name variants are reserved. Nodes have no name field yet.

use tracing::{debug, warn};

use crate::error::{Result, TreeError};

use super::Node;

impl<T> Node<T> {
    /// Resolves a type-tag path from this node. An empty path is the receiver.
    pub fn find_by_path(&self, path: &str) -> Option<Node<T>> {
        let mut current = self.clone();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            let next = current
                .state
                .links
                .read()
                .children
                .iter()
                .find(|child| child.kind() == segment || child.base_kind() == segment)
                .cloned();
            current = next?;
        }
        Some(current)
    }

    /// Detaches the node a path resolves to from its parent.
    ///
    /// # Returns
    /// * `Result<Node<T>>` - The detached node, `NotFound` if the path does not
    ///   resolve, or `InvalidOperation` if it resolves to the receiver
    pub fn remove_by_path(&self, path: &str) -> Result<Node<T>> {
        let target = self.resolve(path)?;
        let parent = match target.parent() {
            Some(parent) if target != *self => parent,
            _ => {
                warn!(root = %self.id(), path, "Path resolves to the receiver");
                return Err(TreeError::InvalidOperation(format!(
                    "path '{}' resolves to the receiver",
                    path
                )));
            }
        };
        parent
            .remove_by_id(target.id())?
            .ok_or_else(|| TreeError::NotFound(path.to_string()))
    }

    /// Creates a leaf under the container a path resolves to.
    pub fn insert_by_path(&self, path: &str, payload: T) -> Result<Node<T>> {
        let parent = self.resolve(path)?;
        let leaf = parent.insert_leaf(payload)?;
        debug!(root = %self.id(), path, node = %leaf.id(), "Inserted by path");
        Ok(leaf)
    }

    /// Overwrites the payload of the node a path resolves to.
    pub fn update_by_path(&self, path: &str, payload: T) -> Result<()> {
        let target = self.resolve(path)?;
        *target.payload_mut() = payload;
        Ok(())
    }

    pub fn find_by_name(&self, _name: &str) -> Result<Option<Node<T>>> {
        Err(TreeError::NotImplemented("find_by_name"))
    }

    pub fn remove_by_name(&self, _name: &str) -> Result<Node<T>> {
        Err(TreeError::NotImplemented("remove_by_name"))
    }

    pub fn insert_by_name(&self, _name: &str, _payload: T) -> Result<Node<T>> {
        Err(TreeError::NotImplemented("insert_by_name"))
    }

    pub fn update_by_name(&self, _name: &str, _payload: T) -> Result<()> {
        Err(TreeError::NotImplemented("update_by_name"))
    }

    fn resolve(&self, path: &str) -> Result<Node<T>> {
        self.find_by_path(path).ok_or_else(|| {
            warn!(root = %self.id(), path, "Path did not resolve");
            TreeError::NotFound(path.to_string())
        })
    }
}
