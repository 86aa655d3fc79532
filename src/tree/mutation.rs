//! Structural mutation of a container's children.

use std::{cmp::Ordering, sync::Arc, sync::Weak};

use tracing::{debug, warn};

use crate::{
    error::{Result, TreeError},
    identity::Identity,
};

use super::Node;

impl<T> Node<T> {
    /// Appends `child` to this container's children.
    ///
    /// The child must be detached or already a child of this node; in the
    /// latter case it is moved to the end. A node can never be added below
    /// itself or one of its descendants.
    ///
    /// The cycle check walks from this node up to its root, so an append costs
    /// O(depth of this node).
    ///
    /// # Arguments
    /// * `child` - The node to append
    ///
    /// # Returns
    /// * `Result<()>` - `InvalidOperation` if this node is a leaf, the child has
    ///   another parent, or the link would form a cycle
    pub fn add_child(&self, child: &Node<T>) -> Result<()> {
        self.require_container("add_child")?;

        if child.is_self_or_ancestor_of(self) {
            warn!(parent = %self.id(), child = %child.id(), "Rejected child that would form a cycle");
            return Err(TreeError::InvalidOperation(format!(
                "adding {} below {} would form a cycle",
                child.id(),
                self.id()
            )));
        }

        match child.parent() {
            Some(parent) if parent != *self => {
                warn!(
                    parent = %self.id(),
                    child = %child.id(),
                    current_parent = %parent.id(),
                    "Rejected child that is still attached elsewhere"
                );
                return Err(TreeError::InvalidOperation(format!(
                    "{} is still a child of {}",
                    child.id(),
                    parent.id()
                )));
            }
            Some(_) => {
                let mut links = self.state.links.write();
                links.children.retain(|existing| existing != child);
                links.children.push(child.clone());
            }
            None => {
                child.state.links.write().parent = Arc::downgrade(&self.state);
                self.state.links.write().children.push(child.clone());
            }
        }

        debug!(parent = %self.id(), child = %child.id(), "Added child");
        Ok(())
    }

    /// Detaches the direct child with the given identity.
    ///
    /// Later siblings shift left to keep their order. The search does not
    /// descend into grandchildren.
    ///
    /// # Returns
    /// * `Result<Option<Node<T>>>` - The detached child, `None` if no direct child
    ///   has that identity, or `InvalidOperation` on a leaf
    pub fn remove_by_id(&self, id: Identity) -> Result<Option<Node<T>>> {
        self.require_container("remove_by_id")?;

        let removed = {
            let mut links = self.state.links.write();
            links
                .children
                .iter()
                .position(|child| child.id() == id)
                .map(|index| links.children.remove(index))
        };

        match &removed {
            Some(child) => {
                child.state.links.write().parent = Weak::new();
                debug!(parent = %self.id(), child = %id, "Removed child");
            }
            None => debug!(parent = %self.id(), child = %id, "No child to remove"),
        }
        Ok(removed)
    }

    /// Creates a leaf under the container with `parent_id` anywhere in this
    /// subtree.
    ///
    /// The new leaf's type is the parent's type without the container marker.
    ///
    /// # Arguments
    /// * `parent_id` - Identity of the container that receives the leaf
    /// * `payload` - Payload of the new leaf
    ///
    /// # Returns
    /// * `Result<Node<T>>` - The new leaf, `NotFound` if no node in the subtree
    ///   has `parent_id`, or `InvalidOperation` if that node is a leaf
    pub fn insert_item(&self, parent_id: Identity, payload: T) -> Result<Node<T>> {
        let parent = self.find_by_id(parent_id).ok_or_else(|| {
            warn!(root = %self.id(), parent = %parent_id, "Insert target not found");
            TreeError::NotFound(parent_id.to_string())
        })?;
        parent.insert_leaf(payload)
    }

    pub(crate) fn insert_leaf(&self, payload: T) -> Result<Node<T>> {
        self.require_container("insert_item")?;
        let leaf = Node::new(self.base_kind(), false, payload)?;
        self.add_child(&leaf)?;
        Ok(leaf)
    }

    /// Stable sort of the children by a strict "less than" predicate, applied
    /// recursively to every container below.
    ///
    /// Elements for which neither `less(a, b)` nor `less(b, a)` holds keep
    /// their relative order.
    pub fn sort<F>(&self, less: F) -> Result<()>
    where
        F: Fn(&T, &T) -> bool,
    {
        self.sort_by(|a, b| {
            if less(a, b) {
                Ordering::Less
            } else if less(b, a) {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })
    }

    /// Stable sort of the children by an ordering over payloads, applied
    /// recursively to every container below.
    ///
    /// No lock on the tree is held while `compare` runs, so it may read the
    /// tree through other handles. It must not take a payload's write lock.
    pub fn sort_by<F>(&self, compare: F) -> Result<()>
    where
        F: Fn(&T, &T) -> Ordering,
    {
        self.require_container("sort")?;

        let mut pending = vec![self.clone()];
        while let Some(node) = pending.pop() {
            let mut children = node.children();
            children.sort_by(|a, b| compare(&*a.payload(), &*b.payload()));
            pending.extend(children.iter().filter(|child| child.is_container()).cloned());
            node.state.links.write().children = children;
        }

        debug!(root = %self.id(), "Sorted subtree");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(nodes: &[Node<i32>]) -> Vec<i32> {
        nodes.iter().map(|node| *node.payload()).collect()
    }

    #[test]
    fn add_child_appends_in_order() {
        let root = Node::container("x", 0).unwrap();
        for value in 1..=5 {
            root.add_child(&Node::leaf("x", value).unwrap()).unwrap();
        }
        assert_eq!(ids(&root.children()), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn add_child_on_leaf_is_invalid() {
        let leaf = Node::leaf("x", 0).unwrap();
        let other = Node::leaf("x", 1).unwrap();
        let err = leaf.add_child(&other).unwrap_err();
        assert!(matches!(err, TreeError::InvalidOperation(_)));
        assert!(other.is_root());
    }

    #[test]
    fn add_child_rejects_attached_child() {
        let a = Node::container("a", 0).unwrap();
        let b = Node::container("b", 0).unwrap();
        let leaf = Node::leaf("l", 1).unwrap();
        a.add_child(&leaf).unwrap();

        assert!(matches!(
            b.add_child(&leaf),
            Err(TreeError::InvalidOperation(_))
        ));
        assert_eq!(leaf.parent(), Some(a.clone()));
        assert_eq!(b.child_count(), 0);
    }

    #[test]
    fn add_child_rejects_cycles() {
        let root = Node::container("a", 0).unwrap();
        let mid = Node::container("b", 1).unwrap();
        root.add_child(&mid).unwrap();

        assert!(matches!(
            mid.add_child(&root),
            Err(TreeError::InvalidOperation(_))
        ));
        assert!(matches!(
            root.add_child(&root),
            Err(TreeError::InvalidOperation(_))
        ));
        assert!(root.is_root());
        assert_eq!(mid.child_count(), 0);
    }

    #[test]
    fn re_adding_own_child_moves_it_last() {
        let root = Node::container("x", 0).unwrap();
        let first = Node::leaf("x", 1).unwrap();
        let second = Node::leaf("x", 2).unwrap();
        root.add_child(&first).unwrap();
        root.add_child(&second).unwrap();
        root.add_child(&first).unwrap();
        assert_eq!(ids(&root.children()), vec![2, 1]);
    }

    #[test]
    fn remove_by_id_detaches_and_keeps_order() {
        let root = Node::container("x", 0).unwrap();
        let children: Vec<_> = (1..=4).map(|v| Node::leaf("x", v).unwrap()).collect();
        for child in &children {
            root.add_child(child).unwrap();
        }

        let removed = root.remove_by_id(children[1].id()).unwrap().unwrap();
        assert_eq!(removed, children[1]);
        assert!(removed.is_root());
        assert_eq!(ids(&root.children()), vec![1, 3, 4]);
    }

    #[test]
    fn remove_by_id_does_not_recurse() {
        let root = Node::container("x", 0).unwrap();
        let mid = Node::container("y", 1).unwrap();
        let leaf = Node::leaf("y", 2).unwrap();
        root.add_child(&mid).unwrap();
        mid.add_child(&leaf).unwrap();

        assert!(root.remove_by_id(leaf.id()).unwrap().is_none());
        assert_eq!(mid.child_count(), 1);
    }

    #[test]
    fn insert_item_derives_leaf_type() {
        let root = Node::container("catalog", 0).unwrap();
        let family = Node::container("family", 1).unwrap();
        root.add_child(&family).unwrap();

        let leaf = root.insert_item(family.id(), 2).unwrap();
        assert_eq!(leaf.kind(), "family");
        assert!(!leaf.is_container());
        assert_eq!(leaf.parent(), Some(family.clone()));
    }

    #[test]
    fn insert_item_signals_missing_or_leaf_parent() {
        let root = Node::container("x", 0).unwrap();
        let leaf = root.insert_item(root.id(), 1).unwrap();
        let stranger = Node::container("x", 2).unwrap();

        assert!(matches!(
            root.insert_item(stranger.id(), 3),
            Err(TreeError::NotFound(_))
        ));
        assert!(matches!(
            root.insert_item(leaf.id(), 3),
            Err(TreeError::InvalidOperation(_))
        ));
        assert_eq!(root.child_count(), 1);
    }

    #[test]
    fn sort_recurses_into_containers_only() {
        let root = Node::container("x", 0).unwrap();
        let inner = Node::container("y", 5).unwrap();
        for value in [9, 2] {
            root.add_child(&Node::leaf("x", value).unwrap()).unwrap();
        }
        root.add_child(&inner).unwrap();
        for value in [8, 7, 6] {
            inner.add_child(&Node::leaf("y", value).unwrap()).unwrap();
        }

        root.sort(|a, b| a < b).unwrap();
        assert_eq!(ids(&root.children()), vec![2, 5, 9]);
        assert_eq!(ids(&inner.children()), vec![6, 7, 8]);
    }

    #[test]
    fn sort_is_stable() {
        let root = Node::container("x", (0, 'r')).unwrap();
        for pair in [(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')] {
            root.add_child(&Node::leaf("x", pair).unwrap()).unwrap();
        }
        root.sort_by(|a, b| a.0.cmp(&b.0)).unwrap();
        let order: Vec<char> = root.children().iter().map(|n| n.payload().1).collect();
        assert_eq!(order, vec!['b', 'd', 'a', 'c']);

        root.sort(|_, _| false).unwrap();
        let unchanged: Vec<char> = root.children().iter().map(|n| n.payload().1).collect();
        assert_eq!(unchanged, order);
    }

    #[test]
    fn sort_comparator_may_read_the_tree() {
        let root = Node::container("x", 0).unwrap();
        let inner = Node::container("y", 9).unwrap();
        for value in [3, 1] {
            root.insert_leaf(value).unwrap();
        }
        root.add_child(&inner).unwrap();
        inner.insert_leaf(4).unwrap();

        let handle = root.clone();
        let reads_tree =
            move |a: &i32, b: &i32| handle.child_count() == 3 && handle.depth() == 0 && a < b;
        root.sort(reads_tree).unwrap();
        assert_eq!(ids(&root.children()), vec![1, 3, 9]);
        assert_eq!(ids(&inner.children()), vec![4]);
    }

    #[test]
    fn sort_on_leaf_is_invalid() {
        let leaf = Node::leaf("x", 0).unwrap();
        assert!(matches!(
            leaf.sort(|a, b| a < b),
            Err(TreeError::InvalidOperation(_))
        ));
    }
}
