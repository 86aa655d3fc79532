//! Ordered container tree.
//!
//! This module provides a tree of typed nodes where every node carries a
//! payload, a type tag, and an ordered list of children. A node is a
//! container when its type tag ends with [`CONTAINER_MARKER`]; only containers
//! may hold children. Parents own their children, and each child keeps a
//! non-owning link back to its parent.

mod lookup;
mod mutation;
mod path;
mod serial;
mod traversal;

use std::{
    fmt::{self, Debug},
    sync::{Arc, Weak},
};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::warn;

use crate::{
    error::{Result, TreeError},
    identity::Identity,
};

/// Suffix on a type tag that marks a node as a container.
pub const CONTAINER_MARKER: &str = "_container";

/// Hook that renders a whole row of the pretty printer for a node.
pub type RowFormatter<T> = Arc<dyn Fn(&Node<T>) -> String + Send + Sync>;

struct NodeState<T> {
    id: Identity,
    kind: String,
    payload: RwLock<T>,
    links: RwLock<Links<T>>,
}

struct Links<T> {
    open: bool,
    parent: Weak<NodeState<T>>,
    children: Vec<Node<T>>,
    header: Option<Vec<String>>,
    row_formatter: Option<RowFormatter<T>>,
}

/// Handle to a node of a tree.
///
/// Cloning a handle is cheap and yields another handle to the same node;
/// handles compare equal only when they refer to the same node.
pub struct Node<T> {
    state: Arc<NodeState<T>>,
}

impl<T> Node<T> {
    /// Creates a detached node with a fresh identity.
    ///
    /// The container marker is appended to `kind` when `is_container` is set
    /// and removed from it when it is not, so [`Node::is_container`] always
    /// agrees with the flag. Containers start open.
    ///
    /// # Arguments
    /// * `kind` - Type tag of the payload schema
    /// * `is_container` - Whether the node may hold children
    /// * `payload` - The value to store in the node
    ///
    /// # Returns
    /// * `Result<Node<T>>` - The new node, or `RandomnessUnavailable`
    pub fn new(kind: impl Into<String>, is_container: bool, payload: T) -> Result<Self> {
        let id = Identity::new()?;
        let kind = normalize_kind(kind.into(), is_container);
        Ok(Self::assemble(id, kind, is_container, payload))
    }

    /// Creates a detached container node.
    pub fn container(kind: impl Into<String>, payload: T) -> Result<Self> {
        Self::new(kind, true, payload)
    }

    /// Creates a detached leaf node.
    pub fn leaf(kind: impl Into<String>, payload: T) -> Result<Self> {
        Self::new(kind, false, payload)
    }

    pub(crate) fn assemble(id: Identity, kind: String, open: bool, payload: T) -> Self {
        let open = open && kind.ends_with(CONTAINER_MARKER);
        Self {
            state: Arc::new(NodeState {
                id,
                kind,
                payload: RwLock::new(payload),
                links: RwLock::new(Links {
                    open,
                    parent: Weak::new(),
                    children: Vec::new(),
                    header: None,
                    row_formatter: None,
                }),
            }),
        }
    }

    pub fn id(&self) -> Identity {
        self.state.id
    }

    /// Type tag, including the container marker for containers.
    pub fn kind(&self) -> &str {
        &self.state.kind
    }

    /// Type tag without the container marker.
    pub fn base_kind(&self) -> &str {
        self.kind()
            .strip_suffix(CONTAINER_MARKER)
            .unwrap_or(self.kind())
    }

    pub fn is_container(&self) -> bool {
        self.state.kind.ends_with(CONTAINER_MARKER)
    }

    pub fn has_children(&self) -> bool {
        self.is_container() && !self.state.links.read().children.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.is_container() && self.state.links.read().open
    }

    /// Sets the disclosure flag. Ignored (kept false) on leaves.
    pub fn set_open(&self, open: bool) {
        self.state.links.write().open = open && self.is_container();
    }

    pub fn parent(&self) -> Option<Node<T>> {
        self.state
            .links
            .read()
            .parent
            .upgrade()
            .map(|state| Node { state })
    }

    pub fn is_root(&self) -> bool {
        self.state.links.read().parent.upgrade().is_none()
    }

    /// Number of parent links between this node and its root.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.parent();
        while let Some(node) = current {
            depth += 1;
            current = node.parent();
        }
        depth
    }

    /// Snapshot of the child handles in order.
    pub fn children(&self) -> Vec<Node<T>> {
        self.state.links.read().children.clone()
    }

    pub fn child_count(&self) -> usize {
        self.state.links.read().children.len()
    }

    pub fn payload(&self) -> RwLockReadGuard<'_, T> {
        self.state.payload.read()
    }

    pub fn payload_mut(&self) -> RwLockWriteGuard<'_, T> {
        self.state.payload.write()
    }

    /// Swaps in a new payload and returns the previous one.
    pub fn replace_payload(&self, payload: T) -> T {
        std::mem::replace(&mut *self.state.payload.write(), payload)
    }

    /// Column titles used when this node is printed as a root.
    pub fn header(&self) -> Option<Vec<String>> {
        self.state.links.read().header.clone()
    }

    pub fn set_header<S: Into<String>>(&self, header: impl IntoIterator<Item = S>) {
        self.state.links.write().header = Some(header.into_iter().map(Into::into).collect());
    }

    pub fn clear_header(&self) {
        self.state.links.write().header = None;
    }

    pub fn row_formatter(&self) -> Option<RowFormatter<T>> {
        self.state.links.read().row_formatter.clone()
    }

    /// Installs the hook used for every row when this node is printed as a root.
    pub fn set_row_formatter<F>(&self, formatter: F)
    where
        F: Fn(&Node<T>) -> String + Send + Sync + 'static,
    {
        self.state.links.write().row_formatter = Some(Arc::new(formatter));
    }

    pub fn clear_row_formatter(&self) {
        self.state.links.write().row_formatter = None;
    }

    /// Whether `self` is `other` or lies on the path from `other` to its root.
    pub(crate) fn is_self_or_ancestor_of(&self, other: &Node<T>) -> bool {
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node == *self {
                return true;
            }
            current = node.parent();
        }
        false
    }

    pub(crate) fn require_container(&self, operation: &'static str) -> Result<()> {
        if self.is_container() {
            return Ok(());
        }
        warn!(node = %self.id(), kind = self.kind(), operation, "Container operation on leaf");
        Err(TreeError::InvalidOperation(format!(
            "{} requires a container, {} ({}) is a leaf",
            operation,
            self.id(),
            self.kind()
        )))
    }
}

fn normalize_kind(kind: String, is_container: bool) -> String {
    let has_marker = kind.ends_with(CONTAINER_MARKER);
    match (is_container, has_marker) {
        (true, false) => format!("{}{}", kind, CONTAINER_MARKER),
        (false, true) => kind[..kind.len() - CONTAINER_MARKER.len()].to_string(),
        _ => kind,
    }
}

// Children are released from an explicit stack so dropping a deep tree
// never recurses through the drop glue.
impl<T> Drop for NodeState<T> {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.links.get_mut().children);
        while let Some(node) = pending.pop() {
            if let Ok(mut state) = Arc::try_unwrap(node.state) {
                pending.append(&mut state.links.get_mut().children);
            }
        }
    }
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }
}

impl<T> Eq for Node<T> {}

impl<T: Debug> Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id())
            .field("type", &self.kind())
            .field("open", &self.is_open())
            .field("payload", &*self.payload())
            .field("children", &self.children())
            .finish()
    }
}
