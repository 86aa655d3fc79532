//! Serde support for trees.
//!
//! A tree serializes as a flat list of `{ id, parent, type, open, payload }`
//! records in pre-order, the root first with no parent. Nesting depth of the
//! encoding does not grow with the depth of the tree, so any tree that can be
//! built can be read back. Deserializing rebuilds the parent links and keeps
//! identities and child order exactly as written. Headers and row formatters
//! are presentation state and are not part of the encoding.

use std::{collections::HashMap, sync::Arc};

use serde::{
    de::Error as _,
    ser::SerializeSeq,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::{
    error::{Result, TreeError},
    identity::Identity,
};

use super::Node;

#[derive(Serialize)]
struct RecordRef<'a, T> {
    id: Identity,
    parent: Option<Identity>,
    #[serde(rename = "type")]
    kind: &'a str,
    open: bool,
    payload: &'a T,
}

impl<T: Serialize> Serialize for Node<T> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut records = serializer.serialize_seq(Some(self.size()))?;

        let mut stack = vec![(self.clone(), None)];
        while let Some((node, parent)) = stack.pop() {
            {
                let payload = node.payload();
                records.serialize_element(&RecordRef {
                    id: node.id(),
                    parent,
                    kind: node.kind(),
                    open: node.is_open(),
                    payload: &*payload,
                })?;
            }
            let id = node.id();
            stack.extend(node.children().into_iter().rev().map(|child| (child, Some(id))));
        }

        records.end()
    }
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct NodeRecord<T> {
    id: Identity,
    #[serde(default)]
    parent: Option<Identity>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    open: bool,
    payload: T,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Node<T> {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records = Vec::<NodeRecord<T>>::deserialize(deserializer)?;
        rebuild(records).map_err(D::Error::custom)
    }
}

/// Reassembles a tree from records where every parent precedes its children.
fn rebuild<T>(records: Vec<NodeRecord<T>>) -> Result<Node<T>> {
    let mut records = records.into_iter();
    let first = records
        .next()
        .ok_or_else(|| TreeError::InvalidOperation("empty node list".to_string()))?;
    if let Some(parent) = first.parent {
        return Err(TreeError::InvalidOperation(format!(
            "root {} names parent {}",
            first.id, parent
        )));
    }

    let root = Node::assemble(first.id, first.kind, first.open, first.payload);
    let mut nodes = HashMap::new();
    nodes.insert(root.id(), root.clone());

    for record in records {
        if nodes.contains_key(&record.id) {
            return Err(TreeError::InvalidOperation(format!(
                "duplicate identity {}",
                record.id
            )));
        }
        let parent_id = record.parent.ok_or_else(|| {
            TreeError::InvalidOperation(format!("{} is a second root", record.id))
        })?;
        let parent = nodes.get(&parent_id).cloned().ok_or_else(|| {
            TreeError::NotFound(format!("parent {} of {}", parent_id, record.id))
        })?;
        if !parent.is_container() {
            return Err(TreeError::InvalidOperation(format!(
                "leaf {} ({}) has children",
                parent.id(),
                parent.kind()
            )));
        }

        // Fresh nodes cannot form a cycle, so link them without the ancestor walk
        let node = Node::assemble(record.id, record.kind, record.open, record.payload);
        node.state.links.write().parent = Arc::downgrade(&parent.state);
        parent.state.links.write().children.push(node.clone());
        nodes.insert(node.id(), node);
    }

    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn round_trip_keeps_identity_order_and_flags() {
        let root = Node::container("x", 0u32).unwrap();
        let closed = Node::container("y", 1u32).unwrap();
        closed.set_open(false);
        root.add_child(&closed).unwrap();
        let a = closed.insert_leaf(2).unwrap();
        let b = root.insert_leaf(3).unwrap();

        let text = serde_json::to_string(&root).unwrap();
        let back: Node<u32> = serde_json::from_str(&text).unwrap();

        assert_eq!(back.id(), root.id());
        assert_eq!(back.descendant_ids(), root.descendant_ids());
        assert_eq!(back.flatten(), vec![0, 1, 2, 3]);

        let closed_back = back.find_by_id(closed.id()).unwrap();
        assert!(!closed_back.is_open());
        assert_eq!(closed_back.kind(), "y_container");
        assert_eq!(closed_back.parent().unwrap().id(), root.id());
        assert_eq!(back.find_by_id(a.id()).unwrap().depth(), 2);
        assert_eq!(back.find_by_id(b.id()).unwrap().kind(), "x");
    }

    #[test]
    fn encoding_shape() {
        let root = Node::container("family", "r".to_string()).unwrap();
        let leaf = root.insert_leaf("v".to_string()).unwrap();
        let value = serde_json::to_value(&root).unwrap();
        assert_eq!(
            value,
            json!([
                {
                    "id": root.id().to_string(),
                    "parent": null,
                    "type": "family_container",
                    "open": true,
                    "payload": "r"
                },
                {
                    "id": leaf.id().to_string(),
                    "parent": root.id().to_string(),
                    "type": "family",
                    "open": false,
                    "payload": "v"
                }
            ])
        );
    }

    #[test]
    fn rejects_duplicate_identities() {
        let id = Identity::new().unwrap().to_string();
        let doc = json!([
            { "id": id, "type": "x_container", "payload": 0 },
            { "id": id, "parent": id, "type": "x", "payload": 1 }
        ]);
        assert!(serde_json::from_value::<Node<i32>>(doc).is_err());
    }

    #[test]
    fn rejects_leaf_with_children() {
        let root = Identity::new().unwrap().to_string();
        let doc = json!([
            { "id": root, "type": "x", "payload": 0 },
            { "id": Identity::new().unwrap().to_string(), "parent": root, "type": "x", "payload": 1 }
        ]);
        assert!(serde_json::from_value::<Node<i32>>(doc).is_err());
    }

    #[test]
    fn rejects_orphans_and_extra_roots() {
        let root = Identity::new().unwrap().to_string();
        let orphan = json!([
            { "id": root, "type": "x_container", "payload": 0 },
            {
                "id": Identity::new().unwrap().to_string(),
                "parent": Identity::new().unwrap().to_string(),
                "type": "x",
                "payload": 1
            }
        ]);
        assert!(serde_json::from_value::<Node<i32>>(orphan).is_err());

        let two_roots = json!([
            { "id": root, "type": "x_container", "payload": 0 },
            { "id": Identity::new().unwrap().to_string(), "type": "x", "payload": 1 }
        ]);
        assert!(serde_json::from_value::<Node<i32>>(two_roots).is_err());

        assert!(serde_json::from_value::<Node<i32>>(json!([])).is_err());
    }

    #[test]
    fn deep_chain_reads_back() {
        let mut root = Node::leaf("x", 0u32).unwrap();
        for value in 1..=500 {
            let parent = Node::container("x", value).unwrap();
            parent.add_child(&root).unwrap();
            root = parent;
        }

        let text = serde_json::to_string(&root).unwrap();
        let back: Node<u32> = serde_json::from_str(&text).unwrap();
        assert_eq!(back.size(), 501);
        assert_eq!(back.descendant_ids(), root.descendant_ids());
        assert_eq!(back.flatten(), root.flatten());
    }
}
