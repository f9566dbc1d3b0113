//! Self-referential hierarchies rebuilt from flat lists.
//!
//! Nodes live in one arena indexed by identifier. A parent seen before its own
//! row gets a bare stub that is filled in when the row arrives, so child rows
//! may precede their parents in any order.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::HashMap;

const ROOT: usize = 0;

#[derive(Debug, Clone)]
struct Node<T> {
    id: Option<String>,
    record: Option<T>,
    children: Vec<usize>,
}

impl<T> Node<T> {
    fn stub(id: Option<String>) -> Self {
        Self {
            id,
            record: None,
            children: Vec::new(),
        }
    }
}

/// Tree under a synthetic root. Records whose parent never shows up hang off
/// an unresolved stub and are not reachable from the root.
#[derive(Debug, Clone)]
pub struct Hierarchy<T> {
    nodes: Vec<Node<T>>,
    index: HashMap<String, usize>,
}

impl<T> Hierarchy<T> {
    /// `link` returns the record id and its parent id, `None` for a top-level
    /// record. Records without an id (`link` returns `None`) are skipped.
    pub fn build<I, F>(records: I, link: F) -> Self
    where
        I: IntoIterator<Item = T>,
        F: Fn(&T) -> Option<(String, Option<String>)>,
    {
        let mut tree = Self {
            nodes: vec![Node::stub(None)],
            index: HashMap::new(),
        };

        for record in records {
            let Some((id, parent)) = link(&record) else {
                continue;
            };
            let node = tree.slot(&id);
            if tree.nodes[node].record.is_some() {
                tracing::debug!(id = %id, "duplicate hierarchy record ignored");
                continue;
            }
            tree.nodes[node].record = Some(record);
            let parent = match parent {
                Some(parent) => tree.slot(&parent),
                None => ROOT,
            };
            tree.nodes[parent].children.push(node);
        }
        tree
    }

    fn slot(&mut self, id: &str) -> usize {
        if let Some(index) = self.index.get(id) {
            return *index;
        }
        let index = self.nodes.len();
        self.nodes.push(Node::stub(Some(id.to_string())));
        self.index.insert(id.to_string(), index);
        index
    }

    pub fn root(&self) -> TreeNode<'_, T> {
        TreeNode {
            tree: self,
            index: ROOT,
        }
    }

    pub fn get(&self, id: &str) -> Option<TreeNode<'_, T>> {
        self.index.get(id).map(|index| TreeNode {
            tree: self,
            index: *index,
        })
    }

    /// Ids referenced as a parent but never supplied as a record.
    pub fn unresolved(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| node.record.is_none())
            .filter_map(|node| node.id.as_deref())
            .collect()
    }

    /// Number of records placed in the arena.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|node| node.record.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Borrowed view of one node.
pub struct TreeNode<'a, T> {
    tree: &'a Hierarchy<T>,
    index: usize,
}

impl<'a, T> TreeNode<'a, T> {
    fn node(&self) -> &'a Node<T> {
        &self.tree.nodes[self.index]
    }

    /// `None` for the synthetic root.
    pub fn id(&self) -> Option<&'a str> {
        self.node().id.as_deref()
    }

    /// `None` for the root and for stubs.
    pub fn record(&self) -> Option<&'a T> {
        self.node().record.as_ref()
    }

    pub fn children(&self) -> impl Iterator<Item = TreeNode<'a, T>> + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |index| TreeNode { tree, index: *index })
    }

    pub fn child_ids(&self) -> Vec<&'a str> {
        self.children().filter_map(|child| child.id()).collect()
    }
}

impl<T: Serialize> Serialize for TreeNode<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("id", &self.id())?;
        if let Some(record) = self.record() {
            map.serialize_entry("record", record)?;
        }
        let children: Vec<TreeNode<'_, T>> = self.children().collect();
        if !children.is_empty() {
            map.serialize_entry("children", &children)?;
        }
        map.end()
    }
}

impl<T: Serialize> Serialize for Hierarchy<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root().serialize(serializer)
    }
}
