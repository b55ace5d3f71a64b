//! Lazy traversals over an [`OrderedIndexTree`].

use super::OrderedIndexTree;
use crate::record::KeyedRecord;
use crate::storage::SlabIndex;

/// Ascending-key traversal (left subtree, node, right subtree).
pub struct InOrderIter<'a> {
    tree: &'a OrderedIndexTree,
    stack: Vec<SlabIndex>,
}

impl<'a> InOrderIter<'a> {
    pub(super) fn new(tree: &'a OrderedIndexTree) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::new(),
        };
        iter.push_left_spine(tree.root.to_option());
        iter
    }

    fn push_left_spine(&mut self, mut current: Option<SlabIndex>) {
        while let Some(index) = current {
            self.stack.push(index);
            current = self.tree.slab[index].left.to_option();
        }
    }
}

impl<'a> Iterator for InOrderIter<'a> {
    type Item = &'a KeyedRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let tree = self.tree;
        let node = &tree.slab[index];
        self.push_left_spine(node.right.to_option());
        Some(&node.record)
    }
}

/// Node-first traversal (node, left subtree, right subtree).
pub struct PreOrderIter<'a> {
    tree: &'a OrderedIndexTree,
    stack: Vec<SlabIndex>,
}

impl<'a> PreOrderIter<'a> {
    pub(super) fn new(tree: &'a OrderedIndexTree) -> Self {
        Self {
            tree,
            stack: tree.root.to_option().into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIter<'a> {
    type Item = &'a KeyedRecord;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.stack.pop()?;
        let tree = self.tree;
        let node = &tree.slab[index];
        // Right goes on first so the left subtree is visited before it.
        self.stack.extend(node.right.to_option());
        self.stack.extend(node.left.to_option());
        Some(&node.record)
    }
}
