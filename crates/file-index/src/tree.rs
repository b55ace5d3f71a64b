//! Ordered index tree.
//!
//! An unbalanced binary search tree of [`KeyedRecord`]s. Nodes live in a
//! [`Slab`] and link to their children through [`OptionSlabIndex`] handles.
//! For every node, keys in the left subtree compare strictly less than the
//! node's key and keys in the right subtree compare greater-or-equal.
//!
//! Insert, find, and delete walk down from the root in a loop and
//! traversals keep an explicit stack, so a degenerate (list-shaped) tree
//! costs O(n) per operation but never deep recursion.

mod iter;

use std::cmp::Ordering;

use crate::record::KeyedRecord;
use crate::storage::{OptionSlabIndex, Slab, SlabIndex};
use crate::types::{DeleteOutcome, DuplicatePolicy, InsertOutcome};

pub use iter::{InOrderIter, PreOrderIter};

#[derive(Debug)]
struct TreeNode {
    record: KeyedRecord,
    left: OptionSlabIndex,
    right: OptionSlabIndex,
}

impl TreeNode {
    fn leaf(record: KeyedRecord) -> Self {
        Self {
            record,
            left: OptionSlabIndex::none(),
            right: OptionSlabIndex::none(),
        }
    }
}

/// The slot a node hangs from: the root pointer or one of a parent's children.
#[derive(Debug, Clone, Copy)]
enum Link {
    Root,
    Left(SlabIndex),
    Right(SlabIndex),
}

/// Binary search tree of records with a configurable duplicate-key policy.
#[derive(Debug)]
pub struct OrderedIndexTree {
    slab: Slab<TreeNode>,
    root: OptionSlabIndex,
    policy: DuplicatePolicy,
}

impl OrderedIndexTree {
    /// Creates an empty tree.
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            slab: Slab::new(),
            root: OptionSlabIndex::none(),
            policy,
        }
    }

    #[inline]
    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Returns the number of records in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.slab.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Drops every record.
    pub fn clear(&mut self) {
        self.slab.clear();
        self.root = OptionSlabIndex::none();
    }

    /// Inserts a record, honouring the duplicate-key policy on equal keys.
    pub fn insert(&mut self, record: KeyedRecord) -> InsertOutcome {
        let mut link = Link::Root;
        while let Some(current) = self.target(link) {
            let node = &self.slab[current];
            link = match record.key().cmp(node.record.key()) {
                Ordering::Less => Link::Left(current),
                Ordering::Greater => Link::Right(current),
                Ordering::Equal => match self.policy {
                    DuplicatePolicy::Reject => return InsertOutcome::RejectedDuplicate,
                    DuplicatePolicy::Allow => Link::Right(current),
                },
            };
        }

        let index = self.slab.insert(TreeNode::leaf(record));
        self.relink(link, Some(index));
        InsertOutcome::Inserted
    }

    /// Returns the first record with `key` met on the way down from the root.
    pub fn find(&self, key: &str) -> Option<&KeyedRecord> {
        self.locate(key).map(|(_, index)| &self.slab[index].record)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.locate(key).is_some()
    }

    /// Removes the first record with `key` met on the way down from the root.
    pub fn delete(&mut self, key: &str) -> DeleteOutcome {
        let Some((link, target)) = self.locate(key) else {
            return DeleteOutcome::NotFound;
        };

        let node = &self.slab[target];
        match (node.left.to_option(), node.right.to_option()) {
            // No children, or exactly one: splice the child (if any) into our slot.
            (None, child) | (child, None) => {
                self.relink(link, child);
                self.slab.try_remove(target);
            }
            (Some(_), Some(right)) => {
                // The in-order successor is the leftmost node of the right
                // subtree. It has no left child, so unlinking it is the
                // one-child case above.
                let mut successor_link = Link::Right(target);
                let mut successor = right;
                while let Some(next) = self.slab[successor].left.to_option() {
                    successor_link = Link::Left(successor);
                    successor = next;
                }
                let successor_right = self.slab[successor].right.to_option();
                self.relink(successor_link, successor_right);
                if let Some(moved) = self.slab.try_remove(successor) {
                    self.slab[target].record = moved.record;
                }
            }
        }
        DeleteOutcome::Deleted
    }

    /// Iterates records in ascending key order.
    pub fn iter(&self) -> InOrderIter<'_> {
        InOrderIter::new(self)
    }

    /// Iterates records node-first, then left subtree, then right subtree.
    ///
    /// Re-inserting records in this order rebuilds an identically shaped tree.
    pub fn iter_pre_order(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }

    /// Number of nodes on the longest root-to-leaf path (0 when empty).
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(SlabIndex, usize)> = self
            .root
            .to_option()
            .map(|root| (root, 1))
            .into_iter()
            .collect();
        while let Some((index, depth)) = stack.pop() {
            height = height.max(depth);
            let node = &self.slab[index];
            for child in [node.left, node.right] {
                if let Some(child) = child.to_option() {
                    stack.push((child, depth + 1));
                }
            }
        }
        height
    }

    /// Finds the first node holding `key` along with the slot it hangs from.
    fn locate(&self, key: &str) -> Option<(Link, SlabIndex)> {
        let mut link = Link::Root;
        while let Some(current) = self.target(link) {
            link = match key.cmp(self.slab[current].record.key()) {
                Ordering::Less => Link::Left(current),
                Ordering::Greater => Link::Right(current),
                Ordering::Equal => return Some((link, current)),
            };
        }
        None
    }

    fn target(&self, link: Link) -> Option<SlabIndex> {
        match link {
            Link::Root => self.root.to_option(),
            Link::Left(parent) => self.slab[parent].left.to_option(),
            Link::Right(parent) => self.slab[parent].right.to_option(),
        }
    }

    fn relink(&mut self, link: Link, child: Option<SlabIndex>) {
        let child = OptionSlabIndex::from_option(child);
        match link {
            Link::Root => self.root = child,
            Link::Left(parent) => self.slab[parent].left = child,
            Link::Right(parent) => self.slab[parent].right = child,
        }
    }

    #[cfg(test)]
    fn reachable_nodes(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<SlabIndex> = self.root.to_option().into_iter().collect();
        while let Some(index) = stack.pop() {
            count += 1;
            let node = &self.slab[index];
            stack.extend(node.left.to_option());
            stack.extend(node.right.to_option());
        }
        count
    }
}

impl<'a> IntoIterator for &'a OrderedIndexTree {
    type Item = &'a KeyedRecord;
    type IntoIter = InOrderIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
