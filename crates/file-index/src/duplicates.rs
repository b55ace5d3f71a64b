//! Duplicate detection over the index tree.
//!
//! A scan walks the tree once and buckets record paths by a grouping key.
//! Grouping by [`GroupBy::Key`] on a digest-keyed index finds files with
//! identical content; grouping by [`GroupBy::Path`] finds the same file
//! indexed twice. The tree itself is never modified.

use std::collections::BTreeMap;

use crate::tree::OrderedIndexTree;
use crate::types::GroupBy;

/// Paths bucketed by grouping key.
///
/// Uses `BTreeMap` for deterministic iteration order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DuplicateGroups {
    group_by: GroupBy,
    groups: BTreeMap<String, Vec<String>>,
}

impl DuplicateGroups {
    pub fn group_by(&self) -> GroupBy {
        self.group_by
    }

    /// Number of distinct grouping keys seen, including singletons.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn paths(&self, key: &str) -> Option<&[String]> {
        self.groups.get(key).map(Vec::as_slice)
    }
}

/// A grouping key shared by two or more records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub key: String,
    /// Paths in the order the scan met them (ascending tree key).
    pub paths: Vec<String>,
}

/// Buckets every record's path under the field chosen by `group_by`.
pub fn scan(tree: &OrderedIndexTree, group_by: GroupBy) -> DuplicateGroups {
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for record in tree {
        let key = match group_by {
            GroupBy::Key => record.key(),
            GroupBy::Path => record.path(),
            GroupBy::Name => record.name(),
        };
        groups
            .entry(key.to_owned())
            .or_default()
            .push(record.path().to_owned());
    }
    DuplicateGroups { group_by, groups }
}

/// Yields only the groups holding at least two paths.
pub fn report(groups: DuplicateGroups) -> impl Iterator<Item = DuplicateGroup> {
    groups
        .groups
        .into_iter()
        .filter(|(_, paths)| paths.len() > 1)
        .map(|(key, paths)| DuplicateGroup { key, paths })
}
