use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use crate::tombstones::Tombstones;
use crate::version::{Versioned, ViewKind};
use crate::view::{Dumpable, View};
use crate::{Tag, ViewOptions};

/// An observed-remove set (OR-Set).
///
/// Each add carries a unique tag; a value is present while at least one of
/// its add-tags is live. A remove kills exactly the tags the remover had
/// observed, so an add that was concurrent with the remove survives it.
/// Killed tags go to tombstones, which also swallow an add that arrives
/// after its own remove.
///
/// # Example
///
/// ```
/// use convergent::{OrSet, Tag};
///
/// let mut set = OrSet::new();
/// set.add(Tag::from("t1"), "x");
/// set.remove(&[Tag::from("t1")], &"x");
/// assert!(!set.has(&"x"));
///
/// // A fresh tag re-adds the value.
/// set.add(Tag::from("t2"), "x");
/// assert!(set.has(&"x"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrSet<V: Ord + Clone> {
    /// value -> live add-tags. Tag sets are never empty.
    elements: BTreeMap<V, BTreeSet<Tag>>,
    tombstones: Tombstones<Tag>,
}

/// A set update message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum SetOp<V> {
    /// Add `value` under a fresh `tag`.
    Add {
        /// The unique tag stamped on this add.
        tag: Tag,
        /// The added value.
        value: V,
    },
    /// Kill the given add-tags of `value`.
    Remove {
        /// The value being removed.
        value: V,
        /// The add-tags the remover observed (one or many).
        tags: Vec<Tag>,
    },
}

/// Serialized [`OrSet`] state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetDump<V> {
    /// `(value, live add-tags)` pairs in value order.
    pub elements: Vec<(V, Vec<Tag>)>,
    /// Killed tags in sorted order.
    pub tombstones: Vec<Tag>,
    /// Whether tombstone tracking was disabled.
    pub no_tombstones: bool,
}

impl<V: Ord + Clone> OrSet<V> {
    /// Create an empty set with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ViewOptions::new())
    }

    /// Create an empty set with explicit options.
    #[must_use]
    pub fn with_options(options: ViewOptions) -> Self {
        Self {
            elements: BTreeMap::new(),
            tombstones: Tombstones::new(options.no_tombstones),
        }
    }

    /// Add `value` under a fresh `tag`.
    pub fn add(&mut self, tag: Tag, value: V) {
        self.apply(&SetOp::Add { tag, value });
    }

    /// Remove `value` by killing the given add-tags.
    pub fn remove(&mut self, tags: &[Tag], value: &V) {
        self.apply(&SetOp::Remove {
            value: value.clone(),
            tags: tags.to_vec(),
        });
    }

    /// The live add-tags for `value`, sorted; empty if the value is absent.
    #[must_use]
    pub fn tags(&self, value: &V) -> Vec<&Tag> {
        self.elements
            .get(value)
            .map(|tags| tags.iter().collect())
            .unwrap_or_default()
    }

    /// Check whether `value` is present.
    #[must_use]
    pub fn has(&self, value: &V) -> bool {
        self.elements.contains_key(value)
    }

    /// Number of distinct present values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// `true` when no value is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Iterate `(value, live add-tags)` pairs in insertion order — ordered
    /// by each value's smallest live tag.
    pub fn iter(&self) -> impl Iterator<Item = (&V, &BTreeSet<Tag>)> {
        let mut entries: Vec<(&V, &BTreeSet<Tag>)> = self.elements.iter().collect();
        // Tag sets are non-empty, so each has a first element.
        entries.sort_by(|a, b| a.1.first().cmp(&b.1.first()));
        entries.into_iter()
    }

    /// The present values, ordered by smallest live tag.
    #[must_use]
    pub fn to_vec(&self) -> Vec<V> {
        self.iter().map(|(value, _)| value.clone()).collect()
    }
}

impl<V: Ord + Clone> View for OrSet<V> {
    type Op = SetOp<V>;

    fn apply(&mut self, op: &SetOp<V>) {
        match op {
            SetOp::Add { tag, value } => {
                if !self.tombstones.contains(tag) {
                    self.elements
                        .entry(value.clone())
                        .or_default()
                        .insert(tag.clone());
                }
            }
            SetOp::Remove { value, tags } => {
                for tag in tags {
                    self.tombstones.kill(tag.clone());
                    if let Some(live) = self.elements.get_mut(value) {
                        live.remove(tag);
                        if live.is_empty() {
                            self.elements.remove(value);
                        }
                    }
                }
            }
        }
    }
}

impl<V: Ord + Clone> Dumpable for OrSet<V> {
    type Dump = SetDump<V>;

    fn dump(&self) -> SetDump<V> {
        SetDump {
            elements: self
                .elements
                .iter()
                .map(|(value, tags)| (value.clone(), tags.iter().cloned().collect()))
                .collect(),
            tombstones: self.tombstones.to_vec(),
            no_tombstones: !self.tombstones.is_recording(),
        }
    }

    fn load(dump: SetDump<V>) -> Self {
        Self {
            elements: dump
                .elements
                .into_iter()
                .filter(|(_, tags)| !tags.is_empty())
                .map(|(value, tags)| (value, tags.into_iter().collect()))
                .collect(),
            tombstones: Tombstones::from_parts(dump.no_tombstones, dump.tombstones),
        }
    }
}

impl<V: Ord + Clone> Versioned for OrSet<V> {
    const CURRENT_VERSION: u8 = 1;
    const VIEW_KIND: ViewKind = ViewKind::Set;
}

impl<V: Ord + Clone> Default for OrSet<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Ord + Clone> IntoIterator for OrSet<V> {
    type Item = V;
    type IntoIter = alloc::vec::IntoIter<V>;

    fn into_iter(self) -> Self::IntoIter {
        self.to_vec().into_iter()
    }
}
