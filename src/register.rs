use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::tombstones::Tombstones;
use crate::version::{Versioned, ViewKind};
use crate::view::{Dumpable, View};
use crate::{Tag, ViewOptions};

/// A register over a causal tag DAG.
///
/// Every write carries a fresh tag plus the set of tags it supersedes
/// (`previous_tags` — the writes the author had observed). Superseded tags
/// move to tombstones; a tag stays live only while no delivered write has
/// named it as a predecessor. Concurrent writes therefore coexist as
/// multiple live tags until a later write supersedes them both, exactly
/// like a multi-value register.
///
/// [`value`](Self::value) projects the multi-value state to a single value
/// deterministically: the value of the smallest live tag.
///
/// # Example
///
/// ```
/// use convergent::{Register, Tag};
///
/// let mut reg = Register::new();
/// reg.set(&[], Tag::from("a"), 1);
/// reg.set(&[Tag::from("a")], Tag::from("b"), 2);
///
/// assert_eq!(reg.tags(), vec![&Tag::from("b")]);
/// assert_eq!(reg.value(), Some(&2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Register<V: Clone> {
    live: BTreeMap<Tag, V>,
    tombstones: Tombstones<Tag>,
}

/// A register update message: `tag` supersedes everything in
/// `previous_tags`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RegisterOp<V> {
    /// Tags this write supersedes.
    pub previous_tags: Vec<Tag>,
    /// The fresh tag identifying this write.
    pub tag: Tag,
    /// The written value.
    pub value: V,
}

/// Serialized [`Register`] state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegisterDump<V> {
    /// Live `(tag, value)` pairs in tag order.
    pub live: Vec<(Tag, V)>,
    /// Killed tags in sorted order.
    pub tombstones: Vec<Tag>,
    /// Whether tombstone tracking was disabled.
    pub no_tombstones: bool,
}

impl<V: Clone> Register<V> {
    /// Create an empty register with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ViewOptions::new())
    }

    /// Create an empty register with explicit options.
    #[must_use]
    pub fn with_options(options: ViewOptions) -> Self {
        Self {
            live: BTreeMap::new(),
            tombstones: Tombstones::new(options.no_tombstones),
        }
    }

    /// Write `value` under `tag`, superseding `previous_tags`.
    ///
    /// Convenience for applying a [`RegisterOp`] built from the arguments.
    pub fn set(&mut self, previous_tags: &[Tag], tag: Tag, value: V) {
        self.apply(&RegisterOp {
            previous_tags: previous_tags.to_vec(),
            tag,
            value,
        });
    }

    /// The live tags, in sorted order.
    #[must_use]
    pub fn tags(&self) -> Vec<&Tag> {
        self.live.keys().collect()
    }

    /// The single-value projection: the value of the smallest live tag,
    /// or `None` while nothing has been written (or everything superseded).
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.live.values().next()
    }

    /// All live values in tag order. More than one entry means concurrent
    /// writes that no delivered write has yet superseded.
    #[must_use]
    pub fn values(&self) -> Vec<&V> {
        self.live.values().collect()
    }

    /// Returns `true` if concurrent writes are currently visible.
    #[must_use]
    pub fn is_conflicted(&self) -> bool {
        self.live.len() > 1
    }

    /// Number of live tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// `true` while no live tag exists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl<V: Clone> View for Register<V> {
    type Op = RegisterOp<V>;

    fn apply(&mut self, op: &RegisterOp<V>) {
        // Supersession is processed unconditionally: a write whose own birth
        // arrives too late must still kill its predecessors, or replicas
        // that saw different delivery orders disagree about them.
        for prev in &op.previous_tags {
            self.live.remove(prev);
            self.tombstones.kill(prev.clone());
        }
        if !self.tombstones.contains(&op.tag) {
            self.live.insert(op.tag.clone(), op.value.clone());
        }
    }
}

impl<V: Clone> Dumpable for Register<V> {
    type Dump = RegisterDump<V>;

    fn dump(&self) -> RegisterDump<V> {
        RegisterDump {
            live: self
                .live
                .iter()
                .map(|(tag, value)| (tag.clone(), value.clone()))
                .collect(),
            tombstones: self.tombstones.to_vec(),
            no_tombstones: !self.tombstones.is_recording(),
        }
    }

    fn load(dump: RegisterDump<V>) -> Self {
        Self {
            live: dump.live.into_iter().collect(),
            tombstones: Tombstones::from_parts(dump.no_tombstones, dump.tombstones),
        }
    }
}

impl<V: Clone> Versioned for Register<V> {
    const CURRENT_VERSION: u8 = 1;
    const VIEW_KIND: ViewKind = ViewKind::Register;
}

impl<V: Clone> Default for Register<V> {
    fn default() -> Self {
        Self::new()
    }
}
