use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use crate::position::{Position, PositionalTag, SiteId};
use crate::tombstones::Tombstones;
use crate::version::{Versioned, ViewKind};
use crate::view::{Dumpable, View};
use crate::ViewOptions;

/// An ordered list keyed by dense positional tags.
///
/// Element order is the total order on [`PositionalTag`]s, so the sorted
/// map *is* the sequence: no index shifting, no re-anchoring on concurrent
/// edits. [`between`](Self::between) mints a fresh tag strictly between any
/// two existing ones (or the virtual ends), which is how an insert claims
/// its place before being broadcast.
///
/// Removal tombstones the tag; a late or duplicated insert naming a
/// tombstoned tag is a no-op, so any delivery order of the same insert and
/// remove messages converges.
///
/// # Example
///
/// ```
/// use convergent::{List, SiteId};
///
/// let mut list = List::new();
/// let first = list.between(None, None, Some(&SiteId::from("s1")));
/// list.insert(first.clone(), "a");
///
/// // Mint a position after `first`, at the end of the list.
/// let second = list.between(Some(&first), None, Some(&SiteId::from("s1")));
/// list.insert(second, "b");
///
/// assert_eq!(list.to_vec(), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone)]
pub struct List<V: Clone> {
    entries: BTreeMap<PositionalTag, V>,
    tombstones: Tombstones<PositionalTag>,
    entropy: fn() -> u64,
}

/// A list update message.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "lowercase"))]
pub enum ListOp<V> {
    /// Insert `value` at the position named by `tag`.
    Insert {
        /// The minted positional tag.
        tag: PositionalTag,
        /// The inserted value.
        value: V,
    },
    /// Remove the element at the position named by `tag`.
    Remove {
        /// The positional tag to kill.
        tag: PositionalTag,
    },
}

/// Serialized [`List`] state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ListDump<V> {
    /// `(tag, value)` pairs in tag order.
    pub entries: Vec<(PositionalTag, V)>,
    /// Killed positional tags in sorted order.
    pub tombstones: Vec<PositionalTag>,
    /// Whether tombstone tracking was disabled.
    pub no_tombstones: bool,
}

impl<V: Clone> List<V> {
    /// Create an empty list with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(ViewOptions::new())
    }

    /// Create an empty list with explicit options.
    #[must_use]
    pub fn with_options(options: ViewOptions) -> Self {
        Self {
            entries: BTreeMap::new(),
            tombstones: Tombstones::new(options.no_tombstones),
            entropy: options.entropy,
        }
    }

    /// Insert `value` at the position named by `tag`.
    ///
    /// Idempotent: re-inserting an existing tag changes nothing, and a
    /// tombstoned tag stays dead.
    pub fn insert(&mut self, tag: PositionalTag, value: V) {
        self.apply(&ListOp::Insert { tag, value });
    }

    /// Remove the element at the position named by `tag`.
    pub fn remove(&mut self, tag: &PositionalTag) {
        self.apply(&ListOp::Remove { tag: tag.clone() });
    }

    /// The positional tag at `index` in sorted order, or `None` outside
    /// `0..len()`.
    #[must_use]
    pub fn tag_at(&self, index: usize) -> Option<&PositionalTag> {
        self.entries.keys().nth(index)
    }

    /// The value at `index` in sorted order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&V> {
        self.entries.values().nth(index)
    }

    /// The value at the position named by `tag`.
    #[must_use]
    pub fn get_by_tag(&self, tag: &PositionalTag) -> Option<&V> {
        self.entries.get(tag)
    }

    /// Number of live elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` while the list holds no live element.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(tag, value)` pairs in list order.
    pub fn iter(&self) -> impl Iterator<Item = (&PositionalTag, &V)> {
        self.entries.iter()
    }

    /// The values in list order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<V> {
        self.entries.values().cloned().collect()
    }

    /// Mint a positional tag strictly between `lo` and `hi`.
    ///
    /// `None` on either side means the virtual minimum or maximum, so
    /// `between(None, None, ..)` claims the first position in an empty
    /// list. For any `lo < hi` the minted tag `t` satisfies `lo < t < hi`.
    ///
    /// The one exception is an upper bound ending in the minimal position
    /// `(0, no site)`, which `between` itself never mints: such a bound
    /// has nothing strictly below it past the shared prefix, so the walk
    /// returns the longest prefix of `hi` that clears `lo` instead of
    /// overshooting. The result still never exceeds `hi`.
    ///
    /// The new integer coordinate is drawn from the view's entropy source;
    /// when `site` is given it is appended to the minted position, making
    /// tags minted concurrently at different sites distinct with certainty
    /// rather than overwhelming probability. The tag only grows one
    /// position longer when the bounds leave no integer room at any
    /// existing depth.
    #[must_use]
    pub fn between(
        &self,
        lo: Option<&PositionalTag>,
        hi: Option<&PositionalTag>,
        site: Option<&SiteId>,
    ) -> PositionalTag {
        let mut prefix: Vec<Position> = Vec::new();
        let lo_depth = lo.map_or(0, PositionalTag::depth);
        let mut lo_tail: &[Position] = lo.map(PositionalTag::positions).unwrap_or(&[]);
        let mut hi_tail: &[Position] = hi.map(PositionalTag::positions).unwrap_or(&[]);
        // An absent upper bound is +infinity at every depth. The lower
        // bound pads with the sentinel position (0, no site) instead; the
        // upper bound must NOT be padded that way, because running out of
        // positions means nothing extends the shared prefix below it.
        let mut hi_unbounded = hi.is_none();

        loop {
            let lo_head = lo_tail.first();
            let hi_head = if hi_unbounded { None } else { hi_tail.first() };

            if !hi_unbounded && hi_head.is_none() {
                // The finite upper bound has ended. Every extension of the
                // shared prefix would order above it, so stop here. Only
                // bounds ending in the minimal position reach this point
                // (their open interval is empty); the prefix is the
                // closest tag that does not overshoot `hi`.
                return PositionalTag::from(prefix);
            }

            let lo_int = lo_head.map_or(0, |p| p.int);
            let hi_int = match hi_head {
                Some(position) => position.int,
                None => u64::MAX,
            };

            if lo_int < hi_int && hi_int - lo_int > 1 {
                // Integer room: pick a coordinate strictly inside it.
                let width = hi_int - lo_int - 1;
                let int = lo_int + 1 + (self.entropy)() % width;
                prefix.push(Position {
                    int,
                    site: site.cloned(),
                });
                return PositionalTag::from(prefix);
            }

            let sentinel = Position::new(0);
            let lo_effective = lo_head.unwrap_or(&sentinel);
            if hi_head == Some(lo_effective) {
                // Both bounds hold this exact position. When it is the
                // upper bound's last one and the prefix already clears the
                // lower bound, the prefix itself sits strictly inside the
                // gap; consuming the position instead would dead-end.
                let prefix_clears_lo =
                    lo.is_none() || (lo_tail.is_empty() && prefix.len() > lo_depth);
                if hi_tail.len() == 1 && prefix_clears_lo {
                    return PositionalTag::from(prefix);
                }
                // Otherwise keep it shared and narrow both sides at the
                // next depth.
                prefix.push(lo_effective.clone());
                lo_tail = tail(lo_tail);
                hi_tail = tail(hi_tail);
            } else {
                // No room: anchor to the lower bound's position. Everything
                // extending it stays below `hi` (whose position here is
                // strictly greater), so the upper bound reopens to infinity.
                prefix.push(lo_effective.clone());
                lo_tail = tail(lo_tail);
                hi_unbounded = true;
            }
        }
    }
}

fn tail(positions: &[Position]) -> &[Position] {
    if positions.is_empty() {
        positions
    } else {
        &positions[1..]
    }
}

impl<V: Clone> View for List<V> {
    type Op = ListOp<V>;

    fn apply(&mut self, op: &ListOp<V>) {
        match op {
            ListOp::Insert { tag, value } => {
                if !self.tombstones.contains(tag) {
                    self.entries
                        .entry(tag.clone())
                        .or_insert_with(|| value.clone());
                }
            }
            ListOp::Remove { tag } => {
                self.entries.remove(tag);
                self.tombstones.kill(tag.clone());
            }
        }
    }
}

impl<V: Clone> Dumpable for List<V> {
    type Dump = ListDump<V>;

    fn dump(&self) -> ListDump<V> {
        ListDump {
            entries: self
                .entries
                .iter()
                .map(|(tag, value)| (tag.clone(), value.clone()))
                .collect(),
            tombstones: self.tombstones.to_vec(),
            no_tombstones: !self.tombstones.is_recording(),
        }
    }

    fn load(dump: ListDump<V>) -> Self {
        Self::load_with_options(dump, ViewOptions::new())
    }
}

impl<V: Clone> List<V> {
    /// [`load`](Dumpable::load), but with an explicit entropy source for
    /// subsequent [`between`](Self::between) calls. The tombstone mode
    /// always comes from the dump; options cannot override recorded state.
    #[must_use]
    pub fn load_with_options(dump: ListDump<V>, options: ViewOptions) -> Self {
        Self {
            entries: dump.entries.into_iter().collect(),
            tombstones: Tombstones::from_parts(dump.no_tombstones, dump.tombstones),
            entropy: options.entropy,
        }
    }
}

impl<V: Clone + PartialEq> PartialEq for List<V> {
    fn eq(&self, other: &Self) -> bool {
        // The entropy source is configuration, not replicated state.
        self.entries == other.entries && self.tombstones == other.tombstones
    }
}

impl<V: Clone + Eq> Eq for List<V> {}

impl<V: Clone> Versioned for List<V> {
    const CURRENT_VERSION: u8 = 1;
    const VIEW_KIND: ViewKind = ViewKind::List;
}

impl<V: Clone> Default for List<V> {
    fn default() -> Self {
        Self::new()
    }
}
