use alloc::string::String;
use core::fmt;

use crate::diff::Diff;
use crate::version::{Versioned, ViewKind};
use crate::view::{Dumpable, View};
use crate::ViewOptions;

/// A text buffer edited through diffs.
///
/// [`diff`](Self::diff) computes a deterministic edit script from the
/// current contents to a target string; shipping that script to other
/// replicas and applying it with [`update`](Self::update) replays the edit
/// there.
///
/// # Not a true CRDT
///
/// Unlike the other views, text offers **best-effort merge only**: a diff
/// is applied verbatim to whatever the receiving replica currently holds.
/// When that state diverged from the one the diff was computed against, the
/// script is clamped and applied as far as it fits — replicas may end up
/// with different strings. Truly concurrent text editing needs a sequence
/// CRDT behind the same surface; this view trades that machinery for
/// simplicity and leaves conflict avoidance to the host.
///
/// # Example
///
/// ```
/// use convergent::Text;
///
/// let mut text = Text::new();
/// let d = text.diff("hello");
/// text.update(&d);
/// assert_eq!(text.as_str(), "hello");
///
/// let d = text.diff("help!");
/// text.update(&d);
/// assert_eq!(text.as_str(), "help!");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Text {
    contents: String,
}

/// A text update message carrying an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextOp {
    /// The edit script to apply.
    pub diff: Diff,
}

/// Serialized [`Text`] state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextDump {
    /// The buffer contents.
    pub contents: String,
}

impl Text {
    /// Create an empty text buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            contents: String::new(),
        }
    }

    /// Create an empty text buffer with explicit options.
    ///
    /// Text carries no tags, so the tombstone option has nothing to act on;
    /// the constructor exists so all four views share one factory shape.
    #[must_use]
    pub fn with_options(_options: ViewOptions) -> Self {
        Self::new()
    }

    /// Compute the edit script from the current contents to `target`.
    #[must_use]
    pub fn diff(&self, target: &str) -> Diff {
        Diff::between(&self.contents, target)
    }

    /// Apply an edit script to the buffer.
    ///
    /// Length mismatches clamp rather than fail; see the type-level caveat.
    pub fn update(&mut self, diff: &Diff) {
        self.contents = diff.apply_to(&self.contents);
    }

    /// The current contents.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.contents
    }

    /// Number of characters in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contents.chars().count()
    }

    /// `true` while the buffer holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

impl View for Text {
    type Op = TextOp;

    fn apply(&mut self, op: &TextOp) {
        self.update(&op.diff);
    }
}

impl Dumpable for Text {
    type Dump = TextDump;

    fn dump(&self) -> TextDump {
        TextDump {
            contents: self.contents.clone(),
        }
    }

    fn load(dump: TextDump) -> Self {
        Self {
            contents: dump.contents,
        }
    }
}

impl Versioned for Text {
    const CURRENT_VERSION: u8 = 1;
    const VIEW_KIND: ViewKind = ViewKind::Text;
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::Hunk;

    #[test]
    fn new_text_is_empty() {
        let text = Text::new();
        assert!(text.is_empty());
        assert_eq!(text.len(), 0);
        assert_eq!(text.as_str(), "");
    }

    #[test]
    fn diff_then_update_round_trips() {
        let mut text = Text::new();
        text.update(&text.diff("hello"));
        assert_eq!(text.as_str(), "hello");

        text.update(&text.diff("help!"));
        assert_eq!(text.as_str(), "help!");
        assert_eq!(text.len(), 5);
    }

    #[test]
    fn apply_op_matches_update() {
        let mut a = Text::new();
        let mut b = Text::new();
        let diff = a.diff("shared");

        a.update(&diff);
        b.apply(&TextOp { diff });
        assert_eq!(a, b);
    }

    #[test]
    fn unicode_contents() {
        let mut text = Text::new();
        text.update(&text.diff("héllo 🌍"));
        assert_eq!(text.as_str(), "héllo 🌍");
        assert_eq!(text.len(), 7);
    }

    #[test]
    fn mismatched_diff_clamps() {
        let mut text = Text::new();
        text.update(&text.diff("ab"));

        // A script computed against a longer string: retains clamp, the
        // insert still lands.
        let stale = Diff::from_hunks([
            Hunk::Retain(10),
            Hunk::Insert(String::from("!")),
            Hunk::Delete(4),
        ]);
        text.update(&stale);
        assert_eq!(text.as_str(), "ab!");
    }

    #[test]
    fn display_shows_contents() {
        let mut text = Text::new();
        text.update(&text.diff("shown"));
        assert_eq!(format!("{text}"), "shown");
    }

    #[test]
    fn dump_load_round_trip() {
        let mut text = Text::new();
        text.update(&text.diff("persisted"));

        let mut restored = Text::load(text.dump());
        assert_eq!(restored, text);

        restored.update(&restored.diff("persisted!"));
        assert_eq!(restored.as_str(), "persisted!");
    }
}
