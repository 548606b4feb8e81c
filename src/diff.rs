//! Deterministic edit scripts over strings.
//!
//! A [`Diff`] is an ordered sequence of [`Hunk`]s walking the source string
//! left to right: retain runs that survive, insert new text, delete runs
//! that don't. Scripts are produced by a Myers shortest-edit-script search,
//! so the same `(source, target)` pair always yields the same diff on every
//! replica.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// One step of an edit script.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hunk {
    /// Keep the next `n` characters of the source.
    Retain(usize),
    /// Emit this text.
    Insert(String),
    /// Skip the next `n` characters of the source.
    Delete(usize),
}

/// An edit script transforming one string into another.
///
/// For a script produced by [`Diff::between`], the retained plus deleted
/// lengths sum to the source length and the retained plus inserted lengths
/// sum to the target length. [`apply_to`](Diff::apply_to) does not require
/// this: scripts that overrun the input are clamped, never rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Diff {
    hunks: Vec<Hunk>,
}

impl Diff {
    /// Build a diff from raw hunks. Adjacent hunks of the same kind are
    /// coalesced; zero-length hunks are dropped.
    pub fn from_hunks(hunks: impl IntoIterator<Item = Hunk>) -> Self {
        let mut coalesced = Hunks::default();
        for hunk in hunks {
            match hunk {
                Hunk::Retain(n) => coalesced.retain(n),
                Hunk::Delete(n) => coalesced.delete(n),
                Hunk::Insert(s) => coalesced.insert(&s),
            }
        }
        Self {
            hunks: coalesced.0,
        }
    }

    /// Compute the shortest edit script from `source` to `target`.
    ///
    /// Deterministic for a given pair of strings. Characters (Unicode
    /// scalar values) are the edit unit.
    #[must_use]
    pub fn between(source: &str, target: &str) -> Self {
        let source: Vec<char> = source.chars().collect();
        let target: Vec<char> = target.chars().collect();

        // Trim the common prefix and suffix before the O(ND) search; edits
        // are usually local.
        let prefix = source
            .iter()
            .zip(&target)
            .take_while(|(a, b)| a == b)
            .count();
        let suffix = source[prefix..]
            .iter()
            .rev()
            .zip(target[prefix..].iter().rev())
            .take_while(|(a, b)| a == b)
            .count();

        let mut hunks = Hunks::default();
        hunks.retain(prefix);
        myers(
            &source[prefix..source.len() - suffix],
            &target[prefix..target.len() - suffix],
            &mut hunks,
        );
        hunks.retain(suffix);

        Self { hunks: hunks.0 }
    }

    /// Apply the script to `source`.
    ///
    /// Retains and deletes that run past the end of the input are clamped
    /// to what remains; input the script never reaches is kept. Application
    /// therefore always succeeds, even for a script computed against a
    /// different string — the result is then merely best-effort.
    #[must_use]
    pub fn apply_to(&self, source: &str) -> String {
        let chars: Vec<char> = source.chars().collect();
        let mut out = String::new();
        let mut cursor = 0usize;

        for hunk in &self.hunks {
            match hunk {
                Hunk::Retain(n) => {
                    let end = usize::min(cursor + n, chars.len());
                    out.extend(&chars[cursor..end]);
                    cursor = end;
                }
                Hunk::Insert(text) => out.push_str(text),
                Hunk::Delete(n) => {
                    cursor = usize::min(cursor + n, chars.len());
                }
            }
        }

        out.extend(&chars[cursor..]);
        out
    }

    /// The script's hunks, in application order.
    #[must_use]
    pub fn hunks(&self) -> &[Hunk] {
        &self.hunks
    }

    /// `true` for a script with no edits.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.hunks
            .iter()
            .all(|hunk| matches!(hunk, Hunk::Retain(_)))
    }
}

impl fmt::Display for Diff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, hunk) in self.hunks.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match hunk {
                Hunk::Retain(n) => write!(f, "={n}")?,
                Hunk::Insert(s) => write!(f, "+{s:?}")?,
                Hunk::Delete(n) => write!(f, "-{n}")?,
            }
        }
        Ok(())
    }
}

/// Hunk accumulator that coalesces as it goes.
#[derive(Default)]
struct Hunks(Vec<Hunk>);

impl Hunks {
    fn retain(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        if let Some(Hunk::Retain(last)) = self.0.last_mut() {
            *last += n;
        } else {
            self.0.push(Hunk::Retain(n));
        }
    }

    fn delete(&mut self, n: usize) {
        if n == 0 {
            return;
        }
        if let Some(Hunk::Delete(last)) = self.0.last_mut() {
            *last += n;
        } else {
            self.0.push(Hunk::Delete(n));
        }
    }

    fn insert(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Hunk::Insert(last)) = self.0.last_mut() {
            last.push_str(text);
        } else {
            self.0.push(Hunk::Insert(String::from(text)));
        }
    }

    fn insert_char(&mut self, ch: char) {
        if let Some(Hunk::Insert(last)) = self.0.last_mut() {
            last.push(ch);
        } else {
            let mut text = String::new();
            text.push(ch);
            self.0.push(Hunk::Insert(text));
        }
    }
}

/// Greedy O((N+M)D) shortest-edit-script search with a backtracking trace.
///
/// The per-round frontier snapshots make backtracking exact: round `d`'s
/// decisions are reconstructed from the frontier as it stood before the
/// round ran.
fn myers(a: &[char], b: &[char], out: &mut Hunks) {
    let n = a.len();
    let m = b.len();

    if n == 0 {
        for &ch in b {
            out.insert_char(ch);
        }
        return;
    }
    if m == 0 {
        out.delete(n);
        return;
    }

    let max = n + m;
    let offset = max as isize;
    // frontier[k + offset] = furthest x reached on diagonal k.
    let mut frontier = alloc::vec![0isize; 2 * max + 1];
    let mut trace: Vec<Vec<isize>> = Vec::new();

    'search: for d in 0..=(max as isize) {
        trace.push(frontier.clone());
        let mut k = -d;
        while k <= d {
            let idx = (k + offset) as usize;
            let mut x = if k == -d || (k != d && frontier[idx - 1] < frontier[idx + 1]) {
                frontier[idx + 1]
            } else {
                frontier[idx - 1] + 1
            };
            let mut y = x - k;
            while (x as usize) < n && (y as usize) < m && a[x as usize] == b[y as usize] {
                x += 1;
                y += 1;
            }
            frontier[idx] = x;
            if x as usize >= n && y as usize >= m {
                break 'search;
            }
            k += 2;
        }
    }

    // Walk the trace backwards, collecting moves in reverse.
    enum Move {
        Keep,
        Delete,
        Insert(char),
    }
    let mut moves: Vec<Move> = Vec::new();
    let mut x = n as isize;
    let mut y = m as isize;

    for (d, frontier) in trace.iter().enumerate().rev() {
        let d = d as isize;
        let k = x - y;
        let idx = (k + offset) as usize;
        let prev_k = if k == -d || (k != d && frontier[idx - 1] < frontier[idx + 1]) {
            k + 1
        } else {
            k - 1
        };
        let prev_x = frontier[(prev_k + offset) as usize];
        let prev_y = prev_x - prev_k;

        while x > prev_x && y > prev_y {
            moves.push(Move::Keep);
            x -= 1;
            y -= 1;
        }
        if d > 0 {
            if x == prev_x {
                moves.push(Move::Insert(b[prev_y as usize]));
            } else {
                moves.push(Move::Delete);
            }
            x = prev_x;
            y = prev_y;
        }
    }

    for step in moves.into_iter().rev() {
        match step {
            Move::Keep => out.retain(1),
            Move::Delete => out.delete(1),
            Move::Insert(ch) => out.insert_char(ch),
        }
    }
}
