//! The operation-stream surface shared by all four views.
//!
//! A view is a passive, single-threaded materialization of shared state.
//! The host's broadcast layer delivers operation messages, possibly
//! duplicated and possibly out of order, and each replica applies them
//! locally. For the register, set, and list (with tombstones enabled),
//! any delivery order of the same operations converges to the same state.

/// A materialized view driven by an operation stream.
///
/// `apply` must be:
/// - **Commutative**: any delivery order of the same operations yields the
///   same state (register/set/list, with tombstones enabled),
/// - **Idempotent**: re-delivering an operation changes nothing once the
///   first delivery has landed.
///
/// The text view implements the trait but is exempt from the commutativity
/// contract — see [`Text`](crate::Text) for the caveat.
pub trait View {
    /// The operation message type this view consumes.
    type Op;

    /// Apply one operation from the stream (local or remote).
    fn apply(&mut self, op: &Self::Op);
}

/// Lossless state serialization.
///
/// `load(dump())` reconstructs a view that behaves identically under all
/// subsequent operations. Dumps are plain data: live state, tombstones, and
/// the tombstone mode. They are also the only place tombstones are
/// observable, which is what host-level GC hooks into.
pub trait Dumpable: Sized {
    /// The serialized-state type.
    type Dump;

    /// Capture the view's entire state.
    fn dump(&self) -> Self::Dump;

    /// Reconstruct a view from captured state.
    fn load(dump: Self::Dump) -> Self;
}
