//! # convergent
//!
//! Convergent replicated views (CRDTs) for peer-to-peer applications with
//! reliable but possibly out-of-order broadcast.
//!
//! Each replica holds a materialized view of shared state. Replicas
//! exchange small operation messages and apply whatever arrives; for the
//! register, set, and list, any delivery order (including duplicates)
//! converges to the same value. There is no coordinator and no consensus:
//! convergence falls out of tag tombstoning.
//!
//! The library never talks to a network and never mints identity tags. The
//! host broadcasts [`View::apply`]-able operations and stamps them with
//! [`Tag`]s of its choosing; the only identifiers minted here are the
//! *positional* tags of the list ([`List::between`]).
//!
//! ## `no_std` Support
//!
//! This crate supports `no_std` environments with the `alloc` crate.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! convergent = { version = "0.1", default-features = false }
//! ```
//!
//! Without `std`, the default entropy source for [`List::between`] is a
//! fixed-seed stream; inject one via [`ViewOptions::entropy_source`].
//!
//! ## Quick Start
//!
//! ```
//! use convergent::prelude::*;
//!
//! let mut set = OrSet::new();
//! set.add(Tag::from("n1:0"), "milk");
//! set.add(Tag::from("n2:0"), "eggs");
//!
//! // Removing kills only the tags this replica has observed, so a
//! // concurrent add of the same value survives.
//! set.remove(&[Tag::from("n1:0")], &"milk");
//! assert!(!set.has(&"milk"));
//! assert!(set.has(&"eggs"));
//! ```
//!
//! ## Available views
//!
//! - [`Register`] - last-writer-wins over a causal tag DAG; concurrent
//!   writes surface as multiple values until superseded.
//! - [`OrSet`] - observed-remove set; adds and removes commute.
//! - [`List`] - ordered list over dense Logoot-style [`PositionalTag`]s.
//! - [`Text`] - diff-based text buffer. **Best-effort merge only**, not a
//!   true CRDT; see its type docs.
//!
//! ## Tombstones
//!
//! A replica can receive a remove for an element it has never seen, or a
//! stale add after the remove concluded. Every view therefore remembers
//! killed tags and silently drops operations that would rebirth them.
//! Tombstones grow without bound; they are exposed on each view's dump so
//! the host can decide when all replicas have acknowledged and a view can
//! be rebuilt without them. Constructing a view with
//! [`ViewOptions::no_tombstones`] skips the bookkeeping entirely, at the
//! price of requiring causal delivery from the transport.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod diff;
mod list;
mod options;
mod or_set;
mod position;
mod register;
mod tag;
mod text;
mod tombstones;
mod version;
mod view;

pub mod prelude;

pub use diff::{Diff, Hunk};
pub use list::{List, ListDump, ListOp};
pub use options::ViewOptions;
pub use or_set::{OrSet, SetDump, SetOp};
pub use position::{DecodeError, Position, PositionalTag, SiteId};
pub use register::{Register, RegisterDump, RegisterOp};
pub use tag::Tag;
pub use text::{Text, TextDump, TextOp};
pub use version::{Versioned, ViewKind};
pub use view::{Dumpable, View};
