//! Property tests for the quantified invariants: permutation convergence,
//! Logoot density, encoding order, and diff round-trips.

use convergent::prelude::*;
use convergent::{ListOp, Position, RegisterOp, SetOp};
use proptest::prelude::*;

/// Deterministic Fisher-Yates over indices, driven by a splitmix64 stream.
fn shuffled(len: usize, seed: u64) -> Vec<usize> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut x = state;
        x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        x ^ (x >> 31)
    };

    let mut idxs: Vec<usize> = (0..len).collect();
    for i in (1..len).rev() {
        let j = (next() % (i as u64 + 1)) as usize;
        idxs.swap(i, j);
    }
    idxs
}

/// Register op set: each op births a distinct tag and supersedes a random
/// subset of the others.
fn register_ops(seed: u64, n: usize) -> Vec<RegisterOp<u64>> {
    let mut state = seed;
    let mut next = move || {
        state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut x = state;
        x = (x ^ (x >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        x = (x ^ (x >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        x ^ (x >> 31)
    };

    (0..n)
        .map(|i| {
            let previous_tags = (0..n)
                .filter(|&j| j != i && next() % 3 == 0)
                .map(|j| Tag::from(format!("t{j}")))
                .collect();
            RegisterOp {
                previous_tags,
                tag: Tag::from(format!("t{i}")),
                value: i as u64,
            }
        })
        .collect()
}

/// An arbitrary position: small integers and few sites force deep descents
/// in `between`.
fn position_strategy(min_int: u64) -> impl Strategy<Value = Position> {
    (
        min_int..4,
        prop_oneof![Just(None), Just(Some("a")), Just(Some("b"))],
    )
        .prop_map(|(int, site)| match site {
            None => Position::new(int),
            Some(site) => Position::with_site(int, site),
        })
}

/// Tags shaped like the ones `between` actually mints: interior positions
/// may sit on the floor, but the final integer is at least 1, so there is
/// always room below the tag.
fn tag_strategy() -> impl Strategy<Value = PositionalTag> {
    (
        proptest::collection::vec(position_strategy(0), 0..3),
        position_strategy(1),
    )
        .prop_map(|(mut positions, last)| {
            positions.push(last);
            PositionalTag::from(positions)
        })
}

/// Tags `between` never mints: one or two trailing minimal positions, so
/// there may be nothing strictly below the tag past its own prefix.
fn zero_terminated_tag_strategy() -> impl Strategy<Value = PositionalTag> {
    (
        proptest::collection::vec(position_strategy(0), 0..3),
        1usize..3,
    )
        .prop_map(|(mut positions, zeros)| {
            positions.extend((0..zeros).map(|_| Position::new(0)));
            PositionalTag::from(positions)
        })
}

proptest! {
    #[test]
    fn register_any_delivery_order_converges(seed in any::<u64>(), n in 1usize..7) {
        let ops = register_ops(seed, n);

        let mut reference = Register::new();
        for op in &ops {
            reference.apply(op);
        }

        for perm_seed in 0..4u64 {
            let mut replica = Register::new();
            for i in shuffled(ops.len(), seed ^ perm_seed) {
                replica.apply(&ops[i]);
            }
            prop_assert_eq!(&replica, &reference);
        }
    }

    #[test]
    fn orset_any_delivery_order_converges(
        seed in any::<u64>(),
        adds in proptest::collection::vec(0u8..3, 1..8),
    ) {
        // Adds with distinct tags over a small value space; every other add
        // gets a matching remove so tombstones are exercised.
        let mut ops: Vec<SetOp<u8>> = Vec::new();
        for (i, &value) in adds.iter().enumerate() {
            ops.push(SetOp::Add { tag: Tag::from(format!("t{i}")), value });
            if i % 2 == 0 {
                ops.push(SetOp::Remove { value, tags: vec![Tag::from(format!("t{i}"))] });
            }
        }

        let mut reference = OrSet::new();
        for op in &ops {
            reference.apply(op);
        }

        for perm_seed in 0..4u64 {
            let mut replica = OrSet::new();
            for i in shuffled(ops.len(), seed ^ perm_seed) {
                replica.apply(&ops[i]);
            }
            prop_assert_eq!(&replica, &reference);
        }
    }

    #[test]
    fn list_any_delivery_order_converges(
        seed in any::<u64>(),
        tags in proptest::collection::btree_set(tag_strategy(), 1..8),
    ) {
        let mut ops: Vec<ListOp<u8>> = Vec::new();
        for (i, tag) in tags.iter().enumerate() {
            ops.push(ListOp::Insert { tag: tag.clone(), value: i as u8 });
            if i % 2 == 1 {
                ops.push(ListOp::Remove { tag: tag.clone() });
            }
        }

        let mut reference = List::new();
        for op in &ops {
            reference.apply(op);
        }

        for perm_seed in 0..4u64 {
            let mut replica = List::new();
            for i in shuffled(ops.len(), seed ^ perm_seed) {
                replica.apply(&ops[i]);
            }
            prop_assert_eq!(&replica, &reference);
        }
    }

    #[test]
    fn between_stays_strictly_inside_bounds(
        a in tag_strategy(),
        b in tag_strategy(),
        with_site in any::<bool>(),
    ) {
        prop_assume!(a != b);
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };

        let list = List::<u8>::new();
        let site = SiteId::from("s9");
        let minted = list.between(Some(&lo), Some(&hi), with_site.then_some(&site));

        prop_assert!(lo < minted, "{lo:?} !< {minted:?}");
        prop_assert!(minted < hi, "{minted:?} !< {hi:?}");
    }

    #[test]
    fn between_never_overshoots_zero_terminated_bound(
        lo in proptest::option::of(tag_strategy()),
        hi in zero_terminated_tag_strategy(),
    ) {
        // A bound ending in the minimal position may leave an empty open
        // interval; the result must then clamp to the bound's prefix, and
        // in every case stay above `lo` and at or below `hi`.
        if let Some(lo) = &lo {
            prop_assume!(lo < &hi);
        }

        let list = List::<u8>::new();
        let minted = list.between(lo.as_ref(), Some(&hi), None);

        prop_assert!(minted <= hi, "{minted:?} overshoots {hi:?}");
        if let Some(lo) = &lo {
            prop_assert!(lo < &minted, "{lo:?} !< {minted:?}");
        }
    }

    #[test]
    fn between_open_bounds_stay_ordered(a in tag_strategy()) {
        let list = List::<u8>::new();

        let below = list.between(None, Some(&a), None);
        prop_assert!(below < a);

        let above = list.between(Some(&a), None, None);
        prop_assert!(a < above);
    }

    #[test]
    fn encoding_order_matches_tag_order(a in tag_strategy(), b in tag_strategy()) {
        prop_assert_eq!(a.cmp(&b), a.to_bytes().cmp(&b.to_bytes()));
    }

    #[test]
    fn encoding_round_trips(a in tag_strategy()) {
        let decoded = PositionalTag::from_bytes(&a.to_bytes()).unwrap();
        prop_assert_eq!(decoded, a);
    }

    #[test]
    fn diff_round_trips(source in ".{0,40}", target in ".{0,40}") {
        let mut text = Text::new();
        text.update(&text.diff(&source));
        prop_assert_eq!(text.as_str(), source.as_str());

        text.update(&text.diff(&target));
        prop_assert_eq!(text.as_str(), target.as_str());
    }

    #[test]
    fn stale_ops_never_change_state(tags in proptest::collection::btree_set(tag_strategy(), 1..6)) {
        // Once a tag is tombstoned, re-delivering its insert is inert.
        let mut list = List::new();
        for (i, tag) in tags.iter().enumerate() {
            list.insert(tag.clone(), i);
            list.remove(tag);
        }
        let snapshot = list.clone();
        for (i, tag) in tags.iter().enumerate() {
            list.insert(tag.clone(), i);
        }
        prop_assert_eq!(&list, &snapshot);
        prop_assert!(list.is_empty());
    }
}
