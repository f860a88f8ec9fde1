use std::collections::BTreeSet;

use proptest::{
    collection::vec,
    prelude::*,
};

use crate::Bitmap;

/// A mutation against both the bitmap and a reference set.
#[derive(Debug, Clone)]
enum Op {
    Insert(u16),
    Remove(u16),
    InsertRange(u32, u32),
    RemoveRange(u32, u32),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u16>().prop_map(Op::Insert),
        any::<u16>().prop_map(Op::Remove),
        (0u32..65536, 0u32..4000)
            .prop_map(|(start, len)| Op::InsertRange(start, (start + len).min(65536))),
        (0u32..65536, 0u32..4000)
            .prop_map(|(start, len)| Op::RemoveRange(start, (start + len).min(65536))),
    ]
}

fn apply(ops: &[Op]) -> (Bitmap, BTreeSet<u16>) {
    let mut set = Bitmap::new();
    let mut reference = BTreeSet::new();
    for op in ops {
        match *op {
            Op::Insert(value) => {
                assert_eq!(set.insert(value), reference.insert(value));
            }
            Op::Remove(value) => {
                assert_eq!(set.remove(value), reference.remove(&value));
            }
            Op::InsertRange(start, end) => {
                let mut added = 0;
                for value in start..end {
                    if reference.insert(value as u16) {
                        added += 1;
                    }
                }
                assert_eq!(set.insert_range(start..end).unwrap(), added);
            }
            Op::RemoveRange(start, end) => {
                let mut removed = 0;
                for value in start..end {
                    if reference.remove(&(value as u16)) {
                        removed += 1;
                    }
                }
                assert_eq!(set.remove_range(start..end).unwrap(), removed);
            }
        }
    }
    (set, reference)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn mutations_track_a_reference_set(ops in vec(op_strategy(), 1..40)) {
        let (set, reference) = apply(&ops);
        prop_assert_eq!(set.cardinality() as usize, reference.len());
        prop_assert!(set.iter().eq(reference.iter().copied()));
        for probe in [0u16, 1, 4095, 4096, 32768, 65535] {
            prop_assert_eq!(set.contains(probe), reference.contains(&probe));
        }
    }

    #[test]
    fn boolean_algebra_matches_set_theory(
        xs in vec(op_strategy(), 1..25),
        ys in vec(op_strategy(), 1..25),
    ) {
        let (x, x_ref) = apply(&xs);
        let (y, y_ref) = apply(&ys);

        let and = x.and(&y);
        let or = x.or(&y);
        let xor = x.xor(&y);
        let diff = x.and_not(&y);

        prop_assert!(and.iter().eq(x_ref.intersection(&y_ref).copied()));
        prop_assert!(or.iter().eq(x_ref.union(&y_ref).copied()));
        prop_assert!(xor.iter().eq(x_ref.symmetric_difference(&y_ref).copied()));
        prop_assert!(diff.iter().eq(x_ref.difference(&y_ref).copied()));

        prop_assert!(or.cardinality() <= x.cardinality() + y.cardinality());
        prop_assert!(and.cardinality() <= x.cardinality().min(y.cardinality()));
        // (X ⊕ Y) = (X ∪ Y) \ (X ∩ Y)
        prop_assert_eq!(&xor, &or.and_not(&and));
    }

    #[test]
    fn wire_round_trip_is_identity(ops in vec(op_strategy(), 1..30)) {
        let (set, _) = apply(&ops);
        let bytes = set.to_bytes();
        let (back, used) = Bitmap::deserialize(&bytes).unwrap();
        prop_assert_eq!(used, bytes.len());
        prop_assert_eq!(back.stats().kind, set.stats().kind);
        prop_assert_eq!(&back, &set);
    }
}
