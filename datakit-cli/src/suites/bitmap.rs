//! Bitmap suites.

use std::collections::BTreeSet;

use datakit_bitmap::{
    Bitmap,
    ContainerKind,
};
use rand::{
    rngs::StdRng,
    Rng,
    SeedableRng,
};

use crate::harness::Checks;

pub fn ops(checks: &mut Checks) {
    let mut set = Bitmap::new();
    for value in [1u16, 100, 200, 300] {
        checks.check(set.insert(value), "fresh insert reports true");
    }
    checks.check(!set.insert(200), "duplicate insert reports false");
    checks.check(set.remove(100), "remove reports presence");
    checks.check(!set.contains(100), "removed member is gone");
    checks.eq(set.cardinality(), 3, "cardinality after removal");
    checks.eq(set.to_vec(), vec![1, 200, 300], "ascending iteration");
    checks.eq(set.min(), Some(1), "min");
    checks.eq(set.max(), Some(300), "max");

    // Mirror a random mutation stream against a reference set.
    let mut rng = StdRng::seed_from_u64(21);
    let mut set = Bitmap::new();
    let mut reference = BTreeSet::new();
    for _ in 0..20_000 {
        let value: u16 = rng.gen();
        if rng.gen_bool(0.7) {
            checks.check(
                set.insert(value) == reference.insert(value),
                "insert agrees with reference",
            );
        } else {
            checks.check(
                set.remove(value) == reference.remove(&value),
                "remove agrees with reference",
            );
        }
    }
    checks.eq(set.cardinality() as usize, reference.len(), "final cardinality");
    checks.check(
        set.iter().eq(reference.iter().copied()),
        "final iteration order",
    );
}

pub fn ranges(checks: &mut Checks) {
    let mut set = Bitmap::new();
    checks.eq(set.insert_range(100..200), Ok(100), "range insert count");
    checks.eq(set.remove_range(150..160), Ok(10), "range remove count");
    checks.eq(set.cardinality(), 90, "cardinality after range edits");
    checks.check(!set.contains(155), "hole is absent");
    checks.check(set.contains(160), "edge past the hole is present");

    checks.check(set.insert_range(10..9).is_err(), "inverted range rejected");
    checks.check(
        set.insert_range(0..70_000).is_err(),
        "out-of-domain range rejected",
    );

    let mut big = Bitmap::new();
    big.insert_range(0..65_536).expect("full domain");
    checks.eq(big.cardinality(), 65_536, "full domain cardinality");
    checks.eq(big.stats().kind, ContainerKind::Runs, "full domain is one run");
    big.remove_range(1..65_535).expect("carve the middle");
    checks.eq(big.to_vec(), vec![0, 65_535], "edges survive");
}

pub fn boolean(checks: &mut Checks) {
    let mut rng = StdRng::seed_from_u64(22);
    let xs: BTreeSet<u16> = (0..4_000).map(|_| rng.gen()).collect();
    let ys: BTreeSet<u16> = (0..4_000).map(|_| rng.gen::<u16>() / 2).collect();
    let x: Bitmap = xs.iter().copied().collect();
    let y: Bitmap = ys.iter().copied().collect();

    checks.check(
        x.and(&y).iter().eq(xs.intersection(&ys).copied()),
        "and agrees with reference",
    );
    checks.check(
        x.or(&y).iter().eq(xs.union(&ys).copied()),
        "or agrees with reference",
    );
    checks.check(
        x.xor(&y).iter().eq(xs.symmetric_difference(&ys).copied()),
        "xor agrees with reference",
    );
    checks.check(
        x.and_not(&y).iter().eq(xs.difference(&ys).copied()),
        "and_not agrees with reference",
    );
    checks.check(
        x.or(&y).cardinality() <= x.cardinality() + y.cardinality(),
        "union bound",
    );
    checks.eq(
        x.xor(&y),
        x.or(&y).and_not(&x.and(&y)),
        "xor is union minus intersection",
    );
    checks.check(x.and(&y).is_subset(&x), "intersection is a subset");
    checks.check(x.intersects(&y) == !x.and(&y).is_empty(), "intersects agrees");
}

pub fn wire(checks: &mut Checks) {
    let mut rng = StdRng::seed_from_u64(23);

    let sparse: Bitmap = (0..64).map(|_| rng.gen::<u16>()).collect();
    let mut dense = Bitmap::new();
    for _ in 0..10_000 {
        dense.insert(rng.gen());
    }
    let mut runs = Bitmap::new();
    runs.insert_range(1_000..30_000).expect("runs");

    for (set, kind, label) in [
        (&sparse, ContainerKind::Array, "array"),
        (&dense, ContainerKind::Bitmap, "bitmap"),
        (&runs, ContainerKind::Runs, "runs"),
    ] {
        checks.eq(set.stats().kind, kind, label);
        let bytes = set.to_bytes();
        match Bitmap::deserialize(&bytes) {
            Ok((back, used)) => {
                checks.eq(used, bytes.len(), label);
                checks.eq(back.stats().kind, kind, label);
                checks.check(back == *set, label);
            }
            Err(err) => checks.check(false, &format!("{label}: deserialize failed: {err}")),
        }
    }

    checks.check(Bitmap::deserialize(&[9]).is_err(), "unknown kind rejected");
    checks.check(
        Bitmap::deserialize(&[0, 10, 0, 1]).is_err(),
        "truncated payload rejected",
    );
}
