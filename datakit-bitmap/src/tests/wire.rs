use alloc::vec::Vec;

use crate::{
    serialize::peek_len,
    Bitmap,
    ContainerKind,
    Error,
};

fn round_trip(set: &Bitmap) -> Bitmap {
    let bytes = set.to_bytes();
    assert_eq!(peek_len(&bytes).unwrap(), bytes.len());
    let (back, used) = Bitmap::deserialize(&bytes).unwrap();
    assert_eq!(used, bytes.len());
    back
}

#[test]
fn array_form_round_trips() {
    let set: Bitmap = [0u16, 7, 300, 65535].into_iter().collect();
    assert_eq!(set.stats().kind, ContainerKind::Array);
    let back = round_trip(&set);
    assert_eq!(back.stats().kind, ContainerKind::Array);
    assert_eq!(back, set);
    assert_eq!(set.to_bytes().len(), 1 + 2 + 4 * 2);
}

#[test]
fn dense_form_round_trips() {
    let mut set = Bitmap::new();
    for value in 0..5000u16 {
        set.insert(value.wrapping_mul(7));
    }
    assert_eq!(set.stats().kind, ContainerKind::Bitmap);
    assert_eq!(set.to_bytes().len(), 1 + 8192);
    let back = round_trip(&set);
    assert_eq!(back.stats().kind, ContainerKind::Bitmap);
    assert_eq!(back, set);
}

#[test]
fn runs_form_round_trips() {
    let mut set = Bitmap::new();
    set.insert_range(10..20000).unwrap();
    set.insert_range(30000..31000).unwrap();
    assert_eq!(set.stats().kind, ContainerKind::Runs);
    assert_eq!(set.to_bytes().len(), 1 + 2 + 2 * 4);
    let back = round_trip(&set);
    assert_eq!(back.stats().kind, ContainerKind::Runs);
    assert_eq!(back, set);
}

#[test]
fn full_domain_run_splits_on_the_wire() {
    let mut set = Bitmap::new();
    set.insert_range(0..65536).unwrap();
    assert_eq!(set.stats().kind, ContainerKind::Runs);
    let bytes = set.to_bytes();
    // Two wire runs of 32768 elements each.
    assert_eq!(bytes.len(), 1 + 2 + 2 * 4);
    let back = round_trip(&set);
    assert_eq!(back.cardinality(), 65536);
    assert_eq!(back.stats().kind, ContainerKind::Runs);
}

#[test]
fn empty_set_round_trips() {
    let set = Bitmap::new();
    let back = round_trip(&set);
    assert!(back.is_empty());
    assert_eq!(back.stats().kind, ContainerKind::Array);
}

#[test]
fn malformed_inputs_are_format_errors() {
    assert_eq!(Bitmap::deserialize(&[]), Err(Error::UnexpectedEnd));
    assert_eq!(Bitmap::deserialize(&[9]), Err(Error::UnknownContainer(9)));

    // Array payload that claims more values than it carries.
    assert_eq!(
        Bitmap::deserialize(&[0, 10, 0, 1, 0]),
        Err(Error::UnexpectedEnd)
    );
    // Array payload out of order.
    assert_eq!(
        Bitmap::deserialize(&[0, 2, 0, 5, 0, 5, 0]),
        Err(Error::Malformed)
    );
    // Truncated dense payload.
    let mut short = Vec::new();
    short.push(1u8);
    short.extend_from_slice(&[0xff; 100]);
    assert_eq!(Bitmap::deserialize(&short), Err(Error::UnexpectedEnd));
    // Zero-length run.
    assert_eq!(
        Bitmap::deserialize(&[2, 1, 0, 5, 0, 0, 0]),
        Err(Error::Malformed)
    );
    // Overlapping runs.
    assert_eq!(
        Bitmap::deserialize(&[2, 2, 0, 10, 0, 20, 0, 5, 0, 10, 0]),
        Err(Error::Malformed)
    );
}

#[test]
fn foreign_kind_choices_are_accepted() {
    // A writer may pick a different form than we would; a two-member runs
    // payload must still decode as runs.
    let bytes = [2u8, 2, 0, 1, 0, 3, 0, 9, 0, 2, 0];
    let (set, used) = Bitmap::deserialize(&bytes).unwrap();
    assert_eq!(used, bytes.len());
    assert_eq!(set.stats().kind, ContainerKind::Runs);
    assert_eq!(set.to_vec(), [1, 2, 3, 9, 10]);
}
