use core::ops::Range;

use alloc::vec::Vec;

use crate::{
    container::{
        runs::Run,
        ArrayContainer,
        Container,
        ContainerKind,
        DenseContainer,
        RunContainer,
    },
    Error,
    Iter,
    ARRAY_MAX,
    DENSE_BYTES,
    UNIVERSE,
};

/// A set of 16-bit integers backed by one adaptively chosen container.
#[derive(Debug, Clone, Default)]
pub struct Bitmap {
    pub(crate) container: Container,
}

/// Snapshot of a bitmap's representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapStats {
    /// Which container form currently backs the set.
    pub kind: ContainerKind,
    /// Number of members.
    pub cardinality: u32,
    /// Heap bytes backing member storage.
    pub bytes: usize,
    /// Members the current backing storage can hold without growing.
    pub capacity: u32,
}

impl Bitmap {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from strictly ascending values.
    pub fn from_sorted_iter<I>(values: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = u16>,
    {
        let mut builder = Builder::new();
        let mut previous: Option<u16> = None;
        for value in values {
            if previous.is_some_and(|p| p >= value) {
                return Err(Error::NotAscending);
            }
            previous = Some(value);
            builder.push(value);
        }
        Ok(builder.finish())
    }

    /// Number of members.
    pub fn cardinality(&self) -> u32 {
        self.container.cardinality()
    }

    /// True when the set has no members.
    pub fn is_empty(&self) -> bool {
        self.cardinality() == 0
    }

    /// Membership test.
    pub fn contains(&self, value: u16) -> bool {
        self.container.contains(value)
    }

    /// Smallest member.
    pub fn min(&self) -> Option<u16> {
        self.container.min()
    }

    /// Largest member.
    pub fn max(&self) -> Option<u16> {
        self.container.max()
    }

    /// Add one value. Returns whether it was newly inserted.
    pub fn insert(&mut self, value: u16) -> bool {
        let added = self.container.insert(value);
        if added {
            self.adapt();
        }
        added
    }

    /// Remove one value. Returns whether it was present.
    pub fn remove(&mut self, value: u16) -> bool {
        let removed = self.container.remove(value);
        if removed {
            self.adapt();
        }
        removed
    }

    /// Add every value in the half-open `range`. Returns how many were new.
    ///
    /// Runs in time linear in the touched containers, not in the range
    /// length.
    pub fn insert_range(&mut self, range: Range<u32>) -> Result<u32, Error> {
        check_range(&range)?;
        let span = range.end - range.start;
        if let Container::Array(c) = &self.container {
            // The splice would overshoot the array bound; go dense first.
            if c.cardinality() as usize + span as usize > ARRAY_MAX {
                self.container = Container::Dense(to_dense(&self.container));
            }
        }
        let added = self.container.insert_range(range.start, range.end);
        self.compact();
        Ok(added)
    }

    /// Remove every value in the half-open `range`. Returns how many were
    /// present.
    pub fn remove_range(&mut self, range: Range<u32>) -> Result<u32, Error> {
        check_range(&range)?;
        let removed = self.container.remove_range(range.start, range.end);
        self.compact();
        Ok(removed)
    }

    /// Drop every member.
    pub fn clear(&mut self) {
        self.container = Container::default();
    }

    /// Iterate members in ascending order.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(&self.container)
    }

    /// Extract members into a sorted vector.
    pub fn to_vec(&self) -> Vec<u16> {
        self.iter().collect()
    }

    /// Representation snapshot.
    pub fn stats(&self) -> BitmapStats {
        let capacity = match &self.container {
            Container::Array(c) => c.capacity() as u32,
            Container::Dense(_) | Container::Runs(_) => UNIVERSE,
        };
        BitmapStats {
            kind: self.container.kind(),
            cardinality: self.cardinality(),
            bytes: self.container.bytes(),
            capacity,
        }
    }

    /// Re-evaluate the representation, allowing a switch to runs when the
    /// run list is the smallest legal form.
    pub fn run_optimize(&mut self) {
        let cardinality = self.cardinality();
        if cardinality == 0 {
            return;
        }
        let runs = match &self.container {
            Container::Array(c) => count_array_runs(c.as_slice()),
            Container::Dense(c) => c.num_runs() as usize,
            Container::Runs(c) => c.num_runs(),
        };
        let run_bytes = runs * 4;
        let best_flat = if cardinality as usize <= ARRAY_MAX {
            cardinality as usize * 2
        } else {
            DENSE_BYTES
        };
        if run_bytes < best_flat {
            if !matches!(self.container, Container::Runs(_)) {
                self.container = Container::Runs(to_runs(&self.container));
            }
        } else {
            self.compact();
        }
    }

    /// Set intersection.
    pub fn and(&self, other: &Bitmap) -> Bitmap {
        if let (Container::Dense(a), Container::Dense(b)) = (&self.container, &other.container) {
            return from_dense_words(a, b, |x, y| x & y);
        }
        merge(self, other, false, true, false)
    }

    /// Set union.
    pub fn or(&self, other: &Bitmap) -> Bitmap {
        if let (Container::Dense(a), Container::Dense(b)) = (&self.container, &other.container) {
            return from_dense_words(a, b, |x, y| x | y);
        }
        merge(self, other, true, true, true)
    }

    /// Symmetric difference.
    pub fn xor(&self, other: &Bitmap) -> Bitmap {
        if let (Container::Dense(a), Container::Dense(b)) = (&self.container, &other.container) {
            return from_dense_words(a, b, |x, y| x ^ y);
        }
        merge(self, other, true, false, true)
    }

    /// Set difference `self \ other`.
    pub fn and_not(&self, other: &Bitmap) -> Bitmap {
        if let (Container::Dense(a), Container::Dense(b)) = (&self.container, &other.container) {
            return from_dense_words(a, b, |x, y| x & !y);
        }
        merge(self, other, true, false, false)
    }

    /// True when the sets share at least one member.
    pub fn intersects(&self, other: &Bitmap) -> bool {
        let (small, large) = if self.cardinality() <= other.cardinality() {
            (self, other)
        } else {
            (other, self)
        };
        small.iter().any(|value| large.contains(value))
    }

    /// True when every member of `self` is a member of `other`.
    pub fn is_subset(&self, other: &Bitmap) -> bool {
        self.cardinality() <= other.cardinality()
            && self.iter().all(|value| other.contains(value))
    }

    /// Cheap legality pass after a point mutation.
    fn adapt(&mut self) {
        match &self.container {
            Container::Array(c) => {
                if c.cardinality() as usize > ARRAY_MAX {
                    self.container = Container::Dense(to_dense(&self.container));
                }
            }
            Container::Dense(c) => {
                if c.cardinality() as usize <= ARRAY_MAX {
                    self.container = Container::Array(to_array(&self.container));
                }
            }
            Container::Runs(c) => {
                if c.bytes() > DENSE_BYTES {
                    self.container = if c.cardinality() as usize > ARRAY_MAX {
                        Container::Dense(to_dense(&self.container))
                    } else {
                        Container::Array(to_array(&self.container))
                    };
                }
            }
        }
    }

    /// Full representation pass, including the run-compaction scan.
    pub(crate) fn compact(&mut self) {
        self.adapt();
        if let Container::Dense(c) = &self.container {
            let run_bytes = c.num_runs() as usize * 4;
            if run_bytes < DENSE_BYTES && run_bytes < c.cardinality() as usize * 2 {
                self.container = Container::Runs(to_runs(&self.container));
            }
        }
    }
}

impl PartialEq for Bitmap {
    fn eq(&self, other: &Self) -> bool {
        self.cardinality() == other.cardinality() && self.iter().eq(other.iter())
    }
}

impl Eq for Bitmap {}

impl FromIterator<u16> for Bitmap {
    fn from_iter<I: IntoIterator<Item = u16>>(values: I) -> Self {
        let mut bitmap = Bitmap::new();
        for value in values {
            bitmap.insert(value);
        }
        bitmap
    }
}

impl Extend<u16> for Bitmap {
    fn extend<I: IntoIterator<Item = u16>>(&mut self, values: I) {
        for value in values {
            self.insert(value);
        }
    }
}

impl<'a> IntoIterator for &'a Bitmap {
    type Item = u16;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

impl core::ops::BitAnd for &Bitmap {
    type Output = Bitmap;

    fn bitand(self, rhs: Self) -> Bitmap {
        self.and(rhs)
    }
}

impl core::ops::BitOr for &Bitmap {
    type Output = Bitmap;

    fn bitor(self, rhs: Self) -> Bitmap {
        self.or(rhs)
    }
}

impl core::ops::BitXor for &Bitmap {
    type Output = Bitmap;

    fn bitxor(self, rhs: Self) -> Bitmap {
        self.xor(rhs)
    }
}

impl core::ops::Sub for &Bitmap {
    type Output = Bitmap;

    fn sub(self, rhs: Self) -> Bitmap {
        self.and_not(rhs)
    }
}

fn check_range(range: &Range<u32>) -> Result<(), Error> {
    if range.start > range.end || range.end > UNIVERSE {
        return Err(Error::InvalidRange {
            start: range.start,
            end: range.end,
        });
    }
    Ok(())
}

fn count_array_runs(values: &[u16]) -> usize {
    let mut runs = 0;
    let mut previous: Option<u16> = None;
    for &value in values {
        if previous.is_none() || previous != value.checked_sub(1) {
            runs += 1;
        }
        previous = Some(value);
    }
    runs
}

pub(crate) fn to_dense(container: &Container) -> DenseContainer {
    let mut dense = DenseContainer::new();
    match container {
        Container::Array(c) => {
            for &value in c.as_slice() {
                dense.insert(value);
            }
        }
        Container::Dense(c) => return c.clone(),
        Container::Runs(c) => {
            for run in c.runs() {
                dense.insert_range(u32::from(run.start), u32::from(run.last) + 1);
            }
        }
    }
    dense
}

pub(crate) fn to_array(container: &Container) -> ArrayContainer {
    match container {
        Container::Array(c) => c.clone(),
        _ => ArrayContainer::from_sorted(Iter::new(container).collect()),
    }
}

pub(crate) fn to_runs(container: &Container) -> RunContainer {
    if let Container::Runs(c) = container {
        return c.clone();
    }
    let mut runs: Vec<Run> = Vec::new();
    for value in Iter::new(container) {
        match runs.last_mut() {
            Some(run) if u32::from(run.last) + 1 == u32::from(value) => run.last = value,
            _ => runs.push(Run {
                start: value,
                last: value,
            }),
        }
    }
    RunContainer::from_runs(runs)
}

fn from_dense_words<F>(a: &DenseContainer, b: &DenseContainer, op: F) -> Bitmap
where
    F: Fn(u64, u64) -> u64,
{
    let words: Vec<u64> = a
        .words()
        .iter()
        .zip(b.words())
        .map(|(&x, &y)| op(x, y))
        .collect();
    let mut out = Bitmap {
        container: Container::Dense(DenseContainer::from_words(words.into_boxed_slice())),
    };
    out.compact();
    out
}

fn merge(a: &Bitmap, b: &Bitmap, keep_left: bool, keep_both: bool, keep_right: bool) -> Bitmap {
    let mut out = Builder::new();
    let mut xs = a.iter();
    let mut ys = b.iter();
    let mut x = xs.next();
    let mut y = ys.next();
    loop {
        match (x, y) {
            (Some(u), Some(v)) => {
                if u < v {
                    if keep_left {
                        out.push(u);
                    }
                    x = xs.next();
                } else if u > v {
                    if keep_right {
                        out.push(v);
                    }
                    y = ys.next();
                } else {
                    if keep_both {
                        out.push(u);
                    }
                    x = xs.next();
                    y = ys.next();
                }
            }
            (Some(u), None) => {
                if !keep_left {
                    break;
                }
                out.push(u);
                x = xs.next();
            }
            (None, Some(v)) => {
                if !keep_right {
                    break;
                }
                out.push(v);
                y = ys.next();
            }
            (None, None) => break,
        }
    }
    out.finish()
}

/// Accumulates strictly ascending values, spilling from array to dense form
/// when the array bound is crossed.
pub(crate) struct Builder {
    array: Vec<u16>,
    dense: Option<DenseContainer>,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            array: Vec::new(),
            dense: None,
        }
    }

    pub(crate) fn push(&mut self, value: u16) {
        debug_assert!(self.array.last().map_or(true, |&p| p < value));
        match &mut self.dense {
            Some(dense) => {
                dense.insert(value);
            }
            None => {
                self.array.push(value);
                if self.array.len() > ARRAY_MAX {
                    let mut dense = DenseContainer::new();
                    for &v in &self.array {
                        dense.insert(v);
                    }
                    self.array.clear();
                    self.dense = Some(dense);
                }
            }
        }
    }

    pub(crate) fn finish(self) -> Bitmap {
        let container = match self.dense {
            Some(dense) => Container::Dense(dense),
            None => Container::Array(ArrayContainer::from_sorted(self.array)),
        };
        let mut bitmap = Bitmap { container };
        bitmap.compact();
        bitmap
    }
}
