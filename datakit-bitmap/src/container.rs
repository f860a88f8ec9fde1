pub(crate) mod array;
pub(crate) mod dense;
pub(crate) mod runs;

pub(crate) use array::ArrayContainer;
pub(crate) use dense::DenseContainer;
pub(crate) use runs::RunContainer;

/// The concrete form a bitmap currently uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ContainerKind {
    /// Sorted sparse array of 16-bit values.
    #[display(fmt = "array")]
    Array = 0,
    /// Dense 8192-byte bit array.
    #[display(fmt = "bitmap")]
    Bitmap = 1,
    /// Run-length list of contiguous ranges.
    #[display(fmt = "runs")]
    Runs = 2,
}

impl ContainerKind {
    /// The serialization tag for this kind.
    pub const fn tag(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ContainerKind {
    type Error = crate::Error;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(ContainerKind::Array),
            1 => Ok(ContainerKind::Bitmap),
            2 => Ok(ContainerKind::Runs),
            other => Err(crate::Error::UnknownContainer(other)),
        }
    }
}

/// Tagged union over the three container forms.
#[derive(Debug, Clone)]
pub(crate) enum Container {
    Array(ArrayContainer),
    Dense(DenseContainer),
    Runs(RunContainer),
}

impl Container {
    pub(crate) fn kind(&self) -> ContainerKind {
        match self {
            Container::Array(_) => ContainerKind::Array,
            Container::Dense(_) => ContainerKind::Bitmap,
            Container::Runs(_) => ContainerKind::Runs,
        }
    }

    pub(crate) fn cardinality(&self) -> u32 {
        match self {
            Container::Array(c) => c.cardinality(),
            Container::Dense(c) => c.cardinality(),
            Container::Runs(c) => c.cardinality(),
        }
    }

    pub(crate) fn contains(&self, value: u16) -> bool {
        match self {
            Container::Array(c) => c.contains(value),
            Container::Dense(c) => c.contains(value),
            Container::Runs(c) => c.contains(value),
        }
    }

    pub(crate) fn insert(&mut self, value: u16) -> bool {
        match self {
            Container::Array(c) => c.insert(value),
            Container::Dense(c) => c.insert(value),
            Container::Runs(c) => c.insert(value),
        }
    }

    pub(crate) fn remove(&mut self, value: u16) -> bool {
        match self {
            Container::Array(c) => c.remove(value),
            Container::Dense(c) => c.remove(value),
            Container::Runs(c) => c.remove(value),
        }
    }

    /// Insert every value in `start..end`. Returns how many were new.
    pub(crate) fn insert_range(&mut self, start: u32, end: u32) -> u32 {
        match self {
            Container::Array(c) => c.insert_range(start, end),
            Container::Dense(c) => c.insert_range(start, end),
            Container::Runs(c) => c.insert_range(start, end),
        }
    }

    /// Remove every value in `start..end`. Returns how many were present.
    pub(crate) fn remove_range(&mut self, start: u32, end: u32) -> u32 {
        match self {
            Container::Array(c) => c.remove_range(start, end),
            Container::Dense(c) => c.remove_range(start, end),
            Container::Runs(c) => c.remove_range(start, end),
        }
    }

    pub(crate) fn min(&self) -> Option<u16> {
        match self {
            Container::Array(c) => c.min(),
            Container::Dense(c) => c.min(),
            Container::Runs(c) => c.min(),
        }
    }

    pub(crate) fn max(&self) -> Option<u16> {
        match self {
            Container::Array(c) => c.max(),
            Container::Dense(c) => c.max(),
            Container::Runs(c) => c.max(),
        }
    }

    /// Heap bytes backing the member storage.
    pub(crate) fn bytes(&self) -> usize {
        match self {
            Container::Array(c) => c.bytes(),
            Container::Dense(_) => crate::DENSE_BYTES,
            Container::Runs(c) => c.bytes(),
        }
    }
}

impl Default for Container {
    fn default() -> Self {
        Container::Array(ArrayContainer::new())
    }
}
