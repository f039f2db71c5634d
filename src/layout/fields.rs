//! Typed access to blocks of 4-byte scalars

use std::{fmt, sync::Arc};

use crate::memory::SharedMemoryRegion;

use super::constants::SCALAR_BYTES;

/// Declared type of a scalar field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    /// Unsigned 32-bit integer, little-endian
    U32,
    /// IEEE-754 single precision float, little-endian
    F32,
}

/// A decoded scalar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalarValue {
    U32(u32),
    F32(f32),
}

impl ScalarKind {
    /// Decode four little-endian bytes as this kind
    pub fn decode(self, bytes: [u8; SCALAR_BYTES]) -> ScalarValue {
        match self {
            ScalarKind::U32 => ScalarValue::U32(u32::from_le_bytes(bytes)),
            ScalarKind::F32 => ScalarValue::F32(f32::from_le_bytes(bytes)),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::U32(v) => write!(f, "{}", v),
            ScalarValue::F32(v) => write!(f, "{}", v),
        }
    }
}

/// Name and type of one field in a scalar block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: ScalarKind,
}

impl FieldSpec {
    pub const fn u32(name: &'static str) -> Self {
        Self { name, kind: ScalarKind::U32 }
    }

    pub const fn f32(name: &'static str) -> Self {
        Self { name, kind: ScalarKind::F32 }
    }
}

/// A run of 4-byte scalars at a fixed base offset.
///
/// Reads go straight to the mapping and return whatever the server wrote
/// last; nothing is cached.
#[derive(Debug, Clone)]
pub struct FieldBlock {
    region: Arc<SharedMemoryRegion>,
    base: usize,
    fields: &'static [FieldSpec],
}

impl FieldBlock {
    /// The caller guarantees `base + fields.len() * 4` lies within `region`
    pub(crate) fn new(
        region: Arc<SharedMemoryRegion>,
        base: usize,
        fields: &'static [FieldSpec],
    ) -> Self {
        debug_assert!(base + fields.len() * SCALAR_BYTES <= region.size());
        Self { region, base, fields }
    }

    fn raw(&self, index: usize) -> [u8; SCALAR_BYTES] {
        assert!(
            index < self.fields.len(),
            "field index {} outside block of {} fields",
            index,
            self.fields.len()
        );
        self.region.load::<SCALAR_BYTES>(self.base + index * SCALAR_BYTES)
    }

    /// Read field `index` as an unsigned integer
    pub fn read_u32(&self, index: usize) -> u32 {
        u32::from_le_bytes(self.raw(index))
    }

    /// Read field `index` as a float
    pub fn read_f32(&self, index: usize) -> f32 {
        f32::from_le_bytes(self.raw(index))
    }

    /// Read field `index` using its declared kind
    pub fn read(&self, index: usize) -> ScalarValue {
        let bytes = self.raw(index);
        self.fields[index].kind.decode(bytes)
    }

    /// Field table of this block
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Every field name paired with its current value
    pub fn entries(&self) -> Vec<(&'static str, ScalarValue)> {
        (0..self.fields.len())
            .map(|i| (self.fields[i].name, self.read(i)))
            .collect()
    }

    /// Base byte offset within the region
    pub fn base(&self) -> usize {
        self.base
    }
}
