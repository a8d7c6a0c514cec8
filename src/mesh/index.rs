//! Index types for mesh elements.
//!
//! Vertices and faces are identified by type-safe 32-bit index wrappers so a
//! face id can never be used where a vertex id is expected. Element counts are
//! checked against `u32::MAX` when a [`Geometry`](crate::Geometry) is built.

use std::fmt::{self, Debug, Display};

/// A type-safe vertex index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId(u32);

/// A type-safe face index.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct FaceId(u32);

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl $name {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                debug_assert!(index <= u32::MAX as usize, "index {} too large for u32", index);
                Self(index as u32)
            }

            /// Get the index as `usize`, suitable for slice access.
            #[inline]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            /// Get the raw 32-bit value.
            #[inline]
            pub fn raw(self) -> u32 {
                self.0
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.0)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<usize> for $name {
            fn from(v: usize) -> Self {
                Self::new(v)
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(FaceId, "F");
