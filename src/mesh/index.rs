//! Index types for mesh elements.
//!
//! Vertices, half-edges, and triangles live in arenas owned by the mesh and
//! refer to each other through these handles, never through pointers. The
//! handles are generic over the underlying integer type so small meshes can
//! use `u16` and massive ones `u64`.
//!
//! Vertex and half-edge handles are slots of width `I`. Triangle ids are
//! minted from a 64-bit counter regardless of `I`, so a long edit history
//! cannot exhaust them.
//!
//! Missing links (a boundary half-edge has no opposite) are expressed as
//! `Option<HalfEdgeId>` rather than with a sentinel value.

use std::fmt::{self, Debug};
use std::hash::Hash;
use std::marker::PhantomData;

/// Trait for types that can be used as mesh indices.
///
/// This trait is implemented for `u16`, `u32`, and `u64`.
pub trait MeshIndex:
    Copy + Clone + Eq + PartialEq + Ord + PartialOrd + Hash + Debug + Send + Sync + 'static
{
    /// The maximum valid index value.
    const MAX: Self;

    /// Convert from usize to this index type.
    ///
    /// # Panics
    /// Panics in debug builds if the value is too large for this index type.
    fn from_usize(v: usize) -> Self;

    /// Convert to usize.
    fn to_usize(self) -> usize;

    /// True if `v` is representable as this index type.
    #[inline]
    fn fits(v: usize) -> bool {
        v <= Self::MAX.to_usize()
    }
}

impl MeshIndex for u16 {
    const MAX: Self = u16::MAX;

    #[inline]
    fn from_usize(v: usize) -> Self {
        debug_assert!(v <= Self::MAX as usize, "index {} too large for u16", v);
        v as u16
    }

    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }
}

impl MeshIndex for u32 {
    const MAX: Self = u32::MAX;

    #[inline]
    fn from_usize(v: usize) -> Self {
        debug_assert!(v <= Self::MAX as usize, "index {} too large for u32", v);
        v as u32
    }

    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }
}

impl MeshIndex for u64 {
    const MAX: Self = u64::MAX;

    #[inline]
    fn from_usize(v: usize) -> Self {
        v as u64
    }

    #[inline]
    fn to_usize(self) -> usize {
        self as usize
    }
}

/// A type-safe vertex index. Stable for the lifetime of the mesh.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct VertexId<I: MeshIndex = u32>(I);

/// A type-safe half-edge index (an arena slot, reused after removal).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct HalfEdgeId<I: MeshIndex = u32>(I);

/// A type-safe triangle id. Assigned monotonically and never reused.
///
/// Always 64 bits wide; `I` only ties the id to its mesh type.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TriangleId<I: MeshIndex = u32>(u64, PhantomData<I>);

impl<I: MeshIndex> TriangleId<I> {
    /// Create a triangle id from a raw value.
    #[inline]
    pub fn new(id: usize) -> Self {
        Self(id as u64, PhantomData)
    }

    /// Get the raw id.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The id minted after this one.
    #[inline]
    pub(crate) fn successor(self) -> Self {
        Self(self.0 + 1, PhantomData)
    }
}

impl<I: MeshIndex> Debug for TriangleId<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T({})", self.0)
    }
}

macro_rules! impl_index_type {
    ($name:ident, $display:literal) => {
        impl<I: MeshIndex> $name<I> {
            /// Create a new index from a raw value.
            #[inline]
            pub fn new(index: usize) -> Self {
                Self(I::from_usize(index))
            }

            /// Get the raw index value.
            #[inline]
            pub fn index(self) -> usize {
                self.0.to_usize()
            }
        }

        impl<I: MeshIndex> Debug for $name<I> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", $display, self.index())
            }
        }
    };
}

impl_index_type!(VertexId, "V");
impl_index_type!(HalfEdgeId, "HE");
