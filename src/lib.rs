//! Zero-copy n-dimensional slice engine with compile-time stride kinds.
//!
//! This crate provides lazy, allocation-free views over linear memory:
//! a [`Slice`] is `lengths` plus kind-dependent stride storage plus a
//! [`Cursor`] at the origin, and every topology operation produces
//! another view over the same store.
//!
//! # Core Types
//!
//! - [`Slice`]: the central view, parameterized by cursor, rank and
//!   stride kind
//! - [`Contiguous`] / [`Canonical`] / [`Universal`]: compile-time kind
//!   tags forming a downgrade lattice
//! - [`Cursor`] / [`CursorMut`]: movable positions with signed indexed
//!   access
//! - [`Field`]: random-access, cursor-free value producers
//!
//! # Construction
//!
//! - [`from_slice`] / [`from_slice_mut`]: views over borrowed memory
//! - [`iota`], [`nd_iota`], [`linspace`], [`nd_linspace`], [`magic`],
//!   [`repeat`], [`cycle`], [`cartesian2`], [`kronecker2`]: lazy fields
//!   sliced to a shape
//!
//! # Topology
//!
//! Pure view producers on [`Slice`]: `reshape`, `transposed`, `pack` /
//! `ipack` / `unpack` / `evert_pack`, `diagonal`, `antidiagonal`,
//! `blocks`, `windows`, `flattened`, `strided_by`, `retro`,
//! `drop_borders`, `by_dim` / `along_dim`.
//!
//! # Lazy transforms
//!
//! `map` / `vmap`, [`zip2`] / [`zip3`] / `unzip`, `cached`, `slide` /
//! `slide_along` / `pairwise` / `diff`, `with_neighbours_sum`,
//! `bitwise` / `bitpack` / `bytegroup`, `indexed`, `chopped`.
//!
//! # Example
//!
//! ```rust
//! use ndslice::iota;
//!
//! let s = iota::<i64, 2>([2, 3]);
//! assert_eq!(s.to_vec(), vec![0, 1, 2, 3, 4, 5]);
//! assert_eq!(s.universal().strides(), &[3, 1]);
//!
//! let windows = iota::<i64, 1>([5]).windows([3]);
//! assert_eq!(windows.get([2]).to_vec(), vec![2, 3, 4]);
//! ```
//!
//! # Concurrency
//!
//! The engine is single-threaded by contract and contains no
//! synchronization primitives. Views over `Sync` elements may be read
//! from any number of threads; writes require exclusive access to the
//! overlapping storage region, which the engine does not detect.

pub mod cursor;
pub mod field;
mod kind;
mod lazy;
mod slice;
mod topology;

// ============================================================================
// Kinds
// ============================================================================
pub use kind::{Canonical, Contiguous, Kind, Universal};

// ============================================================================
// Slice and construction
// ============================================================================
pub use slice::{from_slice, from_slice_mut, Elements, Slice};

// ============================================================================
// Cursors
// ============================================================================
pub use cursor::{Cursor, CursorDistance, CursorMut, UnaryFn, Word};

// ============================================================================
// Fields
// ============================================================================
pub use field::{
    cartesian2, cartesian3, cycle, field_slice, iota, iota_with, kronecker2, kronecker3, linspace,
    magic, nd_iota, nd_linspace, repeat, BitField, Field, IotaField, LinspaceField, MagicField,
    NdIotaField, RepeatField,
};

// ============================================================================
// Zip
// ============================================================================
pub use lazy::{zip2, zip2_same_strides, zip3};

// ============================================================================
// Error types
// ============================================================================

/// Errors reported by view construction and zipping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SliceError {
    /// Backing length does not match the requested shape.
    #[error("length mismatch: shape needs {expected} elements, store has {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// Operand shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),
}

/// Reshape failure, a dedicated enum so callers can branch on the case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReshapeError {
    /// The input slice is empty.
    #[error("cannot reshape an empty slice")]
    Empty,

    /// The requested element count differs from the input's.
    #[error("element count mismatch in reshape")]
    Total,

    /// The stride structure cannot express the requested shape without
    /// copying.
    #[error("stride structure incompatible with the requested shape")]
    Incompatible,
}

/// Result type for slice operations.
pub type Result<T> = std::result::Result<T, SliceError>;
