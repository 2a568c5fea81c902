//! Random-access, cursor-free value producers.
//!
//! A [`Field`] maps a signed index to a value. Fields carry no position,
//! are cheap to duplicate and may be conceptually infinite; slicing one
//! to a finite shape (via [`field_slice`] or the named constructors
//! below) bounds the work.

use num_traits::{Float, NumCast, PrimInt};

use crate::cursor::{decompose, FieldCursor, Word};
use crate::kind::Contiguous;
use crate::slice::Slice;

/// A random-access value producer without cursor semantics.
pub trait Field: Clone {
    type Item;

    /// Value at `index`.
    fn at(&self, index: isize) -> Self::Item;
}

/// View a field through a row-major shape.
pub fn field_slice<F: Field, const N: usize>(
    field: F,
    lengths: [usize; N],
) -> Slice<FieldCursor<F>, N, Contiguous> {
    Slice::from_parts(lengths, [], FieldCursor::new(field))
}

// ---------------------------------------------------------------------------
// Repeat
// ---------------------------------------------------------------------------

/// Produces the same value at every index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatField<T> {
    value: T,
}

impl<T> RepeatField<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }
}

impl<T: Clone> Field for RepeatField<T> {
    type Item = T;

    #[inline(always)]
    fn at(&self, _index: isize) -> T {
        self.value.clone()
    }
}

/// A shape filled with clones of one value.
pub fn repeat<T: Clone, const N: usize>(
    value: T,
    lengths: [usize; N],
) -> Slice<FieldCursor<RepeatField<T>>, N, Contiguous> {
    field_slice(RepeatField { value }, lengths)
}

// ---------------------------------------------------------------------------
// Iota
// ---------------------------------------------------------------------------

/// Arithmetic progression over the flat row-major index:
/// `at(i) == start + stride * i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IotaField<T> {
    start: T,
    stride: T,
}

impl<T> IotaField<T> {
    pub fn new(start: T, stride: T) -> Self {
        Self { start, stride }
    }
}

impl<T: PrimInt> Field for IotaField<T> {
    type Item = T;

    #[inline(always)]
    fn at(&self, index: isize) -> T {
        let index = T::from(index)
            .unwrap_or_else(|| panic!("iota index {index} not representable in element type"));
        self.start + self.stride * index
    }
}

/// Row-major counting slice starting at zero with unit stride.
pub fn iota<T: PrimInt, const N: usize>(
    lengths: [usize; N],
) -> Slice<FieldCursor<IotaField<T>>, N, Contiguous> {
    iota_with(lengths, T::zero(), T::one())
}

/// Row-major counting slice with explicit start and stride.
pub fn iota_with<T: PrimInt, const N: usize>(
    lengths: [usize; N],
    start: T,
    stride: T,
) -> Slice<FieldCursor<IotaField<T>>, N, Contiguous> {
    field_slice(IotaField { start, stride }, lengths)
}

// ---------------------------------------------------------------------------
// NdIota
// ---------------------------------------------------------------------------

/// Produces the index tuple itself: element `(i0, ..., iN-1)` is
/// `[i0, ..., iN-1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdIotaField<const N: usize> {
    lengths: [usize; N],
}

impl<const N: usize> Field for NdIotaField<N> {
    type Item = [usize; N];

    #[inline]
    fn at(&self, index: isize) -> [usize; N] {
        assert!(index >= 0, "ndiota index must be non-negative");
        decompose(&self.lengths, index as usize)
    }
}

/// Slice whose elements are their own index vectors.
pub fn nd_iota<const N: usize>(
    lengths: [usize; N],
) -> Slice<FieldCursor<NdIotaField<N>>, N, Contiguous> {
    field_slice(NdIotaField { lengths }, lengths)
}

// ---------------------------------------------------------------------------
// Linspace
// ---------------------------------------------------------------------------

/// Evenly spaced values over one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinspaceField<T> {
    start: T,
    step: T,
}

impl<T: Float> Field for LinspaceField<T> {
    type Item = T;

    #[inline(always)]
    fn at(&self, index: isize) -> T {
        let index: T = NumCast::from(index)
            .unwrap_or_else(|| panic!("linspace index {index} not representable"));
        self.start + self.step * index
    }
}

fn linspace_step<T: Float>(length: usize, start: T, stop: T) -> T {
    if length > 1 {
        let denom: T = NumCast::from(length - 1)
            .unwrap_or_else(|| panic!("linspace length {length} not representable"));
        (stop - start) / denom
    } else {
        T::zero()
    }
}

/// `length` evenly spaced values from `start` to `stop` inclusive.
pub fn linspace<T: Float>(
    length: usize,
    start: T,
    stop: T,
) -> Slice<FieldCursor<LinspaceField<T>>, 1, Contiguous> {
    let step = linspace_step(length, start, stop);
    field_slice(LinspaceField { start, step }, [length])
}

/// Cartesian product of per-axis evenly spaced values; elements are the
/// per-axis value vectors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NdLinspaceField<T, const N: usize> {
    lengths: [usize; N],
    starts: [T; N],
    steps: [T; N],
}

impl<T: Float, const N: usize> Field for NdLinspaceField<T, N> {
    type Item = [T; N];

    #[inline]
    fn at(&self, index: isize) -> [T; N] {
        assert!(index >= 0, "linspace index must be non-negative");
        let indices = decompose(&self.lengths, index as usize);
        core::array::from_fn(|d| {
            let i: T = NumCast::from(indices[d]).unwrap_or_else(|| unreachable!());
            self.starts[d] + self.steps[d] * i
        })
    }
}

/// Per-axis evenly spaced grid over `lengths`, one `(start, stop)`
/// interval per axis.
pub fn nd_linspace<T: Float, const N: usize>(
    lengths: [usize; N],
    intervals: [(T, T); N],
) -> Slice<FieldCursor<NdLinspaceField<T, N>>, N, Contiguous> {
    let starts = core::array::from_fn(|d| intervals[d].0);
    let steps = core::array::from_fn(|d| linspace_step(lengths[d], intervals[d].0, intervals[d].1));
    field_slice(
        NdLinspaceField {
            lengths,
            starts,
            steps,
        },
        lengths,
    )
}

// ---------------------------------------------------------------------------
// Magic square
// ---------------------------------------------------------------------------

/// Lazy `n x n` magic square with entries `1 ..= n*n`.
///
/// Construction is selected on `n mod 4`: Siamese for odd `n`, the
/// complement method for doubly even `n`, Conway's LUX method for singly
/// even `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicField {
    n: usize,
}

impl MagicField {
    fn odd_entry(n: usize, row: usize, col: usize) -> usize {
        n * ((row + col + 1 + n / 2) % n) + ((row + 2 * col + 1) % n) + 1
    }

    fn entry(&self, row: usize, col: usize) -> usize {
        let n = self.n;
        if n % 2 == 1 {
            Self::odd_entry(n, row, col)
        } else if n % 4 == 0 {
            let value = row * n + col + 1;
            if row % 4 == col % 4 || row % 4 + col % 4 == 3 {
                n * n + 1 - value
            } else {
                value
            }
        } else {
            // LUX: a half-size odd square expanded into 2x2 blocks.
            let m = n / 2;
            let k = (m - 1) / 2;
            let (oi, oj) = (row / 2, col / 2);
            let (di, dj) = (row % 2, col % 2);
            let label = if oi == k && oj == k {
                b'U'
            } else if oi == k + 1 && oj == k {
                b'L'
            } else if oi <= k {
                b'L'
            } else if oi == k + 1 {
                b'U'
            } else {
                b'X'
            };
            let pattern = match label {
                b'L' => [[4, 1], [2, 3]],
                b'U' => [[1, 4], [2, 3]],
                _ => [[1, 4], [3, 2]],
            };
            4 * (Self::odd_entry(m, oi, oj) - 1) + pattern[di][dj]
        }
    }
}

impl Field for MagicField {
    type Item = usize;

    #[inline]
    fn at(&self, index: isize) -> usize {
        assert!(index >= 0, "magic index must be non-negative");
        let index = index as usize;
        self.entry(index / self.n, index % self.n)
    }
}

/// Lazy `n x n` magic square. `n == 2` has no magic square.
pub fn magic(n: usize) -> Slice<FieldCursor<MagicField>, 2, Contiguous> {
    assert!(n > 0 && n != 2, "no {n} x {n} magic square exists");
    field_slice(MagicField { n }, [n, n])
}

// ---------------------------------------------------------------------------
// Bit field
// ---------------------------------------------------------------------------

/// Exposes the bits of an unsigned word field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitField<F> {
    words: F,
}

impl<F> BitField<F> {
    pub fn new(words: F) -> Self {
        Self { words }
    }
}

impl<W: Word, F: Field<Item = W>> Field for BitField<F> {
    type Item = bool;

    #[inline]
    fn at(&self, index: isize) -> bool {
        let word = self.words.at(index.div_euclid(W::BITS as isize));
        let shift = index.rem_euclid(W::BITS as isize) as usize;
        (word >> shift) & W::one() == W::one()
    }
}

// ---------------------------------------------------------------------------
// Cycle
// ---------------------------------------------------------------------------

/// Repeats the first `period` values of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleField<F> {
    field: F,
    period: usize,
}

impl<F: Field> Field for CycleField<F> {
    type Item = F::Item;

    #[inline]
    fn at(&self, index: isize) -> F::Item {
        assert!(index >= 0, "cycle index must be non-negative");
        self.field.at((index as usize % self.period) as isize)
    }
}

/// Rank-1 slice of `length` elements cycling through `field` with the
/// given period.
pub fn cycle<F: Field>(
    field: F,
    period: usize,
    length: usize,
) -> Slice<FieldCursor<CycleField<F>>, 1, Contiguous> {
    assert!(period > 0, "cycle period must be positive");
    field_slice(CycleField { field, period }, [length])
}

// ---------------------------------------------------------------------------
// Cartesian / Kronecker
// ---------------------------------------------------------------------------

/// Cartesian product of two fields; elements are pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cartesian2<A, B> {
    a: A,
    b: B,
    lengths: [usize; 2],
}

impl<A: Field, B: Field> Field for Cartesian2<A, B> {
    type Item = (A::Item, B::Item);

    #[inline]
    fn at(&self, index: isize) -> Self::Item {
        assert!(index >= 0, "cartesian index must be non-negative");
        let [i, j] = decompose(&self.lengths, index as usize);
        (self.a.at(i as isize), self.b.at(j as isize))
    }
}

/// Rank-2 Cartesian product slice of two fields.
pub fn cartesian2<A: Field, B: Field>(
    a: A,
    b: B,
    lengths: [usize; 2],
) -> Slice<FieldCursor<Cartesian2<A, B>>, 2, Contiguous> {
    field_slice(Cartesian2 { a, b, lengths }, lengths)
}

/// Cartesian product of three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cartesian3<A, B, C> {
    a: A,
    b: B,
    c: C,
    lengths: [usize; 3],
}

impl<A: Field, B: Field, C: Field> Field for Cartesian3<A, B, C> {
    type Item = (A::Item, B::Item, C::Item);

    #[inline]
    fn at(&self, index: isize) -> Self::Item {
        assert!(index >= 0, "cartesian index must be non-negative");
        let [i, j, k] = decompose(&self.lengths, index as usize);
        (
            self.a.at(i as isize),
            self.b.at(j as isize),
            self.c.at(k as isize),
        )
    }
}

/// Rank-3 Cartesian product slice of three fields.
pub fn cartesian3<A: Field, B: Field, C: Field>(
    a: A,
    b: B,
    c: C,
    lengths: [usize; 3],
) -> Slice<FieldCursor<Cartesian3<A, B, C>>, 3, Contiguous> {
    field_slice(Cartesian3 { a, b, c, lengths }, lengths)
}

/// Kronecker product of two fields: per-operand index decomposition
/// combined through `f` (multiplication for the classical product).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kronecker2<F, A, B> {
    f: F,
    a: A,
    b: B,
    lengths: [usize; 2],
}

impl<F, A, B, O> Field for Kronecker2<F, A, B>
where
    A: Field,
    B: Field,
    F: Fn(A::Item, B::Item) -> O + Clone,
{
    type Item = O;

    #[inline]
    fn at(&self, index: isize) -> O {
        assert!(index >= 0, "kronecker index must be non-negative");
        let [i, j] = decompose(&self.lengths, index as usize);
        (self.f)(self.a.at(i as isize), self.b.at(j as isize))
    }
}

/// Rank-2 Kronecker product slice; `lengths` are the per-operand extents.
pub fn kronecker2<F, A, B, O>(
    f: F,
    a: A,
    b: B,
    lengths: [usize; 2],
) -> Slice<FieldCursor<Kronecker2<F, A, B>>, 2, Contiguous>
where
    A: Field,
    B: Field,
    F: Fn(A::Item, B::Item) -> O + Clone,
{
    field_slice(Kronecker2 { f, a, b, lengths }, lengths)
}

/// Kronecker product of three fields, reduced left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Kronecker3<F, A, B, C> {
    f: F,
    a: A,
    b: B,
    c: C,
    lengths: [usize; 3],
}

impl<F, A, B, C, T> Field for Kronecker3<F, A, B, C>
where
    A: Field<Item = T>,
    B: Field<Item = T>,
    C: Field<Item = T>,
    F: Fn(T, T) -> T + Clone,
{
    type Item = T;

    #[inline]
    fn at(&self, index: isize) -> T {
        assert!(index >= 0, "kronecker index must be non-negative");
        let [i, j, k] = decompose(&self.lengths, index as usize);
        let ab = (self.f)(self.a.at(i as isize), self.b.at(j as isize));
        (self.f)(ab, self.c.at(k as isize))
    }
}

/// Rank-3 Kronecker product slice over same-typed operand fields.
pub fn kronecker3<F, A, B, C, T>(
    f: F,
    a: A,
    b: B,
    c: C,
    lengths: [usize; 3],
) -> Slice<FieldCursor<Kronecker3<F, A, B, C>>, 3, Contiguous>
where
    A: Field<Item = T>,
    B: Field<Item = T>,
    C: Field<Item = T>,
    F: Fn(T, T) -> T + Clone,
{
    field_slice(Kronecker3 { f, a, b, c, lengths }, lengths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iota_counts_row_major() {
        let s = iota::<i64, 2>([2, 3]);
        assert_eq!(s.to_vec(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(s.get([1, 2]), 5);
    }

    #[test]
    fn iota_with_start_and_stride() {
        let s = iota_with::<i32, 1>([4], 10, 3);
        assert_eq!(s.to_vec(), vec![10, 13, 16, 19]);
    }

    #[test]
    fn nd_iota_yields_index_tuples() {
        let s = nd_iota([2, 2]);
        assert_eq!(s.get([0, 1]), [0, 1]);
        assert_eq!(s.get([1, 0]), [1, 0]);
    }

    #[test]
    fn linspace_endpoints() {
        let s = linspace(5, 0.0f64, 1.0);
        let v = s.to_vec();
        assert_eq!(v.len(), 5);
        approx::assert_relative_eq!(v[0], 0.0);
        approx::assert_relative_eq!(v[2], 0.5);
        approx::assert_relative_eq!(v[4], 1.0);
    }

    #[test]
    fn linspace_single_point() {
        let s = linspace(1, 2.5f64, 9.0);
        approx::assert_relative_eq!(s.get([0]), 2.5);
    }

    #[test]
    fn nd_linspace_grid() {
        let s = nd_linspace([2, 3], [(0.0f64, 1.0), (0.0, 2.0)]);
        let v = s.get([1, 2]);
        approx::assert_relative_eq!(v[0], 1.0);
        approx::assert_relative_eq!(v[1], 2.0);
        let v = s.get([0, 1]);
        approx::assert_relative_eq!(v[1], 1.0);
    }

    fn assert_magic(n: usize) {
        let s = magic(n);
        let target = n * (n * n + 1) / 2;
        let mut seen = vec![false; n * n + 1];
        for i in 0..n {
            let row: usize = (0..n).map(|j| s.get([i, j])).sum();
            let col: usize = (0..n).map(|j| s.get([j, i])).sum();
            assert_eq!(row, target, "row {i} of magic({n})");
            assert_eq!(col, target, "column {i} of magic({n})");
        }
        let diag: usize = (0..n).map(|i| s.get([i, i])).sum();
        let anti: usize = (0..n).map(|i| s.get([i, n - 1 - i])).sum();
        assert_eq!(diag, target);
        assert_eq!(anti, target);
        for i in 0..n {
            for j in 0..n {
                let v = s.get([i, j]);
                assert!(v >= 1 && v <= n * n && !seen[v], "bad entry {v}");
                seen[v] = true;
            }
        }
    }

    #[test]
    fn magic_odd() {
        assert_magic(3);
        assert_magic(5);
        assert_eq!(magic(3).to_vec(), vec![8, 1, 6, 3, 5, 7, 4, 9, 2]);
    }

    #[test]
    fn magic_doubly_even() {
        assert_magic(4);
        assert_magic(8);
    }

    #[test]
    fn magic_singly_even() {
        assert_magic(6);
        assert_magic(10);
    }

    #[test]
    fn cycle_wraps_period() {
        let s = cycle(IotaField { start: 0i32, stride: 1 }, 3, 7);
        assert_eq!(s.to_vec(), vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn repeat_fills() {
        let s = repeat(7u8, [2, 2]);
        assert_eq!(s.to_vec(), vec![7, 7, 7, 7]);
    }

    #[test]
    fn bit_field_reads_words() {
        let f = BitField::new(RepeatField { value: 0b101u8 });
        assert!(f.at(0));
        assert!(!f.at(1));
        assert!(f.at(2));
        assert!(f.at(8));
    }

    #[test]
    fn cartesian_pairs() {
        let s = cartesian2(
            IotaField { start: 0i32, stride: 1 },
            IotaField { start: 10i32, stride: 10 },
            [2, 3],
        );
        assert_eq!(s.get([0, 0]), (0, 10));
        assert_eq!(s.get([1, 2]), (1, 30));
    }

    #[test]
    fn kronecker_multiplies() {
        let s = kronecker2(
            |a, b| a * b,
            IotaField { start: 1i64, stride: 1 },
            IotaField { start: 1i64, stride: 1 },
            [3, 3],
        );
        assert_eq!(s.get([2, 2]), 9);
        assert_eq!(s.get([1, 2]), 6);
    }
}
