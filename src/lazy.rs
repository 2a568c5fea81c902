//! Lazy element-wise transforms.
//!
//! Everything here composes cursors: the transformed slice reads through
//! the original storage and computes elements on access. None of these
//! operations mutate the backing store; writing through a lazy view
//! requires the base cursor to support mutable indexing.

use core::array::from_fn;
use core::ops::Sub;

use crate::cursor::{
    BitCursor, BitPackCursor, ByteGroupCursor, CachedCursor, ChopCursor, Cursor, FlattenedCursor,
    IndexedCursor, MapCursor, NeighboursCursor, PairwiseCursor, SlideCursor, UnaryFn, VmapCursor,
    Word, ZipCursor2, ZipCursor3,
};
use crate::field::Field;
use crate::kind::{Contiguous, Kind, Universal};
use crate::slice::Slice;
use crate::{Result, SliceError};

// ---------------------------------------------------------------------------
// map / vmap / indexed
// ---------------------------------------------------------------------------

impl<C: Cursor, const N: usize, K: Kind> Slice<C, N, K> {
    /// Lazy element transform; same shape, same kind.
    ///
    /// `f` must be pure with respect to the backing store: reads may be
    /// repeated or reordered freely.
    pub fn map<F, O>(self, f: F) -> Slice<MapCursor<C, F, O>, N, K>
    where
        F: Fn(C::Item) -> O + Clone,
    {
        let (lengths, strides, cursor) = self.into_parts();
        Slice::from_parts(lengths, strides, MapCursor::new(cursor, f))
    }

    /// [`map`](Slice::map) through a value-typed callable, for stateful
    /// callables with a named type.
    pub fn vmap<F>(self, f: F) -> Slice<VmapCursor<C, F>, N, K>
    where
        F: UnaryFn<C::Item>,
    {
        let (lengths, strides, cursor) = self.into_parts();
        Slice::from_parts(lengths, strides, VmapCursor::new(cursor, f))
    }
}

impl<C: Cursor<Item = usize>, const N: usize, K: Kind> Slice<C, N, K> {
    /// Lookup composition: element `i` becomes `field[self[i]]`.
    pub fn indexed<F: Field>(self, field: F) -> Slice<IndexedCursor<F, C>, N, K> {
        let (lengths, strides, cursor) = self.into_parts();
        Slice::from_parts(lengths, strides, IndexedCursor::new(field, cursor))
    }
}

// ---------------------------------------------------------------------------
// zip / unzip
// ---------------------------------------------------------------------------

fn hide_strides<C: Cursor, const N: usize, K: Kind>(slice: Slice<C, N, K>) -> FlattenedCursor<C, N> {
    let lengths = *slice.lengths();
    let strides = slice.stride_array();
    let (_, _, cursor) = slice.into_parts();
    FlattenedCursor::new(cursor, lengths, strides)
}

/// Zip two equally shaped slices into a slice of pairs.
///
/// Stride structure is hidden: each operand is rebased on a flat
/// row-major addressing, so any kind combination zips and the result is
/// Contiguous.
pub fn zip2<A, B, const N: usize, KA, KB>(
    a: Slice<A, N, KA>,
    b: Slice<B, N, KB>,
) -> Result<Slice<ZipCursor2<FlattenedCursor<A, N>, FlattenedCursor<B, N>>, N, Contiguous>>
where
    A: Cursor,
    B: Cursor,
    KA: Kind,
    KB: Kind,
{
    if a.lengths() != b.lengths() {
        return Err(SliceError::ShapeMismatch(
            a.lengths().to_vec(),
            b.lengths().to_vec(),
        ));
    }
    let lengths = *a.lengths();
    let cursor = ZipCursor2::new(hide_strides(a), hide_strides(b));
    Ok(Slice::from_parts(lengths, [], cursor))
}

/// Zip three equally shaped slices into a slice of triples.
pub fn zip3<A, B, C, const N: usize, KA, KB, KC>(
    a: Slice<A, N, KA>,
    b: Slice<B, N, KB>,
    c: Slice<C, N, KC>,
) -> Result<
    Slice<
        ZipCursor3<FlattenedCursor<A, N>, FlattenedCursor<B, N>, FlattenedCursor<C, N>>,
        N,
        Contiguous,
    >,
>
where
    A: Cursor,
    B: Cursor,
    C: Cursor,
    KA: Kind,
    KB: Kind,
    KC: Kind,
{
    if a.lengths() != b.lengths() || a.lengths() != c.lengths() {
        let offending = if a.lengths() == b.lengths() {
            c.lengths()
        } else {
            b.lengths()
        };
        return Err(SliceError::ShapeMismatch(
            a.lengths().to_vec(),
            offending.to_vec(),
        ));
    }
    let lengths = *a.lengths();
    let cursor = ZipCursor3::new(hide_strides(a), hide_strides(b), hide_strides(c));
    Ok(Slice::from_parts(lengths, [], cursor))
}

/// Zip two slices of the same kind whose stride arrays are asserted
/// equal, advancing the raw cursors in lockstep without rebasing.
pub fn zip2_same_strides<A, B, const N: usize, K>(
    a: Slice<A, N, K>,
    b: Slice<B, N, K>,
) -> Result<Slice<ZipCursor2<A, B>, N, K>>
where
    A: Cursor,
    B: Cursor,
    K: Kind,
{
    if a.lengths() != b.lengths() {
        return Err(SliceError::ShapeMismatch(
            a.lengths().to_vec(),
            b.lengths().to_vec(),
        ));
    }
    debug_assert_eq!(
        a.stride_array(),
        b.stride_array(),
        "zip2_same_strides operands must share a stride pattern"
    );
    let lengths = *a.lengths();
    let (_, strides, ca) = a.into_parts();
    let (_, _, cb) = b.into_parts();
    Ok(Slice::from_parts(lengths, strides, ZipCursor2::new(ca, cb)))
}

impl<A: Cursor, B: Cursor, const N: usize, K: Kind> Slice<ZipCursor2<A, B>, N, K> {
    /// Recover the component slices of a lockstep zip.
    pub fn unzip(self) -> (Slice<A, N, K>, Slice<B, N, K>) {
        let (lengths, strides, cursor) = self.into_parts();
        let (a, b) = cursor.into_parts();
        (
            Slice::from_parts(lengths, strides, a),
            Slice::from_parts(lengths, strides, b),
        )
    }
}

impl<A: Cursor, B: Cursor, C: Cursor, const N: usize, K: Kind> Slice<ZipCursor3<A, B, C>, N, K> {
    /// Recover the component slices of a lockstep three-way zip.
    pub fn unzip3(self) -> (Slice<A, N, K>, Slice<B, N, K>, Slice<C, N, K>) {
        let (lengths, strides, cursor) = self.into_parts();
        let (a, b, c) = cursor.into_parts();
        (
            Slice::from_parts(lengths, strides, a),
            Slice::from_parts(lengths, strides, b),
            Slice::from_parts(lengths, strides, c),
        )
    }
}

// ---------------------------------------------------------------------------
// cached
// ---------------------------------------------------------------------------

impl<C: Cursor, const N: usize> Slice<C, N, Contiguous>
where
    C::Item: Copy,
{
    /// Read-through cache view over caller-provided cells.
    ///
    /// `cache` and `flags` must each hold one cell per element. First
    /// reads compute and memoize; writes go to the cache only.
    /// Concurrent first accesses to one cell are undefined; callers
    /// serialize.
    pub fn cached<'a>(
        self,
        cache: &'a mut [C::Item],
        flags: &'a mut [bool],
    ) -> Result<Slice<CachedCursor<'a, C, C::Item>, N, Contiguous>> {
        let count = self.elem_count();
        if cache.len() != count {
            return Err(SliceError::LengthMismatch {
                expected: count,
                got: cache.len(),
            });
        }
        if flags.len() != count {
            return Err(SliceError::LengthMismatch {
                expected: count,
                got: flags.len(),
            });
        }
        let (lengths, strides, cursor) = self.into_parts();
        Ok(Slice::from_parts(
            lengths,
            strides,
            CachedCursor::new(cursor, cache, flags),
        ))
    }
}

// ---------------------------------------------------------------------------
// chop
// ---------------------------------------------------------------------------

impl<C: Cursor> Slice<C, 1, Contiguous> {
    /// Subdivide into variable-width segments: element `i` is the
    /// subslice `self[bounds[i] .. bounds[i + 1]]`.
    ///
    /// `bounds` must be non-decreasing and end within the slice.
    pub fn chopped(self, bounds: &[usize]) -> Slice<ChopCursor<'_, C>, 1, Contiguous> {
        assert!(!bounds.is_empty(), "chop bounds must not be empty");
        let len = self.lengths()[0];
        for w in bounds.windows(2) {
            assert!(w[0] <= w[1], "chop bounds must be non-decreasing");
        }
        assert!(
            bounds[bounds.len() - 1] <= len,
            "chop bounds exceed the slice length {len}"
        );
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts([bounds.len() - 1], [], ChopCursor::new(cursor, bounds))
    }
}

// ---------------------------------------------------------------------------
// slide / pairwise / diff
// ---------------------------------------------------------------------------

impl<C: Cursor, K: Kind> Slice<C, 1, K> {
    /// `P`-ary sliding-window reduction: element `i` is
    /// `f([self[i], ..., self[i + P - 1]])`; the result has
    /// `len - P + 1` elements.
    pub fn slide<const P: usize, F, O>(self, f: F) -> Slice<SlideCursor<C, F, O, P>, 1, Universal>
    where
        F: Fn([C::Item; P]) -> O + Clone,
    {
        assert!(P > 0, "slide window must be non-empty");
        let len = (self.lengths()[0] + 1).saturating_sub(P);
        let step = self.stride(0);
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts([len], [step], SlideCursor::new(cursor, step, f))
    }

    /// Binary window at a lag: element `i` is
    /// `f(self[i], self[i + lag])`, over `len - lag` elements.
    pub fn pairwise<F, O>(self, f: F, lag: usize) -> Slice<PairwiseCursor<C, F, O>, 1, Universal>
    where
        F: Fn(C::Item, C::Item) -> O + Clone,
    {
        assert!(lag > 0, "pairwise lag must be positive");
        let len = self.lengths()[0].saturating_sub(lag);
        let step = self.stride(0);
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts(
            [len],
            [step],
            PairwiseCursor::new(cursor, lag as isize * step, f),
        )
    }

    /// Lagged difference: element `i` is `self[i + lag] - self[i]`.
    pub fn diff(
        self,
        lag: usize,
    ) -> Slice<PairwiseCursor<C, fn(C::Item, C::Item) -> C::Item, C::Item>, 1, Universal>
    where
        C::Item: Sub<Output = C::Item>,
    {
        fn backward<T: Sub<Output = T>>(first: T, last: T) -> T {
            last - first
        }
        self.pairwise(backward::<C::Item> as fn(_, _) -> _, lag)
    }
}

impl<C: Cursor, const N: usize, K: Kind> Slice<C, N, K> {
    /// Sliding-window reduction along one axis; the other axes are
    /// untouched.
    pub fn slide_along<const P: usize, F, O>(
        self,
        axis: usize,
        f: F,
    ) -> Slice<SlideCursor<C, F, O, P>, N, Universal>
    where
        F: Fn([C::Item; P]) -> O + Clone,
    {
        assert!(P > 0, "slide window must be non-empty");
        assert!(axis < N, "axis {axis} out of range for rank {N}");
        let mut lengths = *self.lengths();
        lengths[axis] = (lengths[axis] + 1).saturating_sub(P);
        let strides = self.stride_array();
        let step = strides[axis];
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts(lengths, strides, SlideCursor::new(cursor, step, f))
    }

    /// Pair every interior cell with the `f`-reduction of its `2N`
    /// axis-adjacent neighbours; borders are dropped.
    pub fn with_neighbours_sum<F>(self, f: F) -> Slice<NeighboursCursor<C, F, N>, N, Universal>
    where
        F: Fn(C::Item, C::Item) -> C::Item + Clone,
    {
        assert!(N > 0, "neighbour reduction needs at least one dimension");
        let lengths: [usize; N] = from_fn(|d| self.lengths()[d].saturating_sub(2));
        let strides = self.stride_array();
        let (_, _, mut cursor) = self.into_parts();
        if !lengths.iter().any(|&l| l == 0) {
            cursor.advance(strides.iter().sum());
        }
        Slice::from_parts(lengths, strides, NeighboursCursor::new(cursor, strides, f))
    }
}

// ---------------------------------------------------------------------------
// bit-level reinterpretation
// ---------------------------------------------------------------------------

impl<W: Word, C: Cursor<Item = W>, const N: usize> Slice<C, N, Contiguous> {
    /// Reinterpret a contiguous slice of unsigned words as a slice of
    /// its bits, least significant first within each word. The
    /// innermost length scales by the word width.
    pub fn bitwise(self) -> Slice<BitCursor<C>, N, Contiguous> {
        let mut lengths = *self.lengths();
        if N > 0 {
            lengths[N - 1] *= W::BITS;
        }
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts(lengths, [], BitCursor::new(cursor))
    }

    /// Reinterpret as `BITS`-wide packed fields; `BITS` must divide the
    /// word width. The innermost length scales by `word bits / BITS`.
    pub fn bitpack<const BITS: usize>(self) -> Slice<BitPackCursor<C, BITS>, N, Contiguous> {
        assert!(
            BITS > 0 && BITS <= W::BITS && W::BITS % BITS == 0,
            "pack width must divide the word width"
        );
        let mut lengths = *self.lengths();
        if N > 0 {
            lengths[N - 1] *= W::BITS / BITS;
        }
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts(lengths, [], BitPackCursor::new(cursor))
    }
}

impl<C: Cursor<Item = u8>, const N: usize> Slice<C, N, Contiguous> {
    /// Group `GROUP` consecutive bytes into big-endian values of an
    /// unsigned word type. The innermost length must be divisible by
    /// `GROUP` and shrinks accordingly.
    pub fn bytegroup<U: Word, const GROUP: usize>(
        self,
    ) -> Slice<ByteGroupCursor<C, U, GROUP>, N, Contiguous> {
        let mut lengths = *self.lengths();
        if N > 0 {
            assert!(
                lengths[N - 1] % GROUP == 0,
                "innermost length {} is not divisible by the byte group {GROUP}",
                lengths[N - 1]
            );
            lengths[N - 1] /= GROUP;
        }
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts(lengths, [], ByteGroupCursor::new(cursor))
    }
}
