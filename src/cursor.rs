//! Movable cursors over a backing store.
//!
//! A [`Cursor`] is the dynamic end of a slice: a position that can be
//! shifted by a signed element count and read at a signed offset. Memory
//! backed cursors ([`PtrCursor`], [`PtrCursorMut`]) resolve offsets with
//! pointer arithmetic; lazy cursors (map, zip, field, bit) synthesize
//! elements on access and never touch the backing store.
//!
//! Cursors yield elements by value. Writing goes through [`CursorMut`],
//! which only memory-backed cursors (and compositions that forward to
//! one) implement.

use core::marker::PhantomData;

use crate::field::Field;
use crate::kind::{Contiguous, Kind};
use crate::slice::Slice;

/// A movable cursor with signed indexed access.
pub trait Cursor: Clone {
    /// Element produced at an offset.
    type Item;

    /// Read the element `offset` positions away from the cursor.
    fn get(&self, offset: isize) -> Self::Item;

    /// Move the cursor by `offset` positions.
    fn advance(&mut self, offset: isize);
}

/// A cursor that can store elements.
pub trait CursorMut: Cursor {
    /// Write the element `offset` positions away from the cursor.
    fn set(&mut self, offset: isize, value: Self::Item);
}

/// Signed distance between two cursors over the same backing store.
///
/// Only meaningful for cursors that share a store; composition cursors
/// forward to their base.
pub trait CursorDistance: Cursor {
    fn distance(&self, origin: &Self) -> isize;
}

// ---------------------------------------------------------------------------
// Machine words for the bit-level cursors
// ---------------------------------------------------------------------------

/// Unsigned machine word usable as bit storage.
pub trait Word: num_traits::PrimInt + num_traits::Unsigned + Copy + 'static {
    /// Bit width of the word.
    const BITS: usize;

    /// Widen a byte into this word.
    fn from_u8(byte: u8) -> Self;
}

macro_rules! impl_word {
    ($($t:ty),*) => {
        $(impl Word for $t {
            const BITS: usize = <$t>::BITS as usize;

            #[inline(always)]
            fn from_u8(byte: u8) -> Self {
                byte as $t
            }
        })*
    };
}

impl_word!(u8, u16, u32, u64, u128, usize);

// ---------------------------------------------------------------------------
// PtrCursor / PtrCursorMut
// ---------------------------------------------------------------------------

/// Contiguous read cursor: a raw pointer into a borrowed slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PtrCursor<'a, T> {
    ptr: *const T,
    _marker: PhantomData<&'a [T]>,
}

unsafe impl<T: Send> Send for PtrCursor<'_, T> {}
unsafe impl<T: Sync> Sync for PtrCursor<'_, T> {}

impl<'a, T> PtrCursor<'a, T> {
    #[inline]
    pub(crate) fn new(data: &'a [T]) -> Self {
        Self {
            ptr: data.as_ptr(),
            _marker: PhantomData,
        }
    }

    /// Raw pointer at the cursor position.
    #[inline]
    pub fn ptr(&self) -> *const T {
        self.ptr
    }
}

impl<'a, T: Copy> Cursor for PtrCursor<'a, T> {
    type Item = T;

    #[inline(always)]
    fn get(&self, offset: isize) -> T {
        unsafe { *self.ptr.offset(offset) }
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.ptr = self.ptr.wrapping_offset(offset);
    }
}

impl<'a, T: Copy> CursorDistance for PtrCursor<'a, T> {
    #[inline]
    fn distance(&self, origin: &Self) -> isize {
        // Both cursors must point into the same allocation.
        unsafe { self.ptr.offset_from(origin.ptr) }
    }
}

/// Contiguous write cursor.
///
/// Clones alias the same storage; writes require exclusive access to the
/// overlapping region, which is the caller's contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PtrCursorMut<'a, T> {
    ptr: *mut T,
    _marker: PhantomData<&'a mut [T]>,
}

unsafe impl<T: Send> Send for PtrCursorMut<'_, T> {}

impl<'a, T> PtrCursorMut<'a, T> {
    #[inline]
    pub(crate) fn new(data: &'a mut [T]) -> Self {
        Self {
            ptr: data.as_mut_ptr(),
            _marker: PhantomData,
        }
    }

    /// Raw mutable pointer at the cursor position.
    #[inline]
    pub fn as_mut_ptr(&self) -> *mut T {
        self.ptr
    }
}

impl<'a, T: Copy> Cursor for PtrCursorMut<'a, T> {
    type Item = T;

    #[inline(always)]
    fn get(&self, offset: isize) -> T {
        unsafe { *self.ptr.offset(offset) }
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.ptr = self.ptr.wrapping_offset(offset);
    }
}

impl<'a, T: Copy> CursorMut for PtrCursorMut<'a, T> {
    #[inline(always)]
    fn set(&mut self, offset: isize, value: T) {
        unsafe {
            *self.ptr.offset(offset) = value;
        }
    }
}

impl<'a, T: Copy> CursorDistance for PtrCursorMut<'a, T> {
    #[inline]
    fn distance(&self, origin: &Self) -> isize {
        unsafe { self.ptr.offset_from(origin.ptr) }
    }
}

// ---------------------------------------------------------------------------
// StridedCursor
// ---------------------------------------------------------------------------

/// Wraps a base cursor with a fixed step multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StridedCursor<C> {
    cursor: C,
    factor: isize,
}

impl<C: Cursor> StridedCursor<C> {
    #[inline]
    pub(crate) fn new(cursor: C, factor: isize) -> Self {
        assert!(factor != 0, "stride factor must be non-zero");
        Self { cursor, factor }
    }
}

impl<C: Cursor> Cursor for StridedCursor<C> {
    type Item = C::Item;

    #[inline(always)]
    fn get(&self, offset: isize) -> C::Item {
        self.cursor.get(offset * self.factor)
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.cursor.advance(offset * self.factor);
    }
}

impl<C: CursorMut> CursorMut for StridedCursor<C> {
    #[inline(always)]
    fn set(&mut self, offset: isize, value: C::Item) {
        self.cursor.set(offset * self.factor, value);
    }
}

impl<C: CursorDistance> CursorDistance for StridedCursor<C> {
    #[inline]
    fn distance(&self, origin: &Self) -> isize {
        self.cursor.distance(&origin.cursor) / self.factor
    }
}

// ---------------------------------------------------------------------------
// RetroCursor
// ---------------------------------------------------------------------------

/// Reverses the direction of a base cursor: `retro[k] == base[-k]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetroCursor<C> {
    cursor: C,
}

impl<C: Cursor> RetroCursor<C> {
    #[inline]
    pub(crate) fn new(cursor: C) -> Self {
        Self { cursor }
    }

    /// Unwrap, recovering the base cursor at its current position.
    #[inline]
    pub fn into_inner(self) -> C {
        self.cursor
    }
}

impl<C: Cursor> Cursor for RetroCursor<C> {
    type Item = C::Item;

    #[inline(always)]
    fn get(&self, offset: isize) -> C::Item {
        self.cursor.get(-offset)
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.cursor.advance(-offset);
    }
}

impl<C: CursorMut> CursorMut for RetroCursor<C> {
    #[inline(always)]
    fn set(&mut self, offset: isize, value: C::Item) {
        self.cursor.set(-offset, value);
    }
}

impl<C: CursorDistance> CursorDistance for RetroCursor<C> {
    #[inline]
    fn distance(&self, origin: &Self) -> isize {
        -self.cursor.distance(&origin.cursor)
    }
}

// ---------------------------------------------------------------------------
// FieldCursor
// ---------------------------------------------------------------------------

/// A field with a current index, giving cursor semantics to a
/// random-access producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldCursor<F> {
    field: F,
    index: isize,
}

impl<F: Field> FieldCursor<F> {
    #[inline]
    pub(crate) fn new(field: F) -> Self {
        Self { field, index: 0 }
    }

    /// The wrapped field.
    #[inline]
    pub fn field(&self) -> &F {
        &self.field
    }
}

impl<F: Field> Cursor for FieldCursor<F> {
    type Item = F::Item;

    #[inline(always)]
    fn get(&self, offset: isize) -> F::Item {
        self.field.at(self.index + offset)
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.index += offset;
    }
}

impl<F: Field> CursorDistance for FieldCursor<F> {
    #[inline]
    fn distance(&self, origin: &Self) -> isize {
        self.index - origin.index
    }
}

// ---------------------------------------------------------------------------
// MapCursor / VmapCursor
// ---------------------------------------------------------------------------

/// Lazy element transform: `map[k] == f(base[k])`.
#[derive(Debug)]
pub struct MapCursor<C, F, O> {
    cursor: C,
    f: F,
    _out: PhantomData<fn() -> O>,
}

impl<C, F, O> MapCursor<C, F, O> {
    #[inline]
    pub(crate) fn new(cursor: C, f: F) -> Self {
        Self {
            cursor,
            f,
            _out: PhantomData,
        }
    }
}

impl<C: Clone, F: Clone, O> Clone for MapCursor<C, F, O> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
            f: self.f.clone(),
            _out: PhantomData,
        }
    }
}

impl<C, F, O> Cursor for MapCursor<C, F, O>
where
    C: Cursor,
    F: Fn(C::Item) -> O + Clone,
{
    type Item = O;

    #[inline(always)]
    fn get(&self, offset: isize) -> O {
        (self.f)(self.cursor.get(offset))
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.cursor.advance(offset);
    }
}

/// A value-typed callable for [`VmapCursor`].
///
/// Closures erase their state behind `Fn`; a `UnaryFn` implementor keeps
/// its state in a named struct, so the transformed slice's type spells
/// out the callable.
pub trait UnaryFn<T>: Clone {
    type Output;

    fn eval(&self, input: T) -> Self::Output;
}

/// Lazy element transform through a value-typed callable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmapCursor<C, F> {
    cursor: C,
    f: F,
}

impl<C, F> VmapCursor<C, F> {
    #[inline]
    pub(crate) fn new(cursor: C, f: F) -> Self {
        Self { cursor, f }
    }
}

impl<C, F> Cursor for VmapCursor<C, F>
where
    C: Cursor,
    F: UnaryFn<C::Item>,
{
    type Item = F::Output;

    #[inline(always)]
    fn get(&self, offset: isize) -> F::Output {
        self.f.eval(self.cursor.get(offset))
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.cursor.advance(offset);
    }
}

// ---------------------------------------------------------------------------
// ZipCursor2 / ZipCursor3
// ---------------------------------------------------------------------------

/// Two cursors advanced in lockstep; elements are pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZipCursor2<A, B> {
    a: A,
    b: B,
}

impl<A, B> ZipCursor2<A, B> {
    #[inline]
    pub(crate) fn new(a: A, b: B) -> Self {
        Self { a, b }
    }

    #[inline]
    pub(crate) fn into_parts(self) -> (A, B) {
        (self.a, self.b)
    }
}

impl<A: Cursor, B: Cursor> Cursor for ZipCursor2<A, B> {
    type Item = (A::Item, B::Item);

    #[inline(always)]
    fn get(&self, offset: isize) -> Self::Item {
        (self.a.get(offset), self.b.get(offset))
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.a.advance(offset);
        self.b.advance(offset);
    }
}

impl<A: CursorMut, B: CursorMut> CursorMut for ZipCursor2<A, B> {
    #[inline(always)]
    fn set(&mut self, offset: isize, value: Self::Item) {
        self.a.set(offset, value.0);
        self.b.set(offset, value.1);
    }
}

/// Three cursors advanced in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZipCursor3<A, B, C> {
    a: A,
    b: B,
    c: C,
}

impl<A, B, C> ZipCursor3<A, B, C> {
    #[inline]
    pub(crate) fn new(a: A, b: B, c: C) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub(crate) fn into_parts(self) -> (A, B, C) {
        (self.a, self.b, self.c)
    }
}

impl<A: Cursor, B: Cursor, C: Cursor> Cursor for ZipCursor3<A, B, C> {
    type Item = (A::Item, B::Item, C::Item);

    #[inline(always)]
    fn get(&self, offset: isize) -> Self::Item {
        (self.a.get(offset), self.b.get(offset), self.c.get(offset))
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.a.advance(offset);
        self.b.advance(offset);
        self.c.advance(offset);
    }
}

impl<A: CursorMut, B: CursorMut, C: CursorMut> CursorMut for ZipCursor3<A, B, C> {
    #[inline(always)]
    fn set(&mut self, offset: isize, value: Self::Item) {
        self.a.set(offset, value.0);
        self.b.set(offset, value.1);
        self.c.set(offset, value.2);
    }
}

// ---------------------------------------------------------------------------
// IndexedCursor
// ---------------------------------------------------------------------------

/// Lookup composition: `indexed[k] == field[indices[k]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexedCursor<F, C> {
    field: F,
    indices: C,
}

impl<F, C> IndexedCursor<F, C> {
    #[inline]
    pub(crate) fn new(field: F, indices: C) -> Self {
        Self { field, indices }
    }
}

impl<F, C> Cursor for IndexedCursor<F, C>
where
    F: Field,
    C: Cursor<Item = usize>,
{
    type Item = F::Item;

    #[inline(always)]
    fn get(&self, offset: isize) -> F::Item {
        self.field.at(self.indices.get(offset) as isize)
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.indices.advance(offset);
    }
}

// ---------------------------------------------------------------------------
// ChopCursor
// ---------------------------------------------------------------------------

/// Variable-width subdivision of a rank-1 view:
/// `chop[k] == base[bounds[k] .. bounds[k + 1]]`.
///
/// `bounds` must be non-decreasing; the base cursor sits at element 0 of
/// the underlying data and bounds are absolute element indices.
#[derive(Debug, Clone, Copy)]
pub struct ChopCursor<'a, C> {
    cursor: C,
    bounds: &'a [usize],
    pos: isize,
}

impl<'a, C: Cursor> ChopCursor<'a, C> {
    #[inline]
    pub(crate) fn new(cursor: C, bounds: &'a [usize]) -> Self {
        Self {
            cursor,
            bounds,
            pos: 0,
        }
    }
}

impl<'a, C: Cursor> Cursor for ChopCursor<'a, C> {
    type Item = Slice<C, 1, Contiguous>;

    fn get(&self, offset: isize) -> Self::Item {
        let i = (self.pos + offset) as usize;
        let lo = self.bounds[i];
        let hi = self.bounds[i + 1];
        assert!(hi >= lo, "chop bounds must be non-decreasing");
        let mut cursor = self.cursor.clone();
        cursor.advance(lo as isize);
        Slice::from_parts([hi - lo], [], cursor)
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.pos += offset;
    }
}

// ---------------------------------------------------------------------------
// SliceCursor
// ---------------------------------------------------------------------------

/// Slice-of-slices cursor produced by `pack`.
///
/// The inner shape is fixed at construction; `get` synthesizes a fresh
/// inner view into the shared store, no allocation involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceCursor<C, const P: usize, K: Kind> {
    cursor: C,
    lengths: [usize; P],
    strides: K::Strides<P>,
}

impl<C: Cursor, const P: usize, K: Kind> SliceCursor<C, P, K> {
    #[inline]
    pub(crate) fn new(cursor: C, lengths: [usize; P], strides: K::Strides<P>) -> Self {
        Self {
            cursor,
            lengths,
            strides,
        }
    }

    /// Shape of the synthesized inner slices.
    #[inline]
    pub fn inner_lengths(&self) -> &[usize; P] {
        &self.lengths
    }

    #[inline]
    pub(crate) fn inner_strides(&self) -> &K::Strides<P> {
        &self.strides
    }

    #[inline]
    pub(crate) fn into_base(self) -> C {
        self.cursor
    }
}

impl<C: Cursor, const P: usize, K: Kind> Cursor for SliceCursor<C, P, K> {
    type Item = Slice<C, P, K>;

    #[inline]
    fn get(&self, offset: isize) -> Self::Item {
        let mut cursor = self.cursor.clone();
        cursor.advance(offset);
        Slice::from_parts(self.lengths, self.strides, cursor)
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.cursor.advance(offset);
    }
}

// ---------------------------------------------------------------------------
// FlattenedCursor
// ---------------------------------------------------------------------------

/// Rank-1 addressing over an N-dimensional strided view.
///
/// Keeps the base cursor at the origin and carries a flat position; each
/// access decomposes the flat index into the per-dimension position
/// vector and resolves the strided offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenedCursor<C, const N: usize> {
    cursor: C,
    lengths: [usize; N],
    strides: [isize; N],
    flat: isize,
}

impl<C: Cursor, const N: usize> FlattenedCursor<C, N> {
    #[inline]
    pub(crate) fn new(cursor: C, lengths: [usize; N], strides: [isize; N]) -> Self {
        Self {
            cursor,
            lengths,
            strides,
            flat: 0,
        }
    }

    #[inline]
    fn strided_offset(&self, offset: isize) -> isize {
        let flat = self.flat + offset;
        debug_assert!(flat >= 0, "flattened cursor dereferenced before the start");
        let indices = decompose(&self.lengths, flat as usize);
        let mut out = 0isize;
        for d in 0..N {
            out += indices[d] as isize * self.strides[d];
        }
        out
    }
}

impl<C: Cursor, const N: usize> Cursor for FlattenedCursor<C, N> {
    type Item = C::Item;

    #[inline]
    fn get(&self, offset: isize) -> C::Item {
        self.cursor.get(self.strided_offset(offset))
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.flat += offset;
    }
}

impl<C: CursorMut, const N: usize> CursorMut for FlattenedCursor<C, N> {
    #[inline]
    fn set(&mut self, offset: isize, value: C::Item) {
        let strided = self.strided_offset(offset);
        self.cursor.set(strided, value);
    }
}

impl<C: Cursor, const N: usize> CursorDistance for FlattenedCursor<C, N> {
    #[inline]
    fn distance(&self, origin: &Self) -> isize {
        self.flat - origin.flat
    }
}

/// Row-major decomposition of a flat index.
pub(crate) fn decompose<const N: usize>(lengths: &[usize; N], mut flat: usize) -> [usize; N] {
    let mut indices = [0usize; N];
    for d in (0..N).rev() {
        if lengths[d] > 0 {
            indices[d] = flat % lengths[d];
            flat /= lengths[d];
        }
    }
    indices
}

// ---------------------------------------------------------------------------
// BitCursor
// ---------------------------------------------------------------------------

/// Exposes the individual bits inside an unsigned word cursor.
///
/// Positions are bit-grained; the base cursor never moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitCursor<C> {
    words: C,
    pos: isize,
}

impl<C> BitCursor<C> {
    #[inline]
    pub(crate) fn new(words: C) -> Self {
        Self { words, pos: 0 }
    }
}

impl<W: Word, C: Cursor<Item = W>> Cursor for BitCursor<C> {
    type Item = bool;

    #[inline]
    fn get(&self, offset: isize) -> bool {
        let bit = self.pos + offset;
        let word = self.words.get(bit.div_euclid(W::BITS as isize));
        let shift = bit.rem_euclid(W::BITS as isize) as usize;
        (word >> shift) & W::one() == W::one()
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.pos += offset;
    }
}

impl<W: Word, C: CursorMut<Item = W>> CursorMut for BitCursor<C> {
    #[inline]
    fn set(&mut self, offset: isize, value: bool) {
        let bit = self.pos + offset;
        let index = bit.div_euclid(W::BITS as isize);
        let shift = bit.rem_euclid(W::BITS as isize) as usize;
        let word = self.words.get(index);
        let mask = W::one() << shift;
        let word = if value { word | mask } else { word & !mask };
        self.words.set(index, word);
    }
}

impl<W: Word, C: Cursor<Item = W>> CursorDistance for BitCursor<C> {
    #[inline]
    fn distance(&self, origin: &Self) -> isize {
        self.pos - origin.pos
    }
}

// ---------------------------------------------------------------------------
// BitPackCursor
// ---------------------------------------------------------------------------

/// Exposes `BITS`-wide packed fields inside an unsigned word cursor.
///
/// `BITS` must divide the word width, so fields never straddle a word
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitPackCursor<C, const BITS: usize> {
    words: C,
    per_word: usize,
    pos: isize,
}

impl<W: Word, C: Cursor<Item = W>, const BITS: usize> BitPackCursor<C, BITS> {
    #[inline]
    pub(crate) fn new(words: C) -> Self {
        assert!(
            BITS > 0 && BITS <= W::BITS && W::BITS % BITS == 0,
            "pack width must divide the word width"
        );
        Self {
            words,
            per_word: W::BITS / BITS,
            pos: 0,
        }
    }

    #[inline]
    fn field_mask() -> W {
        if BITS == W::BITS {
            W::max_value()
        } else {
            (W::one() << BITS) - W::one()
        }
    }
}

impl<W: Word, C: Cursor<Item = W>, const BITS: usize> Cursor for BitPackCursor<C, BITS> {
    type Item = W;

    #[inline]
    fn get(&self, offset: isize) -> W {
        let index = self.pos + offset;
        let per = self.per_word as isize;
        let word = self.words.get(index.div_euclid(per));
        let shift = index.rem_euclid(per) as usize * BITS;
        (word >> shift) & Self::field_mask()
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.pos += offset;
    }
}

impl<W: Word, C: CursorMut<Item = W>, const BITS: usize> CursorMut for BitPackCursor<C, BITS> {
    #[inline]
    fn set(&mut self, offset: isize, value: W) {
        let index = self.pos + offset;
        let per = self.per_word as isize;
        let word_index = index.div_euclid(per);
        let shift = index.rem_euclid(per) as usize * BITS;
        let mask = Self::field_mask() << shift;
        let word = self.words.get(word_index);
        let word = (word & !mask) | ((value << shift) & mask);
        self.words.set(word_index, word);
    }
}

// ---------------------------------------------------------------------------
// ByteGroupCursor
// ---------------------------------------------------------------------------

/// Groups `GROUP` consecutive bytes into big-endian values of type `U`.
///
/// Assembling from bytes keeps host endianness out of the result.
#[derive(Debug)]
pub struct ByteGroupCursor<C, U, const GROUP: usize> {
    bytes: C,
    _out: PhantomData<fn() -> U>,
}

impl<C: Cursor<Item = u8>, U: Word, const GROUP: usize> ByteGroupCursor<C, U, GROUP> {
    #[inline]
    pub(crate) fn new(bytes: C) -> Self {
        assert!(
            GROUP > 0 && GROUP * 8 <= U::BITS,
            "byte group must fit the target word"
        );
        Self {
            bytes,
            _out: PhantomData,
        }
    }
}

impl<C: Clone, U, const GROUP: usize> Clone for ByteGroupCursor<C, U, GROUP> {
    fn clone(&self) -> Self {
        Self {
            bytes: self.bytes.clone(),
            _out: PhantomData,
        }
    }
}

impl<C: Cursor<Item = u8>, U: Word, const GROUP: usize> Cursor for ByteGroupCursor<C, U, GROUP> {
    type Item = U;

    #[inline]
    fn get(&self, offset: isize) -> U {
        let base = offset * GROUP as isize;
        let mut value = U::zero();
        for j in 0..GROUP {
            value = (value << 8) | U::from_u8(self.bytes.get(base + j as isize));
        }
        value
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.bytes.advance(offset * GROUP as isize);
    }
}

// ---------------------------------------------------------------------------
// CachedCursor
// ---------------------------------------------------------------------------

/// Read-through cache over a cursor.
///
/// On first read of an offset the original element is computed, stored in
/// the cache cell and flagged; later reads return the cached value.
/// Writes store into the cache and set the flag without touching the
/// original. Concurrent first accesses to the same cell are undefined;
/// callers serialize.
#[derive(Debug)]
pub struct CachedCursor<'a, C, T> {
    orig: C,
    cache: *mut T,
    flags: *mut bool,
    _marker: PhantomData<(&'a mut [T], &'a mut [bool])>,
}

impl<'a, C, T> CachedCursor<'a, C, T> {
    #[inline]
    pub(crate) fn new(orig: C, cache: &'a mut [T], flags: &'a mut [bool]) -> Self {
        Self {
            orig,
            cache: cache.as_mut_ptr(),
            flags: flags.as_mut_ptr(),
            _marker: PhantomData,
        }
    }
}

impl<'a, C: Clone, T> Clone for CachedCursor<'a, C, T> {
    fn clone(&self) -> Self {
        Self {
            orig: self.orig.clone(),
            cache: self.cache,
            flags: self.flags,
            _marker: PhantomData,
        }
    }
}

impl<'a, C, T> Cursor for CachedCursor<'a, C, T>
where
    C: Cursor<Item = T>,
    T: Copy,
{
    type Item = T;

    #[inline]
    fn get(&self, offset: isize) -> T {
        unsafe {
            if *self.flags.offset(offset) {
                *self.cache.offset(offset)
            } else {
                let value = self.orig.get(offset);
                *self.cache.offset(offset) = value;
                *self.flags.offset(offset) = true;
                value
            }
        }
    }

    #[inline]
    fn advance(&mut self, offset: isize) {
        self.orig.advance(offset);
        self.cache = self.cache.wrapping_offset(offset);
        self.flags = self.flags.wrapping_offset(offset);
    }
}

impl<'a, C, T> CursorMut for CachedCursor<'a, C, T>
where
    C: Cursor<Item = T>,
    T: Copy,
{
    #[inline]
    fn set(&mut self, offset: isize, value: T) {
        unsafe {
            *self.cache.offset(offset) = value;
            *self.flags.offset(offset) = true;
        }
    }
}

// ---------------------------------------------------------------------------
// SlideCursor / PairwiseCursor / NeighboursCursor
// ---------------------------------------------------------------------------

/// `P`-ary sliding-window reduction along one axis.
///
/// `slide[k] == f([base[k], base[k + step], ..., base[k + (P-1)*step]])`.
#[derive(Debug)]
pub struct SlideCursor<C, F, O, const P: usize> {
    cursor: C,
    step: isize,
    f: F,
    _out: PhantomData<fn() -> O>,
}

impl<C, F, O, const P: usize> SlideCursor<C, F, O, P> {
    #[inline]
    pub(crate) fn new(cursor: C, step: isize, f: F) -> Self {
        Self {
            cursor,
            step,
            f,
            _out: PhantomData,
        }
    }
}

impl<C: Clone, F: Clone, O, const P: usize> Clone for SlideCursor<C, F, O, P> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
            step: self.step,
            f: self.f.clone(),
            _out: PhantomData,
        }
    }
}

impl<C, F, O, const P: usize> Cursor for SlideCursor<C, F, O, P>
where
    C: Cursor,
    F: Fn([C::Item; P]) -> O + Clone,
{
    type Item = O;

    #[inline]
    fn get(&self, offset: isize) -> O {
        (self.f)(core::array::from_fn(|i| {
            self.cursor.get(offset + i as isize * self.step)
        }))
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.cursor.advance(offset);
    }
}

/// Binary window at a fixed lag: `pairwise[k] == f(base[k], base[k + lag])`.
#[derive(Debug)]
pub struct PairwiseCursor<C, F, O> {
    cursor: C,
    lag: isize,
    f: F,
    _out: PhantomData<fn() -> O>,
}

impl<C, F, O> PairwiseCursor<C, F, O> {
    #[inline]
    pub(crate) fn new(cursor: C, lag: isize, f: F) -> Self {
        Self {
            cursor,
            lag,
            f,
            _out: PhantomData,
        }
    }
}

impl<C: Clone, F: Clone, O> Clone for PairwiseCursor<C, F, O> {
    fn clone(&self) -> Self {
        Self {
            cursor: self.cursor.clone(),
            lag: self.lag,
            f: self.f.clone(),
            _out: PhantomData,
        }
    }
}

impl<C, F, O> Cursor for PairwiseCursor<C, F, O>
where
    C: Cursor,
    F: Fn(C::Item, C::Item) -> O + Clone,
{
    type Item = O;

    #[inline]
    fn get(&self, offset: isize) -> O {
        (self.f)(self.cursor.get(offset), self.cursor.get(offset + self.lag))
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.cursor.advance(offset);
    }
}

/// Pairs each interior cell with the `f`-reduction of its `2N`
/// axis-adjacent neighbours.
#[derive(Debug, Clone)]
pub struct NeighboursCursor<C, F, const N: usize> {
    cursor: C,
    strides: [isize; N],
    f: F,
}

impl<C, F, const N: usize> NeighboursCursor<C, F, N> {
    #[inline]
    pub(crate) fn new(cursor: C, strides: [isize; N], f: F) -> Self {
        Self { cursor, strides, f }
    }
}

impl<C, F, const N: usize> Cursor for NeighboursCursor<C, F, N>
where
    C: Cursor,
    F: Fn(C::Item, C::Item) -> C::Item + Clone,
{
    type Item = (C::Item, C::Item);

    fn get(&self, offset: isize) -> Self::Item {
        let center = self.cursor.get(offset);
        let axis = |d: usize| {
            (self.f)(
                self.cursor.get(offset - self.strides[d]),
                self.cursor.get(offset + self.strides[d]),
            )
        };
        let mut acc = axis(0);
        for d in 1..N {
            acc = (self.f)(acc, axis(d));
        }
        (center, acc)
    }

    #[inline(always)]
    fn advance(&mut self, offset: isize) {
        self.cursor.advance(offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ptr_cursor_walks_and_measures() {
        let data = [10i64, 20, 30, 40];
        let mut c = PtrCursor::new(&data);
        assert_eq!(c.get(0), 10);
        assert_eq!(c.get(3), 40);
        c.advance(2);
        assert_eq!(c.get(0), 30);
        assert_eq!(c.get(-1), 20);
        let origin = PtrCursor::new(&data);
        assert_eq!(c.distance(&origin), 2);
    }

    #[test]
    fn ptr_cursor_mut_writes() {
        let mut data = [0u32; 4];
        let mut c = PtrCursorMut::new(&mut data);
        c.set(1, 7);
        c.advance(2);
        c.set(1, 9);
        assert_eq!(data, [0, 7, 0, 9]);
    }

    #[test]
    fn strided_and_retro_compose() {
        let data = [0i32, 1, 2, 3, 4, 5, 6, 7];
        let strided = StridedCursor::new(PtrCursor::new(&data), 2);
        assert_eq!(strided.get(0), 0);
        assert_eq!(strided.get(3), 6);

        let mut last = PtrCursor::new(&data);
        last.advance(7);
        let retro = RetroCursor::new(last);
        assert_eq!(retro.get(0), 7);
        assert_eq!(retro.get(5), 2);
    }

    #[test]
    fn double_retro_is_identity() {
        let data = [1u8, 2, 3];
        let c = PtrCursor::new(&data);
        let twice = RetroCursor::new(RetroCursor::new(c));
        assert_eq!(twice.get(0), 1);
        assert_eq!(twice.get(2), 3);
    }

    #[test]
    fn zip2_reads_in_lockstep() {
        let a = [1i32, 2, 3];
        let b = [10i32, 20, 30];
        let mut z = ZipCursor2::new(PtrCursor::new(&a), PtrCursor::new(&b));
        assert_eq!(z.get(1), (2, 20));
        z.advance(2);
        assert_eq!(z.get(0), (3, 30));
    }

    #[test]
    fn flattened_resolves_strided_offsets() {
        // 2x3 row-major data viewed transposed (3x2, strides [1, 3]).
        let data = [0i32, 1, 2, 3, 4, 5];
        let c = FlattenedCursor::new(PtrCursor::new(&data), [3, 2], [1, 3]);
        let flat: Vec<i32> = (0..6).map(|i| c.get(i)).collect();
        assert_eq!(flat, vec![0, 3, 1, 4, 2, 5]);
    }

    #[test]
    fn bit_cursor_reads_and_writes() {
        let mut words = [0b1010u8, 0xFF];
        {
            let c = BitCursor::new(PtrCursor::new(&words));
            assert!(!c.get(0));
            assert!(c.get(1));
            assert!(c.get(3));
            assert!(c.get(8));
        }
        let mut c = BitCursor::new(PtrCursorMut::new(&mut words));
        c.set(0, true);
        c.set(9, false);
        assert_eq!(words, [0b1011, 0b1111_1101]);
    }

    #[test]
    fn bitpack_extracts_fields() {
        let words = [0xABCD_u16];
        let c: BitPackCursor<_, 4> = BitPackCursor::new(PtrCursor::new(&words));
        assert_eq!(c.get(0), 0xD);
        assert_eq!(c.get(1), 0xC);
        assert_eq!(c.get(2), 0xB);
        assert_eq!(c.get(3), 0xA);
    }

    #[test]
    fn bytegroup_assembles_big_endian() {
        let bytes = [0x12u8, 0x34, 0x56, 0x78];
        let c: ByteGroupCursor<_, u16, 2> = ByteGroupCursor::new(PtrCursor::new(&bytes));
        assert_eq!(c.get(0), 0x1234);
        assert_eq!(c.get(1), 0x5678);
    }

    #[test]
    fn cached_computes_once() {
        use core::cell::Cell;

        let hits = Cell::new(0usize);
        let src = [5i32, 6, 7];
        let base = MapCursor::new(PtrCursor::new(&src), |x| {
            hits.set(hits.get() + 1);
            x * 2
        });
        let mut cache = [0i32; 3];
        let mut flags = [false; 3];
        let c = CachedCursor::new(base, &mut cache, &mut flags);
        assert_eq!(c.get(1), 12);
        assert_eq!(c.get(1), 12);
        assert_eq!(hits.get(), 1);
        assert_eq!(c.get(0), 10);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn slide_and_pairwise_windows() {
        let data = [1i32, 4, 9, 16, 25];
        let slide: SlideCursor<_, _, i32, 3> =
            SlideCursor::new(PtrCursor::new(&data), 1, |w: [i32; 3]| w.iter().sum());
        assert_eq!(slide.get(0), 14);
        assert_eq!(slide.get(2), 50);

        let diff = PairwiseCursor::new(PtrCursor::new(&data), 1, |a, b| b - a);
        assert_eq!(diff.get(0), 3);
        assert_eq!(diff.get(3), 9);
    }

    #[test]
    fn chop_produces_subslices() {
        let data = [1i32, 2, 3, 4, 5, 6];
        let bounds = [0usize, 2, 3, 6];
        let c = ChopCursor::new(PtrCursor::new(&data), &bounds);
        assert_eq!(c.get(0).to_vec(), vec![1, 2]);
        assert_eq!(c.get(1).to_vec(), vec![3]);
        assert_eq!(c.get(2).to_vec(), vec![4, 5, 6]);
    }
}
