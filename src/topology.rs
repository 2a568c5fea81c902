//! Pure view-producing operations.
//!
//! Every operation here rearranges shape metadata and wraps or advances
//! the cursor; none of them touch elements or allocate. Invalid
//! permutations, rank splits and tiling factors are programmer errors
//! and assert; shape mismatches that depend on runtime data (reshape)
//! report through [`ReshapeError`].

use core::array::from_fn;

use crate::cursor::{Cursor, FlattenedCursor, RetroCursor, SliceCursor, StridedCursor};
use crate::kind::{Canonical, Contiguous, Kind, Universal};
use crate::slice::Slice;
use crate::ReshapeError;

// ---------------------------------------------------------------------------
// Kind-generic operations
// ---------------------------------------------------------------------------

impl<C: Cursor, const N: usize, K: Kind> Slice<C, N, K> {
    /// Reorder dimensions by a permutation of dimension indices.
    pub fn transposed(self, perm: [usize; N]) -> Slice<C, N, Universal> {
        let mut seen = [false; N];
        for &p in &perm {
            assert!(p < N, "permutation entry {p} out of range for rank {N}");
            assert!(!seen[p], "duplicate dimension {p} in permutation");
            seen[p] = true;
        }
        let old_lengths = *self.lengths();
        let old_strides = self.stride_array();
        let lengths = from_fn(|d| old_lengths[perm[d]]);
        let strides = from_fn(|d| old_strides[perm[d]]);
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts(lengths, strides, cursor)
    }

    /// Reverse iteration order along every dimension.
    ///
    /// The cursor is advanced to the last element and wrapped in a
    /// reversing cursor; lengths, strides and kind are untouched, so a
    /// double retro restores the original element order.
    pub fn retro(self) -> Slice<RetroCursor<C>, N, K> {
        let last = self.last_offset();
        let (lengths, strides, mut cursor) = self.into_parts();
        cursor.advance(last);
        Slice::from_parts(lengths, strides, RetroCursor::new(cursor))
    }

    /// Slice-of-slices: the first `M` dimensions stay outer, the last
    /// `P` become the shape of the synthesized inner slices.
    ///
    /// `M + P` must equal the rank. The inner slices keep this slice's
    /// kind; the outer view is Universal with the original strides.
    pub fn pack<const M: usize, const P: usize>(self) -> Slice<SliceCursor<C, P, K>, M, Universal> {
        assert_eq!(M + P, N, "pack rank split {M}+{P} must cover rank {N}");
        let old_lengths = *self.lengths();
        let old_strides = self.stride_array();
        let outer_lengths = from_fn(|d| old_lengths[d]);
        let outer_strides = from_fn(|d| old_strides[d]);
        let inner_lengths = from_fn(|d| old_lengths[M + d]);
        let inner_strides: K::Strides<P> = {
            let raw = self.raw_strides();
            let lengths = self.lengths();
            K::strides_from_fn(|d| K::stride(raw, lengths, M + d))
        };
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts(
            outer_lengths,
            outer_strides,
            SliceCursor::new(cursor, inner_lengths, inner_strides),
        )
    }

    /// [`pack`](Slice::pack) counted from the front: the first `M`
    /// dimensions are fixed as outer.
    pub fn ipack<const M: usize, const P: usize>(
        self,
    ) -> Slice<SliceCursor<C, P, K>, M, Universal> {
        self.pack::<M, P>()
    }

    /// Rank-1 view of the main diagonal: length `min(lengths)`, stride
    /// the sum of all strides.
    pub fn diagonal(self) -> Slice<C, 1, Universal> {
        let len = self.lengths().iter().copied().min().unwrap_or(0);
        let stride = self.stride_array().iter().sum();
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts([len], [stride], cursor)
    }

    /// Non-overlapping tiling. Each `rl[d]` must be a positive divisor
    /// of `lengths[d]`; the outer view indexes tiles, the inner slices
    /// are the tiles themselves.
    pub fn blocks(self, rl: [usize; N]) -> Slice<SliceCursor<C, N, Universal>, N, Universal> {
        let old_lengths = *self.lengths();
        for d in 0..N {
            assert!(
                rl[d] > 0 && old_lengths[d] % rl[d] == 0,
                "block length {} does not tile dimension {d} of length {}",
                rl[d],
                old_lengths[d]
            );
        }
        let strides = self.stride_array();
        let outer_lengths = from_fn(|d| old_lengths[d] / rl[d]);
        let outer_strides = from_fn(|d| strides[d] * rl[d] as isize);
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts(
            outer_lengths,
            outer_strides,
            SliceCursor::new(cursor, rl, strides),
        )
    }

    /// Sliding overlapping windows: outer lengths are
    /// `max(lengths - rl + 1, 0)` with unchanged strides, inner slices
    /// have shape `rl`.
    pub fn windows(self, rl: [usize; N]) -> Slice<SliceCursor<C, N, Universal>, N, Universal> {
        for d in 0..N {
            assert!(rl[d] > 0, "window length along dimension {d} must be positive");
        }
        let old_lengths = *self.lengths();
        let strides = self.stride_array();
        let outer_lengths = from_fn(|d| (old_lengths[d] + 1).saturating_sub(rl[d]));
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts(
            outer_lengths,
            strides,
            SliceCursor::new(cursor, rl, strides),
        )
    }

    /// Rank-1 view over all elements in row-major order, carried by a
    /// position-vector cursor. Meaningful for non-contiguous slices;
    /// a contiguous slice can reshape instead.
    pub fn flattened(self) -> Slice<FlattenedCursor<C, N>, 1, Contiguous> {
        let count = self.elem_count();
        let lengths = *self.lengths();
        let strides = self.stride_array();
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts([count], [], FlattenedCursor::new(cursor, lengths, strides))
    }

    /// Keep every `factor`-th element along every dimension.
    pub fn strided_by(self, factor: isize) -> Slice<C, N, Universal> {
        assert!(factor > 0, "stride factor must be positive");
        let old_lengths = *self.lengths();
        let old_strides = self.stride_array();
        let lengths = from_fn(|d| (old_lengths[d] + factor as usize - 1) / factor as usize);
        let strides = from_fn(|d| old_strides[d] * factor);
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts(lengths, strides, cursor)
    }

    /// Remove one element from both ends of every dimension.
    pub fn drop_borders(self) -> Slice<C, N, Universal> {
        let old_lengths = *self.lengths();
        let strides = self.stride_array();
        let lengths: [usize; N] = from_fn(|d| old_lengths[d].saturating_sub(2));
        let (_, _, mut cursor) = self.into_parts();
        if !lengths.iter().any(|&l| l == 0) {
            cursor.advance(strides.iter().sum());
        }
        Slice::from_parts(lengths, strides, cursor)
    }

    /// Subspace iteration: the given dimensions (in order) become the
    /// outer axes, the remaining `R` axes form the element slices.
    pub fn by_dim<const M: usize, const R: usize>(
        self,
        dims: [usize; M],
    ) -> Slice<SliceCursor<C, R, Universal>, M, Universal> {
        assert_eq!(M + R, N, "by_dim split {M}+{R} must cover rank {N}");
        let mut used = [false; N];
        for &d in &dims {
            assert!(d < N, "dimension {d} out of range for rank {N}");
            assert!(!used[d], "duplicate dimension {d} in by_dim");
            used[d] = true;
        }
        let mut perm = [0usize; N];
        let mut at = 0;
        for &d in &dims {
            perm[at] = d;
            at += 1;
        }
        for (d, &taken) in used.iter().enumerate() {
            if !taken {
                perm[at] = d;
                at += 1;
            }
        }
        self.transposed(perm).pack::<M, R>()
    }

    /// Dual of [`by_dim`](Slice::by_dim): the element slices span the
    /// given dimensions, the remaining axes stay outer.
    pub fn along_dim<const M: usize, const R: usize>(
        self,
        dims: [usize; M],
    ) -> Slice<SliceCursor<C, M, Universal>, R, Universal> {
        self.by_dim::<M, R>(dims).evert_pack()
    }
}

// ---------------------------------------------------------------------------
// Rank-specific operations
// ---------------------------------------------------------------------------

impl<C: Cursor, K: Kind> Slice<C, 2, K> {
    /// Rank-1 view of the antidiagonal of the inscribed square: the
    /// second axis is walked backwards from column `min(lengths) - 1`.
    pub fn antidiagonal(self) -> Slice<C, 1, Universal> {
        let [l0, l1] = *self.lengths();
        let len = l0.min(l1);
        let s0 = self.stride(0);
        let s1 = self.stride(1);
        let (_, _, mut cursor) = self.into_parts();
        if len > 0 {
            cursor.advance((len as isize - 1) * s1);
        }
        Slice::from_parts([len], [s0 - s1], cursor)
    }
}

impl<C: Cursor> Slice<C, 1, Contiguous> {
    /// Compose a stride multiplier into the cursor, keeping the view
    /// contiguous.
    pub fn strided(self, factor: isize) -> Slice<StridedCursor<C>, 1, Contiguous> {
        assert!(factor > 0, "stride factor must be positive");
        let len = (self.lengths()[0] + factor as usize - 1) / factor as usize;
        let (_, _, cursor) = self.into_parts();
        Slice::from_parts([len], [], StridedCursor::new(cursor, factor))
    }
}

// ---------------------------------------------------------------------------
// Reshape
// ---------------------------------------------------------------------------

/// Resolve requested lengths against the element count, inferring at
/// most one `-1` entry.
fn solve_lengths<const M: usize>(
    count: usize,
    requested: [isize; M],
    input_empty: bool,
) -> Result<[usize; M], ReshapeError> {
    if input_empty {
        return Err(ReshapeError::Empty);
    }
    let mut infer = None;
    let mut known = 1usize;
    for (d, &len) in requested.iter().enumerate() {
        if len == -1 {
            assert!(infer.is_none(), "at most one reshape length may be -1");
            infer = Some(d);
        } else {
            assert!(len >= 0, "reshape length {len} is invalid");
            known = known.saturating_mul(len as usize);
        }
    }
    let mut lengths: [usize; M] = from_fn(|d| requested[d].max(0) as usize);
    if let Some(d) = infer {
        if known == 0 || count % known != 0 {
            return Err(ReshapeError::Total);
        }
        lengths[d] = count / known;
    } else if known != count {
        return Err(ReshapeError::Total);
    }
    Ok(lengths)
}

/// Strides for a no-copy reshape of a strided layout, if the stride
/// pattern can be satisfied by contiguous runs.
fn reshape_strided<const N: usize, const M: usize>(
    old_lengths: &[usize; N],
    old_strides: &[isize; N],
    new_lengths: &[usize; M],
) -> Option<[isize; M]> {
    // Length-1 axes constrain nothing; drop them first.
    let mut dims = [0usize; N];
    let mut strides = [0isize; N];
    let mut nd = 0;
    for d in 0..N {
        if old_lengths[d] != 1 {
            dims[nd] = old_lengths[d];
            strides[nd] = old_strides[d];
            nd += 1;
        }
    }

    let mut new_strides = [0isize; M];
    let (mut oi, mut ni) = (0usize, 0usize);
    while oi < nd && ni < M {
        // Skip length-1 output axes inside a group boundary.
        if new_lengths[ni] == 1 {
            new_strides[ni] = 1;
            ni += 1;
            continue;
        }
        let (mut oj, mut nj) = (oi + 1, ni + 1);
        let mut op = dims[oi];
        let mut np = new_lengths[ni];
        while op != np {
            if np < op {
                np *= new_lengths[nj];
                nj += 1;
            } else {
                op *= dims[oj];
                oj += 1;
            }
        }
        // The matched group must be a single contiguous run.
        for k in oi..oj - 1 {
            if strides[k] != strides[k + 1] * dims[k + 1] as isize {
                return None;
            }
        }
        new_strides[nj - 1] = strides[oj - 1];
        for k in (ni..nj - 1).rev() {
            new_strides[k] = new_strides[k + 1] * new_lengths[k + 1] as isize;
        }
        oi = oj;
        ni = nj;
    }
    // Any output axes left are length 1.
    for k in ni..M {
        new_strides[k] = 1;
    }
    Some(new_strides)
}

impl<C: Cursor, const N: usize> Slice<C, N, Contiguous> {
    /// Change the shape, keeping row-major element order. At most one
    /// length may be `-1` and is inferred; the element count must match.
    pub fn reshape<const M: usize>(
        self,
        lengths: [isize; M],
    ) -> Result<Slice<C, M, Contiguous>, ReshapeError> {
        let lengths = solve_lengths(self.elem_count(), lengths, self.is_empty())?;
        let (_, _, cursor) = self.into_parts();
        Ok(Slice::from_parts(lengths, [], cursor))
    }
}

impl<C: Cursor, const N: usize> Slice<C, N, Canonical> {
    /// Reshape through the contiguous-run compatibility check; the
    /// result carries explicit strides.
    pub fn reshape<const M: usize>(
        self,
        lengths: [isize; M],
    ) -> Result<Slice<C, M, Universal>, ReshapeError> {
        self.universal().reshape(lengths)
    }
}

impl<C: Cursor, const N: usize> Slice<C, N, Universal> {
    /// Reshape, succeeding iff the stride pattern can be regrouped into
    /// the requested lengths without copying.
    pub fn reshape<const M: usize>(
        self,
        lengths: [isize; M],
    ) -> Result<Slice<C, M, Universal>, ReshapeError> {
        let new_lengths = solve_lengths(self.elem_count(), lengths, self.is_empty())?;
        let old_lengths = *self.lengths();
        let old_strides = self.stride_array();
        let new_strides = reshape_strided(&old_lengths, &old_strides, &new_lengths)
            .ok_or(ReshapeError::Incompatible)?;
        let (_, _, cursor) = self.into_parts();
        Ok(Slice::from_parts(new_lengths, new_strides, cursor))
    }
}

// ---------------------------------------------------------------------------
// Unpack / evert
// ---------------------------------------------------------------------------

impl<C: Cursor, const M: usize, const P: usize, KO: Kind>
    Slice<SliceCursor<C, P, Contiguous>, M, KO>
{
    /// Merge the stride layers of a packed slice back into one view.
    ///
    /// Contiguous inner slices still guarantee a unit innermost stride,
    /// so the merged view is Canonical.
    pub fn unpack<const Q: usize>(self) -> Slice<C, Q, Canonical> {
        assert_eq!(M + P, Q, "unpack rank {Q} must equal {M}+{P}");
        let outer_lengths = *self.lengths();
        let outer_strides = self.stride_array();
        let (_, _, cursor) = self.into_parts();
        let inner_lengths = *cursor.inner_lengths();
        let inner_strides = Contiguous::materialize(cursor.inner_strides(), &inner_lengths);
        let lengths = from_fn(|d| {
            if d < M {
                outer_lengths[d]
            } else {
                inner_lengths[d - M]
            }
        });
        let strides = from_fn(|d| {
            if d < M {
                outer_strides[d]
            } else {
                inner_strides[d - M]
            }
        });
        Slice::from_parts(lengths, strides, cursor.into_base())
    }
}

impl<C: Cursor, const M: usize, const P: usize, KO: Kind>
    Slice<SliceCursor<C, P, Canonical>, M, KO>
{
    /// Merge the stride layers; Canonical inner slices keep the unit
    /// innermost stride, so the result is Canonical.
    pub fn unpack<const Q: usize>(self) -> Slice<C, Q, Canonical> {
        assert_eq!(M + P, Q, "unpack rank {Q} must equal {M}+{P}");
        let outer_lengths = *self.lengths();
        let outer_strides = self.stride_array();
        let (_, _, cursor) = self.into_parts();
        let inner_lengths = *cursor.inner_lengths();
        let inner_strides = Canonical::materialize(cursor.inner_strides(), &inner_lengths);
        let lengths = from_fn(|d| {
            if d < M {
                outer_lengths[d]
            } else {
                inner_lengths[d - M]
            }
        });
        let strides = from_fn(|d| {
            if d < M {
                outer_strides[d]
            } else {
                inner_strides[d - M]
            }
        });
        Slice::from_parts(lengths, strides, cursor.into_base())
    }
}

impl<C: Cursor, const M: usize, const P: usize, KO: Kind>
    Slice<SliceCursor<C, P, Universal>, M, KO>
{
    /// Merge the stride layers; nothing is known about the inner
    /// strides, so the result is Universal.
    pub fn unpack<const Q: usize>(self) -> Slice<C, Q, Universal> {
        assert_eq!(M + P, Q, "unpack rank {Q} must equal {M}+{P}");
        let outer_lengths = *self.lengths();
        let outer_strides = self.stride_array();
        let (_, _, cursor) = self.into_parts();
        let inner_lengths = *cursor.inner_lengths();
        let inner_strides = Universal::materialize(cursor.inner_strides(), &inner_lengths);
        let lengths = from_fn(|d| {
            if d < M {
                outer_lengths[d]
            } else {
                inner_lengths[d - M]
            }
        });
        let strides = from_fn(|d| {
            if d < M {
                outer_strides[d]
            } else {
                inner_strides[d - M]
            }
        });
        Slice::from_parts(lengths, strides, cursor.into_base())
    }
}

impl<C: Cursor, const M: usize, const P: usize, KI: Kind, KO: Kind>
    Slice<SliceCursor<C, P, KI>, M, KO>
{
    /// Swap the outer and inner packs: iterate what used to be the
    /// element axes, with the former outer axes as elements.
    pub fn evert_pack(self) -> Slice<SliceCursor<C, M, Universal>, P, Universal> {
        let outer_lengths = *self.lengths();
        let outer_strides = self.stride_array();
        let (_, _, cursor) = self.into_parts();
        let inner_lengths = *cursor.inner_lengths();
        let inner_strides = KI::materialize(cursor.inner_strides(), &inner_lengths);
        Slice::from_parts(
            inner_lengths,
            inner_strides,
            SliceCursor::new(cursor.into_base(), outer_lengths, outer_strides),
        )
    }
}
