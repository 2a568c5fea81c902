//! Fixed-capacity stack-allocated signed big integer.
//!
//! [`BigInt<K>`] holds up to `K` 64-bit coefficient words inline, least
//! significant first, with a separate sign. All arithmetic is in place;
//! capacity overflow is a reportable condition (a residual word, a
//! residual word array, or a boolean), never a silent wrap.
//!
//! Two invariants hold after every public operation:
//!
//! - **Normalized**: if `length > 0` the most significant stored word is
//!   non-zero.
//! - **Zero**: `length == 0` means the value is zero and the sign is
//!   positive.
//!
//! [`BigIntView`] borrows a coefficient slice plus sign for computation
//! on external storage.

use core::cmp::Ordering;
use core::ops::{Neg, ShlAssign, ShrAssign};

mod radix;
mod view;

pub use view::BigIntView;

/// Errors reported by construction and parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BigIntError {
    /// The input contained no digits.
    #[error("no digits in input")]
    Empty,

    /// A character outside the accepted alphabet, at the given byte
    /// position.
    #[error("invalid digit at byte {0}")]
    InvalidDigit(usize),

    /// The value does not fit the capacity.
    #[error("value exceeds the capacity of {0} words")]
    Capacity(usize),
}

/// Result type for fallible `BigInt` construction.
pub type Result<T> = core::result::Result<T, BigIntError>;

/// Largest power of ten in a 64-bit word, used by the decimal
/// parser/formatter chunking.
pub(crate) const POW10_PER_WORD: u32 = 19;
pub(crate) const POW10_CHUNK: u64 = 10_000_000_000_000_000_000;

/// Largest power of five in a 64-bit word; `mul_pow5` works in chunks
/// of this size.
const POW5_PER_WORD: u32 = 27;
const POW5_CHUNK: u64 = 7_450_580_596_923_828_125;

/// A signed integer with fixed inline capacity for `K` 64-bit words.
#[derive(Clone, Copy)]
pub struct BigInt<const K: usize> {
    sign: bool,
    length: usize,
    data: [u64; K],
}

impl<const K: usize> Default for BigInt<K> {
    fn default() -> Self {
        Self::zero()
    }
}

impl<const K: usize> core::fmt::Debug for BigInt<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BigInt")
            .field("sign", &self.sign)
            .field("words", &&self.data[..self.length])
            .finish()
    }
}

impl<const K: usize> BigInt<K> {
    /// The zero value.
    pub const fn zero() -> Self {
        Self {
            sign: false,
            length: 0,
            data: [0; K],
        }
    }

    /// Capacity in 64-bit words.
    pub const fn capacity(&self) -> usize {
        K
    }

    /// Active coefficient words, least significant first.
    #[inline]
    pub fn words(&self) -> &[u64] {
        &self.data[..self.length]
    }

    /// Number of active words.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.length == 0
    }

    /// `true` for negative values; zero is never negative.
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.sign
    }

    /// Borrow as a sign + coefficient view.
    #[inline]
    pub fn view(&self) -> BigIntView<'_> {
        BigIntView::new(self.sign, &self.data[..self.length])
    }

    /// Trim high zero words and fix the sign of zero.
    fn normalize(&mut self) {
        while self.length > 0 && self.data[self.length - 1] == 0 {
            self.length -= 1;
        }
        if self.length == 0 {
            self.sign = false;
        }
    }

    /// Store a scalar magnitude, clearing the sign.
    pub fn assign_scalar(&mut self, value: u64) {
        assert!(K > 0 || value == 0, "capacity 0 cannot hold a non-zero value");
        self.sign = false;
        if value == 0 {
            self.length = 0;
        } else {
            self.data[0] = value;
            self.length = 1;
        }
    }

    /// Build from sign and coefficient words, least significant first.
    ///
    /// High zero words are trimmed; a magnitude wider than the capacity
    /// is a [`BigIntError::Capacity`].
    pub fn from_words(sign: bool, words: &[u64]) -> Result<Self> {
        let mut len = words.len();
        while len > 0 && words[len - 1] == 0 {
            len -= 1;
        }
        if len > K {
            return Err(BigIntError::Capacity(K));
        }
        let mut value = Self::zero();
        value.data[..len].copy_from_slice(&words[..len]);
        value.length = len;
        value.sign = sign && len > 0;
        Ok(value)
    }

    // -----------------------------------------------------------------
    // Scalar arithmetic
    // -----------------------------------------------------------------

    /// In-place multiply by a scalar with a carry seed:
    /// `self = self * rhs + carry`.
    ///
    /// Returns the residual overflow word; zero when everything fit
    /// (a spilling word is appended while capacity allows).
    pub fn mul_add_scalar(&mut self, rhs: u64, carry: u64) -> u64 {
        let mut acc = carry as u128;
        for i in 0..self.length {
            let t = self.data[i] as u128 * rhs as u128 + acc;
            self.data[i] = t as u64;
            acc = t >> 64;
        }
        let mut acc = acc as u64;
        if acc != 0 && self.length < K {
            self.data[self.length] = acc;
            self.length += 1;
            acc = 0;
        }
        self.normalize();
        acc
    }

    /// In-place multiply by a fixed-width unsigned operand (words least
    /// significant first) with a carry seed of the same width.
    ///
    /// Carry words are appended one at a time while capacity allows;
    /// the remainder is returned, least significant first.
    pub fn mul_add_words<const S: usize>(&mut self, rhs: [u64; S], carry: [u64; S]) -> [u64; S] {
        assert!(S > 0, "operand width must be at least one word");
        let mut carry = carry;
        for i in 0..self.length {
            let a = self.data[i] as u128;
            let mut low = 0u64;
            let mut spill = 0u64;
            for j in 0..S {
                let t = a * rhs[j] as u128 + spill as u128 + carry[j] as u128;
                if j == 0 {
                    low = t as u64;
                } else {
                    carry[j - 1] = t as u64;
                }
                spill = (t >> 64) as u64;
            }
            carry[S - 1] = spill;
            self.data[i] = low;
        }
        while self.length < K && carry.iter().any(|&w| w != 0) {
            self.data[self.length] = carry[0];
            self.length += 1;
            for j in 0..S - 1 {
                carry[j] = carry[j + 1];
            }
            carry[S - 1] = 0;
        }
        self.normalize();
        carry
    }

    /// In-place schoolbook division by a scalar, from the most
    /// significant word down, with an upper overflow seed.
    ///
    /// Preconditions: `rhs != 0` and `overflow < rhs`. Returns the
    /// remainder.
    pub fn div_assign_scalar(&mut self, rhs: u64, overflow: u64) -> u64 {
        assert!(rhs != 0, "division by zero");
        assert!(overflow < rhs, "division seed must be smaller than the divisor");
        let mut rem = overflow as u128;
        for i in (0..self.length).rev() {
            let cur = (rem << 64) | self.data[i] as u128;
            self.data[i] = (cur / rhs as u128) as u64;
            rem = cur % rhs as u128;
        }
        self.normalize();
        rem as u64
    }

    /// In-place multiply by `5^k`, processed in word-sized chunks.
    ///
    /// Returns `true` iff a carry was produced that did not fit the
    /// capacity.
    pub fn mul_pow5(&mut self, mut k: u32) -> bool {
        let mut lost = false;
        while k >= POW5_PER_WORD {
            lost |= self.mul_add_scalar(POW5_CHUNK, 0) != 0;
            k -= POW5_PER_WORD;
        }
        if k > 0 {
            let pow = (0..k).fold(1u64, |acc, _| acc * 5);
            lost |= self.mul_add_scalar(pow, 0) != 0;
        }
        lost
    }

    // -----------------------------------------------------------------
    // Signed add / subtract against a view
    // -----------------------------------------------------------------

    /// `self += rhs`. Returns `true` when a carry-out could not be
    /// stored in the capacity.
    pub fn add_assign_big(&mut self, rhs: BigIntView<'_>) -> bool {
        if rhs.is_zero() {
            return false;
        }
        if self.sign == rhs.sign() {
            return self.uadd(rhs.coefficients());
        }
        match view::cmp_words(self.words(), rhs.coefficients()) {
            Ordering::Greater | Ordering::Equal => {
                self.usub_smaller(rhs.coefficients());
                false
            }
            Ordering::Less => {
                let sign = rhs.sign();
                let overflow = self.usub_larger(rhs.coefficients());
                self.sign = sign && !self.is_zero();
                overflow
            }
        }
    }

    /// `self -= rhs`. Returns `true` when a carry-out could not be
    /// stored in the capacity.
    pub fn sub_assign_big(&mut self, rhs: BigIntView<'_>) -> bool {
        self.add_assign_big(rhs.negated())
    }

    /// Unsigned `self += rhs`, aligning lengths.
    fn uadd(&mut self, rhs: &[u64]) -> bool {
        let n = self.length.max(rhs.len());
        let mut carry = false;
        for i in 0..n {
            let b = if i < rhs.len() { rhs[i] } else { 0 };
            if i >= K {
                // Remaining value cannot be stored.
                let rest_nonzero = rhs[i..].iter().any(|&w| w != 0);
                self.length = K;
                self.normalize();
                return rest_nonzero || carry;
            }
            let a = if i < self.length { self.data[i] } else { 0 };
            let (sum, c1) = a.overflowing_add(b);
            let (sum, c2) = sum.overflowing_add(carry as u64);
            self.data[i] = sum;
            carry = c1 || c2;
        }
        self.length = n;
        if carry {
            if self.length < K {
                self.data[self.length] = 1;
                self.length += 1;
                carry = false;
            }
        }
        self.normalize();
        carry
    }

    /// Unsigned `self -= rhs` with `self >= rhs`.
    fn usub_smaller(&mut self, rhs: &[u64]) {
        let mut borrow = false;
        for i in 0..self.length {
            let b = if i < rhs.len() { rhs[i] } else { 0 };
            let (diff, b1) = self.data[i].overflowing_sub(b);
            let (diff, b2) = diff.overflowing_sub(borrow as u64);
            self.data[i] = diff;
            borrow = b1 || b2;
        }
        debug_assert!(!borrow, "usub_smaller called with a larger subtrahend");
        self.normalize();
    }

    /// Unsigned `self = rhs - self` with `rhs > self`. Returns `true`
    /// when the result does not fit the capacity.
    fn usub_larger(&mut self, rhs: &[u64]) -> bool {
        let mut borrow = false;
        let mut overflow = false;
        for i in 0..rhs.len() {
            let a = if i < self.length { self.data[i] } else { 0 };
            let (diff, b1) = rhs[i].overflowing_sub(a);
            let (diff, b2) = diff.overflowing_sub(borrow as u64);
            borrow = b1 || b2;
            if i < K {
                self.data[i] = diff;
            } else if diff != 0 {
                overflow = true;
            }
        }
        debug_assert!(!borrow, "usub_larger called with a smaller minuend");
        self.length = rhs.len().min(K);
        self.normalize();
        overflow
    }

    // -----------------------------------------------------------------
    // Shifts
    // -----------------------------------------------------------------

    /// Left shift reporting whether high bits were dropped past the
    /// capacity; `<<=` is the historical silently dropping variant.
    pub fn shift_left_checked(&mut self, n: usize) -> bool {
        if n == 0 || self.length == 0 {
            return false;
        }
        let word_shift = n / 64;
        let bit_shift = (n % 64) as u32;
        let spill = bit_shift > 0 && self.data[self.length - 1] >> (64 - bit_shift) != 0;
        let wide_len = self.length + word_shift + usize::from(spill);
        let lost = wide_len > K;
        let new_len = wide_len.min(K);

        let mut d = new_len;
        while d > word_shift {
            d -= 1;
            let i = d - word_shift;
            let mut word = if i < self.length {
                self.data[i] << bit_shift
            } else {
                0
            };
            if bit_shift > 0 && i >= 1 && i - 1 < self.length {
                word |= self.data[i - 1] >> (64 - bit_shift);
            }
            self.data[d] = word;
        }
        for w in &mut self.data[..word_shift.min(K)] {
            *w = 0;
        }
        self.length = new_len;
        self.normalize();
        lost
    }

    fn shift_right(&mut self, n: usize) {
        let word_shift = n / 64;
        let bit_shift = (n % 64) as u32;
        if word_shift >= self.length {
            self.length = 0;
            self.normalize();
            return;
        }
        let new_len = self.length - word_shift;
        for i in 0..new_len {
            let mut word = self.data[i + word_shift] >> bit_shift;
            if bit_shift > 0 && i + word_shift + 1 < self.length {
                word |= self.data[i + word_shift + 1] << (64 - bit_shift);
            }
            self.data[i] = word;
        }
        self.length = new_len;
        self.normalize();
    }

    // -----------------------------------------------------------------
    // Conversions out
    // -----------------------------------------------------------------

    /// Approximate as a double, scanning the two most significant
    /// words. Values past the double range become infinite.
    pub fn as_f64(&self) -> f64 {
        if self.length == 0 {
            return 0.0;
        }
        let hi = self.data[self.length - 1] as f64;
        let magnitude = if self.length >= 2 {
            let lo = self.data[self.length - 2] as f64;
            (hi * 2f64.powi(64) + lo) * 2f64.powi(64 * (self.length as i32 - 2))
        } else {
            hi
        };
        if self.sign {
            -magnitude
        } else {
            magnitude
        }
    }

    /// The value as `u64` when non-negative and single-word.
    pub fn try_to_u64(&self) -> Option<u64> {
        if self.sign || self.length > 1 {
            return None;
        }
        Some(if self.length == 0 { 0 } else { self.data[0] })
    }

    /// The value as `i64` when it fits.
    pub fn try_to_i64(&self) -> Option<i64> {
        if self.length > 1 {
            return None;
        }
        let magnitude = if self.length == 0 { 0 } else { self.data[0] };
        if self.sign {
            if magnitude > i64::MIN.unsigned_abs() {
                return None;
            }
            Some((magnitude as i64).wrapping_neg())
        } else {
            if magnitude > i64::MAX as u64 {
                return None;
            }
            Some(magnitude as i64)
        }
    }
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

impl<const K: usize> Neg for BigInt<K> {
    type Output = Self;

    fn neg(mut self) -> Self {
        if !self.is_zero() {
            self.sign = !self.sign;
        }
        self
    }
}

impl<const K: usize> ShlAssign<usize> for BigInt<K> {
    /// Historical behavior: bits shifted past the capacity are dropped
    /// silently. Use [`BigInt::shift_left_checked`] to observe the loss.
    fn shl_assign(&mut self, n: usize) {
        let _ = self.shift_left_checked(n);
    }
}

impl<const K: usize> ShrAssign<usize> for BigInt<K> {
    fn shr_assign(&mut self, n: usize) {
        self.shift_right(n);
    }
}

impl<const K: usize, const K2: usize> PartialEq<BigInt<K2>> for BigInt<K> {
    fn eq(&self, other: &BigInt<K2>) -> bool {
        self.sign == other.sign && self.words() == other.words()
    }
}

impl<const K: usize> Eq for BigInt<K> {}

impl<const K: usize, const K2: usize> PartialOrd<BigInt<K2>> for BigInt<K> {
    fn partial_cmp(&self, other: &BigInt<K2>) -> Option<Ordering> {
        Some(self.view().cmp(&other.view()))
    }
}

impl<const K: usize> Ord for BigInt<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.view().cmp(&other.view())
    }
}

// ---------------------------------------------------------------------------
// Construction from machine integers
// ---------------------------------------------------------------------------

impl<const K: usize> From<u64> for BigInt<K> {
    fn from(value: u64) -> Self {
        let mut big = Self::zero();
        big.assign_scalar(value);
        big
    }
}

impl<const K: usize> From<u32> for BigInt<K> {
    fn from(value: u32) -> Self {
        Self::from(value as u64)
    }
}

impl<const K: usize> From<i64> for BigInt<K> {
    fn from(value: i64) -> Self {
        let mut big = Self::from(value.unsigned_abs());
        big.sign = value < 0;
        big
    }
}

impl<const K: usize> From<i32> for BigInt<K> {
    fn from(value: i32) -> Self {
        Self::from(value as i64)
    }
}

impl<const K: usize> From<u128> for BigInt<K> {
    fn from(value: u128) -> Self {
        let words = [value as u64, (value >> 64) as u64];
        let needed = if words[1] != 0 {
            2
        } else {
            usize::from(words[0] != 0)
        };
        assert!(needed <= K, "capacity {K} too small for a {needed}-word value");
        let mut big = Self::zero();
        big.data[..needed].copy_from_slice(&words[..needed]);
        big.length = needed;
        big.normalize();
        big
    }
}

impl<const K: usize> From<i128> for BigInt<K> {
    fn from(value: i128) -> Self {
        let mut big = Self::from(value.unsigned_abs());
        if value < 0 {
            big.sign = true;
        }
        big
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Big4 = BigInt<4>;

    #[test]
    fn zero_is_normalized() {
        let z = Big4::zero();
        assert!(z.is_zero());
        assert!(!z.is_negative());
        assert_eq!(z.words(), &[] as &[u64]);
    }

    #[test]
    fn from_machine_integers() {
        assert_eq!(Big4::from(42u64).words(), &[42]);
        assert_eq!(Big4::from(-7i64).words(), &[7]);
        assert!(Big4::from(-7i64).is_negative());
        assert!(!Big4::from(0i64).is_negative());
        let wide = Big4::from(u128::MAX);
        assert_eq!(wide.words(), &[u64::MAX, u64::MAX]);
        assert_eq!(Big4::from(i128::MIN).words(), &[0, 1 << 63]);
        assert!(Big4::from(i128::MIN).is_negative());
    }

    #[test]
    fn from_words_trims_and_checks_capacity() {
        let b = Big4::from_words(true, &[1, 2, 0, 0]).unwrap();
        assert_eq!(b.words(), &[1, 2]);
        assert!(b.is_negative());
        assert_eq!(
            Big4::from_words(false, &[1, 1, 1, 1, 1]),
            Err(BigIntError::Capacity(4))
        );
        assert!(Big4::from_words(false, &[1, 1, 1, 1, 0]).is_ok());
        let z = Big4::from_words(true, &[0, 0]).unwrap();
        assert!(z.is_zero());
        assert!(!z.is_negative());
    }

    #[test]
    fn mul_add_scalar_carries_and_appends() {
        let mut b = Big4::from(u64::MAX);
        assert_eq!(b.mul_add_scalar(2, 1), 0);
        assert_eq!(b.words(), &[u64::MAX, 1]);

        let mut full = Big4::from_words(false, &[0, 0, 0, u64::MAX]).unwrap();
        let over = full.mul_add_scalar(4, 0);
        assert_eq!(over, 3);
        assert_eq!(full.words(), &[0, 0, 0, u64::MAX - 3]);
    }

    #[test]
    fn mul_add_scalar_on_zero_is_the_seed() {
        let mut b = Big4::zero();
        assert_eq!(b.mul_add_scalar(10, 7), 0);
        assert_eq!(b.words(), &[7]);
    }

    #[test]
    fn mul_add_words_matches_scalar_for_width_one() {
        let mut a = Big4::from(u64::MAX);
        let mut b = a;
        let residual = a.mul_add_words([3], [5]);
        let word = b.mul_add_scalar(3, 5);
        assert_eq!(residual, [word]);
        assert_eq!(a, b);
    }

    #[test]
    fn mul_add_words_two_wide() {
        // (2^64 + 1) * (2^64 + 2) = 2^128 + 3*2^64 + 2
        let mut a = Big4::from_words(false, &[1, 1]).unwrap();
        let residual = a.mul_add_words([2, 1], [0, 0]);
        assert_eq!(residual, [0, 0]);
        assert_eq!(a.words(), &[2, 3, 1]);
    }

    #[test]
    fn mul_add_words_reports_residual_past_capacity() {
        let mut a = BigInt::<2>::from_words(false, &[0, 1]).unwrap();
        // Shift the single high word up by two more words.
        let residual = a.mul_add_words([0, 0, 1], [0, 0, 0]);
        assert!(a.is_zero());
        assert_eq!(residual, [0, 1, 0]);
    }

    #[test]
    fn div_assign_scalar_schoolbook() {
        let mut b = Big4::from_words(false, &[0, 1]).unwrap(); // 2^64
        let rem = b.div_assign_scalar(10, 0);
        assert_eq!(rem, 6);
        assert_eq!(b.words(), &[0x1999_9999_9999_9999]);

        let mut d = Big4::from(100u64);
        assert_eq!(d.div_assign_scalar(7, 0), 2);
        assert_eq!(d.words(), &[14]);
    }

    #[test]
    fn div_with_overflow_seed() {
        // (3 * 2^64 + 16) / 16 == 3 * 2^60 + 1
        let mut b = Big4::from(16u64);
        let rem = b.div_assign_scalar(16, 3);
        assert_eq!(rem, 0);
        assert_eq!(b.words(), &[(3 << 60) + 1]);
    }

    #[test]
    fn shifts_round_trip() {
        let mut b = Big4::from(0xdead_beefu64);
        b <<= 100;
        let mut c = b;
        c >>= 100;
        assert_eq!(c, Big4::from(0xdead_beefu64));
        assert_eq!(b.words(), &[0, 0xeadb_eef0_0000_0000, 0xd]);
    }

    #[test]
    fn left_shift_drops_past_capacity_silently() {
        let mut b = Big4::from(1u64);
        b <<= 64 * 4;
        assert!(b.is_zero());

        let mut c = Big4::from(0b11u64);
        assert!(c.shift_left_checked(64 * 4 - 1));
        assert_eq!(c.words(), &[0, 0, 0, 1 << 63]);
    }

    #[test]
    fn checked_shift_reports_exactly_when_bits_are_lost() {
        let mut b = Big4::from(1u64);
        assert!(!b.shift_left_checked(64 * 4 - 1));
        assert_eq!(b.words(), &[0, 0, 0, 1 << 63]);
        let mut c = b;
        assert!(c.shift_left_checked(1));
        assert!(c.is_zero());
    }

    #[test]
    fn right_shift_discards_low_bits() {
        let mut b = Big4::from(0b1011u64);
        b >>= 2;
        assert_eq!(b.words(), &[0b10]);
        b >>= 300;
        assert!(b.is_zero());
    }

    #[test]
    fn add_and_sub_signed() {
        let a = Big4::from(100i64);
        let b = Big4::from(-30i64);
        let mut r = a;
        assert!(!r.add_assign_big(b.view()));
        assert_eq!(r, Big4::from(70i64));

        let mut r = b;
        assert!(!r.add_assign_big(a.view()));
        assert_eq!(r, Big4::from(70i64));

        let mut r = a;
        assert!(!r.sub_assign_big(Big4::from(130i64).view()));
        assert_eq!(r, Big4::from(-30i64));

        let mut r = a;
        assert!(!r.sub_assign_big(a.view()));
        assert!(r.is_zero());
    }

    #[test]
    fn add_carries_across_words() {
        let mut a = Big4::from_words(false, &[u64::MAX, u64::MAX]).unwrap();
        assert!(!a.add_assign_big(Big4::from(1u64).view()));
        assert_eq!(a.words(), &[0, 0, 1]);
    }

    #[test]
    fn add_reports_capacity_overflow() {
        let mut a = BigInt::<1>::from(u64::MAX);
        assert!(a.add_assign_big(BigInt::<1>::from(1u64).view()));
    }

    #[test]
    fn mul_pow5_small_and_chunked() {
        let mut b = Big4::from(1u64);
        assert!(!b.mul_pow5(3));
        assert_eq!(b.words(), &[125]);

        let mut d = Big4::from(0xdu64);
        assert!(!d.mul_pow5(60));
        // 13 * 5^60, computed independently.
        assert_eq!(
            d.words(),
            &[0xffd5_c438_9285_b05d, 0x4fce_f32d_3bd8_117e, 0x8170]
        );
    }

    #[test]
    fn mul_pow5_reports_lost_carry() {
        let mut b = BigInt::<1>::from(u64::MAX);
        assert!(b.mul_pow5(27));
    }

    #[test]
    fn ordering_is_sign_aware() {
        let minus_two = Big4::from(-2i64);
        let minus_ten = Big4::from(-10i64);
        let three = Big4::from(3u64);
        assert!(minus_ten < minus_two);
        assert!(minus_two < three);
        assert!(Big4::zero() < three);
        assert!(minus_two < Big4::zero());
        assert_eq!(three.cmp(&three), Ordering::Equal);
    }

    #[test]
    fn neg_keeps_zero_positive() {
        assert!(!(-Big4::zero()).is_negative());
        assert!((-Big4::from(5u64)).is_negative());
        assert_eq!(-(-Big4::from(5u64)), Big4::from(5u64));
    }

    #[test]
    fn as_f64_scales_by_word_position() {
        assert_eq!(Big4::zero().as_f64(), 0.0);
        assert_eq!(Big4::from(12345u64).as_f64(), 12345.0);
        assert_eq!(Big4::from(-12345i64).as_f64(), -12345.0);
        let two_64 = Big4::from_words(false, &[0, 1]).unwrap();
        assert_eq!(two_64.as_f64(), 2f64.powi(64));
        let two_128 = Big4::from_words(false, &[0, 0, 1]).unwrap();
        assert_eq!(two_128.as_f64(), 2f64.powi(128));
    }

    #[test]
    fn machine_conversions_round_trip() {
        assert_eq!(Big4::from(7u64).try_to_u64(), Some(7));
        assert_eq!(Big4::from(-7i64).try_to_u64(), None);
        assert_eq!(Big4::from(-7i64).try_to_i64(), Some(-7));
        assert_eq!(Big4::from(i64::MIN).try_to_i64(), Some(i64::MIN));
        assert_eq!(Big4::from(u64::MAX).try_to_i64(), None);
        let wide = Big4::from_words(false, &[0, 1]).unwrap();
        assert_eq!(wide.try_to_u64(), None);
    }
}
