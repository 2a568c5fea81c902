//! Decimal, hexadecimal and binary parsing and formatting.
//!
//! Accepted grammars:
//!
//! - decimal: `[+-]?[0-9]+`
//! - hex: `[+-]?[0-9A-Fa-f_]+`, underscores only when enabled
//! - binary: `[+-]?[01_]+`, underscores only when enabled
//!
//! Leading zeros are accepted, the empty string is not. Formatting
//! produces minimum-length output with a `-` for negative values.

use core::fmt;
use core::str::FromStr;

use crate::{BigInt, BigIntError, Result, POW10_CHUNK, POW10_PER_WORD};

/// Strip a leading ASCII sign, returning (negative, rest, offset).
fn split_sign(bytes: &[u8]) -> (bool, &[u8], usize) {
    match bytes.first() {
        Some(b'-') => (true, &bytes[1..], 1),
        Some(b'+') => (false, &bytes[1..], 1),
        _ => (false, bytes, 0),
    }
}

impl<const K: usize> BigInt<K> {
    /// Push one word of a magnitude being assembled least significant
    /// first. Zero words past the capacity are leading zeros of the
    /// input and are fine; non-zero ones are a capacity error.
    fn push_parsed_word(&mut self, word: u64) -> Result<()> {
        if self.length < K {
            self.data[self.length] = word;
            self.length += 1;
            Ok(())
        } else if word == 0 {
            Ok(())
        } else {
            Err(BigIntError::Capacity(K))
        }
    }

    /// Parse a hexadecimal string, optionally permitting `_` separators.
    pub fn from_hex_str(text: &str, allow_underscores: bool) -> Result<Self> {
        Self::parse_pow2(text, allow_underscores, 4, |b, at| match b {
            b'0'..=b'9' => Ok((b - b'0') as u64),
            b'a'..=b'f' => Ok((b - b'a' + 10) as u64),
            b'A'..=b'F' => Ok((b - b'A' + 10) as u64),
            _ => Err(BigIntError::InvalidDigit(at)),
        })
    }

    /// Parse a binary string, optionally permitting `_` separators.
    pub fn from_binary_str(text: &str, allow_underscores: bool) -> Result<Self> {
        Self::parse_pow2(text, allow_underscores, 1, |b, at| match b {
            b'0' | b'1' => Ok((b - b'0') as u64),
            _ => Err(BigIntError::InvalidDigit(at)),
        })
    }

    /// Shared power-of-two-radix parser: digits are consumed least
    /// significant first and packed into words directly.
    fn parse_pow2(
        text: &str,
        allow_underscores: bool,
        bits_per_digit: u32,
        digit: impl Fn(u8, usize) -> Result<u64>,
    ) -> Result<Self> {
        let (negative, body, offset) = split_sign(text.as_bytes());
        let mut value = Self::zero();
        let mut word = 0u64;
        let mut shift = 0u32;
        let mut digits = 0usize;
        for (at, &b) in body.iter().enumerate().rev() {
            if b == b'_' && allow_underscores {
                continue;
            }
            let d = digit(b, at + offset)?;
            word |= d << shift;
            shift += bits_per_digit;
            digits += 1;
            if shift == 64 {
                value.push_parsed_word(word)?;
                word = 0;
                shift = 0;
            }
        }
        if digits == 0 {
            return Err(BigIntError::Empty);
        }
        if word != 0 {
            value.push_parsed_word(word)?;
        }
        value.normalize();
        value.sign = negative && !value.is_zero();
        Ok(value)
    }
}

impl<const K: usize> FromStr for BigInt<K> {
    type Err = BigIntError;

    /// Parse a decimal string, processed in 19-digit chunks so each
    /// chunk costs one scalar multiply-add.
    fn from_str(text: &str) -> Result<Self> {
        let (negative, body, offset) = split_sign(text.as_bytes());
        if body.is_empty() {
            return Err(BigIntError::Empty);
        }
        let mut value = Self::zero();
        let mut chunk = 0u64;
        let mut chunk_digits = 0u32;
        for (at, &b) in body.iter().enumerate() {
            let d = match b {
                b'0'..=b'9' => (b - b'0') as u64,
                _ => return Err(BigIntError::InvalidDigit(at + offset)),
            };
            chunk = chunk * 10 + d;
            chunk_digits += 1;
            if chunk_digits == POW10_PER_WORD {
                if value.mul_add_scalar(POW10_CHUNK, chunk) != 0 {
                    return Err(BigIntError::Capacity(K));
                }
                chunk = 0;
                chunk_digits = 0;
            }
        }
        if chunk_digits > 0 {
            let scale = 10u64.pow(chunk_digits);
            if value.mul_add_scalar(scale, chunk) != 0 {
                return Err(BigIntError::Capacity(K));
            }
        }
        value.sign = negative && !value.is_zero();
        Ok(value)
    }
}

impl<const K: usize> fmt::Display for BigInt<K> {
    /// Minimum-length decimal, extracted 19 digits per scalar division.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        let mut magnitude = *self;
        let mut digits = Vec::new();
        while !magnitude.is_zero() {
            let mut chunk = magnitude.div_assign_scalar(POW10_CHUNK, 0);
            if magnitude.is_zero() {
                while chunk > 0 {
                    digits.push(b'0' + (chunk % 10) as u8);
                    chunk /= 10;
                }
            } else {
                for _ in 0..POW10_PER_WORD {
                    digits.push(b'0' + (chunk % 10) as u8);
                    chunk /= 10;
                }
            }
        }
        let mut out = String::with_capacity(digits.len() + 1);
        if self.sign {
            out.push('-');
        }
        out.extend(digits.iter().rev().map(|&b| b as char));
        f.write_str(&out)
    }
}

impl<const K: usize> fmt::LowerHex for BigInt<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        if self.sign {
            f.write_str("-")?;
        }
        let words = self.words();
        write!(f, "{:x}", words[words.len() - 1])?;
        for &w in words[..words.len() - 1].iter().rev() {
            write!(f, "{w:016x}")?;
        }
        Ok(())
    }
}

impl<const K: usize> fmt::UpperHex for BigInt<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        if self.sign {
            f.write_str("-")?;
        }
        let words = self.words();
        write!(f, "{:X}", words[words.len() - 1])?;
        for &w in words[..words.len() - 1].iter().rev() {
            write!(f, "{w:016X}")?;
        }
        Ok(())
    }
}

impl<const K: usize> fmt::Binary for BigInt<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }
        if self.sign {
            f.write_str("-")?;
        }
        let words = self.words();
        write!(f, "{:b}", words[words.len() - 1])?;
        for &w in words[..words.len() - 1].iter().rev() {
            write!(f, "{w:064b}")?;
        }
        Ok(())
    }
}
