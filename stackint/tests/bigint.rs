//! Integration and property-based tests for the fixed-capacity big
//! integer: string round trips, shift inverses and signed arithmetic
//! identities.

use proptest::prelude::*;

use stackint::{BigInt, BigIntError};

type Big4 = BigInt<4>;

#[test]
fn hex_difference_with_sign_flip() {
    // a - b == -(b - a)
    let a = Big4::from_hex_str("4b313f2c7fa1d2e9b06d58d1c33de05b8", false).unwrap();
    let b = Big4::from_hex_str("c39bfa12ee014e5a7d30cc19bdd099d7", false).unwrap();

    let mut forward = a;
    assert!(!forward.sub_assign_big(b.view()));
    let mut backward = b;
    assert!(!backward.sub_assign_big(a.view()));

    assert_eq!(forward, -backward);
    assert_eq!(
        format!("{forward:x}"),
        "3ef77f8b50c1be04089a4c102760d6be1"
    );
    assert!(backward.is_negative());
}

#[test]
fn mul_pow5_matches_reference_digits() {
    let mut d = Big4::from(0xdu64);
    assert!(!d.mul_pow5(60));
    assert_eq!(format!("{d:x}"), "81704fcef32d3bd8117effd5c4389285b05d");
}

#[test]
fn addition_is_subtraction_inverse() {
    let a = "123456789012345678901234567890".parse::<Big4>().unwrap();
    let b = "-987654321098765432109876543210".parse::<Big4>().unwrap();
    let mut sum = a;
    assert!(!sum.add_assign_big(b.view()));
    assert_eq!(sum.to_string(), "-864197532086419753208641975320");
    assert!(!sum.sub_assign_big(b.view()));
    assert_eq!(sum, a);
}

#[test]
fn capacity_overflow_is_reported_not_wrapped() {
    let mut all_ones = BigInt::<2>::from_words(false, &[u64::MAX, u64::MAX]).unwrap();
    assert!(all_ones.add_assign_big(BigInt::<2>::from(1u64).view()));
    assert_eq!("1".repeat(50).parse::<BigInt<2>>(), Err(BigIntError::Capacity(2)));
}

#[test]
fn division_extracts_decimal_chunks() {
    let mut b = "340282366920938463463374607431768211455" // 2^128 - 1
        .parse::<Big4>()
        .unwrap();
    let rem = b.div_assign_scalar(10_000_000_000_000_000_000, 0);
    assert_eq!(rem, 3_374_607_431_768_211_455);
    assert_eq!(b.to_string(), "34028236692093846346");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    #[test]
    fn decimal_round_trip(words in proptest::collection::vec(any::<u64>(), 0..4), negative: bool) {
        let value = Big4::from_words(negative, &words).unwrap();
        let text = value.to_string();
        prop_assert_eq!(text.parse::<Big4>().unwrap(), value);
    }

    #[test]
    fn hex_round_trip(words in proptest::collection::vec(any::<u64>(), 0..4), negative: bool) {
        let value = Big4::from_words(negative, &words).unwrap();
        prop_assert_eq!(Big4::from_hex_str(&format!("{value:x}"), false).unwrap(), value);
        prop_assert_eq!(Big4::from_hex_str(&format!("{value:X}"), false).unwrap(), value);
    }

    #[test]
    fn binary_round_trip(words in proptest::collection::vec(any::<u64>(), 0..4), negative: bool) {
        let value = Big4::from_words(negative, &words).unwrap();
        prop_assert_eq!(Big4::from_binary_str(&format!("{value:b}"), false).unwrap(), value);
    }

    #[test]
    fn shift_round_trip_when_nothing_is_lost(word: u64, shift in 0usize..192) {
        let mut value = Big4::from(word);
        let lost = value.shift_left_checked(shift);
        prop_assert!(!lost);
        value >>= shift;
        prop_assert_eq!(value, Big4::from(word));
    }

    #[test]
    fn add_then_sub_is_identity(
        a in proptest::collection::vec(any::<u64>(), 0..3),
        b in proptest::collection::vec(any::<u64>(), 0..3),
        sa: bool,
        sb: bool,
    ) {
        let a = Big4::from_words(sa, &a).unwrap();
        let b = Big4::from_words(sb, &b).unwrap();
        let mut acc = a;
        prop_assert!(!acc.add_assign_big(b.view()));
        prop_assert!(!acc.sub_assign_big(b.view()));
        prop_assert_eq!(acc, a);
    }

    #[test]
    fn scalar_mul_then_div_is_identity(
        words in proptest::collection::vec(any::<u64>(), 0..3),
        scalar in 1u64..,
    ) {
        let original = Big4::from_words(false, &words).unwrap();
        let mut value = original;
        prop_assume!(value.mul_add_scalar(scalar, 0) == 0);
        let rem = value.div_assign_scalar(scalar, 0);
        prop_assert_eq!(rem, 0);
        prop_assert_eq!(value, original);
    }

    #[test]
    fn decimal_string_is_minimal(words in proptest::collection::vec(any::<u64>(), 0..4)) {
        let value = Big4::from_words(false, &words).unwrap();
        let text = value.to_string();
        prop_assert!(!text.is_empty());
        if text != "0" {
            prop_assert!(!text.starts_with('0'));
        }
    }

    #[test]
    fn ordering_agrees_with_decimal_strings(
        a in proptest::collection::vec(any::<u64>(), 0..3),
        b in proptest::collection::vec(any::<u64>(), 0..3),
    ) {
        let a = Big4::from_words(false, &a).unwrap();
        let b = Big4::from_words(false, &b).unwrap();
        let by_value = a.cmp(&b);
        let by_len_then_text = a
            .to_string()
            .len()
            .cmp(&b.to_string().len())
            .then_with(|| a.to_string().cmp(&b.to_string()));
        prop_assert_eq!(by_value, by_len_then_text);
    }
}
