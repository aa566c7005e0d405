// SPDX-FileCopyrightText: 2024 Nils Jochem
// SPDX-License-Identifier: MPL-2.0
//! decimal (de)serialization, built on the arithmetic cores
//!
//! Serialization divides by ten repeatedly; parsing multiplies by ten and
//! adds a digit per character, accumulating the overflow flag so a fixed
//! width rejects literals it cannot hold.

use super::{algos, error::ArithmeticError, Integer, Width};

pub(super) fn to_decimal(value: &Integer) -> String {
    if value.is_zero() {
        return "0".to_owned();
    }
    let is_negative = value.is_negative();
    let mut copy = value.magnitude();
    let ten = Integer::ten(copy.width());

    let mut digits = Vec::new();
    while !copy.is_zero() {
        let (quotient, remainder) =
            algos::div_mod(&copy, &ten).unwrap_or_else(|_| unreachable!("ten is not zero"));
        digits.push(b'0' + remainder.low_u8());
        copy = quotient;
    }

    let mut out = String::with_capacity(digits.len() + usize::from(is_negative));
    if is_negative {
        out.push('-');
    }
    out.extend(digits.iter().rev().map(|&digit| char::from(digit)));
    out
}

pub(super) fn from_decimal(width: Width, s: &str) -> Result<Integer, ArithmeticError> {
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'+') => (false, &s[1..]),
        Some(b'-') => (true, &s[1..]),
        _ => (false, s),
    };
    if digits.is_empty() {
        return Err(ArithmeticError::Empty);
    }
    let offset = s.len() - digits.len();

    let ten = Integer::ten(width);
    let mut result = Integer::zero(width);
    let mut overflow = false;
    for (i, c) in digits.char_indices() {
        let Some(digit) = c.to_digit(10) else {
            return Err(ArithmeticError::InvalidDigit {
                digit: c,
                position: offset + i,
            });
        };

        let (shifted, wrapped) = algos::mul(&result, &ten);
        overflow |= wrapped;
        let (sum, flags) = algos::add(&shifted, &Integer::from_low_word(width, digit as u8));
        overflow |= flags.overflow;
        result = sum;
    }

    // the wrapped payload is reported before the sign is applied
    if overflow {
        return Err(ArithmeticError::Overflow(result));
    }
    Ok(if negative { result.complemented() } else { result })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unlimited(s: &str) -> Integer {
        Integer::parse(Width::Unlimited, s).unwrap()
    }

    #[test]
    fn serialize_zero() {
        assert_eq!(Integer::zero(Width::Unlimited).serialize(), "0");
        assert_eq!(Integer::zero(Width::Fixed(4)).serialize(), "0");
    }

    #[test]
    fn round_trip_canonical() {
        for s in ["0", "1", "-1", "42", "255", "-256", "123456789", "-987654321012345678901234567890"] {
            assert_eq!(unlimited(s).serialize(), s, "round trip of {s}");
        }
    }

    #[test]
    fn parse_non_canonical_forms() {
        assert_eq!(unlimited("+123").serialize(), "123");
        assert_eq!(unlimited("-0").serialize(), "0");
        assert_eq!(unlimited("0042").serialize(), "42");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            Integer::parse(Width::Unlimited, "12x4"),
            Err(ArithmeticError::InvalidDigit { digit: 'x', position: 2 })
        );
        assert_eq!(
            Integer::parse(Width::Unlimited, "-"),
            Err(ArithmeticError::Empty)
        );
        assert_eq!(Integer::parse(Width::Unlimited, ""), Err(ArithmeticError::Empty));
    }

    #[test]
    fn fixed_width_bounds() {
        assert!(Integer::parse(Width::Fixed(4), "2147483647").is_ok());
        assert!(matches!(
            Integer::parse(Width::Fixed(4), "2147483648"),
            Err(ArithmeticError::Overflow(_))
        ));
        // the digit accumulator wraps before the sign is applied, so the most
        // negative value is rejected as well
        assert!(matches!(
            Integer::parse(Width::Fixed(4), "-2147483648"),
            Err(ArithmeticError::Overflow(_))
        ));
        assert_eq!(
            Integer::parse(Width::Fixed(4), "-2147483647").unwrap().serialize(),
            "-2147483647"
        );
    }
}
