//! word-level cores of the arithmetic operations
//!
//! Everything here works on width-normalized operands, so the loops can run
//! over equal-length word vectors without special cases.

use super::{error::ArithmeticError, Integer, WIDTH_MIN, WORD_BITS};

/// outcome of a raw addition
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct AddFlags {
    /// fixed mode only: both input signs agreed, the result sign did not
    pub overflow: bool,
    /// the final carry left the topmost bit
    pub carry: bool,
}

/// ripple-carry addition
///
/// In unlimited mode a sign flip is absorbed by growing the result one word
/// instead of reporting overflow.
pub(super) fn add(lhs: &Integer, rhs: &Integer) -> (Integer, AddFlags) {
    let (left, right) = Integer::normalized_operands(lhs, rhs);
    let width = left.width;

    let mut words = vec![0; left.actual_width()];
    let mut carry = 0u16;
    for (out, (&l, &r)) in words.iter_mut().zip(left.words.iter().zip(&right.words)) {
        let sum = u16::from(l) + u16::from(r) + carry;
        *out = sum as u8;
        carry = sum >> WORD_BITS;
    }

    let mut result = Integer { width, words };
    let mut flags = AddFlags {
        overflow: false,
        carry: carry != 0,
    };

    if width.is_unlimited() {
        if !left.is_negative() && !right.is_negative() && result.is_negative() {
            result.words.push(0x00);
        } else if left.is_negative() && right.is_negative() && !result.is_negative() {
            result.words.push(0xff);
        }
    } else if left.is_negative() == right.is_negative()
        && result.is_negative() != left.is_negative()
    {
        flags.overflow = true;
    }

    (result, flags)
}

/// logical left shift, length preserved, low bits zero-filled
pub(super) fn shl(words: &mut [u8], shift: usize) {
    if shift == 0 {
        return;
    }
    if shift >= words.len() * WORD_BITS {
        words.fill(0);
        return;
    }
    let word_shift = shift / WORD_BITS;
    let bit_shift = shift % WORD_BITS;
    for i in (0..words.len()).rev() {
        let src = i.checked_sub(word_shift);
        let mut word = src.map_or(0, |src| words[src] << bit_shift);
        if bit_shift > 0 {
            if let Some(src) = src.and_then(|src| src.checked_sub(1)) {
                word |= words[src] >> (WORD_BITS - bit_shift);
            }
        }
        words[i] = word;
    }
}

/// logical right shift, length preserved, high bits zero-filled
pub(super) fn shr(words: &mut [u8], shift: usize) {
    if shift == 0 {
        return;
    }
    if shift >= words.len() * WORD_BITS {
        words.fill(0);
        return;
    }
    let word_shift = shift / WORD_BITS;
    let bit_shift = shift % WORD_BITS;
    for i in 0..words.len() {
        let src = i + word_shift;
        let mut word = if src < words.len() { words[src] >> bit_shift } else { 0 };
        if bit_shift > 0 && src + 1 < words.len() {
            word |= words[src + 1] << (WORD_BITS - bit_shift);
        }
        words[i] = word;
    }
}

/// trim an unlimited positive-magnitude result to the smallest width that
/// keeps one clear high bit, never below [`WIDTH_MIN`]
fn shrink(value: &mut Integer) {
    let size = ((value.msb_index() + 1) / WORD_BITS + 1).max(WIDTH_MIN);
    value.words.truncate(size);
}

/// shift-and-add multiplication over positive magnitudes with sign
/// recomposition; returns the (possibly wrapped) result and whether a
/// fixed-width overflow occurred
pub(super) fn mul(lhs: &Integer, rhs: &Integer) -> (Integer, bool) {
    let width = lhs.width.max(rhs.width);
    let sign_positive = lhs.is_negative() == rhs.is_negative();

    let left = lhs.magnitude();
    let right = rhs.magnitude();
    let mut actual_width = left.actual_width().max(right.actual_width());
    if width.is_unlimited() {
        // the shift loop must not push magnitude bits past the top
        actual_width *= 2;
    }
    let mut left = left.normalized(width, actual_width);
    let mut right = right.normalized(width, actual_width);

    let mut result = Integer::zero_with(width, actual_width);
    let mut carry_seen = false;
    let right_msb = right.msb_index();
    debug_assert!(right_msb < right.actual_bits());
    for _ in 0..=right_msb {
        if right.bit(0) {
            let (sum, flags) = add(&result, &left);
            result = sum;
            carry_seen |= flags.carry;
        }
        left.shift_left(1);
        right.shift_right(1);
    }

    let mut overflow = false;
    if width.is_unlimited() {
        shrink(&mut result);
    } else if carry_seen || result.is_negative() {
        overflow = true;
    }

    if sign_positive {
        (result, overflow)
    } else {
        (result.complemented(), overflow)
    }
}

/// restoring long division over positive magnitudes; the quotient follows the
/// sign rule, the remainder is the magnitude remainder
pub(super) fn div_mod(lhs: &Integer, rhs: &Integer) -> Result<(Integer, Integer), ArithmeticError> {
    if rhs.is_zero() {
        return Err(ArithmeticError::DivisionByZero);
    }
    let width = lhs.width.max(rhs.width);
    if lhs.is_zero() {
        return Ok((Integer::zero(width), Integer::zero(width)));
    }
    let sign_positive = lhs.is_negative() == rhs.is_negative();

    let numerator = lhs.magnitude();
    let denominator = rhs.magnitude();
    let actual_width = numerator.actual_width().max(denominator.actual_width());
    let numerator = numerator.normalized(width, actual_width);
    let denominator = denominator.normalized(width, actual_width);

    let mut quotient = Integer::zero_with(width, actual_width);
    let mut remainder = Integer::zero_with(width, actual_width);
    let negated_denominator = denominator.complemented();

    let numerator_msb = numerator.msb_index();
    for idx in (0..=numerator_msb).rev() {
        remainder.shift_left(1);
        remainder.set_bit(0, numerator.bit(idx));

        // overflow flags are irrelevant here, only the sign of the difference
        let (difference, _) = add(&remainder, &negated_denominator);
        if !difference.is_negative() {
            remainder = difference;
            quotient.set_bit(idx, true);
        }
    }

    if sign_positive {
        Ok((quotient, remainder))
    } else {
        Ok((quotient.complemented(), remainder))
    }
}

/// iterated multiply; a fixed-width overflow is reported only after the loop
/// completes, carrying the wrapped magnitude
pub(super) fn factorial(value: &Integer) -> Result<Integer, ArithmeticError> {
    if value.is_negative() {
        return Err(ArithmeticError::NegativeFactorial);
    }
    let width = value.width;
    let one = Integer::one(width);
    if value.is_zero() || *value == one {
        return Ok(one);
    }

    let mut overflow = false;
    let mut result = value.clone();
    let mut multiplier = Integer::two(width);
    while multiplier != *value {
        let (product, wrapped) = mul(&result, &multiplier);
        result = product;
        overflow |= wrapped;
        multiplier = add(&multiplier, &one).0;
    }

    if overflow {
        Err(ArithmeticError::Overflow(result))
    } else {
        Ok(result)
    }
}
