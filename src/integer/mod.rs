// SPDX-FileCopyrightText: 2024 Nils Jochem
// SPDX-License-Identifier: MPL-2.0
use std::{
    fmt,
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Rem, RemAssign, Sub, SubAssign},
    str::FromStr,
};

use itertools::Itertools;
use rand::RngCore;

mod algos;
mod decimal;
pub mod error;

use error::ArithmeticError;

/// number of bits per storage word
pub const WORD_BITS: usize = 8;
/// smallest legal width in words
pub const WIDTH_MIN: usize = 4;

/// Width descriptor of an [`Integer`]: a fixed number of words, or unlimited.
///
/// `Unlimited` orders above every fixed width, so the width of a binary
/// operation's result is the `max` of the operand widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Width {
    Fixed(usize),
    Unlimited,
}

impl Width {
    pub const fn is_unlimited(self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// words a fresh zero of this width occupies
    const fn initial_words(self) -> usize {
        match self {
            Self::Fixed(width) => width,
            Self::Unlimited => WIDTH_MIN,
        }
    }

    fn assert_valid(self) {
        if let Self::Fixed(width) = self {
            assert!(width >= WIDTH_MIN, "fixed width {width} below minimum {WIDTH_MIN}");
        }
    }
}

/// Multi-precision signed integer in little-endian two's complement.
///
/// The word vector is never empty. In fixed mode its length always equals the
/// declared width; in unlimited mode it is at least [`WIDTH_MIN`] and grows or
/// shrinks as operations produce results. The sign is the topmost bit of the
/// topmost word.
#[derive(Clone)]
pub struct Integer {
    width: Width,
    /// two's complement words, index 0 least significant
    words: Vec<u8>,
}

impl fmt::Debug for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Integer {{ {:?} 0x[", self.width)?;
        for (pos, word) in self.words.iter().rev().with_position() {
            write!(f, "{word:02x}")?;
            if matches!(pos, itertools::Position::First | itertools::Position::Middle) {
                f.write_str(", ")?;
            }
        }
        write!(f, "] }}")
    }
}

impl fmt::Display for Integer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&decimal::to_decimal(self))
    }
}

impl FromStr for Integer {
    type Err = ArithmeticError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(Width::Unlimited, s)
    }
}

/// value equality over normalized operands, not representation equality
impl PartialEq for Integer {
    fn eq(&self, other: &Self) -> bool {
        if self.is_negative() != other.is_negative() {
            return false;
        }
        let (lhs, rhs) = Self::normalized_operands(self, other);
        lhs.words == rhs.words
    }
}
impl Eq for Integer {}

impl From<i64> for Integer {
    fn from(value: i64) -> Self {
        Self {
            width: Width::Unlimited,
            words: value.to_le_bytes().to_vec(),
        }
    }
}

impl Integer {
    pub fn zero(width: Width) -> Self {
        width.assert_valid();
        Self {
            width,
            words: vec![0; width.initial_words()],
        }
    }
    pub fn one(width: Width) -> Self {
        Self::from_low_word(width, 1)
    }
    pub(crate) fn two(width: Width) -> Self {
        Self::from_low_word(width, 2)
    }
    pub(crate) fn ten(width: Width) -> Self {
        Self::from_low_word(width, 10)
    }
    fn from_low_word(width: Width, value: u8) -> Self {
        let mut out = Self::zero(width);
        out.words[0] = value;
        out
    }
    /// zero occupying an explicit number of words
    fn zero_with(width: Width, actual_width: usize) -> Self {
        Self {
            width,
            words: vec![0; actual_width],
        }
    }

    /// parse a decimal literal (`[+-]?[0-9]+`) at the given width
    pub fn parse(width: Width, s: &str) -> Result<Self, ArithmeticError> {
        width.assert_valid();
        decimal::from_decimal(width, s)
    }

    /// generate a random value of the given width mode, for tests and demos
    pub fn new_random(width: Width, mut rng: impl RngCore) -> Self {
        let mut out = Self::zero(width);
        match width {
            Width::Fixed(_) => rng.fill_bytes(&mut out.words),
            Width::Unlimited => {
                let len = WIDTH_MIN + crate::util::rng::next_bound(4, &mut rng, 10);
                out.words = crate::util::rng::random_words(rng).take(len).collect();
            }
        }
        out
    }

    // getter
    pub const fn width(&self) -> Width {
        self.width
    }
    pub(crate) fn actual_width(&self) -> usize {
        self.words.len()
    }
    pub(crate) fn actual_bits(&self) -> usize {
        self.words.len() * WORD_BITS
    }
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&word| word == 0)
    }
    pub(crate) fn is_negative(&self) -> bool {
        self.words.last().is_some_and(|word| word & 0x80 != 0)
    }
    pub(crate) fn low_u8(&self) -> u8 {
        self.words[0]
    }

    // bit access for the algorithmic cores
    pub(crate) fn bit(&self, idx: usize) -> bool {
        self.words[idx / WORD_BITS] >> (idx % WORD_BITS) & 1 == 1
    }
    pub(crate) fn set_bit(&mut self, idx: usize, value: bool) {
        let mask = 1 << (idx % WORD_BITS);
        if value {
            self.words[idx / WORD_BITS] |= mask;
        } else {
            self.words[idx / WORD_BITS] &= !mask;
        }
    }
    /// index of the highest set bit, 0 when no bit is set
    pub(crate) fn msb_index(&self) -> usize {
        self.words
            .iter()
            .enumerate()
            .rev()
            .find(|(_, &word)| word != 0)
            .map_or(0, |(i, &word)| {
                i * WORD_BITS + (WORD_BITS - 1 - word.leading_zeros() as usize)
            })
    }

    /// sign-extended copy occupying `actual_width` words, tagged `width`
    pub(crate) fn normalized(&self, width: Width, actual_width: usize) -> Self {
        debug_assert!(actual_width >= self.actual_width());
        let fill = if self.is_negative() { 0xff } else { 0x00 };
        let mut words = self.words.clone();
        words.resize(actual_width, fill);
        Self { width, words }
    }

    /// width-matched pair of operands for a binary operation
    pub(crate) fn normalized_operands(lhs: &Self, rhs: &Self) -> (Self, Self) {
        let width = lhs.width.max(rhs.width);
        let actual_width = lhs.actual_width().max(rhs.actual_width());
        (
            lhs.normalized(width, actual_width),
            rhs.normalized(width, actual_width),
        )
    }

    /// sign-extending copy at a dominating width
    pub fn widen(&self, width: Width) -> Self {
        width.assert_valid();
        assert!(
            width >= self.width,
            "can only widen: {:?} -> {width:?}",
            self.width
        );
        let actual_width = match width {
            Width::Fixed(words) => words,
            Width::Unlimited => self.actual_width(),
        };
        self.normalized(width, actual_width)
    }

    fn inverted(&self) -> Self {
        Self {
            width: self.width,
            words: self.words.iter().map(|word| !word).collect(),
        }
    }
    /// two's complement; in unlimited mode negating a `0x80..00` pattern grows
    /// by one word instead of wrapping
    pub(crate) fn complemented(&self) -> Self {
        algos::add(&self.inverted(), &Self::one(self.width)).0
    }
    /// absolute value; the width-mode caveats of [`Self::complemented`] apply
    pub(crate) fn magnitude(&self) -> Self {
        if self.is_negative() {
            self.complemented()
        } else {
            self.clone()
        }
    }

    /// logical in-place shift over the actual bit count, zero-filled low bits
    pub(crate) fn shift_left(&mut self, shift: usize) {
        algos::shl(&mut self.words, shift);
    }
    /// logical in-place shift over the actual bit count, zero-filled high bits
    pub(crate) fn shift_right(&mut self, shift: usize) {
        algos::shr(&mut self.words, shift);
    }

    // checked operations; the operator traits panic on the same errors
    pub fn checked_add(&self, rhs: &Self) -> Result<Self, ArithmeticError> {
        let (result, flags) = algos::add(self, rhs);
        if flags.overflow {
            Err(ArithmeticError::Overflow(result))
        } else {
            Ok(result)
        }
    }
    pub fn checked_sub(&self, rhs: &Self) -> Result<Self, ArithmeticError> {
        self.checked_add(&rhs.complemented())
    }
    pub fn checked_mul(&self, rhs: &Self) -> Result<Self, ArithmeticError> {
        let (result, overflow) = algos::mul(self, rhs);
        if overflow {
            Err(ArithmeticError::Overflow(result))
        } else {
            Ok(result)
        }
    }
    pub fn checked_div(&self, rhs: &Self) -> Result<Self, ArithmeticError> {
        algos::div_mod(self, rhs).map(|(quotient, _)| quotient)
    }
    pub fn checked_rem(&self, rhs: &Self) -> Result<Self, ArithmeticError> {
        algos::div_mod(self, rhs).map(|(_, remainder)| remainder)
    }
    pub fn checked_div_rem(&self, rhs: &Self) -> Result<(Self, Self), ArithmeticError> {
        algos::div_mod(self, rhs)
    }
    pub fn factorial(&self) -> Result<Self, ArithmeticError> {
        algos::factorial(self)
    }

    /// decimal rendition, also available through `Display`
    pub fn serialize(&self) -> String {
        decimal::to_decimal(self)
    }
}

impl Neg for Integer {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self.complemented()
    }
}
impl Neg for &Integer {
    type Output = Integer;

    fn neg(self) -> Self::Output {
        self.complemented()
    }
}

macro_rules! implIntMath {
    ($($assign_trait:tt)::*, $assign_func:ident, $($trait:tt)::*, $func:ident, $checked:ident, $panic_msg:literal) => {
        impl $($trait)::*<Integer> for Integer {
            implIntMath!(body $func, $checked, $panic_msg, Integer);
        }
        impl $($trait)::*<&Integer> for Integer {
            implIntMath!(body $func, $checked, $panic_msg, &Integer);
        }
        impl $($trait)::*<Integer> for &Integer {
            implIntMath!(body $func, $checked, $panic_msg, Integer);
        }
        impl $($trait)::*<&Integer> for &Integer {
            implIntMath!(body $func, $checked, $panic_msg, &Integer);
        }
        impl $($assign_trait)::*<Integer> for Integer {
            fn $assign_func(&mut self, rhs: Integer) {
                $($assign_trait)::*::$assign_func(self, &rhs);
            }
        }
        impl $($assign_trait)::*<&Integer> for Integer {
            fn $assign_func(&mut self, rhs: &Integer) {
                assert!(
                    self.width() >= rhs.width(),
                    "compound assignment from a wider value"
                );
                *self = self.$checked(rhs).expect($panic_msg);
            }
        }
    };
    (body $func:ident, $checked:ident, $panic_msg:literal, Integer) => {
        type Output = Integer;
        fn $func(self, rhs: Integer) -> Self::Output {
            self.$checked(&rhs).expect($panic_msg)
        }
    };
    (body $func:ident, $checked:ident, $panic_msg:literal, &Integer) => {
        type Output = Integer;
        fn $func(self, rhs: &Integer) -> Self::Output {
            self.$checked(rhs).expect($panic_msg)
        }
    };
}

implIntMath!(AddAssign, add_assign, Add, add, checked_add, "attempt to add with overflow");
implIntMath!(SubAssign, sub_assign, Sub, sub, checked_sub, "attempt to subtract with overflow");
implIntMath!(MulAssign, mul_assign, Mul, mul, checked_mul, "attempt to multiply with overflow");
implIntMath!(DivAssign, div_assign, Div, div, checked_div, "attempt to divide by zero");
implIntMath!(
    RemAssign,
    rem_assign,
    Rem,
    rem,
    checked_rem,
    "attempt to calculate the remainder with a divisor of zero"
);
