// SPDX-FileCopyrightText: 2024 Nils Jochem
// SPDX-License-Identifier: MPL-2.0
use super::Integer;

/// Failures surfaced by the arithmetic core.
///
/// The core performs no local recovery; callers decide whether to unwrap or
/// report. The messages double as the user-facing text of the shell.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArithmeticError {
    /// a fixed-width result wrapped; carries the wrapped value for diagnostics
    #[error("Overflow Detected [{0}]")]
    Overflow(Integer),
    #[error("Division By Zero")]
    DivisionByZero,
    #[error("Factorial Of Negative Number")]
    NegativeFactorial,
    /// decimal parse rejected a character outside `[+-]?[0-9]+`
    #[error("Invalid Digit '{digit}' At Position {position}")]
    InvalidDigit { digit: char, position: usize },
    /// decimal parse received no digits
    #[error("Empty Number Literal")]
    Empty,
}
