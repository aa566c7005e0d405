// SPDX-FileCopyrightText: 2024 Nils Jochem
// SPDX-License-Identifier: MPL-2.0
//! scripted tour of the library API, run as mode 3 of `mpcalc`

use std::io::{self, Write};

use crate::integer::{Integer, Width};

/// print a fixed set of sample computations to `output`
pub fn run(mut output: impl Write) -> io::Result<()> {
    let fixed = Width::Fixed(4);

    writeln!(output, "mparith library showcase")?;
    writeln!(output)?;

    writeln!(output, "fixed 4-byte arithmetic:")?;
    let a = demo(fixed, "-123456");
    let b = demo(fixed, "678");
    writeln!(output, "  {a} + {b} = {}", &a + &b)?;
    writeln!(output, "  {a} - {b} = {}", &a - &b)?;
    writeln!(output, "  {a} * {b} = {}", &a * &b)?;
    writeln!(output, "  {a} / {b} = {}", &a / &b)?;
    writeln!(output, "  {a} % {b} = {}", &a % &b)?;
    let twelve = demo(fixed, "12");
    writeln!(output, "  {twelve}! = {}", twelve.factorial().expect("12! fits 32 bits"))?;
    writeln!(output)?;

    writeln!(output, "fixed widths overflow:")?;
    let max = demo(fixed, "2147483647");
    let one = Integer::one(fixed);
    match max.checked_add(&one) {
        Ok(sum) => writeln!(output, "  {max} + 1 = {sum}")?,
        Err(err) => writeln!(output, "  {max} + 1 -> {err}")?,
    }
    let big = demo(fixed, "-1234567890");
    match big.checked_mul(&big) {
        Ok(product) => writeln!(output, "  {big} * {big} = {product}")?,
        Err(err) => writeln!(output, "  {big} * {big} -> {err}")?,
    }
    writeln!(output)?;

    writeln!(output, "widening to unlimited recovers the result:")?;
    let wide = big.widen(Width::Unlimited);
    writeln!(output, "  {wide} * {wide} = {}", &wide * &wide)?;
    writeln!(output)?;

    writeln!(output, "unlimited precision:")?;
    let a = demo(Width::Unlimited, "-123456789123456789123456789123456789");
    let b = demo(Width::Unlimited, "987654321987654321987654321");
    writeln!(output, "  {a} * {b}\n    = {}", &a * &b)?;
    let thirty = demo(Width::Unlimited, "30");
    writeln!(output, "  {thirty}! = {}", thirty.factorial().expect("unlimited factorial"))?;

    Ok(())
}

fn demo(width: Width, literal: &str) -> Integer {
    Integer::parse(width, literal).expect("showcase literals are valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_the_script() {
        let mut out = Vec::new();
        run(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("-123456 * 678 = -83703168"), "{text}");
        assert!(text.contains("2147483647 + 1 -> Overflow Detected [-2147483648]"), "{text}");
        assert!(text.contains("1524157875019052100"), "{text}");
        assert!(text.contains("30! = 265252859812191058636308480000000"), "{text}");
    }
}
