// SPDX-FileCopyrightText: 2024 Nils Jochem
// SPDX-License-Identifier: MPL-2.0
pub mod integer;
pub mod showcase;
pub mod term;

pub use integer::{error::ArithmeticError, Integer, Width};

mod util {
    pub mod rng;
}
