// SPDX-FileCopyrightText: 2024 Nils Jochem
// SPDX-License-Identifier: MPL-2.0
use std::io;

use anyhow::Result;
use clap::Parser;

use mparith::{showcase, term::Term, Width};

/// Multi-precision signed integer calculator.
#[derive(Debug, Parser)]
#[command(name = "mpcalc", about = "Multi-precision integer calculator")]
struct Args {
    /// 1: terminal at unlimited precision, 2: terminal at 32 byte precision,
    /// 3: library showcase
    #[arg(value_parser = clap::value_parser!(u8).range(1..=3))]
    mode: u8,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    match args.mode {
        1 => Term::run(Width::Unlimited, io::stdin().lock(), io::stdout().lock())?,
        2 => Term::run(Width::Fixed(32), io::stdin().lock(), io::stdout().lock())?,
        3 => showcase::run(io::stdout().lock())?,
        mode => unreachable!("clap rejects mode {mode}"),
    }
    Ok(())
}
