// SPDX-FileCopyrightText: 2024 Nils Jochem
// SPDX-License-Identifier: MPL-2.0
//! line-oriented calculator shell over [`Integer`]
//!
//! Reads commands from an input stream until end of input or an `exit` line,
//! evaluates them against the arithmetic core and a bounded bank of recent
//! results, and writes prompts, results and error reports to the output
//! stream.

use std::{
    collections::VecDeque,
    io::{self, BufRead, Write},
    sync::OnceLock,
};

use regex::Regex;
use tracing::{debug, instrument};

use crate::integer::{error::ArithmeticError, Integer, Width};

/// number of recent results addressable as `$1..$5`
pub const BANK_SIZE: usize = 5;
const PROMPT: &str = "> ";

/// Failures reported to the user at command scope.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermError {
    #[error("Invalid Command Format")]
    InvalidCommandFormat,
    #[error("Out Of Bank Range")]
    OutOfBankRange,
    #[error(transparent)]
    Arithmetic(#[from] ArithmeticError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Operand {
    Literal(String),
    Slot(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Bank,
    Query(usize),
    Factorial(Operand),
    Binary(Operand, BinOp, Operand),
}

static QUERY_RE: OnceLock<Regex> = OnceLock::new();
static FACTORIAL_RE: OnceLock<Regex> = OnceLock::new();
static BINARY_RE: OnceLock<Regex> = OnceLock::new();

fn query_re() -> &'static Regex {
    QUERY_RE.get_or_init(|| Regex::new(r"^\$([1-9])$").expect("query pattern is valid"))
}
fn factorial_re() -> &'static Regex {
    FACTORIAL_RE.get_or_init(|| {
        Regex::new(r"^(?:(\$[1-9])|(0|-?[1-9][0-9]*))!$").expect("factorial pattern is valid")
    })
}
fn binary_re() -> &'static Regex {
    BINARY_RE.get_or_init(|| {
        Regex::new(r"^((\$[1-9])|(0|-?[1-9][0-9]*))\s*([+\-*/%])\s*((\$[1-9])|(0|-?[1-9][0-9]*))$")
            .expect("binary pattern is valid")
    })
}

fn operand(caps: &regex::Captures<'_>, slot: usize, literal: usize) -> Operand {
    match caps.get(slot) {
        Some(reference) => Operand::Slot(
            reference.as_str()[1..]
                .parse()
                .unwrap_or_else(|_| unreachable!("the pattern admits a single digit")),
        ),
        None => Operand::Literal(caps[literal].to_owned()),
    }
}

fn parse_command(cmd: &str) -> Result<Command, TermError> {
    if cmd == "bank" {
        return Ok(Command::Bank);
    }
    if let Some(caps) = query_re().captures(cmd) {
        return Ok(Command::Query(
            caps[1].parse().unwrap_or_else(|_| unreachable!("single digit")),
        ));
    }
    if cmd.contains('!') {
        let caps = factorial_re()
            .captures(cmd)
            .ok_or(TermError::InvalidCommandFormat)?;
        return Ok(Command::Factorial(operand(&caps, 1, 2)));
    }
    let caps = binary_re()
        .captures(cmd)
        .ok_or(TermError::InvalidCommandFormat)?;
    let op = match &caps[4] {
        "+" => BinOp::Add,
        "-" => BinOp::Sub,
        "*" => BinOp::Mul,
        "/" => BinOp::Div,
        "%" => BinOp::Rem,
        other => unreachable!("operator class admits no {other}"),
    };
    Ok(Command::Binary(operand(&caps, 2, 3), op, operand(&caps, 6, 7)))
}

/// Shell state: the working width and the bank of recent results.
pub struct Term {
    width: Width,
    bank: VecDeque<Integer>,
}

impl Term {
    pub fn new(width: Width) -> Self {
        Self {
            width,
            bank: VecDeque::with_capacity(BANK_SIZE),
        }
    }

    /// drive the read-eval-print loop until end of input or an `exit` line
    #[instrument(skip(input, output))]
    pub fn run(width: Width, input: impl BufRead, mut output: impl Write) -> io::Result<()> {
        let mut term = Self::new(width);
        Self::prompt(&mut output)?;
        for line in input.lines() {
            let line = line?;
            let cmd = line.trim();

            // both checks predate the trim: a padded "  exit  " line is
            // treated as a command, not as an exit
            if line.is_empty() {
                Self::prompt(&mut output)?;
                continue;
            }
            if line == "exit" {
                break;
            }

            match term.eval(cmd) {
                Ok(lines) => {
                    for result in lines {
                        writeln!(output, "{result}")?;
                    }
                }
                Err(err) => {
                    debug!(%err, cmd, "command failed");
                    writeln!(output, "[ERROR] {err}")?;
                }
            }
            Self::prompt(&mut output)?;
        }
        Ok(())
    }

    fn prompt(output: &mut impl Write) -> io::Result<()> {
        write!(output, "{PROMPT}")?;
        output.flush()
    }

    fn eval(&mut self, cmd: &str) -> Result<Vec<String>, TermError> {
        let command = parse_command(cmd)?;
        debug!(?command, "parsed command");
        match command {
            Command::Bank => Ok(self
                .bank
                .iter()
                .enumerate()
                .map(|(i, value)| format!("${} = {value}", i + 1))
                .collect()),
            Command::Query(slot) => {
                let value = self.lookup(slot)?;
                Ok(vec![format!("${slot} = {value}")])
            }
            Command::Factorial(operand) => {
                let result = self.resolve(&operand)?.factorial()?;
                Ok(vec![self.save(result)])
            }
            Command::Binary(lhs, op, rhs) => {
                let lhs = self.resolve(&lhs)?;
                let rhs = self.resolve(&rhs)?;
                let result = match op {
                    BinOp::Add => lhs.checked_add(&rhs),
                    BinOp::Sub => lhs.checked_sub(&rhs),
                    BinOp::Mul => lhs.checked_mul(&rhs),
                    BinOp::Div => lhs.checked_div(&rhs),
                    BinOp::Rem => lhs.checked_rem(&rhs),
                }?;
                Ok(vec![self.save(result)])
            }
        }
    }

    fn lookup(&self, slot: usize) -> Result<Integer, TermError> {
        self.bank
            .get(slot - 1)
            .cloned()
            .ok_or(TermError::OutOfBankRange)
    }

    fn resolve(&self, operand: &Operand) -> Result<Integer, TermError> {
        match operand {
            Operand::Slot(slot) => self.lookup(*slot),
            Operand::Literal(literal) => Ok(Integer::parse(self.width, literal)?),
        }
    }

    /// store a result at `$1`, evicting the oldest slot when full
    fn save(&mut self, result: Integer) -> String {
        if self.bank.len() >= BANK_SIZE {
            self.bank.pop_back();
        }
        self.bank.push_front(result);
        format!("$1 = {}", self.bank[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_session(width: Width, input: &str) -> String {
        let mut output = Vec::new();
        Term::run(width, input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn bank_keeps_most_recent_first() {
        let out = run_session(Width::Unlimited, "5 + 3\n$1 * 2\nbank\nexit\n");
        assert_eq!(out, "> $1 = 8\n> $1 = 16\n> $1 = 16\n$2 = 8\n> ");
    }

    #[test]
    fn factorial_command() {
        let out = run_session(Width::Unlimited, "6!\nexit\n");
        assert_eq!(out, "> $1 = 720\n> ");
    }

    #[test]
    fn factorial_of_bank_slot() {
        let out = run_session(Width::Unlimited, "3 + 3\n$1!\nexit\n");
        assert_eq!(out, "> $1 = 6\n> $1 = 720\n> ");
    }

    #[test]
    fn division_by_zero_is_reported() {
        let out = run_session(Width::Unlimited, "1 / 0\nexit\n");
        assert_eq!(out, "> [ERROR] Division By Zero\n> ");
    }

    #[test]
    fn out_of_bank_range() {
        let out = run_session(Width::Unlimited, "$9\nexit\n");
        assert_eq!(out, "> [ERROR] Out Of Bank Range\n> ");
        let out = run_session(Width::Unlimited, "5 + 3\n$2 + 1\nexit\n");
        assert_eq!(out, "> $1 = 8\n> [ERROR] Out Of Bank Range\n> ");
    }

    #[test]
    fn query_prints_without_saving() {
        let out = run_session(Width::Unlimited, "5 + 3\n2 + 2\n$2\nbank\nexit\n");
        assert_eq!(
            out,
            "> $1 = 8\n> $1 = 4\n> $2 = 8\n> $1 = 4\n$2 = 8\n> "
        );
    }

    #[test]
    fn invalid_commands() {
        for cmd in ["foo", "1 +", "+ 1", "1 ** 2", "01 + 1", "$0 + 1", "(1) + 2", "1 + 2 + 3"] {
            let out = run_session(Width::Unlimited, &format!("{cmd}\nexit\n"));
            assert_eq!(out, "> [ERROR] Invalid Command Format\n> ", "for {cmd:?}");
        }
    }

    #[test]
    fn whitespace_around_operator() {
        let out = run_session(Width::Unlimited, "4+4\n4   *   4\nexit\n");
        assert_eq!(out, "> $1 = 8\n> $1 = 16\n> ");
    }

    #[test]
    fn negative_literals() {
        let out = run_session(Width::Unlimited, "-5 + 3\n0 - -7\nexit\n");
        assert_eq!(out, "> $1 = -2\n> $1 = 7\n> ");
    }

    #[test]
    fn empty_lines_reprompt() {
        let out = run_session(Width::Unlimited, "\n\n1 + 1\nexit\n");
        assert_eq!(out, "> > > $1 = 2\n> ");
    }

    #[test]
    fn padded_exit_is_not_exit() {
        let out = run_session(Width::Unlimited, "  exit  \n");
        assert_eq!(out, "> [ERROR] Invalid Command Format\n> ");
    }

    #[test]
    fn bank_evicts_oldest() {
        let input = "1 + 0\n2 + 0\n3 + 0\n4 + 0\n5 + 0\n6 + 0\nbank\nexit\n";
        let out = run_session(Width::Unlimited, input);
        let bank_section = out.rsplit("> ").nth(1).unwrap();
        assert_eq!(bank_section, "$1 = 6\n$2 = 5\n$3 = 4\n$4 = 3\n$5 = 2\n");
    }

    #[test]
    fn failed_commands_store_nothing() {
        let out = run_session(Width::Unlimited, "1 / 0\nbank\nexit\n");
        assert_eq!(out, "> [ERROR] Division By Zero\n> > ");
    }

    #[test]
    fn fixed_width_overflow_is_reported() {
        let out = run_session(Width::Fixed(4), "2147483647 + 1\nexit\n");
        assert_eq!(out, "> [ERROR] Overflow Detected [-2147483648]\n> ");
    }

    #[test]
    fn fixed_width_parse_overflow_is_reported() {
        let out = run_session(Width::Fixed(4), "2147483648 + 0\nexit\n");
        assert!(out.starts_with("> [ERROR] Overflow Detected ["), "{out:?}");
    }

    #[test]
    fn unlimited_width_never_overflows() {
        let out = run_session(Width::Unlimited, "2147483647 + 1\nexit\n");
        assert_eq!(out, "> $1 = 2147483648\n> ");
    }

    #[test]
    fn ends_at_end_of_input() {
        let out = run_session(Width::Unlimited, "1 + 1\n");
        assert_eq!(out, "> $1 = 2\n> ");
    }

    #[test]
    fn parse_command_grammar() {
        assert_eq!(parse_command("bank"), Ok(Command::Bank));
        assert_eq!(
            parse_command("$3!"),
            Ok(Command::Factorial(Operand::Slot(3)))
        );
        assert_eq!(
            parse_command("-12 % $1"),
            Ok(Command::Binary(
                Operand::Literal("-12".to_owned()),
                BinOp::Rem,
                Operand::Slot(1)
            ))
        );
        assert!(parse_command("5!!").is_err());
        assert!(parse_command("$10").is_err());
        assert!(parse_command("-0 + 1").is_err());
    }
}
