//! A small text protocol for driving an [`OSAvlSet`] from line-oriented input.
//!
//! Each line is a sequence of whitespace-separated commands:
//!
//! - `k <int>` inserts a key
//! - `q <int> <int>` writes `count_in_range(a, b)` followed by a newline
//!
//! # Examples
//!
//! ```
//! use osavl_tree::command::Interpreter;
//!
//! let mut interpreter = Interpreter::new();
//! let mut out = String::new();
//! interpreter.execute("k 10 k 20 q 8 31 q 6 9", &mut out).unwrap();
//! assert_eq!(out, "2\n0\n");
//! ```

use alloc::string::{String, ToString};
use core::fmt::{self, Write};
use core::num::ParseIntError;
use core::str::SplitWhitespace;

use crate::OSAvlSet;
use crate::error::Error;

/// Errors produced while interpreting a command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommandError {
    /// A token that is neither `k` nor `q` appeared in command position.
    UnknownCommand(String),
    /// The line ended before a command received all of its operands.
    MissingOperand { command: &'static str },
    /// An operand could not be parsed as an `i64`.
    InvalidInteger { token: String, source: ParseIntError },
    /// The set rejected an insertion.
    Tree(Error),
    /// The output sink failed.
    Output,
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCommand(token) => write!(f, "unknown command `{token}`"),
            Self::MissingOperand { command } => write!(f, "`{command}` is missing an operand"),
            Self::InvalidInteger { token, source } => write!(f, "`{token}` is not an integer: {source}"),
            Self::Tree(err) => write!(f, "{err}"),
            Self::Output => f.write_str("failed to write output"),
        }
    }
}

impl core::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidInteger { source, .. } => Some(source),
            Self::Tree(err) => Some(err),
            _ => None,
        }
    }
}

impl From<Error> for CommandError {
    fn from(err: Error) -> Self {
        Self::Tree(err)
    }
}

impl From<fmt::Error> for CommandError {
    fn from(_: fmt::Error) -> Self {
        Self::Output
    }
}

/// Executes command lines against an owned [`OSAvlSet`].
#[derive(Clone, Debug, Default)]
pub struct Interpreter {
    set: OSAvlSet,
}

impl Interpreter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs every command on `line`, writing query answers to `out`.
    ///
    /// Commands before a malformed one have already taken effect when the error is returned.
    ///
    /// # Errors
    ///
    /// See [`CommandError`].
    pub fn execute<W: Write>(&mut self, line: &str, out: &mut W) -> Result<(), CommandError> {
        let mut tokens = line.split_whitespace();
        while let Some(command) = tokens.next() {
            match command {
                "k" => {
                    let key = operand(&mut tokens, "k")?;
                    self.set.insert(key)?;
                }
                "q" => {
                    let a = operand(&mut tokens, "q")?;
                    let b = operand(&mut tokens, "q")?;
                    writeln!(out, "{}", self.set.count_in_range(a, b))?;
                }
                other => return Err(CommandError::UnknownCommand(other.to_string())),
            }
        }
        Ok(())
    }

    /// The set built up so far.
    #[must_use]
    pub fn set(&self) -> &OSAvlSet {
        &self.set
    }

    #[must_use]
    pub fn into_set(self) -> OSAvlSet {
        self.set
    }
}

fn operand(tokens: &mut SplitWhitespace<'_>, command: &'static str) -> Result<i64, CommandError> {
    let token = tokens.next().ok_or(CommandError::MissingOperand { command })?;
    token.parse().map_err(|source| CommandError::InvalidInteger {
        token: token.to_string(),
        source,
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(lines: &[&str]) -> (Interpreter, String) {
        let mut interpreter = Interpreter::new();
        let mut out = String::new();
        for line in lines {
            interpreter.execute(line, &mut out).unwrap();
        }
        (interpreter, out)
    }

    #[test]
    fn queries_span_lines() {
        let (interpreter, out) = run(&["k 10 k 20 q 8 31", "q 6 9 k 30 k 40", "q 15 40 q 40 15"]);
        assert_eq!(out, "2\n0\n3\n0\n");
        assert_eq!(interpreter.set().len(), 4);
        assert_eq!(interpreter.into_set().rank(25), 2);
    }

    #[test]
    fn blank_lines_do_nothing() {
        let (interpreter, out) = run(&["", "   \t "]);
        assert_eq!(out, "");
        assert!(interpreter.set().is_empty());
    }

    #[test]
    fn duplicates_and_negative_keys() {
        let (_, out) = run(&["k -5 k -5 k 0 q -10 0"]);
        assert_eq!(out, "2\n");
    }

    #[test]
    fn malformed_input() {
        let mut interpreter = Interpreter::new();
        let mut out = String::new();

        assert_eq!(
            interpreter.execute("k 1 x 2", &mut out),
            Err(CommandError::UnknownCommand("x".to_string()))
        );
        // The insertion before the bad token stuck.
        assert!(interpreter.set().contains(1));

        assert_eq!(interpreter.execute("q 1", &mut out), Err(CommandError::MissingOperand { command: "q" }));
        assert_eq!(interpreter.execute("k", &mut out), Err(CommandError::MissingOperand { command: "k" }));

        let err = interpreter.execute("k ten", &mut out).unwrap_err();
        assert!(matches!(&err, CommandError::InvalidInteger { token, .. } if token == "ten"));
        assert!(err.to_string().starts_with("`ten` is not an integer"));
        assert_eq!(out, "");
    }
}
