//! Types and API for matching.
//!
//! This module defines the [`Regex`] facade, a thin wrapper around a
//! compiled [`Program`] and the [`simulator`], plus [`match_pattern`], the
//! raw sentinel-encoded contract for callers that want the three-outcome
//! tuple convention directly instead of `Result`/`Option`.

use crate::compiler;
use crate::error::CompileError;
use crate::program::Program;
use crate::simulator;

pub use crate::simulator::Span;

/// Reported as `end` when [`match_pattern`] is called with empty input.
/// Distinct from `0` (reserved for "no match") and from every `-errcode`
/// a pattern error can produce (`errcode` ranges 1..=5).
pub const STRING_EMPTY_ERROR: isize = -6;

/// A compiled pattern, ready to match repeatedly without recompiling.
pub struct Regex {
    program: Program,
}

impl Regex {
    /// Compile `pattern`, or report the first byte that made it ill-formed.
    pub fn new(pattern: &str) -> Result<Self, CompileError> {
        Ok(Self { program: compiler::compile(pattern)? })
    }

    /// Match against `input`, returning the leftmost match if any. Empty
    /// input never matches.
    pub fn find(&self, input: &[u8]) -> Option<Span> {
        if input.is_empty() {
            return None;
        }
        simulator::run(&self.program, input)
    }

    /// Returns whether `input` matches, without computing match bounds.
    /// Equivalent to `self.find(input).is_some()`.
    pub fn is_match(&self, input: &[u8]) -> bool {
        self.find(input).is_some()
    }

    /// `T`: the number of real instructions in the compiled program.
    pub fn token_count(&self) -> usize {
        self.program.token_count()
    }

    /// `G`: the number of groups (including classes) the pattern declared.
    pub fn group_count(&self) -> usize {
        self.program.group_count()
    }
}

/// The raw external contract: compile `pattern`, match it against `input`,
/// and report the outcome as a `(start, end)` pair using the sentinel
/// conventions:
///
/// - Match: `start >= 0`, `end > start`, `input[start..end]` is the
///   leftmost match.
/// - No match: `(-1, 0)`.
/// - Empty input: `(-1, STRING_EMPTY_ERROR)`.
/// - Pattern error: `(-pos - 1, -errcode)`, where `pos` is the byte offset
///   the compiler first rejected and `errcode` is one of the five
///   [`crate::error::ErrorCode`] values.
pub fn match_pattern(pattern: &str, input: &[u8]) -> (isize, isize) {
    let program = match compiler::compile(pattern) {
        Ok(program) => program,
        Err(e) => return (-(e.position as isize) - 1, -(e.code.code() as isize)),
    };
    if input.is_empty() {
        return (-1, STRING_EMPTY_ERROR);
    }
    match simulator::run(&program, input) {
        Some(span) => (span.start as isize, span.end as isize),
        None => (-1, 0),
    }
}
