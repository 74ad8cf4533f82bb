//! # tinygrex
//!
//! **tinygrex** is a compact, backtracking-free matcher for a small,
//! anchored regular-expression language: `. * ? | ( ) [ ] { }`, where
//! `{...}` negates the success/failure of whatever it wraps rather than
//! counting repetitions.
//!
//! ## Usage
//!
//! ```rust
//! use tinygrex::Regex;
//!
//! let re = Regex::new(".*end{.}").unwrap();
//! assert!(re.is_match(b" does it ever end"));
//! assert!(!re.is_match(b"end of the road"));
//! ```
//!
//! ## How it works
//!
//! - [`compiler`] turns a pattern into a flat [`program::Program`]: four
//!   parallel arrays (`tok`, `js`, `jf`, `ji`) describing one instruction
//!   per character-matching decision, with jump targets already resolved.
//! - [`simulator`] advances that program against the input one byte at a
//!   time, running every live thread in lock-step (no backtracking) and
//!   reporting the leftmost match.
//! - [`regex`] is the ergonomic facade (`Regex::new`/`find`/`is_match`)
//!   plus the raw sentinel-encoded `match_pattern` contract.
//!
//! ## Crate organization
//!
//! - `regex`: public API and the sentinel-encoded external contract
//! - `parser`: pattern -> validated tree
//! - `compiler`: tree -> flat program
//! - `program`: the flat four-array representation
//! - `simulator`: the two-stack thread scheduler
//! - `error`: the compile-error taxonomy
//!
//! ## License
//!
//! Licensed under MIT or Apache-2.0.

pub mod compiler;
pub mod error;
pub mod parser;
pub mod program;
pub mod regex;
pub mod simulator;

pub use error::{CompileError, ErrorCode};
pub use regex::{Regex, STRING_EMPTY_ERROR, Span, match_pattern};
