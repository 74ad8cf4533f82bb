//! `tinygrep PATTERN FILE...`
//!
//! Compiles `PATTERN` once, then matches it against each file's raw bytes,
//! printing one `path:start:end: slice` line per match. This is the
//! external collaborator spec.md describes as a contract, not part of the
//! core: no directory walking, no flags, no preprocessing of the pattern.

use std::io::{self, Write};
use std::process::ExitCode;

use tinygrex::Regex;

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(pattern) = args.next() else {
        eprintln!("usage: tinygrep PATTERN FILE...");
        return ExitCode::FAILURE;
    };
    let files: Vec<String> = args.collect();

    let re = match Regex::new(&pattern) {
        Ok(re) => re,
        Err(e) => {
            eprintln!("tinygrep: {e}");
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut ok = true;
    for path in &files {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                eprintln!("tinygrep: {path}: {e}");
                ok = false;
                continue;
            }
        };
        if let Some(span) = re.find(&bytes) {
            let slice = String::from_utf8_lossy(&bytes[span.start..span.end]);
            let _ = writeln!(out, "{path}:{}:{}: {slice}", span.start, span.end);
        }
    }

    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
