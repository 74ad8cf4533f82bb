//! Recursive-descent reader for the pattern language.
//!
//! Produces an [`Ast`] together with the token/group counts the compiler
//! needs, or a [`CompileError`] at the first offending byte. This is
//! spec.md's "count-and-validate" pass and the structural part of "layout"
//! fused together: since the tree is built directly (rather than writing a
//! flat array in a first blind pass), counting falls out of walking the
//! tree once the compiler runs, and there is no index bookkeeping to
//! maintain here at all.

use crate::error::{CompileError, ErrorCode};

/// A parsed pattern, ready for [`crate::compiler::compile`].
#[derive(Debug, Clone)]
pub enum Ast {
    /// A single literal byte.
    Literal(u8),
    /// `.`
    Dot,
    /// `[...]`, a disjunction of literal bytes.
    Class(Vec<u8>),
    /// `(...)`, grouping for precedence only.
    Group(Box<Ast>),
    /// `{...}`, negates success/failure of the body.
    Negate(Box<Ast>),
    /// `X*`
    Star(Box<Ast>),
    /// `X?`
    Opt(Box<Ast>),
    /// `X|Y`
    Alt(Box<Ast>, Box<Ast>),
    /// A sequence of items, read left to right.
    Concat(Vec<Ast>),
}

/// Number of groups contributed by a parsed node: every [`Ast::Group`],
/// [`Ast::Negate`] and [`Ast::Class`] counts as one, recursively. Mirrors
/// spec.md §4.1: "`(...)` and `{...}` contribute one group and no tokens
/// beyond their content" and "[Character classes] count ... the class as
/// one group".
fn group_count(ast: &Ast) -> usize {
    match ast {
        Ast::Literal(_) | Ast::Dot => 0,
        Ast::Class(_) => 1,
        Ast::Group(inner) | Ast::Negate(inner) => 1 + group_count(inner),
        Ast::Star(inner) | Ast::Opt(inner) => group_count(inner),
        Ast::Alt(a, b) => group_count(a) + group_count(b),
        Ast::Concat(items) => items.iter().map(group_count).sum(),
    }
}

/// Number of instructions a parsed node compiles to, *before* modifier
/// hoisting adds one synthetic instruction per `Star`/`Opt`/`Alt`.
pub fn token_count(ast: &Ast) -> usize {
    match ast {
        Ast::Literal(_) | Ast::Dot => 1,
        Ast::Class(members) => members.len(),
        Ast::Group(inner) | Ast::Negate(inner) => token_count(inner),
        Ast::Star(inner) | Ast::Opt(inner) => 1 + token_count(inner),
        Ast::Alt(a, b) => 1 + token_count(a) + token_count(b),
        Ast::Concat(items) => items.iter().map(token_count).sum(),
    }
}

pub fn group_count_of(ast: &Ast) -> usize {
    group_count(ast)
}

/// Parse `pattern` into an [`Ast`], or report the first offending byte.
pub fn parse(pattern: &str) -> Result<Ast, CompileError> {
    let bytes = pattern.as_bytes();
    if bytes.is_empty() {
        return Err(CompileError::new(0, ErrorCode::NoTokens));
    }
    let mut p = Parser { bytes, pos: 0 };
    let items = p.parse_sequence(None)?;
    // A top-level parse always runs to EOF: `parse_sequence` only stops
    // early on its expected closer, and the top level has none.
    debug_assert_eq!(p.pos, bytes.len());
    Ok(Ast::Concat(items))
}

struct Parser<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        Some(c)
    }

    fn err(&self, code: ErrorCode) -> CompileError {
        CompileError::new(self.pos, code)
    }

    /// Parse items until `closer` is seen (left unconsumed) or, if `closer`
    /// is `None`, until end of input.
    fn parse_sequence(&mut self, closer: Option<u8>) -> Result<Vec<Ast>, CompileError> {
        let mut items = Vec::new();
        loop {
            match self.peek() {
                None => break,
                Some(c) if Some(c) == closer => break,
                _ => items.push(self.parse_item()?),
            }
        }
        Ok(items)
    }

    /// One atom, optionally followed by a single hoisted modifier.
    fn parse_item(&mut self) -> Result<Ast, CompileError> {
        let atom = self.parse_atom()?;
        match self.peek() {
            Some(b'*') => {
                self.advance();
                Ok(Ast::Star(Box::new(atom)))
            }
            Some(b'?') => {
                self.advance();
                Ok(Ast::Opt(Box::new(atom)))
            }
            Some(b'|') => {
                self.advance();
                // The right-hand side is itself a full item: `a|b*` is
                // `Alt(a, Star(b))`, not `Star(Alt(a, b))` — the modifier
                // binds to the atom immediately to its left, same as
                // everywhere else in this grammar.
                let rhs = self.parse_item()?;
                Ok(Ast::Alt(Box::new(atom), Box::new(rhs)))
            }
            _ => Ok(atom),
        }
    }

    /// A single token, character class, or parenthesized/braced group.
    /// Never an empty production: callers rely on `parse_atom` consuming
    /// at least one byte or returning an error.
    fn parse_atom(&mut self) -> Result<Ast, CompileError> {
        match self.peek() {
            None | Some(b')') | Some(b']') | Some(b'}') | Some(b'*') | Some(b'?') | Some(b'|') => {
                Err(self.err(ErrorCode::BadSyntax))
            }
            Some(b'.') => {
                self.advance();
                Ok(Ast::Dot)
            }
            Some(b'[') => self.parse_class(),
            Some(b'(') => self.parse_group(b'(', b')', Ast::Group as fn(Box<Ast>) -> Ast),
            Some(b'{') => self.parse_group(b'{', b'}', Ast::Negate as fn(Box<Ast>) -> Ast),
            Some(other) => {
                self.advance();
                Ok(Ast::Literal(other))
            }
        }
    }

    fn parse_group(
        &mut self,
        open: u8,
        close: u8,
        wrap: fn(Box<Ast>) -> Ast,
    ) -> Result<Ast, CompileError> {
        debug_assert_eq!(self.peek(), Some(open));
        self.advance();
        let items = self.parse_sequence(Some(close))?;
        if self.peek() != Some(close) {
            return Err(self.err(ErrorCode::UnclosedGroup));
        }
        let close_pos = self.pos;
        self.advance();
        if items.is_empty() {
            return Err(CompileError::new(close_pos, ErrorCode::EmptyGroup));
        }
        Ok(wrap(Box::new(Ast::Concat(items))))
    }

    fn parse_class(&mut self) -> Result<Ast, CompileError> {
        debug_assert_eq!(self.peek(), Some(b'['));
        self.advance();
        let mut members = Vec::new();
        loop {
            match self.peek() {
                None => return Err(self.err(ErrorCode::UnterminatedClass)),
                Some(b']') => break,
                Some(byte) => {
                    members.push(byte);
                    self.advance();
                }
            }
        }
        let close_pos = self.pos;
        self.advance();
        if members.is_empty() {
            return Err(CompileError::new(close_pos, ErrorCode::EmptyGroup));
        }
        Ok(Ast::Class(members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_ok(pattern: &str) -> Ast {
        parse(pattern).unwrap_or_else(|e| panic!("expected {pattern:?} to parse, got {e:?}"))
    }

    fn parse_err(pattern: &str) -> CompileError {
        parse(pattern).expect_err("expected a parse error")
    }

    #[test]
    fn empty_pattern_is_no_tokens() {
        let e = parse_err("");
        assert_eq!(e.code, ErrorCode::NoTokens);
        assert_eq!(e.position, 0);
    }

    #[test]
    fn leading_star_is_bad_syntax() {
        let e = parse_err("*abc");
        assert_eq!(e.code, ErrorCode::BadSyntax);
        assert_eq!(e.position, 0);
    }

    #[test]
    fn unclosed_paren_reports_eof_position() {
        let e = parse_err("abc(");
        assert_eq!(e.code, ErrorCode::UnclosedGroup);
        assert_eq!(e.position, 4);
    }

    #[test]
    fn empty_group_reports_closer_position() {
        let e = parse_err("abc()");
        assert_eq!(e.code, ErrorCode::EmptyGroup);
        assert_eq!(e.position, 4);
    }

    #[test]
    fn unterminated_class() {
        let e = parse_err("[ab");
        assert_eq!(e.code, ErrorCode::UnterminatedClass);
    }

    #[test]
    fn empty_class_and_empty_negation() {
        assert_eq!(parse_err("a[]b").code, ErrorCode::EmptyGroup);
        assert_eq!(parse_err("a{}b").code, ErrorCode::EmptyGroup);
    }

    #[test]
    fn trailing_pipe_is_bad_syntax() {
        assert_eq!(parse_err("a|").code, ErrorCode::BadSyntax);
    }

    #[test]
    fn close_after_pipe_is_bad_syntax() {
        assert_eq!(parse_err("a|)").code, ErrorCode::BadSyntax);
    }

    #[test]
    fn stray_closer_is_bad_syntax() {
        assert_eq!(parse_err("a)").code, ErrorCode::BadSyntax);
        assert_eq!(parse_err("a]").code, ErrorCode::BadSyntax);
    }

    #[test]
    fn nested_groups_parse() {
        match parse_ok("(a(bc)?)|d") {
            Ast::Concat(items) => assert_eq!(items.len(), 1),
            other => panic!("expected a single top-level item, got {other:?}"),
        }
    }

    #[test]
    fn counts_class_members_as_tokens_and_one_group() {
        let ast = parse_ok("[abc]");
        assert_eq!(token_count(&ast), 3);
        assert_eq!(group_count_of(&ast), 1);
    }
}
