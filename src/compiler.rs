//! `Ast` -> [`Program`], spec.md §4.1's "layout" and "wiring" passes fused
//! into a single recursive walk.
//!
//! Grounded in the teacher's `thompson::bytecode::Compiler::compile_internal`:
//! track the current program counter, push instructions as they're decided,
//! and leave a small list of "still open" jump slots for the caller to fill
//! in once the next instruction's address is known. Because the hoisted
//! `*` for `X*`/`X?`/`X|Y` is emitted *before* recursing into the body, the
//! body's final address is always known by construction — there is no need
//! for spec.md's "post-correction of every already-recorded `next[g']`";
//! that bookkeeping was a consequence of writing the flat array once,
//! blindly, before modifiers were known. Building the tree first removes
//! the problem instead of solving it, which spec.md §9 explicitly allows
//! ("a re-implementation may equivalently define a single instruction
//! record type ... so long as the wiring semantics and sentinels are
//! preserved").

use crate::error::CompileError;
use crate::parser::{self, Ast};
use crate::program::{JI_CLASS_INTERIOR, JI_CLASS_LAST, JI_NORMAL, Program};

/// A jump field still waiting for its target address.
#[derive(Clone, Copy)]
enum Slot {
    Success(usize),
    Failure(usize),
}

impl Slot {
    fn flip(self) -> Slot {
        match self {
            Slot::Success(i) => Slot::Failure(i),
            Slot::Failure(i) => Slot::Success(i),
        }
    }
}

/// The result of compiling one `Ast` node: where execution enters it, and
/// which fields still need patching once the caller knows what comes next.
struct Fragment {
    start: usize,
    out: Vec<Slot>,
}

fn patch(program: &mut Program, out: &[Slot], target: isize) {
    for slot in out {
        match *slot {
            Slot::Success(i) => program.js[i] = target,
            Slot::Failure(i) => program.jf[i] = target,
        }
    }
}

/// Compile `pattern` into a flat [`Program`], or report the first byte
/// that made it ill-formed.
pub fn compile(pattern: &str) -> Result<Program, CompileError> {
    let ast = parser::parse(pattern)?;
    let mut program = Program::new();
    program.group_count = parser::group_count_of(&ast);
    let frag = compile_node(&mut program, &ast);
    let accept = program.accept();
    patch(&mut program, &frag.out, accept);
    #[cfg(debug_assertions)]
    program.check_invariants();
    Ok(program)
}

fn compile_node(program: &mut Program, ast: &Ast) -> Fragment {
    match ast {
        Ast::Literal(byte) => {
            let idx = program.push(*byte, JI_NORMAL);
            Fragment { start: idx, out: vec![Slot::Success(idx)] }
        }
        Ast::Dot => {
            let idx = program.push(b'.', JI_NORMAL);
            Fragment { start: idx, out: vec![Slot::Success(idx)] }
        }
        Ast::Class(members) => compile_class(program, members),
        // Groups contribute structure (already folded into `group_count`)
        // but no instructions of their own beyond their content.
        Ast::Group(inner) => compile_node(program, inner),
        Ast::Negate(inner) => compile_negate(program, inner),
        Ast::Star(inner) => compile_star(program, inner),
        Ast::Opt(inner) => compile_opt(program, inner),
        Ast::Alt(a, b) => compile_alt(program, a, b),
        Ast::Concat(items) => compile_concat(program, items),
    }
}

fn compile_class(program: &mut Program, members: &[u8]) -> Fragment {
    debug_assert!(!members.is_empty(), "empty classes are rejected by the parser");
    let mut idxs = Vec::with_capacity(members.len());
    for (i, &member) in members.iter().enumerate() {
        let ji = if i + 1 < members.len() { JI_CLASS_INTERIOR } else { JI_CLASS_LAST };
        let idx = program.push(member, ji);
        if let Some(&prev) = idxs.last() {
            // The interior member's failure edge falls through to the very
            // next member, which is already at a known address.
            program.jf[prev] = idx as isize;
        }
        idxs.push(idx);
    }
    // The last member's jf stays -1 (class fails entirely): the default
    // `Program::push` value is already correct, nothing to set.
    Fragment {
        start: idxs[0],
        out: idxs.iter().map(|&i| Slot::Success(i)).collect(),
    }
}

fn compile_negate(program: &mut Program, inner: &Ast) -> Fragment {
    let start_idx = program.tok.len();
    let frag = compile_node(program, inner);
    let end_idx = program.tok.len();
    // A single parity bit, applied as a post-pass over the range just
    // emitted: swap every (js, jf) pair written under this `{...}`. A
    // nested `{...}` will have already swapped its own sub-range once;
    // swapping the whole range again here cancels that back out, which is
    // exactly spec.md's "negation nests: even depth is identity".
    for i in start_idx..end_idx {
        let tmp = program.js[i];
        program.js[i] = program.jf[i];
        program.jf[i] = tmp;
    }
    Fragment {
        start: frag.start,
        out: frag.out.into_iter().map(Slot::flip).collect(),
    }
}

fn compile_star(program: &mut Program, inner: &Ast) -> Fragment {
    let branch = program.push(b'*', JI_NORMAL);
    let frag = compile_node(program, inner);
    program.js[branch] = frag.start as isize;
    // The body's exit loops back to the branch instead of falling through,
    // per spec.md: "redirect `after_body` to this instruction so that
    // after the body completes it loops back."
    patch(program, &frag.out, branch as isize);
    Fragment { start: branch, out: vec![Slot::Failure(branch)] }
}

fn compile_opt(program: &mut Program, inner: &Ast) -> Fragment {
    let branch = program.push(b'*', JI_NORMAL);
    let frag = compile_node(program, inner);
    program.js[branch] = frag.start as isize;
    // No loopback: the body's exit and the branch's failure edge both
    // fall through to whatever comes after, unpatched until now.
    let mut out = frag.out;
    out.push(Slot::Failure(branch));
    Fragment { start: branch, out }
}

fn compile_alt(program: &mut Program, left: &Ast, right: &Ast) -> Fragment {
    let branch = program.push(b'*', JI_NORMAL);
    let left_frag = compile_node(program, left);
    program.js[branch] = left_frag.start as isize;
    let right_frag = compile_node(program, right);
    program.jf[branch] = right_frag.start as isize;
    // The left alternative's exit must skip over the right alternative
    // entirely rather than falling into it, so both exits are left open
    // and patched together by whatever follows the whole `X|Y`.
    let mut out = left_frag.out;
    out.extend(right_frag.out);
    Fragment { start: branch, out }
}

fn compile_concat(program: &mut Program, items: &[Ast]) -> Fragment {
    let mut items = items.iter();
    let first = items.next().expect("empty sequences are rejected by the parser");
    let mut frag = compile_node(program, first);
    for item in items {
        let next_frag = compile_node(program, item);
        patch(program, &frag.out, next_frag.start as isize);
        frag = Fragment { start: frag.start, out: next_frag.out };
    }
    frag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::program::JI_NORMAL as NORMAL;

    #[test]
    fn literal_wires_reject_on_mismatch() {
        let program = compile("a").unwrap();
        assert_eq!(program.tok, vec![b'a']);
        assert_eq!(program.js, vec![1]);
        assert_eq!(program.jf, vec![-1]);
        assert_eq!(program.ji, vec![NORMAL]);
    }

    #[test]
    fn star_loops_back_to_its_own_branch() {
        // a* -> [ *0  a1 ], 0.js=1, 1.js=0 (loop), 0.jf=2 (accept, T=2)
        let program = compile("a*").unwrap();
        assert_eq!(program.tok, vec![b'*', b'a']);
        assert_eq!(program.js, vec![1, 0]);
        assert_eq!(program.jf, vec![2, -1]);
    }

    #[test]
    fn class_members_chain_on_failure_and_converge_on_success() {
        let program = compile("[ab]c").unwrap();
        // [a0 b1] c2, a.jf -> b, b.jf -> -1 (class fails), both js -> c (2)
        assert_eq!(program.tok, vec![b'a', b'b', b'c']);
        assert_eq!(program.js, vec![2, 2, 3]);
        assert_eq!(program.jf, vec![1, -1, -1]);
    }

    #[test]
    fn negation_swaps_every_pair_in_range() {
        let plain = compile("a").unwrap();
        assert_eq!((plain.js.clone(), plain.jf.clone()), (vec![1], vec![-1]));
        let negated = compile("{a}").unwrap();
        assert_eq!(negated.tok, plain.tok);
        assert_eq!(negated.js, vec![-1]);
        assert_eq!(negated.jf, vec![1]);
    }

    #[test]
    fn double_negation_is_identity() {
        let plain = compile("ab").unwrap();
        let double_negated = compile("{{ab}}").unwrap();
        assert_eq!(double_negated.tok, plain.tok);
        assert_eq!(double_negated.js, plain.js);
        assert_eq!(double_negated.jf, plain.jf);
    }

    #[test]
    fn propagates_compile_errors() {
        let err = compile("a(").unwrap_err();
        assert_eq!(err.code, ErrorCode::UnclosedGroup);
    }
}
