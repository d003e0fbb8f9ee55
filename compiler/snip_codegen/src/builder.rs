//! Bytecode buffer for one method.

use snip_ir::{Constant, Op};
use tracing::trace;

/// Collects the instructions, constants and local slots of a method.
#[derive(Debug, Default)]
pub struct MethodBuilder {
    code: Vec<Op>,
    constants: Vec<Constant>,
    locals: u16,
}

impl MethodBuilder {
    pub fn new() -> Self {
        MethodBuilder::default()
    }

    /// Append an instruction and return its index.
    pub fn emit(&mut self, op: Op) -> usize {
        trace!(at = self.code.len(), ?op, "emit");
        self.code.push(op);
        self.code.len() - 1
    }

    /// Push a constant. Equal constants share a pool entry.
    pub fn constant(&mut self, constant: Constant) -> usize {
        let index = match self.constants.iter().position(|c| same_constant(c, &constant)) {
            Some(index) => index,
            None => {
                self.constants.push(constant);
                self.constants.len() - 1
            }
        };
        self.emit(Op::Const(index_u32(index)))
    }

    /// Emit a jump with an unresolved target; fix it with [`Self::patch_jump`].
    pub fn emit_jump(&mut self, op: fn(u32) -> Op) -> usize {
        self.emit(op(u32::MAX))
    }

    /// Point the jump at `at` to the current end of the code.
    pub fn patch_jump(&mut self, at: usize) {
        let target = index_u32(self.code.len());
        self.patch_jump_to(at, target);
    }

    /// Point the jump at `at` to `target`.
    pub fn patch_jump_to(&mut self, at: usize, target: u32) {
        if let Some(op) = self.code.get_mut(at) {
            *op = match *op {
                Op::Jump(_) => Op::Jump(target),
                Op::JumpIfFalse(_) => Op::JumpIfFalse(target),
                Op::JumpIfTrue(_) => Op::JumpIfTrue(target),
                other => other,
            };
        }
    }

    /// Replace the placeholder at `at`.
    pub fn replace(&mut self, at: usize, op: Op) {
        if let Some(slot) = self.code.get_mut(at) {
            *slot = op;
        }
    }

    /// Index of the next instruction.
    pub fn here(&self) -> u32 {
        index_u32(self.code.len())
    }

    /// Reserve a fresh local slot.
    pub fn alloc_local(&mut self) -> u16 {
        let slot = self.locals;
        self.locals = self.locals.saturating_add(1);
        slot
    }

    pub fn finish(self) -> (Vec<Op>, Vec<Constant>, u16) {
        (self.code, self.constants, self.locals)
    }
}

/// Floats compare bitwise: `NaN` matches itself and `-0.0` stays distinct
/// from `0.0`.
fn same_constant(a: &Constant, b: &Constant) -> bool {
    match (a, b) {
        (Constant::Single(x), Constant::Single(y)) => x.to_bits() == y.to_bits(),
        (Constant::Double(x), Constant::Double(y)) => x.to_bits() == y.to_bits(),
        _ => a == b,
    }
}

fn index_u32(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}
