use std::cell::RefCell;

use tracing::debug;

use crate::prelude::*;

/// # Differentiator
/// Builds the derivative of a subtree with respect to the variable by
/// structural rewriting:
///
/// | node      | derivative                          |
/// |-----------|-------------------------------------|
/// | `c`       | `0`                                 |
/// | `x`       | `1`                                 |
/// | `-A`      | `-dA`                               |
/// | `A + B`   | `dA + dB`                           |
/// | `A - B`   | `dA - dB`                           |
/// | `A * B`   | `A * dB + B * dA`                   |
/// | `A / B`   | `(B * dA - A * dB) / (B * B)`       |
///
/// No simplification is applied. New nodes are appended to the arena and the
/// operands `A` and `B` are referenced, not copied.
pub struct Differentiator {
    arena: RefCell<ExprArena>,
}

impl Differentiator {
    pub fn new(arena: ExprArena) -> Self {
        Differentiator {
            arena: RefCell::new(arena),
        }
    }

    pub fn into_arena(self) -> ExprArena {
        let arena = self.arena.into_inner();
        debug!(nodes = arena.len(), "differentiation finished");
        arena
    }

    fn derive_binary(&self, op: BinaryOp, a: NodeId, b: NodeId) -> NodeId {
        let da = self.visit(a);
        let db = self.visit(b);
        let mut arena = self.arena.borrow_mut();
        match op {
            BinaryOp::Add | BinaryOp::Sub => arena.binary(op, da, db),
            BinaryOp::Mul => {
                let a_db = arena.binary(BinaryOp::Mul, a, db);
                let b_da = arena.binary(BinaryOp::Mul, b, da);
                arena.binary(BinaryOp::Add, a_db, b_da)
            }
            BinaryOp::Div => {
                let a_db = arena.binary(BinaryOp::Mul, a, db);
                let b_da = arena.binary(BinaryOp::Mul, b, da);
                let numerator = arena.binary(BinaryOp::Sub, b_da, a_db);
                let denominator = arena.binary(BinaryOp::Mul, b, b);
                arena.binary(BinaryOp::Div, numerator, denominator)
            }
        }
    }
}

impl NodeVisitor for Differentiator {
    type Output = NodeId;

    fn visit(&self, id: NodeId) -> Self::Output {
        let node = self.arena.borrow().get(id);
        match node {
            Node::Constant(_) => self.arena.borrow_mut().constant(0.0),
            Node::Variable => self.arena.borrow_mut().constant(1.0),
            Node::Negate(operand) => {
                let d = self.visit(operand);
                self.arena.borrow_mut().negate(d)
            }
            Node::Binary { op, lhs, rhs } => self.derive_binary(op, lhs, rhs),
        }
    }
}
