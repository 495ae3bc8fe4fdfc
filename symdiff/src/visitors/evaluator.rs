use crate::prelude::*;

/// # Evaluator
/// Computes the value of a subtree with the variable bound to `x`. The
/// binding is carried by the visitor, nodes never store it.
pub struct Evaluator<'a> {
    arena: &'a ExprArena,
    x: f64,
}

impl<'a> Evaluator<'a> {
    pub fn new(arena: &'a ExprArena, x: f64) -> Self {
        Evaluator { arena, x }
    }
}

impl<'a> NodeConstVisitor for Evaluator<'a> {
    type Output = f64;

    fn const_visit(&self, id: NodeId) -> Self::Output {
        match self.arena.get(id) {
            Node::Constant(value) => value,
            Node::Variable => self.x,
            Node::Binary { op, lhs, rhs } => {
                let left = self.const_visit(lhs);
                let right = self.const_visit(rhs);
                op.apply(left, right)
            }
            Node::Negate(operand) => -self.const_visit(operand),
        }
    }
}
