use crate::prelude::*;

/// Token used for the variable in rendered text.
pub const VARIABLE_TOKEN: &str = "X";

/// # Printer
/// Renders a subtree as fully parenthesized infix text. Binary nodes become
/// `( lhs op rhs )`, negations `( -operand )`, constants use the shortest
/// decimal text that reads back to the same number. Constants are finite for
/// any tree built by the parser, so its rendering parses back, including a
/// negation on the right of an operator.
pub struct Printer<'a> {
    arena: &'a ExprArena,
}

impl<'a> Printer<'a> {
    pub fn new(arena: &'a ExprArena) -> Self {
        Printer { arena }
    }
}

impl<'a> NodeConstVisitor for Printer<'a> {
    type Output = String;

    fn const_visit(&self, id: NodeId) -> Self::Output {
        match self.arena.get(id) {
            Node::Constant(value) => value.to_string(),
            Node::Variable => VARIABLE_TOKEN.to_string(),
            Node::Binary { op, lhs, rhs } => format!(
                "( {} {} {} )",
                self.const_visit(lhs),
                op.symbol(),
                self.const_visit(rhs)
            ),
            Node::Negate(operand) => format!("( -{} )", self.const_visit(operand)),
        }
    }
}
