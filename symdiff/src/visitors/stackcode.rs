use std::cell::RefCell;
use std::fmt;

use serde::Serialize;

use crate::prelude::*;

/// # StackCommand
/// One instruction of a stack machine evaluating an expression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum StackCommand {
    /// Push a constant.
    Push(f64),
    /// Push the value bound to the variable.
    Value(f64),
    /// Pop two operands, apply the operator, push the result.
    Operator(BinaryOp),
    /// Pop one operand, push its negation.
    UnaryMinus,
}

impl fmt::Display for StackCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackCommand::Push(value) => write!(f, "Push {}", value),
            StackCommand::Value(x) => write!(f, "Value of x is {}", x),
            StackCommand::Operator(op) => write!(f, "Operator {}", op.symbol()),
            StackCommand::UnaryMinus => write!(f, "Unary minus"),
        }
    }
}

/// # StackCodeGenerator
/// Post-order walk emitting the instructions that leave the value of a
/// subtree on top of the stack. The variable is announced with the binding
/// given at construction.
pub struct StackCodeGenerator<'a> {
    arena: &'a ExprArena,
    x: f64,
    commands: RefCell<Vec<StackCommand>>,
}

impl<'a> StackCodeGenerator<'a> {
    pub fn new(arena: &'a ExprArena, x: f64) -> Self {
        StackCodeGenerator {
            arena,
            x,
            commands: RefCell::new(Vec::new()),
        }
    }

    pub fn commands(&self) -> Vec<StackCommand> {
        self.commands.borrow().clone()
    }
}

impl<'a> NodeConstVisitor for StackCodeGenerator<'a> {
    type Output = ();

    fn const_visit(&self, id: NodeId) -> Self::Output {
        match self.arena.get(id) {
            Node::Constant(value) => self.commands.borrow_mut().push(StackCommand::Push(value)),
            Node::Variable => self.commands.borrow_mut().push(StackCommand::Value(self.x)),
            Node::Binary { op, lhs, rhs } => {
                self.const_visit(lhs);
                self.const_visit(rhs);
                self.commands.borrow_mut().push(StackCommand::Operator(op));
            }
            Node::Negate(operand) => {
                self.const_visit(operand);
                self.commands.borrow_mut().push(StackCommand::UnaryMinus);
            }
        }
    }
}
