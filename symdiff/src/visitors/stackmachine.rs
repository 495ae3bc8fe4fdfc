use std::cell::RefCell;

use crate::prelude::*;
use crate::utils::errors::{DiffError, Result};

/// # StackMachine
/// Executes a [`StackCommand`] listing and returns the single value it leaves
/// on the stack.
pub struct StackMachine {
    stack: RefCell<Vec<f64>>,
}

impl StackMachine {
    pub fn new() -> Self {
        StackMachine {
            stack: RefCell::new(Vec::new()),
        }
    }

    pub fn execute(&self, commands: &[StackCommand]) -> Result<f64> {
        self.stack.borrow_mut().clear();
        for command in commands {
            self.step(command)?;
        }
        let mut stack = self.stack.borrow_mut();
        match stack.len() {
            1 => Ok(stack.pop().unwrap_or(f64::NAN)),
            n => Err(DiffError::UnbalancedStack(n)),
        }
    }

    fn step(&self, command: &StackCommand) -> Result<()> {
        let mut stack = self.stack.borrow_mut();
        match command {
            StackCommand::Push(value) | StackCommand::Value(value) => stack.push(*value),
            StackCommand::Operator(op) => {
                let rhs = stack.pop();
                let lhs = stack.pop();
                match (lhs, rhs) {
                    (Some(lhs), Some(rhs)) => stack.push(op.apply(lhs, rhs)),
                    _ => return Err(DiffError::StackUnderflow(command.to_string())),
                }
            }
            StackCommand::UnaryMinus => match stack.pop() {
                Some(value) => stack.push(-value),
                None => return Err(DiffError::StackUnderflow(command.to_string())),
            },
        }
        Ok(())
    }
}

impl Default for StackMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_listing_reproduces_tree_value() {
        let mut rng = rand::thread_rng();
        let machine = StackMachine::new();
        for source in ["x * x", "(1 + x) / x", "-(x - 3) * (x + 2) / 5", "7"] {
            let tree = ExprTree::try_from(source).unwrap();
            let derivative = tree.derivative();
            for _ in 0..20 {
                let x: f64 = rng.gen_range(0.5..10.0);
                assert_eq!(machine.execute(&tree.stack_code(x)).unwrap(), tree.value(x));
                assert_eq!(
                    machine.execute(&derivative.stack_code(x)).unwrap(),
                    derivative.value(x)
                );
            }
        }
    }

    #[test]
    fn test_underflow() {
        let machine = StackMachine::new();
        let err = machine
            .execute(&[StackCommand::Push(1.0), StackCommand::Operator(BinaryOp::Add)])
            .unwrap_err();
        assert!(matches!(err, DiffError::StackUnderflow(_)));
        assert!(machine.execute(&[StackCommand::UnaryMinus]).is_err());
    }

    #[test]
    fn test_unbalanced_stack() {
        let machine = StackMachine::new();
        let err = machine
            .execute(&[StackCommand::Push(1.0), StackCommand::Push(2.0)])
            .unwrap_err();
        assert!(matches!(err, DiffError::UnbalancedStack(2)));
        assert!(matches!(
            machine.execute(&[]),
            Err(DiffError::UnbalancedStack(0))
        ));
    }
}
