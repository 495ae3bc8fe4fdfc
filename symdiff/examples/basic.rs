use symdiff::prelude::*;
use symdiff::utils::errors::Result;

fn main() -> Result<()> {
    let expression = "(1 + x) / x";

    let tree = ExprTree::try_from(expression)?;
    let derivative = tree.derivative();

    println!("Expression: {}", tree);
    println!("Derivative: {}", derivative);

    let x = 2.0;
    for command in derivative.stack_code(x) {
        println!("  {}", command);
    }

    let machine = StackMachine::new();
    println!("Value at x = {}: {}", x, machine.execute(&derivative.stack_code(x))?);
    Ok(())
}
