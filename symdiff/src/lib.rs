//! Symbolic differentiation of single-variable arithmetic expressions.
//!
//! A line such as `(1 + x) / x` is parsed into an [`ExprTree`](nodes::node::ExprTree),
//! differentiated with respect to `x`, and rendered both as fully
//! parenthesized infix text and as a stack-machine listing.

pub mod config;
pub mod nodes;
pub mod parsing;
pub mod prelude;
pub mod repl;
pub mod utils;
pub mod visitors;
