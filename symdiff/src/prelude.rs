pub use crate::{
    config::*,
    nodes::{node::*, traits::*},
    parsing::{charstream::*, parser::*},
    repl::*,
    utils::errors::*,
    visitors::{differentiator::*, evaluator::*, printer::*, stackcode::*, stackmachine::*},
};
