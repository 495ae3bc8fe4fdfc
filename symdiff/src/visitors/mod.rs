pub mod differentiator;
pub mod evaluator;
pub mod printer;
pub mod stackcode;
pub mod stackmachine;
