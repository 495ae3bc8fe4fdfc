pub mod charstream;
pub mod parser;
