pub mod node;
pub mod traits;
