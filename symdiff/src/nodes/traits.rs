use crate::prelude::*;

/// # NodeConstVisitor
/// A read-only walk over the nodes of an [`ExprArena`].
pub trait NodeConstVisitor {
    type Output;
    fn const_visit(&self, id: NodeId) -> Self::Output;
}

/// # NodeVisitor
/// A walk that may grow the arena it visits.
pub trait NodeVisitor {
    type Output;
    fn visit(&self, id: NodeId) -> Self::Output;
}
