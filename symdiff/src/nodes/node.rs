use serde::Serialize;

use crate::prelude::*;

/// # NodeId
/// Index of a node inside an [`ExprArena`]. Two parents holding the same id
/// share that subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// # BinaryOp
/// The four arithmetic operators understood by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    pub fn from_symbol(ch: char) -> Option<BinaryOp> {
        match ch {
            '+' => Some(BinaryOp::Add),
            '-' => Some(BinaryOp::Sub),
            '*' => Some(BinaryOp::Mul),
            '/' => Some(BinaryOp::Div),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            BinaryOp::Add => '+',
            BinaryOp::Sub => '-',
            BinaryOp::Mul => '*',
            BinaryOp::Div => '/',
        }
    }

    /// Applies the operator. A zero divisor yields `NaN`.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => {
                if rhs == 0.0 {
                    f64::NAN
                } else {
                    lhs / rhs
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node {
    Constant(f64),
    Variable,
    Binary {
        op: BinaryOp,
        lhs: NodeId,
        rhs: NodeId,
    },
    Negate(NodeId),
}

/// # ExprArena
/// Flat storage for expression nodes. Children are always pushed before
/// their parents, so every id a node refers to is smaller than its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExprArena {
    nodes: Vec<Node>,
}

impl ExprArena {
    pub fn new() -> Self {
        ExprArena { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Node {
        self.nodes[id.0]
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    pub fn constant(&mut self, value: f64) -> NodeId {
        self.push(Node::Constant(value))
    }

    pub fn variable(&mut self) -> NodeId {
        self.push(Node::Variable)
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: NodeId, rhs: NodeId) -> NodeId {
        debug_assert!(lhs.0 < self.nodes.len() && rhs.0 < self.nodes.len());
        self.push(Node::Binary { op, lhs, rhs })
    }

    pub fn negate(&mut self, operand: NodeId) -> NodeId {
        debug_assert!(operand.0 < self.nodes.len());
        self.push(Node::Negate(operand))
    }
}

/// # ExprTree
/// An expression rooted at `root`. The arena may hold nodes that are not
/// reachable from the root (for instance the original expression after
/// [`ExprTree::into_derivative`]).
#[derive(Debug, Clone, PartialEq)]
pub struct ExprTree {
    arena: ExprArena,
    root: NodeId,
}

impl ExprTree {
    pub fn new(arena: ExprArena, root: NodeId) -> ExprTree {
        ExprTree { arena, root }
    }

    pub fn arena(&self) -> &ExprArena {
        &self.arena
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Value of the expression with the variable bound to `x`.
    pub fn value(&self, x: f64) -> f64 {
        Evaluator::new(&self.arena, x).const_visit(self.root)
    }

    /// Derivative with respect to the variable. The original tree is left
    /// untouched; its nodes are copied into the new tree's arena.
    pub fn derivative(&self) -> ExprTree {
        self.clone().into_derivative()
    }

    /// Turns the tree into its derivative. The derivative nodes are appended
    /// to the same arena and reuse the operand subtrees of the original.
    pub fn into_derivative(self) -> ExprTree {
        let differentiator = Differentiator::new(self.arena);
        let root = differentiator.visit(self.root);
        ExprTree {
            arena: differentiator.into_arena(),
            root,
        }
    }

    /// Fully parenthesized infix text, e.g. `( ( 1 - 2 ) - 3 )`.
    pub fn render(&self) -> String {
        Printer::new(&self.arena).const_visit(self.root)
    }

    /// Post-order stack-machine listing, announcing the variable as `x`.
    pub fn stack_code(&self, x: f64) -> Vec<StackCommand> {
        let generator = StackCodeGenerator::new(&self.arena, x);
        generator.const_visit(self.root);
        generator.commands()
    }

    /// Number of nodes reachable from the root, counting shared subtrees once
    /// per parent.
    pub fn node_count(&self) -> usize {
        self.fold_to_root(|a, b| a.saturating_add(b).saturating_add(1))
    }

    /// Length of the longest path from the root to a leaf, in nodes.
    pub fn depth(&self) -> usize {
        self.fold_to_root(|a, b| a.max(b) + 1)
    }

    /// Bottom-up pass over the arena without recursion. Children precede
    /// their parents, so one forward sweep up to the root is enough.
    fn fold_to_root(&self, join: impl Fn(usize, usize) -> usize) -> usize {
        let nodes = &self.arena.nodes[..=self.root.0];
        let mut results: Vec<usize> = Vec::with_capacity(nodes.len());
        for node in nodes {
            let result = match *node {
                Node::Constant(_) | Node::Variable => 1,
                Node::Negate(operand) => join(results[operand.0], 0),
                Node::Binary { lhs, rhs, .. } => join(results[lhs.0], results[rhs.0]),
            };
            results.push(result);
        }
        results[self.root.0]
    }
}

impl std::fmt::Display for ExprTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}
