use crate::reference::Ref;
use crate::types::Var;

/// An internal node of the diagram, or the terminal node.
///
/// The `high` (then) edge of an internal node is never negated: the
/// complement is always pushed to the `low` (else) side.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Node {
    pub variable: Var,
    pub high: Ref,
    pub low: Ref,
    /// Number of parents plus owning handles referencing this node.
    pub rc: u32,
}

impl Node {
    pub fn new(variable: Var, high: Ref, low: Ref) -> Self {
        Self {
            variable,
            high,
            low,
            rc: 0,
        }
    }

    /// The terminal node, representing the constant 1.
    pub fn terminal() -> Self {
        Self::new(Var::TERMINAL, Ref::ONE, Ref::ONE)
    }

    pub fn is_terminal(&self) -> bool {
        self.variable.is_terminal()
    }
}
