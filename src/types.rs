//! Type-safe wrappers for variable indices and node identifiers.
//!
//! These newtypes keep variable indices (positions in the manager's variable
//! order) apart from node identifiers (slots in the node table).

use std::fmt;

/// A variable index (0-indexed).
///
/// Variables are ordered by their index: a smaller index is closer to the root.
/// Terminal nodes carry the sentinel [`Var::TERMINAL`], which compares greater
/// than every real variable, so "the topmost variable" of a set of nodes is
/// simply their minimum.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Sentinel index stored in the terminal node.
    pub const TERMINAL: Self = Var(u32::MAX);

    /// Creates a new variable with the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index` collides with the terminal sentinel.
    pub fn new(index: u32) -> Self {
        assert_ne!(index, u32::MAX, "Variable index {} is reserved for terminals", index);
        Var(index)
    }

    /// Returns the raw index as a `u32`.
    pub fn index(self) -> u32 {
        self.0
    }

    /// Checks whether this is the terminal sentinel.
    pub fn is_terminal(self) -> bool {
        self == Self::TERMINAL
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_terminal() {
            write!(f, "x⊤")
        } else {
            write!(f, "x{}", self.0)
        }
    }
}

impl From<Var> for u32 {
    fn from(var: Var) -> Self {
        var.0
    }
}

/// Identifier of a node slot inside a [`NodeTable`][crate::table::NodeTable].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The terminal node always lives in slot 0.
    pub const TERMINAL: Self = NodeId(0);

    pub const fn new(raw: u32) -> Self {
        NodeId(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn is_terminal(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<u32> for NodeId {
    fn from(raw: u32) -> Self {
        NodeId(raw)
    }
}
