//! Per-variable subtable of the unique table.
//!
//! The node table keeps one subtable per variable:
//!
//! ```text
//! subtables[0] → nodes labelled x0
//! subtables[1] → nodes labelled x1
//! ...
//! ```
//!
//! Each subtable maps the `(high, low)` children to the node index. Since all
//! nodes in a subtable share the variable, it is not part of the key.

use std::collections::HashMap;

use crate::reference::Ref;
use crate::types::{NodeId, Var};

/// A subtable storing the nodes of a single variable.
#[derive(Debug, Clone)]
pub struct Subtable {
    /// The variable for all nodes in this subtable.
    pub variable: Var,

    /// Map from (high, low) to node index in the arena.
    nodes: HashMap<(Ref, Ref), NodeId>,
}

impl Subtable {
    pub fn new(variable: Var) -> Self {
        Self {
            variable,
            nodes: HashMap::new(),
        }
    }

    /// Look up a node by its children.
    pub fn find(&self, high: Ref, low: Ref) -> Option<NodeId> {
        self.nodes.get(&(high, low)).copied()
    }

    pub fn insert(&mut self, high: Ref, low: Ref, id: NodeId) {
        let previous = self.nodes.insert((high, low), id);
        debug_assert!(previous.is_none(), "duplicate node ({}, {}) in subtable {}", high, low, self.variable);
    }

    /// Remove a node from the subtable, returning its index if present.
    pub fn remove(&mut self, high: Ref, low: Ref) -> Option<NodeId> {
        self.nodes.remove(&(high, low))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
