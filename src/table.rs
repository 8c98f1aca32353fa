//! The unique node table.
//!
//! Nodes live in a plain arena indexed by [`NodeId`]; structural lookup goes
//! through one [`Subtable`] per variable. Slot 0 always holds the terminal.
//!
//! # Reference counting
//!
//! Every node carries a counter of its parents plus the owning handles that
//! point at it. Creating a node increments both children. A node whose count
//! drops to zero is *dead*: it stays in the table, can still be found (and thus
//! resurrected) by a lookup, and is only freed by [`NodeTable::collect_garbage`].
//! Freeing a node decrements its children, which may cascade.

use std::collections::TryReserveError;

use log::debug;

use crate::node::Node;
use crate::reference::Ref;
use crate::subtable::Subtable;
use crate::types::{NodeId, Var};

#[derive(Debug, Clone)]
struct Entry {
    node: Node,
    occupied: bool,
    /// Bumped every time the slot is freed.
    generation: u32,
}

pub struct NodeTable {
    entries: Vec<Entry>,
    /// Freed slots available for reuse.
    free: Vec<NodeId>,
    subtables: Vec<Subtable>,
    /// Number of occupied internal (non-terminal) slots.
    stored: usize,
    /// Number of occupied internal slots with a zero reference count.
    dead: usize,
}

impl NodeTable {
    /// Creates a table pre-sized for `capacity` nodes, with `num_vars` variables.
    pub fn with_capacity(capacity: usize, num_vars: usize) -> Result<Self, TryReserveError> {
        let mut entries = Vec::new();
        entries.try_reserve(capacity.max(1))?;
        entries.push(Entry {
            node: Node::terminal(),
            occupied: true,
            generation: 0,
        });

        let mut subtables = Vec::new();
        subtables.try_reserve(num_vars)?;
        subtables.extend((0..num_vars).map(|v| Subtable::new(Var::new(v as u32))));

        Ok(Self {
            entries,
            free: Vec::new(),
            subtables,
            stored: 0,
            dead: 0,
        })
    }

    /// Appends a new variable at the bottom of the order.
    pub fn add_variable(&mut self) -> Var {
        let var = Var::new(self.subtables.len() as u32);
        self.subtables.push(Subtable::new(var));
        var
    }

    pub fn num_vars(&self) -> usize {
        self.subtables.len()
    }

    /// Number of stored nodes, including dead ones and the terminal.
    pub fn size(&self) -> usize {
        self.stored + 1
    }

    /// Number of nodes with a positive reference count, plus the terminal.
    pub fn live_count(&self) -> usize {
        self.stored - self.dead + 1
    }

    pub fn dead_count(&self) -> usize {
        self.dead
    }

    pub fn node(&self, id: NodeId) -> &Node {
        let entry = &self.entries[id.index()];
        assert!(entry.occupied, "Node {} is not occupied", id);
        &entry.node
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        let entry = &mut self.entries[id.index()];
        assert!(entry.occupied, "Node {} is not occupied", id);
        &mut entry.node
    }

    /// Stamp of the slot behind `id`. It changes whenever the slot is freed.
    pub fn generation(&self, id: NodeId) -> u32 {
        self.entries[id.index()].generation
    }

    /// Whether slot `id` still holds the node it held when `generation` was read.
    pub fn is_current(&self, id: NodeId, generation: u32) -> bool {
        self.entries
            .get(id.index())
            .is_some_and(|e| e.occupied && e.generation == generation)
    }

    pub fn variable(&self, node: Ref) -> Var {
        self.node(node.id()).variable
    }

    /// The stored high child, without applying the complement of `node`.
    pub fn high(&self, id: NodeId) -> Ref {
        self.node(id).high
    }

    /// The stored low child, without applying the complement of `node`.
    pub fn low(&self, id: NodeId) -> Ref {
        self.node(id).low
    }

    /// Positive cofactor of the function referenced by `node` with respect to its top variable.
    pub fn high_node(&self, node: Ref) -> Ref {
        if node.is_terminal() {
            return node;
        }
        self.high(node.id()).negate_if(node.is_negated())
    }

    /// Negative cofactor of the function referenced by `node` with respect to its top variable.
    pub fn low_node(&self, node: Ref) -> Ref {
        if node.is_terminal() {
            return node;
        }
        self.low(node.id()).negate_if(node.is_negated())
    }

    /// Cofactors `(f|v=0, f|v=1)` where `v` is at or above the top variable of `node`.
    pub fn top_cofactors(&self, node: Ref, v: Var) -> (Ref, Ref) {
        let var = self.variable(node);
        if v < var {
            return (node, node);
        }
        assert_eq!(v, var, "{} is below the top variable {} of {}", v, var, node);
        (self.low_node(node), self.high_node(node))
    }

    /// Returns the canonical edge for `ite(v, high, low)`, creating the node if needed.
    ///
    /// Reduction and complement normalization happen before the lookup, so the
    /// result may be an existing edge, a complemented edge, or a fresh node.
    /// A freshly created node starts with a zero count; the caller must reference it.
    pub fn get_or_create(&mut self, v: Var, high: Ref, low: Ref) -> Ref {
        assert!((v.index() as usize) < self.num_vars(), "Variable {} is not declared", v);

        if high == low {
            return high;
        }

        if high.is_negated() {
            return -self.get_or_create(v, -high, -low);
        }

        debug_assert!(v < self.variable(high), "ordering violated: {} above {}", v, high);
        debug_assert!(v < self.variable(low), "ordering violated: {} above {}", v, low);

        let subtable = &self.subtables[v.index() as usize];
        if let Some(id) = subtable.find(high, low) {
            return Ref::positive(id);
        }

        let node = Node::new(v, high, low);
        let id = match self.free.pop() {
            Some(id) => {
                let entry = &mut self.entries[id.index()];
                entry.node = node;
                entry.occupied = true;
                id
            }
            None => {
                let id = NodeId::new(self.entries.len() as u32);
                self.entries.push(Entry {
                    node,
                    occupied: true,
                    generation: 0,
                });
                id
            }
        };
        self.subtables[v.index() as usize].insert(high, low, id);
        self.stored += 1;
        self.dead += 1;

        self.incref(high);
        self.incref(low);

        Ref::positive(id)
    }

    /// Increments the reference count of the node behind `node`.
    pub fn incref(&mut self, node: Ref) {
        if node.is_terminal() {
            return;
        }
        let n = self.node_mut(node.id());
        n.rc += 1;
        if n.rc == 1 {
            self.dead -= 1;
        }
    }

    /// Decrements the reference count. Returns `true` if the node became dead.
    pub fn decref(&mut self, node: Ref) -> bool {
        if node.is_terminal() {
            return false;
        }
        let n = self.node_mut(node.id());
        assert!(n.rc > 0, "decref of dead node {}", node);
        n.rc -= 1;
        if n.rc == 0 {
            self.dead += 1;
            true
        } else {
            false
        }
    }

    /// Frees every dead node, cascading into children whose count drops to zero.
    ///
    /// Returns the number of freed nodes. Callers must drop every cached
    /// result before the freed slots get reused.
    pub fn collect_garbage(&mut self) -> usize {
        let mut stack: Vec<NodeId> = self
            .entries
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, e)| e.occupied && e.node.rc == 0)
            .map(|(i, _)| NodeId::new(i as u32))
            .collect();

        let mut freed = 0;
        while let Some(id) = stack.pop() {
            let node = *self.node(id);
            debug_assert_eq!(node.rc, 0);

            let removed = self.subtables[node.variable.index() as usize].remove(node.high, node.low);
            debug_assert_eq!(removed, Some(id));
            let entry = &mut self.entries[id.index()];
            entry.occupied = false;
            entry.generation = entry.generation.wrapping_add(1);
            self.free.push(id);
            self.stored -= 1;
            self.dead -= 1;
            freed += 1;

            for child in [node.high, node.low] {
                if self.decref(child) {
                    stack.push(child.id());
                }
            }
        }

        debug!("collect_garbage: freed {} nodes, {} remain", freed, self.size());
        freed
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn table(num_vars: usize) -> NodeTable {
        NodeTable::with_capacity(16, num_vars).unwrap()
    }

    #[test]
    fn test_terminal_only() {
        let t = table(2);
        assert_eq!(t.size(), 1);
        assert_eq!(t.live_count(), 1);
        assert!(t.node(NodeId::TERMINAL).is_terminal());
        assert_eq!(t.variable(Ref::ONE), Var::TERMINAL);
        assert_eq!(t.variable(Ref::ZERO), Var::TERMINAL);
    }

    #[test]
    fn test_reduction() {
        let mut t = table(1);
        let r = t.get_or_create(Var::new(0), Ref::ONE, Ref::ONE);
        assert_eq!(r, Ref::ONE);
        assert_eq!(t.size(), 1);
    }

    #[test]
    fn test_uniqueness() {
        let mut t = table(1);
        let a = t.get_or_create(Var::new(0), Ref::ONE, Ref::ZERO);
        let b = t.get_or_create(Var::new(0), Ref::ONE, Ref::ZERO);
        assert_eq!(a, b);
        assert_eq!(t.size(), 2);
        assert_eq!(t.subtables[0].len(), 1);
    }

    #[test]
    fn test_complement_normalization() {
        let mut t = table(1);
        let x = t.get_or_create(Var::new(0), Ref::ONE, Ref::ZERO);
        let not_x = t.get_or_create(Var::new(0), Ref::ZERO, Ref::ONE);
        assert_eq!(not_x, -x);
        assert!(!t.high(x.id()).is_negated());
        assert_eq!(t.high_node(not_x), Ref::ZERO);
        assert_eq!(t.low_node(not_x), Ref::ONE);
        assert_eq!(t.size(), 2);
    }

    #[test]
    fn test_top_cofactors() {
        let mut t = table(2);
        let y = t.get_or_create(Var::new(1), Ref::ONE, Ref::ZERO);
        let f = t.get_or_create(Var::new(0), y, Ref::ZERO);
        assert_eq!(t.top_cofactors(f, Var::new(0)), (Ref::ZERO, y));
        assert_eq!(t.top_cofactors(-f, Var::new(0)), (Ref::ONE, -y));
        // f does not depend on a variable above its top.
        assert_eq!(t.top_cofactors(y, Var::new(0)), (y, y));
    }

    #[test]
    fn test_children_are_referenced() {
        let mut t = table(2);
        let y = t.get_or_create(Var::new(1), Ref::ONE, Ref::ZERO);
        assert_eq!(t.node(y.id()).rc, 0);
        let f = t.get_or_create(Var::new(0), y, Ref::ZERO);
        assert_eq!(t.node(y.id()).rc, 1);
        assert_eq!(t.node(f.id()).rc, 0);
        assert_eq!(t.dead_count(), 1);
    }

    #[test]
    fn test_collect_garbage_cascades() {
        let mut t = table(3);
        let z = t.get_or_create(Var::new(2), Ref::ONE, Ref::ZERO);
        let y = t.get_or_create(Var::new(1), z, Ref::ZERO);
        let f = t.get_or_create(Var::new(0), y, Ref::ZERO);
        assert_eq!(t.size(), 4);
        assert_eq!(t.subtables.iter().map(|st| st.len()).sum::<usize>(), 3);

        t.incref(f);
        assert_eq!(t.collect_garbage(), 0);
        assert_eq!(t.size(), 4);
        assert_eq!(t.live_count(), 4);

        assert!(t.decref(f));
        assert_eq!(t.live_count(), 3);
        assert_eq!(t.collect_garbage(), 3);
        assert_eq!(t.size(), 1);
        assert_eq!(t.dead_count(), 0);
        assert!(t.subtables.iter().all(|st| st.is_empty()));
    }

    #[test]
    fn test_dead_node_resurrection() {
        let mut t = table(1);
        let x = t.get_or_create(Var::new(0), Ref::ONE, Ref::ZERO);
        t.incref(x);
        t.decref(x);
        assert_eq!(t.dead_count(), 1);

        let again = t.get_or_create(Var::new(0), Ref::ONE, Ref::ZERO);
        assert_eq!(again, x);
        t.incref(again);
        assert_eq!(t.dead_count(), 0);
        assert_eq!(t.collect_garbage(), 0);
    }

    #[test]
    fn test_slot_reuse() {
        let mut t = table(1);
        let x = t.get_or_create(Var::new(0), Ref::ONE, Ref::ZERO);
        t.collect_garbage();
        let y = t.get_or_create(Var::new(0), Ref::ONE, Ref::ZERO);
        assert_eq!(x.id(), y.id());
        assert_eq!(t.size(), 2);
    }

    #[test]
    fn test_generation_changes_on_free() {
        let mut t = table(2);
        let x = t.get_or_create(Var::new(0), Ref::ONE, Ref::ZERO);
        let stamp = t.generation(x.id());
        assert!(t.is_current(x.id(), stamp));
        assert!(t.is_current(NodeId::TERMINAL, 0));

        t.collect_garbage();
        assert!(!t.is_current(x.id(), stamp));

        // The slot is reused by a different node under a new stamp.
        let y = t.get_or_create(Var::new(1), Ref::ONE, Ref::ZERO);
        assert_eq!(y.id(), x.id());
        assert!(!t.is_current(y.id(), stamp));
        assert!(t.is_current(y.id(), t.generation(y.id())));
        assert!(!t.is_current(NodeId::new(100), 0));
    }

    #[test]
    fn test_add_variable() {
        let mut t = table(0);
        assert_eq!(t.add_variable(), Var::new(0));
        assert_eq!(t.add_variable(), Var::new(1));
        assert_eq!(t.num_vars(), 2);
    }

    #[test]
    #[should_panic(expected = "is not declared")]
    fn test_undeclared_variable_panics() {
        let mut t = table(1);
        t.get_or_create(Var::new(3), Ref::ONE, Ref::ZERO);
    }
}
