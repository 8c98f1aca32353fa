//! Counting and traversal: minterms, DAG size, satisfying paths.
//!
//! Minterm counts are computed as densities, the fraction of all assignments
//! that satisfy a node, and scaled by `2^n` only at the end, so that large `n`
//! never produces `inf - inf`. Densities are memoized per node, not per edge:
//! a complemented edge has density `1 - d(node)`. The density of a node is the
//! mean of its children's densities:
//!
//! ```text
//! d(v ? hi : lo) = (d(hi) + d(lo)) / 2
//! ```
//!
//! This weights skipped variables implicitly: a variable missing between a
//! node and its child is a don't-care that does not change the child's density.

use std::collections::{HashMap, HashSet};

use num_bigint::BigUint;

use crate::error::{BddError, Result};
use crate::manager::State;
use crate::reference::Ref;
use crate::types::{NodeId, Var};

impl State {
    pub(crate) fn minterms(&self, f: Ref, num_vars: usize) -> f64 {
        let mut memo = HashMap::new();
        let density = self.density(f.id(), &mut memo);
        let mut count = if f.is_negated() { 1.0 - density } else { density };

        // Scale in steps that stay finite, so a zero density stays zero.
        let mut rest = num_vars;
        while rest > 0 && count != 0.0 {
            let step = rest.min(1000);
            count *= 2f64.powi(step as i32);
            rest -= step;
        }
        count
    }

    fn density(&self, id: NodeId, memo: &mut HashMap<NodeId, f64>) -> f64 {
        if id.is_terminal() {
            return 1.0;
        }
        if let Some(&d) = memo.get(&id) {
            return d;
        }

        let node = self.table.node(id);
        let (high, low) = (node.high, node.low);
        let d_high = self.density(high.id(), memo);
        let d_low = self.density(low.id(), memo);
        let d_low = if low.is_negated() { 1.0 - d_low } else { d_low };

        let d = (d_high + d_low) / 2.0;
        memo.insert(id, d);
        d
    }

    pub(crate) fn sat_count(&self, f: Ref, num_vars: usize) -> BigUint {
        let max = BigUint::from(1u32) << num_vars;
        let mut memo = HashMap::new();
        let count = self.sat_count_(f.id(), &max, &mut memo);
        if f.is_negated() {
            &max - count
        } else {
            count
        }
    }

    fn sat_count_(&self, id: NodeId, max: &BigUint, memo: &mut HashMap<NodeId, BigUint>) -> BigUint {
        if id.is_terminal() {
            return max.clone();
        }
        if let Some(count) = memo.get(&id) {
            return count.clone();
        }

        let node = self.table.node(id);
        let (high, low) = (node.high, node.low);
        let count_high = self.sat_count_(high.id(), max, memo);
        let count_low = self.sat_count_(low.id(), max, memo);
        let count_low = if low.is_negated() { max - count_low } else { count_low };

        let count: BigUint = (count_high + count_low) >> 1;
        memo.insert(id, count.clone());
        count
    }

    /// All node indices reachable from `nodes`, the terminal included.
    pub(crate) fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<NodeId> {
        let mut visited = HashSet::new();
        visited.insert(NodeId::TERMINAL);
        let mut stack: Vec<NodeId> = nodes.into_iter().map(|r| r.id()).collect();

        while let Some(id) = stack.pop() {
            if visited.insert(id) {
                let node = self.table.node(id);
                stack.push(node.high.id());
                stack.push(node.low.id());
            }
        }

        visited
    }

    pub(crate) fn dag_size(&self, f: Ref) -> usize {
        self.descendants([f]).len()
    }

    pub(crate) fn one_sat(&self, f: Ref) -> Option<Vec<(Var, bool)>> {
        if f == Ref::ZERO {
            return None;
        }

        let mut path = Vec::new();
        let mut current = f;

        // Every non-zero edge has a path to 1; prefer the high branch.
        while !current.is_terminal() {
            let var = self.table.variable(current);
            let high = self.table.high_node(current);
            if high != Ref::ZERO {
                path.push((var, true));
                current = high;
            } else {
                path.push((var, false));
                current = self.table.low_node(current);
            }
        }
        debug_assert_eq!(current, Ref::ONE);

        Some(path)
    }

    pub(crate) fn eval(&self, f: Ref, assignment: &[bool]) -> Result<bool> {
        let mut current = f;
        while !current.is_terminal() {
            let var = self.table.variable(current);
            let value = *assignment.get(var.index() as usize).ok_or(BddError::InvalidVariable {
                index: var.index(),
                num_vars: assignment.len(),
            })?;
            current = if value {
                self.table.high_node(current)
            } else {
                self.table.low_node(current)
            };
        }
        Ok(current == Ref::ONE)
    }
}
