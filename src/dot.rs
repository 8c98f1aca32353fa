//! Graphviz export.
//!
//! The diagram is drawn with its single terminal `1` at the bottom. Solid
//! lines are high edges, dashed lines are low edges, and a hollow circle at
//! the arrow head marks a complemented edge. Roots are drawn on top.
//!
//! ```
//! use rcbdd::manager::Manager;
//!
//! let mgr = Manager::new(2, 64, 64).unwrap();
//! let x = mgr.var(0).unwrap();
//! let y = mgr.var(1).unwrap();
//! let f = mgr.apply_xor(&x, &y).unwrap();
//!
//! let dot = mgr.to_dot(&[&f]).unwrap();
//! assert!(dot.starts_with("graph {"));
//! // Render with: dot -Tpng out.dot -o out.png
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::manager::State;
use crate::reference::Ref;

/// Visual settings for [`Manager::to_dot_with_config`][crate::manager::Manager::to_dot_with_config].
#[derive(Debug, Clone)]
pub struct DotConfig {
    pub node_shape: &'static str,
    pub terminal_shape: &'static str,
    pub root_shape: &'static str,
    pub high_edge_style: &'static str,
    pub low_edge_style: &'static str,
    /// Render variable labels as `x<sub>i</sub>` HTML labels.
    pub use_html_labels: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            terminal_shape: "square",
            root_shape: "rect",
            high_edge_style: "solid",
            low_edge_style: "dashed",
            use_html_labels: true,
        }
    }
}

fn edge_attrs(edge: Ref, style: &str) -> String {
    if edge.is_negated() {
        format!("[style={}, dir=forward, arrowhead=odot]", style)
    } else {
        format!("[style={}]", style)
    }
}

impl State {
    pub(crate) fn to_dot(&self, roots: &[Ref], config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "graph {{")?;
        writeln!(dot, "node [shape={}, fixedsize=true];", config.node_shape)?;

        writeln!(dot, "{{ rank=sink")?;
        writeln!(dot, "n0 [shape={}, label=\"1\"];", config.terminal_shape)?;
        writeln!(dot, "}}")?;

        let all_nodes = self.descendants(roots.iter().copied());

        // Group by variable so that each level gets its own rank.
        let mut levels = BTreeMap::<u32, Vec<_>>::new();
        for &id in all_nodes.iter() {
            if id.is_terminal() {
                continue;
            }
            let var = self.table.node(id).variable;
            levels.entry(var.index()).or_default().push(id);
        }

        for (var, ids) in levels.iter_mut() {
            ids.sort();
            writeln!(dot, "{{ rank=same")?;
            for &id in ids.iter() {
                let label = if config.use_html_labels {
                    format!("<x<SUB>{}</SUB>>", var)
                } else {
                    format!("\"x{}\"", var)
                };
                writeln!(dot, "n{} [label={}];", id.raw(), label)?;
            }
            writeln!(dot, "}}")?;
        }

        for ids in levels.values() {
            for &id in ids {
                let node = self.table.node(id);
                debug_assert!(!node.high.is_negated());
                writeln!(
                    dot,
                    "n{} -- n{} {};",
                    id.raw(),
                    node.high.id().raw(),
                    edge_attrs(node.high, config.high_edge_style)
                )?;
                writeln!(
                    dot,
                    "n{} -- n{} {};",
                    id.raw(),
                    node.low.id().raw(),
                    edge_attrs(node.low, config.low_edge_style)
                )?;
            }
        }

        writeln!(dot, "{{ rank=source")?;
        for (i, root) in roots.iter().enumerate() {
            writeln!(dot, "r{} [shape={}, label=\"{}\"];", i, config.root_shape, root)?;
        }
        writeln!(dot, "}}")?;

        for (i, &root) in roots.iter().enumerate() {
            writeln!(dot, "r{} -- n{} {};", i, root.id().raw(), edge_attrs(root, "solid"))?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::manager::Manager;

    #[test]
    fn test_to_dot_basic() {
        let mgr = Manager::new(3, 64, 64).unwrap();
        let f = mgr.cube([(0, false), (1, true), (2, true)]).unwrap();

        let dot = mgr.to_dot(&[&f]).unwrap();
        assert!(dot.starts_with("graph {"));
        assert!(dot.ends_with("}\n"));
        assert!(dot.contains("n0 [shape=square, label=\"1\"];"));
        assert!(dot.contains("arrowhead=odot"));
    }

    #[test]
    fn test_to_dot_constants() {
        let mgr = Manager::new(0, 64, 64).unwrap();
        let one = mgr.one().unwrap();
        let zero = mgr.zero().unwrap();

        let dot = mgr.to_dot(&[&one, &zero]).unwrap();
        assert!(dot.contains("r0 -- n0 [style=solid];"));
        assert!(dot.contains("r1 -- n0 [style=solid, dir=forward, arrowhead=odot];"));
    }

    #[test]
    fn test_to_dot_shared_nodes_once() {
        let mgr = Manager::new(2, 64, 64).unwrap();
        let x = mgr.var(0).unwrap();
        let y = mgr.var(1).unwrap();
        let f = mgr.apply_and(&x, &y).unwrap();
        let g = mgr.apply_or(&x, &y).unwrap();

        let dot = mgr.to_dot(&[&f, &g]).unwrap();
        let y_id = y.edge().id().raw();
        let decl = format!("n{} [label=", y_id);
        assert_eq!(dot.matches(&decl).count(), 1);
    }

    #[test]
    fn test_to_dot_with_config() {
        let mgr = Manager::new(1, 64, 64).unwrap();
        let x = mgr.var(0).unwrap();

        let config = DotConfig {
            use_html_labels: false,
            ..DotConfig::default()
        };
        let dot = mgr.to_dot_with_config(&[&x], &config).unwrap();
        assert!(dot.contains("label=\"x0\""));
    }
}
