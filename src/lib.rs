//! # rcbdd: reference-counted Binary Decision Diagrams
//!
//! **`rcbdd`** implements reduced ordered BDDs with complement edges, a shared
//! unique table and an operation cache, all owned by a [`Manager`].
//!
//! ## Key Features
//!
//! - **Canonical**: for a fixed variable order, equivalent functions are the same node.
//!   Equivalence checks are a comparison of two [`Ref`]s.
//! - **Complement edges**: negation is constant-time; a function and its negation share all nodes.
//! - **Reference counting**: each [`BddNode`] handle owns a reference on its node.
//!   Dropping (or [closing][BddNode::close]) the last handle makes the node dead, and dead
//!   nodes are reclaimed at safe points.
//! - **0-indexed variables**: variable `0` is the top of the order.
//!
//! ## Basic Usage
//!
//! ```rust
//! use rcbdd::manager::Manager;
//!
//! let mgr = Manager::new(3, 1 << 10, 1 << 10).unwrap();
//! let x0 = mgr.var(0).unwrap();
//! let x1 = mgr.var(1).unwrap();
//!
//! // f = x0 ∧ ¬x1
//! let not_x1 = mgr.apply_not(&x1).unwrap();
//! let f = mgr.apply_and(&x0, &not_x1).unwrap();
//!
//! assert!(!f.is_constant());
//! assert_eq!(mgr.minterms(&f, 3).unwrap(), 2.0);
//! assert!(mgr.eval(&f, &[true, false, true]).unwrap());
//!
//! mgr.close();
//! assert!(mgr.apply_or(&x0, &x1).is_err());
//! ```
//!
//! ## Core Components
//!
//! - **[`manager`]**: the [`Manager`] handle and the public operations.
//! - **[`handle`]**: [`BddNode`], the reference-holding handle.
//! - **[`table`]**: the unique table with reference counts and garbage collection.
//! - **[`cache`]**: the operation cache.
//! - **[`dot`]**: Graphviz export.

mod apply;
pub mod cache;
pub mod config;
mod count;
pub mod dot;
pub mod error;
pub mod handle;
pub mod manager;
pub mod node;
pub mod reference;
pub mod subtable;
pub mod table;
pub mod types;
pub mod utils;

pub use config::BddConfig;
pub use error::{BddError, Result};
pub use handle::BddNode;
pub use manager::Manager;
pub use reference::Ref;
pub use types::{NodeId, Var};
