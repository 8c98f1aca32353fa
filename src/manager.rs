//! The BDD manager.
//!
//! A [`Manager`] owns the node table, the operation cache, the terminal node
//! and the variable order. Every operation goes through it, and every
//! [`BddNode`] it hands out keeps a shared reference to it.
//!
//! # Lifecycle
//!
//! ```text
//! Manager::new ──► open ──► close() ──► closed
//!                   │                     │
//!                   └ operations          └ every operation fails with
//!                                           BddError::ManagerClosed
//! ```
//!
//! Closing drops the tables immediately, even while handles are still alive;
//! those handles become inert and releasing them is a no-op.
//!
//! # Garbage collection
//!
//! Nodes whose reference count drops to zero are only marked dead. They are
//! freed at *safe points* (after a top-level operation has referenced its
//! result, or when a handle is released) once the number of dead nodes exceeds
//! [`BddConfig::gc_threshold`], or on an explicit [`Manager::collect_garbage`].
//! Collection clears the operation cache, since cached results may point at
//! freed slots.

use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use log::{debug, info};
use num_bigint::BigUint;

use crate::cache::OpCache;
use crate::config::BddConfig;
use crate::dot::DotConfig;
use crate::error::{BddError, Result};
use crate::handle::BddNode;
use crate::reference::Ref;
use crate::table::NodeTable;
use crate::types::Var;

/// Tables owned by an open manager.
pub(crate) struct State {
    pub(crate) table: NodeTable,
    pub(crate) cache: OpCache,
    /// Projection functions, one per declared variable. Each holds a reference.
    vars: Vec<Ref>,
    config: BddConfig,
}

impl State {
    pub(crate) fn new(config: BddConfig) -> Result<Self> {
        if config.table_size == 0 {
            return Err(BddError::Init("table size must be positive".to_string()));
        }
        if config.cache_size == 0 || config.cache_size > 1 << 31 {
            return Err(BddError::Init(format!(
                "cache size must be in range 1..=2^31, got {}",
                config.cache_size
            )));
        }
        if config.num_vars >= u32::MAX as usize {
            return Err(BddError::Init(format!("too many variables: {}", config.num_vars)));
        }

        let table = NodeTable::with_capacity(config.table_size, config.num_vars)
            .map_err(|e| BddError::Init(format!("node table: {}", e)))?;
        let cache = OpCache::new(config.cache_bits()).map_err(|e| BddError::Init(format!("operation cache: {}", e)))?;

        let mut state = Self {
            table,
            cache,
            vars: Vec::with_capacity(config.num_vars),
            config,
        };
        for v in 0..state.table.num_vars() {
            state.pin_var(Var::new(v as u32));
        }
        Ok(state)
    }

    fn pin_var(&mut self, v: Var) -> Ref {
        let x = self.table.get_or_create(v, Ref::ONE, Ref::ZERO);
        self.table.incref(x);
        self.vars.push(x);
        x
    }

    /// The projection function of a declared variable.
    pub(crate) fn var_ref(&self, v: Var) -> Ref {
        self.vars[v.index() as usize]
    }

    pub(crate) fn check_var(&self, index: u32) -> Result<Var> {
        if (index as usize) < self.vars.len() {
            Ok(Var::new(index))
        } else {
            Err(BddError::InvalidVariable {
                index,
                num_vars: self.vars.len(),
            })
        }
    }

    pub(crate) fn new_var(&mut self) -> Ref {
        let v = self.table.add_variable();
        self.pin_var(v)
    }

    pub(crate) fn collect_garbage(&mut self) -> usize {
        debug!(
            "clearing cache: {} hits, {} misses, {} faults",
            self.cache.hits(),
            self.cache.misses(),
            self.cache.faults()
        );
        self.cache.clear();
        self.table.collect_garbage()
    }

    /// Fails if `node` is a view whose slot has been freed since it was taken.
    pub(crate) fn check_live(&self, node: &BddNode) -> Result<()> {
        match node.stamp() {
            Some(generation) if !self.table.is_current(node.edge().id(), generation) => {
                Err(BddError::StaleHandle)
            }
            _ => Ok(()),
        }
    }

    /// Runs garbage collection if enough nodes are dead. Only call at a safe point.
    pub(crate) fn maybe_collect(&mut self) {
        if self.table.dead_count() > self.config.gc_threshold {
            debug!(
                "dead nodes ({}) above threshold ({}), collecting",
                self.table.dead_count(),
                self.config.gc_threshold
            );
            self.collect_garbage();
        }
    }
}

pub(crate) struct Shared {
    /// `None` once the manager is closed.
    pub(crate) state: RefCell<Option<State>>,
}

/// Handle to a BDD manager.
///
/// Cloning the handle yields another reference to the same manager.
///
/// ```
/// use rcbdd::manager::Manager;
///
/// let mgr = Manager::new(2, 1024, 1024).unwrap();
/// let x0 = mgr.var(0).unwrap();
/// let x1 = mgr.var(1).unwrap();
/// let f = mgr.apply_and(&x0, &x1).unwrap();
/// assert_eq!(mgr.minterms(&f, 2).unwrap(), 1.0);
/// assert_eq!(f.then_child().unwrap(), x1);
/// ```
#[derive(Clone)]
pub struct Manager {
    shared: Rc<Shared>,
}

impl Manager {
    /// Creates a manager with `num_vars` variables and the given size hints.
    pub fn new(num_vars: usize, table_size: usize, cache_size: usize) -> Result<Self> {
        Self::with_config(
            BddConfig::default()
                .with_num_vars(num_vars)
                .with_table_size(table_size)
                .with_cache_size(cache_size),
        )
    }

    pub fn with_config(config: BddConfig) -> Result<Self> {
        let state = State::new(config)?;
        info!(
            "Created manager with {} variables, cache of {} slots",
            state.table.num_vars(),
            state.cache.capacity()
        );
        Ok(Self {
            shared: Rc::new(Shared {
                state: RefCell::new(Some(state)),
            }),
        })
    }

    pub(crate) fn from_shared(shared: Rc<Shared>) -> Self {
        Self { shared }
    }

    /// Tears down the manager. Outstanding handles become invalid.
    ///
    /// Closing an already closed manager is a no-op.
    pub fn close(&self) {
        if let Some(state) = self.shared.state.borrow_mut().take() {
            info!(
                "Closed manager: {} nodes stored, {} live",
                state.table.size(),
                state.table.live_count()
            );
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shared.state.borrow().is_none()
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> Result<R> {
        let mut guard = self.shared.state.borrow_mut();
        let state = guard.as_mut().ok_or(BddError::ManagerClosed)?;
        Ok(f(state))
    }

    fn check(&self, node: &BddNode) -> Result<()> {
        if Rc::ptr_eq(node.shared(), &self.shared) {
            Ok(())
        } else {
            Err(BddError::CrossManager)
        }
    }

    fn owned(&self, edge: Ref) -> BddNode {
        BddNode::owned(Rc::clone(&self.shared), edge)
    }

    /// Runs a combinator over the operands and wraps the result in an owning handle.
    ///
    /// Operands are referenced for the whole operation and released only after
    /// the result has been referenced; garbage collection runs afterwards.
    fn combine<const N: usize>(
        &self,
        operands: [&BddNode; N],
        op: impl FnOnce(&mut State, [Ref; N]) -> Ref,
    ) -> Result<BddNode> {
        for node in operands {
            self.check(node)?;
        }
        let edges = operands.map(|node| node.edge());
        let res = self.with_state(|state| -> Result<Ref> {
            for node in operands {
                state.check_live(node)?;
            }
            for &e in &edges {
                state.table.incref(e);
            }
            let res = op(state, edges);
            state.table.incref(res);
            for &e in &edges {
                state.table.decref(e);
            }
            state.maybe_collect();
            Ok(res)
        })??;
        Ok(self.owned(res))
    }

    /// Reads from the tables on behalf of `node`.
    fn inspect<R>(&self, node: &BddNode, f: impl FnOnce(&State, Ref) -> R) -> Result<R> {
        self.check(node)?;
        let edge = node.edge();
        self.with_state(|state| {
            state.check_live(node)?;
            Ok(f(state, edge))
        })?
    }

    pub fn num_vars(&self) -> Result<usize> {
        self.with_state(|state| state.vars.len())
    }

    /// The projection function of variable `index`.
    ///
    /// Fails with [`BddError::InvalidVariable`] if `index` is not declared;
    /// use [`Manager::new_var`] to extend the order.
    pub fn var(&self, index: u32) -> Result<BddNode> {
        let x = self.with_state(|state| -> Result<Ref> {
            let v = state.check_var(index)?;
            let x = state.var_ref(v);
            state.table.incref(x);
            Ok(x)
        })??;
        Ok(self.owned(x))
    }

    /// Declares a new variable at the bottom of the order and returns its projection.
    pub fn new_var(&self) -> Result<BddNode> {
        let x = self.with_state(|state| {
            let x = state.new_var();
            state.table.incref(x);
            x
        })?;
        Ok(self.owned(x))
    }

    /// The constant 1.
    pub fn one(&self) -> Result<BddNode> {
        self.with_state(|_| ())?;
        Ok(self.owned(Ref::ONE))
    }

    /// The constant 0.
    pub fn zero(&self) -> Result<BddNode> {
        self.with_state(|_| ())?;
        Ok(self.owned(Ref::ZERO))
    }

    pub fn apply_ite(&self, f: &BddNode, g: &BddNode, h: &BddNode) -> Result<BddNode> {
        debug!("apply_ite(f = {}, g = {}, h = {})", f, g, h);
        self.combine([f, g, h], |state, [f, g, h]| state.ite(f, g, h))
    }

    pub fn apply_and(&self, f: &BddNode, g: &BddNode) -> Result<BddNode> {
        debug!("apply_and(f = {}, g = {})", f, g);
        self.combine([f, g], |state, [f, g]| state.and(f, g))
    }

    pub fn apply_or(&self, f: &BddNode, g: &BddNode) -> Result<BddNode> {
        debug!("apply_or(f = {}, g = {})", f, g);
        self.combine([f, g], |state, [f, g]| state.or(f, g))
    }

    pub fn apply_xor(&self, f: &BddNode, g: &BddNode) -> Result<BddNode> {
        debug!("apply_xor(f = {}, g = {})", f, g);
        self.combine([f, g], |state, [f, g]| state.xor(f, g))
    }

    pub fn apply_eq(&self, f: &BddNode, g: &BddNode) -> Result<BddNode> {
        debug!("apply_eq(f = {}, g = {})", f, g);
        self.combine([f, g], |state, [f, g]| state.eq(f, g))
    }

    pub fn apply_imply(&self, f: &BddNode, g: &BddNode) -> Result<BddNode> {
        debug!("apply_imply(f = {}, g = {})", f, g);
        self.combine([f, g], |state, [f, g]| state.imply(f, g))
    }

    pub fn apply_not(&self, f: &BddNode) -> Result<BddNode> {
        self.combine([f], |_, [f]| -f)
    }

    pub fn apply_and_many<'a>(&self, nodes: impl IntoIterator<Item = &'a BddNode>) -> Result<BddNode> {
        let mut res = self.one()?;
        for node in nodes {
            res = self.apply_and(&res, node)?;
        }
        Ok(res)
    }

    pub fn apply_or_many<'a>(&self, nodes: impl IntoIterator<Item = &'a BddNode>) -> Result<BddNode> {
        let mut res = self.zero()?;
        for node in nodes {
            res = self.apply_or(&res, node)?;
        }
        Ok(res)
    }

    /// Cofactor `f|x<-value`.
    pub fn restrict(&self, f: &BddNode, index: u32, value: bool) -> Result<BddNode> {
        let v = self.with_state(|state| state.check_var(index))??;
        self.combine([f], |state, [f]| state.restrict(f, v, value))
    }

    /// Existential quantification of variable `index`.
    pub fn exists(&self, f: &BddNode, index: u32) -> Result<BddNode> {
        let v = self.with_state(|state| state.check_var(index))??;
        self.combine([f], |state, [f]| state.exists(f, v))
    }

    /// Universal quantification of variable `index`.
    pub fn forall(&self, f: &BddNode, index: u32) -> Result<BddNode> {
        let v = self.with_state(|state| state.check_var(index))??;
        self.combine([f], |state, [f]| state.forall(f, v))
    }

    /// Conjunction of `(variable, polarity)` literals.
    pub fn cube(&self, literals: impl IntoIterator<Item = (u32, bool)>) -> Result<BddNode> {
        let literals: Vec<(u32, bool)> = literals.into_iter().collect();
        let literals = self.with_state(|state| -> Result<Vec<(Var, bool)>> {
            literals.iter().map(|&(index, b)| Ok((state.check_var(index)?, b))).collect()
        })??;
        self.combine([], |state, []| state.cube(&literals))
    }

    /// Then-child (positive cofactor w.r.t. the top variable) as a borrowed view.
    ///
    /// The view does not hold a reference. Once its node is reclaimed, using it
    /// fails with [`BddError::StaleHandle`].
    pub fn then_child(&self, f: &BddNode) -> Result<BddNode> {
        let (child, generation) = self.inspect(f, |state, f| {
            let child = state.table.high_node(f);
            (child, state.table.generation(child.id()))
        })?;
        Ok(BddNode::borrowed(Rc::clone(&self.shared), child, generation))
    }

    /// Else-child (negative cofactor w.r.t. the top variable) as a borrowed view.
    pub fn else_child(&self, f: &BddNode) -> Result<BddNode> {
        let (child, generation) = self.inspect(f, |state, f| {
            let child = state.table.low_node(f);
            (child, state.table.generation(child.id()))
        })?;
        Ok(BddNode::borrowed(Rc::clone(&self.shared), child, generation))
    }

    /// Top variable of `f`, or [`Var::TERMINAL`] for constants.
    pub fn node_index(&self, f: &BddNode) -> Result<Var> {
        self.inspect(f, |state, f| state.table.variable(f))
    }

    pub fn is_constant(&self, f: &BddNode) -> Result<bool> {
        self.inspect(f, |_, f| f.is_terminal())
    }

    /// Number of satisfying assignments of `f` over `num_vars` variables.
    pub fn minterms(&self, f: &BddNode, num_vars: usize) -> Result<f64> {
        self.inspect(f, |state, f| state.minterms(f, num_vars))
    }

    /// Exact number of satisfying assignments of `f` over `num_vars` variables.
    pub fn sat_count(&self, f: &BddNode, num_vars: usize) -> Result<BigUint> {
        self.inspect(f, |state, f| state.sat_count(f, num_vars))
    }

    /// Number of distinct nodes reachable from `f`, terminal included.
    pub fn dag_size(&self, f: &BddNode) -> Result<usize> {
        self.inspect(f, |state, f| state.dag_size(f))
    }

    /// One satisfying path of `f` as `(variable, value)` pairs, or `None` if `f` is 0.
    pub fn one_sat(&self, f: &BddNode) -> Result<Option<Vec<(Var, bool)>>> {
        self.inspect(f, |state, f| state.one_sat(f))
    }

    /// Evaluates `f` under a full assignment indexed by variable.
    pub fn eval(&self, f: &BddNode, assignment: &[bool]) -> Result<bool> {
        self.inspect(f, |state, f| state.eval(f, assignment))?
    }

    /// Number of live nodes (positive reference count), terminal included.
    pub fn node_count(&self) -> Result<usize> {
        self.with_state(|state| state.table.live_count())
    }

    /// Number of stored nodes, dead ones included.
    pub fn table_size(&self) -> Result<usize> {
        self.with_state(|state| state.table.size())
    }

    pub fn dead_count(&self) -> Result<usize> {
        self.with_state(|state| state.table.dead_count())
    }

    pub fn cache_hits(&self) -> Result<usize> {
        self.with_state(|state| state.cache.hits())
    }

    pub fn cache_misses(&self) -> Result<usize> {
        self.with_state(|state| state.cache.misses())
    }

    /// Frees all dead nodes now. Returns the number of freed nodes.
    pub fn collect_garbage(&self) -> Result<usize> {
        self.with_state(|state| state.collect_garbage())
    }

    /// Renders the diagrams rooted at `roots` in Graphviz DOT format.
    pub fn to_dot(&self, roots: &[&BddNode]) -> Result<String> {
        self.to_dot_with_config(roots, &DotConfig::default())
    }

    pub fn to_dot_with_config(&self, roots: &[&BddNode], config: &DotConfig) -> Result<String> {
        for node in roots {
            self.check(node)?;
        }
        let edges: Vec<Ref> = roots.iter().map(|node| node.edge()).collect();
        let dot = self.with_state(|state| -> Result<String> {
            for node in roots {
                state.check_live(node)?;
            }
            Ok(state.to_dot(&edges, config)?)
        })??;
        Ok(dot)
    }
}

impl PartialEq for Manager {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared)
    }
}

impl Eq for Manager {}

impl Debug for Manager {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.shared.state.try_borrow() {
            Ok(guard) => match guard.as_ref() {
                Some(state) => f
                    .debug_struct("Manager")
                    .field("num_vars", &state.vars.len())
                    .field("size", &state.table.size())
                    .field("live", &state.table.live_count())
                    .field("cache_capacity", &state.cache.capacity())
                    .finish(),
                None => f.debug_struct("Manager").field("closed", &true).finish(),
            },
            Err(_) => f.debug_struct("Manager").finish_non_exhaustive(),
        }
    }
}
