//! User-facing BDD handles.
//!
//! A [`BddNode`] pairs an edge with the manager it belongs to. *Owning*
//! handles hold one reference on their node and release it when closed or
//! dropped. *Views*, returned by [`BddNode::then_child`] and
//! [`BddNode::else_child`], hold no reference. A view remembers the
//! generation of the slot it points at, so once its node is reclaimed every
//! operation on it fails with [`BddError::StaleHandle`] instead of reading
//! whatever now occupies that slot. A closed owning handle turns into a view.
//!
//! [`BddError::StaleHandle`]: crate::error::BddError::StaleHandle

use std::fmt::{Debug, Display, Formatter};
use std::rc::Rc;

use log::warn;

use crate::error::Result;
use crate::manager::{Manager, Shared};
use crate::reference::Ref;
use crate::types::Var;

pub struct BddNode {
    shared: Rc<Shared>,
    edge: Ref,
    managed: bool,
    /// Slot generation for handles without a reference; `None` while owning.
    stamp: Option<u32>,
}

impl BddNode {
    /// Wraps an edge whose reference has already been taken on behalf of this handle.
    pub(crate) fn owned(shared: Rc<Shared>, edge: Ref) -> Self {
        Self {
            shared,
            edge,
            managed: true,
            stamp: None,
        }
    }

    pub(crate) fn borrowed(shared: Rc<Shared>, edge: Ref, generation: u32) -> Self {
        Self {
            shared,
            edge,
            managed: false,
            stamp: Some(generation),
        }
    }

    pub(crate) fn stamp(&self) -> Option<u32> {
        self.stamp
    }

    pub(crate) fn shared(&self) -> &Rc<Shared> {
        &self.shared
    }

    /// The underlying complement edge.
    pub fn edge(&self) -> Ref {
        self.edge
    }

    /// Whether this handle owns a reference (as opposed to being a view).
    pub fn is_managed(&self) -> bool {
        self.managed
    }

    pub fn manager(&self) -> Manager {
        Manager::from_shared(Rc::clone(&self.shared))
    }

    pub fn is_constant(&self) -> bool {
        self.edge.is_terminal()
    }

    pub fn is_one(&self) -> bool {
        self.edge == Ref::ONE
    }

    pub fn is_zero(&self) -> bool {
        self.edge == Ref::ZERO
    }

    pub fn node_index(&self) -> Result<Var> {
        self.manager().node_index(self)
    }

    pub fn dag_size(&self) -> Result<usize> {
        self.manager().dag_size(self)
    }

    pub fn then_child(&self) -> Result<BddNode> {
        self.manager().then_child(self)
    }

    pub fn else_child(&self) -> Result<BddNode> {
        self.manager().else_child(self)
    }

    /// Releases the reference held by this handle.
    ///
    /// Idempotent. A no-op for views and for handles of a closed manager.
    pub fn close(&mut self) {
        if !self.managed {
            return;
        }
        self.managed = false;

        match self.shared.state.try_borrow_mut() {
            Ok(mut guard) => {
                if let Some(state) = guard.as_mut() {
                    self.stamp = Some(state.table.generation(self.edge.id()));
                    state.table.decref(self.edge);
                    state.maybe_collect();
                }
            }
            Err(_) => {
                warn!("Manager is busy, leaking reference to {}", self.edge);
            }
        }
    }
}

impl Drop for BddNode {
    fn drop(&mut self) {
        self.close();
    }
}

impl Clone for BddNode {
    /// Cloning an owning handle takes another reference; cloning a view yields a view.
    fn clone(&self) -> Self {
        if self.managed {
            if let Ok(mut guard) = self.shared.state.try_borrow_mut() {
                if let Some(state) = guard.as_mut() {
                    state.table.incref(self.edge);
                    return Self::owned(Rc::clone(&self.shared), self.edge);
                }
            }
        }
        Self {
            shared: Rc::clone(&self.shared),
            edge: self.edge,
            managed: false,
            stamp: self.stamp,
        }
    }
}

impl PartialEq for BddNode {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.shared, &other.shared) && self.edge == other.edge
    }
}

impl Eq for BddNode {}

impl Debug for BddNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BddNode")
            .field("edge", &self.edge)
            .field("managed", &self.managed)
            .finish()
    }
}

impl Display for BddNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.edge)
    }
}
