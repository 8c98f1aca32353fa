//! Operation cache (computed table) for memoizing recursive combinators.
//!
//! The cache is an optimization only: entries may be evicted on collision or
//! cleared wholesale by garbage collection, and a miss always recomputes the
//! same canonical result.

mod direct_mapped;

pub use direct_mapped::DirectMappedCache;

use crate::reference::Ref;
use crate::types::Var;
use crate::utils::{pairing2, pairing3, MyHash};

/// Key of a memoized operation.
///
/// Operand order is significant: ITE is not commutative, and the derived
/// binary operators are normalized into ITE triples before they reach the cache.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OpKey {
    Ite(Ref, Ref, Ref),
    Exists(Ref, Var),
}

impl MyHash for OpKey {
    fn hash(&self) -> u64 {
        match *self {
            OpKey::Ite(f, g, h) => pairing3(f.as_lit(), g.as_lit(), h.as_lit()),
            OpKey::Exists(f, v) => pairing2(f.as_lit(), v.index() as u64).rotate_left(17),
        }
    }
}

/// The operation cache used by the manager.
pub type OpCache = DirectMappedCache<OpKey, Ref>;
