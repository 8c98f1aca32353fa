use std::fmt::{Display, Formatter};
use std::ops::Neg;

use crate::types::NodeId;

/// A complement edge: a reference to a node, possibly negated.
///
/// The complement bit is an explicit flag rather than a tag packed into the
/// identifier. A single terminal node represents both constants:
/// [`Ref::ONE`] is the plain edge to it, [`Ref::ZERO`] the negated one.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Ref {
    id: NodeId,
    negated: bool,
}

impl Ref {
    pub const ONE: Self = Self::positive(NodeId::TERMINAL);
    pub const ZERO: Self = Self::negative(NodeId::TERMINAL);

    /// Creates a new reference with the given node ID and negation flag.
    pub const fn new(id: NodeId, negated: bool) -> Self {
        Self { id, negated }
    }

    pub const fn positive(id: NodeId) -> Self {
        Self::new(id, false)
    }

    pub const fn negative(id: NodeId) -> Self {
        Self::new(id, true)
    }

    /// Returns the node ID this reference points to.
    #[inline]
    pub const fn id(self) -> NodeId {
        self.id
    }

    #[inline]
    pub const fn is_negated(self) -> bool {
        self.negated
    }

    /// Negates the reference if `flag` is set.
    #[inline]
    pub fn negate_if(self, flag: bool) -> Self {
        if flag {
            -self
        } else {
            self
        }
    }

    /// Checks whether the reference points to the terminal node (either constant).
    #[inline]
    pub const fn is_terminal(self) -> bool {
        self.id.is_terminal()
    }

    /// Dense encoding used for hashing: `(id << 1) | negated`.
    pub(crate) fn as_lit(self) -> u64 {
        ((self.id.raw() as u64) << 1) | self.negated as u64
    }
}

// -Ref
impl Neg for Ref {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(self.id, !self.negated)
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.negated {
            write!(f, "~{}", self.id)
        } else {
            write!(f, "{}", self.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ref_negation() {
        let id = NodeId::new(5);
        let pos = Ref::positive(id);
        let neg = Ref::negative(id);

        assert_eq!(-pos, neg);
        assert_eq!(-neg, pos);
        assert_eq!(-(-pos), pos);
        assert_eq!(pos.negate_if(false), pos);
        assert_eq!(pos.negate_if(true), neg);
    }

    #[test]
    fn test_ref_constants() {
        assert_eq!(-Ref::ONE, Ref::ZERO);
        assert!(Ref::ONE.is_terminal());
        assert!(Ref::ZERO.is_terminal());
        assert!(!Ref::ONE.is_negated());
        assert!(Ref::ZERO.is_negated());
    }

    #[test]
    fn test_ref_display() {
        let id = NodeId::new(42);
        assert_eq!(format!("{}", Ref::positive(id)), "@42");
        assert_eq!(format!("{}", Ref::negative(id)), "~@42");
    }

    #[test]
    fn test_ref_lit_is_injective() {
        let a = Ref::positive(NodeId::new(3));
        let b = Ref::negative(NodeId::new(3));
        let c = Ref::positive(NodeId::new(4));
        assert_ne!(a.as_lit(), b.as_lit());
        assert_ne!(b.as_lit(), c.as_lit());
        assert_eq!(a.as_lit(), 6);
        assert_eq!(b.as_lit(), 7);
    }
}
