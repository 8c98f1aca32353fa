//! Recursive combinators built on ITE.
//!
//! Every binary operator is expressed as an ITE triple:
//!
//! ```text
//! AND(f, g)   = ITE(f, g, 0)
//! OR(f, g)    = ITE(f, 1, g)
//! XOR(f, g)   = ITE(f, ~g, g)
//! EQ(f, g)    = ITE(f, g, ~g)
//! IMPLY(f, g) = ITE(f, g, 1)
//! ```
//!
//! These functions operate on raw [`Ref`]s inside a [`State`] and never run
//! garbage collection, so intermediate results cannot be reclaimed while a
//! recursion is in flight.

use std::collections::HashMap;

use log::debug;

use crate::cache::OpKey;
use crate::manager::State;
use crate::reference::Ref;
use crate::types::Var;

impl State {
    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(f, g, h) = (f ∧ g) ∨ (¬f ∧ h)
    /// ```
    pub(crate) fn ite(&mut self, f: Ref, g: Ref, h: Ref) -> Ref {
        debug!("ite(f = {}, g = {}, h = {})", f, g, h);

        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        if f == Ref::ONE {
            return g;
        }
        if f == Ref::ZERO {
            return h;
        }

        // From now on, F is known not to be a constant.

        // More base cases:
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        //   ite(F,1,~F) => 1
        //   ite(F,F,1) => 1
        //   ite(F,~F,0) => 0
        //   ite(F,0,F) => F
        if g == h {
            return g;
        }
        if g == Ref::ONE && h == Ref::ZERO {
            return f;
        }
        if g == Ref::ZERO && h == Ref::ONE {
            return -f;
        }
        if g == Ref::ONE && h == -f {
            return Ref::ONE;
        }
        if g == f && h == Ref::ONE {
            return Ref::ONE;
        }
        if g == -f && h == Ref::ZERO {
            return Ref::ZERO;
        }
        if g == Ref::ZERO && h == f {
            return f;
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,~F) => ite(F,G,1)
        if g == f {
            debug!("ite(F,F,H) => ite(F,1,H)");
            return self.ite(f, Ref::ONE, h);
        }
        if h == f {
            debug!("ite(F,G,F) => ite(F,G,0)");
            return self.ite(f, g, Ref::ZERO);
        }
        if g == -f {
            debug!("ite(F,~F,H) => ite(F,0,H)");
            return self.ite(f, Ref::ZERO, h);
        }
        if h == -f {
            debug!("ite(F,G,~F) => ite(F,G,1)");
            return self.ite(f, g, Ref::ONE);
        }

        let i = self.table.variable(f);
        let j = self.table.variable(g);
        let k = self.table.variable(h);

        // Equivalent pairs (choose the one with the topmost first operand):
        //   ite(F,1,H) == ite(H,1,F) == F ∨ H
        //   ite(F,G,0) == ite(G,F,0) == F ∧ G
        //   ite(F,G,1) == ite(~G,~F,1) == F -> G
        //   ite(F,0,H) == ite(~H,0,~F) == ~F ∧ H
        //   ite(F,G,~G) == ite(G,F,~F)
        if g == Ref::ONE && k < i {
            return self.ite(h, Ref::ONE, f);
        }
        if h == Ref::ZERO && j < i {
            return self.ite(g, f, Ref::ZERO);
        }
        if h == Ref::ONE && j < i {
            return self.ite(-g, -f, Ref::ONE);
        }
        if g == Ref::ZERO && k < i {
            return self.ite(-h, Ref::ZERO, -f);
        }
        if g == -h && j < i {
            return self.ite(g, f, -f);
        }

        // Make sure the first two operands are regular (not negated):
        //   ite(~F,G,H) => ite(F,H,G)
        //   ite(F,~G,H) => ~ite(F,G,~H)
        let (mut f, mut g, mut h) = (f, g, h);
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }
        let negate = g.is_negated();
        if negate {
            g = -g;
            h = -h;
        }

        let key = OpKey::Ite(f, g, h);
        if let Some(&res) = self.cache.get(&key) {
            debug!("cache: ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
            return res.negate_if(negate);
        }

        // Terminals carry the largest index, so the minimum is the top variable.
        let m = i.min(j).min(k);
        debug_assert!(!m.is_terminal());

        let (f0, f1) = self.table.top_cofactors(f, m);
        let (g0, g1) = self.table.top_cofactors(g, m);
        let (h0, h1) = self.table.top_cofactors(h, m);

        let e = self.ite(f0, g0, h0);
        let t = self.ite(f1, g1, h1);

        let res = self.table.get_or_create(m, t, e);
        debug!("computed: ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
        self.cache.insert(key, res);

        res.negate_if(negate)
    }

    pub(crate) fn and(&mut self, f: Ref, g: Ref) -> Ref {
        self.ite(f, g, Ref::ZERO)
    }

    pub(crate) fn or(&mut self, f: Ref, g: Ref) -> Ref {
        self.ite(f, Ref::ONE, g)
    }

    pub(crate) fn xor(&mut self, f: Ref, g: Ref) -> Ref {
        self.ite(f, -g, g)
    }

    pub(crate) fn eq(&mut self, f: Ref, g: Ref) -> Ref {
        self.ite(f, g, -g)
    }

    pub(crate) fn imply(&mut self, f: Ref, g: Ref) -> Ref {
        self.ite(f, g, Ref::ONE)
    }

    /// Cofactor `f|v<-b`.
    pub(crate) fn restrict(&mut self, f: Ref, v: Var, b: bool) -> Ref {
        let mut memo = HashMap::new();
        self.restrict_(f, v, b, &mut memo)
    }

    fn restrict_(&mut self, f: Ref, v: Var, b: bool, memo: &mut HashMap<Ref, Ref>) -> Ref {
        let i = self.table.variable(f);

        if v < i {
            // 'f' does not depend on 'v' (this also covers terminals)
            return f;
        }

        if v == i {
            return if b {
                self.table.high_node(f)
            } else {
                self.table.low_node(f)
            };
        }

        if let Some(&res) = memo.get(&f) {
            return res;
        }

        let low = self.restrict_(self.table.low_node(f), v, b, memo);
        let high = self.restrict_(self.table.high_node(f), v, b, memo);
        let res = self.table.get_or_create(i, high, low);
        memo.insert(f, res);
        res
    }

    /// Existential quantification `∃v. f = f|v<-0 ∨ f|v<-1`.
    pub(crate) fn exists(&mut self, f: Ref, v: Var) -> Ref {
        let i = self.table.variable(f);
        if v < i {
            return f;
        }

        let key = OpKey::Exists(f, v);
        if let Some(&res) = self.cache.get(&key) {
            debug!("cache: exists(f = {}, v = {}) -> {}", f, v, res);
            return res;
        }

        let (f0, f1) = self.table.top_cofactors(f, i);
        let res = if v == i {
            self.or(f0, f1)
        } else {
            let low = self.exists(f0, v);
            let high = self.exists(f1, v);
            self.table.get_or_create(i, high, low)
        };

        debug!("computed: exists(f = {}, v = {}) -> {}", f, v, res);
        self.cache.insert(key, res);
        res
    }

    /// Universal quantification `∀v. f = ¬∃v. ¬f`.
    pub(crate) fn forall(&mut self, f: Ref, v: Var) -> Ref {
        -self.exists(-f, v)
    }

    /// Conjunction of literals, built bottom-up without going through ITE.
    ///
    /// Duplicate literals collapse; a variable with both polarities yields 0.
    pub(crate) fn cube(&mut self, literals: &[(Var, bool)]) -> Ref {
        let mut literals = literals.to_vec();
        literals.sort();
        literals.dedup();
        if literals.windows(2).any(|w| w[0].0 == w[1].0) {
            return Ref::ZERO;
        }

        let mut current = Ref::ONE;
        for &(v, positive) in literals.iter().rev() {
            current = if positive {
                self.table.get_or_create(v, current, Ref::ZERO)
            } else {
                self.table.get_or_create(v, Ref::ZERO, current)
            };
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::config::BddConfig;

    fn state(num_vars: usize) -> State {
        State::new(BddConfig::default().with_num_vars(num_vars).with_table_size(64).with_cache_size(64))
            .unwrap()
    }

    #[test]
    fn test_var() {
        let s = state(1);
        let x = s.var_ref(Var::new(0));
        assert_eq!(s.table.variable(x), Var::new(0));
        assert_eq!(s.table.high_node(x), Ref::ONE);
        assert_eq!(s.table.low_node(x), Ref::ZERO);
        assert_eq!(s.table.high_node(-x), Ref::ZERO);
        assert_eq!(s.table.low_node(-x), Ref::ONE);
    }

    #[test]
    fn test_apply_ite_terminal_cases() {
        let mut s = state(3);
        let g = s.var_ref(Var::new(1));
        let h = s.var_ref(Var::new(2));
        assert_eq!(s.ite(Ref::ONE, g, h), g);
        assert_eq!(s.ite(Ref::ZERO, g, h), h);

        let f = s.var_ref(Var::new(0));
        assert_eq!(s.ite(f, g, g), g);
        assert_eq!(s.ite(f, Ref::ONE, Ref::ZERO), f);
        assert_eq!(s.ite(f, Ref::ZERO, Ref::ONE), -f);
    }

    #[test]
    fn test_apply_ite_standard_triples() {
        let mut s = state(3);
        let f = s.var_ref(Var::new(0));
        let g = s.var_ref(Var::new(1));
        let h = s.var_ref(Var::new(2));

        let f_or_h = s.or(f, h);
        assert_eq!(s.ite(f, f, h), f_or_h);
        let f_and_g = s.and(f, g);
        assert_eq!(s.ite(f, g, f), f_and_g);
        assert_eq!(s.ite(f, -g, Ref::ONE), -f_and_g);
        assert_eq!(s.ite(f, Ref::ZERO, -h), -f_or_h);
    }

    #[test]
    fn test_apply_ite_general() {
        let mut s = state(3);
        let f = s.var_ref(Var::new(0));
        let g = s.var_ref(Var::new(1));
        let h = s.var_ref(Var::new(2));

        let expected = s.table.get_or_create(Var::new(0), -h, -g);
        assert_eq!(s.ite(-f, -g, -h), expected);

        // ite(f, g, h) == (f ∧ g) ∨ (¬f ∧ h)
        let res = s.ite(f, g, h);
        let a = s.and(f, g);
        let b = s.and(-f, h);
        assert_eq!(res, s.or(a, b));
    }

    #[test]
    fn test_de_morgan() {
        let mut s = state(2);
        let x = s.var_ref(Var::new(0));
        let y = s.var_ref(Var::new(1));

        let f = -s.and(x, y);
        assert_eq!(f, s.or(-x, -y));
        let g = -s.or(x, y);
        assert_eq!(g, s.and(-x, -y));
    }

    #[test]
    fn test_xor_itself_and_contrary() {
        let mut s = state(2);
        let x = s.var_ref(Var::new(0));
        let y = s.var_ref(Var::new(1));
        let f = s.and(x, y);

        assert_eq!(s.xor(f, f), Ref::ZERO);
        assert_eq!(s.xor(f, -f), Ref::ONE);
        assert_eq!(s.eq(f, f), Ref::ONE);
        assert_eq!(s.imply(f, x), Ref::ONE);
        assert_eq!(s.imply(x, f), s.or(-x, y));
    }

    #[test]
    fn test_negation_in_ite_cache() {
        let mut s = state(2);
        let x = s.var_ref(Var::new(0));
        let y = s.var_ref(Var::new(1));

        let f = s.xor(x, y);
        let g = s.xor(x, -y);
        assert_eq!(g, -f);
        assert_eq!(s.xor(x, -y), g);
        assert_eq!(s.eq(x, y), g);
    }

    #[test]
    fn test_cache_miss_recomputes_same_result() {
        let mut s = state(3);
        let x = s.var_ref(Var::new(0));
        let y = s.var_ref(Var::new(1));
        let z = s.var_ref(Var::new(2));

        let xy = s.and(x, y);
        let f = s.or(xy, z);
        s.cache.clear();
        let xy = s.and(x, y);
        assert_eq!(s.or(xy, z), f);
    }

    #[test]
    fn test_restrict() {
        let mut s = state(3);
        let x1 = s.var_ref(Var::new(0));
        let x2 = s.var_ref(Var::new(1));
        let x3 = s.var_ref(Var::new(2));

        // (x1 <-> x2) ∨ x3
        let e = s.eq(x1, x2);
        let f = s.or(e, x3);
        let f_x2_zero = s.restrict(f, Var::new(1), false);
        assert_eq!(f_x2_zero, s.or(-x1, x3));

        let f_x1_one = s.restrict(f, Var::new(0), true);
        assert_eq!(f_x1_one, s.or(x2, x3));

        // Restricting a variable below the support is the identity.
        let g = s.and(x1, x2);
        assert_eq!(s.restrict(g, Var::new(2), true), g);
    }

    #[test]
    fn test_exists_forall() {
        let mut s = state(3);
        let x = s.var_ref(Var::new(0));
        let y = s.var_ref(Var::new(1));
        let z = s.var_ref(Var::new(2));

        let xy = s.and(x, y);
        assert_eq!(s.exists(xy, Var::new(0)), y);
        assert_eq!(s.exists(xy, Var::new(1)), x);
        assert_eq!(s.forall(xy, Var::new(1)), Ref::ZERO);

        let f = s.or(xy, z);
        assert_eq!(s.exists(f, Var::new(2)), Ref::ONE);
        assert_eq!(s.forall(f, Var::new(2)), xy);

        let x_or_y = s.or(x, y);
        assert_eq!(s.forall(x_or_y, Var::new(0)), y);
    }

    #[test]
    fn test_cube() {
        let mut s = state(3);
        let x1 = s.var_ref(Var::new(0));
        let x2 = s.var_ref(Var::new(1));
        let x3 = s.var_ref(Var::new(2));

        let a = s.and(x1, x2);
        let f = s.and(a, x3);
        let cube = s.cube(&[(Var::new(2), true), (Var::new(0), true), (Var::new(1), true)]);
        assert_eq!(f, cube);

        let a = s.and(x1, -x2);
        let f = s.and(a, -x3);
        let cube = s.cube(&[(Var::new(0), true), (Var::new(1), false), (Var::new(2), false)]);
        assert_eq!(f, cube);

        assert_eq!(s.cube(&[]), Ref::ONE);
        assert_eq!(s.cube(&[(Var::new(0), true), (Var::new(0), true)]), x1);
        assert_eq!(s.cube(&[(Var::new(0), true), (Var::new(0), false)]), Ref::ZERO);
    }
}
