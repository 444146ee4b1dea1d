//! Truth-value evaluation of expressions.
//!
//! Used to check that a rewrite is sound: two expressions over [`Lit`] atoms are
//! [`equivalent`] iff they agree on every assignment of their variables.

use std::collections::HashSet;

use crate::atom::{Atom, Lit};
use crate::expr::{Expr, Node};
use crate::types::Literal;

impl<A: Atom> Expr<A> {
    /// Evaluates the expression, asking `value` for the truth value of each atom occurrence.
    ///
    /// An empty AND is true and an empty OR is false.
    pub fn eval<F>(&self, value: &mut F) -> bool
    where
        F: FnMut(&A) -> bool,
    {
        self.fold(&mut |node: Node<'_, A, bool>| match node {
            Node::Atom(a) => value(a),
            Node::Literal(l) => l.value(),
            Node::Compound(op, xs) => match op.identity() {
                Literal::Universal => xs.into_iter().all(|x| x),
                Literal::EmptySet => xs.into_iter().any(|x| x),
            },
        })
    }

    /// Distinct atoms occurring in the expression, in order of first occurrence.
    pub fn atoms(&self) -> Vec<A> {
        let mut seen = HashSet::new();
        let mut atoms = Vec::new();
        self.for_each_leaf(&mut |leaf| {
            if let Some(a) = leaf.as_atom() {
                if seen.insert(a.clone()) {
                    atoms.push(a.clone());
                }
            }
        });
        atoms
    }
}

impl Expr<Lit> {
    /// Evaluates under a full assignment: bit `i - 1` of `mask` is the value of variable `i`.
    pub fn eval_mask(&self, mask: u64) -> bool {
        self.eval(&mut |lit: &Lit| {
            let var = lit.var().id();
            lit.eval(var <= 64 && (mask >> (var - 1)) & 1 == 1)
        })
    }
}

/// Checks whether `f` and `g` agree on all assignments of variables `1..=num_vars`.
///
/// Exhaustive, so `num_vars` is limited to 20.
pub fn equivalent(f: &Expr<Lit>, g: &Expr<Lit>, num_vars: u32) -> bool {
    assert!(num_vars <= 20, "Too many variables for exhaustive check: {}", num_vars);
    (0..1u64 << num_vars).all(|mask| f.eval_mask(mask) == g.eval_mask(mask))
}
