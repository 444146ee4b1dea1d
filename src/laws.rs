//! Boolean-algebra rewrite laws.
//!
//! Each [`Law`] takes a compound node and returns every replacement it can derive (zero, one or
//! many, since a law may match independently at several operands). The laws are written once,
//! against the node's operator `⊕` and its dual `⊗`, so each of them covers both AND and OR.
//!
//! Replacements keep the lineage id of the node they replace. Compounds that did not exist before
//! (the factored product, distributed terms, new literals) get fresh ids.
//!
//! | Law | Rewrite |
//! |---|---|
//! | [`Law::Associative`] | `a ⊕ (b ⊕ c) = a ⊕ b ⊕ c` |
//! | [`Law::Redundancy`] | `a ⊕ (!a ⊗ b) = a ⊕ b` |
//! | [`Law::Absorption`] | `a ⊕ (a ⊗ b) = a` |
//! | [`Law::Factorization`] | `(x ⊗ a) ⊕ (x ⊗ b) = x ⊗ (a ⊕ b)` |
//! | [`Law::Idempotent`] | `a ⊕ a = a` |
//! | [`Law::Unary`] | `a & !a = false`, `a \| !a = true` |
//! | [`Law::EmptySet`] | `a & false = false`, `a \| false = a` |
//! | [`Law::UniversalSet`] | `a \| true = true`, `a & true = a` |
//! | [`Law::Distributive`] | `a ⊕ ((b ⊕ c) ⊗ d) = a ⊕ (b ⊗ d) ⊕ (c ⊗ d)` |

use std::fmt;

use crate::atom::Atom;
use crate::expr::{Compound, Expr};
use crate::types::{ExprId, IdAllocator, Literal, Operator};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Law {
    Associative,
    Redundancy,
    Absorption,
    Factorization,
    Idempotent,
    Unary,
    EmptySet,
    UniversalSet,
    Distributive,
}

impl Law {
    /// Order in which the laws are applied at each node.
    pub const ORDER: [Law; 9] = [
        Law::Associative,
        Law::Redundancy,
        Law::Absorption,
        Law::Factorization,
        Law::Idempotent,
        Law::Unary,
        Law::EmptySet,
        Law::UniversalSet,
        Law::Distributive,
    ];

    /// All replacements this law derives for `node`. Leaves yield nothing.
    pub fn apply<A: Atom>(self, node: &Expr<A>, ids: &IdAllocator) -> Vec<Expr<A>> {
        let Some(c) = node.as_compound() else {
            return Vec::new();
        };
        let id = node.id();
        match self {
            Law::Associative => associative(id, c),
            Law::Redundancy => redundancy(id, c),
            Law::Absorption => absorption(id, c),
            Law::Factorization => factorization(id, c, ids),
            Law::Idempotent => idempotent(id, c),
            Law::Unary => unary(id, c, ids),
            Law::EmptySet => constant(id, c, Literal::EmptySet),
            Law::UniversalSet => constant(id, c, Literal::Universal),
            Law::Distributive => distributive(id, c, ids),
        }
    }
}

impl fmt::Display for Law {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Law::Associative => "associative",
            Law::Redundancy => "redundancy",
            Law::Absorption => "absorption",
            Law::Factorization => "factorization",
            Law::Idempotent => "idempotent",
            Law::Unary => "unary",
            Law::EmptySet => "empty-set",
            Law::UniversalSet => "universal-set",
            Law::Distributive => "distributive",
        };
        write!(f, "{}", name)
    }
}

/// Applies every law in [`Law::ORDER`], dropping results equal to `node` or to an earlier result.
pub fn apply_all<A: Atom>(node: &Expr<A>, ids: &IdAllocator) -> Vec<(Law, Expr<A>)> {
    let mut results: Vec<(Law, Expr<A>)> = Vec::new();
    for law in Law::ORDER {
        for candidate in law.apply(node, ids) {
            if candidate == *node || results.iter().any(|(_, e)| *e == candidate) {
                continue;
            }
            results.push((law, candidate));
        }
    }
    results
}

/// A node with lineage `id` built from `operands`: unwrapped if only one operand is left,
/// the operator's identity if none is.
fn rebuild<A: Atom>(id: ExprId, op: Operator, mut operands: Vec<Expr<A>>) -> Expr<A> {
    if operands.len() > 1 {
        return Expr::new_compound(id, op, operands);
    }
    match operands.pop() {
        Some(single) => single.with_id(id),
        None => Expr::new_literal(id, op.identity()),
    }
}

/// A genuinely new node joining `operands`; a single operand is returned as is.
fn join<A: Atom>(ids: &IdAllocator, op: Operator, mut operands: Vec<Expr<A>>) -> Expr<A> {
    if operands.len() > 1 {
        return Expr::compound(ids, op, operands);
    }
    match operands.pop() {
        Some(single) => single,
        None => Expr::literal(ids, op.identity()),
    }
}

/// `expr` (a compound) without any operand equal to `target`.
fn remove_all<A: Atom>(expr: &Expr<A>, c: &Compound<A>, target: &Expr<A>) -> Expr<A> {
    let rest = c.operands().iter().filter(|o| *o != target).cloned().collect();
    rebuild(expr.id(), c.op(), rest)
}

/// `expr` (a compound) without the first operand equal to `target`.
fn remove_first<A: Atom>(expr: &Expr<A>, c: &Compound<A>, target: &Expr<A>) -> Expr<A> {
    let mut rest = c.operands().to_vec();
    if let Some(pos) = rest.iter().position(|o| o == target) {
        rest.remove(pos);
    }
    rebuild(expr.id(), c.op(), rest)
}

fn associative<A: Atom>(id: ExprId, c: &Compound<A>) -> Vec<Expr<A>> {
    let op = c.op();
    if !c.operands().iter().any(|o| o.is_compound_of(op)) {
        return Vec::new();
    }
    let mut operands = Vec::new();
    for operand in c.operands() {
        match operand.as_compound() {
            Some(inner) if inner.op() == op => operands.extend(inner.operands().iter().cloned()),
            _ => operands.push(operand.clone()),
        }
    }
    vec![rebuild(id, op, operands)]
}

fn redundancy<A: Atom>(id: ExprId, c: &Compound<A>) -> Vec<Expr<A>> {
    let dual = c.op().dual();
    let mut results = Vec::new();
    for (i, a) in c.operands().iter().enumerate() {
        let Some(not_a) = a.try_inverse() else {
            continue;
        };
        let mut changed = false;
        let mut operands = Vec::with_capacity(c.operands().len());
        for (j, other) in c.operands().iter().enumerate() {
            match other.as_compound() {
                Some(inner) if j != i && inner.op() == dual && inner.contains(&not_a) => {
                    changed = true;
                    operands.push(remove_all(other, inner, &not_a));
                }
                _ => operands.push(other.clone()),
            }
        }
        if changed {
            results.push(rebuild(id, c.op(), operands));
        }
    }
    results
}

fn absorption<A: Atom>(id: ExprId, c: &Compound<A>) -> Vec<Expr<A>> {
    let dual = c.op().dual();
    let mut results = Vec::new();
    for (i, a) in c.operands().iter().enumerate() {
        for (j, other) in c.operands().iter().enumerate() {
            if i == j {
                continue;
            }
            let Some(inner) = other.as_compound() else {
                continue;
            };
            if inner.op() != dual {
                continue;
            }
            let absorbed = inner.contains(a)
                || match a.as_compound() {
                    Some(sub) if sub.op() == dual => sub.operands().iter().all(|x| inner.contains(x)),
                    _ => false,
                };
            if absorbed {
                let mut operands = c.operands().to_vec();
                operands.remove(j);
                results.push(rebuild(id, c.op(), operands));
            }
        }
    }
    results
}

fn factorization<A: Atom>(id: ExprId, c: &Compound<A>, ids: &IdAllocator) -> Vec<Expr<A>> {
    let op = c.op();
    let dual = op.dual();
    let operands = c.operands();
    let products: Vec<usize> = (0..operands.len()).filter(|&i| operands[i].is_compound_of(dual)).collect();
    if products.len() < 2 {
        return Vec::new();
    }

    let mut results = Vec::new();
    let mut seen: Vec<&Expr<A>> = Vec::new();
    for &p in &products {
        for x in operands[p].operands() {
            if seen.contains(&x) {
                continue;
            }
            seen.push(x);

            let matched: Vec<usize> = products
                .iter()
                .copied()
                .filter(|&q| operands[q].as_compound().is_some_and(|inner| inner.contains(x)))
                .collect();
            if matched.len() < 2 {
                continue;
            }

            let mut remainders = Vec::with_capacity(matched.len());
            for &q in &matched {
                if let Some(inner) = operands[q].as_compound() {
                    remainders.push(remove_first(&operands[q], inner, x));
                }
            }
            let factored = join(ids, dual, vec![x.clone(), join(ids, op, remainders)]);

            let mut rewritten = Vec::new();
            for (k, operand) in operands.iter().enumerate() {
                if k == matched[0] {
                    rewritten.push(factored.clone());
                } else if !matched.contains(&k) {
                    rewritten.push(operand.clone());
                }
            }
            results.push(rebuild(id, op, rewritten));
        }
    }
    results
}

fn idempotent<A: Atom>(id: ExprId, c: &Compound<A>) -> Vec<Expr<A>> {
    let mut distinct: Vec<Expr<A>> = Vec::new();
    for operand in c.operands() {
        if !distinct.contains(operand) {
            distinct.push(operand.clone());
        }
    }
    if distinct.len() == c.operands().len() && distinct.len() > 1 {
        return Vec::new();
    }
    vec![rebuild(id, c.op(), distinct)]
}

fn unary<A: Atom>(id: ExprId, c: &Compound<A>, ids: &IdAllocator) -> Vec<Expr<A>> {
    let op = c.op();
    let operands = c.operands();
    let annihilator = op.annihilator();
    for (i, a) in operands.iter().enumerate() {
        let Some(not_a) = a.try_inverse() else {
            continue;
        };
        let Some(j) = (i + 1..operands.len()).find(|&j| operands[j] == not_a) else {
            continue;
        };
        if op == Operator::And || operands.len() == 2 {
            return vec![Expr::new_literal(id, annihilator)];
        }
        // `a | !a | rest`: the pair becomes `true`, which the universal-set law then collapses.
        let mut rewritten = Vec::with_capacity(operands.len() - 1);
        for (k, operand) in operands.iter().enumerate() {
            if k == i {
                rewritten.push(Expr::literal(ids, annihilator));
            } else if k != j {
                rewritten.push(operand.clone());
            }
        }
        return vec![rebuild(id, op, rewritten)];
    }
    Vec::new()
}

/// Empty-set and universal-set laws: `literal` annihilates or is dropped, depending on the operator.
fn constant<A: Atom>(id: ExprId, c: &Compound<A>, literal: Literal) -> Vec<Expr<A>> {
    if !c.operands().iter().any(|o| o.as_literal() == Some(literal)) {
        return Vec::new();
    }
    if literal == c.op().annihilator() {
        return vec![Expr::new_literal(id, literal)];
    }
    let rest = c
        .operands()
        .iter()
        .filter(|o| o.as_literal() != Some(literal))
        .cloned()
        .collect();
    vec![rebuild(id, c.op(), rest)]
}

fn distributive<A: Atom>(id: ExprId, c: &Compound<A>, ids: &IdAllocator) -> Vec<Expr<A>> {
    let op = c.op();
    let dual = op.dual();
    let operands = c.operands();
    let mut results = Vec::new();

    for (p, product) in operands.iter().enumerate() {
        let Some(pc) = product.as_compound() else {
            continue;
        };
        if pc.op() != dual {
            continue;
        }

        // What the siblings expose at this level, with their inverses.
        let mut exposed: Vec<(&Expr<A>, Option<Expr<A>>)> = Vec::new();
        for (k, sibling) in operands.iter().enumerate() {
            if k == p {
                continue;
            }
            if sibling.is_compound_of(op) {
                exposed.extend(sibling.operands().iter().map(|x| (x, x.try_inverse())));
            } else {
                exposed.push((sibling, sibling.try_inverse()));
            }
        }
        if exposed.is_empty() {
            continue;
        }

        for (q, sum) in pc.operands().iter().enumerate() {
            let Some(sc) = sum.as_compound() else {
                continue;
            };
            if sc.op() != op {
                continue;
            }
            let mut rest = pc.operands().to_vec();
            rest.remove(q);

            let triggered = exposed.iter().any(|(x, not_x)| {
                sc.operands()
                    .iter()
                    .chain(rest.iter())
                    .any(|y| y == *x || not_x.as_ref() == Some(y))
            });
            if !triggered {
                continue;
            }

            let terms: Vec<Expr<A>> = sc
                .operands()
                .iter()
                .map(|s| {
                    let mut factors = rest.clone();
                    factors.insert(q, s.clone());
                    join(ids, dual, factors)
                })
                .collect();

            let mut rewritten = Vec::with_capacity(operands.len() + terms.len());
            for (k, operand) in operands.iter().enumerate() {
                if k == p {
                    rewritten.extend(terms.iter().cloned());
                } else {
                    rewritten.push(operand.clone());
                }
            }
            results.push(rebuild(id, op, rewritten));
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::atom::{Call, Lit};

    fn lit(ids: &IdAllocator, v: i32) -> Expr<Lit> {
        Expr::atom(ids, Lit::from_dimacs(v))
    }

    #[test]
    fn test_order() {
        assert_eq!(Law::ORDER[0], Law::Associative);
        assert_eq!(Law::ORDER[1], Law::Redundancy);
        assert_eq!(Law::ORDER[8], Law::Distributive);
    }

    #[test]
    fn test_leaf_yields_nothing() {
        let ids = IdAllocator::new();
        let a = lit(&ids, 1);
        for law in Law::ORDER {
            assert!(law.apply(&a, &ids).is_empty());
        }
    }

    #[test]
    fn test_associative() {
        let ids = IdAllocator::new();
        let (a, b, c) = (lit(&ids, 1), lit(&ids, 2), lit(&ids, 3));
        let f = Expr::and(&ids, vec![a.clone(), Expr::and(&ids, vec![b.clone(), c.clone()])]);

        let res = Law::Associative.apply(&f, &ids);
        assert_eq!(res.len(), 1);
        assert_eq!(res[0], Expr::and(&ids, vec![a.clone(), b.clone(), c.clone()]));
        assert_eq!(res[0].id(), f.id());

        let g = Expr::and(&ids, vec![a, Expr::or(&ids, vec![b, c])]);
        assert!(Law::Associative.apply(&g, &ids).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let ids = IdAllocator::new();
        let (a, b) = (lit(&ids, 1), lit(&ids, 2));

        let f = Expr::and(&ids, vec![a.clone(), a.clone()]);
        let res = Law::Idempotent.apply(&f, &ids);
        assert_eq!(res, vec![a.clone()]);
        assert_eq!(res[0].id(), f.id());

        let g = Expr::or(&ids, vec![a.clone(), b.clone(), a.clone()]);
        let res = Law::Idempotent.apply(&g, &ids);
        assert_eq!(res, vec![Expr::or(&ids, vec![a.clone(), b.clone()])]);

        let h = Expr::or(&ids, vec![a.clone(), b.clone()]);
        assert!(Law::Idempotent.apply(&h, &ids).is_empty());

        // A single-operand compound unwraps.
        let ab = Expr::and(&ids, vec![a, b]);
        let k = Expr::or(&ids, vec![ab.clone()]);
        assert_eq!(Law::Idempotent.apply(&k, &ids), vec![ab]);
    }

    #[test]
    fn test_unary_and() {
        let ids = IdAllocator::new();
        let f = Expr::and(&ids, vec![lit(&ids, 1), lit(&ids, 2), lit(&ids, -1)]);
        let res = Law::Unary.apply(&f, &ids);
        assert_eq!(res.len(), 1);
        assert!(res[0].is_empty_set());
        assert_eq!(res[0].id(), f.id());
    }

    #[test]
    fn test_unary_or() {
        let ids = IdAllocator::new();
        let f = Expr::or(&ids, vec![lit(&ids, 1), lit(&ids, -1)]);
        let res = Law::Unary.apply(&f, &ids);
        assert_eq!(res.len(), 1);
        assert!(res[0].is_universal());

        let g = Expr::or(&ids, vec![lit(&ids, 1), lit(&ids, 2), lit(&ids, -1)]);
        let res = Law::Unary.apply(&g, &ids);
        assert_eq!(res, vec![Expr::or(&ids, vec![Expr::universal(&ids), lit(&ids, 2)])]);
    }

    #[test]
    fn test_unary_skips_non_invertible() {
        let ids = IdAllocator::new();
        let f = Expr::and(&ids, vec![Expr::atom(&ids, Call::new("a")), Expr::atom(&ids, Call::new("b"))]);
        assert!(Law::Unary.apply(&f, &ids).is_empty());
        assert!(Law::Redundancy.apply(&f, &ids).is_empty());

        // Opaque compounds are skipped too, while the other laws still match.
        let save = Expr::atom(&ids, Call::new("save"));
        let load = Expr::atom(&ids, Call::new("load"));
        let g = Expr::or(
            &ids,
            vec![save.clone(), Expr::and(&ids, vec![save.clone(), load])],
        );
        assert!(Law::Unary.apply(&g, &ids).is_empty());
        assert!(Law::Redundancy.apply(&g, &ids).is_empty());
        assert_eq!(Law::Absorption.apply(&g, &ids), vec![save]);
    }

    #[test]
    fn test_empty_set() {
        let ids = IdAllocator::new();
        let a = lit(&ids, 1);

        let f = Expr::and(&ids, vec![a.clone(), Expr::empty_set(&ids)]);
        let res = Law::EmptySet.apply(&f, &ids);
        assert_eq!(res.len(), 1);
        assert!(res[0].is_empty_set());

        let g = Expr::or(&ids, vec![a.clone(), Expr::empty_set(&ids)]);
        assert_eq!(Law::EmptySet.apply(&g, &ids), vec![a.clone()]);

        let h = Expr::or(&ids, vec![Expr::<Lit>::empty_set(&ids), Expr::empty_set(&ids)]);
        let res = Law::EmptySet.apply(&h, &ids);
        assert!(res[0].is_empty_set());
    }

    #[test]
    fn test_universal_set() {
        let ids = IdAllocator::new();
        let (a, b) = (lit(&ids, 1), lit(&ids, 2));

        let f = Expr::or(&ids, vec![a.clone(), Expr::universal(&ids)]);
        let res = Law::UniversalSet.apply(&f, &ids);
        assert!(res[0].is_universal());

        let g = Expr::and(&ids, vec![a.clone(), Expr::universal(&ids), b.clone()]);
        assert_eq!(Law::UniversalSet.apply(&g, &ids), vec![Expr::and(&ids, vec![a, b])]);
    }

    #[test]
    fn test_absorption() {
        let ids = IdAllocator::new();
        let (a, b, c) = (lit(&ids, 1), lit(&ids, 2), lit(&ids, 3));
        let ab = Expr::and(&ids, vec![a.clone(), b.clone()]);
        let ac = Expr::and(&ids, vec![a.clone(), c.clone()]);
        let f = Expr::or(&ids, vec![a.clone(), ab.clone(), ac.clone()]);

        let res = Law::Absorption.apply(&f, &ids);
        assert_eq!(res.len(), 2);
        assert_eq!(res[0], Expr::or(&ids, vec![a.clone(), ac]));
        assert_eq!(res[1], Expr::or(&ids, vec![a.clone(), ab.clone()]));

        let g = Expr::or(&ids, vec![a.clone(), ab]);
        assert_eq!(Law::Absorption.apply(&g, &ids), vec![a]);
    }

    #[test]
    fn test_absorption_of_sub_product() {
        let ids = IdAllocator::new();
        let (a, b, c) = (lit(&ids, 1), lit(&ids, 2), lit(&ids, 3));
        let ab = Expr::and(&ids, vec![a.clone(), b.clone()]);
        let abc = Expr::and(&ids, vec![a, b, c]);
        let f = Expr::or(&ids, vec![ab.clone(), abc]);
        assert_eq!(Law::Absorption.apply(&f, &ids), vec![ab]);
    }

    #[test]
    fn test_redundancy() {
        let ids = IdAllocator::new();
        let f = Expr::and(
            &ids,
            vec![
                lit(&ids, 1),
                Expr::or(&ids, vec![lit(&ids, -1), lit(&ids, 2)]),
                Expr::or(&ids, vec![lit(&ids, -1), lit(&ids, 3)]),
            ],
        );
        let res = Law::Redundancy.apply(&f, &ids);
        assert_eq!(res, vec![Expr::and(&ids, vec![lit(&ids, 1), lit(&ids, 2), lit(&ids, 3)])]);
        assert_eq!(res[0].id(), f.id());
    }

    #[test]
    fn test_redundancy_leaves_identity() {
        let ids = IdAllocator::new();
        // a | (!a & !a): removing !a empties the product, leaving `true`
        let f = Expr::or(
            &ids,
            vec![lit(&ids, 1), Expr::and(&ids, vec![lit(&ids, -1), lit(&ids, -1)])],
        );
        let res = Law::Redundancy.apply(&f, &ids);
        assert_eq!(res, vec![Expr::or(&ids, vec![lit(&ids, 1), Expr::universal(&ids)])]);
    }

    #[test]
    fn test_factorization() {
        let ids = IdAllocator::new();
        let (a, b, c, d) = (lit(&ids, 1), lit(&ids, 2), lit(&ids, 3), lit(&ids, 4));
        let f = Expr::or(
            &ids,
            vec![
                Expr::and(&ids, vec![a.clone(), b.clone()]),
                Expr::and(&ids, vec![a.clone(), c.clone()]),
                Expr::and(&ids, vec![a.clone(), d.clone()]),
            ],
        );
        let res = Law::Factorization.apply(&f, &ids);
        let expected = Expr::and(&ids, vec![a, Expr::or(&ids, vec![b, c, d])]);
        assert_eq!(res, vec![expected]);
        assert_eq!(res[0].id(), f.id());
    }

    #[test]
    fn test_factorization_keeps_unmatched() {
        let ids = IdAllocator::new();
        let (a, b, c, d) = (lit(&ids, 1), lit(&ids, 2), lit(&ids, 3), lit(&ids, 4));
        let f = Expr::and(
            &ids,
            vec![
                d.clone(),
                Expr::or(&ids, vec![a.clone(), b.clone()]),
                Expr::or(&ids, vec![c.clone(), a.clone()]),
            ],
        );
        let res = Law::Factorization.apply(&f, &ids);
        let expected = Expr::and(&ids, vec![d, Expr::or(&ids, vec![a, Expr::and(&ids, vec![b, c])])]);
        assert_eq!(res, vec![expected]);
    }

    #[test]
    fn test_distributive() {
        let ids = IdAllocator::new();
        let (a, b, c) = (lit(&ids, 1), lit(&ids, 2), lit(&ids, 3));
        // a | (b & (a | c))  ->  a | (b & a) | (b & c)
        let f = Expr::or(
            &ids,
            vec![
                a.clone(),
                Expr::and(&ids, vec![b.clone(), Expr::or(&ids, vec![a.clone(), c.clone()])]),
            ],
        );
        let res = Law::Distributive.apply(&f, &ids);
        let expected = Expr::or(
            &ids,
            vec![
                a.clone(),
                Expr::and(&ids, vec![b.clone(), a.clone()]),
                Expr::and(&ids, vec![b.clone(), c.clone()]),
            ],
        );
        assert_eq!(res, vec![expected]);
        assert!(res[0].complexity() > f.complexity());
    }

    #[test]
    fn test_distributive_needs_shared_term() {
        let ids = IdAllocator::new();
        let (a, b, c, d) = (lit(&ids, 1), lit(&ids, 2), lit(&ids, 3), lit(&ids, 4));
        let f = Expr::or(
            &ids,
            vec![a, Expr::and(&ids, vec![b, Expr::or(&ids, vec![c, d])])],
        );
        assert!(Law::Distributive.apply(&f, &ids).is_empty());
    }

    #[test]
    fn test_apply_all_dedups() {
        let ids = IdAllocator::new();
        let a = lit(&ids, 1);
        let ab = Expr::and(&ids, vec![a.clone(), lit(&ids, 2)]);
        // Both orientations of the absorption match produce the same result.
        let f = Expr::or(&ids, vec![ab.clone(), ab.clone()]);
        // Idempotence derives it a third time.
        let res = apply_all(&f, &ids);
        assert_eq!(res[0], (Law::Absorption, ab.clone()));
        assert_eq!(res.iter().filter(|(_, e)| *e == ab).count(), 1);
        assert!(res.iter().all(|(_, e)| *e != f));
    }
}
