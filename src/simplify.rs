//! The search driver.
//!
//! [`Simplifier::simplify`] explores the space of forms reachable from a root expression through
//! the [`laws`](crate::laws) and returns the least complex one it finds.
//!
//! # Search
//!
//! Exploring a node registers it in the session's [`Monitor`], then
//!
//! 1. applies every law to the node and recursively explores each new result, and
//! 2. recursively explores each operand, and for every operand variant builds a sibling of the node
//!    with that operand replaced, which is explored in turn.
//!
//! Forms already seen under the same lineage id are skipped. All variants found are returned sorted
//! by complexity (stable, so ties keep their discovery order, which is deterministic).
//!
//! # Termination
//!
//! The search stops as soon as a form of the *root* (same lineage id) is reached for which
//! [`can_further_simplify`] is false. This test is a heuristic, not a proof of minimality: it only
//! looks for repeated atoms, literals, un-flattened nesting and the same signs in operands.
//! Independently, the number of registered forms and the recursion depth are capped by
//! [`SimplifyConfig`].
//!
//! A search cut short by one of these caps may leave trivial rewrites untaken. Its best form is
//! then finished by a greedy pass of the reducing laws (every law but distribution), each step
//! taking the least complex strictly smaller candidate.
//!
//! One search is a *round*. Rounds are repeated on their own result until a round no longer lowers
//! the complexity, so simplifying a result again returns it unchanged.
//!
//! # Examples
//!
//! ```
//! use boolex::atom::Lit;
//! use boolex::expr::Expr;
//! use boolex::simplify::simplify;
//! use boolex::types::IdAllocator;
//!
//! let ids = IdAllocator::new();
//! let a = Expr::atom(&ids, Lit::from_dimacs(1));
//! let b = Expr::atom(&ids, Lit::from_dimacs(2));
//!
//! // a | (a & b) = a
//! let f = Expr::or(&ids, vec![a.clone(), Expr::and(&ids, vec![a.clone(), b])]);
//! assert_eq!(simplify(&f, &ids), a);
//! ```

use std::collections::{HashMap, HashSet};

use log::{debug, trace};

use crate::atom::Atom;
use crate::expr::Expr;
use crate::laws::{self, Law};
use crate::monitor::{Monitor, StopReason};
use crate::types::IdAllocator;

/// Limits of one simplification session.
#[derive(Debug, Clone)]
pub struct SimplifyConfig {
    /// Maximum number of distinct forms registered before the search stops (`None`: unlimited).
    pub max_forms: Option<usize>,
    /// Maximum recursion depth; forms at this depth are returned but not explored.
    pub max_depth: usize,
}

impl Default for SimplifyConfig {
    fn default() -> Self {
        Self {
            max_forms: Some(10_000),
            max_depth: 256,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Simplifier {
    config: SimplifyConfig,
}

impl Simplifier {
    pub fn new(config: SimplifyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimplifyConfig {
        &self.config
    }

    /// Returns the least complex equivalent form of `root` found by the search.
    ///
    /// The result is never more complex than `root`. If it is a compound, operands that also occur
    /// in `root` come first, in `root`'s order.
    ///
    /// New nodes draw their ids from `ids`, which should be the allocator `root` was built with.
    pub fn simplify<A: Atom>(&self, root: &Expr<A>, ids: &IdAllocator) -> Expr<A> {
        debug!("simplify: {} (complexity {})", root, root.complexity());

        let mut current = root.clone();
        let mut rounds = 1;
        loop {
            let next = self.round(&current, ids);
            if next.complexity() >= current.complexity() {
                break;
            }
            current = next;
            rounds += 1;
        }

        debug!(
            "simplify: {} -> {} (complexity {} -> {}, {} rounds)",
            root,
            current,
            root.complexity(),
            current.complexity(),
            rounds
        );
        current
    }

    /// One search from `root`. Never more complex than `root`.
    fn round<A: Atom>(&self, root: &Expr<A>, ids: &IdAllocator) -> Expr<A> {
        let mut search = Search {
            monitor: Monitor::new(root, self.config.max_forms),
            ids,
            max_depth: self.config.max_depth,
        };
        let variants = search.variants(root);

        let mut simplest = match variants.first() {
            Some(best) if best.complexity() < root.complexity() => best.clone(),
            _ => root.clone(),
        };
        let reason = search.monitor.stop_reason();
        if reason != Some(StopReason::Final) {
            let reduced = reduce(&simplest, ids);
            trace!("round: {:?}, reduced {} -> {}", reason, simplest, reduced);
            if reduced.complexity() < simplest.complexity() {
                simplest = reduced;
            }
        }
        let result = reorder_like(&simplest, root);

        debug!(
            "round: {} -> {} ({} forms, {} variants, stop: {:?})",
            root,
            result,
            search.monitor.registered(),
            variants.len(),
            reason
        );
        result
    }
}

/// Simplifies `root` with the default configuration.
pub fn simplify<A: Atom>(root: &Expr<A>, ids: &IdAllocator) -> Expr<A> {
    Simplifier::default().simplify(root, ids)
}

/// Heuristic test whether `node` may still be simplified.
///
/// True if some operand may itself be simplified further, some operand is a literal, some operand
/// is a compound with the same operator as `node`, or some atom occurs more than once (in either
/// polarity) anywhere under `node`. Leaves are never simplifiable.
///
/// A false answer does not prove minimality: a single-operand compound, for one, is reported as
/// final.
pub fn can_further_simplify<A: Atom>(node: &Expr<A>) -> bool {
    let Some(c) = node.as_compound() else {
        return false;
    };
    if c
        .operands()
        .iter()
        .any(|o| can_further_simplify(o) || o.is_literal() || o.is_compound_of(c.op()))
    {
        return true;
    }

    let mut counts: HashMap<Expr<A>, usize> = HashMap::new();
    let mut repeated = false;
    node.for_each_leaf(&mut |leaf| {
        let count = counts.entry(leaf.absolute()).or_insert(0);
        *count += 1;
        repeated |= *count > 1;
    });
    repeated
}

/// Greedily applies the reducing laws everywhere in `node`, bottom-up, until none lowers the complexity.
fn reduce<A: Atom>(node: &Expr<A>, ids: &IdAllocator) -> Expr<A> {
    let mut current = node.clone();
    loop {
        if let Some(c) = current.as_compound() {
            let operands: Vec<Expr<A>> = c.operands().iter().map(|o| reduce(o, ids)).collect();
            let changed = operands
                .iter()
                .zip(c.operands())
                .any(|(new, old)| new.complexity() < old.complexity());
            if changed {
                let rebuilt = Expr::new_compound(current.id(), c.op(), operands);
                current = rebuilt;
            }
        }

        let best = Law::ORDER
            .iter()
            .filter(|&&law| law != Law::Distributive)
            .flat_map(|law| law.apply(&current, ids))
            .filter(|candidate| candidate.complexity() < current.complexity())
            .min_by(|a, b| a.cmp_complexity(b));
        match best {
            Some(smaller) => current = smaller,
            None => return current,
        }
    }
}

/// Puts operands of `simplest` that also occur in `root` first, in `root`'s order.
fn reorder_like<A: Atom>(simplest: &Expr<A>, root: &Expr<A>) -> Expr<A> {
    let Some(c) = simplest.as_compound() else {
        return simplest.clone();
    };
    if root.is_leaf() {
        return simplest.clone();
    }

    let mut pool: Vec<Option<Expr<A>>> = c.operands().iter().cloned().map(Some).collect();
    let mut ordered = Vec::with_capacity(pool.len());
    for r in root.operands() {
        if let Some(slot) = pool.iter_mut().find(|slot| slot.as_ref() == Some(r)) {
            ordered.extend(slot.take());
        }
    }
    ordered.extend(pool.into_iter().flatten());
    Expr::new_compound(simplest.id(), c.op(), ordered)
}

/// Variants collected by one frame, in discovery order, without duplicates.
struct Found<A> {
    forms: Vec<Expr<A>>,
    seen: HashSet<Expr<A>>,
}

impl<A: Atom> Found<A> {
    fn new() -> Self {
        Self {
            forms: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn push(&mut self, expr: Expr<A>) {
        if self.seen.insert(expr.clone()) {
            self.forms.push(expr);
        }
    }

    fn extend(&mut self, exprs: Vec<Expr<A>>) {
        for expr in exprs {
            self.push(expr);
        }
    }

    fn into_sorted(mut self) -> Vec<Expr<A>> {
        self.forms.sort_by(|a, b| a.cmp_complexity(b));
        self.forms
    }
}

struct Search<'a, A> {
    monitor: Monitor<A>,
    ids: &'a IdAllocator,
    max_depth: usize,
}

impl<A: Atom> Search<'_, A> {
    fn variants(&mut self, node: &Expr<A>) -> Vec<Expr<A>> {
        if self.monitor.is_stopped() || self.monitor.is_known(node) {
            return Vec::new();
        }
        self.monitor.register(node);

        let depth = self.monitor.depth();
        trace!(
            "{:indent$}{} {} (complexity {})",
            "",
            node.id(),
            node,
            node.complexity(),
            indent = 2 * depth
        );

        if self.monitor.is_original(node) && !can_further_simplify(node) {
            debug!("simplify: {} is final, stopping", node);
            self.monitor.stop(StopReason::Final);
            return vec![node.clone()];
        }
        if depth >= self.max_depth {
            debug!("simplify: depth limit {} reached at {}", self.max_depth, node);
            return Vec::new();
        }

        self.monitor.enter();
        let mut found = Found::new();

        for (law, candidate) in laws::apply_all(node, self.ids) {
            if self.monitor.is_stopped() {
                break;
            }
            if self.monitor.is_known(&candidate) {
                continue;
            }
            trace!("{:indent$}{}: {}", "", law, candidate, indent = 2 * depth + 1);
            let deeper = self.variants(&candidate);
            found.push(candidate);
            found.extend(deeper);
        }

        if let Some(c) = node.as_compound() {
            for (i, operand) in c.operands().iter().enumerate() {
                if self.monitor.is_stopped() {
                    break;
                }
                for variant in self.variants(operand) {
                    let mut operands = c.operands().to_vec();
                    operands[i] = variant;
                    let sibling = Expr::new_compound(node.id(), c.op(), operands);
                    if sibling == *node {
                        continue;
                    }
                    let deeper = self.variants(&sibling);
                    found.push(sibling);
                    found.extend(deeper);
                }
            }
        }

        self.monitor.leave();
        found.into_sorted()
    }
}
