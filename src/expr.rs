//! Expression trees over opaque atoms.
//!
//! An [`Expr`] is an immutable node: an [`Atom`], one of the two [`Literal`] constants, or a
//! [`Compound`] joining an ordered list of operands with a commutative [`Operator`].
//! Every rewrite produces a new node; nothing is mutated in place.
//!
//! # Identity vs. content
//!
//! Each node carries an [`ExprId`] marking its *logical position* in the tree. Rewrites of a node
//! keep that id, so the search can recognise "another form of the same sub-expression". Equality
//! and hashing ignore ids entirely and compare *content*, commutatively: two compounds are equal
//! iff they have the same operator and their operand lists are equal as multisets.
//!
//! # Complexity
//!
//! Leaves cost 1, a compound costs [`COMPOUND_COST`] plus the sum of its operands. The metric is a
//! sort key only: [`Expr::cmp_complexity`] is not consistent with `==` and must never replace it.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::atom::Atom;
use crate::error::Error;
use crate::types::{ExprId, IdAllocator, Literal, Operator};
use crate::utils::{hash_value, pairing2, unordered_sum};

/// Cost of one compound node on top of its operands.
pub const COMPOUND_COST: usize = 10;

const TAG_ATOM: u64 = 1;
const TAG_UNIVERSAL: u64 = 2;
const TAG_EMPTY_SET: u64 = 3;
const TAG_AND: u64 = 4;
const TAG_OR: u64 = 5;

/// An operator applied to an ordered list of operands.
#[derive(Debug, Clone)]
pub struct Compound<A> {
    op: Operator,
    operands: Vec<Expr<A>>,
}

impl<A> Compound<A> {
    pub fn op(&self) -> Operator {
        self.op
    }

    pub fn operands(&self) -> &[Expr<A>] {
        &self.operands
    }
}

impl<A: Atom> Compound<A> {
    /// Whether `expr` is one of the operands (by content).
    pub fn contains(&self, expr: &Expr<A>) -> bool {
        self.operands.iter().any(|o| o == expr)
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind<A> {
    Atom(A),
    Literal(Literal),
    Compound(Compound<A>),
}

/// Node kinds as seen by [`Expr::fold`], with operands already folded into `R`.
#[derive(Debug)]
pub enum Node<'a, A, R> {
    Atom(&'a A),
    Literal(Literal),
    Compound(Operator, Vec<R>),
}

#[derive(Debug, Clone)]
pub struct Expr<A> {
    id: ExprId,
    kind: ExprKind<A>,
    complexity: usize,
    hash: u64,
}

// Construction
impl<A: Atom> Expr<A> {
    fn from_kind(id: ExprId, kind: ExprKind<A>) -> Self {
        let (complexity, hash) = match &kind {
            ExprKind::Atom(a) => (1, pairing2(TAG_ATOM, hash_value(a))),
            ExprKind::Literal(Literal::Universal) => (1, pairing2(TAG_UNIVERSAL, 0)),
            ExprKind::Literal(Literal::EmptySet) => (1, pairing2(TAG_EMPTY_SET, 0)),
            ExprKind::Compound(c) => {
                let tag = match c.op {
                    Operator::And => TAG_AND,
                    Operator::Or => TAG_OR,
                };
                let complexity = COMPOUND_COST + c.operands.iter().map(|o| o.complexity).sum::<usize>();
                let hash = pairing2(tag, unordered_sum(c.operands.iter().map(|o| o.hash)));
                (complexity, hash)
            }
        };
        Self {
            id,
            kind,
            complexity,
            hash,
        }
    }

    /// Builds a compound node with the given id.
    ///
    /// A single operand that is itself a compound of the same operator is flattened: the new node
    /// adopts its operand list instead of nesting it.
    pub(crate) fn new_compound(id: ExprId, op: Operator, mut operands: Vec<Self>) -> Self {
        debug_assert!(!operands.is_empty(), "Compound expression requires at least one operand");
        if operands.len() == 1 && operands[0].is_compound_of(op) {
            if let Some(ExprKind::Compound(inner)) = operands.pop().map(|o| o.kind) {
                operands = inner.operands;
            }
        }
        Self::from_kind(id, ExprKind::Compound(Compound { op, operands }))
    }

    pub(crate) fn new_literal(id: ExprId, literal: Literal) -> Self {
        Self::from_kind(id, ExprKind::Literal(literal))
    }

    pub fn atom(ids: &IdAllocator, atom: A) -> Self {
        Self::from_kind(ids.fresh(), ExprKind::Atom(atom))
    }

    pub fn literal(ids: &IdAllocator, literal: Literal) -> Self {
        Self::new_literal(ids.fresh(), literal)
    }

    /// Logical true.
    pub fn universal(ids: &IdAllocator) -> Self {
        Self::literal(ids, Literal::Universal)
    }

    /// Logical false.
    pub fn empty_set(ids: &IdAllocator) -> Self {
        Self::literal(ids, Literal::EmptySet)
    }

    /// Builds a compound node with a fresh id.
    ///
    /// The operand list must not be empty.
    pub fn compound(ids: &IdAllocator, op: Operator, operands: Vec<Self>) -> Self {
        Self::new_compound(ids.fresh(), op, operands)
    }

    pub fn and(ids: &IdAllocator, operands: Vec<Self>) -> Self {
        Self::compound(ids, Operator::And, operands)
    }

    pub fn or(ids: &IdAllocator, operands: Vec<Self>) -> Self {
        Self::compound(ids, Operator::Or, operands)
    }

    /// Copy of this node under a fresh id.
    pub fn duplicate(&self, ids: &IdAllocator) -> Self {
        self.with_id(ids.fresh())
    }

    /// Copy of this node under the given id (keeps lineage when the copy replaces a node).
    pub fn with_id(&self, id: ExprId) -> Self {
        Self {
            id,
            ..self.clone()
        }
    }
}

// Getters
impl<A> Expr<A> {
    pub fn id(&self) -> ExprId {
        self.id
    }

    pub fn kind(&self) -> &ExprKind<A> {
        &self.kind
    }

    pub fn complexity(&self) -> usize {
        self.complexity
    }

    /// Commutative content hash, independent of ids and operand order.
    pub fn content_hash(&self) -> u64 {
        self.hash
    }

    pub fn as_atom(&self) -> Option<&A> {
        match &self.kind {
            ExprKind::Atom(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<Literal> {
        match &self.kind {
            ExprKind::Literal(l) => Some(*l),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound<A>> {
        match &self.kind {
            ExprKind::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Operands of a compound; empty for leaves.
    pub fn operands(&self) -> &[Expr<A>] {
        match &self.kind {
            ExprKind::Compound(c) => &c.operands,
            _ => &[],
        }
    }

    pub fn op(&self) -> Option<Operator> {
        self.as_compound().map(|c| c.op)
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self.kind, ExprKind::Compound(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Literal(_))
    }

    pub fn is_universal(&self) -> bool {
        matches!(self.kind, ExprKind::Literal(Literal::Universal))
    }

    pub fn is_empty_set(&self) -> bool {
        matches!(self.kind, ExprKind::Literal(Literal::EmptySet))
    }

    pub fn is_compound_of(&self, op: Operator) -> bool {
        self.op() == Some(op)
    }

    /// Orders by complexity only.
    ///
    /// Unequal expressions of the same complexity compare as `Equal` here.
    pub fn cmp_complexity(&self, other: &Self) -> Ordering {
        self.complexity.cmp(&other.complexity)
    }

    /// Folds the tree bottom-up.
    pub fn fold<'a, R, F>(&'a self, f: &mut F) -> R
    where
        F: FnMut(Node<'a, A, R>) -> R,
    {
        let node = match &self.kind {
            ExprKind::Atom(a) => Node::Atom(a),
            ExprKind::Literal(l) => Node::Literal(*l),
            ExprKind::Compound(c) => {
                let mut folded = Vec::with_capacity(c.operands.len());
                for operand in &c.operands {
                    folded.push(operand.fold(f));
                }
                Node::Compound(c.op, folded)
            }
        };
        f(node)
    }

    /// Visits every leaf (atom or literal) under this node, left to right.
    pub fn for_each_leaf<F>(&self, f: &mut F)
    where
        F: FnMut(&Expr<A>),
    {
        match &self.kind {
            ExprKind::Compound(c) => {
                for operand in &c.operands {
                    operand.for_each_leaf(f);
                }
            }
            _ => f(self),
        }
    }
}

// Inversion
impl<A: Atom> Expr<A> {
    /// Whether [`Expr::inverse`] succeeds.
    ///
    /// Literals are always invertible, atoms delegate to [`Atom::can_be_inverted`], and a compound
    /// is invertible iff all of its operands are.
    pub fn can_be_inverted(&self) -> bool {
        match &self.kind {
            ExprKind::Atom(a) => a.can_be_inverted(),
            ExprKind::Literal(_) => true,
            ExprKind::Compound(c) => c.operands.iter().all(|o| o.can_be_inverted()),
        }
    }

    /// Logical negation of this node, keeping its id.
    ///
    /// Compounds are negated by De Morgan's laws: `!(a & b) = !a | !b`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotInvertible`] if some atom under this node cannot be inverted.
    pub fn inverse(&self) -> Result<Self, Error> {
        self.try_inverse().ok_or_else(|| Error::NotInvertible {
            expr: Arc::from(self.to_string()),
        })
    }

    /// [`Expr::inverse`] without building an error for non-invertible nodes.
    pub(crate) fn try_inverse(&self) -> Option<Self> {
        match &self.kind {
            ExprKind::Atom(a) => a.inverse().map(|inverse| Self::from_kind(self.id, ExprKind::Atom(inverse))),
            ExprKind::Literal(l) => Some(Self::new_literal(self.id, l.negate())),
            ExprKind::Compound(c) => {
                let operands = c.operands.iter().map(|o| o.try_inverse()).collect::<Option<Vec<_>>>()?;
                Some(Self::from_kind(
                    self.id,
                    ExprKind::Compound(Compound {
                        op: c.op.dual(),
                        operands,
                    }),
                ))
            }
        }
    }

    /// Whether this is a negated atom.
    pub fn is_inverted(&self) -> bool {
        match &self.kind {
            ExprKind::Atom(a) => a.is_inverted(),
            _ => false,
        }
    }

    /// The non-inverted form of a leaf; other nodes are returned as is.
    pub fn absolute(&self) -> Self {
        match &self.kind {
            ExprKind::Atom(a) if a.is_inverted() => Self::from_kind(self.id, ExprKind::Atom(a.absolute())),
            _ => self.clone(),
        }
    }
}

impl<A: Atom> PartialEq for Expr<A> {
    fn eq(&self, other: &Self) -> bool {
        if self.hash != other.hash || self.complexity != other.complexity {
            return false;
        }
        match (&self.kind, &other.kind) {
            (ExprKind::Atom(a), ExprKind::Atom(b)) => a == b,
            (ExprKind::Literal(a), ExprKind::Literal(b)) => a == b,
            (ExprKind::Compound(a), ExprKind::Compound(b)) => {
                a.op == b.op && same_multiset(&a.operands, &b.operands)
            }
            _ => false,
        }
    }
}

impl<A: Atom> Eq for Expr<A> {}

impl<A: Atom> Hash for Expr<A> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash);
    }
}

fn same_multiset<A: Atom>(xs: &[Expr<A>], ys: &[Expr<A>]) -> bool {
    if xs.len() != ys.len() {
        return false;
    }
    let mut used = vec![false; ys.len()];
    'outer: for x in xs {
        for (i, y) in ys.iter().enumerate() {
            if !used[i] && x == y {
                used[i] = true;
                continue 'outer;
            }
        }
        return false;
    }
    true
}

impl<A: fmt::Display> fmt::Display for Expr<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Atom(a) => write!(f, "{}", a),
            ExprKind::Literal(l) => write!(f, "{}", l),
            ExprKind::Compound(c) => {
                write!(f, "(")?;
                for (i, operand) in c.operands.iter().enumerate() {
                    if i > 0 {
                        write!(f, " {} ", c.op.symbol())?;
                    }
                    write!(f, "{}", operand)?;
                }
                write!(f, ")")
            }
        }
    }
}
