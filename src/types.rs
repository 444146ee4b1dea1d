//! Type-safe wrappers for expression identities and operators.
//!
//! This module provides the newtypes the rest of the crate is built on: lineage ids,
//! the per-session id allocator, the two commutative operators and the two literal constants.
use std::cell::Cell;
use std::fmt;

/// A lineage identifier.
///
/// Unlike a content hash, the id marks "this node occupies the same logical position in the tree"
/// across rewritten variants. Rewrites of a node keep its id; genuinely new nodes get a fresh one.
///
/// # Invariants
///
/// - Ids handed out by an [`IdAllocator`] are >= 1 (0 is never allocated)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ExprId(u32);

impl ExprId {
    /// Returns the raw id as a `u32`.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<ExprId> for u32 {
    fn from(id: ExprId) -> Self {
        id.0
    }
}

/// Allocator of fresh [`ExprId`]s for one decompilation/simplification session.
///
/// Ids are allocated sequentially starting from 1, so building the same tree twice with two
/// fresh allocators yields identical ids.
#[derive(Debug)]
pub struct IdAllocator {
    next: Cell<u32>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: Cell::new(1) }
    }

    /// Allocates a fresh id.
    pub fn fresh(&self) -> ExprId {
        let id = self.next.get();
        assert_ne!(id, u32::MAX, "ExprId space exhausted");
        self.next.set(id + 1);
        ExprId(id)
    }

    /// Number of ids allocated so far.
    pub fn allocated(&self) -> usize {
        (self.next.get() - 1) as usize
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Commutative, associative operator of a compound expression.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    /// The dual operator (AND <-> OR).
    pub fn dual(self) -> Self {
        match self {
            Operator::And => Operator::Or,
            Operator::Or => Operator::And,
        }
    }

    /// The identity element: `x op identity = x`.
    pub fn identity(self) -> Literal {
        match self {
            Operator::And => Literal::Universal,
            Operator::Or => Literal::EmptySet,
        }
    }

    /// The annihilator element: `x op annihilator = annihilator`.
    pub fn annihilator(self) -> Literal {
        self.dual().identity()
    }

    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Operator::And => "&",
            Operator::Or => "|",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::And => write!(f, "AND"),
            Operator::Or => write!(f, "OR"),
        }
    }
}

/// The two distinguished constants.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Literal {
    /// Logical true: AND-identity, OR-annihilator.
    Universal,
    /// Logical false: OR-identity, AND-annihilator.
    EmptySet,
}

impl Literal {
    pub fn value(self) -> bool {
        matches!(self, Literal::Universal)
    }

    pub fn negate(self) -> Self {
        match self {
            Literal::Universal => Literal::EmptySet,
            Literal::EmptySet => Literal::Universal,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Universal => write!(f, "true"),
            Literal::EmptySet => write!(f, "false"),
        }
    }
}
