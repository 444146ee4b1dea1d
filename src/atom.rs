//! The capability contract for opaque leaf predicates.
//!
//! Atoms come from outside the engine (a decompiler, a query builder, a test) and are never
//! fabricated by it. The engine only needs value equality, hashing and, optionally, inversion.

use std::fmt;
use std::hash::Hash;

/// An opaque boolean-valued leaf.
///
/// Equality and hashing must be value-based. If [`Atom::inverse`] returns `Some(b)`, then
/// `b.inverse()` must return a value equal to `self`.
pub trait Atom: Clone + Eq + Hash + fmt::Debug + fmt::Display {
    /// The logical negation of this atom, or `None` if the atom cannot be inverted.
    fn inverse(&self) -> Option<Self>;

    fn can_be_inverted(&self) -> bool {
        self.inverse().is_some()
    }

    /// Whether this atom is the negated form of some other atom.
    fn is_inverted(&self) -> bool {
        false
    }

    /// The non-inverted form of this atom.
    fn absolute(&self) -> Self {
        if self.is_inverted() {
            self.inverse().unwrap_or_else(|| self.clone())
        } else {
            self.clone()
        }
    }
}

/// A boolean variable (1-indexed).
///
/// # Invariants
///
/// - Variable ids must be >= 1 (0 is reserved)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Creates a new variable with the given id.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Variables must be 1-indexed.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Variable IDs must be >= 1");
        Var(id)
    }

    pub fn id(self) -> u32 {
        self.0
    }

    /// Positive literal of this variable.
    pub fn pos(self) -> Lit {
        Lit {
            var: self,
            negated: false,
        }
    }

    /// Negative literal of this variable.
    pub fn neg(self) -> Lit {
        Lit {
            var: self,
            negated: true,
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A variable or its negation. Always invertible.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Lit {
    var: Var,
    negated: bool,
}

impl Lit {
    /// Builds a literal from a DIMACS-style signed integer (`-3` is `~x3`).
    pub fn from_dimacs(value: i32) -> Self {
        let var = Var::new(value.unsigned_abs());
        if value < 0 {
            var.neg()
        } else {
            var.pos()
        }
    }

    pub fn var(self) -> Var {
        self.var
    }

    pub fn is_negated(self) -> bool {
        self.negated
    }

    /// Truth value of this literal when its variable is `value`.
    pub fn eval(self, value: bool) -> bool {
        value != self.negated
    }
}

impl Atom for Lit {
    fn inverse(&self) -> Option<Self> {
        Some(Lit {
            var: self.var,
            negated: !self.negated,
        })
    }

    fn can_be_inverted(&self) -> bool {
        true
    }

    fn is_inverted(&self) -> bool {
        self.negated
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", if self.negated { "~" } else { "" }, self.var)
    }
}

/// An opaque call whose truth value cannot be negated by the engine
/// (e.g. an arbitrary side-effecting method invocation).
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Call(String);

impl Call {
    pub fn new(name: impl Into<String>) -> Self {
        Call(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl Atom for Call {
    fn inverse(&self) -> Option<Self> {
        None
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}()", self.0)
    }
}
