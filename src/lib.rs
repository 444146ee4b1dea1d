//! # boolex: Boolean expression simplification in Rust
//!
//! **`boolex`** rewrites Boolean expression trees into equivalent, less complex forms by searching
//! the space of forms reachable through the laws of Boolean algebra.
//!
//! ## How it works
//!
//! An expression is a tree of [`Expr`][crate::expr::Expr] nodes: opaque atoms, the two constants
//! `true` and `false`, and n-ary AND/OR compounds. Nine rewrite [`laws`] (absorption, factorization,
//! distribution and friends) each propose replacements for a compound node. The
//! [`simplify`][crate::simplify::simplify] search applies every law at every node, explores each
//! result recursively, and returns the least complex form it found.
//!
//! Atoms are anything implementing [`Atom`][crate::atom::Atom]. Atoms that can be negated (like
//! [`Lit`][crate::atom::Lit]) enable the laws that need complements; atoms that cannot (like
//! [`Call`][crate::atom::Call]) still take part in everything else.
//!
//! ## Basic Usage
//!
//! ```rust
//! use boolex::atom::Lit;
//! use boolex::expr::Expr;
//! use boolex::simplify::simplify;
//! use boolex::types::IdAllocator;
//!
//! // 1. All nodes of one session draw their ids from one allocator
//! let ids = IdAllocator::new();
//!
//! // 2. Build a formula: f = (a & b) | (a & c)
//! let a = Expr::atom(&ids, Lit::from_dimacs(1));
//! let b = Expr::atom(&ids, Lit::from_dimacs(2));
//! let c = Expr::atom(&ids, Lit::from_dimacs(3));
//! let f = Expr::or(
//!     &ids,
//!     vec![Expr::and(&ids, vec![a.clone(), b.clone()]), Expr::and(&ids, vec![a.clone(), c.clone()])],
//! );
//!
//! // 3. Simplify: a & (b | c)
//! let g = simplify(&f, &ids);
//! assert_eq!(g, Expr::and(&ids, vec![a, Expr::or(&ids, vec![b, c])]));
//! assert!(g.complexity() < f.complexity());
//! ```
//!
//! ## Core Components
//!
//! - **[`expr`]**: The expression tree, content equality and complexity.
//! - **[`laws`]**: The rewrite laws.
//! - **[`simplify`]**: The search driver and its configuration.
//! - **[`monitor`]**: Per-session bookkeeping used by the search.
//! - **[`eval`]**: Truth-value evaluation and equivalence checks.
//! - **[`dot`]**: Utilities for visualizing expression trees using Graphviz.

pub mod atom;
pub mod dot;
pub mod error;
pub mod eval;
pub mod expr;
pub mod laws;
pub mod monitor;
pub mod simplify;
pub mod types;
pub mod utils;
