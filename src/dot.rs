//! Expression tree to DOT (Graphviz) conversion.
//!
//! Every node of the tree is rendered once, in pre-order, so repeated sub-expressions show up as
//! separate vertices. Nodes are named `n0`, `n1`, ... by visiting order; the lineage id is part of
//! the label, since a rewritten tree may carry the same id more than once.
//!
//! # Examples
//!
//! ```
//! use boolex::atom::Lit;
//! use boolex::expr::Expr;
//! use boolex::types::IdAllocator;
//!
//! let ids = IdAllocator::new();
//! let f = Expr::and(
//!     &ids,
//!     vec![Expr::atom(&ids, Lit::from_dimacs(1)), Expr::atom(&ids, Lit::from_dimacs(-2))],
//! );
//!
//! let dot = f.to_dot().unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! ```

use std::fmt::Write as _;

use crate::atom::Atom;
use crate::expr::{Expr, ExprKind};

/// Configuration options for DOT output generation.
///
/// Use `DotConfig::default()` for standard settings.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for compound nodes (default: "circle")
    pub compound_shape: &'static str,
    /// Shape for atoms (default: "plaintext")
    pub atom_shape: &'static str,
    /// Shape for the two literals (default: "square")
    pub literal_shape: &'static str,
    /// Whether labels include lineage id and complexity (default: true)
    pub show_details: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            compound_shape: "circle",
            atom_shape: "plaintext",
            literal_shape: "square",
            show_details: true,
        }
    }
}

impl<A: Atom> Expr<A> {
    /// Converts the tree rooted at this node to DOT format.
    pub fn to_dot(&self) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(&DotConfig::default())
    }

    /// Converts the tree rooted at this node to DOT format with custom configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use boolex::atom::Call;
    /// use boolex::dot::DotConfig;
    /// use boolex::expr::Expr;
    /// use boolex::types::IdAllocator;
    ///
    /// let ids = IdAllocator::new();
    /// let f = Expr::or(&ids, vec![Expr::atom(&ids, Call::new("save")), Expr::universal(&ids)]);
    ///
    /// let config = DotConfig {
    ///     show_details: false,
    ///     ..DotConfig::default()
    /// };
    /// let dot = f.to_dot_with_config(&config).unwrap();
    /// assert!(dot.contains("save()"));
    /// ```
    pub fn to_dot_with_config(&self, config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "graph {{")?;
        let mut next = 0;
        self.write_dot(&mut dot, config, &mut next)?;
        writeln!(dot, "}}")?;
        Ok(dot)
    }

    /// Writes this node and its subtree, returning the DOT name of this node.
    fn write_dot(&self, dot: &mut String, config: &DotConfig, next: &mut usize) -> Result<usize, std::fmt::Error> {
        let name = *next;
        *next += 1;

        let (shape, text) = match self.kind() {
            ExprKind::Atom(a) => (config.atom_shape, a.to_string()),
            ExprKind::Literal(l) => (config.literal_shape, l.to_string()),
            ExprKind::Compound(c) => (config.compound_shape, c.op().to_string()),
        };
        let label = if config.show_details {
            format!("{}\\n{} c={}", escape(&text), self.id(), self.complexity())
        } else {
            escape(&text)
        };
        writeln!(dot, "n{} [shape={}, label=\"{}\"];", name, shape, label)?;

        for operand in self.operands() {
            let child = operand.write_dot(dot, config, next)?;
            writeln!(dot, "n{} -- n{};", name, child)?;
        }
        Ok(name)
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
