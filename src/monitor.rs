//! Per-session bookkeeping for one simplification.
//!
//! The monitor records which forms have already been explored under each lineage id, carries the
//! one-way stop flag and enforces the optional form budget. It is owned by exactly one search and
//! never shared.

use std::collections::{HashMap, HashSet};

use log::debug;

use crate::atom::Atom;
use crate::expr::Expr;
use crate::types::ExprId;

/// Why a session stopped.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum StopReason {
    /// A form of the root was reached that cannot be simplified any further.
    Final,
    /// The form budget was exhausted.
    Budget,
}

#[derive(Debug)]
pub struct Monitor<A> {
    original: Expr<A>,
    seen: HashMap<ExprId, HashSet<u64>>,
    registered: usize,
    max_forms: Option<usize>,
    stopped: Option<StopReason>,
    depth: usize,
}

impl<A: Atom> Monitor<A> {
    /// Creates a monitor for simplifying `original`, with an optional cap on registered forms.
    pub fn new(original: &Expr<A>, max_forms: Option<usize>) -> Self {
        Self {
            original: original.clone(),
            seen: HashMap::new(),
            registered: 0,
            max_forms,
            stopped: None,
            depth: 0,
        }
    }

    /// The root expression this session is simplifying.
    pub fn original(&self) -> &Expr<A> {
        &self.original
    }

    /// Whether `expr` is a form of the original root (shares its lineage id).
    pub fn is_original(&self, expr: &Expr<A>) -> bool {
        expr.id() == self.original.id()
    }

    /// Records `expr`'s content under its lineage id.
    ///
    /// Reaching the form budget stops the session.
    pub fn register(&mut self, expr: &Expr<A>) {
        if self.seen.entry(expr.id()).or_default().insert(expr.content_hash()) {
            self.registered += 1;
        }
        if let Some(max) = self.max_forms {
            if self.registered >= max && !self.is_stopped() {
                debug!("monitor: form budget of {} exhausted, stopping", max);
                self.stop(StopReason::Budget);
            }
        }
    }

    /// Whether this exact form was already registered under its lineage id.
    pub fn is_known(&self, expr: &Expr<A>) -> bool {
        self.seen
            .get(&expr.id())
            .is_some_and(|hashes| hashes.contains(&expr.content_hash()))
    }

    /// Number of distinct forms registered so far.
    pub fn registered(&self) -> usize {
        self.registered
    }

    /// Stops the session. There is no way back, and the first reason sticks.
    pub fn stop(&mut self, reason: StopReason) {
        if self.stopped.is_none() {
            self.stopped = Some(reason);
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.is_some()
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stopped
    }

    /// Current trace depth.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn enter(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
