//! Diagnostics emitted while rules are evaluated.
//!
//! The rule engine itself has no side effects: everything it has to say
//! goes through a [`MatchObserver`].

use tracing::{debug, info, trace, warn};

use crate::rule::Action;
use crate::symbols::SymbolKind;

pub trait MatchObserver {
    /// A rule is about to be evaluated.
    fn rule_consulted(&self, _index: usize) {}

    fn question_inspected(&self, _name: &str) {}

    fn answer_inspected(&self, _name: &str) {}

    /// A rule names a flag, type or class missing from the lookup tables.
    /// The predicate is treated as satisfied.
    fn unrecognized_symbol(&self, _kind: SymbolKind, _name: &str) {}

    /// A rule produced a terminal verdict.
    fn rule_verdict(&self, _index: usize, _action: &Action) {}

    /// A rule matched but its action is neither allow nor block.
    fn inert_action(&self, _index: usize, _tag: &str) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl MatchObserver for NullObserver {}

/// Forwards events to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl MatchObserver for TracingObserver {
    fn rule_consulted(&self, index: usize) {
        trace!(rule_index = index, "Evaluating rule");
    }

    fn question_inspected(&self, name: &str) {
        debug!(domain = %name, "Inspecting question");
    }

    fn answer_inspected(&self, name: &str) {
        debug!(domain = %name, "Inspecting answer");
    }

    fn unrecognized_symbol(&self, kind: SymbolKind, name: &str) {
        warn!(kind = %kind, name = %name, "Unrecognized {} name, predicate ignored", kind);
    }

    fn rule_verdict(&self, index: usize, action: &Action) {
        info!(rule_index = index, action = %action, "Rule matched");
    }

    fn inert_action(&self, index: usize, tag: &str) {
        debug!(rule_index = index, action = %tag, "Rule matched with inert action, continuing");
    }
}
