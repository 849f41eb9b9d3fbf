use crate::config::RuleSpec;
use crate::dns::Message;
use crate::observer::MatchObserver;
use crate::rule::{Action, Rule};

/// Ordered rules, first match wins. Packets no rule decides are allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn from_specs(specs: &[RuleSpec]) -> Self {
        Self::new(specs.iter().map(Rule::from_spec).collect())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns `true` to allow the message and `false` to block it.
    ///
    /// A matching rule with an `Other` action is reported and skipped, the
    /// same as [`Rule::evaluate`] yielding `NoMatch`.
    pub fn evaluate(&self, message: &Message, observer: &dyn MatchObserver) -> bool {
        for (index, rule) in self.rules.iter().enumerate() {
            observer.rule_consulted(index);
            if !rule.matches(message, observer) {
                continue;
            }

            match rule.action() {
                Action::Block => {
                    observer.rule_verdict(index, &Action::Block);
                    return false;
                }
                Action::Allow => {
                    observer.rule_verdict(index, &Action::Allow);
                    return true;
                }
                Action::Other(tag) => observer.inert_action(index, tag),
            }
        }

        true
    }
}
