use std::cell::RefCell;

use nfq_dns_firewall::symbols::SymbolKind;
use nfq_dns_firewall::{Action, MatchObserver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    RuleConsulted(usize),
    Question(String),
    Answer(String),
    Unrecognized(SymbolKind, String),
    Verdict(usize, Action),
    Inert(usize, String),
}

/// Keeps every event so tests can assert on what the engine reported.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.borrow().clone()
    }

    pub fn consulted(&self) -> Vec<usize> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::RuleConsulted(index) => Some(*index),
                _ => None,
            })
            .collect()
    }

    pub fn unrecognized(&self) -> Vec<(SymbolKind, String)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Unrecognized(kind, name) => Some((*kind, name.clone())),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: Event) {
        self.events.borrow_mut().push(event);
    }
}

impl MatchObserver for RecordingObserver {
    fn rule_consulted(&self, index: usize) {
        self.push(Event::RuleConsulted(index));
    }

    fn question_inspected(&self, name: &str) {
        self.push(Event::Question(name.to_string()));
    }

    fn answer_inspected(&self, name: &str) {
        self.push(Event::Answer(name.to_string()));
    }

    fn unrecognized_symbol(&self, kind: SymbolKind, name: &str) {
        self.push(Event::Unrecognized(kind, name.to_string()));
    }

    fn rule_verdict(&self, index: usize, action: &Action) {
        self.push(Event::Verdict(index, action.clone()));
    }

    fn inert_action(&self, index: usize, tag: &str) {
        self.push(Event::Inert(index, tag.to_string()));
    }
}
