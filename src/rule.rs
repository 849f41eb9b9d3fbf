use std::fmt;

use crate::config::RuleSpec;
use crate::dns::Message;
use crate::observer::MatchObserver;
use crate::symbols::{MessageFlag, RecordClass, RecordType, Symbol, SymbolKind, WireCode};

/// What a rule does with a packet once its predicates hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Allow,
    Block,
    /// Any other tag. Such a rule may match but never decides a packet.
    Other(String),
}

impl Action {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "allow" => Action::Allow,
            "block" => Action::Block,
            other => Action::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Action::Allow => "allow",
            Action::Block => "block",
            Action::Other(tag) => tag,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one rule against one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMatch {
    MatchAllow,
    MatchBlock,
    NoMatch,
}

/// Optional predicates of a rule. An absent predicate always holds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicates {
    pub flag: Option<Symbol<MessageFlag>>,
    pub name: Option<String>,
    pub record_type: Option<Symbol<RecordType>>,
    pub class: Option<Symbol<RecordClass>>,
    /// Answer data; only responses carry it.
    pub data: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    action: Action,
    predicates: Predicates,
}

impl Rule {
    pub fn new(action: Action, predicates: Predicates) -> Self {
        Self { action, predicates }
    }

    pub fn from_spec(spec: &RuleSpec) -> Self {
        let predicates = Predicates {
            flag: spec.flag.as_deref().map(Symbol::parse),
            name: spec.name.clone(),
            record_type: spec.record_type.as_deref().map(Symbol::parse),
            class: spec.class.as_deref().map(Symbol::parse),
            data: spec.data.clone(),
        };
        Self::new(Action::from_tag(&spec.action), predicates)
    }

    /// Declarative form of this rule, as it would appear in the rule file.
    pub fn spec(&self) -> RuleSpec {
        RuleSpec {
            action: self.action.as_str().to_string(),
            flag: self.predicates.flag.as_ref().map(|s| s.as_str().to_string()),
            name: self.predicates.name.clone(),
            record_type: self
                .predicates
                .record_type
                .as_ref()
                .map(|s| s.as_str().to_string()),
            class: self.predicates.class.as_ref().map(|s| s.as_str().to_string()),
            data: self.predicates.data.clone(),
        }
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn predicates(&self) -> &Predicates {
        &self.predicates
    }

    /// An `Other` action yields `NoMatch` even when the predicates hold.
    pub fn evaluate(&self, message: &Message, observer: &dyn MatchObserver) -> RuleMatch {
        if !self.matches(message, observer) {
            return RuleMatch::NoMatch;
        }

        match &self.action {
            Action::Allow => RuleMatch::MatchAllow,
            Action::Block => RuleMatch::MatchBlock,
            Action::Other(_) => RuleMatch::NoMatch,
        }
    }

    /// Whether every predicate holds for `message`, regardless of action.
    pub fn matches(&self, message: &Message, observer: &dyn MatchObserver) -> bool {
        if let Some(flag) = &self.predicates.flag {
            match flag.known() {
                None => observer.unrecognized_symbol(SymbolKind::Flag, flag.as_str()),
                Some(expected) if expected.is_response() != message.is_response => return false,
                Some(_) => {}
            }
        }

        if message.is_response {
            self.matches_response(message, observer)
        } else {
            self.matches_query(message, observer)
        }
    }

    fn matches_query(&self, message: &Message, observer: &dyn MatchObserver) -> bool {
        if self.predicates.data.is_some() {
            return false;
        }

        message.questions.iter().all(|question| {
            observer.question_inspected(&question.name);
            self.matches_record(&question.name, question.qtype, question.qclass, observer)
        })
    }

    fn matches_response(&self, message: &Message, observer: &dyn MatchObserver) -> bool {
        message.answers.iter().all(|answer| {
            observer.answer_inspected(&answer.name);
            if !self.matches_record(&answer.name, answer.rtype, answer.rclass, observer) {
                return false;
            }
            match &self.predicates.data {
                Some(expected) => *expected == answer.data,
                None => true,
            }
        })
    }

    fn matches_record(
        &self,
        name: &str,
        rtype: u16,
        rclass: u16,
        observer: &dyn MatchObserver,
    ) -> bool {
        if let Some(expected) = &self.predicates.name
            && expected != name
        {
            return false;
        }

        symbol_holds(&self.predicates.record_type, SymbolKind::Type, rtype, observer)
            && symbol_holds(&self.predicates.class, SymbolKind::Class, rclass, observer)
    }
}

/// An unrecognized name is reported and then treated as satisfied.
fn symbol_holds<T: WireCode>(
    predicate: &Option<Symbol<T>>,
    kind: SymbolKind,
    actual: u16,
    observer: &dyn MatchObserver,
) -> bool {
    let Some(symbol) = predicate else {
        return true;
    };

    match symbol.known() {
        Some(expected) => expected.wire_code() == actual,
        None => {
            observer.unrecognized_symbol(kind, symbol.as_str());
            true
        }
    }
}
