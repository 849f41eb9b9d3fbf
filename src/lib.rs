//! DNS-aware NFQUEUE firewall.
pub mod config;
pub mod dns;
pub mod error;
pub mod filter;
pub mod observer;
pub mod queue;
pub mod rule;
pub mod ruleset;
pub mod shutdown;
pub mod symbols;

pub use config::{CliOverrides, Config, ConfigError, RuleSpec};
pub use dns::{DnsError, Message, Question, ResourceRecord};
pub use error::FirewallError;
pub use filter::{Decision, PacketFilter, PacketVerdict};
pub use observer::{MatchObserver, NullObserver, TracingObserver};
pub use queue::{NfqueueSource, PacketSource, RunStats};
pub use rule::{Action, Predicates, Rule, RuleMatch};
pub use ruleset::RuleSet;
pub use shutdown::Shutdown;
