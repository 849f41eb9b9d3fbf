//! Decoded view of a DNS message carried in a UDP datagram.
//!
//! Wire decoding is delegated to `hickory-proto`; this module keeps only
//! the fields the rule engine looks at.

use hickory_proto::op::{Message as WireMessage, MessageType};
use hickory_proto::rr::{Name, RData, Record};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DnsError {
    #[error("Empty DNS payload")]
    EmptyPayload,

    #[error("Malformed DNS message: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub name: String,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn new(name: &str, qtype: u16, qclass: u16) -> Self {
        Self {
            name: name.to_string(),
            qtype,
            qclass,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub rtype: u16,
    pub rclass: u16,
    /// Presentation form of the record data, e.g. `1.2.3.4` for an A record.
    /// Names inside the data are written without the root dot, the same as
    /// owner names: a CNAME to `cdn.example.net.` reads `cdn.example.net`.
    pub data: String,
}

impl ResourceRecord {
    pub fn new(name: &str, rtype: u16, rclass: u16, data: &str) -> Self {
        Self {
            name: name.to_string(),
            rtype,
            rclass,
            data: data.to_string(),
        }
    }
}

/// Section counters as read from the header. Diagnostic only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderCounts {
    pub qdcount: u16,
    pub ancount: u16,
    pub nscount: u16,
    pub arcount: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: u16,
    pub is_response: bool,
    pub questions: Vec<Question>,
    pub answers: Vec<ResourceRecord>,
    pub counts: HeaderCounts,
}

impl Message {
    pub fn query(id: u16, questions: Vec<Question>) -> Self {
        let counts = HeaderCounts {
            qdcount: section_count(questions.len()),
            ..HeaderCounts::default()
        };
        Self {
            id,
            is_response: false,
            questions,
            answers: Vec::new(),
            counts,
        }
    }

    pub fn response(id: u16, questions: Vec<Question>, answers: Vec<ResourceRecord>) -> Self {
        let counts = HeaderCounts {
            qdcount: section_count(questions.len()),
            ancount: section_count(answers.len()),
            ..HeaderCounts::default()
        };
        Self {
            id,
            is_response: true,
            questions,
            answers,
            counts,
        }
    }

    /// Decodes a UDP payload into a message.
    pub fn decode(payload: &[u8]) -> Result<Self, DnsError> {
        if payload.is_empty() {
            return Err(DnsError::EmptyPayload);
        }

        let wire = WireMessage::from_vec(payload).map_err(|e| DnsError::Malformed(e.to_string()))?;

        let header = wire.header();
        let counts = HeaderCounts {
            qdcount: header.query_count(),
            ancount: header.answer_count(),
            nscount: header.name_server_count(),
            arcount: header.additional_count(),
        };

        let questions = wire
            .queries()
            .iter()
            .map(|q| Question {
                name: textual_name(q.name()),
                qtype: u16::from(q.query_type()),
                qclass: u16::from(q.query_class()),
            })
            .collect();

        let answers = wire.answers().iter().map(answer_from_record).collect();

        Ok(Self {
            id: wire.id(),
            is_response: wire.message_type() == MessageType::Response,
            questions,
            answers,
            counts,
        })
    }
}

fn answer_from_record(record: &Record) -> ResourceRecord {
    ResourceRecord {
        name: textual_name(record.name()),
        rtype: u16::from(record.record_type()),
        rclass: u16::from(record.dns_class()),
        data: record.data().map(textual_data).unwrap_or_default(),
    }
}

/// Header counters are 16 bits wide; larger sections saturate.
fn section_count(len: usize) -> u16 {
    u16::try_from(len).unwrap_or(u16::MAX)
}

fn textual_data(rdata: &RData) -> String {
    let text = rdata.to_string();
    // These render with the target name last.
    match rdata {
        RData::CNAME(_) | RData::NS(_) | RData::PTR(_) | RData::MX(_) | RData::SRV(_) => {
            strip_root_dot(text)
        }
        _ => text,
    }
}

fn textual_name(name: &Name) -> String {
    strip_root_dot(name.to_utf8())
}

/// `example.com.` becomes `example.com`; the root stays `.`.
fn strip_root_dot(mut text: String) -> String {
    if text.len() > 1 && text.ends_with('.') {
        text.pop();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_count_saturates() {
        assert_eq!(section_count(3), 3);
        assert_eq!(section_count(usize::from(u16::MAX)), u16::MAX);
        assert_eq!(section_count(usize::from(u16::MAX) + 1), u16::MAX);
    }

    #[test]
    fn test_oversized_query_saturates_qdcount() {
        let questions = vec![Question::new("example.com", 1, 1); usize::from(u16::MAX) + 2];
        let message = Message::query(1, questions);

        assert_eq!(message.counts.qdcount, u16::MAX);
        assert_eq!(message.questions.len(), usize::from(u16::MAX) + 2);
    }

    #[test]
    fn test_root_dot_stripping() {
        assert_eq!(strip_root_dot("example.com.".to_string()), "example.com");
        assert_eq!(strip_root_dot(".".to_string()), ".");
        assert_eq!(strip_root_dot("example.com".to_string()), "example.com");
    }
}
