use std::net::{Ipv4Addr, Ipv6Addr};

use hickory_proto::op::{Message as WireMessage, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::{A, CNAME};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use hickory_proto::serialize::binary::BinEncodable;
use nfq_dns_firewall::symbols::{RecordClass, RecordType as Type};
use nfq_dns_firewall::{Action, Message, Predicates, Question, ResourceRecord, Rule, RuleSpec};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::MutableIpv4Packet;
use pnet::packet::ipv6::MutableIpv6Packet;
use pnet::packet::udp::MutableUdpPacket;

pub fn question(name: &str, qtype: Type) -> Question {
    Question::new(name, qtype.to_u16(), RecordClass::IN.to_u16())
}

pub fn a_record(name: &str, address: &str) -> ResourceRecord {
    ResourceRecord::new(name, Type::A.to_u16(), RecordClass::IN.to_u16(), address)
}

pub fn cname_record(name: &str, target: &str) -> ResourceRecord {
    ResourceRecord::new(name, Type::CNAME.to_u16(), RecordClass::IN.to_u16(), target)
}

pub fn query_for(names: &[&str]) -> Message {
    Message::query(0x1337, names.iter().map(|n| question(n, Type::A)).collect())
}

pub fn response_for(name: &str, addresses: &[&str]) -> Message {
    Message::response(
        0x1337,
        vec![question(name, Type::A)],
        addresses.iter().map(|a| a_record(name, a)).collect(),
    )
}

/// Builds a rule the same way the config loader does.
pub struct RuleBuilder {
    spec: RuleSpec,
}

impl RuleBuilder {
    pub fn new(action: &str) -> Self {
        Self {
            spec: RuleSpec::new(action),
        }
    }

    pub fn block() -> Self {
        Self::new("block")
    }

    pub fn allow() -> Self {
        Self::new("allow")
    }

    pub fn flag(mut self, flag: &str) -> Self {
        self.spec.flag = Some(flag.to_string());
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.spec.name = Some(name.to_string());
        self
    }

    pub fn record_type(mut self, record_type: &str) -> Self {
        self.spec.record_type = Some(record_type.to_string());
        self
    }

    pub fn class(mut self, class: &str) -> Self {
        self.spec.class = Some(class.to_string());
        self
    }

    pub fn data(mut self, data: &str) -> Self {
        self.spec.data = Some(data.to_string());
        self
    }

    pub fn build(self) -> Rule {
        Rule::from_spec(&self.spec)
    }
}

pub fn catch_all(action: Action) -> Rule {
    Rule::new(action, Predicates::default())
}

pub fn encode_query(id: u16, name: &str, record_type: RecordType) -> Vec<u8> {
    let mut message = WireMessage::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true);
    message.add_query(Query::query(fqdn(name), record_type));
    message.to_vec().unwrap()
}

pub fn encode_response(id: u16, name: &str, addresses: &[Ipv4Addr]) -> Vec<u8> {
    let mut message = WireMessage::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .set_recursion_available(true);
    message.add_query(Query::query(fqdn(name), RecordType::A));
    for address in addresses {
        let octets = address.octets();
        message.add_answer(Record::from_rdata(
            fqdn(name),
            300,
            RData::A(A::new(octets[0], octets[1], octets[2], octets[3])),
        ));
    }
    message.to_vec().unwrap()
}

/// Response whose single answer aliases `name` to `target`.
pub fn encode_cname_response(id: u16, name: &str, target: &str) -> Vec<u8> {
    let mut message = WireMessage::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .set_recursion_available(true);
    message.add_query(Query::query(fqdn(name), RecordType::A));
    message.add_answer(Record::from_rdata(
        fqdn(name),
        300,
        RData::CNAME(CNAME(fqdn(target))),
    ));
    message.to_vec().unwrap()
}

fn fqdn(name: &str) -> Name {
    Name::from_ascii(format!("{}.", name)).unwrap()
}

const IPV4_HEADER_LEN: usize = 20;
const IPV6_HEADER_LEN: usize = 40;
const UDP_HEADER_LEN: usize = 8;

pub fn ipv4_udp(source_port: u16, destination_port: u16, payload: &[u8]) -> Vec<u8> {
    let udp_len = UDP_HEADER_LEN + payload.len();
    let mut buffer = vec![0u8; IPV4_HEADER_LEN + udp_len];
    {
        let mut ip = MutableIpv4Packet::new(&mut buffer).unwrap();
        ip.set_version(4);
        ip.set_header_length(5);
        ip.set_total_length((IPV4_HEADER_LEN + udp_len) as u16);
        ip.set_ttl(64);
        ip.set_next_level_protocol(IpNextHeaderProtocols::Udp);
        ip.set_source(Ipv4Addr::new(192, 168, 1, 100));
        ip.set_destination(Ipv4Addr::new(192, 168, 1, 1));
    }
    write_udp(&mut buffer[IPV4_HEADER_LEN..], source_port, destination_port, payload);
    buffer
}

pub fn ipv6_udp(source_port: u16, destination_port: u16, payload: &[u8]) -> Vec<u8> {
    let udp_len = UDP_HEADER_LEN + payload.len();
    let mut buffer = vec![0u8; IPV6_HEADER_LEN + udp_len];
    {
        let mut ip = MutableIpv6Packet::new(&mut buffer).unwrap();
        ip.set_version(6);
        ip.set_payload_length(udp_len as u16);
        ip.set_next_header(IpNextHeaderProtocols::Udp);
        ip.set_hop_limit(64);
        ip.set_source(Ipv6Addr::new(0xfd00, 0, 0, 0, 0, 0, 0, 2));
        ip.set_destination(Ipv6Addr::new(0xfd00, 0, 0, 0, 0, 0, 0, 1));
    }
    write_udp(&mut buffer[IPV6_HEADER_LEN..], source_port, destination_port, payload);
    buffer
}

/// IPv4 packet carrying `payload` under a non-UDP protocol.
pub fn ipv4_tcp(payload: &[u8]) -> Vec<u8> {
    let mut buffer = vec![0u8; IPV4_HEADER_LEN + payload.len()];
    {
        let mut ip = MutableIpv4Packet::new(&mut buffer).unwrap();
        ip.set_version(4);
        ip.set_header_length(5);
        ip.set_total_length((IPV4_HEADER_LEN + payload.len()) as u16);
        ip.set_ttl(64);
        ip.set_next_level_protocol(IpNextHeaderProtocols::Tcp);
        ip.set_source(Ipv4Addr::new(192, 168, 1, 100));
        ip.set_destination(Ipv4Addr::new(192, 168, 1, 1));
    }
    buffer[IPV4_HEADER_LEN..].copy_from_slice(payload);
    buffer
}

fn write_udp(buffer: &mut [u8], source_port: u16, destination_port: u16, payload: &[u8]) {
    let mut udp = MutableUdpPacket::new(buffer).unwrap();
    udp.set_source(source_port);
    udp.set_destination(destination_port);
    udp.set_length((UDP_HEADER_LEN + payload.len()) as u16);
    udp.set_payload(payload);
}
