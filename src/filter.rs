//! Packet filter: raw network-layer packet in, accept/drop out.
//!
//! Only UDP datagrams to or from the DNS port are inspected. Everything
//! else, including DNS payloads that fail to decode, is accepted.

use pnet::packet::Packet;
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::ipv6::Ipv6Packet;
use pnet::packet::udp::UdpPacket;
use tracing::{debug, trace};

use crate::dns::Message;
use crate::observer::{MatchObserver, TracingObserver};
use crate::ruleset::RuleSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketVerdict {
    Accept,
    Drop,
}

impl PacketVerdict {
    pub fn from_allowed(allowed: bool) -> Self {
        if allowed {
            PacketVerdict::Accept
        } else {
            PacketVerdict::Drop
        }
    }
}

impl From<PacketVerdict> for nfq::Verdict {
    fn from(verdict: PacketVerdict) -> Self {
        match verdict {
            PacketVerdict::Accept => nfq::Verdict::Accept,
            PacketVerdict::Drop => nfq::Verdict::Drop,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub verdict: PacketVerdict,
    /// The packet carried a DNS message that went through the ruleset.
    pub inspected: bool,
}

impl Decision {
    fn pass_through() -> Self {
        Self {
            verdict: PacketVerdict::Accept,
            inspected: false,
        }
    }
}

pub struct PacketFilter<O: MatchObserver = TracingObserver> {
    ruleset: RuleSet,
    dns_port: u16,
    observer: O,
}

impl PacketFilter<TracingObserver> {
    pub fn new(ruleset: RuleSet, dns_port: u16) -> Self {
        Self::with_observer(ruleset, dns_port, TracingObserver)
    }
}

impl<O: MatchObserver> PacketFilter<O> {
    pub fn with_observer(ruleset: RuleSet, dns_port: u16, observer: O) -> Self {
        Self {
            ruleset,
            dns_port,
            observer,
        }
    }

    pub fn ruleset(&self) -> &RuleSet {
        &self.ruleset
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn decide_verdict(&self, packet: &[u8]) -> PacketVerdict {
        self.decide(packet).verdict
    }

    pub fn decide(&self, packet: &[u8]) -> Decision {
        let Some(message) = self.dns_message(packet) else {
            return Decision::pass_through();
        };

        debug!(
            id = message.id,
            response = message.is_response,
            qdcount = message.counts.qdcount,
            ancount = message.counts.ancount,
            nscount = message.counts.nscount,
            arcount = message.counts.arcount,
            "DNS message"
        );

        let allowed = self.ruleset.evaluate(&message, &self.observer);
        Decision {
            verdict: PacketVerdict::from_allowed(allowed),
            inspected: true,
        }
    }

    /// Decodes the DNS message carried by `packet`, if there is one.
    pub fn dns_message(&self, packet: &[u8]) -> Option<Message> {
        match packet.first().map(|b| b >> 4) {
            Some(4) => {
                let ipv4 = Ipv4Packet::new(packet)?;
                if ipv4.get_next_level_protocol() != IpNextHeaderProtocols::Udp {
                    trace!(protocol = ?ipv4.get_next_level_protocol(), "Non-UDP packet");
                    return None;
                }
                self.decode_udp(ipv4.payload())
            }
            Some(6) => {
                let ipv6 = Ipv6Packet::new(packet)?;
                if ipv6.get_next_header() != IpNextHeaderProtocols::Udp {
                    trace!(protocol = ?ipv6.get_next_header(), "Non-UDP packet");
                    return None;
                }
                self.decode_udp(ipv6.payload())
            }
            _ => {
                trace!("Packet is neither IPv4 nor IPv6");
                None
            }
        }
    }

    fn decode_udp(&self, segment: &[u8]) -> Option<Message> {
        let udp = UdpPacket::new(segment)?;
        if udp.get_source() != self.dns_port && udp.get_destination() != self.dns_port {
            trace!(
                source = udp.get_source(),
                destination = udp.get_destination(),
                "UDP packet, non-DNS"
            );
            return None;
        }

        match Message::decode(udp.payload()) {
            Ok(message) => Some(message),
            Err(e) => {
                debug!(error = %e, "Failed to decode DNS payload, passing packet");
                None
            }
        }
    }
}
