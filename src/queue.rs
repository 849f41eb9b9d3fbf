//! Packet source plumbing and the verdict loop.

use std::io;
use std::thread;
use std::time::Duration;

use nfq::Queue;
use tracing::{debug, error, info};

use crate::error::Result;
use crate::filter::{Decision, PacketFilter, PacketVerdict};
use crate::observer::MatchObserver;
use crate::shutdown::Shutdown;

/// Something that hands out intercepted packets and takes a verdict back.
///
/// `verdict` consumes the packet, so each one is decided exactly once.
pub trait PacketSource {
    type Packet;

    /// `Ok(None)` when no packet is pending right now.
    fn recv(&mut self) -> io::Result<Option<Self::Packet>>;

    fn payload<'p>(&self, packet: &'p Self::Packet) -> &'p [u8];

    fn verdict(&mut self, packet: Self::Packet, verdict: PacketVerdict) -> io::Result<()>;

    /// Stops interception. Called once by [`serve`] after the loop ends.
    fn close(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Kernel NFQUEUE binding.
pub struct NfqueueSource {
    queue: Queue,
    queue_num: u16,
    bound: bool,
}

impl NfqueueSource {
    pub fn bind(queue_num: u16) -> Result<Self> {
        let mut queue = Queue::open()?;
        queue.bind(queue_num)?;
        queue.set_nonblocking(true);
        info!(queue_num, "Bound to NFQUEUE");

        Ok(Self {
            queue,
            queue_num,
            bound: true,
        })
    }

    /// Releases the queue so the kernel stops diverting packets to us.
    pub fn unbind(&mut self) -> io::Result<()> {
        if self.bound {
            self.bound = false;
            self.queue.unbind(self.queue_num)?;
            info!(queue_num = self.queue_num, "Unbound from NFQUEUE");
        }
        Ok(())
    }
}

impl Drop for NfqueueSource {
    fn drop(&mut self) {
        if let Err(e) = self.unbind() {
            error!(error = %e, "Failed to unbind NFQUEUE");
        }
    }
}

impl PacketSource for NfqueueSource {
    type Packet = nfq::Message;

    fn recv(&mut self) -> io::Result<Option<nfq::Message>> {
        match self.queue.recv() {
            Ok(msg) => Ok(Some(msg)),
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn payload<'p>(&self, packet: &'p nfq::Message) -> &'p [u8] {
        packet.get_payload()
    }

    fn verdict(&mut self, mut packet: nfq::Message, verdict: PacketVerdict) -> io::Result<()> {
        packet.set_verdict(verdict.into());
        self.queue.verdict(packet)
    }

    fn close(&mut self) -> io::Result<()> {
        self.unbind()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub packets: u64,
    pub inspected: u64,
    pub accepted: u64,
    pub dropped: u64,
}

impl RunStats {
    fn record(&mut self, decision: Decision) {
        self.packets += 1;
        if decision.inspected {
            self.inspected += 1;
        }
        match decision.verdict {
            PacketVerdict::Accept => self.accepted += 1,
            PacketVerdict::Drop => self.dropped += 1,
        }
    }
}

/// Decides packets one at a time until `shutdown` is requested.
///
/// Packets are never left without a verdict: the flag is only checked
/// between packets.
pub fn run<S, O>(
    source: &mut S,
    filter: &PacketFilter<O>,
    shutdown: &Shutdown,
    poll_interval: Duration,
) -> Result<RunStats>
where
    S: PacketSource,
    O: MatchObserver,
{
    let mut stats = RunStats::default();

    while !shutdown.is_requested() {
        let Some(packet) = source.recv()? else {
            thread::sleep(poll_interval);
            continue;
        };

        let decision = filter.decide(source.payload(&packet));
        stats.record(decision);
        debug!(verdict = ?decision.verdict, inspected = decision.inspected, "Packet handled");
        source.verdict(packet, decision.verdict)?;
    }

    info!(
        packets = stats.packets,
        inspected = stats.inspected,
        accepted = stats.accepted,
        dropped = stats.dropped,
        "Packet loop stopped"
    );
    Ok(stats)
}

/// Runs the packet loop, then closes `source`.
///
/// A loop error takes precedence; a close failure behind it is only logged.
pub fn serve<S, O>(
    source: &mut S,
    filter: &PacketFilter<O>,
    shutdown: &Shutdown,
    poll_interval: Duration,
) -> Result<RunStats>
where
    S: PacketSource,
    O: MatchObserver,
{
    let result = run(source, filter, shutdown, poll_interval);

    if let Err(e) = source.close() {
        error!(error = %e, "Failed to release packet source");
        if result.is_ok() {
            return Err(e.into());
        }
    }

    result
}
