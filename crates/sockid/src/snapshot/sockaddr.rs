//! Network identity of a `struct sockaddr`.

use super::SockaddrPtr;
use crate::identity::{AddressFamily, NetworkIdentity};
use crate::layout::SockaddrLayout;
use crate::memory::{KernelMemory, Probe};

/// Captures the address carried by a `sockaddr_in` / `sockaddr_in6`.
///
/// Only the tuple is written: family, source address and source port. The
/// destination is always zero. `protocol` and the socket-only fields of the
/// record are never touched, so [`fill`](Self::fill) into a reused record
/// keeps whatever the caller put there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SockaddrSnapshot {
    layout: SockaddrLayout,
}

impl SockaddrSnapshot {
    /// Create a snapshot routine for a sockaddr layout.
    pub fn new(layout: SockaddrLayout) -> Self {
        Self { layout }
    }

    /// Snapshot routine for the Linux uapi sockaddr layout.
    pub fn linux() -> Self {
        Self::new(SockaddrLayout::linux())
    }

    /// The layout this routine reads with.
    pub fn layout(&self) -> &SockaddrLayout {
        &self.layout
    }

    /// Capture `addr` into a fresh, otherwise zero record.
    pub fn capture<M: KernelMemory + ?Sized>(&self, mem: &M, addr: SockaddrPtr) -> NetworkIdentity {
        let mut event = NetworkIdentity::zeroed();
        self.fill(mem, addr, &mut event);
        event
    }

    /// Populate the tuple of `event` from `addr`.
    ///
    /// `source_port` is the raw `sin_port` / `sin6_port` value, still in
    /// network byte order.
    pub fn fill<M: KernelMemory + ?Sized>(
        &self,
        mem: &M,
        addr: SockaddrPtr,
        event: &mut NetworkIdentity,
    ) {
        let layout = &self.layout;
        let probe = Probe::new(mem, addr.addr());
        let tuple = &mut event.tuple;

        probe.value(layout.family, &mut tuple.family);
        tuple.clear_addresses();
        tuple.dest_port = 0;

        let family = tuple.family();
        let (addr_offset, port_offset) = match family {
            AddressFamily::Inet => (layout.in_addr, layout.in_port),
            AddressFamily::Inet6 => (layout.in6_addr, layout.in6_port),
            _ => {
                tracing::trace!(addr = %addr, ?family, "sockaddr family has no inet address");
                tuple.clear_unspec();
                return;
            }
        };
        probe.bytes(addr_offset, &mut tuple.source_address[..family.addr_len()]);
        probe.value(port_offset, &mut tuple.source_port);
    }
}
