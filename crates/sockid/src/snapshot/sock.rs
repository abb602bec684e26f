//! Network identity of a `struct sock`.

use super::SockPtr;
use crate::error::Result;
use crate::identity::{AddressFamily, NetworkIdentity};
use crate::layout::{LayoutSource, SockLayout};
use crate::memory::{KernelMemory, Probe};

/// Captures the network identity of a kernel socket.
///
/// Holds the resolved [`SockLayout`]; cheap to copy and safe to share
/// between threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SocketSnapshot {
    layout: SockLayout,
}

impl SocketSnapshot {
    /// Create a snapshot routine for a resolved layout.
    pub fn new(layout: SockLayout) -> Self {
        Self { layout }
    }

    /// Resolve `source` and create a snapshot routine for it.
    pub fn resolve(source: &dyn LayoutSource) -> Result<Self> {
        SockLayout::resolve(source).map(Self::new)
    }

    /// The layout this routine reads with.
    pub fn layout(&self) -> &SockLayout {
        &self.layout
    }

    /// Capture `sk` into a fresh record.
    pub fn capture<M: KernelMemory + ?Sized>(&self, mem: &M, sk: SockPtr) -> NetworkIdentity {
        let mut event = NetworkIdentity::zeroed();
        self.fill(mem, sk, &mut event);
        event
    }

    /// Populate `event` from `sk`.
    ///
    /// Every field of `event` is overwritten, so its previous content does
    /// not matter. `dest_port` is converted to host order; `source_port` is
    /// `skc_num`, which the kernel already keeps in host order, copied as is.
    pub fn fill<M: KernelMemory + ?Sized>(
        &self,
        mem: &M,
        sk: SockPtr,
        event: &mut NetworkIdentity,
    ) {
        let layout = &self.layout;
        let probe = Probe::new(mem, sk.addr());

        event.raw_handle = sk.addr();
        event.pad = [0; 5];

        probe.value(layout.family, &mut event.tuple.family);
        probe.value(layout.state, &mut event.state);
        probe.value(layout.sk_type, &mut event.socket_type);
        probe.value(layout.protocol, &mut event.tuple.protocol);
        event.tuple.protocol = layout.protocol_width.correct(event.tuple.protocol);
        probe.value(layout.mark, &mut event.mark);
        probe.value(layout.priority, &mut event.priority);

        let tuple = &mut event.tuple;
        tuple.clear_addresses();
        let family = tuple.family();
        let (saddr, daddr) = match family {
            AddressFamily::Inet => (layout.rcv_saddr, layout.daddr),
            AddressFamily::Inet6 => (layout.v6_rcv_saddr, layout.v6_daddr),
            _ => {
                tracing::trace!(sk = %sk, ?family, "socket family has no inet tuple");
                tuple.clear_unspec();
                return;
            }
        };
        let len = family.addr_len();
        probe.bytes(saddr, &mut tuple.source_address[..len]);
        probe.bytes(daddr, &mut tuple.dest_address[..len]);

        probe.value(layout.num, &mut tuple.source_port);
        probe.value(layout.dport, &mut tuple.dest_port);
        tuple.dest_port = u16::from_be(tuple.dest_port);
    }
}
