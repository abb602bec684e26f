//! The fixed-layout network identity record.
//!
//! [`NetworkIdentity`] is the wire contract with the event emission
//! pipeline: 64 bytes, `#[repr(C)]`, no padding, no pointers. Consumers read
//! it as raw bytes, so field order and widths must not change.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use super::flow::FlowIdentity;
use super::types::{AddressFamily, Protocol, SocketType, SocketState};
use crate::error::{Error, Result};

/// Length of an IPv6 address (and of the tuple buffers).
pub const IPV6_LEN: usize = 16;

/// Network tuple (family, protocol, addresses, ports).
///
/// Addresses are stored left-justified in 16-byte buffers: an IPv4 address
/// occupies the first four bytes and the rest is zero.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct NetworkTuple {
    /// Source (local) address.
    pub source_address: [u8; IPV6_LEN],
    /// Destination (peer) address.
    pub dest_address: [u8; IPV6_LEN],
    /// Source port, copied from the kernel field without conversion.
    pub source_port: u16,
    /// Destination port, host byte order.
    pub dest_port: u16,
    /// Transport protocol number.
    pub protocol: u16,
    /// Address family tag (`AF_*`).
    pub family: u16,
}

impl NetworkTuple {
    /// Size of this structure.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Decoded address family.
    pub fn family(&self) -> AddressFamily {
        AddressFamily::from_raw(self.family)
    }

    /// Decoded transport protocol.
    pub fn protocol(&self) -> Protocol {
        Protocol::from_raw(self.protocol)
    }

    /// Source address, if the family carries one.
    pub fn source_ip(&self) -> Option<IpAddr> {
        addr_from_buf(self.family(), &self.source_address)
    }

    /// Destination address, if the family carries one.
    pub fn dest_ip(&self) -> Option<IpAddr> {
        addr_from_buf(self.family(), &self.dest_address)
    }

    /// Zero both address buffers.
    pub fn clear_addresses(&mut self) {
        self.source_address = [0; IPV6_LEN];
        self.dest_address = [0; IPV6_LEN];
    }

    /// Normalise to the unspecified family: family, addresses and ports
    /// zero. The protocol is left alone.
    pub fn clear_unspec(&mut self) {
        self.family = AddressFamily::Unspec.raw();
        self.clear_addresses();
        self.source_port = 0;
        self.dest_port = 0;
    }
}

fn addr_from_buf(family: AddressFamily, buf: &[u8; IPV6_LEN]) -> Option<IpAddr> {
    match family {
        AddressFamily::Inet => Some(IpAddr::V4(Ipv4Addr::new(buf[0], buf[1], buf[2], buf[3]))),
        AddressFamily::Inet6 => Some(IpAddr::V6(Ipv6Addr::from(*buf))),
        _ => None,
    }
}

/// Network identity of a socket, as emitted in trace events.
///
/// `raw_handle` is the kernel address the record was captured from. It is
/// kept for correlation only and is never dereferenced again, which is why
/// it is a plain `u64`.
///
/// `mark`, `priority`, `socket_type` and `state` are only meaningful for
/// records captured from a socket; a sockaddr capture leaves them zero.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, FromBytes, IntoBytes, Immutable, KnownLayout,
)]
pub struct NetworkIdentity {
    /// Network tuple.
    pub tuple: NetworkTuple,
    /// Address of the originating kernel object.
    pub raw_handle: u64,
    /// Routing mark (`sk_mark`).
    pub mark: u32,
    /// Priority (`sk_priority`).
    pub priority: u32,
    /// Socket type (`sk_type`).
    pub socket_type: u16,
    /// Connection state (`skc_state`).
    pub state: u8,
    /// Padding, always zero.
    pub pad: [u8; 5],
}

impl NetworkIdentity {
    /// Size of this structure.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// An all-zero record.
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Convert to bytes.
    pub fn as_bytes(&self) -> &[u8] {
        <Self as IntoBytes>::as_bytes(self)
    }

    /// Parse from bytes. The input does not need to be aligned.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::read_from_prefix(data)
            .map(|(r, _)| r)
            .map_err(|_| Error::Truncated {
                expected: Self::SIZE,
                actual: data.len(),
            })
    }

    /// Decoded address family.
    pub fn family(&self) -> AddressFamily {
        self.tuple.family()
    }

    /// Decoded transport protocol.
    pub fn protocol(&self) -> Protocol {
        self.tuple.protocol()
    }

    /// Source address, if the family carries one.
    pub fn source_ip(&self) -> Option<IpAddr> {
        self.tuple.source_ip()
    }

    /// Destination address, if the family carries one.
    pub fn dest_ip(&self) -> Option<IpAddr> {
        self.tuple.dest_ip()
    }

    /// Decoded connection state.
    pub fn state(&self) -> SocketState {
        SocketState::from_raw(self.state)
    }

    /// Decoded socket type.
    pub fn socket_type(&self) -> SocketType {
        SocketType::from_raw(self.socket_type)
    }

    /// Owned, decoded view of this record.
    pub fn flow(&self) -> FlowIdentity {
        FlowIdentity::from(self)
    }
}
