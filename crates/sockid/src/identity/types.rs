//! Decoded forms of the raw values carried by a [`NetworkIdentity`].
//!
//! The record itself stores plain integers so that its byte layout stays
//! fixed. These types give those integers names.
//!
//! [`NetworkIdentity`]: super::NetworkIdentity

/// Socket address family.
///
/// Only IPv4 and IPv6 carry addresses in a network identity; everything else
/// is kept as its raw tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AddressFamily {
    /// `AF_UNSPEC`.
    #[default]
    Unspec,
    /// IPv4.
    Inet,
    /// IPv6.
    Inet6,
    /// Any other family (Unix, netlink, packet, ...).
    Other(u16),
}

impl AddressFamily {
    /// Parse from a raw family tag.
    pub fn from_raw(value: u16) -> Self {
        match i32::from(value) {
            libc::AF_UNSPEC => Self::Unspec,
            libc::AF_INET => Self::Inet,
            libc::AF_INET6 => Self::Inet6,
            _ => Self::Other(value),
        }
    }

    /// Get the raw family tag.
    pub fn raw(&self) -> u16 {
        match self {
            Self::Unspec => libc::AF_UNSPEC as u16,
            Self::Inet => libc::AF_INET as u16,
            Self::Inet6 => libc::AF_INET6 as u16,
            Self::Other(value) => *value,
        }
    }

    /// Get the family name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unspec => "unspec",
            Self::Inet => "inet",
            Self::Inet6 => "inet6",
            Self::Other(value) => match i32::from(*value) {
                libc::AF_UNIX => "unix",
                libc::AF_NETLINK => "netlink",
                libc::AF_PACKET => "packet",
                40 => "vsock", // AF_VSOCK
                44 => "xdp",   // AF_XDP
                _ => "other",
            },
        }
    }

    /// Length in bytes of an address of this family.
    pub fn addr_len(&self) -> usize {
        match self {
            Self::Inet => 4,
            Self::Inet6 => 16,
            _ => 0,
        }
    }
}

/// Transport protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Protocol {
    /// IP (protocol 0, the default for a family).
    Ip,
    /// ICMP.
    Icmp,
    /// TCP.
    Tcp,
    /// UDP.
    Udp,
    /// DCCP.
    Dccp,
    /// ICMPv6.
    Icmpv6,
    /// SCTP.
    Sctp,
    /// UDP-Lite.
    UdpLite,
    /// MPTCP.
    Mptcp,
    /// Raw IP.
    Raw,
    /// Anything else.
    Other(u16),
}

impl Protocol {
    /// Parse from a raw protocol number.
    pub fn from_raw(value: u16) -> Self {
        match i32::from(value) {
            libc::IPPROTO_IP => Self::Ip,
            libc::IPPROTO_ICMP => Self::Icmp,
            libc::IPPROTO_TCP => Self::Tcp,
            libc::IPPROTO_UDP => Self::Udp,
            33 => Self::Dccp,
            libc::IPPROTO_ICMPV6 => Self::Icmpv6,
            132 => Self::Sctp,
            136 => Self::UdpLite,
            262 => Self::Mptcp,
            libc::IPPROTO_RAW => Self::Raw,
            _ => Self::Other(value),
        }
    }

    /// Get the protocol number.
    pub fn number(&self) -> u16 {
        match self {
            Self::Ip => libc::IPPROTO_IP as u16,
            Self::Icmp => libc::IPPROTO_ICMP as u16,
            Self::Tcp => libc::IPPROTO_TCP as u16,
            Self::Udp => libc::IPPROTO_UDP as u16,
            Self::Dccp => 33,
            Self::Icmpv6 => libc::IPPROTO_ICMPV6 as u16,
            Self::Sctp => 132,
            Self::UdpLite => 136,
            Self::Mptcp => 262,
            Self::Raw => libc::IPPROTO_RAW as u16,
            Self::Other(value) => *value,
        }
    }

    /// Get the protocol name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ip => "ip",
            Self::Icmp => "icmp",
            Self::Tcp => "tcp",
            Self::Udp => "udp",
            Self::Dccp => "dccp",
            Self::Icmpv6 => "icmpv6",
            Self::Sctp => "sctp",
            Self::UdpLite => "udplite",
            Self::Mptcp => "mptcp",
            Self::Raw => "raw",
            Self::Other(_) => "other",
        }
    }
}

/// Socket type (`sk_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SocketType {
    /// `SOCK_STREAM`.
    Stream,
    /// `SOCK_DGRAM`.
    Dgram,
    /// `SOCK_RAW`.
    Raw,
    /// `SOCK_RDM`.
    Rdm,
    /// `SOCK_SEQPACKET`.
    SeqPacket,
    /// `SOCK_DCCP`.
    Dccp,
    /// `SOCK_PACKET`.
    Packet,
    /// Zero or an unknown type.
    Other(u16),
}

impl SocketType {
    /// Parse from a raw `sk_type` value.
    pub fn from_raw(value: u16) -> Self {
        match value {
            1 => Self::Stream,
            2 => Self::Dgram,
            3 => Self::Raw,
            4 => Self::Rdm,
            5 => Self::SeqPacket,
            6 => Self::Dccp,
            10 => Self::Packet,
            _ => Self::Other(value),
        }
    }

    /// Get the raw value.
    pub fn raw(&self) -> u16 {
        match self {
            Self::Stream => 1,
            Self::Dgram => 2,
            Self::Raw => 3,
            Self::Rdm => 4,
            Self::SeqPacket => 5,
            Self::Dccp => 6,
            Self::Packet => 10,
            Self::Other(value) => *value,
        }
    }

    /// Get the type name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Stream => "stream",
            Self::Dgram => "dgram",
            Self::Raw => "raw",
            Self::Rdm => "rdm",
            Self::SeqPacket => "seqpacket",
            Self::Dccp => "dccp",
            Self::Packet => "packet",
            Self::Other(_) => "unknown",
        }
    }
}

/// Value of `skc_state` in a captured socket.
///
/// Every socket family stores its state in the TCP state numbering. An
/// unconnected UDP or raw socket sits in [`Close`](Self::Close), a
/// connected one in [`Established`](Self::Established). Zero is not a
/// kernel state; it is what a failed read leaves behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum SocketState {
    /// Zero or out of range.
    Unknown = 0,
    /// `TCP_ESTABLISHED`, also a connected datagram socket.
    Established,
    /// `TCP_SYN_SENT`.
    SynSent,
    /// `TCP_SYN_RECV`.
    SynRecv,
    /// `TCP_FIN_WAIT1`.
    FinWait1,
    /// `TCP_FIN_WAIT2`.
    FinWait2,
    /// `TCP_TIME_WAIT`.
    TimeWait,
    /// `TCP_CLOSE`, also an unconnected datagram socket.
    Close,
    /// `TCP_CLOSE_WAIT`.
    CloseWait,
    /// `TCP_LAST_ACK`.
    LastAck,
    /// `TCP_LISTEN`.
    Listen,
    /// `TCP_CLOSING`.
    Closing,
    /// `TCP_NEW_SYN_RECV`, request sockets only.
    NewSynRecv,
    /// `TCP_BOUND_INACTIVE`.
    BoundInactive,
}

/// States in `skc_state` order, with their ss column label.
const STATES: [(SocketState, &str); 14] = [
    (SocketState::Unknown, "UNKNOWN"),
    (SocketState::Established, "ESTAB"),
    (SocketState::SynSent, "SYN-SENT"),
    (SocketState::SynRecv, "SYN-RECV"),
    (SocketState::FinWait1, "FIN-WAIT-1"),
    (SocketState::FinWait2, "FIN-WAIT-2"),
    (SocketState::TimeWait, "TIME-WAIT"),
    (SocketState::Close, "UNCONN"),
    (SocketState::CloseWait, "CLOSE-WAIT"),
    (SocketState::LastAck, "LAST-ACK"),
    (SocketState::Listen, "LISTEN"),
    (SocketState::Closing, "CLOSING"),
    (SocketState::NewSynRecv, "NEW-SYN-RECV"),
    (SocketState::BoundInactive, "BOUND-INACTIVE"),
];

impl SocketState {
    /// Decode a raw `skc_state` byte. Out-of-range values map to `Unknown`.
    pub fn from_raw(value: u8) -> Self {
        STATES
            .get(usize::from(value))
            .map_or(Self::Unknown, |&(state, _)| state)
    }

    /// The raw `skc_state` byte.
    pub fn raw(self) -> u8 {
        self as u8
    }

    /// Label as printed by `ss`.
    pub fn name(self) -> &'static str {
        STATES[usize::from(self.raw())].1
    }
}
