//! Decoded, owned view of a network identity.

use std::fmt;
use std::net::{IpAddr, SocketAddr};

use super::record::NetworkIdentity;
use super::types::{AddressFamily, Protocol, SocketType, SocketState};

/// A [`NetworkIdentity`] with its integers decoded.
///
/// Ports are reported exactly as stored in the record. For socket captures
/// `dest_port` is host order and `source_port` is the kernel's local port
/// value; for sockaddr captures `source_port` is the raw `sin_port` /
/// `sin6_port` field, which is network byte order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowIdentity {
    /// Address family.
    pub family: AddressFamily,
    /// Transport protocol.
    pub protocol: Protocol,
    /// Source address (`None` for families without addresses).
    pub source: Option<IpAddr>,
    /// Source port.
    pub source_port: u16,
    /// Destination address (`None` for families without addresses).
    pub destination: Option<IpAddr>,
    /// Destination port.
    pub dest_port: u16,
    /// Connection state.
    pub state: SocketState,
    /// Socket type.
    pub socket_type: SocketType,
    /// Routing mark.
    pub mark: u32,
    /// Priority.
    pub priority: u32,
    /// Kernel address the record was captured from.
    pub handle: u64,
}

impl FlowIdentity {
    /// Local endpoint, if the family carries addresses.
    pub fn local(&self) -> Option<SocketAddr> {
        self.source.map(|ip| SocketAddr::new(ip, self.source_port))
    }

    /// Remote endpoint, if the family carries addresses.
    pub fn remote(&self) -> Option<SocketAddr> {
        self.destination
            .map(|ip| SocketAddr::new(ip, self.dest_port))
    }
}

impl From<&NetworkIdentity> for FlowIdentity {
    fn from(record: &NetworkIdentity) -> Self {
        Self {
            family: record.family(),
            protocol: record.protocol(),
            source: record.source_ip(),
            source_port: record.tuple.source_port,
            destination: record.dest_ip(),
            dest_port: record.tuple.dest_port,
            state: record.state(),
            socket_type: record.socket_type(),
            mark: record.mark,
            priority: record.priority,
            handle: record.raw_handle,
        }
    }
}

/// ss-like one-line form: `tcp ESTAB 192.0.2.1:4660 -> 203.0.113.5:80`.
impl fmt::Display for FlowIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.protocol.name(), self.state.name())?;
        match (self.local(), self.remote()) {
            (Some(local), Some(remote)) => write!(f, " {} -> {}", local, remote),
            _ => write!(f, " {} *", self.family.name()),
        }
    }
}
