//! Capturing network identities from kernel objects.
//!
//! Two independent routines fill a [`NetworkIdentity`]:
//!
//! - [`SocketSnapshot`] reads a `struct sock`: family, state, type,
//!   protocol, mark, priority, both addresses and both ports.
//! - [`SockaddrSnapshot`] reads a `struct sockaddr_in` / `sockaddr_in6` as
//!   passed to `bind(2)` / `connect(2)`: family, source address and port.
//!
//! Neither routine can fail. All memory goes through [`KernelMemory`]; a read
//! that faults leaves its field zero. A family other than IPv4 or IPv6 is
//! normalised to an unspecified tuple.
//!
//! # Example
//!
//! ```
//! use sockid::memory::MemoryImage;
//! use sockid::snapshot::{SockaddrPtr, SockaddrSnapshot};
//!
//! // struct sockaddr_in { AF_INET, port 0x1f90 as stored, 127.0.0.1 }
//! let mut sa = vec![0u8; 16];
//! sa[..2].copy_from_slice(&2u16.to_ne_bytes());
//! sa[2..4].copy_from_slice(&0x1f90u16.to_ne_bytes());
//! sa[4..8].copy_from_slice(&[127, 0, 0, 1]);
//!
//! let image = MemoryImage::builder().region(0x7ffd_0000, sa).build();
//! let record = SockaddrSnapshot::linux().capture(&image, SockaddrPtr::new(0x7ffd_0000));
//!
//! assert_eq!(record.source_ip(), Some("127.0.0.1".parse().unwrap()));
//! assert_eq!(record.tuple.source_port, 0x1f90);
//! assert_eq!(record.tuple.dest_port, 0);
//! ```
//!
//! [`NetworkIdentity`]: crate::identity::NetworkIdentity
//! [`KernelMemory`]: crate::memory::KernelMemory

mod sock;
mod sockaddr;

use std::fmt;

pub use sock::SocketSnapshot;
pub use sockaddr::SockaddrSnapshot;

/// Kernel address of a `struct sock`.
///
/// Only ever used as a base for bounded reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SockPtr(u64);

impl SockPtr {
    /// Wrap a kernel address.
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// The raw address.
    pub const fn addr(self) -> u64 {
        self.0
    }
}

impl From<u64> for SockPtr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::Display for SockPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Address of a `struct sockaddr` (kernel copy or user buffer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SockaddrPtr(u64);

impl SockaddrPtr {
    /// Wrap an address.
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// The raw address.
    pub const fn addr(self) -> u64 {
        self.0
    }
}

impl From<u64> for SockaddrPtr {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::Display for SockaddrPtr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
