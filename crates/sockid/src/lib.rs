//! Fault-tolerant capture of socket network identities.
//!
//! This crate turns a kernel socket (`struct sock`) or a socket address
//! (`struct sockaddr_in` / `sockaddr_in6`) into a fixed 64-byte
//! [`NetworkIdentity`] record suitable for trace events. Captures never
//! fail: unreadable memory yields zero fields and unknown address families
//! are normalised to `AF_UNSPEC`.
//!
//! # Modules
//!
//! - [`identity`] - the record, its decoded [`FlowIdentity`] view and names
//!   for families, protocols, socket types and states
//! - [`layout`] - where `struct sock` fields live on a given kernel
//! - [`memory`] - the [`KernelMemory`] read seam and an in-process image
//! - [`snapshot`] - [`SocketSnapshot`] and [`SockaddrSnapshot`]
//!
//! # Features
//!
//! - `serde` - JSON layout profiles and serializable decoded views
//!
//! # Example
//!
//! ```
//! use sockid::layout::{LayoutProfile, SockField};
//! use sockid::memory::MemoryImage;
//! use sockid::snapshot::{SockPtr, SocketSnapshot};
//!
//! let profile = LayoutProfile::new("example")
//!     .with_field(SockField::SkcDaddr, 0, 4)
//!     .with_field(SockField::SkcRcvSaddr, 4, 4)
//!     .with_field(SockField::SkcDport, 12, 2)
//!     .with_field(SockField::SkcNum, 14, 2)
//!     .with_field(SockField::SkcFamily, 16, 2)
//!     .with_field(SockField::SkcState, 18, 1)
//!     .with_field(SockField::SkcV6Daddr, 24, 16)
//!     .with_field(SockField::SkcV6RcvSaddr, 40, 16)
//!     .with_field(SockField::SkType, 56, 2)
//!     .with_field(SockField::SkProtocol, 58, 2)
//!     .with_field(SockField::SkMark, 60, 4)
//!     .with_field(SockField::SkPriority, 64, 4);
//! let snapshot = SocketSnapshot::resolve(&profile)?;
//!
//! let mut sk = vec![0u8; 68];
//! sk[0..4].copy_from_slice(&[203, 0, 113, 5]);
//! sk[4..8].copy_from_slice(&[192, 0, 2, 1]);
//! sk[12..14].copy_from_slice(&80u16.to_be_bytes());
//! sk[14..16].copy_from_slice(&4660u16.to_ne_bytes());
//! sk[16..18].copy_from_slice(&2u16.to_ne_bytes()); // AF_INET
//! sk[18] = 1; // TCP_ESTABLISHED
//! sk[58..60].copy_from_slice(&6u16.to_ne_bytes()); // IPPROTO_TCP
//!
//! let image = MemoryImage::builder().region(0xffff_8880_0000_1000, sk).build();
//! let record = snapshot.capture(&image, SockPtr::new(0xffff_8880_0000_1000));
//!
//! assert_eq!(record.flow().to_string(), "tcp ESTAB 192.0.2.1:4660 -> 203.0.113.5:80");
//! # Ok::<(), sockid::Error>(())
//! ```

pub mod error;
pub mod identity;
pub mod layout;
pub mod memory;
pub mod snapshot;

// Re-export common types at crate root for convenience
pub use error::{Error, ReadFault, Result};
pub use identity::{FlowIdentity, NetworkIdentity, NetworkTuple};
pub use layout::{LayoutProfile, LayoutSource, SockLayout, SockaddrLayout};
pub use memory::{KernelMemory, MemoryImage};
pub use snapshot::{SockPtr, SockaddrPtr, SockaddrSnapshot, SocketSnapshot};
