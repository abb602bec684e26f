//! Kernel structure layouts.
//!
//! Field offsets inside `struct sock` move between kernel versions and
//! configurations, and at least one field (`sk_protocol`) changes its storage
//! width: before v5.6 the 8-bit protocol lives inside a 32-bit bitfield word,
//! afterwards it is a plain `u16`.
//!
//! A [`LayoutSource`] answers "where is this field and how wide is it" for
//! the running kernel (BTF, a pre-computed profile, a test fixture).
//! [`SockLayout::resolve`] queries it once, validates the answers and caches
//! them in a plain value that the snapshots copy. Nothing re-queries the
//! source during a capture.
//!
//! # Example
//!
//! ```
//! use sockid::layout::{LayoutProfile, ProtocolWidth, SockField, SockLayout};
//!
//! let profile = LayoutProfile::new("test")
//!     .with_field(SockField::SkcDaddr, 0, 4)
//!     .with_field(SockField::SkcRcvSaddr, 4, 4)
//!     .with_field(SockField::SkcDport, 12, 2)
//!     .with_field(SockField::SkcNum, 14, 2)
//!     .with_field(SockField::SkcFamily, 16, 2)
//!     .with_field(SockField::SkcState, 18, 1)
//!     .with_field(SockField::SkcV6Daddr, 56, 16)
//!     .with_field(SockField::SkcV6RcvSaddr, 72, 16)
//!     .with_field(SockField::SkType, 96, 2)
//!     .with_field(SockField::SkProtocol, 98, 2)
//!     .with_field(SockField::SkMark, 100, 4)
//!     .with_field(SockField::SkPriority, 104, 4);
//!
//! let layout = SockLayout::resolve(&profile).unwrap();
//! assert_eq!(layout.protocol_width(), ProtocolWidth::Native);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// A `struct sock` / `struct sock_common` field read by the socket snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum SockField {
    /// `__sk_common.skc_daddr`: IPv4 peer address.
    SkcDaddr,
    /// `__sk_common.skc_rcv_saddr`: IPv4 bound address.
    SkcRcvSaddr,
    /// `__sk_common.skc_dport`: peer port, network byte order.
    SkcDport,
    /// `__sk_common.skc_num`: local port, host byte order.
    SkcNum,
    /// `__sk_common.skc_family`.
    SkcFamily,
    /// `__sk_common.skc_state`.
    SkcState,
    /// `__sk_common.skc_v6_daddr`: IPv6 peer address.
    SkcV6Daddr,
    /// `__sk_common.skc_v6_rcv_saddr`: IPv6 bound address.
    SkcV6RcvSaddr,
    /// `sk_type`.
    SkType,
    /// `sk_protocol`. A `u16` since v5.6, an 8-bit bitfield in a `u32` before.
    SkProtocol,
    /// `sk_mark`.
    SkMark,
    /// `sk_priority`.
    SkPriority,
}

impl SockField {
    /// Every field a socket snapshot reads.
    pub const ALL: [SockField; 12] = [
        Self::SkcDaddr,
        Self::SkcRcvSaddr,
        Self::SkcDport,
        Self::SkcNum,
        Self::SkcFamily,
        Self::SkcState,
        Self::SkcV6Daddr,
        Self::SkcV6RcvSaddr,
        Self::SkType,
        Self::SkProtocol,
        Self::SkMark,
        Self::SkPriority,
    ];

    /// Kernel name of the field.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SkcDaddr => "skc_daddr",
            Self::SkcRcvSaddr => "skc_rcv_saddr",
            Self::SkcDport => "skc_dport",
            Self::SkcNum => "skc_num",
            Self::SkcFamily => "skc_family",
            Self::SkcState => "skc_state",
            Self::SkcV6Daddr => "skc_v6_daddr",
            Self::SkcV6RcvSaddr => "skc_v6_rcv_saddr",
            Self::SkType => "sk_type",
            Self::SkProtocol => "sk_protocol",
            Self::SkMark => "sk_mark",
            Self::SkPriority => "sk_priority",
        }
    }

    /// Storage sizes the snapshot knows how to read.
    pub fn accepted_sizes(&self) -> &'static [usize] {
        match self {
            Self::SkcDaddr | Self::SkcRcvSaddr | Self::SkMark | Self::SkPriority => &[4],
            Self::SkcDport | Self::SkcNum | Self::SkcFamily | Self::SkType => &[2],
            Self::SkcState => &[1],
            Self::SkcV6Daddr | Self::SkcV6RcvSaddr => &[16],
            Self::SkProtocol => &[2, 4],
        }
    }
}

impl fmt::Display for SockField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Offset and storage size of a field on the running kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FieldInfo {
    /// Byte offset from the start of `struct sock`.
    pub offset: usize,
    /// Storage size in bytes.
    pub size: usize,
}

/// Layout introspection for `struct sock`.
pub trait LayoutSource {
    /// Look up a field. `None` if the running kernel does not have it.
    fn field(&self, field: SockField) -> Option<FieldInfo>;
}

impl<S: LayoutSource + ?Sized> LayoutSource for &S {
    fn field(&self, field: SockField) -> Option<FieldInfo> {
        (**self).field(field)
    }
}

/// A named table of field locations.
///
/// Profiles are usually generated from a kernel's BTF and shipped as JSON
/// (with the `serde` feature):
///
/// ```json
/// {
///   "name": "linux-6.1-x86_64",
///   "fields": {
///     "skc_family": { "offset": 16, "size": 2 },
///     "sk_protocol": { "offset": 514, "size": 2 }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayoutProfile {
    /// Human readable profile name (kernel release, arch).
    pub name: String,
    /// Field table.
    pub fields: BTreeMap<SockField, FieldInfo>,
}

impl LayoutProfile {
    /// Create an empty profile.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Set a field location.
    pub fn with_field(mut self, field: SockField, offset: usize, size: usize) -> Self {
        self.fields.insert(field, FieldInfo { offset, size });
        self
    }

    /// Parse a profile from JSON.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a profile from a JSON file.
    #[cfg(feature = "serde")]
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize the profile to pretty-printed JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl LayoutSource for LayoutProfile {
    fn field(&self, field: SockField) -> Option<FieldInfo> {
        self.fields.get(&field).copied()
    }
}

/// Storage width of `sk_protocol` on the running kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolWidth {
    /// A dedicated `u16` field (v5.6 and later).
    Native,
    /// An 8-bit bitfield inside a 32-bit word (before v5.6). Reading the
    /// field as a `u16` yields the protocol in the high byte.
    Word,
}

impl ProtocolWidth {
    /// Classify a storage size reported by layout introspection.
    pub fn from_size(size: usize) -> Self {
        if size == 4 { Self::Word } else { Self::Native }
    }

    /// Turn the raw 16-bit read into the protocol number.
    #[inline]
    pub fn correct(&self, raw: u16) -> u16 {
        match self {
            Self::Native => raw,
            Self::Word => raw >> 8,
        }
    }
}

/// Resolved `struct sock` layout.
///
/// Built once by [`SockLayout::resolve`] and then only copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SockLayout {
    pub(crate) daddr: usize,
    pub(crate) rcv_saddr: usize,
    pub(crate) dport: usize,
    pub(crate) num: usize,
    pub(crate) family: usize,
    pub(crate) state: usize,
    pub(crate) v6_daddr: usize,
    pub(crate) v6_rcv_saddr: usize,
    pub(crate) sk_type: usize,
    pub(crate) protocol: usize,
    pub(crate) mark: usize,
    pub(crate) priority: usize,
    pub(crate) protocol_width: ProtocolWidth,
}

impl SockLayout {
    /// Query every field once and validate its size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] if the source cannot place a field and
    /// [`Error::InvalidFieldSize`] if a field has a width the snapshot cannot
    /// read.
    pub fn resolve(source: &dyn LayoutSource) -> Result<Self> {
        let lookup = |field: SockField| -> Result<FieldInfo> {
            let info = source.field(field).ok_or(Error::MissingField { field })?;
            let expected = field.accepted_sizes();
            if !expected.contains(&info.size) {
                return Err(Error::InvalidFieldSize {
                    field,
                    size: info.size,
                    expected,
                });
            }
            Ok(info)
        };

        let mut offsets = [0usize; SockField::ALL.len()];
        let mut protocol_size = 0;
        for (slot, field) in offsets.iter_mut().zip(SockField::ALL) {
            let info = lookup(field)?;
            *slot = info.offset;
            if field == SockField::SkProtocol {
                protocol_size = info.size;
            }
        }

        // Same order as `SockField::ALL`.
        let [
            daddr,
            rcv_saddr,
            dport,
            num,
            family,
            state,
            v6_daddr,
            v6_rcv_saddr,
            sk_type,
            protocol,
            mark,
            priority,
        ] = offsets;
        let layout = Self {
            daddr,
            rcv_saddr,
            dport,
            num,
            family,
            state,
            v6_daddr,
            v6_rcv_saddr,
            sk_type,
            protocol,
            mark,
            priority,
            protocol_width: ProtocolWidth::from_size(protocol_size),
        };

        tracing::debug!(
            protocol_size,
            protocol_width = ?layout.protocol_width,
            "resolved struct sock layout"
        );
        Ok(layout)
    }

    /// Storage width of `sk_protocol`.
    pub fn protocol_width(&self) -> ProtocolWidth {
        self.protocol_width
    }

    /// Offset of a field.
    pub fn offset(&self, field: SockField) -> usize {
        match field {
            SockField::SkcDaddr => self.daddr,
            SockField::SkcRcvSaddr => self.rcv_saddr,
            SockField::SkcDport => self.dport,
            SockField::SkcNum => self.num,
            SockField::SkcFamily => self.family,
            SockField::SkcState => self.state,
            SockField::SkcV6Daddr => self.v6_daddr,
            SockField::SkcV6RcvSaddr => self.v6_rcv_saddr,
            SockField::SkType => self.sk_type,
            SockField::SkProtocol => self.protocol,
            SockField::SkMark => self.mark,
            SockField::SkPriority => self.priority,
        }
    }
}

/// Field offsets of `struct sockaddr_in` / `struct sockaddr_in6`.
///
/// These are fixed by the user ABI and do not need introspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SockaddrLayout {
    /// Offset of `sa_family` (shared by every sockaddr form).
    pub family: usize,
    /// Offset of `sin_port`.
    pub in_port: usize,
    /// Offset of `sin_addr.s_addr`.
    pub in_addr: usize,
    /// Offset of `sin6_port`.
    pub in6_port: usize,
    /// Offset of `sin6_addr.s6_addr`.
    pub in6_addr: usize,
}

impl SockaddrLayout {
    /// The Linux sockaddr ABI.
    pub const fn linux() -> Self {
        Self {
            family: 0,
            in_port: 2,
            in_addr: 4,
            in6_port: 2,
            in6_addr: 8,
        }
    }
}

impl Default for SockaddrLayout {
    fn default() -> Self {
        Self::linux()
    }
}
