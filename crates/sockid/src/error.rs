//! Error types for layout loading, record parsing and kernel memory reads.

use std::io;

use crate::layout::SockField;

/// Result type for sockid operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised outside the capture path.
///
/// Captures themselves never fail: a [`ReadFault`] is absorbed into a
/// zero-valued field. These errors come from loading a layout profile,
/// resolving it, or parsing a record off the wire.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error while reading a profile or image.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON (de)serialization error.
    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The layout source does not describe a required field.
    #[error("layout is missing field {field}")]
    MissingField {
        /// The field that could not be resolved.
        field: SockField,
    },

    /// The layout source reports a storage size this crate cannot read.
    #[error("field {field} has unsupported size {size} (expected one of {expected:?})")]
    InvalidFieldSize {
        /// The offending field.
        field: SockField,
        /// The size reported by the layout source.
        size: usize,
        /// Sizes accepted for this field.
        expected: &'static [usize],
    },

    /// Buffer was too short.
    #[error("record truncated: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Expected length.
        expected: usize,
        /// Actual bytes available.
        actual: usize,
    },
}

impl Error {
    /// Check if this error comes from a bad layout description.
    pub fn is_layout_error(&self) -> bool {
        matches!(self, Self::MissingField { .. } | Self::InvalidFieldSize { .. })
    }
}

/// A bounded read that could not be satisfied.
///
/// This is the only failure a capture can encounter. Snapshots never return
/// it; the destination field is zeroed and the capture continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReadFault {
    /// No mapped region covers `[addr, addr + len)`.
    #[error("unmapped read of {len} bytes at {addr:#x}")]
    Unmapped {
        /// Start address of the read.
        addr: u64,
        /// Number of bytes requested.
        len: usize,
    },

    /// Adding a field offset to the base address overflowed.
    #[error("address {addr:#x} + offset {offset:#x} overflows")]
    AddressOverflow {
        /// Base address.
        addr: u64,
        /// Field offset.
        offset: usize,
    },
}

impl ReadFault {
    /// The address the fault was raised for.
    pub fn addr(&self) -> u64 {
        match *self {
            Self::Unmapped { addr, .. } | Self::AddressOverflow { addr, .. } => addr,
        }
    }
}
