//! Bounded, fault-tolerant access to kernel memory.
//!
//! Snapshots never dereference a kernel address. Every access goes through
//! [`KernelMemory::read`], which copies a bounded number of bytes or reports a
//! [`ReadFault`]; it must never panic, whatever address it is given.
//!
//! [`MemoryImage`] is the in-process implementation: a set of byte regions
//! placed at kernel addresses, typically a copy of a socket object taken by a
//! probe, or a fixture in tests.
//!
//! # Example
//!
//! ```
//! use sockid::memory::{KernelMemory, MemoryImage};
//!
//! let image = MemoryImage::builder()
//!     .region(0xffff_8880_0000_1000, vec![1u8, 2, 3, 4])
//!     .build();
//!
//! let mut buf = [0u8; 2];
//! image.read(0xffff_8880_0000_1002, &mut buf).unwrap();
//! assert_eq!(buf, [3, 4]);
//!
//! assert!(image.read(0xffff_8880_0000_1003, &mut buf).is_err());
//! ```

use bytes::Bytes;
use zerocopy::{FromBytes, IntoBytes};

use crate::error::ReadFault;

/// A bounded read primitive over kernel (or user) memory.
pub trait KernelMemory {
    /// Copy `dst.len()` bytes starting at `addr` into `dst`.
    ///
    /// On failure the content of `dst` is unspecified; callers that need
    /// zero-on-failure semantics go through the snapshot read helpers.
    fn read(&self, addr: u64, dst: &mut [u8]) -> Result<(), ReadFault>;
}

impl<M: KernelMemory + ?Sized> KernelMemory for &M {
    fn read(&self, addr: u64, dst: &mut [u8]) -> Result<(), ReadFault> {
        (**self).read(addr, dst)
    }
}

/// A mapped region of a [`MemoryImage`].
#[derive(Debug, Clone)]
struct Region {
    base: u64,
    data: Bytes,
}

impl Region {
    fn slice(&self, addr: u64, len: usize) -> Option<&[u8]> {
        let start = usize::try_from(addr.checked_sub(self.base)?).ok()?;
        let end = start.checked_add(len)?;
        self.data.get(start..end)
    }
}

/// Byte regions mapped at kernel addresses.
///
/// A read succeeds only when a single region covers the whole requested
/// range. Regions are searched in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryImage {
    regions: Vec<Region>,
}

impl MemoryImage {
    /// Create an image with nothing mapped. Every read faults.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a builder.
    pub fn builder() -> MemoryImageBuilder {
        MemoryImageBuilder::default()
    }

    /// Number of mapped regions.
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Total number of mapped bytes.
    pub fn mapped_len(&self) -> usize {
        self.regions.iter().map(|r| r.data.len()).sum()
    }
}

impl KernelMemory for MemoryImage {
    fn read(&self, addr: u64, dst: &mut [u8]) -> Result<(), ReadFault> {
        let src = self
            .regions
            .iter()
            .find_map(|r| r.slice(addr, dst.len()))
            .ok_or(ReadFault::Unmapped {
                addr,
                len: dst.len(),
            })?;
        dst.copy_from_slice(src);
        Ok(())
    }
}

/// Builder for [`MemoryImage`].
#[derive(Debug, Default)]
pub struct MemoryImageBuilder {
    regions: Vec<Region>,
}

impl MemoryImageBuilder {
    /// Map `data` at `base`.
    pub fn region(mut self, base: u64, data: impl Into<Bytes>) -> Self {
        self.regions.push(Region {
            base,
            data: data.into(),
        });
        self
    }

    /// Build the image.
    pub fn build(self) -> MemoryImage {
        MemoryImage {
            regions: self.regions,
        }
    }
}

/// Reads fields of one kernel object, absorbing faults.
///
/// A failed read zero-fills the destination, the same contract as the
/// kernel's `bpf_probe_read_kernel` helper, so a destination that was zero
/// before stays zero and one that held garbage is cleared.
pub(crate) struct Probe<'m, M: ?Sized> {
    mem: &'m M,
    base: u64,
}

impl<'m, M: KernelMemory + ?Sized> Probe<'m, M> {
    pub(crate) fn new(mem: &'m M, base: u64) -> Self {
        Self { mem, base }
    }

    /// Read `dst.len()` bytes at `base + offset`. Returns `false` on a fault.
    pub(crate) fn bytes(&self, offset: usize, dst: &mut [u8]) -> bool {
        let result = u64::try_from(offset)
            .ok()
            .and_then(|off| self.base.checked_add(off))
            .ok_or(ReadFault::AddressOverflow {
                addr: self.base,
                offset,
            })
            .and_then(|addr| self.mem.read(addr, dst));

        match result {
            Ok(()) => true,
            Err(fault) => {
                dst.fill(0);
                tracing::trace!(base = self.base, offset, %fault, "read fault absorbed");
                false
            }
        }
    }

    /// Read a plain value at `base + offset`.
    pub(crate) fn value<T: FromBytes + IntoBytes>(&self, offset: usize, dst: &mut T) -> bool {
        self.bytes(offset, dst.as_mut_bytes())
    }
}
