//! Resource table shared between the firmware image and the host-side loader.
//!
//! The loader lives in another address space and cannot follow pointers, so the table is a flat
//! little-endian byte image: a 16-byte header, one `u32` offset per resource, then the resources
//! themselves packed back to back. Offsets are byte distances from the start of the table.
//!
//! The firmware side builds the table at compile time with [`ResourceTable::new`]; the host side
//! decodes a byte image with [`TableView`].

#![cfg_attr(not(test), no_std)]

mod error;
mod table;
mod view;

#[cfg(feature = "elf")]
pub mod elf;

pub use error::{RscError, RscResult};
pub use table::{Carveout, ResourceTable, TableHeader};
pub use view::{CarveoutInfo, Resource, Resources, TableView};

/// Only version understood by the loader.
pub const VERSION: u32 = 1;

/// Size of the fixed header: `ver`, `num`, `reserved[2]`.
pub const HEADER_SIZE: usize = 16;

/// Size of one entry in the offset array.
pub const OFFSET_SIZE: usize = 4;

/// Size of a carveout entry including its type word.
pub const CARVEOUT_SIZE: usize = 52;

/// Bytes reserved for a resource name, NUL padding included.
pub const NAME_LEN: usize = 32;

/// Upper bound used when collecting decoded resources into a fixed-capacity vector.
pub const MAX_RESOURCES: usize = 16;

/// Resource type words.
pub mod kind {
    pub const CARVEOUT: u32 = 1;
    pub const DEVMEM: u32 = 2;
    pub const TRACE: u32 = 3;
    pub const VDEV: u32 = 4;
}

/// Byte offset of entry `index` in a table holding `count` carveouts.
#[inline]
pub const fn carveout_offset(count: usize, index: usize) -> usize {
    HEADER_SIZE + count * OFFSET_SIZE + index * CARVEOUT_SIZE
}

/// Total size in bytes of a table holding `count` carveouts.
#[inline]
pub const fn table_size(count: usize) -> usize {
    carveout_offset(count, count)
}
