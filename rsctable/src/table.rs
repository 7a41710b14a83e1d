//! Compile-time construction of the table the firmware publishes.

use core::mem::size_of;

use crate::{carveout_offset, kind, table_size, NAME_LEN, VERSION};

/// Fixed header at the start of every table.
#[repr(C)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct TableHeader {
    pub ver: u32,
    pub num: u32,
    pub reserved: [u32; 2],
}

/// Request for a physically contiguous memory region.
///
/// `da` is the address the R5F sees, `pa` the address the host-side memory manager sees.
#[repr(C)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Carveout {
    pub kind: u32,
    pub da: u32,
    pub pa: u32,
    pub len: u32,
    pub flags: u32,
    pub name: [u8; NAME_LEN],
}

impl Carveout {
    /// Build a carveout entry. Fails const evaluation on an empty region or a name that is not
    /// 1..=31 bytes of NUL-free ASCII.
    pub const fn new(name: &str, da: u32, pa: u32, len: u32) -> Self {
        assert!(len > 0, "carveout length must be non-zero");

        let bytes = name.as_bytes();
        assert!(!bytes.is_empty(), "carveout name must not be empty");
        assert!(bytes.len() < NAME_LEN, "carveout name longer than 31 bytes");

        let mut buf = [0u8; NAME_LEN];
        let mut i = 0;
        while i < bytes.len() {
            assert!(bytes[i].is_ascii() && bytes[i] != 0, "carveout name must be ASCII");
            buf[i] = bytes[i];
            i += 1;
        }

        Self {
            kind: kind::CARVEOUT,
            da,
            pa,
            len,
            flags: 0,
            name: buf,
        }
    }

    pub const fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Significant part of the name (up to the first NUL).
    pub fn name(&self) -> &str {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(NAME_LEN);
        core::str::from_utf8(&self.name[..end]).unwrap_or("")
    }
}

/// A complete table of `N` carveouts, laid out exactly as the loader reads it.
///
/// `num` and every offset are derived from `N` in [`ResourceTable::new`]; nothing else writes
/// them. All fields are 4-byte words or byte arrays whose length is a multiple of 4, so `repr(C)`
/// inserts no padding and the in-memory image is the wire image on a little-endian core.
#[repr(C)]
pub struct ResourceTable<const N: usize> {
    header: TableHeader,
    offset: [u32; N],
    entries: [Carveout; N],
}

impl<const N: usize> ResourceTable<N> {
    pub const fn new(entries: [Carveout; N]) -> Self {
        assert!(size_of::<TableHeader>() == crate::HEADER_SIZE);
        assert!(size_of::<Carveout>() == crate::CARVEOUT_SIZE);
        assert!(size_of::<Self>() == table_size(N));

        let mut offset = [0u32; N];
        let mut i = 0;
        while i < N {
            offset[i] = carveout_offset(N, i) as u32;
            i += 1;
        }

        Self {
            header: TableHeader {
                ver: VERSION,
                num: N as u32,
                reserved: [0, 0],
            },
            offset,
            entries,
        }
    }

    pub const fn header(&self) -> &TableHeader {
        &self.header
    }

    pub const fn offsets(&self) -> &[u32; N] {
        &self.offset
    }

    pub const fn entries(&self) -> &[Carveout; N] {
        &self.entries
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// The table as the loader sees it.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `Self` is `repr(C)`, built only from `u32` and `u8` arrays and has no padding
        // (checked in `new`), so every byte is initialized.
        unsafe { core::slice::from_raw_parts(self as *const Self as *const u8, size_of::<Self>()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CARVEOUT_SIZE, HEADER_SIZE};

    const TCM_TABLE: ResourceTable<3> = ResourceTable::new([
        Carveout::new("r5f-dram", 0xA000_0000, 0xA000_0000, 0x0100_0000),
        Carveout::new("r5f-atcm", 0x0000_0000, 0x7900_0000, 0x8000),
        Carveout::new("r5f-btcm", 0x4101_0000, 0x7902_0000, 0x8000).with_flags(0x1),
    ]);

    fn field_distance<T>(base: &T, field: &Carveout) -> usize {
        field as *const Carveout as usize - base as *const T as usize
    }

    #[test]
    fn test_header_is_computed() {
        let table = &TCM_TABLE;
        let h = table.header();
        assert_eq!(h.ver, 1);
        assert_eq!(h.num, 3);
        assert_eq!(h.reserved, [0, 0]);
    }

    #[test]
    fn test_offsets_match_entry_addresses() {
        let table = &TCM_TABLE;
        for (i, entry) in table.entries().iter().enumerate() {
            let off = table.offsets()[i] as usize;
            assert_eq!(off, field_distance(table, entry));
            assert_eq!(off, HEADER_SIZE + 3 * 4 + i * CARVEOUT_SIZE);
        }
    }

    #[test]
    fn test_offsets_follow_entry_count() {
        let one = ResourceTable::new([Carveout::new("tcm", 0, 0x7900_0000, 0x8000)]);
        assert_eq!(one.header().num, 1);
        assert_eq!(one.offsets(), &[20]);

        let five = ResourceTable::new([Carveout::new("blk", 0, 0, 0x1000); 5]);
        assert_eq!(five.header().num, 5);
        assert_eq!(five.offsets(), &[36, 88, 140, 192, 244]);
        for (i, entry) in five.entries().iter().enumerate() {
            assert_eq!(five.offsets()[i] as usize, field_distance(&five, entry));
        }
    }

    #[test]
    fn test_empty_table() {
        let empty: ResourceTable<0> = ResourceTable::new([]);
        assert!(empty.is_empty());
        assert_eq!(empty.header().num, 0);
        assert_eq!(empty.as_bytes(), &[1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_byte_image_layout() {
        let table = &TCM_TABLE;
        let bytes = table.as_bytes();
        assert_eq!(bytes.len(), 16 + 3 * 4 + 3 * 52);

        // num_rsc
        assert_eq!(&bytes[4..8], &3u32.to_le_bytes());
        // offset[1]
        assert_eq!(&bytes[20..24], &80u32.to_le_bytes());

        let second = &bytes[80..80 + 52];
        assert_eq!(&second[0..4], &1u32.to_le_bytes());
        assert_eq!(&second[8..12], &0x7900_0000u32.to_le_bytes());
        assert_eq!(&second[12..16], &0x8000u32.to_le_bytes());
        assert_eq!(&second[20..28], b"r5f-atcm");
        assert!(second[28..52].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_carveout_name() {
        let c = Carveout::new("0123456789012345678901234567890", 0, 0, 4);
        assert_eq!(c.name().len(), 31);
        assert_eq!(c.name[31], 0);
        let table = &TCM_TABLE;
        assert_eq!(table.entries()[2].name(), "r5f-btcm");
        assert_eq!(table.entries()[2].flags, 1);
    }
}
