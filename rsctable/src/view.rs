//! Decoding a table image the way the host-side loader does.

use zerocopy::byteorder::little_endian::U32;
use zerocopy::{FromBytes, Immutable, KnownLayout, Unaligned};

use crate::{
    kind, RscError, RscResult, CARVEOUT_SIZE, HEADER_SIZE, MAX_RESOURCES, NAME_LEN, OFFSET_SIZE,
    VERSION,
};

#[repr(C)]
#[derive(Debug, FromBytes, Immutable, KnownLayout, Unaligned)]
struct WireHeader {
    ver: U32,
    num: U32,
    reserved: [U32; 2],
}

#[repr(C)]
#[derive(Debug, FromBytes, Immutable, KnownLayout, Unaligned)]
struct WireCarveout {
    kind: U32,
    da: U32,
    pa: U32,
    len: U32,
    flags: U32,
    name: [u8; NAME_LEN],
}

const _: () = assert!(core::mem::size_of::<WireHeader>() == HEADER_SIZE);
const _: () = assert!(core::mem::size_of::<WireCarveout>() == CARVEOUT_SIZE);

/// A carveout decoded from a table image.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CarveoutInfo<'a> {
    pub da: u32,
    pub pa: u32,
    pub len: u32,
    pub flags: u32,
    pub name: &'a str,
}

/// One entry of a decoded table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Resource<'a> {
    Carveout(CarveoutInfo<'a>),
    /// A resource type this decoder does not interpret.
    Other { kind: u32, offset: u32 },
}

/// Validated view over a table image.
#[derive(Copy, Clone, Debug)]
pub struct TableView<'a> {
    bytes: &'a [u8],
    num: u32,
}

impl<'a> TableView<'a> {
    /// Check the header and the offset array. Entries are checked lazily by [`Self::resources`].
    pub fn new(bytes: &'a [u8]) -> RscResult<Self> {
        let (header, _) = WireHeader::ref_from_prefix(bytes).map_err(|_| RscError::Truncated)?;

        let ver = header.ver.get();
        if ver != VERSION {
            return Err(RscError::BadVersion(ver));
        }
        if header.reserved.iter().any(|w| w.get() != 0) {
            return Err(RscError::ReservedNotZero);
        }

        let num = header.num.get();
        let entries_start = (num as usize)
            .checked_mul(OFFSET_SIZE)
            .and_then(|n| n.checked_add(HEADER_SIZE))
            .ok_or(RscError::Truncated)?;
        if entries_start > bytes.len() {
            return Err(RscError::Truncated);
        }

        let view = Self { bytes, num };
        for index in 0..num as usize {
            let offset = view.raw_offset(index);
            let at = offset as usize;
            if at < entries_start || at % 4 != 0 || at + OFFSET_SIZE > bytes.len() {
                return Err(RscError::BadOffset { index, offset });
            }
        }
        Ok(view)
    }

    pub fn len(&self) -> usize {
        self.num as usize
    }

    pub fn is_empty(&self) -> bool {
        self.num == 0
    }

    /// Value of `offset[index]`.
    pub fn offset(&self, index: usize) -> RscResult<u32> {
        self.check_index(index)?;
        Ok(self.raw_offset(index))
    }

    fn check_index(&self, index: usize) -> RscResult<()> {
        if index >= self.len() {
            return Err(RscError::NoSuchEntry { index, num: self.num });
        }
        Ok(())
    }

    /// `index` must be below `num`; `new` checked that the offset array fits.
    fn raw_offset(&self, index: usize) -> u32 {
        let at = HEADER_SIZE + index * OFFSET_SIZE;
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.bytes[at..at + OFFSET_SIZE]);
        u32::from_le_bytes(word)
    }

    /// Decode entry `index`.
    pub fn resource(&self, index: usize) -> RscResult<Resource<'a>> {
        let offset = self.offset(index)?;
        let tail = &self.bytes[offset as usize..];

        let (ty, _) = U32::ref_from_prefix(tail).map_err(|_| RscError::Truncated)?;
        if ty.get() != kind::CARVEOUT {
            return Ok(Resource::Other {
                kind: ty.get(),
                offset,
            });
        }

        let (raw, _) = WireCarveout::ref_from_prefix(tail).map_err(|_| RscError::Truncated)?;
        let end = raw.name.iter().position(|&b| b == 0).ok_or(RscError::BadName { index })?;
        let name = &raw.name[..end];
        if name.is_empty() || !name.is_ascii() {
            return Err(RscError::BadName { index });
        }
        let name = core::str::from_utf8(name).map_err(|_| RscError::BadName { index })?;
        if raw.len.get() == 0 {
            return Err(RscError::EmptyCarveout { index });
        }

        Ok(Resource::Carveout(CarveoutInfo {
            da: raw.da.get(),
            pa: raw.pa.get(),
            len: raw.len.get(),
            flags: raw.flags.get(),
            name,
        }))
    }

    /// Entries in table order.
    pub fn resources(&self) -> Resources<'a> {
        Resources {
            view: *self,
            next: 0,
        }
    }

    /// Decode every entry into a fixed-capacity vector.
    pub fn collect(&self) -> RscResult<heapless::Vec<Resource<'a>, MAX_RESOURCES>> {
        if self.len() > MAX_RESOURCES {
            return Err(RscError::TooMany(self.num));
        }
        let mut out = heapless::Vec::new();
        for rsc in self.resources() {
            out.push(rsc?).map_err(|_| RscError::TooMany(self.num))?;
        }
        Ok(out)
    }
}

/// Iterator returned by [`TableView::resources`].
pub struct Resources<'a> {
    view: TableView<'a>,
    next: usize,
}

impl<'a> Iterator for Resources<'a> {
    type Item = RscResult<Resource<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.view.len() {
            return None;
        }
        let rsc = self.view.resource(self.next);
        self.next += 1;
        Some(rsc)
    }
}
