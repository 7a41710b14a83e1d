//! Memory this core asks the host to reserve before releasing it from reset.

use rsctable::{Carveout, ResourceTable};

/// DDR window holding code, rodata and the `.data` load image.
pub const DDR_BASE: u32 = 0xA000_0000;
pub const DDR_SIZE: u32 = 0x0100_0000;

/// Tightly coupled memories: R5F-local address and SoC-global alias.
pub const ATCM_LOCAL: u32 = 0x0000_0000;
pub const ATCM_GLOBAL: u32 = 0x7800_0000;
pub const BTCM_LOCAL: u32 = 0x4101_0000;
pub const BTCM_GLOBAL: u32 = 0x7810_0000;
pub const TCM_SIZE: u32 = 0x8000;

/// Number of carveouts published.
pub const COUNT: usize = 3;

/// Published as-is in `.resource_table`. Add or remove entries here only; `num` and the offset
/// array follow from the array length.
pub const TABLE: ResourceTable<COUNT> = ResourceTable::new([
    Carveout::new("r5f-ddr", DDR_BASE, DDR_BASE, DDR_SIZE),
    Carveout::new("r5f-atcm", ATCM_LOCAL, ATCM_GLOBAL, TCM_SIZE),
    Carveout::new("r5f-btcm", BTCM_LOCAL, BTCM_GLOBAL, TCM_SIZE),
]);
