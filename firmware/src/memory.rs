//! Static data setup run from reset, before anything reads a `static`.

use core::ptr;

/// Word-aligned half-open address range `[start, end)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MemoryRange {
    pub start: *mut u32,
    pub end: *mut u32,
}

impl MemoryRange {
    pub const fn new(start: *mut u32, end: *mut u32) -> Self {
        Self { start, end }
    }

    /// Number of words covered.
    pub fn words(&self) -> usize {
        (self.end as usize).saturating_sub(self.start as usize) / core::mem::size_of::<u32>()
    }
}

/// Where `.data` is stored in the image and where it runs from.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DataImage {
    pub load: *const u32,
    pub run: MemoryRange,
}

/// Everything the reset path has to prepare.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Layout {
    pub data: DataImage,
    pub bss: MemoryRange,
}

/// Copy `image.run.words()` words from `image.load` to `image.run.start`.
///
/// # Safety
///
/// Both regions must be valid, word-aligned, as long as `image.run`, and must not overlap.
pub unsafe fn copy_initialized_data(image: DataImage) {
    let mut src = image.load;
    let mut dst = image.run.start;
    while dst < image.run.end {
        ptr::write_volatile(dst, ptr::read_volatile(src));
        src = src.add(1);
        dst = dst.add(1);
    }
}

/// Write zero to every word of `bss`.
///
/// # Safety
///
/// `bss` must be valid, word-aligned writable memory that nothing currently borrows.
pub unsafe fn zero_bss(bss: MemoryRange) {
    let mut dst = bss.start;
    while dst < bss.end {
        ptr::write_volatile(dst, 0);
        dst = dst.add(1);
    }
}

/// `.data` first, then `.bss`.
///
/// # Safety
///
/// See [`copy_initialized_data`] and [`zero_bss`]. Must run before any `static` in either
/// region is touched.
pub unsafe fn init(layout: &Layout) {
    copy_initialized_data(layout.data);
    zero_bss(layout.bss);
}
