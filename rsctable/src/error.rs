use core::fmt;

/// Reasons a byte image is not a valid resource table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RscError {
    /// The image ends before the header, the offset array or an entry does.
    Truncated,
    /// `ver` is not [`crate::VERSION`].
    BadVersion(u32),
    /// One of the two reserved header words is not zero.
    ReservedNotZero,
    /// Offset `index` points into the header/offset area, past the end, or is misaligned.
    BadOffset { index: usize, offset: u32 },
    /// A carveout name is empty or not NUL-terminated ASCII.
    BadName { index: usize },
    /// A carveout requests zero bytes.
    EmptyCarveout { index: usize },
    /// `index` is not below the table's resource count.
    NoSuchEntry { index: usize, num: u32 },
    /// More resources than [`crate::MAX_RESOURCES`].
    TooMany(u32),
    /// The ELF image has no `.resource_table` section.
    NotFound,
    /// The image is not a parseable ELF file.
    Elf,
}

pub type RscResult<T> = core::result::Result<T, RscError>;

impl fmt::Display for RscError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RscError::Truncated => f.write_str("resource table truncated"),
            RscError::BadVersion(v) => write!(f, "unsupported resource table version {v}"),
            RscError::ReservedNotZero => f.write_str("reserved header words are not zero"),
            RscError::BadOffset { index, offset } => {
                write!(f, "resource {index} has invalid offset {offset:#x}")
            }
            RscError::BadName { index } => write!(f, "resource {index} has a malformed name"),
            RscError::EmptyCarveout { index } => write!(f, "carveout {index} has zero length"),
            RscError::NoSuchEntry { index, num } => {
                write!(f, "resource {index} requested from a table of {num}")
            }
            RscError::TooMany(n) => write!(f, "{n} resources exceed the decoder capacity"),
            RscError::NotFound => f.write_str("no .resource_table section"),
            RscError::Elf => f.write_str("malformed ELF image"),
        }
    }
}
