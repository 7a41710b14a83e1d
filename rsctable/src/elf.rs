//! Locating the table inside a firmware ELF image, using `goblin`.
//!
//! The loader does not know where the linker put the table; it looks the section up by name.

use goblin::elf::Elf;

use crate::{RscError, RscResult, TableView};

/// Section the firmware links its table into.
pub const SECTION: &str = ".resource_table";

/// Bytes of the `.resource_table` section of `image`.
pub fn find_resource_table(image: &[u8]) -> RscResult<&[u8]> {
    let elf = Elf::parse(image).map_err(|_| RscError::Elf)?;

    for sh in &elf.section_headers {
        if elf.shdr_strtab.get_at(sh.sh_name) != Some(SECTION) {
            continue;
        }
        let start = usize::try_from(sh.sh_offset).map_err(|_| RscError::Elf)?;
        let size = usize::try_from(sh.sh_size).map_err(|_| RscError::Elf)?;
        let end = start.checked_add(size).ok_or(RscError::Elf)?;
        return image.get(start..end).ok_or(RscError::Truncated);
    }
    Err(RscError::NotFound)
}

/// Find and validate the table of `image` in one step.
pub fn load(image: &[u8]) -> RscResult<TableView<'_>> {
    TableView::new(find_resource_table(image)?)
}
