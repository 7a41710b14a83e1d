#![no_std]
#![no_main]

mod app;
#[cfg(target_arch = "arm")]
mod entry;

use core::fmt::Write;
use core::ptr::{addr_of, addr_of_mut};

use firmware_lib::board;
use firmware_lib::cpu;
use firmware_lib::memory::{self, DataImage, Layout, MemoryRange};
use firmware_lib::mmio::Mmio;
use firmware_lib::resources;
use firmware_lib::uart::Uart;
use firmware_lib::vectors::{self, TrapKind};
use rsctable::ResourceTable;

/// Read by the host loader straight out of the ELF image.
#[link_section = ".resource_table"]
#[used]
#[no_mangle]
pub static RESOURCE_TABLE: ResourceTable<{ resources::COUNT }> = resources::TABLE;

extern "C" {
    static __data_load__: u32;
    static mut __data_start__: u32;
    static mut __data_end__: u32;
    static mut __bss_start__: u32;
    static mut __bss_end__: u32;
}

/// First Rust code after reset. Stacks are set up; `.data` and `.bss` are not.
#[no_mangle]
unsafe extern "C" fn reset_handler() -> ! {
    let layout = Layout {
        data: DataImage {
            load: addr_of!(__data_load__),
            run: MemoryRange::new(addr_of_mut!(__data_start__), addr_of_mut!(__data_end__)),
        },
        bss: MemoryRange::new(addr_of_mut!(__bss_start__), addr_of_mut!(__bss_end__)),
    };
    memory::init(&layout);

    app::main();

    cpu::wait_forever()
}

#[no_mangle]
extern "C" fn trap_dispatch(kind: u32) {
    match TrapKind::from_raw(kind) {
        Some(kind) => app::VECTORS.dispatch(kind),
        None => vectors::default_handler(),
    }
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    log::error!("panic: {info}");

    // SAFETY: same register set the console uses; the UART is either configured already or the
    // writes are harmless.
    let mut uart = Uart::new(unsafe { Mmio::new() }, board::UART1, board::UART1_CONFIG);
    let _ = writeln!(uart, "\n*** FIRMWARE PANIC ***");
    if let Some(loc) = info.location() {
        let _ = writeln!(uart, "at {}:{}:{}", loc.file(), loc.line(), loc.column());
    }
    let _ = writeln!(uart, "{}", info.message());

    cpu::wait_forever()
}
