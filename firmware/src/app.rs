//! Console echo: greet once, then send back every byte received.

use core::ptr::addr_of_mut;

use firmware_lib::board;
use firmware_lib::logging;
use firmware_lib::mmio::Mmio;
use firmware_lib::uart::Uart;
use firmware_lib::vectors::VectorTable;
use log::error;

/// Handlers for traps this image cares about. Unlisted kinds halt.
pub static VECTORS: VectorTable = VectorTable::new();

#[link_section = ".log_shared_mem"]
static mut DEBUG_MEM_LOG: [u8; board::DEBUG_MEM_LOG_SIZE] = [0; board::DEBUG_MEM_LOG_SIZE];

pub fn main() {
    // SAFETY: single core, called once from reset; nothing else references the region.
    let log_buf = unsafe { &mut *addr_of_mut!(DEBUG_MEM_LOG) };
    let logger = logging::init(log_buf, board::LOG_LEVEL);

    // SAFETY: board::UART1 only names UART1 and its pad and clock-select registers.
    let mut uart = Uart::new(unsafe { Mmio::new() }, board::UART1, board::UART1_CONFIG);
    if let Err(err) = uart.init() {
        error!("console UART init failed: {err}");
        return;
    }

    if logger.is_err() {
        uart.puts("shared-memory log unavailable\n");
    }

    uart.puts("Hello World\n");

    loop {
        let c = uart.getc();
        uart.putc(c);
    }
}
