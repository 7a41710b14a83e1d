//! Processor primitives used by the boot path.

/// Terminal idle state. Never returns; only a watchdog or a host-triggered reset gets the core
/// out of here.
#[inline(never)]
pub fn wait_forever() -> ! {
    loop {
        #[cfg(target_arch = "arm")]
        unsafe {
            core::arch::asm!("wfi", options(nomem, nostack));
        }
        #[cfg(not(target_arch = "arm"))]
        core::hint::spin_loop();
    }
}

/// One iteration of a busy-wait.
#[inline(always)]
pub fn relax() {
    core::hint::spin_loop();
}
