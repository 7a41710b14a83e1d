//! AM67A main-domain R5F board description.

use log::LevelFilter;

use crate::uart::{Frame, PollPolicy, UartConfig, UartLayout};

/// UART1 register block.
pub const UART1_BASE: usize = 0x0281_0000;

/// Pad configuration block (CTRL0_CFG0).
pub const PADCFG_CTRL0_CFG0: usize = 0x000F_0000;
/// PADCONFIG107, ball C27 (MCASP0_AFSR), muxed to UART1_RXD.
pub const PADCONFIG_UART1_RX: usize = PADCFG_CTRL0_CFG0 + 0x41AC;
/// PADCONFIG108, ball F24 (MCASP0_ACLKR), muxed to UART1_TXD.
pub const PADCONFIG_UART1_TX: usize = PADCFG_CTRL0_CFG0 + 0x41B0;
/// Mux mode selecting the UART function on both pads.
pub const UART1_PAD_MUXMODE: u32 = 2;

/// CTRL_MMR0_CFG0 USART1 functional clock select, and its proxy alias.
pub const USART1_CLKSEL: usize = 0x0010_8284;
pub const USART1_CLKSEL_PROXY: usize = 0x0010_A284;
/// Value selecting the 48 MHz functional clock.
pub const USART1_CLKSEL_48MHZ: u32 = 0x1;

pub const UART1_CLOCK_HZ: u32 = 48_000_000;
pub const CONSOLE_BAUD: u32 = 115_200;

pub const UART1: UartLayout = UartLayout {
    base: UART1_BASE,
    pad_rx: PADCONFIG_UART1_RX,
    pad_tx: PADCONFIG_UART1_TX,
    pad_muxmode: UART1_PAD_MUXMODE,
    clksel: Some([USART1_CLKSEL, USART1_CLKSEL_PROXY]),
    clksel_value: USART1_CLKSEL_48MHZ,
};

pub const UART1_CONFIG: UartConfig = UartConfig {
    clock_hz: UART1_CLOCK_HZ,
    baud: CONSOLE_BAUD,
    frame: Frame::EIGHT_N_ONE,
    soft_reset: cfg!(feature = "soft-reset"),
    poll: PollPolicy::Unbounded,
};

const _: () = assert!(UART1_CONFIG.divisor().is_some(), "UART1 divisor out of range");
const _: () = assert!(
    UART1_CONFIG.baud_error_permille() <= crate::uart::BAUD_TOLERANCE_PERMILLE,
    "UART1 baud error exceeds tolerance"
);

/// Size of the shared-memory log region read by the host.
pub const DEBUG_MEM_LOG_SIZE: usize = 1024;

/// Threshold installed by the firmware at boot.
pub const LOG_LEVEL: LevelFilter = LevelFilter::Debug;
