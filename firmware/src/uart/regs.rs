//! UART and pad-configuration register definitions.
//!
//! The UART is 16550-compatible with TI extensions (MDR1 mode select, SYSC/SYSS soft reset).
//! Every register sits on a 32-bit boundary; offsets are bytes from the module base.

use tock_registers::fields::{Field, FieldValue};
use tock_registers::{register_bitfields, LocalRegisterCopy, RegisterLongName};

use crate::mmio::Bus;

/// R: receive holding, W: transmit holding, DLL while LCR.DIV_EN = 1.
pub const RHR_THR_DLL: usize = 0x00;
/// Interrupt enable, DLH while LCR.DIV_EN = 1.
pub const IER_DLH: usize = 0x04;
pub const LCR_REG: usize = 0x0C;
pub const LSR_REG: usize = 0x14;
pub const MDR1_REG: usize = 0x20;
pub const SYSC_REG: usize = 0x54;
pub const SYSS_REG: usize = 0x58;

register_bitfields! {
    u32,

    /// Line Control Register.
    pub LCR [
        /// Divisor latch access: RHR_THR_DLL and IER_DLH alias the divisor latches.
        DIV_EN OFFSET(7) NUMBITS(1) [],
        BREAK_EN OFFSET(6) NUMBITS(1) [],
        PARITY_TYPE2 OFFSET(5) NUMBITS(1) [],
        PARITY_TYPE1 OFFSET(4) NUMBITS(1) [
            Odd = 0,
            Even = 1
        ],
        PARITY_EN OFFSET(3) NUMBITS(1) [],
        NB_STOP OFFSET(2) NUMBITS(1) [
            One = 0,
            Two = 1
        ],
        CHAR_LENGTH OFFSET(0) NUMBITS(2) [
            Five = 0,
            Six = 1,
            Seven = 2,
            Eight = 3
        ]
    ],

    /// Line Status Register.
    pub LSR [
        /// Transmit shift register and holding register both empty.
        TX_SR_E OFFSET(6) NUMBITS(1) [],
        /// Transmit holding register (or FIFO) empty.
        TX_FIFO_E OFFSET(5) NUMBITS(1) [],
        /// At least one received byte is waiting in RHR.
        RX_FIFO_E OFFSET(0) NUMBITS(1) []
    ],

    /// Mode Definition Register 1.
    pub MDR1 [
        MODE_SELECT OFFSET(0) NUMBITS(3) [
            Uart16x = 0,
            Sir = 1,
            Uart16xAutoBaud = 2,
            Uart13x = 3,
            Mir = 4,
            Fir = 5,
            Cir = 6,
            Disable = 7
        ]
    ],

    /// System Configuration Register.
    pub SYSC [
        SOFTRESET OFFSET(1) NUMBITS(1) []
    ],

    /// System Status Register.
    pub SYSS [
        RESETDONE OFFSET(0) NUMBITS(1) []
    ],

    /// PADCONFIG register of one SoC ball.
    pub PADCONFIG [
        /// Writes are ignored while set.
        LOCK OFFSET(31) NUMBITS(1) [],
        /// Deep-sleep pull override; clear keeps the pull configured below.
        DS_PULLUD_EN OFFSET(27) NUMBITS(1) [],
        /// Output driver disable.
        TX_DIS OFFSET(21) NUMBITS(1) [],
        /// Input receiver enable.
        RXACTIVE OFFSET(18) NUMBITS(1) [],
        PULL_DISABLE OFFSET(16) NUMBITS(1) [],
        /// Schmitt trigger enable.
        ST_EN OFFSET(14) NUMBITS(1) [],
        MUXMODE OFFSET(0) NUMBITS(4) []
    ]
}

/// Raw register value holding exactly `fields`, everything else zero.
pub fn bits<R: RegisterLongName>(fields: FieldValue<u32, R>) -> u32 {
    let mut reg = LocalRegisterCopy::<u32, R>::new(0);
    reg.write(fields);
    reg.get()
}

/// Read-modify-write of `fields` at `addr`; bits outside them are preserved.
pub fn update<B: Bus, R: RegisterLongName>(bus: &mut B, addr: usize, fields: FieldValue<u32, R>) {
    bus.modify(addr, |value| {
        let mut reg = LocalRegisterCopy::<u32, R>::new(value);
        reg.modify(fields);
        reg.get()
    });
}

#[inline]
pub fn is_set<R: RegisterLongName>(value: u32, field: Field<u32, R>) -> bool {
    LocalRegisterCopy::<u32, R>::new(value).is_set(field)
}
