//! Polled UART driver.
//!
//! [`Uart::init`] walks the module through pad setup, optional soft reset, divisor programming
//! and frame setup; afterwards [`Uart::putc`] / [`Uart::getc`] spin on LSR and move one byte.
//! Nothing is interrupt driven and nothing is buffered.
//!
//! Init order matters: the mode register is parked in `Disable` before the divisor latches are
//! exposed, and DIV_EN is cleared again before the module is put back into UART 16x mode.

mod config;
pub mod regs;

use core::fmt;

use log::{debug, info, warn};
use tock_registers::fields::Field;
use tock_registers::RegisterLongName;

use crate::cpu;
use crate::mmio::Bus;
use regs::{bits, is_set, update, LCR, LSR, MDR1, PADCONFIG, SYSC, SYSS};

pub use config::{
    DataBits, Frame, Parity, PollPolicy, StopBits, UartConfig, BAUD_TOLERANCE_PERMILLE,
};

/// Where one UART instance and its pins live.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct UartLayout {
    pub base: usize,
    pub pad_rx: usize,
    pub pad_tx: usize,
    pub pad_muxmode: u32,
    /// Functional clock select register and its proxy alias, if the SoC needs them written.
    pub clksel: Option<[usize; 2]>,
    pub clksel_value: u32,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    Uart16x,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum State {
    Unconfigured,
    PinsConfigured,
    ResetInProgress,
    ModeDisabled,
    DivisorLatchAccess,
    FrameConfigured,
    OperatingMode(Mode),
    Idle,
    Transmitting,
    Receiving,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum UartError {
    /// A bounded poll ran out before the status bit was seen set. `register` is the offset of the
    /// status register that was polled.
    Timeout { register: usize },
    /// `clock / (16 * baud)` does not fit the divisor latches.
    InvalidDivisor,
}

impl fmt::Display for UartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UartError::Timeout { register } => {
                write!(f, "timed out polling UART register {register:#04x}")
            }
            UartError::InvalidDivisor => f.write_str("baud divisor out of range"),
        }
    }
}

pub struct Uart<B: Bus> {
    bus: B,
    layout: UartLayout,
    config: UartConfig,
    state: State,
}

impl<B: Bus> Uart<B> {
    pub const fn new(bus: B, layout: UartLayout, config: UartConfig) -> Self {
        Self {
            bus,
            layout,
            config,
            state: State::Unconfigured,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn config(&self) -> &UartConfig {
        &self.config
    }

    #[inline(always)]
    fn reg(&self, offset: usize) -> usize {
        self.layout.base + offset
    }

    /// Bring the UART up at `config.baud` with `config.frame`.
    ///
    /// Only fails on a divisor that does not fit, or when `config.poll` is bounded and the soft
    /// reset never reports done.
    pub fn init(&mut self) -> Result<(), UartError> {
        let divisor = self.config.divisor().ok_or(UartError::InvalidDivisor)?;

        self.select_clock();
        self.configure_pads();
        self.state = State::PinsConfigured;
        debug!("PAD configuration done");

        if self.config.soft_reset {
            self.soft_reset()?;
        }

        let mdr1 = self.reg(regs::MDR1_REG);
        self.bus.write(mdr1, bits(MDR1::MODE_SELECT::Disable));
        self.state = State::ModeDisabled;
        debug!("mode disabled");

        let lcr = self.reg(regs::LCR_REG);
        update(&mut self.bus, lcr, LCR::DIV_EN::SET);
        self.state = State::DivisorLatchAccess;

        self.bus.write(self.reg(regs::RHR_THR_DLL), u32::from(divisor & 0xff));
        self.bus.write(self.reg(regs::IER_DLH), u32::from(divisor >> 8));
        debug!("baud rate configured: divisor {divisor}");

        self.bus.write(lcr, bits(LCR::DIV_EN::SET + self.config.frame.lcr()));
        self.state = State::FrameConfigured;
        debug!("protocol configured");

        update(&mut self.bus, lcr, LCR::DIV_EN::CLEAR);
        debug!("divisor latch closed");

        self.bus.write(mdr1, bits(MDR1::MODE_SELECT::Uart16x));
        self.state = State::OperatingMode(Mode::Uart16x);
        debug!("switched to UART 16x mode");

        self.state = State::Idle;
        debug!("configuration done");
        info!(
            "UART at {:#010x} configured: {} baud (actual {})",
            self.layout.base,
            self.config.baud,
            self.config.actual_baud().unwrap_or(0)
        );
        Ok(())
    }

    fn select_clock(&mut self) {
        if let Some(regs) = self.layout.clksel {
            for addr in regs {
                self.bus.write(addr, self.layout.clksel_value);
            }
        }
    }

    fn configure_pads(&mut self) {
        let common = PADCONFIG::LOCK::CLEAR
            + PADCONFIG::DS_PULLUD_EN::CLEAR
            + PADCONFIG::TX_DIS::CLEAR
            + PADCONFIG::PULL_DISABLE::SET
            + PADCONFIG::ST_EN::CLEAR
            + PADCONFIG::MUXMODE.val(self.layout.pad_muxmode);

        update(&mut self.bus, self.layout.pad_rx, common + PADCONFIG::RXACTIVE::SET);
        update(&mut self.bus, self.layout.pad_tx, common + PADCONFIG::RXACTIVE::CLEAR);
    }

    fn soft_reset(&mut self) -> Result<(), UartError> {
        let sysc = self.reg(regs::SYSC_REG);
        update(&mut self.bus, sysc, SYSC::SOFTRESET::SET);
        self.state = State::ResetInProgress;
        debug!("initiated reset");

        self.wait_for(regs::SYSS_REG, SYSS::RESETDONE, self.config.poll)?;
        debug!("reset done");
        Ok(())
    }

    /// Read the status register at `offset` until `field` is set, however long that takes.
    fn spin_until<R: RegisterLongName>(&mut self, offset: usize, field: Field<u32, R>) {
        let addr = self.reg(offset);
        while !is_set(self.bus.read(addr), field) {
            cpu::relax();
        }
    }

    /// Like [`Self::spin_until`], but gives up after `max(polls, 1)` reads.
    fn poll_until<R: RegisterLongName>(
        &mut self,
        offset: usize,
        field: Field<u32, R>,
        polls: u32,
    ) -> Result<(), UartError> {
        let addr = self.reg(offset);
        for _ in 0..polls.max(1) {
            if is_set(self.bus.read(addr), field) {
                return Ok(());
            }
            cpu::relax();
        }
        warn!("UART register {offset:#04x} never became ready");
        Err(UartError::Timeout { register: offset })
    }

    fn wait_for<R: RegisterLongName>(
        &mut self,
        offset: usize,
        field: Field<u32, R>,
        policy: PollPolicy,
    ) -> Result<(), UartError> {
        match policy {
            PollPolicy::Unbounded => {
                self.spin_until(offset, field);
                Ok(())
            }
            PollPolicy::Bounded(polls) => self.poll_until(offset, field, polls),
        }
    }

    fn write_thr(&mut self, byte: u8) {
        self.bus.write(self.reg(regs::RHR_THR_DLL), u32::from(byte));
    }

    fn read_rhr(&mut self) -> u8 {
        (self.bus.read(self.reg(regs::RHR_THR_DLL)) & 0xff) as u8
    }

    /// Transmit one byte, spinning until THR is empty.
    pub fn putc(&mut self, byte: u8) {
        self.state = State::Transmitting;
        self.spin_until(regs::LSR_REG, LSR::TX_FIFO_E);
        self.write_thr(byte);
        self.state = State::Idle;
    }

    /// Receive one byte, spinning until one is available.
    pub fn getc(&mut self) -> u8 {
        self.state = State::Receiving;
        self.spin_until(regs::LSR_REG, LSR::RX_FIFO_E);
        let byte = self.read_rhr();
        self.state = State::Idle;
        byte
    }

    /// Transmit `text` byte for byte, without translation.
    pub fn puts(&mut self, text: &str) {
        self.write_bytes(text.as_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.putc(b);
        }
    }

    /// [`Self::putc`] that gives up after `polls` reads of LSR. The byte is dropped on timeout.
    pub fn try_putc(&mut self, byte: u8, polls: u32) -> Result<(), UartError> {
        self.state = State::Transmitting;
        let ready = self.poll_until(regs::LSR_REG, LSR::TX_FIFO_E, polls);
        if ready.is_ok() {
            self.write_thr(byte);
        }
        self.state = State::Idle;
        ready
    }

    /// [`Self::getc`] that gives up after `polls` reads of LSR.
    pub fn try_getc(&mut self, polls: u32) -> Result<u8, UartError> {
        self.state = State::Receiving;
        let byte = self
            .poll_until(regs::LSR_REG, LSR::RX_FIFO_E, polls)
            .map(|()| self.read_rhr());
        self.state = State::Idle;
        byte
    }
}

impl<B: Bus> fmt::Write for Uart<B> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for b in s.bytes() {
            match b {
                b'\n' => {
                    self.putc(b'\r');
                    self.putc(b'\n');
                }
                byte => self.putc(byte),
            }
        }
        Ok(())
    }
}
