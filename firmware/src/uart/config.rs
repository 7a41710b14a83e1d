//! Line settings and baud divisor.

use tock_registers::fields::FieldValue;

use super::regs::LCR;

/// Largest baud error, in parts per thousand, a 16x-oversampling receiver tolerates reliably.
pub const BAUD_TOLERANCE_PERMILLE: u32 = 20;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Parity {
    None,
    Odd,
    Even,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum StopBits {
    One,
    Two,
}

/// Character frame format.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Frame {
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
}

impl Frame {
    pub const EIGHT_N_ONE: Frame = Frame {
        data_bits: DataBits::Eight,
        parity: Parity::None,
        stop_bits: StopBits::One,
    };

    /// LCR fields for this frame (DIV_EN untouched).
    pub fn lcr(&self) -> FieldValue<u32, LCR::Register> {
        let len = match self.data_bits {
            DataBits::Five => LCR::CHAR_LENGTH::Five,
            DataBits::Six => LCR::CHAR_LENGTH::Six,
            DataBits::Seven => LCR::CHAR_LENGTH::Seven,
            DataBits::Eight => LCR::CHAR_LENGTH::Eight,
        };
        let parity = match self.parity {
            Parity::None => LCR::PARITY_EN::CLEAR,
            Parity::Odd => LCR::PARITY_EN::SET + LCR::PARITY_TYPE1::Odd,
            Parity::Even => LCR::PARITY_EN::SET + LCR::PARITY_TYPE1::Even,
        };
        let stop = match self.stop_bits {
            StopBits::One => LCR::NB_STOP::One,
            StopBits::Two => LCR::NB_STOP::Two,
        };
        len + parity + stop
    }
}

/// How long busy-waits on a status bit may last.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PollPolicy {
    /// Spin until the bit is observed set, however long that takes.
    Unbounded,
    /// Give up with [`super::UartError::Timeout`] after this many reads.
    Bounded(u32),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct UartConfig {
    /// Functional clock feeding the baud generator.
    pub clock_hz: u32,
    pub baud: u32,
    pub frame: Frame,
    /// Pulse SYSC.SOFTRESET and wait for SYSS.RESETDONE during init.
    pub soft_reset: bool,
    /// Busy-wait policy used during init.
    pub poll: PollPolicy,
}

impl UartConfig {
    pub const DEFAULT_BAUD: u32 = 115_200;

    /// 115200 8N1, soft reset, unbounded polling.
    pub const fn new(clock_hz: u32) -> Self {
        Self {
            clock_hz,
            baud: Self::DEFAULT_BAUD,
            frame: Frame::EIGHT_N_ONE,
            soft_reset: true,
            poll: PollPolicy::Unbounded,
        }
    }

    pub const fn with_baud(mut self, baud: u32) -> Self {
        self.baud = baud;
        self
    }

    pub const fn with_soft_reset(mut self, soft_reset: bool) -> Self {
        self.soft_reset = soft_reset;
        self
    }

    pub const fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub const fn with_frame(mut self, frame: Frame) -> Self {
        self.frame = frame;
        self
    }

    /// `clock / (16 * baud)`, or `None` when that does not fit the 16-bit DLH:DLL pair.
    pub const fn divisor(&self) -> Option<u16> {
        if self.baud == 0 {
            return None;
        }
        let div = self.clock_hz as u64 / (16 * self.baud as u64);
        if div == 0 || div > u16::MAX as u64 {
            None
        } else {
            Some(div as u16)
        }
    }

    /// Rate the generator really produces with [`Self::divisor`].
    pub const fn actual_baud(&self) -> Option<u32> {
        match self.divisor() {
            Some(div) => Some(self.clock_hz / (16 * div as u32)),
            None => None,
        }
    }

    /// Deviation of [`Self::actual_baud`] from the requested rate, rounded down.
    pub const fn baud_error_permille(&self) -> u32 {
        match self.actual_baud() {
            Some(actual) => (actual.abs_diff(self.baud) as u64 * 1000 / self.baud as u64) as u32,
            None => u32::MAX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tock_registers::LocalRegisterCopy;

    fn lcr_bits(frame: Frame) -> u32 {
        let mut reg = LocalRegisterCopy::<u32, LCR::Register>::new(0);
        reg.write(frame.lcr());
        reg.get()
    }

    #[test]
    fn test_divisor_for_console() {
        let cfg = UartConfig::new(48_000_000);
        assert_eq!(cfg.baud, 115_200);
        assert_eq!(cfg.divisor(), Some(26));
        assert_eq!(cfg.actual_baud(), Some(115_384));
        assert_eq!(cfg.baud_error_permille(), 1);
        assert!(cfg.baud_error_permille() <= BAUD_TOLERANCE_PERMILLE);
    }

    #[test]
    fn test_divisor_other_rates() {
        let cfg = UartConfig::new(48_000_000).with_baud(9600);
        assert_eq!(cfg.divisor(), Some(312));
        let cfg = UartConfig::new(48_000_000).with_baud(3_000_000);
        assert_eq!(cfg.divisor(), Some(1));
    }

    #[test]
    fn test_divisor_out_of_range() {
        assert_eq!(UartConfig::new(48_000_000).with_baud(0).divisor(), None);
        assert_eq!(UartConfig::new(48_000_000).with_baud(1).divisor(), None);
        assert_eq!(UartConfig::new(1_000_000).with_baud(115_200).divisor(), None);
        assert_eq!(UartConfig::new(1_000_000).with_baud(115_200).baud_error_permille(), u32::MAX);
    }

    #[test]
    fn test_frame_encoding() {
        assert_eq!(lcr_bits(Frame::EIGHT_N_ONE), 0x03);

        let seven_e_two = Frame {
            data_bits: DataBits::Seven,
            parity: Parity::Even,
            stop_bits: StopBits::Two,
        };
        assert_eq!(lcr_bits(seven_e_two), 0x1E);
        let cfg = UartConfig::new(48_000_000).with_frame(seven_e_two);
        assert_eq!(lcr_bits(cfg.frame), 0x1E);

        let five_o_one = Frame {
            data_bits: DataBits::Five,
            parity: Parity::Odd,
            stop_bits: StopBits::One,
        };
        assert_eq!(lcr_bits(five_o_one), 0x08);
    }
}
