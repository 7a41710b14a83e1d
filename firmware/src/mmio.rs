//! Register access capability.
//!
//! Drivers never dereference device addresses themselves; they go through a [`Bus`]. On the SoC
//! that is [`Mmio`], which turns every call into one volatile load or store. Tests hand the same
//! driver a simulated register file instead.

/// Typed 32-bit access to device registers at absolute addresses.
pub trait Bus {
    fn read(&mut self, addr: usize) -> u32;
    fn write(&mut self, addr: usize, value: u32);

    /// Read-modify-write.
    #[inline]
    fn modify<F: FnOnce(u32) -> u32>(&mut self, addr: usize, f: F) {
        let value = self.read(addr);
        self.write(addr, f(value));
    }
}

impl<B: Bus + ?Sized> Bus for &mut B {
    #[inline]
    fn read(&mut self, addr: usize) -> u32 {
        (**self).read(addr)
    }

    #[inline]
    fn write(&mut self, addr: usize, value: u32) {
        (**self).write(addr, value)
    }
}

/// Physical memory-mapped I/O.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// Every address later passed to [`Bus::read`] / [`Bus::write`] must be a valid, 4-byte
    /// aligned device register on this SoC.
    pub const unsafe fn new() -> Self {
        Mmio { _private: () }
    }
}

impl Bus for Mmio {
    #[inline(always)]
    fn read(&mut self, addr: usize) -> u32 {
        unsafe { core::ptr::read_volatile(addr as *const u32) }
    }

    #[inline(always)]
    fn write(&mut self, addr: usize, value: u32) {
        unsafe { core::ptr::write_volatile(addr as *mut u32, value) }
    }
}

/// Simulated register file for host tests.
#[cfg(test)]
pub mod sim {
    use super::Bus;
    use std::collections::BTreeMap;

    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    pub enum Access {
        Read(usize, u32),
        Write(usize, u32),
    }

    #[derive(Debug)]
    struct Gate {
        mask: u32,
        remaining: usize,
    }

    /// Registers hold whatever was last written. Every access is recorded in order.
    #[derive(Debug, Default)]
    pub struct SimBus {
        regs: BTreeMap<usize, u32>,
        gates: BTreeMap<usize, Gate>,
        pub trace: Vec<Access>,
    }

    impl SimBus {
        pub fn new() -> Self {
            Self::default()
        }

        /// Preload a register without recording an access.
        pub fn set(&mut self, addr: usize, value: u32) {
            self.regs.insert(addr, value);
        }

        pub fn get(&self, addr: usize) -> u32 {
            self.regs.get(&addr).copied().unwrap_or(0)
        }

        /// `mask` reads as clear for the next `polls` reads of `addr`, and as set afterwards.
        pub fn hold_low(&mut self, addr: usize, mask: u32, polls: usize) {
            self.gates.insert(addr, Gate { mask, remaining: polls });
        }

        pub fn writes(&self) -> Vec<(usize, u32)> {
            self.trace
                .iter()
                .filter_map(|a| match *a {
                    Access::Write(addr, v) => Some((addr, v)),
                    Access::Read(..) => None,
                })
                .collect()
        }

        pub fn writes_to(&self, addr: usize) -> Vec<u32> {
            self.writes()
                .into_iter()
                .filter(|&(a, _)| a == addr)
                .map(|(_, v)| v)
                .collect()
        }

        pub fn reads_of(&self, addr: usize) -> usize {
            self.trace
                .iter()
                .filter(|a| matches!(a, Access::Read(r, _) if *r == addr))
                .count()
        }

        /// Index in the trace of the first access matching `pred`.
        pub fn first(&self, pred: impl Fn(&Access) -> bool) -> Option<usize> {
            self.trace.iter().position(pred)
        }

        /// Index in the trace of the last access matching `pred`.
        pub fn last(&self, pred: impl Fn(&Access) -> bool) -> Option<usize> {
            self.trace.iter().rposition(pred)
        }
    }

    impl Bus for SimBus {
        fn read(&mut self, addr: usize) -> u32 {
            let mut value = self.get(addr);
            if let Some(gate) = self.gates.get_mut(&addr) {
                if gate.remaining > 0 {
                    gate.remaining -= 1;
                    value &= !gate.mask;
                } else {
                    value |= gate.mask;
                }
            }
            self.trace.push(Access::Read(addr, value));
            value
        }

        fn write(&mut self, addr: usize, value: u32) {
            self.regs.insert(addr, value);
            self.trace.push(Access::Write(addr, value));
        }
    }

    mod tests {
        use super::*;

        #[test]
        fn test_modify_preserves_other_bits() {
            let mut bus = SimBus::new();
            bus.set(0x100, 0xF0);
            bus.modify(0x100, |v| v | 0x1);
            assert_eq!(bus.get(0x100), 0xF1);
            assert_eq!(bus.trace, vec![Access::Read(0x100, 0xF0), Access::Write(0x100, 0xF1)]);
        }

        #[test]
        fn test_gate_releases_after_polls() {
            let mut bus = SimBus::new();
            bus.hold_low(0x14, 1 << 5, 2);
            assert_eq!(bus.read(0x14) & (1 << 5), 0);
            assert_eq!(bus.read(0x14) & (1 << 5), 0);
            assert_ne!(bus.read(0x14) & (1 << 5), 0);
            assert_eq!(bus.reads_of(0x14), 3);
        }
    }
}
