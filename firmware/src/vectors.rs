//! Exception routing.
//!
//! The assembly vector table funnels every trap into `trap_dispatch` with a [`TrapKind`]; the
//! firmware keeps one [`VectorTable`] that maps each kind to a handler. Kinds nobody claims land in
//! [`default_handler`], which parks the core until an external reset.

use crate::cpu;

/// The six ARMv7-R exceptions other than reset, in vector-table order.
#[repr(u32)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TrapKind {
    Undefined = 0,
    Svc = 1,
    PrefetchAbort = 2,
    DataAbort = 3,
    Irq = 4,
    Fiq = 5,
}

impl TrapKind {
    pub const COUNT: usize = 6;

    pub const ALL: [TrapKind; Self::COUNT] = [
        TrapKind::Undefined,
        TrapKind::Svc,
        TrapKind::PrefetchAbort,
        TrapKind::DataAbort,
        TrapKind::Irq,
        TrapKind::Fiq,
    ];

    pub const fn from_raw(raw: u32) -> Option<TrapKind> {
        if (raw as usize) < Self::COUNT {
            Some(Self::ALL[raw as usize])
        } else {
            None
        }
    }
}

pub type Handler = extern "C" fn();

/// Fail-stop: nothing is saved, nothing is retried.
pub extern "C" fn default_handler() {
    cpu::wait_forever()
}

#[derive(Copy, Clone)]
pub struct VectorTable {
    handlers: [Handler; TrapKind::COUNT],
}

impl VectorTable {
    /// Every kind bound to [`default_handler`].
    pub const fn new() -> Self {
        Self {
            handlers: [default_handler as Handler; TrapKind::COUNT],
        }
    }

    /// Same table with `kind` bound to `handler`.
    pub const fn with(mut self, kind: TrapKind, handler: Handler) -> Self {
        self.handlers[kind as usize] = handler;
        self
    }

    pub fn handler(&self, kind: TrapKind) -> Handler {
        self.handlers[kind as usize]
    }

    pub fn dispatch(&self, kind: TrapKind) {
        (self.handler(kind))()
    }
}

impl Default for VectorTable {
    fn default() -> Self {
        Self::new()
    }
}
