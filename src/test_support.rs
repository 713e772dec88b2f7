//! Host test scaffolding shared by the unit tests.

use core::sync::atomic::{AtomicU32, Ordering};
use defmt_rtt as _;

use crate::source::{AsyncEchoSource, EchoSource};

// timestamp provider
static COUNT: AtomicU32 = AtomicU32::new(0);
defmt::timestamp!("{=u32:us}", COUNT.fetch_add(1, Ordering::Relaxed));

// Implement the critical_section functions
use critical_section::RawRestoreState;

struct CriticalSection;

unsafe impl critical_section::Impl for CriticalSection {
    unsafe fn acquire() -> RawRestoreState {
        // Implement critical section acquire
    }

    unsafe fn release(_state: RawRestoreState) {
        // Implement critical section release
    }
}
critical_section::set_impl!(CriticalSection);

pub fn close(a: f32, b: f32, tolerance: f32) -> bool {
    libm::fabsf(a - b) <= tolerance
}

/// Echo source replaying a fixed list of echo times, wrapping around.
pub struct ScriptedEcho {
    echoes: &'static [u32],
    constant: u32,
    calls: usize,
}

impl ScriptedEcho {
    pub fn new(echoes: &'static [u32]) -> Self {
        Self {
            echoes,
            constant: 0,
            calls: 0,
        }
    }

    pub fn constant(echo: u32) -> Self {
        Self {
            echoes: &[],
            constant: echo,
            calls: 0,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls
    }

    fn next(&mut self) -> u32 {
        let echo = match self.echoes.len() {
            0 => self.constant,
            len => self.echoes[self.calls % len],
        };
        self.calls += 1;
        echo
    }
}

impl EchoSource for ScriptedEcho {
    fn raw_echo_micros(&mut self) -> u32 {
        self.next()
    }
}

impl AsyncEchoSource for ScriptedEcho {
    async fn raw_echo_micros(&mut self) -> u32 {
        self.next()
    }
}
