//! Power-on reset sequencing.

use crate::sync::BitSync;

/// Initial value of the power-on counter.
pub const POR_CYCLES: u16 = (1 << 11) - 1;

/// Power-on timer qualified by synthesizer lock.
///
/// The counter loads its maximum at power-up (and while the external
/// reset button is held), counts down once per cycle and freezes at
/// zero. The raw reset term stays asserted while the counter is nonzero
/// or the synthesizer is out of lock; it is recomputed from the current
/// state on every evaluation and never latched.
#[derive(Debug, Copy, Clone)]
pub struct PowerOnReset {
    counter: u16,
    button: BitSync,
}

impl Default for PowerOnReset {
    fn default() -> Self {
        Self {
            counter: POR_CYCLES,
            button: BitSync::default(),
        }
    }
}

impl PowerOnReset {
    /// Remaining power-on cycles.
    pub fn counter(&self) -> u16 {
        self.counter
    }

    /// Raw qualified reset term, combinational from the current state.
    pub fn raw(&self, locked: bool) -> bool {
        self.counter > 0 || !locked
    }

    /// Clock one por domain edge. `button` is the external reset pad,
    /// sampled from an unrelated domain.
    pub fn tick(&mut self, button: bool) {
        if self.button.tick(button) {
            self.counter = POR_CYCLES;
        } else if self.counter > 0 {
            self.counter -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_for_full_countdown() {
        let mut por = PowerOnReset::default();
        for _ in 0..POR_CYCLES {
            assert!(por.raw(true));
            por.tick(false);
        }
        assert_eq!(por.counter(), 0);
        assert!(!por.raw(true));
        assert!(por.raw(false));
    }

    #[test]
    fn counter_freezes_at_zero() {
        let mut por = PowerOnReset::default();
        for _ in 0..10_000 {
            por.tick(false);
        }
        assert_eq!(por.counter(), 0);
        assert!(!por.raw(true));
    }

    #[test]
    fn button_reloads() {
        let mut por = PowerOnReset::default();
        for _ in 0..POR_CYCLES {
            por.tick(false);
        }
        assert_eq!(por.counter(), 0);
        por.tick(true);
        // synchronizer latency
        por.tick(true);
        assert_eq!(por.counter(), POR_CYCLES);
        por.tick(false);
        por.tick(false);
        por.tick(false);
        assert_eq!(por.counter(), POR_CYCLES - 2);
    }
}
