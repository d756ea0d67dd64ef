//! Bidirectional pin CSR peripheral.

use arbitrary_int::u2;
use bitbybit::bitfield;
use serde::{Deserialize, Serialize};

/// Control CSR: bit 0 drives the pad, bit 1 enables the driver.
#[bitfield(u2, default = 0)]
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Control {
    #[bit(0, rw)]
    value: bool,
    #[bit(1, rw)]
    oe: bool,
}

/// Tri-state pin with a 2 bit control CSR and a 1 bit status CSR.
///
/// The status register samples the pad raw in both directions: with the
/// driver enabled the host reads back its own level, with the driver
/// off it reads whatever drives the pad externally. Host writes land on
/// the next core clock edge; the write transaction is synchronous to
/// the domain driving the pad, so driver and host never race.
#[derive(Debug, Clone, Default)]
pub struct GpioInOut {
    control: Control,
    pending: Option<Control>,
}

impl GpioInOut {
    /// Host write of the control register; takes effect on the next
    /// edge.
    pub fn csr_write(&mut self, value: u8) {
        self.pending = Some(Control::new_with_raw_value(u2::new(value & 0x3)));
    }

    /// Host readback of the control register.
    pub fn csr_control(&self) -> u8 {
        self.control.raw_value().value()
    }

    /// Host read of the status register: the pad, sampled raw.
    pub fn csr_status(&self, external: bool) -> u8 {
        self.pad(external) as u8
    }

    /// Resolved pad level. `external` is the level driven from off-chip
    /// while the output driver is disabled.
    pub fn pad(&self, external: bool) -> bool {
        if self.control.oe() {
            self.control.value()
        } else {
            external
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Clock one core clock edge.
    pub fn tick(&mut self) {
        if let Some(control) = self.pending.take() {
            self.control = control;
        }
    }
}
