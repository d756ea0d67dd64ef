//! System assembly.

use crate::clock_bit::BitClock;
use crate::config::Config;
use crate::crg::Crg;
use crate::csr::{self, CsrAddr};
use crate::gpio::GpioInOut;

/// Pad and control inputs sampled for one core clock cycle.
#[derive(Debug, Copy, Clone, Default)]
pub struct SysInputs {
    /// Synthesizer lock indication.
    pub locked: bool,
    /// External reset button, active high.
    pub button: bool,
    /// Level on the bidirectional pad while it is not host-driven.
    pub gpio_in: bool,
}

/// Pad and reset levels after one core clock cycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SysOutputs {
    /// Core domain reset.
    pub sys_rst: bool,
    /// Bit clock pad.
    pub clk_pad: bool,
    /// Resolved level of the bidirectional pad.
    pub gpio_pad: bool,
}

/// The clock/reset generator and its CSR peripherals, assembled once.
///
/// Owns every singleton: the synthesis parameters, the reset sequencing
/// state and both peripherals. Host software reaches them through CSR
/// transactions only, and each register has exactly one owner.
pub struct Soc {
    crg: Crg,
    gpio: GpioInOut,
    clock: BitClock,
    inputs: SysInputs,
}

impl Soc {
    /// Solve the clocking plan and assemble. A configuration violating
    /// the synthesis ranges fails here and nothing is built.
    pub fn new(config: &Config) -> Result<Self, s6pll::Error> {
        let crg = Crg::new(config)?;
        let clock = BitClock::new(crg.sys_clk().floor(), config.bit_clock);
        log::info!("bit clock ratio: {}", clock.ratio());
        Ok(Self {
            crg,
            gpio: GpioInOut::default(),
            clock,
            inputs: SysInputs::default(),
        })
    }

    pub fn crg(&self) -> &Crg {
        &self.crg
    }

    pub fn crg_mut(&mut self) -> &mut Crg {
        &mut self.crg
    }

    /// Clock the core domain one edge. Peripheral registers stay at
    /// their load values while the domain reset is asserted.
    pub fn tick_sys(&mut self, inputs: SysInputs) -> SysOutputs {
        self.inputs = inputs;
        let sys_rst = self.crg.tick_sys(inputs.locked, inputs.button);
        if sys_rst {
            self.clock.reset();
            self.gpio.reset();
        } else {
            self.clock.tick();
            self.gpio.tick();
        }
        SysOutputs {
            sys_rst,
            clk_pad: self.clock.pad(),
            gpio_pad: self.gpio.pad(inputs.gpio_in),
        }
    }

    /// Host CSR read.
    pub fn csr_read(&self, addr: u8, reg: u8) -> Result<u8, csr::Error> {
        match CsrAddr::try_from(addr).map_err(|_| csr::Error::Unmapped(addr))? {
            CsrAddr::GpioInout => match reg {
                csr::GPIO_CONTROL => Ok(self.gpio.csr_control()),
                csr::GPIO_STATUS => Ok(self.gpio.csr_status(self.inputs.gpio_in)),
                _ => Err(csr::Error::Register(addr, reg)),
            },
            CsrAddr::ClockBit => match reg {
                csr::CLOCK_STATUS => Ok(self.clock.csr_status()),
                _ => Err(csr::Error::Register(addr, reg)),
            },
        }
    }

    /// Host CSR write.
    pub fn csr_write(&mut self, addr: u8, reg: u8, value: u8) -> Result<(), csr::Error> {
        match CsrAddr::try_from(addr).map_err(|_| csr::Error::Unmapped(addr))? {
            CsrAddr::GpioInout => match reg {
                csr::GPIO_CONTROL => {
                    self.gpio.csr_write(value);
                    Ok(())
                }
                csr::GPIO_STATUS => Err(csr::Error::ReadOnly(addr, reg)),
                _ => Err(csr::Error::Register(addr, reg)),
            },
            CsrAddr::ClockBit => match reg {
                csr::CLOCK_STATUS => Err(csr::Error::ReadOnly(addr, reg)),
                _ => Err(csr::Error::Register(addr, reg)),
            },
        }
    }
}
