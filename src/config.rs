//! Board clocking configuration.

use s6pll::{sdram_plan, Outputs, Rational};
use serde::{Deserialize, Serialize};

/// Clocking configuration, consumed once at system assembly.
///
/// The synthesis parameters derived from it are burned into the built
/// system; there is no runtime reconfiguration path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Reference oscillator frequency in Hz.
    pub refclk: Rational,
    /// Requested system clock frequency in Hz.
    pub sys_clk: Rational,
    /// Granularity of the feedback multiplier; the output plan divides
    /// it down per tap.
    pub p: u32,
    /// Output tap plan of the synthesis core.
    pub outputs: Outputs,
    /// Toggle frequency of the bit clock pad in Hz.
    pub bit_clock: u64,
}

impl Default for Config {
    fn default() -> Self {
        let p = 12;
        Self {
            refclk: Rational::new(50_000_000, 1),
            // 83.333... MHz
            sys_clk: Rational::new(250_000_000, 3),
            p,
            outputs: sdram_plan(p),
            bit_clock: 100_000,
        }
    }
}
