#![cfg_attr(not(test), no_std)]

mod rational;
pub use rational::Rational;

use serde::{Deserialize, Serialize};

/// Phase detector input frequency limits in Hz.
pub const PFD_RANGE: (u64, u64) = (19_000_000, 500_000_000);

/// VCO frequency limits in Hz.
pub const VCO_RANGE: (u64, u64) = (400_000_000, 1_080_000_000);

#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The input divider would put the phase detector outside its
    /// operating range.
    #[error("phase detector frequency out of range")]
    PfdRange,
    /// The multiply/divide ratio would put the VCO outside its operating
    /// range.
    #[error("VCO frequency out of range")]
    VcoRange,
    /// An output tap divides by zero.
    #[error("invalid output divider")]
    OutputDivide,
}

/// Solved feedback multiplier and input divider.
///
/// `refclk * n / d` is the VCO frequency; every output tap is an integer
/// divide of it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    pub n: u64,
    pub d: u64,
}

/// Compute `n` and `d` such that `target * p == refclk * n / d` holds
/// exactly, then check the hardware ranges.
///
/// This is a configuration-time contract: a rejected ratio must never
/// reach hardware, so violations fail here and nothing is built from
/// them.
pub fn solve(refclk: Rational, target: Rational, p: u32) -> Result<Params, Error> {
    let f = target * u64::from(p) / refclk;
    let params = Params {
        n: f.numerator(),
        d: f.denominator(),
    };
    let pfd = refclk / params.d;
    if pfd < PFD_RANGE.0.into() || pfd > PFD_RANGE.1.into() {
        return Err(Error::PfdRange);
    }
    let vco = refclk * params.n / params.d;
    if vco < VCO_RANGE.0.into() || vco > VCO_RANGE.1.into() {
        return Err(Error::VcoRange);
    }
    Ok(params)
}

/// One output tap of the multiply/divide core.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Output {
    /// Phase offset in degrees. These are fixed compensation constants,
    /// never computed.
    pub phase: f32,
    /// Integer divide of the VCO frequency.
    pub divide: u32,
    /// High fraction of the output period.
    pub duty: f32,
}

impl Output {
    pub const fn new(phase: f32, divide: u32) -> Self {
        Self {
            phase,
            divide,
            duty: 0.5,
        }
    }
}

/// The six output taps, validated as one unit: the taps share the
/// multiply/divide core and a single bad divider invalidates the whole
/// plan.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outputs(pub [Output; 6]);

impl Outputs {
    pub fn validate(&self) -> Result<(), Error> {
        if self.0.iter().any(|o| o.divide == 0) {
            return Err(Error::OutputDivide);
        }
        Ok(())
    }
}

/// Output plan for the SDRAM clocking scheme.
///
/// Taps 0/1 run the 4x write/read I/O clock, tap 2 the half rate command
/// path, tap 3 the off-chip DDR clock and tap 5 the system clock. Tap 3
/// trails tap 2 by a fixed 20 degrees to compensate the output buffer
/// delay.
pub fn sdram_plan(p: u32) -> Outputs {
    Outputs([
        Output::new(0.0, p / 4), // sdram wr rd
        Output::new(0.0, p / 4),
        Output::new(270.0, p / 2), // sdram dqs adr ctrl
        Output::new(250.0, p / 2), // off-chip ddr
        Output::new(0.0, p),
        Output::new(0.0, p), // sys
    ])
}

/// A solved synthesis core with its output plan.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pll {
    pub params: Params,
    pub outputs: Outputs,
}

impl Pll {
    /// Solve and validate. Nothing is constructed from a rejected
    /// configuration.
    pub fn new(
        refclk: Rational,
        target: Rational,
        p: u32,
        outputs: Outputs,
    ) -> Result<Self, Error> {
        outputs.validate()?;
        let params = solve(refclk, target, p)?;
        Ok(Self { params, outputs })
    }

    /// Phase detector frequency.
    pub fn pfd(&self, refclk: Rational) -> Rational {
        refclk / self.params.d
    }

    /// VCO frequency.
    pub fn vco(&self, refclk: Rational) -> Rational {
        refclk * self.params.n / self.params.d
    }

    /// Exact frequency of one output tap.
    pub fn output_freq(&self, refclk: Rational, index: usize) -> Rational {
        self.vco(refclk) / u64::from(self.outputs.0[index].divide)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_ratio() {
        // 50 MHz refclk, 83.333... MHz system clock
        let refclk = Rational::new(50_000_000, 1);
        let target = Rational::new(250_000_000, 3);
        let params = solve(refclk, target, 12).unwrap();
        assert_eq!(params, Params { n: 20, d: 1 });
        let pll = Pll::new(refclk, target, 12, sdram_plan(12)).unwrap();
        assert_eq!(pll.vco(refclk), Rational::from(1_000_000_000));
        assert_eq!(pll.output_freq(refclk, 5), target);
        assert_eq!(pll.output_freq(refclk, 2), Rational::new(500_000_000, 3));
        assert_eq!(pll.output_freq(refclk, 0), Rational::new(1_000_000_000, 3));
    }

    #[test]
    fn solutions_are_exact() {
        let refclk = Rational::new(50_000_000, 1);
        for target in [
            Rational::new(250_000_000, 3),
            Rational::new(200_000_000, 3),
            Rational::from(75_000_000),
            Rational::from(50_000_000),
            // 43.75 MHz needs d = 2
            Rational::new(43_750_000, 1),
        ] {
            let params = solve(refclk, target, 12).unwrap();
            assert_eq!(target * 12, refclk * params.n / params.d);
        }
    }

    #[test]
    fn rejects_pfd_range() {
        let refclk = Rational::new(50_000_000, 1);
        // reduces to 2502/125: the phase detector would run at 400 kHz
        let target = Rational::from(83_400_000);
        assert_eq!(solve(refclk, target, 12), Err(Error::PfdRange));
    }

    #[test]
    fn rejects_vco_range() {
        let refclk = Rational::new(50_000_000, 1);
        // n/d = 6: VCO at 300 MHz
        assert_eq!(
            solve(refclk, Rational::from(25_000_000), 12),
            Err(Error::VcoRange)
        );
        // n/d = 22: VCO at 1.1 GHz
        assert_eq!(
            solve(refclk, Rational::new(275_000_000, 3), 12),
            Err(Error::VcoRange)
        );
    }

    #[test]
    fn rejects_zero_divide() {
        // p < 4 floors the fast taps to zero
        assert_eq!(sdram_plan(2).validate(), Err(Error::OutputDivide));
        sdram_plan(12).validate().unwrap();
    }
}
