//! Host visible CSR map.

use num_enum::TryFromPrimitive;

/// CSR bank addresses owned by this design. Address 16 belongs to the
/// platform boot flash and is decoded elsewhere.
#[derive(Debug, Copy, Clone, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum CsrAddr {
    GpioInout = 17,
    ClockBit = 18,
}

/// Register offsets within the gpio bank, in declaration order of the
/// peripheral.
pub const GPIO_CONTROL: u8 = 0;
pub const GPIO_STATUS: u8 = 1;

/// Register offset of the bit clock status register.
pub const CLOCK_STATUS: u8 = 0;

/// CSR transaction faults. The bus itself is fixed latency and never
/// blocks; a bad address is a programming error surfaced to the caller.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("unmapped CSR bank {0}")]
    Unmapped(u8),
    #[error("no register {1} in CSR bank {0}")]
    Register(u8, u8),
    #[error("register {1} in CSR bank {0} is read-only")]
    ReadOnly(u8, u8),
}
