//! Device configuration
//!
//! [`DeviceConfig`] is chosen once when the driver is constructed and written
//! to the device on every connection. It is never read back.

use crate::I2C_ADDRESS_AD0_HIGH;

/// Bus clock rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockRate {
    /// Standard mode, 100 kHz
    Standard100kHz,
    /// Fast mode, 400 kHz
    #[default]
    Fast400kHz,
}

impl ClockRate {
    /// Bus frequency in Hz
    #[must_use]
    pub const fn hz(self) -> u32 {
        match self {
            Self::Standard100kHz => 100_000,
            Self::Fast400kHz => 400_000,
        }
    }
}

/// Gyroscope full-scale range (`FS_SEL`)
///
/// Values 0-2 are reserved on the ITG-3205, so only the widest range exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FullScale {
    /// ±2000°/s range
    #[default]
    Dps2000 = 3,
}

impl FullScale {
    /// Sensitivity in LSB/(°/s)
    #[must_use]
    pub const fn sensitivity(self) -> f32 {
        match self {
            Self::Dps2000 => 14.375,
        }
    }

    /// Maximum magnitude in °/s
    #[must_use]
    pub const fn max_value(self) -> u16 {
        match self {
            Self::Dps2000 => 2000,
        }
    }

    /// Raw `FS_SEL` field value
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a raw `FS_SEL` field value
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            3 => Some(Self::Dps2000),
            _ => None,
        }
    }
}

/// Digital low pass filter (`DLPF_CFG`)
///
/// The filter setting also selects the internal sample rate: 8 kHz with the
/// widest bandwidth, 1 kHz otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LowPassFilter {
    /// 256 Hz bandwidth, 8 kHz internal rate
    #[default]
    Hz256 = 0,
    /// 188 Hz bandwidth, 1 kHz internal rate
    Hz188 = 1,
    /// 98 Hz bandwidth, 1 kHz internal rate
    Hz98 = 2,
    /// 42 Hz bandwidth, 1 kHz internal rate
    Hz42 = 3,
    /// 20 Hz bandwidth, 1 kHz internal rate
    Hz20 = 4,
    /// 10 Hz bandwidth, 1 kHz internal rate
    Hz10 = 5,
    /// 5 Hz bandwidth, 1 kHz internal rate
    Hz5 = 6,
}

impl LowPassFilter {
    /// Filter bandwidth in Hz
    #[must_use]
    pub const fn bandwidth_hz(self) -> u16 {
        match self {
            Self::Hz256 => 256,
            Self::Hz188 => 188,
            Self::Hz98 => 98,
            Self::Hz42 => 42,
            Self::Hz20 => 20,
            Self::Hz10 => 10,
            Self::Hz5 => 5,
        }
    }

    /// Internal sample rate in Hz
    #[must_use]
    pub const fn internal_rate_hz(self) -> u32 {
        match self {
            Self::Hz256 => 8000,
            _ => 1000,
        }
    }

    /// Raw `DLPF_CFG` field value
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a raw `DLPF_CFG` field value (7 is reserved)
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0 => Some(Self::Hz256),
            1 => Some(Self::Hz188),
            2 => Some(Self::Hz98),
            3 => Some(Self::Hz42),
            4 => Some(Self::Hz20),
            5 => Some(Self::Hz10),
            6 => Some(Self::Hz5),
            _ => None,
        }
    }
}

/// Clock reference (`CLK_SEL`)
///
/// Only PLL references are selectable. The free-running internal oscillator
/// (`CLK_SEL = 0`) has no variant, so an initialized device is never left on
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockSource {
    /// PLL with X gyro reference
    #[default]
    PllXGyro = 1,
    /// PLL with Y gyro reference
    PllYGyro = 2,
    /// PLL with Z gyro reference
    PllZGyro = 3,
    /// PLL with external 32.768 kHz reference
    PllExternal32kHz = 4,
    /// PLL with external 19.2 MHz reference
    PllExternal19MHz = 5,
}

impl ClockSource {
    /// Raw `CLK_SEL` field value
    #[must_use]
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode a raw `CLK_SEL` field value
    ///
    /// Returns `None` for the internal oscillator and reserved values.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(Self::PllXGyro),
            2 => Some(Self::PllYGyro),
            3 => Some(Self::PllZGyro),
            4 => Some(Self::PllExternal32kHz),
            5 => Some(Self::PllExternal19MHz),
            _ => None,
        }
    }
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceConfig {
    /// Index of the bus (TWI module) on the host
    pub bus_index: u8,
    /// Bus clock rate
    pub clock_rate: ClockRate,
    /// 7-bit device address
    pub address: u8,
    /// Low pass filter, also selects the internal sample rate
    pub low_pass_filter: LowPassFilter,
    /// Sample rate divider (0-255)
    /// Output rate = internal rate / (1 + `sample_rate_div`)
    pub sample_rate_div: u8,
    /// Clock reference selected at the end of initialization
    pub clock_source: ClockSource,
    /// Settling delay after every register write, in milliseconds
    pub settle_delay_ms: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            bus_index: 1,
            clock_rate: ClockRate::Fast400kHz,
            address: I2C_ADDRESS_AD0_HIGH,
            low_pass_filter: LowPassFilter::Hz256,
            // 8000 / (79 + 1) = 100 Hz
            sample_rate_div: 79,
            clock_source: ClockSource::PllXGyro,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
        }
    }
}

/// Default settling delay after a register write
pub const DEFAULT_SETTLE_DELAY_MS: u32 = 200;

impl DeviceConfig {
    /// Full-scale range written during initialization
    pub const FULL_SCALE: FullScale = FullScale::Dps2000;

    /// Set the bus index
    #[must_use]
    pub const fn with_bus_index(mut self, bus_index: u8) -> Self {
        self.bus_index = bus_index;
        self
    }

    /// Set the bus clock rate
    #[must_use]
    pub const fn with_clock_rate(mut self, clock_rate: ClockRate) -> Self {
        self.clock_rate = clock_rate;
        self
    }

    /// Set the device address
    #[must_use]
    pub const fn with_address(mut self, address: u8) -> Self {
        self.address = address;
        self
    }

    /// Set the low pass filter
    #[must_use]
    pub const fn with_low_pass_filter(mut self, low_pass_filter: LowPassFilter) -> Self {
        self.low_pass_filter = low_pass_filter;
        self
    }

    /// Set the raw sample rate divider
    #[must_use]
    pub const fn with_sample_rate_div(mut self, sample_rate_div: u8) -> Self {
        self.sample_rate_div = sample_rate_div;
        self
    }

    /// Set the clock reference
    #[must_use]
    pub const fn with_clock_source(mut self, clock_source: ClockSource) -> Self {
        self.clock_source = clock_source;
        self
    }

    /// Set the settling delay after register writes
    #[must_use]
    pub const fn with_settle_delay_ms(mut self, settle_delay_ms: u32) -> Self {
        self.settle_delay_ms = settle_delay_ms;
        self
    }

    /// Set the divider for a desired output rate
    ///
    /// divisor = internal rate / desired rate - 1
    ///
    /// Returns `None` if the rate is zero, above the internal rate, or needs a
    /// divisor larger than 255.
    #[must_use]
    pub const fn with_output_rate_hz(self, rate_hz: u32) -> Option<Self> {
        let internal = self.low_pass_filter.internal_rate_hz();
        if rate_hz == 0 || rate_hz > internal {
            return None;
        }
        let divisor = internal / rate_hz - 1;
        if divisor > u8::MAX as u32 {
            return None;
        }
        Some(self.with_sample_rate_div(divisor as u8))
    }

    /// Effective output rate in Hz
    #[must_use]
    pub fn sample_rate_hz(&self) -> f32 {
        self.low_pass_filter.internal_rate_hz() as f32 / (1.0 + f32::from(self.sample_rate_div))
    }

    /// Raw `DLPF_FS` value written during initialization
    #[must_use]
    pub const fn dlpf_fs_bits(&self) -> u8 {
        crate::registers::bits::dlpf_fs(Self::FULL_SCALE.bits(), self.low_pass_filter.bits())
    }
}
