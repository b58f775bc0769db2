#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod config;
pub mod device;
pub mod interface;
pub mod listener;
pub mod looper;
pub mod registers;
pub mod sample;

// Re-export main types
pub use config::{ClockRate, ClockSource, DeviceConfig, FullScale, LowPassFilter};
pub use device::{Itg3205Driver, State};
pub use interface::{I2cInterface, SettlingInterface};
pub use listener::Listener;
pub use looper::{Looper, TwiHost};
pub use sample::{DecodedSample, RateDps, RawSample, raw_to_celsius, raw_to_dps};

/// ITG-3205 I2C address when AD0 pin is high (default: 0x69)
///
/// Most breakout boards tie AD0 to VDD. Use [`I2cInterface::default()`]
/// for this configuration.
pub const I2C_ADDRESS_AD0_HIGH: u8 = 0x69;

/// ITG-3205 I2C address when AD0 pin is low (alternative: 0x68)
///
/// Use [`I2cInterface::alternative()`] for this configuration.
pub const I2C_ADDRESS_AD0_LOW: u8 = 0x68;

/// Expected value of `WHO_AM_I` register
pub const WHO_AM_I_VALUE: u8 = 0x34 << 1;

/// Driver errors
///
/// Only transport failures and lifecycle misuse are errors. An unexpected
/// `WHO_AM_I` value is reported through [`Listener::on_error`] instead.
#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the device (connection lost or interrupted)
    Bus(E),
    /// No initialized connection to poll
    NotConnected,
    /// The attached hardware was reported unusable
    Incompatible,
    /// Block write payload is empty or longer than
    /// [`MAX_BLOCK_WRITE`](interface::MAX_BLOCK_WRITE)
    InvalidLength,
}

impl<E> From<E> for Error<E> {
    fn from(error: E) -> Self {
        Self::Bus(error)
    }
}
