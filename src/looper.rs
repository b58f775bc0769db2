//! Host loop integration
//!
//! A host board exposes numbered I2C (TWI) modules. For every connection
//! lifetime the host calls [`Looper::setup`] once, [`Looper::run_loop`]
//! repeatedly while connected, and [`Looper::disconnected`] when the link
//! drops. [`Looper::incompatible`] is called instead of `setup` when the
//! host decides the attached hardware cannot be used.
//!
//! [`run`] is a ready-made scheduling loop: it sets the driver up, polls it
//! at a fixed cadence until the caller asks it to stop, and reports a lost
//! link to the driver on the first transport error.
//!
//! # Example
//!
//! ```ignore
//! let mut driver = Itg3205Driver::new(DeviceConfig::default(), Delay);
//! driver.set_listener(Printer);
//! let result = looper::run(
//!     &mut driver,
//!     &mut board,
//!     &mut Delay,
//!     looper::DEFAULT_POLL_INTERVAL_MS,
//!     || !stop_requested(),
//! );
//! ```

use embedded_hal::i2c::ErrorType;

use crate::config::ClockRate;
use crate::device::{Itg3205Driver, State};
use crate::interface::I2cInterface;
use crate::listener::Listener;
use crate::Error;

/// Host-side pacing between two polls
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 10;

/// A host that can open an I2C (TWI) bus by index
pub trait TwiHost {
    /// Bus handle returned by [`open_twi_master`](Self::open_twi_master)
    type Twi: ErrorType;

    /// Open bus `index` at `rate` with 7-bit addressing
    ///
    /// # Errors
    ///
    /// Returns the bus error if the connection to the host is lost.
    fn open_twi_master(
        &mut self,
        index: u8,
        rate: ClockRate,
    ) -> Result<Self::Twi, <Self::Twi as ErrorType>::Error>;
}

/// Connection lifecycle driven by the host
#[cfg(not(feature = "async"))]
pub trait Looper<H> {
    /// Error returned by `setup` and `run_loop`
    type Error;

    /// Called once per connection
    ///
    /// # Errors
    ///
    /// Any error aborts the connection.
    fn setup(&mut self, host: &mut H) -> Result<(), Self::Error>;

    /// Called repeatedly while connected
    ///
    /// # Errors
    ///
    /// Any error aborts the connection.
    fn run_loop(&mut self) -> Result<(), Self::Error>;

    /// The link to the host was lost
    fn disconnected(&mut self);

    /// The attached hardware cannot be used
    fn incompatible(&mut self);
}

/// Connection lifecycle driven by the host
#[cfg(feature = "async")]
#[allow(async_fn_in_trait)]
pub trait Looper<H> {
    /// Error returned by `setup` and `run_loop`
    type Error;

    /// Called once per connection
    ///
    /// # Errors
    ///
    /// Any error aborts the connection.
    async fn setup(&mut self, host: &mut H) -> Result<(), Self::Error>;

    /// Called repeatedly while connected
    ///
    /// # Errors
    ///
    /// Any error aborts the connection.
    async fn run_loop(&mut self) -> Result<(), Self::Error>;

    /// The link to the host was lost
    fn disconnected(&mut self);

    /// The attached hardware cannot be used
    fn incompatible(&mut self);
}

#[cfg(not(feature = "async"))]
impl<H, D, L> Looper<H> for Itg3205Driver<I2cInterface<H::Twi>, D, L>
where
    H: TwiHost,
    H::Twi: embedded_hal::i2c::I2c,
    D: embedded_hal::delay::DelayNs,
    L: Listener,
{
    type Error = Error<<H::Twi as ErrorType>::Error>;

    fn setup(&mut self, host: &mut H) -> Result<(), Self::Error> {
        if self.state() == State::Incompatible {
            return Err(Error::Incompatible);
        }
        let config = *self.config();
        let twi = host.open_twi_master(config.bus_index, config.clock_rate)?;
        self.connect(I2cInterface::new(twi, config.address))
    }

    fn run_loop(&mut self) -> Result<(), Self::Error> {
        self.poll()
    }

    fn disconnected(&mut self) {
        // The bus handle belongs to a dead connection
        drop(Itg3205Driver::disconnected(self));
    }

    fn incompatible(&mut self) {
        Itg3205Driver::incompatible(self);
    }
}

#[cfg(feature = "async")]
impl<H, D, L> Looper<H> for Itg3205Driver<I2cInterface<H::Twi>, D, L>
where
    H: TwiHost,
    H::Twi: embedded_hal_async::i2c::I2c,
    D: embedded_hal_async::delay::DelayNs,
    L: Listener,
{
    type Error = Error<<H::Twi as ErrorType>::Error>;

    async fn setup(&mut self, host: &mut H) -> Result<(), Self::Error> {
        if self.state() == State::Incompatible {
            return Err(Error::Incompatible);
        }
        let config = *self.config();
        let twi = host.open_twi_master(config.bus_index, config.clock_rate)?;
        self.connect(I2cInterface::new(twi, config.address)).await
    }

    async fn run_loop(&mut self) -> Result<(), Self::Error> {
        self.poll().await
    }

    fn disconnected(&mut self) {
        drop(Itg3205Driver::disconnected(self));
    }

    fn incompatible(&mut self) {
        Itg3205Driver::incompatible(self);
    }
}

/// Run one connection lifetime
///
/// Calls `setup`, then `run_loop` followed by `interval_ms` of pacing for as
/// long as `keep_running` returns `true`. Returning `false` stops the loop
/// between two polls without touching the connection.
///
/// # Errors
///
/// The first error from `setup` or `run_loop` is returned after
/// `disconnected` has been called. There is no retry; call `run` again to
/// reconnect, which repeats the full initialization.
#[cfg(not(feature = "async"))]
pub fn run<H, Lp, P>(
    looper: &mut Lp,
    host: &mut H,
    pacer: &mut P,
    interval_ms: u32,
    mut keep_running: impl FnMut() -> bool,
) -> Result<(), Lp::Error>
where
    Lp: Looper<H>,
    P: embedded_hal::delay::DelayNs,
{
    if let Err(e) = looper.setup(host) {
        looper.disconnected();
        return Err(e);
    }

    while keep_running() {
        if let Err(e) = looper.run_loop() {
            looper.disconnected();
            return Err(e);
        }
        if interval_ms > 0 {
            pacer.delay_ms(interval_ms);
        }
    }

    Ok(())
}

/// Run one connection lifetime
///
/// Async version of the blocking `run`; pacing delays are awaited.
///
/// # Errors
///
/// The first error from `setup` or `run_loop` is returned after
/// `disconnected` has been called.
#[cfg(feature = "async")]
pub async fn run<H, Lp, P>(
    looper: &mut Lp,
    host: &mut H,
    pacer: &mut P,
    interval_ms: u32,
    mut keep_running: impl FnMut() -> bool,
) -> Result<(), Lp::Error>
where
    Lp: Looper<H>,
    P: embedded_hal_async::delay::DelayNs,
{
    if let Err(e) = looper.setup(host).await {
        looper.disconnected();
        return Err(e);
    }

    while keep_running() {
        if let Err(e) = looper.run_loop().await {
            looper.disconnected();
            return Err(e);
        }
        if interval_ms > 0 {
            pacer.delay_ms(interval_ms).await;
        }
    }

    Ok(())
}
