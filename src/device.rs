//! High-level driver API for the ITG-3205
//!
//! [`Itg3205Driver`] owns the connection lifecycle: it binds a bus interface,
//! runs the initialization sequence, and then decodes one sample per
//! [`poll`](Itg3205Driver::poll) for the registered listener.
//!
//! ```text
//! Disconnected -> Connecting -> Initializing -> Ready <-> Polling
//!      ^                                          |
//!      +------------- disconnected() -------------+
//!
//! incompatible() -> Incompatible (terminal)
//! ```
//!
//! All register writes go through [`SettlingInterface`], so each one is
//! followed by the configured settling delay before the next transaction.

use core::fmt::Write as _;

use crate::config::DeviceConfig;
use crate::interface::{MAX_BLOCK_WRITE, SettlingInterface};
use crate::listener::Listener;
use crate::registers::{RegisterDevice, address};
use crate::sample::{DecodedSample, RawSample, SAMPLE_LEN};
use crate::{Error, WHO_AM_I_VALUE};

// Only import RegisterInterface when not using async feature
#[cfg(not(feature = "async"))]
use device_driver::RegisterInterface;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// No bus bound
    Disconnected,
    /// Bus is being bound
    Connecting,
    /// Initialization sequence is running
    Initializing,
    /// Initialized and waiting for the next poll
    Ready,
    /// A sample read is in flight
    Polling,
    /// The attached hardware cannot be used
    Incompatible,
}

/// Main driver for the ITG-3205
///
/// `I` is the register interface (usually [`I2cInterface`](crate::I2cInterface)),
/// `D` the delay provider used for settling delays and `L` the listener.
pub struct Itg3205Driver<I, D, L> {
    interface: Option<I>,
    delay: D,
    listener: Option<L>,
    config: DeviceConfig,
    state: State,
    device_id: Option<u8>,
}

impl<I, D, L> Itg3205Driver<I, D, L>
where
    L: Listener,
{
    /// Create a disconnected driver
    ///
    /// Nothing is sent to the device until [`connect`](Self::connect).
    pub const fn new(config: DeviceConfig, delay: D) -> Self {
        Self {
            interface: None,
            delay,
            listener: None,
            config,
            state: State::Disconnected,
            device_id: None,
        }
    }

    /// Register the listener, replacing any previous one
    ///
    /// Must not be called while a poll is in progress.
    pub fn set_listener(&mut self, listener: L) -> &mut Self {
        self.listener = Some(listener);
        self
    }

    /// Remove and return the listener
    ///
    /// Polling becomes a no-op until a new listener is set.
    pub fn take_listener(&mut self) -> Option<L> {
        self.listener.take()
    }

    /// Current listener
    pub const fn listener(&self) -> Option<&L> {
        self.listener.as_ref()
    }

    /// Current listener (mutable)
    pub fn listener_mut(&mut self) -> Option<&mut L> {
        self.listener.as_mut()
    }

    /// Configuration chosen at construction
    pub const fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Current connection state
    pub const fn state(&self) -> State {
        self.state
    }

    /// Identity verified during the last initialization
    ///
    /// `None` when disconnected or when the identity byte did not match
    /// [`WHO_AM_I_VALUE`].
    pub const fn device_id(&self) -> Option<u8> {
        self.device_id
    }

    /// The bus has been lost
    ///
    /// Releases the bound interface, forgets the verified identity and
    /// notifies the listener. A later [`connect`](Self::connect) runs the
    /// full initialization again.
    pub fn disconnected(&mut self) -> Option<I> {
        #[cfg(feature = "defmt")]
        defmt::info!("ITG-3205 disconnected");

        let interface = self.interface.take();
        self.device_id = None;
        if self.state != State::Incompatible {
            self.state = State::Disconnected;
        }
        if let Some(listener) = self.listener.as_mut() {
            listener.on_disconnected();
        }
        interface
    }

    /// The bus layer found the attached hardware unusable
    ///
    /// This is terminal: every later `connect` or `poll` fails with
    /// [`Error::Incompatible`].
    pub fn incompatible(&mut self) {
        #[cfg(feature = "defmt")]
        defmt::error!("ITG-3205 hardware incompatible");

        self.state = State::Incompatible;
        if let Some(listener) = self.listener.as_mut() {
            listener.on_incompatible();
        }
    }

    /// Consume the driver and return its parts
    pub fn release(self) -> (Option<I>, D, Option<L>) {
        (self.interface, self.delay, self.listener)
    }

    fn begin_connect(&mut self, interface: I) {
        #[cfg(feature = "defmt")]
        defmt::info!(
            "Connecting ITG-3205 on bus {} at {} Hz",
            self.config.bus_index,
            self.config.clock_rate.hz()
        );

        self.state = State::Connecting;
        self.interface = Some(interface);
        self.device_id = None;
        self.state = State::Initializing;
    }

    fn finish_connect<E>(&mut self, result: Result<(), Error<E>>) -> Result<(), Error<E>> {
        match result {
            Ok(()) => {
                #[cfg(feature = "defmt")]
                defmt::info!("ITG-3205 ready");

                self.state = State::Ready;
                Ok(())
            }
            Err(e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("ITG-3205 initialization failed");

                self.interface = None;
                self.state = State::Disconnected;
                Err(e)
            }
        }
    }

    fn check_ready<E>(&self) -> Result<(), Error<E>> {
        match self.state {
            State::Ready => Ok(()),
            State::Incompatible => Err(Error::Incompatible),
            _ => Err(Error::NotConnected),
        }
    }

    /// Record the identity read after reset and notify the listener
    ///
    /// A mismatch is reported through `on_error` but never stops
    /// initialization; clones and variants still accept the configuration.
    fn verify_identity(&mut self, device_id: u8) {
        #[cfg(feature = "defmt")]
        defmt::debug!("WHO_AM_I = 0x{:02X}", device_id);

        if device_id == WHO_AM_I_VALUE {
            self.device_id = Some(device_id);
        } else {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Unexpected WHO_AM_I: expected 0x{:02X}, got 0x{:02X}",
                WHO_AM_I_VALUE,
                device_id
            );

            if let Some(listener) = self.listener.as_mut() {
                let mut message: heapless::String<64> = heapless::String::new();
                // 64 bytes always fits this message
                let _ = write!(
                    message,
                    "Invalid device ID, expected 0x{:02X} but got 0x{:02X}",
                    WHO_AM_I_VALUE, device_id
                );
                listener.on_error(&message);
            }
        }

        if let Some(listener) = self.listener.as_mut() {
            listener.on_device_id(device_id);
        }
    }

    fn deliver(&mut self, sample: DecodedSample) {
        if let Some(listener) = self.listener.as_mut() {
            listener.on_data(sample);
        }
    }
}

#[cfg(not(feature = "async"))]
impl<I, D, L> Itg3205Driver<I, D, L>
where
    I: RegisterInterface<AddressType = u8>,
    D: embedded_hal::delay::DelayNs,
    L: Listener,
{
    /// Bind a bus interface and initialize the device
    ///
    /// Runs, in order, each write followed by the settling delay:
    /// 1. `PWR_MGM` soft reset
    /// 2. `WHO_AM_I` read and verification (mismatch is non-fatal)
    /// 3. `on_device_id` with the byte that was read
    /// 4. `DLPF_FS` full scale ±2000°/s and the configured filter
    /// 5. `SMPLRT_DIV` with the configured divisor
    /// 6. `INT_CFG` all interrupts disabled
    /// 7. `PWR_MGM` with the configured PLL clock reference
    ///
    /// The driver does not guard against connecting twice; call
    /// [`disconnected`](Self::disconnected) first.
    ///
    /// # Errors
    ///
    /// Returns an error if a bus transaction fails (the interface is dropped
    /// and the state falls back to `Disconnected`) or if the driver was
    /// marked incompatible.
    pub fn connect(&mut self, interface: I) -> Result<(), Error<I::Error>> {
        if self.state == State::Incompatible {
            return Err(Error::Incompatible);
        }
        self.begin_connect(interface);
        let result = self.initialize();
        self.finish_connect(result)
    }

    fn initialize(&mut self) -> Result<(), Error<I::Error>> {
        let config = self.config;

        #[cfg(feature = "defmt")]
        defmt::debug!("PWR_MGM H_RESET");
        self.registers()?.pwr_mgm().write(|w| {
            w.set_h_reset(true);
        })?;

        let device_id = self.read_device_id()?;
        self.verify_identity(device_id);

        #[cfg(feature = "defmt")]
        defmt::debug!("DLPF_FS = 0x{:02X}", config.dlpf_fs_bits());
        self.registers()?.dlpf_fs().write(|w| {
            w.set_fs_sel(DeviceConfig::FULL_SCALE.bits());
            w.set_dlpf_cfg(config.low_pass_filter.bits());
        })?;

        #[cfg(feature = "defmt")]
        defmt::debug!("SMPLRT_DIV = {}", config.sample_rate_div);
        self.registers()?.smplrt_div().write(|w| {
            w.set_smplrt_div(config.sample_rate_div);
        })?;

        // Sampling is polled, never interrupt driven
        self.registers()?.int_cfg().write(|w| {
            w.set_raw_rdy_en(false);
            w.set_itg_rdy_en(false);
        })?;

        #[cfg(feature = "defmt")]
        defmt::debug!("PWR_MGM CLK_SEL = {}", config.clock_source.bits());
        self.registers()?.pwr_mgm().write(|w| {
            w.set_clk_sel(config.clock_source.bits());
        })?;

        Ok(())
    }

    /// Read one sample and hand it to the listener
    ///
    /// Does nothing, and touches no bus, when no listener is registered.
    /// Otherwise issues exactly one 8-byte read at `TEMP_OUT_H` and one
    /// `on_data` notification.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not connected or the read fails.
    pub fn poll(&mut self) -> Result<(), Error<I::Error>> {
        if self.listener.is_none() {
            return Ok(());
        }
        self.check_ready()?;

        self.state = State::Polling;
        let result = self.read_sample();
        self.state = State::Ready;

        self.deliver(result?);
        Ok(())
    }

    /// Read and decode one sample without notifying the listener
    ///
    /// # Errors
    ///
    /// Returns an error if no bus is bound or the read fails.
    pub fn read_sample(&mut self) -> Result<DecodedSample, Error<I::Error>> {
        let mut buffer = [0u8; SAMPLE_LEN];
        self.read_registers(address::TEMP_OUT_H, &mut buffer)?;
        Ok(RawSample(buffer).decode())
    }

    /// Read the `WHO_AM_I` register
    ///
    /// Should return 0x68 for a genuine ITG-3205.
    ///
    /// # Errors
    ///
    /// Returns an error if no bus is bound or the read fails.
    pub fn read_device_id(&mut self) -> Result<u8, Error<I::Error>> {
        let reg = self.registers()?.who_am_i().read()?;
        Ok(reg.who_am_i())
    }

    /// Check `INT_STATUS` for a new sample
    ///
    /// # Errors
    ///
    /// Returns an error if no bus is bound or the read fails.
    pub fn is_data_ready(&mut self) -> Result<bool, Error<I::Error>> {
        let reg = self.registers()?.int_status().read()?;
        Ok(reg.raw_data_rdy())
    }

    /// Write a single register, then wait out the settling delay
    ///
    /// # Errors
    ///
    /// Returns an error if no bus is bound or the write fails.
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<I::Error>> {
        self.settling()?.write_register(register, 8, &[value])?;
        Ok(())
    }

    /// Write a contiguous block starting at `register`, then wait out the
    /// settling delay once
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] for an empty block or one longer than
    /// [`MAX_BLOCK_WRITE`], otherwise an error if no bus is bound or the
    /// write fails.
    pub fn write_registers(&mut self, register: u8, values: &[u8]) -> Result<(), Error<I::Error>> {
        if values.is_empty() || values.len() > MAX_BLOCK_WRITE {
            return Err(Error::InvalidLength);
        }
        let size_bits = (values.len() * 8) as u32;
        self.settling()?.write_register(register, size_bits, values)?;
        Ok(())
    }

    /// Read `buffer.len()` contiguous registers starting at `register`
    ///
    /// # Errors
    ///
    /// Returns an error if no bus is bound or the read fails.
    pub fn read_registers(&mut self, register: u8, buffer: &mut [u8]) -> Result<(), Error<I::Error>> {
        let size_bits = (buffer.len() * 8) as u32;
        self.settling()?.read_register(register, size_bits, buffer)?;
        Ok(())
    }

    fn settling(&mut self) -> Result<SettlingInterface<'_, I, D>, Error<I::Error>> {
        let interface = self.interface.as_mut().ok_or(Error::NotConnected)?;
        Ok(SettlingInterface::new(
            interface,
            &mut self.delay,
            self.config.settle_delay_ms,
        ))
    }

    fn registers(&mut self) -> Result<RegisterDevice<SettlingInterface<'_, I, D>>, Error<I::Error>> {
        Ok(RegisterDevice::new(self.settling()?))
    }
}

#[cfg(feature = "async")]
impl<I, D, L> Itg3205Driver<I, D, L>
where
    I: device_driver::AsyncRegisterInterface<AddressType = u8>,
    D: embedded_hal_async::delay::DelayNs,
    L: Listener,
{
    /// Bind a bus interface and initialize the device
    ///
    /// Same sequence as the blocking driver; settling delays are awaited.
    ///
    /// # Errors
    ///
    /// Returns an error if a bus transaction fails (the interface is dropped
    /// and the state falls back to `Disconnected`) or if the driver was
    /// marked incompatible.
    pub async fn connect(&mut self, interface: I) -> Result<(), Error<I::Error>> {
        if self.state == State::Incompatible {
            return Err(Error::Incompatible);
        }
        self.begin_connect(interface);
        let result = self.initialize().await;
        self.finish_connect(result)
    }

    async fn initialize(&mut self) -> Result<(), Error<I::Error>> {
        let config = self.config;

        #[cfg(feature = "defmt")]
        defmt::debug!("PWR_MGM H_RESET");
        self.registers()?
            .pwr_mgm()
            .write_async(|w| {
                w.set_h_reset(true);
            })
            .await?;

        let device_id = self.read_device_id().await?;
        self.verify_identity(device_id);

        #[cfg(feature = "defmt")]
        defmt::debug!("DLPF_FS = 0x{:02X}", config.dlpf_fs_bits());
        self.registers()?
            .dlpf_fs()
            .write_async(|w| {
                w.set_fs_sel(DeviceConfig::FULL_SCALE.bits());
                w.set_dlpf_cfg(config.low_pass_filter.bits());
            })
            .await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("SMPLRT_DIV = {}", config.sample_rate_div);
        self.registers()?
            .smplrt_div()
            .write_async(|w| {
                w.set_smplrt_div(config.sample_rate_div);
            })
            .await?;

        self.registers()?
            .int_cfg()
            .write_async(|w| {
                w.set_raw_rdy_en(false);
                w.set_itg_rdy_en(false);
            })
            .await?;

        #[cfg(feature = "defmt")]
        defmt::debug!("PWR_MGM CLK_SEL = {}", config.clock_source.bits());
        self.registers()?
            .pwr_mgm()
            .write_async(|w| {
                w.set_clk_sel(config.clock_source.bits());
            })
            .await?;

        Ok(())
    }

    /// Read one sample and hand it to the listener
    ///
    /// Does nothing when no listener is registered.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver is not connected or the read fails.
    pub async fn poll(&mut self) -> Result<(), Error<I::Error>> {
        if self.listener.is_none() {
            return Ok(());
        }
        self.check_ready()?;

        self.state = State::Polling;
        let result = self.read_sample().await;
        self.state = State::Ready;

        self.deliver(result?);
        Ok(())
    }

    /// Read and decode one sample without notifying the listener
    ///
    /// # Errors
    ///
    /// Returns an error if no bus is bound or the read fails.
    pub async fn read_sample(&mut self) -> Result<DecodedSample, Error<I::Error>> {
        let mut buffer = [0u8; SAMPLE_LEN];
        self.read_registers(address::TEMP_OUT_H, &mut buffer).await?;
        Ok(RawSample(buffer).decode())
    }

    /// Read the `WHO_AM_I` register
    ///
    /// # Errors
    ///
    /// Returns an error if no bus is bound or the read fails.
    pub async fn read_device_id(&mut self) -> Result<u8, Error<I::Error>> {
        let reg = self.registers()?.who_am_i().read_async().await?;
        Ok(reg.who_am_i())
    }

    /// Check `INT_STATUS` for a new sample
    ///
    /// # Errors
    ///
    /// Returns an error if no bus is bound or the read fails.
    pub async fn is_data_ready(&mut self) -> Result<bool, Error<I::Error>> {
        let reg = self.registers()?.int_status().read_async().await?;
        Ok(reg.raw_data_rdy())
    }

    /// Write a single register, then wait out the settling delay
    ///
    /// # Errors
    ///
    /// Returns an error if no bus is bound or the write fails.
    pub async fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<I::Error>> {
        device_driver::AsyncRegisterInterface::write_register(
            &mut self.settling()?,
            register,
            8,
            &[value],
        )
        .await?;
        Ok(())
    }

    /// Write a contiguous block starting at `register`, then wait out the
    /// settling delay once
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLength`] for an empty block or one longer than
    /// [`MAX_BLOCK_WRITE`], otherwise an error if no bus is bound or the
    /// write fails.
    pub async fn write_registers(
        &mut self,
        register: u8,
        values: &[u8],
    ) -> Result<(), Error<I::Error>> {
        if values.is_empty() || values.len() > MAX_BLOCK_WRITE {
            return Err(Error::InvalidLength);
        }
        let size_bits = (values.len() * 8) as u32;
        device_driver::AsyncRegisterInterface::write_register(
            &mut self.settling()?,
            register,
            size_bits,
            values,
        )
        .await?;
        Ok(())
    }

    /// Read `buffer.len()` contiguous registers starting at `register`
    ///
    /// # Errors
    ///
    /// Returns an error if no bus is bound or the read fails.
    pub async fn read_registers(
        &mut self,
        register: u8,
        buffer: &mut [u8],
    ) -> Result<(), Error<I::Error>> {
        let size_bits = (buffer.len() * 8) as u32;
        device_driver::AsyncRegisterInterface::read_register(
            &mut self.settling()?,
            register,
            size_bits,
            buffer,
        )
        .await?;
        Ok(())
    }

    fn settling(&mut self) -> Result<SettlingInterface<'_, I, D>, Error<I::Error>> {
        let interface = self.interface.as_mut().ok_or(Error::NotConnected)?;
        Ok(SettlingInterface::new(
            interface,
            &mut self.delay,
            self.config.settle_delay_ms,
        ))
    }

    fn registers(&mut self) -> Result<RegisterDevice<SettlingInterface<'_, I, D>>, Error<I::Error>> {
        Ok(RegisterDevice::new(self.settling()?))
    }
}
