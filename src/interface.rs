//! Bus interface implementations for the ITG-3205
//!
//! [`I2cInterface`] adapts an `embedded-hal` I2C bus to the `device-driver`
//! register traits. Every register read is a single `write_read` transaction
//! (register select followed immediately by the sized read), and every
//! register write is a single `write` of the register address followed by
//! the payload.
//!
//! [`SettlingInterface`] wraps any register interface together with a delay
//! provider and blocks for the settling delay after each write. The driver
//! only ever talks to the device through it.

use crate::I2C_ADDRESS_AD0_HIGH;

use device_driver::RegisterInterface;

/// Largest payload accepted by one block write
pub const MAX_BLOCK_WRITE: usize = 32;

/// I2C interface for the ITG-3205
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface with the default address (0x69, AD0 pin HIGH)
    ///
    /// Most ITG-3205 breakout boards tie AD0 to VDD.
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::default(i2c);
    /// driver.connect(interface)?;
    /// ```
    pub const fn default(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS_AD0_HIGH,
        }
    }

    /// Create a new I2C interface with the alternative address (0x68, AD0 pin LOW)
    pub const fn alternative(i2c: I2C) -> Self {
        Self {
            i2c,
            address: crate::I2C_ADDRESS_AD0_LOW,
        }
    }

    /// Create a new I2C interface with a custom 7-bit device address
    pub const fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Device address used for every transaction
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c.write_read(self.address, &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len() for I2C
        let mut buffer = [0u8; MAX_BLOCK_WRITE + 1];
        buffer[0] = address;
        let len = write_data.len().min(MAX_BLOCK_WRITE);
        buffer[1..=len].copy_from_slice(&write_data[..len]);

        self.i2c.write(self.address, &buffer[..=len])
    }
}

#[cfg(feature = "async")]
impl<I2C, E> device_driver::AsyncRegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal_async::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c
            .write_read(self.address, &[address], read_data)
            .await
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len() for I2C
        let mut buffer = [0u8; MAX_BLOCK_WRITE + 1];
        buffer[0] = address;
        let len = write_data.len().min(MAX_BLOCK_WRITE);
        buffer[1..=len].copy_from_slice(&write_data[..len]);

        self.i2c.write(self.address, &buffer[..=len]).await
    }
}

/// Register interface that waits out the settling delay after every write
///
/// Reads pass straight through with no delay.
pub struct SettlingInterface<'a, I, D> {
    interface: &'a mut I,
    delay: &'a mut D,
    settle_delay_ms: u32,
}

impl<'a, I, D> SettlingInterface<'a, I, D> {
    /// Borrow an interface and delay provider for a sequence of transactions
    pub fn new(interface: &'a mut I, delay: &'a mut D, settle_delay_ms: u32) -> Self {
        Self {
            interface,
            delay,
            settle_delay_ms,
        }
    }
}

impl<I, D> RegisterInterface for SettlingInterface<'_, I, D>
where
    I: RegisterInterface<AddressType = u8>,
    D: embedded_hal::delay::DelayNs,
{
    type Error = I::Error;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.interface.read_register(address, size_bits, read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        self.interface
            .write_register(address, size_bits, write_data)?;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "Wrote {} byte(s) at 0x{:02X}, settling {} ms",
            write_data.len(),
            address,
            self.settle_delay_ms
        );

        if self.settle_delay_ms > 0 {
            self.delay.delay_ms(self.settle_delay_ms);
        }
        Ok(())
    }
}

#[cfg(feature = "async")]
impl<I, D> device_driver::AsyncRegisterInterface for SettlingInterface<'_, I, D>
where
    I: device_driver::AsyncRegisterInterface<AddressType = u8>,
    D: embedded_hal_async::delay::DelayNs,
{
    type Error = I::Error;
    type AddressType = u8;

    async fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        self.interface
            .read_register(address, size_bits, read_data)
            .await
    }

    async fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        self.interface
            .write_register(address, size_bits, write_data)
            .await?;

        #[cfg(feature = "defmt")]
        defmt::trace!(
            "Wrote {} byte(s) at 0x{:02X}, settling {} ms",
            write_data.len(),
            address,
            self.settle_delay_ms
        );

        if self.settle_delay_ms > 0 {
            self.delay.delay_ms(self.settle_delay_ms).await;
        }
        Ok(())
    }
}
