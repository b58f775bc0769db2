//! Register definitions for the ITG-3205
//!
//! The ITG-3205 has a flat register map with no banking. Configuration
//! registers are declared with `device_driver` so they can be read and
//! written as typed field sets. The [`address`] table names every register,
//! including the individual output bytes that are only ever read as one
//! contiguous burst starting at [`address::TEMP_OUT_H`].
//!
//! Two registers are bit-packed and have pure compose/decode helpers in
//! [`bits`]:
//!
//! ```text
//! | Register | Bit 7   | Bit 6 | Bit 5   | Bit 4   | Bit 3   | Bit 2 | Bit 1   | Bit 0 |
//! | DLPF_FS  |           -             |      FS_SEL       |       DLPF_CFG        |
//! | PWR_MGM  | H_RESET | SLEEP | STBY_XG | STBY_YG | STBY_ZG |        CLK_SEL        |
//! ```

device_driver::create_device!(
    device_name: Itg3205Registers,
    dsl: {
        config {
            type RegisterAddressType = u8;
            type DefaultByteOrder = BE;
        }

        /// WHO_AM_I - Device identity (0x00)
        /// Expected value: 0x68
        register WhoAmI {
            const ADDRESS = 0x00;
            const SIZE_BITS = 8;

            /// Device identity (should read 0x68)
            who_am_i: uint = 0..8,
        },

        /// SMPLRT_DIV - Sample rate divider (0x15)
        ///
        /// F_sample = F_internal / (SMPLRT_DIV + 1)
        register SmplrtDiv {
            const ADDRESS = 0x15;
            const SIZE_BITS = 8;

            /// Sample rate divisor
            smplrt_div: uint = 0..8,
        },

        /// DLPF_FS - Low pass filter and full scale (0x16)
        register DlpfFs {
            const ADDRESS = 0x16;
            const SIZE_BITS = 8;

            /// Low pass filter bandwidth and internal sample rate
            dlpf_cfg: uint = 0..3,
            /// Full-scale range (only 3 is valid)
            fs_sel: uint = 3..5,
            reserved_7_5: uint = 5..8,
        },

        /// INT_CFG - Interrupt configuration (0x17)
        register IntCfg {
            const ADDRESS = 0x17;
            const SIZE_BITS = 8;

            /// Interrupt when new sample data is ready
            raw_rdy_en: bool = 0,
            reserved_1: uint = 1..2,
            /// Interrupt when the device (PLL) is ready
            itg_rdy_en: bool = 2,
            reserved_3: uint = 3..4,
            /// Latch clear on any register read
            int_anyrd_clear: bool = 4,
            /// Latch the interrupt until cleared
            latch_int_en: bool = 5,
            /// Open drain INT pin
            open: bool = 6,
            /// INT pin active low
            actl: bool = 7,
        },

        /// INT_STATUS - Interrupt status (0x1A)
        register IntStatus {
            const ADDRESS = 0x1A;
            const SIZE_BITS = 8;

            /// New sample data is available
            raw_data_rdy: bool = 0,
            reserved_1: uint = 1..2,
            /// PLL is ready
            itg_rdy: bool = 2,
            reserved_7_3: uint = 3..8,
        },

        /// PWR_MGM - Power management (0x3E)
        register PwrMgm {
            const ADDRESS = 0x3E;
            const SIZE_BITS = 8;

            /// Clock source select (0=internal oscillator, 1-3=gyro PLL, 4-5=external PLL)
            clk_sel: uint = 0..3,
            /// Z gyro standby
            stby_zg: bool = 3,
            /// Y gyro standby
            stby_yg: bool = 4,
            /// X gyro standby
            stby_xg: bool = 5,
            /// Low power sleep mode
            sleep: bool = 6,
            /// Soft reset to power-up defaults
            h_reset: bool = 7,
        }
    }
);

// Re-export commonly used types for convenience
pub use Itg3205Registers as RegisterDevice;

/// Register addresses
pub mod address {
    /// Device identity
    pub const WHO_AM_I: u8 = 0x00;
    /// Sample rate divider
    pub const SMPLRT_DIV: u8 = 0x15;
    /// Low pass filter and full scale
    pub const DLPF_FS: u8 = 0x16;
    /// Interrupt configuration
    pub const INT_CFG: u8 = 0x17;
    /// Interrupt status
    pub const INT_STATUS: u8 = 0x1A;
    /// Temperature, high byte
    pub const TEMP_OUT_H: u8 = 0x1B;
    /// Temperature, low byte
    pub const TEMP_OUT_L: u8 = 0x1C;
    /// X rate, high byte
    pub const GYRO_XOUT_H: u8 = 0x1D;
    /// X rate, low byte
    pub const GYRO_XOUT_L: u8 = 0x1E;
    /// Y rate, high byte
    pub const GYRO_YOUT_H: u8 = 0x1F;
    /// Y rate, low byte
    pub const GYRO_YOUT_L: u8 = 0x20;
    /// Z rate, high byte
    pub const GYRO_ZOUT_H: u8 = 0x21;
    /// Z rate, low byte
    pub const GYRO_ZOUT_L: u8 = 0x22;
    /// Power management
    pub const PWR_MGM: u8 = 0x3E;
}

/// Bit layouts of `DLPF_FS` and `PWR_MGM`
pub mod bits {
    /// `FS_SEL` field position in `DLPF_FS`
    pub const FS_SEL_SHIFT: u8 = 3;
    /// `FS_SEL` field mask (unshifted)
    pub const FS_SEL_MASK: u8 = 0b11;
    /// `DLPF_CFG` field mask
    pub const DLPF_CFG_MASK: u8 = 0b111;

    /// Soft reset
    pub const H_RESET: u8 = 1 << 7;
    /// Sleep mode
    pub const SLEEP: u8 = 1 << 6;
    /// X gyro standby
    pub const STBY_XG: u8 = 1 << 5;
    /// Y gyro standby
    pub const STBY_YG: u8 = 1 << 4;
    /// Z gyro standby
    pub const STBY_ZG: u8 = 1 << 3;
    /// `CLK_SEL` field mask
    pub const CLK_SEL_MASK: u8 = 0b111;
    /// `CLK_SEL` value for the free-running internal oscillator
    pub const CLK_SEL_INTERNAL: u8 = 0;

    /// Compose a `DLPF_FS` value from its two fields
    ///
    /// Out-of-range field values are truncated to their field width.
    #[must_use]
    pub const fn dlpf_fs(fs_sel: u8, dlpf_cfg: u8) -> u8 {
        ((fs_sel & FS_SEL_MASK) << FS_SEL_SHIFT) | (dlpf_cfg & DLPF_CFG_MASK)
    }

    /// Extract `FS_SEL` (bits 4:3) from a `DLPF_FS` value
    #[must_use]
    pub const fn fs_sel(value: u8) -> u8 {
        (value >> FS_SEL_SHIFT) & FS_SEL_MASK
    }

    /// Extract `DLPF_CFG` (bits 2:0) from a `DLPF_FS` value
    #[must_use]
    pub const fn dlpf_cfg(value: u8) -> u8 {
        value & DLPF_CFG_MASK
    }

    /// Decoded contents of `PWR_MGM`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[cfg_attr(feature = "defmt", derive(defmt::Format))]
    pub struct PowerManagement {
        /// Soft reset requested
        pub h_reset: bool,
        /// Sleep mode
        pub sleep: bool,
        /// X gyro in standby
        pub standby_x: bool,
        /// Y gyro in standby
        pub standby_y: bool,
        /// Z gyro in standby
        pub standby_z: bool,
        /// Raw `CLK_SEL` value (0-7)
        pub clk_sel: u8,
    }

    impl PowerManagement {
        /// Decode a raw `PWR_MGM` value
        #[must_use]
        pub const fn from_bits(value: u8) -> Self {
            Self {
                h_reset: value & H_RESET != 0,
                sleep: value & SLEEP != 0,
                standby_x: value & STBY_XG != 0,
                standby_y: value & STBY_YG != 0,
                standby_z: value & STBY_ZG != 0,
                clk_sel: value & CLK_SEL_MASK,
            }
        }

        /// Encode into a raw `PWR_MGM` value
        #[must_use]
        pub const fn bits(&self) -> u8 {
            let mut value = self.clk_sel & CLK_SEL_MASK;
            if self.h_reset {
                value |= H_RESET;
            }
            if self.sleep {
                value |= SLEEP;
            }
            if self.standby_x {
                value |= STBY_XG;
            }
            if self.standby_y {
                value |= STBY_YG;
            }
            if self.standby_z {
                value |= STBY_ZG;
            }
            value
        }
    }
}
