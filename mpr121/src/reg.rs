//! MPR121 register map.
//!
//! Only the registers the driver touches are listed. Multi-byte values are
//! little-endian and the address pointer auto-increments on reads.

/// Touch status, electrodes 0-7.
pub const TOUCH_STATUS_L: u8 = 0x00;
/// Touch status, electrodes 8-12 and the over-current flag (bit 7).
pub const TOUCH_STATUS_H: u8 = 0x01;
/// Out-of-range status, electrodes 0-7.
pub const OOR_STATUS_L: u8 = 0x02;

/// Filtered data of electrode 0, LSB. Each electrode takes two registers.
pub const FILTERED_DATA_0: u8 = 0x04;
/// Baseline value of electrode 0. One register per electrode.
pub const BASELINE_0: u8 = 0x1E;

// Baseline filter, rising / falling / touched.
pub const MHD_RISING: u8 = 0x2B;
pub const NHD_RISING: u8 = 0x2C;
pub const NCL_RISING: u8 = 0x2D;
pub const FDL_RISING: u8 = 0x2E;
pub const MHD_FALLING: u8 = 0x2F;
pub const NHD_FALLING: u8 = 0x30;
pub const NCL_FALLING: u8 = 0x31;
pub const FDL_FALLING: u8 = 0x32;
pub const NHD_TOUCHED: u8 = 0x33;
pub const NCL_TOUCHED: u8 = 0x34;
pub const FDL_TOUCHED: u8 = 0x35;

/// Touch threshold of electrode 0. Electrode `n` lives at `+ 2 * n`.
pub const TOUCH_THRESHOLD_0: u8 = 0x41;
/// Release threshold of electrode 0. Electrode `n` lives at `+ 2 * n`.
pub const RELEASE_THRESHOLD_0: u8 = 0x42;

/// Touch / release debounce.
pub const DEBOUNCE: u8 = 0x5B;
/// Filter / global charge-discharge current.
pub const AFE_CONFIG_1: u8 = 0x5C;
/// Filter / global charge-discharge time.
pub const AFE_CONFIG_2: u8 = 0x5D;
/// Electrode configuration. Writing zero puts the chip in stop mode.
pub const ELECTRODE_CONFIG: u8 = 0x5E;

// Auto-configuration.
pub const AUTO_CONFIG_0: u8 = 0x7B;
pub const AUTO_CONFIG_1: u8 = 0x7C;
pub const UP_SIDE_LIMIT: u8 = 0x7D;
pub const LOW_SIDE_LIMIT: u8 = 0x7E;
pub const TARGET_LEVEL: u8 = 0x7F;

/// Soft reset. Writing [`SOFT_RESET_MAGIC`] resets every register.
pub const SOFT_RESET: u8 = 0x80;
pub const SOFT_RESET_MAGIC: u8 = 0x63;

/// Value of [`AFE_CONFIG_2`] right after a reset.
pub const AFE_CONFIG_2_RESET: u8 = 0x24;

/// Over-current flag in the 16 bit touch status word.
pub const OVERCURRENT_FLAG: u16 = 1 << 15;
/// Electrode bits (0-12) in the 16 bit touch status word.
pub const TOUCH_MASK: u16 = 0x1FFF;
