//! Register settings applied by [`Mpr121::init`](crate::Mpr121::init).

/// Baseline filter coefficients for one direction (rising, falling or touched).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    /// Maximum half delta.
    pub mhd: u8,
    /// Noise half delta.
    pub nhd: u8,
    /// Noise count limit.
    pub ncl: u8,
    /// Filter delay count limit.
    pub fdl: u8,
}

/// Configuration written to the controller after a reset.
///
/// The defaults are the values the MPR121 application notes recommend for
/// bare electrodes behind a thin overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Baseline filter while the data is above the baseline.
    pub rising: FilterConfig,
    /// Baseline filter while the data is below the baseline.
    pub falling: FilterConfig,
    /// Baseline filter while an electrode is touched. `mhd` is unused.
    pub touched: FilterConfig,
    /// Touch threshold programmed into every electrode before the caller's own.
    pub touch_threshold: u8,
    /// Release threshold programmed into every electrode before the caller's own.
    pub release_threshold: u8,
    /// Debounce register, release count in bits 6:4, touch count in bits 2:0.
    pub debounce: u8,
    /// AFE configuration 1 (first filter iterations, charge current).
    pub afe1: u8,
    /// AFE configuration 2 (charge time, second filter iterations, sample interval).
    pub afe2: u8,
    /// Electrode configuration used in run mode. The low nibble is the
    /// number of enabled electrodes.
    pub ecr: u8,
    /// Auto-configuration control 0.
    pub auto_config_0: u8,
    /// Auto-configuration control 1.
    pub auto_config_1: u8,
    /// Auto-configuration up-side limit.
    pub up_side_limit: u8,
    /// Auto-configuration low-side limit.
    pub low_side_limit: u8,
    /// Auto-configuration target level.
    pub target_level: u8,
}

impl Settings {
    pub const fn new() -> Self {
        Self {
            rising: FilterConfig {
                mhd: 0x01,
                nhd: 0x01,
                ncl: 0x10,
                fdl: 0x20,
            },
            falling: FilterConfig {
                mhd: 0x01,
                nhd: 0x01,
                ncl: 0x10,
                fdl: 0x20,
            },
            touched: FilterConfig {
                mhd: 0x00,
                nhd: 0x01,
                ncl: 0x10,
                fdl: 0xFF,
            },
            touch_threshold: 40,
            release_threshold: 20,
            debounce: 0x11,
            afe1: 0xFF,
            afe2: 0x30,
            // Baseline tracking on, 12 electrodes, proximity off.
            ecr: 0xCC,
            auto_config_0: 0x00,
            auto_config_1: 0x00,
            up_side_limit: 0x00,
            low_side_limit: 0x00,
            target_level: 0x00,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}
