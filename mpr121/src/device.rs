//! Core implementation of the MPR121 driver.

use core::ops::RangeInclusive;
use embedded_hal::i2c::{I2c, SevenBitAddress};
use heapless::Vec;

use crate::conf::Settings;
use crate::err::{Error, ErrorKind};
use crate::reg;

/// Address with the ADDR pin tied to VSS.
pub const DEFAULT_ADDRESS: SevenBitAddress = 0x5A;

/// Every address an MPR121 can be strapped to.
pub const ADDRESSES: RangeInclusive<SevenBitAddress> = 0x5A..=0x5D;

/// Sensing electrodes per controller. The 13th channel is the proximity electrode.
pub const ELECTRODES: usize = 12;

/// Highest channel index the controller accepts, proximity electrode included.
const LAST_CHANNEL: u8 = 12;

/// A driver for one MPR121 on an I2C bus.
pub struct Mpr121<I2C> {
    i2c: I2C,
    settings: Settings,
    address: Option<SevenBitAddress>,
    running: bool,
    touch: u16,
    previous: u16,
    /// Status word read by `touch_status_changed` that `refresh` has not consumed yet.
    latched: Option<u16>,
    interrupt_line: Option<u8>,
    last_error: ErrorKind,
}

impl<I2C: I2c> Mpr121<I2C> {
    /// Creates a new `Mpr121` with the default [`Settings`].
    ///
    /// Nothing is sent on the bus until [`Mpr121::init`].
    pub fn new(i2c: I2C) -> Self {
        Self::with_settings(i2c, Settings::default())
    }

    /// Creates a new `Mpr121` that applies `settings` on [`Mpr121::init`].
    pub fn with_settings(i2c: I2C, settings: Settings) -> Self {
        Self {
            i2c,
            settings,
            address: None,
            running: false,
            touch: 0,
            previous: 0,
            latched: None,
            interrupt_line: None,
            last_error: ErrorKind::NotInitialized,
        }
    }

    /// Resets and configures the controller at `address`, then starts it.
    ///
    /// The reset is verified by reading back AFE configuration 2, and the
    /// over-current flag is checked before any setting is written.
    pub fn init(&mut self, address: SevenBitAddress) -> Result<(), Error<I2C::Error>> {
        let result = self.try_init(address);
        self.last_error = match &result {
            Ok(()) => ErrorKind::None,
            Err(err) => err.kind(),
        };
        result
    }

    fn try_init(&mut self, address: SevenBitAddress) -> Result<(), Error<I2C::Error>> {
        self.address = None;
        self.running = false;
        self.latched = None;
        self.touch = 0;
        self.previous = 0;

        if !ADDRESSES.contains(&address) {
            return Err(ErrorKind::UnknownAddress.into());
        }

        self.write_register_at(address, reg::SOFT_RESET, reg::SOFT_RESET_MAGIC)?;

        let mut afe2 = [0u8; 1];
        self.read_registers_at(address, reg::AFE_CONFIG_2, &mut afe2)?;
        if afe2[0] != reg::AFE_CONFIG_2_RESET {
            log::warn!(
                "mpr121 {address:#04x}: AFE config 2 reads {:#04x} after reset",
                afe2[0]
            );
            return Err(ErrorKind::ReadbackFailure.into());
        }

        let mut status = [0u8; 2];
        self.read_registers_at(address, reg::TOUCH_STATUS_L, &mut status)?;
        if u16::from_le_bytes(status) & reg::OVERCURRENT_FLAG != 0 {
            return Err(ErrorKind::OvercurrentFlag.into());
        }

        self.address = Some(address);
        self.apply_settings()?;
        log::debug!("mpr121 {address:#04x}: running");
        Ok(())
    }

    /// The reason the last [`Mpr121::init`] failed, [`ErrorKind::None`] if it succeeded.
    pub fn last_error(&self) -> ErrorKind {
        self.last_error
    }

    /// The address the controller was initialised at.
    pub fn address(&self) -> Option<SevenBitAddress> {
        self.address
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Records the host input line the controller's IRQ output is wired to.
    ///
    /// The IRQ output is always enabled on the MPR121; the line number is kept
    /// so the owner of the pin can tell which controllers share it.
    pub fn set_interrupt_line(&mut self, line: u8) {
        self.interrupt_line = Some(line);
    }

    pub fn interrupt_line(&self) -> Option<u8> {
        self.interrupt_line
    }

    /// Sets the touch threshold of one electrode.
    pub fn set_touch_threshold(
        &mut self,
        electrode: u8,
        value: u8,
    ) -> Result<(), Error<I2C::Error>> {
        self.write_electrode_register(reg::TOUCH_THRESHOLD_0, electrode, value)
    }

    /// Sets the release threshold of one electrode.
    ///
    /// This should always be lower than the touch threshold, otherwise the
    /// electrode oscillates between touched and released.
    pub fn set_release_threshold(
        &mut self,
        electrode: u8,
        value: u8,
    ) -> Result<(), Error<I2C::Error>> {
        self.write_electrode_register(reg::RELEASE_THRESHOLD_0, electrode, value)
    }

    /// Reads the touch status and reports whether it differs from the last [`Mpr121::refresh`].
    ///
    /// The sample is kept, so a following `refresh` does not read the bus again.
    pub fn touch_status_changed(&mut self) -> Result<bool, Error<I2C::Error>> {
        let status = self.read_touch_status()?;
        self.latched = Some(status);
        Ok(status != self.touch)
    }

    /// Takes a new touch snapshot. The previous one is kept for edge detection.
    pub fn refresh(&mut self) -> Result<(), Error<I2C::Error>> {
        let status = match self.latched.take() {
            Some(status) => status,
            None => self.read_touch_status()?,
        };
        self.previous = self.touch;
        self.touch = status;
        Ok(())
    }

    /// Whether `electrode` is touched in the current snapshot.
    pub fn is_touched(&self, electrode: u8) -> bool {
        electrode <= LAST_CHANNEL && self.touch & (1 << electrode) != 0
    }

    /// Whether `electrode` went from released to touched between the last two snapshots.
    pub fn is_new_touch(&self, electrode: u8) -> bool {
        self.is_touched(electrode) && self.previous & (1 << electrode) == 0
    }

    /// Whether `electrode` went from touched to released between the last two snapshots.
    pub fn is_new_release(&self, electrode: u8) -> bool {
        electrode <= LAST_CHANNEL
            && self.previous & (1 << electrode) != 0
            && !self.is_touched(electrode)
    }

    /// Every electrode touched in the current snapshot.
    pub fn touched(&self) -> Vec<u8, { ELECTRODES + 1 }> {
        (0..=LAST_CHANNEL)
            .filter(|electrode| self.is_touched(*electrode))
            .collect()
    }

    pub fn touch_count(&self) -> u32 {
        self.touch.count_ones()
    }

    /// Reads the 10 bit filtered data of one electrode. Useful when tuning thresholds.
    pub fn filtered_data(&mut self, electrode: u8) -> Result<u16, Error<I2C::Error>> {
        let address = self.checked_address(electrode)?;
        let mut data = [0u8; 2];
        self.read_registers_at(address, reg::FILTERED_DATA_0 + 2 * electrode, &mut data)?;
        Ok(u16::from_le_bytes(data) & 0x03FF)
    }

    /// Reads the baseline of one electrode, scaled to the filtered data range.
    pub fn baseline(&mut self, electrode: u8) -> Result<u16, Error<I2C::Error>> {
        let address = self.checked_address(electrode)?;
        let mut data = [0u8; 1];
        self.read_registers_at(address, reg::BASELINE_0 + electrode, &mut data)?;
        Ok(u16::from(data[0]) << 2)
    }

    /// Puts the electrodes in stop mode. Configuration registers can only be
    /// written in this mode.
    pub fn stop(&mut self) -> Result<(), Error<I2C::Error>> {
        let address = self.initialized_address()?;
        self.write_register_at(address, reg::ELECTRODE_CONFIG, 0x00)?;
        self.running = false;
        Ok(())
    }

    /// Puts the electrodes back in run mode with the configured electrode count.
    pub fn run(&mut self) -> Result<(), Error<I2C::Error>> {
        let address = self.initialized_address()?;
        self.write_register_at(address, reg::ELECTRODE_CONFIG, self.settings.ecr)?;
        self.running = true;
        Ok(())
    }

    /// Gives the bus back.
    pub fn release(self) -> I2C {
        self.i2c
    }

    fn apply_settings(&mut self) -> Result<(), Error<I2C::Error>> {
        let address = self.initialized_address()?;
        let s = self.settings;

        self.stop()?;
        let registers = [
            (reg::MHD_RISING, s.rising.mhd),
            (reg::NHD_RISING, s.rising.nhd),
            (reg::NCL_RISING, s.rising.ncl),
            (reg::FDL_RISING, s.rising.fdl),
            (reg::MHD_FALLING, s.falling.mhd),
            (reg::NHD_FALLING, s.falling.nhd),
            (reg::NCL_FALLING, s.falling.ncl),
            (reg::FDL_FALLING, s.falling.fdl),
            (reg::NHD_TOUCHED, s.touched.nhd),
            (reg::NCL_TOUCHED, s.touched.ncl),
            (reg::FDL_TOUCHED, s.touched.fdl),
            (reg::DEBOUNCE, s.debounce),
            (reg::AFE_CONFIG_1, s.afe1),
            (reg::AFE_CONFIG_2, s.afe2),
            (reg::AUTO_CONFIG_0, s.auto_config_0),
            (reg::AUTO_CONFIG_1, s.auto_config_1),
            (reg::UP_SIDE_LIMIT, s.up_side_limit),
            (reg::LOW_SIDE_LIMIT, s.low_side_limit),
            (reg::TARGET_LEVEL, s.target_level),
        ];
        for (register, value) in registers {
            self.write_register_at(address, register, value)?;
        }
        for electrode in 0..=LAST_CHANNEL {
            self.write_register_at(
                address,
                reg::TOUCH_THRESHOLD_0 + 2 * electrode,
                s.touch_threshold,
            )?;
            self.write_register_at(
                address,
                reg::RELEASE_THRESHOLD_0 + 2 * electrode,
                s.release_threshold,
            )?;
        }
        self.run()
    }

    fn write_electrode_register(
        &mut self,
        base: u8,
        electrode: u8,
        value: u8,
    ) -> Result<(), Error<I2C::Error>> {
        let address = self.checked_address(electrode)?;
        let was_running = self.running;
        if was_running {
            self.stop()?;
        }
        // Back to run mode even if the write failed.
        let written = self.write_register_at(address, base + 2 * electrode, value);
        if was_running {
            self.run()?;
        }
        written
    }

    fn read_touch_status(&mut self) -> Result<u16, Error<I2C::Error>> {
        let address = self.initialized_address()?;
        let mut status = [0u8; 2];
        self.read_registers_at(address, reg::TOUCH_STATUS_L, &mut status)?;
        let status = u16::from_le_bytes(status);
        if status & reg::OVERCURRENT_FLAG != 0 {
            return Err(ErrorKind::OvercurrentFlag.into());
        }
        Ok(status & reg::TOUCH_MASK)
    }

    fn initialized_address(&self) -> Result<SevenBitAddress, Error<I2C::Error>> {
        self.address.ok_or(Error::Device(ErrorKind::NotInitialized))
    }

    fn checked_address(&self, electrode: u8) -> Result<SevenBitAddress, Error<I2C::Error>> {
        let address = self.initialized_address()?;
        if electrode > LAST_CHANNEL {
            return Err(ErrorKind::OutOfRange.into());
        }
        Ok(address)
    }

    fn read_registers_at(
        &mut self,
        address: SevenBitAddress,
        register: u8,
        buf: &mut [u8],
    ) -> Result<(), Error<I2C::Error>> {
        self.i2c
            .write_read(address, &[register], buf)
            .map_err(Error::I2c)
    }

    fn write_register_at(
        &mut self,
        address: SevenBitAddress,
        register: u8,
        value: u8,
    ) -> Result<(), Error<I2C::Error>> {
        log::trace!("mpr121 {address:#04x}: {register:#04x} <- {value:#04x}");
        self.i2c
            .write(address, &[register, value])
            .map_err(Error::I2c)
    }
}
