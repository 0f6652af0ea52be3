//! The driver contract the scanner is written against.
//!
//! The traits follow the `embedded-hal` pattern: [`ErrorType`] names the
//! driver's error, and every error can be classified into an [`ErrorKind`]
//! regardless of the bus underneath.

use embedded_hal::i2c::{I2c, SevenBitAddress};
use mpr121::Mpr121;

pub use mpr121::ErrorKind;

/// Sensor error.
pub trait Error: core::fmt::Debug {
    /// Convert the error to a generic sensor error kind.
    fn kind(&self) -> ErrorKind;
}

impl Error for ErrorKind {
    fn kind(&self) -> ErrorKind {
        *self
    }
}

impl<E: embedded_hal::i2c::Error> Error for mpr121::Error<E> {
    fn kind(&self) -> ErrorKind {
        mpr121::Error::kind(self)
    }
}

/// Sensor error type trait.
pub trait ErrorType {
    type Error: Error;
}

/// One capacitive touch controller.
///
/// Edge predicates answer against the snapshot taken by the last
/// [`TouchSensor::refresh_data`]; for one electrode at most one of them is true.
pub trait TouchSensor: ErrorType {
    /// Brings up the controller at `address`. A failure carries the reason.
    fn open(&mut self, address: SevenBitAddress) -> Result<(), Self::Error>;

    /// Routes the controller's data-ready signal to host input `line`.
    fn set_interrupt_routing(&mut self, line: u8) -> Result<(), Self::Error>;

    fn set_touch_threshold(&mut self, electrode: u8, value: u8) -> Result<(), Self::Error>;

    fn set_release_threshold(&mut self, electrode: u8, value: u8) -> Result<(), Self::Error>;

    /// Takes a new touch snapshot from the controller.
    fn refresh_data(&mut self) -> Result<(), Self::Error>;

    /// Whether the touch status moved since the last snapshot.
    fn status_changed(&mut self) -> Result<bool, Self::Error>;

    fn is_new_touch(&self, electrode: u8) -> bool;

    fn is_new_release(&self, electrode: u8) -> bool;
}

impl<I2C: I2c> ErrorType for Mpr121<I2C> {
    type Error = mpr121::Error<I2C::Error>;
}

impl<I2C: I2c> TouchSensor for Mpr121<I2C> {
    fn open(&mut self, address: SevenBitAddress) -> Result<(), Self::Error> {
        self.init(address)
    }

    fn set_interrupt_routing(&mut self, line: u8) -> Result<(), Self::Error> {
        self.set_interrupt_line(line);
        Ok(())
    }

    fn set_touch_threshold(&mut self, electrode: u8, value: u8) -> Result<(), Self::Error> {
        Mpr121::set_touch_threshold(self, electrode, value)
    }

    fn set_release_threshold(&mut self, electrode: u8, value: u8) -> Result<(), Self::Error> {
        Mpr121::set_release_threshold(self, electrode, value)
    }

    fn refresh_data(&mut self) -> Result<(), Self::Error> {
        self.refresh()
    }

    fn status_changed(&mut self) -> Result<bool, Self::Error> {
        self.touch_status_changed()
    }

    fn is_new_touch(&self, electrode: u8) -> bool {
        Mpr121::is_new_touch(self, electrode)
    }

    fn is_new_release(&self, electrode: u8) -> bool {
        Mpr121::is_new_release(self, electrode)
    }
}

impl<T: ErrorType + ?Sized> ErrorType for &mut T {
    type Error = T::Error;
}

impl<T: TouchSensor + ?Sized> TouchSensor for &mut T {
    fn open(&mut self, address: SevenBitAddress) -> Result<(), Self::Error> {
        T::open(self, address)
    }

    fn set_interrupt_routing(&mut self, line: u8) -> Result<(), Self::Error> {
        T::set_interrupt_routing(self, line)
    }

    fn set_touch_threshold(&mut self, electrode: u8, value: u8) -> Result<(), Self::Error> {
        T::set_touch_threshold(self, electrode, value)
    }

    fn set_release_threshold(&mut self, electrode: u8, value: u8) -> Result<(), Self::Error> {
        T::set_release_threshold(self, electrode, value)
    }

    fn refresh_data(&mut self) -> Result<(), Self::Error> {
        T::refresh_data(self)
    }

    fn status_changed(&mut self) -> Result<bool, Self::Error> {
        T::status_changed(self)
    }

    fn is_new_touch(&self, electrode: u8) -> bool {
        T::is_new_touch(self, electrode)
    }

    fn is_new_release(&self, electrode: u8) -> bool {
        T::is_new_release(self, electrode)
    }
}
