//! Error types for the MPR121 driver.

use core::fmt::{self, Debug, Display};
use embedded_hal::i2c::{self, NoAcknowledgeSource};

/// The reason a controller failed, independent of the bus implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The last operation succeeded.
    None,
    /// Nothing answered at the address, or the address is not an MPR121 address.
    UnknownAddress,
    /// A register did not read back its reset value.
    ReadbackFailure,
    /// The controller reports over-current on the REXT pin.
    OvercurrentFlag,
    /// The electrode index does not exist on the controller.
    OutOfRange,
    /// The controller was used before a successful `init`.
    NotInitialized,
    /// Any other bus failure.
    Unknown,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            Self::None => "no error",
            Self::UnknownAddress => "incorrect address",
            Self::ReadbackFailure => "readback failure",
            Self::OvercurrentFlag => "overcurrent on REXT pin",
            Self::OutOfRange => "electrode out of range",
            Self::NotInitialized => "not initialised",
            Self::Unknown => "unknown error",
        };
        f.write_str(reason)
    }
}

/// The main error type for the MPR121 driver.
pub enum Error<TI2CERR> {
    /// The I2C transaction failed.
    I2c(TI2CERR),
    /// The controller answered, but not the way it should.
    Device(ErrorKind),
}

impl<TI2CERR: i2c::Error> Error<TI2CERR> {
    /// Classifies the error. Address NACKs mean nothing is wired at the address.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Device(kind) => *kind,
            Self::I2c(err) => match err.kind() {
                i2c::ErrorKind::NoAcknowledge(
                    NoAcknowledgeSource::Address | NoAcknowledgeSource::Unknown,
                ) => ErrorKind::UnknownAddress,
                _ => ErrorKind::Unknown,
            },
        }
    }
}

impl<TI2CERR: Debug> Debug for Error<TI2CERR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(err) => write!(f, "I2c({err:?})"),
            Self::Device(kind) => write!(f, "Device({kind:?})"),
        }
    }
}

impl<TI2CERR: Debug> Display for Error<TI2CERR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::I2c(err) => write!(f, "i2c error: {err:?}"),
            Self::Device(kind) => Display::fmt(kind, f),
        }
    }
}

impl<TI2CERR> From<ErrorKind> for Error<TI2CERR> {
    fn from(kind: ErrorKind) -> Self {
        Error::Device(kind)
    }
}
