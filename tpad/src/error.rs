//! Error types for the touch pad.

use core::fmt::{self, Debug, Display};

use crate::registry::{ButtonId, Location};
use crate::sensor::{self, ErrorKind};

/// A chip table the scanner refuses to run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The registry has no chips.
    EmptyRegistry,
    /// The address does not fit in 7 bits.
    InvalidAddress { chip: usize, address: u8 },
    /// Two chips share a bus address.
    DuplicateAddress {
        first: usize,
        second: usize,
        address: u8,
    },
    /// The release threshold is not below the touch threshold; the electrode
    /// would oscillate.
    ThresholdOrder {
        location: Location,
        touch: u8,
        release: u8,
    },
    /// A button is mapped to more than one electrode.
    DuplicateId {
        id: ButtonId,
        first: Location,
        second: Location,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyRegistry => f.write_str("no chips configured"),
            Self::InvalidAddress { chip, address } => {
                write!(f, "chip {chip}: address {address:#04x} is not a 7-bit address")
            }
            Self::DuplicateAddress {
                first,
                second,
                address,
            } => write!(f, "chips {first} and {second} share address {address:#04x}"),
            Self::ThresholdOrder {
                location,
                touch,
                release,
            } => write!(
                f,
                "chip {} electrode {}: release threshold {release} is not below touch threshold {touch}",
                location.chip, location.electrode
            ),
            Self::DuplicateId { id, first, second } => write!(
                f,
                "button {id} is mapped to chip {} electrode {} and chip {} electrode {}",
                first.chip, first.electrode, second.chip, second.electrode
            ),
        }
    }
}

/// The main error type of the scanner, generic over the sensor error.
#[derive(PartialEq)]
pub enum Error<TSENSORERR> {
    /// The chip table is inconsistent. Nothing was sent to any chip.
    Config(ConfigError),
    /// `poll` was called without a successful `initialize`.
    NotInitialized,
    /// A chip failed. `chip` is its index in the registry.
    Sensor { chip: usize, source: TSENSORERR },
}

impl<TSENSORERR: sensor::Error> Error<TSENSORERR> {
    /// The driver-level reason, if the error came from (or concerns) a chip.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Config(_) => None,
            Self::NotInitialized => Some(ErrorKind::NotInitialized),
            Self::Sensor { source, .. } => Some(source.kind()),
        }
    }
}

impl<TSENSORERR: Debug> Debug for Error<TSENSORERR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "Config({err:?})"),
            Self::NotInitialized => write!(f, "NotInitialized"),
            Self::Sensor { chip, source } => write!(f, "Sensor({chip}, {source:?})"),
        }
    }
}

impl<TSENSORERR: Debug> Display for Error<TSENSORERR> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::NotInitialized => f.write_str("touch pad not initialised"),
            Self::Sensor { chip, source } => write!(f, "touch controller #{chip}: {source:?}"),
        }
    }
}

impl<TSENSORERR> From<ConfigError> for Error<TSENSORERR> {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}
