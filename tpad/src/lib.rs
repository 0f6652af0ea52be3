#![cfg_attr(not(test), no_std)]
#![doc = "Button scanning over one or more MPR121 capacitive touch controllers."]
//!
//! Every electrode of every controller is mapped to a [`ButtonId`]. The
//! [`TouchScanner`] asks the controllers that report a change for a fresh
//! snapshot and turns it into [`TouchEdge`]s.
//!
//! ```no_run
//! # use embedded_hal::i2c::I2c;
//! # fn run<I2C: I2c>(i2c: I2C) -> Result<(), tpad::Error<mpr121::Error<I2C::Error>>> {
//! use mpr121::Mpr121;
//! use tpad::{conf::SINGLE_PAD, ChipRegistry, TouchEdge, TouchScanner};
//!
//! let registry = ChipRegistry::new().with_chip(SINGLE_PAD[0], Mpr121::new(i2c));
//! let mut scanner = TouchScanner::new(registry);
//! scanner.initialize()?;
//!
//! loop {
//!     match scanner.poll(1)? {
//!         TouchEdge::Down(id) => log::info!("button {id} down"),
//!         TouchEdge::Up(id) => log::info!("button {id} up"),
//!         TouchEdge::None => {}
//!     }
//! }
//! # }
//! ```

extern crate alloc;

pub mod conf;
pub mod edge;
pub mod error;
pub mod registry;
pub mod scanner;
pub mod sensor;

#[cfg(test)]
mod mpr121_scan;

pub use conf::ChipConfig;
pub use edge::{ButtonEvent, TouchEdge};
pub use error::{ConfigError, Error};
pub use registry::{ButtonId, ChipDescriptor, ChipRegistry, Location, ELECTRODES};
pub use scanner::{NoInterrupt, TouchScanner};
pub use sensor::{ErrorKind, ErrorType, TouchSensor};
