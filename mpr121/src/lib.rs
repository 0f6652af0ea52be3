//! A blocking, `no_std` driver for the NXP MPR121 capacitive touch controller.
//!
//! This driver provides an `Mpr121` handle for one controller on an I2C bus.
//! It resets and configures the controller, programs per-electrode touch and
//! release thresholds, and turns the controller's touch status register into
//! new-touch / new-release edges.
//!
//! Up to four controllers can share a bus (addresses `0x5A..=0x5D`, selected
//! with the ADDR pin). Use a shared bus implementation such as
//! `embedded_bus::MutexI2cDevice` to hand each `Mpr121` its own `I2c`.
//!
//! # Usage
//!
//! ```no_run
//! use embedded_hal::i2c::I2c;
//! use mpr121::{Mpr121, DEFAULT_ADDRESS};
//!
//! fn watch<I: I2c>(i2c: I) -> Result<(), mpr121::Error<I::Error>> {
//!     let mut pad = Mpr121::new(i2c);
//!     pad.init(DEFAULT_ADDRESS)?;
//!     pad.set_touch_threshold(0, 10)?;
//!     pad.set_release_threshold(0, 5)?;
//!
//!     loop {
//!         if pad.touch_status_changed()? {
//!             pad.refresh()?;
//!             if pad.is_new_touch(0) {
//!                 log::info!("electrode 0 was just touched");
//!             }
//!             for electrode in pad.touched() {
//!                 log::debug!("electrode {electrode} is down");
//!             }
//!         }
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod conf;
pub mod reg;

mod device;
mod err;

pub use conf::{FilterConfig, Settings};
pub use device::*;
pub use err::{Error, ErrorKind};
