#![cfg_attr(not(test), no_std)]
#![doc = "Blocking shared bus implementations for embedded-hal."]

// Several MPR121 controllers hang off one I2C peripheral, and every driver
// instance wants to own an `I2c`. `MutexI2cDevice` hands out one handle per
// driver over a single bus.
//
// For the official Embassy implementation, see:
// - https://github.com/embassy-rs/embassy/tree/main/embassy-embedded-hal/src/shared_bus/blocking

extern crate alloc;

pub mod i2c;

pub use i2c::{MutexI2cDevice, SharedI2cBus};
