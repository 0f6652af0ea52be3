use alloc::rc::Rc;
use core::cell::RefCell;
use embassy_sync::blocking_mutex::raw::{CriticalSectionRawMutex, RawMutex};
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::i2c::{self, I2c, Operation, SevenBitAddress};

/// The bus handle shared by every [`MutexI2cDevice`] on it.
pub type SharedI2cBus<BUS, M = CriticalSectionRawMutex> = Rc<Mutex<M, RefCell<BUS>>>;

/// Blocking `Mutex`-based shared bus [`I2c`] implementation.
///
/// This allows for sharing an I2C bus, obtaining multiple [`MutexI2cDevice`] instances,
/// each of which can talk to its own address.
///
/// Sharing is implemented with a blocking `Mutex` around a `RefCell`, so a
/// transaction can never interleave with another one on the same bus.
pub struct MutexI2cDevice<BUS, M: RawMutex = CriticalSectionRawMutex> {
    bus: SharedI2cBus<BUS, M>,
}

impl<BUS> MutexI2cDevice<BUS> {
    /// Wraps a bare bus so that devices can be handed out with [`MutexI2cDevice::new`].
    ///
    /// The bus is guarded by a [`CriticalSectionRawMutex`]; use
    /// [`MutexI2cDevice::share_with_raw_mutex`] to pick another one.
    pub fn share(bus: BUS) -> SharedI2cBus<BUS> {
        Self::share_with_raw_mutex(bus)
    }
}

impl<BUS, M: RawMutex> MutexI2cDevice<BUS, M> {
    /// Create a new [`MutexI2cDevice`].
    pub fn new(bus: SharedI2cBus<BUS, M>) -> Self {
        Self { bus }
    }

    /// Wraps a bare bus behind a raw mutex of type `M`.
    pub fn share_with_raw_mutex(bus: BUS) -> SharedI2cBus<BUS, M> {
        Rc::new(Mutex::new(RefCell::new(bus)))
    }
}

impl<BUS, M: RawMutex> Clone for MutexI2cDevice<BUS, M> {
    fn clone(&self) -> Self {
        Self {
            bus: Rc::clone(&self.bus),
        }
    }
}

impl<BUS, M> i2c::ErrorType for MutexI2cDevice<BUS, M>
where
    BUS: i2c::ErrorType,
    M: RawMutex,
{
    type Error = BUS::Error;
}

impl<BUS, M> I2c for MutexI2cDevice<BUS, M>
where
    BUS: I2c<SevenBitAddress>,
    M: RawMutex,
{
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let result = self
            .bus
            .lock(|bus| bus.borrow_mut().transaction(address, operations));

        if let Err(err) = &result {
            log::warn!("Error communicating with the device at {address:#04x}: {err:?}");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use embedded_hal::i2c::ErrorKind;

    /// Records every write and answers reads with the address it was sent to.
    #[derive(Default)]
    struct RecordingBus {
        writes: Vec<(u8, Vec<u8>)>,
        nack: Option<u8>,
    }

    impl i2c::ErrorType for RecordingBus {
        type Error = ErrorKind;
    }

    impl I2c for RecordingBus {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.nack == Some(address) {
                return Err(ErrorKind::NoAcknowledge(i2c::NoAcknowledgeSource::Address));
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => self.writes.push((address, bytes.to_vec())),
                    Operation::Read(buf) => buf.fill(address),
                }
            }
            Ok(())
        }
    }

    #[test]
    fn devices_share_one_bus() {
        let bus =
            MutexI2cDevice::<_, NoopRawMutex>::share_with_raw_mutex(RecordingBus::default());
        let mut first = MutexI2cDevice::new(bus.clone());
        let mut second = MutexI2cDevice::new(bus.clone());

        first.write(0x5A, &[0x80, 0x63]).unwrap();
        second.write(0x5B, &[0x5E, 0x00]).unwrap();

        let mut buf = [0u8; 2];
        second.write_read(0x5B, &[0x00], &mut buf).unwrap();
        assert_eq!(buf, [0x5B, 0x5B]);

        bus.lock(|bus| {
            let writes = &bus.borrow().writes;
            assert_eq!(writes.len(), 3);
            assert_eq!(writes[0], (0x5A, alloc::vec![0x80, 0x63]));
            assert_eq!(writes[1], (0x5B, alloc::vec![0x5E, 0x00]));
            assert_eq!(writes[2], (0x5B, alloc::vec![0x00]));
        });
    }

    #[test]
    fn default_mutex_needs_no_annotations() {
        let bus = MutexI2cDevice::share(RecordingBus::default());
        let first = MutexI2cDevice::new(bus.clone());
        let second = first.clone();
        assert_eq!(Rc::strong_count(&bus), 3);
        drop((first, second));
        assert_eq!(Rc::strong_count(&bus), 1);
    }

    #[test]
    fn bus_errors_pass_through() {
        let bus = MutexI2cDevice::<_, NoopRawMutex>::share_with_raw_mutex(RecordingBus {
            nack: Some(0x5C),
            ..Default::default()
        });
        let mut device = MutexI2cDevice::new(bus.clone());

        let err = device.write(0x5C, &[0x00]).unwrap_err();
        assert_eq!(
            err,
            ErrorKind::NoAcknowledge(i2c::NoAcknowledgeSource::Address)
        );
        // A failed transaction must not leave the bus borrowed.
        assert!(device.write(0x5A, &[0x00]).is_ok());
    }
}
