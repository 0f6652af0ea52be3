//! Scanner, MPR121 driver and shared bus together, against a simulated bank
//! of controllers.

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embedded_bus::{MutexI2cDevice, SharedI2cBus};
use embedded_hal::i2c::{ErrorKind as BusErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};
use mpr121::{reg, Mpr121};

use crate::conf::QUAD_PAD;
use crate::{ChipRegistry, Error, ErrorKind, TouchEdge, TouchScanner};

/// Register files of every controller on the bus, by address.
struct Bank {
    chips: Vec<(u8, [u8; 256])>,
}

impl Bank {
    fn new(addresses: &[u8]) -> Self {
        Self {
            chips: addresses.iter().map(|address| (*address, [0; 256])).collect(),
        }
    }

    fn registers(&mut self, address: u8) -> Option<&mut [u8; 256]> {
        self.chips
            .iter_mut()
            .find(|(other, _)| *other == address)
            .map(|(_, regs)| regs)
    }

    fn set_status(&mut self, address: u8, status: u16) {
        if let Some(regs) = self.registers(address) {
            let [lo, hi] = status.to_le_bytes();
            regs[reg::TOUCH_STATUS_L as usize] = lo;
            regs[reg::TOUCH_STATUS_H as usize] = hi;
        }
    }
}

impl ErrorType for Bank {
    type Error = BusErrorKind;
}

impl I2c for Bank {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let regs = self
            .registers(address)
            .ok_or(BusErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))?;
        let mut pointer = 0usize;
        for op in operations {
            match op {
                Operation::Write(bytes) => {
                    pointer = bytes[0] as usize;
                    for (offset, value) in bytes[1..].iter().enumerate() {
                        let register = pointer + offset;
                        if register == reg::SOFT_RESET as usize && *value == reg::SOFT_RESET_MAGIC {
                            regs.fill(0);
                            regs[reg::AFE_CONFIG_2 as usize] = reg::AFE_CONFIG_2_RESET;
                        } else {
                            regs[register] = *value;
                        }
                    }
                }
                Operation::Read(buf) => {
                    for (offset, byte) in buf.iter_mut().enumerate() {
                        *byte = regs[pointer + offset];
                    }
                }
            }
        }
        Ok(())
    }
}

type Device = MutexI2cDevice<Bank, NoopRawMutex>;

fn quad_pad(bank: Bank) -> (TouchScanner<Mpr121<Device>>, SharedI2cBus<Bank, NoopRawMutex>) {
    let bus = Device::share_with_raw_mutex(bank);
    let registry: ChipRegistry<_> = QUAD_PAD
        .iter()
        .fold(ChipRegistry::new(), |registry, config| {
            registry.with_chip(*config, Mpr121::new(Device::new(bus.clone())))
        });
    (TouchScanner::new(registry), bus)
}

fn register(bus: &SharedI2cBus<Bank, NoopRawMutex>, address: u8, register: u8) -> u8 {
    bus.lock(|bank| {
        bank.borrow_mut()
            .registers(address)
            .map_or(0, |regs| regs[register as usize])
    })
}

#[test]
fn every_controller_gets_its_thresholds() {
    let (mut scanner, bus) = quad_pad(Bank::new(&[0x5A, 0x5B, 0x5C, 0x5D]));
    scanner.initialize().unwrap();

    assert_eq!(register(&bus, 0x5A, reg::TOUCH_THRESHOLD_0), 10);
    assert_eq!(register(&bus, 0x5A, reg::RELEASE_THRESHOLD_0), 5);
    assert_eq!(register(&bus, 0x5D, reg::TOUCH_THRESHOLD_0 + 2 * 11), 20);
    assert_eq!(register(&bus, 0x5D, reg::RELEASE_THRESHOLD_0 + 2 * 11), 10);
    // Back in run mode with 12 electrodes.
    assert_eq!(register(&bus, 0x5B, reg::ELECTRODE_CONFIG), 0xCC);

    for device in scanner.into_parts().0.into_devices() {
        assert!(device.is_running());
        assert_eq!(device.last_error(), ErrorKind::None);
    }
}

#[test]
fn touch_on_the_second_controller() {
    let (mut scanner, bus) = quad_pad(Bank::new(&[0x5A, 0x5B, 0x5C, 0x5D]));
    scanner.initialize().unwrap();

    bus.lock(|bank| bank.borrow_mut().set_status(0x5B, 1 << 7));
    assert_eq!(scanner.poll(20).unwrap(), TouchEdge::Down(20));
    assert_eq!(scanner.poll(20).unwrap(), TouchEdge::None);

    bus.lock(|bank| bank.borrow_mut().set_status(0x5B, 0));
    assert_eq!(scanner.poll(20).unwrap(), TouchEdge::Up(20));
}

#[test]
fn simultaneous_touches_are_reported_per_button() {
    let (mut scanner, bus) = quad_pad(Bank::new(&[0x5A, 0x5B, 0x5C, 0x5D]));
    scanner.initialize().unwrap();

    bus.lock(|bank| bank.borrow_mut().set_status(0x5A, 0b11));
    assert_eq!(scanner.poll(1).unwrap(), TouchEdge::Down(1));
    assert_eq!(scanner.poll(2).unwrap(), TouchEdge::Down(2));
    assert_eq!(scanner.poll(2).unwrap(), TouchEdge::None);
}

#[test]
fn overcurrent_while_scanning_is_reported() {
    let (mut scanner, bus) = quad_pad(Bank::new(&[0x5A, 0x5B, 0x5C, 0x5D]));
    scanner.initialize().unwrap();

    bus.lock(|bank| bank.borrow_mut().set_status(0x5C, 1 << 15));
    let err = scanner.poll(1).unwrap_err();
    assert!(matches!(err, Error::Sensor { chip: 2, .. }));
    assert_eq!(err.kind(), Some(ErrorKind::OvercurrentFlag));
}

#[test]
fn missing_controller_stops_initialization() {
    // Nothing answers at 0x5C.
    let (mut scanner, bus) = quad_pad(Bank::new(&[0x5A, 0x5B, 0x5D]));

    let err = scanner.initialize().unwrap_err();
    assert!(matches!(err, Error::Sensor { chip: 2, .. }));
    assert_eq!(err.kind(), Some(ErrorKind::UnknownAddress));
    assert!(!scanner.is_ready());

    // The chip after the failing one was never reset.
    assert_eq!(register(&bus, 0x5D, reg::AFE_CONFIG_2), 0);
    assert_eq!(register(&bus, 0x5B, reg::AFE_CONFIG_2), 0x30);
}
