//! Static chip tables.
//!
//! A [`ChipConfig`] is the wiring of one controller: where it sits on the bus,
//! how sensitive each electrode is and which button each electrode stands for.
//! The tables here describe the boards the scanner was built for; an
//! application can just as well build its own.

use embedded_hal::i2c::SevenBitAddress;

use crate::registry::{ButtonId, ELECTRODES};

/// Host input line the controllers' shared IRQ output is wired to.
pub const INTERRUPT_LINE: u8 = 7;

/// Wiring and thresholds of one controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChipConfig {
    /// 7-bit bus address.
    pub address: SevenBitAddress,
    /// Touch threshold per electrode. Lower values make the electrode act more
    /// like a proximity sensor.
    pub touch_thresholds: [u8; ELECTRODES],
    /// Release threshold per electrode. Must be lower than the touch threshold.
    pub release_thresholds: [u8; ELECTRODES],
    /// Button reported for each electrode.
    pub identifiers: [ButtonId; ELECTRODES],
}

impl ChipConfig {
    /// Same thresholds on every electrode, buttons numbered from `first_id` upwards.
    pub const fn uniform(
        address: SevenBitAddress,
        touch_threshold: u8,
        release_threshold: u8,
        first_id: ButtonId,
    ) -> Self {
        let mut identifiers = [0; ELECTRODES];
        let mut electrode = 0;
        while electrode < ELECTRODES {
            identifiers[electrode] = first_id.wrapping_add(electrode as u8);
            electrode += 1;
        }
        Self {
            address,
            touch_thresholds: [touch_threshold; ELECTRODES],
            release_thresholds: [release_threshold; ELECTRODES],
            identifiers,
        }
    }

    /// Replaces the button of every electrode.
    pub const fn with_identifiers(mut self, identifiers: [ButtonId; ELECTRODES]) -> Self {
        self.identifiers = identifiers;
        self
    }

    /// Overrides the thresholds of a single electrode.
    ///
    /// # Panics
    ///
    /// If `electrode` is not below [`ELECTRODES`]. In a `const` table this is a
    /// compile error.
    pub const fn with_thresholds(mut self, electrode: usize, touch: u8, release: u8) -> Self {
        self.touch_thresholds[electrode] = touch;
        self.release_thresholds[electrode] = release;
        self
    }
}

/// One controller at `0x5A`, buttons 1 to 12.
pub const SINGLE_PAD: [ChipConfig; 1] = [ChipConfig::uniform(0x5A, 10, 5, 1)];

/// Four controllers, every address an MPR121 can take, buttons 1 to 48.
#[rustfmt::skip]
pub const QUAD_PAD: [ChipConfig; 4] = [
    ChipConfig::uniform(0x5A, 10,  5,  1),
    ChipConfig::uniform(0x5B, 20, 10, 13),
    ChipConfig::uniform(0x5C, 20, 10, 25),
    ChipConfig::uniform(0x5D, 20, 10, 37),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_pad_numbers_buttons_consecutively() {
        let ids: std::vec::Vec<ButtonId> = QUAD_PAD
            .iter()
            .flat_map(|chip| chip.identifiers)
            .collect();
        assert_eq!(ids, (1..=48).collect::<std::vec::Vec<_>>());
        assert_eq!(QUAD_PAD[1].touch_thresholds, [20; ELECTRODES]);
        assert_eq!(QUAD_PAD[1].release_thresholds, [10; ELECTRODES]);
    }

    #[test]
    fn builders_override_single_electrodes() {
        let chip = ChipConfig::uniform(0x5A, 10, 5, 1).with_thresholds(3, 40, 20);
        assert_eq!(chip.touch_thresholds[3], 40);
        assert_eq!(chip.release_thresholds[3], 20);
        assert_eq!(chip.touch_thresholds[2], 10);
        assert_eq!(chip.identifiers[11], 12);

        let chip = chip.with_identifiers([9; ELECTRODES]);
        assert_eq!(chip.identifiers, [9; ELECTRODES]);
    }

    #[test]
    #[should_panic]
    fn thresholds_for_a_missing_electrode_panic() {
        let _ = ChipConfig::uniform(0x5A, 10, 5, 1).with_thresholds(ELECTRODES, 40, 20);
    }
}
