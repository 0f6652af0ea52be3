//! The chip registry: every controller on the bus, in scan order.

use alloc::vec::Vec;

use crate::conf::ChipConfig;
use crate::error::ConfigError;

pub use mpr121::ELECTRODES;

/// A button in the flat, chip-independent button space.
pub type ButtonId = u8;

/// Physical position of an electrode: index of the chip in the registry and
/// electrode on that chip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub chip: usize,
    pub electrode: u8,
}

/// One controller: its wiring and the driver handle that talks to it.
///
/// The descriptor owns the handle for its whole lifetime.
pub struct ChipDescriptor<S> {
    config: ChipConfig,
    device: S,
    /// Electrodes whose edge in the current snapshot has not been handed out yet.
    unreported: u16,
}

impl<S> ChipDescriptor<S> {
    pub fn new(config: ChipConfig, device: S) -> Self {
        Self {
            config,
            device,
            unreported: 0,
        }
    }

    pub fn config(&self) -> &ChipConfig {
        &self.config
    }

    pub fn device(&self) -> &S {
        &self.device
    }

    pub(crate) fn device_mut(&mut self) -> &mut S {
        &mut self.device
    }

    /// Button of a local electrode.
    pub fn identifier(&self, electrode: u8) -> Option<ButtonId> {
        self.config.identifiers.get(electrode as usize).copied()
    }

    /// Local electrode of a button, if it is wired to this chip.
    pub fn electrode(&self, id: ButtonId) -> Option<u8> {
        self.config
            .identifiers
            .iter()
            .position(|other| *other == id)
            .map(|electrode| electrode as u8)
    }

    /// Replaces the pending edges; called with every new snapshot.
    pub(crate) fn set_unreported(&mut self, electrodes: u16) {
        self.unreported = electrodes;
    }

    /// Marks the edge of `electrode` as handed out. Returns whether it was pending.
    pub(crate) fn take_unreported(&mut self, electrode: u8) -> bool {
        let bit = 1 << electrode;
        let pending = self.unreported & bit != 0;
        self.unreported &= !bit;
        pending
    }

    pub fn into_device(self) -> S {
        self.device
    }
}

/// Ordered list of the controllers the scanner walks.
pub struct ChipRegistry<S> {
    chips: Vec<ChipDescriptor<S>>,
}

impl<S> ChipRegistry<S> {
    pub fn new() -> Self {
        Self { chips: Vec::new() }
    }

    /// Appends a controller. Chips are scanned in the order they are added.
    pub fn push(&mut self, config: ChipConfig, device: S) {
        self.chips.push(ChipDescriptor::new(config, device));
    }

    /// Builder form of [`ChipRegistry::push`].
    pub fn with_chip(mut self, config: ChipConfig, device: S) -> Self {
        self.push(config, device);
        self
    }

    pub fn len(&self) -> usize {
        self.chips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    pub fn chips(&self) -> &[ChipDescriptor<S>] {
        &self.chips
    }

    pub(crate) fn chips_mut(&mut self) -> &mut [ChipDescriptor<S>] {
        &mut self.chips
    }

    /// Checks the invariants the scanner relies on.
    ///
    /// * at least one chip,
    /// * 7-bit addresses, no two chips on the same address,
    /// * release threshold below touch threshold on every electrode,
    /// * every button on exactly one electrode across all chips.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chips.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }

        for (chip, descriptor) in self.chips.iter().enumerate() {
            let config = descriptor.config();
            if config.address > 0x7F {
                return Err(ConfigError::InvalidAddress {
                    chip,
                    address: config.address,
                });
            }
            if let Some(first) = self.chips[..chip]
                .iter()
                .position(|other| other.config.address == config.address)
            {
                return Err(ConfigError::DuplicateAddress {
                    first,
                    second: chip,
                    address: config.address,
                });
            }
            for (electrode, (&touch, &release)) in config
                .touch_thresholds
                .iter()
                .zip(&config.release_thresholds)
                .enumerate()
            {
                if release >= touch {
                    return Err(ConfigError::ThresholdOrder {
                        location: Location {
                            chip,
                            electrode: electrode as u8,
                        },
                        touch,
                        release,
                    });
                }
            }
        }

        for (index, (second, id)) in self.buttons().enumerate() {
            if let Some((first, _)) = self.buttons().take(index).find(|(_, other)| *other == id) {
                return Err(ConfigError::DuplicateId { id, first, second });
            }
        }

        Ok(())
    }

    /// Every electrode and its button, in scan order.
    pub fn buttons(&self) -> impl Iterator<Item = (Location, ButtonId)> + '_ {
        self.chips.iter().enumerate().flat_map(|(chip, descriptor)| {
            descriptor
                .config
                .identifiers
                .iter()
                .enumerate()
                .map(move |(electrode, id)| {
                    (
                        Location {
                            chip,
                            electrode: electrode as u8,
                        },
                        *id,
                    )
                })
        })
    }

    /// Where a button is wired.
    pub fn locate(&self, id: ButtonId) -> Option<Location> {
        self.buttons()
            .find(|(_, other)| *other == id)
            .map(|(location, _)| location)
    }

    /// Which button an electrode stands for.
    pub fn identifier(&self, location: Location) -> Option<ButtonId> {
        self.chips.get(location.chip)?.identifier(location.electrode)
    }

    /// Gives the driver handles back, in scan order.
    pub fn into_devices(self) -> impl Iterator<Item = S> {
        self.chips.into_iter().map(ChipDescriptor::into_device)
    }
}

impl<S> Default for ChipRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> FromIterator<ChipDescriptor<S>> for ChipRegistry<S> {
    fn from_iter<T: IntoIterator<Item = ChipDescriptor<S>>>(iter: T) -> Self {
        Self {
            chips: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conf::{QUAD_PAD, SINGLE_PAD};

    fn registry_of(configs: &[ChipConfig]) -> ChipRegistry<()> {
        configs
            .iter()
            .map(|config| ChipDescriptor::new(*config, ()))
            .collect()
    }

    #[test]
    fn reference_tables_are_valid() {
        assert_eq!(registry_of(&SINGLE_PAD).validate(), Ok(()));
        assert_eq!(registry_of(&QUAD_PAD).validate(), Ok(()));
    }

    #[test]
    fn rejects_an_empty_registry() {
        assert_eq!(
            ChipRegistry::<()>::new().validate(),
            Err(ConfigError::EmptyRegistry)
        );
    }

    #[test]
    fn rejects_release_not_below_touch() {
        let chip = ChipConfig::uniform(0x5B, 20, 10, 13).with_thresholds(4, 10, 10);
        let registry = registry_of(&[SINGLE_PAD[0], chip]);
        assert_eq!(
            registry.validate(),
            Err(ConfigError::ThresholdOrder {
                location: Location {
                    chip: 1,
                    electrode: 4
                },
                touch: 10,
                release: 10,
            })
        );

        let inverted = registry_of_one(ChipConfig::uniform(0x5A, 5, 10, 1));
        assert!(matches!(
            inverted.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }

    fn registry_of_one(config: ChipConfig) -> ChipRegistry<()> {
        ChipRegistry::new().with_chip(config, ())
    }

    #[test]
    fn rejects_ids_shared_across_chips() {
        // Both chips start numbering at 1.
        let registry = registry_of(&[
            ChipConfig::uniform(0x5A, 10, 5, 1),
            ChipConfig::uniform(0x5B, 10, 5, 1),
        ]);
        assert_eq!(
            registry.validate(),
            Err(ConfigError::DuplicateId {
                id: 1,
                first: Location {
                    chip: 0,
                    electrode: 0
                },
                second: Location {
                    chip: 1,
                    electrode: 0
                },
            })
        );
    }

    #[test]
    fn rejects_ids_shared_within_a_chip() {
        let mut ids = [0; ELECTRODES];
        for (electrode, id) in ids.iter_mut().enumerate() {
            *id = electrode as ButtonId;
        }
        ids[11] = 3;
        let registry = registry_of_one(SINGLE_PAD[0].with_identifiers(ids));
        assert!(matches!(
            registry.validate(),
            Err(ConfigError::DuplicateId { id: 3, .. })
        ));
    }

    #[test]
    fn rejects_bad_addresses() {
        let registry = registry_of(&[QUAD_PAD[0], ChipConfig { address: 0x5A, ..QUAD_PAD[1] }]);
        assert_eq!(
            registry.validate(),
            Err(ConfigError::DuplicateAddress {
                first: 0,
                second: 1,
                address: 0x5A
            })
        );

        let registry = registry_of_one(ChipConfig {
            address: 0x80,
            ..SINGLE_PAD[0]
        });
        assert_eq!(
            registry.validate(),
            Err(ConfigError::InvalidAddress {
                chip: 0,
                address: 0x80
            })
        );
    }

    #[test]
    fn maps_between_buttons_and_electrodes() {
        let registry = registry_of(&QUAD_PAD);
        let location = registry.locate(20).unwrap();
        assert_eq!(
            location,
            Location {
                chip: 1,
                electrode: 7
            }
        );
        assert_eq!(registry.identifier(location), Some(20));
        assert_eq!(registry.locate(49), None);
        assert_eq!(
            registry.identifier(Location {
                chip: 4,
                electrode: 0
            }),
            None
        );
        assert_eq!(
            registry.identifier(Location {
                chip: 0,
                electrode: 12
            }),
            None
        );
        assert_eq!(registry.buttons().count(), 48);
        assert_eq!(registry.chips()[1].electrode(20), Some(7));
        assert_eq!(registry.chips()[0].electrode(20), None);
    }

    #[test]
    fn pending_edges_are_taken_once() {
        let mut chip = ChipDescriptor::new(SINGLE_PAD[0], ());
        chip.set_unreported(0b101);

        assert!(chip.take_unreported(2));
        assert!(!chip.take_unreported(2));
        assert!(!chip.take_unreported(1));
        assert!(chip.take_unreported(0));
        assert!(!chip.take_unreported(0));
    }
}
