//! Turns controller status changes into button edges.

use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_hal::digital::{self, InputPin};

use crate::conf::ChipConfig;
use crate::edge::{ButtonEvent, TouchEdge};
use crate::error::Error;
use crate::registry::{ButtonId, ChipDescriptor, ChipRegistry, Location, ELECTRODES};
use crate::sensor::{Error as _, TouchSensor};

/// Pin type of a scanner without an interrupt line. Always reads "data pending".
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInterrupt;

impl digital::ErrorType for NoInterrupt {
    type Error = Infallible;
}

impl InputPin for NoInterrupt {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// The shared, active-low data-ready line of the controllers.
struct Interrupt<IRQ> {
    pin: IRQ,
    line: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Uninitialized,
    Ready,
}

/// Scans a [`ChipRegistry`] for touch and release edges.
///
/// The scanner owns every driver handle in the registry. Call
/// [`TouchScanner::initialize`] once, then [`TouchScanner::poll`] from the
/// control loop.
pub struct TouchScanner<S, IRQ = NoInterrupt> {
    registry: ChipRegistry<S>,
    interrupt: Option<Interrupt<IRQ>>,
    state: State,
}

impl<S: TouchSensor> TouchScanner<S, NoInterrupt> {
    /// A scanner that reads every chip's status on every poll.
    pub fn new(registry: ChipRegistry<S>) -> Self {
        Self {
            registry,
            interrupt: None,
            state: State::Uninitialized,
        }
    }
}

impl<S: TouchSensor, IRQ: InputPin> TouchScanner<S, IRQ> {
    /// A scanner that skips the bus while `pin` is high.
    ///
    /// `line` is the host input number of `pin`; every controller gets it routed
    /// during [`TouchScanner::initialize`].
    pub fn with_interrupt(registry: ChipRegistry<S>, pin: IRQ, line: u8) -> Self {
        Self {
            registry,
            interrupt: Some(Interrupt { pin, line }),
            state: State::Uninitialized,
        }
    }

    /// Validates the registry and configures every controller, in registry order.
    ///
    /// The first controller that fails stops the sequence; the ones after it
    /// are not touched. Until this returns `Ok` every poll fails with
    /// [`Error::NotInitialized`]. What to do about a failure (halt, retry,
    /// degrade) is up to the caller.
    pub fn initialize(&mut self) -> Result<(), Error<S::Error>> {
        self.state = State::Uninitialized;

        if let Err(err) = self.registry.validate() {
            log::error!("touch pad configuration rejected: {err}");
            return Err(err.into());
        }

        let line = self.interrupt.as_ref().map(|interrupt| interrupt.line);
        for (chip, descriptor) in self.registry.chips_mut().iter_mut().enumerate() {
            let config = *descriptor.config();
            log::info!(
                "Initializing touch controller #{chip} at {:#04x}",
                config.address
            );
            if let Err(source) = configure(descriptor.device_mut(), &config, line) {
                log::error!(
                    "error setting up touch controller #{chip}: {}",
                    source.kind()
                );
                return Err(Error::Sensor { chip, source });
            }
            descriptor.set_unreported(0);
        }

        self.state = State::Ready;
        Ok(())
    }

    /// Looks for a new edge on button `target`.
    ///
    /// Chips are walked in registry order and only changed chips are read. An
    /// edge is handed out once: the first poll for its button returns it, later
    /// polls return [`TouchEdge::None`] until the hardware moves again. Edges of
    /// other buttons in the same snapshot wait for a poll with their own id, and
    /// are replaced by the chip's next snapshot. Pending edges are served even
    /// while the interrupt line is idle, without bus traffic.
    pub fn poll(&mut self, target: ButtonId) -> Result<TouchEdge, Error<S::Error>> {
        self.ensure_ready()?;
        let pending = self.data_pending();

        for (chip, descriptor) in self.registry.chips_mut().iter_mut().enumerate() {
            if pending {
                refresh_if_changed(chip, descriptor)?;
            }
            let Some(electrode) = descriptor.electrode(target) else {
                continue;
            };
            if descriptor.take_unreported(electrode) {
                return Ok(edge_at(descriptor, electrode));
            }
        }

        Ok(TouchEdge::None)
    }

    /// Hands out every pending edge, in registry and electrode order.
    ///
    /// Same bus discipline as [`TouchScanner::poll`]; edges returned here are
    /// not returned by a later `poll`.
    pub fn poll_all(&mut self) -> Result<Vec<ButtonEvent>, Error<S::Error>> {
        self.ensure_ready()?;
        let pending = self.data_pending();
        let mut events = Vec::new();

        for (chip, descriptor) in self.registry.chips_mut().iter_mut().enumerate() {
            if pending {
                refresh_if_changed(chip, descriptor)?;
            }
            for electrode in 0..ELECTRODES as u8 {
                if descriptor.take_unreported(electrode) {
                    events.push(ButtonEvent {
                        location: Location { chip, electrode },
                        edge: edge_at(descriptor, electrode),
                    });
                }
            }
        }

        Ok(events)
    }

    pub fn is_ready(&self) -> bool {
        self.state == State::Ready
    }

    pub fn registry(&self) -> &ChipRegistry<S> {
        &self.registry
    }

    /// Where button `id` is wired.
    pub fn locate(&self, id: ButtonId) -> Option<Location> {
        self.registry.locate(id)
    }

    /// Gives the registry and the interrupt pin back.
    pub fn into_parts(self) -> (ChipRegistry<S>, Option<IRQ>) {
        (
            self.registry,
            self.interrupt.map(|interrupt| interrupt.pin),
        )
    }

    fn ensure_ready(&self) -> Result<(), Error<S::Error>> {
        match self.state {
            State::Ready => Ok(()),
            State::Uninitialized => Err(Error::NotInitialized),
        }
    }

    /// Reads the interrupt line. An unreadable line counts as pending.
    fn data_pending(&mut self) -> bool {
        let Some(interrupt) = self.interrupt.as_mut() else {
            return true;
        };
        match interrupt.pin.is_low() {
            Ok(pending) => pending,
            Err(err) => {
                log::warn!(
                    "interrupt line {} unreadable, scanning anyway: {err:?}",
                    interrupt.line
                );
                true
            }
        }
    }
}

fn configure<S: TouchSensor>(
    device: &mut S,
    config: &ChipConfig,
    line: Option<u8>,
) -> Result<(), S::Error> {
    device.open(config.address)?;

    if let Some(line) = line {
        device.set_interrupt_routing(line)?;
    }

    for (electrode, (&touch, &release)) in config
        .touch_thresholds
        .iter()
        .zip(&config.release_thresholds)
        .enumerate()
    {
        device.set_touch_threshold(electrode as u8, touch)?;
        device.set_release_threshold(electrode as u8, release)?;
    }

    // Baseline for the first poll.
    device.refresh_data()
}

/// Takes a new snapshot if the chip reports a change and records its edges as
/// pending. One fetch per chip per cycle.
fn refresh_if_changed<S: TouchSensor>(
    chip: usize,
    descriptor: &mut ChipDescriptor<S>,
) -> Result<(), Error<S::Error>> {
    let device = descriptor.device_mut();
    let changed = device
        .status_changed()
        .map_err(|source| Error::Sensor { chip, source })?;
    if !changed {
        return Ok(());
    }
    device
        .refresh_data()
        .map_err(|source| Error::Sensor { chip, source })?;

    let mut unreported = 0;
    for electrode in 0..ELECTRODES as u8 {
        let edge = edge_at(descriptor, electrode);
        if !edge.is_none() {
            log_edge(Location { chip, electrode }, edge);
            unreported |= 1 << electrode;
        }
    }
    descriptor.set_unreported(unreported);
    Ok(())
}

fn edge_at<S: TouchSensor>(descriptor: &ChipDescriptor<S>, electrode: u8) -> TouchEdge {
    let Some(id) = descriptor.identifier(electrode) else {
        return TouchEdge::None;
    };
    let device = descriptor.device();
    if device.is_new_touch(electrode) {
        TouchEdge::Down(id)
    } else if device.is_new_release(electrode) {
        TouchEdge::Up(id)
    } else {
        TouchEdge::None
    }
}

fn log_edge(location: Location, edge: TouchEdge) {
    let Location { chip, electrode } = location;
    match edge {
        TouchEdge::Down(id) => {
            log::info!("device {chip} electrode {electrode} identifier {id} was just touched")
        }
        TouchEdge::Up(id) => {
            log::info!("device {chip} electrode {electrode} identifier {id} was just released")
        }
        TouchEdge::None => {}
    }
}
