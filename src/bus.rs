use crate::{
    direction::Direction,
    error::{Error, Result},
    pin::Pin,
};
use std::fmt::Display;

/// Widest bus whose value still fits in a `u64`.
pub const MAX_PINS: usize = u64::BITS as usize;

fn max_value(pin_count: usize) -> u64 {
    1u64.checked_shl(pin_count as u32).map_or(u64::MAX, |v| v - 1)
}

/// A group of lines read and written as one unsigned integer.
///
/// Pin `i` of the sequence carries bit `i` of the value, so the first pin is the least
/// significant bit. Operations fan out to the pins in sequence order and stop at the first
/// failure; pins handled before the failing one keep their new state.
#[derive(Debug)]
pub struct ParallelDataBus<P: Pin> {
    pins: Vec<P>,
    direction: Direction,
    value: u64,
    max_value: u64,
}

impl<P: Pin> ParallelDataBus<P> {
    /// Takes ownership of `pins` and applies `direction` to every one of them.
    pub fn new(pins: Vec<P>, direction: Direction) -> Result<Self> {
        if pins.len() > MAX_PINS {
            return Err(Error::PinArrayExpected(format!(
                "at most {} pins fit in a bus, got {}",
                MAX_PINS,
                pins.len()
            )));
        }

        let mut bus = Self {
            max_value: max_value(pins.len()),
            pins,
            direction,
            value: 0,
        };
        bus.set_direction(direction)?;
        Ok(bus)
    }

    /// Samples every pin in input mode, returns the last written value in output mode.
    pub fn get_value(&mut self) -> Result<u64> {
        if self.is_output() {
            return Ok(self.value);
        }

        let mut value = 0;
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            value |= (pin.get_value()? as u64) << bit;
        }
        Ok(value)
    }

    /// Drives every pin with its bit of `value`.
    ///
    /// # Errors
    ///
    /// [`Error::WriteOnInputMode`] on an input bus, [`Error::OutOfRange`] when `value` is
    /// negative or wider than the bus.
    pub fn set_value<V>(&mut self, value: V) -> Result<&mut Self>
    where
        V: TryInto<u64> + Display + Copy,
    {
        if self.is_input() {
            return Err(Error::WriteOnInputMode);
        }

        let max = self.max_value;
        let v = value
            .try_into()
            .ok()
            .filter(|v| *v <= max)
            .ok_or_else(|| Error::OutOfRange {
                value: value.to_string(),
                max,
            })?;

        log::debug!("Setting bus value={:#x}", v);
        self.value = v;
        for (bit, pin) in self.pins.iter_mut().enumerate() {
            pin.set_value((v >> bit) & 1 == 1)?;
        }
        Ok(self)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) -> Result<&mut Self> {
        for pin in self.pins.iter_mut() {
            pin.set_direction(direction)?;
        }
        self.direction = direction;
        Ok(self)
    }

    pub fn is_input(&self) -> bool {
        self.direction == Direction::In
    }

    pub fn is_output(&self) -> bool {
        self.direction == Direction::Out
    }

    pub fn count_pins(&self) -> usize {
        self.pins.len()
    }

    /// Largest value the bus can carry, `2^count_pins() - 1`.
    pub fn max_value(&self) -> u64 {
        self.max_value
    }

    pub fn pins(&self) -> &[P] {
        &self.pins
    }

    pub fn enable_autorelease(&mut self) -> &mut Self {
        for pin in self.pins.iter_mut() {
            pin.enable_autorelease();
        }
        self
    }

    pub fn disable_autorelease(&mut self) -> &mut Self {
        for pin in self.pins.iter_mut() {
            pin.disable_autorelease();
        }
        self
    }

    /// Releases every pin in sequence order.
    ///
    /// On failure the pins not yet released are dropped and follow their own autorelease flag.
    pub fn release(self) -> Result<()> {
        for pin in self.pins {
            pin.release()?;
        }
        Ok(())
    }
}
