//! GPIO lines and parallel data buses over the Linux sysfs GPIO interface (`/sys/class/gpio`).
//!
//! A [`SysfsPin`] owns one exported line. A [`ParallelDataBus`] groups several lines into a
//! single unsigned value, the first pin carrying the least significant bit.
//!
//! ```no_run
//! use parallel_gpio::{create_parallel_data_bus, Direction, PinOptions};
//!
//! let options = PinOptions {
//!     direction: Direction::Out,
//!     ..PinOptions::default()
//! };
//! let mut bus = create_parallel_data_bus(&[5, 6, 13, 19, 26, 16, 20, 21], &options)?;
//! bus.set_value(0xA5)?;
//! # Ok::<(), parallel_gpio::Error>(())
//! ```

mod bus;
mod direction;
mod error;
mod factory;
pub mod pin;

pub use crate::{
    bus::{ParallelDataBus, MAX_PINS},
    direction::Direction,
    error::{Error, Result},
    factory::create_parallel_data_bus,
    pin::{Pin, PinOptions, SysfsPin},
};
