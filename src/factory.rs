use crate::{
    bus::{ParallelDataBus, MAX_PINS},
    error::{Error, Result},
    pin::{PinOptions, SysfsPin},
};
use std::collections::HashSet;

/// Exports and configures every pin in `pin_numbers`, then groups them into a bus.
///
/// `pin_numbers[0]` becomes the least significant bit. All pins share `options`, and the bus
/// takes `options.direction`. If a pin fails to come up, the ones already exported are dropped
/// and follow `options.autorelease`.
pub fn create_parallel_data_bus(
    pin_numbers: &[u64],
    options: &PinOptions,
) -> Result<ParallelDataBus<SysfsPin>> {
    if pin_numbers.len() > MAX_PINS {
        return Err(Error::PinArrayExpected(format!(
            "at most {} pins fit in a bus, got {}",
            MAX_PINS,
            pin_numbers.len()
        )));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = pin_numbers.iter().find(|n| !seen.insert(**n)) {
        return Err(Error::PinArrayExpected(format!(
            "pin {} appears more than once",
            dup
        )));
    }

    log::info!(
        "Creating {} bus on pins {:?} via {}",
        options.direction,
        pin_numbers,
        options.device_path.display()
    );

    let pins = pin_numbers
        .iter()
        .map(|n| SysfsPin::new(*n, options))
        .collect::<Result<Vec<_>>>()?;

    ParallelDataBus::new(pins, options.direction)
}
