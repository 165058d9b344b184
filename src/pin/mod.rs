//! GPIO line handles.
//!
//! [`Pin`] is the capability every line handle provides, whether it is backed by the kernel's
//! sysfs interface ([`SysfsPin`]) or by a test double. [`ParallelDataBus`](crate::ParallelDataBus)
//! is generic over it.

#[cfg(test)]
pub(crate) mod mock;
mod sysfs;

pub use sysfs::SysfsPin;

use crate::{direction::Direction, error::Result};
use serde::Deserialize;
use std::{path::PathBuf, time::Duration};

pub const DEFAULT_DEVICE_PATH: &str = "/sys/class/gpio/";
pub const DEFAULT_EXPORT_TIMEOUT: Duration = Duration::from_micros(10_000);

mod duration_format {
    use serde::{self, Deserialize, Deserializer};
    use std::time::Duration;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Duration::from_micros(u64::deserialize(deserializer)?))
    }
}

fn default_export_timeout() -> Duration {
    DEFAULT_EXPORT_TIMEOUT
}

fn default_autorelease() -> bool {
    true
}

fn default_device_path() -> PathBuf {
    PathBuf::from(DEFAULT_DEVICE_PATH)
}

/// How a line is acquired and what happens to it when its handle goes away.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct PinOptions {
    /// Direction applied right after export.
    #[serde(default)]
    pub direction: Direction,

    /// Reclaim a line that is already exported instead of failing with
    /// [`Error::PinOccupied`](crate::Error::PinOccupied).
    #[serde(default)]
    pub force: bool,

    /// Upper bound on the wait for the kernel to create the line's control files.
    /// Expressed in microseconds in configuration files.
    #[serde(default = "default_export_timeout", with = "duration_format")]
    pub export_timeout: Duration,

    /// Unexport the line when the handle is dropped.
    #[serde(default = "default_autorelease")]
    pub autorelease: bool,

    /// Root of the sysfs GPIO class directory.
    #[serde(default = "default_device_path")]
    pub device_path: PathBuf,
}

impl Default for PinOptions {
    fn default() -> Self {
        Self {
            direction: Direction::default(),
            force: false,
            export_timeout: default_export_timeout(),
            autorelease: default_autorelease(),
            device_path: default_device_path(),
        }
    }
}

/// A single exportable, direction-configurable, boolean-valued line.
pub trait Pin {
    /// Kernel line number.
    fn number(&self) -> u64;

    /// Reads the line in input mode, returns the last written value in output mode.
    fn get_value(&mut self) -> Result<bool>;

    /// Drives the line.
    ///
    /// # Errors
    ///
    /// [`Error::WriteOnInputMode`](crate::Error::WriteOnInputMode) if the line is an input.
    fn set_value(&mut self, value: bool) -> Result<&mut Self>;

    fn direction(&self) -> Direction;

    /// Reconfigures the line. Internal state only changes once the kernel accepted the write.
    fn set_direction(&mut self, direction: Direction) -> Result<&mut Self>;

    fn is_input(&self) -> bool {
        self.direction() == Direction::In
    }

    fn is_output(&self) -> bool {
        self.direction() == Direction::Out
    }

    fn enable_autorelease(&mut self) -> &mut Self;

    fn disable_autorelease(&mut self) -> &mut Self;

    /// Gives the line back to the kernel now, reporting any failure.
    ///
    /// Unlike dropping the handle, this ignores the autorelease flag.
    fn release(self) -> Result<()>
    where
        Self: Sized;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_defaults() {
        let options = PinOptions::default();
        assert_eq!(options.direction, Direction::In);
        assert!(!options.force);
        assert_eq!(options.export_timeout, Duration::from_millis(10));
        assert!(options.autorelease);
        assert_eq!(options.device_path, PathBuf::from("/sys/class/gpio/"));
    }

    #[test]
    fn options_from_empty_toml() {
        let options: PinOptions = toml::from_str("").unwrap();
        assert_eq!(options, PinOptions::default());
    }

    #[test]
    fn options_from_toml() {
        let options: PinOptions = toml::from_str(
            r#"
            direction = "out"
            force = true
            export_timeout = 250
            autorelease = false
            device_path = "/tmp/gpio/"
            "#,
        )
        .unwrap();

        assert_eq!(options.direction, Direction::Out);
        assert!(options.force);
        assert_eq!(options.export_timeout, Duration::from_micros(250));
        assert!(!options.autorelease);
        assert_eq!(options.device_path, PathBuf::from("/tmp/gpio/"));
    }

    #[test]
    fn options_reject_invalid_direction() {
        assert!(toml::from_str::<PinOptions>("direction = \"meow\"").is_err());
    }
}
