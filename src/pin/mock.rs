//! Test doubles: an in-memory [`Pin`] and a sysfs tree in a temporary directory.

use super::{Pin, PinOptions};
use crate::{
    direction::Direction,
    error::{Error, Result},
};
use std::{cell::RefCell, fs, io, path::Path, rc::Rc, time::Duration};
use tempfile::TempDir;

/// Calls made on a group of [`MockPin`]s, in the order they happened.
pub(crate) type CallLog = Rc<RefCell<Vec<String>>>;

#[derive(Debug)]
pub(crate) struct MockPin {
    number: u64,
    direction: Direction,
    value: bool,
    level: bool,
    autorelease: bool,
    fail_direction: bool,
    log: CallLog,
}

impl MockPin {
    pub(crate) fn new(number: u64, log: &CallLog) -> Self {
        Self {
            number,
            direction: Direction::In,
            value: false,
            level: false,
            autorelease: true,
            fail_direction: false,
            log: log.clone(),
        }
    }

    /// Level seen by reads in input mode.
    pub(crate) fn with_level(mut self, level: bool) -> Self {
        self.level = level;
        self
    }

    /// Makes every direction change fail as if the sysfs write was refused.
    pub(crate) fn failing_direction(mut self) -> Self {
        self.fail_direction = true;
        self
    }

    pub(crate) fn autorelease(&self) -> bool {
        self.autorelease
    }

    fn record(&self, call: String) {
        self.log.borrow_mut().push(call);
    }
}

impl Pin for MockPin {
    fn number(&self) -> u64 {
        self.number
    }

    fn get_value(&mut self) -> Result<bool> {
        match self.direction {
            Direction::In => {
                self.record(format!("get {}", self.number));
                Ok(self.level)
            }
            Direction::Out => Ok(self.value),
        }
    }

    fn set_value(&mut self, value: bool) -> Result<&mut Self> {
        if self.is_input() {
            return Err(Error::WriteOnInputMode);
        }
        self.record(format!("set {}={}", self.number, value as u8));
        self.value = value;
        Ok(self)
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn set_direction(&mut self, direction: Direction) -> Result<&mut Self> {
        if self.fail_direction {
            return Err(io::Error::from(io::ErrorKind::PermissionDenied).into());
        }
        self.record(format!("direction {}={}", self.number, direction));
        self.direction = direction;
        Ok(self)
    }

    fn enable_autorelease(&mut self) -> &mut Self {
        self.record(format!("autorelease {}=on", self.number));
        self.autorelease = true;
        self
    }

    fn disable_autorelease(&mut self) -> &mut Self {
        self.record(format!("autorelease {}=off", self.number));
        self.autorelease = false;
        self
    }

    fn release(self) -> Result<()> {
        self.record(format!("release {}", self.number));
        Ok(())
    }
}

/// A fake `/sys/class/gpio` with `export` and `unexport` control files.
///
/// Nothing reacts to writes to `export`; lines only appear when added with
/// [`FakeSysfs::add_line`].
pub(crate) struct FakeSysfs {
    dir: TempDir,
}

impl FakeSysfs {
    pub(crate) fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("export"), "").unwrap();
        fs::write(dir.path().join("unexport"), "").unwrap();
        Self { dir }
    }

    pub(crate) fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Creates `gpio<N>/direction` and `gpio<N>/value` as if the line was exported.
    pub(crate) fn add_line(&self, number: u64) {
        Self::create_line(self.path(), number);
    }

    /// Same as [`FakeSysfs::add_line`], usable from another thread. `value` is created before
    /// `direction` so a waiting export never sees a half-made line.
    pub(crate) fn create_line(root: &Path, number: u64) {
        let line = root.join(format!("gpio{}", number));
        fs::create_dir_all(&line).unwrap();
        fs::write(line.join("value"), "").unwrap();
        fs::write(line.join("direction"), "").unwrap();
    }

    pub(crate) fn read(&self, file: &str) -> String {
        fs::read_to_string(self.path().join(file)).unwrap()
    }

    pub(crate) fn write(&self, file: &str, contents: &str) {
        fs::write(self.path().join(file), contents).unwrap();
    }

    pub(crate) fn options(&self, direction: Direction, force: bool) -> PinOptions {
        PinOptions {
            direction,
            force,
            export_timeout: Duration::from_millis(10),
            autorelease: true,
            device_path: self.path().to_path_buf(),
        }
    }
}
