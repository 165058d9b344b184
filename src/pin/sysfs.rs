use super::{Pin, PinOptions};
use crate::{
    direction::Direction,
    error::{Error, Result},
};
use nix::unistd::{self, AccessFlags};
use std::{
    fs::{self, File, OpenOptions},
    io::{self, Read, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

const EXPORT_POLL_INTERVAL: Duration = Duration::from_micros(10);

#[derive(Clone, Debug)]
struct Paths {
    export: PathBuf,
    unexport: PathBuf,
    direction: PathBuf,
    value: PathBuf,
}

impl Paths {
    fn new(device_path: &Path, number: u64) -> Self {
        let line = device_path.join(format!("gpio{}", number));
        Self {
            export: device_path.join("export"),
            unexport: device_path.join("unexport"),
            direction: line.join("direction"),
            value: line.join("value"),
        }
    }
}

/// Writable by the effective user. Attributes without any write bit count as read-only even for
/// root, since sysfs refuses writes to them regardless of privileges.
fn is_writable(path: &Path) -> bool {
    let has_write_bit = fs::metadata(path)
        .map(|m| !m.permissions().readonly())
        .unwrap_or(false);
    has_write_bit && unistd::access(path, AccessFlags::W_OK).is_ok()
}

/// A line driven through `/sys/class/gpio`.
///
/// The line is exported and configured by [`SysfsPin::new`] and keeps its `value` file open for
/// its whole life. With autorelease enabled the line is unexported on drop, otherwise it is left
/// exported for whoever comes next.
#[derive(Debug)]
pub struct SysfsPin {
    number: u64,
    direction: Direction,
    value: bool,
    value_file: Option<File>,
    autorelease: bool,
    paths: Paths,
}

impl SysfsPin {
    pub fn new(number: u64, options: &PinOptions) -> Result<Self> {
        let paths = Paths::new(&options.device_path, number);
        let value_file = export(number, &paths, options)?;

        Ok(Self {
            number,
            direction: options.direction,
            value: false,
            value_file: Some(value_file),
            autorelease: options.autorelease,
            paths,
        })
    }

    fn value_file(&mut self) -> Result<&mut File> {
        self.value_file.as_mut().ok_or_else(|| {
            Error::from(io::Error::new(io::ErrorKind::NotConnected, "value file closed"))
        })
    }

    fn unexport(&mut self) -> Result<()> {
        drop(self.value_file.take());
        log::debug!("Unexporting pin {}", self.number);
        fs::write(&self.paths.unexport, self.number.to_string())?;
        Ok(())
    }
}

fn export(number: u64, paths: &Paths, options: &PinOptions) -> Result<File> {
    if !paths.export.exists() {
        return Err(Error::GpioNotFound(paths.export.clone()));
    }
    if !is_writable(&paths.export) {
        return Err(Error::PermissionDenied(paths.export.clone()));
    }

    if paths.direction.exists() {
        if !options.force {
            return Err(Error::PinOccupied(number));
        }
        log::warn!("Pin {} is already exported, reclaiming it", number);
        fs::write(&paths.unexport, number.to_string())?;
    }

    log::debug!("Exporting pin {}", number);
    fs::write(&paths.export, number.to_string()).map_err(|e| match e.kind() {
        io::ErrorKind::PermissionDenied => Error::PermissionDenied(paths.export.clone()),
        _ => Error::Io(e),
    })?;

    let mut waited = Duration::ZERO;
    while !is_writable(&paths.direction) {
        thread::sleep(EXPORT_POLL_INTERVAL);
        waited += EXPORT_POLL_INTERVAL;
        if waited > options.export_timeout {
            return Err(Error::ExportTimeout {
                pin: number,
                timeout: options.export_timeout,
            });
        }
    }

    log::debug!("Setting pin {} direction={}", number, options.direction);
    fs::write(&paths.direction, options.direction.as_str())?;

    Ok(OpenOptions::new()
        .read(true)
        .write(true)
        .open(&paths.value)?)
}

impl Pin for SysfsPin {
    fn number(&self) -> u64 {
        self.number
    }

    fn get_value(&mut self) -> Result<bool> {
        if self.is_output() {
            return Ok(self.value);
        }

        let file = self.value_file()?;
        file.seek(SeekFrom::Start(0))?;
        let mut buf = [0u8; 1];
        if file.read(&mut buf)? == 0 {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        Ok(buf[0] == b'1')
    }

    fn set_value(&mut self, value: bool) -> Result<&mut Self> {
        if self.is_input() {
            return Err(Error::WriteOnInputMode);
        }

        log::debug!("Setting pin {} value={}", self.number, value);
        self.value = value;
        let file = self.value_file()?;
        file.seek(SeekFrom::Start(0))?;
        file.write_all(if value { b"1" } else { b"0" })?;
        Ok(self)
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn set_direction(&mut self, direction: Direction) -> Result<&mut Self> {
        log::debug!("Setting pin {} direction={}", self.number, direction);
        fs::write(&self.paths.direction, direction.as_str())?;
        self.direction = direction;
        Ok(self)
    }

    fn enable_autorelease(&mut self) -> &mut Self {
        self.autorelease = true;
        self
    }

    fn disable_autorelease(&mut self) -> &mut Self {
        self.autorelease = false;
        self
    }

    fn release(mut self) -> Result<()> {
        self.autorelease = false;
        self.unexport()
    }
}

impl Drop for SysfsPin {
    fn drop(&mut self) {
        if self.autorelease {
            if let Err(e) = self.unexport() {
                log::error!("Failed to release pin {}: {}", self.number, e);
            }
        }
    }
}
