use std::{io, path::PathBuf, time::Duration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid direction {0:?}, expected \"in\" or \"out\"")]
    InvalidDirection(String),

    #[error("GPIO not found, {} does not exist", .0.display())]
    GpioNotFound(PathBuf),

    #[error("permission denied, {} is not writable", .0.display())]
    PermissionDenied(PathBuf),

    #[error("pin {0} is occupied (already exported)")]
    PinOccupied(u64),

    #[error("pin {pin} was not exported within {timeout:?}")]
    ExportTimeout { pin: u64, timeout: Duration },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot write a value in input mode")]
    WriteOnInputMode,

    #[error("value {value} is out of range 0..={max}")]
    OutOfRange { value: String, max: u64 },

    #[error("pin array expected: {0}")]
    PinArrayExpected(String),
}

pub type Result<T> = std::result::Result<T, Error>;
