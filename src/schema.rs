use chrono::{offset::Local, DateTime};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct Reading {
    pub value: u64,
    /// Pin levels in bus order, least significant bit first.
    pub pins: Vec<bool>,
    pub timestamp: DateTime<Local>,
}

impl Reading {
    pub(crate) fn new(value: u64, width: usize) -> Self {
        Self {
            value,
            pins: (0..width).map(|bit| (value >> bit) & 1 == 1).collect(),
            timestamp: Local::now(),
        }
    }
}
