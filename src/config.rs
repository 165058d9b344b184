use anyhow::Result;
use parallel_gpio::PinOptions;
use serde::Deserialize;
use std::fs;

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct Config {
    /// Pin numbers, least significant bit first.
    pub pins: Vec<u64>,

    #[serde(flatten)]
    pub options: PinOptions,
}

impl Config {
    pub fn from_file(filename: &str) -> Result<Self> {
        Ok(toml::from_str(&fs::read_to_string(filename)?)?)
    }
}
