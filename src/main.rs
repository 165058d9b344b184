mod config;
mod schema;

use crate::{config::Config, schema::Reading};
use anyhow::Result;
use clap::{Parser, Subcommand};
use parallel_gpio::{create_parallel_data_bus, Direction, ParallelDataBus, PinOptions, SysfsPin};
use tokio::{
    signal,
    time::{self, Duration},
};

/// Read and drive a group of GPIO pins as a single binary number.
#[derive(Clone, Debug, Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[clap(long, env = "CONFIG_FILE", default_value = "./config.toml")]
    config_file: String,

    /// Leave the pins exported on exit after `read` or `watch`
    #[clap(long)]
    keep_exported: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// Read the bus once
    Read,
    /// Drive the bus with a value. The pins stay exported on exit so the value holds
    Write {
        /// Decimal, or hexadecimal with a 0x prefix
        #[clap(value_parser = parse_value)]
        value: u64,
    },
    /// Print the bus value every time it changes, until Ctrl-C
    Watch {
        /// Polling interval in milliseconds
        #[clap(long, default_value_t = 100)]
        interval_ms: u64,
    },
}

fn parse_value(s: &str) -> Result<u64, std::num::ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

fn open_bus(
    config: &Config,
    direction: Direction,
    keep_exported: bool,
) -> Result<ParallelDataBus<SysfsPin>> {
    let options = PinOptions {
        direction,
        ..config.options.clone()
    };
    let mut bus = create_parallel_data_bus(&config.pins, &options)?;
    if keep_exported {
        bus.disable_autorelease();
    }
    Ok(bus)
}

/// Releasing the pins on exit would drop the value just written, so they stay exported.
fn drive_bus(config: &Config, value: u64) -> Result<ParallelDataBus<SysfsPin>> {
    let mut bus = open_bus(config, Direction::Out, true)?;
    bus.set_value(value)?;
    Ok(bus)
}

fn print_reading(value: u64, width: usize) -> Result<()> {
    println!("{}", serde_json::to_string(&Reading::new(value, width))?);
    Ok(())
}

async fn watch(bus: &mut ParallelDataBus<SysfsPin>, interval: Duration) -> Result<()> {
    let mut beat = time::interval(interval);
    let mut prev = None;

    loop {
        tokio::select! {
            _ = beat.tick() => {
                let value = bus.get_value()?;
                if prev != Some(value) {
                    print_reading(value, bus.count_pins())?;
                    prev = Some(value);
                }
            }
            res = signal::ctrl_c() => {
                if let Err(err) = res {
                    log::error!("Unable to listen for shutdown signal: {}", err);
                }
                return Ok(());
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();
    log::debug!("{:?}", args);

    let config = Config::from_file(&args.config_file)?;
    log::debug!("{:?}", config);

    match args.command {
        Command::Read => {
            let mut bus = open_bus(&config, Direction::In, args.keep_exported)?;
            print_reading(bus.get_value()?, bus.count_pins())?;
        }
        Command::Write { value } => {
            let mut bus = drive_bus(&config, value)?;
            print_reading(bus.get_value()?, bus.count_pins())?;
        }
        Command::Watch { interval_ms } => {
            let mut bus = open_bus(&config, Direction::In, args.keep_exported)?;
            watch(&mut bus, Duration::from_millis(interval_ms)).await?;
        }
    }

    log::info! {"Terminating..."};
    Ok(())
}
