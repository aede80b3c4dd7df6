//! NZXT Kraken V3 Control CLI
//!
//! A minimal host for the driver: lists devices, polls telemetry and sets
//! fixed pump/fan speeds.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hidapi::HidApi;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use nzxt_kraken3_driver::config::DriverConfig;
use nzxt_kraken3_driver::device::{
    KrakenDevice, UsbTransport, select_device, supported_devices,
};
use nzxt_kraken3_driver::host::{DeviceLogger, NullLogger, SensorList, TracingLogger};
use nzxt_kraken3_driver::protocol::Channel;
use nzxt_kraken3_driver::utils::parsing::{parse_channel, parse_duty};

// =============================================================================
// CLI Arguments
// =============================================================================

/// NZXT Kraken V3 Control Tool
#[derive(Parser, Debug)]
#[command(name = "kraken3-cli")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Serial number of the device to use when several are connected
    #[arg(short, long, global = true)]
    serial: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List connected Kraken devices
    List,

    /// Poll the device once and show its status
    Status,

    /// Continuously monitor device status
    Monitor {
        /// Update interval in seconds (default from config)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Set fixed pump speed (clamped to 20-100)
    SetPump {
        /// Duty cycle percentage
        #[arg(allow_negative_numbers = true)]
        duty: String,
    },

    /// Set fixed fan speed (clamped to 0-100)
    SetFan {
        /// Duty cycle percentage
        #[arg(allow_negative_numbers = true)]
        duty: String,
    },

    /// Set fixed speed on a named channel
    Set {
        /// Channel: fan or pump
        channel: String,

        /// Duty cycle percentage
        #[arg(allow_negative_numbers = true)]
        duty: String,
    },

    /// Show the sensors a device registers
    Sensors,
}

// =============================================================================
// Main
// =============================================================================

fn main() -> Result<()> {
    let args = Args::parse();
    let config = DriverConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.log_level);

    let serial = args.serial.clone().or_else(|| config.serial.clone());

    match args.command {
        Command::List => cmd_list(),
        Command::Status => cmd_status(&config, serial.as_deref()),
        Command::Monitor { interval } => cmd_monitor(
            &config,
            serial.as_deref(),
            interval.unwrap_or(config.poll_interval_secs),
        ),
        Command::SetPump { duty } => cmd_set(&config, serial.as_deref(), Channel::Pump, &duty),
        Command::SetFan { duty } => cmd_set(&config, serial.as_deref(), Channel::Fan, &duty),
        Command::Set { channel, duty } => {
            let channel = parse_channel(&channel)?;
            cmd_set(&config, serial.as_deref(), channel, &duty)
        }
        Command::Sensors => cmd_sensors(&config, serial.as_deref()),
    }
}

fn init_tracing(default_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_device(
    config: &DriverConfig,
    serial: Option<&str>,
    logger: Rc<dyn DeviceLogger>,
    sensors: &mut SensorList,
) -> Result<KrakenDevice<UsbTransport>> {
    let api = Rc::new(HidApi::new().context("Failed to init HID")?);
    let entry = select_device(supported_devices(&api), serial)
        .context("Failed to find a supported Kraken")?;

    let transport =
        UsbTransport::new(Rc::clone(&api), &entry.path).with_read_timeout(config.read_timeout_ms);

    let device = KrakenDevice::attach(
        entry.product_id,
        entry.serial_or_path(),
        transport,
        logger,
        sensors,
    )?;
    Ok(device)
}

// =============================================================================
// Command Implementations
// =============================================================================

fn cmd_list() -> Result<()> {
    let api = HidApi::new().context("Failed to init HID")?;
    let devices = supported_devices(&api);

    if devices.is_empty() {
        println!("No supported Kraken devices found.");
        return Ok(());
    }

    println!("Found {} device(s):\n", devices.len());
    for (i, device) in devices.iter().enumerate() {
        println!(
            "  {}. {} (PID {:#06x})",
            i + 1,
            device.model.name,
            device.product_id
        );
        println!("     Serial: {}", device.serial.as_deref().unwrap_or("unknown"));
        println!("     Path:   {}", device.path.to_string_lossy());
    }

    Ok(())
}

fn cmd_status(config: &DriverConfig, serial: Option<&str>) -> Result<()> {
    let mut sensors = SensorList::new();
    let mut kraken = open_device(config, serial, Rc::new(TracingLogger), &mut sensors)?;
    kraken.update();
    print!("{}", kraken.readings());
    Ok(())
}

fn cmd_monitor(config: &DriverConfig, serial: Option<&str>, interval_secs: u64) -> Result<()> {
    let mut sensors = SensorList::new();
    let mut kraken = open_device(config, serial, Rc::new(TracingLogger), &mut sensors)?;

    // Setup Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("Failed to set Ctrl+C handler")?;

    println!(
        "Monitoring {} every {}s (Ctrl+C to stop)...\n",
        kraken.model().name,
        interval_secs
    );

    while running.load(Ordering::SeqCst) {
        kraken.update();

        // Clear screen and move cursor to top
        print!("\x1B[2J\x1B[1;1H");
        print!("{}", kraken.readings());

        std::thread::sleep(Duration::from_secs(interval_secs.max(1)));
    }

    println!("\nMonitoring stopped.");
    Ok(())
}

fn cmd_set(
    config: &DriverConfig,
    serial: Option<&str>,
    channel: Channel,
    duty: &str,
) -> Result<()> {
    let duty = parse_duty(duty)?;
    let mut sensors = SensorList::new();
    let mut kraken = open_device(config, serial, Rc::new(TracingLogger), &mut sensors)?;

    let written = kraken
        .try_set_control(channel, duty)
        .with_context(|| format!("Failed to set {} speed", channel))?;

    println!("{} speed set to {}%", channel, written);
    Ok(())
}

fn cmd_sensors(config: &DriverConfig, serial: Option<&str>) -> Result<()> {
    let mut sensors = SensorList::new();
    // Never polls, so nothing would reach the log
    let kraken = open_device(config, serial, Rc::new(NullLogger), &mut sensors)?;

    println!("{} registers {} sensor(s):", kraken.model().name, sensors.len());
    for sensor in sensors.iter() {
        println!(
            "  [{:<11}] {:<24} {}",
            sensor.kind.to_string(),
            sensor.id,
            sensor.name
        );
    }
    Ok(())
}
