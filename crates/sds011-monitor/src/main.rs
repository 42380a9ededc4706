//! Reference entry point for the SDS011 monitor.
//!
//! Opens a serial device node and either drives the command/response
//! startup sequence (set reporting mode, set work cycle, log readouts) or,
//! with `--stream`, decodes the continuous readout stream. Line discipline
//! is not configured here: set the port up externally first, e.g.
//! `stty -F /dev/ttyUSB0 9600 raw`.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use sds011_monitor::driver::{self, Event};
use sds011_protocol::{Command, Response};
use tokio::fs::{File, OpenOptions};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sds011-monitor", about = "Monitor an SDS011 particulate-matter sensor")]
struct Args {
    /// Serial device node, e.g. /dev/ttyUSB0 (pre-configured to 9600 8N1 raw).
    device: PathBuf,

    /// Decode the continuous readout stream instead of driving commands.
    #[arg(long)]
    stream: bool,

    /// Working cycle period in minutes (0 = continuous).
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=30))]
    cycle: u8,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if args.stream {
        run_stream_mode(&args).await;
    } else {
        run_command_mode(&args).await;
    }
}

/// Open the device or exit; transport failure at startup is fatal.
async fn open_device(path: &PathBuf, write: bool) -> File {
    match OpenOptions::new().read(true).write(write).open(path).await {
        Ok(file) => file,
        Err(e) => {
            error!("failed to open {}: {}", path.display(), e);
            process::exit(1);
        }
    }
}

async fn run_command_mode(args: &Args) {
    let file = open_device(&args.device, true).await;
    let writer = match file.try_clone().await {
        Ok(f) => f,
        Err(e) => {
            error!("failed to clone device handle: {}", e);
            process::exit(1);
        }
    };

    let (handle, mut events) = driver::spawn_command_mode(file, writer);

    while let Some(event) = events.recv().await {
        let sent = match event {
            Event::Ready => {
                info!("setting reporting mode to active");
                handle.send(&Command::SetReportingMode { active: true }).await
            }
            Event::Response(Response::ReportingMode { active }) => {
                info!(active, "reporting mode confirmed; setting work cycle");
                handle
                    .send(&Command::SetCycle {
                        interval_minutes: args.cycle,
                    })
                    .await
            }
            Event::Response(Response::Cycle { interval_minutes }) => {
                info!(interval_minutes, "work cycle confirmed; awaiting readings");
                Ok(())
            }
            Event::Response(Response::Readout(r)) => {
                info!(
                    pm10 = r.pm10,
                    pm10_grade = %r.pm10_grade(),
                    pm25 = r.pm25,
                    pm25_grade = %r.pm25_grade(),
                    device = %r.device_id,
                    "readout"
                );
                Ok(())
            }
            Event::Response(Response::Unknown { raw }) => {
                warn!("unknown frame: {}", hex::encode(&raw));
                Ok(())
            }
            Event::Response(other) => {
                info!(response = ?other, "response");
                Ok(())
            }
            Event::Reading(_) => Ok(()),
        };

        if sent.is_err() {
            // Driver task is gone; its own log explains why.
            break;
        }
    }
}

async fn run_stream_mode(args: &Args) {
    let file = open_device(&args.device, false).await;
    let mut events = driver::spawn_stream_mode(file);

    while let Some(event) = events.recv().await {
        match event {
            Event::Ready => info!("awaiting readings"),
            Event::Reading(r) => {
                info!(
                    pm10 = r.pm10,
                    pm10_grade = %r.pm10_grade(),
                    pm25 = r.pm25,
                    pm25_grade = %r.pm25_grade(),
                    "reading"
                );
            }
            Event::Response(_) => {}
        }
    }
}
