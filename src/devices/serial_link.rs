use std::io::Write;
use std::time::Duration;

use serialport::{DataBits, Parity, StopBits};
use tracing::{info, warn};

use crate::error::Result;

/// Where the record stream goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Serial { port: String, baud_rate: u32 },
    Stdout,
}

impl OutputTarget {
    /// Establish the stream. Serial links are opened 8N1 at the given rate.
    pub fn open(&self) -> Result<Box<dyn Write + Send>> {
        match self {
            OutputTarget::Serial { port, baud_rate } => {
                info!("Opening serial port {} at {} baud", port, baud_rate);
                let link = serialport::new(port.as_str(), *baud_rate)
                    .data_bits(DataBits::Eight)
                    .parity(Parity::None)
                    .stop_bits(StopBits::One)
                    .timeout(Duration::from_secs(1))
                    .open()?;
                info!("Serial port {} opened", port);
                Ok(Box::new(link))
            }
            OutputTarget::Stdout => {
                info!("Writing records to stdout");
                Ok(Box::new(std::io::stdout()))
            }
        }
    }
}

/// Names of the serial ports the OS currently reports.
pub fn list_ports() -> Result<Vec<String>> {
    let ports = serialport::available_ports()?;
    if ports.is_empty() {
        warn!("No serial ports found");
    }
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}
