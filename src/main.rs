mod acquisition;
mod config;
mod devices;
mod error;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use config::AcquisitionConfig;
use devices::{MonotonicClock, SimulatedAdc};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{EnvFilter, fmt};

/// Poll the pressure, magnetic and temperature channels and stream them as CSV.
#[derive(Parser, Debug)]
#[command(name = "sensor-logger", version)]
struct Cli {
    /// Serial port to write records to; stdout when omitted
    #[arg(long)]
    port: Option<String>,

    /// Serial symbol rate
    #[arg(long)]
    baud: Option<u32>,

    /// Pause after each record, in milliseconds
    #[arg(long)]
    period_ms: Option<u64>,

    /// Pause before the header, in milliseconds
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Stop after this many records
    #[arg(long)]
    cycles: Option<u64>,

    /// Stop after this many seconds
    #[arg(long)]
    duration_secs: Option<u64>,

    /// Simulated ADC jitter, in counts
    #[arg(long)]
    noise: Option<u16>,

    /// Seed for the simulated ADC, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,

    /// Print the available serial ports and exit
    #[arg(long)]
    list_ports: bool,
}

impl Cli {
    /// Flags take precedence over the config file.
    fn apply(&self, config: &mut AcquisitionConfig) {
        if let Some(port) = &self.port {
            config.port = Some(port.clone());
        }
        if let Some(baud) = self.baud {
            config.baud_rate = baud;
        }
        if let Some(period_ms) = self.period_ms {
            config.period_ms = period_ms;
        }
        if let Some(settle_ms) = self.settle_ms {
            config.settle_ms = settle_ms;
        }
        if let Some(cycles) = self.cycles {
            config.max_cycles = Some(cycles);
        }
        if let Some(noise) = self.noise {
            config.noise = noise;
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to file only; stdout may be the data stream.
    let _guard = setup_logging(&cli.log_dir);
    info!(
        "Starting sensor-logger at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );

    if cli.list_ports {
        for port in devices::list_ports()? {
            println!("{}", port);
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => AcquisitionConfig::load(path)?,
        None => AcquisitionConfig::default(),
    };
    cli.apply(&mut config);
    config.validate()?;
    info!("Acquisition configuration: {:?}", config);

    let sink = match config.output_target().open() {
        Ok(sink) => sink,
        Err(e) => {
            error!("Failed to open output stream: {}", e);
            return Err(Box::new(e));
        }
    };

    let stop = Arc::new(AtomicBool::new(false));
    if let Some(secs) = cli.duration_secs {
        let stop = Arc::clone(&stop);
        std::thread::spawn(move || {
            std::thread::sleep(Duration::from_secs(secs));
            info!("Run time of {} s elapsed, stopping", secs);
            stop.store(true, Ordering::Relaxed);
        });
    }

    let mut adc = match config.seed {
        Some(seed) => SimulatedAdc::with_seed(config.baselines, config.noise, seed),
        None => SimulatedAdc::new(config.baselines, config.noise),
    };
    let clock = MonotonicClock::start();

    match acquisition::run_acquisition(&mut adc, &clock, sink, &config, &stop) {
        Ok(records) => {
            info!("Acquisition finished, {} records written", records);
        }
        Err(e) => {
            error!("Acquisition failed: {}", e);
            eprintln!("Acquisition failed: {}", e);
            return Err(Box::new(e));
        }
    }

    info!("Application shutting down");
    Ok(())
}

fn setup_logging(log_dir: &std::path::Path) -> WorkerGuard {
    // Daily rotated file, level from RUST_LOG (default info)
    let file_appender = rolling::daily(log_dir, "sensor-logger.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_level(true)
        .init();

    guard
}
