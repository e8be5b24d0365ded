use thiserror::Error;

/// Failures the host shell can hit around the acquisition loop.
///
/// Channel reads never fail; only the output stream and the configuration can.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AcquisitionError>;
