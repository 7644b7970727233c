use std::path::PathBuf;

/// Failure reported by a front panel primitive through a negative return code.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareError {
    #[error("operation failed")]
    Failed,
    #[error("operation timed out")]
    Timeout,
    #[error("FPGA DONE signal did not go high after configuration")]
    DoneNotHigh,
    #[error("USB transfer error")]
    TransferError,
    #[error("communication error")]
    CommunicationError,
    #[error("invalid bitstream")]
    InvalidBitstream,
    #[error("file error")]
    FileError,
    #[error("device not open")]
    DeviceNotOpen,
    #[error("invalid endpoint")]
    InvalidEndpoint,
    #[error("invalid block size")]
    InvalidBlockSize,
    #[error("I2C restricted address")]
    I2CRestrictedAddress,
    #[error("I2C bit error")]
    I2CBitError,
    #[error("I2C nack error")]
    I2CNackError,
    #[error("I2C unknown status")]
    I2CUnknownStatus,
    #[error("unsupported feature")]
    UnsupportedFeature,
    #[error("FIFO underflow")]
    FIFOUnderflow,
    #[error("FIFO overflow")]
    FIFOOverflow,
    #[error("data alignment error")]
    DataAlignmentError,
    #[error("invalid reset profile")]
    InvalidResetProfile,
    #[error("invalid parameter")]
    InvalidParameter,
    /// A negative code outside the documented range.
    #[error("unrecognized hardware return code {0}")]
    ErrorNotRecognized(i32),
}

impl HardwareError {
    /// Maps a primitive return code. Non-negative codes are not errors.
    pub fn from_code(code: i32) -> Option<Self> {
        let kind = match code {
            0.. => return None,
            -1 => Self::Failed,
            -2 => Self::Timeout,
            -3 => Self::DoneNotHigh,
            -4 => Self::TransferError,
            -5 => Self::CommunicationError,
            -6 => Self::InvalidBitstream,
            -7 => Self::FileError,
            -8 => Self::DeviceNotOpen,
            -9 => Self::InvalidEndpoint,
            -10 => Self::InvalidBlockSize,
            -11 => Self::I2CRestrictedAddress,
            -12 => Self::I2CBitError,
            -13 => Self::I2CNackError,
            -14 => Self::I2CUnknownStatus,
            -15 => Self::UnsupportedFeature,
            -16 => Self::FIFOUnderflow,
            -17 => Self::FIFOOverflow,
            -18 => Self::DataAlignmentError,
            -19 => Self::InvalidResetProfile,
            -20 => Self::InvalidParameter,
            other => Self::ErrorNotRecognized(other),
        };
        Some(kind)
    }

    /// The vendor return code this error was created from.
    pub fn code(&self) -> i32 {
        match self {
            Self::Failed => -1,
            Self::Timeout => -2,
            Self::DoneNotHigh => -3,
            Self::TransferError => -4,
            Self::CommunicationError => -5,
            Self::InvalidBitstream => -6,
            Self::FileError => -7,
            Self::DeviceNotOpen => -8,
            Self::InvalidEndpoint => -9,
            Self::InvalidBlockSize => -10,
            Self::I2CRestrictedAddress => -11,
            Self::I2CBitError => -12,
            Self::I2CNackError => -13,
            Self::I2CUnknownStatus => -14,
            Self::UnsupportedFeature => -15,
            Self::FIFOUnderflow => -16,
            Self::FIFOOverflow => -17,
            Self::DataAlignmentError => -18,
            Self::InvalidResetProfile => -19,
            Self::InvalidParameter => -20,
            Self::ErrorNotRecognized(code) => *code,
        }
    }
}

/// Translates a primitive return code into the error it stands for, if any.
pub fn translate(code: i32) -> Option<HardwareError> {
    HardwareError::from_code(code)
}

/// Passes a primitive return code through [`translate`], handing back
/// non-negative codes (byte counts, status values) unchanged.
pub fn check_return_code(code: i32) -> Result<i32> {
    match translate(code) {
        None => Ok(code),
        Some(err) => {
            log::error!("device returned {code}: {err}");
            Err(Error::Hardware(err))
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A primitive returned a negative code.
    #[error("hardware error: {0}")]
    Hardware(#[from] HardwareError),
    #[error("board has not been initialized")]
    BoardNotInitialized,
    #[error("board has already been initialized")]
    BoardAlreadyInitialized,
    #[error("SPI acquisition is already running")]
    SpiAlreadyStarted,
    #[error("SPI acquisition is already stopped")]
    SpiAlreadyStopped,
    /// Device IDs are limited to 32 bytes of UTF-8.
    #[error("device ID is {len} bytes long, the limit is 32 bytes")]
    IdTooLong { len: usize },
    #[error("sample index must be 4 bytes, got {0}")]
    SampleIndexSize(usize),
    #[error("word must be 2 bytes, got {0}")]
    WordSize(usize),
    #[error("header must be 8 bytes, got {0}")]
    HeaderSize(usize),
    #[error("file {} not found, current working directory is {}", path.display(), cwd.display())]
    FileNotFound { path: PathBuf, cwd: PathBuf },
    #[error("no front panel device found")]
    NoDeviceFound,
    #[error("FrontPanel is not supported by the configured FPGA design")]
    FrontPanelNotSupported,
    /// A simulated pipe-out read whose length is not a whole number of round robins.
    #[error("Invalid value at index {index} of pipe-out {endpoint:#04x}: {len} bytes is not a multiple of the round robin size")]
    SimulatorInvalidFifoValue {
        endpoint: u8,
        index: usize,
        len: usize,
    },
    #[error("no simulated value queued for wire-out {endpoint:#04x}")]
    SimulatorQueueEmpty { endpoint: u8 },
    #[error("io")]
    Io(#[from] std::io::Error),
}

/// Result type for operations that may return an `Error`.
pub type Result<T> = std::result::Result<T, Error>;
