//! The board contract shared by real hardware and the simulator.

pub mod front_panel;
pub mod simulator;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use xem_globals::{DEVICE_ID_MAX_BYTES, EndpointAddress, Error, Result};

/// Status reported by [`AcquisitionBoard::hard_stop`].
pub type HardStopStatus = BTreeMap<String, usize>;

/// Lifecycle state of one board.
///
/// `Uninitialized -> Initialized { spi_running }`. SPI acquisition can only run
/// on an initialized board and start/stop strictly alternate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardState {
    initialized: bool,
    bit_file_name: Option<PathBuf>,
    spi_running: bool,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn bit_file_name(&self) -> Option<&Path> {
        self.bit_file_name.as_deref()
    }

    pub fn is_spi_running(&self) -> bool {
        self.spi_running
    }

    pub fn ensure_initialized(&self) -> Result<()> {
        if !self.initialized {
            log::error!("board accessed before initialization");
            return Err(Error::BoardNotInitialized);
        }
        Ok(())
    }

    pub fn ensure_can_initialize(&self, allow_reinitialization: bool) -> Result<()> {
        if self.initialized && !allow_reinitialization {
            log::error!("board is already initialized");
            return Err(Error::BoardAlreadyInitialized);
        }
        Ok(())
    }

    /// Reconfiguring the FPGA halts acquisition, so this also clears the SPI flag.
    pub fn mark_initialized(&mut self, bit_file: Option<&Path>) {
        self.initialized = true;
        self.bit_file_name = bit_file.map(Path::to_path_buf);
        self.spi_running = false;
        log::debug!("board initialized (bit file: {:?})", self.bit_file_name);
    }

    pub fn ensure_can_start(&self) -> Result<()> {
        self.ensure_initialized()?;
        if self.spi_running {
            log::error!("SPI acquisition is already running");
            return Err(Error::SpiAlreadyStarted);
        }
        Ok(())
    }

    pub fn mark_started(&mut self) {
        self.spi_running = true;
        log::debug!("SPI acquisition started");
    }

    pub fn ensure_can_stop(&self) -> Result<()> {
        self.ensure_initialized()?;
        if !self.spi_running {
            log::error!("SPI acquisition is already stopped");
            return Err(Error::SpiAlreadyStopped);
        }
        Ok(())
    }

    pub fn mark_stopped(&mut self) {
        self.spi_running = false;
        log::debug!("SPI acquisition stopped");
    }
}

/// Fails with [`Error::IdTooLong`] when `id` needs more than 32 bytes of UTF-8.
///
/// The limit is on bytes, so 17 two-byte characters are rejected.
pub fn validate_device_id(id: &str) -> Result<()> {
    if id.len() > DEVICE_ID_MAX_BYTES {
        log::error!("device ID {id:?} is {} bytes long", id.len());
        return Err(Error::IdTooLong { len: id.len() });
    }
    Ok(())
}

/// Stateful access to an acquisition board.
///
/// Every register and FIFO operation fails with [`Error::BoardNotInitialized`]
/// until [`initialize_board`] succeeded. Identity operations that reach the
/// device do too; [`FrontPanelSimulator`] keeps its identity locally and answers
/// them at any time.
///
/// [`initialize_board`]: AcquisitionBoard::initialize_board
/// [`FrontPanelSimulator`]: simulator::FrontPanelSimulator
pub trait AcquisitionBoard {
    fn state(&self) -> &BoardState;

    /// Brings the board up, loading `bit_file` first when given.
    ///
    /// Fails with [`Error::BoardAlreadyInitialized`] on a second call unless
    /// `allow_reinitialization` is set.
    fn initialize_board(&mut self, bit_file: Option<&Path>, allow_reinitialization: bool)
    -> Result<()>;

    fn read_wire_out(&mut self, addr: EndpointAddress) -> Result<u32>;
    fn set_wire_in(&mut self, addr: EndpointAddress, value: u32, mask: u32) -> Result<()>;
    fn activate_trigger_in(&mut self, addr: EndpointAddress, bit: u32) -> Result<()>;
    fn read_from_fifo(&mut self) -> Result<Vec<u8>>;
    fn get_num_words_fifo(&mut self) -> Result<u32>;
    fn is_spi_running(&mut self) -> Result<bool>;
    /// Pulses the SPI start trigger. Fails with [`Error::SpiAlreadyStarted`]
    /// when the tracked state says acquisition runs; wire-out `0x22` is not queried.
    fn start_acquisition(&mut self) -> Result<()>;
    /// Pulses the SPI stop trigger. Fails with [`Error::SpiAlreadyStopped`]
    /// when the tracked state says acquisition is stopped; wire-out `0x22` is not queried.
    fn stop_acquisition(&mut self) -> Result<()>;
    fn get_device_id(&mut self) -> Result<String>;
    fn set_device_id(&mut self, id: &str) -> Result<()>;
    fn get_serial_number(&mut self) -> Result<String>;

    /// Shutdown hook for process supervisors. Does not touch the device.
    fn hard_stop(&mut self, timeout: Option<Duration>) -> HardStopStatus;

    fn is_board_initialized(&self) -> bool {
        self.state().is_initialized()
    }

    fn bit_file_name(&self) -> Option<&Path> {
        self.state().bit_file_name()
    }

    /// The SPI state tracked by this value, without asking the device.
    fn internal_spi_running_status(&self) -> bool {
        self.state().is_spi_running()
    }
}
