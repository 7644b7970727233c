use crate::board::{AcquisitionBoard, BoardState, HardStopStatus};
use crate::device::{DeviceHandle, FrontPanelCommands, FrontPanelDevices, open_board};
use crate::fifo::Fifo;
use std::path::Path;
use std::time::Duration;
use xem_globals::{EndpointAddress, Result};

/// An acquisition board reached through a vendor device handle.
pub struct FrontPanel<H: DeviceHandle> {
    handle: H,
    state: BoardState,
}

impl<H: DeviceHandle> FrontPanel<H> {
    /// Wraps an opened device. The board starts uninitialized.
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            state: BoardState::new(),
        }
    }

    /// Opens the first attached device.
    pub fn from_first<D>(devices: &mut D) -> Result<Self>
    where
        D: FrontPanelDevices<Device = H>,
    {
        let handle = open_board(devices)?;
        log::debug!("opened front panel device");
        Ok(Self::new(handle))
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    pub fn into_handle(self) -> H {
        self.handle
    }

    pub fn is_pll_locked(&mut self) -> Result<bool> {
        self.state.ensure_initialized()?;
        self.handle.is_pll_locked()
    }

    /// Selects continuous (`true`) or single shot acquisition.
    pub fn set_run_mode(&mut self, continuous: bool) -> Result<()> {
        self.state.ensure_initialized()?;
        self.handle.set_run_mode(continuous)
    }

    pub fn set_num_samples(&mut self, num_samples: u32) -> Result<()> {
        self.state.ensure_initialized()?;
        self.handle.set_num_samples(num_samples)
    }

    pub fn reset_fifos(&mut self) -> Result<()> {
        self.state.ensure_initialized()?;
        self.handle.reset_fifos()
    }
}

impl<H: DeviceHandle> AcquisitionBoard for FrontPanel<H> {
    fn state(&self) -> &BoardState {
        &self.state
    }

    fn initialize_board(
        &mut self,
        bit_file: Option<&Path>,
        allow_reinitialization: bool,
    ) -> Result<()> {
        self.state.ensure_can_initialize(allow_reinitialization)?;
        self.handle.configure_board(bit_file)?;
        self.state.mark_initialized(bit_file);
        Ok(())
    }

    fn read_wire_out(&mut self, addr: EndpointAddress) -> Result<u32> {
        self.state.ensure_initialized()?;
        FrontPanelCommands::read_wire_out(&mut self.handle, addr)
    }

    fn set_wire_in(&mut self, addr: EndpointAddress, value: u32, mask: u32) -> Result<()> {
        self.state.ensure_initialized()?;
        FrontPanelCommands::set_wire_in(&mut self.handle, addr, value, mask)
    }

    fn activate_trigger_in(&mut self, addr: EndpointAddress, bit: u32) -> Result<()> {
        self.state.ensure_initialized()?;
        FrontPanelCommands::activate_trigger_in(&mut self.handle, addr, bit)
    }

    fn read_from_fifo(&mut self) -> Result<Vec<u8>> {
        self.state.ensure_initialized()?;
        Fifo::read_from_fifo(&mut self.handle)
    }

    fn get_num_words_fifo(&mut self) -> Result<u32> {
        self.state.ensure_initialized()?;
        FrontPanelCommands::get_num_words_fifo(&mut self.handle)
    }

    fn is_spi_running(&mut self) -> Result<bool> {
        self.state.ensure_initialized()?;
        FrontPanelCommands::is_spi_running(&mut self.handle)
    }

    fn start_acquisition(&mut self) -> Result<()> {
        self.state.ensure_can_start()?;
        self.handle.start_spi()?;
        self.state.mark_started();
        Ok(())
    }

    fn stop_acquisition(&mut self) -> Result<()> {
        self.state.ensure_can_stop()?;
        self.handle.stop_spi()?;
        self.state.mark_stopped();
        Ok(())
    }

    fn get_device_id(&mut self) -> Result<String> {
        self.state.ensure_initialized()?;
        FrontPanelCommands::get_device_id(&mut self.handle)
    }

    fn set_device_id(&mut self, id: &str) -> Result<()> {
        self.state.ensure_initialized()?;
        FrontPanelCommands::set_device_id(&mut self.handle, id)
    }

    fn get_serial_number(&mut self) -> Result<String> {
        self.state.ensure_initialized()?;
        FrontPanelCommands::get_serial_number(&mut self.handle)
    }

    fn hard_stop(&mut self, timeout: Option<Duration>) -> HardStopStatus {
        log::debug!("hard stop requested (timeout {timeout:?})");
        let mut status = HardStopStatus::new();
        status.insert("initialized".to_owned(), usize::from(self.state.is_initialized()));
        status.insert("spi_running".to_owned(), usize::from(self.state.is_spi_running()));
        status
    }
}
