//! A board that answers from pre-loaded queues instead of hardware.

pub mod queues;

pub use queues::{SimulatedQueue, SimulatedQueues};

use crate::board::{AcquisitionBoard, BoardState, HardStopStatus, validate_device_id};
use crate::device::check_file_exists;
use std::path::Path;
use std::time::Duration;
use xem_frame::is_valid_read_size;
use xem_globals::{
    DEFAULT_XEM_SERIAL_NUMBER, EndpointAddress, Error, PIPE_OUT_FIFO, Result, WORD_SIZE_BYTES,
};

pub struct FrontPanelSimulator {
    queues: SimulatedQueues,
    state: BoardState,
    device_id: String,
    serial_number: String,
}

impl FrontPanelSimulator {
    /// Fails with [`Error::SimulatorInvalidFifoValue`] if any queued pipe-out
    /// buffer is not a whole number of round robins. Queues are left untouched.
    pub fn new(queues: SimulatedQueues) -> Result<Self> {
        for (endpoint, queue) in queues.pipe_outs() {
            validate_simulated_fifo_reads(endpoint, queue)?;
        }
        Ok(Self {
            queues,
            state: BoardState::new(),
            device_id: String::new(),
            serial_number: DEFAULT_XEM_SERIAL_NUMBER.to_owned(),
        })
    }

    pub fn queues(&self) -> &SimulatedQueues {
        &self.queues
    }
}

/// Checks that every buffer queued for pipe-out `endpoint` is a whole number
/// of round robins, in enqueue order, without consuming any.
pub fn validate_simulated_fifo_reads(
    endpoint: EndpointAddress,
    queue: &SimulatedQueue<Vec<u8>>,
) -> Result<()> {
    queue.inspect(|items| {
        match items
            .iter()
            .position(|item| !is_valid_read_size(item.len()))
        {
            None => Ok(()),
            Some(index) => {
                let len = items[index].len();
                log::error!("pipe-out {endpoint:#04x} entry {index} has {len} bytes");
                Err(Error::SimulatorInvalidFifoValue {
                    endpoint,
                    index,
                    len,
                })
            }
        }
    })
}

impl AcquisitionBoard for FrontPanelSimulator {
    fn state(&self) -> &BoardState {
        &self.state
    }

    fn initialize_board(
        &mut self,
        bit_file: Option<&Path>,
        allow_reinitialization: bool,
    ) -> Result<()> {
        self.state.ensure_can_initialize(allow_reinitialization)?;
        if let Some(bit_file) = bit_file {
            check_file_exists(bit_file)?;
        }
        self.state.mark_initialized(bit_file);
        Ok(())
    }

    fn read_wire_out(&mut self, addr: EndpointAddress) -> Result<u32> {
        self.state.ensure_initialized()?;
        let value = self
            .queues
            .wire_out(addr)
            .and_then(SimulatedQueue::pop)
            .ok_or_else(|| {
                log::error!("no simulated value for wire-out {addr:#04x}");
                Error::SimulatorQueueEmpty { endpoint: addr }
            })?;
        log::trace!("simulated wire-out {addr:#04x} = {value:#010x}");
        Ok(value)
    }

    fn set_wire_in(&mut self, addr: EndpointAddress, value: u32, mask: u32) -> Result<()> {
        self.state.ensure_initialized()?;
        log::trace!("simulated wire-in {addr:#04x} <- {value:#010x} (mask {mask:#010x})");
        Ok(())
    }

    fn activate_trigger_in(&mut self, addr: EndpointAddress, bit: u32) -> Result<()> {
        self.state.ensure_initialized()?;
        log::trace!("simulated trigger-in {addr:#04x} bit {bit:#x}");
        Ok(())
    }

    fn read_from_fifo(&mut self) -> Result<Vec<u8>> {
        self.state.ensure_initialized()?;
        let buffer = self
            .queues
            .pipe_out(PIPE_OUT_FIFO)
            .and_then(SimulatedQueue::pop)
            .unwrap_or_default();
        log::trace!("simulated FIFO read of {} bytes", buffer.len());
        Ok(buffer)
    }

    fn get_num_words_fifo(&mut self) -> Result<u32> {
        self.state.ensure_initialized()?;
        let bytes = self
            .queues
            .pipe_out(PIPE_OUT_FIFO)
            .and_then(|queue| queue.peek_map(Vec::len))
            .unwrap_or(0);
        Ok(u32::try_from(bytes / WORD_SIZE_BYTES as usize).unwrap_or(u32::MAX))
    }

    fn is_spi_running(&mut self) -> Result<bool> {
        self.state.ensure_initialized()?;
        Ok(self.state.is_spi_running())
    }

    fn start_acquisition(&mut self) -> Result<()> {
        self.state.ensure_can_start()?;
        self.state.mark_started();
        Ok(())
    }

    fn stop_acquisition(&mut self) -> Result<()> {
        self.state.ensure_can_stop()?;
        self.state.mark_stopped();
        Ok(())
    }

    /// Identity is local to the simulator and works before initialization.
    fn get_device_id(&mut self) -> Result<String> {
        Ok(self.device_id.clone())
    }

    fn set_device_id(&mut self, id: &str) -> Result<()> {
        validate_device_id(id)?;
        self.device_id = id.to_owned();
        Ok(())
    }

    fn get_serial_number(&mut self) -> Result<String> {
        Ok(self.serial_number.clone())
    }

    /// Reports how many entries are left in every bound queue, keyed
    /// `wire_out_0x..` and `pipe_out_0x..`.
    fn hard_stop(&mut self, timeout: Option<Duration>) -> HardStopStatus {
        log::debug!("simulator hard stop requested (timeout {timeout:?})");
        let wire_outs = self
            .queues
            .wire_outs()
            .map(|(addr, queue)| (format!("wire_out_{addr:#04x}"), queue.len()));
        let pipe_outs = self
            .queues
            .pipe_outs()
            .map(|(addr, queue)| (format!("pipe_out_{addr:#04x}"), queue.len()));
        wire_outs.chain(pipe_outs).collect()
    }
}
