use crate::device::{DeviceHandle, FrontPanelCommands};
use xem_frame::aligned_read_size;
use xem_globals::{
    BLOCK_SIZE, PIPE_OUT_FIFO, RESET_MODE_FIFO_RESET_BIT, RESET_MODE_FIFO_STAGE_BIT, Result,
    WIRE_IN_RESET_MODE, check_return_code,
};

/// Block reads from the acquisition FIFO.
pub trait Fifo {
    /// Drains every whole round robin currently buffered on the device.
    ///
    /// Returns an empty buffer without a transfer while less than one round
    /// robin is available.
    fn read_from_fifo(&mut self) -> Result<Vec<u8>>;
    /// Clears the acquisition FIFOs.
    fn reset_fifos(&mut self) -> Result<()>;
}

impl<T: DeviceHandle + ?Sized> Fifo for T {
    fn read_from_fifo(&mut self) -> Result<Vec<u8>> {
        let num_words = self.get_num_words_fifo()?;
        let read_size = aligned_read_size(num_words);
        if read_size == 0 {
            log::trace!("{num_words} words buffered, waiting for a full round robin");
            return Ok(Vec::new());
        }

        pulse_reset_bit(self, RESET_MODE_FIFO_STAGE_BIT)?;

        let mut buffer = vec![0u8; read_size as usize];
        let transferred = check_return_code(self.read_from_block_pipe(
            PIPE_OUT_FIFO,
            BLOCK_SIZE,
            &mut buffer,
        ))?;
        log::trace!("read {transferred} of {read_size} bytes from the FIFO ({num_words} words buffered)");
        Ok(buffer)
    }

    fn reset_fifos(&mut self) -> Result<()> {
        log::debug!("resetting FIFOs");
        pulse_reset_bit(self, RESET_MODE_FIFO_RESET_BIT)
    }
}

/// Sets and then clears one bit of the reset-mode wire-in.
fn pulse_reset_bit<T: DeviceHandle + ?Sized>(device: &mut T, bit: u32) -> Result<()> {
    device.set_wire_in(WIRE_IN_RESET_MODE, bit, bit)?;
    device.set_wire_in(WIRE_IN_RESET_MODE, 0, bit)
}
