use crate::board::validate_device_id;
use std::path::Path;
use xem_globals::{
    EndpointAddress, Error, RESET_MODE_CONTINUOUS_BIT, Result, TRIGGER_IN_SPI,
    TRIGGER_SPI_START_BIT, TRIGGER_SPI_STOP_BIT, WIRE_IN_FULL_MASK, WIRE_IN_NUM_SAMPLES,
    WIRE_IN_RESET_MODE, WIRE_OUT_IS_PLL_LOCKED, WIRE_OUT_IS_SPI_RUNNING, WIRE_OUT_NUM_WORDS_FIFO,
    check_return_code,
};

/// Identity fields of the vendor device info record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceInfo {
    pub device_id: String,
    pub serial_number: String,
}

/// Primitive operations of an opened front panel device, as provided by the
/// vendor SDK.
///
/// Every method returning `i32` returns a vendor code: negative values are
/// errors, see [`xem_globals::translate`]. Callers should go through
/// [`FrontPanelCommands`] rather than sequencing these by hand.
pub trait DeviceHandle {
    fn update_wire_outs(&mut self) -> i32;
    fn get_wire_out_value(&mut self, addr: EndpointAddress) -> u32;
    fn set_wire_in_value(&mut self, addr: EndpointAddress, value: u32, mask: u32) -> i32;
    fn update_wire_ins(&mut self) -> i32;
    fn activate_trigger_in(&mut self, addr: EndpointAddress, bit: u32) -> i32;
    /// Fills `buffer` from a block pipe, returning the transferred byte count.
    fn read_from_block_pipe(
        &mut self,
        addr: EndpointAddress,
        block_size: u32,
        buffer: &mut [u8],
    ) -> i32;
    fn configure_fpga(&mut self, bit_file: &Path) -> i32;
    fn is_front_panel_enabled(&mut self) -> bool;
    fn get_device_info(&mut self, info: &mut DeviceInfo) -> i32;
    fn set_device_id(&mut self, id: &str) -> i32;
}

impl<T: DeviceHandle + ?Sized> DeviceHandle for Box<T> {
    fn update_wire_outs(&mut self) -> i32 {
        (**self).update_wire_outs()
    }
    fn get_wire_out_value(&mut self, addr: EndpointAddress) -> u32 {
        (**self).get_wire_out_value(addr)
    }
    fn set_wire_in_value(&mut self, addr: EndpointAddress, value: u32, mask: u32) -> i32 {
        (**self).set_wire_in_value(addr, value, mask)
    }
    fn update_wire_ins(&mut self) -> i32 {
        (**self).update_wire_ins()
    }
    fn activate_trigger_in(&mut self, addr: EndpointAddress, bit: u32) -> i32 {
        (**self).activate_trigger_in(addr, bit)
    }
    fn read_from_block_pipe(
        &mut self,
        addr: EndpointAddress,
        block_size: u32,
        buffer: &mut [u8],
    ) -> i32 {
        (**self).read_from_block_pipe(addr, block_size, buffer)
    }
    fn configure_fpga(&mut self, bit_file: &Path) -> i32 {
        (**self).configure_fpga(bit_file)
    }
    fn is_front_panel_enabled(&mut self) -> bool {
        (**self).is_front_panel_enabled()
    }
    fn get_device_info(&mut self, info: &mut DeviceInfo) -> i32 {
        (**self).get_device_info(info)
    }
    fn set_device_id(&mut self, id: &str) -> i32 {
        (**self).set_device_id(id)
    }
}

/// Enumerates attached front panel devices.
pub trait FrontPanelDevices {
    type Device: DeviceHandle;

    /// Opens the device with the given serial number, or the first one found
    /// when `serial` is `None`.
    fn open(&mut self, serial: Option<&str>) -> Option<Self::Device>;
}

/// Opens the first attached device.
pub fn open_board<D: FrontPanelDevices>(devices: &mut D) -> Result<D::Device> {
    devices.open(None).ok_or_else(|| {
        log::error!("no front panel device attached");
        Error::NoDeviceFound
    })
}

/// Fails with [`Error::FileNotFound`] unless `path` names an existing file.
pub fn check_file_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        return Ok(());
    }
    let cwd = std::env::current_dir()?;
    log::error!("bit file {} not found in {}", path.display(), cwd.display());
    Err(Error::FileNotFound {
        path: path.to_path_buf(),
        cwd,
    })
}

/// Composite register operations built on the device primitives.
///
/// Reads always refresh the wire-outs before fetching a value and writes always
/// latch the wire-ins after setting one; the hardware requires this order.
pub trait FrontPanelCommands {
    fn read_wire_out(&mut self, addr: EndpointAddress) -> Result<u32>;
    fn set_wire_in(&mut self, addr: EndpointAddress, value: u32, mask: u32) -> Result<()>;
    fn activate_trigger_in(&mut self, addr: EndpointAddress, bit: u32) -> Result<()>;
    /// Loads `bit_file` (if given) and checks that the design speaks FrontPanel.
    fn configure_board(&mut self, bit_file: Option<&Path>) -> Result<()>;
    fn get_num_words_fifo(&mut self) -> Result<u32>;
    fn is_spi_running(&mut self) -> Result<bool>;
    fn is_pll_locked(&mut self) -> Result<bool>;
    fn set_run_mode(&mut self, continuous: bool) -> Result<()>;
    fn set_num_samples(&mut self, num_samples: u32) -> Result<()>;
    fn start_spi(&mut self) -> Result<()>;
    fn stop_spi(&mut self) -> Result<()>;
    fn get_device_id(&mut self) -> Result<String>;
    fn set_device_id(&mut self, id: &str) -> Result<()>;
    fn get_serial_number(&mut self) -> Result<String>;
}

impl<T: DeviceHandle + ?Sized> FrontPanelCommands for T {
    fn read_wire_out(&mut self, addr: EndpointAddress) -> Result<u32> {
        check_return_code(self.update_wire_outs())?;
        let value = self.get_wire_out_value(addr);
        log::trace!("wire-out {addr:#04x} = {value:#010x}");
        Ok(value)
    }

    fn set_wire_in(&mut self, addr: EndpointAddress, value: u32, mask: u32) -> Result<()> {
        log::trace!("wire-in {addr:#04x} <- {value:#010x} (mask {mask:#010x})");
        check_return_code(self.set_wire_in_value(addr, value, mask))?;
        check_return_code(self.update_wire_ins())?;
        Ok(())
    }

    fn activate_trigger_in(&mut self, addr: EndpointAddress, bit: u32) -> Result<()> {
        log::trace!("trigger-in {addr:#04x} bit {bit:#x}");
        check_return_code(DeviceHandle::activate_trigger_in(self, addr, bit))?;
        Ok(())
    }

    fn configure_board(&mut self, bit_file: Option<&Path>) -> Result<()> {
        if let Some(bit_file) = bit_file {
            check_file_exists(bit_file)?;
            log::debug!("configuring FPGA with {}", bit_file.display());
            check_return_code(self.configure_fpga(bit_file))?;
        }
        if !self.is_front_panel_enabled() {
            log::error!("FrontPanel support is not enabled in the FPGA design");
            return Err(Error::FrontPanelNotSupported);
        }
        Ok(())
    }

    fn get_num_words_fifo(&mut self) -> Result<u32> {
        self.read_wire_out(WIRE_OUT_NUM_WORDS_FIFO)
    }

    fn is_spi_running(&mut self) -> Result<bool> {
        Ok(self.read_wire_out(WIRE_OUT_IS_SPI_RUNNING)? != 0)
    }

    fn is_pll_locked(&mut self) -> Result<bool> {
        Ok(self.read_wire_out(WIRE_OUT_IS_PLL_LOCKED)? & 0x1 != 0)
    }

    fn set_run_mode(&mut self, continuous: bool) -> Result<()> {
        let value = if continuous {
            RESET_MODE_CONTINUOUS_BIT
        } else {
            0
        };
        self.set_wire_in(WIRE_IN_RESET_MODE, value, RESET_MODE_CONTINUOUS_BIT)
    }

    fn set_num_samples(&mut self, num_samples: u32) -> Result<()> {
        self.set_wire_in(WIRE_IN_NUM_SAMPLES, num_samples, WIRE_IN_FULL_MASK)
    }

    fn start_spi(&mut self) -> Result<()> {
        FrontPanelCommands::activate_trigger_in(self, TRIGGER_IN_SPI, TRIGGER_SPI_START_BIT)
    }

    fn stop_spi(&mut self) -> Result<()> {
        FrontPanelCommands::activate_trigger_in(self, TRIGGER_IN_SPI, TRIGGER_SPI_STOP_BIT)
    }

    fn get_device_id(&mut self) -> Result<String> {
        let mut info = DeviceInfo::default();
        check_return_code(self.get_device_info(&mut info))?;
        Ok(info.device_id)
    }

    fn set_device_id(&mut self, id: &str) -> Result<()> {
        validate_device_id(id)?;
        check_return_code(DeviceHandle::set_device_id(self, id))?;
        Ok(())
    }

    fn get_serial_number(&mut self) -> Result<String> {
        let mut info = DeviceInfo::default();
        check_return_code(self.get_device_info(&mut info))?;
        Ok(info.serial_number)
    }
}
