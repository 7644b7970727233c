/// This module has been created using mod.rs in a subfolder, instead of just creating a common.rs under tests
/// This is due to the test runner then not searching for runnable tests in mod.rs
/// https://doc.rust-lang.org/rust-by-example/testing/integration_testing.html
use libxem_rs::{DeviceHandle, DeviceInfo, EndpointAddress, FrontPanelDevices};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub fn logging_init(module: &str) {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Error)
        .filter_module(module, log::LevelFilter::Trace)
        .try_init();
}

#[allow(dead_code)]
pub fn bit_file(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("bit_files")
        .join(name)
}

/// A primitive call as seen by [`MockXem`].
#[allow(dead_code)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    UpdateWireOuts,
    GetWireOutValue(EndpointAddress),
    SetWireInValue(EndpointAddress, u32, u32),
    UpdateWireIns,
    ActivateTriggerIn(EndpointAddress, u32),
    ReadFromBlockPipe(EndpointAddress, u32, usize),
    ConfigureFpga(PathBuf),
    IsFrontPanelEnabled,
    GetDeviceInfo,
    SetDeviceId(String),
}

/// Device handle that records every primitive call.
///
/// Every code returning primitive answers `return_code`; wire-in writes answer
/// `wire_in_return_code` when it is negative. Block reads fill the buffer with
/// `pipe_fill` and report its length unless `return_code` or `pipe_return_code`
/// is negative.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct MockXem {
    pub calls: Vec<Call>,
    pub wire_outs: HashMap<EndpointAddress, u32>,
    pub return_code: i32,
    pub wire_in_return_code: i32,
    pub pipe_return_code: i32,
    pub pipe_fill: u8,
    pub front_panel_enabled: bool,
    pub info: DeviceInfo,
}

impl Default for MockXem {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            wire_outs: HashMap::new(),
            return_code: 0,
            wire_in_return_code: 0,
            pipe_return_code: 0,
            pipe_fill: 0xAB,
            front_panel_enabled: true,
            info: DeviceInfo {
                device_id: "acquisition board".to_owned(),
                serial_number: "2024000AB1".to_owned(),
            },
        }
    }
}

#[allow(dead_code)]
impl MockXem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_wire_out(mut self, addr: EndpointAddress, value: u32) -> Self {
        self.wire_outs.insert(addr, value);
        self
    }

    pub fn with_return_code(mut self, code: i32) -> Self {
        self.return_code = code;
        self
    }

    fn wire_in_code(&self) -> i32 {
        if self.wire_in_return_code < 0 {
            self.wire_in_return_code
        } else {
            self.return_code
        }
    }
}

impl DeviceHandle for MockXem {
    fn update_wire_outs(&mut self) -> i32 {
        self.calls.push(Call::UpdateWireOuts);
        self.return_code
    }

    fn get_wire_out_value(&mut self, addr: EndpointAddress) -> u32 {
        self.calls.push(Call::GetWireOutValue(addr));
        self.wire_outs.get(&addr).copied().unwrap_or(0)
    }

    fn set_wire_in_value(&mut self, addr: EndpointAddress, value: u32, mask: u32) -> i32 {
        self.calls.push(Call::SetWireInValue(addr, value, mask));
        self.wire_in_code()
    }

    fn update_wire_ins(&mut self) -> i32 {
        self.calls.push(Call::UpdateWireIns);
        self.wire_in_code()
    }

    fn activate_trigger_in(&mut self, addr: EndpointAddress, bit: u32) -> i32 {
        self.calls.push(Call::ActivateTriggerIn(addr, bit));
        self.return_code
    }

    fn read_from_block_pipe(
        &mut self,
        addr: EndpointAddress,
        block_size: u32,
        buffer: &mut [u8],
    ) -> i32 {
        self.calls
            .push(Call::ReadFromBlockPipe(addr, block_size, buffer.len()));
        if self.return_code < 0 {
            return self.return_code;
        }
        if self.pipe_return_code < 0 {
            return self.pipe_return_code;
        }
        buffer.fill(self.pipe_fill);
        buffer.len() as i32
    }

    fn configure_fpga(&mut self, bit_file: &Path) -> i32 {
        self.calls.push(Call::ConfigureFpga(bit_file.to_path_buf()));
        self.return_code
    }

    fn is_front_panel_enabled(&mut self) -> bool {
        self.calls.push(Call::IsFrontPanelEnabled);
        self.front_panel_enabled
    }

    fn get_device_info(&mut self, info: &mut DeviceInfo) -> i32 {
        self.calls.push(Call::GetDeviceInfo);
        if self.return_code >= 0 {
            *info = self.info.clone();
        }
        self.return_code
    }

    fn set_device_id(&mut self, id: &str) -> i32 {
        self.calls.push(Call::SetDeviceId(id.to_owned()));
        if self.return_code >= 0 {
            self.info.device_id = id.to_owned();
        }
        self.return_code
    }
}

/// Enumerator over a fixed list of mock devices.
#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct MockDevices(pub Vec<MockXem>);

impl FrontPanelDevices for MockDevices {
    type Device = MockXem;

    fn open(&mut self, serial: Option<&str>) -> Option<MockXem> {
        let position = match serial {
            None => (!self.0.is_empty()).then_some(0)?,
            Some(serial) => self
                .0
                .iter()
                .position(|xem| xem.info.serial_number == serial)?,
        };
        Some(self.0.remove(position))
    }
}
