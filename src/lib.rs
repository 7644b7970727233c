//! A Rust driver for FPGA acquisition boards built on Opal Kelly XEM modules,
//! talking to the FPGA design through the vendor's FrontPanel endpoints.
//!
//! This crate does not link the vendor SDK itself. An opened device is anything
//! implementing [`DeviceHandle`], the handful of FrontPanel primitives the board
//! needs, and enumeration goes through [`FrontPanelDevices`].
//!
//! ## Usage overview
//!
//! Wrap an opened device in a [`FrontPanel`] (or open the first one with
//! [`FrontPanel::from_first`]), call [`AcquisitionBoard::initialize_board`]
//! with the bit file of the acquisition design, then start SPI acquisition and
//! poll [`AcquisitionBoard::read_from_fifo`]. Every buffer returned is a whole
//! number of round robins of 8 data frames; [`find_header`] and
//! [`decode_sample_index`] locate and decode frames inside it.
//!
//! Without hardware, [`FrontPanelSimulator`] implements the same
//! [`AcquisitionBoard`] contract from queues filled ahead of time or from
//! another thread:
//!
//! ```bash
//! cargo run --example simulated_acquisition
//! ```
//!
//! ## Register map
//!
//! | Endpoint | Kind      | Meaning                               |
//! |----------|-----------|---------------------------------------|
//! | `0x00`   | wire-in   | reset and run mode                    |
//! | `0x01`   | wire-in   | number of samples                     |
//! | `0x20`   | wire-out  | 32-bit words buffered in the FIFO     |
//! | `0x22`   | wire-out  | SPI acquisition running               |
//! | `0x24`   | wire-out  | PLL locked (bit 0)                    |
//! | `0x41`   | trigger-in| SPI start (bit 0) / stop (bit 1)      |
//! | `0xA0`   | pipe-out  | acquisition FIFO                      |
//!
//! ## Developers
//! Device primitives return vendor codes; go through [`check_return_code`] so
//! that negative codes become [`HardwareError`]s and get logged. Tests run
//! against a recording mock handle and never need a board attached.

pub mod board;
pub mod device;
pub mod fifo;

pub use board::front_panel::FrontPanel;
pub use board::simulator::{
    FrontPanelSimulator, SimulatedQueue, SimulatedQueues, validate_simulated_fifo_reads,
};
pub use board::{AcquisitionBoard, BoardState, HardStopStatus, validate_device_id};
pub use device::{
    DeviceHandle, DeviceInfo, FrontPanelCommands, FrontPanelDevices, check_file_exists,
    open_board,
};
pub use fifo::Fifo;

pub use xem_frame::*;
pub use xem_globals::*;
