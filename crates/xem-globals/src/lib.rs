//! Register map, framing sizes and the error taxonomy shared by every crate of
//! the workspace.
//!
//! Addresses follow the front panel endpoint ranges: wire-ins live at
//! `0x00..=0x1F`, wire-outs at `0x20..=0x3F`, trigger-ins at `0x40..=0x5F` and
//! pipe-outs at `0xA0..=0xBF`.

pub mod error;

pub use error::{Error, HardwareError, Result, check_return_code, translate};

/// Address of a wire-in, wire-out, trigger-in or pipe-out endpoint.
pub type EndpointAddress = u8;

/// Reset and run-mode control register.
pub const WIRE_IN_RESET_MODE: EndpointAddress = 0x00;
/// Number of samples to acquire.
pub const WIRE_IN_NUM_SAMPLES: EndpointAddress = 0x01;

/// Number of 32-bit words currently buffered in the acquisition FIFO.
pub const WIRE_OUT_NUM_WORDS_FIFO: EndpointAddress = 0x20;
/// Non-zero while the SPI acquisition engine is running.
pub const WIRE_OUT_IS_SPI_RUNNING: EndpointAddress = 0x22;
/// Bit 0 is set once the sampling PLL has locked.
pub const WIRE_OUT_IS_PLL_LOCKED: EndpointAddress = 0x24;

/// Start/stop pulses for the SPI acquisition engine.
pub const TRIGGER_IN_SPI: EndpointAddress = 0x41;

/// Bulk acquisition data.
pub const PIPE_OUT_FIFO: EndpointAddress = 0xA0;

/// Trigger bit on [`TRIGGER_IN_SPI`] that starts acquisition.
pub const TRIGGER_SPI_START_BIT: u32 = 0;
/// Trigger bit on [`TRIGGER_IN_SPI`] that stops acquisition.
pub const TRIGGER_SPI_STOP_BIT: u32 = 1;

/// Continuous run mode when set, single shot when cleared.
pub const RESET_MODE_CONTINUOUS_BIT: u32 = 1 << 1;
/// Pulsed before every block read to drop data staged in the pipe but not yet
/// transferred. Shares its position with [`RESET_MODE_CONTINUOUS_BIT`].
pub const RESET_MODE_FIFO_STAGE_BIT: u32 = 1 << 1;
/// Pulsed to clear the acquisition FIFOs.
pub const RESET_MODE_FIFO_RESET_BIT: u32 = 1 << 2;

/// Mask selecting every bit of a wire-in.
pub const WIRE_IN_FULL_MASK: u32 = 0xFFFF_FFFF;

/// Minimum USB block transfer granularity, in bytes.
pub const BLOCK_SIZE: u32 = 32;
/// Size of one data frame, in 32-bit words.
pub const DATA_FRAME_SIZE_WORDS: u32 = 9;
/// Data frames in one round robin.
pub const DATA_FRAMES_PER_ROUND_ROBIN: u32 = 8;
/// Bytes per FIFO word.
pub const WORD_SIZE_BYTES: u32 = 4;
/// One round robin, in 32-bit words.
pub const ROUND_ROBIN_SIZE_WORDS: u32 = DATA_FRAME_SIZE_WORDS * DATA_FRAMES_PER_ROUND_ROBIN;
/// One round robin, in bytes.
pub const ROUND_ROBIN_SIZE_BYTES: u32 = ROUND_ROBIN_SIZE_WORDS * WORD_SIZE_BYTES;

/// Marks the start of a data frame in the acquisition stream.
pub const HEADER_MAGIC_NUMBER: u64 = 0xC691_1999_2702_1942;
/// Length of an encoded header, in bytes.
pub const HEADER_SIZE_BYTES: usize = 8;

/// Longest device ID the hardware accepts, in UTF-8 bytes.
pub const DEVICE_ID_MAX_BYTES: usize = 32;
/// Serial number reported by the simulator.
pub const DEFAULT_XEM_SERIAL_NUMBER: &str = "1917000Q70";

// Round robins must stay whole USB blocks, see `aligned_read_size`.
const _: () = assert!(ROUND_ROBIN_SIZE_BYTES % BLOCK_SIZE == 0);
