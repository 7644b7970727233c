use xem_globals::{Error, Result};

/// Fixed width unsigned field stored little-endian in the acquisition stream.
pub trait LeField: Sized {
    const SIZE: usize;

    /// Returns `None` unless `bytes` is exactly [`Self::SIZE`] long.
    fn from_le_slice(bytes: &[u8]) -> Option<Self>;
}

impl LeField for u16 {
    const SIZE: usize = 2;

    fn from_le_slice(bytes: &[u8]) -> Option<Self> {
        Some(Self::from_le_bytes(bytes.try_into().ok()?))
    }
}

impl LeField for u32 {
    const SIZE: usize = 4;

    fn from_le_slice(bytes: &[u8]) -> Option<Self> {
        Some(Self::from_le_bytes(bytes.try_into().ok()?))
    }
}

/// Decodes a 4 byte little-endian sample index.
pub fn decode_sample_index(bytes: &[u8]) -> Result<u32> {
    u32::from_le_slice(bytes).ok_or_else(|| {
        log::error!("sample index has {} bytes, expected {}", bytes.len(), u32::SIZE);
        Error::SampleIndexSize(bytes.len())
    })
}

/// Decodes a 2 byte little-endian data word.
pub fn decode_word(bytes: &[u8]) -> Result<u16> {
    u16::from_le_slice(bytes).ok_or_else(|| {
        log::error!("word has {} bytes, expected {}", bytes.len(), u16::SIZE);
        Error::WordSize(bytes.len())
    })
}

/// Reverses the byte order of a wire value.
///
/// Wire values of this board family arrive with their bytes in the opposite
/// order of the host, so `0x12345678` becomes `0x78563412`. Applying the swap
/// twice is a no-op.
pub fn swap_wire_value(value: u32) -> u32 {
    value.swap_bytes()
}
