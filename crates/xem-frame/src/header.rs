use xem_globals::{Error, HEADER_MAGIC_NUMBER, HEADER_SIZE_BYTES, Result};

/// Serializes a header magic number as its high and then its low 32-bit half,
/// each big-endian.
pub fn encode_header_magic(magic: u64) -> [u8; HEADER_SIZE_BYTES] {
    let high = (magic >> 32) as u32;
    let low = magic as u32;

    let mut bytes = [0u8; HEADER_SIZE_BYTES];
    bytes[..4].copy_from_slice(&high.to_be_bytes());
    bytes[4..].copy_from_slice(&low.to_be_bytes());
    bytes
}

/// Returns whether `bytes` is the encoded [`HEADER_MAGIC_NUMBER`].
pub fn check_header(bytes: &[u8]) -> Result<bool> {
    if bytes.len() != HEADER_SIZE_BYTES {
        log::error!(
            "header has {} bytes, expected {HEADER_SIZE_BYTES}",
            bytes.len()
        );
        return Err(Error::HeaderSize(bytes.len()));
    }
    Ok(bytes == encode_header_magic(HEADER_MAGIC_NUMBER))
}

/// Offset of the first frame header in `stream`, if there is one.
pub fn find_header(stream: &[u8]) -> Option<usize> {
    let magic = encode_header_magic(HEADER_MAGIC_NUMBER);
    stream
        .windows(HEADER_SIZE_BYTES)
        .position(|window| window == magic)
}
