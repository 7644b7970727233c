use xem_globals::{BLOCK_SIZE, ROUND_ROBIN_SIZE_BYTES, ROUND_ROBIN_SIZE_WORDS, WORD_SIZE_BYTES};

/// Number of bytes a FIFO read may pull when `words_available` words are
/// buffered on the device.
///
/// Reads are floored to whole round robins, so nothing is read until at least
/// one full round robin is buffered and a frame is never split across two
/// transfers. Round robins are whole USB blocks, so the result is also a
/// multiple of [`BLOCK_SIZE`].
pub fn aligned_read_size(words_available: u32) -> u32 {
    // Capped so the byte count stays representable for absurd word counts.
    let round_robins =
        (words_available / ROUND_ROBIN_SIZE_WORDS).min(u32::MAX / ROUND_ROBIN_SIZE_BYTES);
    let size = round_robins * ROUND_ROBIN_SIZE_WORDS * WORD_SIZE_BYTES;
    debug_assert_eq!(size % BLOCK_SIZE, 0);
    size
}

/// Whether a single FIFO read of `len` bytes is something the hardware can
/// hand back: an empty read or a whole number of round robins.
pub fn is_valid_read_size(len: usize) -> bool {
    len % ROUND_ROBIN_SIZE_BYTES as usize == 0
}
