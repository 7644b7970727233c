//! Byte level codec for the acquisition stream: little-endian field decoding,
//! wire value byte swapping, frame header magic and round robin arithmetic.

pub mod convert;
pub mod header;
pub mod round_robin;

pub use convert::{decode_sample_index, decode_word, swap_wire_value};
pub use header::{check_header, encode_header_magic, find_header};
pub use round_robin::{aligned_read_size, is_valid_read_size};
