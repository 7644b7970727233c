use anyhow::Result;
use libxem_rs::{
    AcquisitionBoard, DATA_FRAME_SIZE_WORDS, DATA_FRAMES_PER_ROUND_ROBIN, FrontPanelSimulator,
    HEADER_MAGIC_NUMBER, HEADER_SIZE_BYTES, PIPE_OUT_FIFO, SimulatedQueue, SimulatedQueues,
    WIRE_OUT_IS_PLL_LOCKED, WORD_SIZE_BYTES, decode_sample_index, decode_word,
    encode_header_magic, find_header, swap_wire_value,
};
use std::thread;
use std::time::Duration;

const ROUND_ROBINS: u32 = 4;
const FRAME_SIZE_BYTES: usize = (DATA_FRAME_SIZE_WORDS * WORD_SIZE_BYTES) as usize;

/// One frame: header, little-endian sample index, then 2 byte words.
fn frame(sample_index: u32) -> Vec<u8> {
    let mut frame = Vec::with_capacity(FRAME_SIZE_BYTES);
    frame.extend_from_slice(&encode_header_magic(HEADER_MAGIC_NUMBER));
    frame.extend_from_slice(&sample_index.to_le_bytes());
    let mut word = 0u16;
    while frame.len() < FRAME_SIZE_BYTES {
        frame.extend_from_slice(&word.to_le_bytes());
        word = word.wrapping_add(1);
    }
    frame
}

fn round_robin(first_sample: u32) -> Vec<u8> {
    (0..DATA_FRAMES_PER_ROUND_ROBIN)
        .flat_map(|i| frame(first_sample + i))
        .collect()
}

fn main() -> Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let fifo = SimulatedQueue::new();
    let queues = SimulatedQueues::new()
        .with_wire_out(
            WIRE_OUT_IS_PLL_LOCKED,
            SimulatedQueue::from_iter([swap_wire_value(0x0100_0000)]),
        )
        .with_pipe_out(PIPE_OUT_FIFO, fifo.clone());

    let mut board = FrontPanelSimulator::new(queues)?;
    board.initialize_board(None, false)?;
    log::debug!("Serial: {}", board.get_serial_number()?);

    let pll = swap_wire_value(board.read_wire_out(WIRE_OUT_IS_PLL_LOCKED)?);
    log::debug!("PLL locked: {}", pll & 0x1 != 0);

    let feeder = thread::spawn(move || {
        for n in 0..ROUND_ROBINS {
            fifo.push(round_robin(n * DATA_FRAMES_PER_ROUND_ROBIN));
            thread::sleep(Duration::from_millis(10));
        }
    });

    board.start_acquisition()?;
    let mut received = 0;
    while received < ROUND_ROBINS {
        let buffer = board.read_from_fifo()?;
        if buffer.is_empty() {
            thread::sleep(Duration::from_millis(5));
            continue;
        }
        received += 1;

        let mut offset = 0;
        while let Some(start) = find_header(&buffer[offset..]) {
            let frame = &buffer[offset + start..];
            let index_end = HEADER_SIZE_BYTES + 4;
            let sample_index = decode_sample_index(&frame[HEADER_SIZE_BYTES..index_end])?;
            let first_word = decode_word(&frame[index_end..index_end + 2])?;
            log::info!("frame {sample_index}: first word {first_word}");
            offset += start + FRAME_SIZE_BYTES;
        }
    }
    board.stop_acquisition()?;

    if feeder.join().is_err() {
        anyhow::bail!("feeder thread panicked");
    }
    log::debug!("hard stop: {:?}", board.hard_stop(Some(Duration::from_secs(1))));
    Ok(())
}
