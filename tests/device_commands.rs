mod common;

use crate::common::*;

use libxem_rs::{
    Error, FrontPanelCommands, HardwareError, Result, TRIGGER_IN_SPI, WIRE_IN_NUM_SAMPLES,
    WIRE_IN_RESET_MODE, WIRE_OUT_IS_PLL_LOCKED, WIRE_OUT_IS_SPI_RUNNING, WIRE_OUT_NUM_WORDS_FIFO,
    check_file_exists, open_board,
};
use std::path::Path;

#[test]
fn read_wire_out_updates_before_reading() -> Result<()> {
    logging_init("device_commands");

    let mut xem = MockXem::new().with_wire_out(0x2A, 0xDEAD_BEEF);
    let value = FrontPanelCommands::read_wire_out(&mut xem, 0x2A)?;

    assert_eq!(value, 0xDEAD_BEEF);
    assert_eq!(
        xem.calls,
        vec![Call::UpdateWireOuts, Call::GetWireOutValue(0x2A)]
    );
    Ok(())
}

#[test]
fn read_wire_out_failed_update_skips_read() {
    logging_init("device_commands");

    let mut xem = MockXem::new().with_return_code(-8);
    let result = FrontPanelCommands::read_wire_out(&mut xem, 0x20);

    assert!(matches!(
        result,
        Err(Error::Hardware(HardwareError::DeviceNotOpen))
    ));
    assert_eq!(xem.calls, vec![Call::UpdateWireOuts]);
}

#[test]
fn set_wire_in_latches_after_setting() -> Result<()> {
    logging_init("device_commands");

    let mut xem = MockXem::new();
    FrontPanelCommands::set_wire_in(&mut xem, 0x05, 0x1234, 0xFF00)?;

    assert_eq!(
        xem.calls,
        vec![Call::SetWireInValue(0x05, 0x1234, 0xFF00), Call::UpdateWireIns]
    );
    Ok(())
}

#[test]
fn set_wire_in_failed_set_skips_latch() {
    logging_init("device_commands");

    let mut xem = MockXem::new().with_return_code(-9);
    let result = FrontPanelCommands::set_wire_in(&mut xem, 0x05, 1, 1);

    assert!(matches!(
        result,
        Err(Error::Hardware(HardwareError::InvalidEndpoint))
    ));
    assert_eq!(xem.calls, vec![Call::SetWireInValue(0x05, 1, 1)]);
}

#[test]
fn spi_triggers() -> Result<()> {
    logging_init("device_commands");

    let mut xem = MockXem::new();
    xem.start_spi()?;
    xem.stop_spi()?;

    assert_eq!(
        xem.calls,
        vec![
            Call::ActivateTriggerIn(TRIGGER_IN_SPI, 0),
            Call::ActivateTriggerIn(TRIGGER_IN_SPI, 1),
        ]
    );

    let mut xem = MockXem::new().with_return_code(-9);
    assert!(matches!(
        xem.start_spi(),
        Err(Error::Hardware(HardwareError::InvalidEndpoint))
    ));
    Ok(())
}

#[test]
fn status_wire_outs() -> Result<()> {
    logging_init("device_commands");

    for (raw, running) in [(0, false), (1, true), (0x8000_0000, true)] {
        let mut xem = MockXem::new().with_wire_out(WIRE_OUT_IS_SPI_RUNNING, raw);
        assert_eq!(FrontPanelCommands::is_spi_running(&mut xem)?, running);
        assert_eq!(xem.calls[1], Call::GetWireOutValue(WIRE_OUT_IS_SPI_RUNNING));
    }

    // only bit 0 reports the lock
    for (raw, locked) in [(0, false), (1, true), (2, false), (3, true)] {
        let mut xem = MockXem::new().with_wire_out(WIRE_OUT_IS_PLL_LOCKED, raw);
        assert_eq!(xem.is_pll_locked()?, locked);
        assert_eq!(xem.calls[1], Call::GetWireOutValue(WIRE_OUT_IS_PLL_LOCKED));
    }

    let mut xem = MockXem::new().with_wire_out(WIRE_OUT_NUM_WORDS_FIFO, 144);
    assert_eq!(FrontPanelCommands::get_num_words_fifo(&mut xem)?, 144);
    Ok(())
}

#[test]
fn run_mode_and_num_samples() -> Result<()> {
    logging_init("device_commands");

    let mut xem = MockXem::new();
    xem.set_run_mode(true)?;
    xem.set_run_mode(false)?;
    xem.set_num_samples(0x0001_0000)?;

    assert_eq!(
        xem.calls,
        vec![
            Call::SetWireInValue(WIRE_IN_RESET_MODE, 0x2, 0x2),
            Call::UpdateWireIns,
            Call::SetWireInValue(WIRE_IN_RESET_MODE, 0x0, 0x2),
            Call::UpdateWireIns,
            Call::SetWireInValue(WIRE_IN_NUM_SAMPLES, 0x0001_0000, 0xFFFF_FFFF),
            Call::UpdateWireIns,
        ]
    );

    let mut xem = MockXem::new().with_return_code(-1);
    assert!(matches!(
        xem.set_run_mode(true),
        Err(Error::Hardware(HardwareError::Failed))
    ));
    Ok(())
}

#[test]
fn configure_board_with_bit_file() -> Result<()> {
    logging_init("device_commands");

    let path = bit_file("test_file_0.bit");
    let mut xem = MockXem::new();
    xem.configure_board(Some(&path))?;

    assert_eq!(
        xem.calls,
        vec![Call::ConfigureFpga(path), Call::IsFrontPanelEnabled]
    );
    Ok(())
}

#[test]
fn configure_board_without_bit_file_only_checks_front_panel() -> Result<()> {
    logging_init("device_commands");

    let mut xem = MockXem::new();
    xem.configure_board(None)?;

    assert_eq!(xem.calls, vec![Call::IsFrontPanelEnabled]);
    Ok(())
}

#[test]
fn configure_board_errors() {
    logging_init("device_commands");

    let mut xem = MockXem::new().with_return_code(-1);
    assert!(matches!(
        xem.configure_board(Some(&bit_file("test_file_0.bit"))),
        Err(Error::Hardware(HardwareError::Failed))
    ));

    let mut xem = MockXem::new();
    xem.front_panel_enabled = false;
    assert!(matches!(
        xem.configure_board(None),
        Err(Error::FrontPanelNotSupported)
    ));

    let mut xem = MockXem::new();
    assert!(matches!(
        xem.configure_board(Some(Path::new("no_such_file.bit"))),
        Err(Error::FileNotFound { .. })
    ));
    assert!(xem.calls.is_empty());
}

#[test]
fn file_not_found_names_path_and_cwd() {
    logging_init("device_commands");

    let err = check_file_exists(Path::new("fake_file.bit")).unwrap_err();
    let message = err.to_string();
    let cwd = std::env::current_dir().unwrap();

    assert!(message.contains("fake_file.bit"));
    assert!(message.contains(&cwd.display().to_string()));

    // directories are not bit files
    assert!(check_file_exists(Path::new(env!("CARGO_MANIFEST_DIR"))).is_err());
    assert!(check_file_exists(&bit_file("test_file_1.bit")).is_ok());
}

#[test]
fn device_identity() -> Result<()> {
    logging_init("device_commands");

    let mut xem = MockXem::new();
    assert_eq!(
        FrontPanelCommands::get_device_id(&mut xem)?,
        "acquisition board"
    );
    assert_eq!(
        FrontPanelCommands::get_serial_number(&mut xem)?,
        "2024000AB1"
    );

    FrontPanelCommands::set_device_id(&mut xem, "Mantarray ñ 1")?;
    assert_eq!(
        FrontPanelCommands::get_device_id(&mut xem)?,
        "Mantarray ñ 1"
    );
    assert!(xem.calls.contains(&Call::SetDeviceId("Mantarray ñ 1".to_owned())));

    let mut xem = MockXem::new().with_return_code(-8);
    assert!(matches!(
        FrontPanelCommands::get_device_id(&mut xem),
        Err(Error::Hardware(HardwareError::DeviceNotOpen))
    ));
    assert!(matches!(
        FrontPanelCommands::get_serial_number(&mut xem),
        Err(Error::Hardware(HardwareError::DeviceNotOpen))
    ));
    assert!(matches!(
        FrontPanelCommands::set_device_id(&mut xem, "id"),
        Err(Error::Hardware(HardwareError::DeviceNotOpen))
    ));
    Ok(())
}

#[test]
fn device_id_limit_is_in_bytes() {
    logging_init("device_commands");

    let mut xem = MockXem::new();
    for id in [
        "a".repeat(33),
        "ñ".repeat(17),
        format!("{}{}", "a".repeat(31), "ñ"),
    ] {
        assert!(matches!(
            FrontPanelCommands::set_device_id(&mut xem, &id),
            Err(Error::IdTooLong { len }) if len == id.len()
        ));
    }
    // rejected before reaching the device
    assert!(xem.calls.is_empty());

    assert!(FrontPanelCommands::set_device_id(&mut xem, &"a".repeat(32)).is_ok());
    assert!(FrontPanelCommands::set_device_id(&mut xem, &"ñ".repeat(16)).is_ok());
}

#[test]
fn open_board_picks_first_device() -> Result<()> {
    logging_init("device_commands");

    let mut second = MockXem::new();
    second.info.serial_number = "2024000AB2".to_owned();
    let mut devices = MockDevices(vec![MockXem::new(), second]);

    let mut xem = open_board(&mut devices)?;
    assert_eq!(
        FrontPanelCommands::get_serial_number(&mut xem)?,
        "2024000AB1"
    );

    let mut devices = MockDevices::default();
    assert!(matches!(
        open_board(&mut devices),
        Err(Error::NoDeviceFound)
    ));
    Ok(())
}
