//! Sample acquisition tests

use crate::common::{Operation, assert_float_eq, create_connected_driver, create_mock_driver};
use itg3205::registers::address;
use itg3205::{DecodedSample, Error, State};

#[test]
fn test_poll_without_listener_touches_no_bus() {
    let (mut driver, interface) = create_connected_driver();
    driver.take_listener();

    driver.poll().unwrap();
    driver.poll().unwrap();

    assert!(interface.operations().is_empty());
}

#[test]
fn test_poll_without_listener_while_disconnected() {
    let (mut driver, interface) = create_mock_driver();
    driver.take_listener();

    assert!(driver.poll().is_ok());
    assert!(interface.operations().is_empty());
}

#[test]
fn test_poll_reads_one_burst() {
    let (mut driver, interface) = create_connected_driver();

    driver.poll().unwrap();

    assert_eq!(
        interface.bus_operations(),
        vec![Operation::Read {
            address: address::TEMP_OUT_H,
            len: 8
        }]
    );
    let data_events = interface
        .notifications()
        .into_iter()
        .filter(|op| matches!(op, Operation::Data(_)))
        .count();
    assert_eq!(data_events, 1);
}

#[test]
fn test_poll_decodes_sample() {
    let (mut driver, interface) = create_connected_driver();
    interface.set_sample_bytes([0x33, 0x90, 0x00, 0x0A, 0xFF, 0xF6, 0x00, 0x00]);

    driver.poll().unwrap();

    assert_eq!(
        interface.notifications(),
        vec![Operation::Data(DecodedSample {
            x: 10,
            y: -10,
            z: 0,
            temperature_raw: 13200,
        })]
    );
}

#[test]
fn test_poll_axis_low_byte_sign_extension() {
    let (mut driver, interface) = create_connected_driver();
    interface.set_sample_bytes([0x12, 0x80, 0x12, 0x80, 0x00, 0x7F, 0x01, 0x00]);

    driver.poll().unwrap();

    // Temperature is plain big-endian; a high-bit low byte overrides the
    // axis high byte
    assert_eq!(
        interface.notifications(),
        vec![Operation::Data(DecodedSample {
            x: -128,
            y: 127,
            z: 256,
            temperature_raw: 0x1280,
        })]
    );
}

#[test]
fn test_poll_negative_temperature() {
    let (mut driver, interface) = create_connected_driver();
    interface.set_sample_bytes([0xCC, 0x70, 0, 0, 0, 0, 0, 0]);

    driver.poll().unwrap();

    match interface.notifications().as_slice() {
        [Operation::Data(sample)] => {
            assert_eq!(sample.temperature_raw, -13200);
            assert_float_eq(sample.temperature_celsius(), 35.0, 1e-3);
        }
        other => panic!("unexpected notifications: {:?}", other),
    }
}

#[test]
fn test_each_poll_reads_fresh_sample() {
    let (mut driver, interface) = create_connected_driver();

    interface.set_sample_bytes([0, 0, 0, 1, 0, 0, 0, 0]);
    driver.poll().unwrap();
    interface.set_sample_bytes([0, 0, 0, 2, 0, 0, 0, 0]);
    driver.poll().unwrap();

    let xs: Vec<i16> = interface
        .notifications()
        .into_iter()
        .filter_map(|op| match op {
            Operation::Data(sample) => Some(sample.x),
            _ => None,
        })
        .collect();
    assert_eq!(xs, vec![1, 2]);
    assert_eq!(interface.bus_operations().len(), 2);
}

#[test]
fn test_poll_leaves_state_ready() {
    let (mut driver, _interface) = create_connected_driver();

    driver.poll().unwrap();

    assert_eq!(driver.state(), State::Ready);
}

#[test]
fn test_poll_before_connect() {
    let (mut driver, interface) = create_mock_driver();

    assert!(matches!(driver.poll(), Err(Error::NotConnected)));
    assert!(interface.operations().is_empty());
}

#[test]
fn test_read_sample_without_listener() {
    let (mut driver, interface) = create_connected_driver();
    driver.take_listener();
    interface.set_sample_bytes([0x33, 0x90, 0x00, 0x0A, 0xFF, 0xF6, 0x00, 0x00]);

    let sample = driver.read_sample().unwrap();

    assert_eq!(sample.x, 10);
    assert_eq!(sample.y, -10);
    assert_float_eq(sample.rates_dps().x, 10.0 / 14.375, 1e-4);
    assert_float_eq(sample.temperature_celsius(), 35.0 + 26400.0 / 280.0, 1e-3);
}

#[test]
fn test_data_ready_flag() {
    let (mut driver, interface) = create_connected_driver();

    assert!(!driver.is_data_ready().unwrap());
    interface.set_register(address::INT_STATUS, 0x01);
    assert!(driver.is_data_ready().unwrap());
}

#[test]
fn test_listener_replaced_between_polls() {
    let (mut driver, interface) = create_connected_driver();
    let listener = driver.take_listener().unwrap();

    driver.poll().unwrap();
    driver.set_listener(listener);
    driver.poll().unwrap();

    assert_eq!(interface.bus_operations().len(), 1);
}
