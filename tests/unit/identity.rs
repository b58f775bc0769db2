//! Identity check tests
//!
//! A mismatched WHO_AM_I value is reported to the listener but never stops
//! the configuration.

use crate::common::{Operation, create_mock_driver};
use itg3205::WHO_AM_I_VALUE;
use itg3205::registers::address;

#[test]
fn test_matching_identity_reports_no_error() {
    let (mut driver, interface) = create_mock_driver();

    driver.connect(interface.clone()).unwrap();

    assert!(interface.error_messages().is_empty());
    assert_eq!(interface.notifications(), vec![Operation::DeviceId(0x68)]);
    assert_eq!(driver.device_id(), Some(WHO_AM_I_VALUE));
}

#[test]
fn test_expected_identity_value() {
    assert_eq!(WHO_AM_I_VALUE, 0x68);
}

#[test]
fn test_mismatched_identity_reports_one_error() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_who_am_i(0x69);

    driver.connect(interface.clone()).unwrap();

    let errors = interface.error_messages();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("0x68"), "message: {}", errors[0]);
    assert!(errors[0].contains("0x69"), "message: {}", errors[0]);
}

#[test]
fn test_mismatched_identity_message() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_who_am_i(0x2A);

    driver.connect(interface.clone()).unwrap();

    assert_eq!(
        interface.error_messages(),
        vec!["Invalid device ID, expected 0x68 but got 0x2A".to_string()]
    );
}

#[test]
fn test_mismatched_identity_still_configures() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_who_am_i(0xFF);

    driver.connect(interface.clone()).unwrap();

    assert_eq!(interface.writes().len(), 5);
    assert_eq!(interface.get_register(address::DLPF_FS), 0x18);
    assert_eq!(interface.get_register(address::PWR_MGM), 0x01);
    assert_eq!(driver.state(), itg3205::State::Ready);
}

#[test]
fn test_mismatched_identity_notification_order() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_who_am_i(0x00);

    driver.connect(interface.clone()).unwrap();

    let notifications = interface.notifications();
    assert_eq!(notifications.len(), 2);
    assert!(matches!(notifications[0], Operation::Error(_)));
    assert_eq!(notifications[1], Operation::DeviceId(0x00));
}

#[test]
fn test_mismatched_identity_not_recorded() {
    let (mut driver, interface) = create_mock_driver();
    interface.set_who_am_i(0x69);

    driver.connect(interface.clone()).unwrap();

    assert_eq!(driver.device_id(), None);
}

#[test]
fn test_device_id_reported_before_configuration() {
    let (mut driver, interface) = create_mock_driver();

    driver.connect(interface.clone()).unwrap();

    let operations = interface.operations();
    let id_index = operations
        .iter()
        .position(|op| *op == Operation::DeviceId(0x68))
        .unwrap();
    let dlpf_index = operations
        .iter()
        .position(|op| {
            matches!(
                op,
                Operation::Write {
                    address: address::DLPF_FS,
                    ..
                }
            )
        })
        .unwrap();
    assert!(id_index < dlpf_index);
}

#[test]
fn test_read_device_id_directly() {
    let (mut driver, interface) = create_mock_driver();
    driver.connect(interface.clone()).unwrap();
    interface.clear_operations();

    interface.set_who_am_i(0x42);
    assert_eq!(driver.read_device_id().unwrap(), 0x42);
    assert_eq!(
        interface.bus_operations(),
        vec![Operation::Read {
            address: address::WHO_AM_I,
            len: 1
        }]
    );
    assert!(interface.notifications().is_empty());
}
