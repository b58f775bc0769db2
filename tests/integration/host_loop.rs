//! Paced polling loop tests

use crate::common::{
    HostDriver, MockDelay, MockError, MockHost, MockInterface, NS_PER_MS, Operation,
    create_host_driver,
};
use itg3205::looper::{self, DEFAULT_POLL_INTERVAL_MS};
use itg3205::registers::address;
use itg3205::{DeviceConfig, Error, State};

fn data_count(device: &MockInterface) -> usize {
    device
        .notifications()
        .iter()
        .filter(|op| matches!(op, Operation::Data(_)))
        .count()
}

#[test]
fn test_run_polls_until_stopped() {
    let device = MockInterface::new();
    let mut host = MockHost::new(&device);
    let mut pacer = MockDelay::new(&device);
    let mut driver = create_host_driver(DeviceConfig::default(), &device);

    let mut remaining = 3;
    looper::run(
        &mut driver,
        &mut host,
        &mut pacer,
        DEFAULT_POLL_INTERVAL_MS,
        || {
            if remaining == 0 {
                return false;
            }
            remaining -= 1;
            true
        },
    )
    .unwrap();

    assert_eq!(data_count(&device), 3);
    assert_eq!(driver.state(), State::Ready);
}

#[test]
fn test_run_paces_between_polls() {
    let device = MockInterface::new();
    let mut host = MockHost::new(&device);
    let mut pacer = MockDelay::new(&device);
    let mut driver = create_host_driver(DeviceConfig::default(), &device);

    let mut polls = 0;
    looper::run(&mut driver, &mut host, &mut pacer, 10, || {
        polls += 1;
        polls <= 2
    })
    .unwrap();

    let operations = device.operations();
    let first_sample = operations
        .iter()
        .position(|op| {
            matches!(
                op,
                Operation::Read {
                    address: address::TEMP_OUT_H,
                    ..
                }
            )
        })
        .unwrap();
    let after: Vec<Operation> = operations[first_sample..]
        .iter()
        .filter(|op| !matches!(op, Operation::Data(_)))
        .cloned()
        .collect();
    let sample_read = Operation::Read {
        address: address::TEMP_OUT_H,
        len: 8,
    };
    let pace = Operation::Delay { ns: 10 * NS_PER_MS };
    assert_eq!(
        after,
        vec![sample_read.clone(), pace.clone(), sample_read, pace]
    );
}

#[test]
fn test_run_stops_on_read_failure() {
    let device = MockInterface::new();
    let mut host = MockHost::new(&device);
    let mut pacer = MockDelay::new(&device);
    let mut driver = create_host_driver(DeviceConfig::default(), &device);

    let mut polls = 0;
    let result = looper::run(&mut driver, &mut host, &mut pacer, 10, || {
        polls += 1;
        if polls == 2 {
            device.fail_next_read();
        }
        true
    });

    assert!(matches!(result, Err(Error::Bus(MockError::Communication))));
    assert_eq!(data_count(&device), 1);
    assert_eq!(driver.state(), State::Disconnected);
    assert_eq!(
        device.notifications().last(),
        Some(&Operation::Disconnected)
    );
}

#[test]
fn test_run_reports_failed_open() {
    let device = MockInterface::new();
    let mut host = MockHost::new(&device);
    host.fail_open = true;
    let mut pacer = MockDelay::new(&device);
    let mut driver = create_host_driver(DeviceConfig::default(), &device);

    let result = looper::run(&mut driver, &mut host, &mut pacer, 10, || true);

    assert!(matches!(result, Err(Error::Bus(MockError::ConnectionLost))));
    assert!(device.bus_operations().is_empty());
    assert_eq!(device.notifications(), vec![Operation::Disconnected]);
}

#[test]
fn test_run_without_listener_configures_only() {
    let device = MockInterface::new();
    let mut host = MockHost::new(&device);
    let mut pacer = MockDelay::new(&device);
    let mut driver: HostDriver = create_host_driver(DeviceConfig::default(), &device);
    driver.take_listener();

    let mut polls = 0;
    looper::run(&mut driver, &mut host, &mut pacer, 0, || {
        polls += 1;
        polls <= 5
    })
    .unwrap();

    assert_eq!(device.writes().len(), 5);
    assert!(
        !device
            .bus_operations()
            .iter()
            .any(|op| matches!(
                op,
                Operation::Read {
                    address: address::TEMP_OUT_H,
                    ..
                }
            ))
    );
}
