//! End-to-end event sequences through a ReceiverHost.
//!
//! Run with:
//!   cargo test --test heart_rate_events

use std::sync::Arc;

use polar_ble_receiver::ble::actions::{
    ACTION_GATT_CONNECTED, ACTION_GATT_DISCONNECTED, ACTION_GATT_SERVICES_DISCOVERED,
    ACTION_HR_DATA_AVAILABLE,
};
use polar_ble_receiver::{
    BleEvent, EventKind, HeartRateReading, ReceiverError, ReceiverHost,
};

#[test]
fn test_reading_survives_bad_payload() {
    let host = ReceiverHost::default();
    let receiver = host.receiver();
    assert!(host.latest().is_none());

    receiver.handle(ACTION_HR_DATA_AVAILABLE, Some("72;10;12")).unwrap();
    let expected = HeartRateReading {
        heart_rate: 72,
        previous_rr_interval: 10,
        rr_interval: 12,
    };
    assert_eq!(host.latest(), Some(expected));

    let err = receiver.handle(ACTION_HR_DATA_AVAILABLE, Some("bad")).unwrap_err();
    assert!(matches!(err, ReceiverError::MalformedPayload(_)));
    assert_eq!(host.latest(), Some(expected));
}

#[test]
fn test_same_payload_twice_is_idempotent() {
    let host = ReceiverHost::default();
    let receiver = host.receiver();

    receiver.handle(ACTION_HR_DATA_AVAILABLE, Some("66;920;905")).unwrap();
    let once = host.latest();
    receiver.handle(ACTION_HR_DATA_AVAILABLE, Some("66;920;905")).unwrap();

    assert_eq!(host.latest(), once);
}

#[test]
fn test_connection_session() {
    let host = ReceiverHost::default();
    let receiver = host.receiver();

    let events = vec![
        BleEvent::new(ACTION_GATT_CONNECTED),
        BleEvent::new(ACTION_GATT_SERVICES_DISCOVERED),
        BleEvent::new(ACTION_HR_DATA_AVAILABLE).with_data("70;860;850"),
        BleEvent::new(ACTION_HR_DATA_AVAILABLE),
        BleEvent::new(ACTION_HR_DATA_AVAILABLE).with_data("71;850;845"),
        BleEvent::new(ACTION_HR_DATA_AVAILABLE).with_data("71;oops;845"),
        BleEvent::new(ACTION_GATT_DISCONNECTED),
    ];

    let mut errors = Vec::new();
    for event in &events {
        if let Err(e) = receiver.on_receive(event) {
            errors.push(e);
        }
    }

    assert_eq!(errors.len(), 2);
    assert_eq!(errors[0], ReceiverError::MissingPayload);
    assert!(matches!(errors[1], ReceiverError::MalformedPayload(_)));

    let snapshot = host.cache().snapshot().unwrap();
    assert_eq!(snapshot.reading, HeartRateReading::new(71, 850, 845));
    assert_eq!(snapshot.version, 2);
}

#[tokio::test]
async fn test_watchers_only_see_successful_readings() {
    let host = ReceiverHost::default();
    let mut rx = host.cache().watch();
    let receiver = host.receiver();

    let sender = Arc::clone(&receiver);
    tokio::spawn(async move {
        for payload in ["60;1000;990", "60;", "61;990;980"] {
            let _ = sender.handle_kind(EventKind::HeartRateDataAvailable, Some(payload));
        }
    })
    .await
    .unwrap();

    assert_eq!(rx.recv().await.unwrap(), HeartRateReading::new(60, 1000, 990));
    assert_eq!(rx.recv().await.unwrap(), HeartRateReading::new(61, 990, 980));
    assert!(rx.try_recv().is_err());
}

#[test]
fn test_concurrent_deliveries() {
    let host = ReceiverHost::default();
    let mut handles = Vec::new();

    for n in 0..4 {
        let receiver = host.receiver();
        handles.push(std::thread::spawn(move || {
            for i in 0..100 {
                let v = n * 100 + i;
                let payload = format!("{v};{v};{v}");
                receiver.handle(ACTION_HR_DATA_AVAILABLE, Some(&payload)).unwrap();
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let reading = host.latest().unwrap();
    assert_eq!(reading.heart_rate, reading.previous_rr_interval);
    assert_eq!(reading.heart_rate, reading.rr_interval);
    assert_eq!(host.cache().version(), 400);
}
