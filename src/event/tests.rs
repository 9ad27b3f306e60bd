//! Tests for event decoding and encoding

use super::*;
use chrono::NaiveDate;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, s)
        .unwrap()
}

#[test]
fn test_decode_field_well_formed() {
    let event = decode_field("2020-01-01 00:00:00", "1").unwrap();

    assert_eq!(event.occurred_at, at(2020, 1, 1, 0, 0, 0));
    assert!(event.status);
    assert_eq!(event.epoch_seconds(), 1577836800);
    assert_eq!(event.gauge_value(), 1);
}

#[test]
fn test_decode_entry_well_formed() {
    let event = decode_entry("2020-01-01 01:00:00,0").unwrap();

    assert_eq!(event.epoch_seconds(), 1577840400);
    assert!(!event.status);
    assert_eq!(event.gauge_value(), 0);
}

#[test]
fn test_decode_dispatches_on_raw_shape() {
    let field = RawEntry::Field {
        field: "2019-06-30 23:59:59".to_string(),
        value: "0".to_string(),
    };
    let combined = RawEntry::Combined("2019-06-30 23:59:59,0".to_string());

    assert_eq!(decode(&field).unwrap(), decode(&combined).unwrap());
}

#[test]
fn test_bad_timestamps_are_rejected() {
    let cases = [
        "2020-13-01 00:00:00",
        "2020-01-01T00:00:00",
        "2020-1-1 0:0:0",
        "2020-01-01 00:00",
        "2020-01-01 00:00:00.5",
        " 2020-01-01 00:00:00",
        "yesterday",
        "",
    ];

    for timestamp in cases {
        let err = decode_field(timestamp, "1").unwrap_err();
        assert_eq!(
            err.kind,
            DecodeErrorKind::BadTimestamp,
            "expected bad timestamp for {:?}",
            timestamp
        );
        assert!(err.raw.contains(timestamp));
    }
}

#[test]
fn test_bad_statuses_are_rejected_not_coerced() {
    for status in ["2", "-1", "true", "", " 1", "01", "on"] {
        let err = decode_field("2020-01-01 00:00:00", status).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::BadStatus, "status {:?}", status);

        let entry = format!("2020-01-01 00:00:00,{}", status);
        let err = decode_entry(&entry).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::BadStatus);
        assert_eq!(err.raw, entry);
    }
}

#[test]
fn test_wrong_arity_is_a_decode_error() {
    let cases = [
        ("2020-01-01 00:00:00", 1),
        ("2020-01-01 00:00:00,1,1", 3),
        (",,", 3),
        ("", 1),
    ];

    for (entry, fields) in cases {
        let err = decode_entry(entry).unwrap_err();
        assert_eq!(err.kind, DecodeErrorKind::BadArity);
        assert!(err.detail.contains(&format!("found {}", fields)));
    }
}

#[test]
fn test_decode_is_deterministic() {
    for entry in ["2020-02-29 12:30:45,1", "2021-02-29 12:30:45,1", "junk"] {
        assert_eq!(decode_entry(entry), decode_entry(entry));
    }
}

#[test]
fn test_list_mode_round_trip() {
    let events = [
        Event::new(at(2017, 1, 1, 0, 0, 0), true),
        Event::new(at(2018, 12, 31, 23, 59, 59), false),
        Event::new(at(1970, 1, 1, 0, 0, 0), false),
        Event::new(at(2024, 2, 29, 7, 5, 3), true),
    ];

    for event in events {
        assert_eq!(decode_entry(&encode(&event)).unwrap(), event);
    }
}

#[test]
fn test_encode_field_matches_hash_map_wire_form() {
    let event = Event::new(at(2018, 3, 4, 5, 6, 0), true);
    assert_eq!(
        encode_field(&event),
        ("2018-03-04 05:06:00".to_string(), "1".to_string())
    );

    let (field, value) = encode_field(&event);
    assert_eq!(decode_field(&field, &value).unwrap(), event);
}

#[test]
fn test_decode_error_display_names_reason_and_payload() {
    let err = decode_entry("2020-01-01 00:00:00,7").unwrap_err();
    let message = err.to_string();

    assert!(message.contains("bad status"));
    assert!(message.contains("2020-01-01 00:00:00,7"));
}
