//! API key names, version ranges and negotiation.

use bytes::{BufMut, BytesMut};
use kafkap::protocol::api_key_name;
use kafkap::{ApiKey, ApiVersionRange, ApiVersionTable, ProtoError};

fn range(key: i16, min: i16, max: i16) -> ApiVersionRange {
    ApiVersionRange::new(ApiKey(key), min, max).unwrap()
}

#[test]
fn known_keys_have_canonical_names() {
    assert_eq!(api_key_name(0), "Produce");
    assert_eq!(api_key_name(3), "Metadata");
    assert_eq!(api_key_name(10), "GroupCoordinator");
    assert_eq!(api_key_name(17), "SaslHandshake");
    assert_eq!(api_key_name(18), "ApiVersion");
    assert_eq!(ApiKey::OFFSET_FETCH.to_string(), "OffsetFetch");
}

#[test]
fn every_known_key_is_named_and_gaps_are_not() {
    assert_eq!(ApiKey::KNOWN.len(), 17);
    for key in ApiKey::KNOWN {
        assert!(key.is_known(), "{:?}", key);
        assert!(!key.name().starts_with("Unknown-"));
        assert!(key.code() < ApiKey::NUM);
    }
    assert!(!ApiKey(6).is_known());
    assert!(!ApiKey(7).is_known());
}

#[test]
fn unknown_keys_render_a_placeholder() {
    let name = api_key_name(255);
    assert!(name.starts_with("Unknown-"));
    assert!(name.contains("255"));
    assert_eq!(name, "Unknown-255?");

    assert_eq!(api_key_name(6), "Unknown-6?");
    assert_eq!(api_key_name(19), "Unknown-19?");
    assert_eq!(ApiKey::NONE.to_string(), "Unknown--1?");
}

#[test]
fn api_key_converts_to_and_from_i16() {
    let key: ApiKey = 11i16.into();
    assert_eq!(key, ApiKey::JOIN_GROUP);
    assert_eq!(i16::from(ApiKey::SYNC_GROUP), 14);
}

#[test]
fn sorting_by_key_comparator_orders_by_api_key() {
    let mut ranges = vec![range(14, 0, 1), range(3, 0, 9), range(0, 0, 5)];
    ranges.sort_by(ApiVersionRange::key_cmp);
    let keys: Vec<i16> = ranges.iter().map(|r| r.api_key().code()).collect();
    assert_eq!(keys, vec![0, 3, 14]);
}

#[test]
fn inverted_range_is_rejected() {
    let err = ApiVersionRange::new(ApiKey::FETCH, 4, 2).unwrap_err();
    assert!(matches!(
        err,
        ProtoError::InvalidVersionRange {
            api_key: 1,
            min: 4,
            max: 2
        }
    ));
}

#[test]
fn negotiation_picks_highest_common_version() {
    let broker = range(1, 0, 11);
    assert_eq!(broker.negotiate(0, 4), Some(4));
    assert_eq!(broker.negotiate(0, 20), Some(11));
    assert_eq!(broker.negotiate(12, 20), None);
    assert!(broker.contains(0) && broker.contains(11) && !broker.contains(12));

    let broker = range(3, 4, 9);
    assert_eq!(broker.negotiate(0, 2), None);
    assert_eq!(broker.intersect(0, 5), Some((4, 5)));
}

#[test]
fn table_looks_up_by_binary_search() {
    let table: ApiVersionTable = vec![
        range(18, 0, 3),
        range(0, 0, 7),
        range(3, 0, 12),
        range(1, 0, 11),
    ]
    .into_iter()
    .collect();
    assert_eq!(table.len(), 4);
    let keys: Vec<i16> = table.iter().map(|r| r.api_key().code()).collect();
    assert_eq!(keys, vec![0, 1, 3, 18]);

    assert_eq!(table.get(ApiKey::METADATA), Some(&range(3, 0, 12)));
    assert_eq!(table.get(ApiKey::HEARTBEAT), None);

    assert_eq!(table.negotiate(ApiKey::METADATA, 0, 4), Some(4));
    assert_eq!(table.negotiate(ApiKey::API_VERSION, 0, 0), Some(0));
    assert_eq!(table.negotiate(ApiKey::HEARTBEAT, 0, 4), None);
}

#[test]
fn decodes_api_versions_response_body() {
    let mut body = BytesMut::new();
    body.put_i16(0);
    body.put_i32(3);
    for (key, min, max) in [(18i16, 0i16, 2i16), (0, 0, 5), (3, 1, 8)] {
        body.put_i16(key);
        body.put_i16(min);
        body.put_i16(max);
    }

    let (error_code, table) = ApiVersionTable::decode_response(&mut body.freeze()).unwrap();
    assert_eq!(error_code, 0);
    assert_eq!(table.len(), 3);
    assert_eq!(table.get(ApiKey::METADATA), Some(&range(3, 1, 8)));
    assert_eq!(table.iter().next().map(|r| r.api_key()), Some(ApiKey::PRODUCE));
}

#[test]
fn table_encode_matches_response_array() {
    let table = ApiVersionTable::new(vec![range(1, 0, 11), range(0, 0, 7)]);
    let mut body = BytesMut::new();
    body.put_i16(35);
    table.encode(&mut body).unwrap();
    assert_eq!(body.len(), 2 + 4 + 2 * ApiVersionRange::ENCODED_LEN);

    let (error_code, decoded) = ApiVersionTable::decode_response(&mut body.freeze()).unwrap();
    assert_eq!(error_code, 35);
    assert_eq!(decoded, table);
}

#[test]
fn truncated_version_array_is_a_framing_error() {
    let mut body = BytesMut::new();
    body.put_i16(0);
    body.put_i32(2);
    range(0, 0, 5).encode(&mut body);

    let err = ApiVersionTable::decode_response(&mut body.freeze()).unwrap_err();
    assert!(matches!(
        err,
        ProtoError::Framing {
            needed: 12,
            remaining: 6,
            ..
        }
    ));
}

#[test]
fn version_range_serializes_with_numeric_key() {
    let json = serde_json::to_value(range(3, 0, 9)).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"api_key": 3, "min_version": 0, "max_version": 9})
    );
    let back: ApiVersionRange = serde_json::from_value(json).unwrap();
    assert_eq!(back, range(3, 0, 9));
}

#[test]
fn inverted_version_range_fails_to_deserialize() {
    let err = serde_json::from_str::<ApiVersionRange>(
        r#"{"api_key":3,"min_version":9,"max_version":1}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("min version 9 above max version 1"));

    let ok: ApiVersionRange =
        serde_json::from_str(r#"{"api_key":3,"min_version":1,"max_version":9}"#).unwrap();
    assert_eq!((ok.min_version(), ok.max_version()), (1, 9));
    assert_eq!(ok.api_key(), ApiKey::METADATA);
}
