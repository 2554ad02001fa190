//! Request/response header framing and size patching.

use bytes::{Buf, BufMut, BytesMut};
use kafkap::protocol::{
    encode_request, read_response_header, write_request_header, ProtoString, SizeSlot,
    REQUEST_HEADER_SIZE, RESPONSE_HEADER_SIZE,
};
use kafkap::{ApiKey, CodecConfig, ProtoError, RequestHeader, ResponseHeader};

#[test]
fn metadata_request_size_field_counts_everything_after_it() {
    let header = RequestHeader::new(ApiKey::METADATA, 0, 7, Some("test")).unwrap();
    let body = [0xabu8; 16];
    let frame = encode_request(&header, &body).unwrap();

    // 2 + 2 + 4 + (2 + 4) + 16
    assert_eq!(&frame[..4], &30i32.to_be_bytes());
    assert_eq!(frame.len(), 4 + 30);
    assert_eq!(
        &frame[4..18],
        &[0x00u8, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x07, 0x00, 0x04, b't', b'e', b's', b't']
    );
    assert_eq!(&frame[18..], &body);
}

#[test]
fn size_slot_is_patched_after_body() {
    let mut dst = BytesMut::new();
    let slot = write_request_header(&mut dst, ApiKey::FETCH, 2, 99, None).unwrap();
    assert_eq!(&dst[..4], &[0u8; 4]);

    dst.put_i32(0x0102_0304);
    let size = slot.finish(&mut dst).unwrap();

    // header (8) + NULL client id (2) + body (4)
    assert_eq!(size, 14);
    assert_eq!(&dst[..4], &14i32.to_be_bytes());
    assert_eq!(&dst[12..14], &[0xffu8, 0xff]);
}

#[test]
fn size_slot_on_a_shorter_buffer_is_an_error() {
    let mut dst = BytesMut::new();
    dst.put_slice(b"some bytes");
    let slot = SizeSlot::reserve(&mut dst);
    let err = slot.finish(&mut BytesMut::new()).unwrap_err();
    assert!(matches!(
        err,
        ProtoError::Framing {
            needed: 14,
            remaining: 0,
            ..
        }
    ));
}

#[test]
fn size_slot_works_mid_buffer() {
    let mut dst = BytesMut::new();
    dst.put_slice(b"previous frame");
    let slot = SizeSlot::reserve(&mut dst);
    dst.put_slice(b"abc");
    assert_eq!(slot.finish(&mut dst).unwrap(), 3);
    assert_eq!(&dst[14..18], &3i32.to_be_bytes());
}

#[test]
fn two_pass_length_matches_single_pass() {
    let header = RequestHeader::new(ApiKey::JOIN_GROUP, 1, 42, Some("consumer-a")).unwrap();
    assert_eq!(header.encoded_len(), REQUEST_HEADER_SIZE + 2 + 10);

    let frame = encode_request(&header, &[]).unwrap();
    assert_eq!(frame.len(), 4 + header.encoded_len());
}

#[test]
fn request_header_decodes_back() {
    let header = RequestHeader::new(ApiKey::API_VERSION, 3, -12, Some("kafkap")).unwrap();
    let frame = encode_request(&header, b"body").unwrap();

    let mut src = frame.freeze();
    let (size, decoded) = RequestHeader::decode_framed(&mut src).unwrap();
    assert_eq!(size, 8 + 8 + 4);
    assert_eq!(decoded, header);
    assert_eq!(decoded.client_id, "kafkap");
    assert_eq!(src.chunk(), b"body");
}

#[test]
fn request_header_with_null_client_id() {
    let header = RequestHeader::new(ApiKey::HEARTBEAT, 0, 1, None).unwrap();
    let frame = encode_request(&header, &[]).unwrap();
    let mut src = &frame[4..];
    let decoded = RequestHeader::decode(&mut src).unwrap();
    assert!(decoded.client_id.is_null());
}

#[test]
fn request_header_takes_client_id_from_config() {
    let config = CodecConfig::default().with_client_id("rdkafka");
    let header = RequestHeader::from_config(&config, ApiKey::PRODUCE, 0, 5).unwrap();
    assert_eq!(header.client_id, ProtoString::new("rdkafka").unwrap());

    let header = RequestHeader::from_config(&CodecConfig::default(), ApiKey::PRODUCE, 0, 5).unwrap();
    assert!(header.client_id.is_null());
}

#[test]
fn short_request_header_is_a_framing_error() {
    let mut src: &[u8] = &[0, 3, 0, 0, 0];
    let err = RequestHeader::decode(&mut src).unwrap_err();
    assert!(matches!(
        err,
        ProtoError::Framing {
            needed: 8,
            remaining: 5,
            ..
        }
    ));
}

#[test]
fn framed_decode_rejects_truncated_frame() {
    let mut src: &[u8] = &[0, 0, 0, 40, 0, 3, 0, 0, 0, 0, 0, 1, 0xff, 0xff];
    assert!(RequestHeader::decode_framed(&mut src)
        .unwrap_err()
        .is_incomplete());
}

#[test]
fn client_id_past_frame_end_is_rejected() {
    // Size 10 covers the fixed header and the client id length only; the
    // client id payload belongs to whatever follows the frame.
    let mut src: &[u8] = &[
        0, 0, 0, 10, 0, 3, 0, 0, 0, 0, 0, 7, 0, 4, b'n', b'e', b'x', b't',
    ];
    let err = RequestHeader::decode_framed(&mut src).unwrap_err();
    assert!(matches!(
        err,
        ProtoError::Framing {
            what: "string",
            needed: 4,
            remaining: 0
        }
    ));
}

#[test]
fn frame_smaller_than_header_is_rejected() {
    let mut src: &[u8] = &[
        0, 0, 0, 8, 0, 3, 0, 0, 0, 0, 0, 7, 0, 4, b'n', b'e', b'x', b't',
    ];
    let err = RequestHeader::decode_framed(&mut src).unwrap_err();
    assert!(matches!(
        err,
        ProtoError::InvalidLength {
            what: "request frame",
            length: 8
        }
    ));

    let mut src: &[u8] = &[0, 0, 0, 3, 0, 3, 0];
    assert!(matches!(
        RequestHeader::decode_framed(&mut src).unwrap_err(),
        ProtoError::InvalidLength { length: 3, .. }
    ));
}

#[test]
fn framed_decode_leaves_following_frame_untouched() {
    let first = RequestHeader::new(ApiKey::METADATA, 0, 1, Some("a")).unwrap();
    let second = RequestHeader::new(ApiKey::FETCH, 2, 2, Some("b")).unwrap();
    let mut wire = encode_request(&first, &[9, 9]).unwrap();
    wire.put_slice(&encode_request(&second, &[]).unwrap());

    let mut src = wire.freeze();
    let (_, decoded) = RequestHeader::decode_framed(&mut src).unwrap();
    assert_eq!(decoded, first);
    src.advance(2);
    let (_, decoded) = RequestHeader::decode_framed(&mut src).unwrap();
    assert_eq!(decoded, second);
    assert!(!src.has_remaining());
}

#[test]
fn response_header_reads_size_and_correlation_id() {
    let mut src: &[u8] = &[0, 0, 0, 10, 0, 0, 0, 7, 1, 2, 3, 4, 5, 6];
    let header = read_response_header(&mut src).unwrap();
    assert_eq!(header.size, 10);
    assert_eq!(header.correlation_id, 7);
    assert!(header.matches(7));
    assert!(!header.matches(8));
    assert_eq!(header.body_len().unwrap(), 6);
    assert_eq!(src.len(), 6);
}

#[test]
fn response_header_needs_eight_bytes() {
    let mut src: &[u8] = &[0, 0, 0, 10, 0, 0, 0];
    let err = read_response_header(&mut src).unwrap_err();
    assert!(matches!(
        err,
        ProtoError::Framing {
            needed: RESPONSE_HEADER_SIZE,
            remaining: 7,
            ..
        }
    ));
}

#[test]
fn response_header_round_trip_through_encode() {
    let header = ResponseHeader::for_body(-1, 100).unwrap();
    assert_eq!(header.size, 104);

    let mut dst = BytesMut::new();
    header.encode(&mut dst);
    assert_eq!(dst.len(), RESPONSE_HEADER_SIZE);
    assert_eq!(ResponseHeader::read(&mut dst.freeze()).unwrap(), header);
}

#[test]
fn response_size_smaller_than_correlation_id_is_invalid() {
    let header = ResponseHeader {
        size: 2,
        correlation_id: 0,
    };
    assert!(matches!(
        header.body_len().unwrap_err(),
        ProtoError::InvalidLength { length: 2, .. }
    ));
}
