//! Kafka binary wire protocol primitives.
//!
//! All multi-byte integers are big-endian. Strings carry an `int16` length and byte
//! arrays an `int32` length; -1 marks NULL in both.

mod api;
mod byte_array;
mod frame;
mod framing;
mod header;
mod prefixed;
mod string;

pub use api::{api_key_name, ApiKey, ApiVersionRange, ApiVersionTable};
pub use byte_array::{bytes_size, put_bytes, ProtoBytes, ProtoBytesRef};
pub use frame::{frame_body, KafkaFrameCodec};
pub use framing::{
    message_set_capacity, DEFAULT_PORT, DEFAULT_PORT_STR, MESSAGESET_HEADER_SIZE,
    MESSAGE_HEADER_SIZE, MESSAGE_OVERHEAD, NODENAME_SIZE, REQUEST_HEADER_SIZE,
    RESPONSE_HEADER_SIZE, SIZE_FIELD_LEN,
};
pub use header::{
    encode_request, read_response_header, write_request_header, RequestHeader, ResponseHeader,
    SizeSlot,
};
pub use prefixed::{len0, LEN_NULL};
pub use string::{put_str, string_size, ProtoStr, ProtoString, STRING_MAX_LEN};
