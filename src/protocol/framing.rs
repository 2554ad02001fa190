//! Fixed wire sizes used to pre-size buffers and bound reads.
//!
//! These mirror the wire layout and are not tunable.

/// Default broker port.
pub const DEFAULT_PORT: u16 = 9092;
pub const DEFAULT_PORT_STR: &str = "9092";

/// Leading `int32` size field of every frame. It counts the bytes after itself.
pub const SIZE_FIELD_LEN: usize = 4;

/// ApiKey + ApiVersion + CorrId. Excludes the size field and the client id.
pub const REQUEST_HEADER_SIZE: usize = 2 + 2 + 4;

/// Size + CorrId.
pub const RESPONSE_HEADER_SIZE: usize = 4 + 4;

/// Offset + MessageSize.
pub const MESSAGESET_HEADER_SIZE: usize = 8 + 4;

/// CRC + Magic + Attributes + KeyLen + ValueLen + Timestamp.
///
/// Includes the 8-byte timestamp that only message version 1 carries.
pub const MESSAGE_HEADER_SIZE: usize = 4 + 1 + 1 + 4 + 4 + 8;

/// Maximum per-message overhead inside a message set.
pub const MESSAGE_OVERHEAD: usize = MESSAGESET_HEADER_SIZE + MESSAGE_HEADER_SIZE;

/// Buffer size for a broker `host:port` name.
pub const NODENAME_SIZE: usize = 128;

/// Bytes to reserve for a message set of `count` messages carrying
/// `payload_bytes` of keys and values in total.
pub const fn message_set_capacity(count: usize, payload_bytes: usize) -> usize {
    count
        .saturating_mul(MESSAGE_OVERHEAD)
        .saturating_add(payload_bytes)
}
