//! kafkap: the byte-level encoding substrate of the Kafka wire protocol.
//!
//! Length-prefixed strings and byte arrays with NULL semantics, request/response
//! frame headers, the API key registry and version ranges, and the fixed framing
//! sizes callers use to pre-size buffers. Everything here is a pure function over
//! caller-supplied buffers; transport, compression and per-API messages live elsewhere.

pub mod config;
pub mod error;
pub mod protocol;

pub use config::CodecConfig;
pub use error::{ProtoError, Result};
pub use protocol::{
    ApiKey, ApiVersionRange, ApiVersionTable, KafkaFrameCodec, ProtoBytes, ProtoBytesRef,
    ProtoStr, ProtoString, RequestHeader, ResponseHeader,
};
