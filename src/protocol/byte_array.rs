//! Kafka protocol byte arrays.
//!
//! Serialized format: `int32` length (BE) followed by that many opaque bytes.
//! A length of -1 is NULL. The payload is never terminated or read as text.

use super::prefixed::{
    cmp_prefixed, explicit_len, len0, payload_len, slice_len, take, LengthPrefix, LEN_NULL,
};
use crate::error::Result;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::cmp::Ordering;
use std::fmt;

const WHAT: &str = "bytes";
const PREFIX: LengthPrefix = LengthPrefix::Int32;

/// Serialized size of a bytes value with raw wire length `len`.
#[inline]
pub const fn bytes_size(len: i32) -> usize {
    4 + len0(len)
}

/// Owned, immutable Kafka byte array.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProtoBytes {
    len: i32,
    /// `[len:i32 BE][data]`.
    buf: Bytes,
}

impl ProtoBytes {
    pub fn null() -> Self {
        Self {
            len: LEN_NULL,
            buf: Bytes::from_static(&[0xff, 0xff, 0xff, 0xff]),
        }
    }

    /// Copy `data`; `None` yields NULL.
    pub fn new(data: Option<&[u8]>) -> Result<Self> {
        let Some(data) = data else {
            return Ok(Self::null());
        };
        let len = PREFIX.check(WHAT, data.len())?;
        Self::with_len(data, len)
    }

    /// Copy the first `len` bytes of `data`. A `len` of -1 yields NULL.
    pub fn with_len(data: &[u8], len: i32) -> Result<Self> {
        if len == LEN_NULL {
            return Ok(Self::null());
        }
        let n = explicit_len(WHAT, data, len)?;
        let len = PREFIX.check(WHAT, n)?;
        let mut buf = BytesMut::with_capacity(4 + n);
        PREFIX.put(&mut buf, len);
        buf.put_slice(&data[..n]);
        Ok(Self {
            len,
            buf: buf.freeze(),
        })
    }

    /// Read a bytes value from `src`, copying its payload.
    pub fn decode<B: Buf>(src: &mut B) -> Result<Self> {
        let len = PREFIX.get(src, WHAT)?;
        match payload_len(WHAT, len, src.remaining())? {
            None => Ok(Self::null()),
            Some(n) => {
                let data = src.copy_to_bytes(n);
                Self::with_len(&data, len)
            }
        }
    }

    pub fn is_null(&self) -> bool {
        self.len == LEN_NULL
    }

    /// Raw wire length: -1 for NULL.
    pub fn len(&self) -> i32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.data_len() == 0
    }

    pub fn data_len(&self) -> usize {
        len0(self.len)
    }

    pub fn serialized_size(&self) -> usize {
        bytes_size(self.len)
    }

    pub fn serialized(&self) -> &[u8] {
        &self.buf
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf[4..]
    }

    /// Payload as a shared handle, without copying.
    pub fn data(&self) -> Bytes {
        self.buf.slice(4..)
    }

    pub fn as_bytes_ref(&self) -> ProtoBytesRef<'_> {
        ProtoBytesRef {
            len: self.len,
            data: self.as_slice(),
        }
    }

    pub fn write_to<B: BufMut>(&self, dst: &mut B) {
        dst.put_slice(self.serialized());
    }

    /// Compare against a raw span without wrapping it first.
    pub fn cmp_data(&self, data: &[u8]) -> Ordering {
        cmp_prefixed(self.len, self.as_slice(), slice_len(data), data)
    }
}

impl Default for ProtoBytes {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for ProtoBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_bytes_ref(), f)
    }
}

impl Ord for ProtoBytes {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_prefixed(self.len, self.as_slice(), other.len, other.as_slice())
    }
}

impl PartialOrd for ProtoBytes {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<[u8]> for ProtoBytes {
    fn eq(&self, other: &[u8]) -> bool {
        self.cmp_data(other) == Ordering::Equal
    }
}

impl PartialOrd<[u8]> for ProtoBytes {
    fn partial_cmp(&self, other: &[u8]) -> Option<Ordering> {
        Some(self.cmp_data(other))
    }
}

impl TryFrom<&[u8]> for ProtoBytes {
    type Error = crate::error::ProtoError;

    fn try_from(data: &[u8]) -> Result<Self> {
        Self::new(Some(data))
    }
}

/// Borrowed Kafka byte array pointing into a caller-owned buffer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtoBytesRef<'a> {
    len: i32,
    data: &'a [u8],
}

impl<'a> ProtoBytesRef<'a> {
    pub const NULL: ProtoBytesRef<'static> = ProtoBytesRef {
        len: LEN_NULL,
        data: &[],
    };

    /// Parse a bytes value off the front of `src` without copying.
    pub fn parse(src: &mut &'a [u8]) -> Result<Self> {
        let len = PREFIX.get(src, WHAT)?;
        Ok(match payload_len(WHAT, len, src.len())? {
            None => ProtoBytesRef::NULL,
            Some(n) => ProtoBytesRef {
                len,
                data: take(src, n),
            },
        })
    }

    pub fn is_null(&self) -> bool {
        self.len == LEN_NULL
    }

    pub fn len(&self) -> i32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn serialized_size(&self) -> usize {
        bytes_size(self.len)
    }

    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    pub fn cmp_data(&self, data: &[u8]) -> Ordering {
        cmp_prefixed(self.len, self.data, slice_len(data), data)
    }

    /// Copy into an owned [`ProtoBytes`].
    pub fn to_proto_bytes(&self) -> Result<ProtoBytes> {
        ProtoBytes::with_len(self.data, self.len)
    }
}

impl fmt::Debug for ProtoBytesRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("NULL")
        } else {
            write!(f, "{} bytes {:02x?}", self.len, self.data)
        }
    }
}

impl Ord for ProtoBytesRef<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_prefixed(self.len, self.data, other.len, other.data)
    }
}

impl PartialOrd for ProtoBytesRef<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<ProtoBytesRef<'_>> for ProtoBytes {
    fn eq(&self, other: &ProtoBytesRef<'_>) -> bool {
        self.as_bytes_ref() == *other
    }
}

/// Write a nullable byte array without building a [`ProtoBytes`].
pub fn put_bytes<B: BufMut>(dst: &mut B, data: Option<&[u8]>) -> Result<()> {
    PREFIX.put_value(dst, WHAT, data)
}
