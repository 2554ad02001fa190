//! Kafka protocol strings.
//!
//! Serialized format: `int16` length (BE) followed by that many bytes.
//! A length of -1 is NULL, 0 is the empty string.
//!
//! [`ProtoString`] owns a single buffer laid out exactly as on the wire, followed by a
//! NUL terminator that is never counted or written. [`ProtoStr`] is a borrowed view
//! produced by parsing a caller-owned input.

use super::prefixed::{
    cmp_prefixed, explicit_len, len0, payload_len, slice_len, take, LengthPrefix, LEN_NULL,
};
use crate::error::Result;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::ffi::CStr;
use std::fmt;

const WHAT: &str = "string";
const PREFIX: LengthPrefix = LengthPrefix::Int16;

/// Maximum payload length of a non-NULL string.
pub const STRING_MAX_LEN: usize = i16::MAX as usize;

/// Serialized size of a string with raw wire length `len`.
#[inline]
pub const fn string_size(len: i32) -> usize {
    2 + len0(len)
}

/// Owned, immutable Kafka string.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProtoString {
    len: i32,
    /// `[len:i16 BE][data][NUL]`, or just `[0xff, 0xff]` for NULL.
    buf: Bytes,
}

impl ProtoString {
    /// The NULL string.
    pub fn null() -> Self {
        Self {
            len: LEN_NULL,
            buf: Bytes::from_static(&[0xff, 0xff]),
        }
    }

    /// Copy `s` into a new string.
    pub fn new(s: &str) -> Result<Self> {
        Self::with_len(Some(s.as_bytes()), LEN_NULL)
    }

    /// Copy an optional byte string; `None` yields NULL.
    pub fn from_bytes(data: Option<&[u8]>) -> Result<Self> {
        Self::with_len(data, LEN_NULL)
    }

    /// Copy exactly `len` bytes of `data`, or all of it when `len` is -1.
    pub fn with_len(data: Option<&[u8]>, len: i32) -> Result<Self> {
        let Some(data) = data else {
            return Ok(Self::null());
        };
        let n = explicit_len(WHAT, data, len)?;
        let len = PREFIX.check(WHAT, n)?;
        let mut buf = BytesMut::with_capacity(2 + n + 1);
        PREFIX.put(&mut buf, len);
        buf.put_slice(&data[..n]);
        buf.put_u8(0);
        Ok(Self {
            len,
            buf: buf.freeze(),
        })
    }

    /// Read a string from `src`, copying its payload.
    pub fn decode<B: Buf>(src: &mut B) -> Result<Self> {
        let len = PREFIX.get(src, WHAT)?;
        match payload_len(WHAT, len, src.remaining())? {
            None => Ok(Self::null()),
            Some(n) => {
                let data = src.copy_to_bytes(n);
                Self::with_len(Some(&data[..]), len)
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

    /// True for NULL and for the empty string.
    pub fn is_empty(&self) -> bool {
        self.data_len() == 0
    }

    /// Payload length, NULL counting as zero.
    pub fn data_len(&self) -> usize {
        len0(self.len)
    }

    pub fn serialized_size(&self) -> usize {
        string_size(self.len)
    }

    /// The wire form: length prefix and payload, without the terminator.
    pub fn serialized(&self) -> &[u8] {
        &self.buf[..self.serialized_size()]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[2..self.serialized_size()]
    }

    /// UTF-8 view; `None` for NULL.
    pub fn as_str(&self) -> Result<Option<&str>> {
        if self.is_null() {
            return Ok(None);
        }
        Ok(Some(std::str::from_utf8(self.as_bytes())?))
    }

    /// NUL-terminated view. `None` for NULL or when the payload holds an interior NUL.
    pub fn as_c_str(&self) -> Option<&CStr> {
        if self.is_null() {
            return None;
        }
        CStr::from_bytes_with_nul(&self.buf[2..self.serialized_size() + 1]).ok()
    }

    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(self.as_bytes())
    }

    /// Owned copy of the text; NULL maps to `None`.
    pub fn to_owned_string(&self) -> Option<String> {
        if self.is_null() {
            None
        } else {
            Some(self.to_string_lossy().into_owned())
        }
    }

    pub fn as_proto_str(&self) -> ProtoStr<'_> {
        ProtoStr {
            len: self.len,
            data: self.as_bytes(),
        }
    }

    pub fn write_to<B: BufMut>(&self, dst: &mut B) {
        dst.put_slice(self.serialized());
    }

    /// Compare against a plain string, which is never NULL.
    pub fn cmp_str(&self, s: &str) -> Ordering {
        cmp_prefixed(self.len, self.as_bytes(), slice_len(s.as_bytes()), s.as_bytes())
    }
}

impl Default for ProtoString {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for ProtoString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.as_proto_str(), f)
    }
}

/// NULL prints as the empty string.
impl fmt::Display for ProtoString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}

impl Ord for ProtoString {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_prefixed(self.len, self.as_bytes(), other.len, other.as_bytes())
    }
}

impl PartialOrd for ProtoString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<str> for ProtoString {
    fn eq(&self, other: &str) -> bool {
        self.cmp_str(other) == Ordering::Equal
    }
}

impl PartialEq<&str> for ProtoString {
    fn eq(&self, other: &&str) -> bool {
        self.cmp_str(other) == Ordering::Equal
    }
}

impl PartialEq<ProtoString> for str {
    fn eq(&self, other: &ProtoString) -> bool {
        other.cmp_str(self) == Ordering::Equal
    }
}

impl PartialOrd<str> for ProtoString {
    fn partial_cmp(&self, other: &str) -> Option<Ordering> {
        Some(self.cmp_str(other))
    }
}

impl PartialOrd<ProtoString> for str {
    fn partial_cmp(&self, other: &ProtoString) -> Option<Ordering> {
        Some(other.cmp_str(self).reverse())
    }
}

impl TryFrom<&str> for ProtoString {
    type Error = crate::error::ProtoError;

    fn try_from(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<Option<&str>> for ProtoString {
    type Error = crate::error::ProtoError;

    fn try_from(s: Option<&str>) -> Result<Self> {
        Self::from_bytes(s.map(str::as_bytes))
    }
}

/// Borrowed Kafka string pointing into a caller-owned buffer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProtoStr<'a> {
    len: i32,
    data: &'a [u8],
}

impl<'a> ProtoStr<'a> {
    pub const NULL: ProtoStr<'static> = ProtoStr {
        len: LEN_NULL,
        data: &[],
    };

    /// Parse a string off the front of `src` without copying.
    pub fn parse(src: &mut &'a [u8]) -> Result<Self> {
        let len = PREFIX.get(src, WHAT)?;
        Ok(match payload_len(WHAT, len, src.len())? {
            None => ProtoStr::NULL,
            Some(n) => ProtoStr {
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
        string_size(self.len)
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.data
    }

    pub fn as_str(&self) -> Result<Option<&'a str>> {
        if self.is_null() {
            return Ok(None);
        }
        Ok(Some(std::str::from_utf8(self.data)?))
    }

    pub fn cmp_str(&self, s: &str) -> Ordering {
        cmp_prefixed(self.len, self.data, slice_len(s.as_bytes()), s.as_bytes())
    }

    /// Copy into an owned [`ProtoString`].
    pub fn to_proto_string(&self) -> Result<ProtoString> {
        if self.is_null() {
            return Ok(ProtoString::null());
        }
        ProtoString::with_len(Some(self.data), self.len)
    }
}

impl fmt::Debug for ProtoStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("NULL")
        } else {
            fmt::Debug::fmt(&String::from_utf8_lossy(self.data), f)
        }
    }
}

impl Ord for ProtoStr<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        cmp_prefixed(self.len, self.data, other.len, other.data)
    }
}

impl PartialOrd for ProtoStr<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq<str> for ProtoStr<'_> {
    fn eq(&self, other: &str) -> bool {
        self.cmp_str(other) == Ordering::Equal
    }
}

impl PartialEq<&str> for ProtoStr<'_> {
    fn eq(&self, other: &&str) -> bool {
        self.cmp_str(other) == Ordering::Equal
    }
}

impl PartialEq<ProtoStr<'_>> for ProtoString {
    fn eq(&self, other: &ProtoStr<'_>) -> bool {
        self.as_proto_str() == *other
    }
}

/// Write a nullable string without building a [`ProtoString`].
pub fn put_str<B: BufMut>(dst: &mut B, s: Option<&str>) -> Result<()> {
    PREFIX.put_value(dst, WHAT, s.map(str::as_bytes))
}
