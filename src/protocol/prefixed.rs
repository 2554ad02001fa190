//! Length-prefix handling shared by the string and bytes codecs.

use crate::error::{ProtoError, Result};
use bytes::{Buf, BufMut};
use std::cmp::Ordering;
use tracing::warn;

/// Wire length of a NULL string or bytes value.
pub const LEN_NULL: i32 = -1;

/// Payload length for a raw length field; NULL (and any negative) counts as zero.
#[inline]
pub const fn len0(len: i32) -> usize {
    if len < 0 {
        0
    } else {
        len as usize
    }
}

/// Width of the signed big-endian length field in front of a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LengthPrefix {
    Int16,
    Int32,
}

impl LengthPrefix {
    pub(crate) const fn width(self) -> usize {
        match self {
            LengthPrefix::Int16 => 2,
            LengthPrefix::Int32 => 4,
        }
    }

    pub(crate) const fn max(self) -> usize {
        match self {
            LengthPrefix::Int16 => i16::MAX as usize,
            LengthPrefix::Int32 => i32::MAX as usize,
        }
    }

    /// Reject payloads the length field cannot express.
    pub(crate) fn check(self, what: &'static str, len: usize) -> Result<i32> {
        if len > self.max() {
            return Err(ProtoError::LengthOutOfRange {
                what,
                length: len,
                max: self.max(),
            });
        }
        Ok(len as i32)
    }

    /// Read the raw length field. Range validation is left to [`payload_len`].
    pub(crate) fn get<B: Buf>(self, src: &mut B, what: &'static str) -> Result<i32> {
        if src.remaining() < self.width() {
            return Err(ProtoError::short(what, self.width(), src.remaining()));
        }
        Ok(match self {
            LengthPrefix::Int16 => src.get_i16() as i32,
            LengthPrefix::Int32 => src.get_i32(),
        })
    }

    /// Write a length already validated by [`LengthPrefix::check`] (or NULL).
    pub(crate) fn put<B: BufMut>(self, dst: &mut B, len: i32) {
        match self {
            LengthPrefix::Int16 => dst.put_i16(len as i16),
            LengthPrefix::Int32 => dst.put_i32(len),
        }
    }

    /// Write an optional payload with its length prefix.
    pub(crate) fn put_value<B: BufMut>(
        self,
        dst: &mut B,
        what: &'static str,
        data: Option<&[u8]>,
    ) -> Result<()> {
        match data {
            None => self.put(dst, LEN_NULL),
            Some(data) => {
                let len = self.check(what, data.len())?;
                self.put(dst, len);
                dst.put_slice(data);
            }
        }
        Ok(())
    }
}

/// Validate a length read from the wire against what is left in the input.
///
/// Returns `None` for NULL. Negative lengths other than -1 are never treated as NULL.
pub(crate) fn payload_len(what: &'static str, len: i32, remaining: usize) -> Result<Option<usize>> {
    if len == LEN_NULL {
        return Ok(None);
    }
    if len < 0 {
        warn!(what, length = len, "negative length on the wire");
        return Err(ProtoError::InvalidLength {
            what,
            length: len as i64,
        });
    }
    let n = len as usize;
    if remaining < n {
        return Err(ProtoError::short(what, n, remaining));
    }
    Ok(Some(n))
}

/// Resolve the payload length for an owning constructor.
///
/// `len == -1` infers the length from `data`; anything else must not exceed it.
pub(crate) fn explicit_len(what: &'static str, data: &[u8], len: i32) -> Result<usize> {
    if len == LEN_NULL {
        return Ok(data.len());
    }
    if len < 0 || len as usize > data.len() {
        return Err(ProtoError::InvalidLength {
            what,
            length: len as i64,
        });
    }
    Ok(len as usize)
}

/// Split `n` bytes off the front of a borrowed input.
pub(crate) fn take<'a>(src: &mut &'a [u8], n: usize) -> &'a [u8] {
    let (head, tail) = src.split_at(n);
    *src = tail;
    head
}

/// Byte-wise ordering over the common prefix, ties broken by raw length.
///
/// NULL is not special-cased: its length of -1 sorts it before an empty value.
pub(crate) fn cmp_prefixed(a_len: i32, a: &[u8], b_len: i32, b: &[u8]) -> Ordering {
    let common = len0(a_len.min(b_len));
    a[..common]
        .cmp(&b[..common])
        .then_with(|| a_len.cmp(&b_len))
}

/// Raw length of a plain slice used as the other side of a comparison.
pub(crate) fn slice_len(data: &[u8]) -> i32 {
    i32::try_from(data.len()).unwrap_or(i32::MAX)
}
