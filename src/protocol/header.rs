//! Request and response frame headers.
//!
//! ```text
//! RequestFrame  := Size:int32 ApiKey:int16 ApiVersion:int16 CorrId:int32 ClientId:String Body
//! ResponseFrame := Size:int32 CorrId:int32 Body
//! ```
//!
//! `Size` counts every byte after itself, so it is only known once the body is in place.

use super::api::ApiKey;
use super::framing::{REQUEST_HEADER_SIZE, RESPONSE_HEADER_SIZE, SIZE_FIELD_LEN};
use super::string::ProtoString;
use crate::config::CodecConfig;
use crate::error::{ProtoError, Result};
use bytes::{Buf, BufMut, BytesMut};
use tracing::debug;

/// Position of a size placeholder in an output buffer, patched by [`SizeSlot::finish`].
#[derive(Debug)]
#[must_use = "the size field stays zero until finish() is called"]
pub struct SizeSlot {
    at: usize,
}

impl SizeSlot {
    /// Append a zeroed size field to `dst`.
    pub fn reserve(dst: &mut BytesMut) -> Self {
        let at = dst.len();
        dst.put_i32(0);
        Self { at }
    }

    /// Patch the size field with the number of bytes written after it.
    pub fn finish(self, dst: &mut BytesMut) -> Result<i32> {
        let start = self.at + SIZE_FIELD_LEN;
        if dst.len() < start {
            return Err(ProtoError::short("size slot", start, dst.len()));
        }
        let size = dst.len() - start;
        let size = i32::try_from(size).map_err(|_| ProtoError::LengthOutOfRange {
            what: "frame",
            length: size,
            max: i32::MAX as usize,
        })?;
        dst[self.at..start].copy_from_slice(&size.to_be_bytes());
        Ok(size)
    }
}

/// Fixed request header plus the client id that follows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeader {
    pub api_key: ApiKey,
    pub api_version: i16,
    pub correlation_id: i32,
    pub client_id: ProtoString,
}

impl RequestHeader {
    pub fn new(
        api_key: ApiKey,
        api_version: i16,
        correlation_id: i32,
        client_id: Option<&str>,
    ) -> Result<Self> {
        Ok(Self {
            api_key,
            api_version,
            correlation_id,
            client_id: ProtoString::try_from(client_id)?,
        })
    }

    /// Header using the client id from `config`.
    pub fn from_config(
        config: &CodecConfig,
        api_key: ApiKey,
        api_version: i16,
        correlation_id: i32,
    ) -> Result<Self> {
        Self::new(
            api_key,
            api_version,
            correlation_id,
            config.client_id.as_deref(),
        )
    }

    /// Bytes this header occupies after the size field.
    pub fn encoded_len(&self) -> usize {
        REQUEST_HEADER_SIZE + self.client_id.serialized_size()
    }

    /// Write the size placeholder and header. Append the body, then call
    /// [`SizeSlot::finish`].
    pub fn encode(&self, dst: &mut BytesMut) -> SizeSlot {
        dst.reserve(SIZE_FIELD_LEN + self.encoded_len());
        let slot = SizeSlot::reserve(dst);
        dst.put_i16(self.api_key.code());
        dst.put_i16(self.api_version);
        dst.put_i32(self.correlation_id);
        self.client_id.write_to(dst);
        slot
    }

    /// Read a header from a frame whose size field was already consumed.
    pub fn decode<B: Buf>(src: &mut B) -> Result<Self> {
        if src.remaining() < REQUEST_HEADER_SIZE {
            return Err(ProtoError::short(
                "request header",
                REQUEST_HEADER_SIZE,
                src.remaining(),
            ));
        }
        let api_key = ApiKey(src.get_i16());
        let api_version = src.get_i16();
        let correlation_id = src.get_i32();
        let client_id = ProtoString::decode(src)?;
        debug!(
            api_key = api_key.code(),
            api_version,
            correlation_id,
            client_id = %client_id,
            "decoded request header"
        );
        Ok(Self {
            api_key,
            api_version,
            correlation_id,
            client_id,
        })
    }

    /// Read the size field and header. The input must hold the whole frame, and
    /// the header may not extend past it. The body is left unread in `src`.
    pub fn decode_framed<B: Buf>(src: &mut B) -> Result<(i32, Self)> {
        let size = read_size(src)?;
        let frame_len = size as usize;
        if frame_len < REQUEST_HEADER_SIZE + 2 {
            return Err(ProtoError::InvalidLength {
                what: "request frame",
                length: size as i64,
            });
        }
        if src.remaining() < frame_len {
            return Err(ProtoError::short("request frame", frame_len, src.remaining()));
        }
        let mut frame = Buf::take(&mut *src, frame_len);
        let header = Self::decode(&mut frame)?;
        Ok((size, header))
    }
}

/// Write a request header into `dst`, returning the size slot to patch.
pub fn write_request_header(
    dst: &mut BytesMut,
    api_key: ApiKey,
    api_version: i16,
    correlation_id: i32,
    client_id: Option<&str>,
) -> Result<SizeSlot> {
    Ok(RequestHeader::new(api_key, api_version, correlation_id, client_id)?.encode(dst))
}

/// Build a complete request frame from a header and an already encoded body.
pub fn encode_request(header: &RequestHeader, body: &[u8]) -> Result<BytesMut> {
    let mut dst = BytesMut::with_capacity(SIZE_FIELD_LEN + header.encoded_len() + body.len());
    let slot = header.encode(&mut dst);
    dst.put_slice(body);
    let size = slot.finish(&mut dst)?;
    debug!(
        api_key = header.api_key.code(),
        correlation_id = header.correlation_id,
        size,
        "encoded request frame"
    );
    Ok(dst)
}

/// Size and correlation id at the front of every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseHeader {
    pub size: i32,
    pub correlation_id: i32,
}

impl ResponseHeader {
    pub fn read<B: Buf>(src: &mut B) -> Result<Self> {
        if src.remaining() < RESPONSE_HEADER_SIZE {
            return Err(ProtoError::short(
                "response header",
                RESPONSE_HEADER_SIZE,
                src.remaining(),
            ));
        }
        let size = src.get_i32();
        let correlation_id = src.get_i32();
        Ok(Self {
            size,
            correlation_id,
        })
    }

    /// Header for a response carrying `body_len` bytes after the correlation id.
    pub fn for_body(correlation_id: i32, body_len: usize) -> Result<Self> {
        let size = body_len
            .checked_add(4)
            .and_then(|n| i32::try_from(n).ok())
            .ok_or(ProtoError::LengthOutOfRange {
                what: "frame",
                length: body_len,
                max: i32::MAX as usize - 4,
            })?;
        Ok(Self {
            size,
            correlation_id,
        })
    }

    pub fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_i32(self.size);
        dst.put_i32(self.correlation_id);
    }

    /// Bytes of body following the correlation id.
    pub fn body_len(&self) -> Result<usize> {
        if self.size < 4 {
            return Err(ProtoError::InvalidLength {
                what: "response frame",
                length: self.size as i64,
            });
        }
        Ok(self.size as usize - 4)
    }

    /// Whether this response answers the request sent with `correlation_id`.
    pub fn matches(&self, correlation_id: i32) -> bool {
        self.correlation_id == correlation_id
    }
}

/// Read a response header; fails if fewer than eight bytes are available.
pub fn read_response_header<B: Buf>(src: &mut B) -> Result<ResponseHeader> {
    ResponseHeader::read(src)
}

fn read_size<B: Buf>(src: &mut B) -> Result<i32> {
    if src.remaining() < SIZE_FIELD_LEN {
        return Err(ProtoError::short("size field", SIZE_FIELD_LEN, src.remaining()));
    }
    let size = src.get_i32();
    if size < 0 {
        return Err(ProtoError::InvalidLength {
            what: "frame",
            length: size as i64,
        });
    }
    Ok(size)
}
