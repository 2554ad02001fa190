//! Splits a byte stream into frames on the leading `int32` size field.
//!
//! Decoded frames exclude the size field; encoding prepends it.

use super::framing::SIZE_FIELD_LEN;
use crate::config::CodecConfig;
use crate::error::{ProtoError, Result};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{debug, trace};

/// Length-prefixed frame codec bounded by [`CodecConfig`] limits.
#[derive(Debug, Clone)]
pub struct KafkaFrameCodec {
    max_frame_size: usize,
    min_frame_size: usize,
}

impl KafkaFrameCodec {
    pub fn new(config: &CodecConfig) -> Self {
        Self {
            max_frame_size: config.max_frame_size,
            min_frame_size: config.min_frame_size,
        }
    }

    pub fn max_frame_size(&self) -> usize {
        self.max_frame_size
    }

    fn check_size(&self, size: i64) -> Result<usize> {
        if size < self.min_frame_size as i64 {
            return Err(ProtoError::FrameTooSmall {
                size,
                min: self.min_frame_size,
            });
        }
        let size = size as usize;
        if size > self.max_frame_size {
            return Err(ProtoError::FrameTooLarge {
                size,
                max: self.max_frame_size,
            });
        }
        Ok(size)
    }
}

impl Default for KafkaFrameCodec {
    fn default() -> Self {
        Self::new(&CodecConfig::default())
    }
}

impl Decoder for KafkaFrameCodec {
    type Item = Bytes;
    type Error = ProtoError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Bytes>> {
        if src.len() < SIZE_FIELD_LEN {
            trace!(have = src.len(), "waiting for size field");
            return Ok(None);
        }
        let size = i32::from_be_bytes([src[0], src[1], src[2], src[3]]);
        let size = self.check_size(size as i64)?;
        if src.len() < SIZE_FIELD_LEN + size {
            trace!(have = src.len(), need = SIZE_FIELD_LEN + size, "waiting for frame");
            src.reserve(SIZE_FIELD_LEN + size - src.len());
            return Ok(None);
        }
        src.advance(SIZE_FIELD_LEN);
        let frame = src.split_to(size).freeze();
        debug!(size, "decoded frame");
        Ok(Some(frame))
    }
}

impl Encoder<Bytes> for KafkaFrameCodec {
    type Error = ProtoError;

    fn encode(&mut self, item: Bytes, dst: &mut BytesMut) -> Result<()> {
        let size = self.check_size(item.len() as i64)?;
        let field = i32::try_from(size).map_err(|_| ProtoError::LengthOutOfRange {
            what: "frame",
            length: size,
            max: i32::MAX as usize,
        })?;
        dst.reserve(SIZE_FIELD_LEN + size);
        dst.put_i32(field);
        dst.put(item);
        debug!(size, "encoded frame");
        Ok(())
    }
}

/// Prepend the size field to an encoded frame body.
pub fn frame_body(body: &[u8]) -> Result<BytesMut> {
    let size = i32::try_from(body.len()).map_err(|_| ProtoError::LengthOutOfRange {
        what: "frame",
        length: body.len(),
        max: i32::MAX as usize,
    })?;
    let mut out = BytesMut::with_capacity(SIZE_FIELD_LEN + body.len());
    out.put_i32(size);
    out.put_slice(body);
    Ok(out)
}
