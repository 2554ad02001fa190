//! API key registry and version negotiation records.

use crate::error::{ProtoError, Result};
use bytes::{Buf, BufMut};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// Identifies the broker operation a request invokes.
///
/// Any `i16` is representable so that keys introduced by newer brokers survive a
/// round trip; only the codes below have names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(pub i16);

impl ApiKey {
    pub const NONE: ApiKey = ApiKey(-1);
    pub const PRODUCE: ApiKey = ApiKey(0);
    pub const FETCH: ApiKey = ApiKey(1);
    pub const OFFSET: ApiKey = ApiKey(2);
    pub const METADATA: ApiKey = ApiKey(3);
    pub const LEADER_AND_ISR: ApiKey = ApiKey(4);
    pub const STOP_REPLICA: ApiKey = ApiKey(5);
    pub const OFFSET_COMMIT: ApiKey = ApiKey(8);
    pub const OFFSET_FETCH: ApiKey = ApiKey(9);
    pub const GROUP_COORDINATOR: ApiKey = ApiKey(10);
    pub const JOIN_GROUP: ApiKey = ApiKey(11);
    pub const HEARTBEAT: ApiKey = ApiKey(12);
    pub const LEAVE_GROUP: ApiKey = ApiKey(13);
    pub const SYNC_GROUP: ApiKey = ApiKey(14);
    pub const DESCRIBE_GROUPS: ApiKey = ApiKey(15);
    pub const LIST_GROUPS: ApiKey = ApiKey(16);
    pub const SASL_HANDSHAKE: ApiKey = ApiKey(17);
    pub const API_VERSION: ApiKey = ApiKey(18);

    /// One past the highest known code. Codes 6 and 7 are unassigned.
    pub const NUM: i16 = 19;

    /// Every named key, ascending.
    pub const KNOWN: [ApiKey; 17] = [
        ApiKey::PRODUCE,
        ApiKey::FETCH,
        ApiKey::OFFSET,
        ApiKey::METADATA,
        ApiKey::LEADER_AND_ISR,
        ApiKey::STOP_REPLICA,
        ApiKey::OFFSET_COMMIT,
        ApiKey::OFFSET_FETCH,
        ApiKey::GROUP_COORDINATOR,
        ApiKey::JOIN_GROUP,
        ApiKey::HEARTBEAT,
        ApiKey::LEAVE_GROUP,
        ApiKey::SYNC_GROUP,
        ApiKey::DESCRIBE_GROUPS,
        ApiKey::LIST_GROUPS,
        ApiKey::SASL_HANDSHAKE,
        ApiKey::API_VERSION,
    ];

    pub const fn code(self) -> i16 {
        self.0
    }

    /// Canonical name, or `None` for unassigned and future codes.
    pub const fn known_name(self) -> Option<&'static str> {
        Some(match self.0 {
            0 => "Produce",
            1 => "Fetch",
            2 => "Offset",
            3 => "Metadata",
            4 => "LeaderAndIsr",
            5 => "StopReplica",
            8 => "OffsetCommit",
            9 => "OffsetFetch",
            10 => "GroupCoordinator",
            11 => "JoinGroup",
            12 => "Heartbeat",
            13 => "LeaveGroup",
            14 => "SyncGroup",
            15 => "DescribeGroups",
            16 => "ListGroups",
            17 => "SaslHandshake",
            18 => "ApiVersion",
            _ => return None,
        })
    }

    pub const fn is_known(self) -> bool {
        self.known_name().is_some()
    }

    /// Canonical name; unknown codes render as `Unknown-<n>?`.
    pub fn name(self) -> Cow<'static, str> {
        match self.known_name() {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(format!("Unknown-{}?", self.0)),
        }
    }
}

impl From<i16> for ApiKey {
    fn from(code: i16) -> Self {
        ApiKey(code)
    }
}

impl From<ApiKey> for i16 {
    fn from(key: ApiKey) -> Self {
        key.0
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Name of an API key as sent on the wire. Never fails.
pub fn api_key_name(code: i16) -> Cow<'static, str> {
    ApiKey(code).name()
}

/// Version range a broker supports for one API. `min_version <= max_version` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawVersionRange")]
pub struct ApiVersionRange {
    api_key: ApiKey,
    min_version: i16,
    max_version: i16,
}

/// Unchecked serde form of [`ApiVersionRange`].
#[derive(Deserialize)]
struct RawVersionRange {
    api_key: ApiKey,
    min_version: i16,
    max_version: i16,
}

impl TryFrom<RawVersionRange> for ApiVersionRange {
    type Error = ProtoError;

    fn try_from(raw: RawVersionRange) -> Result<Self> {
        Self::new(raw.api_key, raw.min_version, raw.max_version)
    }
}

impl ApiVersionRange {
    /// ApiKey + MinVersion + MaxVersion.
    pub const ENCODED_LEN: usize = 6;

    pub fn new(api_key: ApiKey, min_version: i16, max_version: i16) -> Result<Self> {
        if min_version > max_version {
            return Err(ProtoError::InvalidVersionRange {
                api_key: api_key.0,
                min: min_version,
                max: max_version,
            });
        }
        Ok(Self {
            api_key,
            min_version,
            max_version,
        })
    }

    pub fn api_key(&self) -> ApiKey {
        self.api_key
    }

    pub fn min_version(&self) -> i16 {
        self.min_version
    }

    pub fn max_version(&self) -> i16 {
        self.max_version
    }

    /// Orders by api key only; use with `sort_by` before binary searching.
    pub fn key_cmp(a: &Self, b: &Self) -> Ordering {
        a.api_key.cmp(&b.api_key)
    }

    pub fn contains(&self, version: i16) -> bool {
        (self.min_version..=self.max_version).contains(&version)
    }

    /// Overlap with `[min, max]`, if any.
    pub fn intersect(&self, min: i16, max: i16) -> Option<(i16, i16)> {
        let lo = self.min_version.max(min);
        let hi = self.max_version.min(max);
        (lo <= hi).then_some((lo, hi))
    }

    /// Highest version both sides speak, given the client's own range.
    pub fn negotiate(&self, client_min: i16, client_max: i16) -> Option<i16> {
        self.intersect(client_min, client_max).map(|(_, hi)| hi)
    }

    pub fn encode<B: BufMut>(&self, dst: &mut B) {
        dst.put_i16(self.api_key.0);
        dst.put_i16(self.min_version);
        dst.put_i16(self.max_version);
    }

    pub fn decode<B: Buf>(src: &mut B) -> Result<Self> {
        if src.remaining() < Self::ENCODED_LEN {
            return Err(ProtoError::short(
                "api version range",
                Self::ENCODED_LEN,
                src.remaining(),
            ));
        }
        let api_key = src.get_i16();
        let min_version = src.get_i16();
        let max_version = src.get_i16();
        Self::new(ApiKey(api_key), min_version, max_version)
    }
}

/// Broker-advertised version ranges, kept sorted by api key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiVersionTable {
    ranges: Vec<ApiVersionRange>,
}

impl ApiVersionTable {
    pub fn new(mut ranges: Vec<ApiVersionRange>) -> Self {
        ranges.sort_by(ApiVersionRange::key_cmp);
        Self { ranges }
    }

    pub fn get(&self, api_key: ApiKey) -> Option<&ApiVersionRange> {
        self.ranges
            .binary_search_by(|r| r.api_key.cmp(&api_key))
            .ok()
            .map(|i| &self.ranges[i])
    }

    /// Version to speak for `api_key`, or `None` when the API is unusable
    /// against this broker.
    pub fn negotiate(&self, api_key: ApiKey, client_min: i16, client_max: i16) -> Option<i16> {
        let chosen = self.get(api_key)?.negotiate(client_min, client_max);
        debug!(api_key = api_key.0, ?chosen, "negotiated api version");
        chosen
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ApiVersionRange> {
        self.ranges.iter()
    }

    /// Write as an `int32`-counted array of ranges.
    pub fn encode<B: BufMut>(&self, dst: &mut B) -> Result<()> {
        let count = i32::try_from(self.ranges.len()).map_err(|_| ProtoError::LengthOutOfRange {
            what: "api version array",
            length: self.ranges.len(),
            max: i32::MAX as usize,
        })?;
        dst.put_i32(count);
        for range in &self.ranges {
            range.encode(dst);
        }
        Ok(())
    }

    /// Read the body of an ApiVersions v0 response: `error_code:int16`, then the
    /// ranges as an `int32`-counted array. A negative count is an empty array.
    pub fn decode_response<B: Buf>(src: &mut B) -> Result<(i16, Self)> {
        if src.remaining() < 6 {
            return Err(ProtoError::short("api versions response", 6, src.remaining()));
        }
        let error_code = src.get_i16();
        let count = src.get_i32().max(0) as usize;
        let needed = count.saturating_mul(ApiVersionRange::ENCODED_LEN);
        if src.remaining() < needed {
            return Err(ProtoError::short("api version array", needed, src.remaining()));
        }
        let mut ranges = Vec::with_capacity(count);
        for _ in 0..count {
            ranges.push(ApiVersionRange::decode(src)?);
        }
        debug!(error_code, count, "decoded api versions");
        Ok((error_code, Self::new(ranges)))
    }
}

impl FromIterator<ApiVersionRange> for ApiVersionTable {
    fn from_iter<I: IntoIterator<Item = ApiVersionRange>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
