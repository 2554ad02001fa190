//! Codec configuration.

use serde::Deserialize;

/// Default upper bound on a single frame (100 MiB).
pub const DEFAULT_MAX_FRAME_SIZE: usize = 100 * 1024 * 1024;

/// Smallest frame the splitter accepts: a bare correlation id.
pub const DEFAULT_MIN_FRAME_SIZE: usize = 4;

/// Settings shared by the header writer and the frame splitter.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Client id written into request headers; `None` is sent as NULL.
    pub client_id: Option<String>,
    /// Largest size field accepted or produced.
    pub max_frame_size: usize,
    /// Smallest size field accepted or produced.
    pub min_frame_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
            min_frame_size: DEFAULT_MIN_FRAME_SIZE,
        }
    }
}

impl CodecConfig {
    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    pub fn with_max_frame_size(mut self, max_frame_size: usize) -> Self {
        self.max_frame_size = max_frame_size;
        self
    }
}
