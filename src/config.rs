//! Codec configuration
//!
//! A [`CodecConfig`] is passed explicitly into every decode and encode call.
//! It can be built in code or loaded from TOML:
//!
//! ```toml
//! max_image_size = 1048576
//! force_timestamp = 1700000000
//! ```

use crate::archive::DEFAULT_MAX_IMAGE_SIZE;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by the decoder and the encoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Largest image, in bytes, accepted for decode or produced by encode
    pub max_image_size: u64,

    /// When set, every record written through [`crate::ImageWriter`] gets this
    /// timestamp instead of its own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_timestamp: Option<u32>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
            force_timestamp: None,
        }
    }
}

impl CodecConfig {
    pub fn with_max_image_size(mut self, max_image_size: u64) -> Self {
        self.max_image_size = max_image_size;
        self
    }

    pub fn with_force_timestamp(mut self, timestamp: u32) -> Self {
        self.force_timestamp = Some(timestamp);
        self
    }

    /// Parse a configuration from TOML text; missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }
}
