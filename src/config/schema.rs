//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CAPACITY;
use crate::convert::EncodeOptions;
use crate::palette::DEFAULT_COLORS;

/// Root configuration for the avatar server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AvatarConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Generation cache settings.
    pub cache: CacheConfig,

    /// Accepted colours.
    pub palette: PaletteConfig,

    /// Base model template.
    pub model: ModelConfig,

    /// Options handed to the model converter.
    pub conversion: ConversionConfig,

    /// Response headers and compression.
    pub http: HttpConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:4000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:4000".to_string(),
        }
    }
}

/// Generation cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Artifacts kept per output format.
    pub capacity: usize,

    /// Collapse concurrent misses for the same key into one conversion.
    pub coalesce_in_flight: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            coalesce_in_flight: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Hex triplets, `#` optional, any case.
    pub colors: Vec<String>,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ModelConfig {
    /// glTF JSON file to use instead of the bundled avatar.
    pub template_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Request mesh compression from the converter.
    pub compression: bool,

    /// Compression effort (0-10).
    pub compression_level: u32,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        let options = EncodeOptions::default();
        Self {
            compression: options.compression,
            compression_level: options.compression_level,
        }
    }
}

impl ConversionConfig {
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            compression: self.compression,
            compression_level: self.compression_level,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// `Cache-Control` value sent with generated models.
    pub cache_control: String,

    /// Response compression quality (gzip 0-9, brotli 0-11).
    pub compression_level: u32,

    /// Allow any origin.
    pub cors_enabled: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            cache_control: "public, s-maxage=31536000, max-age=604800, stale-while-revalidate=604800, stale-if-error=604800".to_string(),
            compression_level: 9,
            cors_enabled: true,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: AvatarConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:4000");
        assert_eq!(config.cache.capacity, 50);
        assert!(config.cache.coalesce_in_flight);
        assert_eq!(config.palette.colors.len(), 8);
        assert_eq!(config.model.template_path, None);
        assert_eq!(config.conversion.encode_options(), EncodeOptions::default());
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_partial_override() {
        let config: AvatarConfig = toml::from_str(
            r##"
            [cache]
            capacity = 5

            [palette]
            colors = ["#000000", "ffffff"]

            [observability]
            log_format = "json"
            "##,
        )
        .unwrap();
        assert_eq!(config.cache.capacity, 5);
        assert!(config.cache.coalesce_in_flight);
        assert_eq!(config.palette.colors, vec!["#000000", "ffffff"]);
        assert_eq!(config.observability.log_format, LogFormat::Json);
        assert_eq!(config.observability.log_level, "info");
    }
}
