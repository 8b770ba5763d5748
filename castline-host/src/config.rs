//! Configuration for the host process.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Network settings.
    pub network: NetworkConfig,
    /// Video stream settings.
    pub video: VideoConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Address to bind both channel listeners on.
    pub bind_addr: String,
    /// TCP port for the AV channel (host → viewer).
    pub av_port: u16,
    /// TCP port for the Input channel (viewer → host).
    pub input_port: u16,
}

/// Video stream configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Capture width in pixels.
    pub width: u32,
    /// Capture height in pixels.
    pub height: u32,
    /// Target frames per second (0 = unpaced).
    pub fps: u8,
    /// Zstd compression level (1 = fast, 19 = max).
    pub compression_level: i32,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            video: VideoConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".into(),
            av_port: 3200,
            input_port: 3201,
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30,
            compression_level: 1,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

// ── Loading ──────────────────────────────────────────────────────

impl HostConfig {
    /// Load configuration from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                tracing::warn!("invalid config {}: {e}; using defaults", path.display());
                Self::default()
            }),
            Err(_) => {
                tracing::info!("no config at {}; using defaults", path.display());
                Self::default()
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let cfg = HostConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("av_port"));
        assert!(text.contains("compression_level"));
    }

    #[test]
    fn roundtrip_config() {
        let cfg = HostConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: HostConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.network.av_port, 3200);
        assert_eq!(parsed.network.input_port, 3201);
        assert_eq!(parsed.video.width, 1920);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: HostConfig = toml::from_str("[network]\nav_port = 4000\n").unwrap();
        assert_eq!(parsed.network.av_port, 4000);
        assert_eq!(parsed.network.input_port, 3201);
        assert_eq!(parsed.video.fps, 30);
    }
}
