//! Configuration for the viewer process.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Network settings.
    pub network: NetworkConfig,
    /// Display settings.
    pub display: DisplayConfig,
    /// Input relay settings.
    pub input: InputConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Host address to connect to.
    pub host_addr: String,
    /// TCP port for the AV channel (host → viewer).
    pub av_port: u16,
    /// TCP port for the Input channel (viewer → host).
    pub input_port: u16,
}

/// Display configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Directory to write PPM frame snapshots into (empty = disabled).
    pub snapshot_dir: String,
    /// Write a snapshot every N presented frames (0 = disabled).
    pub snapshot_every: u64,
}

/// Input relay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Generate synthetic demo events instead of polling a real
    /// device. Useful for exercising the relay headless.
    pub demo: bool,
    /// Poll interval in milliseconds.
    pub poll_interval_ms: u64,
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
}

// ── Defaults ─────────────────────────────────────────────────────

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            display: DisplayConfig::default(),
            input: InputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host_addr: "127.0.0.1".into(),
            av_port: 3200,
            input_port: 3201,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            snapshot_dir: String::new(),
            snapshot_every: 0,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            demo: false,
            poll_interval_ms: 8,
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

impl ViewerConfig {
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
        let cfg = ViewerConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        assert!(text.contains("host_addr"));
        assert!(text.contains("snapshot_every"));
    }

    #[test]
    fn roundtrip_config() {
        let cfg = ViewerConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: ViewerConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.network.av_port, 3200);
        assert_eq!(parsed.network.host_addr, "127.0.0.1");
        assert!(!parsed.input.demo);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let parsed: ViewerConfig =
            toml::from_str("[network]\nhost_addr = \"10.0.0.5\"\n").unwrap();
        assert_eq!(parsed.network.host_addr, "10.0.0.5");
        assert_eq!(parsed.network.input_port, 3201);
        assert_eq!(parsed.input.poll_interval_ms, 8);
    }
}
