//! Configuration management for camconsole.
//!
//! Settings are loaded from a TOML file. Every section and field is optional;
//! anything left out falls back to the built-in defaults.

use crate::camera::{CameraModel, CameraSettings, PixelFormat, Resolution};
use crate::error::{ConsoleError, Result};
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Line framing and tokenizer behavior.
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Command registration.
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Camera device.
    #[serde(default)]
    pub camera: CameraConfig,

    /// TCP serving.
    #[serde(default)]
    pub server: ServerConfig,
}

/// Console line handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Maximum bytes per command line.
    pub line_width: usize,

    /// Append the placeholder token before validation.
    pub inject_placeholder: bool,

    /// Reject lines with an unbalanced quote instead of dispatching them.
    pub reject_unterminated_quotes: bool,

    /// Accept a bare LF as a line terminator in addition to CR.
    pub lf_terminates: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            line_width: 128,
            inject_placeholder: true,
            reject_unterminated_quotes: true,
            lf_terminates: true,
        }
    }
}

/// Command registration retry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Construction attempts per command (0 = until it succeeds).
    pub max_attempts: u32,

    /// Pause between attempts, in milliseconds.
    pub retry_delay_ms: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            retry_delay_ms: 500,
        }
    }
}

impl RegistryConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_attempts, Duration::from_millis(self.retry_delay_ms))
    }
}

/// Camera device settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub model: CameraModel,
    pub resolution: Resolution,
    pub format: PixelFormat,
    pub fps: u8,

    /// Apply attempts when a command reconfigures the camera.
    pub configure_max_tries: u32,

    /// Apply attempts at startup (0 = until it succeeds).
    pub setup_max_tries: u32,

    /// Pause between apply attempts, in milliseconds.
    pub retry_delay_ms: u64,

    /// Largest frame buffer the device may allocate, in bytes.
    pub frame_memory_limit: usize,

    /// Number of apply attempts the simulated device fails before succeeding.
    pub fail_first_attempts: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            model: CameraModel::default(),
            resolution: Resolution::default(),
            format: PixelFormat::default(),
            fps: 1,
            configure_max_tries: 3,
            setup_max_tries: 0,
            retry_delay_ms: 500,
            frame_memory_limit: 196_608,
            fail_first_attempts: 0,
        }
    }
}

impl CameraConfig {
    /// The initial camera settings.
    pub fn settings(&self) -> CameraSettings {
        CameraSettings {
            model: self.model,
            resolution: self.resolution,
            format: self.format,
            fps: self.fps,
        }
    }

    /// Retry policy used by `setResolution` and `setFormat`.
    pub fn configure_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.configure_max_tries,
            Duration::from_millis(self.retry_delay_ms),
        )
    }

    /// Retry policy used for the startup configuration.
    pub fn setup_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.setup_max_tries,
            Duration::from_millis(self.retry_delay_ms),
        )
    }
}

/// TCP serving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub listen: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1:7070".to_string(),
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("camconsole")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConsoleError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses and validates configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            ConsoleError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.console.line_width == 0 {
            return Err(ConsoleError::config("console.line_width must be at least 1"));
        }
        if self.camera.fps == 0 {
            return Err(ConsoleError::config("camera.fps must be at least 1"));
        }
        if self.server.listen.trim().is_empty() {
            return Err(ConsoleError::config("server.listen must not be empty"));
        }
        Ok(())
    }
}
