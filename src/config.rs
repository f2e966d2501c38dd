//! Configuration for the KayaCloud daemon.
//!
//! Loads configuration from a TOML file with the minimal parameters the
//! daemon needs: where the robot model description lives, where resolved
//! link states come from, and where cloud frames go.

use crate::error::{Error, Result};
use crate::streaming::WireFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default state channel address, used with a warning when
/// `state.bind_address` is absent from the configuration.
pub const DEFAULT_STATE_BIND: &str = "0.0.0.0:5570";

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub model: ModelConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub streaming: StreamingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Robot model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Path to the TOML robot model description.
    ///
    /// The daemon refuses to start without it; there is no useful default
    /// robot to fall back to.
    pub description: String,
}

/// State channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// State source kind: "udp" (external kinematics publisher) or "sim"
    #[serde(default = "default_state_source")]
    pub source: String,

    /// UDP bind address for inbound link pose updates.
    ///
    /// Optional; when absent the daemon warns and uses
    /// [`DEFAULT_STATE_BIND`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind_address: Option<String>,

    /// Bounded wait for fresh state per publish cycle, in milliseconds
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    /// Simulator parameters, used when `source = "sim"`
    #[serde(default)]
    pub sim: SimConfig,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            source: default_state_source(),
            bind_address: None,
            wait_timeout_ms: default_wait_timeout_ms(),
            sim: SimConfig::default(),
        }
    }
}

/// State simulator parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Snapshot publication rate in Hz
    #[serde(default = "default_sim_rate_hz")]
    pub rate_hz: f64,
    /// Yaw rate of the simulated robot about world Z, in rad/s
    #[serde(default = "default_sim_yaw_rate")]
    pub yaw_rate: f64,
    /// Standard deviation of Gaussian translation jitter, in meters
    #[serde(default)]
    pub jitter_stddev: f64,
    /// RNG seed; 0 draws entropy from the OS
    #[serde(default)]
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rate_hz: default_sim_rate_hz(),
            yaw_rate: default_sim_yaw_rate(),
            jitter_stddev: 0.0,
            seed: 0,
        }
    }
}

/// Cloud streaming configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamingConfig {
    /// UDP unicast target for outbound cloud frames
    #[serde(default = "default_publish_address")]
    pub publish_address: String,

    /// Wire format for both the state channel and the cloud stream
    #[serde(default)]
    pub wire_format: WireFormat,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            publish_address: default_publish_address(),
            wire_format: WireFormat::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log output (stdout, stderr, or file path)
    #[serde(default = "default_log_output")]
    pub output: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            output: default_log_output(),
        }
    }
}

fn default_state_source() -> String {
    "udp".to_string()
}

fn default_wait_timeout_ms() -> u64 {
    1000
}

fn default_sim_rate_hz() -> f64 {
    50.0
}

fn default_sim_yaw_rate() -> f64 {
    0.5
}

fn default_publish_address() -> String {
    "127.0.0.1:5571".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stdout".to_string()
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        toml::from_str(&contents).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a TOML file.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents =
            toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, contents)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: ModelConfig {
                description: "model.toml".to_string(),
            },
            state: StateConfig::default(),
            streaming: StreamingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
