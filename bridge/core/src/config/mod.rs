//! TOML Configuration File Support
//!
//! Configuration for the bridge, loaded from `~/.config/muxbridge/config.toml`.
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (when applicable)
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! # Example Configuration
//!
//! ```toml
//! [navigation]
//! enabled = true
//!
//! [navigation.keys]
//! left = "<C-h>"
//! down = "<C-j>"
//! up = "<C-k>"
//! right = ""          # empty: direction not bound
//!
//! [statusline]
//! mode = "auto"       # auto | always | never
//! detect_env = "MUXBRIDGE_PANE"
//! template = "%f %m %= %l:%c"
//! suppress_native = true
//! debounce_ms = 100
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::direction::Direction;

/// Default debounce window for statusline updates
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Environment variable whose presence marks a multiplexer pane
pub const DEFAULT_DETECT_ENV: &str = "MUXBRIDGE_PANE";

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// Resolved Configuration
// =============================================================================

/// When statusline mirroring is switched on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatuslineMode {
    /// Only inside a detected multiplexer pane
    #[default]
    Auto,
    /// Unconditionally
    Always,
    /// Never
    Never,
}

impl FromStr for StatuslineMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" | "on" | "true" => Ok(Self::Always),
            "never" | "off" | "false" => Ok(Self::Never),
            other => Err(ConfigError::ValidationError(format!(
                "unknown statusline mode {other:?} (expected auto, always or never)"
            ))),
        }
    }
}

impl fmt::Display for StatuslineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Always => write!(f, "always"),
            Self::Never => write!(f, "never"),
        }
    }
}

/// Directional navigation settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationConfig {
    /// Master switch for navigation
    pub enabled: bool,
    /// Key bound to each direction; a missing entry leaves it unbound
    pub keys: HashMap<Direction, String>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        let keys = [
            (Direction::Left, "<C-h>"),
            (Direction::Down, "<C-j>"),
            (Direction::Up, "<C-k>"),
            (Direction::Right, "<C-l>"),
        ]
        .into_iter()
        .map(|(dir, key)| (dir, key.to_string()))
        .collect();

        Self {
            enabled: true,
            keys,
        }
    }
}

impl NavigationConfig {
    /// Whether requests in `direction` are handled at all
    #[must_use]
    pub fn is_bound(&self, direction: Direction) -> bool {
        self.enabled && self.keys.contains_key(&direction)
    }

    /// Key bound to `direction`
    #[must_use]
    pub fn key_for(&self, direction: Direction) -> Option<&str> {
        if !self.enabled {
            return None;
        }
        self.keys.get(&direction).map(String::as_str)
    }

    /// Bound directions with their keys, in h/j/k/l order
    #[must_use]
    pub fn bindings(&self) -> Vec<(Direction, &str)> {
        Direction::ALL
            .into_iter()
            .filter_map(|dir| self.key_for(dir).map(|key| (dir, key)))
            .collect()
    }
}

/// Statusline mirroring settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatuslineConfig {
    /// When mirroring is enabled
    pub mode: StatuslineMode,
    /// Environment variable checked by [`StatuslineMode::Auto`]
    pub detect_env: String,
    /// Template handed to the host evaluator instead of its default
    pub template: Option<String>,
    /// Hide the host's native status bar while mirroring
    pub suppress_native: bool,
    /// Debounce window between a change and the update it triggers
    pub debounce: Duration,
}

impl Default for StatuslineConfig {
    fn default() -> Self {
        Self {
            mode: StatuslineMode::Auto,
            detect_env: DEFAULT_DETECT_ENV.to_string(),
            template: None,
            suppress_native: true,
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

impl StatuslineConfig {
    /// Decide whether mirroring starts, given the process environment
    #[must_use]
    pub fn should_enable(&self) -> bool {
        self.should_enable_with(|name| std::env::var_os(name).is_some())
    }

    /// Decide whether mirroring starts, with a custom presence check
    pub fn should_enable_with(&self, env_present: impl Fn(&str) -> bool) -> bool {
        match self.mode {
            StatuslineMode::Always => true,
            StatuslineMode::Never => false,
            StatuslineMode::Auto => env_present(&self.detect_env),
        }
    }
}

/// Centralized configuration for the bridge
#[derive(Clone, Debug, Default)]
pub struct BridgeConfig {
    /// Navigation settings
    pub navigation: NavigationConfig,

    /// Statusline settings
    pub statusline: StatuslineConfig,

    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,

    /// Source of configuration values
    source: Option<ConfigSource>,
}

impl BridgeConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source.unwrap_or(ConfigSource::Default)
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = Some(source);
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Navigation section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationToml {
    /// Master switch
    pub enabled: Option<bool>,

    /// Direction name to key; an empty key unbinds the direction
    pub keys: Option<BTreeMap<String, String>>,
}

/// Statusline section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatuslineToml {
    /// `auto`, `always` or `never`
    pub mode: Option<StatuslineMode>,

    /// Environment variable used for auto detection
    pub detect_env: Option<String>,

    /// Statusline template override
    pub template: Option<String>,

    /// Hide the native status bar while mirroring
    pub suppress_native: Option<bool>,

    /// Debounce window in milliseconds
    pub debounce_ms: Option<u64>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeToml {
    /// Navigation configuration section
    pub navigation: NavigationToml,

    /// Statusline configuration section
    pub statusline: StatuslineToml,
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/muxbridge/config.toml` or
/// `~/.config/muxbridge/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("muxbridge").join("config.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed or holds
/// invalid values. A missing config file is not an error.
pub fn load_config() -> Result<BridgeConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path, then apply the environment
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read, parsed or
/// validated.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<BridgeConfig, ConfigError> {
    load_config_with_env(path, |name| std::env::var(name).ok())
}

/// Load configuration with a custom environment lookup
///
/// # Errors
///
/// Same as [`load_config_from_path`].
pub fn load_config_with_env(
    path: Option<PathBuf>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<BridgeConfig, ConfigError> {
    let mut config = BridgeConfig::default();

    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: BridgeToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.set_source(ConfigSource::File);

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    apply_env_config(&mut config, env);

    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut BridgeConfig, toml: &BridgeToml) -> Result<(), ConfigError> {
    // Navigation settings
    if let Some(enabled) = toml.navigation.enabled {
        config.navigation.enabled = enabled;
    }
    if let Some(ref keys) = toml.navigation.keys {
        for (name, key) in keys {
            let Ok(direction) = name.parse::<Direction>() else {
                tracing::warn!(key = %name, "Ignoring binding for unknown direction");
                continue;
            };
            if key.trim().is_empty() {
                config.navigation.keys.remove(&direction);
            } else {
                config.navigation.keys.insert(direction, key.clone());
            }
        }
    }

    // Statusline settings
    if let Some(mode) = toml.statusline.mode {
        config.statusline.mode = mode;
    }
    if let Some(ref name) = toml.statusline.detect_env {
        config.statusline.detect_env = name.clone();
    }
    if toml.statusline.template.is_some() {
        config.statusline.template = toml.statusline.template.clone();
    }
    if let Some(suppress) = toml.statusline.suppress_native {
        config.statusline.suppress_native = suppress;
    }
    if let Some(ms) = toml.statusline.debounce_ms {
        config.statusline.debounce = validate_debounce(ms)?;
    }

    Ok(())
}

/// Apply environment variable overrides to the config
///
/// Unparseable values are ignored with a warning, the previous value stays.
fn apply_env_config(config: &mut BridgeConfig, env: impl Fn(&str) -> Option<String>) {
    if let Some(mode) = env("MUXBRIDGE_STATUSLINE") {
        match mode.parse::<StatuslineMode>() {
            Ok(mode) => {
                config.statusline.mode = mode;
                config.set_source(ConfigSource::Env);
            }
            Err(e) => tracing::warn!(error = %e, "Ignoring MUXBRIDGE_STATUSLINE"),
        }
    }
    if let Some(debounce) = env("MUXBRIDGE_DEBOUNCE_MS") {
        match debounce.parse::<u64>().ok().map(validate_debounce) {
            Some(Ok(duration)) => {
                config.statusline.debounce = duration;
                config.set_source(ConfigSource::Env);
            }
            _ => tracing::warn!(value = %debounce, "Ignoring MUXBRIDGE_DEBOUNCE_MS"),
        }
    }
    if let Some(template) = env("MUXBRIDGE_TEMPLATE") {
        config.statusline.template = Some(template);
        config.set_source(ConfigSource::Env);
    }
}

fn validate_debounce(ms: u64) -> Result<Duration, ConfigError> {
    if ms == 0 {
        return Err(ConfigError::ValidationError(
            "debounce_ms must be greater than zero".to_string(),
        ));
    }
    Ok(Duration::from_millis(ms))
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Use this after [`load_config`] to apply command-line argument overrides.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Statusline mode override
    pub statusline_mode: Option<StatuslineMode>,

    /// Debounce override (milliseconds)
    pub debounce_ms: Option<u64>,

    /// Template override
    pub template: Option<String>,

    /// Native status bar suppression override
    pub suppress_native: Option<bool>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set statusline mode override
    #[must_use]
    pub fn with_statusline_mode(mut self, mode: StatuslineMode) -> Self {
        self.statusline_mode = Some(mode);
        self
    }

    /// Set debounce override
    #[must_use]
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = Some(ms);
        self
    }

    /// Set template override
    #[must_use]
    pub fn with_template(mut self, template: String) -> Self {
        self.template = Some(template);
        self
    }

    /// Set native status bar suppression override
    #[must_use]
    pub fn with_suppress_native(mut self, suppress: bool) -> Self {
        self.suppress_native = Some(suppress);
        self
    }

    /// Apply overrides to a configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` for a zero debounce.
    pub fn apply(&self, config: &mut BridgeConfig) -> Result<(), ConfigError> {
        if self.statusline_mode.is_some()
            || self.debounce_ms.is_some()
            || self.template.is_some()
            || self.suppress_native.is_some()
        {
            config.set_source(ConfigSource::Cli);
        }

        if let Some(mode) = self.statusline_mode {
            config.statusline.mode = mode;
        }
        if let Some(ms) = self.debounce_ms {
            config.statusline.debounce = validate_debounce(ms)?;
        }
        if let Some(ref template) = self.template {
            config.statusline.template = Some(template.clone());
        }
        if let Some(suppress) = self.suppress_native {
            config.statusline.suppress_native = suppress;
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
