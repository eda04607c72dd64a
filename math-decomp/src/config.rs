//! Numerical configuration
//!
//! Tolerances and iteration ceilings live in a [`DecompConfig`]. A
//! process-wide instance is read by every public operation; the
//! `*_with_config` variants take an explicit one instead. Configurations can
//! be loaded from JSON or TOML documents.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::RwLock;

/// Tolerances and limits used by the decompositions and solvers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecompConfig {
    /// Relative tolerance (convergence of SVD sweeps, rank cut-off, rank-deficient columns)
    pub relative_tolerance: f64,
    /// Absolute tolerance below which a pivot or diagonal entry counts as zero
    pub absolute_tolerance: f64,
    /// Maximum number of Jacobi sweeps in the SVD
    pub max_svd_sweeps: usize,
    /// Fail with `ConvergenceLimitReached` instead of returning a best-effort SVD
    pub strict_convergence: bool,
    /// Maximum number of live candidates in `usolve_all` / `lsolve_all`
    pub max_candidate_solutions: usize,
}

impl DecompConfig {
    /// Built-in defaults
    pub const DEFAULT: DecompConfig = DecompConfig {
        relative_tolerance: 1e-12,
        absolute_tolerance: 1e-15,
        max_svd_sweeps: 100,
        strict_convergence: false,
        max_candidate_solutions: 10_000,
    };

    /// Snapshot of the process-wide configuration
    pub fn global() -> DecompConfig {
        match GLOBAL_CONFIG.read() {
            Ok(config) => config.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Config with a different relative tolerance
    pub fn with_relative_tolerance(mut self, tol: f64) -> Self {
        self.relative_tolerance = tol;
        self
    }

    /// Config with a different absolute tolerance
    pub fn with_absolute_tolerance(mut self, tol: f64) -> Self {
        self.absolute_tolerance = tol;
        self
    }

    /// Config with a different SVD sweep cap
    pub fn with_max_svd_sweeps(mut self, sweeps: usize) -> Self {
        self.max_svd_sweeps = sweeps;
        self
    }
}

impl Default for DecompConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

static GLOBAL_CONFIG: RwLock<DecompConfig> = RwLock::new(DecompConfig::DEFAULT);

/// Replace the process-wide configuration, returning the previous one
pub fn set_global_config(config: DecompConfig) -> DecompConfig {
    let mut guard = match GLOBAL_CONFIG.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    log::debug!("decomposition config updated: {:?}", config);
    std::mem::replace(&mut *guard, config)
}

/// Configuration file format
#[derive(Debug, Clone, Copy)]
pub enum ConfigFormat {
    /// JSON format
    Json,
    /// TOML format
    Toml,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        match ext.to_lowercase().as_str() {
            "json" => Some(ConfigFormat::Json),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }
}

/// Load a configuration from a file
///
/// Format is auto-detected from file extension (.json or .toml)
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<DecompConfig, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;

    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.display().to_string()))?;

    parse_config(&content, format)
}

/// Parse a configuration from a string, then validate it
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<DecompConfig, ConfigError> {
    let config: DecompConfig = match format {
        ConfigFormat::Json => {
            serde_json::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?
        }
        ConfigFormat::Toml => {
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?
        }
    };
    validate(&config)?;
    Ok(config)
}

/// Serialize a configuration to a string
pub fn serialize_config(config: &DecompConfig, format: ConfigFormat) -> Result<String, ConfigError> {
    match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)
            .map_err(|e| ConfigError::SerializeError(e.to_string())),
        ConfigFormat::Toml => {
            toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))
        }
    }
}

fn validate(config: &DecompConfig) -> Result<(), ConfigError> {
    if !(config.relative_tolerance >= 0.0 && config.relative_tolerance < 1.0) {
        return Err(ConfigError::InvalidValue(format!(
            "relative_tolerance must be in [0, 1), got {}",
            config.relative_tolerance
        )));
    }
    if !(config.absolute_tolerance >= 0.0 && config.absolute_tolerance.is_finite()) {
        return Err(ConfigError::InvalidValue(format!(
            "absolute_tolerance must be finite and non-negative, got {}",
            config.absolute_tolerance
        )));
    }
    if config.max_svd_sweeps == 0 {
        return Err(ConfigError::InvalidValue(
            "max_svd_sweeps must be at least 1".to_string(),
        ));
    }
    if config.max_candidate_solutions == 0 {
        return Err(ConfigError::InvalidValue(
            "max_candidate_solutions must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Serialize error
    #[error("Serialize error: {0}")]
    SerializeError(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Value out of range
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = parse_config(r#"{ "max_svd_sweeps": 12 }"#, ConfigFormat::Json)
            .expect("partial config should parse");
        assert_eq!(config.max_svd_sweeps, 12);
        assert_eq!(config.relative_tolerance, DecompConfig::DEFAULT.relative_tolerance);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = DecompConfig::default().with_relative_tolerance(1e-9);
        let text = serialize_config(&config, ConfigFormat::Toml).expect("serialize");
        let back = parse_config(&text, ConfigFormat::Toml).expect("parse");
        assert_eq!(back, config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = parse_config(r#"{ "relative_tolerance": 2.0 }"#, ConfigFormat::Json);
        assert!(matches!(err, Err(ConfigError::InvalidValue(_))));

        let err = parse_config("max_svd_sweeps = 0", ConfigFormat::Toml);
        assert!(matches!(err, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_format_from_path() {
        assert!(matches!(
            ConfigFormat::from_path("tolerances.TOML"),
            Some(ConfigFormat::Toml)
        ));
        assert!(ConfigFormat::from_path("tolerances.yaml").is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = std::env::temp_dir().join(format!("math-decomp-config-{}", std::process::id()));
        fs::create_dir_all(&dir).expect("create temp dir");

        let toml_path = dir.join("tolerances.toml");
        fs::write(&toml_path, "relative_tolerance = 1e-8\nmax_candidate_solutions = 7\n")
            .expect("write config");
        let config = load_config(&toml_path).expect("load toml");
        assert_eq!(config.relative_tolerance, 1e-8);
        assert_eq!(config.max_candidate_solutions, 7);
        assert_eq!(config.max_svd_sweeps, DecompConfig::DEFAULT.max_svd_sweeps);

        let json_path = dir.join("tolerances.json");
        fs::write(&json_path, r#"{ "strict_convergence": true }"#).expect("write config");
        assert!(load_config(&json_path).expect("load json").strict_convergence);

        let yaml_path = dir.join("tolerances.yaml");
        fs::write(&yaml_path, "relative_tolerance: 1e-8").expect("write config");
        assert!(matches!(
            load_config(&yaml_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        assert!(matches!(
            load_config(dir.join("missing.toml")),
            Err(ConfigError::Io(_))
        ));

        fs::remove_dir_all(&dir).expect("remove temp dir");
    }

    #[test]
    fn test_set_global_config_returns_previous() {
        // Only the sweep cap changes so concurrently running tests are unaffected.
        let current = DecompConfig::global();
        let raised = current.clone().with_max_svd_sweeps(current.max_svd_sweeps + 50);
        let previous = set_global_config(raised.clone());
        assert_eq!(DecompConfig::global().max_svd_sweeps, raised.max_svd_sweeps);
        set_global_config(previous);
    }
}
