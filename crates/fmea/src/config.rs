//! Configuration management for fmea.
//!
//! Settings cover the risk band thresholds, default analysis inputs and
//! output format. They are layered with figment: built-in defaults, then a
//! TOML file, then `FMEA_` environment variables.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::risk::RiskThresholds;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default configuration directory name.
const CONFIG_DIR_NAME: &str = "fmea";

/// Settings for the `fmea` binary.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FMEA_`, `__` between levels)
/// 2. TOML config file at `~/.config/fmea/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Risk band thresholds.
    pub risk: RiskThresholds,
    /// Input configuration.
    pub analysis: AnalysisConfig,
    /// Output configuration.
    pub output: OutputConfig,
}

/// Where the analysis comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Tree JSON file. The built-in aircraft example is used when unset.
    pub tree_path: Option<PathBuf>,
    /// Overlay JSON file.
    pub overlay_path: Option<PathBuf>,
    /// Seed the overlay from the tree's template values when no overlay
    /// file is given. When false, faults without overlay records rank at 1.
    pub seed_overlay: bool,
}

/// How results are printed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Print JSON instead of plain text by default.
    pub json: bool,
    /// Number of faults listed by `summary`.
    pub summary_limit: usize,
    /// Include control measures in fault listings.
    pub show_controls: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tree_path: None,
            overlay_path: None,
            seed_overlay: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json: false,
            summary_limit: 10,
            show_controls: false,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `FMEA_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FMEA_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        self.risk.validate()?;

        if self.output.summary_limit == 0 {
            return Err(Error::ConfigValidation {
                message: "summary_limit must be greater than 0".to_string(),
            });
        }

        let paths = [&self.analysis.tree_path, &self.analysis.overlay_path];
        for path in paths.into_iter().flatten() {
            if !path.exists() {
                return Err(Error::ConfigValidation {
                    message: format!("input file does not exist: {}", path.display()),
                });
            }
        }

        if self.analysis.overlay_path.is_some() && self.analysis.tree_path.is_none() {
            return Err(Error::ConfigValidation {
                message: "overlay_path requires tree_path".to_string(),
            });
        }

        Ok(())
    }
}
