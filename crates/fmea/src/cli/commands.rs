//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::overlay::{FaultData, RatingValue};

/// Where to read the analysis from.
#[derive(Debug, Clone, Default, Args)]
pub struct InputArgs {
    /// Tree JSON file (defaults to the built-in aircraft example)
    #[arg(short, long, value_name = "FILE")]
    pub tree: Option<PathBuf>,

    /// Overlay JSON file with current ratings
    #[arg(short, long, value_name = "FILE", requires = "tree")]
    pub overlay: Option<PathBuf>,

    /// Start from an empty overlay instead of seeding it from the tree
    #[arg(long, conflicts_with = "overlay")]
    pub no_seed: bool,
}

/// Output switches shared by every reporting command.
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct OutputArgs {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Print the tree outline.
#[derive(Debug, Args)]
pub struct TreeCommand {
    /// Analysis input files
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Show one function's ranked faults.
#[derive(Debug, Args)]
pub struct CardCommand {
    /// Function id
    pub function: String,

    /// Include control measures
    #[arg(long)]
    pub controls: bool,

    /// Analysis input files
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Show every function's ranked faults.
#[derive(Debug, Args)]
pub struct CardsCommand {
    /// Include control measures
    #[arg(long)]
    pub controls: bool,

    /// Analysis input files
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[command(flatten)]
    pub output: OutputArgs,
}

/// List the highest-RPN faults across the tree.
#[derive(Debug, Args)]
pub struct SummaryCommand {
    /// Maximum number of faults (defaults to the configured limit)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Analysis input files
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Rename a function.
#[derive(Debug, Args)]
pub struct RenameCommand {
    /// Function id
    pub function: String,

    /// New name
    pub name: String,

    /// Analysis input files
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Add a fault to a function.
#[derive(Debug, Args)]
pub struct AddFaultCommand {
    /// Function id
    pub function: String,

    /// Fault name
    pub name: String,

    /// Effect of the fault
    #[arg(short, long, default_value = "")]
    pub effect: String,

    /// Analysis input files
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[command(flatten)]
    pub output: OutputArgs,
}

/// Edit a fault's ratings or texts.
#[derive(Debug, Args)]
pub struct RateCommand {
    /// Function id
    pub function: String,

    /// Fault id
    pub fault: String,

    /// Severity rating
    #[arg(short, long)]
    pub severity: Option<String>,

    /// Occurrence rating
    #[arg(short = 'O', long)]
    pub occurrence: Option<String>,

    /// Detection rating
    #[arg(short, long)]
    pub detection: Option<String>,

    /// Effect text
    #[arg(long)]
    pub effect: Option<String>,

    /// Failure mode label
    #[arg(long)]
    pub failure_mode: Option<String>,

    /// Analysis input files
    #[command(flatten)]
    pub input: InputArgs,

    /// Output format
    #[command(flatten)]
    pub output: OutputArgs,
}

impl RateCommand {
    /// The partial overlay update described by the flags.
    ///
    /// Ratings are passed through as text; numeric coercion happens when the
    /// RPN is computed.
    #[must_use]
    pub fn update(&self) -> FaultData {
        FaultData {
            severity: self.severity.as_deref().map(RatingValue::from),
            occurrence: self.occurrence.as_deref().map(RatingValue::from),
            detection: self.detection.as_deref().map(RatingValue::from),
            effect: self.effect.clone(),
            failure_mode: self.failure_mode.clone(),
        }
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(severity: Option<&str>, effect: Option<&str>) -> RateCommand {
        RateCommand {
            function: "generate_thrust".to_string(),
            fault: "fuel_starvation".to_string(),
            severity: severity.map(str::to_string),
            occurrence: None,
            detection: None,
            effect: effect.map(str::to_string),
            failure_mode: None,
            input: InputArgs::default(),
            output: OutputArgs::default(),
        }
    }

    #[test]
    fn test_rate_update_only_sets_given_fields() {
        let update = rate(Some("7"), None).update();
        assert_eq!(update.severity, Some(RatingValue::Text("7".to_string())));
        assert!(update.occurrence.is_none());
        assert!(update.detection.is_none());
        assert!(update.effect.is_none());
    }

    #[test]
    fn test_rate_update_effect() {
        let update = rate(None, Some("Flameout")).update();
        assert!(update.severity.is_none());
        assert_eq!(update.effect.as_deref(), Some("Flameout"));
    }

    #[test]
    fn test_rate_update_empty() {
        assert!(rate(None, None).update().is_empty());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
