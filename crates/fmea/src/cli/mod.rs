//! Command-line interface for fmea.
//!
//! This module provides the CLI structure for the `fmea` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddFaultCommand, CardCommand, CardsCommand, ConfigCommand, InputArgs, OutputArgs,
    RateCommand, RenameCommand, SummaryCommand, TreeCommand,
};

use crate::logging::Verbosity;

/// fmea - Failure Mode and Effects Analysis from the command line
///
/// Ranks the faults of each function by Risk Priority Number
/// (severity x occurrence x detection) and classifies functions into risk
/// bands. Edits print the updated analysis so it can be piped onward.
#[derive(Debug, Parser)]
#[command(name = "fmea")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the analysis tree
    Tree(TreeCommand),

    /// Show one function's faults ranked by RPN
    Card(CardCommand),

    /// Show every function's faults ranked by RPN
    Cards(CardsCommand),

    /// List the highest-RPN faults across the tree
    Summary(SummaryCommand),

    /// Rename a function
    Rename(RenameCommand),

    /// Add a fault to a function
    AddFault(AddFaultCommand),

    /// Edit a fault's ratings, effect or failure mode
    Rate(RateCommand),

    /// Print the built-in example tree as JSON
    Seed,

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
