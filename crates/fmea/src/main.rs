//! `fmea` - CLI for FMEA trees
//!
//! This binary loads an analysis (the built-in example or JSON files), prints
//! ranked function cards and risk summaries, and applies edits.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use fmea::cli::{Cli, Command, ConfigCommand, InputArgs, OutputArgs};
use fmea::report::{render_card, render_summary, render_tree};
use fmea::seed::initial_tree;
use fmea::{init_logging, Analysis, Config, FmeaData, NewFault};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone()).context("loading configuration")?;

    // Execute the command
    match cli.command {
        Command::Tree(cmd) => {
            let analysis = load_analysis(&config, &cmd.input)?;
            if wants_json(&config, cmd.output) {
                println!("{}", serde_json::to_string_pretty(analysis.tree())?);
            } else {
                println!("{}", render_tree(analysis.tree()));
            }
        }
        Command::Card(cmd) => {
            let analysis = load_analysis(&config, &cmd.input)?;
            let card = analysis.function_card(&cmd.function)?;
            if wants_json(&config, cmd.output) {
                println!("{}", serde_json::to_string_pretty(&card)?);
            } else {
                let controls = cmd.controls || config.output.show_controls;
                println!("{}", render_card(&card, controls));
            }
        }
        Command::Cards(cmd) => {
            let analysis = load_analysis(&config, &cmd.input)?;
            let cards = analysis.function_cards();
            if wants_json(&config, cmd.output) {
                println!("{}", serde_json::to_string_pretty(&cards)?);
            } else {
                let controls = cmd.controls || config.output.show_controls;
                let rendered: Vec<String> =
                    cards.iter().map(|card| render_card(card, controls)).collect();
                println!("{}", rendered.join("\n\n"));
            }
        }
        Command::Summary(cmd) => {
            let analysis = load_analysis(&config, &cmd.input)?;
            let limit = cmd.limit.unwrap_or(config.output.summary_limit);
            let entries = analysis.highest_risks(limit);
            if wants_json(&config, cmd.output) {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                println!("{}", render_summary(&entries));
            }
        }
        Command::Rename(cmd) => {
            let mut analysis = load_analysis(&config, &cmd.input)?;
            analysis.on_function_name_change(&cmd.function, &cmd.name)?;
            print_edited(&config, &analysis, &cmd.function, cmd.output)?;
        }
        Command::AddFault(cmd) => {
            let mut analysis = load_analysis(&config, &cmd.input)?;
            let id = analysis.on_add_fault(&cmd.function, NewFault::new(&cmd.name, &cmd.effect))?;
            debug!(fault = %id, "Fault added");
            print_edited(&config, &analysis, &cmd.function, cmd.output)?;
        }
        Command::Rate(cmd) => {
            let mut analysis = load_analysis(&config, &cmd.input)?;
            analysis.on_fault_data_change(&cmd.function, &cmd.fault, cmd.update())?;
            print_edited(&config, &analysis, &cmd.function, cmd.output)?;
        }
        Command::Seed => {
            println!("{}", serde_json::to_string_pretty(&initial_tree())?);
        }
        Command::Config(config_cmd) => handle_config(&config, config_cmd)?,
    }
    Ok(())
}

fn wants_json(config: &Config, output: OutputArgs) -> bool {
    output.json || config.output.json
}

/// Resolve the analysis from command-line input, falling back to configured
/// files and then to the built-in example.
fn load_analysis(config: &Config, input: &InputArgs) -> anyhow::Result<Analysis> {
    let (tree_path, overlay_path) = match &input.tree {
        Some(tree) => (Some(tree.clone()), input.overlay.clone()),
        None => (
            config.analysis.tree_path.clone(),
            config.analysis.overlay_path.clone(),
        ),
    };
    let seed = config.analysis.seed_overlay && !input.no_seed;

    let analysis = match (tree_path, overlay_path) {
        (Some(tree), None) if !seed => Analysis::load_unseeded(&tree)
            .with_context(|| format!("loading analysis from {}", tree.display()))?,
        (Some(tree), overlay) => Analysis::load(&tree, overlay.as_deref())
            .with_context(|| format!("loading analysis from {}", tree.display()))?,
        (None, _) if seed => Analysis::seeded(),
        (None, _) => Analysis::new(initial_tree(), FmeaData::new()),
    };
    Ok(analysis.with_thresholds(config.risk))
}

/// After an edit, print either the whole updated analysis as a reloadable
/// JSON document or the edited function's card.
fn print_edited(
    config: &Config,
    analysis: &Analysis,
    function_id: &str,
    output: OutputArgs,
) -> anyhow::Result<()> {
    if wants_json(config, output) {
        println!("{}", serde_json::to_string_pretty(&analysis.document())?);
    } else {
        let card = analysis.function_card(function_id)?;
        println!("{}", render_card(&card, config.output.show_controls));
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Risk]");
                println!("  High from:          {}", config.risk.high);
                println!("  Medium from:        {}", config.risk.medium);
                println!("  Low from:           {}", config.risk.low);
                println!();
                println!("[Analysis]");
                match &config.analysis.tree_path {
                    Some(path) => println!("  Tree:               {}", path.display()),
                    None => println!("  Tree:               (built-in example)"),
                }
                if let Some(path) = &config.analysis.overlay_path {
                    println!("  Overlay:            {}", path.display());
                }
                println!("  Seed overlay:       {}", config.analysis.seed_overlay);
                println!();
                println!("[Output]");
                println!("  JSON:               {}", config.output.json);
                println!("  Summary limit:      {}", config.output.summary_limit);
                println!("  Show controls:      {}", config.output.show_controls);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
