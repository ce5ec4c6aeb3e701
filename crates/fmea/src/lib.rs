//! `fmea` - Failure Mode and Effects Analysis trees
//!
//! This library models FMEA hierarchies (system → subsystem → component →
//! function → fault), layers editable ratings over them, ranks faults by Risk
//! Priority Number and classifies functions into risk bands.
//!
//! ```
//! use fmea::{Analysis, RiskLevel};
//!
//! let analysis = Analysis::seeded();
//! let card = analysis.function_card("generate_thrust").unwrap();
//! assert_eq!(card.faults[0].ranked.rpn, 108.0);
//! assert_eq!(card.risk, RiskLevel::Low);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod overlay;
pub mod ranking;
pub mod report;
pub mod risk;
pub mod seed;
pub mod tree;

pub use analysis::{Analysis, AnalysisDocument, CardFault, FunctionCard, RiskEntry};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use overlay::{FaultData, FmeaData, RatingValue};
pub use ranking::{rank_faults, rpn, RankedFault};
pub use risk::{classify, RiskLevel, RiskThresholds};
pub use tree::{FaultNode, NewFault, NodeType, ParentNode, TreeNode};
