//! The analysis state container.
//!
//! [`Analysis`] owns the template tree, the rating overlay and the risk
//! thresholds. It exposes the three edit seams an editing surface calls
//! (fault data change, function rename, add fault) and the per-function view
//! model that surface renders.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::overlay::{FaultData, FmeaData};
use crate::ranking::{rank_faults, RankedFault};
use crate::risk::{RiskLevel, RiskThresholds};
use crate::seed::initial_tree;
use crate::tree::{FaultNode, FunctionEntry, NewFault, TreeNode, DEFAULT_RATING};

/// A ranked fault with its own risk badge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardFault {
    /// The ranked fault.
    #[serde(flatten)]
    pub ranked: RankedFault,
    /// Band of this fault's own RPN.
    pub risk: RiskLevel,
}

/// Everything needed to render one function.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCard {
    /// Id of the function.
    pub function_id: String,
    /// Id of the node the function belongs to.
    pub owner_id: String,
    /// Current function name.
    pub name: String,
    /// Faults by descending RPN.
    pub faults: Vec<CardFault>,
    /// Band of the highest RPN.
    pub risk: RiskLevel,
}

/// One row of the tree-wide risk summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskEntry {
    /// Id of the function the fault belongs to.
    pub function_id: String,
    /// Name of the function the fault belongs to.
    pub function_name: String,
    /// The ranked fault with its badge.
    #[serde(flatten)]
    pub fault: CardFault,
}

/// Tree and overlay in one JSON document.
///
/// This is what edits print with `--json`, and it is accepted wherever a
/// bare tree is, so edits can be chained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDocument {
    /// The template tree.
    pub tree: TreeNode,
    /// The rating overlay. Seeded from the tree when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay: Option<FmeaData>,
}

impl AnalysisDocument {
    /// Parse either a full document or a bare tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if the text is neither.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.get("tree").is_some() && value.get("type").is_none() {
            return Ok(serde_json::from_value(value)?);
        }
        Ok(Self {
            tree: serde_json::from_value(value)?,
            overlay: None,
        })
    }
}

/// Tree, overlay and thresholds of one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    tree: TreeNode,
    data: FmeaData,
    thresholds: RiskThresholds,
}

impl Default for Analysis {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Analysis {
    /// Create an analysis from a tree and an existing overlay.
    #[must_use]
    pub fn new(tree: TreeNode, data: FmeaData) -> Self {
        Self {
            tree,
            data,
            thresholds: RiskThresholds::default(),
        }
    }

    /// Create an analysis whose overlay is seeded from the tree's template
    /// values.
    #[must_use]
    pub fn from_tree(tree: TreeNode) -> Self {
        let data = FmeaData::seeded_from(&tree);
        Self::new(tree, data)
    }

    /// The example aircraft analysis with a seeded overlay.
    #[must_use]
    pub fn seeded() -> Self {
        Self::from_tree(initial_tree())
    }

    /// Use custom risk thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: RiskThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Parse a tree and optional overlay from JSON.
    ///
    /// `tree_json` is either a bare tree or an [`AnalysisDocument`]. An
    /// explicit `overlay_json` takes precedence over the document's overlay;
    /// with neither, the overlay is seeded from the tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if either document does not parse.
    pub fn from_json(tree_json: &str, overlay_json: Option<&str>) -> Result<Self> {
        let document = AnalysisDocument::from_json(tree_json)?;
        let overlay = match overlay_json {
            Some(overlay_json) => Some(serde_json::from_str(overlay_json)?),
            None => document.overlay,
        };
        let analysis = match overlay {
            Some(overlay) => Self::new(document.tree, overlay),
            None => Self::from_tree(document.tree),
        };
        analysis.warn_on_duplicate_ids();
        Ok(analysis)
    }

    /// Read a tree file without seeding: the overlay is the document's own,
    /// or empty for a bare tree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadFile`] if the file cannot be read, or
    /// [`Error::Json`] if it does not parse.
    pub fn load_unseeded(tree_path: &Path) -> Result<Self> {
        let document = AnalysisDocument::from_json(&read_file(tree_path)?)?;
        let analysis = Self::new(document.tree, document.overlay.unwrap_or_default());
        analysis.warn_on_duplicate_ids();
        info!(tree = %tree_path.display(), faults = analysis.data.len(), "Loaded analysis");
        Ok(analysis)
    }

    /// Read a tree and optional overlay from JSON files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ReadFile`] if a file cannot be read, or
    /// [`Error::Json`] if it does not parse.
    pub fn load(tree_path: &Path, overlay_path: Option<&Path>) -> Result<Self> {
        let tree_json = read_file(tree_path)?;
        let overlay_json = overlay_path.map(read_file).transpose()?;
        let analysis = Self::from_json(&tree_json, overlay_json.as_deref())?;
        info!(
            tree = %tree_path.display(),
            faults = analysis.data.len(),
            "Loaded analysis"
        );
        Ok(analysis)
    }

    fn warn_on_duplicate_ids(&self) {
        let duplicates = self.tree.duplicate_ids();
        if !duplicates.is_empty() {
            warn!(ids = ?duplicates, "Tree contains duplicate ids; overlay lookups may be ambiguous");
        }
    }

    /// The template tree.
    #[must_use]
    pub fn tree(&self) -> &TreeNode {
        &self.tree
    }

    /// The rating overlay.
    #[must_use]
    pub fn data(&self) -> &FmeaData {
        &self.data
    }

    /// The risk thresholds in use.
    #[must_use]
    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }

    /// Tree and overlay as a document that [`from_json`](Self::from_json)
    /// reads back.
    #[must_use]
    pub fn document(&self) -> AnalysisDocument {
        AnalysisDocument {
            tree: self.tree.clone(),
            overlay: Some(self.data.clone()),
        }
    }

    /// Merge a partial update into a fault's overlay record.
    ///
    /// The owner key is resolved from the function's position in the tree.
    ///
    /// # Errors
    ///
    /// Returns an error if `function_id` does not name a function with a
    /// parent.
    pub fn on_fault_data_change(
        &mut self,
        function_id: &str,
        fault_id: &str,
        update: FaultData,
    ) -> Result<()> {
        let entry = self.tree.function(function_id)?;
        let owner_id = entry.require_owner()?.to_string();
        if !entry.function.faults().any(|fault| fault.id == fault_id) {
            warn!(function = %function_id, fault = %fault_id, "Updating data of a fault the function does not list");
        }
        self.data.merge_fault(&owner_id, function_id, fault_id, update);
        debug!(function = %function_id, fault = %fault_id, "Fault data updated");
        Ok(())
    }

    /// Rename a function.
    ///
    /// # Errors
    ///
    /// Returns an error if `function_id` does not name a function.
    pub fn on_function_name_change(&mut self, function_id: &str, new_name: &str) -> Result<()> {
        self.tree.rename_function(function_id, new_name)
    }

    /// Add a fault to a function and return its id.
    ///
    /// The new fault also gets an overlay record with default ratings and
    /// its effect, so it ranks and displays like any other fault.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for a blank name, or a lookup error if
    /// `function_id` does not name a function with a parent.
    pub fn on_add_fault(&mut self, function_id: &str, new_fault: NewFault) -> Result<String> {
        new_fault.validate()?;
        let owner_id = self
            .tree
            .function(function_id)?
            .require_owner()?
            .to_string();
        let effect = new_fault.effect.trim().to_string();
        let fault_id = self.tree.add_fault(function_id, new_fault)?;

        let record = FaultData::default()
            .with_severity(DEFAULT_RATING)
            .with_occurrence(DEFAULT_RATING)
            .with_detection(DEFAULT_RATING)
            .with_effect(effect);
        self.data.merge_fault(&owner_id, function_id, &fault_id, record);
        Ok(fault_id)
    }

    /// Build the view model of one function.
    ///
    /// # Errors
    ///
    /// Returns an error if `function_id` does not name a function with a
    /// parent.
    pub fn function_card(&self, function_id: &str) -> Result<FunctionCard> {
        let entry = self.tree.function(function_id)?;
        self.card_for(entry)
    }

    /// View models of every function that has a parent, in document order.
    #[must_use]
    pub fn function_cards(&self) -> Vec<FunctionCard> {
        self.tree
            .functions()
            .into_iter()
            .filter_map(|entry| self.card_for(entry).ok())
            .collect()
    }

    /// The highest-RPN faults across the whole tree, at most `limit` of them.
    #[must_use]
    pub fn highest_risks(&self, limit: usize) -> Vec<RiskEntry> {
        let mut entries: Vec<RiskEntry> = self
            .function_cards()
            .into_iter()
            .flat_map(|card| {
                let FunctionCard {
                    function_id,
                    name,
                    faults,
                    ..
                } = card;
                faults.into_iter().map(move |fault| RiskEntry {
                    function_id: function_id.clone(),
                    function_name: name.clone(),
                    fault,
                })
            })
            .collect();
        entries.sort_by(|a, b| b.fault.ranked.rpn.total_cmp(&a.fault.ranked.rpn));
        entries.truncate(limit);
        entries
    }

    fn card_for(&self, entry: FunctionEntry<'_>) -> Result<FunctionCard> {
        let owner_id = entry.require_owner()?;
        let ranked = rank_faults(entry.function.faults(), &self.data, owner_id, entry.id());
        let risk = self.thresholds.function_risk(&ranked);
        Ok(FunctionCard {
            function_id: entry.id().to_string(),
            owner_id: owner_id.to_string(),
            name: entry.function.name.clone(),
            faults: ranked.into_iter().map(|r| self.card_fault(r)).collect(),
            risk,
        })
    }

    fn card_fault(&self, ranked: RankedFault) -> CardFault {
        let risk = self.thresholds.classify(ranked.rpn);
        CardFault { ranked, risk }
    }
}

impl FunctionCard {
    /// The fault nodes in ranked order.
    pub fn fault_nodes(&self) -> impl Iterator<Item = &FaultNode> {
        self.faults.iter().map(|f| &f.ranked.fault)
    }
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })
}
