//! The mutable rating overlay.
//!
//! The tree is the structural template. Current ratings and edited texts
//! live in a sparse overlay keyed by owner id, function id and fault id,
//! mirroring the nested shape `data[owner].functions[function].faults[fault]`.
//! Updates are field-wise merges: fields absent from an update are left alone.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::tree::TreeNode;

/// A rating as entered: either a number or the raw text of an input field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingValue {
    /// A numeric rating.
    Number(f64),
    /// Unparsed text, e.g. straight from a form input.
    Text(String),
}

impl RatingValue {
    /// Coerce to a number.
    ///
    /// Text is trimmed; empty text is `0.0` and text that does not parse as a
    /// number is `NaN`. Only the spelled-out `Infinity` forms are infinite:
    /// `inf`, `nan` and friends are not numbers here.
    #[must_use]
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            Self::Text(text) => match text.trim() {
                "" => 0.0,
                "Infinity" | "+Infinity" => f64::INFINITY,
                "-Infinity" => f64::NEG_INFINITY,
                text => text
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .unwrap_or(f64::NAN),
            },
        }
    }
}

impl From<u32> for RatingValue {
    fn from(value: u32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<f64> for RatingValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for RatingValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Per-fault overlay record. Every field is optional; the same type doubles
/// as a partial update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaultData {
    /// Severity rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<RatingValue>,
    /// Occurrence rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occurrence: Option<RatingValue>,
    /// Detection rating.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detection: Option<RatingValue>,
    /// Edited effect text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effect: Option<String>,
    /// Edited failure mode label, shown instead of the node name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_mode: Option<String>,
}

impl FaultData {
    /// Set the severity, builder style.
    #[must_use]
    pub fn with_severity(mut self, value: impl Into<RatingValue>) -> Self {
        self.severity = Some(value.into());
        self
    }

    /// Set the occurrence, builder style.
    #[must_use]
    pub fn with_occurrence(mut self, value: impl Into<RatingValue>) -> Self {
        self.occurrence = Some(value.into());
        self
    }

    /// Set the detection, builder style.
    #[must_use]
    pub fn with_detection(mut self, value: impl Into<RatingValue>) -> Self {
        self.detection = Some(value.into());
        self
    }

    /// Set the effect, builder style.
    #[must_use]
    pub fn with_effect(mut self, effect: impl Into<String>) -> Self {
        self.effect = Some(effect.into());
        self
    }

    /// Set the failure mode, builder style.
    #[must_use]
    pub fn with_failure_mode(mut self, failure_mode: impl Into<String>) -> Self {
        self.failure_mode = Some(failure_mode.into());
        self
    }

    /// Check whether no field is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Overwrite the fields that are present in `update`.
    pub fn merge(&mut self, update: FaultData) {
        let FaultData {
            severity,
            occurrence,
            detection,
            effect,
            failure_mode,
        } = update;
        if severity.is_some() {
            self.severity = severity;
        }
        if occurrence.is_some() {
            self.occurrence = occurrence;
        }
        if detection.is_some() {
            self.detection = detection;
        }
        if effect.is_some() {
            self.effect = effect;
        }
        if failure_mode.is_some() {
            self.failure_mode = failure_mode;
        }
    }
}

/// Overlay records of one function, by fault id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionData {
    /// Fault records.
    pub faults: BTreeMap<String, FaultData>,
}

/// Overlay records of one owner node, by function id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnerData {
    /// Function records.
    pub functions: BTreeMap<String, FunctionData>,
}

/// The whole overlay, by owner id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FmeaData {
    owners: BTreeMap<String, OwnerData>,
}

impl FmeaData {
    /// Create an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the initial overlay from the template values of every fault.
    ///
    /// Each fault gets its template severity, occurrence, detection and
    /// effect. Functions without an owner (a function at the root) are
    /// skipped.
    #[must_use]
    pub fn seeded_from(tree: &TreeNode) -> Self {
        let mut data = Self::new();
        for entry in tree.functions() {
            let Some(owner_id) = entry.owner_id else {
                continue;
            };
            for fault in entry.function.faults() {
                let record = FaultData::default()
                    .with_severity(fault.severity)
                    .with_occurrence(fault.occurrence)
                    .with_detection(fault.detection)
                    .with_effect(fault.effect.clone());
                data.merge_fault(owner_id, entry.id(), &fault.id, record);
            }
        }
        data
    }

    /// Look up the record of one fault.
    #[must_use]
    pub fn fault(&self, owner_id: &str, function_id: &str, fault_id: &str) -> Option<&FaultData> {
        self.owners
            .get(owner_id)?
            .functions
            .get(function_id)?
            .faults
            .get(fault_id)
    }

    /// Look up every record of one function.
    #[must_use]
    pub fn function(&self, owner_id: &str, function_id: &str) -> Option<&FunctionData> {
        self.owners.get(owner_id)?.functions.get(function_id)
    }

    /// Merge a partial update into one fault's record, creating any missing
    /// levels on the way.
    pub fn merge_fault(
        &mut self,
        owner_id: &str,
        function_id: &str,
        fault_id: &str,
        update: FaultData,
    ) {
        trace!(owner = %owner_id, function = %function_id, fault = %fault_id, "Merging fault data");
        self.owners
            .entry(owner_id.to_string())
            .or_default()
            .functions
            .entry(function_id.to_string())
            .or_default()
            .faults
            .entry(fault_id.to_string())
            .or_default()
            .merge(update);
    }

    /// Non-mutating form of [`merge_fault`](Self::merge_fault).
    #[must_use]
    pub fn merged(
        &self,
        owner_id: &str,
        function_id: &str,
        fault_id: &str,
        update: FaultData,
    ) -> Self {
        let mut next = self.clone();
        next.merge_fault(owner_id, function_id, fault_id, update);
        next
    }

    /// Number of fault records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.owners
            .values()
            .flat_map(|owner| owner.functions.values())
            .map(|function| function.faults.len())
            .sum()
    }

    /// Check whether the overlay holds no fault records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{FaultNode, ParentNode};

    #[test]
    fn test_rating_value_to_number() {
        assert!((RatingValue::Number(7.0).to_number() - 7.0).abs() < f64::EPSILON);
        assert!((RatingValue::from(" 5 ").to_number() - 5.0).abs() < f64::EPSILON);
        assert!(RatingValue::from("").to_number().abs() < f64::EPSILON);
        assert!(RatingValue::from("   ").to_number().abs() < f64::EPSILON);
        assert!(RatingValue::from("high").to_number().is_nan());
    }

    #[test]
    fn test_rating_value_deserialize() {
        let number: RatingValue = serde_json::from_str("9").unwrap();
        assert_eq!(number, RatingValue::Number(9.0));
        let text: RatingValue = serde_json::from_str("\"9\"").unwrap();
        assert_eq!(text, RatingValue::Text("9".to_string()));
    }

    #[test]
    fn test_fault_data_camel_case() {
        let data = FaultData::default().with_failure_mode("Stall");
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["failureMode"], "Stall");
        assert!(json.get("severity").is_none());

        let back: FaultData = serde_json::from_value(json).unwrap();
        assert_eq!(back, data);
    }

    #[test]
    fn test_fault_data_is_empty() {
        assert!(FaultData::default().is_empty());
        assert!(!FaultData::default().with_detection(2_u32).is_empty());
    }

    #[test]
    fn test_merge_keeps_unrelated_fields() {
        let mut record = FaultData::default()
            .with_severity(9_u32)
            .with_occurrence(4_u32)
            .with_effect("Loss of power");
        record.merge(FaultData::default().with_occurrence(2_u32));

        assert_eq!(record.severity, Some(RatingValue::Number(9.0)));
        assert_eq!(record.occurrence, Some(RatingValue::Number(2.0)));
        assert_eq!(record.effect.as_deref(), Some("Loss of power"));
        assert!(record.detection.is_none());
    }

    #[test]
    fn test_merge_fault_creates_levels() {
        let mut data = FmeaData::new();
        assert!(data.fault("engine", "thrust", "stall").is_none());

        data.merge_fault(
            "engine",
            "thrust",
            "stall",
            FaultData::default().with_severity(8_u32),
        );
        let record = data.fault("engine", "thrust", "stall").unwrap();
        assert_eq!(record.severity, Some(RatingValue::Number(8.0)));
        assert_eq!(data.len(), 1);
        assert!(data.function("engine", "thrust").is_some());
    }

    #[test]
    fn test_merged_is_pure() {
        let data = FmeaData::new();
        let next = data.merged("a", "b", "c", FaultData::default().with_effect("x"));
        assert!(data.is_empty());
        assert_eq!(next.len(), 1);
    }

    #[test]
    fn test_json_shape() {
        let mut data = FmeaData::new();
        data.merge_fault("engine", "thrust", "stall", FaultData::default().with_severity(3_u32));
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["engine"]["functions"]["thrust"]["faults"]["stall"]["severity"], 3.0);
    }

    #[test]
    fn test_deserialize_nested_json() {
        let json = r#"{
            "engine": {"functions": {"thrust": {"faults": {
                "stall": {"severity": "6", "failureMode": "Stall"}
            }}}}
        }"#;
        let data: FmeaData = serde_json::from_str(json).unwrap();
        let record = data.fault("engine", "thrust", "stall").unwrap();
        assert_eq!(record.severity, Some(RatingValue::Text("6".to_string())));
        assert_eq!(record.failure_mode.as_deref(), Some("Stall"));
    }

    #[test]
    fn test_seeded_from_tree() {
        let mut fault = FaultNode::new("stall", "Stall", "Thrust loss");
        fault.severity = 9;
        fault.occurrence = 4;
        fault.detection = 3;
        let tree = TreeNode::Component(ParentNode::new("engine", "Engine").with_child(
            TreeNode::Function(ParentNode::new("thrust", "Thrust").with_child(TreeNode::Fault(fault))),
        ));

        let data = FmeaData::seeded_from(&tree);
        let record = data.fault("engine", "thrust", "stall").unwrap();
        assert_eq!(record.severity, Some(RatingValue::Number(9.0)));
        assert_eq!(record.occurrence, Some(RatingValue::Number(4.0)));
        assert_eq!(record.detection, Some(RatingValue::Number(3.0)));
        assert_eq!(record.effect.as_deref(), Some("Thrust loss"));
        assert!(record.failure_mode.is_none());
    }

    #[test]
    fn test_seeded_from_skips_root_function() {
        let tree = TreeNode::Function(
            ParentNode::new("thrust", "Thrust")
                .with_child(TreeNode::Fault(FaultNode::new("stall", "Stall", ""))),
        );
        assert!(FmeaData::seeded_from(&tree).is_empty());
    }
}
