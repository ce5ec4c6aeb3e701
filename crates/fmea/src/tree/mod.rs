//! The FMEA tree data model.
//!
//! An analysis is a recursive hierarchy of systems, subsystems, components,
//! functions and faults. Every node except a fault owns an ordered list of
//! children; faults are leaves carrying the template effect, cause, ratings
//! and control measures.
//!
//! The JSON representation is tagged by a `type` field:
//!
//! ```
//! use fmea::tree::{NodeType, TreeNode};
//!
//! let json = r#"{
//!     "id": "engine",
//!     "name": "Engine",
//!     "type": "component",
//!     "children": [{
//!         "id": "generate_thrust",
//!         "name": "Generate Thrust",
//!         "type": "function",
//!         "children": []
//!     }]
//! }"#;
//!
//! let tree: TreeNode = serde_json::from_str(json).unwrap();
//! assert_eq!(tree.node_type(), NodeType::Component);
//! assert_eq!(tree.children().len(), 1);
//! ```

mod mutation;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use mutation::NewFault;

/// Default value for a rating that has not been assessed yet.
pub const DEFAULT_RATING: u32 = 1;

/// The kind of a tree node. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// The root of an analysis.
    System,
    /// A major subdivision of a system.
    Subsystem,
    /// A physical or logical part.
    Component,
    /// Something a component is supposed to do.
    Function,
    /// A way a function can fail.
    Fault,
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::System => write!(f, "system"),
            Self::Subsystem => write!(f, "subsystem"),
            Self::Component => write!(f, "component"),
            Self::Function => write!(f, "function"),
            Self::Fault => write!(f, "fault"),
        }
    }
}

/// A node of the FMEA hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TreeNode {
    /// A system node.
    System(ParentNode),
    /// A subsystem node.
    Subsystem(ParentNode),
    /// A component node.
    Component(ParentNode),
    /// A function node. Its children are the function's faults.
    Function(ParentNode),
    /// A fault (failure mode) leaf.
    Fault(FaultNode),
}

/// Fields shared by every node that has children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentNode {
    /// Unique, stable identifier.
    pub id: String,
    /// Human-readable label.
    pub name: String,
    /// Ordered child nodes.
    #[serde(default)]
    pub children: Vec<TreeNode>,
}

/// A failure mode of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaultNode {
    /// Unique, stable identifier.
    pub id: String,
    /// Human-readable label.
    pub name: String,
    /// Consequence of the failure.
    #[serde(default)]
    pub effect: String,
    /// Root cause of the failure.
    #[serde(default)]
    pub cause: String,
    /// How bad the effect is (1-10 by convention).
    #[serde(default = "default_rating")]
    pub severity: u32,
    /// How likely the cause is (1-10 by convention).
    #[serde(default = "default_rating")]
    pub occurrence: u32,
    /// How hard the failure is to detect (1-10 by convention).
    #[serde(default = "default_rating")]
    pub detection: u32,
    /// Control measures in place.
    #[serde(default)]
    pub controls: Controls,
}

/// Preventive and detective control measures, one per line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Controls {
    /// Measures that stop the cause from occurring.
    pub preventive: String,
    /// Measures that detect the failure before it has an effect.
    pub detection: String,
}

fn default_rating() -> u32 {
    DEFAULT_RATING
}

impl Controls {
    /// The preventive measures as individual trimmed, non-empty lines.
    pub fn preventive_items(&self) -> impl Iterator<Item = &str> {
        split_items(&self.preventive)
    }

    /// The detection measures as individual trimmed, non-empty lines.
    pub fn detection_items(&self) -> impl Iterator<Item = &str> {
        split_items(&self.detection)
    }
}

fn split_items(block: &str) -> impl Iterator<Item = &str> {
    block.lines().map(str::trim).filter(|line| !line.is_empty())
}

impl FaultNode {
    /// Create a fault with the given name and effect and every rating at
    /// its default.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, effect: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            effect: effect.into(),
            cause: String::new(),
            severity: DEFAULT_RATING,
            occurrence: DEFAULT_RATING,
            detection: DEFAULT_RATING,
            controls: Controls::default(),
        }
    }
}

impl ParentNode {
    /// Create a node with no children.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    /// Add a child, builder style.
    #[must_use]
    pub fn with_child(mut self, child: TreeNode) -> Self {
        self.children.push(child);
        self
    }

    /// The fault children in their stored order.
    pub fn faults(&self) -> impl Iterator<Item = &FaultNode> {
        self.children.iter().filter_map(TreeNode::as_fault)
    }
}

/// A function node together with the id of the node that owns it.
///
/// The owner id is the first level of the overlay key. In a regular tree the
/// owner is a component, but functions may also hang directly off a
/// subsystem or the system itself.
#[derive(Debug, Clone, Copy)]
pub struct FunctionEntry<'a> {
    /// Id of the function's parent, `None` if the function is the root.
    pub owner_id: Option<&'a str>,
    /// The function node.
    pub function: &'a ParentNode,
}

impl<'a> FunctionEntry<'a> {
    /// Id of the function.
    #[must_use]
    pub fn id(&self) -> &'a str {
        &self.function.id
    }

    /// The owner id, or an error for a root-level function.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OrphanFunction`] if the function has no parent.
    pub fn require_owner(&self) -> Result<&'a str> {
        self.owner_id.ok_or_else(|| Error::OrphanFunction {
            id: self.function.id.clone(),
        })
    }
}

impl TreeNode {
    /// Get the node's id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::System(p) | Self::Subsystem(p) | Self::Component(p) | Self::Function(p) => &p.id,
            Self::Fault(f) => &f.id,
        }
    }

    /// Get the node's name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::System(p) | Self::Subsystem(p) | Self::Component(p) | Self::Function(p) => {
                &p.name
            }
            Self::Fault(f) => &f.name,
        }
    }

    /// Replace the node's name. Any string is accepted, including an empty one.
    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        match self {
            Self::System(p) | Self::Subsystem(p) | Self::Component(p) | Self::Function(p) => {
                p.name = name;
            }
            Self::Fault(f) => f.name = name,
        }
    }

    /// Get the node's type.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::System(_) => NodeType::System,
            Self::Subsystem(_) => NodeType::Subsystem,
            Self::Component(_) => NodeType::Component,
            Self::Function(_) => NodeType::Function,
            Self::Fault(_) => NodeType::Fault,
        }
    }

    /// The node's children. Always empty for faults.
    #[must_use]
    pub fn children(&self) -> &[TreeNode] {
        match self {
            Self::System(p) | Self::Subsystem(p) | Self::Component(p) | Self::Function(p) => {
                &p.children
            }
            Self::Fault(_) => &[],
        }
    }

    /// Mutable access to the children, `None` for faults.
    pub fn children_mut(&mut self) -> Option<&mut Vec<TreeNode>> {
        match self {
            Self::System(p) | Self::Subsystem(p) | Self::Component(p) | Self::Function(p) => {
                Some(&mut p.children)
            }
            Self::Fault(_) => None,
        }
    }

    /// The fault payload, if this is a fault.
    #[must_use]
    pub fn as_fault(&self) -> Option<&FaultNode> {
        match self {
            Self::Fault(f) => Some(f),
            _ => None,
        }
    }

    /// The function payload, if this is a function.
    #[must_use]
    pub fn as_function(&self) -> Option<&ParentNode> {
        match self {
            Self::Function(p) => Some(p),
            _ => None,
        }
    }

    /// Iterate over this node and all of its descendants, depth-first in
    /// document order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter { stack: vec![self] }
    }

    /// Find a node by id.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        self.iter().find(|node| node.id() == id)
    }

    /// Find a node by id, mutably.
    pub fn find_mut(&mut self, id: &str) -> Option<&mut TreeNode> {
        if self.id() == id {
            return Some(self);
        }
        self.children_mut()?
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }

    /// Check whether any node in the tree has the given id.
    #[must_use]
    pub fn contains_id(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Find the parent of the node with the given id.
    #[must_use]
    pub fn parent_of(&self, id: &str) -> Option<&TreeNode> {
        self.iter()
            .find(|node| node.children().iter().any(|child| child.id() == id))
    }

    /// Every function in the tree with the id of its owner, in document order.
    #[must_use]
    pub fn functions(&self) -> Vec<FunctionEntry<'_>> {
        let mut entries = Vec::new();
        collect_functions(self, None, &mut entries);
        entries
    }

    /// Look up a function by id.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if no node has the id, or
    /// [`Error::WrongNodeType`] if the node is not a function.
    pub fn function(&self, function_id: &str) -> Result<FunctionEntry<'_>> {
        if let Some(entry) = self
            .functions()
            .into_iter()
            .find(|entry| entry.id() == function_id)
        {
            return Ok(entry);
        }
        match self.find(function_id) {
            Some(node) => Err(Error::wrong_node_type(
                function_id,
                NodeType::Function,
                node.node_type(),
            )),
            None => Err(Error::node_not_found(function_id)),
        }
    }

    /// Look up a function by id, mutably.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] if no node has the id, or
    /// [`Error::WrongNodeType`] if the node is not a function.
    pub fn function_mut(&mut self, function_id: &str) -> Result<&mut ParentNode> {
        match self.find_mut(function_id) {
            Some(Self::Function(function)) => Ok(function),
            Some(other) => Err(Error::wrong_node_type(
                function_id,
                NodeType::Function,
                other.node_type(),
            )),
            None => Err(Error::node_not_found(function_id)),
        }
    }

    /// Count the nodes of each type.
    #[must_use]
    pub fn count_by_type(&self) -> BTreeMap<NodeType, usize> {
        let mut counts = BTreeMap::new();
        for node in self.iter() {
            *counts.entry(node.node_type()).or_insert(0) += 1;
        }
        counts
    }

    /// Ids that appear more than once, each reported once in document order.
    ///
    /// Duplicate ids make overlay lookups ambiguous. Mutations do not check
    /// for them; this is a diagnostic for externally loaded trees.
    #[must_use]
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut duplicates = Vec::new();
        for node in self.iter() {
            let id = node.id();
            if !seen.insert(id) && reported.insert(id) {
                duplicates.push(id);
            }
        }
        duplicates
    }
}

fn collect_functions<'a>(
    node: &'a TreeNode,
    owner_id: Option<&'a str>,
    entries: &mut Vec<FunctionEntry<'a>>,
) {
    if let TreeNode::Function(function) = node {
        entries.push(FunctionEntry { owner_id, function });
    }
    for child in node.children() {
        collect_functions(child, Some(node.id()), entries);
    }
}

/// Depth-first iterator over a tree. See [`TreeNode::iter`].
#[derive(Debug)]
pub struct Iter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

impl<'a> IntoIterator for &'a TreeNode {
    type Item = &'a TreeNode;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> TreeNode {
        TreeNode::System(
            ParentNode::new("sys", "System")
                .with_child(TreeNode::Component(
                    ParentNode::new("comp", "Component").with_child(TreeNode::Function(
                        ParentNode::new("func", "Function")
                            .with_child(TreeNode::Fault(FaultNode::new("f1", "Fault 1", "")))
                            .with_child(TreeNode::Fault(FaultNode::new("f2", "Fault 2", ""))),
                    )),
                ))
                .with_child(TreeNode::Function(ParentNode::new("top_func", "Top"))),
        )
    }

    #[test]
    fn test_node_type_display() {
        assert_eq!(NodeType::System.to_string(), "system");
        assert_eq!(NodeType::Subsystem.to_string(), "subsystem");
        assert_eq!(NodeType::Component.to_string(), "component");
        assert_eq!(NodeType::Function.to_string(), "function");
        assert_eq!(NodeType::Fault.to_string(), "fault");
    }

    #[test]
    fn test_accessors() {
        let tree = sample_tree();
        assert_eq!(tree.id(), "sys");
        assert_eq!(tree.name(), "System");
        assert_eq!(tree.node_type(), NodeType::System);
        assert_eq!(tree.children().len(), 2);
    }

    #[test]
    fn test_fault_has_no_children() {
        let mut fault = TreeNode::Fault(FaultNode::new("f", "F", ""));
        assert!(fault.children().is_empty());
        assert!(fault.children_mut().is_none());
    }

    #[test]
    fn test_iter_is_document_order() {
        let tree = sample_tree();
        let ids: Vec<&str> = tree.iter().map(TreeNode::id).collect();
        assert_eq!(ids, vec!["sys", "comp", "func", "f1", "f2", "top_func"]);
    }

    #[test]
    fn test_find_and_find_mut() {
        let mut tree = sample_tree();
        assert_eq!(tree.find("f2").map(TreeNode::name), Some("Fault 2"));
        assert!(tree.find("missing").is_none());

        tree.find_mut("comp").unwrap().set_name("Renamed");
        assert_eq!(tree.find("comp").unwrap().name(), "Renamed");
    }

    #[test]
    fn test_parent_of() {
        let tree = sample_tree();
        assert_eq!(tree.parent_of("f1").map(TreeNode::id), Some("func"));
        assert_eq!(tree.parent_of("top_func").map(TreeNode::id), Some("sys"));
        assert!(tree.parent_of("sys").is_none());
    }

    #[test]
    fn test_functions_with_owner() {
        let tree = sample_tree();
        let functions = tree.functions();
        assert_eq!(functions.len(), 2);
        assert_eq!(functions[0].id(), "func");
        assert_eq!(functions[0].owner_id, Some("comp"));
        assert_eq!(functions[1].id(), "top_func");
        assert_eq!(functions[1].owner_id, Some("sys"));
    }

    #[test]
    fn test_root_function_is_orphan() {
        let tree = TreeNode::Function(ParentNode::new("lonely", "Lonely"));
        let entry = tree.function("lonely").unwrap();
        assert!(entry.owner_id.is_none());
        assert!(matches!(
            entry.require_owner(),
            Err(Error::OrphanFunction { .. })
        ));
    }

    #[test]
    fn test_function_lookup_errors() {
        let tree = sample_tree();
        assert!(tree.function("missing").unwrap_err().is_not_found());
        assert!(matches!(
            tree.function("comp"),
            Err(Error::WrongNodeType {
                actual: NodeType::Component,
                ..
            })
        ));
    }

    #[test]
    fn test_function_mut_errors() {
        let mut tree = sample_tree();
        assert!(tree.function_mut("func").is_ok());
        assert!(tree.function_mut("missing").unwrap_err().is_not_found());
        assert!(matches!(
            tree.function_mut("f1"),
            Err(Error::WrongNodeType {
                actual: NodeType::Fault,
                ..
            })
        ));
    }

    #[test]
    fn test_parent_faults() {
        let tree = sample_tree();
        let func = tree.function("func").unwrap().function;
        let ids: Vec<&str> = func.faults().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["f1", "f2"]);
    }

    #[test]
    fn test_count_by_type() {
        let counts = sample_tree().count_by_type();
        assert_eq!(counts[&NodeType::System], 1);
        assert_eq!(counts[&NodeType::Component], 1);
        assert_eq!(counts[&NodeType::Function], 2);
        assert_eq!(counts[&NodeType::Fault], 2);
        assert!(!counts.contains_key(&NodeType::Subsystem));
    }

    #[test]
    fn test_duplicate_ids() {
        let mut tree = sample_tree();
        assert!(tree.duplicate_ids().is_empty());

        let func = tree.function_mut("func").unwrap();
        func.children
            .push(TreeNode::Fault(FaultNode::new("f1", "Again", "")));
        func.children
            .push(TreeNode::Fault(FaultNode::new("f1", "And again", "")));
        assert_eq!(tree.duplicate_ids(), vec!["f1"]);
    }

    #[test]
    fn test_controls_items() {
        let controls = Controls {
            preventive: "Regular inspections\n  FOD prevention training \n\n".to_string(),
            detection: String::new(),
        };
        let items: Vec<&str> = controls.preventive_items().collect();
        assert_eq!(items, vec!["Regular inspections", "FOD prevention training"]);
        assert_eq!(controls.detection_items().count(), 0);
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(sample_tree()).unwrap();
        assert_eq!(json["type"], "system");
        assert_eq!(json["children"][0]["type"], "component");
        let fault = &json["children"][0]["children"][0]["children"][0];
        assert_eq!(fault["type"], "fault");
        assert_eq!(fault["severity"], 1);
        assert!(fault.get("children").is_none());
    }

    #[test]
    fn test_deserialize_fault_defaults() {
        let json = r#"{"id": "f", "name": "F", "type": "fault"}"#;
        let node: TreeNode = serde_json::from_str(json).unwrap();
        let fault = node.as_fault().unwrap();
        assert_eq!(fault.severity, DEFAULT_RATING);
        assert_eq!(fault.occurrence, DEFAULT_RATING);
        assert_eq!(fault.detection, DEFAULT_RATING);
        assert!(fault.effect.is_empty());
        assert_eq!(fault.controls, Controls::default());
    }

    #[test]
    fn test_deserialize_missing_children() {
        let json = r#"{"id": "func", "name": "F", "type": "function"}"#;
        let node: TreeNode = serde_json::from_str(json).unwrap();
        assert!(node.as_function().unwrap().children.is_empty());
    }

    #[test]
    fn test_deserialize_unknown_type_fails() {
        let json = r#"{"id": "x", "name": "X", "type": "widget"}"#;
        assert!(serde_json::from_str::<TreeNode>(json).is_err());
    }

    #[test]
    fn test_into_iterator() {
        let tree = sample_tree();
        let mut count = 0;
        for _ in &tree {
            count += 1;
        }
        assert_eq!(count, 6);
    }
}
