//! Plain-text rendering of trees, function cards and risk summaries.

use crate::analysis::{CardFault, FunctionCard, RiskEntry};
use crate::tree::{NodeType, TreeNode};

/// Render the tree as an indented outline, one node per line.
#[must_use]
pub fn render_tree(tree: &TreeNode) -> String {
    let mut lines = Vec::new();
    outline(tree, 0, &mut lines);
    lines.join("\n")
}

fn outline(node: &TreeNode, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    let line = match node.as_fault() {
        Some(fault) => format!(
            "{indent}- {} [{}] S{} O{} D{}",
            fault.name, fault.id, fault.severity, fault.occurrence, fault.detection
        ),
        None => format!("{indent}{} {} [{}]", type_tag(node.node_type()), node.name(), node.id()),
    };
    lines.push(line);
    for child in node.children() {
        outline(child, depth + 1, lines);
    }
}

fn type_tag(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::System => "SYS",
        NodeType::Subsystem => "SUB",
        NodeType::Component => "CMP",
        NodeType::Function => "FN ",
        NodeType::Fault => "-",
    }
}

/// Render one function card.
#[must_use]
pub fn render_card(card: &FunctionCard, show_controls: bool) -> String {
    let mut lines = vec![format!(
        "{} [{}]  {} Risk ({})",
        card.name,
        card.function_id,
        card.risk,
        card.risk.color()
    )];
    if card.faults.is_empty() {
        lines.push("  (no faults)".to_string());
    }
    for fault in &card.faults {
        lines.push(fault_line(fault));
        lines.push(format!("      Effect: {}", fault.ranked.display_effect()));
        if show_controls {
            let controls = &fault.ranked.fault.controls;
            for item in controls.preventive_items() {
                lines.push(format!("      Prevent: {item}"));
            }
            for item in controls.detection_items() {
                lines.push(format!("      Detect:  {item}"));
            }
        }
    }
    lines.join("\n")
}

fn fault_line(fault: &CardFault) -> String {
    format!(
        "  RPN {:>4}  {:<8}  {} [{}]",
        fault.ranked.rpn,
        fault.risk.to_string(),
        fault.ranked.display_name(),
        fault.ranked.fault.id
    )
}

/// Render the tree-wide list of highest-RPN faults.
#[must_use]
pub fn render_summary(entries: &[RiskEntry]) -> String {
    if entries.is_empty() {
        return "No faults.".to_string();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{:>3}. {}  ({})",
                i + 1,
                fault_line(&entry.fault).trim_start(),
                entry.function_name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
