//! In-place edits of the tree: renaming functions and adding faults.
//!
//! Faults are only ever appended. Display order is a ranking computed
//! elsewhere and never written back into the child list.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use super::{FaultNode, TreeNode};
use crate::error::{Error, Result};

/// Id used when a fault name has no ASCII letters or digits.
const FALLBACK_ID: &str = "fault";

/// A fault as entered in the "add fault" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFault {
    /// Fault name. Required.
    pub name: String,
    /// Effect description. Optional.
    pub effect: String,
}

impl NewFault {
    /// Create a new fault request.
    #[must_use]
    pub fn new(name: impl Into<String>, effect: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            effect: effect.into(),
        }
    }

    /// Check the request, returning a field-level error if it is unusable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] on the `name` field if the name is empty
    /// after trimming.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "Name is required"));
        }
        Ok(())
    }
}

fn slug_separator() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("Invalid regex pattern"))
}

/// Turn a display name into an id fragment: `"Fuel Tank Leak"` becomes
/// `"fuel_tank_leak"`.
fn slugify(name: &str) -> String {
    let lowered = name.to_ascii_lowercase();
    let slug = slug_separator().replace_all(&lowered, "_");
    let slug = slug.trim_matches('_');
    if slug.is_empty() {
        FALLBACK_ID.to_string()
    } else {
        slug.to_string()
    }
}

impl TreeNode {
    /// Generate an id for a new node named `name` that no node in this tree
    /// uses yet.
    #[must_use]
    pub fn unique_id_for(&self, name: &str) -> String {
        let base = slugify(name);
        if !self.contains_id(&base) {
            return base;
        }
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !self.contains_id(candidate))
            .unwrap_or(base)
    }

    /// Rename a function.
    ///
    /// No validation is applied to the name; an editing surface may choose to
    /// forbid empty names but the model accepts them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NodeNotFound`] or [`Error::WrongNodeType`] if
    /// `function_id` does not name a function.
    pub fn rename_function(&mut self, function_id: &str, new_name: impl Into<String>) -> Result<()> {
        let function = self.function_mut(function_id)?;
        let new_name = new_name.into();
        debug!(function = %function_id, from = %function.name, to = %new_name, "Renaming function");
        function.name = new_name;
        Ok(())
    }

    /// Append a new fault to a function and return its generated id.
    ///
    /// Name and effect are trimmed. All ratings start at 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the name is blank, leaving the tree
    /// unchanged. Returns [`Error::NodeNotFound`] or [`Error::WrongNodeType`]
    /// if `function_id` does not name a function.
    pub fn add_fault(&mut self, function_id: &str, new_fault: NewFault) -> Result<String> {
        if let Err(err) = new_fault.validate() {
            warn!(function = %function_id, error = %err, "Rejected new fault");
            return Err(err);
        }

        let name = new_fault.name.trim();
        let id = self.unique_id_for(name);
        let function = self.function_mut(function_id)?;
        function.children.push(TreeNode::Fault(FaultNode::new(
            id.clone(),
            name,
            new_fault.effect.trim(),
        )));

        debug!(function = %function_id, fault = %id, "Added fault");
        Ok(id)
    }
}
