//! Documentation model types.
//!
//! This module defines the flat representation handed to the page builder,
//! independent of the store it was extracted from.

use serde::{Deserialize, Serialize};

/// All documented classes of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentModel {
    /// Classes sorted ascending by fully qualified name.
    pub classes: Vec<ClassRecord>,
}

impl DocumentModel {
    /// Check whether no class survived extraction.
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Find a class by fully qualified name.
    pub fn class(&self, name: &str) -> Option<&ClassRecord> {
        self.classes
            .binary_search_by(|class| class.name.as_str().cmp(name))
            .ok()
            .map(|index| &self.classes[index])
    }

    /// Total number of documented methods.
    pub fn method_count(&self) -> usize {
        self.classes
            .iter()
            .flat_map(|class| &class.groups)
            .map(|group| group.methods.len())
            .sum()
    }
}

/// A documented class or module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassRecord {
    /// Fully qualified name (e.g., "TestParser::Nested").
    pub name: String,

    /// Rendered comment.
    pub comment: String,

    /// Method groups in first-occurrence order.
    pub groups: Vec<MethodGroup>,
}

impl ClassRecord {
    /// Find a group by name.
    pub fn group(&self, name: &str) -> Option<&MethodGroup> {
        self.groups.iter().find(|group| group.name == name)
    }
}

/// A named bucket of methods within a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodGroup {
    /// Group name; never empty.
    pub name: String,

    /// Methods in store order.
    pub methods: Vec<MethodRecord>,
}

/// A documented method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRecord {
    /// Method name.
    pub name: String,

    /// Rendered comment.
    pub comment: String,

    /// Source markup, as provided by the store.
    pub code: String,
}
