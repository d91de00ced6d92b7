//! Canonical role → source field name mapping.
//!
//! Collections name their columns differently (`job_id` vs `id`,
//! `task_name` vs `name`). A `FieldMapping` is supplied at configuration
//! time and resolves canonical roles to whatever the collection uses.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Canonical roles a predicate can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    Id,
    Name,
    Status,
    Timestamp,
    Description,
}

impl FieldRole {
    /// Tokens in query text that refer to this role.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            FieldRole::Id => &["id", "identifier"],
            FieldRole::Name => &["name", "title"],
            FieldRole::Status => &["status", "state"],
            FieldRole::Timestamp => &["timestamp", "date", "time", "started", "completed"],
            FieldRole::Description => &["description", "details"],
        }
    }
}

/// Role → source field name mapping for one collection.
///
/// A role with no mapping simply opts that role out of extraction;
/// nothing downstream treats an unresolved role as an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldMapping {
    mappings: HashMap<FieldRole, String>,
}

impl FieldMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(mut self, role: FieldRole, field: impl Into<String>) -> Self {
        self.mappings.insert(role, field.into());
        self
    }

    /// Resolve a role to the collection's field name, if mapped.
    pub fn resolve(&self, role: FieldRole) -> Option<&str> {
        self.mappings.get(&role).map(String::as_str)
    }

    /// Reverse lookup: which role (if any) does this field serve?
    pub fn role_of(&self, field: &str) -> Option<FieldRole> {
        self.mappings
            .iter()
            .find(|(_, f)| f.eq_ignore_ascii_case(field))
            .map(|(role, _)| *role)
    }
}
