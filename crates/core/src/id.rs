//! Identifier newtypes shared across the workspace

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a government project.
///
/// Opaque string key; also keys the contractor account and the payment
/// history for the project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_id_display() {
        let id = ProjectId::new("P1");
        assert_eq!(id.to_string(), "P1");
        assert_eq!(id.as_str(), "P1");
    }

    #[test]
    fn test_project_id_serde_transparent() {
        let id = ProjectId::new("ROAD-42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ROAD-42\"");
        let parsed: ProjectId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
