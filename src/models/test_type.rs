use serde::{Deserialize, Serialize};

/// An entry in the lab's test catalog (e.g. `CBC`, Complete Blood Count).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestType {
    pub id: i64,
    /// Unique across the catalog.
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTestType {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

impl NewTestType {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
        }
    }
}
