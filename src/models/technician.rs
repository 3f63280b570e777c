use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Technician {
    pub id: i64,
    pub name: String,
    pub role: Option<String>,
    pub contact: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTechnician {
    pub name: String,
    pub role: Option<String>,
    pub contact: Option<String>,
}

impl NewTechnician {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}
