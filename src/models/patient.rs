use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::order::TestOrder;
use super::result::TestResult;
use super::test_type::TestType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    /// Free-form, as written on the requisition.
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub contact: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Input for registering a patient.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub contact: Option<String>,
}

impl NewPatient {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            ..Self::default()
        }
    }
}

/// A patient with every order placed for them, loaded in one query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    pub patient: Patient,
    /// Most recent first.
    pub orders: Vec<PatientOrder>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientOrder {
    pub order: TestOrder,
    pub test_type: TestType,
    /// Present once the order is Completed.
    pub result: Option<TestResult>,
}
