use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::order::TestOrder;
use super::test_type::TestType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: i64,
    /// Unique: one result per order.
    pub order_id: i64,
    pub technician_id: i64,
    /// Reported content, free text (e.g. "WBC: 5.6 x10^9/L; Hb: 13.8 g/dL").
    pub value: String,
    pub recorded_at: NaiveDateTime,
}

/// A result recorded by a technician, with the order it completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicianResult {
    pub result: TestResult,
    pub order: TestOrder,
    pub test_type: TestType,
}
