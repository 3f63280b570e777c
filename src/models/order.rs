use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::OrderStatus;
use super::patient::Patient;
use super::test_type::TestType;

/// A request for one test type on behalf of one patient.
///
/// `patient_id` and `test_type_id` never change after the order is placed.
/// `status` moves from Pending to Completed exactly once, when the result
/// is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestOrder {
    pub id: i64,
    pub patient_id: i64,
    pub test_type_id: i64,
    pub status: OrderStatus,
    pub ordered_at: NaiveDateTime,
}

/// An order with its patient and test type joined in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetail {
    pub order: TestOrder,
    pub patient: Patient,
    pub test_type: TestType,
}
