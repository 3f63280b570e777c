use serde::{Deserialize, Serialize};

/// Default row cap for ranking reports.
pub const DEFAULT_REPORT_LIMIT: u32 = 10;

/// Order volume for one test type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestTypeCount {
    pub test_type_id: i64,
    pub code: String,
    pub name: String,
    pub order_count: i64,
}
