//! Raw row types shared by the joined queries.
//!
//! Each reader takes the column offset where its entity starts, so one
//! result row can carry a patient, an order, a test type and a result.

use std::str::FromStr;

use crate::db::{timestamp, DatabaseError};
use crate::models::*;

pub(super) struct PatientRow {
    id: i64,
    first_name: String,
    last_name: String,
    date_of_birth: Option<String>,
    gender: Option<String>,
    contact: Option<String>,
    created_at: String,
}

pub(super) const PATIENT_WIDTH: usize = 7;

pub(super) fn patient_row(row: &rusqlite::Row<'_>, at: usize) -> Result<PatientRow, rusqlite::Error> {
    Ok(PatientRow {
        id: row.get(at)?,
        first_name: row.get(at + 1)?,
        last_name: row.get(at + 2)?,
        date_of_birth: row.get(at + 3)?,
        gender: row.get(at + 4)?,
        contact: row.get(at + 5)?,
        created_at: row.get(at + 6)?,
    })
}

pub(super) fn patient_from_row(row: PatientRow) -> Result<Patient, DatabaseError> {
    Ok(Patient {
        id: row.id,
        first_name: row.first_name,
        last_name: row.last_name,
        date_of_birth: row.date_of_birth,
        gender: row.gender,
        contact: row.contact,
        created_at: timestamp::parse("patients.created_at", &row.created_at)?,
    })
}

pub(super) struct TechnicianRow {
    id: i64,
    name: String,
    role: Option<String>,
    contact: Option<String>,
    created_at: String,
}

pub(super) fn technician_row(row: &rusqlite::Row<'_>, at: usize) -> Result<TechnicianRow, rusqlite::Error> {
    Ok(TechnicianRow {
        id: row.get(at)?,
        name: row.get(at + 1)?,
        role: row.get(at + 2)?,
        contact: row.get(at + 3)?,
        created_at: row.get(at + 4)?,
    })
}

pub(super) fn technician_from_row(row: TechnicianRow) -> Result<Technician, DatabaseError> {
    Ok(Technician {
        id: row.id,
        name: row.name,
        role: row.role,
        contact: row.contact,
        created_at: timestamp::parse("technicians.created_at", &row.created_at)?,
    })
}

pub(super) const TEST_TYPE_WIDTH: usize = 4;

// Test types carry no timestamp, so they map straight from the row.
pub(super) fn test_type_row(row: &rusqlite::Row<'_>, at: usize) -> Result<TestType, rusqlite::Error> {
    Ok(TestType {
        id: row.get(at)?,
        code: row.get(at + 1)?,
        name: row.get(at + 2)?,
        description: row.get(at + 3)?,
    })
}

pub(super) struct OrderRow {
    id: i64,
    patient_id: i64,
    test_type_id: i64,
    status: String,
    ordered_at: String,
}

pub(super) const ORDER_WIDTH: usize = 5;

pub(super) fn order_row(row: &rusqlite::Row<'_>, at: usize) -> Result<OrderRow, rusqlite::Error> {
    Ok(OrderRow {
        id: row.get(at)?,
        patient_id: row.get(at + 1)?,
        test_type_id: row.get(at + 2)?,
        status: row.get(at + 3)?,
        ordered_at: row.get(at + 4)?,
    })
}

/// `None` when a LEFT JOIN found no order.
pub(super) fn optional_order_row(
    row: &rusqlite::Row<'_>,
    at: usize,
) -> Result<Option<OrderRow>, rusqlite::Error> {
    match row.get::<_, Option<i64>>(at)? {
        Some(_) => order_row(row, at).map(Some),
        None => Ok(None),
    }
}

pub(super) fn order_from_row(row: OrderRow) -> Result<TestOrder, DatabaseError> {
    Ok(TestOrder {
        id: row.id,
        patient_id: row.patient_id,
        test_type_id: row.test_type_id,
        status: OrderStatus::from_str(&row.status)?,
        ordered_at: timestamp::parse("test_orders.ordered_at", &row.ordered_at)?,
    })
}

pub(super) struct ResultRow {
    id: i64,
    order_id: i64,
    technician_id: i64,
    value: String,
    recorded_at: String,
}

pub(super) const RESULT_WIDTH: usize = 5;

pub(super) fn result_row(row: &rusqlite::Row<'_>, at: usize) -> Result<ResultRow, rusqlite::Error> {
    Ok(ResultRow {
        id: row.get(at)?,
        order_id: row.get(at + 1)?,
        technician_id: row.get(at + 2)?,
        value: row.get(at + 3)?,
        recorded_at: row.get(at + 4)?,
    })
}

/// `None` when a LEFT JOIN found no result.
pub(super) fn optional_result_row(
    row: &rusqlite::Row<'_>,
    at: usize,
) -> Result<Option<ResultRow>, rusqlite::Error> {
    match row.get::<_, Option<i64>>(at)? {
        Some(_) => result_row(row, at).map(Some),
        None => Ok(None),
    }
}

pub(super) fn result_from_row(row: ResultRow) -> Result<TestResult, DatabaseError> {
    Ok(TestResult {
        id: row.id,
        order_id: row.order_id,
        technician_id: row.technician_id,
        value: row.value,
        recorded_at: timestamp::parse("test_results.recorded_at", &row.recorded_at)?,
    })
}
