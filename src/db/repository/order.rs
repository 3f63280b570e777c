use rusqlite::{params, Connection};

use super::rows::*;
use crate::db::{timestamp, DatabaseError};
use crate::models::*;

/// Place a Pending order. Unknown patient or test type ids fail on the
/// foreign keys.
pub fn insert_order(conn: &Connection, patient_id: i64, test_type_id: i64) -> Result<TestOrder, DatabaseError> {
    let ordered_at = timestamp::now();
    let status = OrderStatus::Pending;
    conn.execute(
        "INSERT INTO test_orders (patient_id, test_type_id, status, ordered_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![patient_id, test_type_id, status.as_str(), timestamp::format(&ordered_at)],
    )?;

    Ok(TestOrder {
        id: conn.last_insert_rowid(),
        patient_id,
        test_type_id,
        status,
        ordered_at,
    })
}

pub fn get_order(conn: &Connection, id: i64) -> Result<Option<TestOrder>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_id, test_type_id, status, ordered_at
         FROM test_orders WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id], |row| order_row(row, 0));

    match result {
        Ok(row) => Ok(Some(order_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Orders with patient and test type joined, most recent first.
/// `None` lists every status.
pub fn list_orders(conn: &Connection, status: Option<OrderStatus>) -> Result<Vec<OrderDetail>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT o.id, o.patient_id, o.test_type_id, o.status, o.ordered_at,
                p.id, p.first_name, p.last_name, p.date_of_birth, p.gender, p.contact, p.created_at,
                t.id, t.code, t.name, t.description
         FROM test_orders o
         JOIN patients p ON p.id = o.patient_id
         JOIN test_types t ON t.id = o.test_type_id
         WHERE ?1 IS NULL OR o.status = ?1
         ORDER BY o.ordered_at DESC, o.id DESC",
    )?;

    let patient_at = ORDER_WIDTH;
    let test_type_at = patient_at + PATIENT_WIDTH;

    let rows = stmt.query_map(params![status.map(|s| s.as_str())], |row| {
        Ok((
            order_row(row, 0)?,
            patient_row(row, patient_at)?,
            test_type_row(row, test_type_at)?,
        ))
    })?;

    let mut orders = Vec::new();
    for row in rows {
        let (order, patient, test_type) = row?;
        orders.push(OrderDetail {
            order: order_from_row(order)?,
            patient: patient_from_row(patient)?,
            test_type,
        });
    }
    Ok(orders)
}

/// Flip a Pending order to Completed. Returns false when the order is
/// missing or was already Completed, leaving it untouched.
pub fn mark_order_completed(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let updated = conn.execute(
        "UPDATE test_orders SET status = ?1 WHERE id = ?2 AND status = ?3",
        params![
            OrderStatus::Completed.as_str(),
            id,
            OrderStatus::Pending.as_str(),
        ],
    )?;
    Ok(updated > 0)
}
