use chrono::NaiveDateTime;
use rusqlite::{params, Connection};

use super::rows::*;
use crate::db::{timestamp, DatabaseError};
use crate::models::*;

/// Orders placed within `[start, end]`, both ends inclusive. Bounds finer
/// than the stored microseconds are narrowed, never widened.
pub fn count_orders_between(
    conn: &Connection,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
) -> Result<i64, DatabaseError> {
    let count = conn.query_row(
        "SELECT COUNT(id) FROM test_orders WHERE ordered_at >= ?1 AND ordered_at <= ?2",
        params![timestamp::format_lower_bound(start), timestamp::format(end)],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(count)
}

/// Test types ranked by how many orders reference them. Equal counts rank
/// by test type id, lowest first. Test types never ordered are left out.
pub fn most_requested_tests(conn: &Connection, limit: u32) -> Result<Vec<TestTypeCount>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.code, t.name, COUNT(o.id) AS order_count
         FROM test_types t
         JOIN test_orders o ON o.test_type_id = t.id
         GROUP BY t.id
         ORDER BY order_count DESC, t.id ASC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        Ok(TestTypeCount {
            test_type_id: row.get(0)?,
            code: row.get(1)?,
            name: row.get(2)?,
            order_count: row.get(3)?,
        })
    })?;

    let mut counts = Vec::new();
    for row in rows {
        counts.push(row?);
    }
    Ok(counts)
}

/// Results recorded by one technician, each with its order and test type.
/// Most recent first.
pub fn results_by_technician(conn: &Connection, technician_id: i64) -> Result<Vec<TechnicianResult>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT r.id, r.order_id, r.technician_id, r.value, r.recorded_at,
                o.id, o.patient_id, o.test_type_id, o.status, o.ordered_at,
                t.id, t.code, t.name, t.description
         FROM test_results r
         JOIN test_orders o ON o.id = r.order_id
         JOIN test_types t ON t.id = o.test_type_id
         WHERE r.technician_id = ?1
         ORDER BY r.recorded_at DESC, r.id DESC",
    )?;

    let order_at = RESULT_WIDTH;
    let test_type_at = order_at + ORDER_WIDTH;

    let rows = stmt.query_map(params![technician_id], |row| {
        Ok((
            result_row(row, 0)?,
            order_row(row, order_at)?,
            test_type_row(row, test_type_at)?,
        ))
    })?;

    let mut results = Vec::new();
    for row in rows {
        let (result, order, test_type) = row?;
        results.push(TechnicianResult {
            result: result_from_row(result)?,
            order: order_from_row(order)?,
            test_type,
        });
    }
    Ok(results)
}
