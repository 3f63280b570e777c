use rusqlite::{params, Connection, Transaction, TransactionBehavior};

use super::order::{get_order, mark_order_completed};
use super::rows::*;
use crate::db::{timestamp, DatabaseError};
use crate::models::*;

/// Raw insert. Callers go through [`record_result`] so the order status
/// moves with it; a second row for the same order fails the UNIQUE
/// constraint on `order_id`.
pub fn insert_result(
    conn: &Connection,
    order_id: i64,
    technician_id: i64,
    value: &str,
) -> Result<TestResult, DatabaseError> {
    let recorded_at = timestamp::now();
    conn.execute(
        "INSERT INTO test_results (order_id, technician_id, value, recorded_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![order_id, technician_id, value, timestamp::format(&recorded_at)],
    )?;

    Ok(TestResult {
        id: conn.last_insert_rowid(),
        order_id,
        technician_id,
        value: value.to_string(),
        recorded_at,
    })
}

pub fn get_result_for_order(conn: &Connection, order_id: i64) -> Result<Option<TestResult>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, order_id, technician_id, value, recorded_at
         FROM test_results WHERE order_id = ?1",
    )?;

    let result = stmt.query_row(params![order_id], |row| result_row(row, 0));

    match result {
        Ok(row) => Ok(Some(result_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Record the result for a Pending order and mark it Completed.
///
/// The insert and the status change commit together; any error rolls both
/// back. Fails with `NotFound` for an unknown order and
/// `OrderAlreadyCompleted` when the order already has its result. An
/// unknown technician fails on the foreign key.
///
/// The transaction takes the write lock up front, so concurrent calls on
/// the same order queue on the busy timeout and the later one sees the
/// order Completed.
pub fn record_result(
    conn: &Connection,
    order_id: i64,
    technician_id: i64,
    value: &str,
) -> Result<TestResult, DatabaseError> {
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    let order = get_order(&tx, order_id)?
        .ok_or_else(|| DatabaseError::not_found("TestOrder", order_id))?;
    if order.status == OrderStatus::Completed {
        tracing::warn!(order_id, "Rejected result for completed order");
        return Err(DatabaseError::OrderAlreadyCompleted { order_id });
    }

    let result = insert_result(&tx, order_id, technician_id, value)?;

    // Another writer may have completed the order since the read above.
    if !mark_order_completed(&tx, order_id)? {
        return Err(DatabaseError::OrderAlreadyCompleted { order_id });
    }

    tx.commit()?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::insert_order;
    use crate::db::repository::testing::*;
    use crate::db::sqlite::{open_connection, open_database, open_memory_database};
    use std::sync::{Arc, Barrier};
    use std::thread;

    #[test]
    fn record_completes_pending_order() {
        let conn = open_memory_database().unwrap();
        let (order, tech) = make_pending_order(&conn);

        let result = record_result(&conn, order.id, tech.id, "Hb: 13.8 g/dL").unwrap();
        assert_eq!(result.order_id, order.id);
        assert_eq!(result.technician_id, tech.id);
        assert_eq!(result.value, "Hb: 13.8 g/dL");

        let reloaded = get_order(&conn, order.id).unwrap().unwrap();
        assert_eq!(reloaded.status, OrderStatus::Completed);
        assert_eq!(get_result_for_order(&conn, order.id).unwrap().unwrap(), result);
    }

    #[test]
    fn second_record_is_rejected() {
        let conn = open_memory_database().unwrap();
        let (order, tech) = make_pending_order(&conn);
        record_result(&conn, order.id, tech.id, "first").unwrap();

        match record_result(&conn, order.id, tech.id, "second") {
            Err(DatabaseError::OrderAlreadyCompleted { order_id }) => assert_eq!(order_id, order.id),
            other => panic!("Expected OrderAlreadyCompleted, got: {other:?}"),
        }
        assert_eq!(get_result_for_order(&conn, order.id).unwrap().unwrap().value, "first");
    }

    #[test]
    fn unknown_order_is_not_found() {
        let conn = open_memory_database().unwrap();
        let (_, tech) = make_pending_order(&conn);

        match record_result(&conn, 999, tech.id, "value") {
            Err(DatabaseError::NotFound { entity_type, id }) => {
                assert_eq!(entity_type, "TestOrder");
                assert_eq!(id, "999");
            }
            other => panic!("Expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn unknown_technician_rolls_back() {
        let conn = open_memory_database().unwrap();
        let (order, tech) = make_pending_order(&conn);

        let err = record_result(&conn, order.id, tech.id + 50, "value").unwrap_err();
        assert!(err.is_foreign_key_violation(), "Expected FK violation, got: {err}");

        let reloaded = get_order(&conn, order.id).unwrap().unwrap();
        assert_eq!(reloaded.status, OrderStatus::Pending);
        assert!(get_result_for_order(&conn, order.id).unwrap().is_none());
    }

    #[test]
    fn unique_order_reference_backstops_double_insert() {
        let conn = open_memory_database().unwrap();
        let (order, tech) = make_pending_order(&conn);
        insert_result(&conn, order.id, tech.id, "first").unwrap();

        let err = insert_result(&conn, order.id, tech.id, "second").unwrap_err();
        assert!(err.is_unique_violation(), "Expected unique violation, got: {err}");
    }

    #[test]
    fn concurrent_records_on_one_order_serialize() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lab.db");
        let setup = open_database(&path).unwrap();

        let patient = make_patient(&setup, "Amina");
        let tech = make_technician(&setup, "Grace W.");

        for round in 0..20 {
            let test_type = make_test_type(&setup, &format!("T{round}"));
            let order = insert_order(&setup, patient.id, test_type.id).unwrap();
            let (order_id, technician_id) = (order.id, tech.id);
            let barrier = Arc::new(Barrier::new(2));

            let handles: Vec<_> = ["first", "second"]
                .into_iter()
                .map(|value| {
                    let path = path.clone();
                    let barrier = Arc::clone(&barrier);
                    thread::spawn(move || {
                        let conn = open_connection(&path).unwrap();
                        barrier.wait();
                        record_result(&conn, order_id, technician_id, value)
                    })
                })
                .collect();

            let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            let recorded = outcomes.iter().filter(|o| o.is_ok()).count();
            assert_eq!(recorded, 1, "Exactly one call should record: {outcomes:?}");

            for outcome in outcomes.iter().filter(|o| o.is_err()) {
                match outcome {
                    Err(DatabaseError::OrderAlreadyCompleted { order_id }) => assert_eq!(*order_id, order.id),
                    other => panic!("Expected OrderAlreadyCompleted, got: {other:?}"),
                }
            }
            assert_eq!(get_order(&setup, order.id).unwrap().unwrap().status, OrderStatus::Completed);
        }
    }
}
