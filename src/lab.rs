//! Lab operations.
//!
//! Each function opens its own session from the [`SessionFactory`], does
//! one unit of work and drops the session before returning, on success and
//! on error alike. No transaction spans two calls.

use chrono::NaiveDateTime;

use crate::db::{self, DatabaseError, SessionFactory};
use crate::models::*;

// ═══════════════════════════════════════════════════════════
// Patients
// ═══════════════════════════════════════════════════════════

pub fn create_patient(sessions: &SessionFactory, patient: &NewPatient) -> Result<Patient, DatabaseError> {
    let conn = sessions.open_session()?;
    let created = db::insert_patient(&conn, patient)?;
    tracing::info!(patient_id = created.id, "Patient registered");
    Ok(created)
}

/// `Ok(None)` for an unknown id.
pub fn get_patient(sessions: &SessionFactory, patient_id: i64) -> Result<Option<PatientRecord>, DatabaseError> {
    let conn = sessions.open_session()?;
    let record = db::get_patient_record(&conn, patient_id)?;
    tracing::debug!(patient_id, found = record.is_some(), "Patient lookup");
    Ok(record)
}

/// Removes the patient with all of their orders and results.
pub fn delete_patient(sessions: &SessionFactory, patient_id: i64) -> Result<bool, DatabaseError> {
    let conn = sessions.open_session()?;
    let deleted = db::delete_patient(&conn, patient_id)?;
    if deleted {
        tracing::info!(patient_id, "Patient deleted with orders and results");
    }
    Ok(deleted)
}

// ═══════════════════════════════════════════════════════════
// Technicians
// ═══════════════════════════════════════════════════════════

pub fn create_technician(sessions: &SessionFactory, technician: &NewTechnician) -> Result<Technician, DatabaseError> {
    let conn = sessions.open_session()?;
    let created = db::insert_technician(&conn, technician)?;
    tracing::info!(technician_id = created.id, "Technician registered");
    Ok(created)
}

pub fn get_technician(sessions: &SessionFactory, technician_id: i64) -> Result<Option<Technician>, DatabaseError> {
    let conn = sessions.open_session()?;
    db::get_technician(&conn, technician_id)
}

// ═══════════════════════════════════════════════════════════
// Test catalog
// ═══════════════════════════════════════════════════════════

/// A duplicate code surfaces as the store's UNIQUE violation
/// (see [`DatabaseError::is_unique_violation`]).
pub fn create_test_type(sessions: &SessionFactory, test_type: &NewTestType) -> Result<TestType, DatabaseError> {
    let conn = sessions.open_session()?;
    let created = db::insert_test_type(&conn, test_type)?;
    tracing::info!(test_type_id = created.id, code = %created.code, "Test type added");
    Ok(created)
}

pub fn get_test_type_by_code(sessions: &SessionFactory, code: &str) -> Result<Option<TestType>, DatabaseError> {
    let conn = sessions.open_session()?;
    db::get_test_type_by_code(&conn, code)
}

// ═══════════════════════════════════════════════════════════
// Orders
// ═══════════════════════════════════════════════════════════

/// Unknown ids surface as the store's FOREIGN KEY violation
/// (see [`DatabaseError::is_foreign_key_violation`]).
pub fn order_test(sessions: &SessionFactory, patient_id: i64, test_type_id: i64) -> Result<TestOrder, DatabaseError> {
    let conn = sessions.open_session()?;
    let order = db::insert_order(&conn, patient_id, test_type_id)?;
    tracing::info!(order_id = order.id, patient_id, test_type_id, "Test ordered");
    Ok(order)
}

pub fn get_order(sessions: &SessionFactory, order_id: i64) -> Result<Option<TestOrder>, DatabaseError> {
    let conn = sessions.open_session()?;
    db::get_order(&conn, order_id)
}

pub fn list_orders(sessions: &SessionFactory, status: Option<OrderStatus>) -> Result<Vec<OrderDetail>, DatabaseError> {
    let conn = sessions.open_session()?;
    let orders = db::list_orders(&conn, status)?;
    tracing::debug!(?status, count = orders.len(), "Listed orders");
    Ok(orders)
}

// ═══════════════════════════════════════════════════════════
// Results
// ═══════════════════════════════════════════════════════════

pub fn record_result(
    sessions: &SessionFactory,
    order_id: i64,
    technician_id: i64,
    value: &str,
) -> Result<TestResult, DatabaseError> {
    let conn = sessions.open_session()?;
    let result = db::record_result(&conn, order_id, technician_id, value)?;
    tracing::info!(order_id, technician_id, result_id = result.id, "Result recorded, order completed");
    Ok(result)
}

// ═══════════════════════════════════════════════════════════
// Reports
// ═══════════════════════════════════════════════════════════

pub fn total_tests_between(
    sessions: &SessionFactory,
    start: &NaiveDateTime,
    end: &NaiveDateTime,
) -> Result<i64, DatabaseError> {
    let conn = sessions.open_session()?;
    db::count_orders_between(&conn, start, end)
}

pub fn most_requested_tests(sessions: &SessionFactory, limit: u32) -> Result<Vec<TestTypeCount>, DatabaseError> {
    let conn = sessions.open_session()?;
    db::most_requested_tests(&conn, limit)
}

pub fn tests_by_technician(sessions: &SessionFactory, technician_id: i64) -> Result<Vec<TechnicianResult>, DatabaseError> {
    let conn = sessions.open_session()?;
    db::results_by_technician(&conn, technician_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseConfig;
    use chrono::Duration;
    use tempfile::TempDir;

    fn lab() -> (TempDir, SessionFactory) {
        let dir = tempfile::tempdir().unwrap();
        let sessions = SessionFactory::new(DatabaseConfig::new(dir.path().join("lab.db")));
        sessions.bootstrap().unwrap();
        (dir, sessions)
    }

    fn fatuma() -> NewPatient {
        NewPatient {
            first_name: "Fatuma".into(),
            last_name: "Ali".into(),
            date_of_birth: Some("2000-01-01".into()),
            gender: Some("F".into()),
            contact: Some("+254700000099".into()),
        }
    }

    #[test]
    fn create_patient_keeps_supplied_fields() {
        let (_dir, sessions) = lab();
        let patient = create_patient(&sessions, &fatuma()).unwrap();

        assert!(patient.id > 0);
        assert_eq!(patient.first_name, "Fatuma");
        assert_eq!(patient.last_name, "Ali");
        assert_eq!(patient.date_of_birth.as_deref(), Some("2000-01-01"));
        assert_eq!(patient.gender.as_deref(), Some("F"));
        assert_eq!(patient.contact.as_deref(), Some("+254700000099"));

        let record = get_patient(&sessions, patient.id).unwrap().unwrap();
        assert_eq!(record.patient, patient);
    }

    #[test]
    fn get_patient_unknown_id_is_none() {
        let (_dir, sessions) = lab();
        assert!(get_patient(&sessions, 12345).unwrap().is_none());
    }

    #[test]
    fn order_test_requires_existing_references() {
        let (_dir, sessions) = lab();
        let patient = create_patient(&sessions, &fatuma()).unwrap();
        let lft = create_test_type(&sessions, &NewTestType::new("LFT", "Liver Function Test")).unwrap();

        assert!(order_test(&sessions, patient.id + 1, lft.id).unwrap_err().is_foreign_key_violation());
        assert!(order_test(&sessions, patient.id, lft.id + 1).unwrap_err().is_foreign_key_violation());

        let order = order_test(&sessions, patient.id, lft.id).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(get_order(&sessions, order.id).unwrap().unwrap(), order);
    }

    #[test]
    fn record_result_is_not_repeatable() {
        let (_dir, sessions) = lab();
        let patient = create_patient(&sessions, &fatuma()).unwrap();
        let lft = create_test_type(&sessions, &NewTestType::new("LFT", "Liver Function Test")).unwrap();
        let tech = create_technician(&sessions, &NewTechnician::new("Demo Tech")).unwrap();
        let order = order_test(&sessions, patient.id, lft.id).unwrap();

        record_result(&sessions, order.id, tech.id, "ALT: 25 U/L; AST: 30 U/L").unwrap();
        assert_eq!(get_order(&sessions, order.id).unwrap().unwrap().status, OrderStatus::Completed);

        let err = record_result(&sessions, order.id, tech.id, "ALT: 26 U/L").unwrap_err();
        assert!(matches!(err, DatabaseError::OrderAlreadyCompleted { order_id } if order_id == order.id));
    }

    #[test]
    fn completed_filter_is_subset_of_full_listing() {
        let (_dir, sessions) = lab();
        let patient = create_patient(&sessions, &fatuma()).unwrap();
        let cbc = create_test_type(&sessions, &NewTestType::new("CBC", "Complete Blood Count")).unwrap();
        let tech = create_technician(&sessions, &NewTechnician::new("Grace W.")).unwrap();

        let orders: Vec<_> = (0..4)
            .map(|_| order_test(&sessions, patient.id, cbc.id).unwrap())
            .collect();
        record_result(&sessions, orders[1].id, tech.id, "a").unwrap();
        record_result(&sessions, orders[3].id, tech.id, "b").unwrap();

        let all = list_orders(&sessions, None).unwrap();
        assert_eq!(all.len(), 4);
        assert!(all
            .windows(2)
            .all(|w| w[0].order.ordered_at >= w[1].order.ordered_at));

        let completed = list_orders(&sessions, Some(OrderStatus::Completed)).unwrap();
        assert_eq!(completed.len(), 2);
        assert!(completed.iter().all(|o| o.order.status == OrderStatus::Completed));
        assert!(completed
            .iter()
            .all(|c| all.iter().any(|a| a.order.id == c.order.id)));
    }

    #[test]
    fn duplicate_test_type_code_fails_second_create() {
        let (_dir, sessions) = lab();
        create_test_type(&sessions, &NewTestType::new("CBC", "Complete Blood Count")).unwrap();
        let err = create_test_type(&sessions, &NewTestType::new("CBC", "Blood Count")).unwrap_err();
        assert!(err.is_unique_violation());

        let stored = get_test_type_by_code(&sessions, "CBC").unwrap().unwrap();
        assert_eq!(stored.name, "Complete Blood Count");
    }

    #[test]
    fn most_requested_returns_top_two_of_three() {
        let (_dir, sessions) = lab();
        let patient = create_patient(&sessions, &fatuma()).unwrap();
        let a = create_test_type(&sessions, &NewTestType::new("A", "Alpha")).unwrap();
        let b = create_test_type(&sessions, &NewTestType::new("B", "Beta")).unwrap();
        let c = create_test_type(&sessions, &NewTestType::new("C", "Gamma")).unwrap();
        for (test_type, n) in [(&c, 1), (&a, 5), (&b, 3)] {
            for _ in 0..n {
                order_test(&sessions, patient.id, test_type.id).unwrap();
            }
        }

        let top = most_requested_tests(&sessions, 2).unwrap();
        let ranked: Vec<_> = top.iter().map(|t| (t.test_type_id, t.order_count)).collect();
        assert_eq!(ranked, vec![(a.id, 5), (b.id, 3)]);
    }

    #[test]
    fn totals_and_technician_report() {
        let (_dir, sessions) = lab();
        let patient = create_patient(&sessions, &fatuma()).unwrap();
        let cbc = create_test_type(&sessions, &NewTestType::new("CBC", "Complete Blood Count")).unwrap();
        let tech = create_technician(&sessions, &NewTechnician::new("Grace W.")).unwrap();
        let first = order_test(&sessions, patient.id, cbc.id).unwrap();
        let second = order_test(&sessions, patient.id, cbc.id).unwrap();
        record_result(&sessions, second.id, tech.id, "Hb: 13.8 g/dL").unwrap();

        let start = first.ordered_at - Duration::minutes(1);
        let end = second.ordered_at + Duration::minutes(1);
        assert_eq!(total_tests_between(&sessions, &start, &end).unwrap(), 2);
        assert_eq!(total_tests_between(&sessions, &end, &(end + Duration::minutes(1))).unwrap(), 0);

        let work = tests_by_technician(&sessions, tech.id).unwrap();
        assert_eq!(work.len(), 1);
        assert_eq!(work[0].order.id, second.id);
        assert_eq!(work[0].test_type.code, "CBC");
    }

    #[test]
    fn order_to_result_scenario() {
        let (_dir, sessions) = lab();
        let patient = create_patient(&sessions, &fatuma()).unwrap();
        let test_type = create_test_type(&sessions, &NewTestType::new("LFT", "Liver Function Test")).unwrap();
        let tech = create_technician(&sessions, &NewTechnician::new("Demo Tech")).unwrap();

        let order = order_test(&sessions, patient.id, test_type.id).unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        record_result(&sessions, order.id, tech.id, "ALT: 25 U/L; AST: 30 U/L").unwrap();

        let record = get_patient(&sessions, patient.id).unwrap().unwrap();
        assert_eq!(record.orders.len(), 1);
        assert_eq!(record.orders[0].order.status, OrderStatus::Completed);
        assert_eq!(
            record.orders[0].result.as_ref().map(|r| r.value.as_str()),
            Some("ALT: 25 U/L; AST: 30 U/L")
        );
    }

    #[test]
    fn delete_patient_removes_record() {
        let (_dir, sessions) = lab();
        let patient = create_patient(&sessions, &fatuma()).unwrap();
        let cbc = create_test_type(&sessions, &NewTestType::new("CBC", "Complete Blood Count")).unwrap();
        let order = order_test(&sessions, patient.id, cbc.id).unwrap();

        assert!(delete_patient(&sessions, patient.id).unwrap());
        assert!(get_patient(&sessions, patient.id).unwrap().is_none());
        assert!(get_order(&sessions, order.id).unwrap().is_none());
        assert!(!delete_patient(&sessions, patient.id).unwrap());
    }

    #[test]
    fn operations_fail_cleanly_on_missing_schema() {
        let dir = tempfile::tempdir().unwrap();
        let sessions = SessionFactory::new(DatabaseConfig::new(dir.path().join("empty.db")));
        let err = create_technician(&sessions, &NewTechnician::new("Grace W.")).unwrap_err();
        assert!(matches!(err, DatabaseError::Sqlite(_)));
        // The failed call released its session; bootstrapping still works.
        sessions.bootstrap().unwrap();
        assert!(create_technician(&sessions, &NewTechnician::new("Grace W.")).is_ok());
    }
}
