use rusqlite::{params, Connection};

use super::rows::*;
use crate::db::{timestamp, DatabaseError};
use crate::models::*;

pub fn insert_patient(conn: &Connection, new: &NewPatient) -> Result<Patient, DatabaseError> {
    let created_at = timestamp::now();
    conn.execute(
        "INSERT INTO patients (first_name, last_name, date_of_birth, gender, contact, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new.first_name,
            new.last_name,
            new.date_of_birth,
            new.gender,
            new.contact,
            timestamp::format(&created_at),
        ],
    )?;

    Ok(Patient {
        id: conn.last_insert_rowid(),
        first_name: new.first_name.clone(),
        last_name: new.last_name.clone(),
        date_of_birth: new.date_of_birth.clone(),
        gender: new.gender.clone(),
        contact: new.contact.clone(),
        created_at,
    })
}

pub fn get_patient(conn: &Connection, id: i64) -> Result<Option<Patient>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, date_of_birth, gender, contact, created_at
         FROM patients WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id], |row| patient_row(row, 0));

    match result {
        Ok(row) => Ok(Some(patient_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Patient plus every order, its test type and its result, in one query.
pub fn get_patient_record(conn: &Connection, id: i64) -> Result<Option<PatientRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT p.id, p.first_name, p.last_name, p.date_of_birth, p.gender, p.contact, p.created_at,
                o.id, o.patient_id, o.test_type_id, o.status, o.ordered_at,
                t.id, t.code, t.name, t.description,
                r.id, r.order_id, r.technician_id, r.value, r.recorded_at
         FROM patients p
         LEFT JOIN test_orders o ON o.patient_id = p.id
         LEFT JOIN test_types t ON t.id = o.test_type_id
         LEFT JOIN test_results r ON r.order_id = o.id
         WHERE p.id = ?1
         ORDER BY o.ordered_at DESC, o.id DESC",
    )?;

    let order_at = PATIENT_WIDTH;
    let test_type_at = order_at + ORDER_WIDTH;
    let result_at = test_type_at + TEST_TYPE_WIDTH;

    let rows = stmt.query_map(params![id], |row| {
        let patient = patient_row(row, 0)?;
        let order = match optional_order_row(row, order_at)? {
            Some(order) => Some((order, test_type_row(row, test_type_at)?)),
            None => None,
        };
        let result = optional_result_row(row, result_at)?;
        Ok((patient, order, result))
    })?;

    let mut record: Option<PatientRecord> = None;
    for row in rows {
        let (patient, order, result) = row?;
        if record.is_none() {
            record = Some(PatientRecord {
                patient: patient_from_row(patient)?,
                orders: Vec::new(),
            });
        }
        if let (Some(record), Some((order, test_type))) = (record.as_mut(), order) {
            record.orders.push(PatientOrder {
                order: order_from_row(order)?,
                test_type,
                result: result.map(result_from_row).transpose()?,
            });
        }
    }

    Ok(record)
}

/// Remove a patient. Orders and their results go with it (ON DELETE CASCADE).
/// Returns whether a patient was removed.
pub fn delete_patient(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let deleted = conn.execute("DELETE FROM patients WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}
