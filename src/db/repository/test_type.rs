use rusqlite::{params, Connection};

use super::rows::*;
use crate::db::DatabaseError;
use crate::models::*;

/// Duplicate codes are left to the UNIQUE constraint.
pub fn insert_test_type(conn: &Connection, new: &NewTestType) -> Result<TestType, DatabaseError> {
    conn.execute(
        "INSERT INTO test_types (code, name, description) VALUES (?1, ?2, ?3)",
        params![new.code, new.name, new.description],
    )?;

    Ok(TestType {
        id: conn.last_insert_rowid(),
        code: new.code.clone(),
        name: new.name.clone(),
        description: new.description.clone(),
    })
}

pub fn get_test_type(conn: &Connection, id: i64) -> Result<Option<TestType>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, code, name, description FROM test_types WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id], |row| test_type_row(row, 0));

    match result {
        Ok(test_type) => Ok(Some(test_type)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_test_type_by_code(conn: &Connection, code: &str) -> Result<Option<TestType>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, code, name, description FROM test_types WHERE code = ?1",
    )?;

    let result = stmt.query_row(params![code], |row| test_type_row(row, 0));

    match result {
        Ok(test_type) => Ok(Some(test_type)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
