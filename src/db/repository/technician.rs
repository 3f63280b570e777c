use rusqlite::{params, Connection};

use super::rows::*;
use crate::db::{timestamp, DatabaseError};
use crate::models::*;

pub fn insert_technician(conn: &Connection, new: &NewTechnician) -> Result<Technician, DatabaseError> {
    let created_at = timestamp::now();
    conn.execute(
        "INSERT INTO technicians (name, role, contact, created_at) VALUES (?1, ?2, ?3, ?4)",
        params![new.name, new.role, new.contact, timestamp::format(&created_at)],
    )?;

    Ok(Technician {
        id: conn.last_insert_rowid(),
        name: new.name.clone(),
        role: new.role.clone(),
        contact: new.contact.clone(),
        created_at,
    })
}

pub fn get_technician(conn: &Connection, id: i64) -> Result<Option<Technician>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, name, role, contact, created_at FROM technicians WHERE id = ?1",
    )?;

    let result = stmt.query_row(params![id], |row| technician_row(row, 0));

    match result {
        Ok(row) => Ok(Some(technician_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
