//! Store methods for call-outcome records. Append-only: there is no
//! update or delete path.

use crate::{
    aggregation::{Identity, UserRecords},
    error::DeskResult,
    record::{format_record_date, parse_record_date, CallRecord, DATE_FORMAT},
};
use rusqlite::{params, Row};
use std::collections::HashMap;

use super::DeskStore;

const RECORD_COLUMNS: &str =
    "user_id, date, file_name, company_ivr, direct_dial, rpc_vm, not_verified";

/// SQLite integers are signed. Binding a `u64` above `i64::MAX` fails the
/// insert, and a negative stored value fails the read.
fn counter(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<u64>> {
    row.get(idx)
}

/// Column 0 is the owning user id; the record starts at column 1.
fn record_from_row(row: &Row<'_>) -> rusqlite::Result<(String, CallRecord)> {
    let raw_date: String = row.get(1)?;
    let date = parse_record_date(&raw_date).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            1,
            rusqlite::types::Type::Text,
            format!("record date '{raw_date}' does not match {DATE_FORMAT}").into(),
        )
    })?;
    let record = CallRecord {
        date,
        file_name:    row.get(2)?,
        company_ivr:  counter(row, 3)?,
        direct_dial:  counter(row, 4)?,
        rpc_vm:       counter(row, 5)?,
        not_verified: counter(row, 6)?,
    };
    Ok((row.get(0)?, record))
}

impl DeskStore {
    pub fn append_record(&self, user_id: &str, record: &CallRecord) -> DeskResult<()> {
        self.conn.execute(
            "INSERT INTO call_record (
                user_id, date, file_name, company_ivr, direct_dial, rpc_vm, not_verified
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user_id,
                format_record_date(&record.date),
                &record.file_name,
                record.company_ivr,
                record.direct_dial,
                record.rpc_vm,
                record.not_verified,
            ],
        )?;
        Ok(())
    }

    /// One user's records in insertion order. Unknown users have none.
    pub fn fetch_one(&self, user_id: &str) -> DeskResult<Vec<CallRecord>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM call_record WHERE user_id = ?1 ORDER BY id ASC"
        ))?;
        let records = stmt
            .query_map(params![user_id], record_from_row)?
            .map(|r| r.map(|(_, record)| record))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Every user with their records; users in sign-up order, records in
    /// insertion order.
    pub fn fetch_all(&self) -> DeskResult<Vec<UserRecords>> {
        let mut users_stmt = self.conn.prepare(
            "SELECT user_id, name, employee_id FROM app_user ORDER BY rowid ASC",
        )?;
        let mut users = Vec::new();
        let mut slot_of: HashMap<String, usize> = HashMap::new();
        let rows = users_stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                Identity {
                    name:        row.get(1)?,
                    employee_id: row.get(2)?,
                },
            ))
        })?;
        for row in rows {
            let (user_id, identity) = row?;
            slot_of.insert(user_id, users.len());
            users.push(UserRecords {
                identity,
                records: Vec::new(),
            });
        }

        let mut records_stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM call_record ORDER BY id ASC"
        ))?;
        let records = records_stmt.query_map([], record_from_row)?;
        for row in records {
            let (user_id, record) = row?;
            if let Some(&slot) = slot_of.get(&user_id) {
                users[slot].records.push(record);
            }
        }
        Ok(users)
    }

    pub fn record_count(&self, user_id: &str) -> DeskResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM call_record WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
