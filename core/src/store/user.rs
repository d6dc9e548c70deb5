//! Store methods for desk users.

use crate::{
    error::{DeskError, DeskResult},
    user::{User, UserProfile},
};
use rusqlite::{params, ErrorCode, OptionalExtension, Row};

use super::DeskStore;

const USER_COLUMNS: &str = "user_id, name, employee_id, password_hash, dob";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        user_id:       row.get(0)?,
        name:          row.get(1)?,
        employee_id:   row.get(2)?,
        password_hash: row.get(3)?,
        dob:           row.get(4)?,
    })
}

impl DeskStore {
    /// Insert a new user. A taken employee id is reported as `DuplicateEmployee`.
    pub fn insert_user(&self, user: &User, created_at: &str) -> DeskResult<()> {
        let result = self.conn.execute(
            "INSERT INTO app_user (user_id, name, employee_id, password_hash, dob, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                &user.user_id,
                &user.name,
                &user.employee_id,
                &user.password_hash,
                &user.dob,
                created_at,
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(DeskError::DuplicateEmployee {
                    employee_id: user.employee_id.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn user_by_id(&self, user_id: &str) -> DeskResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM app_user WHERE user_id = ?1"),
                params![user_id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    pub fn user_by_employee_id(&self, employee_id: &str) -> DeskResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM app_user WHERE employee_id = ?1"),
                params![employee_id],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Match on both employee id and date of birth (password recovery check).
    pub fn user_by_employee_and_dob(
        &self,
        employee_id: &str,
        dob: &str,
    ) -> DeskResult<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!(
                    "SELECT {USER_COLUMNS} FROM app_user WHERE employee_id = ?1 AND dob = ?2"
                ),
                params![employee_id, dob],
                user_from_row,
            )
            .optional()?;
        Ok(user)
    }

    /// Returns false when no user has this employee id.
    pub fn update_password_hash(&self, employee_id: &str, password_hash: &str) -> DeskResult<bool> {
        let changed = self.conn.execute(
            "UPDATE app_user SET password_hash = ?1 WHERE employee_id = ?2",
            params![password_hash, employee_id],
        )?;
        Ok(changed > 0)
    }

    /// Every user's public profile, in sign-up order.
    pub fn all_profiles(&self) -> DeskResult<Vec<UserProfile>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, employee_id, dob FROM app_user ORDER BY rowid ASC")?;
        let profiles = stmt
            .query_map([], |row| {
                Ok(UserProfile {
                    name:        row.get(0)?,
                    employee_id: row.get(1)?,
                    dob:         row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(profiles)
    }

    pub fn user_count(&self) -> DeskResult<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM app_user", [], |row| row.get(0))?;
        Ok(count)
    }
}
