//! Desk users. Only the store builds `User`; everything outside the crate
//! sees the password-free `UserProfile`.

use crate::types::{EmployeeId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id:       UserId,
    pub name:          String,
    pub employee_id:   EmployeeId,
    pub password_hash: String,
    pub dob:           String,
}

/// What `fetch_users` returns: `{name, employeeID, dob}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(rename = "employeeID")]
    pub employee_id: EmployeeId,
    pub dob: String,
}
