//! Audit events: every desk operation leaves one row in the event log.
//!
//! RULE: payloads never carry passwords, hashes or tokens.

use crate::types::{EmployeeId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Variants are only ever appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DeskEvent {
    UserSignedUp {
        user_id: UserId,
        employee_id: EmployeeId,
    },
    LoginSucceeded {
        user_id: UserId,
        employee_id: EmployeeId,
    },
    LoginFailed {
        employee_id: EmployeeId,
    },
    IdentityVerified {
        employee_id: EmployeeId,
    },
    PasswordUpdated {
        employee_id: EmployeeId,
    },
    RecordAdded {
        user_id: UserId,
        #[serde(with = "crate::record::date_serde")]
        date: Timestamp,
    },
    TotalsComputed {
        user_id: UserId,
        grand_total_today: u64,
    },
    LeaderboardComputed {
        rows: usize,
    },
}

impl DeskEvent {
    /// Stable name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            DeskEvent::UserSignedUp { .. }        => "user_signed_up",
            DeskEvent::LoginSucceeded { .. }      => "login_succeeded",
            DeskEvent::LoginFailed { .. }         => "login_failed",
            DeskEvent::IdentityVerified { .. }    => "identity_verified",
            DeskEvent::PasswordUpdated { .. }     => "password_updated",
            DeskEvent::RecordAdded { .. }         => "record_added",
            DeskEvent::TotalsComputed { .. }      => "totals_computed",
            DeskEvent::LeaderboardComputed { .. } => "leaderboard_computed",
        }
    }
}

/// One persisted row of the event log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub event_type: String,
    pub payload:    String,
    pub created_at: String,
}
