//! Aggregation engine: per-user multi-window totals and the cross-user
//! monthly leaderboard.
//!
//! Both entry points are pure: they take a snapshot already fetched from the
//! store plus the reference instant, and never fail.

use crate::{
    record::CallRecord,
    totals::{reduce, reduce_current_month, Totals},
    types::{EmployeeId, Timestamp},
    window::windows,
};
use serde::{Deserialize, Serialize};

/// Today-so-far, week-so-far and whole-month totals for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub today: Totals,
    pub week: Totals,
    pub month: Totals,
}

/// Public identity fields of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    #[serde(rename = "employeeID")]
    pub employee_id: EmployeeId,
}

/// One user's identity with their full record history.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecords {
    pub identity: Identity,
    pub records: Vec<CallRecord>,
}

/// A leaderboard row: identity and current-month totals, flattened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(flatten)]
    pub totals: Totals,
}

/// Each window is a fresh filter+fold over the full history.
pub fn summarize(records: &[CallRecord], now: Timestamp) -> PeriodTotals {
    let w = windows(now);
    let summary = PeriodTotals {
        today: reduce(records, &w.day),
        week: reduce(records, &w.week),
        month: reduce(records, &w.month),
    };
    log::debug!(
        "summarize: {} records -> today={} week={} month={}",
        records.len(),
        summary.today.grand_total,
        summary.week.grand_total,
        summary.month.grand_total
    );
    summary
}

/// Current-month totals for every user, in input order. No ranking.
pub fn leaderboard(users: &[UserRecords], now: Timestamp) -> Vec<LeaderboardRow> {
    users
        .iter()
        .map(|user| LeaderboardRow {
            identity: user.identity.clone(),
            totals: reduce_current_month(&user.records, now),
        })
        .collect()
}
