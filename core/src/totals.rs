//! Totals reducer: filter a record history and fold it into sums,
//! a direct-dial percentage and a productivity ratio.
//!
//! RULES:
//!   - An absent counter counts as 0; a record is never rejected.
//!   - When grandTotal is 0 the ratios divide by 1 instead, so an empty
//!     window reports 0 / 0 and never NaN.
//!   - No rounding. Callers get full f64 precision.

use crate::{
    record::{field_or_zero, CallRecord, Outcome},
    types::Timestamp,
    window::{in_interval, is_current_calendar_month, Interval},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(rename = "companyIVR")]
    pub company_ivr: u64,
    #[serde(rename = "directDial")]
    pub direct_dial: u64,
    #[serde(rename = "rpcVM")]
    pub rpc_vm: u64,
    #[serde(rename = "notVerified")]
    pub not_verified: u64,
    #[serde(rename = "grandTotal")]
    pub grand_total: u64,
    pub percentage: f64,
    pub productivity: f64,
}

impl Totals {
    /// Fold already-filtered records into totals.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CallRecord>,
    {
        let mut totals = Totals::default();
        for record in records {
            for outcome in Outcome::ALL {
                totals.add(outcome, field_or_zero(record, outcome));
            }
        }
        totals.finish()
    }

    fn add(&mut self, outcome: Outcome, count: u64) {
        let slot = match outcome {
            Outcome::CompanyIvr => &mut self.company_ivr,
            Outcome::DirectDial => &mut self.direct_dial,
            Outcome::RpcVm => &mut self.rpc_vm,
            Outcome::NotVerified => &mut self.not_verified,
        };
        *slot = slot.saturating_add(count);
    }

    /// Derive grandTotal and the two ratios from the four sums.
    fn finish(mut self) -> Self {
        self.grand_total = self
            .company_ivr
            .saturating_add(self.direct_dial)
            .saturating_add(self.rpc_vm)
            .saturating_add(self.not_verified);
        let denominator = self.grand_total.max(1) as f64;
        self.percentage = self.direct_dial as f64 / denominator * 100.0;
        self.productivity = self.direct_dial.saturating_add(self.rpc_vm) as f64 / denominator;
        self
    }
}

/// Interval mode: keep records dated inside `window` (inclusive).
pub fn reduce(records: &[CallRecord], window: &Interval) -> Totals {
    Totals::from_records(records.iter().filter(|r| in_interval(&r.date, window)))
}

/// Calendar mode: keep records whose calendar year and month equal `now`'s.
/// Used by the cross-user leaderboard.
pub fn reduce_current_month(records: &[CallRecord], now: Timestamp) -> Totals {
    Totals::from_records(
        records
            .iter()
            .filter(|r| is_current_calendar_month(&r.date, now)),
    )
}
