//! Call-outcome records. The only thing employees ever write.
//!
//! A record is immutable once appended. Every counter is optional on the wire;
//! readers go through `field_or_zero` so an absent counter never fails a fold.

use crate::types::Timestamp;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Storage / wire format for record dates.
pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallRecord {
    #[serde(with = "date_serde")]
    pub date: Timestamp,
    #[serde(rename = "fileName", default)]
    pub file_name: Option<String>,
    #[serde(rename = "companyIVR", default)]
    pub company_ivr: Option<u64>,
    #[serde(rename = "directDial", default)]
    pub direct_dial: Option<u64>,
    #[serde(rename = "rpcVM", default)]
    pub rpc_vm: Option<u64>,
    #[serde(rename = "notVerified", default)]
    pub not_verified: Option<u64>,
}

impl CallRecord {
    /// A record with every counter absent.
    pub fn at(date: Timestamp) -> Self {
        Self {
            date,
            file_name: None,
            company_ivr: None,
            direct_dial: None,
            rpc_vm: None,
            not_verified: None,
        }
    }

    pub fn with(mut self, outcome: Outcome, count: u64) -> Self {
        let slot = match outcome {
            Outcome::CompanyIvr => &mut self.company_ivr,
            Outcome::DirectDial => &mut self.direct_dial,
            Outcome::RpcVm => &mut self.rpc_vm,
            Outcome::NotVerified => &mut self.not_verified,
        };
        *slot = Some(count);
        self
    }

    pub fn file_name(mut self, name: &str) -> Self {
        self.file_name = Some(name.to_string());
        self
    }
}

/// The four categorical counters a record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    CompanyIvr,
    DirectDial,
    RpcVm,
    NotVerified,
}

impl Outcome {
    pub const ALL: [Outcome; 4] = [
        Outcome::CompanyIvr,
        Outcome::DirectDial,
        Outcome::RpcVm,
        Outcome::NotVerified,
    ];
}

/// Read one counter, defaulting an absent value to 0.
pub fn field_or_zero(record: &CallRecord, outcome: Outcome) -> u64 {
    let value = match outcome {
        Outcome::CompanyIvr => record.company_ivr,
        Outcome::DirectDial => record.direct_dial,
        Outcome::RpcVm => record.rpc_vm,
        Outcome::NotVerified => record.not_verified,
    };
    value.unwrap_or(0)
}

/// Parse a record date as clients send it.
///
/// Accepts RFC 3339 with an offset (converted to the local calendar), a naive
/// date-time with or without fractional seconds, or a bare date (midnight).
pub fn parse_record_date(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in [
        DATE_FORMAT,
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn format_record_date(date: &Timestamp) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) mod date_serde {
    use super::{format_record_date, parse_record_date};
    use crate::types::Timestamp;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Timestamp, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format_record_date(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(d)?;
        parse_record_date(&raw).ok_or_else(|| D::Error::custom(format!("invalid date '{raw}'")))
    }
}
