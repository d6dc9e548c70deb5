//! Shared primitive types used across the desk.

use chrono::NaiveDateTime;

/// A calendar-local wall-clock instant. Record dates and "now" share one calendar.
pub type Timestamp = NaiveDateTime;

/// Internal, stable identifier of a user row (uuid v4).
pub type UserId = String;

/// The employee number users log in with. Unique per desk.
pub type EmployeeId = String;
