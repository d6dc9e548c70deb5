//! calldesk-core: call-outcome records and productivity reporting for an
//! employee desk.
//!
//! The aggregation core (`window`, `totals`, `aggregation`) is pure and never
//! fails. Everything around it (accounts, tokens, persistence, the command
//! surface) lives in `service`, `auth`, `store` and `command`.

pub mod aggregation;
pub mod auth;
pub mod clock;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod record;
pub mod service;
pub mod store;
pub mod totals;
pub mod types;
pub mod user;
pub mod window;
