use crate::{
    error::{DeskError, DeskResult},
    record::CallRecord,
    service::{DeskService, SignupRequest},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Every request the desk accepts.
/// Variants are only ever appended.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum DeskCommand {
    // ── Accounts ──────────────────────────────────
    Signup(SignupRequest),
    Login {
        #[serde(rename = "employeeID")]
        employee_id: String,
        password: String,
    },
    ForgotPassword {
        #[serde(rename = "employeeID")]
        employee_id: String,
        dob: String,
    },
    UpdatePassword {
        #[serde(rename = "employeeID")]
        employee_id: String,
        #[serde(rename = "newPassword")]
        new_password: String,
    },
    FetchUsers {
        #[serde(default)]
        token: Option<String>,
    },

    // ── Records ───────────────────────────────────
    AddRecord {
        #[serde(default)]
        token: Option<String>,
        record: CallRecord,
    },
    GetRecords {
        #[serde(default)]
        token: Option<String>,
    },

    // ── Reports ───────────────────────────────────
    Totals {
        #[serde(default)]
        token: Option<String>,
    },
    MonthlyTotals {
        #[serde(default)]
        token: Option<String>,
    },
}

/// Status code plus JSON body, shaped like the HTTP responses clients expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeskResponse {
    pub status: u16,
    pub body:   Value,
}

impl DeskResponse {
    fn ok(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    fn message(status: u16, message: &str) -> Self {
        Self::ok(status, json!({ "message": message }))
    }

    pub fn from_error(err: &DeskError) -> Self {
        Self::message(err.status(), &err.to_string())
    }
}

impl DeskService {
    /// Run one command; failures become error responses rather than `Err`.
    pub fn handle(&self, cmd: DeskCommand) -> DeskResponse {
        self.dispatch(cmd).unwrap_or_else(|e| {
            if e.status() >= 500 {
                log::error!("Command failed: {e}");
            }
            DeskResponse::from_error(&e)
        })
    }

    fn dispatch(&self, cmd: DeskCommand) -> DeskResult<DeskResponse> {
        let response = match cmd {
            DeskCommand::Signup(req) => {
                self.signup(&req)?;
                DeskResponse::message(201, "Signup successful")
            }
            DeskCommand::Login { employee_id, password } => {
                let login = self.login(&employee_id, &password)?;
                DeskResponse::ok(
                    200,
                    json!({
                        "message": "Login successful",
                        "token": login.token,
                        "name": login.name,
                    }),
                )
            }
            DeskCommand::ForgotPassword { employee_id, dob } => {
                let employee_id = self.forgot_password(&employee_id, &dob)?;
                DeskResponse::ok(
                    200,
                    json!({ "message": "User verified", "employeeID": employee_id }),
                )
            }
            DeskCommand::UpdatePassword { employee_id, new_password } => {
                self.update_password(&employee_id, &new_password)?;
                DeskResponse::message(200, "Password updated successfully")
            }
            DeskCommand::FetchUsers { token } => {
                let users = self.fetch_users(token.as_deref())?;
                DeskResponse::ok(200, serde_json::to_value(users)?)
            }
            DeskCommand::AddRecord { token, record } => {
                self.add_record(token.as_deref(), &record)?;
                DeskResponse::message(201, "Record added successfully")
            }
            DeskCommand::GetRecords { token } => {
                let records = self.get_records(token.as_deref())?;
                DeskResponse::ok(200, serde_json::to_value(records)?)
            }
            DeskCommand::Totals { token } => {
                let totals = self.totals(token.as_deref())?;
                DeskResponse::ok(200, serde_json::to_value(totals)?)
            }
            DeskCommand::MonthlyTotals { token } => {
                let rows = self.monthly_totals(token.as_deref())?;
                DeskResponse::ok(200, serde_json::to_value(rows)?)
            }
        };
        Ok(response)
    }
}
