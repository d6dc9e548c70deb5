//! The desk service: the request-handling layer around the aggregation core.
//!
//! RULES:
//!   - Each request reads its snapshot from the store once, then hands it to
//!     the pure aggregation functions.
//!   - "Now" always comes from the service clock, never from the caller.
//!   - Every operation appends one audit event.

use crate::{
    aggregation::{leaderboard, summarize, LeaderboardRow, PeriodTotals},
    auth::{hash_password, verify_password, Claims, TokenIssuer},
    clock::{Clock, FixedClock, SystemClock},
    config::DeskConfig,
    error::{DeskError, DeskResult},
    event::DeskEvent,
    record::{format_record_date, CallRecord},
    store::DeskStore,
    types::{EmployeeId, Timestamp},
    user::{User, UserProfile},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    #[serde(rename = "employeeID")]
    pub employee_id: EmployeeId,
    pub password: String,
    pub dob: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub name: String,
}

pub struct DeskService {
    pub store: DeskStore,
    config:    DeskConfig,
    tokens:    TokenIssuer,
    clock:     Box<dyn Clock>,
}

impl DeskService {
    pub fn new(store: DeskStore, config: DeskConfig, clock: Box<dyn Clock>) -> Self {
        let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl_seconds);
        Self {
            store,
            config,
            tokens,
            clock,
        }
    }

    /// Open and migrate the configured database, on the system clock.
    pub fn build(config: DeskConfig) -> DeskResult<Self> {
        let store = DeskStore::open(&config.db_path)?;
        store.migrate()?;
        Ok(Self::new(store, config, Box::new(SystemClock)))
    }

    /// In-memory store, test config, clock pinned at `now`.
    pub fn build_test(now: Timestamp) -> DeskResult<Self> {
        let store = DeskStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(
            store,
            DeskConfig::default_test(),
            Box::new(FixedClock::new(now)),
        ))
    }

    pub fn set_clock(&mut self, clock: Box<dyn Clock>) {
        self.clock = clock;
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    // ── Accounts ───────────────────────────────────────────────

    pub fn signup(&self, req: &SignupRequest) -> DeskResult<()> {
        let user = User {
            user_id:       uuid::Uuid::new_v4().to_string(),
            name:          req.name.clone(),
            employee_id:   req.employee_id.clone(),
            password_hash: hash_password(&req.password)?,
            dob:           req.dob.clone(),
        };
        self.store.insert_user(&user, &self.stamp())?;
        log::info!("Signed up employee {}", user.employee_id);
        self.audit(&DeskEvent::UserSignedUp {
            user_id:     user.user_id,
            employee_id: user.employee_id,
        })
    }

    pub fn login(&self, employee_id: &str, password: &str) -> DeskResult<LoginResponse> {
        let user = match self.store.user_by_employee_id(employee_id)? {
            Some(u) if verify_password(password, &u.password_hash)? => u,
            _ => {
                log::warn!("Failed login for employee {employee_id}");
                self.audit(&DeskEvent::LoginFailed {
                    employee_id: employee_id.to_string(),
                })?;
                return Err(DeskError::InvalidCredentials);
            }
        };
        let token = self.tokens.issue(&user.user_id, &user.name)?;
        self.audit(&DeskEvent::LoginSucceeded {
            user_id:     user.user_id.clone(),
            employee_id: user.employee_id.clone(),
        })?;
        Ok(LoginResponse {
            token,
            name: user.name,
        })
    }

    /// Confirm an employee id / date of birth pair before a password reset.
    pub fn forgot_password(&self, employee_id: &str, dob: &str) -> DeskResult<EmployeeId> {
        let user = self
            .store
            .user_by_employee_and_dob(employee_id, dob)?
            .ok_or(DeskError::IdentityNotVerified)?;
        self.audit(&DeskEvent::IdentityVerified {
            employee_id: user.employee_id.clone(),
        })?;
        Ok(user.employee_id)
    }

    pub fn update_password(&self, employee_id: &str, new_password: &str) -> DeskResult<()> {
        let hash = hash_password(new_password)?;
        if !self.store.update_password_hash(employee_id, &hash)? {
            return Err(DeskError::UserNotFound);
        }
        log::info!("Password updated for employee {employee_id}");
        self.audit(&DeskEvent::PasswordUpdated {
            employee_id: employee_id.to_string(),
        })
    }

    /// Validate a bearer token. Any failure is reported as `Unauthorized`.
    pub fn authenticate(&self, token: Option<&str>) -> DeskResult<Claims> {
        let token = token.ok_or(DeskError::Unauthorized)?;
        self.tokens.validate(token).map_err(|e| {
            log::debug!("Rejected token: {e}");
            DeskError::Unauthorized
        })
    }

    pub fn fetch_users(&self, token: Option<&str>) -> DeskResult<Vec<UserProfile>> {
        self.authenticate(token)?;
        self.store.all_profiles()
    }

    // ── Records ────────────────────────────────────────────────

    pub fn add_record(&self, token: Option<&str>, record: &CallRecord) -> DeskResult<()> {
        let user = self.caller(token)?;
        self.store.append_record(&user.user_id, record)?;
        log::debug!(
            "Record {} added for {}",
            format_record_date(&record.date),
            user.employee_id
        );
        self.audit(&DeskEvent::RecordAdded {
            user_id: user.user_id,
            date:    record.date,
        })
    }

    pub fn get_records(&self, token: Option<&str>) -> DeskResult<Vec<CallRecord>> {
        let user = self.caller(token)?;
        self.store.fetch_one(&user.user_id)
    }

    // ── Reports ────────────────────────────────────────────────

    /// Today / week / month totals for the caller.
    pub fn totals(&self, token: Option<&str>) -> DeskResult<PeriodTotals> {
        let user = self.caller(token)?;
        let records = self.store.fetch_one(&user.user_id)?;
        let summary = summarize(&records, self.clock.now());
        self.audit(&DeskEvent::TotalsComputed {
            user_id:           user.user_id,
            grand_total_today: summary.today.grand_total,
        })?;
        Ok(summary)
    }

    /// Current-month totals for every employee, in sign-up order.
    pub fn monthly_totals(&self, token: Option<&str>) -> DeskResult<Vec<LeaderboardRow>> {
        self.authenticate(token)?;
        let users = self.store.fetch_all()?;
        let rows = leaderboard(&users, self.clock.now());
        self.audit(&DeskEvent::LeaderboardComputed { rows: rows.len() })?;
        Ok(rows)
    }

    // ── Internals ──────────────────────────────────────────────

    /// The authenticated caller's user row.
    fn caller(&self, token: Option<&str>) -> DeskResult<User> {
        let claims = self.authenticate(token)?;
        self.store
            .user_by_id(&claims.id)?
            .ok_or(DeskError::UserNotFound)
    }

    fn audit(&self, event: &DeskEvent) -> DeskResult<()> {
        self.store.append_event(event, &self.stamp())
    }

    fn stamp(&self) -> String {
        format_record_date(&self.clock.now())
    }
}
