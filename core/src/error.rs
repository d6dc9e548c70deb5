use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("User not found")]
    UserNotFound,

    #[error("Employee '{employee_id}' already exists")]
    DuplicateEmployee { employee_id: String },

    #[error("Invalid employeeID or password")]
    InvalidCredentials,

    #[error("Invalid employeeID or date of birth")]
    IdentityNotVerified,

    #[error("Authentication required")]
    Unauthorized,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DeskError {
    /// HTTP-style status used by the request surface.
    pub fn status(&self) -> u16 {
        match self {
            DeskError::InvalidCredentials
            | DeskError::IdentityNotVerified
            | DeskError::DuplicateEmployee { .. } => 400,
            DeskError::Unauthorized => 401,
            DeskError::UserNotFound => 404,
            _ => 500,
        }
    }
}

pub type DeskResult<T> = Result<T, DeskError>;
