use std::fmt;

#[derive(Debug, Clone)]
pub enum LinkmintError {
    Validation(String),
    Conflict(String),
    NotFound(String),
    Exhausted(String),
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Serialization(String),
}

impl LinkmintError {
    pub fn code(&self) -> &'static str {
        match self {
            LinkmintError::Validation(_) => "E001",
            LinkmintError::Conflict(_) => "E002",
            LinkmintError::NotFound(_) => "E003",
            LinkmintError::Exhausted(_) => "E004",
            LinkmintError::DatabaseConfig(_) => "E005",
            LinkmintError::DatabaseConnection(_) => "E006",
            LinkmintError::DatabaseOperation(_) => "E007",
            LinkmintError::Serialization(_) => "E008",
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            LinkmintError::Validation(_) => "Validation Error",
            LinkmintError::Conflict(_) => "Code Conflict",
            LinkmintError::NotFound(_) => "Resource Not Found",
            LinkmintError::Exhausted(_) => "Code Allocation Exhausted",
            LinkmintError::DatabaseConfig(_) => "Database Configuration Error",
            LinkmintError::DatabaseConnection(_) => "Database Connection Error",
            LinkmintError::DatabaseOperation(_) => "Database Operation Error",
            LinkmintError::Serialization(_) => "Serialization Error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            LinkmintError::Validation(msg)
            | LinkmintError::Conflict(msg)
            | LinkmintError::NotFound(msg)
            | LinkmintError::Exhausted(msg)
            | LinkmintError::DatabaseConfig(msg)
            | LinkmintError::DatabaseConnection(msg)
            | LinkmintError::DatabaseOperation(msg)
            | LinkmintError::Serialization(msg) => msg,
        }
    }

    /// Whether the caller may safely retry the whole operation.
    pub fn is_transient(&self) -> bool {
        matches!(self, LinkmintError::Exhausted(_))
    }
}

impl fmt::Display for LinkmintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type(), self.message())
    }
}

impl std::error::Error for LinkmintError {}

// Convenience constructors
impl LinkmintError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkmintError::Validation(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        LinkmintError::Conflict(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkmintError::NotFound(msg.into())
    }

    pub fn exhausted<T: Into<String>>(msg: T) -> Self {
        LinkmintError::Exhausted(msg.into())
    }

    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinkmintError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkmintError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkmintError::DatabaseOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkmintError::Serialization(msg.into())
    }
}

impl From<sea_orm::DbErr> for LinkmintError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkmintError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkmintError {
    fn from(err: serde_json::Error) -> Self {
        LinkmintError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkmintError>;
