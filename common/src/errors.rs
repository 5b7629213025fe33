// Error handling framework
// Store failures are classified by category so the HTTP layer can map them
// onto the not-found / validation / store-error taxonomy.

use thiserror::Error;

/// Validation errors raised while parsing request input
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(String),

    #[error("Missing required fields ({})", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid value for {field}: '{value}'")]
    InvalidFieldValue { field: String, value: String },
}

/// Database-specific errors
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Database health check failed: {0}")]
    HealthCheckFailed(String),

    #[error("Query execution failed: {0}")]
    QueryFailed(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Duplicate key violation: {0}")]
    DuplicateKey(String),

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),
}

impl DatabaseError {
    /// Short, stable label used for metrics and log fields
    pub fn kind(&self) -> &'static str {
        match self {
            DatabaseError::ConnectionFailed(_) => "connection_failed",
            DatabaseError::HealthCheckFailed(_) => "health_check_failed",
            DatabaseError::QueryFailed(_) => "query_failed",
            DatabaseError::TransactionFailed(_) => "transaction_failed",
            DatabaseError::NotFound(_) => "not_found",
            DatabaseError::DuplicateKey(_) => "duplicate_key",
            DatabaseError::ForeignKeyViolation(_) => "foreign_key_violation",
        }
    }

    /// The underlying store message without the category prefix
    pub fn message(&self) -> &str {
        match self {
            DatabaseError::ConnectionFailed(msg)
            | DatabaseError::HealthCheckFailed(msg)
            | DatabaseError::QueryFailed(msg)
            | DatabaseError::TransactionFailed(msg)
            | DatabaseError::NotFound(msg)
            | DatabaseError::DuplicateKey(msg)
            | DatabaseError::ForeignKeyViolation(msg) => msg,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DatabaseError::NotFound(_))
    }
}

// Implement From for common external errors
impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DatabaseError::NotFound("Record not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Check for specific database error codes
                if let Some(code) = db_err.code() {
                    match code.as_ref() {
                        "23505" => DatabaseError::DuplicateKey(db_err.message().to_string()),
                        "23503" => DatabaseError::ForeignKeyViolation(db_err.message().to_string()),
                        _ => DatabaseError::QueryFailed(db_err.message().to_string()),
                    }
                } else {
                    DatabaseError::QueryFailed(db_err.message().to_string())
                }
            }
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => DatabaseError::ConnectionFailed(err.to_string()),
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}
