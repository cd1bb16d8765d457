use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Subscription not found")]
    NotFound,

    #[error("Invalid period format (expected MM-YYYY): {0}")]
    InvalidPeriodFormat(String),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Nil dependency: {0}")]
    NilDependency(&'static str),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<AppError>,
    },
}

impl AppError {
    /// Innermost error, skipping any context wrappers.
    pub fn root(&self) -> &AppError {
        match self {
            AppError::Context { source, .. } => source.root(),
            other => other,
        }
    }

    pub fn context(self, context: impl Into<String>) -> Self {
        AppError::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self.root() {
            AppError::NotFound => ErrorCode::NotFound,
            AppError::InvalidPeriodFormat(_) => ErrorCode::InvalidPeriodFormat,
            AppError::ConstraintViolation(_) => ErrorCode::ConstraintViolation,
            AppError::NilDependency(_) => ErrorCode::NilDependency,
            AppError::StorageUnavailable(_) => ErrorCode::StorageUnavailable,
            AppError::Timeout(_) => ErrorCode::Timeout,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::Context { .. } => ErrorCode::InternalError,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    InvalidPeriodFormat,
    ConstraintViolation,
    NilDependency,
    StorageUnavailable,
    Timeout,
    InvalidInput,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidPeriodFormat => "INVALID_PERIOD_FORMAT",
            ErrorCode::ConstraintViolation => "CONSTRAINT_VIOLATION",
            ErrorCode::NilDependency => "NIL_DEPENDENCY",
            ErrorCode::StorageUnavailable => "STORAGE_UNAVAILABLE",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Attach caller intent to an error without changing its kind.
pub trait AppResultExt<T> {
    fn context(self, context: &str) -> AppResult<T>;
}

impl<T> AppResultExt<T> for AppResult<T> {
    fn context(self, context: &str) -> AppResult<T> {
        self.map_err(|e| e.context(context))
    }
}
