use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Remote failure: {0}")]
    RemoteFailure(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// UI 側で分岐に使う安定したエラーコード
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Unauthenticated(_) => "UNAUTHENTICATED",
            AppError::InvalidInput(_) => "INVALID_INPUT",
            AppError::RemoteFailure(_) => "REMOTE_FAILURE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 利用者向けのメッセージ
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthenticated(_) => "Please sign in to continue.".to_string(),
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::RemoteFailure(_) => {
                "Something went wrong while talking to the server. Please try again.".to_string()
            }
            AppError::NotFound(msg) => msg.clone(),
            AppError::Forbidden(msg) => msg.clone(),
            AppError::Configuration(_) | AppError::Serialization(_) | AppError::Internal(_) => {
                "Unexpected error.".to_string()
            }
        }
    }

    /// 再試行で回復しうるか（トグル失敗は一時的なもの）
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::RemoteFailure(_))
    }

    pub fn unauthenticated(action: &str) -> Self {
        AppError::Unauthenticated(format!("You must be signed in to {action}"))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::RemoteFailure(err.to_string())
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        AppError::RemoteFailure(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_remote_failures_are_retryable() {
        assert!(AppError::RemoteFailure("timeout".into()).is_retryable());
        assert!(!AppError::unauthenticated("like posts").is_retryable());
        assert!(!AppError::InvalidInput("empty".into()).is_retryable());
    }

    #[test]
    fn remote_failure_hides_details_from_users() {
        let err = AppError::RemoteFailure("connection reset by peer".into());
        assert_eq!(err.code(), "REMOTE_FAILURE");
        assert!(!err.user_message().contains("connection reset"));
        assert!(err.to_string().contains("connection reset"));
    }
}
