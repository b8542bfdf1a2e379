pub type AppResult<T> = Result<T, AppError>;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("I/O error: {context}")]
    Io {
        #[source]
        source: std::io::Error,
        context: String,
    },
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("failed to encode state")]
    Encode(#[from] serde_json::Error),
}

impl From<std::io::Error> for AppError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            context: "I/O operation failed".to_string(),
        }
    }
}

impl AppError {
    pub fn io_with_context(source: std::io::Error, context: impl Into<String>) -> Self {
        Self::Io {
            source,
            context: context.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;

    #[test]
    fn io_error_keeps_context_and_source() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = AppError::io_with_context(source, "failed to read config: a.toml");
        assert_eq!(err.to_string(), "I/O error: failed to read config: a.toml");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn validation_error_formats_message() {
        let err = AppError::validation("duplicate layer id 'osm'");
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "validation failed: duplicate layer id 'osm'"
        );
    }
}
