use thiserror::Error;

/// Unified error type for version calculation
#[derive(Error, Debug)]
pub enum GitVersionError {
    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Precondition failed: {0}")]
    Precondition(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Invalid configuration file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in gitversion
pub type Result<T> = std::result::Result<T, GitVersionError>;

impl GitVersionError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GitVersionError::Config(msg.into())
    }

    /// Create a precondition error with context
    pub fn precondition(msg: impl Into<String>) -> Self {
        GitVersionError::Precondition(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        GitVersionError::Version(msg.into())
    }

    /// Whether the error stems from configuration rather than repository state
    pub fn is_config(&self) -> bool {
        matches!(self, GitVersionError::Config(_) | GitVersionError::Toml(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitVersionError::config("cycle in source branches");
        assert_eq!(
            err.to_string(),
            "Configuration error: cycle in source branches"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: GitVersionError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_error_from_toml() {
        let toml_err = toml::from_str::<toml::Table>("label = ").unwrap_err();
        let err: GitVersionError = toml_err.into();
        assert!(err.to_string().starts_with("Invalid configuration file"));
        assert!(err.is_config());
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (GitVersionError::config("x"), "Configuration error"),
            (GitVersionError::precondition("x"), "Precondition failed"),
            (GitVersionError::version("x"), "Version parsing error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_is_config() {
        assert!(GitVersionError::config("x").is_config());
        assert!(!GitVersionError::precondition("x").is_config());
        assert!(!GitVersionError::version("x").is_config());
    }
}
