use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetaError {
    #[error("Argument error: {0}")]
    ArgumentError(String),

    #[error("Construction error: {0}")]
    ConstructionError(String),

    #[error("Schema query error: {0}")]
    SchemaQueryError(String),

    #[error("Property '{0}' not found on entity '{1}'")]
    MissingProperty(String, String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Lock error: {0}")]
    LockError(String),
}

impl MetaError {
    pub(crate) fn argument(message: impl Into<String>) -> Self {
        Self::ArgumentError(message.into())
    }

    /// Returns `true` for failures caused by the caller's input rather than
    /// by a collaborator.
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::ArgumentError(_))
    }
}

pub type Result<T> = std::result::Result<T, MetaError>;

impl<T> From<std::sync::PoisonError<T>> for MetaError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::LockError(err.to_string())
    }
}

impl From<serde_json::Error> for MetaError {
    fn from(err: serde_json::Error) -> Self {
        Self::ConfigError(err.to_string())
    }
}

/// Rejects empty or whitespace-only identifiers, returning the trimmed form.
pub(crate) fn require_name<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MetaError::argument(format!("{} cannot be empty", what)));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_name_trims() {
        assert_eq!(require_name("  Id ", "property").unwrap(), "Id");
    }

    #[test]
    fn test_require_name_rejects_blank() {
        let err = require_name("   ", "property").unwrap_err();
        assert!(err.is_argument_error());
        assert_eq!(err.to_string(), "Argument error: property cannot be empty");
    }
}
