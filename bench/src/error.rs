//! Error taxonomy shared by the harness, the registry and the config layer.

use thiserror::Error;

pub type BenchResult<T> = Result<T, BenchError>;

#[derive(Debug, Error)]
pub enum BenchError {
    /// Malformed harness parameters: negative size, zero repetitions,
    /// non-ascending size points, empty registry, unparseable settings.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Registry problems found before any measurement starts.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Failure raised by an operation under test. Rendered as-is so the
    /// broken operation's own message reaches the user.
    #[error(transparent)]
    Operation(#[from] anyhow::Error),
}

impl BenchError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_failure_is_transparent() {
        let err: BenchError = anyhow::anyhow!("disk full while writing out.csv").into();
        assert_eq!(err.to_string(), "disk full while writing out.csv");
        assert!(matches!(err, BenchError::Operation(_)));
    }

    #[test]
    fn invalid_argument_names_the_problem() {
        let err = BenchError::invalid("repetitions must be >= 1");
        assert_eq!(err.to_string(), "invalid argument: repetitions must be >= 1");
    }
}
