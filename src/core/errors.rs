/*!
# Error System

Error taxonomy of the consolidation core. A finder that does not match is not
an error: it simply yields no candidate.
*/

use thiserror::Error;

use super::position::Position;

pub type Result<T> = std::result::Result<T, ConsolidationError>;

#[derive(Debug, Error)]
pub enum ConsolidationError {
    /// Узел отсутствует или имеет не тот вид, который ожидает компонент.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Результат вычислен для одного снимка документа, а применяется к другому.
    #[error("Stale snapshot: computed for version {expected}, document is at version {actual}")]
    StaleSnapshot { expected: u64, actual: u64 },

    #[error("Parse error at {position}: {message}")]
    Parse { message: String, position: Position },

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ConsolidationError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Fails with `StaleSnapshot` unless both versions agree.
    pub fn ensure_version(expected: u64, actual: u64) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::StaleSnapshot { expected, actual })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_snapshot_message_names_both_versions() {
        let err = ConsolidationError::ensure_version(3, 4).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Stale snapshot: computed for version 3, document is at version 4"
        );
        assert!(ConsolidationError::ensure_version(7, 7).is_ok());
    }

    #[test]
    fn parse_error_displays_one_based_position() {
        let err = ConsolidationError::Parse {
            message: "expected ';'".into(),
            position: Position::new(0, 4, 4),
        };
        assert_eq!(err.to_string(), "Parse error at 1:5: expected ';'");
    }
}
