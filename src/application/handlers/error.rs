//! Errors that end a conversation turn.

use thiserror::Error;

use crate::domain::dialog::MalformedCommand;
use crate::domain::foundation::DomainError;

/// Why a turn ended without completing.
///
/// A malformed turn ends silently. An upstream failure aborts the turn; the
/// user simply sees no reply.
#[derive(Debug, Clone, Error)]
pub enum ConversationError {
    #[error("Malformed turn: {0}")]
    Malformed(String),

    #[error("Upstream failure: {0}")]
    Upstream(#[from] DomainError),
}

impl ConversationError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        ConversationError::Malformed(reason.into())
    }
}

impl From<MalformedCommand> for ConversationError {
    fn from(err: MalformedCommand) -> Self {
        ConversationError::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn malformed_command_maps_to_malformed() {
        let err: ConversationError = MalformedCommand::new("{}", "missing field `command`").into();
        assert!(matches!(err, ConversationError::Malformed(ref m) if m.contains("missing field")));
    }

    #[test]
    fn domain_error_maps_to_upstream() {
        let err: ConversationError = DomainError::new(ErrorCode::CacheError, "down").into();
        assert!(err.to_string().starts_with("Upstream failure"));
    }
}
