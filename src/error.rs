//! Error types.

use thiserror::Error;

/// Errors surfaced by the manager and its handles.
///
/// All of them are contract violations detected before any table mutation,
/// so a failed call leaves the manager unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BddError {
    #[error("failed to initialize manager: {0}")]
    Init(String),

    #[error("variable index {index} is out of range (manager has {num_vars} variables)")]
    InvalidVariable { index: u32, num_vars: usize },

    #[error("operands belong to different managers")]
    CrossManager,

    #[error("manager is closed")]
    ManagerClosed,

    #[error("handle refers to a reclaimed node")]
    StaleHandle,

    #[error("failed to render graph")]
    Render(#[from] std::fmt::Error),
}

pub type Result<T> = std::result::Result<T, BddError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = BddError::InvalidVariable { index: 5, num_vars: 2 };
        assert_eq!(
            err.to_string(),
            "variable index 5 is out of range (manager has 2 variables)"
        );
        assert_eq!(BddError::ManagerClosed.to_string(), "manager is closed");
        assert_eq!(BddError::StaleHandle.to_string(), "handle refers to a reclaimed node");
        assert!(BddError::Init("table_size must be positive".into())
            .to_string()
            .contains("table_size"));
    }
}
