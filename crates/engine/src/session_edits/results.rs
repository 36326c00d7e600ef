use std::fmt;

use serde::{Deserialize, Serialize};

use crate::credits::SelectionRejected;
use crate::reduction::StrategyLocked;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum EditResult {
    Success,
    /// The edit was applied but the caller should see a note (e.g. a value
    /// was coerced or clamped).
    SuccessWithWarning(String),
    Error(EditError),
}

impl EditResult {
    /// Returns `true` for both `Success` and `SuccessWithWarning`.
    pub fn is_success(&self) -> bool {
        matches!(self, EditResult::Success | EditResult::SuccessWithWarning(_))
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            EditResult::SuccessWithWarning(w) => Some(w.as_str()),
            _ => None,
        }
    }
}

impl From<Result<(), EditError>> for EditResult {
    fn from(result: Result<(), EditError>) -> Self {
        match result {
            Ok(()) => EditResult::Success,
            Err(e) => EditResult::Error(e),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum EditError {
    UnknownStrategy(String),
    DuplicateStrategy(String),
    /// The strategy is confirmed; reopen it first.
    StrategyLocked(String),
    UnknownCreditProject(String),
    CreditQuantityOutOfRange { requested: u64, available: u64 },
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::UnknownStrategy(id) => write!(f, "no strategy with id '{id}'"),
            EditError::DuplicateStrategy(id) => write!(f, "strategy '{id}' already exists"),
            EditError::StrategyLocked(id) => {
                write!(f, "strategy '{id}' is confirmed; reopen it to edit")
            }
            EditError::UnknownCreditProject(id) => write!(f, "no credit project with id '{id}'"),
            EditError::CreditQuantityOutOfRange {
                requested,
                available,
            } => write!(
                f,
                "credit quantity {requested} outside 1..={available}"
            ),
        }
    }
}

impl std::error::Error for EditError {}

impl From<StrategyLocked> for EditError {
    fn from(e: StrategyLocked) -> Self {
        EditError::StrategyLocked(e.id)
    }
}

impl From<SelectionRejected> for EditError {
    fn from(e: SelectionRejected) -> Self {
        match e {
            SelectionRejected::UnknownProject(id) => EditError::UnknownCreditProject(id),
            SelectionRejected::QuantityOutOfRange {
                requested,
                available,
            } => EditError::CreditQuantityOutOfRange {
                requested,
                available,
            },
        }
    }
}
