//! Error types for the ordered view.

use crate::subscriptions::Channel;
use thiserror::Error;

/// Main error type for view construction and scheduler registration.
///
/// Removing an item that is not present is not an error; `remove` reports it
/// as `false`.
#[derive(Debug, Error)]
pub enum ViewError {
    #[error("Missing subscribe/unsubscribe hooks for the {0} channel")]
    MissingHooks(Channel),

    #[error("No ordering function configured")]
    MissingOrdering,

    #[error("No membership predicate configured")]
    MissingPredicate,

    #[error("Component already registered")]
    AlreadyRegistered,

    #[error("Component not registered")]
    NotRegistered,
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;
