use std::fmt;

/// Errors returned by a [`ContentStore`](super::ContentStore) backend.
#[derive(Debug)]
pub enum ContentStoreError {
    /// The referenced category or entry does not exist.
    NotFound(String),
    /// The store refused the value (e.g. a constraint violation).
    Rejected(String),
    /// The backend itself failed (database, lock, ...).
    Backend(String),
}

impl fmt::Display for ContentStoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(what) => write!(f, "not found: {what}"),
            Self::Rejected(msg) => write!(f, "rejected by content store: {msg}"),
            Self::Backend(msg) => write!(f, "content store error: {msg}"),
        }
    }
}

impl std::error::Error for ContentStoreError {}
