use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::{atomic, Atomic};

/// Error kinds for Inkstore operations.
///
/// Each kind describes a distinct failure domain so callers can branch on
/// the outcome instead of pattern-matching message strings. The transaction
/// executor relies on this distinction: only [`ErrorKind::Conflict`] is ever
/// retried.
///
/// # Examples
///
/// ```rust,ignore
/// use inkstore::errors::{InkstoreError, ErrorKind, InkstoreResult};
///
/// fn example() -> InkstoreResult<()> {
///     Err(InkstoreError::new("Document not found", ErrorKind::NotFound))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The document is absent and creation was not requested.
    /// Recoverable by the caller, e.g. by returning an empty result.
    NotFound,
    /// The presented revision no longer matches the store's current revision;
    /// another writer won the race. Transient and retried internally.
    Conflict,
    /// The conflict-retry budget was exhausted. The caller may resubmit the
    /// whole transaction.
    TooManyConflicts,
    /// A mutation produced a document body the collection's validator
    /// refuses. Never retried; the reason is carried in the message.
    ValidationError,
    /// Transport or storage failure, including operations against a closed
    /// store. Never retried by the transaction layer.
    StoreUnavailable,
    /// The operation is not valid in the current context, e.g. an empty
    /// document key, a reserved field write, or configuration changes after
    /// the database has been opened.
    InvalidOperation,
    /// Internal error (usually indicates a bug).
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "Not found"),
            ErrorKind::Conflict => write!(f, "Conflict"),
            ErrorKind::TooManyConflicts => write!(f, "Too many conflicts"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::StoreUnavailable => write!(f, "Store unavailable"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom Inkstore error type.
///
/// `InkstoreError` encapsulates the error message, kind, and optional cause.
/// It supports error chaining and backtraces for debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use inkstore::errors::{InkstoreError, ErrorKind};
///
/// // Create a simple error
/// let err = InkstoreError::new("Document not found", ErrorKind::NotFound);
///
/// // Create an error with a cause
/// let cause = InkstoreError::new("Connection reset", ErrorKind::StoreUnavailable);
/// let err = InkstoreError::new_with_cause("Fetch failed", ErrorKind::StoreUnavailable, cause);
/// ```
///
/// # Type alias
///
/// The `InkstoreResult<T>` type alias is equivalent to
/// `Result<T, InkstoreError>` and is used throughout the codebase for
/// operations that can fail.
#[derive(Clone)]
pub struct InkstoreError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<InkstoreError>>,
    backtrace: Atomic<Backtrace>,
}

impl InkstoreError {
    /// Creates a new `InkstoreError` with the specified message and kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        InkstoreError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `InkstoreError` with a cause error.
    ///
    /// This creates an error chain where the cause error is preserved for
    /// debugging.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: InkstoreError) -> Self {
        InkstoreError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&InkstoreError> {
        self.cause.as_deref()
    }

    /// Checks whether this error represents a write conflict. The
    /// transaction executor retries exactly this class of failure.
    pub fn is_conflict(&self) -> bool {
        self.error_kind == ErrorKind::Conflict
    }
}

impl Display for InkstoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_kind, self.message)?;
        if let Some(cause) = &self.cause {
            write!(f, " (caused by: {})", cause)?;
        }
        Ok(())
    }
}

impl Debug for InkstoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use crate::common::ReadExecutor;

        writeln!(f, "InkstoreError {{ kind: {:?}, message: {:?} }}", self.error_kind, self.message)?;
        if let Some(cause) = &self.cause {
            writeln!(f, "caused by: {:?}", cause)?;
        }
        self.backtrace.read_with(|bt| writeln!(f, "backtrace:\n{:?}", bt))
    }
}

impl Error for InkstoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_ref()
            .map(|cause| cause.as_ref() as &(dyn Error + 'static))
    }
}

pub type InkstoreResult<T> = Result<T, InkstoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_new() {
        let err = InkstoreError::new("document missing", ErrorKind::NotFound);
        assert_eq!(err.message(), "document missing");
        assert_eq!(err.kind(), &ErrorKind::NotFound);
        assert!(err.cause().is_none());
    }

    #[test]
    fn test_error_with_cause() {
        let cause = InkstoreError::new("connection reset", ErrorKind::StoreUnavailable);
        let err = InkstoreError::new_with_cause("fetch failed", ErrorKind::StoreUnavailable, cause);
        assert_eq!(err.cause().unwrap().message(), "connection reset");
        assert_eq!(err.kind(), &ErrorKind::StoreUnavailable);
    }

    #[test]
    fn test_error_display_includes_kind_and_message() {
        let err = InkstoreError::new("no such document", ErrorKind::NotFound);
        let rendered = format!("{}", err);
        assert!(rendered.contains("Not found"));
        assert!(rendered.contains("no such document"));
    }

    #[test]
    fn test_error_display_includes_cause_chain() {
        let cause = InkstoreError::new("io failure", ErrorKind::StoreUnavailable);
        let err = InkstoreError::new_with_cause("put failed", ErrorKind::StoreUnavailable, cause);
        let rendered = format!("{}", err);
        assert!(rendered.contains("caused by"));
        assert!(rendered.contains("io failure"));
    }

    #[test]
    fn test_error_source() {
        let cause = InkstoreError::new("inner", ErrorKind::InternalError);
        let err = InkstoreError::new_with_cause("outer", ErrorKind::InternalError, cause);
        assert!(err.source().is_some());

        let plain = InkstoreError::new("no cause", ErrorKind::NotFound);
        assert!(plain.source().is_none());
    }

    #[test]
    fn test_is_conflict() {
        assert!(InkstoreError::new("clash", ErrorKind::Conflict).is_conflict());
        assert!(!InkstoreError::new("gone", ErrorKind::NotFound).is_conflict());
    }

    #[test]
    fn test_error_clone_shares_backtrace() {
        let err = InkstoreError::new("original", ErrorKind::InternalError);
        let cloned = err.clone();
        assert_eq!(cloned.message(), err.message());
        assert_eq!(cloned.kind(), err.kind());
    }
}
