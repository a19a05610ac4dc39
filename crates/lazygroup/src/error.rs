use thiserror::Error;

/// A key selector failure, located at the source item it failed on.
///
/// The item is not lost: it stays parked inside the grouping and the next
/// pull from any consumer runs the selector on it again before reading
/// further from the source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("key selector failed at item {position}: {error}")]
pub struct GroupByError<E> {
    #[source]
    error: E,
    position: usize,
}

impl<E> GroupByError<E> {
    pub(crate) fn selector(error: E, position: usize) -> Self {
        Self { error, position }
    }

    /// Zero-based index of the offending item in the source.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The error returned by the key selector.
    #[must_use]
    pub fn error(&self) -> &E {
        &self.error
    }

    /// Unwraps the selector's error.
    #[must_use]
    pub fn into_inner(self) -> E {
        self.error
    }
}
