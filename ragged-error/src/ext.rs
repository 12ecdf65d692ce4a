use crate::{ErrString, RaggedResult};

/// Extension trait for attaching context to the error of a [`RaggedResult`].
pub trait ContextExt<T> {
    /// Wraps the error, if any, with the message produced by `f`.
    fn with_context<M, F>(self, f: F) -> RaggedResult<T>
    where
        M: Into<ErrString>,
        F: FnOnce() -> M;
}

impl<T> ContextExt<T> for RaggedResult<T> {
    fn with_context<M, F>(self, f: F) -> RaggedResult<T>
    where
        M: Into<ErrString>,
        F: FnOnce() -> M,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
