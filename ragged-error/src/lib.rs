#![deny(missing_docs)]

//! Error handling for the ragged crates.
//!
//! Every fallible operation returns a [`RaggedResult`]. Errors are built with the
//! [`ragged_err!`] and [`ragged_bail!`] macros, which capture a backtrace at the point the
//! error is created.

mod ext;

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;
use std::{env, fmt};

pub use ext::*;

/// A string that can be used as an error message.
#[derive(Debug)]
pub struct ErrString(Cow<'static, str>);

#[allow(clippy::fallible_impl_from)]
impl<T> From<T> for ErrString
where
    T: Into<Cow<'static, str>>,
{
    #[allow(clippy::panic)]
    fn from(msg: T) -> Self {
        if env::var("RAGGED_PANIC_ON_ERR").as_deref().unwrap_or("") == "1" {
            panic!("{}\nBacktrace:\n{}", msg.into(), Backtrace::capture());
        } else {
            Self(msg.into())
        }
    }
}

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// The top-level error type for the ragged crates.
#[derive(thiserror::Error)]
#[non_exhaustive]
pub enum RaggedError {
    /// Supplied buffers or shape hints do not describe a valid 1-D or rectangular shape.
    #[error("invalid shape: {0}\nBacktrace:\n{1}")]
    InvalidShape(ErrString, Backtrace),
    /// An index is outside the `[start, stop)` range of valid entries.
    #[error("index {0} out of bounds from {1} to {2}\nBacktrace:\n{3}")]
    OutOfBounds(usize, usize, usize, Backtrace),
    /// Parallel arrays or offset index outputs disagree in length.
    #[error("length mismatch: {0}\nBacktrace:\n{1}")]
    LengthMismatch(ErrString, Backtrace),
    /// A caller supplied output buffer is too small and may not be grown.
    #[error("buffer too small: {0}\nBacktrace:\n{1}")]
    BufferTooSmall(ErrString, Backtrace),
    /// A caller supplied output buffer is of the wrong logical type.
    #[error("buffer type mismatch: {0}\nBacktrace:\n{1}")]
    BufferTypeMismatch(ErrString, Backtrace),
    /// The requested logical type is not supported by the operation.
    #[error("unsupported type: {0}\nBacktrace:\n{1}")]
    UnsupportedType(ErrString, Backtrace),
    /// An invalid argument was provided.
    #[error("{0}\nBacktrace:\n{1}")]
    InvalidArgument(ErrString, Backtrace),
    /// Two types were expected to match but did not.
    #[error("expected type: {0} but instead got {1}\nBacktrace:\n{2}")]
    MismatchedTypes(ErrString, ErrString, Backtrace),
    /// A named entity could not be found.
    #[error("not found: {0}\nBacktrace:\n{1}")]
    NotFound(ErrString, Backtrace),
    /// A decoding failure reported by a codec.
    #[error("decode error: {0}\nBacktrace:\n{1}")]
    Decode(ErrString, Backtrace),
    /// An error wrapped with additional context.
    #[error("{0}: {1}")]
    Context(ErrString, #[source] Box<RaggedError>),
}

impl RaggedError {
    /// Adds additional context to an error.
    pub fn with_context<T: Into<ErrString>>(self, msg: T) -> Self {
        RaggedError::Context(msg.into(), Box::new(self))
    }
}

impl Debug for RaggedError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// A type alias for Results that return [`RaggedError`]s as their error type.
pub type RaggedResult<T> = Result<T, RaggedError>;

/// A convenient macro for creating a [`RaggedError`].
#[macro_export]
macro_rules! ragged_err {
    (OutOfBounds: $idx:expr, $start:expr, $stop:expr) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::RaggedError::OutOfBounds($idx, $start, $stop, Backtrace::capture())
        )
    }};
    (MismatchedTypes: $expected:literal, $actual:expr) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::RaggedError::MismatchedTypes($expected.into(), $actual.to_string().into(), Backtrace::capture())
        )
    }};
    (MismatchedTypes: $expected:expr, $actual:expr) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::RaggedError::MismatchedTypes($expected.to_string().into(), $actual.to_string().into(), Backtrace::capture())
        )
    }};
    (Context: $msg:literal, $err:expr) => {{
        $crate::__private::must_use(
            $crate::RaggedError::Context($msg.into(), Box::new($err))
        )
    }};
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::RaggedError::$variant(format!($fmt, $($arg),*).into(), Backtrace::capture())
        )
    }};
    ($variant:ident: $err:expr $(,)?) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::RaggedError::$variant($err, Backtrace::capture())
        )
    }};
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::ragged_err!(InvalidArgument: $fmt, $($arg),*)
    };
}

/// A convenient macro for returning a [`RaggedError`] from the enclosing function.
#[macro_export]
macro_rules! ragged_bail {
    ($($tt:tt)+) => {
        return Err($crate::ragged_err!($($tt)+))
    };
}

#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn must_use<T>(x: T) -> T {
        x
    }
}
