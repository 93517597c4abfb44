//! Utility macros used internally by the codecs.

/// Returns early with an error if a condition is not met.
///
/// Like `assert!`, but returns `Err($error)` instead of panicking.
///
/// ```ignore
/// ensure!(src.len() <= MAX_HEADER_BYTES, ProtocolError::too_large_header(src.len(), MAX_HEADER_BYTES));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
