use alloc::{collections::TryReserveError, format, string::String};
use bstr::BStr;
use thiserror::Error;

/// Terminal failures of an escape operation.
///
/// Every failure aborts the whole operation; no variant carries partial
/// output.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub enum EscapeError {
    /// A byte with the high bit set did not begin a well-formed UTF-8
    /// sequence. Not resumable.
    #[error("invalid UTF-8 byte 0x{byte:02X} at offset {offset}")]
    InvalidUtf8 {
        /// The rejecting byte value.
        byte: u8,
        /// Absolute offset of the rejecting byte in the input.
        offset: usize,
    },
    /// An output chunk could not be allocated.
    #[error("output chunk allocation failed")]
    Alloc,
    /// [`escape_resume`](crate::escape_resume) was handed a state that cannot
    /// belong to the input buffer it came with.
    #[error("resume state does not match the input buffer")]
    StateMismatch,
}

impl From<TryReserveError> for EscapeError {
    fn from(_: TryReserveError) -> Self {
        EscapeError::Alloc
    }
}

impl EscapeError {
    /// Renders the error with a window of the surrounding input bytes.
    ///
    /// The engine does not retain the input across a failure; the caller, who
    /// owns the buffer for the whole operation, supplies it here.
    #[must_use]
    pub fn annotate(&self, input: &[u8]) -> String {
        match *self {
            EscapeError::InvalidUtf8 { offset, .. } => {
                let end = input.len().min(offset.saturating_add(8));
                let begin = offset.saturating_sub(8).min(end);
                format!("{self} (near {:?})", BStr::new(&input[begin..end]))
            }
            _ => format!("{self}"),
        }
    }
}
