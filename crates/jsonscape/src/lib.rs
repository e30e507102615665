//! A resumable, allocation-efficient JSON string escaper.
//!
//! Given the raw bytes of a textual value, [`escape`] produces the bytes of a
//! valid JSON string body: control characters, `"` and `\` are escaped, and
//! every byte with the high bit set must begin a well-formed UTF-8 sequence.
//! Valid multi-byte UTF-8 passes through untouched.
//!
//! The escaper is borrow-first: input that needs no escaping is returned as a
//! borrowed slice of the original buffer, and escaped output accumulates into
//! fixed-capacity chunks that are never relocated once written.
//!
//! Long inputs can be time-sliced. [`escape_with`] threads a work budget
//! through the scan; when it runs out the engine offers a yield to the host
//! through the [`YieldPoint`] trait and, if accepted, hands back an opaque
//! [`EngineState`] continuation. [`escape_resume`] picks up exactly where the
//! suspended call left off, producing byte-identical output to an
//! uninterrupted run.
//!
//! ```rust
//! use jsonscape::escape;
//!
//! let out = escape(b"say \"hi\"\n").unwrap();
//! assert_eq!(out.into_vec(), b"say \\\"hi\\\"\\n".to_vec());
//! ```

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod budget;
mod buffer;
mod classify;
mod engine;
mod error;
mod options;
mod utf8;

#[cfg(test)]
mod tests;

pub use budget::{NeverYield, YieldEagerly, YieldPoint};
pub use buffer::ChunkSequence;
pub use classify::{Action, classify};
pub use engine::{EngineState, Escaped, Fragments, Progress, escape, escape_resume, escape_with};
pub use error::EscapeError;
pub use options::EscapeOptions;
