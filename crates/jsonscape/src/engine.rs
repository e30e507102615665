//! Resumable scan-and-escape engine.
//!
//! Overview
//! - One pass over the input, in two phases. The *skip* phase only classifies
//!   bytes, looking for the first one that needs any action; a string that is
//!   plain ASCII start to finish comes back as the borrowed input, untouched.
//!   The *escape* phase maintains a pending run of pass-through bytes
//!   `[segment_start, cursor)` and flushes it to the chunked writer only when
//!   an escape interrupts it, so long clean stretches are copied once.
//! - Bytes the classifier routes to the validator are checked as a whole
//!   sequence (at most four bytes) and, when valid, folded back into the
//!   pending run; valid multi-byte UTF-8 needs no JSON escaping.
//!
//! Suspension
//! - Work is metered by a [`WorkBudget`]; skip-loop bytes cost less than
//!   escape-loop bytes. On exhaustion the engine offers a yield to the host's
//!   [`YieldPoint`]. Accepting moves the whole live state (cursor, pending
//!   run anchor, and the writer with its accumulated chunks) into an opaque
//!   [`EngineState`] and returns [`Progress::Yielded`]. Declining refills the
//!   budget and scanning continues as if nothing happened.
//! - Resumption decodes the state variant once at entry and re-enters the
//!   matching phase loop. Output is byte-identical however many times the
//!   operation was suspended, because closed chunks are carried whole and the
//!   pending run is re-anchored at the same offsets.
//!
//! Invariants
//! - `segment_start <= cursor <= input.len()` whenever state is externalized.
//! - Bytes in `[0, segment_start)` are fully accounted for in the writer;
//!   bytes in `[segment_start, cursor)` are pending and unflushed.
//! - No UTF-8 validator state ever crosses a suspension point.

use alloc::vec::Vec;

use crate::{
    budget::{NeverYield, WorkBudget, YieldPoint},
    buffer::{ChunkSequence, ChunkedWriter, Finished},
    classify::{Action, classify},
    error::EscapeError,
    options::EscapeOptions,
    utf8,
};

/// Two-character escapes can grow the output past the remaining-input
/// estimate; chunk sizing leaves this much slack.
const ESCAPE_SLACK: usize = 6;

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Escaped output of a completed operation, borrow-first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Escaped<'src> {
    /// Nothing needed escaping; the output is the input, zero-copy.
    Borrowed(&'src [u8]),
    /// Escaping fit in one contiguous chunk.
    Owned(Vec<u8>),
    /// Escaping spilled across chunks; chunk order is byte order.
    Chunked(ChunkSequence),
}

impl Escaped<'_> {
    /// Total output length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Escaped::Borrowed(bytes) => bytes.len(),
            Escaped::Owned(bytes) => bytes.len(),
            Escaped::Chunked(seq) => seq.len(),
        }
    }

    /// `true` when the output holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the output into one contiguous buffer.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        match self {
            Escaped::Borrowed(bytes) => bytes.to_vec(),
            Escaped::Owned(bytes) => bytes,
            Escaped::Chunked(seq) => seq.into_vec(),
        }
    }

    /// Iterates the output fragments in byte order without concatenating.
    #[must_use]
    pub fn fragments(&self) -> Fragments<'_> {
        Fragments {
            inner: match self {
                Escaped::Borrowed(bytes) => FragmentsInner::Single(Some(bytes)),
                Escaped::Owned(bytes) => FragmentsInner::Single(Some(bytes.as_slice())),
                Escaped::Chunked(seq) => FragmentsInner::Chunks(seq.as_chunks().iter()),
            },
        }
    }
}

/// Iterator over the fragments of an [`Escaped`] result, in byte order.
#[derive(Debug)]
pub struct Fragments<'a> {
    inner: FragmentsInner<'a>,
}

#[derive(Debug)]
enum FragmentsInner<'a> {
    Single(Option<&'a [u8]>),
    Chunks(core::slice::Iter<'a, Vec<u8>>),
}

impl<'a> Iterator for Fragments<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        match &mut self.inner {
            FragmentsInner::Single(slot) => slot.take(),
            FragmentsInner::Chunks(iter) => iter.next().map(Vec::as_slice),
        }
    }
}

/// Externalized continuation of a suspended escape operation.
///
/// Opaque to the host: pass it back unchanged to
/// [`escape_resume`] together with the same input buffer. Dropping it
/// releases every chunk it holds.
#[derive(Debug, Clone)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
pub struct EngineState {
    phase: Phase,
}

#[derive(Debug, Clone)]
#[cfg_attr(any(test, feature = "serde"), derive(serde::Serialize, serde::Deserialize))]
enum Phase {
    NotStarted,
    Skipping {
        cursor: usize,
    },
    Escaping {
        cursor: usize,
        segment_start: usize,
        out: ChunkedWriter,
    },
}

impl EngineState {
    /// State for an operation that has not begun scanning.
    #[must_use]
    pub fn new() -> Self {
        Self { phase: Phase::NotStarted }
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of one engine invocation.
#[derive(Debug)]
pub enum Progress<'src> {
    /// The whole input was escaped.
    Done(Escaped<'src>),
    /// The budget ran out and the host accepted the yield. Pass the state to
    /// [`escape_resume`] with the same input to continue.
    Yielded(EngineState),
}

/// Escapes `input` in one uninterrupted pass.
///
/// Equivalent to [`escape_with`] driven by a host that declines every yield
/// offer.
///
/// # Errors
///
/// [`EscapeError::InvalidUtf8`] on a malformed sequence,
/// [`EscapeError::Alloc`] when an output chunk cannot be allocated.
pub fn escape(input: &[u8]) -> Result<Escaped<'_>, EscapeError> {
    match escape_with(input, &EscapeOptions::default(), &mut NeverYield)? {
        Progress::Done(out) => Ok(out),
        Progress::Yielded(_) => unreachable!("NeverYield declines every offer"),
    }
}

/// Begins a budgeted escape operation.
///
/// # Errors
///
/// Same as [`escape`].
pub fn escape_with<'src, Y: YieldPoint>(
    input: &'src [u8],
    options: &EscapeOptions,
    host: &mut Y,
) -> Result<Progress<'src>, EscapeError> {
    escape_resume(input, EngineState::new(), options, host)
}

/// Resumes (or begins) an escape operation from an externalized state.
///
/// The state must be paired with the same `input` it was yielded against;
/// the pairing is re-validated before any scanning.
///
/// # Errors
///
/// Same as [`escape`], plus [`EscapeError::StateMismatch`] for a state that
/// cannot belong to `input`.
///
/// # Examples
///
/// ```rust
/// use jsonscape::{EscapeOptions, Progress, YieldEagerly, escape, escape_resume, escape_with};
///
/// let input = b"alpha\tbeta ".repeat(100);
/// let options = EscapeOptions { budget: 4, ..EscapeOptions::default() };
/// let mut yields = 0;
/// let mut progress = escape_with(&input, &options, &mut YieldEagerly)?;
/// let out = loop {
///     match progress {
///         Progress::Done(out) => break out.into_vec(),
///         Progress::Yielded(state) => {
///             yields += 1;
///             progress = escape_resume(&input, state, &options, &mut YieldEagerly)?;
///         }
///     }
/// };
/// assert!(yields > 0);
/// assert_eq!(out, escape(&input)?.into_vec());
/// # Ok::<(), jsonscape::EscapeError>(())
/// ```
pub fn escape_resume<'src, Y: YieldPoint>(
    input: &'src [u8],
    state: EngineState,
    options: &EscapeOptions,
    host: &mut Y,
) -> Result<Progress<'src>, EscapeError> {
    let mut budget = WorkBudget::new(options.budget);

    // Decode the continuation once at entry; each variant re-enters its
    // phase's loop.
    let mut cursor;
    let carried = match state.phase {
        Phase::NotStarted => {
            cursor = 0;
            None
        }
        Phase::Skipping { cursor: at } => {
            if at > input.len() {
                return Err(EscapeError::StateMismatch);
            }
            cursor = at;
            None
        }
        Phase::Escaping { cursor: at, segment_start, out } => {
            if segment_start > at || at > input.len() {
                return Err(EscapeError::StateMismatch);
            }
            cursor = at;
            Some((segment_start, out))
        }
    };

    // ------------------------------ skip ------------------------------
    //
    // Advance while bytes pass through untouched; zero allocation. Ends in
    // one of: whole input skipped (zero-copy done), first actionable byte
    // found (fall through to the escape loop), or budget exhausted.
    let (mut segment_start, mut out) = match carried {
        Some(pair) => pair,
        None => loop {
            let stripe_end = cursor
                .saturating_add(budget.stripe(options.skip_bytes_per_unit))
                .min(input.len());
            let from = cursor;
            while cursor < stripe_end && classify(input[cursor]) == Action::Pass {
                cursor += 1;
            }
            budget.charge(cursor - from, options.skip_bytes_per_unit);

            if cursor == input.len() {
                return Ok(Progress::Done(Escaped::Borrowed(input)));
            }
            if cursor < stripe_end {
                // First actionable byte. The skipped prefix becomes the first
                // write, so that everything before `segment_start` is always
                // accounted for in the writer.
                let mut out = ChunkedWriter::default();
                if cursor > 0 {
                    out.write(&input[..cursor], input.len() - cursor + ESCAPE_SLACK)?;
                }
                break (cursor, out);
            }
            if host.should_yield() {
                return Ok(Progress::Yielded(EngineState {
                    phase: Phase::Skipping { cursor },
                }));
            }
            budget.refill(options.budget);
        },
    };

    // ----------------------------- escape -----------------------------
    loop {
        let stripe_end = cursor
            .saturating_add(budget.stripe(options.escape_bytes_per_unit))
            .min(input.len());
        let from = cursor;
        while cursor < stripe_end {
            let byte = input[cursor];
            match classify(byte) {
                Action::Pass => cursor += 1,
                Action::ValidateUtf8 => {
                    // Validated whole, even past the stripe boundary; a
                    // sequence is at most four bytes, so no validator state
                    // can cross a suspension point.
                    match utf8::validate_sequence(input, cursor) {
                        Ok(len) => cursor += len,
                        Err(rejection) => {
                            return Err(EscapeError::InvalidUtf8 {
                                byte: rejection.byte,
                                offset: rejection.offset,
                            });
                        }
                    }
                }
                action => {
                    let hint = input.len() - cursor + ESCAPE_SLACK;
                    if segment_start < cursor {
                        out.write(&input[segment_start..cursor], hint)?;
                    }
                    match action.short_form() {
                        Some(pair) => out.write(pair, hint)?,
                        // only ShortUnicode reaches here; low nibbles of a
                        // control byte, uppercase, top byte always 00
                        None => {
                            let seq = [
                                b'\\',
                                b'u',
                                b'0',
                                b'0',
                                HEX[(byte >> 4) as usize],
                                HEX[(byte & 0x0F) as usize],
                            ];
                            out.write(&seq, hint)?;
                        }
                    }
                    cursor += 1;
                    segment_start = cursor;
                }
            }
        }
        budget.charge(cursor - from, options.escape_bytes_per_unit);

        if cursor >= input.len() {
            if segment_start < input.len() {
                out.write(&input[segment_start..], 0)?;
            }
            let escaped = match out.finish() {
                Finished::Single(chunk) => Escaped::Owned(chunk),
                Finished::Chunks(seq) => Escaped::Chunked(seq),
            };
            return Ok(Progress::Done(escaped));
        }
        if budget.exhausted() {
            if host.should_yield() {
                return Ok(Progress::Yielded(EngineState {
                    phase: Phase::Escaping { cursor, segment_start, out },
                }));
            }
            budget.refill(options.budget);
        }
    }
}
