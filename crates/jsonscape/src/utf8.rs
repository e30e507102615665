//! Byte-at-a-time UTF-8 validation.
//!
//! The scanner hands every byte the classifier marks [`ValidateUtf8`] to this
//! module, which walks a small DFA across the following bytes until the
//! sequence is accepted or rejected. The range-restricted second-byte states
//! reject overlong encodings, surrogates and codepoints above U+10FFFF as
//! early as the offending byte, so a rejection always names a single byte.
//!
//! A sequence is at most four bytes and is always validated in one go; no DFA
//! state survives past a call, which is what keeps engine suspension points
//! free of partial-sequence bookkeeping.
//!
//! [`ValidateUtf8`]: crate::Action::ValidateUtf8

/// Validator states. `TailN` expects `N` more continuation bytes in
/// `0x80..=0xBF`; the lead-specific states constrain the second byte to the
/// narrower range that rules out overlong, surrogate and out-of-range forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Utf8State {
    Accept,
    Reject,
    Tail1,
    Tail2,
    Tail3,
    /// After lead `0xE0`: second byte in `0xA0..=0xBF`.
    E0,
    /// After lead `0xED`: second byte in `0x80..=0x9F`.
    Ed,
    /// After lead `0xF0`: second byte in `0x90..=0xBF`.
    F0,
    /// After lead `0xF4`: second byte in `0x80..=0x8F`.
    F4,
}

fn start(lead: u8) -> Utf8State {
    match lead {
        0x00..=0x7F => Utf8State::Accept,
        0xC2..=0xDF => Utf8State::Tail1,
        0xE0 => Utf8State::E0,
        0xE1..=0xEC | 0xEE..=0xEF => Utf8State::Tail2,
        0xED => Utf8State::Ed,
        0xF0 => Utf8State::F0,
        0xF1..=0xF3 => Utf8State::Tail3,
        0xF4 => Utf8State::F4,
        // stray continuations (0x80..=0xBF), overlong leads (0xC0, 0xC1) and
        // leads beyond U+10FFFF (0xF5..)
        _ => Utf8State::Reject,
    }
}

fn step(state: Utf8State, byte: u8) -> Utf8State {
    match (state, byte) {
        (Utf8State::Tail1, 0x80..=0xBF) => Utf8State::Accept,
        (Utf8State::Tail2, 0x80..=0xBF) => Utf8State::Tail1,
        (Utf8State::Tail3, 0x80..=0xBF) => Utf8State::Tail2,
        (Utf8State::E0, 0xA0..=0xBF) | (Utf8State::Ed, 0x80..=0x9F) => Utf8State::Tail1,
        (Utf8State::F0, 0x90..=0xBF) | (Utf8State::F4, 0x80..=0x8F) => Utf8State::Tail2,
        _ => Utf8State::Reject,
    }
}

/// A rejected byte and where it sits in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rejection {
    pub byte: u8,
    pub offset: usize,
}

/// Validates the UTF-8 sequence starting at `input[at]` and returns its
/// length in bytes. An input that ends mid-sequence reports the leading byte,
/// since no continuation byte exists to blame.
pub(crate) fn validate_sequence(input: &[u8], at: usize) -> Result<usize, Rejection> {
    let lead = input[at];
    let mut state = start(lead);
    let mut idx = at;
    loop {
        match state {
            Utf8State::Accept => return Ok(idx + 1 - at),
            Utf8State::Reject => {
                return Err(Rejection {
                    byte: input[idx],
                    offset: idx,
                });
            }
            _ => {}
        }
        idx += 1;
        let Some(&next) = input.get(idx) else {
            return Err(Rejection {
                byte: lead,
                offset: at,
            });
        };
        state = step(state, next);
    }
}
