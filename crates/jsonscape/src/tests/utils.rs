use alloc::vec::Vec;

use crate::{EscapeError, EscapeOptions, Progress, YieldPoint, escape_resume, escape_with};

/// Drives an operation to completion through the resume protocol, returning
/// the concatenated output and how many times the engine yielded.
pub(crate) fn drive<Y: YieldPoint>(
    input: &[u8],
    options: &EscapeOptions,
    host: &mut Y,
) -> Result<(Vec<u8>, usize), EscapeError> {
    let mut yields = 0;
    let mut progress = escape_with(input, options, host)?;
    loop {
        match progress {
            Progress::Done(out) => return Ok((out.into_vec(), yields)),
            Progress::Yielded(state) => {
                yields += 1;
                progress = escape_resume(input, state, options, host)?;
            }
        }
    }
}

/// Options small enough to force frequent yield offers on any non-trivial
/// input.
pub(crate) fn tiny_budget() -> EscapeOptions {
    EscapeOptions {
        budget: 1,
        skip_bytes_per_unit: 2,
        escape_bytes_per_unit: 1,
    }
}
