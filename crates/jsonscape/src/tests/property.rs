use alloc::{string::String, vec::Vec};

use quickcheck::QuickCheck;
use quickcheck_macros::quickcheck;

use crate::{EscapeOptions, YieldEagerly, escape};

use super::utils::drive;

fn test_count() -> u64 {
    if is_ci::cached() { 10_000 } else { 1_000 }
}

/// Property: wrapping the escaped bytes in quotes yields a JSON string
/// literal that decodes back to the original text.
#[test]
fn round_trips_through_serde_json() {
    fn prop(value: String) -> bool {
        let escaped = escape(value.as_bytes()).unwrap().into_vec();
        let mut quoted = Vec::with_capacity(escaped.len() + 2);
        quoted.push(b'"');
        quoted.extend_from_slice(&escaped);
        quoted.push(b'"');
        let Ok(literal) = core::str::from_utf8(&quoted) else {
            return false;
        };
        serde_json::from_str::<String>(literal).is_ok_and(|back| back == value)
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(String) -> bool);
}

/// Property: suspension and resumption never change the output, whatever the
/// budget and cost weighting.
#[test]
fn suspension_never_changes_output() {
    fn prop(value: String, budget: usize, skip_unit: usize) -> bool {
        let options = EscapeOptions {
            budget: 1 + budget % 97,
            skip_bytes_per_unit: 1 + skip_unit % 16,
            escape_bytes_per_unit: 1,
        };
        let baseline = escape(value.as_bytes()).unwrap().into_vec();
        match drive(value.as_bytes(), &options, &mut YieldEagerly) {
            Ok((out, _)) => out == baseline,
            Err(_) => false,
        }
    }

    QuickCheck::new()
        .tests(test_count())
        .quickcheck(prop as fn(String, usize, usize) -> bool);
}

/// Property: the engine accepts exactly the byte vectors the standard
/// library's UTF-8 validation accepts.
#[quickcheck]
fn validator_agrees_with_std(bytes: Vec<u8>) -> bool {
    escape(&bytes).is_ok() == core::str::from_utf8(&bytes).is_ok()
}
