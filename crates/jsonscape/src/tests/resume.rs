use alloc::vec;
use alloc::vec::Vec;

use crate::{
    EngineState, EscapeError, Escaped, NeverYield, Progress, YieldEagerly, escape, escape_resume,
    escape_with,
};

use super::utils::{drive, tiny_budget};

#[test]
fn tiny_budget_yields_and_output_is_identical() {
    let mut input = Vec::new();
    for _ in 0..64 {
        input.extend_from_slice("x\"y\\z\t\u{20AC} plain run ".as_bytes());
    }
    let unbounded = escape(&input).unwrap().into_vec();
    let (out, yields) = drive(&input, &tiny_budget(), &mut YieldEagerly).unwrap();
    assert!(yields > 0, "a tiny budget must yield at least once");
    assert_eq!(out, unbounded);
}

#[test]
fn declined_yields_run_to_completion_in_one_call() {
    let input = b"needs \"escaping\" everywhere\n".repeat(32);
    let progress = escape_with(&input, &tiny_budget(), &mut NeverYield).unwrap();
    assert!(matches!(progress, Progress::Done(_)));
}

#[test]
fn skip_only_input_stays_zero_copy_across_yields() {
    let input = vec![b'p'; 1024];
    let options = tiny_budget();
    let mut yields = 0;
    let mut progress = escape_with(&input, &options, &mut YieldEagerly).unwrap();
    loop {
        match progress {
            Progress::Done(out) => {
                assert!(matches!(out, Escaped::Borrowed(_)));
                break;
            }
            Progress::Yielded(state) => {
                yields += 1;
                progress = escape_resume(&input, state, &options, &mut YieldEagerly).unwrap();
            }
        }
    }
    assert!(yields > 0);
}

#[test]
fn state_mismatch_is_rejected_before_scanning() {
    let input = b"aaaaaaaaaaaaaaaa\"aaaaaaaaaaaaaaaa".repeat(8);
    let Progress::Yielded(state) = escape_with(&input, &tiny_budget(), &mut YieldEagerly).unwrap()
    else {
        panic!("expected a yield");
    };
    assert!(matches!(
        escape_resume(b"x", state, &tiny_budget(), &mut YieldEagerly),
        Err(EscapeError::StateMismatch)
    ));
}

#[test]
fn invalid_sequence_found_after_resumption() {
    let mut input = b"filler ".repeat(64);
    input.extend_from_slice(b"\"quote then bad: \xE2\x28");
    let err = drive(&input, &tiny_budget(), &mut YieldEagerly).unwrap_err();
    assert!(matches!(err, EscapeError::InvalidUtf8 { byte: 0x28, .. }));
}

#[test]
fn fresh_state_behaves_like_escape_with() {
    let input = b"tab\there";
    let progress =
        escape_resume(input, EngineState::new(), &tiny_budget(), &mut NeverYield).unwrap();
    let Progress::Done(out) = progress else {
        panic!("NeverYield cannot suspend");
    };
    assert_eq!(out.into_vec(), b"tab\\there");
}

#[test]
fn engine_state_survives_serde() {
    let mut input = Vec::new();
    for _ in 0..64 {
        input.extend_from_slice(b"key=\"value\"; ");
    }
    let options = tiny_budget();
    let Progress::Yielded(state) = escape_with(&input, &options, &mut YieldEagerly).unwrap() else {
        panic!("expected a yield");
    };

    let json = serde_json::to_string(&state).unwrap();
    let thawed: EngineState = serde_json::from_str(&json).unwrap();

    let mut progress = escape_resume(&input, thawed, &options, &mut YieldEagerly).unwrap();
    let out = loop {
        match progress {
            Progress::Done(out) => break out.into_vec(),
            Progress::Yielded(state) => {
                progress = escape_resume(&input, state, &options, &mut YieldEagerly).unwrap();
            }
        }
    };
    assert_eq!(out, escape(&input).unwrap().into_vec());
}
