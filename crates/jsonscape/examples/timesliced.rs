//! Drives one escape operation through a toy round-robin scheduler,
//! interleaving it with other queued work between yields.

use jsonscape::{EscapeOptions, Progress, YieldEagerly, escape_resume, escape_with};

fn main() {
    let input = "log line with \"quotes\", tabs\tand naïve unicode\n"
        .repeat(2000)
        .into_bytes();

    // A small budget so the operation cannot monopolize the scheduler.
    let options = EscapeOptions {
        budget: 256,
        ..EscapeOptions::default()
    };

    let mut other_work_done = 0u32;
    let mut slices = 0u32;
    let mut progress = escape_with(&input, &options, &mut YieldEagerly).expect("valid UTF-8 input");

    let out = loop {
        match progress {
            Progress::Done(out) => break out,
            Progress::Yielded(state) => {
                slices += 1;
                // ... the scheduler runs something else here ...
                other_work_done += 1;
                progress = escape_resume(&input, state, &options, &mut YieldEagerly)
                    .expect("valid UTF-8 input");
            }
        }
    };

    println!(
        "escaped {} bytes into {} bytes over {slices} time slices ({other_work_done} interleaved tasks)",
        input.len(),
        out.len()
    );
}
