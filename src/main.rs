//! Test-vector binary: streams trial transcripts to stdout and exits
//! non-zero on the first shared-secret mismatch.
//!
//! Usage: `test-vectors [512|768|1024] [trials]`.

use std::env;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use kem_vectors::{run, VectorRng};
use ml_kem::{MlKem1024, MlKem512, MlKem768};

const DEFAULT_TRIALS: usize = 10_000;

fn main() -> ExitCode {
    let mut args = env::args().skip(1);
    let param_set = args.next().unwrap_or_else(|| "768".to_owned());
    let trials = match args.next() {
        Some(arg) => match arg.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("trial count must be an integer, got {arg:?}");
                return ExitCode::from(2);
            }
        },
        None => DEFAULT_TRIALS,
    };

    let mut rng: VectorRng = VectorRng::seeded();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let result = match param_set.as_str() {
        "512" => run::<MlKem512, _, _>(trials, &mut rng, &mut out),
        "768" => run::<MlKem768, _, _>(trials, &mut rng, &mut out),
        "1024" => run::<MlKem1024, _, _>(trials, &mut rng, &mut out),
        other => {
            eprintln!("unknown parameter set {other:?} (expected 512, 768 or 1024)");
            return ExitCode::from(2);
        }
    };

    let flushed = out.flush();
    match (result, flushed) {
        (Ok(()), Ok(())) => ExitCode::SUCCESS,
        (Err(err), _) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
        (Ok(()), Err(err)) => {
            eprintln!("report output failed: {err}");
            ExitCode::FAILURE
        }
    }
}
