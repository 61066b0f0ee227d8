//! Binary entrypoint for the `targetscope` CLI.

use std::process::ExitCode;

use targetscope::ErrorKind;

fn main() -> ExitCode {
    // A missing .env file is fine; CI usually sets the variables directly.
    dotenvy::dotenv().ok();

    // Recording and replay are handled in commands::dispatch via
    // TARGETSCOPE_RECORD=<dir> and TARGETSCOPE_REPLAY=<dir>.
    match targetscope::run(std::env::args()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) if err.kind() == ErrorKind::Usage => {
            eprint!("{err}");
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
