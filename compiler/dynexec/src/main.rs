//! dynexec - read a method from stdin, run it, print the result.

use std::io;
use std::process::ExitCode;

use dynexec::console::run_session;
use dynexec::Engine;

fn main() -> ExitCode {
    dynexec::init_tracing();

    let engine = Engine::new();
    let stdin = io::stdin();
    let stdout = io::stdout();
    match run_session(&engine, stdin.lock(), stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
