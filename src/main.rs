//! twledger main entrypoint.

use twledger::run;

fn main() {
    if let Err(e) = run() {
        tracing::error!(error = %e, "command failed");
        eprintln!("Error: {}", e.client_message());
        std::process::exit(1);
    }
}
