use bcdl_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // File log if the state dir is writable, stderr otherwise.
    logging::init_or_stderr();

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("bcdl error: {:#}", err);
        std::process::exit(1);
    }
}
