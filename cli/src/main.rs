mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, scan};
use terminal::logging;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();
    logging::init_logging();

    let cfg = commands.into_config();
    match scan::scan(&cfg).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
