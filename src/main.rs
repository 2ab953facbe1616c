use bob::cli::handlers::{handle, logging_config};
use bob::cli::CliArgs;
use bob::util::init_logging;
use bob::VERSION;

use clap::Parser;
use tracing::debug;

fn main() {
    let args = CliArgs::parse();
    init_logging(logging_config(&args));

    debug!("bob v{} starting", VERSION);
    debug!("Arguments: {:?}", args);

    std::process::exit(handle(&args));
}
