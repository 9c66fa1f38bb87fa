use std::env;
use std::process;

use dispensary_dashboard::{cli, logging};

fn main() {
    if let Err(err) = logging::init_tracing() {
        eprintln!("failed to initialize logging: {err}");
    }
    let args: Vec<String> = env::args().collect();
    process::exit(cli::run_with_args(&args));
}
