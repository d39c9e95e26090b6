use clap::Parser;
use fuzzysignal::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    fuzzysignal::logging::init_logging();
    run(Cli::parse())
}
