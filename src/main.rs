use clap::Parser;
use tickchart::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
