use clap::Parser;
use tradelog::cli::{Cli, run};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
