use clap::Parser;
use lutrader::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
