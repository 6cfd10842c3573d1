use clap::Parser;
use loglens::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    run(Cli::parse())
}
