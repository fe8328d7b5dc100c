use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod decode;
mod error;
mod jobs;
mod output;
mod plan;
mod run;
mod settings;
mod workflow;

use cli::{Command, RootArgs};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = RootArgs::parse();
    match args.command {
        Command::Settings(args) => workflow::run_settings(args),
        Command::Jobs(args) => workflow::run_jobs(args),
        Command::Plan(args) => workflow::run_plan(args),
        Command::Run(args) => workflow::run_run(args),
    }
}
