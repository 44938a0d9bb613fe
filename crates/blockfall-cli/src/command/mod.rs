use clap::{Parser, Subcommand};

use self::{config::PrintConfigArg, simulate::SimulateArg};

mod config;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a game with random input and report the result as JSON
    Simulate(#[clap(flatten)] SimulateArg),
    /// Print the default game config as JSON
    PrintConfig(#[clap(flatten)] PrintConfigArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode.unwrap_or(Mode::Simulate(SimulateArg::default())) {
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::PrintConfig(arg) => config::run(&arg)?,
    }
    Ok(())
}
