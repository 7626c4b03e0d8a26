mod embed;
mod extract;
mod inspect;
mod trace;
mod utils;

use crate::cli::{Cli, Commands};
use img2svg::ConvertResult;

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> ConvertResult<()> {
    dispatch(cli.command)
}

/// Dispatch the command to the appropriate handler.
fn dispatch(command: Commands) -> ConvertResult<()> {
    match command {
        Commands::Embed(cmd) => embed::run(cmd),
        Commands::Trace(cmd) => trace::run(cmd),
        Commands::Inspect(cmd) => inspect::run(cmd),
        Commands::Extract(cmd) => extract::run(cmd),
    }
}
