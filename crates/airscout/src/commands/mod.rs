//! Command dispatch.

pub mod channels;
pub mod config_cmd;
pub mod decode;
pub mod interfaces;
pub mod parse;
pub mod scan;
mod util;

use clap::CommandFactory;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::config::Config;
use crate::error::CliError;
use crate::output::OutputOpts;

pub fn dispatch(
    cmd: Command,
    cfg: &Config,
    global: &GlobalOpts,
    out: OutputOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Scan(args) => scan::handle(args, cfg, global, out),
        Command::Parse(args) => parse::handle(&args, out),
        Command::Decode(args) => decode::handle(&args, out),
        Command::Interfaces(args) => interfaces::handle(&args, cfg, out),
        Command::Channels => {
            channels::handle(out);
            Ok(())
        }
        Command::Config(args) => config_cmd::handle(args, cfg, out),
        Command::Completions(args) => {
            let mut cmd = Cli::command();
            clap_complete::generate(args.shell, &mut cmd, "airscout", &mut std::io::stdout());
            Ok(())
        }
    }
}
