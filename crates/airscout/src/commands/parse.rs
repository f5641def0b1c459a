//! Parse command handler: offline parsing of captured `iw` output.

use tracing::info;

use airscout_core::ScanParser;

use crate::cli::ParseArgs;
use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::util;

pub fn handle(args: &ParseArgs, out: OutputOpts) -> Result<(), CliError> {
    let text = util::read_input(&args.input)?;
    let networks = ScanParser::new().parse_str(&text);
    info!(input = %args.input.display(), networks = networks.len(), "parsed scan output");

    let rendered = util::render_networks(networks.values(), out);
    output::print_output(&rendered, out.quiet);
    Ok(())
}
