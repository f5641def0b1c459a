//! Decode command handler: read a saved scan document back into records.

use tracing::{info, warn};

use airscout_core::{NetworkRecord, RawScanDocument};

use crate::cli::{DecodeArgs, OutputFormat};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::util;

fn detail(doc: &RawScanDocument, records: &[NetworkRecord]) -> String {
    let mut blocks = vec![format!(
        "Status: {}{}",
        doc.err_code,
        if doc.err_string.is_empty() {
            String::new()
        } else {
            format!(" ({})", doc.err_string)
        }
    )];
    blocks.extend(records.iter().map(ToString::to_string));
    blocks.join("\n")
}

pub fn handle(args: &DecodeArgs, out: OutputOpts) -> Result<(), CliError> {
    let text = util::read_input(&args.input)?;
    let doc = RawScanDocument::from_json(&text)?;

    let mut records = Vec::with_capacity(doc.networks.len());
    for (index, decoded) in doc.decode_networks().into_iter().enumerate() {
        for failure in &decoded.failures {
            warn!(
                network = index,
                field = failure.field,
                reason = %failure.reason,
                "field could not be decoded, default kept"
            );
        }
        records.push(decoded.value);
    }
    info!(networks = records.len(), status = doc.err_code, "decoded scan document");

    let rendered = match out.format {
        OutputFormat::Table => detail(&doc, &records),
        _ => util::render_networks(&records, out),
    };
    output::print_output(&rendered, out.quiet);
    Ok(())
}
