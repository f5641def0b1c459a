//! Scan command handler.

use tracing::{debug, info};

use airscout_core::{GpsLocation, IwScanCommand, ScanReport, Scanner};

use crate::cli::{GlobalOpts, OutputFormat, ScanArgs};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output::{self, OutputOpts};

use super::util;

/// `--lat/--lon` (clap enforces they come together) plus optional alt/speed.
fn flag_location(args: &ScanArgs) -> Option<GpsLocation> {
    match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Some(GpsLocation::new(
            lat,
            lon,
            args.alt.unwrap_or_default(),
            args.speed.unwrap_or_default(),
        )),
        _ => None,
    }
}

fn detail(report: &ScanReport, out: OutputOpts) -> String {
    if !report.is_success() {
        return String::new();
    }
    util::render_networks(report.networks.values(), out)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    args: ScanArgs,
    cfg: &Config,
    global: &GlobalOpts,
    out: OutputOpts,
) -> Result<(), CliError> {
    let profile = config::resolve_profile(global, cfg)?;

    let interface = args
        .interface
        .clone()
        .or_else(|| profile.interface.clone())
        .ok_or(CliError::NoInterface)?;
    let hunt = if args.frequencies.is_empty() {
        profile.hunt_frequencies.clone()
    } else {
        args.frequencies.clone()
    };
    let location = flag_location(&args).or_else(|| profile.location.map(GpsLocation::from));

    let scan_config = config::resolve_scan_config(cfg)?;
    debug!(
        interface,
        ?hunt,
        iw = %scan_config.iw_path,
        has_location = location.is_some(),
        "starting scan"
    );
    let scanner = Scanner::new(IwScanCommand::new(scan_config.iw_path.clone()), scan_config);

    let what = if hunt.is_empty() {
        format!("Scanning on {interface}...")
    } else {
        format!("Scanning {} frequencies on {interface}...", hunt.len())
    };
    let pb = util::spinner(&what, out);
    let result = scanner.scan_networks(&interface, location.as_ref(), &hunt);
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    let report = result?;

    info!(
        interface,
        status = report.err_code,
        networks = report.networks.len(),
        "scan finished"
    );

    // Structured formats always carry the full document, errors included.
    let printed = match out.format {
        OutputFormat::Table | OutputFormat::Plain if !report.is_success() => String::new(),
        format => output::render_single(
            format,
            &report.to_document(),
            |_| detail(&report, out),
            |_| {
                report
                    .networks
                    .values()
                    .map(|n| n.mac_addr.clone())
                    .collect::<Vec<_>>()
                    .join("\n")
            },
        ),
    };
    output::print_output(&printed, out.quiet);

    if report.is_success() {
        Ok(())
    } else {
        Err(CliError::ScanFailed {
            code: report.err_code,
            message: report.err_string,
        })
    }
}
