//! Interfaces command handler.

use serde::Serialize;
use tabled::Tabled;

use airscout_core::{InterfaceLister, parse_interfaces, parse_monitor_interfaces};

use crate::cli::InterfacesArgs;
use crate::config::Config;
use crate::error::CliError;
use crate::output::{self, OutputOpts};

#[derive(Serialize)]
struct Interface {
    name: String,
    monitor: bool,
}

#[derive(Tabled)]
struct InterfaceRow {
    #[tabled(rename = "Interface")]
    name: String,
    #[tabled(rename = "Mode")]
    mode: &'static str,
}

impl From<&Interface> for InterfaceRow {
    fn from(i: &Interface) -> Self {
        Self {
            name: i.name.clone(),
            mode: if i.monitor { "monitor" } else { "-" },
        }
    }
}

pub fn handle(args: &InterfacesArgs, cfg: &Config, out: OutputOpts) -> Result<(), CliError> {
    let text = InterfaceLister::new(cfg.scan.iwconfig_path.clone()).run()?;
    let monitor = parse_monitor_interfaces(&text);

    let names = if args.monitor {
        monitor.clone()
    } else {
        parse_interfaces(&text)
    };
    if names.is_empty() {
        if !out.quiet {
            eprintln!(
                "No {}wireless interfaces found.",
                if args.monitor { "monitor mode " } else { "" }
            );
        }
        return Ok(());
    }

    let interfaces: Vec<Interface> = names
        .into_iter()
        .map(|name| Interface {
            monitor: monitor.contains(&name),
            name,
        })
        .collect();

    let rendered = output::render_list(
        out.format,
        &interfaces,
        |i| InterfaceRow::from(i),
        |i| i.name.clone(),
    );
    output::print_output(&rendered, out.quiet);
    Ok(())
}
