//! Channels command handler: dump the channel plan.

use serde::Serialize;
use tabled::Tabled;

use airscout_core::FrequencyTable;

use crate::output::{self, OutputOpts};

#[derive(Serialize)]
struct Channel {
    channel: u32,
    frequency: u32,
    band: &'static str,
}

#[derive(Tabled)]
struct ChannelRow {
    #[tabled(rename = "Channel")]
    channel: u32,
    #[tabled(rename = "Frequency (MHz)")]
    frequency: u32,
    #[tabled(rename = "Band")]
    band: &'static str,
}

fn band(mhz: u32) -> &'static str {
    match mhz {
        ..3000 => "2.4 GHz",
        3000..5000 => "4.9 GHz",
        _ => "5 GHz",
    }
}

pub fn handle(out: OutputOpts) {
    let table = FrequencyTable::standard();
    let channels: Vec<Channel> = table
        .iter()
        .filter_map(|(channel, _)| {
            table.frequency_mhz(channel).map(|frequency| Channel {
                channel,
                frequency,
                band: band(frequency),
            })
        })
        .collect();

    let rendered = output::render_list(
        out.format,
        &channels,
        |c| ChannelRow {
            channel: c.channel,
            frequency: c.frequency,
            band: c.band,
        },
        |c| format!("{} {}", c.channel, c.frequency),
    );
    output::print_output(&rendered, out.quiet);
}
