//! `info` command implementation.

use std::path::Path;

use contracts::DecodeConfig;
use observability::{SeriesAggregator, SeriesSummary, StatsSummary};
use scan_session::{Advance, StreamingSession};
use serde::Serialize;
use tracing::info;

use super::decode::resolve_config;
use crate::cli::InfoArgs;
use crate::error::{CliError, Result};

/// Stream info for JSON output
#[derive(Serialize)]
struct StreamInfo {
    path: String,
    format_version: u16,
    bytes: u64,
    sync_to_pps: bool,
    pps_locked: bool,
    ticks_per_second: u32,
    chunks: u64,
    packets: PacketInfo,
    readings: ReadingInfo,
}

#[derive(Serialize)]
struct PacketInfo {
    total: u64,
    inclination: u64,
    time: u64,
    other: u64,
}

#[derive(Serialize)]
struct ReadingInfo {
    count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    first_time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_time: Option<f64>,
    time_span: f64,
    time_regressions: u64,
    roll: RangeInfo,
    pitch: RangeInfo,
}

#[derive(Serialize)]
struct RangeInfo {
    min: f64,
    max: f64,
    mean: f64,
    std_dev: f64,
}

impl From<&StatsSummary> for RangeInfo {
    fn from(stats: &StatsSummary) -> Self {
        Self {
            min: stats.min,
            max: stats.max,
            mean: stats.mean,
            std_dev: stats.std_dev,
        }
    }
}

/// Execute the `info` command
pub fn run_info(args: &InfoArgs) -> Result<()> {
    let config = resolve_config(&args.decode)?;
    let (info, series) = collect_info(&args.decode.path, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print_info(&info, &series);
    }
    Ok(())
}

fn collect_info(path: &Path, config: &DecodeConfig) -> Result<(StreamInfo, SeriesSummary)> {
    info!(path = %path.display(), "Collecting stream info");

    let mut session =
        StreamingSession::open_with_config(path, config).map_err(|e| CliError::scan(path, e))?;
    let mut series = SeriesAggregator::new();

    while let Advance::Readings(readings) = session.advance().map_err(|e| CliError::scan(path, e))? {
        series.extend(readings);
    }

    let transport = session.transport();
    let totals = session.stats();
    let clock = session.clock();
    let summary = series.summary();

    let info = StreamInfo {
        path: path.display().to_string(),
        format_version: transport.header().version,
        bytes: transport.offset(),
        sync_to_pps: clock.sync_to_pps(),
        pps_locked: clock.is_pps_locked(),
        ticks_per_second: clock.ticks_per_second(),
        chunks: session.cycles(),
        packets: PacketInfo {
            total: totals.packets,
            inclination: totals.inclinations,
            time: totals.time_packets,
            other: totals.other,
        },
        readings: ReadingInfo {
            count: summary.total,
            first_time: summary.first_time,
            last_time: summary.last_time,
            time_span: summary.time_span,
            time_regressions: summary.time_regressions,
            roll: RangeInfo::from(&summary.roll),
            pitch: RangeInfo::from(&summary.pitch),
        },
    };
    Ok((info, summary))
}

fn print_info(info: &StreamInfo, series: &SeriesSummary) {
    println!("📄 Stream {}", info.path);
    println!("   ├─ Format version: {}", info.format_version);
    println!("   ├─ Bytes: {}", info.bytes);
    println!("   ├─ Chunks: {}", info.chunks);
    println!(
        "   └─ Clock: {} ticks/s, PPS {}{}",
        info.ticks_per_second,
        if info.pps_locked { "locked" } else { "not seen" },
        if info.sync_to_pps { " (sync requested)" } else { "" }
    );

    println!("\n📦 Packets ({})", info.packets.total);
    println!("   ├─ Inclination: {}", info.packets.inclination);
    println!("   ├─ Time: {}", info.packets.time);
    println!("   └─ Other: {}", info.packets.other);

    println!();
    print!("{series}");
}
