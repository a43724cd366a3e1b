use chrono::NaiveTime;
use std::fmt::Write;
use std::path::Path;
use std::time::Duration;

use super::grid::AsciiGrid;
use crate::core::{IndexSnapshot, QueryOutcome, ScanProgress};

/// Per-color pixel counts followed by image facts.
///
/// Colors with at most `coordinate_limit` pixels also list their
/// coordinates; pass 0 to list none. `elapsed` is only known for fresh scans.
pub fn summary(snapshot: &IndexSnapshot, coordinate_limit: usize, elapsed: Option<Duration>) -> String {
    let mut out = String::new();
    for (key, coords) in snapshot.index().iter() {
        let _ = writeln!(out, "{key}: {} pixels", coords.len());
        if coords.len() <= coordinate_limit {
            for c in coords {
                let _ = writeln!(out, "    {c}");
            }
        }
    }

    let meta = snapshot.meta();
    let _ = write!(out, "\nResolution: {}x{}", meta.width, meta.height);
    let _ = writeln!(out, "\nBit Depth: {} bits", meta.bit_depth());
    if let Some(elapsed) = elapsed {
        let _ = writeln!(out, "\nTime taken: {:.1} s", elapsed.as_secs_f64());
    }
    out
}

pub fn query_report(outcome: &QueryOutcome, grid: &AsciiGrid) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Color: {}", outcome.color());
    let _ = writeln!(out, "{grid}\n");
    let _ = writeln!(out, "occurrences: {}\n", outcome.count());
    for c in outcome.displayed() {
        let _ = writeln!(out, "    {c}");
    }
    if outcome.is_truncated() {
        out.push_str("    ...\n");
    }
    out
}

/// `MM:SS [pp.p%]` headline over the progress grid.
pub fn progress_status(progress: ScanProgress, elapsed: Duration, grid: &AsciiGrid) -> String {
    format!("{} [{:.1}%]\n{grid}", format_clock(elapsed), progress.percent())
}

pub fn export_report(path: &Path, bytes: u64) -> String {
    let megabytes = bytes as f64 / (1024.0 * 1024.0);
    format!("Success\n{} \n{megabytes:.2} MB", path.display())
}

/// Minutes and seconds of `elapsed`, wrapping at one hour.
fn format_clock(elapsed: Duration) -> String {
    let secs = (elapsed.as_secs() % 3600) as u32;
    NaiveTime::from_num_seconds_from_midnight_opt(secs, 0)
        .map(|t| t.format("%M:%S").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}
