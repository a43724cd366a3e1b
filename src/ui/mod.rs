pub mod interactive;
pub mod menu;

use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};

use pixel_roll_call::config::Config;
use pixel_roll_call::core::{
    Coordinate, ImageMeta, IndexError, IndexSnapshot, RegionBounds, RegionQuery, ScanWorker, Session,
};
use pixel_roll_call::decoder::image_file;
use pixel_roll_call::renderer::{rasterize, report, StatusDisplay};

/// Decode and scan an image, drawing live progress unless low-power mode is
/// on. Returns the snapshot and the scan time.
pub fn analyze_image(path: &Path, config: &Config) -> Result<(IndexSnapshot, Duration)> {
    let image = image_file::open(path)?;
    let meta = ImageMeta::of(&image);
    log::info!("analyzing {:?} ({}x{})", path, meta.width, meta.height);

    let started = Instant::now();
    let snapshot = if config.low_power {
        IndexSnapshot::scan(&image)
    } else {
        let mut display = StatusDisplay::new(&meta, config.grid_columns);
        let worker = ScanWorker::spawn(image, config.progress_interval());
        for progress in worker.progress().iter() {
            if let Err(e) = display.render(progress) {
                log::warn!("progress display failed: {e}");
            }
        }
        display.clear()?;
        worker.finish()?
    };

    Ok((snapshot, started.elapsed()))
}

/// Run a query against the session and lay out the result with its grid.
pub fn search_report(session: &Session, query: &RegionQuery, columns: usize) -> Result<String, IndexError> {
    let snapshot = session.current()?;
    let outcome = session.search(query)?;
    let meta = snapshot.meta();
    let grid = rasterize(outcome.matches(), meta.width, meta.height, columns);
    Ok(report::query_report(&outcome, &grid))
}

/// Blank inputs mean "not given".
pub fn parse_bounds(min: Option<&str>, max: Option<&str>) -> Result<RegionBounds, IndexError> {
    let parse = |text: Option<&str>| -> Result<Option<Coordinate>, IndexError> {
        match text.map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => text.parse().map(Some),
        }
    };
    Ok(RegionBounds { min: parse(min)?, max: parse(max)? })
}
