mod ui;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pixel_roll_call::config::Config;
use pixel_roll_call::core::{IndexSnapshot, RegionQuery, Session};
use pixel_roll_call::decoder::image_file;
use pixel_roll_call::renderer::report;
use pixel_roll_call::storage::snapshot_file;
use pixel_roll_call::utils::logger;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (JSON); defaults to the user config directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Columns of the ASCII grids
    #[arg(long, global = true)]
    columns: Option<usize>,
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index every color of an image
    Analyze {
        #[arg(short, long)]
        image: PathBuf,
        /// Save the index to this snapshot file
        #[arg(short, long)]
        export: Option<PathBuf>,
        #[arg(long, default_value_t = false, help = "Scan without live progress display")]
        low_power: bool,
    },
    /// Locate one color, optionally inside a rectangle
    Search {
        #[arg(short, long, conflicts_with = "snapshot", required_unless_present = "snapshot")]
        image: Option<PathBuf>,
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
        /// Six hex digits, e.g. FF0000
        #[arg(short, long)]
        color: String,
        /// Lower corner as x,y
        #[arg(long)]
        min: Option<String>,
        /// Upper corner as x,y
        #[arg(long)]
        max: Option<String>,
        /// List every coordinate, ignoring bounds
        #[arg(short, long, default_value_t = false)]
        all: bool,
    },
    /// Summarize a snapshot file
    Inspect {
        snapshot: PathBuf,
    },
    /// Interactive Mode (Menu)
    Interactive,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(columns) = cli.columns {
        config.grid_columns = columns;
    }
    config.validate()?;

    match cli.command {
        Commands::Analyze { image, export, low_power } => {
            config.low_power |= low_power;
            let (snapshot, elapsed) = ui::analyze_image(&image, &config)?;
            print!("{}", report::summary(&snapshot, config.summary_coordinate_limit, Some(elapsed)));

            if let Some(path) = export {
                let bytes = snapshot_file::save(&path, &snapshot)?;
                println!("{}", report::export_report(&path, bytes));
            }
        }
        Commands::Search { image, snapshot, color, min, max, all } => {
            let loaded = match (image, snapshot) {
                (_, Some(path)) => snapshot_file::load(&path)?,
                (Some(path), None) => IndexSnapshot::scan(&image_file::open(&path)?),
                (None, None) => bail!("either --image or --snapshot is required"),
            };
            let mut session = Session::new();
            session.install(loaded);

            let query = RegionQuery::new(color)
                .bounds(ui::parse_bounds(min.as_deref(), max.as_deref())?)
                .include_all(all)
                .display_limit(config.display_limit);
            let text = ui::search_report(&session, &query, config.grid_columns)
                .context("Search failed")?;
            print!("{text}");
        }
        Commands::Inspect { snapshot } => {
            let loaded = snapshot_file::load(&snapshot)?;
            print!("{}", report::summary(&loaded, 0, None));
        }
        Commands::Interactive => {
            ui::interactive::run_interactive_mode(config)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixel_roll_call::core::{Coordinate, IndexError, RegionBounds};

    #[test]
    fn test_cli_parses_search() {
        let cli = Cli::try_parse_from([
            "pixel_roll_call", "search", "-s", "x.prc", "-c", "FF0000", "--min", "1,2",
        ])
        .unwrap();
        match cli.command {
            Commands::Search { snapshot, color, min, max, all, .. } => {
                assert_eq!(snapshot, Some(PathBuf::from("x.prc")));
                assert_eq!(color, "FF0000");
                assert_eq!(min.as_deref(), Some("1,2"));
                assert!(max.is_none());
                assert!(!all);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_cli_search_needs_a_source() {
        assert!(Cli::try_parse_from(["pixel_roll_call", "search", "-c", "FF0000"]).is_err());
    }

    #[test]
    fn test_parse_bounds_blank_means_unset() {
        let bounds = ui::parse_bounds(Some("  "), Some("4, 5")).unwrap();
        assert_eq!(bounds, RegionBounds { min: None, max: Some(Coordinate::new(4, 5)) });
        assert!(ui::parse_bounds(None, None).unwrap().is_unspecified());
        assert!(matches!(
            ui::parse_bounds(Some("4;5"), None),
            Err(IndexError::InvalidCoordinateFormat(_))
        ));
    }
}
