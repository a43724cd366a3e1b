use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use std::path::PathBuf;

use super::menu;
use pixel_roll_call::config::Config;
use pixel_roll_call::core::{RegionQuery, Session};
use pixel_roll_call::renderer::report;
use pixel_roll_call::storage::snapshot_file;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff", "webp"];

#[derive(Clone, Copy)]
enum Action {
    SelectImage,
    Analyze,
    Import,
    Search,
    Export,
    Quit,
}

impl Action {
    const ALL: [Action; 6] = [
        Action::SelectImage,
        Action::Analyze,
        Action::Import,
        Action::Search,
        Action::Export,
        Action::Quit,
    ];

    fn label(self) -> &'static str {
        match self {
            Action::SelectImage => "Select image",
            Action::Analyze => "Analyze colors",
            Action::Import => "Import data",
            Action::Search => "Search color",
            Action::Export => "Export data",
            Action::Quit => "Quit",
        }
    }
}

/// Menu-driven session. Failures of a single action are printed and the
/// loop continues; only terminal I/O errors end it.
pub fn run_interactive_mode(mut config: Config) -> Result<()> {
    let mut session = Session::new();
    let mut image_path: Option<PathBuf> = None;
    let labels: Vec<&str> = Action::ALL.iter().map(|a| a.label()).collect();

    loop {
        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Pixel Roll Call")
            .default(0)
            .items(&labels)
            .interact()?;

        let outcome = match Action::ALL[selection] {
            Action::SelectImage => select_image(&config, &mut image_path),
            Action::Analyze => analyze(&mut config, image_path.as_deref(), &mut session),
            Action::Import => import(&config, &mut session),
            Action::Search => search(&config, &session),
            Action::Export => export(&config, &session),
            Action::Quit => break,
        };

        if let Err(e) = outcome {
            println!("{e:#}");
        }
        println!();
    }
    Ok(())
}

fn select_image(config: &Config, image_path: &mut Option<PathBuf>) -> Result<()> {
    if let Some(path) = menu::choose_file("Select image", &config.image_dir(), IMAGE_EXTENSIONS)? {
        println!("Selected image: {}", path.display());
        *image_path = Some(path);
    }
    Ok(())
}

fn analyze(config: &mut Config, image_path: Option<&std::path::Path>, session: &mut Session) -> Result<()> {
    let Some(path) = image_path else {
        println!("select an image first.");
        return Ok(());
    };

    config.low_power = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Low power mode (no live progress)")
        .default(config.low_power)
        .interact()?;

    let (snapshot, elapsed) = super::analyze_image(path, config)?;
    print!("{}", report::summary(&snapshot, config.summary_coordinate_limit, Some(elapsed)));
    session.install(snapshot);
    Ok(())
}

fn import(config: &Config, session: &mut Session) -> Result<()> {
    let Some(path) = menu::choose_file("Import data", &config.export_dir(), &[snapshot_file::EXTENSION])? else {
        return Ok(());
    };

    let snapshot = snapshot_file::load(&path)?;
    print!("{}", report::summary(&snapshot, 0, None));
    session.install(snapshot);
    println!("Success");
    Ok(())
}

fn search(config: &Config, session: &Session) -> Result<()> {
    // Checked up front so the user is not asked for input that cannot be used.
    session.current()?;

    let theme = ColorfulTheme::default();
    let color: String = Input::with_theme(&theme).with_prompt("Color: #").interact_text()?;
    let list_all = Confirm::with_theme(&theme)
        .with_prompt("list all")
        .default(false)
        .interact()?;
    let min: String = Input::with_theme(&theme)
        .with_prompt("Min (x,y)")
        .allow_empty(true)
        .interact_text()?;
    let max: String = Input::with_theme(&theme)
        .with_prompt("Max (x,y)")
        .allow_empty(true)
        .interact_text()?;

    let query = RegionQuery::new(color)
        .bounds(super::parse_bounds(Some(&min), Some(&max))?)
        .include_all(list_all)
        .display_limit(config.display_limit);

    print!("{}", super::search_report(session, &query, config.grid_columns)?);
    Ok(())
}

fn export(config: &Config, session: &Session) -> Result<()> {
    let snapshot = match session.current() {
        Ok(snapshot) => snapshot,
        Err(_) => {
            println!("No data to export. analyze an image first.");
            return Ok(());
        }
    };

    let default_name = format!("colors.{}", snapshot_file::EXTENSION);
    let Some(path) = menu::choose_save_path("Export data", &config.export_dir(), &default_name)? else {
        return Ok(());
    };

    let bytes = snapshot_file::save(&path, &snapshot)?;
    println!("{}", report::export_report(&path, bytes));
    Ok(())
}
