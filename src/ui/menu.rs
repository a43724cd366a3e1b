use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::fs;
use std::path::{Path, PathBuf};

const TYPE_PATH: &str = "Enter a path...";

/// Offer the files in `dir` whose extension is in `extensions`, plus a
/// free-form path entry. Returns `None` when the user enters nothing.
pub fn choose_file(prompt: &str, dir: &Path, extensions: &[&str]) -> Result<Option<PathBuf>> {
    let mut files: Vec<PathBuf> = match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| has_extension(path, extensions))
            .collect(),
        Err(e) => {
            log::debug!("cannot list {:?}: {}", dir, e);
            Vec::new()
        }
    };
    files.sort();

    if !files.is_empty() {
        let mut names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap_or_default().to_string_lossy().to_string())
            .collect();
        names.push(TYPE_PATH.to_string());

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(0)
            .items(&names)
            .interact()?;

        if selection < files.len() {
            return Ok(Some(files.swap_remove(selection)));
        }
    }

    let typed: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("{prompt} (path)"))
        .allow_empty(true)
        .interact_text()?;
    let typed = typed.trim();
    Ok((!typed.is_empty()).then(|| PathBuf::from(typed)))
}

/// Ask for a destination path, proposing `default_name` inside `dir`.
pub fn choose_save_path(prompt: &str, dir: &Path, default_name: &str) -> Result<Option<PathBuf>> {
    let typed: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(dir.join(default_name).to_string_lossy().to_string())
        .allow_empty(true)
        .interact_text()?;
    let typed = typed.trim();
    Ok((!typed.is_empty()).then(|| PathBuf::from(typed)))
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();
    extensions.contains(&ext.as_str())
}
