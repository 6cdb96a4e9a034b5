//! Scenario folder access
//!
//! Lists `.sce` files by name and loads one as a [`ScenarioDocument`] whose
//! display name is the name the user picked.

use crate::error::BatchError;
use scenario_engine::{DocumentParser, ParseError, ScenarioDocument, SCENARIO_EXTENSION};
use std::path::{Path, PathBuf};

/// Path of `<name>.sce` inside `folder`
#[must_use]
pub fn scenario_path(folder: &Path, name: &str) -> PathBuf {
    folder.join(format!("{}.{SCENARIO_EXTENSION}", name.trim()))
}

/// Scenario names (file stems) in `folder`, sorted case-insensitively
///
/// A folder that does not exist holds no scenarios.
///
/// # Errors
/// `BatchError::Io` if an existing folder cannot be read
pub fn list_scenarios(folder: &Path) -> Result<Vec<String>, BatchError> {
    if !folder.is_dir() {
        return Ok(Vec::new());
    }

    let entries = std::fs::read_dir(folder).map_err(|e| BatchError::io_error(folder, e))?;
    let mut names = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| BatchError::io_error(folder, e))?.path();
        let is_scenario = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(SCENARIO_EXTENSION));
        if !is_scenario || !path.is_file() {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }

    names.sort_by_key(|name| name.to_lowercase());
    Ok(names)
}

/// Names containing `term`, case-insensitively; an empty term keeps all
#[must_use]
pub fn filter_scenarios<'a>(names: &'a [String], term: &str) -> Vec<&'a str> {
    let term = term.trim().to_lowercase();
    names
        .iter()
        .map(String::as_str)
        .filter(|name| term.is_empty() || name.to_lowercase().contains(&term))
        .collect()
}

/// Load `<name>.sce` from `folder`
///
/// # Errors
/// `ParseError` if the file is unreadable or a tracked value is not numeric
pub fn load_scenario(folder: &Path, name: &str) -> Result<ScenarioDocument, ParseError> {
    let document = DocumentParser::new().parse_file(scenario_path(folder, name))?;
    tracing::info!("Success! Scenario file loaded.");
    Ok(document.with_display_name(name))
}
