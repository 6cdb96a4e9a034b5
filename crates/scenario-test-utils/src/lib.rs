//! Testing utilities for the scenario variant workspace
//!
//! Shared fixtures: scenario text builders and temporary scenario folders.

#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Builds scenario file text line by line
#[derive(Debug, Clone, Default)]
pub struct ScenarioBuilder {
    lines: Vec<String>,
}

impl ScenarioBuilder {
    /// Preamble with a name line only
    pub fn named(name: &str) -> Self {
        Self::default().entry("Name", name)
    }

    pub fn entry(mut self, key: &str, value: impl ToString) -> Self {
        self.lines.push(format!("{key}={}", value.to_string()));
        self
    }

    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn player(self, profile: &str) -> Self {
        let value = format!("{profile}.rot");
        self.entry("PlayerCharacters", value)
    }

    /// Open a `[Character Profile]` section for `name`
    pub fn profile(self, name: &str) -> Self {
        self.raw("[Character Profile]").entry("Name", name)
    }

    pub fn section(self, header: &str) -> Self {
        self.raw(&format!("[{header}]"))
    }

    pub fn build(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// A typical target-switching scenario: one player, two bots
pub fn sample_scenario() -> String {
    ScenarioBuilder::named("Target A")
        .player("Player")
        .entry("Timelimit", "60.0")
        .entry("Timescale", "1.0")
        .entry("ScorePerHit", "2.0")
        .entry("ScorePerKill", "10.0")
        .entry("Description", "Track the bots")
        .profile("Player")
        .entry("MaxHealth", "100.0")
        .entry("MainBBRadius", "20.0")
        .entry("MaxSpeed", "500.0")
        .profile("Bot Fast")
        .entry("MaxHealth", "150.0")
        .entry("HealthRegenPerSec", "5.0")
        .entry("MainBBRadius", "45.0")
        .entry("MaxSpeed", "300.0")
        .entry("MaxCrouchSpeed", "0.0")
        .profile("Bot Slow")
        .entry("MaxHealth", "200.0")
        .entry("HealthRegenPerSec", "0.0")
        .entry("MainBBRadius", "30.0")
        .entry("MaxSpeed", "150.0")
        .entry("MaxCrouchSpeed", "300.0")
        .section("Weapon Profile")
        .entry("Name", "Gun")
        .entry("MaxHealth", "not-a-number")
        .build()
}

/// Temporary folder of `.sce` files
pub struct ScenarioFolder {
    dir: TempDir,
}

impl ScenarioFolder {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `<name>.sce`
    pub fn add(&self, name: &str, text: &str) -> PathBuf {
        self.add_file(&format!("{name}.sce"), text)
    }

    pub fn add_file(&self, file_name: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join(file_name);
        fs::write(&path, text).unwrap();
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.dir.path().join(format!("{name}.sce"))).unwrap()
    }

    pub fn exists(&self, name: &str) -> bool {
        self.dir.path().join(format!("{name}.sce")).exists()
    }
}

impl Default for ScenarioFolder {
    fn default() -> Self {
        Self::new()
    }
}
