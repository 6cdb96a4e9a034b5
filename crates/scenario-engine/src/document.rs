//! Scenario document parser
//!
//! Reads the flat `key=value` scenario format into a [`ScenarioDocument`]:
//! the verbatim lines plus the few numeric properties the modifiers need.
//! Unknown keys are not tracked; a tracked key with a non-numeric value
//! fails the whole load.

use crate::catalog::{character_property, global_property, TIMELIMIT, TIMESCALE};
use crate::error::ParseError;
use crate::section::{Line, Section, SectionState};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Extension of scenario files (without dot)
pub const SCENARIO_EXTENSION: &str = "sce";

/// Numeric properties keyed by canonical catalog name
pub type PropertyMap = BTreeMap<&'static str, f64>;

/// A parsed scenario file
///
/// Read-only after parsing; every variant is derived from it without
/// mutating it.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDocument {
    raw_lines: Vec<String>,
    internal_name: Option<String>,
    display_name: String,
    player_profile: Option<String>,
    global_properties: PropertyMap,
    character_profiles: IndexMap<String, PropertyMap>,
}

impl ScenarioDocument {
    /// Original lines, terminators included
    #[inline]
    #[must_use]
    pub fn raw_lines(&self) -> &[String] {
        &self.raw_lines
    }

    /// `name=` value found before the first section
    #[inline]
    #[must_use]
    pub fn internal_name(&self) -> Option<&str> {
        self.internal_name.as_deref()
    }

    /// Name the user sees; tags are derived from this one
    #[inline]
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Profile named by `PlayerCharacters=`, excluded from character mutations
    #[inline]
    #[must_use]
    pub fn player_profile(&self) -> Option<&str> {
        self.player_profile.as_deref()
    }

    /// Global property by canonical name
    #[inline]
    #[must_use]
    pub fn global(&self, property: &str) -> Option<f64> {
        self.global_properties.get(property).copied()
    }

    /// All tracked global properties
    #[inline]
    #[must_use]
    pub fn global_properties(&self) -> &PropertyMap {
        &self.global_properties
    }

    /// Tracked properties of one character profile
    #[inline]
    #[must_use]
    pub fn profile(&self, name: &str) -> Option<&PropertyMap> {
        self.character_profiles.get(name)
    }

    /// All character profiles in file order
    #[inline]
    #[must_use]
    pub fn profiles(&self) -> &IndexMap<String, PropertyMap> {
        &self.character_profiles
    }

    /// Profile names other than the player's, in file order
    pub fn target_profiles(&self) -> impl Iterator<Item = &str> + '_ {
        self.character_profiles
            .keys()
            .map(String::as_str)
            .filter(move |name| Some(*name) != self.player_profile())
    }

    /// Replace the user-visible name (e.g. with the file stem it was loaded from)
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into().trim().to_string();
        self
    }

    /// Summary of the values a user checks before generating variants
    #[must_use]
    pub fn base_stats(&self) -> BaseStats {
        let targets: Vec<String> = self.target_profiles().map(str::to_string).collect();
        let first = targets.first().and_then(|name| self.profile(name));
        let stat = |prop: &str| first.and_then(|p| p.get(prop).copied());
        BaseStats {
            name: self.display_name.clone(),
            radius: stat("MainBBRadius"),
            max_speed: stat("MaxSpeed"),
            max_health: stat("MaxHealth"),
            regen_per_sec: stat("HealthRegenPerSec"),
            timescale: self.global(TIMESCALE),
            timelimit: self.global(TIMELIMIT),
            targets,
        }
    }
}

/// Read-only stats of a loaded scenario, for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaseStats {
    /// Display name
    pub name: String,
    /// Non-player profile names
    pub targets: Vec<String>,
    /// First target's hitbox radius
    pub radius: Option<f64>,
    /// First target's max speed
    pub max_speed: Option<f64>,
    /// First target's max health
    pub max_health: Option<f64>,
    /// First target's regen per second
    pub regen_per_sec: Option<f64>,
    /// Global time scale
    pub timescale: Option<f64>,
    /// Global time limit in seconds
    pub timelimit: Option<f64>,
}

/// Scenario file parser
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentParser;

impl DocumentParser {
    /// Create new parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Read and parse a scenario file
    ///
    /// The display name defaults to the file stem.
    ///
    /// # Errors
    /// - `ParseError::Io` if the file cannot be read
    /// - `ParseError::InvalidNumber` if a tracked value is not numeric
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ScenarioDocument, ParseError> {
        let path = path.as_ref();
        tracing::info!("Loading scenario: {}", path.display());

        let content =
            std::fs::read_to_string(path).map_err(|e| ParseError::io_error(path, e))?;
        let document = self.parse_str(&content)?;

        Ok(match path.file_stem().and_then(|s| s.to_str()) {
            Some(stem) => document.with_display_name(stem),
            None => document,
        })
    }

    /// Parse file content; a leading byte-order mark is ignored
    ///
    /// # Errors
    /// `ParseError::InvalidNumber` if a tracked value is not numeric
    pub fn parse_str(&self, content: &str) -> Result<ScenarioDocument, ParseError> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        self.parse_lines(content.split_inclusive('\n').map(str::to_string).collect())
    }

    /// Parse already-split lines
    ///
    /// # Errors
    /// `ParseError::InvalidNumber` if a tracked value is not numeric
    pub fn parse_lines(&self, raw_lines: Vec<String>) -> Result<ScenarioDocument, ParseError> {
        let mut doc = ScenarioDocument {
            raw_lines: Vec::new(),
            internal_name: None,
            display_name: String::new(),
            player_profile: None,
            global_properties: PropertyMap::new(),
            character_profiles: IndexMap::new(),
        };

        let mut state = SectionState::new();
        for (index, raw) in raw_lines.iter().enumerate() {
            let line = Line::classify(raw);
            state = state.advance(&line);
            if let Line::Entry { key, value } = line {
                record(&mut doc, &state, index + 1, key, value)?;
            }
        }

        doc.display_name = doc.internal_name.clone().unwrap_or_default();
        doc.raw_lines = raw_lines;

        tracing::debug!(
            "Parsed scenario '{}': {} globals, {} profiles",
            doc.display_name,
            doc.global_properties.len(),
            doc.character_profiles.len()
        );
        Ok(doc)
    }
}

fn record(
    doc: &mut ScenarioDocument,
    state: &SectionState,
    line: usize,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    let number = |prop: &'static str| -> Result<(&'static str, f64), ParseError> {
        value
            .parse::<f64>()
            .map(|n| (prop, n))
            .map_err(|_| ParseError::invalid_number(line, key, value))
    };

    match state.section() {
        Section::Preamble => {
            if key.eq_ignore_ascii_case("playercharacters") {
                let name = value.split('.').next().unwrap_or_default();
                doc.player_profile = Some(name.to_string());
            } else if key.eq_ignore_ascii_case("name") {
                doc.internal_name = Some(value.to_string());
            } else if let Some(prop) = global_property(key) {
                let (prop, n) = number(prop)?;
                doc.global_properties.insert(prop, n);
            }
        }
        Section::CharacterProfile => {
            let Some(profile) = state.profile() else {
                return Ok(());
            };
            let props = doc.character_profiles.entry(profile.to_string()).or_default();
            if let Some(prop) = character_property(key) {
                let (prop, n) = number(prop)?;
                props.insert(prop, n);
            }
        }
        Section::Other => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\u{feff}Name=Target A\n\
PlayerCharacters=Player.rot\n\
Timelimit=60.0\n\
ScorePerKill=2.5\n\
Unknown=abc\n\
[Character Profile]\n\
Name=Player\n\
MaxHealth=100\n\
[Character Profile]\n\
MaxSpeed=1\n\
Name=Bot\n\
maxhealth=150\n\
MainBBRadius=45\n\
[Weapon Profile]\n\
Name=Gun\n\
MaxHealth=notanumber\n";

    #[test]
    fn parses_globals_and_profiles() {
        let doc = DocumentParser::new().parse_str(SAMPLE).unwrap();

        assert_eq!(doc.internal_name(), Some("Target A"));
        assert_eq!(doc.display_name(), "Target A");
        assert_eq!(doc.player_profile(), Some("Player"));
        assert_eq!(doc.global("Timelimit"), Some(60.0));
        assert_eq!(doc.global("ScorePerKill"), Some(2.5));
        assert_eq!(doc.global("Timescale"), None);

        assert_eq!(doc.profiles().len(), 2);
        let bot = doc.profile("Bot").unwrap();
        assert_eq!(bot.get("MaxHealth"), Some(&150.0));
        assert_eq!(bot.get("MainBBRadius"), Some(&45.0));
        // Before the profile's name line: not attributed to any profile
        assert_eq!(bot.get("MaxSpeed"), None);
    }

    #[test]
    fn keeps_raw_lines_verbatim() {
        let doc = DocumentParser::new().parse_str("Name=A\r\nfoo = bar\nlast").unwrap();
        assert_eq!(doc.raw_lines(), ["Name=A\r\n", "foo = bar\n", "last"]);
    }

    #[test]
    fn invalid_tracked_number_fails() {
        let err = DocumentParser::new()
            .parse_str("Name=A\nTimelimit=sixty\n")
            .unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { line: 2, .. }));
    }

    #[test]
    fn invalid_profile_number_fails() {
        let err = DocumentParser::new()
            .parse_str("Name=A\n[Character Profile]\nName=Bot\nmaxspeed=fast\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidNumber { line: 4, ref key, .. } if key == "maxspeed"
        ));
    }

    #[test]
    fn invalid_untracked_value_is_ignored() {
        let doc = DocumentParser::new().parse_str("Name=A\nMaxSpeed=fast\n").unwrap();
        assert!(doc.global_properties().is_empty());
    }

    #[test]
    fn globals_only_read_before_first_section() {
        let doc = DocumentParser::new()
            .parse_str("Name=A\n[Other]\nTimelimit=30\nName=B\n")
            .unwrap();
        assert_eq!(doc.global("Timelimit"), None);
        assert_eq!(doc.internal_name(), Some("A"));
    }

    #[test]
    fn base_stats_skip_player() {
        let doc = DocumentParser::new().parse_str(SAMPLE).unwrap();
        let stats = doc.base_stats();
        assert_eq!(stats.targets, vec!["Bot".to_string()]);
        assert_eq!(stats.max_health, Some(150.0));
        assert_eq!(stats.max_speed, None);
        assert_eq!(stats.timelimit, Some(60.0));
    }

    #[test]
    fn display_name_override() {
        let doc = DocumentParser::new()
            .parse_str("Name=internal\n")
            .unwrap()
            .with_display_name(" Shown Name ");
        assert_eq!(doc.display_name(), "Shown Name");
        assert_eq!(doc.internal_name(), Some("internal"));
    }
}
