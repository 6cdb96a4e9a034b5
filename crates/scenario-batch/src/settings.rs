//! Settings profiles
//!
//! Persisted as pretty-printed JSON. Each profile holds the scenario folder,
//! the candidate value lists, which values are checked, and the tag texts
//! used in generated names. Unreadable or legacy files never fail a load:
//! they are replaced with (or migrated into) a fresh `Default` profile.

use crate::error::SettingsError;
use indexmap::IndexMap;
use scenario_engine::{ModifierKey, TagTexts, ValueList, VariantRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Name of the profile created on first run
pub const DEFAULT_PROFILE: &str = "Default";

/// Conventional scenario folder of a Steam install
pub const DEFAULT_SCENARIO_PATH: &str = r"C:\Program Files (x86)\Steam\steamapps\common\FPSAimTrainer\FPSAimTrainer\Saved\SaveGames\Scenarios";

/// One named settings profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Folder scanned for `.sce` files
    pub folder_path: PathBuf,
    /// Shared by SIZE, SPEED and TIMESCALE
    pub percentages: Vec<u32>,
    /// DURATION seconds
    pub durations: Vec<u32>,
    /// HP percentages
    pub hp_percentages: Vec<u32>,
    /// REGEN_RATE percentages of max health
    pub regen_percentages: Vec<u32>,
    /// `"<MODIFIER>_<index>"` → checked
    pub checkboxes: BTreeMap<String, bool>,
    /// Tag text per modifier
    pub variant_tags: BTreeMap<ModifierKey, String>,
}

impl Default for Profile {
    fn default() -> Self {
        let mut profile = Self {
            folder_path: PathBuf::from(DEFAULT_SCENARIO_PATH),
            percentages: vec![50, 60, 70, 80, 90, 110, 120, 130, 140, 150, 200],
            durations: vec![15, 30, 45, 60, 90, 120],
            hp_percentages: vec![20, 50, 80, 90, 110, 130, 150, 200, 300],
            regen_percentages: vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100],
            checkboxes: BTreeMap::new(),
            variant_tags: ModifierKey::ALL
                .into_iter()
                .map(|key| (key, key.definition().tag_text.to_string()))
                .collect(),
        };

        for key in ModifierKey::ALL {
            let checks: Vec<(String, bool)> = profile
                .values(key)
                .iter()
                .enumerate()
                .map(|(i, &value)| {
                    let off = matches!(key, ModifierKey::Hp | ModifierKey::RegenRate)
                        || (key == ModifierKey::Duration && value == 60);
                    (checkbox_key(key, i), !off)
                })
                .collect();
            profile.checkboxes.extend(checks);
        }
        profile
    }
}

fn checkbox_key(key: ModifierKey, index: usize) -> String {
    format!("{key}_{index}")
}

impl Profile {
    /// Candidate values for a modifier
    #[must_use]
    pub fn values(&self, key: ModifierKey) -> &[u32] {
        match key.definition().value_list {
            ValueList::Percentages => &self.percentages,
            ValueList::Durations => &self.durations,
            ValueList::HpPercentages => &self.hp_percentages,
            ValueList::RegenPercentages => &self.regen_percentages,
        }
    }

    fn values_mut(&mut self, key: ModifierKey) -> &mut Vec<u32> {
        match key.definition().value_list {
            ValueList::Percentages => &mut self.percentages,
            ValueList::Durations => &mut self.durations,
            ValueList::HpPercentages => &mut self.hp_percentages,
            ValueList::RegenPercentages => &mut self.regen_percentages,
        }
    }

    /// Replace a modifier's value list
    ///
    /// Lists are shared between modifiers (SIZE, SPEED and TIMESCALE all use
    /// `percentages`). Check flags stay keyed by index; flags past the new
    /// length are dropped and new indices read as checked.
    pub fn set_values(&mut self, key: ModifierKey, values: Vec<u32>) {
        let list = key.definition().value_list;
        let len = values.len();
        *self.values_mut(key) = values;

        for other in ModifierKey::ALL
            .into_iter()
            .filter(|k| k.definition().value_list == list)
        {
            let prefix = format!("{other}_");
            self.checkboxes.retain(|name, _| {
                name.strip_prefix(&prefix)
                    .and_then(|i| i.parse::<usize>().ok())
                    .map_or(true, |i| i < len)
            });
        }
    }

    /// Whether a value index is checked; unknown indices are checked
    #[must_use]
    pub fn is_checked(&self, key: ModifierKey, index: usize) -> bool {
        self.checkboxes
            .get(&checkbox_key(key, index))
            .copied()
            .unwrap_or(true)
    }

    /// Check or uncheck one value
    ///
    /// # Errors
    /// `SettingsError::UnknownValue` if the modifier has no such value
    pub fn set_checked(
        &mut self,
        key: ModifierKey,
        value: u32,
        on: bool,
    ) -> Result<(), SettingsError> {
        let indices: Vec<usize> = self
            .values(key)
            .iter()
            .enumerate()
            .filter(|(_, v)| **v == value)
            .map(|(i, _)| i)
            .collect();
        if indices.is_empty() {
            return Err(SettingsError::UnknownValue {
                modifier: key.to_string(),
                value,
            });
        }
        for i in indices {
            self.checkboxes.insert(checkbox_key(key, i), on);
        }
        Ok(())
    }

    /// Check or uncheck every value of a modifier
    pub fn set_all_checked(&mut self, key: ModifierKey, on: bool) {
        for i in 0..self.values(key).len() {
            self.checkboxes.insert(checkbox_key(key, i), on);
        }
    }

    /// Tag text for one modifier
    ///
    /// # Errors
    /// `SettingsError::EmptyTag` if `text` is blank
    pub fn set_tag(&mut self, key: ModifierKey, text: &str) -> Result<(), SettingsError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SettingsError::EmptyTag);
        }
        self.variant_tags.insert(key, text.to_string());
        Ok(())
    }

    /// Tag texts in effect for this profile
    #[must_use]
    pub fn tag_texts(&self) -> TagTexts {
        self.variant_tags
            .iter()
            .fold(TagTexts::new(), |tags, (key, text)| tags.with(*key, text.as_str()))
    }

    /// Every checked (modifier, value), in catalog then list order
    #[must_use]
    pub fn requests(&self) -> Vec<VariantRequest> {
        ModifierKey::ALL
            .into_iter()
            .flat_map(|key| {
                self.values(key)
                    .iter()
                    .enumerate()
                    .filter(move |(i, _)| self.is_checked(key, *i))
                    .map(move |(_, &value)| VariantRequest::new(key, value))
            })
            .collect()
    }
}

/// All profiles plus the one in use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Profile selected when the settings were last saved
    pub last_active_profile: String,
    /// Profiles in creation order
    pub profiles: IndexMap<String, Profile>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::with_profile(Profile::default())
    }
}

impl Settings {
    fn with_profile(profile: Profile) -> Self {
        let mut profiles = IndexMap::new();
        profiles.insert(DEFAULT_PROFILE.to_string(), profile);
        Self {
            last_active_profile: DEFAULT_PROFILE.to_string(),
            profiles,
        }
    }

    /// Load settings, falling back to defaults
    ///
    /// A missing or malformed file yields fresh settings. A legacy file
    /// without profiles is migrated, keeping its `folder_path`.
    #[must_use]
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!("No settings at {} ({}), using defaults", path.display(), e);
                return Self::default();
            }
        };
        let value: Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Invalid settings file {}: {}", path.display(), e);
                return Self::default();
            }
        };
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Self {
        if value.get("profiles").is_some() && value.get("last_active_profile").is_some() {
            return match serde_json::from_value::<Self>(value) {
                Ok(mut settings) if !settings.profiles.is_empty() => {
                    settings.last_active_profile = settings.active_name().to_string();
                    settings
                }
                Ok(_) => Self::default(),
                Err(e) => {
                    tracing::warn!("Unusable settings profiles ({}), using defaults", e);
                    Self::default()
                }
            };
        }

        tracing::info!("Old or invalid settings file detected. Creating a fresh one.");
        let mut profile = Profile::default();
        if let Some(folder) = value.get("folder_path").and_then(Value::as_str) {
            profile.folder_path = PathBuf::from(folder);
        }
        Self::with_profile(profile)
    }

    /// Write settings as JSON indented by four spaces
    ///
    /// # Errors
    /// `SettingsError::Io` if the file cannot be written
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.serialize(&mut ser)?;
        std::fs::write(path, buf).map_err(|e| SettingsError::io_error(path, e))?;
        tracing::info!("Settings saved.");
        Ok(())
    }

    /// Name of the profile in use; the first profile if the recorded one is gone
    #[must_use]
    pub fn active_name(&self) -> &str {
        if self.profiles.contains_key(&self.last_active_profile) {
            &self.last_active_profile
        } else {
            self.profiles
                .keys()
                .next()
                .map_or(DEFAULT_PROFILE, String::as_str)
        }
    }

    /// Profile in use
    #[must_use]
    pub fn active(&self) -> &Profile {
        match self.profiles.get(self.active_name()) {
            Some(profile) => profile,
            None => default_profile(),
        }
    }

    /// Profile in use, mutably
    pub fn active_mut(&mut self) -> &mut Profile {
        let name = self.active_name().to_string();
        self.profiles.entry(name).or_default()
    }

    /// Profile names in order
    pub fn profile_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.profiles.keys().map(String::as_str)
    }

    /// Switch to another profile
    ///
    /// # Errors
    /// `SettingsError::ProfileNotFound` if no such profile
    pub fn select(&mut self, name: &str) -> Result<(), SettingsError> {
        if !self.profiles.contains_key(name) {
            return Err(SettingsError::ProfileNotFound(name.to_string()));
        }
        tracing::info!("Loading profile: {}", name);
        self.last_active_profile = name.to_string();
        Ok(())
    }

    /// Copy the active profile under a new name and switch to it
    ///
    /// # Errors
    /// `EmptyProfileName` or `ProfileExists`
    pub fn save_as(&mut self, name: &str) -> Result<(), SettingsError> {
        let name = self.check_new_name(name)?;
        let copy = self.active().clone();
        self.profiles.insert(name.clone(), copy);
        self.select(&name)?;
        tracing::info!("Profile saved as: {}", name);
        Ok(())
    }

    /// Rename the active profile
    ///
    /// # Errors
    /// `EmptyProfileName` or `ProfileExists`
    pub fn rename(&mut self, name: &str) -> Result<(), SettingsError> {
        let name = self.check_new_name(name)?;
        let old = self.active_name().to_string();
        let profile = self.profiles.shift_remove(&old).unwrap_or_default();
        self.profiles.insert(name.clone(), profile);
        self.select(&name)?;
        tracing::info!("Profile '{}' renamed to '{}'", old, name);
        Ok(())
    }

    /// Delete the active profile and switch to the first remaining one
    ///
    /// # Errors
    /// `SettingsError::LastProfile` if it is the only profile
    pub fn delete_active(&mut self) -> Result<String, SettingsError> {
        if self.profiles.len() <= 1 {
            return Err(SettingsError::LastProfile);
        }
        let deleted = self.active_name().to_string();
        self.profiles.shift_remove(&deleted);
        let next = self.active_name().to_string();
        self.select(&next)?;
        tracing::info!("Profile '{}' deleted.", deleted);
        Ok(deleted)
    }

    fn check_new_name(&self, name: &str) -> Result<String, SettingsError> {
        if name.trim().is_empty() {
            return Err(SettingsError::EmptyProfileName);
        }
        if self.profiles.contains_key(name) {
            return Err(SettingsError::ProfileExists(name.to_string()));
        }
        Ok(name.to_string())
    }
}

fn default_profile() -> &'static Profile {
    static DEFAULT: std::sync::OnceLock<Profile> = std::sync::OnceLock::new();
    DEFAULT.get_or_init(Profile::default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn default_checkboxes() {
        let profile = Profile::default();
        assert!(profile.is_checked(ModifierKey::Size, 0));
        assert!(!profile.is_checked(ModifierKey::Hp, 0));
        assert!(!profile.is_checked(ModifierKey::RegenRate, 9));
        // durations[3] == 60
        assert!(!profile.is_checked(ModifierKey::Duration, 3));
        assert!(profile.is_checked(ModifierKey::Duration, 2));
    }

    #[test]
    fn default_requests_order() {
        let requests = Profile::default().requests();
        assert_eq!(requests[0], VariantRequest::new(ModifierKey::Size, 50));
        assert_eq!(requests.len(), 11 * 3 + 5);
        assert!(requests.iter().all(|r| r.modifier != ModifierKey::Hp));
        assert!(!requests.contains(&VariantRequest::new(ModifierKey::Duration, 60)));
        assert_eq!(
            requests.last(),
            Some(&VariantRequest::new(ModifierKey::Duration, 120))
        );
    }

    #[test]
    fn set_values_rekeys_checkboxes() {
        let mut profile = Profile::default();
        profile.set_checked(ModifierKey::Speed, 60, false).unwrap();
        profile.set_values(ModifierKey::Size, vec![100, 200]);

        assert_eq!(profile.values(ModifierKey::Speed), &[100, 200]);
        // index 1 kept its flag, later indices were dropped
        assert!(!profile.is_checked(ModifierKey::Speed, 1));
        assert!(!profile.checkboxes.contains_key("SPEED_5"));
        profile.set_values(ModifierKey::Size, vec![100, 200, 300]);
        assert!(profile.is_checked(ModifierKey::Speed, 2));
    }

    #[test]
    fn set_checked_unknown_value() {
        let mut profile = Profile::default();
        assert!(matches!(
            profile.set_checked(ModifierKey::Duration, 7, true),
            Err(SettingsError::UnknownValue { value: 7, .. })
        ));
    }

    #[test]
    fn blank_tag_rejected() {
        let mut profile = Profile::default();
        assert!(matches!(profile.set_tag(ModifierKey::Size, "  "), Err(SettingsError::EmptyTag)));
        profile.set_tag(ModifierKey::Size, " Sz ").unwrap();
        assert_eq!(profile.tag_texts().get(ModifierKey::Size), "Sz");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);

        let mut settings = Settings::default();
        settings.save_as("Fast").unwrap();
        settings.active_mut().folder_path = PathBuf::from("/tmp/scenarios");
        settings.save(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"last_active_profile\": \"Fast\""));
        assert!(text.contains("\"REGEN_RATE\": \"Regen\""));

        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn missing_or_malformed_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        assert_eq!(Settings::load(&path), Settings::default());

        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn legacy_file_is_migrated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        std::fs::write(&path, r#"{"folder_path": "D:\\Scenarios", "percentages": [1]}"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.profiles.len(), 1);
        assert_eq!(settings.active().folder_path, PathBuf::from(r"D:\Scenarios"));
        assert_eq!(settings.active().percentages, Profile::default().percentages);
    }

    #[test]
    fn partial_profile_filled_from_defaults() {
        let settings = Settings::from_value(serde_json::json!({
            "last_active_profile": "Gone",
            "profiles": { "Mine": { "durations": [10, 20] } }
        }));
        assert_eq!(settings.active_name(), "Mine");
        assert_eq!(settings.active().durations, vec![10, 20]);
        assert_eq!(settings.active().hp_percentages, Profile::default().hp_percentages);
    }

    #[test]
    fn profile_management() {
        let mut settings = Settings::default();
        assert!(matches!(settings.delete_active(), Err(SettingsError::LastProfile)));
        assert!(matches!(settings.save_as(" "), Err(SettingsError::EmptyProfileName)));
        assert!(matches!(
            settings.save_as(DEFAULT_PROFILE),
            Err(SettingsError::ProfileExists(_))
        ));

        settings.save_as("Fast").unwrap();
        settings.rename("Faster").unwrap();
        assert_eq!(settings.profile_names().collect::<Vec<_>>(), vec!["Default", "Faster"]);
        assert_eq!(settings.active_name(), "Faster");

        settings.select(DEFAULT_PROFILE).unwrap();
        settings.rename("Base").unwrap();
        assert_eq!(settings.profile_names().collect::<Vec<_>>(), vec!["Faster", "Base"]);

        assert_eq!(settings.delete_active().unwrap(), "Base");
        assert_eq!(settings.active_name(), "Faster");
        assert!(matches!(
            settings.select("Base"),
            Err(SettingsError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn active_falls_back_without_profiles() {
        let mut settings = Settings::default();
        settings.last_active_profile = "Gone".to_string();
        assert_eq!(settings.active_name(), DEFAULT_PROFILE);

        settings.profiles.clear();
        let active = settings.active();
        assert_eq!(active, &Profile::default());
        assert_eq!(settings.active_name(), DEFAULT_PROFILE);
    }

    proptest! {
        #[test]
        fn requests_follow_checked_indices(
            values in prop::collection::vec(1u32..500, 0..12),
            flags in prop::collection::vec(any::<bool>(), 0..12),
        ) {
            let mut profile = Profile::default();
            profile.set_values(ModifierKey::Size, values.clone());
            for key in [ModifierKey::Speed, ModifierKey::Timescale, ModifierKey::Duration] {
                profile.set_all_checked(key, false);
            }
            for (i, &on) in flags.iter().enumerate() {
                profile.checkboxes.insert(checkbox_key(ModifierKey::Size, i), on);
            }

            let expected: Vec<VariantRequest> = values
                .iter()
                .enumerate()
                .filter(|(i, _)| flags.get(*i).copied().unwrap_or(true))
                .map(|(_, &v)| VariantRequest::new(ModifierKey::Size, v))
                .collect();
            prop_assert_eq!(profile.requests(), expected);
        }
    }
}
