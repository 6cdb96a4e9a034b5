//! Modifier catalog
//!
//! The fixed table of modifier definitions consulted by the parser, the
//! name/tag engine and the mutator. Six closed cases, keyed by
//! [`ModifierKey`]; per-kind behavior lives in the mutator and is selected
//! by [`ModKind`] and [`Scope`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Global score fields rescaled alongside a duration change
pub const SCORE_PROPERTIES: [&str; 3] = ["ScorePerHit", "ScorePerDamage", "ScorePerKill"];

/// Global time limit property
pub const TIMELIMIT: &str = "Timelimit";

/// Global time scale property
pub const TIMESCALE: &str = "Timescale";

/// Identifier of one catalog entry
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModifierKey {
    /// Target hitbox radius
    Size,
    /// Target movement speed
    Speed,
    /// Global game speed
    Timescale,
    /// Perceived scenario length
    Duration,
    /// Target max health
    Hp,
    /// Target health regeneration
    RegenRate,
}

impl ModifierKey {
    /// All keys in catalog order
    pub const ALL: [ModifierKey; 6] = [
        Self::Size,
        Self::Speed,
        Self::Timescale,
        Self::Duration,
        Self::Hp,
        Self::RegenRate,
    ];

    /// Canonical upper-case identifier
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Size => "SIZE",
            Self::Speed => "SPEED",
            Self::Timescale => "TIMESCALE",
            Self::Duration => "DURATION",
            Self::Hp => "HP",
            Self::RegenRate => "REGEN_RATE",
        }
    }

    /// Catalog entry for this key
    #[inline]
    #[must_use]
    pub fn definition(self) -> &'static ModifierDefinition {
        &CATALOG[self as usize]
    }
}

impl fmt::Display for ModifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a modifier identifier is not in the catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown modifier: '{0}'")]
pub struct UnknownModifier(pub String);

impl FromStr for ModifierKey {
    type Err = UnknownModifier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| UnknownModifier(s.to_string()))
    }
}

/// How a modifier derives the written value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModKind {
    /// Scale the property's own base value by a percentage
    Multiplier,
    /// Replace the value outright (seconds)
    Direct,
    /// Percentage of a different property's base value
    Calculated,
}

/// Where a modifier's target properties live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scope {
    /// Pre-section region of the file
    Global,
    /// `[Character Profile]` sections
    CharacterProfile,
}

/// Guard evaluated against a property's base value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Only rewrite when the base value is greater than zero
    PositiveBase,
}

impl Condition {
    /// Check the guard
    #[inline]
    #[must_use]
    pub fn holds(self, base: f64) -> bool {
        match self {
            Self::PositiveBase => base > 0.0,
        }
    }
}

/// Unit of a modifier's target value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueSuffix {
    /// Percentage points
    #[serde(rename = "%")]
    Percent,
    /// Seconds
    #[serde(rename = "s")]
    Seconds,
}

impl ValueSuffix {
    /// Suffix as rendered in tags
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percent => "%",
            Self::Seconds => "s",
        }
    }
}

/// Settings list a modifier draws its candidate values from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueList {
    /// Shared by SIZE, SPEED and TIMESCALE
    Percentages,
    /// Seconds for DURATION
    Durations,
    /// HP percentages
    HpPercentages,
    /// Regen percentages of max health
    RegenPercentages,
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq)]
pub struct ModifierDefinition {
    /// Unique identifier
    pub key: ModifierKey,
    /// Column header shown to users
    pub display_name: &'static str,
    /// Default tag text embedded in generated names
    pub tag_text: &'static str,
    /// Value derivation
    pub kind: ModKind,
    /// Property location
    pub scope: Scope,
    /// Properties rewritten, in order
    pub properties: &'static [&'static str],
    /// Property whose base value feeds a `Calculated` modifier
    pub calculation_base: Option<&'static str>,
    /// Optional guard on the base value
    pub condition: Option<Condition>,
    /// Unit of the target value
    pub suffix: ValueSuffix,
    /// Settings list holding candidate values
    pub value_list: ValueList,
}

impl ModifierDefinition {
    /// Canonical target property matching `key` case-insensitively
    #[must_use]
    pub fn target_property(&self, key: &str) -> Option<&'static str> {
        self.properties
            .iter()
            .copied()
            .find(|prop| prop.eq_ignore_ascii_case(key))
    }
}

/// The modifier table, indexed by `ModifierKey as usize`
pub static CATALOG: [ModifierDefinition; 6] = [
    ModifierDefinition {
        key: ModifierKey::Size,
        display_name: "Size",
        tag_text: "Size",
        kind: ModKind::Multiplier,
        scope: Scope::CharacterProfile,
        properties: &["MainBBRadius"],
        calculation_base: None,
        condition: None,
        suffix: ValueSuffix::Percent,
        value_list: ValueList::Percentages,
    },
    ModifierDefinition {
        key: ModifierKey::Speed,
        display_name: "Speed",
        tag_text: "Speed",
        kind: ModKind::Multiplier,
        scope: Scope::CharacterProfile,
        properties: &["MaxSpeed", "MaxCrouchSpeed"],
        calculation_base: None,
        condition: Some(Condition::PositiveBase),
        suffix: ValueSuffix::Percent,
        value_list: ValueList::Percentages,
    },
    ModifierDefinition {
        key: ModifierKey::Timescale,
        display_name: "Timescale",
        tag_text: "Timescale",
        kind: ModKind::Multiplier,
        scope: Scope::Global,
        properties: &[TIMESCALE],
        calculation_base: None,
        condition: None,
        suffix: ValueSuffix::Percent,
        value_list: ValueList::Percentages,
    },
    ModifierDefinition {
        key: ModifierKey::Duration,
        display_name: "Duration",
        tag_text: "Dur",
        kind: ModKind::Direct,
        scope: Scope::Global,
        properties: &[TIMELIMIT],
        calculation_base: None,
        condition: None,
        suffix: ValueSuffix::Seconds,
        value_list: ValueList::Durations,
    },
    ModifierDefinition {
        key: ModifierKey::Hp,
        display_name: "HP",
        tag_text: "HP",
        kind: ModKind::Multiplier,
        scope: Scope::CharacterProfile,
        properties: &["MaxHealth"],
        calculation_base: None,
        condition: None,
        suffix: ValueSuffix::Percent,
        value_list: ValueList::HpPercentages,
    },
    ModifierDefinition {
        key: ModifierKey::RegenRate,
        display_name: "Regen",
        tag_text: "Regen",
        kind: ModKind::Calculated,
        scope: Scope::CharacterProfile,
        properties: &["HealthRegenPerSec"],
        calculation_base: Some("MaxHealth"),
        condition: None,
        suffix: ValueSuffix::Percent,
        value_list: ValueList::RegenPercentages,
    },
];

/// Canonical name of a tracked global property, matched case-insensitively
///
/// Covers global-scope modifier targets plus the score-per-* fields.
#[must_use]
pub fn global_property(key: &str) -> Option<&'static str> {
    CATALOG
        .iter()
        .filter(|def| def.scope == Scope::Global)
        .flat_map(|def| def.properties.iter().copied())
        .chain(SCORE_PROPERTIES)
        .find(|prop| prop.eq_ignore_ascii_case(key))
}

/// Canonical name of a tracked character property, matched case-insensitively
///
/// Covers every character-scope target and calculation base.
#[must_use]
pub fn character_property(key: &str) -> Option<&'static str> {
    CATALOG
        .iter()
        .filter(|def| def.scope == Scope::CharacterProfile)
        .flat_map(|def| def.properties.iter().copied().chain(def.calculation_base))
        .find(|prop| prop.eq_ignore_ascii_case(key))
}

/// Tag texts in effect for naming, falling back to catalog defaults
///
/// User profiles may rename tags; stripping and re-tagging always use the
/// texts in effect, iterated in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagTexts {
    overrides: BTreeMap<ModifierKey, String>,
}

impl TagTexts {
    /// Catalog defaults only
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override one tag text; blank texts are ignored
    #[must_use]
    pub fn with(mut self, key: ModifierKey, text: impl Into<String>) -> Self {
        self.set(key, text);
        self
    }

    /// Override one tag text in place; blank texts are ignored
    pub fn set(&mut self, key: ModifierKey, text: impl Into<String>) {
        let text = text.into();
        let text = text.trim();
        if !text.is_empty() {
            self.overrides.insert(key, text.to_string());
        }
    }

    /// Tag text in effect for `key`
    #[must_use]
    pub fn get(&self, key: ModifierKey) -> &str {
        self.overrides
            .get(&key)
            .map_or(key.definition().tag_text, String::as_str)
    }

    /// All tag texts in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        ModifierKey::ALL.into_iter().map(|key| self.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_indexed_by_key() {
        for key in ModifierKey::ALL {
            assert_eq!(key.definition().key, key);
        }
    }

    #[test]
    fn key_parse_is_case_insensitive() {
        assert_eq!("regen_rate".parse::<ModifierKey>(), Ok(ModifierKey::RegenRate));
        assert_eq!("Regen-Rate".parse::<ModifierKey>(), Ok(ModifierKey::RegenRate));
        assert_eq!("hp".parse::<ModifierKey>(), Ok(ModifierKey::Hp));
        assert!("armor".parse::<ModifierKey>().is_err());
    }

    #[test]
    fn tracked_properties() {
        assert_eq!(global_property("timelimit"), Some("Timelimit"));
        assert_eq!(global_property("SCOREPERKILL"), Some("ScorePerKill"));
        assert_eq!(global_property("MaxHealth"), None);
        assert_eq!(character_property("maxhealth"), Some("MaxHealth"));
        assert_eq!(character_property("maxcrouchspeed"), Some("MaxCrouchSpeed"));
        assert_eq!(character_property("Timescale"), None);
    }

    #[test]
    fn speed_condition_rejects_zero() {
        let cond = ModifierKey::Speed.definition().condition.unwrap();
        assert!(!cond.holds(0.0));
        assert!(cond.holds(300.0));
    }

    #[test]
    fn tag_texts_fall_back_to_catalog() {
        let tags = TagTexts::new().with(ModifierKey::Size, "Sz").with(ModifierKey::Hp, "  ");
        assert_eq!(tags.get(ModifierKey::Size), "Sz");
        assert_eq!(tags.get(ModifierKey::Hp), "HP");
        assert_eq!(
            tags.iter().collect::<Vec<_>>(),
            vec!["Sz", "Speed", "Timescale", "Dur", "HP", "Regen"]
        );
    }
}
