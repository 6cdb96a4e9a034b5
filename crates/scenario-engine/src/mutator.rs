//! Variant mutator
//!
//! Re-walks a document's original lines and rewrites the handful of values a
//! modifier touches. Every other line is copied through byte-for-byte.
//! Rewritten lines are emitted as `key=value\n` with fixed precision:
//! 1 decimal for `Timelimit`, 3 for `Timescale` and score fields, 5 for
//! character-profile values.

use crate::catalog::{
    ModKind, ModifierDefinition, ModifierKey, Scope, TagTexts, SCORE_PROPERTIES, TIMELIMIT,
    TIMESCALE,
};
use crate::document::{ScenarioDocument, SCENARIO_EXTENSION};
use crate::error::MutateError;
use crate::section::{Line, Section, SectionState};
use crate::tags::derive_name;
use serde::{Deserialize, Serialize};

/// One requested variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantRequest {
    /// Modifier to apply
    pub modifier: ModifierKey,
    /// Percentage points or seconds, per the modifier's suffix
    pub value: u32,
}

impl VariantRequest {
    /// Create request
    #[inline]
    #[must_use]
    pub fn new(modifier: ModifierKey, value: u32) -> Self {
        Self { modifier, value }
    }
}

/// A derived scenario, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedVariant {
    /// New display name, also written to the name line
    pub name: String,
    /// Full new content, line by line
    pub lines: Vec<String>,
}

impl GeneratedVariant {
    /// Output file name: `<name>.sce`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.{SCENARIO_EXTENSION}", self.name)
    }

    /// Joined file content
    #[must_use]
    pub fn contents(&self) -> String {
        self.lines.concat()
    }
}

/// Per-modifier rewrite plan, computed once per request
#[derive(Debug, Clone, Copy)]
enum Plan {
    Duration { timelimit: f64, score_ratio: f64 },
    Timescale { factor: f64 },
    Character { def: &'static ModifierDefinition, factor: f64 },
}

impl Plan {
    fn for_request(doc: &ScenarioDocument, request: VariantRequest) -> Result<Self, MutateError> {
        let def = request.modifier.definition();
        let target = f64::from(request.value);
        let factor = target / 100.0;

        match (request.modifier, def.scope) {
            (ModifierKey::Duration, _) => {
                let base_timelimit = doc.global(TIMELIMIT).unwrap_or(0.0);
                let base_timescale = doc.global(TIMESCALE).unwrap_or(1.0);
                if base_timelimit <= 0.0 {
                    return Err(MutateError::ZeroDurationBase {
                        timelimit: base_timelimit,
                    });
                }
                if request.value == 0 {
                    return Err(MutateError::ZeroTarget {
                        modifier: request.modifier,
                    });
                }
                #[allow(clippy::float_cmp)]
                let plan = if base_timescale > 0.0 && base_timescale != 1.0 {
                    let perceived = base_timelimit / base_timescale;
                    Self::Duration {
                        timelimit: base_timescale * target,
                        score_ratio: perceived / target,
                    }
                } else {
                    Self::Duration {
                        timelimit: target,
                        score_ratio: base_timelimit / target,
                    }
                };
                Ok(plan)
            }
            (_, Scope::Global) => Ok(Self::Timescale { factor }),
            (_, Scope::CharacterProfile) => Ok(Self::Character { def, factor }),
        }
    }

    /// New `key=value` text for one entry, or `None` to keep the line
    fn rewrite(
        &self,
        doc: &ScenarioDocument,
        state: &SectionState,
        key: &str,
    ) -> Option<String> {
        match *self {
            Self::Duration {
                timelimit,
                score_ratio,
            } if state.in_preamble() => {
                if key.eq_ignore_ascii_case(TIMELIMIT) {
                    return Some(format!("{key}={timelimit:.1}\n"));
                }
                let score = SCORE_PROPERTIES
                    .into_iter()
                    .find(|prop| prop.eq_ignore_ascii_case(key))?;
                let base = doc.global(score).filter(|v| *v > 0.0)?;
                Some(format!("{key}={:.3}\n", base * score_ratio))
            }
            Self::Timescale { factor } if state.in_preamble() => {
                if key.eq_ignore_ascii_case(TIMESCALE) {
                    let base = doc.global(TIMESCALE).unwrap_or(1.0);
                    return Some(format!("{key}={:.3}\n", base * factor));
                }
                if key.eq_ignore_ascii_case(TIMELIMIT) {
                    let base = doc.global(TIMELIMIT).filter(|v| *v > 0.0)?;
                    return Some(format!("{key}={:.1}\n", base * factor));
                }
                None
            }
            Self::Character { def, factor } if state.section() == Section::CharacterProfile => {
                let profile = state.profile()?;
                if Some(profile) == doc.player_profile() {
                    return None;
                }
                let prop = def.target_property(key)?;
                let base_of = |name: &str| {
                    doc.profile(profile)
                        .and_then(|props| props.get(name).copied())
                        .unwrap_or(0.0)
                };
                let value = match def.kind {
                    ModKind::Calculated => base_of(def.calculation_base.unwrap_or(prop)) * factor,
                    ModKind::Multiplier | ModKind::Direct => {
                        let base = base_of(prop);
                        if def.condition.is_some_and(|cond| !cond.holds(base)) {
                            return None;
                        }
                        base * factor
                    }
                };
                Some(format!("{key}={value:.5}\n"))
            }
            _ => None,
        }
    }
}

/// Applies modifiers to parsed scenarios
#[derive(Debug, Clone, Default)]
pub struct VariantMutator {
    tags: TagTexts,
}

impl VariantMutator {
    /// Mutator using catalog tag texts
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutator using profile-specific tag texts
    #[inline]
    #[must_use]
    pub fn with_tags(tags: TagTexts) -> Self {
        Self { tags }
    }

    /// Tag texts in effect
    #[inline]
    #[must_use]
    pub fn tags(&self) -> &TagTexts {
        &self.tags
    }

    /// Name a request would produce, without touching any lines
    #[must_use]
    pub fn variant_name(&self, doc: &ScenarioDocument, request: VariantRequest) -> String {
        derive_name(doc.display_name(), request.modifier, request.value, &self.tags)
    }

    /// Derive one variant from `doc`
    ///
    /// # Errors
    /// - `MutateError::ZeroDurationBase` for DURATION on a scenario without a
    ///   positive `Timelimit`
    /// - `MutateError::ZeroTarget` for DURATION with a target of zero
    /// - `MutateError::NameNotFound` if the internal name line is missing
    ///   from the pre-section region
    pub fn apply(
        &self,
        doc: &ScenarioDocument,
        request: VariantRequest,
    ) -> Result<GeneratedVariant, MutateError> {
        let name = self.variant_name(doc, request);
        let plan = Plan::for_request(doc, request)?;
        let internal = doc.internal_name().map(str::to_lowercase);

        let mut found_name = false;
        let mut state = SectionState::new();
        let mut lines = Vec::with_capacity(doc.raw_lines().len());

        for raw in doc.raw_lines() {
            let line = Line::classify(raw);
            state = state.advance(&line);

            let Line::Entry { key, value } = line else {
                lines.push(raw.clone());
                continue;
            };

            if state.in_preamble()
                && key.eq_ignore_ascii_case("name")
                && internal.as_deref() == Some(value.to_lowercase().as_str())
            {
                found_name = true;
                lines.push(format!("{key}={name}\n"));
                continue;
            }

            lines.push(plan.rewrite(doc, &state, key).unwrap_or_else(|| raw.clone()));
        }

        if !found_name {
            return Err(MutateError::NameNotFound {
                name: doc.internal_name().unwrap_or_default().to_string(),
            });
        }

        tracing::debug!("Derived variant '{}' ({} = {})", name, request.modifier, request.value);
        Ok(GeneratedVariant { name, lines })
    }
}
