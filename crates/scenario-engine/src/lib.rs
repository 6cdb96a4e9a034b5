//! Scenario Variant Engine
//!
//! Parses flat, section-delimited scenario files and derives "variant"
//! files whose numeric gameplay parameters are scaled or replaced, keeping
//! every other line byte-identical.
//!
//! # Core Operations
//!
//! - **Parse**: [`DocumentParser`] turns lines into a [`ScenarioDocument`]
//! - **Name**: [`tags::derive_name`] re-tags the display name without
//!   stacking duplicate tags
//! - **Mutate**: [`VariantMutator::apply`] produces the new line sequence
//!
//! # Architecture
//!
//! ```text
//! .sce lines → DocumentParser → ScenarioDocument ─┐
//!                                                  ├→ VariantMutator → GeneratedVariant
//!            VariantRequest (modifier, value) ────┘        ↑
//!                                                   CATALOG + TagTexts
//! ```
//!
//! # Example
//!
//! ```rust
//! use scenario_engine::prelude::*;
//!
//! let doc = DocumentParser::new()
//!     .parse_str("Name=Target A\nTimelimit=60\n")
//!     .unwrap();
//! let variant = VariantMutator::new()
//!     .apply(&doc, VariantRequest::new(ModifierKey::Duration, 30))
//!     .unwrap();
//!
//! assert_eq!(variant.name, "Target A Dur 30s");
//! assert_eq!(variant.contents(), "Name=Target A Dur 30s\nTimelimit=30.0\n");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod catalog;
pub mod document;
pub mod error;
pub mod mutator;
pub mod section;
pub mod tags;

// Re-exports for convenience
pub use catalog::{
    ModKind, ModifierDefinition, ModifierKey, Scope, TagTexts, UnknownModifier, ValueList,
    ValueSuffix, CATALOG,
};
pub use document::{BaseStats, DocumentParser, ScenarioDocument, SCENARIO_EXTENSION};
pub use error::{EngineError, EngineResult, MutateError, ParseError};
pub use mutator::{GeneratedVariant, VariantMutator, VariantRequest};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for parsing and mutating scenarios
    pub use crate::catalog::{ModifierKey, TagTexts, CATALOG};
    pub use crate::document::{DocumentParser, ScenarioDocument};
    pub use crate::error::{MutateError, ParseError};
    pub use crate::mutator::{GeneratedVariant, VariantMutator, VariantRequest};
}
