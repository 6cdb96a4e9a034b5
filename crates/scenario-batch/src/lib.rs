//! Scenario Batch Layer
//!
//! Everything around the engine that touches the filesystem: settings
//! profiles, scenario folder listing, and batch generation with overwrite
//! negotiation.
//!
//! # Example
//!
//! ```rust,ignore
//! use scenario_batch::prelude::*;
//!
//! let settings = Settings::load(SETTINGS_FILE);
//! let profile = settings.active();
//! let doc = load_scenario(&profile.folder_path, "Target A")?;
//!
//! let mutator = VariantMutator::with_tags(profile.tag_texts());
//! let runner = BatchRunner::new(mutator, &profile.folder_path);
//! let report = runner.run(&doc, &profile.requests(), &mut OverwritePolicy::Never);
//! println!("created {}", report.created());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod batch;
pub mod error;
pub mod folder;
pub mod settings;

pub use batch::{
    BatchEntry, BatchReport, BatchRunner, OverwriteDecision, OverwritePolicy, OverwritePrompt,
    Progress, StopReason, VariantOutcome,
};
pub use error::{BatchError, SettingsError};
pub use folder::{filter_scenarios, list_scenarios, load_scenario, scenario_path};
pub use settings::{Profile, Settings, DEFAULT_PROFILE, SETTINGS_FILE};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running batches
    pub use crate::batch::{
        BatchReport, BatchRunner, OverwriteDecision, OverwritePolicy, OverwritePrompt,
    };
    pub use crate::folder::{list_scenarios, load_scenario};
    pub use crate::settings::{Profile, Settings, SETTINGS_FILE};
    pub use scenario_engine::prelude::*;
}
