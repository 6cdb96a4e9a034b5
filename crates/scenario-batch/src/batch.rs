//! Batch variant generation
//!
//! Applies a list of requests to one loaded scenario and writes each result
//! next to the source. Existing files are only replaced with consent from an
//! [`OverwritePrompt`].
//!
//! Outcomes per request:
//! - `ZeroDurationBase`, `InvalidTarget` and `WriteError` skip that variant only
//! - `NameNotFound` stops the batch, since every later variant shares the
//!   same stale document
//! - `NoToAll` from the prompt stops the batch

use scenario_engine::{
    GeneratedVariant, MutateError, ScenarioDocument, VariantMutator, VariantRequest,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Answer to "overwrite this existing file?"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverwriteDecision {
    /// Replace this file
    Yes,
    /// Keep this file
    No,
    /// Replace this and every later file
    YesToAll,
    /// Keep this file and stop the batch
    NoToAll,
}

/// Asked before an existing file is replaced
pub trait OverwritePrompt {
    /// Decide for one existing output file
    fn decide(&mut self, path: &Path) -> OverwriteDecision;
}

/// Non-interactive overwrite answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwritePolicy {
    /// Replace existing files
    Always,
    /// Keep existing files, continue with the rest
    #[default]
    Never,
}

impl OverwritePrompt for OverwritePolicy {
    fn decide(&mut self, _path: &Path) -> OverwriteDecision {
        match self {
            Self::Always => OverwriteDecision::YesToAll,
            Self::Never => OverwriteDecision::No,
        }
    }
}

/// What happened to one request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum VariantOutcome {
    /// File written
    Created,
    /// Dry run: would have been written
    Planned,
    /// Existing file kept
    Skipped,
    /// DURATION requested on a scenario with no time limit
    ZeroDurationBase,
    /// Internal name line missing; batch stopped
    NameNotFound,
    /// Request rejected by the mutator
    InvalidTarget(String),
    /// File could not be written
    WriteError(String),
}

impl VariantOutcome {
    fn from_error(error: &MutateError) -> Self {
        match error {
            MutateError::NameNotFound { .. } => Self::NameNotFound,
            MutateError::ZeroDurationBase { .. } => Self::ZeroDurationBase,
            MutateError::ZeroTarget { .. } => Self::InvalidTarget(error.to_string()),
        }
    }
}

/// One processed request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    /// Request processed
    pub request: VariantRequest,
    /// Output path derived from the new name
    pub path: PathBuf,
    /// Result
    pub outcome: VariantOutcome,
}

/// Why a batch ended early
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Name line missing from the source
    NameNotFound,
    /// User declined all remaining overwrites
    DeclinedOverwrites,
}

/// Summary of a batch run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Processed requests, in order
    pub entries: Vec<BatchEntry>,
    /// Requests submitted
    pub total: usize,
    /// Set when the batch ended before the last request
    pub stopped: Option<StopReason>,
}

impl BatchReport {
    /// Files written
    #[must_use]
    pub fn created(&self) -> usize {
        self.count(&VariantOutcome::Created)
    }

    /// Files that a dry run would write
    #[must_use]
    pub fn planned(&self) -> usize {
        self.count(&VariantOutcome::Planned)
    }

    fn count(&self, outcome: &VariantOutcome) -> usize {
        self.entries.iter().filter(|e| &e.outcome == outcome).count()
    }

    /// Entries that failed
    pub fn failures(&self) -> impl Iterator<Item = &BatchEntry> + '_ {
        self.entries.iter().filter(|e| {
            matches!(
                e.outcome,
                VariantOutcome::ZeroDurationBase
                    | VariantOutcome::NameNotFound
                    | VariantOutcome::InvalidTarget(_)
                    | VariantOutcome::WriteError(_)
            )
        })
    }
}

/// Progress after each request
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// Requests handled so far
    pub done: usize,
    /// Requests submitted
    pub total: usize,
    /// Entry just handled
    pub entry: &'a BatchEntry,
}

/// Generates variants of one scenario into a folder
#[derive(Debug, Clone)]
pub struct BatchRunner {
    mutator: VariantMutator,
    output_dir: PathBuf,
    dry_run: bool,
}

impl BatchRunner {
    /// Create runner writing into `output_dir`
    #[must_use]
    pub fn new(mutator: VariantMutator, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            mutator,
            output_dir: output_dir.into(),
            dry_run: false,
        }
    }

    /// Compute everything, write nothing
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run requests without progress reporting
    pub fn run(
        &self,
        doc: &ScenarioDocument,
        requests: &[VariantRequest],
        prompt: &mut dyn OverwritePrompt,
    ) -> BatchReport {
        self.run_with_progress(doc, requests, prompt, |_| {})
    }

    /// Run requests, reporting after each one
    pub fn run_with_progress(
        &self,
        doc: &ScenarioDocument,
        requests: &[VariantRequest],
        prompt: &mut dyn OverwritePrompt,
        mut progress: impl FnMut(Progress<'_>),
    ) -> BatchReport {
        let mut report = BatchReport {
            total: requests.len(),
            ..BatchReport::default()
        };
        if requests.is_empty() {
            tracing::info!("--- No variants were selected. ---");
            return report;
        }

        tracing::info!("--- Starting Generation of {} variants ---", requests.len());
        let mut overwrite_all = false;

        for &request in requests {
            let (entry, stop) = self.process(doc, request, prompt, &mut overwrite_all);
            report.entries.push(entry);
            if let Some(entry) = report.entries.last() {
                progress(Progress {
                    done: report.entries.len(),
                    total: report.total,
                    entry,
                });
            }
            if stop.is_some() {
                report.stopped = stop;
                break;
            }
        }

        tracing::info!("--- Finished! Created {} new files. ---", report.created());
        report
    }

    fn process(
        &self,
        doc: &ScenarioDocument,
        request: VariantRequest,
        prompt: &mut dyn OverwritePrompt,
        overwrite_all: &mut bool,
    ) -> (BatchEntry, Option<StopReason>) {
        let variant = match self.mutator.apply(doc, request) {
            Ok(variant) => variant,
            Err(e) => {
                tracing::error!("{} {}: {}", request.modifier, request.value, e);
                let path = self
                    .output_dir
                    .join(format!("{}.sce", self.mutator.variant_name(doc, request)));
                let stop = e.aborts_batch().then_some(StopReason::NameNotFound);
                let outcome = VariantOutcome::from_error(&e);
                return (BatchEntry { request, path, outcome }, stop);
            }
        };

        let path = self.output_dir.join(variant.file_name());
        let entry = |outcome| BatchEntry {
            request,
            path: path.clone(),
            outcome,
        };

        if path.exists() && !*overwrite_all {
            match prompt.decide(&path) {
                OverwriteDecision::Yes => {}
                OverwriteDecision::YesToAll => *overwrite_all = true,
                OverwriteDecision::No => {
                    tracing::info!("Skipped: {}", variant.file_name());
                    return (entry(VariantOutcome::Skipped), None);
                }
                OverwriteDecision::NoToAll => {
                    tracing::info!("Skipping all remaining overwrites.");
                    return (
                        entry(VariantOutcome::Skipped),
                        Some(StopReason::DeclinedOverwrites),
                    );
                }
            }
        }

        if self.dry_run {
            tracing::info!("Would create: {}", variant.file_name());
            return (entry(VariantOutcome::Planned), None);
        }
        (entry(write_variant(&path, &variant)), None)
    }
}

fn write_variant(path: &Path, variant: &GeneratedVariant) -> VariantOutcome {
    match std::fs::write(path, variant.contents()) {
        Ok(()) => {
            tracing::info!("Created: {}", variant.file_name());
            VariantOutcome::Created
        }
        Err(e) => {
            tracing::error!("ERROR creating {}: {}", path.display(), e);
            VariantOutcome::WriteError(e.to_string())
        }
    }
}
