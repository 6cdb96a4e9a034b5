use pretty_assertions::assert_eq;
use scenario_batch::prelude::*;
use scenario_batch::{StopReason, VariantOutcome};
use scenario_test_utils::{sample_scenario, ScenarioBuilder, ScenarioFolder};
use std::path::Path;

struct Recorder {
    answers: Vec<OverwriteDecision>,
    asked: Vec<String>,
}

impl OverwritePrompt for Recorder {
    fn decide(&mut self, path: &Path) -> OverwriteDecision {
        let name = path.file_stem().unwrap().to_string_lossy().to_string();
        self.asked.push(name);
        if self.answers.is_empty() {
            OverwriteDecision::No
        } else {
            self.answers.remove(0)
        }
    }
}

fn runner(folder: &ScenarioFolder) -> BatchRunner {
    BatchRunner::new(VariantMutator::new(), folder.path())
}

#[test]
fn generates_checked_variants_from_profile() {
    let folder = ScenarioFolder::new();
    folder.add("Target A", &sample_scenario());

    let mut profile = Profile::default();
    for key in ModifierKey::ALL {
        profile.set_all_checked(key, false);
    }
    profile.set_checked(ModifierKey::Duration, 30, true).unwrap();
    profile.set_checked(ModifierKey::RegenRate, 50, true).unwrap();

    let doc = load_scenario(folder.path(), "Target A").unwrap();
    let report = runner(&folder).run(&doc, &profile.requests(), &mut OverwritePolicy::Never);

    assert_eq!(report.created(), 2);
    assert_eq!(report.stopped, None);

    let duration = folder.read("Target A Dur 30s");
    assert!(duration.starts_with("Name=Target A Dur 30s\n"));
    assert!(duration.contains("\nTimelimit=30.0\n"));
    assert!(duration.contains("\nScorePerHit=4.000\n"));
    assert!(duration.contains("\nScorePerKill=20.000\n"));

    let regen = folder.read("Target A Regen 50%");
    assert!(regen.contains("\nHealthRegenPerSec=75.00000\n"));
    assert!(regen.contains("\nHealthRegenPerSec=100.00000\n"));
    // source untouched
    assert_eq!(folder.read("Target A"), sample_scenario());
}

#[test]
fn regenerating_from_a_variant_retags() {
    let folder = ScenarioFolder::new();
    folder.add("Target A", &sample_scenario());
    let size = [VariantRequest::new(ModifierKey::Size, 150)];

    let doc = load_scenario(folder.path(), "Target A").unwrap();
    runner(&folder).run(&doc, &size, &mut OverwritePolicy::Never);

    let variant = load_scenario(folder.path(), "Target A Size 150%").unwrap();
    let report = runner(&folder).run(
        &variant,
        &[VariantRequest::new(ModifierKey::Size, 130)],
        &mut OverwritePolicy::Never,
    );
    assert_eq!(report.created(), 1);
    assert!(folder.exists("Target A Size 130%"));
    assert!(!folder.exists("Target A Size 150% Size 130%"));
}

#[test]
fn zero_duration_skips_only_that_variant() {
    let folder = ScenarioFolder::new();
    let text = ScenarioBuilder::named("Endless")
        .entry("Timelimit", 0)
        .profile("Bot")
        .entry("MaxHealth", 100)
        .build();
    folder.add("Endless", &text);

    let doc = load_scenario(folder.path(), "Endless").unwrap();
    let requests = [
        VariantRequest::new(ModifierKey::Duration, 30),
        VariantRequest::new(ModifierKey::Hp, 200),
    ];
    let report = runner(&folder).run(&doc, &requests, &mut OverwritePolicy::Never);

    assert_eq!(report.entries[0].outcome, VariantOutcome::ZeroDurationBase);
    assert_eq!(report.entries[1].outcome, VariantOutcome::Created);
    assert!(!folder.exists("Endless Dur 30s"));
    assert_eq!(report.failures().count(), 1);
}

#[test]
fn missing_name_stops_batch() {
    let folder = ScenarioFolder::new();
    folder.add("Nameless", "Timelimit=60\n");

    let doc = load_scenario(folder.path(), "Nameless").unwrap();
    let requests = [
        VariantRequest::new(ModifierKey::Size, 50),
        VariantRequest::new(ModifierKey::Size, 60),
    ];
    let report = runner(&folder).run(&doc, &requests, &mut OverwritePolicy::Always);

    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].outcome, VariantOutcome::NameNotFound);
    assert_eq!(report.stopped, Some(StopReason::NameNotFound));
    assert_eq!(report.created(), 0);
}

#[test]
fn overwrite_answers() {
    let folder = ScenarioFolder::new();
    folder.add("Target A", &sample_scenario());
    for name in ["Target A HP 50%", "Target A HP 80%", "Target A HP 90%"] {
        folder.add(name, "old");
    }
    let doc = load_scenario(folder.path(), "Target A").unwrap();
    let requests = [
        VariantRequest::new(ModifierKey::Hp, 20),
        VariantRequest::new(ModifierKey::Hp, 50),
        VariantRequest::new(ModifierKey::Hp, 80),
        VariantRequest::new(ModifierKey::Hp, 90),
    ];

    let mut prompt = Recorder {
        answers: vec![OverwriteDecision::Yes, OverwriteDecision::NoToAll],
        asked: Vec::new(),
    };
    let report = runner(&folder).run(&doc, &requests, &mut prompt);

    assert_eq!(prompt.asked, vec!["Target A HP 50%", "Target A HP 80%"]);
    assert_eq!(report.created(), 2);
    assert_eq!(report.stopped, Some(StopReason::DeclinedOverwrites));
    assert_ne!(folder.read("Target A HP 50%"), "old");
    assert_eq!(folder.read("Target A HP 80%"), "old");
    assert_eq!(folder.read("Target A HP 90%"), "old");
}

#[test]
fn never_policy_keeps_existing_and_continues() {
    let folder = ScenarioFolder::new();
    folder.add("Target A", &sample_scenario());
    folder.add("Target A Speed 50%", "old");
    let doc = load_scenario(folder.path(), "Target A").unwrap();
    let requests = [
        VariantRequest::new(ModifierKey::Speed, 50),
        VariantRequest::new(ModifierKey::Speed, 60),
    ];

    let report = runner(&folder).run(&doc, &requests, &mut OverwritePolicy::Never);
    assert_eq!(report.entries[0].outcome, VariantOutcome::Skipped);
    assert_eq!(report.entries[1].outcome, VariantOutcome::Created);
    assert_eq!(folder.read("Target A Speed 50%"), "old");
}

#[test]
fn dry_run_writes_nothing_and_reports_progress() {
    let folder = ScenarioFolder::new();
    folder.add("Target A", &sample_scenario());
    let doc = load_scenario(folder.path(), "Target A").unwrap();
    let requests = Profile::default().requests();

    let mut seen = Vec::new();
    let report = runner(&folder).dry_run(true).run_with_progress(
        &doc,
        &requests,
        &mut OverwritePolicy::Never,
        |p| seen.push((p.done, p.total)),
    );

    assert_eq!(report.planned(), requests.len());
    assert_eq!(seen.len(), requests.len());
    assert_eq!(seen.last(), Some(&(requests.len(), requests.len())));
    assert_eq!(list_scenarios(folder.path()).unwrap(), vec!["Target A"]);
}

#[test]
fn write_error_continues() {
    let folder = ScenarioFolder::new();
    folder.add("Target A", &sample_scenario());
    let doc = load_scenario(folder.path(), "Target A").unwrap();
    // A directory where the output file should go cannot be written
    std::fs::create_dir(folder.path().join("Target A Size 50%.sce")).unwrap();

    let requests = [
        VariantRequest::new(ModifierKey::Size, 50),
        VariantRequest::new(ModifierKey::Size, 60),
    ];
    let report = runner(&folder).run(&doc, &requests, &mut OverwritePolicy::Always);

    assert!(matches!(report.entries[0].outcome, VariantOutcome::WriteError(_)));
    assert_eq!(report.entries[1].outcome, VariantOutcome::Created);
}

#[test]
fn profile_tags_flow_into_names() {
    let folder = ScenarioFolder::new();
    folder.add("Target A", &sample_scenario());
    let mut profile = Profile::default();
    profile.set_tag(ModifierKey::Duration, "Time").unwrap();

    let doc = load_scenario(folder.path(), "Target A").unwrap();
    let report = BatchRunner::new(VariantMutator::with_tags(profile.tag_texts()), folder.path())
        .run(
            &doc,
            &[VariantRequest::new(ModifierKey::Duration, 45)],
            &mut OverwritePolicy::Never,
        );
    assert_eq!(report.created(), 1);
    assert!(folder.exists("Target A Time 45s"));
}
