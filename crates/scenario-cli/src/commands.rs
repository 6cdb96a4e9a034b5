//! Subcommand handlers

use crate::prompt::StdinPrompt;
use anyhow::{bail, Context, Result};
use clap::ArgMatches;
use scenario_batch::{
    filter_scenarios, list_scenarios, load_scenario, BatchRunner, OverwritePolicy,
    OverwritePrompt, Progress, Settings, StopReason, VariantOutcome,
};
use scenario_engine::{ModifierKey, VariantMutator, VariantRequest};
use std::path::{Path, PathBuf};

pub(crate) fn run(matches: &ArgMatches) -> Result<()> {
    let settings_path = matches
        .get_one::<PathBuf>("settings")
        .cloned()
        .unwrap_or_else(|| PathBuf::from(scenario_batch::SETTINGS_FILE));
    let mut settings = Settings::load(&settings_path);

    match matches.subcommand() {
        Some(("list", args)) => list(&settings, args),
        Some(("inspect", args)) => inspect(&settings, args),
        Some(("generate", args)) => {
            generate(&mut settings, args)?;
            save(&settings, &settings_path)
        }
        Some(("profile", args)) => {
            if profile(&mut settings, args)? {
                save(&settings, &settings_path)?;
            }
            Ok(())
        }
        _ => bail!("no command given"),
    }
}

fn save(settings: &Settings, path: &Path) -> Result<()> {
    settings
        .save(path)
        .with_context(|| format!("saving settings to {}", path.display()))
}

fn folder(settings: &Settings, args: &ArgMatches) -> PathBuf {
    args.get_one::<PathBuf>("folder")
        .cloned()
        .unwrap_or_else(|| settings.active().folder_path.clone())
}

fn required<'a>(args: &'a ArgMatches, id: &str) -> Result<&'a str> {
    args.get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("missing <{id}>"))
}

fn modifier(args: &ArgMatches) -> Result<ModifierKey> {
    Ok(required(args, "modifier")?.parse()?)
}

fn list(settings: &Settings, args: &ArgMatches) -> Result<()> {
    let folder = folder(settings, args);
    let names = list_scenarios(&folder)
        .with_context(|| format!("listing scenarios in {}", folder.display()))?;
    let term = args.get_one::<String>("filter").map_or("", String::as_str);

    let shown = filter_scenarios(&names, term);
    if shown.is_empty() {
        tracing::warn!("No scenarios found in {}", folder.display());
    }
    for name in shown {
        println!("{name}");
    }
    Ok(())
}

fn inspect(settings: &Settings, args: &ArgMatches) -> Result<()> {
    let name = required(args, "name")?;
    let folder = folder(settings, args);
    let doc = load_scenario(&folder, name).with_context(|| format!("loading '{name}'"))?;
    let stats = doc.base_stats();

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let show = |value: Option<f64>| value.map_or_else(|| "N/A".to_string(), |v| v.to_string());
    println!("Scenario:   {}", stats.name);
    println!("Targets:    {}", stats.targets.join(", "));
    println!("Radius:     {}", show(stats.radius));
    println!("Max speed:  {}", show(stats.max_speed));
    println!("Max health: {}", show(stats.max_health));
    println!("Regen/sec:  {}", show(stats.regen_per_sec));
    println!("Timescale:  {}", show(stats.timescale));
    println!("Timelimit:  {}", show(stats.timelimit));
    Ok(())
}

fn generate(settings: &mut Settings, args: &ArgMatches) -> Result<()> {
    if let Some(profile) = args.get_one::<String>("profile") {
        settings.select(profile)?;
    }
    let name = required(args, "name")?;
    let folder = folder(settings, args);
    let doc = load_scenario(&folder, name).with_context(|| format!("loading '{name}'"))?;

    let profile = settings.active();
    let requests = match args.get_many::<String>("only") {
        Some(given) => given
            .map(|only| parse_only(only))
            .collect::<Result<Vec<_>>>()?
            .concat(),
        None => profile.requests(),
    };

    let mut prompt: Box<dyn OverwritePrompt> =
        match args.get_one::<String>("overwrite").map(String::as_str) {
            Some("always") => Box::new(OverwritePolicy::Always),
            Some("never") => Box::new(OverwritePolicy::Never),
            _ => Box::new(StdinPrompt::new()),
        };

    let report = BatchRunner::new(VariantMutator::with_tags(profile.tag_texts()), &folder)
        .dry_run(args.get_flag("dry-run"))
        .run_with_progress(&doc, &requests, prompt.as_mut(), print_progress);

    let failed = report.failures().count();
    if failed > 0 {
        tracing::warn!("{} variant(s) failed", failed);
    }
    match report.stopped {
        Some(StopReason::NameNotFound) => {
            bail!("'{name}' has no name line in its preamble; no variants can be written")
        }
        Some(StopReason::DeclinedOverwrites) => {
            tracing::info!(
                "Stopped after {} of {} variants",
                report.entries.len(),
                report.total
            );
        }
        None => {}
    }
    Ok(())
}

fn print_progress(progress: Progress<'_>) {
    let status = match &progress.entry.outcome {
        VariantOutcome::Created => "created".to_string(),
        VariantOutcome::Planned => "would create".to_string(),
        VariantOutcome::Skipped => "skipped".to_string(),
        VariantOutcome::ZeroDurationBase => "no time limit to scale".to_string(),
        VariantOutcome::NameNotFound => "name line not found".to_string(),
        VariantOutcome::InvalidTarget(e) => format!("invalid: {e}"),
        VariantOutcome::WriteError(e) => format!("write failed: {e}"),
    };
    let file = progress
        .entry
        .path
        .file_name()
        .map(|f| f.to_string_lossy())
        .unwrap_or_default();
    println!("[{}/{}] {} ({})", progress.done, progress.total, file, status);
}

/// `MOD=V,V,...` into one request per value
fn parse_only(arg: &str) -> Result<Vec<VariantRequest>> {
    let (key, values) = arg
        .split_once('=')
        .with_context(|| format!("expected MOD=V,V in '{arg}'"))?;
    let key: ModifierKey = key.parse()?;
    Ok(parse_values(values)?
        .into_iter()
        .map(|value| VariantRequest::new(key, value))
        .collect())
}

fn parse_values(list: &str) -> Result<Vec<u32>> {
    list.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<u32>()
                .with_context(|| format!("'{v}' is not a whole number"))
        })
        .collect()
}

/// Returns whether settings changed
fn profile(settings: &mut Settings, args: &ArgMatches) -> Result<bool> {
    match args.subcommand() {
        Some(("list", _)) => {
            show_profiles(settings);
            return Ok(false);
        }
        Some(("use", sub)) => settings.select(required(sub, "profile")?)?,
        Some(("save-as", sub)) => settings.save_as(required(sub, "profile")?)?,
        Some(("rename", sub)) => settings.rename(required(sub, "profile")?)?,
        Some(("delete", _)) => {
            settings.delete_active()?;
        }
        Some(("set-folder", sub)) => {
            let folder = sub
                .get_one::<PathBuf>("folder")
                .context("missing <folder>")?;
            settings.active_mut().folder_path.clone_from(folder);
        }
        Some(("set-tag", sub)) => {
            let key = modifier(sub)?;
            settings.active_mut().set_tag(key, required(sub, "tag")?)?;
        }
        Some(("set-values", sub)) => {
            let key = modifier(sub)?;
            let values = parse_values(required(sub, "values")?)?;
            settings.active_mut().set_values(key, values);
        }
        Some(("check", sub)) => {
            let key = modifier(sub)?;
            let value = *sub.get_one::<u32>("value").context("missing <value>")?;
            settings
                .active_mut()
                .set_checked(key, value, !sub.get_flag("off"))?;
        }
        Some(("check-all", sub)) => {
            let key = modifier(sub)?;
            settings.active_mut().set_all_checked(key, !sub.get_flag("off"));
        }
        _ => bail!("no profile command given"),
    }
    Ok(true)
}

fn show_profiles(settings: &Settings) {
    let active = settings.active_name();
    for name in settings.profile_names() {
        let marker = if name == active { "*" } else { " " };
        println!("{marker} {name}");
    }

    let profile = settings.active();
    println!();
    println!("Folder: {}", profile.folder_path.display());
    let tags = profile.tag_texts();
    for key in ModifierKey::ALL {
        let suffix = key.definition().suffix.as_str();
        let values: Vec<String> = profile
            .values(key)
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mark = if profile.is_checked(key, i) { "x" } else { " " };
                format!("[{mark}]{v}{suffix}")
            })
            .collect();
        println!("{:<10} ({}) {}", key.as_str(), tags.get(key), values.join(" "));
    }
}
