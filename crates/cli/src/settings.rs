//! `ghprojects settings` -- diff and sync the CLI config with editor settings.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use clap::{Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use dialoguer::{Confirm, Input, Select};

use ghprojects_core::config::AppConfig;
use ghprojects_core::settings::{
    parse_resolution_arg, ConflictResolution, MergePatches, SettingConflict, SettingKey,
    SettingValue, SettingsDiff, Source,
};
use ghprojects_core::store::{CliConfigStore, ConfigurationTarget, EditorSettingsStore};
use ghprojects_core::sync::SettingsSync;

use crate::style;

/// Settings subcommands.
#[derive(Subcommand, Debug)]
pub enum SettingsAction {
    /// Show how the CLI config and editor settings differ.
    Diff {
        /// Editor settings scope to compare against.
        #[arg(long)]
        target: Option<ConfigurationTarget>,
    },

    /// Reconcile differences, prompting for each one.
    Sync {
        /// Editor settings scope to sync with.
        #[arg(long)]
        target: Option<ConfigurationTarget>,

        /// Show what would be written without writing anything.
        #[arg(long)]
        dry_run: bool,

        /// Settle every conflict in favour of one side.
        #[arg(long, value_enum)]
        prefer: Option<Side>,

        /// Settle one conflict: KEY=cli|editor|skip|custom:VALUE. Repeatable.
        #[arg(long = "resolve", value_name = "KEY=RESOLUTION")]
        resolve: Vec<String>,

        /// Copy every one-sided setting without asking; skip unresolved conflicts.
        #[arg(short, long)]
        yes: bool,
    },
}

/// A settings source, as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Side {
    Cli,
    #[value(alias = "vscode")]
    Editor,
}

impl From<Side> for Source {
    fn from(side: Side) -> Self {
        match side {
            Side::Cli => Source::Cli,
            Side::Editor => Source::Editor,
        }
    }
}

/// How unresolved conflicts and one-sided settings are decided.
struct Decisions {
    resolutions: BTreeMap<SettingKey, ConflictResolution>,
    prefer: Option<Source>,
    assume_yes: bool,
}

/// Run a settings subcommand.
pub fn run_settings(action: SettingsAction, config: &AppConfig) -> Result<()> {
    match action {
        SettingsAction::Diff { target } => {
            let sync = open_sync(config, target)?;
            run_diff(&sync)
        }
        SettingsAction::Sync {
            target,
            dry_run,
            prefer,
            resolve,
            yes,
        } => {
            let resolutions = resolve
                .iter()
                .map(|arg| parse_resolution_arg(arg))
                .collect::<Result<BTreeMap<_, _>, _>>()
                .context("invalid --resolve argument")?;
            let decisions = Decisions {
                resolutions,
                prefer: prefer.map(Source::from),
                assume_yes: yes,
            };
            let sync = open_sync(config, target)?;
            run_sync(&sync, decisions, dry_run)
        }
    }
}

fn open_sync(
    config: &AppConfig,
    target: Option<ConfigurationTarget>,
) -> Result<SettingsSync<CliConfigStore, EditorSettingsStore>> {
    let cli = config.cli_store().context("failed to locate CLI config")?;
    let editor = config
        .editor_store(target)
        .context("failed to locate editor settings")?;
    Ok(SettingsSync::new(cli, editor))
}

// ---------------------------------------------------------------------------
// diff
// ---------------------------------------------------------------------------

fn run_diff(sync: &SettingsSync<CliConfigStore, EditorSettingsStore>) -> Result<()> {
    let diff = sync.diff().context("failed to read settings")?;

    println!();
    println!(
        "{}",
        style::header(&format!(
            "Settings: {} vs {}",
            sync.cli_store().path().display(),
            sync.editor_store().path().display()
        ))
    );
    println!();
    println!("{}", diff_table(&diff));
    println!();

    if diff.has_differences() {
        println!("{}", style::warn(&diff.summary()));
    } else {
        println!("{}", style::success("Settings are in sync"));
    }
    println!();
    Ok(())
}

fn diff_table(diff: &SettingsDiff) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Setting".to_string(),
        Source::Cli.label().to_string(),
        Source::Editor.label().to_string(),
        "Status".to_string(),
    ]);

    let unset = style::dim("-");
    for key in SettingKey::ALL {
        let (cli, editor, status) = if let Some(v) = diff.matching.iter().find(|v| v.key == key) {
            (v.value.clone(), v.value.clone(), "matching")
        } else if let Some(c) = diff.conflicts.iter().find(|c| c.key == key) {
            (c.cli_value.clone(), c.editor_value.clone(), "conflict")
        } else if let Some(v) = diff.only_in_cli.iter().find(|v| v.key == key) {
            (v.value.clone(), unset.clone(), "only in CLI")
        } else if let Some(v) = diff.only_in_editor.iter().find(|v| v.key == key) {
            (unset.clone(), v.value.clone(), "only in VS Code")
        } else {
            (unset.clone(), unset.clone(), "unset")
        };

        table.add_row(vec![
            Cell::new(key.display_name()),
            Cell::new(cli),
            Cell::new(editor),
            Cell::new(status),
        ]);
    }
    table
}

// ---------------------------------------------------------------------------
// sync
// ---------------------------------------------------------------------------

fn run_sync(
    sync: &SettingsSync<CliConfigStore, EditorSettingsStore>,
    mut decisions: Decisions,
    dry_run: bool,
) -> Result<()> {
    let diff = sync.diff().context("failed to read settings")?;

    if !diff.has_differences() {
        println!("{}", style::success("Settings are already in sync"));
        return Ok(());
    }

    println!();
    println!("{}", style::header(&diff.summary()));
    println!();

    for conflict in &diff.conflicts {
        if decisions.resolutions.contains_key(&conflict.key) {
            continue;
        }
        let resolution = match (decisions.prefer, decisions.assume_yes) {
            (Some(source), _) => ConflictResolution::prefer(source),
            (None, true) => ConflictResolution::Skip,
            (None, false) => prompt_conflict(conflict)?,
        };
        decisions.resolutions.insert(conflict.key, resolution);
    }

    let mut approved = BTreeSet::new();
    for source in [Source::Cli, Source::Editor] {
        for entry in diff.only_in(source) {
            if decisions.assume_yes || prompt_one_sided(entry, source)? {
                approved.insert(entry.key);
            }
        }
    }

    let patches = sync.plan(&diff, &decisions.resolutions, &approved, dry_run);
    if patches.is_empty() {
        println!("{}", style::warn("Nothing to write"));
        return Ok(());
    }

    println!();
    println!("{}", style::header(if dry_run { "Planned changes (dry run)" } else { "Changes" }));
    println!("{}", patch_table(&patches));

    let outcome = sync
        .apply(&patches, dry_run)
        .context("failed to write settings")?;

    println!();
    if outcome.dry_run {
        println!("{}", style::warn("Dry run: no files were modified"));
    } else {
        println!(
            "{}",
            style::success(&format!(
                "Updated {} CLI setting(s) and {} VS Code setting(s)",
                outcome.written_to_cli.len(),
                outcome.written_to_editor.len()
            ))
        );
    }
    Ok(())
}

fn prompt_conflict(conflict: &SettingConflict) -> Result<ConflictResolution> {
    let items = [
        format!("Use {} value: {}", Source::Cli.label(), conflict.cli_value),
        format!("Use {} value: {}", Source::Editor.label(), conflict.editor_value),
        "Enter a custom value".to_string(),
        "Skip".to_string(),
    ];

    let choice = Select::new()
        .with_prompt(format!("{} differs", conflict.display_name))
        .items(&items)
        .default(0)
        .interact()
        .context("failed to read conflict choice")?;

    let resolution = match choice {
        0 => ConflictResolution::UseCli,
        1 => ConflictResolution::UseEditor,
        2 => {
            let value: String = Input::new()
                .with_prompt(format!("New value for {}", conflict.display_name))
                .interact_text()
                .context("failed to read custom value")?;
            ConflictResolution::UseCustom(value)
        }
        _ => ConflictResolution::Skip,
    };
    Ok(resolution)
}

fn prompt_one_sided(entry: &SettingValue, source: Source) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!(
            "{} = \"{}\" is only set in {}. Copy it ({})?",
            entry.key.display_name(),
            entry.value,
            source.label(),
            style::direction(source)
        ))
        .default(true)
        .interact()
        .context("failed to read confirmation")
}

fn patch_table(patches: &MergePatches) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Write to", "Setting", "Value"]);

    for source in [Source::Cli, Source::Editor] {
        for (key, value) in patches.for_source(source).iter() {
            table.add_row(vec![
                Cell::new(style::source(source)),
                Cell::new(key.display_name()),
                Cell::new(value),
            ]);
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_diff() -> SettingsDiff {
        let cli = [(SettingKey::MainBranch, "main"), (SettingKey::DoneStatus, "Done")]
            .into_iter()
            .collect();
        let editor = [(SettingKey::MainBranch, "master")].into_iter().collect();
        ghprojects_core::compute_diff(&cli, &editor, &SettingKey::ALL)
    }

    #[test]
    fn test_diff_table_has_row_per_key() {
        let table = diff_table(&sample_diff());
        assert_eq!(table.row_iter().count(), SettingKey::ALL.len());
        let rendered = table.to_string();
        assert!(rendered.contains("conflict"));
        assert!(rendered.contains("only in CLI"));
    }

    #[test]
    fn test_side_maps_to_source() {
        assert_eq!(Source::from(Side::Cli), Source::Cli);
        assert_eq!(Source::from(Side::Editor), Source::Editor);
    }
}
