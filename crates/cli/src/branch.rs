//! `ghprojects branch` -- branch names for issues and branch ranking.

use std::io::BufRead;

use anyhow::{Context, Result};
use clap::Subcommand;
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use tracing::{debug, warn};

use ghprojects_core::branch::{
    generate_branch_name, rank_branches_by_relevance, BranchNameVariables, RankedBranch,
};
use ghprojects_core::config::{validate_branch_pattern, AppConfig};
use ghprojects_core::settings::SettingKey;
use ghprojects_core::store::SettingsStore;

use crate::style;

/// Branch subcommands.
#[derive(Subcommand, Debug)]
pub enum BranchAction {
    /// Print the branch name to create for an issue.
    Name {
        /// Issue title.
        #[arg(short, long)]
        title: String,

        /// Issue number. Omit for draft items.
        #[arg(short, long)]
        number: Option<u64>,

        /// GitHub login [default: branch.user from the config].
        #[arg(short, long)]
        user: Option<String>,

        /// Repository in owner/name form.
        #[arg(short, long)]
        repo: Option<String>,

        /// Branch pattern [default: branchPattern from the CLI config, then branch.pattern].
        #[arg(short, long)]
        pattern: Option<String>,

        /// Maximum length [default: branch.max_length].
        #[arg(long)]
        max_length: Option<usize>,
    },

    /// Order existing branches by relevance to an issue.
    Rank {
        /// Issue title.
        #[arg(short, long, default_value = "")]
        title: String,

        /// Issue number.
        #[arg(short, long)]
        number: Option<u64>,

        /// Print branch names only, one per line.
        #[arg(long)]
        plain: bool,

        /// Branch names. Read from stdin, one per line, when omitted.
        branches: Vec<String>,
    },
}

/// Run a branch subcommand.
pub fn run_branch(action: BranchAction, config: &AppConfig) -> Result<()> {
    match action {
        BranchAction::Name {
            title,
            number,
            user,
            repo,
            pattern,
            max_length,
        } => {
            let user = user
                .or_else(|| config.branch.user.clone())
                .context("no user given: pass --user or set branch.user in the config")?;
            let pattern = match pattern {
                Some(pattern) => pattern,
                None => configured_pattern(config),
            };
            validate_branch_pattern(&pattern).map_err(|detail| {
                anyhow::anyhow!("invalid branch pattern '{}': {}", pattern, detail)
            })?;

            let mut vars = BranchNameVariables::new(user, title);
            vars.number = number;
            vars.repo = repo;

            let max_length = max_length.unwrap_or(config.branch.max_length);
            if max_length == 0 {
                anyhow::bail!("--max-length must be > 0");
            }

            println!("{}", generate_branch_name(&pattern, &vars, max_length));
            Ok(())
        }

        BranchAction::Rank {
            title,
            number,
            plain,
            branches,
        } => {
            let branches = if branches.is_empty() {
                read_branches_from_stdin()?
            } else {
                branches
            };
            let ranked = rank_branches_by_relevance(branches.as_slice(), number, &title);

            if plain {
                for branch in &ranked {
                    println!("{}", branch.name);
                }
            } else if ranked.is_empty() {
                println!("{}", style::warn("No branches to rank"));
            } else {
                println!("{}", rank_table(&ranked));
            }
            Ok(())
        }
    }
}

/// The CLI config's `branchPattern`, falling back to `branch.pattern`.
fn configured_pattern(config: &AppConfig) -> String {
    let from_cli = config
        .cli_store()
        .map_err(anyhow::Error::from)
        .and_then(|store| store.load().map_err(anyhow::Error::from));

    match from_cli {
        Ok(settings) => match settings.get(SettingKey::BranchPattern) {
            Some(pattern) => {
                debug!(pattern, "using branch pattern from CLI config");
                pattern.to_string()
            }
            None => config.branch.pattern.clone(),
        },
        Err(e) => {
            warn!(error = %e, "could not read CLI config, using configured branch pattern");
            config.branch.pattern.clone()
        }
    }
}

fn read_branches_from_stdin() -> Result<Vec<String>> {
    let stdin = std::io::stdin();
    let mut branches = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read branches from stdin")?;
        let name = line.trim();
        if !name.is_empty() {
            branches.push(name.to_string());
        }
    }
    Ok(branches)
}

fn rank_table(ranked: &[RankedBranch]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Branch", "Score"]);

    for (i, branch) in ranked.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&branch.name),
            Cell::new(branch.score),
        ]);
    }
    table
}
