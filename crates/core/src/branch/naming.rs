//! Branch name generation from a pattern template.

use std::sync::OnceLock;

use regex_lite::Regex;
use serde::{Deserialize, Serialize};

/// The pattern used when nothing else is configured.
pub const DEFAULT_BRANCH_PATTERN: &str = "{user}/{number}-{title}";

/// The maximum branch name length used when nothing else is configured.
pub const DEFAULT_MAX_LENGTH: usize = 60;

/// Placeholders a branch pattern may contain.
pub const PLACEHOLDERS: [&str; 4] = ["{user}", "{number}", "{title}", "{repo}"];

/// Substituted for `{number}` when the item has no issue number.
pub const DRAFT_NUMBER: &str = "draft";

/// Inputs for a single branch name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchNameVariables {
    /// Login of the user starting work, inserted verbatim.
    pub user: String,
    /// Issue number; `None` for draft items.
    pub number: Option<u64>,
    /// Free-text title, sanitized before insertion.
    pub title: String,
    /// Repository in `owner/name` form.
    pub repo: Option<String>,
}

impl BranchNameVariables {
    pub fn new(user: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            number: None,
            title: title.into(),
            repo: None,
        }
    }

    pub fn with_number(mut self, number: u64) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repo = Some(repo.into());
        self
    }

    /// Sanitized repository name, or empty when `repo` is missing or has no `/`.
    fn repo_short_name(&self) -> String {
        self.repo
            .as_deref()
            .and_then(|repo| repo.split('/').nth(1))
            .map(sanitize_for_branch_name)
            .unwrap_or_default()
    }
}

/// Turn free text into a git-safe branch segment.
///
/// Lowercases, replaces anything outside `[a-z0-9-]` with `-`, collapses
/// hyphen runs and trims hyphens from both ends. The result never contains
/// uppercase letters, whitespace, or repeated hyphens, and applying the
/// function twice gives the same result as applying it once.
pub fn sanitize_for_branch_name(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }
    slug.trim_matches('-').to_string()
}

fn user_number_prefix() -> &'static Regex {
    static PREFIX: OnceLock<Regex> = OnceLock::new();
    // The pattern is a literal; compiling it cannot fail.
    PREFIX.get_or_init(|| Regex::new(r"^[^/]+/\d+-").expect("valid prefix regex"))
}

/// Build a branch name from `pattern` and `vars`, capped at `max_length`
/// characters.
///
/// Each placeholder is substituted at its first occurrence only. When the
/// result is too long and starts with a `user/number-` prefix, the prefix is
/// kept whole and only the remainder is cut (dropping a trailing hyphen left
/// by the cut). Otherwise the whole string is cut to `max_length`.
pub fn generate_branch_name(pattern: &str, vars: &BranchNameVariables, max_length: usize) -> String {
    let number = vars
        .number
        .map(|n| n.to_string())
        .unwrap_or_else(|| DRAFT_NUMBER.to_string());

    let name = pattern
        .replacen("{user}", &vars.user, 1)
        .replacen("{number}", &number, 1)
        .replacen("{title}", &sanitize_for_branch_name(&vars.title), 1)
        .replacen("{repo}", &vars.repo_short_name(), 1);

    if name.chars().count() <= max_length {
        return name;
    }

    match user_number_prefix().find(&name) {
        Some(m) => {
            let (prefix, rest) = name.split_at(m.end());
            let budget = max_length.saturating_sub(prefix.chars().count());
            let cut: String = rest.chars().take(budget).collect();
            let cut = cut.strip_suffix('-').unwrap_or(&cut);
            format!("{}{}", prefix, cut)
        }
        None => name.chars().take(max_length).collect(),
    }
}
