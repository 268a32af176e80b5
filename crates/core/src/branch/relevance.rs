//! Ranking existing branches by how likely they belong to an issue.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

/// Score for a branch name containing the issue number.
pub const NUMBER_MATCH_SCORE: u32 = 100;

/// Score for each title keyword found in a branch name.
pub const KEYWORD_MATCH_SCORE: u32 = 10;

/// A branch name and its relevance score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedBranch {
    pub name: String,
    pub score: u32,
}

/// Significant words of an issue title.
///
/// Lowercases, drops everything but ASCII letters, digits and whitespace,
/// splits on whitespace and keeps words longer than two characters.
pub fn title_keywords(title: &str) -> Vec<String> {
    let cleaned: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() > 2)
        .map(str::to_string)
        .collect()
}

/// Relevance of a single branch name.
///
/// Number and keyword checks are plain substring tests; `42` matches
/// `fix-1420` as well.
pub fn score_branch(branch: &str, issue_number: Option<u64>, keywords: &[String]) -> u32 {
    let mut score = 0;

    if let Some(number) = issue_number {
        if branch.contains(&number.to_string()) {
            score += NUMBER_MATCH_SCORE;
        }
    }

    let lowered = branch.to_lowercase();
    for word in keywords {
        if lowered.contains(word.as_str()) {
            score += KEYWORD_MATCH_SCORE;
        }
    }

    score
}

/// Order `branches` from most to least relevant to the issue.
///
/// The sort is stable: equally scored branches keep their input order, so
/// with no number and no usable title words the input order is unchanged.
pub fn rank_branches_by_relevance<S: AsRef<str>>(
    branches: &[S],
    issue_number: Option<u64>,
    issue_title: &str,
) -> Vec<RankedBranch> {
    let keywords = title_keywords(issue_title);

    let mut ranked: Vec<RankedBranch> = branches
        .iter()
        .map(|branch| {
            let name = branch.as_ref();
            RankedBranch {
                name: name.to_string(),
                score: score_branch(name, issue_number, &keywords),
            }
        })
        .collect();

    ranked.sort_by_key(|branch| Reverse(branch.score));
    ranked
}
