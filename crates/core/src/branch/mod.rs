//! Branch naming and branch relevance ranking.
//!
//! Both halves work on plain strings only. Listing, creating and checking out
//! branches is left to whoever drives `git`.

pub mod naming;
pub mod relevance;

pub use naming::{generate_branch_name, sanitize_for_branch_name, BranchNameVariables};
pub use relevance::{rank_branches_by_relevance, score_branch, title_keywords, RankedBranch};
