//! Free-text search over the catalog.
//!
//! The ranking is a fixed four-tier policy so that results are reproducible
//! across runs and machines:
//!
//! 1. case-insensitive exact match on `id` (or an alias)
//! 2. case-insensitive substring match on `id`, `title`, or an alias
//! 3. case-insensitive substring match on any tag
//! 4. case-insensitive substring match anywhere in the description
//!
//! Within a tier, shorter `id`/`title` wins (a more specific match), then
//! catalog order. Entries matching no tier are excluded. The empty query
//! matches everything at the lowest tier in catalog order, which is what the
//! `catalog` listing builds on.

use serde::Serialize;

use crate::catalog::{Catalog, SkillEntry};

/// Default result cap for `suggest`; overridable with `--limit`.
pub const DEFAULT_SUGGEST_LIMIT: usize = 10;

/// Tier scores, highest first. Exposed in JSON output so callers can see
/// which tier a hit landed in.
const SCORE_EXACT_ID: u32 = 100;
const SCORE_ID_TITLE: u32 = 60;
const SCORE_TAG: u32 = 40;
const SCORE_DESCRIPTION: u32 = 20;

#[derive(Debug, Clone, Serialize)]
pub struct ScoredSkill<'a> {
    #[serde(flatten)]
    pub skill: &'a SkillEntry,
    pub score: u32,
}

/// Rank catalog entries against `query`, returning at most `limit` hits.
///
/// Deterministic: the underlying total order does not depend on `limit`, so
/// `search(q, c, k)` is always a prefix of `search(q, c, k+1)`.
pub fn search<'a>(query: &str, catalog: &'a Catalog, limit: usize) -> Vec<ScoredSkill<'a>> {
    let query = query.trim().to_lowercase();

    let mut hits: Vec<(u32, usize, usize, &SkillEntry)> = catalog
        .entries()
        .iter()
        .enumerate()
        .filter_map(|(idx, skill)| {
            let score = score(&query, skill)?;
            // Listing (empty query) keeps pure catalog order; otherwise a
            // shorter name is the more specific match.
            let specificity = if query.is_empty() {
                0
            } else {
                skill.id.len().min(skill.title.len())
            };
            Some((score, specificity, idx, skill))
        })
        .collect();

    // Higher tier first, then more specific, then catalog order.
    hits.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));
    hits.truncate(limit);

    hits.into_iter()
        .map(|(score, _, _, skill)| ScoredSkill { skill, score })
        .collect()
}

fn score(query: &str, skill: &SkillEntry) -> Option<u32> {
    if query.is_empty() {
        // Listing semantics: everything matches at the lowest tier.
        return Some(SCORE_DESCRIPTION);
    }

    let id = skill.id.to_lowercase();
    if id == query || skill.aliases.iter().any(|a| a.to_lowercase() == query) {
        return Some(SCORE_EXACT_ID);
    }
    if id.contains(query)
        || skill.title.to_lowercase().contains(query)
        || skill.aliases.iter().any(|a| a.to_lowercase().contains(query))
    {
        return Some(SCORE_ID_TITLE);
    }
    if skill.tags.iter().any(|t| t.to_lowercase().contains(query)) {
        return Some(SCORE_TAG);
    }
    if skill.description.to_lowercase().contains(query) {
        return Some(SCORE_DESCRIPTION);
    }
    None
}
