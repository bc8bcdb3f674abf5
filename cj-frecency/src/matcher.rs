use crate::entry::Entry;
use crate::scorer::{rank_value, SortMethod};
use regex::{Regex, RegexBuilder};
use tracing::debug;

/// Discrete match-quality bucket, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    Substring,
    CaseInsensitive,
    Fuzzy,
}

impl MatchTier {
    /// Boost factor applied to the rank value before comparison.
    pub fn multiplier(self) -> f64 {
        match self {
            MatchTier::Exact => 2.0,
            MatchTier::Substring => 1.9,
            MatchTier::CaseInsensitive => 1.8,
            MatchTier::Fuzzy => 1.0,
        }
    }

    /// Tiers 1-3; these take strict precedence over fuzzy-only matches.
    pub fn case_sensitive_family(self) -> bool {
        !matches!(self, MatchTier::Fuzzy)
    }
}

/// A matched entry with its tier and boosted rank value.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub entry: Entry,
    pub tier: MatchTier,
    pub rank: f64,
}

/// Options controlling candidate selection.
#[derive(Debug, Clone)]
pub struct MatchOptions {
    pub sort: SortMethod,
    /// Substring the candidate directory must contain.
    pub path_filter: Option<String>,
    /// When set, commands invoking this name are excluded (the result
    /// will be auto-executed, so a self-invocation would loop).
    pub self_name: Option<String>,
    pub now: i64,
}

/// Compile the tier-4 pattern: spaces become "any characters" wildcards,
/// matched case-insensitively.
fn fuzzy_pattern(query: &str) -> Option<Regex> {
    let pattern = query
        .split(' ')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(".*");
    RegexBuilder::new(&pattern).case_insensitive(true).build().ok()
}

/// Classify how `command` matches `query`. An empty query matches
/// everything at the Exact tier.
fn match_tier(query: &str, command: &str, fuzzy: Option<&Regex>) -> Option<MatchTier> {
    if query.is_empty() || command == query {
        return Some(MatchTier::Exact);
    }
    if command.contains(query) {
        return Some(MatchTier::Substring);
    }
    if command.to_lowercase().contains(&query.to_lowercase()) {
        return Some(MatchTier::CaseInsensitive);
    }
    if fuzzy.is_some_and(|re| re.is_match(command)) {
        return Some(MatchTier::Fuzzy);
    }
    None
}

/// Classify every entry against the query.
///
/// Path filtering and the self-reference guard run before tier
/// evaluation; surviving entries get a rank value boosted by their tier
/// multiplier. The boost is skipped in Recent mode, whose rank values
/// are negative ages.
pub fn classify(entries: &[Entry], query: &str, opts: &MatchOptions) -> Vec<Candidate> {
    let fuzzy = fuzzy_pattern(query);
    let mut candidates = Vec::new();
    for entry in entries {
        if let Some(ref filter) = opts.path_filter {
            if !entry.directory.contains(filter.as_str()) {
                continue;
            }
        }
        if let Some(ref name) = opts.self_name {
            // Basename-stripped, so a hand-edited `/usr/bin/cj ...` line
            // is caught the same way the classifier would catch it.
            let first = entry.command.split(' ').next().unwrap_or("");
            if crate::classifier::command_name(first) == name.as_str() {
                debug!("excluding self-invocation: {}", entry.command);
                continue;
            }
        }
        let Some(tier) = match_tier(query, &entry.command, fuzzy.as_ref()) else {
            continue;
        };
        let mut rank = rank_value(entry, opts.sort, opts.now);
        if opts.sort != SortMethod::Recent {
            rank *= tier.multiplier();
        }
        candidates.push(Candidate {
            entry: entry.clone(),
            tier,
            rank,
        });
    }
    candidates
}

/// Reduce a bucket to its best candidate: highest rank per directory,
/// then highest rank overall. Ties break toward the earlier entry.
fn pick(bucket: Vec<Candidate>) -> Option<Candidate> {
    let mut per_dir: Vec<Candidate> = Vec::new();
    for cand in bucket {
        match per_dir
            .iter_mut()
            .find(|c| c.entry.directory == cand.entry.directory)
        {
            Some(existing) => {
                if cand.rank > existing.rank {
                    *existing = cand;
                }
            }
            None => per_dir.push(cand),
        }
    }
    per_dir
        .into_iter()
        .reduce(|best, c| if c.rank > best.rank { c } else { best })
}

/// Select the single best candidate. The fuzzy bucket is consulted only
/// when no case-sensitive-family match exists at all.
pub fn best(candidates: Vec<Candidate>) -> Option<Candidate> {
    let (primary, secondary): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| c.tier.case_sensitive_family());
    pick(primary).or_else(|| pick(secondary))
}

/// All candidates for the list view: one per directory, primary bucket
/// first, each bucket sorted by descending rank.
pub fn ranked(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let (primary, secondary): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| c.tier.case_sensitive_family());
    let mut out = reduce_per_directory(primary);
    let tail = reduce_per_directory(secondary);
    out.extend(tail);
    out
}

fn reduce_per_directory(bucket: Vec<Candidate>) -> Vec<Candidate> {
    let mut per_dir: Vec<Candidate> = Vec::new();
    for cand in bucket {
        match per_dir
            .iter_mut()
            .find(|c| c.entry.directory == cand.entry.directory)
        {
            Some(existing) => {
                if cand.rank > existing.rank {
                    *existing = cand;
                }
            }
            None => per_dir.push(cand),
        }
    }
    per_dir.sort_by(|a, b| b.rank.partial_cmp(&a.rank).unwrap_or(std::cmp::Ordering::Equal));
    per_dir
}
