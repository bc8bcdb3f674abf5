use crate::classifier;
use crate::config::Config;
use crate::entry::normalize_command;
use crate::matcher::{self, Candidate, MatchOptions};
use crate::scorer::SortMethod;
use crate::store::EntryStore;
use anyhow::Result;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::debug;

/// What the caller intends to do with the selected entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Change directory and re-execute the matched command (the default).
    JumpAndExecute,
    /// Change directory only.
    Jump,
    /// Print the best match without acting.
    Print,
    /// Print all ranked candidates without acting.
    List,
    /// Jump and execute, but only after interactive confirmation.
    Confirm,
}

impl Action {
    /// Execute-capable modes must exclude self-invoking commands.
    pub fn executes(self) -> bool {
        matches!(self, Action::JumpAndExecute | Action::Confirm)
    }
}

/// Options for one query invocation.
#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub sort: SortMethod,
    pub action: Action,
    /// Explicit path filter; overrides the trailing-token heuristic.
    pub path_filter: Option<String>,
}

/// A matched (directory, command) pair returned to the caller, which
/// performs the actual directory change and execution.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub directory: String,
    pub command: String,
}

/// Subcommand vocabulary for the trailing-token heuristic: these stay
/// part of the command query instead of becoming a path filter.
static SUBCOMMANDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "status", "commit", "push", "pull", "fetch", "checkout", "branch", "log", "diff",
        "rebase", "merge", "stash", "add", "install", "uninstall", "update", "upgrade", "build",
        "run", "test", "bench", "check", "clippy", "fmt", "start", "stop", "restart", "init",
        "clone", "deploy", "watch", "serve", "dev", "clean", "publish", "release", "up", "down",
        "exec", "shell", "list",
    ])
});

/// Record one observation through the classifier. Returns whether the
/// pair was stored; rejection is a silent no-op, never an error.
pub fn add(command: &str, directory: &str, config: &Config, now: i64) -> Result<bool> {
    let command = normalize_command(command);
    if !classifier::eligible(&command, directory, config) {
        debug!("classifier rejected: {}", command);
        return Ok(false);
    }
    let store = EntryStore::new(config);
    if store.ownership_mismatch() {
        debug!("data file ownership mismatch, skipping record");
        return Ok(false);
    }
    store.record(&command, directory, now)?;
    Ok(true)
}

/// Re-record a matched pair after execution to reinforce its score.
pub fn reinforce(result: &QueryResult, config: &Config, now: i64) -> Result<()> {
    let store = EntryStore::new(config);
    if store.ownership_mismatch() {
        return Ok(());
    }
    store.record(&result.command, &result.directory, now)
}

/// Split raw query tokens into (command query, path filter).
///
/// The literal keyword `in` separates the two explicitly. Without it, a
/// trailing token outside the known subcommand vocabulary is treated as
/// a path filter. A single token is always the command query.
pub fn split_tokens(tokens: &[String]) -> (String, Option<String>) {
    if let Some(pos) = tokens.iter().position(|t| t == "in") {
        let query = tokens[..pos].join(" ");
        let filter = tokens[pos + 1..].join(" ");
        let filter = if filter.is_empty() { None } else { Some(filter) };
        return (query, filter);
    }
    if tokens.len() >= 2 {
        let last = tokens[tokens.len() - 1].as_str();
        if !SUBCOMMANDS.contains(last) {
            return (
                tokens[..tokens.len() - 1].join(" "),
                Some(last.to_string()),
            );
        }
    }
    (tokens.join(" "), None)
}

fn match_options(tokens: &[String], opts: &QueryOptions, config: &Config, now: i64) -> (String, MatchOptions) {
    let (query, heuristic_filter) = if opts.path_filter.is_some() {
        (tokens.join(" "), None)
    } else {
        split_tokens(tokens)
    };
    let path_filter = opts.path_filter.clone().or(heuristic_filter);
    let self_name = opts.action.executes().then(|| config.tool_name.clone());
    debug!("query '{}' path_filter {:?}", query, path_filter);
    (
        query,
        MatchOptions {
            sort: opts.sort,
            path_filter,
            self_name,
            now,
        },
    )
}

/// Run a query and return the single best (directory, command), or
/// `None` when nothing survives filtering. Ownership mismatch on the
/// data file turns the invocation into a no-match no-op.
pub fn query(
    tokens: &[String],
    opts: &QueryOptions,
    config: &Config,
    now: i64,
) -> Result<Option<QueryResult>> {
    let store = EntryStore::new(config);
    if store.ownership_mismatch() {
        debug!("data file ownership mismatch, skipping query");
        return Ok(None);
    }
    let entries = store.load();
    let (query, mopts) = match_options(tokens, opts, config, now);
    let best = matcher::best(matcher::classify(&entries, &query, &mopts));
    Ok(best.map(|c| QueryResult {
        directory: c.entry.directory,
        command: c.entry.command,
    }))
}

/// Run a query and return every candidate ranked, one per directory,
/// case-sensitive-family matches first.
pub fn list(
    tokens: &[String],
    opts: &QueryOptions,
    config: &Config,
    now: i64,
) -> Result<Vec<Candidate>> {
    let store = EntryStore::new(config);
    if store.ownership_mismatch() {
        return Ok(Vec::new());
    }
    let entries = store.load();
    let (query, mopts) = match_options(tokens, opts, config, now);
    Ok(matcher::ranked(matcher::classify(&entries, &query, &mopts)))
}
