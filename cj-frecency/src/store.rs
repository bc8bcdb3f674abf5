use crate::config::Config;
use crate::entry::Entry;
use anyhow::{Context as _, Result};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::fs::MetadataExt;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Exponential-decay factor applied when total score mass exceeds the
/// configured ceiling.
const DECAY_FACTOR: f64 = 0.99;

/// On-disk entry store with copy-rewrite-atomic-rename mutation.
///
/// Every invocation reloads the full set from disk; no in-memory state
/// survives between invocations. Concurrent writers are last-writer-wins.
pub struct EntryStore<'a> {
    config: &'a Config,
}

impl<'a> EntryStore<'a> {
    pub fn new(config: &'a Config) -> EntryStore<'a> {
        EntryStore { config }
    }

    /// True when the data file exists but belongs to another user or is
    /// not writable. The caller must turn the whole invocation into a
    /// no-op (security guard, not a crash).
    pub fn ownership_mismatch(&self) -> bool {
        match fs::metadata(&self.config.data_file) {
            Ok(meta) => {
                meta.uid() != nix::unistd::Uid::effective().as_raw()
                    || meta.permissions().readonly()
            }
            Err(_) => false,
        }
    }

    /// Load all live entries.
    ///
    /// Malformed lines are skipped silently; entries whose directory no
    /// longer exists are filtered out here, so stale entries never
    /// participate in matching, decay accounting or listing. An absent
    /// file yields an empty set.
    pub fn load(&self) -> Vec<Entry> {
        let file = match File::open(&self.config.data_file) {
            Ok(f) => f,
            Err(_) => return Vec::new(),
        };
        let mut entries = Vec::new();
        for line in BufReader::new(file).lines() {
            let Ok(line) = line else { break };
            let Some(entry) = Entry::parse(&line) else {
                debug!("skipping malformed line: {}", line);
                continue;
            };
            if Path::new(&entry.directory).is_dir() {
                entries.push(entry);
            } else {
                debug!("dropping stale directory: {}", entry.directory);
            }
        }
        entries
    }

    /// Record one observation.
    ///
    /// Bumps the entry with the identical (directory, command) pair by
    /// 1.0 and stamps it with `now`, or appends a new entry at score
    /// 1.0. The rewrite carries only the filtered live view, so deleted
    /// directories are pruned from the file as a side effect.
    pub fn record(&self, command: &str, directory: &str, now: i64) -> Result<()> {
        let mut entries = self.load();
        match entries.iter_mut().find(|e| e.is_pair(directory, command)) {
            Some(entry) => {
                entry.score += 1.0;
                entry.last_access = now;
            }
            None => entries.push(Entry::new(directory, command, now)),
        }
        self.rewrite(entries)
    }

    /// Apply the decay and entry-count ceilings, then atomically replace
    /// the data file.
    fn rewrite(&self, mut entries: Vec<Entry>) -> Result<()> {
        let total: f64 = entries.iter().map(|e| e.score).sum();
        if total > self.config.max_total_score {
            debug!("score mass {:.2} over ceiling, decaying", total);
            for entry in entries.iter_mut() {
                entry.score *= DECAY_FACTOR;
            }
        }
        if entries.len() > self.config.max_entries {
            // Keep the most recent 75% by file order (insertion/update order).
            let keep = entries.len() * 3 / 4;
            let dropped = entries.len() - keep;
            debug!("entry count over ceiling, dropping {} oldest", dropped);
            entries.drain(..dropped);
        }
        write_entries(&self.config.data_file, &entries)
    }
}

/// Write the full entry set to a uniquely named temp file in the target's
/// directory, then rename it over `path`.
///
/// Readers see either the pre-write or post-write file in full, never a
/// partial one. On failure the temp file is removed and the original is
/// left untouched.
pub fn write_entries(path: &Path, entries: &[Entry]) -> Result<()> {
    let parent = path.parent().context("data file has no parent directory")?;
    fs::create_dir_all(parent)?;
    let mut tmp = NamedTempFile::new_in(parent)?;
    for entry in entries {
        writeln!(tmp, "{}", entry.to_line())?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
