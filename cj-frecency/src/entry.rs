/// One recorded (directory, command) observation with its accumulated
/// score and last-seen time.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub directory: String,
    pub command: String,
    pub score: f64,
    pub last_access: i64,
}

impl Entry {
    /// Create a first-observation entry with score 1.0
    pub fn new(directory: &str, command: &str, now: i64) -> Entry {
        Entry {
            directory: directory.to_string(),
            command: command.to_string(),
            score: 1.0,
            last_access: now,
        }
    }

    /// Parse one store line: `directory|command|score|timestamp`.
    ///
    /// Commands may themselves contain `|`, so the first field is the
    /// directory, the last two are score and timestamp, and everything
    /// between is rejoined as the command. Lines with fewer than four
    /// fields are malformed and yield `None`.
    pub fn parse(line: &str) -> Option<Entry> {
        let fields: Vec<&str> = line.split('|').collect();
        if fields.len() < 4 {
            return None;
        }
        let directory = fields[0];
        let score: f64 = fields[fields.len() - 2].trim().parse().ok()?;
        let last_access: i64 = fields[fields.len() - 1].trim().parse().ok()?;
        let command = fields[1..fields.len() - 2].join("|");
        if directory.is_empty() || command.is_empty() {
            return None;
        }
        Some(Entry {
            directory: directory.to_string(),
            command,
            score,
            last_access,
        })
    }

    /// Format as a store line, score printed to two decimals.
    pub fn to_line(&self) -> String {
        format!(
            "{}|{}|{:.2}|{}",
            self.directory, self.command, self.score, self.last_access
        )
    }

    /// True when this entry records the given (directory, command) pair.
    pub fn is_pair(&self, directory: &str, command: &str) -> bool {
        self.directory == directory && self.command == command
    }
}

/// Collapse newlines and runs of whitespace to single spaces and trim.
pub fn normalize_command(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
