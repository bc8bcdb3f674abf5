use std::path::PathBuf;

/// Runtime configuration, passed explicitly into every core call.
///
/// The calling layer resolves this once (environment variables, defaults)
/// and the core treats it as plain parameters.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the line-oriented data file.
    pub data_file: PathBuf,
    /// When the sum of all scores exceeds this, a 0.99 decay pass runs.
    pub max_total_score: f64,
    /// When the entry count exceeds this, only the most recent 75% are kept.
    pub max_entries: usize,
    /// Directory prefixes whose commands are never recorded.
    pub excluded_dirs: Vec<String>,
    /// Command names the user never wants recorded.
    pub ignored_commands: Vec<String>,
    /// The tool's own invocation name, used by the self-reference guards.
    pub tool_name: String,
}

impl Default for Config {
    fn default() -> Config {
        let data_file = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cj")
            .join("cj.dat");
        Config {
            data_file,
            max_total_score: 9000.0,
            max_entries: 1000,
            excluded_dirs: Vec::new(),
            ignored_commands: Vec::new(),
            tool_name: "cj".to_string(),
        }
    }
}
