use anyhow::Result;
use cj_frecency::Config;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI-level settings: the core configuration resolved from environment
/// variables, plus the persistent debug flag kept as an explicit state
/// file next to the data file.
pub struct Settings {
    pub config: Config,
    debug_flag: PathBuf,
    log_file: PathBuf,
}

impl Settings {
    /// Resolve settings, environment variables taking precedence over
    /// the defaults.
    pub fn from_env() -> Settings {
        let mut config = Config::default();
        if let Ok(path) = env::var("CJ_DATA_FILE") {
            if !path.is_empty() {
                config.data_file = PathBuf::from(path);
            }
        }
        if let Ok(val) = env::var("CJ_MAX_SCORE") {
            if let Ok(v) = val.parse() {
                config.max_total_score = v;
            }
        }
        if let Ok(val) = env::var("CJ_MAX_ENTRIES") {
            if let Ok(v) = val.parse() {
                config.max_entries = v;
            }
        }
        if let Ok(val) = env::var("CJ_EXCLUDE_DIRS") {
            config.excluded_dirs = split_list(&val);
        }
        if let Ok(val) = env::var("CJ_IGNORE_COMMANDS") {
            config.ignored_commands = split_list(&val);
        }
        Settings::with_config(config)
    }

    fn with_config(config: Config) -> Settings {
        let state_dir = config
            .data_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Settings {
            debug_flag: state_dir.join("debug"),
            log_file: state_dir.join("cj.log"),
            config,
        }
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug_flag.exists()
    }

    /// Persist or clear the debug flag state file.
    pub fn set_debug(&self, on: bool) -> Result<()> {
        if on {
            if let Some(parent) = self.debug_flag.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.debug_flag, b"")?;
        } else if self.debug_flag.exists() {
            fs::remove_file(&self.debug_flag)?;
        }
        Ok(())
    }

    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(':')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}
