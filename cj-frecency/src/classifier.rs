use crate::config::Config;
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Commands that pollute the index without adding navigational value.
static TRIVIAL_COMMANDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| HashSet::from(["cd", "ls", "pwd", "clear", "exit"]));

/// Destructive or privilege-escalating commands, never recorded because
/// a matched command may later be auto-executed.
static DANGEROUS_COMMANDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    HashSet::from([
        "rm", "rmdir", "shred", "mv", "chmod", "chown", "chgrp", "sudo", "su", "doas", "kill",
        "killall", "pkill", "shutdown", "reboot", "poweroff", "halt", "init", "dd", "mkfs",
        "mkswap", "format", "mount", "umount", "fsck", "fdisk", "parted",
    ])
});

/// Strip a leading path so `/bin/rm` is judged as `rm`.
pub(crate) fn command_name(token: &str) -> &str {
    Path::new(token)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(token)
}

/// Decide whether a (command, directory) pair may be recorded.
///
/// The command is expected to be normalized already. The same predicate
/// runs no matter which shell hook triggered the record.
pub fn eligible(command: &str, directory: &str, config: &Config) -> bool {
    if command.is_empty() || directory.is_empty() {
        return false;
    }
    if !directory.starts_with('/') {
        debug!("rejecting relative directory: {}", directory);
        return false;
    }
    let first = command.split(' ').next().unwrap_or("");
    let name = command_name(first);
    if TRIVIAL_COMMANDS.contains(name) || name == config.tool_name {
        return false;
    }
    if DANGEROUS_COMMANDS.contains(name) {
        debug!("rejecting dangerous command: {}", command);
        return false;
    }
    if config
        .ignored_commands
        .iter()
        .any(|c| c.as_str() == name || c.as_str() == first)
    {
        return false;
    }
    if config
        .excluded_dirs
        .iter()
        .any(|d| !d.is_empty() && directory.starts_with(d.as_str()))
    {
        debug!("rejecting excluded directory: {}", directory);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_dangerous_commands() {
        let config = Config::default();
        assert!(!eligible("sudo rm -rf /", "/home/x", &config));
        assert!(!eligible("rm -rf target", "/home/x", &config));
        assert!(!eligible("/bin/rm file", "/home/x", &config));
        assert!(!eligible("shutdown -h now", "/home/x", &config));
        assert!(!eligible("mount /dev/sda1 /mnt", "/home/x", &config));
    }

    #[test]
    fn test_rejects_trivial_commands() {
        let config = Config::default();
        assert!(!eligible("cd ..", "/home/x", &config));
        assert!(!eligible("ls -la", "/home/x", &config));
        assert!(!eligible("pwd", "/home/x", &config));
        assert!(!eligible("cj git status", "/home/x", &config));
    }

    #[test]
    fn test_rejects_empty_and_relative() {
        let config = Config::default();
        assert!(!eligible("", "/home/x", &config));
        assert!(!eligible("git status", "", &config));
        assert!(!eligible("git status", "home/x", &config));
    }

    #[test]
    fn test_rejects_user_ignore_list() {
        let mut config = Config::default();
        config.ignored_commands.push("vim".to_string());
        assert!(!eligible("vim src/main.rs", "/home/x", &config));
        assert!(eligible("nvim src/main.rs", "/home/x", &config));
    }

    #[test]
    fn test_rejects_excluded_directories() {
        let mut config = Config::default();
        config.excluded_dirs.push("/tmp".to_string());
        assert!(!eligible("git status", "/tmp/scratch", &config));
        assert!(eligible("git status", "/home/x", &config));
    }

    #[test]
    fn test_accepts_ordinary_commands() {
        let config = Config::default();
        assert!(eligible("git status", "/home/x", &config));
        assert!(eligible("cargo build --release", "/home/x", &config));
        assert!(eligible("npm run build", "/home/x", &config));
    }
}
