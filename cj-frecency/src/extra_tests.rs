#[cfg(test)]
mod tests {
    use crate::{add, list, query, reinforce, Action, Config, EntryStore, QueryOptions, SortMethod};
    use std::fs;
    use std::path::{Path, PathBuf};

    const NOW: i64 = 1_700_000_000;

    struct Fixture {
        _tmp: tempfile::TempDir,
        config: Config,
        root: PathBuf,
    }

    fn fixture() -> Fixture {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config {
            data_file: tmp.path().join("cj.dat"),
            ..Config::default()
        };
        let root = tmp.path().to_path_buf();
        Fixture {
            _tmp: tmp,
            config,
            root,
        }
    }

    impl Fixture {
        fn dir(&self, name: &str) -> String {
            let path = self.root.join(name);
            if !path.exists() {
                fs::create_dir(&path).unwrap();
            }
            path.to_str().unwrap().to_string()
        }

        fn seed(&self, dir: &str, command: &str, score: f64, last_access: i64) {
            let directory = self.dir(dir);
            let mut entries = EntryStore::new(&self.config).load();
            let mut entry = crate::Entry::new(&directory, command, last_access);
            entry.score = score;
            entries.push(entry);
            crate::store::write_entries(&self.config.data_file, &entries).unwrap();
        }
    }

    fn opts() -> QueryOptions {
        QueryOptions {
            sort: SortMethod::Frecent,
            action: Action::JumpAndExecute,
            path_filter: None,
        }
    }

    fn q(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_add_then_query_roundtrip() {
        let fx = fixture();
        let proj = fx.dir("proj");
        assert!(add("git status", &proj, &fx.config, NOW).unwrap());

        let result = query(&q(&["git"]), &opts(), &fx.config, NOW)
            .unwrap()
            .unwrap();
        assert_eq!(result.directory, proj);
        assert_eq!(result.command, "git status");
    }

    #[test]
    fn test_add_normalizes_before_storing() {
        let fx = fixture();
        let proj = fx.dir("proj");
        assert!(add("git   status\n", &proj, &fx.config, NOW).unwrap());
        assert!(add("git status", &proj, &fx.config, NOW + 1).unwrap());

        let entries = EntryStore::new(&fx.config).load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].score, 2.0);
    }

    #[test]
    fn test_classifier_rejection_leaves_store_unchanged() {
        let fx = fixture();
        let home = fx.dir("home");
        assert!(!add("sudo rm -rf /", &home, &fx.config, NOW).unwrap());
        assert!(!fx.config.data_file.exists());
        assert!(EntryStore::new(&fx.config).load().is_empty());
    }

    #[test]
    fn test_higher_score_wins_at_equal_recency() {
        let fx = fixture();
        fx.seed("p1", "git status", 20.0, NOW);
        fx.seed("p2", "git status", 5.0, NOW);

        let result = query(&q(&["git"]), &opts(), &fx.config, NOW)
            .unwrap()
            .unwrap();
        assert_eq!(result.directory, fx.dir("p1"));
    }

    #[test]
    fn test_recent_wins_at_equal_score_in_frecency_mode() {
        let fx = fixture();
        fx.seed("p1", "npm install", 3.0, NOW - 180 * 24 * 3600);
        fx.seed("p2", "npm run build", 3.0, NOW);

        let result = query(&q(&["npm"]), &opts(), &fx.config, NOW)
            .unwrap()
            .unwrap();
        assert_eq!(result.directory, fx.dir("p2"));
    }

    #[test]
    fn test_rank_mode_ignores_recency() {
        let fx = fixture();
        fx.seed("old", "make", 9.0, NOW - 365 * 24 * 3600);
        fx.seed("new", "make", 2.0, NOW);

        let mut o = opts();
        o.sort = SortMethod::Frequent;
        let result = query(&q(&["make"]), &o, &fx.config, NOW).unwrap().unwrap();
        assert_eq!(result.directory, fx.dir("old"));
    }

    #[test]
    fn test_recency_mode_ignores_score() {
        let fx = fixture();
        fx.seed("old", "make", 9.0, NOW - 3600);
        fx.seed("new", "make", 1.0, NOW);

        let mut o = opts();
        o.sort = SortMethod::Recent;
        let result = query(&q(&["make"]), &o, &fx.config, NOW).unwrap().unwrap();
        assert_eq!(result.directory, fx.dir("new"));
    }

    #[test]
    fn test_empty_query_picks_most_frecent_place() {
        let fx = fixture();
        fx.seed("busy", "cargo build", 30.0, NOW);
        fx.seed("idle", "cargo test", 2.0, NOW);

        let result = query(&[], &opts(), &fx.config, NOW).unwrap().unwrap();
        assert_eq!(result.directory, fx.dir("busy"));
    }

    #[test]
    fn test_no_match_returns_none() {
        let fx = fixture();
        fx.seed("p", "git status", 5.0, NOW);
        assert!(query(&q(&["docker"]), &opts(), &fx.config, NOW)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_absent_store_is_no_match() {
        let fx = fixture();
        assert!(query(&q(&["git"]), &opts(), &fx.config, NOW)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_stale_directory_never_matched() {
        let fx = fixture();
        let gone = fx.dir("gone");
        fx.seed("gone", "git status", 50.0, NOW);
        fx.seed("alive", "git status", 1.0, NOW);
        fs::remove_dir(Path::new(&gone)).unwrap();

        let result = query(&q(&["git"]), &opts(), &fx.config, NOW)
            .unwrap()
            .unwrap();
        assert_eq!(result.directory, fx.dir("alive"));
    }

    #[test]
    fn test_explicit_path_filter_overrides_heuristic() {
        let fx = fixture();
        fx.seed("backend", "cargo build", 2.0, NOW);
        fx.seed("frontend", "cargo build", 9.0, NOW);

        let mut o = opts();
        o.path_filter = Some("backend".to_string());
        let result = query(&q(&["cargo", "build"]), &o, &fx.config, NOW)
            .unwrap()
            .unwrap();
        assert_eq!(result.directory, fx.dir("backend"));
    }

    #[test]
    fn test_separator_keyword_filters_path() {
        let fx = fixture();
        fx.seed("api", "git push", 2.0, NOW);
        fx.seed("web", "git push", 9.0, NOW);

        let result = query(&q(&["git", "push", "in", "api"]), &opts(), &fx.config, NOW)
            .unwrap()
            .unwrap();
        assert_eq!(result.directory, fx.dir("api"));
    }

    #[test]
    fn test_list_returns_one_candidate_per_directory() {
        let fx = fixture();
        fx.seed("a", "git status", 5.0, NOW);
        fx.seed("a", "git diff", 2.0, NOW);
        fx.seed("b", "git log", 1.0, NOW);

        let mut o = opts();
        o.action = Action::List;
        let candidates = list(&q(&["git"]), &o, &fx.config, NOW).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].entry.directory, fx.dir("a"));
        assert_eq!(candidates[0].entry.command, "git status");
    }

    #[test]
    fn test_reinforce_bumps_score() {
        let fx = fixture();
        let proj = fx.dir("proj");
        add("git status", &proj, &fx.config, NOW).unwrap();

        let result = query(&q(&["git"]), &opts(), &fx.config, NOW)
            .unwrap()
            .unwrap();
        reinforce(&result, &fx.config, NOW + 5).unwrap();

        let entries = EntryStore::new(&fx.config).load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].score, 2.0);
        assert_eq!(entries[0].last_access, NOW + 5);
    }

    #[test]
    fn test_self_invocations_skipped_in_execute_mode() {
        let fx = fixture();
        fx.seed("a", "cj npm", 50.0, NOW);
        fx.seed("b", "npm install", 1.0, NOW);

        let result = query(&q(&["npm"]), &opts(), &fx.config, NOW)
            .unwrap()
            .unwrap();
        assert_eq!(result.command, "npm install");

        // Print mode has no execution, so the guard does not apply.
        let mut o = opts();
        o.action = Action::Print;
        let result = query(&q(&["npm"]), &o, &fx.config, NOW).unwrap().unwrap();
        assert_eq!(result.command, "cj npm");
    }
}
