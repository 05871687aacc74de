use std::path::{Path, PathBuf};

/// All well-known files under the store root.
#[derive(Debug, Clone)]
pub struct DevlogPaths {
    pub root: PathBuf,
    pub activity_log: PathBuf,
    pub usage_json: PathBuf,
    pub usage_csv: PathBuf,
    pub config_json: PathBuf,
    pub lock_file: PathBuf,
}

impl DevlogPaths {
    /// Derive all paths from a store root. Pure computation, no I/O.
    pub fn discover(store_root: impl Into<PathBuf>) -> Self {
        let root = store_root.into();
        Self {
            activity_log: root.join("activity.log"),
            usage_json: root.join("ai-usage-data.json"),
            usage_csv: root.join("ai-usage-log.csv"),
            config_json: root.join("config.json"),
            lock_file: root.join("LOCK"),
            root,
        }
    }

    /// Create the store root. Idempotent.
    pub fn ensure_layout(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Destination of a dated export: `<root>/<prefix>-<date>.<ext>`.
    pub fn export_file(&self, prefix: &str, date: &str, ext: &str) -> PathBuf {
        self.root.join(format!("{prefix}-{date}.{ext}"))
    }

    /// Whether `path` lives inside the store root.
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discover_builds_correct_paths() {
        let p = DevlogPaths::discover("/tmp/store");
        assert_eq!(p.activity_log, PathBuf::from("/tmp/store/activity.log"));
        assert_eq!(p.usage_json, PathBuf::from("/tmp/store/ai-usage-data.json"));
        assert_eq!(p.usage_csv, PathBuf::from("/tmp/store/ai-usage-log.csv"));
        assert_eq!(p.config_json, PathBuf::from("/tmp/store/config.json"));
        assert_eq!(p.lock_file, PathBuf::from("/tmp/store/LOCK"));
    }

    #[test]
    fn export_file_uses_prefix_date_ext() {
        let p = DevlogPaths::discover("/tmp/store");
        assert_eq!(
            p.export_file("logs-export", "2026-10-19", "md"),
            PathBuf::from("/tmp/store/logs-export-2026-10-19.md")
        );
    }

    #[test]
    fn ensure_layout_creates_root() {
        let tmp = tempfile::tempdir().unwrap();
        let p = DevlogPaths::discover(tmp.path().join("a").join("b"));
        p.ensure_layout().unwrap();
        assert!(p.root.is_dir());
        assert!(p.contains(&p.activity_log));
        assert!(!p.contains(Path::new("/elsewhere/activity.log")));
    }
}
