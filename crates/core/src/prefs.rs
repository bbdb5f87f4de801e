//! Local preference persistence for privacy snapshots.
//!
//! The host's key-value store is consumed through [`PreferenceStore`]; this
//! module maps a [`PrivacyStatus`] onto five independent `data.`-prefixed
//! keys holding 0/1 integers. There is no atomicity across keys — each field
//! is stored and loaded on its own, last save wins.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{PrivacyError, Result};
use crate::models::PrivacyStatus;

pub const PREF_ANALYTICS_ENABLED: &str = "data.analyticsEnabled";
pub const PREF_DEVICE_STATS_ENABLED: &str = "data.deviceStatsEnabled";
pub const PREF_LIMIT_USER_TRACKING: &str = "data.limitUserTracking";
pub const PREF_PERFORMANCE_REPORTING_ENABLED: &str = "data.performanceReportingEnabled";
pub const PREF_OPT_OUT: &str = "data.optOut";

/// Integer key-value storage surviving process restarts.
///
/// Matches the host-store contract: reads fall back to a caller-supplied
/// default, writes cannot fail from the caller's point of view.
pub trait PreferenceStore {
    fn get_int(&self, key: &str, default: i64) -> i64;
    fn set_int(&mut self, key: &str, value: i64);
}

/// Loads the cached privacy snapshot, with permissive defaults for keys that
/// were never written: analytics, device stats and performance reporting
/// enabled, tracking not limited, not opted out.
pub fn load_status(store: &dyn PreferenceStore) -> PrivacyStatus {
    PrivacyStatus {
        analytics_enabled: store.get_int(PREF_ANALYTICS_ENABLED, 1) == 1,
        device_stats_enabled: store.get_int(PREF_DEVICE_STATS_ENABLED, 1) == 1,
        limit_user_tracking: store.get_int(PREF_LIMIT_USER_TRACKING, 0) == 1,
        performance_reporting_enabled: store.get_int(PREF_PERFORMANCE_REPORTING_ENABLED, 1) == 1,
        opt_out: store.get_int(PREF_OPT_OUT, 0) == 1,
    }
}

/// Persists a privacy snapshot field by field.
pub fn save_status(store: &mut dyn PreferenceStore, status: &PrivacyStatus) {
    store.set_int(PREF_ANALYTICS_ENABLED, i64::from(status.analytics_enabled));
    store.set_int(
        PREF_DEVICE_STATS_ENABLED,
        i64::from(status.device_stats_enabled),
    );
    store.set_int(
        PREF_LIMIT_USER_TRACKING,
        i64::from(status.limit_user_tracking),
    );
    store.set_int(
        PREF_PERFORMANCE_REPORTING_ENABLED,
        i64::from(status.performance_reporting_enabled),
    );
    store.set_int(PREF_OPT_OUT, i64::from(status.opt_out));
}

/// In-memory store for tests and hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefs {
    values: HashMap<String, i64>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no key has ever been written.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl PreferenceStore for MemoryPrefs {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
    }
}

/// Write-through store backed by a JSON file.
///
/// Every `set_int` rewrites the file so the snapshot survives an abrupt
/// process exit. A failed write is logged and swallowed — gating must keep
/// working from the in-memory copy even on a read-only filesystem.
#[derive(Debug)]
pub struct JsonFilePrefs {
    path: PathBuf,
    values: HashMap<String, i64>,
}

impl JsonFilePrefs {
    /// Opens the store at `path`, creating an empty one if the file does not
    /// exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                PrivacyError::Prefs(format!("malformed preference file {}: {e}", path.display()))
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) {
        let serialized = match serde_json::to_string_pretty(&self.values) {
            Ok(s) => s,
            Err(err) => {
                warn!(error = %err, "failed to serialize preference file");
                return;
            }
        };
        if let Err(err) = fs::write(&self.path, serialized) {
            warn!(path = %self.path.display(), error = %err, "failed to persist preferences");
        }
    }
}

impl PreferenceStore for JsonFilePrefs {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.values.get(key).copied().unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.values.insert(key.to_string(), value);
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_store_yields_documented_defaults() {
        let prefs = MemoryPrefs::new();
        let status = load_status(&prefs);

        assert!(status.analytics_enabled);
        assert!(status.device_stats_enabled);
        assert!(!status.limit_user_tracking);
        assert!(status.performance_reporting_enabled);
        assert!(!status.opt_out);
    }

    #[test]
    fn save_then_load_round_trips() {
        let status = PrivacyStatus {
            opt_out: true,
            analytics_enabled: false,
            device_stats_enabled: true,
            limit_user_tracking: true,
            performance_reporting_enabled: false,
        };

        let mut prefs = MemoryPrefs::new();
        save_status(&mut prefs, &status);
        assert_eq!(load_status(&prefs), status);
    }

    #[test]
    fn fields_are_stored_independently() {
        let mut prefs = MemoryPrefs::new();
        prefs.set_int(PREF_OPT_OUT, 1);

        let status = load_status(&prefs);
        assert!(status.opt_out);
        // Untouched keys still read their defaults.
        assert!(status.analytics_enabled);
        assert!(!status.limit_user_tracking);
    }

    #[test]
    fn last_save_wins() {
        let mut prefs = MemoryPrefs::new();
        save_status(&mut prefs, &PrivacyStatus::default());

        let newer = PrivacyStatus {
            analytics_enabled: true,
            ..PrivacyStatus::default()
        };
        save_status(&mut prefs, &newer);
        assert_eq!(load_status(&prefs), newer);
    }

    #[test]
    fn file_prefs_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("privacy.json");

        let status = PrivacyStatus {
            opt_out: true,
            analytics_enabled: false,
            device_stats_enabled: false,
            limit_user_tracking: true,
            performance_reporting_enabled: true,
        };

        {
            let mut prefs = JsonFilePrefs::open(&path).expect("open");
            save_status(&mut prefs, &status);
        }

        let reopened = JsonFilePrefs::open(&path).expect("reopen");
        assert_eq!(load_status(&reopened), status);
    }

    #[test]
    fn file_prefs_open_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let prefs = JsonFilePrefs::open(dir.path().join("absent.json")).expect("open");
        assert_eq!(load_status(&prefs), load_status(&MemoryPrefs::new()));
    }

    #[test]
    fn file_prefs_rejects_malformed_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "not json").expect("write");

        let err = JsonFilePrefs::open(&path).expect_err("should fail");
        assert!(err.to_string().contains("preference store error"));
    }
}
