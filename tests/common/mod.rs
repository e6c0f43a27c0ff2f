//! Helpers for integration tests.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;
use tempfile::TempDir;

/// Temporary directory holding JSON fixtures; removed on drop.
pub struct Fixtures {
    dir: TempDir,
}

impl Fixtures {
    pub fn new() -> Self {
        Fixtures {
            dir: tempfile::tempdir().expect("Failed to create fixture directory."),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn write_json(&self, name: &str, value: &Value) -> PathBuf {
        let text = serde_json::to_string_pretty(value).expect("Failed to encode fixture.");
        self.write_raw(name, &text)
    }

    /// Writes `text` verbatim, creating intermediate directories.
    pub fn write_raw(&self, name: &str, text: &str) -> PathBuf {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture subdirectory.");
        }
        fs::write(&path, text).expect("Failed to write fixture.");
        path
    }

    pub fn read_json(&self, name: &str) -> Value {
        let text = fs::read_to_string(self.path(name)).expect("Failed to read output.");
        serde_json::from_str(&text).expect("Output is not valid JSON.")
    }
}
