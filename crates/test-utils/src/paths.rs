//! Path utilities for locating test data files.
//!
//! This module provides functions to find test data files across multiple
//! potential locations, supporting both local development and CI environments.

use std::path::PathBuf;

/// Returns the workspace root directory.
///
/// This is determined by walking up from the current crate's manifest directory
/// until we find the workspace Cargo.toml.
pub fn workspace_root() -> PathBuf {
    // Start from the test-utils crate manifest dir
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Returns the path to the testdata directory for a specific crate.
///
/// # Arguments
///
/// * `crate_name` - The name of the crate (e.g., "csapi-protocol")
///
/// # Returns
///
/// The path to `crates/{crate_name}/testdata/`
pub fn crate_testdata_dir(crate_name: &str) -> PathBuf {
    workspace_root()
        .join("crates")
        .join(crate_name)
        .join("testdata")
}

/// Searches for a test file in multiple locations.
///
/// This function checks the following locations in order:
/// 1. Environment variable `TEST_DATA_DIR` (if set)
/// 2. `crates/csapi-protocol/testdata/`
/// 3. `testdata/` at the workspace root
///
/// # Arguments
///
/// * `name` - The filename to search for (e.g., "weather_stations.json")
///
/// # Returns
///
/// `Some(PathBuf)` if the file is found, `None` otherwise.
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    let mut candidates = Vec::new();

    // Check environment variable first
    if let Ok(test_data_dir) = std::env::var("TEST_DATA_DIR") {
        candidates.push(PathBuf::from(test_data_dir).join(name));
    }

    let root = workspace_root();
    candidates.extend([
        crate_testdata_dir("csapi-protocol").join(name),
        root.join("testdata").join(name), // workspace-level testdata
    ]);

    candidates.into_iter().find(|path| path.exists())
}

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_root_is_valid() {
        let root = workspace_root();
        // Should contain Cargo.toml at workspace level
        assert!(
            root.join("Cargo.toml").exists(),
            "Workspace root should contain Cargo.toml: {:?}",
            root
        );
    }

    #[test]
    fn test_find_collection_fixture() {
        let path = find_test_file("weather_stations.json");
        assert!(path.is_some(), "weather_stations.json should be in testdata");
    }

    #[test]
    fn test_find_missing_file() {
        assert!(find_test_file("does_not_exist.json").is_none());
    }

    #[test]
    fn test_temp_test_dir_cleanup() {
        let path = {
            let dir = temp_test_dir();
            let path = dir.path().to_path_buf();
            assert!(path.exists());
            path
        };
        assert!(!path.exists());
    }
}
