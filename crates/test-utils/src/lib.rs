//! Shared test utilities for the csapi workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Collection description fixtures
//! - Test data path helpers
//! - Temporary fixture files
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{collections, write_fixture};
//! ```

pub mod fixtures;
pub mod paths;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use paths::*;

/// Macro to skip a test if the required file is not found.
///
/// # Usage
///
/// ```ignore
/// use test_utils::require_test_file;
///
/// #[test]
/// fn test_live_capture() {
///     let path = require_test_file!("live_collection.json");
///     // Test code using path...
/// }
/// ```
///
/// If the file is not found, the test will print a skip message and return early.
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!(
                    "SKIPPED: Test file '{}' not found. Add it to testdata or set TEST_DATA_DIR.",
                    $name
                );
                return;
            }
        }
    }};
}

/// Macro asserting that a URL carries a query parameter with the given decoded value.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_query_param;
///
/// assert_query_param!("https://x.org/q?crs=EPSG%3A4326", "crs", "EPSG:4326");
/// ```
#[macro_export]
macro_rules! assert_query_param {
    ($url:expr, $key:expr, $value:expr) => {{
        let url: &str = &$url;
        let found = $crate::query_param(url, $key);
        if found.as_deref() != Some($value) {
            panic!(
                concat!(
                    "assertion failed: query parameter `{}`\n",
                    "  url: `{}`,\n  expected: `{:?}`,\n  found: `{:?}`"
                ),
                $key, url, $value, found
            );
        }
    }};
}

/// Decode the first value of a query parameter from a URL string.
///
/// Decoding follows `application/x-www-form-urlencoded` rules (`+` is a space).
pub fn query_param(url: &str, key: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    let query = query.split('#').next().unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_param_decodes() {
        let url = "https://csapi.example.org/q?coords=POINT%281+2%29&crs=EPSG%3A4326";
        assert_eq!(query_param(url, "coords").as_deref(), Some("POINT(1 2)"));
        assert_eq!(query_param(url, "crs").as_deref(), Some("EPSG:4326"));
        assert_eq!(query_param(url, "f"), None);
    }

    #[test]
    fn test_query_param_without_query() {
        assert_eq!(query_param("https://csapi.example.org/q", "f"), None);
    }

    #[test]
    fn test_assert_query_param_passes() {
        assert_query_param!("https://x.org/q?f=json", "f", "json");
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_query_param_fails() {
        assert_query_param!("https://x.org/q?f=json", "f", "xml");
    }
}
