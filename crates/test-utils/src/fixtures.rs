//! Common test fixtures for csapi tests.
//!
//! This module provides pre-defined collection descriptions and request
//! values that represent common CSAPI client scenarios.

use std::path::{Path, PathBuf};

/// Collection description documents as served by a CSAPI server.
pub mod collections {
    /// Feature, dynamic and instances queries; `temperature` and `humidity`
    /// parameters; `EPSG:4326` and CRS84.
    pub const WEATHER_STATIONS: &str =
        include_str!("../../csapi-protocol/testdata/weather_stations.json");

    /// Dynamic queries only, with a link template that carries its own query string.
    pub const DYNAMIC_ONLY: &str = include_str!("../../csapi-protocol/testdata/dynamic_only.json");

    /// No `data_queries` block at all.
    pub const NO_DATA_QUERIES: &str =
        include_str!("../../csapi-protocol/testdata/no_data_queries.json");

    /// Same as `DYNAMIC_ONLY`, in YAML.
    pub const DYNAMIC_ONLY_YAML: &str = r#"id: buoy-datastreams
title: Buoy datastreams
data_queries:
  dynamic:
    link:
      href: "https://csapi.example.org/collections/buoy-datastreams/dynamic?apikey=demo"
      rel: data
parameter_names:
  salinity:
    id: salinity
    name: Salinity
  sea_temperature:
    id: sea_temperature
    name: Sea temperature
crs:
  - "EPSG:4326"
links: []
"#;
}

/// Common request values.
pub mod requests {
    /// API root used by every fixture.
    pub const API_ROOT: &str = "https://csapi.example.org";

    /// A WKT point.
    pub const POINT: &str = "POINT(1 2)";

    /// A closed WKT polygon.
    pub const POLYGON: &str = "POLYGON((0 0,10 0,10 10,0 10,0 0))";

    /// Start of the fixture observation window.
    pub const WINDOW_START: &str = "2025-01-01T00:00:00Z";

    /// End of the fixture observation window.
    pub const WINDOW_END: &str = "2025-01-02T00:00:00Z";
}

/// Writes a fixture file into `dir` and returns its path.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents)
        .unwrap_or_else(|e| panic!("Failed to write fixture {:?}: {}", path, e));
    path
}
