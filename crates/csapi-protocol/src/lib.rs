//! OGC API - Connected Systems (CSAPI) Protocol
//!
//! This crate provides the collection model and query URL construction for
//! clients of an OGC API - Connected Systems server.
//! It follows Part 1 (Feature Resources, OGC 23-001) and
//! Part 2 (Dynamic Data, OGC 23-002).
//!
//! # Query families
//!
//! A collection description advertises which query families it supports:
//! - Feature (static feature resources, Part 1)
//! - Dynamic (time/space-varying observation data, Part 2)
//! - Instances (datasets backing one collection)
//!
//! # Example
//!
//! ```rust
//! use csapi_protocol::{CollectionDescriptor, Link, QueryBuilder, QueryOptions, QueryType};
//!
//! let collection = CollectionDescriptor::new("weather-stations")
//!     .with_data_query(
//!         QueryType::Feature,
//!         Link::new("https://csapi.example.org/collections/weather-stations/feature", "data"),
//!     )
//!     .with_crs(vec!["EPSG:4326".to_string()]);
//!
//! let builder = QueryBuilder::new(&collection).unwrap();
//! let url = builder
//!     .build_feature_download_url(
//!         "POINT(1 2)",
//!         &QueryOptions::new().with_crs("EPSG:4326").with_format("json"),
//!     )
//!     .unwrap();
//! assert!(url.contains("crs=EPSG%3A4326"));
//! ```

pub mod builder;
pub mod collections;
pub mod crs;
pub mod errors;
pub mod parameters;
pub mod paths;
pub mod queries;
pub mod types;

// Re-export commonly used types
pub use builder::{QueryBuilder, QueryType};
pub use collections::{CollectionDescriptor, QueryDescription};
pub use crs::validate_crs;
pub use errors::{CsapiError, CsapiResult};
pub use parameters::{extract_parameters, Label, ObservedProperty, Parameter, Unit, UnitSymbol};
pub use paths::ResourceCollection;
pub use queries::{
    bbox_to_string, datetime_to_string, z_parameter_to_string, DateTimeParameter, QueryOptions,
    ZParameter,
};
pub use types::Link;

/// CSAPI conformance class URIs
pub mod conformance {
    /// Part 1 core conformance class
    pub const CORE: &str =
        "http://www.opengis.net/spec/ogcapi-connectedsystems-1/1.0/conf/api-common";
    /// System features conformance class
    pub const SYSTEM_FEATURES: &str =
        "http://www.opengis.net/spec/ogcapi-connectedsystems-1/1.0/conf/system";
    /// Deployment features conformance class
    pub const DEPLOYMENTS: &str =
        "http://www.opengis.net/spec/ogcapi-connectedsystems-1/1.0/conf/deployment";
    /// Procedure features conformance class
    pub const PROCEDURES: &str =
        "http://www.opengis.net/spec/ogcapi-connectedsystems-1/1.0/conf/procedure";
    /// Sampling features conformance class
    pub const SAMPLING_FEATURES: &str =
        "http://www.opengis.net/spec/ogcapi-connectedsystems-1/1.0/conf/sf";
    /// Property definitions conformance class
    pub const PROPERTY_DEFINITIONS: &str =
        "http://www.opengis.net/spec/ogcapi-connectedsystems-1/1.0/conf/property";
    /// GeoJSON encoding conformance class
    pub const GEOJSON: &str =
        "http://www.opengis.net/spec/ogcapi-connectedsystems-1/1.0/conf/geojson";
    /// SensorML JSON encoding conformance class
    pub const SENSORML_JSON: &str =
        "http://www.opengis.net/spec/ogcapi-connectedsystems-1/1.0/conf/sensorml";
    /// Part 2 datastreams and observations conformance class
    pub const DATASTREAMS: &str =
        "http://www.opengis.net/spec/ogcapi-connectedsystems-2/1.0/conf/datastream";
    /// Part 2 control streams and commands conformance class
    pub const CONTROL_STREAMS: &str =
        "http://www.opengis.net/spec/ogcapi-connectedsystems-2/1.0/conf/controlstream";
    /// Part 2 system events conformance class
    pub const SYSTEM_EVENTS: &str =
        "http://www.opengis.net/spec/ogcapi-connectedsystems-2/1.0/conf/system-event";
    /// Part 2 SWE Common JSON encoding conformance class
    pub const SWE_COMMON_JSON: &str =
        "http://www.opengis.net/spec/ogcapi-connectedsystems-2/1.0/conf/swecommon-json";
    /// Part 2 O&M JSON encoding conformance class
    pub const OM_JSON: &str =
        "http://www.opengis.net/spec/ogcapi-connectedsystems-2/1.0/conf/om-json";
}

/// Media types used in CSAPI responses
pub mod media_types {
    /// JSON media type
    pub const JSON: &str = "application/json";
    /// GeoJSON media type
    pub const GEO_JSON: &str = "application/geo+json";
    /// SensorML JSON media type
    pub const SML_JSON: &str = "application/sml+json";
    /// SWE Common JSON media type
    pub const SWE_JSON: &str = "application/swe+json";
    /// Observations & Measurements JSON media type
    pub const OM_JSON: &str = "application/om+json";
}
