//! Canonical CSAPI resource URLs.
//!
//! Query link templates usually point below these collections; resource
//! clients use them directly for `list`/`get` requests.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::errors::{CsapiError, CsapiResult};

/// Top-level CSAPI resource collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceCollection {
    Systems,
    Deployments,
    Procedures,
    SamplingFeatures,
    Properties,
    Datastreams,
    Observations,
    ControlStreams,
    Commands,
    Feasibility,
    SystemEvents,
}

impl ResourceCollection {
    pub const ALL: [ResourceCollection; 11] = [
        ResourceCollection::Systems,
        ResourceCollection::Deployments,
        ResourceCollection::Procedures,
        ResourceCollection::SamplingFeatures,
        ResourceCollection::Properties,
        ResourceCollection::Datastreams,
        ResourceCollection::Observations,
        ResourceCollection::ControlStreams,
        ResourceCollection::Commands,
        ResourceCollection::Feasibility,
        ResourceCollection::SystemEvents,
    ];

    /// Path segment of the collection below the API root.
    pub fn path(&self) -> &'static str {
        match self {
            ResourceCollection::Systems => "systems",
            ResourceCollection::Deployments => "deployments",
            ResourceCollection::Procedures => "procedures",
            ResourceCollection::SamplingFeatures => "samplingFeatures",
            ResourceCollection::Properties => "properties",
            ResourceCollection::Datastreams => "datastreams",
            ResourceCollection::Observations => "observations",
            ResourceCollection::ControlStreams => "controlStreams",
            ResourceCollection::Commands => "commands",
            ResourceCollection::Feasibility => "feasibility",
            ResourceCollection::SystemEvents => "systemEvents",
        }
    }
}

impl fmt::Display for ResourceCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl FromStr for ResourceCollection {
    type Err = CsapiError;

    /// Parse a collection path segment (case-insensitive, optional leading `/`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().trim_start_matches('/');
        ResourceCollection::ALL
            .into_iter()
            .find(|r| r.path().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                CsapiError::malformed("resource", format!("unknown resource collection '{}'", s))
            })
    }
}

/// Append path segments to an API root, percent-encoding each segment.
fn join(api_root: &str, segments: &[&str]) -> CsapiResult<String> {
    let mut url = Url::parse(api_root).map_err(|e| {
        CsapiError::Configuration(format!("invalid API root '{}': {}", api_root, e))
    })?;

    url.path_segments_mut()
        .map_err(|_| {
            CsapiError::Configuration(format!(
                "API root '{}' cannot carry resource paths",
                api_root
            ))
        })?
        .pop_if_empty()
        .extend(segments);

    Ok(url.to_string())
}

/// `{api_root}/{collection}`
pub fn collection_url(api_root: &str, resource: ResourceCollection) -> CsapiResult<String> {
    join(api_root, &[resource.path()])
}

/// `{api_root}/{collection}/{id}`
pub fn item_url(api_root: &str, resource: ResourceCollection, id: &str) -> CsapiResult<String> {
    join(api_root, &[resource.path(), id])
}

/// `{api_root}/systems/{system_id}/events`
pub fn system_events_url(api_root: &str, system_id: &str) -> CsapiResult<String> {
    join(api_root, &["systems", system_id, "events"])
}

/// `{api_root}/systems/{system_id}/datastreams`
pub fn system_datastreams_url(api_root: &str, system_id: &str) -> CsapiResult<String> {
    join(api_root, &["systems", system_id, "datastreams"])
}

/// `{api_root}/datastreams/{datastream_id}/observations`
pub fn datastream_observations_url(api_root: &str, datastream_id: &str) -> CsapiResult<String> {
    join(api_root, &["datastreams", datastream_id, "observations"])
}
