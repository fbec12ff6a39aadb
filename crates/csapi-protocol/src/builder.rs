//! Query URL construction for CSAPI collections.
//!
//! A [`QueryBuilder`] is made once per collection description. It captures
//! what the collection declares (query families, parameter names, CRS) and
//! turns a WKT geometry plus [`QueryOptions`] into a validated query URL.
//!
//! The builder takes its own copies of the description's parameter names,
//! CRS list, links and link templates. Later changes to the description
//! do not affect an existing builder.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::collections::CollectionDescriptor;
use crate::crs::validate_crs;
use crate::errors::{CsapiError, CsapiResult};
use crate::parameters::Parameter;
use crate::queries::{datetime_to_string, z_parameter_to_string, QueryOptions};
use crate::types::Link;

/// Query families a collection can declare under `data_queries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// Static feature resources (Part 1).
    Feature,
    /// Time/space-varying observation data (Part 2).
    Dynamic,
    /// Dataset instances backing the collection.
    Instances,
}

impl QueryType {
    pub const ALL: [QueryType; 3] = [QueryType::Feature, QueryType::Dynamic, QueryType::Instances];

    /// The `data_queries` key of this query family.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Feature => "feature",
            QueryType::Dynamic => "dynamic",
            QueryType::Instances => "instances",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = CsapiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "feature" => Ok(QueryType::Feature),
            "dynamic" => Ok(QueryType::Dynamic),
            "instances" => Ok(QueryType::Instances),
            _ => Err(CsapiError::malformed(
                "query type",
                format!(
                    "unknown query type '{}'. Supported: feature, dynamic, instances",
                    s
                ),
            )),
        }
    }
}

/// Builds validated query URLs for one collection.
///
/// Build calls do not mutate the builder; a builder can be shared across
/// threads and reused for any number of queries.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    collection_id: String,
    /// Declared query families and their link templates (`None` if declared without a link).
    templates: BTreeMap<QueryType, Option<Link>>,
    supported_parameters: BTreeMap<String, Parameter>,
    supported_crs: Vec<String>,
    links: Vec<Link>,
}

impl QueryBuilder {
    /// Create a builder from a collection description.
    ///
    /// Fails with a configuration error if the description has no
    /// `data_queries` map. An empty map is accepted; every build call on
    /// such a builder then fails as unsupported.
    pub fn new(collection: &CollectionDescriptor) -> CsapiResult<Self> {
        let collection_id = if collection.id.is_empty() {
            "unknown".to_string()
        } else {
            collection.id.clone()
        };

        let data_queries = collection.data_queries.as_ref().ok_or_else(|| {
            CsapiError::Configuration(format!(
                "Collection '{}' has no data queries; cannot issue CSAPI queries.",
                collection_id
            ))
        })?;

        let templates: BTreeMap<QueryType, Option<Link>> = QueryType::ALL
            .iter()
            .filter_map(|query_type| {
                data_queries
                    .get(query_type.as_str())
                    .map(|desc| (*query_type, desc.as_ref().and_then(|d| d.link.clone())))
            })
            .collect();

        tracing::debug!(
            "Query builder for collection '{}' supports {:?}",
            collection_id,
            templates.keys().collect::<Vec<_>>()
        );

        Ok(Self {
            collection_id,
            templates,
            supported_parameters: collection.parameter_names.clone(),
            supported_crs: collection.crs.clone(),
            links: collection.links.clone(),
        })
    }

    /// Identifier of the collection this builder was made from.
    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    /// The query families this collection supports.
    pub fn supported_queries(&self) -> BTreeSet<QueryType> {
        self.templates.keys().copied().collect()
    }

    /// Whether the collection supports a query family.
    pub fn supports(&self, query_type: QueryType) -> bool {
        self.templates.contains_key(&query_type)
    }

    /// Parameters declared by the collection.
    pub fn supported_parameters(&self) -> &BTreeMap<String, Parameter> {
        &self.supported_parameters
    }

    /// CRS codes declared by the collection.
    pub fn supported_crs(&self) -> &[String] {
        &self.supported_crs
    }

    /// Links of the collection, unchanged.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Build a feature query URL (CSAPI Part 1).
    pub fn build_feature_download_url(
        &self,
        coords: &str,
        options: &QueryOptions,
    ) -> CsapiResult<String> {
        self.build_query_url(QueryType::Feature, coords, options)
    }

    /// Build a dynamic data query URL (CSAPI Part 2).
    pub fn build_dynamic_download_url(
        &self,
        coords: &str,
        options: &QueryOptions,
    ) -> CsapiResult<String> {
        self.build_query_url(QueryType::Dynamic, coords, options)
    }

    /// Return the instances link of the collection, unchanged.
    pub fn build_instances_download_url(&self) -> CsapiResult<String> {
        self.ensure_supported(QueryType::Instances)?;
        Ok(self.template(QueryType::Instances)?.href.clone())
    }

    /// Assemble a query URL.
    ///
    /// Checks run in a fixed order and stop at the first failure: query
    /// family support, link template, `datetime`, `parameter-name`, `crs`.
    /// `coords` and `f` are passed through without validation.
    /// Query pairs already on the link template are kept (re-encoded) unless
    /// a parameter set here has the same name.
    fn build_query_url(
        &self,
        query_type: QueryType,
        coords: &str,
        options: &QueryOptions,
    ) -> CsapiResult<String> {
        self.ensure_supported(query_type)?;

        let template = self.template(query_type)?;
        let mut url = Url::parse(&template.href).map_err(|e| {
            CsapiError::Configuration(format!(
                "Collection '{}' has an invalid {} query link '{}': {}",
                self.collection_id, query_type, template.href, e
            ))
        })?;

        let mut params: Vec<(&'static str, String)> = vec![("coords", coords.to_string())];

        if let Some(z) = &options.z {
            params.push(("z", z_parameter_to_string(z)));
        }

        if let Some(datetime) = &options.datetime {
            params.push(("datetime", datetime_to_string(datetime)?));
        }

        if let Some(names) = &options.parameter_name {
            if let Some(unknown) = names
                .iter()
                .find(|name| !self.supported_parameters.contains_key(name.as_str()))
            {
                return Err(CsapiError::UnknownParameter {
                    collection: self.collection_id.clone(),
                    parameter: unknown.clone(),
                });
            }
            params.push(("parameter-name", names.join(",")));
        }

        if let Some(crs) = &options.crs {
            validate_crs(crs, &self.supported_crs)
                .map_err(|e| e.for_collection(&self.collection_id))?;
            params.push(("crs", crs.clone()));
        }

        if let Some(f) = &options.f {
            params.push(("f", f.clone()));
        }

        set_query_params(&mut url, &params);

        tracing::debug!(
            "Built {} query URL for collection '{}': {}",
            query_type,
            self.collection_id,
            url
        );

        Ok(url.to_string())
    }

    fn ensure_supported(&self, query_type: QueryType) -> CsapiResult<()> {
        if self.supports(query_type) {
            return Ok(());
        }
        Err(CsapiError::UnsupportedQueryType {
            collection: self.collection_id.clone(),
            query_type: query_type.as_str().to_string(),
        })
    }

    fn template(&self, query_type: QueryType) -> CsapiResult<&Link> {
        self.templates
            .get(&query_type)
            .and_then(Option::as_ref)
            .ok_or_else(|| {
                tracing::warn!(
                    "Collection '{}' declares {} queries without a link",
                    self.collection_id,
                    query_type
                );
                CsapiError::Configuration(format!(
                    "Collection '{}' declares {} queries but provides no link.",
                    self.collection_id, query_type
                ))
            })
    }
}

impl TryFrom<&CollectionDescriptor> for QueryBuilder {
    type Error = CsapiError;

    fn try_from(collection: &CollectionDescriptor) -> Result<Self, Self::Error> {
        QueryBuilder::new(collection)
    }
}

/// Set query parameters on a URL, replacing template values of the same name.
///
/// The template's own pairs are decoded and written back form-urlencoded,
/// so their meaning is kept but not their bytes: `?flag&q=a%20b` becomes
/// `?flag=&q=a+b`.
fn set_query_params(url: &mut Url, params: &[(&'static str, String)]) {
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !params.iter().any(|(name, _)| *name == &**key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut pairs = url.query_pairs_mut();
    pairs.clear();
    pairs.extend_pairs(kept.iter());
    pairs.extend_pairs(params.iter());
}
