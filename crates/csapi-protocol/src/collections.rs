//! CSAPI collection descriptions.
//!
//! A collection description is the metadata a server publishes for one
//! resource collection: which query families it answers, the parameter
//! names and CRS it accepts, and its links. It is the input from which a
//! [`QueryBuilder`](crate::builder::QueryBuilder) is made.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::builder::QueryType;
use crate::errors::{CsapiError, CsapiResult};
use crate::parameters::{deserialize_parameter_block, Parameter};
use crate::types::Link;

/// Metadata describing one CSAPI collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CollectionDescriptor {
    /// Collection identifier, used in error messages.
    #[serde(default)]
    pub id: String,

    /// Human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Detailed description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Query families keyed by tag (`feature`, `dynamic`, `instances`).
    ///
    /// A key marks its query family as supported even when its value is
    /// `null`. A collection without this map cannot be queried.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_queries: Option<BTreeMap<String, Option<QueryDescription>>>,

    /// Parameters available in this collection.
    ///
    /// Descriptors in an unrecognized shape are kept as empty descriptors.
    #[serde(default, deserialize_with = "deserialize_parameter_block")]
    pub parameter_names: BTreeMap<String, Parameter>,

    /// Coordinate reference systems supported.
    #[serde(default)]
    pub crs: Vec<String>,

    /// Links to related resources.
    #[serde(default)]
    pub links: Vec<Link>,
}

impl CollectionDescriptor {
    /// Create a new collection with no declared query families.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: None,
            description: None,
            data_queries: None,
            parameter_names: BTreeMap::new(),
            crs: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Parse an OGC collection description document.
    pub fn from_json(json: &str) -> CsapiResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            CsapiError::Configuration(format!("invalid collection description: {}", e))
        })
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare a query family with its link template.
    pub fn with_data_query(mut self, query_type: QueryType, link: Link) -> Self {
        self.data_queries.get_or_insert_with(BTreeMap::new).insert(
            query_type.as_str().to_string(),
            Some(QueryDescription {
                link: Some(link),
                variables: None,
            }),
        );
        self
    }

    /// Declare a query family without describing it.
    pub fn with_declared_query(mut self, query_type: QueryType) -> Self {
        self.data_queries
            .get_or_insert_with(BTreeMap::new)
            .insert(query_type.as_str().to_string(), None);
        self
    }

    /// Declare an empty query map (no query family supported).
    pub fn with_empty_data_queries(mut self) -> Self {
        self.data_queries = Some(BTreeMap::new());
        self
    }

    /// Add a parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, parameter: Parameter) -> Self {
        self.parameter_names.insert(name.into(), parameter);
        self
    }

    /// Set supported CRS.
    pub fn with_crs(mut self, crs: Vec<String>) -> Self {
        self.crs = crs;
        self
    }

    /// Add links.
    pub fn with_links(mut self, links: Vec<Link>) -> Self {
        self.links = links;
        self
    }

    /// Whether the query family is declared.
    pub fn declares(&self, query_type: QueryType) -> bool {
        self.data_queries
            .as_ref()
            .is_some_and(|q| q.contains_key(query_type.as_str()))
    }

    /// Description of a declared query family, if it carries one.
    pub fn query_description(&self, query_type: QueryType) -> Option<&QueryDescription> {
        self.data_queries
            .as_ref()
            .and_then(|q| q.get(query_type.as_str()))
            .and_then(Option::as_ref)
    }
}

/// Description of a query endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryDescription {
    /// Link template of the query endpoint.
    ///
    /// A description without a link still declares its query family.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,

    /// Query-specific settings advertised by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUOYS: &str = r#"{
        "id": "buoys",
        "title": "Ocean buoys",
        "data_queries": {
            "feature": {
                "link": {
                    "href": "https://csapi.example.org/collections/buoys/feature",
                    "rel": "data"
                }
            },
            "instances": null
        },
        "parameter_names": {
            "temperature": { "id": "temperature", "name": "Temperature" }
        },
        "crs": ["EPSG:4326"],
        "links": [{ "href": "https://csapi.example.org/collections/buoys", "rel": "self" }]
    }"#;

    #[test]
    fn test_collection_builder() {
        let collection = CollectionDescriptor::new("weather-stations")
            .with_title("Weather stations")
            .with_description("Surface stations");

        assert_eq!(collection.id, "weather-stations");
        assert_eq!(collection.title, Some("Weather stations".to_string()));
        assert!(collection.data_queries.is_none());
    }

    #[test]
    fn test_collection_deserialization() {
        let collection = CollectionDescriptor::from_json(BUOYS).unwrap();

        assert_eq!(collection.id, "buoys");
        assert_eq!(collection.crs, vec!["EPSG:4326".to_string()]);
        assert!(collection.parameter_names.contains_key("temperature"));
        assert_eq!(collection.links.len(), 1);
    }

    #[test]
    fn test_null_query_counts_as_declared() {
        let collection = CollectionDescriptor::from_json(BUOYS).unwrap();

        assert!(collection.declares(QueryType::Feature));
        assert!(collection.declares(QueryType::Instances));
        assert!(!collection.declares(QueryType::Dynamic));
        assert!(collection.query_description(QueryType::Instances).is_none());
        assert_eq!(
            collection
                .query_description(QueryType::Feature)
                .and_then(|d| d.link.as_ref())
                .map(|l| l.href.as_str()),
            Some("https://csapi.example.org/collections/buoys/feature")
        );
    }

    #[test]
    fn test_description_without_link_is_declared() {
        let json = r#"{
            "id": "partial",
            "data_queries": {
                "feature": { "variables": { "title": "Feature query" } },
                "dynamic": {
                    "link": { "href": "https://csapi.example.org/collections/partial/dynamic" }
                }
            }
        }"#;
        let collection = CollectionDescriptor::from_json(json).unwrap();

        assert!(collection.declares(QueryType::Feature));
        assert!(collection.declares(QueryType::Dynamic));
        let feature = collection.query_description(QueryType::Feature).unwrap();
        assert!(feature.link.is_none());
        assert!(feature.variables.is_some());
    }

    #[test]
    fn test_plain_string_parameter_labels() {
        let json = r#"{
            "id": "stations",
            "data_queries": {},
            "parameter_names": {
                "temperature": {
                    "observedProperty": { "label": "Air temperature" },
                    "unit": { "symbol": "Cel" }
                }
            }
        }"#;
        let collection = CollectionDescriptor::from_json(json).unwrap();
        assert!(collection.parameter_names.contains_key("temperature"));
    }

    #[test]
    fn test_missing_optional_blocks_default() {
        let collection = CollectionDescriptor::from_json(r#"{"id":"bare"}"#).unwrap();
        assert!(collection.data_queries.is_none());
        assert!(collection.parameter_names.is_empty());
        assert!(collection.crs.is_empty());
        assert!(collection.links.is_empty());
    }

    #[test]
    fn test_invalid_json_is_configuration_error() {
        let err = CollectionDescriptor::from_json("{ not json").unwrap_err();
        assert_eq!(err.kind(), "ConfigurationError");
    }

    #[test]
    fn test_data_query_builders() {
        let collection = CollectionDescriptor::new("c")
            .with_data_query(
                QueryType::Dynamic,
                Link::new("https://csapi.example.org/collections/c/dynamic", "data"),
            )
            .with_declared_query(QueryType::Instances);

        assert!(collection.declares(QueryType::Dynamic));
        assert!(collection.declares(QueryType::Instances));
        assert!(!collection.declares(QueryType::Feature));
    }

    #[test]
    fn test_serialization_skips_absent_queries() {
        let json = serde_json::to_string(&CollectionDescriptor::new("c")).unwrap();
        assert!(!json.contains("data_queries"));

        let json =
            serde_json::to_string(&CollectionDescriptor::new("c").with_empty_data_queries())
                .unwrap();
        assert!(json.contains("\"data_queries\":{}"));
    }
}
