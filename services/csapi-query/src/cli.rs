//! Command-line arguments and command execution.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use csapi_protocol::{
    paths, DateTimeParameter, QueryBuilder, QueryOptions, ResourceCollection, ZParameter,
};

use crate::config::load_collection;

/// CSAPI query URL builder
#[derive(Parser, Debug)]
#[command(name = "csapi-query")]
#[command(about = "Build OGC API - Connected Systems query URLs from a collection description")]
pub struct Cli {
    /// Collection description file (JSON or YAML)
    #[arg(short, long, env = "CSAPI_COLLECTION", global = true)]
    pub collection: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn", env = "RUST_LOG", global = true)]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a feature query URL
    Feature(QueryArgs),

    /// Build a dynamic data query URL
    Dynamic(QueryArgs),

    /// Print the instances link of the collection
    Instances,

    /// List the query types the collection supports
    Supported,

    /// Build a canonical resource URL below an API root
    Path {
        /// Resource collection (systems, datastreams, samplingFeatures, ...)
        resource: ResourceCollection,

        /// Resource identifier
        id: Option<String>,

        /// Nested collection of the resource (events, datastreams, observations)
        nested: Option<String>,

        /// API root URL
        #[arg(long, env = "CSAPI_API_ROOT")]
        api_root: String,
    },
}

/// Geometry and optional parameters of a feature or dynamic query.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// WKT geometry, e.g. "POINT(1 2)"
    pub coords: String,

    /// Parameter names, comma separated
    #[arg(short, long = "parameter-name", value_delimiter = ',')]
    pub parameter_name: Vec<String>,

    /// Vertical levels: 850, 100/550, 10,80,200 or R20/100/50
    #[arg(short, long, allow_hyphen_values = true)]
    pub z: Option<ZParameter>,

    /// Datetime or interval: 2025-01-01T00:00:00Z, start/.., ../end, start/end
    #[arg(short, long)]
    pub datetime: Option<DateTimeParameter>,

    /// Coordinate reference system
    #[arg(long)]
    pub crs: Option<String>,

    /// Output format
    #[arg(short, long)]
    pub f: Option<String>,
}

impl QueryArgs {
    /// Query options carried by these arguments.
    pub fn to_options(&self) -> QueryOptions {
        let mut options = QueryOptions::new();
        if !self.parameter_name.is_empty() {
            options = options.with_parameter_names(self.parameter_name.iter().cloned());
        }
        options.z = self.z.clone();
        options.datetime = self.datetime.clone();
        options.crs = self.crs.clone();
        options.f = self.f.clone();
        options
    }
}

impl Command {
    /// Run the command and return the text to print.
    pub fn run(&self, collection: Option<&Path>) -> Result<String> {
        match self {
            Command::Feature(args) => {
                let builder = builder_for(collection)?;
                Ok(builder.build_feature_download_url(&args.coords, &args.to_options())?)
            }
            Command::Dynamic(args) => {
                let builder = builder_for(collection)?;
                Ok(builder.build_dynamic_download_url(&args.coords, &args.to_options())?)
            }
            Command::Instances => Ok(builder_for(collection)?.build_instances_download_url()?),
            Command::Supported => {
                let builder = builder_for(collection)?;
                let names: Vec<&str> = builder
                    .supported_queries()
                    .into_iter()
                    .map(|q| q.as_str())
                    .collect();
                Ok(names.join("\n"))
            }
            Command::Path {
                resource,
                id,
                nested,
                api_root,
            } => resource_url(api_root, *resource, id.as_deref(), nested.as_deref()),
        }
    }
}

fn builder_for(collection: Option<&Path>) -> Result<QueryBuilder> {
    let path = collection
        .context("No collection description given; use --collection or CSAPI_COLLECTION")?;
    let collection = load_collection(path)?;
    QueryBuilder::new(&collection)
        .with_context(|| format!("Cannot build queries for collection {:?}", path))
}

fn resource_url(
    api_root: &str,
    resource: ResourceCollection,
    id: Option<&str>,
    nested: Option<&str>,
) -> Result<String> {
    let url = match (resource, id, nested) {
        (_, None, _) => paths::collection_url(api_root, resource)?,
        (_, Some(id), None) => paths::item_url(api_root, resource, id)?,
        (ResourceCollection::Systems, Some(id), Some("events")) => {
            paths::system_events_url(api_root, id)?
        }
        (ResourceCollection::Systems, Some(id), Some("datastreams")) => {
            paths::system_datastreams_url(api_root, id)?
        }
        (ResourceCollection::Datastreams, Some(id), Some("observations")) => {
            paths::datastream_observations_url(api_root, id)?
        }
        (_, Some(_), Some(other)) => {
            bail!("{} resources have no nested '{}' collection", resource, other)
        }
    };
    Ok(url)
}
