//! Coordinate Reference System negotiation.

use crate::errors::{CsapiError, CsapiResult};

/// OGC CRS84 (WGS84 lon/lat)
pub const CRS84: &str = "http://www.opengis.net/def/crs/OGC/1.3/CRS84";

/// EPSG:4326 (WGS84 lat/lon)
pub const EPSG_4326: &str = "EPSG:4326";

/// EPSG:3857 (Web Mercator)
pub const EPSG_3857: &str = "EPSG:3857";

/// Check a CRS code against the codes a collection declares.
///
/// Returns the code unchanged when it is declared. Matching is exact:
/// `epsg:4326` is not `EPSG:4326`.
pub fn validate_crs<'a, S: AsRef<str>>(crs: &'a str, supported: &[S]) -> CsapiResult<&'a str> {
    if supported.iter().any(|s| s.as_ref() == crs) {
        return Ok(crs);
    }

    Err(CsapiError::UnsupportedCrs {
        crs: crs.to_string(),
        collection: None,
        supported: supported.iter().map(|s| s.as_ref().to_string()).collect(),
    })
}
