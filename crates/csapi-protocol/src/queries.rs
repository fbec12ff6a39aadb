//! Query parameter types and their wire encodings.
//!
//! This module holds the structured forms of the optional query
//! parameters (vertical level, datetime, bounding box) and the functions
//! that turn them into query-string values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CsapiError, CsapiResult};

/// Vertical level selection (`z` query parameter).
///
/// No variant checks ordering or sign of its levels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ZParameter {
    /// A single level: `850`.
    Single { level: f64 },

    /// A level range: `100/550`.
    Interval {
        #[serde(rename = "minLevel")]
        min_level: f64,
        #[serde(rename = "maxLevel")]
        max_level: f64,
    },

    /// Explicit levels in request order: `10,80,200`.
    List { levels: Vec<f64> },

    /// Recurring levels: `R{repeat}/{minLevel}/{step}`.
    Repeating {
        repeat: u32,
        #[serde(rename = "minLevel")]
        min_level: f64,
        step: f64,
    },
}

impl ZParameter {
    pub fn single(level: f64) -> Self {
        ZParameter::Single { level }
    }

    pub fn interval(min_level: f64, max_level: f64) -> Self {
        ZParameter::Interval {
            min_level,
            max_level,
        }
    }

    pub fn list(levels: impl Into<Vec<f64>>) -> Self {
        ZParameter::List {
            levels: levels.into(),
        }
    }

    pub fn repeating(repeat: u32, min_level: f64, step: f64) -> Self {
        ZParameter::Repeating {
            repeat,
            min_level,
            step,
        }
    }
}

impl fmt::Display for ZParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ZParameter::Single { level } => write!(f, "{}", format_level(*level)),
            ZParameter::Interval {
                min_level,
                max_level,
            } => write!(
                f,
                "{}/{}",
                format_level(*min_level),
                format_level(*max_level)
            ),
            ZParameter::List { levels } => {
                let joined: Vec<String> = levels.iter().map(|l| format_level(*l)).collect();
                write!(f, "{}", joined.join(","))
            }
            ZParameter::Repeating {
                repeat,
                min_level,
                step,
            } => write!(
                f,
                "R{}/{}/{}",
                repeat,
                format_level(*min_level),
                format_level(*step)
            ),
        }
    }
}

/// Format a level the way servers expect numbers on the wire.
///
/// Plain decimal between `1e-6` and `1e21`, exponent form (`1e+21`, `1e-7`)
/// outside that range, `Infinity`/`-Infinity`/`NaN` for non-finite values.
/// Negative zero is written as `0`.
fn format_level(level: f64) -> String {
    if level.is_nan() {
        return "NaN".to_string();
    }
    if level.is_infinite() {
        return if level > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if level == 0.0 {
        return "0".to_string();
    }

    let magnitude = level.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return level.to_string();
    }

    let exponential = format!("{:e}", level);
    match exponential.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => exponential,
    }
}

impl FromStr for ZParameter {
    type Err = CsapiError;

    /// Parse the wire form of a vertical level selection.
    ///
    /// Accepts formats:
    /// - Single value: `850`
    /// - Multiple values: `10,80,200`
    /// - Range: `100/550`
    /// - Recurring: `R20/100/50` (R{repeat}/{minLevel}/{step})
    fn from_str(z: &str) -> Result<Self, Self::Err> {
        let z = z.trim();

        if z.is_empty() {
            return Err(CsapiError::malformed("z", "empty vertical level"));
        }

        if let Some(rest) = z.strip_prefix('R').or_else(|| z.strip_prefix('r')) {
            let parts: Vec<&str> = rest.split('/').collect();
            if parts.len() != 3 {
                return Err(CsapiError::malformed(
                    "z",
                    "expected R{repeat}/{minLevel}/{step}",
                ));
            }
            let repeat: u32 = parts[0].trim().parse().map_err(|_| {
                CsapiError::malformed("z", format!("invalid repeat count '{}'", parts[0]))
            })?;
            return Ok(ZParameter::repeating(
                repeat,
                parse_level(parts[1])?,
                parse_level(parts[2])?,
            ));
        }

        if z.contains('/') {
            let parts: Vec<&str> = z.split('/').collect();
            if parts.len() != 2 {
                return Err(CsapiError::malformed("z", "expected {minLevel}/{maxLevel}"));
            }
            return Ok(ZParameter::interval(
                parse_level(parts[0])?,
                parse_level(parts[1])?,
            ));
        }

        if z.contains(',') {
            let levels = z.split(',').map(parse_level).collect::<CsapiResult<Vec<f64>>>()?;
            return Ok(ZParameter::list(levels));
        }

        Ok(ZParameter::single(parse_level(z)?))
    }
}

fn parse_level(s: &str) -> CsapiResult<f64> {
    s.trim()
        .parse()
        .map_err(|_| CsapiError::malformed("z", format!("invalid level '{}'", s.trim())))
}

/// Encode a vertical level selection for the `z` query parameter.
pub fn z_parameter_to_string(z: &ZParameter) -> String {
    z.to_string()
}

/// Datetime selection (`datetime` query parameter).
///
/// A valid interval has a start, an end, or both. The empty interval
/// is representable so that callers assembling one field by field get an
/// error from the encoder rather than a silently unbounded query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum DateTimeParameter {
    /// A single instant.
    Instant(DateTime<Utc>),

    /// A half- or fully-bounded interval.
    Interval {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

impl DateTimeParameter {
    pub fn instant(at: DateTime<Utc>) -> Self {
        DateTimeParameter::Instant(at)
    }

    /// Interval open at the upper end: `{start}/..`.
    pub fn since(start: DateTime<Utc>) -> Self {
        DateTimeParameter::Interval {
            start: Some(start),
            end: None,
        }
    }

    /// Interval open at the lower end: `../{end}`.
    pub fn until(end: DateTime<Utc>) -> Self {
        DateTimeParameter::Interval {
            start: None,
            end: Some(end),
        }
    }

    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        DateTimeParameter::Interval {
            start: Some(start),
            end: Some(end),
        }
    }
}

impl From<DateTime<Utc>> for DateTimeParameter {
    fn from(at: DateTime<Utc>) -> Self {
        DateTimeParameter::Instant(at)
    }
}

impl FromStr for DateTimeParameter {
    type Err = CsapiError;

    /// Parse a datetime parameter.
    ///
    /// Accepts formats:
    /// - Instant: `2025-01-01T00:00:00Z`
    /// - Interval: `2025-01-01T00:00:00Z/2025-01-02T00:00:00Z`
    /// - Open start: `../2025-01-02T00:00:00Z`
    /// - Open end: `2025-01-01T00:00:00Z/..`
    fn from_str(datetime: &str) -> Result<Self, Self::Err> {
        let datetime = datetime.trim();

        if let Some((start, end)) = datetime.split_once('/') {
            if end.contains('/') {
                return Err(CsapiError::malformed(
                    "datetime",
                    "invalid interval, expected {start}/{end}",
                ));
            }

            let start = parse_bound(start)?;
            let end = parse_bound(end)?;
            if start.is_none() && end.is_none() {
                return Err(CsapiError::malformed(
                    "datetime",
                    "interval has neither start nor end",
                ));
            }

            return Ok(DateTimeParameter::Interval { start, end });
        }

        Ok(DateTimeParameter::Instant(parse_instant(datetime)?))
    }
}

fn parse_bound(s: &str) -> CsapiResult<Option<DateTime<Utc>>> {
    let s = s.trim();
    if s.is_empty() || s == ".." {
        return Ok(None);
    }
    parse_instant(s).map(Some)
}

fn parse_instant(s: &str) -> CsapiResult<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    // Without timezone, read as UTC
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt.and_utc());
    }

    if let Some(dt) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(dt.and_utc());
    }

    Err(CsapiError::malformed(
        "datetime",
        format!(
            "invalid datetime '{}', expected ISO 8601 (e.g., 2025-01-01T00:00:00Z)",
            s
        ),
    ))
}

fn format_instant(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Encode a datetime selection for the `datetime` query parameter.
///
/// Instants are written with millisecond precision and a `Z` suffix;
/// open interval ends are written as `..`.
pub fn datetime_to_string(datetime: &DateTimeParameter) -> CsapiResult<String> {
    match datetime {
        DateTimeParameter::Instant(at) => Ok(format_instant(at)),
        DateTimeParameter::Interval {
            start: Some(start),
            end: Some(end),
        } => Ok(format!("{}/{}", format_instant(start), format_instant(end))),
        DateTimeParameter::Interval {
            start: Some(start),
            end: None,
        } => Ok(format!("{}/..", format_instant(start))),
        DateTimeParameter::Interval {
            start: None,
            end: Some(end),
        } => Ok(format!("../{}", format_instant(end))),
        DateTimeParameter::Interval {
            start: None,
            end: None,
        } => Err(CsapiError::malformed(
            "datetime",
            "interval has neither start nor end",
        )),
    }
}

/// Encode a `[[minX, minY], [maxX, maxY]]` bounding box as `minX,minY,maxX,maxY`.
///
/// Values are neither reordered nor clamped.
pub fn bbox_to_string<P: AsRef<[f64]>>(bbox: &[P]) -> CsapiResult<String> {
    let [min, max] = bbox else {
        return Err(CsapiError::malformed(
            "bbox",
            "expected [[minX, minY], [maxX, maxY]]",
        ));
    };

    match (min.as_ref(), max.as_ref()) {
        ([min_x, min_y], [max_x, max_y]) => {
            Ok(format!("{},{},{},{}", min_x, min_y, max_x, max_y))
        }
        _ => Err(CsapiError::malformed(
            "bbox",
            "expected [[minX, minY], [maxX, maxY]]",
        )),
    }
}

/// Optional parameters of a feature or dynamic query.
///
/// Every recognized option is a field; unknown keys are rejected when the
/// options are deserialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QueryOptions {
    /// Requested parameter names, in request order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_name: Option<Vec<String>>,

    /// Requested vertical level(s).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<ZParameter>,

    /// Requested datetime or range.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<DateTimeParameter>,

    /// Coordinate reference system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<String>,

    /// Output format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub f: Option<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the requested parameter names.
    pub fn with_parameter_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameter_name = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Set the vertical level selection.
    pub fn with_z(mut self, z: ZParameter) -> Self {
        self.z = Some(z);
        self
    }

    /// Set the datetime selection.
    pub fn with_datetime(mut self, datetime: impl Into<DateTimeParameter>) -> Self {
        self.datetime = Some(datetime.into());
        self
    }

    /// Set the CRS.
    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = Some(crs.into());
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, f: impl Into<String>) -> Self {
        self.f = Some(f.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn jan_1() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    fn jan_2() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_z_single() {
        assert_eq!(z_parameter_to_string(&ZParameter::single(850.0)), "850");
    }

    #[test]
    fn test_z_single_fractional() {
        assert_eq!(z_parameter_to_string(&ZParameter::single(12.5)), "12.5");
    }

    #[test]
    fn test_z_interval() {
        assert_eq!(
            z_parameter_to_string(&ZParameter::interval(100.0, 550.0)),
            "100/550"
        );
    }

    #[test]
    fn test_z_interval_not_reordered() {
        assert_eq!(
            z_parameter_to_string(&ZParameter::interval(500.0, 100.0)),
            "500/100"
        );
    }

    #[test]
    fn test_z_list() {
        assert_eq!(
            z_parameter_to_string(&ZParameter::list(vec![10.0, 80.0, 200.0])),
            "10,80,200"
        );
    }

    #[test]
    fn test_z_extreme_levels() {
        assert_eq!(z_parameter_to_string(&ZParameter::single(1e21)), "1e+21");
        assert_eq!(z_parameter_to_string(&ZParameter::single(-1.5e22)), "-1.5e+22");
        assert_eq!(z_parameter_to_string(&ZParameter::single(1e20)), "100000000000000000000");
        assert_eq!(z_parameter_to_string(&ZParameter::single(1e-7)), "1e-7");
        assert_eq!(z_parameter_to_string(&ZParameter::single(0.000001)), "0.000001");
        assert_eq!(z_parameter_to_string(&ZParameter::single(-0.0)), "0");
        assert_eq!(
            z_parameter_to_string(&ZParameter::interval(f64::NEG_INFINITY, f64::INFINITY)),
            "-Infinity/Infinity"
        );
        assert_eq!(z_parameter_to_string(&ZParameter::list(vec![f64::NAN, 2.0])), "NaN,2");
    }

    #[test]
    fn test_z_list_single_element() {
        assert_eq!(z_parameter_to_string(&ZParameter::list(vec![42.0])), "42");
    }

    #[test]
    fn test_z_repeating() {
        assert_eq!(
            z_parameter_to_string(&ZParameter::repeating(20, 100.0, 50.0)),
            "R20/100/50"
        );
    }

    #[test]
    fn test_z_encoding_is_deterministic() {
        let z = ZParameter::list(vec![1000.0, 850.0]);
        assert_eq!(z.to_string(), z.to_string());
        assert_eq!(z_parameter_to_string(&z), z.to_string());
    }

    #[test]
    fn test_z_deserialization() {
        let z: ZParameter = serde_json::from_str(r#"{"type":"single","level":850}"#).unwrap();
        assert_eq!(z, ZParameter::single(850.0));

        let z: ZParameter =
            serde_json::from_str(r#"{"type":"interval","minLevel":100,"maxLevel":550}"#).unwrap();
        assert_eq!(z, ZParameter::interval(100.0, 550.0));

        let z: ZParameter =
            serde_json::from_str(r#"{"type":"repeating","repeat":20,"minLevel":100,"step":50}"#)
                .unwrap();
        assert_eq!(z, ZParameter::repeating(20, 100.0, 50.0));
    }

    #[test]
    fn test_z_deserialization_unknown_type() {
        assert!(serde_json::from_str::<ZParameter>(r#"{"type":"cube","level":1}"#).is_err());
    }

    #[test]
    fn test_parse_z_forms() {
        assert_eq!("850".parse::<ZParameter>().unwrap(), ZParameter::single(850.0));
        assert_eq!(
            "100/550".parse::<ZParameter>().unwrap(),
            ZParameter::interval(100.0, 550.0)
        );
        assert_eq!(
            "10, 80, 200".parse::<ZParameter>().unwrap(),
            ZParameter::list(vec![10.0, 80.0, 200.0])
        );
        assert_eq!(
            "R20/100/50".parse::<ZParameter>().unwrap(),
            ZParameter::repeating(20, 100.0, 50.0)
        );
    }

    #[test]
    fn test_parse_z_invalid() {
        assert!("".parse::<ZParameter>().is_err());
        assert!("abc".parse::<ZParameter>().is_err());
        assert!("1/2/3".parse::<ZParameter>().is_err());
        assert!("R20/100".parse::<ZParameter>().is_err());
        assert!("R-1/100/50".parse::<ZParameter>().is_err());

        let err = "10,x".parse::<ZParameter>().unwrap_err();
        assert_eq!(err.kind(), "MalformedParameterError");
    }

    #[test]
    fn test_datetime_instant() {
        assert_eq!(
            datetime_to_string(&DateTimeParameter::instant(jan_1())).unwrap(),
            "2025-01-01T00:00:00.000Z"
        );
    }

    #[test]
    fn test_datetime_open_end() {
        assert_eq!(
            datetime_to_string(&DateTimeParameter::since(jan_1())).unwrap(),
            "2025-01-01T00:00:00.000Z/.."
        );
    }

    #[test]
    fn test_datetime_open_start() {
        assert_eq!(
            datetime_to_string(&DateTimeParameter::until(jan_2())).unwrap(),
            "../2025-01-02T12:30:00.000Z"
        );
    }

    #[test]
    fn test_datetime_closed_interval() {
        assert_eq!(
            datetime_to_string(&DateTimeParameter::between(jan_1(), jan_2())).unwrap(),
            "2025-01-01T00:00:00.000Z/2025-01-02T12:30:00.000Z"
        );
    }

    #[test]
    fn test_datetime_empty_interval_is_malformed() {
        let empty = DateTimeParameter::Interval {
            start: None,
            end: None,
        };
        let err = datetime_to_string(&empty).unwrap_err();
        assert!(matches!(err, CsapiError::MalformedParameter { .. }));
    }

    #[test]
    fn test_datetime_keeps_milliseconds() {
        let at = Utc.timestamp_millis_opt(1_735_689_600_123).unwrap();
        assert_eq!(
            datetime_to_string(&DateTimeParameter::instant(at)).unwrap(),
            "2025-01-01T00:00:00.123Z"
        );
    }

    #[test]
    fn test_parse_datetime_forms() {
        assert_eq!(
            "2025-01-01T00:00:00Z".parse::<DateTimeParameter>().unwrap(),
            DateTimeParameter::instant(jan_1())
        );
        assert_eq!(
            "2025-01-01T00:00:00Z/..".parse::<DateTimeParameter>().unwrap(),
            DateTimeParameter::since(jan_1())
        );
        assert_eq!(
            "../2025-01-02T12:30:00Z".parse::<DateTimeParameter>().unwrap(),
            DateTimeParameter::until(jan_2())
        );
        assert_eq!(
            "2025-01-01/2025-01-02T12:30:00"
                .parse::<DateTimeParameter>()
                .unwrap(),
            DateTimeParameter::between(jan_1(), jan_2())
        );
    }

    #[test]
    fn test_parse_datetime_offset_normalized_to_utc() {
        let parsed: DateTimeParameter = "2025-01-01T02:00:00+02:00".parse().unwrap();
        assert_eq!(parsed, DateTimeParameter::instant(jan_1()));
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!("../..".parse::<DateTimeParameter>().is_err());
        assert!("/".parse::<DateTimeParameter>().is_err());
        assert!("yesterday".parse::<DateTimeParameter>().is_err());
        assert!("2025-01-01/2025-01-02/2025-01-03"
            .parse::<DateTimeParameter>()
            .is_err());
    }

    #[test]
    fn test_bbox_to_string() {
        assert_eq!(bbox_to_string(&[[0.0, 1.0], [2.0, 3.0]]).unwrap(), "0,1,2,3");
    }

    #[test]
    fn test_bbox_to_string_no_reordering() {
        assert_eq!(
            bbox_to_string(&[vec![10.5, -3.0], vec![-10.5, 3.0]]).unwrap(),
            "10.5,-3,-10.5,3"
        );
    }

    #[test]
    fn test_bbox_wrong_outer_length() {
        let err = bbox_to_string(&[[0.0, 1.0]]).unwrap_err();
        assert_eq!(err.kind(), "MalformedParameterError");
        assert!(err.to_string().contains("bbox"));

        assert!(bbox_to_string(&[[0.0, 1.0], [2.0, 3.0], [4.0, 5.0]]).is_err());
        assert!(bbox_to_string::<Vec<f64>>(&[]).is_err());
    }

    #[test]
    fn test_bbox_wrong_inner_length() {
        assert!(bbox_to_string(&[vec![0.0, 1.0, 2.0], vec![2.0, 3.0]]).is_err());
        assert!(bbox_to_string(&[vec![0.0, 1.0], vec![2.0]]).is_err());
    }

    #[test]
    fn test_query_options_builder() {
        let options = QueryOptions::new()
            .with_parameter_names(["temperature", "humidity"])
            .with_z(ZParameter::single(1000.0))
            .with_datetime(jan_1())
            .with_crs("EPSG:4326")
            .with_format("json");

        assert_eq!(
            options.parameter_name,
            Some(vec!["temperature".to_string(), "humidity".to_string()])
        );
        assert_eq!(options.z, Some(ZParameter::single(1000.0)));
        assert_eq!(options.datetime, Some(DateTimeParameter::instant(jan_1())));
        assert_eq!(options.crs.as_deref(), Some("EPSG:4326"));
        assert_eq!(options.f.as_deref(), Some("json"));
    }

    #[test]
    fn test_query_options_reject_unknown_fields() {
        let result =
            serde_json::from_str::<QueryOptions>(r#"{"crs":"EPSG:4326","locationId":"LOC123"}"#);
        assert!(result.is_err());

        let options: QueryOptions =
            serde_json::from_str(r#"{"parameter_name":["salinity"],"f":"csv"}"#).unwrap();
        assert_eq!(options.parameter_name, Some(vec!["salinity".to_string()]));
        assert_eq!(options.f.as_deref(), Some("csv"));
    }
}
