//! Parameter metadata types for CSAPI collections.
//!
//! Collections list the observable properties they can return under
//! `parameter_names`. The query builder only checks that a name exists;
//! the descriptor content is informational.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A parameter (observable property) available in a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Parameter {
    /// Unique identifier for the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Parameter name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// The observed property.
    #[serde(
        rename = "observedProperty",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub observed_property: Option<ObservedProperty>,

    /// Unit of measurement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

impl Parameter {
    /// Create a new parameter whose observed property carries the same label.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        let id = id.into();
        let name = name.into();
        Self {
            observed_property: Some(ObservedProperty::new(&id, &name)),
            id: Some(id),
            name: Some(name),
            unit: None,
        }
    }

    /// Set the unit.
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = Some(unit);
        self
    }
}

/// Label with an identifier and an English text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PropertyLabel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
}

/// A label given either as plain text or as a structured label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Label {
    /// Plain string (assumes English).
    Simple(String),
    /// Structured label with optional identifier.
    Structured(PropertyLabel),
}

impl Label {
    /// Create a structured English label.
    pub fn english(id: Option<&str>, text: &str) -> Self {
        Label::Structured(PropertyLabel {
            id: id.map(str::to_string),
            en: Some(text.to_string()),
        })
    }

    /// The English text, if there is one.
    pub fn text(&self) -> Option<&str> {
        match self {
            Label::Simple(s) => Some(s),
            Label::Structured(label) => label.en.as_deref(),
        }
    }
}

/// The observed property being measured.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ObservedProperty {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
}

impl ObservedProperty {
    /// Create an observed property with an identified English label.
    pub fn new(id: &str, label: &str) -> Self {
        Self {
            label: Some(Label::english(Some(id), label)),
        }
    }
}

/// Unit of measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Unit {
    /// Human-readable label for the unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,

    /// Symbol and its vocabulary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<UnitSymbol>,
}

impl Unit {
    /// UCUM vocabulary URI.
    pub const UCUM: &'static str = "http://www.opengis.net/def/uom/UCUM/";

    /// Create a UCUM unit with label and symbol.
    pub fn ucum(label: impl Into<String>, symbol: impl Into<String>) -> Self {
        let label: String = label.into();
        Self {
            label: Some(Label::english(None, &label)),
            symbol: Some(UnitSymbol::Structured {
                value: symbol.into(),
                type_: Some(Self::UCUM.to_string()),
            }),
        }
    }

    pub fn celsius() -> Self {
        Self::ucum("Celsius", "Cel")
    }

    pub fn meters() -> Self {
        Self::ucum("Meters", "m")
    }

    pub fn feet() -> Self {
        Self::ucum("Feet", "[ft_i]")
    }

    pub fn percent() -> Self {
        Self::ucum("Percent", "%")
    }
}

/// Unit symbol, as a bare string or with the vocabulary it is drawn from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum UnitSymbol {
    /// Simple string symbol.
    Simple(String),
    /// Structured symbol with type and value.
    Structured {
        /// Symbol value.
        value: String,
        /// Symbol vocabulary (e.g., "http://www.opengis.net/def/uom/UCUM/").
        #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
        type_: Option<String>,
    },
}

impl UnitSymbol {
    /// Get the symbol string.
    pub fn value(&self) -> &str {
        match self {
            UnitSymbol::Simple(s) => s,
            UnitSymbol::Structured { value, .. } => value,
        }
    }
}

/// Deserialize a `parameter_names` block, keeping every declared name.
///
/// A descriptor that does not fit [`Parameter`] is kept as an empty
/// descriptor; only the name matters for query validation.
pub(crate) fn deserialize_parameter_block<'de, D>(
    deserializer: D,
) -> Result<BTreeMap<String, Parameter>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;

    Ok(raw
        .into_iter()
        .map(|(name, value)| {
            let parameter = serde_json::from_value(value).unwrap_or_else(|e| {
                tracing::warn!(
                    "Parameter '{}' has an unrecognized descriptor, keeping the name only: {}",
                    name,
                    e
                );
                Parameter::default()
            });
            (name, parameter)
        })
        .collect())
}

/// Project a `parameter_names` block onto its descriptors.
///
/// Order follows the map's key order. Nothing is filtered or validated.
pub fn extract_parameters(parameter_block: &BTreeMap<String, Parameter>) -> Vec<&Parameter> {
    parameter_block.values().collect()
}
