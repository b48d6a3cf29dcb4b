//! Symbol presentation options.
//!
//! Options are an insertion-ordered map of option name to scalar value. The
//! names follow the symbol renderer's vocabulary (`size`, `fill`,
//! `fillOpacity`, `direction`, `uniqueDesignation`, ...). Every option is
//! optional; renderers fall back to their own defaults for absent names,
//! except `size` which the instance provider fills in before rendering.

use std::convert::Infallible;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Size used when neither the caller nor the options set one.
pub const DEFAULT_SYMBOL_SIZE: f64 = 35.0;

/// Option name for the symbol size.
pub const SIZE: &str = "size";

/// Option name for the direction of movement, in degrees.
pub const DIRECTION: &str = "direction";

/// Option names understood by the symbol renderer.
///
/// Unknown names are still passed through; the provider only logs them.
pub const KNOWN_OPTIONS: &[&str] = &[
    "additionalInformation",
    "alternateMedal",
    "altitudeDepth",
    "auxiliaryEquipmentIndicator",
    "civilianColor",
    "colorMode",
    "combatEffectiveness",
    "commonIdentifier",
    "country",
    "direction",
    "dtg",
    "engagementBar",
    "engagementType",
    "equipmentTeardownTime",
    "evaluationRating",
    "fill",
    "fillColor",
    "fillOpacity",
    "fontfamily",
    "frame",
    "frameColor",
    "guardedUnit",
    "headquartersElement",
    "higherFormation",
    "hostile",
    "hqStaffLength",
    "icon",
    "iconColor",
    "iffSif",
    "infoBackground",
    "infoBackgroundFrame",
    "infoColor",
    "infoFields",
    "infoOutlineColor",
    "infoOutlineWidth",
    "infoSize",
    "installationComposition",
    "location",
    "monoColor",
    "outlineColor",
    "outlineWidth",
    "padding",
    "platformType",
    "quantity",
    "reinforcedReduced",
    "sidc",
    "sigint",
    "signatureEquipment",
    "simpleStatusModifier",
    "size",
    "specialDesignator",
    "specialHeadquarters",
    "speed",
    "speedLeader",
    "square",
    "staffComments",
    "standard",
    "strokeWidth",
    "type",
    "uniqueDesignation",
];

/// A scalar option value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl OptionValue {
    /// Numeric view of the value; numeric text such as `"90"` also converts.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Number(n) => Some(*n),
            OptionValue::Text(s) => s.trim().parse().ok(),
            OptionValue::Bool(_) => None,
        }
    }

    /// Boolean view of the value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Text view of the value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// JSON representation, used for cache key encoding.
    ///
    /// Non-finite numbers have no JSON form and encode as `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            OptionValue::Bool(b) => serde_json::Value::Bool(*b),
            OptionValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            OptionValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl std::fmt::Display for OptionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Number(n) => write!(f, "{}", n),
            OptionValue::Text(s) => f.write_str(s),
        }
    }
}

/// Parses a command-line literal: `true`/`false`, then numbers, then text.
impl FromStr for OptionValue {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "true" => OptionValue::Bool(true),
            "false" => OptionValue::Bool(false),
            _ => match s.parse::<f64>() {
                Ok(n) if n.is_finite() => OptionValue::Number(n),
                _ => OptionValue::Text(s.to_string()),
            },
        })
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Number(value)
    }
}

impl From<f32> for OptionValue {
    fn from(value: f32) -> Self {
        OptionValue::Number(value as f64)
    }
}

impl From<i32> for OptionValue {
    fn from(value: i32) -> Self {
        OptionValue::Number(value as f64)
    }
}

impl From<u32> for OptionValue {
    fn from(value: u32) -> Self {
        OptionValue::Number(value as f64)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Text(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Text(value)
    }
}

/// Presentation options for a symbol, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolOptions {
    entries: IndexMap<String, OptionValue>,
}

impl SymbolOptions {
    /// Create an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder-style size.
    pub fn with_size(self, size: f64) -> Self {
        self.with(SIZE, size)
    }

    /// Insert or replace an option, returning the previous value.
    ///
    /// Replacing keeps the option's original position.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        self.entries.insert(name.into(), value.into())
    }

    /// Remove an option, preserving the order of the rest.
    pub fn remove(&mut self, name: &str) -> Option<OptionValue> {
        self.entries.shift_remove(name)
    }

    /// Look up an option.
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.entries.get(name)
    }

    /// Whether an option is set.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of options set.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no options are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate options in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The `size` option, if numeric.
    pub fn size(&self) -> Option<f64> {
        self.get(SIZE).and_then(OptionValue::as_f64)
    }

    /// The `direction` option in degrees, if set and numeric.
    pub fn direction(&self) -> Option<f64> {
        self.get(DIRECTION).and_then(OptionValue::as_f64)
    }

    /// Lay these options over `defaults`.
    ///
    /// The result starts with the defaults in their order; every option set
    /// here overrides the default of the same name.
    pub fn merged_over(&self, defaults: &SymbolOptions) -> SymbolOptions {
        let mut merged = defaults.clone();
        for (name, value) in &self.entries {
            merged.entries.insert(name.clone(), value.clone());
        }
        merged
    }

    /// These options with `size` filled in when absent.
    pub fn with_default_size(&self, default_size: f64) -> SymbolOptions {
        if self.contains(SIZE) {
            return self.clone();
        }
        self.merged_over(&SymbolOptions::new().with_size(default_size))
    }

    /// Option names that the renderer does not document.
    pub fn unknown_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .keys()
            .map(String::as_str)
            .filter(|name| !KNOWN_OPTIONS.contains(name))
    }
}

impl<K, V> FromIterator<(K, V)> for SymbolOptions
where
    K: Into<String>,
    V: Into<OptionValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let options = SymbolOptions::new().with("fill", true).with("size", 35.0);
        let names: Vec<_> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["fill", "size"]);
    }

    #[test]
    fn test_merged_over_overrides_defaults() {
        let defaults = SymbolOptions::new().with_size(35.0).with("fill", true);
        let options = SymbolOptions::new().with("fill", false).with("dtg", "301200Z");

        let merged = options.merged_over(&defaults);
        assert_eq!(merged.size(), Some(35.0));
        assert_eq!(merged.get("fill"), Some(&OptionValue::Bool(false)));
        let names: Vec<_> = merged.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["size", "fill", "dtg"]);
    }

    #[test]
    fn test_with_default_size_only_when_missing() {
        let empty = SymbolOptions::new();
        assert_eq!(empty.with_default_size(35.0).size(), Some(35.0));

        let large = SymbolOptions::new().with("fill", true).with_size(100.0);
        let effective = large.with_default_size(35.0);
        assert_eq!(effective, large);
    }

    #[test]
    fn test_direction_accepts_numeric_text() {
        let options = SymbolOptions::new().with(DIRECTION, "90");
        assert_eq!(options.direction(), Some(90.0));

        let options = SymbolOptions::new().with(DIRECTION, 45.0);
        assert_eq!(options.direction(), Some(45.0));

        let options = SymbolOptions::new().with(DIRECTION, "north");
        assert_eq!(options.direction(), None);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut options: SymbolOptions =
            [("a", 1.0), ("b", 2.0), ("c", 3.0)].into_iter().collect();
        options.remove("b");
        let names: Vec<_> = options.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_unknown_names() {
        let options = SymbolOptions::new()
            .with("fill", true)
            .with("glitter", true)
            .with_size(35.0);
        let unknown: Vec<_> = options.unknown_names().collect();
        assert_eq!(unknown, vec!["glitter"]);
    }

    #[test]
    fn test_option_value_from_str() {
        assert_eq!("true".parse::<OptionValue>().unwrap(), OptionValue::Bool(true));
        assert_eq!("0.7".parse::<OptionValue>().unwrap(), OptionValue::Number(0.7));
        assert_eq!(
            "Dark".parse::<OptionValue>().unwrap(),
            OptionValue::Text("Dark".to_string())
        );
        assert_eq!(
            "NaN".parse::<OptionValue>().unwrap(),
            OptionValue::Text("NaN".to_string())
        );
    }

    #[test]
    fn test_option_value_json() {
        assert_eq!(OptionValue::Number(35.0).to_json(), serde_json::json!(35.0));
        assert_eq!(OptionValue::Number(f64::NAN).to_json(), serde_json::Value::Null);
        assert_eq!(OptionValue::from("x").to_json(), serde_json::json!("x"));
    }

    #[test]
    fn test_serde_roundtrip_keeps_order() {
        let options = SymbolOptions::new()
            .with("size", 35.0)
            .with("fill", true)
            .with("colorMode", "Dark");
        let json = serde_json::to_string(&options).unwrap();
        assert_eq!(json, r#"{"size":35.0,"fill":true,"colorMode":"Dark"}"#);
        let back: SymbolOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, options);
    }
}
