use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::hacklab::hub::error::HubError;

/// Stable identifier of a category, as referenced by [`Tool::category_ids`].
pub type CategoryId = String;

/// A labelled grouping applied to zero or more tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ja: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub en: String,
    /// Alternative Japanese names accepted by the manifest generator.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub aliases_ja: Vec<String>,
    /// Alternative English names accepted by the manifest generator.
    #[serde(default, deserialize_with = "null_as_default", skip_serializing_if = "Vec::is_empty")]
    pub aliases_en: Vec<String>,
}

impl Category {
    /// Creates a category with the given localized labels and no aliases.
    pub fn new(id: impl Into<CategoryId>, ja: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ja: ja.into(),
            en: en.into(),
            aliases_ja: Vec::new(),
            aliases_en: Vec::new(),
        }
    }
}

/// A catalogued learning tool. Immutable once loaded.
///
/// Every field is optional on the wire: text defaults to the empty string,
/// lists to empty, `difficulty` to 1 and `hub` to `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// Key under which progress is persisted.
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtitle_ja: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub subtitle_en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_ja: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description_en: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_ja: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_en: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category_ids: Vec<CategoryId>,
    #[serde(default = "default_difficulty", deserialize_with = "lenient_difficulty")]
    pub difficulty: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub repo_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub demo_url: String,
    /// Tools flagged `false` are hidden from the catalog and the dashboard.
    #[serde(default = "default_hub", deserialize_with = "lenient_hub")]
    pub hub: bool,
}

impl Tool {
    /// Creates a visible tool with the given identifiers and every other field defaulted.
    pub fn new(id: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            title: String::new(),
            subtitle_ja: String::new(),
            subtitle_en: String::new(),
            description_ja: String::new(),
            description_en: String::new(),
            category_ja: Vec::new(),
            category_en: Vec::new(),
            category_ids: Vec::new(),
            difficulty: default_difficulty(),
            tags: Vec::new(),
            repo_url: String::new(),
            demo_url: String::new(),
            hub: default_hub(),
        }
    }

    /// Returns true when the tool belongs in the catalog view.
    pub fn is_visible(&self) -> bool {
        self.hub
    }

    /// Returns true when the tool lists the given category.
    pub fn has_category(&self, category_id: &str) -> bool {
        self.category_ids.iter().any(|id| id == category_id)
    }
}

/// The `tools.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub generated_at: String,
    #[serde(default, deserialize_with = "tools_or_empty")]
    pub tools: Vec<Tool>,
}

/// Self-reported mastery of a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ProgressLevel {
    #[default]
    NotStarted = 0,
    InProgress = 1,
    FirstPass = 2,
    Mastered = 3,
}

impl ProgressLevel {
    /// All levels in bucket order.
    pub const ALL: [ProgressLevel; 4] = [
        ProgressLevel::NotStarted,
        ProgressLevel::InProgress,
        ProgressLevel::FirstPass,
        ProgressLevel::Mastered,
    ];

    /// Numeric value in `0..=3`, also used as the bucket index.
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Converts a number into a level, rejecting anything outside `0..=3`.
    pub fn from_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(ProgressLevel::NotStarted),
            1 => Some(ProgressLevel::InProgress),
            2 => Some(ProgressLevel::FirstPass),
            3 => Some(ProgressLevel::Mastered),
            _ => None,
        }
    }

    /// Normalises a persisted value. Missing, malformed, fractional or
    /// out-of-range values all read back as [`ProgressLevel::NotStarted`].
    pub fn from_stored(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return ProgressLevel::NotStarted;
        }
        match trimmed.parse::<f64>() {
            Ok(number) if number.fract() == 0.0 && (0.0..=3.0).contains(&number) => {
                Self::from_value(number as u8).unwrap_or_default()
            }
            _ => ProgressLevel::NotStarted,
        }
    }

    /// Level reached by one click on the progress button: 0→1→2→3→0.
    pub fn next(self) -> Self {
        Self::from_value((self.value() + 1) % 4).unwrap_or_default()
    }
}

impl fmt::Display for ProgressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl FromStr for ProgressLevel {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u8>()
            .ok()
            .and_then(Self::from_value)
            .ok_or_else(|| HubError::InvalidProgressLevel(s.to_string()))
    }
}

fn default_difficulty() -> u32 {
    1
}

fn default_hub() -> bool {
    true
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_difficulty<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let difficulty = match &value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| {
                number
                    .as_f64()
                    .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= f64::from(u32::MAX))
                    .map(|n| n as u64)
            })
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(text) => text.trim().parse::<u32>().ok(),
        _ => None,
    };
    Ok(difficulty
        .filter(|level| *level > 0)
        .unwrap_or_else(default_difficulty))
}

fn lenient_hub<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    // Only an explicit `false` hides a tool.
    let value = Value::deserialize(deserializer)?;
    Ok(!matches!(value, Value::Bool(false)))
}

fn tools_or_empty<'de, D>(deserializer: D) -> Result<Vec<Tool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
            .collect(),
        _ => Ok(Vec::new()),
    }
}
