//! Career catalogue: descriptive metadata joined onto predictions by career name.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const NO_DESCRIPTION: &str = "No description available";
pub const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    career_name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    required_skills: Option<String>,
    #[serde(default)]
    industry_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerDetails {
    pub description: String,
    pub required_skills: Vec<String>,
    pub industry_type: String,
}

impl CareerDetails {
    fn placeholder() -> Self {
        Self {
            description: NO_DESCRIPTION.to_string(),
            required_skills: vec![],
            industry_type: NOT_SPECIFIED.to_string(),
        }
    }
}

/// Read-only lookup keyed by lower-cased career name. The first row for a name wins.
#[derive(Debug, Clone, Default)]
pub struct CareerCatalog {
    entries: HashMap<String, CareerDetails>,
}

impl CareerCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the catalogue CSV. A missing file yields an empty catalogue; unreadable or
    /// malformed content is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!(
                "Career dataset {} not found, descriptions will use placeholders",
                path.display()
            );
            return Ok(Self::empty());
        }

        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read career dataset {}", path.display()))?;
        let text = decode_text(bytes);
        let catalog = Self::from_reader(text.as_bytes())
            .with_context(|| format!("Failed to parse career dataset {}", path.display()))?;

        info!("Loaded {} careers from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut entries = HashMap::new();
        for record in csv.deserialize::<CatalogRecord>() {
            let record = record?;
            let key = record.career_name.to_lowercase();
            entries.entry(key).or_insert_with(|| CareerDetails {
                description: non_empty(record.description)
                    .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                required_skills: parse_required_skills(record.required_skills.as_deref()),
                industry_type: non_empty(record.industry_type)
                    .unwrap_or_else(|| NOT_SPECIFIED.to_string()),
            });
        }
        Ok(Self { entries })
    }

    /// Case-insensitive lookup; unknown careers get placeholder metadata.
    pub fn lookup(&self, career_name: &str) -> CareerDetails {
        self.entries
            .get(&career_name.to_lowercase())
            .cloned()
            .unwrap_or_else(CareerDetails::placeholder)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Parses a `required_skills` cell: a JSON array first, else a comma-separated list.
/// A JSON value that is not an array yields no skills.
pub fn parse_required_skills(raw: Option<&str>) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return vec![];
    };

    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Ok(_) => vec![],
        Err(_) => raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// UTF-8 when valid, otherwise Latin-1 (every byte maps to the same code point).
fn decode_text(bytes: Vec<u8>) -> String {
    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    };
    match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    }
}
