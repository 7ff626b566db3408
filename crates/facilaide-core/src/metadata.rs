//! # Variable Metadata Catalog
//!
//! The calculation engine declares, for every variable, the entity it lives
//! on and the period granularity it is evaluated at. The catalog is the
//! authority for period-key formatting (`YYYY-MM` vs `YYYY`) and for entity
//! placement of benefit variables.
//!
//! ## Shape
//!
//! ```json
//! { "aah": { "entity": "individu", "periodicity": "month", "description": "..." } }
//! ```
//!
//! Entries with an unknown `entity` or `periodicity` string keep the field
//! absent rather than failing the load.
//!
//! ## Degraded Mode
//!
//! [`VariableCatalog::load_or_degraded`] never fails: on error it logs a
//! warning and returns an empty catalog. With an empty catalog every variable
//! is treated as monthly and benefit placement uses built-in defaults.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MetadataError;

/// Metadata table shipped with the workspace.
const BUNDLED_VARIABLES_META: &str = include_str!("../../../data/variables_meta.json");

/// Engine entity a variable is defined on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A person.
    Individu,
    /// The benefit family (parents and children).
    Famille,
    /// The dwelling household.
    Menage,
    /// The tax household.
    FoyerFiscal,
}

impl EntityKind {
    /// Wire name used in the metadata table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individu => "individu",
            Self::Famille => "famille",
            Self::Menage => "menage",
            Self::FoyerFiscal => "foyer_fiscal",
        }
    }

    /// Name of the payload collection holding entities of this kind.
    pub fn collection_key(&self) -> &'static str {
        match self {
            Self::Individu => "individus",
            Self::Famille => "familles",
            Self::Menage => "menages",
            Self::FoyerFiscal => "foyers_fiscaux",
        }
    }

    /// All entity kinds.
    pub fn all() -> &'static [EntityKind] {
        &[Self::Individu, Self::Famille, Self::Menage, Self::FoyerFiscal]
    }

    /// Parse a wire name.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.as_str() == code)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Period granularity of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Periodicity {
    /// Evaluated per calendar month (`YYYY-MM`).
    Month,
    /// Evaluated per calendar year (`YYYY`).
    Year,
    /// Constant over time.
    Eternity,
}

impl Periodicity {
    /// Wire name used in the metadata table.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Year => "year",
            Self::Eternity => "eternity",
        }
    }

    /// Parse a wire name.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            "eternity" => Some(Self::Eternity),
            _ => None,
        }
    }
}

impl fmt::Display for Periodicity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata for one engine variable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableMeta {
    /// Entity the variable is defined on, if known.
    pub entity: Option<EntityKind>,
    /// Period granularity, if known.
    pub periodicity: Option<Periodicity>,
    /// Human-readable label.
    pub description: Option<String>,
}

impl VariableMeta {
    fn from_value(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str);
        Self {
            entity: text("entity").and_then(EntityKind::from_code),
            periodicity: text("periodicity").and_then(Periodicity::from_code),
            description: text("description").map(str::to_string),
        }
    }
}

/// Read-only table of variable metadata, keyed by variable name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableCatalog {
    entries: BTreeMap<String, VariableMeta>,
}

impl VariableCatalog {
    /// An empty catalog (degraded mode).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The catalog compiled into the binary.
    pub fn bundled() -> Self {
        match Self::from_json_str(BUNDLED_VARIABLES_META) {
            Ok(catalog) => catalog,
            Err(e) => {
                tracing::warn!(error = %e, "bundled variable metadata is unusable, using simplified periodicity rules");
                Self::empty()
            }
        }
    }

    /// Parse a metadata document.
    pub fn from_json_str(text: &str) -> Result<Self, MetadataError> {
        let document: Value = serde_json::from_str(text)?;
        Self::from_value(&document)
    }

    /// Build from an already-parsed metadata document.
    pub fn from_value(document: &Value) -> Result<Self, MetadataError> {
        let map = match document {
            Value::Object(map) => map,
            Value::Array(_) => return Err(MetadataError::NotAnObject("an array")),
            Value::String(_) => return Err(MetadataError::NotAnObject("a string")),
            Value::Number(_) => return Err(MetadataError::NotAnObject("a number")),
            Value::Bool(_) => return Err(MetadataError::NotAnObject("a boolean")),
            Value::Null => return Err(MetadataError::NotAnObject("null")),
        };
        let entries = map
            .iter()
            .map(|(name, meta)| (name.clone(), VariableMeta::from_value(meta)))
            .collect();
        Ok(Self { entries })
    }

    /// Load a metadata file.
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let text = std::fs::read_to_string(path).map_err(|source| MetadataError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Load a metadata file, falling back to an empty catalog on failure.
    pub fn load_or_degraded(path: &Path) -> Self {
        match Self::load(path) {
            Ok(catalog) => {
                tracing::debug!(path = %path.display(), variables = catalog.len(), "loaded variable metadata");
                catalog
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "cannot load variable metadata, using simplified periodicity rules"
                );
                Self::empty()
            }
        }
    }

    /// Metadata for `name`, if declared.
    pub fn get(&self, name: &str) -> Option<&VariableMeta> {
        self.entries.get(name)
    }

    /// Declared periodicity of `name`.
    pub fn periodicity(&self, name: &str) -> Option<Periodicity> {
        self.get(name).and_then(|m| m.periodicity)
    }

    /// Declared entity of `name`.
    pub fn entity(&self, name: &str) -> Option<EntityKind> {
        self.get(name).and_then(|m| m.entity)
    }

    /// Declared description of `name`.
    pub fn description(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|m| m.description.as_deref())
    }

    /// Names of every variable declared monthly.
    pub fn monthly_variables(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, m)| m.periodicity == Some(Periodicity::Month))
            .map(|(name, _)| name.as_str())
    }

    /// Whether `name` is declared monthly.
    pub fn is_monthly(&self, name: &str) -> bool {
        self.periodicity(name) == Some(Periodicity::Month)
    }

    /// Number of declared variables.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True in degraded mode.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, meta)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VariableMeta)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}
