//! # Payload Schema Validation
//!
//! The calculation engine publishes its input contract as an OpenAPI
//! document. [`PayloadSchema`] extracts the component schemas, applies null
//! augmentation, and compiles the root component (Draft 2020-12) once.
//! The compiled validator is then reused for every payload.
//!
//! ## Schema Resolution
//!
//! Component `$ref`s of the form `#/components/schemas/<Name>` resolve
//! against a synthetic root document:
//!
//! ```json
//! { "$ref": "#/components/schemas/SituationInput", "components": { "schemas": { ... } } }
//! ```
//!
//! Any other URI resolves to a permissive empty schema; validation never
//! touches the network.
//!
//! ## Error Reporting
//!
//! Validation collects every violation (instance path, schema path,
//! message) and fails once with all of them.

use std::fmt;
use std::path::Path;

use jsonschema::{Retrieve, Uri, ValidationOptions, Validator};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::nullable::allow_null_in_additional_properties;

/// OpenAPI document shipped with the workspace.
const BUNDLED_OPENAPI: &str = include_str!("../../../data/situation_input.openapi.json");

/// Component validated by default.
pub const DEFAULT_COMPONENT: &str = "SituationInput";

/// Retriever that keeps every `$ref` resolution offline.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        _uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        // Only component refs are expected, and those are internal to the
        // root document. Anything else validates permissively.
        Ok(json!({}))
    }
}

/// Error during schema loading or payload validation.
#[derive(Error, Debug)]
pub enum SchemaValidationError {
    /// The payload did not conform to the schema.
    #[error("validation failed against schema '{schema_name}':\n{violations}")]
    ValidationFailed {
        /// Name of the component validated against.
        schema_name: String,
        /// Every violation found.
        violations: ValidationViolations,
    },

    /// The schema document could not be parsed or lacks the component.
    #[error("schema load error for '{schema_name}': {reason}")]
    SchemaLoadError {
        /// Schema file or component name.
        schema_name: String,
        /// Reason the schema could not be loaded.
        reason: String,
    },

    /// The validator could not be compiled (invalid schema).
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuildError {
        /// Component name.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },

    /// IO error reading the schema document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value in the payload.
    pub instance_path: String,
    /// JSON Pointer within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// All violations, in validator order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A compiled payload schema.
///
/// `PayloadSchema` is `Send + Sync`; build it once at startup and share it
/// by reference.
pub struct PayloadSchema {
    component: String,
    validator: Validator,
}

impl fmt::Debug for PayloadSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PayloadSchema")
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

impl PayloadSchema {
    /// Compile the schema bundled with the workspace.
    pub fn bundled() -> Result<Self, SchemaValidationError> {
        Self::from_openapi_str(BUNDLED_OPENAPI, DEFAULT_COMPONENT)
    }

    /// Compile `component` from an OpenAPI document given as JSON text.
    pub fn from_openapi_str(text: &str, component: &str) -> Result<Self, SchemaValidationError> {
        let document: Value =
            serde_json::from_str(text).map_err(|e| SchemaValidationError::SchemaLoadError {
                schema_name: component.to_string(),
                reason: format!("invalid JSON: {e}"),
            })?;
        Self::from_openapi(&document, component)
    }

    /// Compile `component` from a parsed OpenAPI document.
    ///
    /// # Errors
    ///
    /// `SchemaLoadError` if `components.schemas` is missing or lacks
    /// `component`; `ValidatorBuildError` if the schema does not compile.
    pub fn from_openapi(document: &Value, component: &str) -> Result<Self, SchemaValidationError> {
        let schemas = document
            .get("components")
            .and_then(|c| c.get("schemas"))
            .and_then(Value::as_object)
            .filter(|schemas| !schemas.is_empty())
            .ok_or_else(|| SchemaValidationError::SchemaLoadError {
                schema_name: component.to_string(),
                reason: "document has no components.schemas".to_string(),
            })?;
        if !schemas.contains_key(component) {
            return Err(SchemaValidationError::SchemaLoadError {
                schema_name: component.to_string(),
                reason: format!("component not found among {} schemas", schemas.len()),
            });
        }

        let root = root_document(schemas, component);
        let validator = build_options().build(&root).map_err(|e| {
            SchemaValidationError::ValidatorBuildError {
                schema_name: component.to_string(),
                reason: e.to_string(),
            }
        })?;

        tracing::debug!(component, schemas = schemas.len(), "compiled payload schema");
        Ok(Self {
            component: component.to_string(),
            validator,
        })
    }

    /// Load and compile [`DEFAULT_COMPONENT`] from a file.
    ///
    /// `.yaml`/`.yml` files are read as YAML, anything else as JSON.
    pub fn load(path: &Path) -> Result<Self, SchemaValidationError> {
        let content = std::fs::read_to_string(path)?;
        let schema_name = path.display().to_string();
        let document: Value = if is_yaml(path) {
            serde_yaml::from_str(&content).map_err(|e| SchemaValidationError::SchemaLoadError {
                schema_name,
                reason: format!("invalid YAML: {e}"),
            })?
        } else {
            serde_json::from_str(&content).map_err(|e| SchemaValidationError::SchemaLoadError {
                schema_name,
                reason: format!("invalid JSON: {e}"),
            })?
        };
        Self::from_openapi(&document, DEFAULT_COMPONENT)
    }

    /// Load a schema file, or log a warning and return `None` so validation
    /// is skipped.
    pub fn load_or_skip(path: &Path) -> Option<Self> {
        match Self::load(path) {
            Ok(schema) => Some(schema),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "cannot prepare payload schema, validation will be skipped"
                );
                None
            }
        }
    }

    /// Name of the compiled component.
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Every violation of `instance`, empty when it conforms.
    pub fn violations(&self, instance: &Value) -> Vec<Violation> {
        self.validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect()
    }

    /// Validate `instance`, failing with every violation at once.
    pub fn validate(&self, instance: &Value) -> Result<(), SchemaValidationError> {
        let violations = self.violations(instance);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaValidationError::ValidationFailed {
                schema_name: self.component.clone(),
                violations: ValidationViolations { violations },
            })
        }
    }
}

fn build_options() -> ValidationOptions {
    let mut opts = jsonschema::options();
    opts.with_draft(jsonschema::Draft::Draft202012);
    opts.with_retriever(OfflineRetriever);
    opts
}

/// Augmented copy of every component under a root that refers to `component`.
fn root_document(schemas: &Map<String, Value>, component: &str) -> Value {
    let augmented: Map<String, Value> = schemas
        .iter()
        .map(|(name, schema)| {
            let mut schema = schema.clone();
            allow_null_in_additional_properties(&mut schema);
            (name.clone(), schema)
        })
        .collect();
    json!({
        "$ref": format!("#/components/schemas/{component}"),
        "components": { "schemas": augmented }
    })
}

fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundled() -> PayloadSchema {
        PayloadSchema::bundled().expect("bundled schema compiles")
    }

    fn minimal_payload() -> Value {
        json!({
            "individus": {
                "individu_1": {"salaire_de_base": {"2024-06": 1200, "2024-05": 1200}},
                "individu_2": {"aah": {"2024-06": null}}
            },
            "familles": {
                "famille_1": {
                    "parents": ["individu_1", "individu_2"],
                    "enfants": [],
                    "af": {"2024-06": null},
                    "ars": {"2024": 0}
                }
            },
            "foyers_fiscaux": {
                "foyer_fiscal_1": {"declarants": ["individu_1", "individu_2"], "personnes_a_charge": []}
            },
            "menages": {
                "menage_1": {
                    "personne_de_reference": ["individu_1"],
                    "conjoint": ["individu_2"],
                    "enfants": [],
                    "statut_occupation_logement": {"2024-06": "locataire_vide"},
                    "depcom": {"2024-06": "75111"}
                }
            }
        })
    }

    #[test]
    fn test_bundled_schema_accepts_payload_with_nulls() {
        let schema = bundled();
        assert_eq!(schema.component(), "SituationInput");
        assert!(schema.validate(&minimal_payload()).is_ok());
    }

    #[test]
    fn test_violations_are_aggregated() {
        let payload = json!({
            "individus": {
                "individu_1": {"age": {"2024/06": 30}, "salaire_de_base": {"2024-06": [1]}}
            },
            "familles": {"famille_1": {"parents": "individu_1"}},
            "extra": {}
        });
        let err = bundled().validate(&payload).unwrap_err();
        match err {
            SchemaValidationError::ValidationFailed {
                schema_name,
                violations,
            } => {
                assert_eq!(schema_name, "SituationInput");
                assert!(violations.len() >= 4, "got {violations}");
                let rendered = violations.to_string();
                assert!(rendered.contains("/individus/individu_1/salaire_de_base/2024-06"));
                assert!(rendered.contains("/familles/famille_1/parents"));
                assert_eq!(rendered.lines().count(), violations.len());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_individus_is_rejected() {
        let violations = bundled().violations(&json!({"menages": {}}));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].instance_path, "");
        assert!(violations[0].to_string().starts_with("  (root): "));
    }

    #[test]
    fn test_missing_component() {
        let doc = json!({"components": {"schemas": {"Other": {"type": "object"}}}});
        let err = PayloadSchema::from_openapi(&doc, "SituationInput").unwrap_err();
        assert!(matches!(err, SchemaValidationError::SchemaLoadError { .. }));

        let err = PayloadSchema::from_openapi(&json!({"openapi": "3.1.0"}), "X").unwrap_err();
        assert!(err.to_string().contains("no components.schemas"));
    }

    #[test]
    fn test_invalid_json_text() {
        let err = PayloadSchema::from_openapi_str("{", DEFAULT_COMPONENT).unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_debug_does_not_dump_validator() {
        let rendered = format!("{:?}", bundled());
        assert!(rendered.starts_with("PayloadSchema"));
        assert!(rendered.contains("SituationInput"));
    }
}
