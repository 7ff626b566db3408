//! # Simulation Payload
//!
//! The entity graph handed to the calculation engine:
//!
//! ```json
//! {
//!   "individus":      { "individu_1": { "salaire_de_base": { "2024-06": 1200 } } },
//!   "familles":       { "famille_1": { "parents": ["individu_1", "individu_2"], "af": { "2024-06": null } } },
//!   "foyers_fiscaux": { "foyer_fiscal_1": { "declarants": ["individu_1", "individu_2"] } },
//!   "menages":        { "menage_1": { "personne_de_reference": ["individu_1"] } }
//! }
//! ```
//!
//! An entity field is either a role (list of individual ids) or a variable
//! (period map).

use std::collections::BTreeMap;

use facilaide_core::coerce::to_number;
use facilaide_core::{EntityKind, SimulationMonth};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::period::PeriodValues;

/// Id of the claimant.
pub const CLAIMANT_ID: &str = "individu_1";
/// Id of the partner.
pub const PARTNER_ID: &str = "individu_2";
/// Id of the only family.
pub const FAMILY_ID: &str = "famille_1";
/// Id of the only tax household.
pub const TAX_HOUSEHOLD_ID: &str = "foyer_fiscal_1";
/// Id of the only dwelling household.
pub const HOUSEHOLD_ID: &str = "menage_1";

/// Id of the `n`-th child (1-based).
pub fn child_id(n: usize) -> String {
    format!("enfant_{n}")
}

/// Child number of an id produced by [`child_id`].
pub fn child_number(id: &str) -> Option<usize> {
    id.strip_prefix("enfant_")
        .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|rest| rest.parse().ok())
}

/// One field of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityField {
    /// Role membership: ids of individuals.
    Members(Vec<String>),
    /// Variable values by period.
    Periods(PeriodValues),
}

/// An engine entity: roles and variables keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity {
    fields: BTreeMap<String, EntityField>,
}

impl Entity {
    /// An entity with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a role.
    pub fn set_members(&mut self, role: &str, members: Vec<String>) {
        self.fields.insert(role.to_string(), EntityField::Members(members));
    }

    /// Set a variable.
    pub fn set_variable(&mut self, name: &str, values: PeriodValues) {
        self.fields.insert(name.to_string(), EntityField::Periods(values));
    }

    /// Members of a role.
    pub fn members(&self, role: &str) -> Option<&[String]> {
        match self.fields.get(role)? {
            EntityField::Members(members) => Some(members),
            EntityField::Periods(_) => None,
        }
    }

    /// Values of a variable.
    pub fn variable(&self, name: &str) -> Option<&PeriodValues> {
        match self.fields.get(name)? {
            EntityField::Periods(values) => Some(values),
            EntityField::Members(_) => None,
        }
    }

    /// All variables, by name.
    pub fn variables(&self) -> impl Iterator<Item = (&str, &PeriodValues)> {
        self.fields.iter().filter_map(|(name, field)| match field {
            EntityField::Periods(values) => Some((name.as_str(), values)),
            EntityField::Members(_) => None,
        })
    }
}

/// Entities of one kind, keyed by id.
pub type EntityCollection = BTreeMap<String, Entity>;

/// The complete engine input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationPayload {
    /// Individuals.
    pub individus: EntityCollection,
    /// Benefit families.
    pub familles: EntityCollection,
    /// Tax households.
    pub foyers_fiscaux: EntityCollection,
    /// Dwelling households.
    pub menages: EntityCollection,
}

impl SimulationPayload {
    /// The collection holding entities of `kind`.
    pub fn collection(&self, kind: EntityKind) -> &EntityCollection {
        match kind {
            EntityKind::Individu => &self.individus,
            EntityKind::Famille => &self.familles,
            EntityKind::FoyerFiscal => &self.foyers_fiscaux,
            EntityKind::Menage => &self.menages,
        }
    }

    /// Mutable access to the collection holding entities of `kind`.
    pub fn collection_mut(&mut self, kind: EntityKind) -> &mut EntityCollection {
        match kind {
            EntityKind::Individu => &mut self.individus,
            EntityKind::Famille => &mut self.familles,
            EntityKind::FoyerFiscal => &mut self.foyers_fiscaux,
            EntityKind::Menage => &mut self.menages,
        }
    }

    /// Every entity with its kind and id.
    pub fn entities(&self) -> impl Iterator<Item = (EntityKind, &str, &Entity)> {
        EntityKind::all().iter().flat_map(move |&kind| {
            self.collection(kind)
                .iter()
                .map(move |(id, entity)| (kind, id.as_str(), entity))
        })
    }

    /// Ids of the child individuals, in child order.
    pub fn child_ids(&self) -> Vec<&str> {
        let mut children: Vec<(usize, &str)> = self
            .individus
            .keys()
            .filter_map(|id| child_number(id).map(|n| (n, id.as_str())))
            .collect();
        children.sort_unstable();
        children.into_iter().map(|(_, id)| id).collect()
    }

    /// JSON form sent to the engine.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// Current-period scalar of an individual variable.
    fn scalar(&self, id: &str, variable: &str, key: &str) -> Option<&Value> {
        self.individus
            .get(id)?
            .variable(variable)?
            .get(key)
            .filter(|v| !v.is_null())
    }

    /// The payload's scalars for `month`, flattened into a raw household
    /// input that the resolver accepts.
    ///
    /// Resolving the snapshot reproduces the ages, wages and child count the
    /// payload was assembled from.
    pub fn scalar_snapshot(&self, month: SimulationMonth) -> Value {
        let key = month.month_key();
        let mut raw = Map::new();

        let adult_fields = [
            (CLAIMANT_ID, "salaire_de_base", "salaire_de_base"),
            (CLAIMANT_ID, "age", "age"),
            (CLAIMANT_ID, "aah", "aah"),
            (PARTNER_ID, "salaire_de_base", "salaire_de_base_conjoint"),
            (PARTNER_ID, "age", "age_conjoint"),
            (PARTNER_ID, "aah", "aah_conjoint"),
        ];
        for (id, variable, raw_key) in adult_fields {
            if let Some(value) = self.scalar(id, variable, &key) {
                raw.insert(raw_key.to_string(), value.clone());
            }
        }

        let children: Vec<Value> = self
            .child_ids()
            .into_iter()
            .map(|id| match self.scalar(id, "age", &key).and_then(to_number) {
                Some(age) => json!({ "age": age }),
                None => json!({}),
            })
            .collect();
        raw.insert("nombre_enfants".to_string(), json!(children.len()));
        raw.insert("enfants".to_string(), Value::Array(children));

        if let Some(household) = self.menages.get(HOUSEHOLD_ID) {
            for variable in ["statut_occupation_logement", "depcom", "loyer"] {
                if let Some(value) = household
                    .variable(variable)
                    .and_then(|v| v.get(&key))
                    .filter(|v| !v.is_null())
                {
                    raw.insert(variable.to_string(), value.clone());
                }
            }
        }

        Value::Object(raw)
    }
}
