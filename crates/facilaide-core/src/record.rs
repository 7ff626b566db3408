//! # Normalized Household Record
//!
//! The canonical snapshot the input resolver produces and the payload
//! assembler consumes. Every field has a documented default so a record can
//! always be built, whatever the raw input looked like.
//!
//! Serialization uses the French field names of the engine vocabulary
//! (`salaire_de_base`, `prestations_recues`, ...), which is what the CLI
//! prints for `normalize`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Beneficiary, BenefitId, Depcom, HousingStatus};

/// Age used for an adult when neither a birthdate nor an age is usable.
pub const DEFAULT_ADULT_AGE: f64 = 30.0;

/// Age used for a child slot with no usable age or birthdate.
pub const DEFAULT_CHILD_AGE: f64 = 5.0;

// ---------------------------------------------------------------------------
// People
// ---------------------------------------------------------------------------

/// One of the two adults of the household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdultRecord {
    /// Monthly base wage. Defaults to 0.
    #[serde(rename = "salaire_de_base")]
    pub wage: f64,
    /// Monthly disability allowance (AAH) amount, if any.
    #[serde(rename = "aah")]
    pub disability_benefit: Option<f64>,
    /// Age in years at the end of the simulation month.
    pub age: f64,
    /// Birthdate, if one was provided and parsed.
    #[serde(rename = "date_naissance")]
    pub birthdate: Option<NaiveDate>,
    /// First name, if provided.
    #[serde(rename = "prenom")]
    pub first_name: Option<String>,
}

impl Default for AdultRecord {
    fn default() -> Self {
        Self {
            wage: 0.0,
            disability_benefit: None,
            age: DEFAULT_ADULT_AGE,
            birthdate: None,
            first_name: None,
        }
    }
}

/// A dependent child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildRecord {
    /// Age in years at the end of the simulation month.
    pub age: f64,
    /// Birthdate, if one was provided and parsed.
    #[serde(rename = "date_naissance")]
    pub birthdate: Option<NaiveDate>,
    /// First name, if provided.
    #[serde(rename = "prenom")]
    pub first_name: Option<String>,
}

impl Default for ChildRecord {
    fn default() -> Self {
        Self {
            age: DEFAULT_CHILD_AGE,
            birthdate: None,
            first_name: None,
        }
    }
}

/// Housing attributes of the household.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HousingRecord {
    /// Occupancy status.
    #[serde(rename = "statut_occupation_logement")]
    pub status: HousingStatus,
    /// Monthly rent. Only carried into the payload for tenant statuses.
    #[serde(rename = "loyer")]
    pub rent: Option<f64>,
    /// Municipality code.
    pub depcom: Depcom,
}

// ---------------------------------------------------------------------------
// Benefit declarations
// ---------------------------------------------------------------------------

/// What the household said about one benefit for one beneficiary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    /// The benefit was mentioned at all.
    #[serde(rename = "mentionnee")]
    pub mentioned: bool,
    /// Declared monthly amount, when one was given.
    #[serde(rename = "montant")]
    pub amount: Option<f64>,
}

impl Declaration {
    /// A mentioned declaration.
    pub fn mentioned(amount: Option<f64>) -> Self {
        Self {
            mentioned: true,
            amount,
        }
    }

    /// Value to write into the payload: the amount, `0` when mentioned
    /// without an amount, `None` when not mentioned.
    pub fn payload_amount(&self) -> Option<f64> {
        self.mentioned.then(|| self.amount.unwrap_or(0.0))
    }
}

/// Benefit declarations for the three beneficiaries.
///
/// Insertion is first-wins: once a `(beneficiary, benefit)` pair is recorded,
/// later occurrences of the same pair are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenefitDeclarations {
    /// Claimant's declarations.
    pub demandeur: BTreeMap<BenefitId, Declaration>,
    /// Partner's declarations.
    pub conjoint: BTreeMap<BenefitId, Declaration>,
    /// Household-level declarations.
    pub menage: BTreeMap<BenefitId, Declaration>,
}

impl BenefitDeclarations {
    /// Declarations for one beneficiary.
    pub fn for_beneficiary(&self, beneficiary: Beneficiary) -> &BTreeMap<BenefitId, Declaration> {
        match beneficiary {
            Beneficiary::Demandeur => &self.demandeur,
            Beneficiary::Conjoint => &self.conjoint,
            Beneficiary::Menage => &self.menage,
        }
    }

    fn for_beneficiary_mut(
        &mut self,
        beneficiary: Beneficiary,
    ) -> &mut BTreeMap<BenefitId, Declaration> {
        match beneficiary {
            Beneficiary::Demandeur => &mut self.demandeur,
            Beneficiary::Conjoint => &mut self.conjoint,
            Beneficiary::Menage => &mut self.menage,
        }
    }

    /// The declaration for `(beneficiary, benefit)`, if any.
    pub fn get(&self, beneficiary: Beneficiary, benefit: BenefitId) -> Option<&Declaration> {
        self.for_beneficiary(beneficiary).get(&benefit)
    }

    /// Record a mention unless the pair is already present.
    ///
    /// Returns `true` if the declaration was inserted.
    pub fn insert_first(
        &mut self,
        beneficiary: Beneficiary,
        benefit: BenefitId,
        amount: Option<f64>,
    ) -> bool {
        let slot = self.for_beneficiary_mut(beneficiary);
        if slot.contains_key(&benefit) {
            return false;
        }
        slot.insert(benefit, Declaration::mentioned(amount));
        true
    }

    /// Total number of declarations.
    pub fn len(&self) -> usize {
        self.demandeur.len() + self.conjoint.len() + self.menage.len()
    }

    /// True when nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Canonical household snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// The claimant (`individu_1`).
    #[serde(rename = "demandeur")]
    pub claimant: AdultRecord,
    /// The partner (`individu_2`), present even when none was mentioned.
    #[serde(rename = "conjoint")]
    pub partner: AdultRecord,
    /// Dependent children, in declaration order.
    #[serde(rename = "enfants")]
    pub children: Vec<ChildRecord>,
    /// Housing attributes.
    #[serde(rename = "logement")]
    pub housing: HousingRecord,
    /// Benefits already received.
    #[serde(rename = "prestations_recues")]
    pub received: BenefitDeclarations,
    /// Benefits the household wants to request.
    #[serde(rename = "prestations_a_demander")]
    pub requested: BenefitDeclarations,
}

impl NormalizedRecord {
    /// Number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}
