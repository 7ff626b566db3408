//! # facilaide-resolver: Input Resolver
//!
//! Walks an arbitrarily shaped household description and produces the
//! canonical [`NormalizedRecord`]. The same fact may arrive flat
//! (`salaire_de_base`), role-prefixed (`salaire_de_base_conjoint`), or nested
//! under one of the conventional containers (`situation`, `personnes`,
//! `menage`, `demandeur`, ...). Every field is located through the ordered
//! tables in [`fields`], then coerced.
//!
//! - **Adults** (`individu_1`, `individu_2`): wage, age, birthdate, first
//!   name, AAH. An age computed from a birthdate overrides a supplied age.
//! - **Children** ([`children`]): count reconciliation across ages,
//!   birthdates and first names, with structural deduplication.
//! - **Housing** ([`housing`]): occupancy status, rent, municipality code.
//! - **Benefits** ([`benefits`]): received and requested declarations.
//! - **Labels** ([`labels`]): display names for the payload's individuals.
//!
//! ## Crate Policy
//!
//! - Never fails. Missing or malformed data resolves to the defaults
//!   documented on [`facilaide_core::record`].
//! - Pure: the only input besides the raw value is the simulation month.

pub mod benefits;
pub mod children;
pub mod fields;
pub mod housing;
pub mod labels;

use chrono::NaiveDate;
use facilaide_core::record::DEFAULT_ADULT_AGE;
use facilaide_core::temporal::age_at_end_of_month;
use facilaide_core::{
    AdultRecord, Beneficiary, BenefitDeclarations, BenefitId, NormalizedRecord, SimulationMonth,
};
use serde_json::Value;

pub use benefits::extract_declarations;
pub use children::resolve_children;
pub use fields::AdultRules;
pub use housing::{normalize_depcom, normalize_housing_status, resolve_housing};
pub use labels::person_labels;

/// Resolves raw household descriptions against a fixed simulation month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputResolver {
    month: SimulationMonth,
}

impl InputResolver {
    /// Resolver for the month containing `date`.
    pub fn at(date: NaiveDate) -> Self {
        Self::for_month(SimulationMonth::containing(date))
    }

    /// Resolver for an explicit month.
    pub fn for_month(month: SimulationMonth) -> Self {
        Self { month }
    }

    /// Resolver for the current UTC month.
    pub fn current() -> Self {
        Self::for_month(SimulationMonth::current())
    }

    /// The reference month ages are computed against.
    pub fn month(&self) -> SimulationMonth {
        self.month
    }

    /// Produce the normalized record for `raw`.
    pub fn resolve(&self, raw: &Value) -> NormalizedRecord {
        let mut received = extract_declarations(raw, benefits::RECEIVED);
        let requested = extract_declarations(raw, benefits::REQUESTED);

        let claimant =
            self.resolve_adult(raw, &fields::CLAIMANT, Beneficiary::Demandeur, &mut received);
        let partner =
            self.resolve_adult(raw, &fields::PARTNER, Beneficiary::Conjoint, &mut received);
        let children = resolve_children(raw, self.month);
        let housing = resolve_housing(raw);

        tracing::debug!(
            month = %self.month,
            children = children.len(),
            housing_status = housing.status.as_str(),
            depcom = housing.depcom.as_str(),
            received = received.len(),
            requested = requested.len(),
            "resolved household input"
        );

        NormalizedRecord {
            claimant,
            partner,
            children,
            housing,
            received,
            requested,
        }
    }

    fn resolve_adult(
        &self,
        raw: &Value,
        rules: &AdultRules,
        role: Beneficiary,
        received: &mut BenefitDeclarations,
    ) -> AdultRecord {
        let birthdate = rules.birthdate.resolve(raw);
        let age = birthdate
            .and_then(|date| age_at_end_of_month(date, self.month))
            .map(f64::from)
            .or_else(|| rules.age.resolve(raw))
            .unwrap_or(DEFAULT_ADULT_AGE);

        // A received AAH declaration beats the raw field; the raw field only
        // fills the declaration when none was made.
        let disability_benefit = match received.get(role, BenefitId::Aah) {
            Some(declaration) => declaration.payload_amount(),
            None => {
                let raw_amount = rules.disability_benefit.resolve(raw);
                if raw_amount.is_some() {
                    received.insert_first(role, BenefitId::Aah, raw_amount);
                }
                raw_amount
            }
        };

        AdultRecord {
            wage: rules.wage.resolve(raw).unwrap_or(0.0),
            disability_benefit,
            age,
            birthdate,
            first_name: rules.first_name.resolve(raw),
        }
    }
}

/// Resolve `raw` against the current UTC month.
pub fn resolve(raw: &Value) -> NormalizedRecord {
    InputResolver::current().resolve(raw)
}
