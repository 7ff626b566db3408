//! # Payload Assembler
//!
//! Turns a [`NormalizedRecord`] into the engine's entity graph.
//!
//! ## Entity Model
//!
//! The household is always modelled with exactly:
//!
//! - two adults, `individu_1` (claimant) and `individu_2` (partner), even
//!   when no partner was mentioned, plus one `enfant_N` per child;
//! - one family `famille_1` (parents: both adults, enfants: the children);
//! - one tax household `foyer_fiscal_1` (declarants: both adults,
//!   personnes_a_charge: the children);
//! - one dwelling household `menage_1` (reference person: claimant,
//!   conjoint: partner, enfants: the children).
//!
//! ## Benefit Placement
//!
//! Each tracked benefit is written on the entity kind the catalog declares
//! for it (`asi` defaults to individuals, everything else to the family).
//! The value is the declared received amount, `0` when mentioned without an
//! amount, `null` otherwise. Family, household and tax-household benefits
//! read the household-level declaration; individual benefits read the
//! claimant's and partner's, and children get `null`.

use facilaide_core::coerce::{json_number, json_optional_number};
use facilaide_core::{
    AdultRecord, Beneficiary, BenefitId, Declaration, EntityKind, NormalizedRecord,
    SimulationMonth,
};
use serde_json::{json, Value};

use crate::config::EngineConfig;
use crate::error::AssemblyError;
use crate::guard::check_period_consistency;
use crate::payload::{
    child_id, Entity, SimulationPayload, CLAIMANT_ID, FAMILY_ID, HOUSEHOLD_ID, PARTNER_ID,
    TAX_HOUSEHOLD_ID,
};
use crate::period::PeriodFormatter;

/// Entity kind a benefit is placed on when the catalog does not say.
pub fn default_benefit_entity(benefit: BenefitId) -> EntityKind {
    match benefit {
        BenefitId::Asi => EntityKind::Individu,
        _ => EntityKind::Famille,
    }
}

/// Builds payloads for one simulation month.
#[derive(Debug, Clone, Copy)]
pub struct PayloadAssembler<'a> {
    config: &'a EngineConfig,
    periods: PeriodFormatter<'a>,
}

impl<'a> PayloadAssembler<'a> {
    /// Assembler for `month` using `config`.
    pub fn new(config: &'a EngineConfig, month: SimulationMonth) -> Self {
        Self {
            config,
            periods: PeriodFormatter::new(&config.catalog, month),
        }
    }

    /// The simulation month.
    pub fn month(&self) -> SimulationMonth {
        self.periods.month()
    }

    /// Build, guard and validate the payload for `record`.
    ///
    /// # Errors
    ///
    /// `PeriodMismatch` if a variable carries a key of the wrong granularity;
    /// `Schema` with every violation if the payload fails the schema gate.
    pub fn assemble(&self, record: &NormalizedRecord) -> Result<SimulationPayload, AssemblyError> {
        let payload = self.build(record);
        check_period_consistency(&payload, &self.config.catalog)?;
        match &self.config.schema {
            Some(schema) => schema.validate(&payload.to_value()?)?,
            None => tracing::debug!("no payload schema configured, validation skipped"),
        }
        Ok(payload)
    }

    /// The payload for `record`, without the guard or the schema gate.
    pub fn build(&self, record: &NormalizedRecord) -> SimulationPayload {
        let child_ids: Vec<String> = (1..=record.child_count()).map(child_id).collect();
        let adults = || vec![CLAIMANT_ID.to_string(), PARTNER_ID.to_string()];

        let mut payload = SimulationPayload::default();

        payload
            .individus
            .insert(CLAIMANT_ID.to_string(), self.adult(&record.claimant));
        payload
            .individus
            .insert(PARTNER_ID.to_string(), self.adult(&record.partner));
        for (id, child) in child_ids.iter().zip(&record.children) {
            let mut entity = Entity::new();
            entity.set_variable("age", self.periods.wrap("age", json_number(child.age)));
            payload.individus.insert(id.clone(), entity);
        }

        let mut family = Entity::new();
        family.set_members("parents", adults());
        family.set_members("enfants", child_ids.clone());
        payload.familles.insert(FAMILY_ID.to_string(), family);

        let mut tax_household = Entity::new();
        tax_household.set_members("declarants", adults());
        tax_household.set_members("personnes_a_charge", child_ids.clone());
        payload
            .foyers_fiscaux
            .insert(TAX_HOUSEHOLD_ID.to_string(), tax_household);

        payload
            .menages
            .insert(HOUSEHOLD_ID.to_string(), self.household(record, child_ids));

        self.place_benefits(record, &mut payload);

        tracing::debug!(
            month = %self.month(),
            individuals = payload.individus.len(),
            housing_status = record.housing.status.as_str(),
            "assembled payload"
        );
        payload
    }

    fn adult(&self, adult: &AdultRecord) -> Entity {
        let mut entity = Entity::new();
        entity.set_variable(
            "salaire_de_base",
            self.periods
                .wrap_resource("salaire_de_base", json_number(adult.wage)),
        );
        entity.set_variable("age", self.periods.wrap("age", json_number(adult.age)));
        entity.set_variable(
            "aah",
            self.periods
                .wrap_resource("aah", json_optional_number(adult.disability_benefit)),
        );
        entity
    }

    fn household(&self, record: &NormalizedRecord, child_ids: Vec<String>) -> Entity {
        let housing = &record.housing;
        let mut household = Entity::new();
        household.set_members("personne_de_reference", vec![CLAIMANT_ID.to_string()]);
        household.set_members("conjoint", vec![PARTNER_ID.to_string()]);
        household.set_members("enfants", child_ids);
        household.set_variable(
            "statut_occupation_logement",
            self.periods
                .wrap("statut_occupation_logement", json!(housing.status.as_str())),
        );
        household.set_variable(
            "depcom",
            self.periods.wrap("depcom", json!(housing.depcom.as_str())),
        );
        if let Some(rent) = housing.rent.filter(|_| housing.status.is_tenant()) {
            household.set_variable("loyer", self.periods.wrap("loyer", json_number(rent)));
        }
        household
    }

    fn place_benefits(&self, record: &NormalizedRecord, payload: &mut SimulationPayload) {
        let received = &record.received;
        let amount = |beneficiary: Beneficiary, benefit: BenefitId| -> Value {
            json_optional_number(
                received
                    .get(beneficiary, benefit)
                    .and_then(Declaration::payload_amount),
            )
        };

        for &benefit in BenefitId::tracked() {
            let name = benefit.as_str();
            let kind = self
                .config
                .catalog
                .entity(name)
                .unwrap_or_else(|| default_benefit_entity(benefit));

            match kind {
                EntityKind::Individu => {
                    for (id, entity) in payload.individus.iter_mut() {
                        let value = match id.as_str() {
                            CLAIMANT_ID => amount(Beneficiary::Demandeur, benefit),
                            PARTNER_ID => amount(Beneficiary::Conjoint, benefit),
                            _ => Value::Null,
                        };
                        entity.set_variable(name, self.periods.wrap(name, value));
                    }
                }
                EntityKind::Famille | EntityKind::Menage | EntityKind::FoyerFiscal => {
                    let value = amount(Beneficiary::Menage, benefit);
                    for entity in payload.collection_mut(kind).values_mut() {
                        entity.set_variable(name, self.periods.wrap(name, value.clone()));
                    }
                }
            }
        }
    }
}
