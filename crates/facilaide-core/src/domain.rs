//! # Domain Vocabularies
//!
//! Closed enumerations for the values the calculation engine understands:
//! housing occupancy statuses, benefit identifiers, and the beneficiary
//! roles a benefit declaration can be attached to. Plus the [`Depcom`]
//! municipality code newtype.
//!
//! Each enum owns its wire string in one `as_str()`; serde uses the same
//! strings so normalized records serialize the way the engine spells them.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Housing
// ---------------------------------------------------------------------------

/// Housing occupancy status of the household (`statut_occupation_logement`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HousingStatus {
    /// Not provided or not recognized.
    #[default]
    NonRenseigne,
    /// First-time buyer repaying a loan.
    PrimoAccedant,
    /// Owner-occupier.
    Proprietaire,
    /// Social housing tenant.
    LocataireHlm,
    /// Private unfurnished tenant.
    LocataireVide,
    /// Private furnished tenant.
    LocataireMeuble,
    /// Housed free of charge (family, friends).
    LogeGratuitement,
    /// Group housing (foyer, residence sociale).
    LocataireFoyer,
    /// Homeless or emergency shelter.
    SansDomicile,
}

impl HousingStatus {
    /// Engine code for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NonRenseigne => "non_renseigne",
            Self::PrimoAccedant => "primo_accedant",
            Self::Proprietaire => "proprietaire",
            Self::LocataireHlm => "locataire_hlm",
            Self::LocataireVide => "locataire_vide",
            Self::LocataireMeuble => "locataire_meuble",
            Self::LogeGratuitement => "loge_gratuitement",
            Self::LocataireFoyer => "locataire_foyer",
            Self::SansDomicile => "sans_domicile",
        }
    }

    /// All nine statuses.
    pub fn all() -> &'static [HousingStatus] {
        &[
            Self::NonRenseigne,
            Self::PrimoAccedant,
            Self::Proprietaire,
            Self::LocataireHlm,
            Self::LocataireVide,
            Self::LocataireMeuble,
            Self::LogeGratuitement,
            Self::LocataireFoyer,
            Self::SansDomicile,
        ]
    }

    /// Parse an exact engine code.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().iter().copied().find(|s| s.as_str() == code)
    }

    /// Tenant-type statuses imply rent payment; only they carry `loyer`.
    pub fn is_tenant(&self) -> bool {
        matches!(
            self,
            Self::LocataireVide | Self::LocataireMeuble | Self::LocataireHlm | Self::LocataireFoyer
        )
    }
}

impl fmt::Display for HousingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Five-character INSEE municipality code (`depcom`).
///
/// Either five digits or the Corsican form `2A004` / `2B033`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Depcom(String);

impl Depcom {
    /// Fallback used when no code can be resolved from the input.
    pub const DEFAULT: &'static str = "60100";

    /// Accept an already-normalized code.
    ///
    /// Returns `None` unless the value is exactly five ASCII characters of the
    /// form `ddddd` or `ddLdd` (uppercase letter).
    pub fn new(code: &str) -> Option<Self> {
        is_depcom_shape(code.as_bytes()).then(|| Self(code.to_string()))
    }

    /// The fallback municipality.
    pub fn fallback() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    /// The code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Depcom {
    fn default() -> Self {
        Self::fallback()
    }
}

impl fmt::Display for Depcom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `ddddd` or `ddLdd` over exactly five bytes.
pub fn is_depcom_shape(bytes: &[u8]) -> bool {
    if bytes.len() != 5 {
        return false;
    }
    let digits_around = bytes[0].is_ascii_digit()
        && bytes[1].is_ascii_digit()
        && bytes[3].is_ascii_digit()
        && bytes[4].is_ascii_digit();
    digits_around && (bytes[2].is_ascii_digit() || bytes[2].is_ascii_uppercase())
}

// ---------------------------------------------------------------------------
// Benefits
// ---------------------------------------------------------------------------

/// A benefit the household may receive or request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BenefitId {
    /// Allocation aux adultes handicapés.
    Aah,
    /// Revenu de solidarité active.
    Rsa,
    /// Aides au logement.
    AideLogement,
    /// Allocations familiales.
    Af,
    /// Allocation de rentrée scolaire.
    Ars,
    /// Allocation de solidarité aux personnes âgées.
    Aspa,
    /// Allocation supplémentaire d'invalidité.
    Asi,
    /// Allocation de base de la PAJE.
    PajeBase,
    /// Prime d'activité.
    Ppa,
    /// Complément familial.
    Cf,
}

impl BenefitId {
    /// Engine variable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aah => "aah",
            Self::Rsa => "rsa",
            Self::AideLogement => "aide_logement",
            Self::Af => "af",
            Self::Ars => "ars",
            Self::Aspa => "aspa",
            Self::Asi => "asi",
            Self::PajeBase => "paje_base",
            Self::Ppa => "ppa",
            Self::Cf => "cf",
        }
    }

    /// All benefit ids.
    pub fn all() -> &'static [BenefitId] {
        &[
            Self::Aah,
            Self::Rsa,
            Self::AideLogement,
            Self::Af,
            Self::Ars,
            Self::Aspa,
            Self::Asi,
            Self::PajeBase,
            Self::Ppa,
            Self::Cf,
        ]
    }

    /// Benefits placed on payload entities from the "received" declarations.
    ///
    /// AAH is absent: it is carried as a resource variable on individuals.
    pub fn tracked() -> &'static [BenefitId] {
        &[
            Self::Rsa,
            Self::AideLogement,
            Self::Af,
            Self::Ars,
            Self::Aspa,
            Self::Asi,
            Self::PajeBase,
            Self::Ppa,
            Self::Cf,
        ]
    }

    /// Parse an exact engine variable name.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::all().iter().copied().find(|b| b.as_str() == code)
    }
}

impl fmt::Display for BenefitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who a benefit declaration concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Beneficiary {
    /// The claimant (`individu_1`).
    Demandeur,
    /// The partner (`individu_2`).
    Conjoint,
    /// The household as a whole.
    Menage,
}

impl Beneficiary {
    /// Wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Demandeur => "demandeur",
            Self::Conjoint => "conjoint",
            Self::Menage => "menage",
        }
    }

    /// Parse an exact wire name.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "demandeur" => Some(Self::Demandeur),
            "conjoint" => Some(Self::Conjoint),
            "menage" => Some(Self::Menage),
            _ => None,
        }
    }
}

impl fmt::Display for Beneficiary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_four_tenant_statuses() {
        let tenants: Vec<_> = HousingStatus::all().iter().filter(|s| s.is_tenant()).collect();
        assert_eq!(tenants.len(), 4);
    }

    #[test]
    fn test_housing_code_roundtrip() {
        for status in HousingStatus::all() {
            assert_eq!(HousingStatus::from_code(status.as_str()), Some(*status));
            let json = serde_json::to_value(status).unwrap();
            assert_eq!(json, serde_json::Value::String(status.as_str().into()));
        }
    }

    #[test]
    fn test_benefit_serde_matches_as_str() {
        for benefit in BenefitId::all() {
            let json = serde_json::to_value(benefit).unwrap();
            assert_eq!(json, serde_json::Value::String(benefit.as_str().into()));
        }
    }

    #[test]
    fn test_tracked_excludes_aah() {
        assert!(!BenefitId::tracked().contains(&BenefitId::Aah));
        assert_eq!(BenefitId::tracked().len(), BenefitId::all().len() - 1);
    }

    #[test]
    fn test_depcom_shapes() {
        assert!(Depcom::new("75056").is_some());
        assert!(Depcom::new("2A004").is_some());
        assert!(Depcom::new("2a004").is_none());
        assert!(Depcom::new("7505").is_none());
        assert!(Depcom::new("750561").is_none());
        assert_eq!(Depcom::default().as_str(), "60100");
    }
}
