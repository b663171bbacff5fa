//! # Property Vocabularies
//!
//! The fixed key sets recognized in each section of a material document.
//! Declaration order is the canonical order: the loader visits keys in this
//! order, the report emits rows in this order (which also fixes citation
//! numbering), and `BTreeMap`s keyed by these enums iterate in this order.

use serde::{Deserialize, Serialize};

/// Fields recognized inside every leaf property object
pub const PROPERTY_FIELDS: [&str; 11] = [
    "unit",
    "value",
    "value_laurent_poly",
    "value_table",
    "dependent_variable_print_name",
    "dependent_variable_print_symbol",
    "dependent_variable_unit",
    "print_name",
    "reference",
    "uncertainty",
    "print_symbol",
];

/// Top-level document sections
pub const COMPOSITION_SECTION: &str = "composition";
pub const PHASES_SECTION: &str = "single_phase_properties";
pub const THERMOPHYSICAL_SECTION: &str = "thermophysical_properties";
pub const CONDITIONS_SECTION: &str = "solidification_conditions";
pub const MICROSTRUCTURE_SECTION: &str = "solidification_microstructure";

/// Thermophysical properties of the material as a whole.
///
/// # Example
/// ```
/// use mist_core::schema::ThermophysicalProperty;
///
/// assert_eq!(ThermophysicalProperty::Density.key(), "density");
/// assert_eq!(
///     ThermophysicalProperty::from_key("solidus_eutectic_temperature"),
///     Some(ThermophysicalProperty::SolidusEutecticTemperature)
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermophysicalProperty {
    Density,
    SpecificHeatSolid,
    SpecificHeatLiquid,
    ThermalConductivitySolid,
    ThermalConductivityLiquid,
    DynamicViscosity,
    ThermalExpansion,
    LatentHeatFusion,
    LatentHeatVaporization,
    Emissivity,
    MolecularMass,
    LiquidusTemperature,
    LogVaporPressure,
    LaserAbsorption,
    SolidusEutecticTemperature,
    HallPetchCoefficient,
    InterfaceResponseFunction,
}

impl ThermophysicalProperty {
    /// All thermophysical properties in canonical order
    pub const ALL: [ThermophysicalProperty; 17] = [
        ThermophysicalProperty::Density,
        ThermophysicalProperty::SpecificHeatSolid,
        ThermophysicalProperty::SpecificHeatLiquid,
        ThermophysicalProperty::ThermalConductivitySolid,
        ThermophysicalProperty::ThermalConductivityLiquid,
        ThermophysicalProperty::DynamicViscosity,
        ThermophysicalProperty::ThermalExpansion,
        ThermophysicalProperty::LatentHeatFusion,
        ThermophysicalProperty::LatentHeatVaporization,
        ThermophysicalProperty::Emissivity,
        ThermophysicalProperty::MolecularMass,
        ThermophysicalProperty::LiquidusTemperature,
        ThermophysicalProperty::LogVaporPressure,
        ThermophysicalProperty::LaserAbsorption,
        ThermophysicalProperty::SolidusEutecticTemperature,
        ThermophysicalProperty::HallPetchCoefficient,
        ThermophysicalProperty::InterfaceResponseFunction,
    ];

    /// Key used in the source document
    pub fn key(&self) -> &'static str {
        match self {
            ThermophysicalProperty::Density => "density",
            ThermophysicalProperty::SpecificHeatSolid => "specific_heat_solid",
            ThermophysicalProperty::SpecificHeatLiquid => "specific_heat_liquid",
            ThermophysicalProperty::ThermalConductivitySolid => "thermal_conductivity_solid",
            ThermophysicalProperty::ThermalConductivityLiquid => "thermal_conductivity_liquid",
            ThermophysicalProperty::DynamicViscosity => "dynamic_viscosity",
            ThermophysicalProperty::ThermalExpansion => "thermal_expansion",
            ThermophysicalProperty::LatentHeatFusion => "latent_heat_fusion",
            ThermophysicalProperty::LatentHeatVaporization => "latent_heat_vaporization",
            ThermophysicalProperty::Emissivity => "emissivity",
            ThermophysicalProperty::MolecularMass => "molecular_mass",
            ThermophysicalProperty::LiquidusTemperature => "liquidus_temperature",
            ThermophysicalProperty::LogVaporPressure => "log_vapor_pressure",
            ThermophysicalProperty::LaserAbsorption => "laser_absorption",
            ThermophysicalProperty::SolidusEutecticTemperature => "solidus_eutectic_temperature",
            ThermophysicalProperty::HallPetchCoefficient => "hall_petch_coefficient",
            ThermophysicalProperty::InterfaceResponseFunction => "interface_response_function",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }
}

/// Properties of a single phase (e.g. liquid, FCC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseProperty {
    EutecticContactAngle,
    GibbsThomsonCoeff,
    LiquidusSlope,
    SolubilityLimit,
    /// Indexed by solute element
    SoluteDiffusivities,
    /// Indexed by solute element
    SoluteMisfitStrains,
    TaylorFactor,
    ShearModulusBaseElement,
    BurgersVectorBaseElement,
    PoissonRatioBaseElement,
}

impl PhaseProperty {
    /// All phase properties in canonical order
    pub const ALL: [PhaseProperty; 10] = [
        PhaseProperty::EutecticContactAngle,
        PhaseProperty::GibbsThomsonCoeff,
        PhaseProperty::LiquidusSlope,
        PhaseProperty::SolubilityLimit,
        PhaseProperty::SoluteDiffusivities,
        PhaseProperty::SoluteMisfitStrains,
        PhaseProperty::TaylorFactor,
        PhaseProperty::ShearModulusBaseElement,
        PhaseProperty::BurgersVectorBaseElement,
        PhaseProperty::PoissonRatioBaseElement,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            PhaseProperty::EutecticContactAngle => "eutectic_contact_angle",
            PhaseProperty::GibbsThomsonCoeff => "gibbs_thomson_coeff",
            PhaseProperty::LiquidusSlope => "liquidus_slope",
            PhaseProperty::SolubilityLimit => "solubility_limit",
            PhaseProperty::SoluteDiffusivities => "solute_diffusivities",
            PhaseProperty::SoluteMisfitStrains => "solute_misfit_strains",
            PhaseProperty::TaylorFactor => "taylor_factor",
            PhaseProperty::ShearModulusBaseElement => "shear_modulus_base_element",
            PhaseProperty::BurgersVectorBaseElement => "burgers_vector_base_element",
            PhaseProperty::PoissonRatioBaseElement => "poisson_ratio_base_element",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.key() == key)
    }

    /// Whether the document nests one property per solute element under this key
    pub fn is_solute_indexed(&self) -> bool {
        matches!(self, PhaseProperty::SoluteDiffusivities | PhaseProperty::SoluteMisfitStrains)
    }
}

/// Process conditions under which the microstructure formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolidificationCondition {
    CoolingRate,
    ThermalGradient,
    SolidificationVelocity,
}

impl SolidificationCondition {
    pub const ALL: [SolidificationCondition; 3] = [
        SolidificationCondition::CoolingRate,
        SolidificationCondition::ThermalGradient,
        SolidificationCondition::SolidificationVelocity,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SolidificationCondition::CoolingRate => "cooling_rate",
            SolidificationCondition::ThermalGradient => "thermal_gradient",
            SolidificationCondition::SolidificationVelocity => "solidification_velocity",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

/// Scalar features of the solidified microstructure.
///
/// Phase fractions are keyed by phase name and live outside this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MicrostructureFeature {
    PrimaryDendriteArmSpacing,
    SecondaryDendriteArmSpacing,
    EutecticSpacing,
    GrainSize,
}

impl MicrostructureFeature {
    pub const ALL: [MicrostructureFeature; 4] = [
        MicrostructureFeature::PrimaryDendriteArmSpacing,
        MicrostructureFeature::SecondaryDendriteArmSpacing,
        MicrostructureFeature::EutecticSpacing,
        MicrostructureFeature::GrainSize,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            MicrostructureFeature::PrimaryDendriteArmSpacing => "primary_dendrite_arm_spacing",
            MicrostructureFeature::SecondaryDendriteArmSpacing => "secondary_dendrite_arm_spacing",
            MicrostructureFeature::EutecticSpacing => "eutectic_spacing",
            MicrostructureFeature::GrainSize => "grain_size",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// Key of the per-phase fraction mapping inside the microstructure section
pub const PHASE_FRACTIONS_KEY: &str = "phase_fractions";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_round_trip_through_lookup() {
        for p in ThermophysicalProperty::ALL {
            assert_eq!(ThermophysicalProperty::from_key(p.key()), Some(p));
        }
        for p in PhaseProperty::ALL {
            assert_eq!(PhaseProperty::from_key(p.key()), Some(p));
        }
        for c in SolidificationCondition::ALL {
            assert_eq!(SolidificationCondition::from_key(c.key()), Some(c));
        }
        for f in MicrostructureFeature::ALL {
            assert_eq!(MicrostructureFeature::from_key(f.key()), Some(f));
        }
        assert_eq!(ThermophysicalProperty::from_key("color"), None);
    }

    #[test]
    fn test_ordering_matches_declaration() {
        let mut sorted = ThermophysicalProperty::ALL;
        sorted.sort();
        assert_eq!(sorted, ThermophysicalProperty::ALL);
        assert!(ThermophysicalProperty::Density < ThermophysicalProperty::InterfaceResponseFunction);
    }

    #[test]
    fn test_solute_indexed_phase_properties() {
        let indexed: Vec<PhaseProperty> = PhaseProperty::ALL
            .into_iter()
            .filter(PhaseProperty::is_solute_indexed)
            .collect();
        assert_eq!(
            indexed,
            vec![PhaseProperty::SoluteDiffusivities, PhaseProperty::SoluteMisfitStrains]
        );
    }

    #[test]
    fn test_serde_names_match_document_keys() {
        let json = serde_json::to_string(&ThermophysicalProperty::LatentHeatFusion).unwrap();
        assert_eq!(json, "\"latent_heat_fusion\"");
    }
}
