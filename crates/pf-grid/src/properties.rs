//! Property tags and extractors.
//!
//! Requested property names resolve once per request onto this closed
//! enumeration; each tag knows its dimension family and how to extract
//! itself from a resolved equilibrium.

use pf_core::units::OutputQuantity;
use pf_flash::{Equilibrium, EquilibriumProps, FlashResult};
use pf_fluids::{thermal_conductivity, viscosity, MixtureModel};

/// Closed enumeration of the properties a request may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyTag {
    Temperature,
    Pressure,
    Density,
    LiquidDensity,
    VaporDensity,
    VaporFraction,
    InternalEnergy,
    Enthalpy,
    Entropy,
    Cv,
    Cp,
    SoundSpeed,
    Viscosity,
    ThermalConductivity,
    KinematicViscosity,
    ThermalDiffusivity,
    PrandtlNumber,
    CompressibilityFactor,
    IsothermalCompressibility,
    VolumeExpansivity,
    JouleThomsonCoefficient,
    MolarMass,
    CriticalTemperature,
    CriticalPressure,
    CriticalDensity,
    Phase,
    LiquidComposition,
    VaporComposition,
}

/// Extracted value of one property at one grid point.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Value(f64),
    /// Per-component values (phase compositions)
    Values(Vec<f64>),
    Text(&'static str),
    /// Requested property has no meaning in this phase regime
    Undefined,
}

impl PropertyTag {
    pub const ALL: [PropertyTag; 28] = [
        PropertyTag::Temperature,
        PropertyTag::Pressure,
        PropertyTag::Density,
        PropertyTag::LiquidDensity,
        PropertyTag::VaporDensity,
        PropertyTag::VaporFraction,
        PropertyTag::InternalEnergy,
        PropertyTag::Enthalpy,
        PropertyTag::Entropy,
        PropertyTag::Cv,
        PropertyTag::Cp,
        PropertyTag::SoundSpeed,
        PropertyTag::Viscosity,
        PropertyTag::ThermalConductivity,
        PropertyTag::KinematicViscosity,
        PropertyTag::ThermalDiffusivity,
        PropertyTag::PrandtlNumber,
        PropertyTag::CompressibilityFactor,
        PropertyTag::IsothermalCompressibility,
        PropertyTag::VolumeExpansivity,
        PropertyTag::JouleThomsonCoefficient,
        PropertyTag::MolarMass,
        PropertyTag::CriticalTemperature,
        PropertyTag::CriticalPressure,
        PropertyTag::CriticalDensity,
        PropertyTag::Phase,
        PropertyTag::LiquidComposition,
        PropertyTag::VaporComposition,
    ];

    /// Request-facing name (snake_case, the wire convention).
    pub fn name(&self) -> &'static str {
        match self {
            PropertyTag::Temperature => "temperature",
            PropertyTag::Pressure => "pressure",
            PropertyTag::Density => "density",
            PropertyTag::LiquidDensity => "liquid_density",
            PropertyTag::VaporDensity => "vapor_density",
            PropertyTag::VaporFraction => "vapor_fraction",
            PropertyTag::InternalEnergy => "internal_energy",
            PropertyTag::Enthalpy => "enthalpy",
            PropertyTag::Entropy => "entropy",
            PropertyTag::Cv => "cv",
            PropertyTag::Cp => "cp",
            PropertyTag::SoundSpeed => "sound_speed",
            PropertyTag::Viscosity => "viscosity",
            PropertyTag::ThermalConductivity => "thermal_conductivity",
            PropertyTag::KinematicViscosity => "kinematic_viscosity",
            PropertyTag::ThermalDiffusivity => "thermal_diffusivity",
            PropertyTag::PrandtlNumber => "prandtl_number",
            PropertyTag::CompressibilityFactor => "compressibility_factor",
            PropertyTag::IsothermalCompressibility => "isothermal_compressibility",
            PropertyTag::VolumeExpansivity => "volume_expansivity",
            PropertyTag::JouleThomsonCoefficient => "joule_thomson_coefficient",
            PropertyTag::MolarMass => "molar_mass",
            PropertyTag::CriticalTemperature => "critical_temperature",
            PropertyTag::CriticalPressure => "critical_pressure",
            PropertyTag::CriticalDensity => "critical_density",
            PropertyTag::Phase => "phase",
            PropertyTag::LiquidComposition => "liquid_composition",
            PropertyTag::VaporComposition => "vapor_composition",
        }
    }

    /// Resolve a request-facing name.
    pub fn parse(name: &str) -> Option<PropertyTag> {
        PropertyTag::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Dimension family, for output unit rendering.
    pub fn output_quantity(&self) -> OutputQuantity {
        use OutputQuantity::*;
        match self {
            PropertyTag::Temperature => Temperature,
            PropertyTag::Pressure | PropertyTag::CriticalPressure => Pressure,
            PropertyTag::Density
            | PropertyTag::LiquidDensity
            | PropertyTag::VaporDensity
            | PropertyTag::CriticalDensity => MassDensity,
            PropertyTag::InternalEnergy | PropertyTag::Enthalpy => MolarEnergy,
            PropertyTag::Entropy | PropertyTag::Cv | PropertyTag::Cp => MolarEntropy,
            PropertyTag::SoundSpeed => Velocity,
            PropertyTag::Viscosity => Viscosity,
            PropertyTag::ThermalConductivity => ThermalConductivity,
            PropertyTag::KinematicViscosity | PropertyTag::ThermalDiffusivity => Diffusivity,
            PropertyTag::IsothermalCompressibility => ReciprocalPressure,
            PropertyTag::VolumeExpansivity => ReciprocalTemperature,
            PropertyTag::JouleThomsonCoefficient => JouleThomson,
            PropertyTag::MolarMass => MolarMass,
            PropertyTag::CriticalTemperature => TemperatureAbsolute,
            PropertyTag::VaporFraction
            | PropertyTag::CompressibilityFactor
            | PropertyTag::PrandtlNumber
            | PropertyTag::Phase
            | PropertyTag::LiquidComposition
            | PropertyTag::VaporComposition => Dimensionless,
        }
    }

    /// Extract this property from a resolved equilibrium.
    pub fn extract(
        &self,
        model: &MixtureModel,
        eq: &Equilibrium,
        props: &EquilibriumProps,
    ) -> FlashResult<PropertyValue> {
        use PropertyValue::*;
        let feed = model.feed();
        let m_feed = model.molar_mass(feed);

        let value = match self {
            PropertyTag::Temperature => Value(eq.t),
            PropertyTag::Pressure => Value(eq.p),
            PropertyTag::Density => Value(props.d * m_feed),
            PropertyTag::LiquidDensity => match &eq.split {
                Some(split) => Value(split.d_liq * model.molar_mass(&split.x)),
                None => Undefined,
            },
            PropertyTag::VaporDensity => match &eq.split {
                Some(split) => Value(split.d_vap * model.molar_mass(&split.y)),
                None => Undefined,
            },
            PropertyTag::VaporFraction => match &eq.split {
                Some(split) => Value(split.vapor_fraction),
                None => Undefined,
            },
            PropertyTag::InternalEnergy => Value(props.u),
            PropertyTag::Enthalpy => Value(props.h),
            PropertyTag::Entropy => Value(props.s),
            PropertyTag::Cv => opt(props.cv),
            PropertyTag::Cp => opt(props.cp),
            PropertyTag::SoundSpeed => opt(props.w),
            PropertyTag::Viscosity => Value(bulk_viscosity(model, eq)?),
            PropertyTag::ThermalConductivity => Value(bulk_conductivity(model, eq)?),
            PropertyTag::KinematicViscosity => {
                Value(bulk_viscosity(model, eq)? / (props.d * m_feed))
            }
            PropertyTag::ThermalDiffusivity => match props.cp {
                Some(cp) => {
                    let rho_mass = props.d * m_feed;
                    let cp_mass = cp / m_feed;
                    Value(bulk_conductivity(model, eq)? / (rho_mass * cp_mass))
                }
                None => Undefined,
            },
            PropertyTag::PrandtlNumber => match props.cp {
                Some(cp) => {
                    let cp_mass = cp / m_feed;
                    Value(bulk_viscosity(model, eq)? * cp_mass / bulk_conductivity(model, eq)?)
                }
                None => Undefined,
            },
            PropertyTag::CompressibilityFactor => Value(props.z),
            PropertyTag::IsothermalCompressibility => opt(props.kappa_t),
            PropertyTag::VolumeExpansivity => opt(props.beta_v),
            PropertyTag::JouleThomsonCoefficient => opt(props.joule_thomson),
            PropertyTag::MolarMass => Value(m_feed),
            PropertyTag::CriticalTemperature => Value(model.t_reduce(feed)),
            PropertyTag::CriticalPressure => Value(model.p_crit_mix(feed)),
            PropertyTag::CriticalDensity => Value(model.rho_reduce(feed) * m_feed),
            PropertyTag::Phase => Text(eq.label.as_str()),
            PropertyTag::LiquidComposition => match &eq.split {
                Some(split) => Values(split.x.clone()),
                None => Undefined,
            },
            PropertyTag::VaporComposition => match &eq.split {
                Some(split) => Values(split.y.clone()),
                None => Undefined,
            },
        };
        Ok(value)
    }
}

fn opt(v: Option<f64>) -> PropertyValue {
    match v {
        Some(v) => PropertyValue::Value(v),
        None => PropertyValue::Undefined,
    }
}

/// Bulk viscosity: single-phase value, or the vapor-fraction-weighted phase
/// values in the two-phase region.
fn bulk_viscosity(model: &MixtureModel, eq: &Equilibrium) -> FlashResult<f64> {
    match &eq.split {
        None => Ok(viscosity(model, eq.t, eq.density, model.feed())?),
        Some(split) => {
            let q = split.vapor_fraction;
            let eta_l = viscosity(model, eq.t, split.d_liq, &split.x)?;
            let eta_v = viscosity(model, eq.t, split.d_vap, &split.y)?;
            Ok(q * eta_v + (1.0 - q) * eta_l)
        }
    }
}

fn bulk_conductivity(model: &MixtureModel, eq: &Equilibrium) -> FlashResult<f64> {
    match &eq.split {
        None => Ok(thermal_conductivity(model, eq.t, eq.density, model.feed())?),
        Some(split) => {
            let q = split.vapor_fraction;
            let lam_l = thermal_conductivity(model, eq.t, split.d_liq, &split.x)?;
            let lam_v = thermal_conductivity(model, eq.t, split.d_vap, &split.y)?;
            Ok(q * lam_v + (1.0 - q) * lam_l)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for tag in PropertyTag::ALL {
            assert_eq!(PropertyTag::parse(tag.name()), Some(tag));
        }
        assert_eq!(PropertyTag::parse("not_a_property"), None);
    }

    #[test]
    fn phase_only_properties_are_undefined_single_phase() {
        use pf_flash::{pt_flash, FlashOptions};
        use pf_fluids::{Composition, FluidId};

        let comp = Composition::pure(FluidId::Nitrogen);
        let model = MixtureModel::new(&comp).unwrap();
        let eq = pt_flash(&model, 300.0, 1.0e5, &FlashOptions::default()).unwrap();
        let props = eq.props(&model).unwrap();

        assert_eq!(
            PropertyTag::VaporFraction
                .extract(&model, &eq, &props)
                .unwrap(),
            PropertyValue::Undefined
        );
        assert!(matches!(
            PropertyTag::Cp.extract(&model, &eq, &props).unwrap(),
            PropertyValue::Value(_)
        ));
    }
}
