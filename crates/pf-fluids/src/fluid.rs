//! Fluid identifiers.

use crate::error::{FluidError, FluidResult};

/// Fluids present in the component data bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FluidId {
    /// Methane (CH₄)
    Methane,
    /// Nitrogen (N₂)
    Nitrogen,
    /// Oxygen (O₂)
    Oxygen,
    /// Argon (Ar)
    Argon,
    /// Carbon dioxide (CO₂)
    CarbonDioxide,
    /// Carbon monoxide (CO)
    CarbonMonoxide,
    /// Ethane
    Ethane,
    /// Propane
    Propane,
    /// n-Butane
    NButane,
    /// Water (H₂O)
    Water,
    /// Hydrogen sulfide (H₂S)
    HydrogenSulfide,
    /// Ammonia (NH₃)
    Ammonia,
}

impl FluidId {
    pub const ALL: [FluidId; 12] = [
        FluidId::Methane,
        FluidId::Nitrogen,
        FluidId::Oxygen,
        FluidId::Argon,
        FluidId::CarbonDioxide,
        FluidId::CarbonMonoxide,
        FluidId::Ethane,
        FluidId::Propane,
        FluidId::NButane,
        FluidId::Water,
        FluidId::HydrogenSulfide,
        FluidId::Ammonia,
    ];

    /// Canonical request key for this fluid.
    pub fn key(&self) -> &'static str {
        match self {
            FluidId::Methane => "METHANE",
            FluidId::Nitrogen => "NITROGEN",
            FluidId::Oxygen => "OXYGEN",
            FluidId::Argon => "ARGON",
            FluidId::CarbonDioxide => "CO2",
            FluidId::CarbonMonoxide => "CO",
            FluidId::Ethane => "ETHANE",
            FluidId::Propane => "PROPANE",
            FluidId::NButane => "BUTANE",
            FluidId::Water => "WATER",
            FluidId::HydrogenSulfide => "H2S",
            FluidId::Ammonia => "AMMONIA",
        }
    }

    /// Resolve a request identifier against the data bank.
    ///
    /// Matching is case-insensitive and accepts both formula and common-name
    /// spellings ("CO2" and "CARBONDIOXIDE", "N2" and "NITROGEN", ...).
    pub fn resolve(name: &str) -> FluidResult<FluidId> {
        let upper = name.trim().to_ascii_uppercase();
        let id = match upper.as_str() {
            "CH4" | "METHANE" => FluidId::Methane,
            "N2" | "NITROGEN" => FluidId::Nitrogen,
            "O2" | "OXYGEN" => FluidId::Oxygen,
            "AR" | "ARGON" => FluidId::Argon,
            "CO2" | "CARBONDIOXIDE" | "CARBON DIOXIDE" => FluidId::CarbonDioxide,
            "CO" | "CARBONMONOXIDE" | "CARBON MONOXIDE" => FluidId::CarbonMonoxide,
            "C2H6" | "ETHANE" => FluidId::Ethane,
            "C3H8" | "PROPANE" => FluidId::Propane,
            "C4H10" | "BUTANE" | "N-BUTANE" | "NBUTANE" => FluidId::NButane,
            "H2O" | "WATER" => FluidId::Water,
            "H2S" | "HYDROGENSULFIDE" | "HYDROGEN SULFIDE" => FluidId::HydrogenSulfide,
            "NH3" | "AMMONIA" => FluidId::Ammonia,
            _ => {
                return Err(FluidError::UnknownFluid {
                    name: name.to_string(),
                })
            }
        };
        Ok(id)
    }

    /// Molar mass [kg/mol].
    pub fn molar_mass(&self) -> f64 {
        crate::data::record(*self).molar_mass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_formula_and_name() {
        assert_eq!(FluidId::resolve("CO2").unwrap(), FluidId::CarbonDioxide);
        assert_eq!(FluidId::resolve("nitrogen").unwrap(), FluidId::Nitrogen);
        assert_eq!(FluidId::resolve(" n-butane ").unwrap(), FluidId::NButane);
    }

    #[test]
    fn resolve_rejects_unknown() {
        let err = FluidId::resolve("R1234yf").unwrap_err();
        assert!(matches!(err, FluidError::UnknownFluid { .. }));
    }

    #[test]
    fn keys_resolve_back() {
        for id in FluidId::ALL {
            assert_eq!(FluidId::resolve(id.key()).unwrap(), id);
        }
    }
}
