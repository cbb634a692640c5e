// pf-core/src/units.rs

use uom::si::f64::{
    Pressure as UomPressure, ThermodynamicTemperature as UomThermodynamicTemperature,
};

// Public canonical unit types (SI, f64)
pub type Pressure = UomPressure;
pub type Temperature = UomThermodynamicTemperature;

#[inline]
pub fn pa(v: f64) -> Pressure {
    use uom::si::pressure::pascal;
    Pressure::new::<pascal>(v)
}

#[inline]
pub fn bar(v: f64) -> Pressure {
    use uom::si::pressure::bar;
    Pressure::new::<bar>(v)
}

#[inline]
pub fn k(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::kelvin;
    Temperature::new::<kelvin>(v)
}

#[inline]
pub fn celsius(v: f64) -> Temperature {
    use uom::si::thermodynamic_temperature::degree_celsius;
    Temperature::new::<degree_celsius>(v)
}

pub mod constants {
    /// Universal gas constant [J/(mol K)], CODATA 2018 exact value.
    pub const R: f64 = 8.314_462_618_153_24;

    /// Standard atmosphere [Pa].
    pub const P_ATM: f64 = 101_325.0;

    /// 0 degrees Celsius [K].
    pub const T_ZERO_C: f64 = 273.15;
}

/// Output unit convention applied uniformly to a response.
///
/// Request inputs are always temperature in degrees Celsius and pressure in
/// bar; the unit system selects how computed properties are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
pub enum UnitsSystem {
    #[default]
    Si,
    Cgs,
}

/// Dimension family of a reported property.
///
/// Internal solver values are molar SI (K, Pa, mol/m3, J/mol); this
/// enumeration is the seam where they are rendered into the unit system the
/// request asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputQuantity {
    /// Internal K, reported in degrees Celsius
    Temperature,
    /// Internal K, reported in K (critical temperature etc.)
    TemperatureAbsolute,
    /// Internal Pa, reported in bar
    Pressure,
    /// Internal kg/m3
    MassDensity,
    /// Internal J/mol
    MolarEnergy,
    /// Internal J/(mol K)
    MolarEntropy,
    /// Internal m/s
    Velocity,
    /// Internal Pa s
    Viscosity,
    /// Internal W/(m K)
    ThermalConductivity,
    /// Internal m2/s (kinematic viscosity, thermal diffusivity)
    Diffusivity,
    /// Internal 1/Pa, reported in 1/bar
    ReciprocalPressure,
    /// Internal 1/K
    ReciprocalTemperature,
    /// Internal K/Pa, reported in K/bar
    JouleThomson,
    /// Internal kg/mol, reported in g/mol
    MolarMass,
    Dimensionless,
}

/// Render an internal SI value into the requested unit system.
///
/// Returns the converted value and its unit label.
pub fn render_output(q: OutputQuantity, v: f64, system: UnitsSystem) -> (f64, &'static str) {
    use OutputQuantity::*;
    const CAL: f64 = 4.184;
    match (q, system) {
        (Temperature, _) => (v - constants::T_ZERO_C, "C"),
        (TemperatureAbsolute, _) => (v, "K"),
        (Pressure, _) => (v / 1e5, "bar"),
        (MassDensity, UnitsSystem::Si) => (v, "kg/m3"),
        (MassDensity, UnitsSystem::Cgs) => (v / 1e3, "g/cm3"),
        (MolarEnergy, UnitsSystem::Si) => (v, "J/mol"),
        (MolarEnergy, UnitsSystem::Cgs) => (v / CAL, "cal/mol"),
        (MolarEntropy, UnitsSystem::Si) => (v, "J/(mol·K)"),
        (MolarEntropy, UnitsSystem::Cgs) => (v / CAL, "cal/(mol·K)"),
        (Velocity, UnitsSystem::Si) => (v, "m/s"),
        (Velocity, UnitsSystem::Cgs) => (v * 1e2, "cm/s"),
        (Viscosity, UnitsSystem::Si) => (v * 1e6, "µPa·s"),
        (Viscosity, UnitsSystem::Cgs) => (v * 1e7, "µP"),
        (ThermalConductivity, UnitsSystem::Si) => (v, "W/(m·K)"),
        (ThermalConductivity, UnitsSystem::Cgs) => (v / (CAL * 1e2), "cal/(s·cm·K)"),
        (Diffusivity, UnitsSystem::Si) => (v, "m2/s"),
        (Diffusivity, UnitsSystem::Cgs) => (v * 1e4, "cm2/s"),
        (ReciprocalPressure, _) => (v * 1e5, "1/bar"),
        (ReciprocalTemperature, _) => (v, "1/K"),
        (JouleThomson, _) => (v * 1e5, "K/bar"),
        (MolarMass, _) => (v * 1e3, "g/mol"),
        (Dimensionless, _) => (v, "-"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constructors_smoke() {
        use uom::si::pressure::pascal;
        use uom::si::thermodynamic_temperature::kelvin;
        assert!((pa(101_325.0).get::<pascal>() - 101_325.0).abs() < 1e-9);
        assert!((bar(1.0).get::<pascal>() - 1e5).abs() < 1e-6);
        assert!((k(300.0).get::<kelvin>() - 300.0).abs() < 1e-12);
        assert!((celsius(0.0).get::<kelvin>() - 273.15).abs() < 1e-9);
    }

    #[test]
    fn density_rendering() {
        let (v, u) = render_output(OutputQuantity::MassDensity, 999.7, UnitsSystem::Cgs);
        assert!((v - 0.9997).abs() < 1e-12);
        assert_eq!(u, "g/cm3");

        let (v, u) = render_output(OutputQuantity::MassDensity, 999.7, UnitsSystem::Si);
        assert!((v - 999.7).abs() < 1e-12);
        assert_eq!(u, "kg/m3");
    }

    #[test]
    fn temperature_reported_in_celsius() {
        let (v, u) = render_output(OutputQuantity::Temperature, 293.15, UnitsSystem::Si);
        assert!((v - 20.0).abs() < 1e-9);
        assert_eq!(u, "C");
    }

    #[test]
    fn pressure_reported_in_bar() {
        let (v, _) = render_output(OutputQuantity::Pressure, 5e6, UnitsSystem::Cgs);
        assert!((v - 50.0).abs() < 1e-9);
    }
}
