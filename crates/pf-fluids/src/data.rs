//! Embedded component data bank.
//!
//! Per-fluid critical/reducing parameters, acentric factors, ideal-gas heat
//! capacity coefficients, Lennard-Jones parameters for the transport
//! correlations, and binary interaction parameters for the mixture reducing
//! functions. All values are molar SI (K, Pa, mol/m3, kg/mol).

use crate::fluid::FluidId;

/// Pure-component record.
#[derive(Debug, Clone, Copy)]
pub struct FluidRecord {
    pub id: FluidId,
    /// Molar mass [kg/mol]
    pub molar_mass: f64,
    /// Critical temperature [K]
    pub t_crit: f64,
    /// Critical pressure [Pa]
    pub p_crit: f64,
    /// Critical molar density [mol/m3]
    pub rho_crit: f64,
    /// Acentric factor [-]
    pub acentric: f64,
    /// Triple-point temperature [K]; lower bound of the valid range
    pub t_triple: f64,
    /// Upper temperature bound of the valid range [K]
    pub t_max: f64,
    /// Upper pressure bound of the valid range [Pa]
    pub p_max: f64,
    /// Ideal-gas heat capacity cp0/R = c0 + c1*T + c2*T^2 (T in K)
    pub cp0: [f64; 3],
    /// Lennard-Jones collision diameter [Å]
    pub lj_sigma: f64,
    /// Lennard-Jones well depth epsilon/k [K]
    pub lj_epsilon: f64,
}

static RECORDS: [FluidRecord; 12] = [
    FluidRecord {
        id: FluidId::Methane,
        molar_mass: 16.0428e-3,
        t_crit: 190.564,
        p_crit: 4.5992e6,
        rho_crit: 10_139.1,
        acentric: 0.011_42,
        t_triple: 90.694,
        t_max: 625.0,
        p_max: 100.0e6,
        cp0: [3.40, 3.0e-3, 0.0],
        lj_sigma: 3.758,
        lj_epsilon: 148.6,
    },
    FluidRecord {
        id: FluidId::Nitrogen,
        molar_mass: 28.0134e-3,
        t_crit: 126.192,
        p_crit: 3.3958e6,
        rho_crit: 11_183.9,
        acentric: 0.0372,
        t_triple: 63.151,
        t_max: 2000.0,
        p_max: 220.0e6,
        cp0: [3.49, 2.0e-4, 0.0],
        lj_sigma: 3.798,
        lj_epsilon: 71.4,
    },
    FluidRecord {
        id: FluidId::Oxygen,
        molar_mass: 31.9988e-3,
        t_crit: 154.581,
        p_crit: 5.043e6,
        rho_crit: 13_630.0,
        acentric: 0.0222,
        t_triple: 54.361,
        t_max: 2000.0,
        p_max: 82.0e6,
        cp0: [3.45, 4.0e-4, 0.0],
        lj_sigma: 3.467,
        lj_epsilon: 106.7,
    },
    FluidRecord {
        id: FluidId::Argon,
        molar_mass: 39.948e-3,
        t_crit: 150.687,
        p_crit: 4.863e6,
        rho_crit: 13_407.4,
        acentric: -0.002_19,
        t_triple: 83.806,
        t_max: 2000.0,
        p_max: 1000.0e6,
        cp0: [2.5, 0.0, 0.0],
        lj_sigma: 3.542,
        lj_epsilon: 93.3,
    },
    FluidRecord {
        id: FluidId::CarbonDioxide,
        molar_mass: 44.0098e-3,
        t_crit: 304.1282,
        p_crit: 7.3773e6,
        rho_crit: 10_624.9,
        acentric: 0.223_94,
        t_triple: 216.592,
        t_max: 1100.0,
        p_max: 800.0e6,
        cp0: [2.85, 6.2e-3, -2.2e-6],
        lj_sigma: 3.941,
        lj_epsilon: 195.2,
    },
    FluidRecord {
        id: FluidId::CarbonMonoxide,
        molar_mass: 28.0101e-3,
        t_crit: 132.86,
        p_crit: 3.494e6,
        rho_crit: 10_850.0,
        acentric: 0.0497,
        t_triple: 68.16,
        t_max: 500.0,
        p_max: 100.0e6,
        cp0: [3.48, 2.2e-4, 0.0],
        lj_sigma: 3.690,
        lj_epsilon: 91.7,
    },
    FluidRecord {
        id: FluidId::Ethane,
        molar_mass: 30.069e-3,
        t_crit: 305.322,
        p_crit: 4.8722e6,
        rho_crit: 6_856.9,
        acentric: 0.0995,
        t_triple: 90.368,
        t_max: 675.0,
        p_max: 900.0e6,
        cp0: [2.1, 1.45e-2, -3.0e-6],
        lj_sigma: 4.443,
        lj_epsilon: 215.7,
    },
    FluidRecord {
        id: FluidId::Propane,
        molar_mass: 44.0956e-3,
        t_crit: 369.89,
        p_crit: 4.2512e6,
        rho_crit: 5_000.0,
        acentric: 0.1521,
        t_triple: 85.525,
        t_max: 650.0,
        p_max: 1000.0e6,
        cp0: [1.8, 2.4e-2, -5.0e-6],
        lj_sigma: 5.118,
        lj_epsilon: 237.1,
    },
    FluidRecord {
        id: FluidId::NButane,
        molar_mass: 58.1222e-3,
        t_crit: 425.125,
        p_crit: 3.796e6,
        rho_crit: 3_922.8,
        acentric: 0.201,
        t_triple: 134.895,
        t_max: 575.0,
        p_max: 200.0e6,
        cp0: [2.2, 3.2e-2, -6.0e-6],
        lj_sigma: 5.278,
        lj_epsilon: 330.0,
    },
    FluidRecord {
        id: FluidId::Water,
        molar_mass: 18.0153e-3,
        t_crit: 647.096,
        p_crit: 22.064e6,
        rho_crit: 17_873.7,
        acentric: 0.3443,
        t_triple: 273.16,
        t_max: 1273.0,
        p_max: 1000.0e6,
        cp0: [3.74, 8.0e-4, 2.0e-7],
        lj_sigma: 2.641,
        lj_epsilon: 809.1,
    },
    FluidRecord {
        id: FluidId::HydrogenSulfide,
        molar_mass: 34.0809e-3,
        t_crit: 373.1,
        p_crit: 9.0e6,
        rho_crit: 10_190.0,
        acentric: 0.1005,
        t_triple: 187.7,
        t_max: 760.0,
        p_max: 170.0e6,
        cp0: [3.8, 1.0e-3, 0.0],
        lj_sigma: 3.623,
        lj_epsilon: 301.1,
    },
    FluidRecord {
        id: FluidId::Ammonia,
        molar_mass: 17.0305e-3,
        t_crit: 405.4,
        p_crit: 11.3339e6,
        rho_crit: 13_211.8,
        acentric: 0.256_01,
        t_triple: 195.495,
        t_max: 700.0,
        p_max: 1000.0e6,
        cp0: [3.25, 3.0e-3, 0.0],
        lj_sigma: 2.900,
        lj_epsilon: 558.3,
    },
];

/// Look up the record for a fluid.
pub fn record(id: FluidId) -> &'static FluidRecord {
    RECORDS
        .iter()
        .find(|r| r.id == id)
        .expect("every FluidId has a record")
}

/// Binary interaction parameter for the reducing-temperature rule.
///
/// `Tc_ij = (1 - kt_ij) * sqrt(Tc_i * Tc_j)`; pairs absent from the table use
/// `kt = 0`. Symmetric.
pub fn binary_kt(a: FluidId, b: FluidId) -> f64 {
    use FluidId::*;
    const TABLE: [(FluidId, FluidId, f64); 6] = [
        (CarbonDioxide, Nitrogen, 0.007),
        (CarbonDioxide, Methane, 0.012),
        (Methane, Nitrogen, 0.003),
        (Methane, Ethane, 0.003),
        (Ethane, Propane, 0.002),
        (CarbonDioxide, HydrogenSulfide, 0.005),
    ];
    for (x, y, kt) in TABLE {
        if (x == a && y == b) || (x == b && y == a) {
            return kt;
        }
    }
    0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_fluid_has_a_record() {
        for id in FluidId::ALL {
            let r = record(id);
            assert_eq!(r.id, id);
            assert!(r.t_crit > r.t_triple);
            assert!(r.p_crit > 0.0);
            assert!(r.rho_crit > 0.0);
            assert!(r.molar_mass > 0.0);
        }
    }

    #[test]
    fn binary_parameters_are_symmetric() {
        for a in FluidId::ALL {
            for b in FluidId::ALL {
                assert_eq!(binary_kt(a, b), binary_kt(b, a));
            }
        }
    }

    #[test]
    fn co2_record_values() {
        let r = record(FluidId::CarbonDioxide);
        assert!((r.t_crit - 304.1282).abs() < 1e-6);
        assert!((r.molar_mass - 0.0440098).abs() < 1e-9);
    }
}
