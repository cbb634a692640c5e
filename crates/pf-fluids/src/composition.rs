//! Mixture composition (pure fluids or multicomponent feeds).

use crate::error::{FluidError, FluidResult};
use crate::fluid::FluidId;
use pf_core::{nearly_equal, Tolerances};

/// Tolerance on the mole-fraction sum at the request boundary.
pub const FRACTION_SUM_TOL: f64 = 1e-6;

/// Feed composition defined by mole fractions.
///
/// Fractions must be non-negative and sum to 1.0 within [`FRACTION_SUM_TOL`];
/// after acceptance the stored fractions are renormalized exactly. Immutable
/// once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct Composition {
    items: Vec<(FluidId, f64)>,
}

impl Composition {
    /// Create a pure-fluid composition.
    pub fn pure(fluid: FluidId) -> Self {
        Self {
            items: vec![(fluid, 1.0)],
        }
    }

    /// Create a composition from mole fractions.
    ///
    /// Rejects empty input, non-finite or negative fractions, and sums away
    /// from 1.0 by more than [`FRACTION_SUM_TOL`].
    pub fn new(fractions: Vec<(FluidId, f64)>) -> FluidResult<Self> {
        if fractions.is_empty() {
            return Err(FluidError::InvalidComposition {
                what: "empty composition".into(),
            });
        }

        let mut sum = 0.0;
        for (fluid, frac) in &fractions {
            if !frac.is_finite() {
                return Err(FluidError::InvalidComposition {
                    what: format!("non-finite mole fraction for {}", fluid.key()),
                });
            }
            if *frac < 0.0 {
                return Err(FluidError::InvalidComposition {
                    what: format!("negative mole fraction for {}", fluid.key()),
                });
            }
            sum += frac;
        }

        if (sum - 1.0).abs() > FRACTION_SUM_TOL {
            return Err(FluidError::InvalidComposition {
                what: format!("mole fractions sum to {sum}, expected 1"),
            });
        }

        for i in 0..fractions.len() {
            for j in (i + 1)..fractions.len() {
                if fractions[i].0 == fractions[j].0 {
                    return Err(FluidError::InvalidComposition {
                        what: format!("duplicate fluid {}", fractions[i].0.key()),
                    });
                }
            }
        }

        // Renormalize exactly so the solvers see sum == 1
        let items: Vec<(FluidId, f64)> = fractions
            .into_iter()
            .map(|(fluid, frac)| (fluid, frac / sum))
            .collect();

        Ok(Self { items })
    }

    /// Number of components in the feed.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Component fluids, in feed order.
    pub fn fluids(&self) -> Vec<FluidId> {
        self.items.iter().map(|(fluid, _)| *fluid).collect()
    }

    /// Mole fractions, in feed order.
    pub fn fractions(&self) -> Vec<f64> {
        self.items.iter().map(|(_, frac)| *frac).collect()
    }

    /// Mole fraction of a fluid (0.0 if not present).
    pub fn mole_fraction(&self, fluid: FluidId) -> f64 {
        self.items
            .iter()
            .find(|(f, _)| *f == fluid)
            .map(|(_, frac)| *frac)
            .unwrap_or(0.0)
    }

    /// Check if this is a pure-fluid composition.
    ///
    /// Returns `Some(fluid)` if exactly one component carries the whole feed.
    pub fn is_pure(&self) -> Option<FluidId> {
        if self.items.len() == 1 {
            let (fluid, frac) = self.items[0];
            let tol = Tolerances {
                abs: 1e-10,
                rel: 1e-10,
            };
            if nearly_equal(frac, 1.0, tol) {
                return Some(fluid);
            }
        }
        None
    }

    /// Iterate over components with their mole fractions.
    pub fn iter(&self) -> impl Iterator<Item = (FluidId, f64)> + '_ {
        self.items.iter().copied()
    }

    /// Mixture molar mass [kg/mol].
    pub fn molar_mass(&self) -> f64 {
        self.items
            .iter()
            .map(|(fluid, frac)| fluid.molar_mass() * frac)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pure_composition() {
        let comp = Composition::pure(FluidId::CarbonDioxide);
        assert_eq!(comp.is_pure(), Some(FluidId::CarbonDioxide));
        assert_eq!(comp.mole_fraction(FluidId::CarbonDioxide), 1.0);
        assert_eq!(comp.mole_fraction(FluidId::Nitrogen), 0.0);
    }

    #[test]
    fn mixture_accepted_within_tolerance() {
        let comp = Composition::new(vec![
            (FluidId::CarbonDioxide, 0.7),
            (FluidId::Nitrogen, 0.3 + 5e-7),
        ])
        .unwrap();

        let sum: f64 = comp.fractions().iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_sum() {
        let result = Composition::new(vec![
            (FluidId::CarbonDioxide, 0.7),
            (FluidId::Nitrogen, 0.4),
        ]);
        assert!(matches!(
            result,
            Err(FluidError::InvalidComposition { .. })
        ));
    }

    #[test]
    fn rejects_empty() {
        assert!(Composition::new(vec![]).is_err());
    }

    #[test]
    fn rejects_negative_fraction() {
        let result = Composition::new(vec![
            (FluidId::CarbonDioxide, -0.5),
            (FluidId::Nitrogen, 1.5),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_duplicate_fluid() {
        let result = Composition::new(vec![
            (FluidId::Nitrogen, 0.5),
            (FluidId::Nitrogen, 0.5),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn molar_mass_is_mole_weighted() {
        let comp = Composition::new(vec![
            (FluidId::CarbonDioxide, 0.5),
            (FluidId::Nitrogen, 0.5),
        ])
        .unwrap();
        let expected =
            0.5 * FluidId::CarbonDioxide.molar_mass() + 0.5 * FluidId::Nitrogen.molar_mass();
        assert!((comp.molar_mass() - expected).abs() < 1e-15);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn accepted_compositions_sum_to_one(split in 1e-6_f64..1.0_f64) {
            let comp = Composition::new(vec![
                (FluidId::CarbonDioxide, split),
                (FluidId::Nitrogen, 1.0 - split),
            ]);
            prop_assume!(comp.is_ok());
            let sum: f64 = comp.unwrap().fractions().iter().sum();
            prop_assert!((sum - 1.0).abs() < 1e-12);
        }

        #[test]
        fn off_by_more_than_tolerance_rejected(excess in 1e-4_f64..1.0_f64) {
            let result = Composition::new(vec![
                (FluidId::CarbonDioxide, 0.5),
                (FluidId::Nitrogen, 0.5 + excess),
            ]);
            prop_assert!(result.is_err());
        }
    }
}
