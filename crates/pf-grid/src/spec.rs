//! Grid axis specification and point generation.
//!
//! An axis is (from, to, point count, spacing) with inclusive bounds; a
//! degenerate range (from == to) is valid and denotes a single repeated
//! value. Values are canonical solver units; the service layer converts
//! request units before building axes.

use crate::error::{GridError, GridResult};
use std::fmt;

/// Spacing of generated axis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridSpacing {
    #[default]
    Linear,
    Logarithmic,
}

/// One independent-variable axis of a grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxis {
    /// Variable name, for diagnostics and response metadata
    pub name: &'static str,
    pub from: f64,
    pub to: f64,
    /// Number of points along the axis (inclusive bounds)
    pub points: usize,
    pub spacing: GridSpacing,
}

impl GridAxis {
    pub fn new(name: &'static str, from: f64, to: f64, points: usize) -> GridResult<Self> {
        Self::with_spacing(name, from, to, points, GridSpacing::Linear)
    }

    pub fn with_spacing(
        name: &'static str,
        from: f64,
        to: f64,
        points: usize,
        spacing: GridSpacing,
    ) -> GridResult<Self> {
        if !from.is_finite() || !to.is_finite() {
            return Err(GridError::InvalidAxis {
                what: "axis bounds must be finite",
            });
        }
        if points == 0 {
            return Err(GridError::InvalidAxis {
                what: "axis needs at least one point",
            });
        }
        if to < from {
            return Err(GridError::InvalidAxis {
                what: "axis upper bound below lower bound",
            });
        }
        Ok(Self {
            name,
            from,
            to,
            points,
            spacing,
        })
    }

    /// Generate all points along the axis.
    pub fn generate(&self) -> Vec<f64> {
        if self.points == 1 || self.to == self.from {
            return vec![self.from; self.points];
        }
        match self.spacing {
            GridSpacing::Linear => self.generate_linear(),
            GridSpacing::Logarithmic => self.generate_logarithmic(),
        }
    }

    fn generate_linear(&self) -> Vec<f64> {
        let mut points = Vec::with_capacity(self.points);
        let delta = (self.to - self.from) / (self.points - 1) as f64;
        for i in 0..self.points {
            points.push(self.from + i as f64 * delta);
        }
        // Ensure exact endpoint
        points[self.points - 1] = self.to;
        points
    }

    fn generate_logarithmic(&self) -> Vec<f64> {
        // Log spacing needs positive bounds; fall back to linear otherwise
        if self.from <= 0.0 || self.to <= 0.0 {
            return self.generate_linear();
        }
        let mut points = Vec::with_capacity(self.points);
        let log_from = self.from.ln();
        let log_delta = (self.to.ln() - log_from) / (self.points - 1) as f64;
        for i in 0..self.points {
            points.push((log_from + i as f64 * log_delta).exp());
        }
        points[self.points - 1] = self.to;
        points
    }
}

impl fmt::Display for GridAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} to {} ({} points)",
            self.name, self.from, self.to, self.points
        )
    }
}
