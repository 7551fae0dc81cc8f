//! Tolerance bundle governing coincidence, on-line, and parallelism predicates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default distance tolerance.
pub const DEFAULT_DIST: f64 = 1e-6;

/// Default perpendicularity cosine threshold.
pub const DEFAULT_PERP: f64 = 1e-6;

/// A malformed tolerance record.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ToleranceError {
    /// A field was negative.
    #[error("tolerance field must be non-negative: {0}")]
    Negative(&'static str),
    /// A field was NaN.
    #[error("tolerance field is NaN: {0}")]
    NotANumber(&'static str),
    /// `para` was smaller than `perp`, which would make every direction
    /// simultaneously parallel and perpendicular within tolerance.
    #[error("para ({para}) must be >= perp ({perp})")]
    ParaBelowPerp {
        /// The `para` value supplied.
        para: f64,
        /// The `perp` value supplied.
        perp: f64,
    },
}

/// The tolerance quadruple `(dist, dist_sq, perp, para)` that underpins every
/// coincidence, on-line, and parallelism predicate in the kernel.
///
/// `para = 1 - perp` always holds for values produced by [`Tolerance::new`];
/// it is still carried explicitly rather than recomputed everywhere it's
/// used, matching the source's SPAresabs/SPAresrel-style precomputation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    /// Distance tolerance `ε_d`.
    pub dist: f64,
    /// `dist²`, precomputed.
    pub dist_sq: f64,
    /// Perpendicularity cosine threshold `ε_⊥`.
    pub perp: f64,
    /// Parallelism cosine threshold `ε_∥ = 1 - ε_⊥`.
    pub para: f64,
}

impl Tolerance {
    /// The kernel's conventional default: `dist = 1e-6`, `perp = 1e-6`.
    pub const DEFAULT: Self = Self {
        dist: DEFAULT_DIST,
        dist_sq: DEFAULT_DIST * DEFAULT_DIST,
        perp: DEFAULT_PERP,
        para: 1.0 - DEFAULT_PERP,
    };

    /// Build and validate a tolerance record from `dist` and `perp`.
    ///
    /// Fails with [`ToleranceError`] if either field is negative or `NaN`,
    /// or if the derived `para = 1 - perp` would be less than `perp`.
    pub fn new(dist: f64, perp: f64) -> Result<Self, ToleranceError> {
        if dist.is_nan() {
            return Err(ToleranceError::NotANumber("dist"));
        }
        if perp.is_nan() {
            return Err(ToleranceError::NotANumber("perp"));
        }
        if dist < 0.0 {
            return Err(ToleranceError::Negative("dist"));
        }
        if perp < 0.0 {
            return Err(ToleranceError::Negative("perp"));
        }
        let para = 1.0 - perp;
        if para < perp {
            return Err(ToleranceError::ParaBelowPerp { para, perp });
        }
        Ok(Self {
            dist,
            dist_sq: dist * dist,
            perp,
            para,
        })
    }

    /// Two points are coincident iff `|p1 - p2|² <= dist_sq`.
    #[inline]
    pub fn coincident_sq(&self, dist_sq: f64) -> bool {
        dist_sq <= self.dist_sq
    }

    /// A perpendicular distance is "on" the reference entity iff it is
    /// within `dist`.
    #[inline]
    pub fn is_on(&self, perp_dist: f64) -> bool {
        perp_dist.abs() <= self.dist
    }

    /// Two unit directions are parallel iff `|u . v| >= para`.
    #[inline]
    pub fn directions_parallel(&self, dot: f64) -> bool {
        dot.abs() >= self.para
    }

    /// Two unit directions are perpendicular iff `|u . v| <= perp`.
    #[inline]
    pub fn directions_perpendicular(&self, dot: f64) -> bool {
        dot.abs() <= self.perp
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Chord tolerance pair (`ε_t`): governs how finely a primitive
/// tessellator approximates curved geometry. Absolute and relative
/// components combine the way SPAresabs/SPAresrel do; `norm` bounds the
/// angle between a facet's normal and the true surface normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChordTolerance {
    /// Absolute chord deviation allowed.
    pub abs: f64,
    /// Chord deviation allowed, relative to local feature size.
    pub rel: f64,
    /// Maximum facet-normal / surface-normal angular deviation, radians.
    pub norm: f64,
}

impl ChordTolerance {
    /// A reasonably tight default: `abs = 0`, `rel = 0.01`, `norm = 0`.
    pub const DEFAULT: Self = Self {
        abs: 0.0,
        rel: 0.01,
        norm: 0.0,
    };

    /// Effective absolute deviation for a feature of the given magnitude:
    /// `max(abs, magnitude * rel)`.
    #[inline]
    pub fn effective(&self, magnitude: f64) -> f64 {
        self.abs.max(magnitude * self.rel)
    }
}

impl Default for ChordTolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
