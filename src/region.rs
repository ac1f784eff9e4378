//! Axis-aligned rectangles and the capability shared by every spatial feature.
//!
//! Every feature in the simulation (blockages, pumps, gates, regulators, and
//! the domain boundary itself) is a [`Region`] plus some behaviour. Features
//! hold their region by value and expose it through [`SpatialFeature`].

use crate::error::GeometryError;
use crate::rng::DeterministicRng;
use crate::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle.
///
/// Invariant: `left <= right` and `bottom <= top`. Containment is inclusive on
/// all four edges.
///
/// # Example
///
/// ```
/// use ionsim::{Region, Vec2};
///
/// let pump = Region::new(-1.0, 1.0, 9.0, 11.0);
/// assert!(pump.contains(Vec2::new(1.0, 11.0)));
/// assert_eq!(pump.center(), Vec2::new(0.0, 10.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RegionBounds")]
pub struct Region {
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
}

impl Region {
    /// Create a region from its four edges.
    ///
    /// Swapped bounds are reordered so the invariant always holds.
    pub fn new(left: f32, right: f32, bottom: f32, top: f32) -> Self {
        Self {
            left: left.min(right),
            right: left.max(right),
            bottom: bottom.min(top),
            top: bottom.max(top),
        }
    }

    /// Create a region, rejecting non-finite or inverted bounds.
    pub fn try_new(left: f32, right: f32, bottom: f32, top: f32) -> Result<Self, GeometryError> {
        for (name, value) in [("left", left), ("right", right), ("bottom", bottom), ("top", top)] {
            if !value.is_finite() {
                return Err(GeometryError::NonFinite { name, value });
            }
        }
        if left > right {
            return Err(GeometryError::Inverted {
                low_name: "left",
                low: left,
                high_name: "right",
                high: right,
            });
        }
        if bottom > top {
            return Err(GeometryError::Inverted {
                low_name: "bottom",
                low: bottom,
                high_name: "top",
                high: top,
            });
        }
        Ok(Self { left, right, bottom, top })
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.left
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.right
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.top
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Horizontal line halfway between `bottom` and `top`.
    #[inline]
    pub fn mid_y(&self) -> f32 {
        (self.bottom + self.top) * 0.5
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) * 0.5, self.mid_y())
    }

    /// Inclusive point containment.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right && p.y >= self.bottom && p.y <= self.top
    }

    /// Uniformly random point inside the region.
    ///
    /// A zero-width axis always yields that axis' edge coordinate.
    pub fn sample(&self, rng: &mut DeterministicRng) -> Vec2 {
        let x = rng.uniform(self.left, self.right);
        let y = rng.uniform(self.bottom, self.top);
        Vec2::new(x, y)
    }
}

/// Unvalidated wire form of a [`Region`]; deserialisation goes through
/// [`Region::try_new`].
#[derive(Deserialize)]
struct RegionBounds {
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
}

impl TryFrom<RegionBounds> for Region {
    type Error = GeometryError;

    fn try_from(b: RegionBounds) -> Result<Self, Self::Error> {
        Region::try_new(b.left, b.right, b.bottom, b.top)
    }
}

/// Shared capability of everything that occupies a [`Region`].
pub trait SpatialFeature {
    /// The feature's footprint.
    fn region(&self) -> &Region;

    #[inline]
    fn contains(&self, p: Vec2) -> bool {
        self.region().contains(p)
    }

    #[inline]
    fn center(&self) -> Vec2 {
        self.region().center()
    }
}

impl SpatialFeature for Region {
    fn region(&self) -> &Region {
        self
    }
}
