//! Bounding box describing the coverage of a data extract.

use geo::{Coord, Rect};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MIN_LATITUDE: f64 = -90.0;
const MAX_LATITUDE: f64 = 90.0;
const MIN_LONGITUDE: f64 = -180.0;
const MAX_LONGITUDE: f64 = 180.0;
/// Extracts are allowed to overshoot the valid range by up to one degree.
const RANGE_TOLERANCE: f64 = 1.0;

/// Errors returned by [`Bound::new`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BoundError {
    /// A coordinate fell outside the tolerated latitude/longitude range.
    #[error("bound {edge} coordinate {value} is outside the valid range")]
    OutOfRange {
        /// Edge that failed validation (`left`, `right`, `top` or `bottom`).
        edge: &'static str,
        /// Offending value in degrees.
        value: f64,
    },
    /// The top edge lies below the bottom edge.
    #[error("bound top {top} is below bottom {bottom}")]
    Inverted {
        /// Northern edge in degrees.
        top: f64,
        /// Southern edge in degrees.
        bottom: f64,
    },
}

/// Geographic coverage of an extract.
///
/// Independent of the id-referencing graph. `left`/`right` are longitudes,
/// `top`/`bottom` are latitudes.
///
/// # Examples
///
/// ```
/// use osmgraph_core::Bound;
///
/// # fn main() -> Result<(), osmgraph_core::BoundError> {
/// let bound = Bound::new(13.5, 13.3, 52.6, 52.4, "osmosis")?;
/// assert_eq!(bound.origin, "osmosis");
/// assert!(Bound::new(13.5, 13.3, 52.4, 52.6, "osmosis").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bound {
    /// Eastern longitude.
    pub right: f64,
    /// Western longitude.
    pub left: f64,
    /// Northern latitude.
    pub top: f64,
    /// Southern latitude.
    pub bottom: f64,
    /// Producer of the extract.
    pub origin: String,
}

impl Bound {
    /// Validate and construct a [`Bound`].
    pub fn new(
        right: f64,
        left: f64,
        top: f64,
        bottom: f64,
        origin: impl Into<String>,
    ) -> Result<Self, BoundError> {
        check_range("right", right, MIN_LONGITUDE, MAX_LONGITUDE)?;
        check_range("left", left, MIN_LONGITUDE, MAX_LONGITUDE)?;
        check_range("top", top, MIN_LATITUDE, MAX_LATITUDE)?;
        check_range("bottom", bottom, MIN_LATITUDE, MAX_LATITUDE)?;
        if top < bottom {
            return Err(BoundError::Inverted { top, bottom });
        }
        Ok(Self {
            right,
            left,
            top,
            bottom,
            origin: origin.into(),
        })
    }

    /// The whole-world box.
    pub fn world(origin: impl Into<String>) -> Self {
        Self {
            right: MAX_LONGITUDE,
            left: MIN_LONGITUDE,
            top: MAX_LATITUDE,
            bottom: MIN_LATITUDE,
            origin: origin.into(),
        }
    }

    /// Convert to a `geo` rectangle with `x = longitude`, `y = latitude`.
    #[must_use]
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.left,
                y: self.bottom,
            },
            Coord {
                x: self.right,
                y: self.top,
            },
        )
    }
}

fn check_range(edge: &'static str, value: f64, min: f64, max: f64) -> Result<(), BoundError> {
    let tolerated = (min - RANGE_TOLERANCE)..=(max + RANGE_TOLERANCE);
    if tolerated.contains(&value) {
        Ok(())
    } else {
        Err(BoundError::OutOfRange { edge, value })
    }
}
