//! Great-circle radius search primitives.
//!
//! The radius search runs in two stages: a coarse bounding-box range query
//! (pushed down to the store) followed by an exact haversine distance check
//! over the survivors. The box is always a superset of the true radius disk,
//! so stage 1 produces false positives but no false negatives — with the two
//! documented exceptions on [`bounding_box`].

use thiserror::Error;

/// Mean Earth radius in meters, shared by the distance and bounding-box math.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Validation failures for query input.
#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("coordinates must be finite numbers")]
    NonFiniteCoordinate,

    #[error("radius must be a positive number of meters, got {0}")]
    InvalidRadius(f64),
}

/// A position in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
}

impl Point {
    /// Build a validated point. Rejects NaN/infinite values and coordinates
    /// outside the valid degree ranges so they never reach the trigonometry.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(GeoError::NonFiniteCoordinate);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

/// Axis-aligned box in degree space. Coarse pre-filter only — membership in
/// the box never implies membership in the radius disk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Inclusive containment on both axes, matching the store-side range query.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.min_lat
            && latitude <= self.max_lat
            && longitude >= self.min_lng
            && longitude <= self.max_lng
    }
}

/// Compute the degree-space box circumscribing the radius disk around `center`.
///
/// The radius is converted to an angular distance (radius / Earth radius) and
/// applied directly to latitude; the longitude span is widened by 1/cos(lat).
///
/// Known limitations, accepted as-is:
/// - cos(lat) approaches zero near the poles, so the longitude bounds diverge
///   for centers close to ±90°.
/// - The box does not wrap across the ±180° meridian; candidates on the far
///   side of the antimeridian are excluded.
pub fn bounding_box(center: &Point, radius_meters: f64) -> Result<BoundingBox, GeoError> {
    if !radius_meters.is_finite() || radius_meters <= 0.0 {
        return Err(GeoError::InvalidRadius(radius_meters));
    }

    let angular_radius = radius_meters / EARTH_RADIUS_METERS;
    let lat_rad = center.latitude.to_radians();
    let lng_rad = center.longitude.to_radians();
    let lng_delta = angular_radius / lat_rad.cos();

    Ok(BoundingBox {
        min_lat: (lat_rad - angular_radius).to_degrees(),
        max_lat: (lat_rad + angular_radius).to_degrees(),
        min_lng: (lng_rad - lng_delta).to_degrees(),
        max_lng: (lng_rad + lng_delta).to_degrees(),
    })
}

/// Great-circle distance between two points in meters.
///
/// Pure and symmetric; `haversine_distance(a, a)` is zero within floating
/// point tolerance.
pub fn haversine_distance(a: &Point, b: &Point) -> f64 {
    let phi_a = a.latitude.to_radians();
    let phi_b = b.latitude.to_radians();
    let d_phi = (b.latitude - a.latitude).to_radians();
    let d_lambda = (b.longitude - a.longitude).to_radians();

    let h = (d_phi / 2.0).sin().powi(2)
        + phi_a.cos() * phi_b.cos() * (d_lambda / 2.0).sin().powi(2);
    // Guard against rounding pushing h a hair past 1.0 for antipodal inputs.
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Stage-2 exact filter: retain candidates within `radius_meters` of `center`.
///
/// Candidates with non-finite stored coordinates produce a NaN distance and
/// are dropped by the comparison. Order of the surviving candidates follows
/// the input order.
pub fn filter_within_radius<T, F>(
    candidates: Vec<T>,
    center: &Point,
    radius_meters: f64,
    position: F,
) -> Vec<T>
where
    F: Fn(&T) -> Point,
{
    candidates
        .into_iter()
        .filter(|candidate| haversine_distance(center, &position(candidate)) <= radius_meters)
        .collect()
}
