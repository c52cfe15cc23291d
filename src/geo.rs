//! Geodetic to Cartesian projection onto the globe surface

use bevy::math::Vec3;

/// A named point on one of the globe's coordinate tables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Unique lowercase identifier, also the lookup key for static conditions
    pub key:       &'static str,
    /// Human readable name drawn on the label
    pub name:      &'static str,
    /// Degrees in [-90, 90]
    pub latitude:  f32,
    /// Degrees in [-180, 180]
    pub longitude: f32,
}

impl Location {
    pub const fn new(key: &'static str, name: &'static str, latitude: f32, longitude: f32) -> Self {
        Self {
            key,
            name,
            latitude,
            longitude,
        }
    }

    /// Point on a sphere of `radius` directly above this location
    pub fn surface_point(&self, radius: f32) -> Vec3 { project(self.latitude, self.longitude, radius) }
}

/// Projects latitude/longitude (degrees) onto a sphere of `radius` centered at the origin.
///
/// The polar angle is measured from +Y (`90 - latitude`) and the azimuth is offset by
/// 180 degrees, so the reference points are:
/// - `project(0, 0, r)` is `(r, 0, 0)`
/// - `project(90, any, r)` is `(0, r, 0)`
/// - `project(-90, any, r)` is `(0, -r, 0)`
#[allow(
    clippy::cast_possible_truncation,
    reason = "scene coordinates are f32, the f64 pass only improves pole precision"
)]
pub fn project(latitude: f32, longitude: f32, radius: f32) -> Vec3 {
    let phi = f64::from(90.0 - latitude).to_radians();
    let theta = f64::from(longitude + 180.0).to_radians();
    let radius = f64::from(radius);

    // the trig is done in f64 so the poles land on the axis after the cast to f32
    let x = -radius * phi.sin() * theta.cos();
    let y = radius * phi.cos();
    let z = radius * phi.sin() * theta.sin();

    Vec3::new(x as f32, y as f32, z as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f32 = 1e-4;

    #[test]
    fn projected_points_lie_on_the_sphere() {
        for radius in [0.5_f32, 1.0, 5.0, 100.0] {
            let mut latitude = -90.0_f32;
            while latitude <= 90.0 {
                let mut longitude = -180.0_f32;
                while longitude <= 180.0 {
                    let point = project(latitude, longitude, radius);
                    assert!(
                        (point.length() - radius).abs() < TOLERANCE * radius,
                        "({latitude}, {longitude}) at radius {radius} gave {point}"
                    );
                    longitude += 15.0;
                }
                latitude += 7.5;
            }
        }
    }

    #[test]
    fn equator_prime_meridian_anchor() {
        let point = project(0.0, 0.0, 2.0);
        assert!(point.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), TOLERANCE), "{point}");
    }

    #[test]
    fn north_pole_anchor_ignores_longitude() {
        for longitude in [-180.0, -42.0, 0.0, 91.5, 180.0] {
            let point = project(90.0, longitude, 3.0);
            assert!(point.abs_diff_eq(Vec3::new(0.0, 3.0, 0.0), TOLERANCE), "{point}");
        }
        let south = project(-90.0, 17.0, 3.0);
        assert!(south.abs_diff_eq(Vec3::new(0.0, -3.0, 0.0), TOLERANCE), "{south}");
    }

    #[test]
    fn longitude_sweeps_around_the_vertical_axis() {
        // east of the reference meridian swings toward -Z
        let east = project(0.0, 90.0, 1.0);
        assert!(east.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), TOLERANCE), "{east}");
        let antimeridian = project(0.0, 180.0, 1.0);
        assert!(antimeridian.abs_diff_eq(Vec3::new(-1.0, 0.0, 0.0), TOLERANCE), "{antimeridian}");
    }

    #[test]
    fn location_surface_point_matches_projection() {
        let sydney = Location::new("sydney", "Sydney", -33.8688, 151.2093);
        assert_eq!(sydney.surface_point(5.0), project(-33.8688, 151.2093, 5.0));
        assert!(sydney.surface_point(5.0).y < 0.0);
    }
}
