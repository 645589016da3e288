/// Mean Earth radius in kilometers. Must stay in sync with the SQL
/// distance predicate in the repository.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between two lat/long points in kilometers.
///
/// Same spherical-law-of-cosines formula the repository evaluates in SQL;
/// the acos argument is clamped to [-1, 1] because floating-point rounding
/// can overshoot at identical or antipodal points.
pub fn great_circle_km(lat1: f64, long1: f64, lat2: f64, long2: f64) -> f64 {
    let central = lat1.to_radians().cos()
        * lat2.to_radians().cos()
        * (long2.to_radians() - long1.to_radians()).cos()
        + lat1.to_radians().sin() * lat2.to_radians().sin();

    EARTH_RADIUS_KM * central.clamp(-1.0, 1.0).acos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coincident_points_are_zero_distance() {
        let d = great_circle_km(59.934190, 30.332707, 59.934190, 30.332707);
        assert!(d.abs() < 1e-6, "expected ~0 km, got {}", d);
    }

    #[test]
    fn antipodal_points_do_not_panic() {
        // acos argument lands exactly on -1 here.
        let d = great_circle_km(0.0, 0.0, 0.0, 180.0);
        assert!(d.is_finite());
        assert!((d - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1.0);
    }

    #[test]
    fn moscow_to_saint_petersburg() {
        // Ленина 1 (Москва) -> Невский проспект 52 (Санкт-Петербург), ~635 km.
        let d = great_circle_km(55.7558, 37.6173, 59.934530, 30.336068);
        assert!((600.0..670.0).contains(&d), "got {} km", d);
    }

    #[test]
    fn fixture_addresses_within_one_km_of_nevsky_35() {
        let origin = (59.934190, 30.332707);
        let nearby = [
            (59.934530, 30.336068), // Невский проспект 52
            (59.933371, 30.332397), // Невский проспект 35В
            (59.935183, 30.330026), // Итальянская улица 7
        ];
        for (lat, long) in nearby {
            let d = great_circle_km(origin.0, origin.1, lat, long);
            assert!(d <= 1.0, "({}, {}) is {} km away", lat, long, d);
        }

        // The Moscow and Novosibirsk fixture addresses are far outside.
        let moscow = great_circle_km(origin.0, origin.1, 55.7558, 37.6173);
        let novosibirsk = great_circle_km(origin.0, origin.1, 55.0302, 82.9204);
        assert!(moscow > 1.0);
        assert!(novosibirsk > 1.0);
    }
}
