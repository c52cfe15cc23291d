//! Coordinate tables, one per globe mode. Table order is the order markers are
//! built and listed in.

use crate::geo::Location;

pub const EARTH_LOCATIONS: &[Location] = &[
    Location::new("agay", "Agay", 43.4256, 6.8379),
    Location::new("sydney", "Sydney", -33.8688, 151.2093),
    Location::new("gizeh", "Gizeh", 29.9773, 31.1325),
    Location::new("seoul", "Seoul", 37.566_535, 126.977_97),
    Location::new("lasvegas", "Las Vegas", 36.1699, -115.1398),
];

/// Apollo landing sites
pub const MOON_LOCATIONS: &[Location] = &[
    Location::new("apollo11", "Apollo 11", 0.674_08, 23.472_97),
    Location::new("apollo12", "Apollo 12", -3.012_39, -23.421_57),
    Location::new("apollo14", "Apollo 14", -3.645_3, -17.471_36),
    Location::new("apollo15", "Apollo 15", 26.132_22, 3.633_86),
    Location::new("apollo16", "Apollo 16", -8.973_01, 15.500_19),
    Location::new("apollo17", "Apollo 17", 20.190_8, 30.771_68),
];

/// Finds a location by key in a table
pub fn find(table: &[Location], key: &str) -> Option<Location> {
    table.iter().find(|location| location.key == key).copied()
}
