//! Place-name to coordinate lookup used for enrichment.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, LazyLock},
};

use crate::{error::Result, types::Coordinates};

/// Resolves a place name to coordinates.
///
/// Implementations must be safe for unsynchronized concurrent reads.
pub trait PlaceLookup: Send + Sync + fmt::Debug {
    /// `Ok(None)` means the name is unknown; errors are treated as misses by callers.
    fn lookup(&self, name: &str) -> Result<Option<Coordinates>>;
}

/// One known place.
#[derive(Debug, Clone, PartialEq)]
pub struct GazetteerEntry {
    pub name: String,
    pub coordinates: Coordinates,
}

/// Immutable table of known places, matched case-insensitively after trimming.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    entries: HashMap<String, GazetteerEntry>,
}

const BUILTIN_PLACES: &[(&str, f64, f64)] = &[
    ("Greece", 37.9838, 23.7275),
    ("Santorini", 36.3932, 25.4615),
    ("Japan", 35.6762, 139.6503),
    ("Tokyo", 35.6762, 139.6503),
    ("Osaka", 34.6937, 135.5023),
    ("Rome", 41.9028, 12.4964),
    ("Morocco", 31.7917, -7.0926),
    ("Marrakesh", 31.6295, -7.9811),
    ("Vietnam", 21.0278, 105.8342),
    ("Hanoi", 21.0278, 105.8342),
    ("Ho Chi Minh City", 10.8231, 106.6297),
    ("Phuket", 7.8804, 98.3923),
    ("Bangkok", 13.7563, 100.5018),
    ("Sri Lanka", 7.8731, 80.7718),
    ("Colombo", 6.9271, 79.8612),
    ("Barcelona", 41.3851, 2.1734),
    ("Paris", 48.8566, 2.3522),
    ("London", 51.5074, -0.1278),
    ("New York", 40.7128, -74.006),
    ("Los Angeles", 34.0522, -118.2437),
    ("San Francisco", 37.7749, -122.4194),
    ("Sydney", -33.8688, 151.2093),
    ("Melbourne", -37.8136, 144.9631),
    ("Singapore", 1.3521, 103.8198),
    ("Dubai", 25.2048, 55.2708),
    ("Istanbul", 41.0082, 28.9784),
    ("Cairo", 30.0444, 31.2357),
    ("Nairobi", -1.2921, 36.8219),
    ("Cape Town", -33.9249, 18.4241),
    ("Buenos Aires", -34.6037, -58.3816),
    ("Rio de Janeiro", -22.9068, -43.1729),
    ("Lisbon", 38.7223, -9.1393),
    ("Amsterdam", 52.3676, 4.9041),
    ("Berlin", 52.52, 13.405),
    ("Prague", 50.0755, 14.4378),
    ("Vienna", 48.2082, 16.3738),
    ("Budapest", 47.4979, 19.04),
    ("Krakow", 50.0647, 19.945),
    ("Stockholm", 59.3293, 18.0686),
    ("Oslo", 59.9139, 10.7522),
    ("Helsinki", 60.1699, 24.9384),
    ("Copenhagen", 55.6761, 12.5683),
    ("Reykjavik", 64.1466, -21.9426),
    ("Montreal", 45.5017, -73.5673),
    ("Toronto", 43.6532, -79.3832),
    ("Vancouver", 49.2827, -123.1207),
    ("Mexico City", 19.4326, -99.1332),
    ("Cancun", 21.1619, -86.8515),
    ("Tulum", 20.211, -87.4654),
    ("Havana", 23.1136, -82.3666),
    ("Lima", -12.0464, -77.0428),
    ("Santiago", -33.4489, -70.6693),
    ("Quito", -0.1807, -78.4678),
    ("Bogota", 4.711, -74.0721),
    ("Kuala Lumpur", 3.139, 101.6869),
    ("Seoul", 37.5665, 126.978),
    ("Hong Kong", 22.3193, 114.1694),
    ("Taipei", 25.033, 121.5654),
    ("Shanghai", 31.2304, 121.4737),
    ("Beijing", 39.9042, 116.4074),
    ("Delhi", 28.7041, 77.1025),
    ("Mumbai", 19.076, 72.8777),
    ("Goa", 15.2993, 73.9496),
    ("Agra", 27.1767, 78.0081),
    ("Jaipur", 26.9124, 75.7873),
    ("Kathmandu", 27.7172, 85.324),
    ("Zurich", 47.3769, 8.5417),
    ("Geneva", 46.2044, 6.1432),
    ("Maldives", 4.1755, 73.5093),
    ("Bora Bora", -16.5004, -151.7415),
    ("Seychelles", -4.6195, 55.4513),
    ("Auckland", -36.8485, 174.7633),
];

static BUILTIN: LazyLock<Arc<Gazetteer>> =
    LazyLock::new(|| Arc::new(Gazetteer::from_places(BUILTIN_PLACES.iter().copied())));

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Gazetteer {
    pub fn from_entries(entries: impl IntoIterator<Item = GazetteerEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (normalize(&entry.name), entry))
            .collect();
        Self { entries }
    }

    /// Build a table from `(name, lat, lng)` triples, skipping out-of-range pairs.
    pub fn from_places<'a>(places: impl IntoIterator<Item = (&'a str, f64, f64)>) -> Self {
        Self::from_entries(places.into_iter().filter_map(|(name, lat, lng)| {
            Coordinates::new(lat, lng).map(|coordinates| GazetteerEntry {
                name: name.to_string(),
                coordinates,
            })
        }))
    }

    /// The shared default table of popular destinations.
    pub fn builtin() -> Arc<Gazetteer> {
        Arc::clone(&BUILTIN)
    }

    pub fn get(&self, name: &str) -> Option<&GazetteerEntry> {
        self.entries.get(&normalize(name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PlaceLookup for Gazetteer {
    fn lookup(&self, name: &str) -> Result<Option<Coordinates>> {
        Ok(self.get(name).map(|entry| entry.coordinates))
    }
}
