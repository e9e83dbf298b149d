//! Airport coordinates for map markers
//!
//! Covers the airline's domestic network. Unknown codes simply get no marker;
//! codes are never validated against this table.

use crate::sink::{MarkerColor, Waypoint};

/// (IATA, latitude, longitude)
const AIRPORTS: &[(&str, f64, f64)] = &[
    ("ABQ", 35.0402, -106.6090),
    ("ATL", 33.6367, -84.4281),
    ("AUS", 30.1945, -97.6699),
    ("BDL", 41.9389, -72.6832),
    ("BHM", 33.5629, -86.7535),
    ("BNA", 36.1245, -86.6782),
    ("BOI", 43.5644, -116.2228),
    ("BOS", 42.3643, -71.0052),
    ("BUF", 42.9405, -78.7322),
    ("BUR", 34.2007, -118.3590),
    ("BWI", 39.1754, -76.6683),
    ("CLE", 41.4117, -81.8498),
    ("CLT", 35.2140, -80.9431),
    ("CMH", 39.9980, -82.8919),
    ("DAL", 32.8471, -96.8518),
    ("DCA", 38.8521, -77.0377),
    ("DEN", 39.8617, -104.6731),
    ("DTW", 42.2124, -83.3534),
    ("ELP", 31.8072, -106.3776),
    ("FLL", 26.0726, -80.1527),
    ("HNL", 21.3187, -157.9225),
    ("HOU", 29.6454, -95.2789),
    ("IAD", 38.9445, -77.4558),
    ("IND", 39.7173, -86.2944),
    ("JAX", 30.4941, -81.6879),
    ("LAS", 36.0801, -115.1522),
    ("LAX", 33.9425, -118.4081),
    ("LGA", 40.7772, -73.8726),
    ("LGB", 33.8177, -118.1516),
    ("MCI", 39.2976, -94.7139),
    ("MCO", 28.4294, -81.3090),
    ("MDW", 41.7860, -87.7524),
    ("MEM", 35.0424, -89.9767),
    ("MIA", 25.7932, -80.2906),
    ("MKE", 42.9472, -87.8966),
    ("MSP", 44.8820, -93.2218),
    ("MSY", 29.9934, -90.2580),
    ("OAK", 37.7213, -122.2208),
    ("OGG", 20.8986, -156.4305),
    ("OKC", 35.3931, -97.6007),
    ("OMA", 41.3032, -95.8941),
    ("ONT", 34.0560, -117.6012),
    ("ORD", 41.9786, -87.9048),
    ("PDX", 45.5887, -122.5975),
    ("PHL", 39.8721, -75.2411),
    ("PHX", 33.4343, -112.0116),
    ("PIT", 40.4915, -80.2329),
    ("RDU", 35.8776, -78.7875),
    ("RNO", 39.4991, -119.7681),
    ("SAN", 32.7336, -117.1897),
    ("SAT", 29.5337, -98.4698),
    ("SDF", 38.1744, -85.7360),
    ("SEA", 47.4490, -122.3093),
    ("SFO", 37.6190, -122.3749),
    ("SJC", 37.3626, -121.9291),
    ("SLC", 40.7884, -111.9778),
    ("SMF", 38.6954, -121.5908),
    ("SNA", 33.6757, -117.8682),
    ("STL", 38.7487, -90.3700),
    ("TPA", 27.9755, -82.5332),
    ("TUL", 36.1984, -95.8881),
    ("TUS", 32.1161, -110.9410),
];

/// Latitude/longitude for an IATA code
pub fn lookup(code: &str) -> Option<(f64, f64)> {
    let code = code.trim();
    AIRPORTS
        .iter()
        .find(|(iata, _, _)| iata.eq_ignore_ascii_case(code))
        .map(|(_, lat, lon)| (*lat, *lon))
}

/// Markers for origin (red) and destination (yellow), skipping unknown codes
pub fn trip_waypoints(origin: &str, destination: &str) -> Vec<Waypoint> {
    [(origin, MarkerColor::Red), (destination, MarkerColor::Yellow)]
        .into_iter()
        .filter_map(|(code, color)| {
            let Some((lat, lon)) = lookup(code) else {
                log::warn!("No coordinates for airport {}; it will not appear on the map", code);
                return None;
            };
            Some(Waypoint {
                lat,
                lon,
                color,
                label: code.to_string(),
            })
        })
        .collect()
}
