use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl From<Coordinates> for String {
    fn from(coordinates: Coordinates) -> Self {
        format!("{},{}", coordinates.lat, coordinates.lng)
    }
}

const RESERVED_PREFIXES: [&str; 2] = ["via:", "enc:"];

/// A single geocodable stop: either free-form address text or a coordinate pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Waypoint {
    Address(String),
    Coordinates(Coordinates),
}

impl Waypoint {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Address(address) => address.trim().is_empty(),
            Self::Coordinates(_) => false,
        }
    }

    /// Address text the provider would split or reinterpret once it is
    /// joined into the pipe-separated `waypoints` parameter.
    pub fn is_ambiguous(&self) -> bool {
        match self {
            Self::Address(address) => {
                let address = address.trim();
                address.contains('|')
                    || RESERVED_PREFIXES.iter().any(|prefix| {
                        address
                            .get(..prefix.len())
                            .map_or(false, |head| head.eq_ignore_ascii_case(prefix))
                    })
            }
            Self::Coordinates(_) => false,
        }
    }

    /// Value passed to the directions provider as `origin`, `destination` or
    /// an entry of `waypoints`.
    pub fn to_param(&self) -> String {
        match self {
            Self::Address(address) => address.trim().to_string(),
            Self::Coordinates(coordinates) => (*coordinates).into(),
        }
    }
}

impl From<&str> for Waypoint {
    fn from(address: &str) -> Self {
        Self::Address(address.into())
    }
}

impl From<String> for Waypoint {
    fn from(address: String) -> Self {
        Self::Address(address)
    }
}

impl From<Coordinates> for Waypoint {
    fn from(coordinates: Coordinates) -> Self {
        Self::Coordinates(coordinates)
    }
}

impl fmt::Display for Waypoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_param())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
    Bicycling,
    Transit,
}

impl TravelMode {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Walking => "walking",
            Self::Bicycling => "bicycling",
            Self::Transit => "transit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waypoints_deserialize_untagged() {
        let waypoints: Vec<Waypoint> =
            serde_json::from_str(r#"["777 S Broad St", {"lat": 39.9, "lng": -75.1}]"#).unwrap();

        assert_eq!(waypoints[0], Waypoint::Address("777 S Broad St".into()));
        assert_eq!(
            waypoints[1],
            Waypoint::Coordinates(Coordinates {
                lat: 39.9,
                lng: -75.1
            })
        );
        assert_eq!(waypoints[1].to_param(), "39.9,-75.1");
    }

    #[test]
    fn blank_addresses_are_empty() {
        assert!(Waypoint::from("").is_empty());
        assert!(Waypoint::from("   ").is_empty());
        assert!(!Waypoint::from("Reading Terminal Market").is_empty());
    }

    #[test]
    fn pipes_and_reserved_prefixes_are_ambiguous() {
        assert!(Waypoint::from("Bank | Post Office").is_ambiguous());
        assert!(Waypoint::from("  VIA:Reading Terminal Market").is_ambiguous());
        assert!(Waypoint::from("enc:_p~iF~ps|U").is_ambiguous());
        assert!(!Waypoint::from("Via Appia Pizza").is_ambiguous());
        assert!(!Waypoint::from(Coordinates {
            lat: 39.9,
            lng: -75.1
        })
        .is_ambiguous());
    }

    #[test]
    fn travel_mode_uses_uppercase_json() {
        let mode: TravelMode = serde_json::from_str(r#""BICYCLING""#).unwrap();

        assert_eq!(mode, TravelMode::Bicycling);
        assert_eq!(mode.name(), "bicycling");
        assert_eq!(TravelMode::default(), TravelMode::Driving);
    }
}
