use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static LL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ll=([0-9.-]+),([0-9.-]+)").expect("hardcoded regex pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Coordinates from a legacy Google Maps link's `ll=lat,lng` parameter.
///
/// Any other URL shape (place ids, `@lat,lng` paths, `q=` searches) yields
/// `None`; so does a match whose numbers do not parse.
pub fn extract_coordinates_from_url(url: &str) -> Option<Coordinates> {
    let caps = LL_RE.captures(url)?;
    let lat = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let lng = caps.get(2)?.as_str().parse::<f64>().ok()?;
    Some(Coordinates { lat, lng })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ll_parameter() {
        let c = extract_coordinates_from_url("https://maps.google.com/maps?ll=54.219725,-5.882986")
            .unwrap();
        assert_eq!(c, Coordinates { lat: 54.219725, lng: -5.882986 });

        let c = extract_coordinates_from_url(
            "http://maps.google.co.uk/maps?hl=en&ll=54.180514,-5.920849&spn=0.01&t=h&z=16",
        )
        .unwrap();
        assert_eq!(c.lat, 54.180514);
        assert_eq!(c.lng, -5.920849);
    }

    #[test]
    fn none_without_ll() {
        assert_eq!(extract_coordinates_from_url("https://maps.google.com/maps?q=Newcastle"), None);
        assert_eq!(
            extract_coordinates_from_url("https://www.google.com/maps/@54.18,-5.92,15z"),
            None
        );
        assert_eq!(extract_coordinates_from_url(""), None);
    }

    #[test]
    fn none_when_numbers_are_garbage() {
        assert_eq!(extract_coordinates_from_url("maps?ll=5.4.2,-5.8"), None);
        assert_eq!(extract_coordinates_from_url("maps?ll=-,-"), None);
    }
}
