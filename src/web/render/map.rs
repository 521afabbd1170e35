use anyhow::Result;
use serde::Serialize;

use super::escape::{escape, script_json};
use crate::database_ops::models::StartingPoint;

/// Centre of the Mourne Mountains, used when no point has coordinates.
pub const DEFAULT_CENTER: (f64, f64) = (54.1693, -5.9193);
pub const DEFAULT_ZOOM: u8 = 12;

#[derive(Debug, Serialize)]
struct Marker<'a> {
    name: &'a str,
    description: Option<&'a str>,
    difficulty: Option<&'a str>,
    link: Option<&'a str>,
    lat: f64,
    lng: f64,
}

/// Mean (lat, lng) of the points with usable coordinates.
pub fn calculate_center(points: &[StartingPoint]) -> (f64, f64) {
    let valid: Vec<(f64, f64)> = points.iter().filter_map(StartingPoint::coordinates).collect();
    if valid.is_empty() {
        return DEFAULT_CENTER;
    }
    let n = valid.len() as f64;
    let (lat, lng) = valid
        .iter()
        .fold((0.0, 0.0), |(a, b), (lat, lng)| (a + lat, b + lng));
    (lat / n, lng / n)
}

/// Head markup the map needs; empty when no map will render.
pub fn map_head(points: &[StartingPoint]) -> &'static str {
    if points.iter().any(|p| p.coordinates().is_some()) {
        concat!(
            r#"<link rel="stylesheet" href="https://api.mapbox.com/mapbox-gl-js/v3.7.0/mapbox-gl.css">"#,
            "\n    ",
            r#"<script src="https://api.mapbox.com/mapbox-gl-js/v3.7.0/mapbox-gl.js"></script>"#
        )
    } else {
        ""
    }
}

/// Mapbox GL map with one marker per located starting point. Renders nothing
/// when no point has coordinates.
pub fn render_map(points: &[StartingPoint], access_token: Option<&str>, zoom: u8) -> Result<String> {
    let markers: Vec<Marker<'_>> = points
        .iter()
        .filter_map(|p| {
            p.coordinates().map(|(lat, lng)| Marker {
                name: &p.name,
                description: p.description.as_deref(),
                difficulty: p.difficulty.as_deref(),
                link: p.google_maps_url.as_deref(),
                lat,
                lng,
            })
        })
        .collect();
    if markers.is_empty() {
        return Ok(String::new());
    }

    let Some(token) = access_token else {
        tracing::warn!("MAPBOX_TOKEN not set; map disabled");
        return Ok(
            "<section class=\"map\"><p class=\"muted\">Map unavailable</p></section>\n".to_string(),
        );
    };

    let (lat, lng) = calculate_center(points);
    let markers_json = script_json(&markers)?;
    let token_json = script_json(&token)?;
    Ok(format!(
        r#"<section class="map">
<h3>Starting Points Map</h3>
<div id="starting-points-map" class="map-canvas" data-lat="{lat}" data-lng="{lng}" data-zoom="{zoom}"></div>
<p class="muted">Click markers to view starting point details</p>
<script>
(function () {{
  mapboxgl.accessToken = {token_json};
  var map = new mapboxgl.Map({{
    container: "starting-points-map",
    style: "mapbox://styles/mapbox/outdoors-v12",
    center: [{lng}, {lat}],
    zoom: {zoom}
  }});
  map.addControl(new mapboxgl.NavigationControl(), "top-right");
  map.addControl(new mapboxgl.FullscreenControl(), "top-right");
  var esc = function (s) {{
    var d = document.createElement("div");
    d.textContent = s;
    return d.innerHTML;
  }};
  {markers_json}.forEach(function (p) {{
    var html = "<h4>" + esc(p.name) + "</h4>";
    if (p.description) html += "<p>" + esc(p.description) + "</p>";
    if (p.difficulty) html += "<p><strong>Difficulty:</strong> " + esc(p.difficulty) + "</p>";
    if (p.link) html += '<a href="' + esc(p.link) + '" target="_blank" rel="noopener noreferrer">View in Google Maps</a>';
    new mapboxgl.Marker()
      .setLngLat([p.lng, p.lat])
      .setPopup(new mapboxgl.Popup({{ offset: 25 }}).setHTML(html))
      .addTo(map);
  }});
}})();
</script>
<noscript>{}</noscript>
</section>
"#,
        escape("Enable JavaScript to view the map")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn point(name: &str, lat: Option<f64>, lng: Option<f64>) -> StartingPoint {
        StartingPoint {
            id: Uuid::new_v4(),
            mountain_id: Uuid::nil(),
            name: name.to_string(),
            description: Some("Car park".to_string()),
            latitude: lat,
            longitude: lng,
            google_maps_url: Some("https://maps.google.com/?ll=54.2,-5.9".to_string()),
            parking_available: false,
            difficulty: None,
            display_order: 1,
        }
    }

    #[test]
    fn center_is_mean_of_valid_points() {
        let pts = [
            point("A", Some(54.0), Some(-6.0)),
            point("B", Some(54.2), Some(-5.8)),
            point("no coords", None, None),
            point("zero", Some(0.0), Some(0.0)),
        ];
        let (lat, lng) = calculate_center(&pts);
        assert!((lat - 54.1).abs() < 1e-9);
        assert!((lng + 5.9).abs() < 1e-9);
    }

    #[test]
    fn center_defaults_without_points() {
        assert_eq!(calculate_center(&[]), DEFAULT_CENTER);
        assert_eq!(calculate_center(&[point("x", None, Some(-5.9))]), DEFAULT_CENTER);
    }

    #[test]
    fn no_map_without_coordinates() {
        let pts = [point("x", None, None)];
        assert_eq!(render_map(&pts, Some("pk.test"), DEFAULT_ZOOM).unwrap(), "");
        assert_eq!(map_head(&pts), "");
    }

    #[test]
    fn map_carries_markers_center_and_token() {
        let pts = [point("Bloody Bridge", Some(54.17), Some(-5.87))];
        let html = render_map(&pts, Some("pk.test"), DEFAULT_ZOOM).unwrap();
        assert!(html.contains(r#"mapboxgl.accessToken = "pk.test";"#));
        assert!(html.contains("center: [-5.87, 54.17]"));
        assert!(html.contains("zoom: 12"));
        assert!(html.contains(r#""name":"Bloody Bridge""#));
        assert!(!map_head(&pts).is_empty());
    }

    #[test]
    fn missing_token_shows_placeholder() {
        let pts = [point("A", Some(54.1), Some(-5.9))];
        let html = render_map(&pts, None, DEFAULT_ZOOM).unwrap();
        assert!(html.contains("Map unavailable"));
        assert!(!html.contains("mapboxgl"));
    }
}
