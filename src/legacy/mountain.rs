use anyhow::{bail, Context, Result};
use regex::Regex;
use scraper::{ElementRef, Html};
use std::path::Path;
use std::sync::LazyLock;
use tracing::warn;

use super::sections::{accordion_blocks, find_block, selector, SectionLookup};
use crate::database_ops::models::{NewMountain, NewStartingPoint};
use crate::normalization::{clean_text, extract_coordinates_from_url, extract_height};

#[allow(clippy::expect_used)]
static SITE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*-\s*ExploreTheMournes\s*-\s*Mourne Mountains")
        .expect("hardcoded regex pattern is valid")
});

#[allow(clippy::expect_used)]
static TERRAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Terrain:\s*").expect("hardcoded regex pattern is valid"));

#[allow(clippy::expect_used)]
static VIEWS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Views:\s*").expect("hardcoded regex pattern is valid"));

#[allow(clippy::expect_used)]
static REGION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Region|Location):\s*").expect("hardcoded regex pattern is valid")
});

/// Legacy accordion positions, used only when headings don't identify a section.
const PROFILE_POSITION: usize = 0;
const STARTING_POINTS_POSITION: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedMountain {
    pub mountain: NewMountain,
    pub starting_points: Vec<NewStartingPoint>,
}

/// Read and parse one legacy mountain page. The slug is the file stem.
pub fn parse_mountain_html(path: &Path) -> Result<ParsedMountain> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let slug = path
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("no usable file stem in {}", path.display()))?;
    parse_mountain_document(slug, &html)
}

pub fn parse_mountain_document(slug: &str, html: &str) -> Result<ParsedMountain> {
    let doc = Html::parse_document(html);

    let title = first_text(&doc, "title")?.unwrap_or_default();
    let name = SITE_SUFFIX_RE.replace(&title, "").trim().to_string();
    if name.is_empty() {
        bail!("{slug}: page has no <title>");
    }

    let (gaelic_name, meaning) = match first_text(&doc, "h2")? {
        Some(line) => split_gaelic_line(&line),
        None => (None, None),
    };

    let meta_sel = selector(r#"meta[name="description"]"#)?;
    let meta_description = doc
        .select(&meta_sel)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(str::to_string);

    let blocks = accordion_blocks(&doc)?;

    let profile_lookup = find_block(&blocks, "profile", PROFILE_POSITION);
    warn_on_fallback(slug, "profile", profile_lookup);
    let profile = match profile_lookup.index().and_then(|i| blocks.get(i)) {
        Some(block) => parse_profile(block.body)?,
        None => Profile::default(),
    };

    let start_lookup = find_block(&blocks, "start", STARTING_POINTS_POSITION);
    warn_on_fallback(slug, "starting points", start_lookup);
    let starting_points = match start_lookup.index().and_then(|i| blocks.get(i)) {
        Some(block) => parse_starting_points(block.body)?,
        None => Vec::new(),
    };

    let mountain = NewMountain {
        slug: slug.to_string(),
        name,
        gaelic_name,
        meaning,
        height: profile.height,
        terrain: profile.terrain,
        views: profile.views,
        description: meta_description.clone(),
        region: profile.region,
        seo_title: Some(title),
        seo_description: meta_description,
        published: true,
    };

    Ok(ParsedMountain {
        mountain,
        starting_points,
    })
}

fn warn_on_fallback(slug: &str, section: &str, lookup: SectionLookup) {
    match lookup {
        SectionLookup::ByHeading(_) => {}
        SectionLookup::ByPosition(pos) => warn!(
            slug,
            section,
            position = pos,
            "no accordion heading matched; using legacy position"
        ),
        SectionLookup::Missing => warn!(slug, section, "accordion section not found"),
    }
}

fn first_text(doc: &Html, css: &'static str) -> Result<Option<String>> {
    let sel = selector(css)?;
    Ok(doc
        .select(&sel)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string()))
}

/// "Sliabh Dhónairt: Mountain of (St.) Domhangart" -> (gaelic, meaning).
/// Everything after the first colon is the meaning, colons included.
fn split_gaelic_line(line: &str) -> (Option<String>, Option<String>) {
    match line.split_once(':') {
        Some((gaelic, meaning)) => (
            Some(gaelic.trim().to_string()),
            Some(meaning.trim().to_string()),
        ),
        None => (None, None),
    }
}

#[derive(Debug, Default)]
struct Profile {
    height: Option<i32>,
    terrain: Option<String>,
    views: Option<String>,
    region: Option<String>,
}

fn parse_profile(section: ElementRef<'_>) -> Result<Profile> {
    let p_sel = selector("p")?;
    let mut profile = Profile::default();
    for p in section.select(&p_sel) {
        let text: String = p.text().collect();
        if text.contains("Height:") {
            profile.height = extract_height(&text);
        }
        if text.contains("Terrain:") {
            profile.terrain = Some(clean_text(&TERRAIN_RE.replace(&text, "")));
        }
        if text.contains("Views:") {
            profile.views = Some(clean_text(&VIEWS_RE.replace(&text, "")));
        }
        if text.contains("Region:") || text.contains("Location:") {
            profile.region = Some(clean_text(&REGION_RE.replace(&text, "")));
        }
    }
    Ok(profile)
}

fn parse_starting_points(section: ElementRef<'_>) -> Result<Vec<NewStartingPoint>> {
    let link_sel = selector(r#"a[href*="maps.google"]"#)?;
    let mut points = Vec::new();
    for (index, link) in section.select(&link_sel).enumerate() {
        let href = link.value().attr("href").unwrap_or_default().to_string();
        let link_text = link.text().collect::<String>().trim().to_string();
        let name = if link_text.is_empty() {
            format!("Starting Point {}", index + 1)
        } else {
            link_text
        };

        let coords = extract_coordinates_from_url(&href);

        // The surrounding element's text, minus the link label, describes the spot.
        let parent_text = link
            .parent()
            .and_then(ElementRef::wrap)
            .map(|p| p.text().collect::<String>())
            .unwrap_or_default();
        let description = clean_text(&parent_text.replacen(&name, "", 1));

        points.push(NewStartingPoint {
            name,
            description: (!description.is_empty()).then_some(description),
            latitude: coords.map(|c| c.lat),
            longitude: coords.map(|c| c.lng),
            google_maps_url: Some(href),
            difficulty: None,
            display_order: i32::try_from(index + 1).unwrap_or(i32::MAX),
        });
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DONARD: &str = r##"<!DOCTYPE html>
<html>
<head>
  <title>Slieve Donard - ExploreTheMournes - Mourne Mountains</title>
  <meta name="description" content="The highest peak in Northern Ireland.">
</head>
<body>
  <h2>Sliabh Dhónairt: Mountain of (St.) Domhangart</h2>
  <div id="readmore">
    <a href="#">Profile</a>
    <div>
      <p>Height: 850m</p>
      <p>Terrain:   Rocky
         summit, steep path</p>
      <p>Views: Whole of the Mournes</p>
      <p>Region: Eastern Mournes</p>
    </div>
    <a href="#">Photograph</a>
    <div><p>Photo by A. Walker</p></div>
    <a href="#">Where can I start from?</a>
    <div>
      <p><a href="https://maps.google.com/maps?ll=54.219725,-5.882986">Donard car park</a> in Newcastle, follow the Glen River.</p>
      <p><a href="https://maps.google.com/maps?q=Bloody+Bridge">Bloody Bridge</a></p>
      <p><a href="https://maps.google.com/maps?ll=54.17,-5.88"></a></p>
    </div>
  </div>
</body>
</html>"##;

    #[test]
    fn parses_profile_and_names() {
        let parsed = parse_mountain_document("slieve-donard", DONARD).unwrap();
        let m = &parsed.mountain;
        assert_eq!(m.slug, "slieve-donard");
        assert_eq!(m.name, "Slieve Donard");
        assert_eq!(m.gaelic_name.as_deref(), Some("Sliabh Dhónairt"));
        assert_eq!(m.meaning.as_deref(), Some("Mountain of (St.) Domhangart"));
        assert_eq!(m.height, Some(850));
        assert_eq!(m.terrain.as_deref(), Some("Rocky summit, steep path"));
        assert_eq!(m.views.as_deref(), Some("Whole of the Mournes"));
        assert_eq!(m.region.as_deref(), Some("Eastern Mournes"));
        assert_eq!(m.description.as_deref(), Some("The highest peak in Northern Ireland."));
        assert_eq!(m.seo_description, m.description);
        assert_eq!(
            m.seo_title.as_deref(),
            Some("Slieve Donard - ExploreTheMournes - Mourne Mountains")
        );
        assert!(m.published);
    }

    #[test]
    fn parses_starting_points_in_order() {
        let parsed = parse_mountain_document("slieve-donard", DONARD).unwrap();
        let pts = &parsed.starting_points;
        assert_eq!(pts.len(), 3);

        assert_eq!(pts[0].name, "Donard car park");
        assert_eq!(pts[0].latitude, Some(54.219725));
        assert_eq!(pts[0].longitude, Some(-5.882986));
        assert_eq!(
            pts[0].description.as_deref(),
            Some("in Newcastle, follow the Glen River.")
        );
        assert_eq!(pts[0].display_order, 1);

        assert_eq!(pts[1].name, "Bloody Bridge");
        assert_eq!(pts[1].latitude, None);
        assert_eq!(pts[1].description, None);
        assert_eq!(pts[1].display_order, 2);

        assert_eq!(pts[2].name, "Starting Point 3");
        assert_eq!(pts[2].latitude, Some(54.17));
    }

    #[test]
    fn gaelic_line_keeps_later_colons_in_meaning() {
        assert_eq!(
            split_gaelic_line("Sliabh Binneáin: Peak: of the horns"),
            (Some("Sliabh Binneáin".into()), Some("Peak: of the horns".into()))
        );
        assert_eq!(split_gaelic_line("No colon here"), (None, None));
    }

    #[test]
    fn headings_out_of_legacy_order_still_extract() {
        let html = r#"<html><head><title>Slieve Bearnagh - ExploreTheMournes - Mourne Mountains</title></head>
            <body><div id="readmore">
              <a>Where can I start from?</a>
              <div><p><a href="http://maps.google.co.uk/maps?ll=54.18,-5.99">Trassey Track</a></p></div>
              <a>Profile</a>
              <div><p>Height: 739 metres</p></div>
            </div></body></html>"#;
        let parsed = parse_mountain_document("slieve-bearnagh", html).unwrap();
        assert_eq!(parsed.mountain.name, "Slieve Bearnagh");
        assert_eq!(parsed.mountain.height, Some(739));
        assert_eq!(parsed.starting_points.len(), 1);
        assert_eq!(parsed.starting_points[0].name, "Trassey Track");
    }

    #[test]
    fn page_without_accordion_still_parses_header() {
        let html = "<html><head><title>Cove Mountain</title></head><body><h2>An Chuas</h2></body></html>";
        let parsed = parse_mountain_document("cove-mountain", html).unwrap();
        assert_eq!(parsed.mountain.name, "Cove Mountain");
        assert_eq!(parsed.mountain.gaelic_name, None);
        assert_eq!(parsed.mountain.height, None);
        assert!(parsed.starting_points.is_empty());
    }

    #[test]
    fn missing_title_is_an_error() {
        assert!(parse_mountain_document("x", "<html><body></body></html>").is_err());
    }

    #[test]
    fn reads_from_disk_using_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slieve-donard.html");
        std::fs::write(&path, DONARD).unwrap();
        let parsed = parse_mountain_html(&path).unwrap();
        assert_eq!(parsed.mountain.slug, "slieve-donard");
    }
}
