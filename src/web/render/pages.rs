use anyhow::Result;

use super::accordion::{render_accordion, AccordionSection};
use super::escape::escape;
use super::gallery::{render_gallery, GalleryImage};
use super::layout::{document, PageMeta};
use super::map::{map_head, render_map, DEFAULT_ZOOM};
use crate::database_ops::models::{ContentKind, ContentPage, Mountain, MountainWithRelations};
use crate::storage::public_url;

pub const FEATURED_COUNT: usize = 6;
const HIGH_MIN: i32 = 700;
const MEDIUM_MIN: i32 = 500;

/// Inputs every page renderer needs besides its rows.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub supabase_url: &'a str,
    pub mapbox_token: Option<&'a str>,
}

#[derive(Debug, Default)]
pub struct HeightGroups<'a> {
    pub high: Vec<&'a Mountain>,
    pub medium: Vec<&'a Mountain>,
    pub lower: Vec<&'a Mountain>,
}

/// Bucket by height; mountains with no recorded height land in no group.
pub fn group_by_height(mountains: &[Mountain]) -> HeightGroups<'_> {
    let mut groups = HeightGroups::default();
    for m in mountains {
        match m.height {
            Some(h) if h >= HIGH_MIN => groups.high.push(m),
            Some(h) if h >= MEDIUM_MIN => groups.medium.push(m),
            Some(h) if h > 0 => groups.lower.push(m),
            _ => {}
        }
    }
    groups
}

/// The `n` tallest mountains, unknown heights last. Ties keep input order.
pub fn featured(mountains: &[Mountain], n: usize) -> Vec<&Mountain> {
    let mut sorted: Vec<&Mountain> = mountains.iter().collect();
    sorted.sort_by_key(|m| std::cmp::Reverse(m.height.unwrap_or(0)));
    sorted.truncate(n);
    sorted
}

pub fn highest_peak(mountains: &[Mountain]) -> i32 {
    mountains.iter().filter_map(|m| m.height).max().unwrap_or(0)
}

pub fn mountain_meta(m: &Mountain) -> PageMeta {
    let title = format!(
        "{} | {}",
        m.name,
        m.gaelic_name.as_deref().unwrap_or("Explore the Mournes")
    );
    let description = m
        .meaning
        .clone()
        .or_else(|| m.views.clone())
        .unwrap_or_else(|| format!("Discover {} in the Mourne Mountains", m.name));
    PageMeta::new(title, description)
}

pub fn content_meta(page: &ContentPage) -> PageMeta {
    let title = page.seo_title.clone().unwrap_or_else(|| page.title.clone());
    let description = page
        .seo_description
        .clone()
        .or_else(|| page.content.subtitle.clone())
        .unwrap_or_else(|| page.title.clone());
    PageMeta::new(title, description)
}

fn stat(value: &str, label: &str) -> String {
    format!(
        "<div class=\"stat\"><div class=\"stat-value\">{}</div><div class=\"stat-label\">{}</div></div>",
        escape(value),
        escape(label)
    )
}

fn mountain_card(m: &Mountain, cta: &str) -> String {
    let mut card = format!(
        "<a class=\"card\" href=\"/mountains/{}\">\n<h4>{}</h4>\n",
        escape(&m.slug),
        escape(&m.name)
    );
    if let Some(g) = &m.gaelic_name {
        card.push_str(&format!("<p class=\"gaelic\">{}</p>\n", escape(g)));
    }
    card.push_str("<div class=\"card-footer\">");
    if let Some(h) = m.height {
        card.push_str(&format!("<strong>{h}m</strong>"));
    }
    card.push_str(&format!("<span class=\"cta\">{cta} &rarr;</span></div>\n"));
    if let Some(region) = &m.region {
        card.push_str(&format!("<p class=\"region\">{}</p>\n", escape(region)));
    }
    card.push_str("</a>\n");
    card
}

pub fn home_page(mountains: &[Mountain], image_count: i64) -> String {
    let total = mountains.len();
    let cards: String = featured(mountains, FEATURED_COUNT)
        .into_iter()
        .map(|m| mountain_card(m, "Explore"))
        .collect();
    let body = format!(
        r#"<section class="hero">
<h2>Discover the <span class="accent">Mourne Mountains</span></h2>
<p>Explore Northern Ireland's highest peaks with detailed guides, interactive maps, photo galleries and hiking information for all {total} mountains.</p>
<p><a class="button" href="/mountains">Browse All Peaks &rarr;</a> <a class="button secondary" href="/mountains/slieve-donard">View Slieve Donard</a></p>
</section>
<section class="stats">
{}
{}
{}
</section>
<section>
<h3>Highest Peaks</h3>
<div class="grid">
{cards}</div>
<p><a href="/mountains">View All &rarr;</a></p>
</section>"#,
        stat(&total.to_string(), "Mountain Peaks"),
        stat(&format!("{}m", highest_peak(mountains)), "Highest Summit"),
        stat(&image_count.to_string(), "Photo Gallery"),
    );
    document(
        &PageMeta::new(
            "Explore the Mournes",
            "Northern Ireland's highest peaks: guides, maps and photo galleries for the Mourne Mountains",
        ),
        "",
        &body,
    )
}

fn height_section(heading: &str, mountains: &[&Mountain]) -> String {
    if mountains.is_empty() {
        return String::new();
    }
    let cards: String = mountains.iter().map(|m| mountain_card(m, "View")).collect();
    format!(
        "<section>\n<h3>{}</h3>\n<div class=\"grid\">\n{cards}</div>\n</section>\n",
        escape(heading)
    )
}

pub fn mountains_page(mountains: &[Mountain]) -> String {
    let groups = group_by_height(mountains);
    let body = format!(
        r#"<h2>All Mountains</h2>
<p class="lead">Discover all {} peaks in the Mourne Mountains</p>
{}{}{}<section class="stats">
{}
{}
{}
</section>"#,
        mountains.len(),
        height_section("High Peaks (700m+)", &groups.high),
        height_section("Medium Peaks (500-699m)", &groups.medium),
        height_section("Lower Peaks (<500m)", &groups.lower),
        stat(&mountains.len().to_string(), "Total Peaks"),
        stat(&groups.high.len().to_string(), "High Peaks (700m+)"),
        stat(&format!("{}m", highest_peak(mountains)), "Highest Peak"),
    );
    document(
        &PageMeta::new(
            "All Mountains | Explore the Mournes",
            format!("Browse all {} peaks in the Mourne Mountains, Northern Ireland", mountains.len()),
        ),
        "",
        &body,
    )
}

fn profile_body(m: &Mountain) -> String {
    let mut rows = Vec::new();
    if let Some(h) = m.height {
        rows.push(format!("<div><strong>Height:</strong> {h}m</div>"));
    }
    for (label, value) in [
        ("Terrain", &m.terrain),
        ("Views", &m.views),
        ("Region", &m.region),
    ] {
        if let Some(v) = value {
            rows.push(format!("<div><strong>{label}:</strong> {}</div>", escape(v)));
        }
    }
    rows.join("\n")
}

fn starting_points_body(mwr: &MountainWithRelations) -> String {
    mwr.starting_points
        .iter()
        .map(|p| {
            let mut s = format!("<div class=\"starting-point\">\n<h4>{}</h4>\n", escape(&p.name));
            if let Some(d) = &p.description {
                s.push_str(&format!("<p>{}</p>\n", escape(d)));
            }
            if let Some(d) = &p.difficulty {
                s.push_str(&format!("<p><strong>Difficulty:</strong> {}</p>\n", escape(d)));
            }
            if let Some(url) = &p.google_maps_url {
                s.push_str(&format!(
                    "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">View in Google Maps &rarr;</a>\n",
                    escape(url)
                ));
            }
            s.push_str("</div>");
            s
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn mountain_sections(mwr: &MountainWithRelations) -> Vec<AccordionSection> {
    let m = &mwr.mountain;
    let mut sections = vec![AccordionSection::new("Profile", profile_body(m)).open(true)];
    if let Some(credit) = &m.photographer_credit {
        sections.push(AccordionSection::new(
            "Photograph",
            format!("<div class=\"credit\">{}</div>", escape(credit)),
        ));
    }
    if !mwr.starting_points.is_empty() {
        sections.push(AccordionSection::new(
            "Where can I start from?",
            starting_points_body(mwr),
        ));
    }
    sections
}

pub fn mountain_page(mwr: &MountainWithRelations, ctx: RenderContext<'_>) -> Result<String> {
    let m = &mwr.mountain;
    let mut header = format!(
        "<a class=\"back\" href=\"/mountains\">&larr; All Mountains</a>\n<h2>{}</h2>\n",
        escape(&m.name)
    );
    if let Some(g) = &m.gaelic_name {
        header.push_str(&format!("<p class=\"gaelic\">{}", escape(g)));
        if let Some(meaning) = &m.meaning {
            header.push_str(&format!(" <span class=\"meaning\">&mdash; {}</span>", escape(meaning)));
        }
        header.push_str("</p>\n");
    }
    if let Some(h) = m.height {
        header.push_str(&format!("<p class=\"elevation\">Elevation: <strong>{h}m</strong></p>\n"));
    }

    let gallery: Vec<GalleryImage> = mwr
        .images
        .iter()
        .map(|img| GalleryImage {
            url: public_url(ctx.supabase_url, &img.storage_path),
            alt: if img.alt_text.is_empty() {
                img.title.clone().unwrap_or_default()
            } else {
                img.alt_text.clone()
            },
            title: img.title.clone(),
            caption: img.caption.clone(),
        })
        .collect();

    let body = format!(
        "{header}{}{}{}<p class=\"center\"><a class=\"button secondary\" href=\"/mountains\">&larr; View All Mountains</a></p>",
        render_accordion(&mountain_sections(mwr)),
        render_gallery(&gallery),
        render_map(&mwr.starting_points, ctx.mapbox_token, DEFAULT_ZOOM)?,
    );
    Ok(document(&mountain_meta(m), map_head(&mwr.starting_points), &body))
}

fn listing_copy(kind: ContentKind) -> (&'static str, &'static str, &'static str) {
    match kind {
        ContentKind::Activity => (
            "Activities",
            "Explore hiking, fell running, triathlons, and other outdoor activities in the Mournes.",
            "Discover hiking, fell running, triathlons, and other outdoor activities in the Mourne Mountains.",
        ),
        ContentKind::Place => (
            "Places of Interest",
            "Explore the Mourne Wall, Silent Valley, Game of Thrones filming locations, and other notable sites.",
            "Discover the Mourne Wall, Silent Valley, Game of Thrones locations, and other places of interest in the Mourne Mountains.",
        ),
    }
}

pub fn content_list_page(kind: ContentKind, pages: &[ContentPage]) -> String {
    let (heading, lead, description) = listing_copy(kind);
    let cards: String = pages
        .iter()
        .map(|p| {
            let subtitle = p
                .content
                .subtitle
                .as_deref()
                .map(|s| format!("<p>{}</p>\n", escape(s)))
                .unwrap_or_default();
            format!(
                "<a class=\"card\" href=\"/{}/{}\">\n<h3>{}</h3>\n{subtitle}<span class=\"cta\">Learn more &rarr;</span>\n</a>\n",
                kind.route(),
                escape(&p.slug),
                escape(&p.title)
            )
        })
        .collect();
    let body = format!(
        "<a class=\"back\" href=\"/\">&larr; Back to Home</a>\n<h2>{heading}</h2>\n<p class=\"lead\">{lead}</p>\n<div class=\"grid\">\n{cards}</div>"
    );
    document(
        &PageMeta::new(format!("{heading} | Explore the Mournes"), description),
        "",
        &body,
    )
}

pub fn content_page(kind: ContentKind, page: &ContentPage, ctx: RenderContext<'_>) -> String {
    let content = &page.content;
    let background = content
        .background_image_path
        .as_deref()
        .map(|path| {
            format!(
                "<div class=\"page-background\"><img src=\"{}\" alt=\"{}\"></div>\n",
                escape(&public_url(ctx.supabase_url, path)),
                escape(&page.title)
            )
        })
        .unwrap_or_default();

    // Section bodies are HTML carried over from the legacy site.
    let sections: Vec<AccordionSection> = content
        .sections
        .iter()
        .map(|s| AccordionSection::new(s.title.clone(), format!("<div class=\"prose\">{}</div>", s.content)))
        .collect();

    let gallery: Vec<GalleryImage> = content
        .gallery_images
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let label = format!("{} - Image {}", page.title, i + 1);
            GalleryImage {
                url: public_url(ctx.supabase_url, path),
                alt: label.clone(),
                title: Some(label),
                caption: None,
            }
        })
        .collect();

    let subtitle = content
        .subtitle
        .as_deref()
        .map(|s| format!("<p class=\"lead\">{}</p>\n", escape(s)))
        .unwrap_or_default();
    let (heading, _, _) = listing_copy(kind);
    let body = format!(
        "{background}<a class=\"back\" href=\"/{}\">&larr; All {heading}</a>\n<h2>{}</h2>\n{subtitle}{}{}",
        kind.route(),
        escape(&page.title),
        render_accordion(&sections),
        render_gallery(&gallery),
    );
    document(&content_meta(page), "", &body)
}

pub const CONTACT_SUBJECTS: [&str; 5] = [
    "General Enquiry",
    "Mountain Information",
    "Photo Submission",
    "Correction / Update",
    "Other",
];

pub fn contact_page() -> String {
    let options: String = CONTACT_SUBJECTS
        .iter()
        .map(|s| format!("<option value=\"{0}\">{0}</option>", escape(s)))
        .collect();
    let body = format!(
        r#"<a class="back" href="/">&larr; Back to Home</a>
<h2>Contact Us</h2>
<p class="lead">Have questions about the Mourne Mountains? Want to share your photos? Get in touch!</p>
<form id="contact-form" class="contact-form">
<label for="name">Name *</label>
<input type="text" id="name" name="name" required placeholder="Your name">
<label for="email">Email *</label>
<input type="email" id="email" name="email" required placeholder="your.email@example.com">
<label for="subject">Subject *</label>
<select id="subject" name="subject" required><option value="">Select a subject...</option>{options}</select>
<label for="message">Message *</label>
<textarea id="message" name="message" rows="6" required placeholder="Your message..."></textarea>
<div id="contact-status" role="status"></div>
<button type="submit">Send Message</button>
</form>
<script>
document.getElementById("contact-form").addEventListener("submit", async function (e) {{
  e.preventDefault();
  var form = e.target, status = document.getElementById("contact-status");
  var payload = Object.fromEntries(new FormData(form).entries());
  status.textContent = "Sending...";
  try {{
    var resp = await fetch("/api/contact", {{
      method: "POST",
      headers: {{ "Content-Type": "application/json" }},
      body: JSON.stringify(payload)
    }});
    var data = await resp.json();
    if (!resp.ok || !data.success) throw new Error(data.error || "Failed to send message");
    status.textContent = "Message sent successfully! We'll get back to you soon.";
    form.reset();
  }} catch (err) {{
    status.textContent = "Error sending message: " + err.message;
  }}
}});
</script>"#
    );
    document(
        &PageMeta::new(
            "Contact | Explore the Mournes",
            "Get in touch with us about the Mourne Mountains, submit photos, report corrections, or ask questions.",
        ),
        "",
        &body,
    )
}

pub fn not_found_page(what: &str) -> String {
    let body = format!(
        "<h2>{} Not Found</h2>\n<p>We couldn't find that page.</p>\n<p><a href=\"/\">&larr; Back to Home</a></p>",
        escape(what)
    );
    document(&PageMeta::new(format!("{what} Not Found"), ""), "", &body)
}

pub fn error_page() -> String {
    document(
        &PageMeta::new("Something went wrong", ""),
        "",
        "<h2>Something went wrong</h2>\n<p>Please try again shortly.</p>",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database_ops::models::{ContentSection, Image, PageContent, StartingPoint};
    use chrono::Utc;
    use sqlx::types::Json;
    use uuid::Uuid;

    fn mountain(name: &str, height: Option<i32>) -> Mountain {
        Mountain {
            id: Uuid::new_v4(),
            slug: crate::normalization::slugify(name),
            name: name.to_string(),
            gaelic_name: None,
            meaning: None,
            height,
            terrain: None,
            views: None,
            description: None,
            region: None,
            photographer_credit: None,
            seo_title: None,
            seo_description: None,
            published: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    const CTX: RenderContext<'static> = RenderContext {
        supabase_url: "https://abc.supabase.co",
        mapbox_token: Some("pk.test"),
    };

    #[test]
    fn height_groups_use_inclusive_lower_bounds() {
        let ms = vec![
            mountain("Donard", Some(850)),
            mountain("Seven Hundred", Some(700)),
            mountain("Six Nine Nine", Some(699)),
            mountain("Five Hundred", Some(500)),
            mountain("Low", Some(499)),
            mountain("Unknown", None),
        ];
        let g = group_by_height(&ms);
        let names = |v: &Vec<&Mountain>| v.iter().map(|m| m.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&g.high), vec!["Donard", "Seven Hundred"]);
        assert_eq!(names(&g.medium), vec!["Six Nine Nine", "Five Hundred"]);
        assert_eq!(names(&g.lower), vec!["Low"]);
    }

    #[test]
    fn featured_takes_tallest_six() {
        let ms: Vec<Mountain> = [300, 850, 700, 500, 400, 600, 750]
            .iter()
            .enumerate()
            .map(|(i, h)| mountain(&format!("M{i}"), Some(*h)))
            .chain(std::iter::once(mountain("none", None)))
            .collect();
        let top: Vec<i32> = featured(&ms, FEATURED_COUNT)
            .iter()
            .filter_map(|m| m.height)
            .collect();
        assert_eq!(top, vec![850, 750, 700, 600, 500, 400]);
        assert_eq!(highest_peak(&ms), 850);
        assert_eq!(highest_peak(&[]), 0);
    }

    #[test]
    fn mountain_metadata_fallbacks() {
        let mut m = mountain("Slieve Donard", Some(850));
        let meta = mountain_meta(&m);
        assert_eq!(meta.title, "Slieve Donard | Explore the Mournes");
        assert_eq!(meta.description, "Discover Slieve Donard in the Mourne Mountains");

        m.views = Some("Sea and mountains".into());
        assert_eq!(mountain_meta(&m).description, "Sea and mountains");

        m.gaelic_name = Some("Sliabh Dónairt".into());
        m.meaning = Some("Donard's mountain".into());
        let meta = mountain_meta(&m);
        assert_eq!(meta.title, "Slieve Donard | Sliabh Dónairt");
        assert_eq!(meta.description, "Donard's mountain");
    }

    fn page(subtitle: Option<&str>) -> ContentPage {
        ContentPage {
            id: Uuid::new_v4(),
            slug: "mourne-wall".into(),
            title: "The Mourne Wall".into(),
            content: Json(PageContent {
                subtitle: subtitle.map(String::from),
                sections: vec![ContentSection::new("History", "<p>Built <em>1904</em></p>")],
                gallery_images: vec!["gallery/wall1.jpg".into(), "gallery/wall2.jpg".into()],
                background_image_path: Some("backgrounds/wall.webp".into()),
            }),
            published: true,
            seo_title: None,
            seo_description: None,
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn content_metadata_fallbacks() {
        let mut p = page(None);
        assert_eq!(content_meta(&p), PageMeta::new("The Mourne Wall", "The Mourne Wall"));
        p.content.subtitle = Some("22 miles of stone".into());
        assert_eq!(content_meta(&p).description, "22 miles of stone");
        p.seo_title = Some("Mourne Wall Walk".into());
        p.seo_description = Some("Walk the wall".into());
        assert_eq!(content_meta(&p), PageMeta::new("Mourne Wall Walk", "Walk the wall"));
    }

    #[test]
    fn content_page_keeps_section_html_and_builds_gallery() {
        let html = content_page(ContentKind::Place, &page(Some("Stone wall")), CTX);
        assert!(html.contains("<p>Built <em>1904</em></p>"));
        assert!(html.contains("https://abc.supabase.co/storage/v1/object/public/backgrounds/wall.webp"));
        assert!(html.contains("https://abc.supabase.co/storage/v1/object/public/gallery/wall2.jpg"));
        assert!(html.contains("The Mourne Wall - Image 2"));
        assert!(html.contains("(2 photos)"));
        assert!(html.contains("href=\"/places\""));
    }

    #[test]
    fn mountain_page_sections_and_widgets() {
        let mut m = mountain("Slieve <Binnian>", Some(747));
        m.photographer_credit = Some("J. Smith".into());
        let mwr = MountainWithRelations {
            starting_points: vec![StartingPoint {
                id: Uuid::new_v4(),
                mountain_id: m.id,
                name: "Carrick Little".into(),
                description: None,
                latitude: Some(54.14),
                longitude: Some(-5.97),
                google_maps_url: None,
                parking_available: true,
                difficulty: Some("Moderate".into()),
                display_order: 1,
            }],
            images: vec![Image {
                id: Uuid::new_v4(),
                storage_path: "mountain-images/binnian/top.webp".into(),
                title: Some("top.jpg".into()),
                caption: None,
                photographer_credit: None,
                alt_text: "top.jpg".into(),
                width: Some(1600),
                height: Some(1200),
                mountain_id: Some(m.id),
                is_featured: false,
                display_order: 0,
            }],
            mountain: m,
        };

        let titles: Vec<String> = mountain_sections(&mwr).into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["Profile", "Photograph", "Where can I start from?"]);

        let html = mountain_page(&mwr, CTX).unwrap();
        assert!(html.contains("<h2>Slieve &lt;Binnian&gt;</h2>"));
        assert!(html.contains("Elevation: <strong>747m</strong>"));
        assert!(html.contains("(1 photo)"));
        assert!(html.contains("starting-points-map"));
        assert!(html.contains("mapbox-gl.js"));
    }

    #[test]
    fn mountain_without_relations_has_profile_only() {
        let mwr = MountainWithRelations {
            mountain: mountain("Hen Mountain", Some(354)),
            starting_points: vec![],
            images: vec![],
        };
        assert_eq!(mountain_sections(&mwr).len(), 1);
        let html = mountain_page(&mwr, CTX).unwrap();
        assert!(!html.contains("Photo Gallery"));
        assert!(!html.contains("starting-points-map"));
    }

    #[test]
    fn mountains_page_lists_groups() {
        let ms = vec![mountain("Donard", Some(850)), mountain("Hen", Some(354))];
        let html = mountains_page(&ms);
        assert!(html.contains("High Peaks (700m+)"));
        assert!(html.contains("Lower Peaks (&lt;500m)"));
        assert!(!html.contains("Medium Peaks"));
        assert!(html.contains("Discover all 2 peaks"));
    }

    #[test]
    fn contact_page_has_all_fields() {
        let html = contact_page();
        for field in ["name=\"name\"", "name=\"email\"", "name=\"subject\"", "name=\"message\""] {
            assert!(html.contains(field), "missing {field}");
        }
        assert!(html.contains("/api/contact"));
    }
}
