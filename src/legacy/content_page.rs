use anyhow::{Context, Result};
use scraper::{ElementRef, Html};
use std::path::Path;

use super::sections::{accordion_blocks, selector};
use crate::database_ops::models::{ContentSection, NewContentPage, PageContent};
use crate::normalization::{clean_text, slugify};

/// Subtitles longer than this are body copy, not a strapline.
const MAX_SUBTITLE_CHARS: usize = 100;

/// Activity / place page extracted from the legacy site.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPage {
    pub title: String,
    pub subtitle: Option<String>,
    pub background_image: Option<String>,
    pub sections: Vec<ContentSection>,
    pub gallery_images: Vec<String>,
}

impl ParsedPage {
    /// Row payload; SEO fields mirror the visible title and subtitle.
    pub fn into_new_page(self, slug: String) -> NewContentPage {
        let seo_description = self.subtitle.clone().unwrap_or_else(|| self.title.clone());
        NewContentPage {
            slug,
            seo_title: Some(self.title.clone()),
            seo_description: Some(seo_description),
            title: self.title,
            content: PageContent {
                subtitle: self.subtitle,
                sections: self.sections,
                gallery_images: self.gallery_images,
                background_image_path: self.background_image,
            },
            published: true,
        }
    }
}

/// Slug for a legacy page file: `mournes-triathlons.html` -> `mournes-triathlons`.
pub fn slug_for_file(file_name: &str) -> String {
    slugify(file_name.strip_suffix(".html").unwrap_or(file_name))
}

pub fn parse_content_page_file(path: &Path) -> Result<ParsedPage> {
    let html = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    parse_content_page(&html)
}

pub fn parse_content_page(html: &str) -> Result<ParsedPage> {
    let doc = Html::parse_document(html);
    Ok(ParsedPage {
        title: extract_title(&doc)?,
        subtitle: extract_subtitle(&doc)?,
        background_image: extract_background_image(&doc)?,
        sections: extract_sections(&doc)?,
        gallery_images: extract_gallery_images(&doc)?,
    })
}

fn first_h2(doc: &Html) -> Result<Option<ElementRef<'_>>> {
    let sel = selector("h2")?;
    Ok(doc.select(&sel).next())
}

fn extract_title(doc: &Html) -> Result<String> {
    if let Some(h2) = first_h2(doc)? {
        let text = h2.text().collect::<String>().trim().to_string();
        if !text.is_empty() {
            return Ok(text);
        }
    }

    let title_sel = selector("title")?;
    let title = doc
        .select(&title_sel)
        .next()
        .map(|t| t.text().collect::<String>())
        .unwrap_or_default();
    let title = title.trim().replacen("The Mourne Mountains", "", 1);
    Ok(title
        .trim_matches(|c: char| c.is_whitespace() || c == '-')
        .to_string())
}

fn extract_subtitle(doc: &Html) -> Result<Option<String>> {
    let Some(h2) = first_h2(doc)? else {
        return Ok(None);
    };
    let next = h2.next_siblings().find_map(ElementRef::wrap);
    Ok(next
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty() && t.chars().count() < MAX_SUBTITLE_CHARS))
}

fn extract_background_image(doc: &Html) -> Result<Option<String>> {
    let sel = selector("#supersize img")?;
    Ok(doc
        .select(&sel)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(strip_images_prefix))
}

fn extract_sections(doc: &Html) -> Result<Vec<ContentSection>> {
    let mut sections = Vec::new();
    for block in accordion_blocks(doc)? {
        let Some(title) = block.heading.filter(|t| !t.is_empty()) else {
            continue;
        };
        let content = normalize_section_html(&block.body.inner_html());
        if !content.is_empty() {
            sections.push(ContentSection::new(title, content));
        }
    }
    Ok(sections)
}

/// Image sources are rewritten from `images/...` to bucket-relative paths and
/// whitespace is collapsed.
fn normalize_section_html(raw: &str) -> String {
    clean_text(&raw.trim().replace("src=\"images/", "src=\""))
}

fn extract_gallery_images(doc: &Html) -> Result<Vec<String>> {
    let sel = selector(r#"a[rel^="prettyPhoto[gallery"]"#)?;
    Ok(doc
        .select(&sel)
        .filter_map(|a| a.value().attr("href"))
        .filter(|href| href.starts_with("images/"))
        .map(strip_images_prefix)
        .collect())
}

fn strip_images_prefix(path: &str) -> String {
    path.strip_prefix("images/").unwrap_or(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOURNE_WALL: &str = r##"<html>
<head><title>Mourne Wall - The Mourne Mountains</title></head>
<body>
  <div id="supersize"><img src="images/backgrounds/mourne-wall-bg.jpg"></div>
  <h2>The Mourne Wall</h2>
  <p>A dry-stone wall crossing fifteen summits</p>
  <div id="readmore">
    <a href="#">History</a>
    <div>
      <p>Built between 1904 and 1922.</p>
      <img src="images/places/wall.jpg">
    </div>
    <a href="#">Walking the Wall</a>
    <div>   </div>
    <a href="#"></a>
    <div><p>orphan body</p></div>
  </div>
  <a rel="prettyPhoto[gallery1]" href="images/places/wall-1.jpg">1</a>
  <a rel="prettyPhoto[gallery1]" href="http://elsewhere.example/wall-2.jpg">2</a>
  <a rel="prettyPhoto[gallery2]" href="images/places/wall-3.jpg">3</a>
  <a rel="nofollow" href="images/places/ignored.jpg">x</a>
</body>
</html>"##;

    #[test]
    fn extracts_all_parts() {
        let page = parse_content_page(MOURNE_WALL).unwrap();
        assert_eq!(page.title, "The Mourne Wall");
        assert_eq!(
            page.subtitle.as_deref(),
            Some("A dry-stone wall crossing fifteen summits")
        );
        assert_eq!(
            page.background_image.as_deref(),
            Some("backgrounds/mourne-wall-bg.jpg")
        );
        assert_eq!(page.sections.len(), 1);
        assert_eq!(page.sections[0].title, "History");
        assert_eq!(
            page.sections[0].content,
            r#"<p>Built between 1904 and 1922.</p> <img src="places/wall.jpg">"#
        );
        assert_eq!(
            page.gallery_images,
            vec!["places/wall-1.jpg".to_string(), "places/wall-3.jpg".to_string()]
        );
    }

    #[test]
    fn title_falls_back_to_title_tag() {
        let html = "<html><head><title>  Weather - The Mourne Mountains </title></head><body></body></html>";
        let page = parse_content_page(html).unwrap();
        assert_eq!(page.title, "Weather");
        assert_eq!(page.subtitle, None);
        assert!(page.sections.is_empty());
        assert!(page.gallery_images.is_empty());
        assert_eq!(page.background_image, None);
    }

    #[test]
    fn long_subtitle_is_dropped() {
        let long = "x".repeat(120);
        let html = format!("<h2>Tips</h2><p>{long}</p>");
        assert_eq!(parse_content_page(&html).unwrap().subtitle, None);
    }

    #[test]
    fn new_page_uses_subtitle_for_seo_description() {
        let page = parse_content_page(MOURNE_WALL).unwrap();
        let row = page.into_new_page(slug_for_file("mourne-wall.html"));
        assert_eq!(row.slug, "mourne-wall");
        assert_eq!(row.seo_title.as_deref(), Some("The Mourne Wall"));
        assert_eq!(
            row.seo_description.as_deref(),
            Some("A dry-stone wall crossing fifteen summits")
        );
        assert!(row.published);

        let bare = parse_content_page("<h2>Tips</h2>").unwrap().into_new_page("tips".into());
        assert_eq!(bare.seo_description.as_deref(), Some("Tips"));
    }

    #[test]
    fn file_slugs() {
        assert_eq!(slug_for_file("hikingclubs.html"), "hikingclubs");
        assert_eq!(slug_for_file("Devils_Coachroad.html"), "devils-coachroad");
    }
}
