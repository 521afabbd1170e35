use super::escape::escape;

#[derive(Debug, Clone)]
pub struct GalleryImage {
    pub url: String,
    pub alt: String,
    pub title: Option<String>,
    pub caption: Option<String>,
}

fn photo_count(n: usize) -> String {
    if n == 1 {
        "1 photo".to_string()
    } else {
        format!("{n} photos")
    }
}

/// Thumbnail grid with lightbox data attributes. Empty input renders nothing.
pub fn render_gallery(images: &[GalleryImage]) -> String {
    if images.is_empty() {
        return String::new();
    }
    let mut out = String::from(
        "<section class=\"gallery\">\n<h3>Photo Gallery</h3>\n<div class=\"gallery-grid\">\n",
    );
    for (i, img) in images.iter().enumerate() {
        let url = escape(&img.url);
        let alt = if img.alt.is_empty() {
            format!("Image {}", i + 1)
        } else {
            escape(&img.alt)
        };
        let title = img.title.as_deref().map(escape).unwrap_or_default();
        let caption = img.caption.as_deref().map(escape).unwrap_or_default();
        out.push_str(&format!(
            r#"<a class="gallery-item" href="{url}" data-lightbox="gallery" data-index="{i}" data-title="{title}" data-description="{caption}"><img src="{url}" alt="{alt}" loading="lazy">"#
        ));
        if !title.is_empty() {
            out.push_str(&format!("<span class=\"gallery-title\">{title}</span>"));
        }
        out.push_str("</a>\n");
    }
    out.push_str("</div>\n");
    out.push_str(&format!(
        "<p class=\"gallery-hint\">Click any image to view full size ({})</p>\n</section>\n",
        photo_count(images.len())
    ));
    out
}
