use super::escape::escape;

/// `<title>` and meta description of a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub description: String,
}

impl PageMeta {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

const NAV: [(&str, &str); 4] = [
    ("/mountains", "Mountains"),
    ("/activities", "Activities"),
    ("/places", "Places"),
    ("/contact", "Contact"),
];

fn nav_links() -> String {
    NAV.iter()
        .map(|(href, label)| format!(r#"<a href="{href}">{label}</a>"#))
        .collect::<Vec<_>>()
        .join("\n        ")
}

/// Wrap a page body in the site chrome. `head_extra` is raw markup for
/// per-page stylesheets and scripts.
pub fn document(meta: &PageMeta, head_extra: &str, body: &str) -> String {
    let title = escape(&meta.title);
    let description = escape(&meta.description);
    let nav = nav_links();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <meta name="description" content="{description}">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/site.css">
    {head_extra}
</head>
<body>
    <header class="site-header">
        <a href="/" class="brand"><span class="accent">EXPLORE</span> the Mournes</a>
        <nav>
        {nav}
        </nav>
    </header>
    <main class="container">
{body}
    </main>
    <footer class="site-footer">
        <p>Modernizing the classic ExploreTheMournes website</p>
    </footer>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_escapes_meta_but_not_body() {
        let html = document(
            &PageMeta::new("A & B", "say \"hi\""),
            "",
            "<p>trusted</p>",
        );
        assert!(html.contains("<title>A &amp; B</title>"));
        assert!(html.contains(r#"content="say &quot;hi&quot;""#));
        assert!(html.contains("<p>trusted</p>"));
        assert!(html.contains(r#"<a href="/places">Places</a>"#));
    }
}
