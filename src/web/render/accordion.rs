use super::escape::escape;

/// One collapsible block. `body` is markup the caller has already escaped
/// (or trusts).
#[derive(Debug, Clone)]
pub struct AccordionSection {
    pub title: String,
    pub body: String,
    pub default_open: Option<bool>,
}

impl AccordionSection {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            default_open: None,
        }
    }

    pub fn open(mut self, open: bool) -> Self {
        self.default_open = Some(open);
        self
    }
}

/// Sections without an explicit flag are closed, except the first.
pub fn render_accordion(sections: &[AccordionSection]) -> String {
    if sections.is_empty() {
        return String::new();
    }
    let mut out = String::from("<div class=\"accordion\">\n");
    for (i, s) in sections.iter().enumerate() {
        let open = if s.default_open.unwrap_or(i == 0) { " open" } else { "" };
        out.push_str(&format!(
            "<details class=\"accordion-section\"{open}>\n<summary>{}</summary>\n<div class=\"accordion-body\">{}</div>\n</details>\n",
            escape(&s.title),
            s.body
        ));
    }
    out.push_str("</div>\n");
    out
}
