use anyhow::{anyhow, Result};
use scraper::{ElementRef, Html, Selector};

use crate::normalization::clean_text;

pub(crate) fn selector(css: &'static str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {css:?}: {e}"))
}

/// One collapsible block of the legacy `#readmore` accordion: a `div` body and
/// the `a` heading immediately before it (if any).
#[derive(Debug, Clone)]
pub struct AccordionBlock<'a> {
    /// Position among the `#readmore > div` children (0-based).
    pub position: usize,
    pub heading: Option<String>,
    pub body: ElementRef<'a>,
}

/// All `div` children of `#readmore`, in document order.
pub fn accordion_blocks(doc: &Html) -> Result<Vec<AccordionBlock<'_>>> {
    let container_sel = selector("#readmore")?;
    let Some(container) = doc.select(&container_sel).next() else {
        return Ok(Vec::new());
    };

    let mut blocks = Vec::new();
    let mut previous: Option<ElementRef<'_>> = None;
    for child in container.children().filter_map(ElementRef::wrap) {
        if child.value().name() == "div" {
            let heading = previous
                .filter(|p| p.value().name() == "a")
                .map(|a| clean_text(&a.text().collect::<String>()));
            blocks.push(AccordionBlock {
                position: blocks.len(),
                heading,
                body: child,
            });
        }
        previous = Some(child);
    }
    Ok(blocks)
}

/// Which accordion block holds a given kind of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLookup {
    /// Heading text matched the keyword.
    ByHeading(usize),
    /// No heading matched; the legacy position was used instead.
    ByPosition(usize),
    Missing,
}

/// Locate a block by a case-insensitive heading keyword, falling back to the
/// block at `legacy_position` when no heading matches.
pub fn find_block(blocks: &[AccordionBlock<'_>], keyword: &str, legacy_position: usize) -> SectionLookup {
    let needle = keyword.to_ascii_lowercase();
    if let Some(b) = blocks.iter().find(|b| {
        b.heading
            .as_deref()
            .is_some_and(|h| h.to_ascii_lowercase().contains(&needle))
    }) {
        return SectionLookup::ByHeading(b.position);
    }
    if legacy_position < blocks.len() {
        SectionLookup::ByPosition(legacy_position)
    } else {
        SectionLookup::Missing
    }
}

impl SectionLookup {
    pub fn index(self) -> Option<usize> {
        match self {
            SectionLookup::ByHeading(i) | SectionLookup::ByPosition(i) => Some(i),
            SectionLookup::Missing => None,
        }
    }
}
