use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

/// One parsed page.
///
/// Queries are total: an unmatched or unparsable expression yields empty
/// values, never an error — callers chain fallbacks on empty results. The
/// parsed tree is not `Send`, so adapters keep pages as text and parse here
/// inside their synchronous getters.
pub struct Document {
    html: Html,
}

/// A field query: CSS selector with an optional `@attr` suffix, e.g.
/// `img#video_jacket_img@src`.
struct Expr<'a> {
    selector: &'a str,
    attr: Option<&'a str>,
}

impl<'a> Expr<'a> {
    fn parse(raw: &'a str) -> Self {
        match raw.rsplit_once('@') {
            Some((selector, attr)) => Self {
                selector,
                attr: Some(attr),
            },
            None => Self {
                selector: raw,
                attr: None,
            },
        }
    }

    fn read(&self, element: &ElementRef<'_>) -> String {
        match self.attr {
            Some(attr) => element
                .value()
                .attr(attr)
                .map(|value| value.trim().to_string())
                .unwrap_or_default(),
            None => full_text(element),
        }
    }
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Text (or `@attr` value) of the first match, empty if none.
    pub fn find_text(&self, expr: &str) -> String {
        let expr = Expr::parse(expr);
        self.select(expr.selector)
            .first()
            .map(|element| expr.read(element))
            .unwrap_or_default()
    }

    /// Texts (or `@attr` values) of all matches, in document order.
    pub fn find_all_text(&self, expr: &str) -> Vec<String> {
        let expr = Expr::parse(expr);
        self.select(expr.selector)
            .iter()
            .map(|element| expr.read(element))
            .collect()
    }

    /// Named attribute of the first match, empty if none.
    pub fn find_attr(&self, selector: &str, attr: &str) -> String {
        self.select(selector)
            .first()
            .and_then(|element| element.value().attr(attr))
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    /// True when any element matching `selector` contains `needle` in its
    /// text. Used for no-results marker nodes.
    pub fn contains_text(&self, selector: &str, needle: &str) -> bool {
        self.select(selector)
            .iter()
            .any(|element| full_text(element).contains(needle))
    }

    /// Label/value lookup for `<strong>label</strong><span class="value">`
    /// style markup: first label whose text contains `label_text`, then its
    /// first following sibling matching `value_sel`. Returns the sibling's
    /// direct text, falling back to a nested anchor when that is empty.
    pub fn labeled_text(&self, label_sel: &str, label_text: &str, value_sel: &str) -> String {
        let Some(value) = self.labeled_element(label_sel, label_text, value_sel) else {
            return String::new();
        };
        let direct = direct_text(&value);
        if !direct.is_empty() {
            return direct;
        }
        match Selector::parse("a") {
            Ok(anchor) => value
                .select(&anchor)
                .next()
                .map(|element| full_text(&element))
                .unwrap_or_default(),
            Err(_) => String::new(),
        }
    }

    /// The raw value sibling for bespoke walks (tag lists, actor pairs).
    pub fn labeled_element(
        &self,
        label_sel: &str,
        label_text: &str,
        value_sel: &str,
    ) -> Option<ElementRef<'_>> {
        let value_matcher = Selector::parse(value_sel).ok()?;
        for label in self.select(label_sel) {
            if !full_text(&label).contains(label_text) {
                continue;
            }
            let mut next = label.next_sibling();
            while let Some(node) = next {
                if let Some(element) = ElementRef::wrap(node) {
                    if value_matcher.matches(&element) {
                        return Some(element);
                    }
                }
                next = node.next_sibling();
            }
        }
        None
    }

    /// Positionally aligned `(href, displayed code)` pairs for search-result
    /// scanning: every `link_sel` anchor that carries an href and contains a
    /// `code_sel` descendant.
    pub fn link_entries(&self, link_sel: &str, code_sel: &str) -> Vec<(String, String)> {
        let Ok(code_matcher) = Selector::parse(code_sel) else {
            return Vec::new();
        };
        self.select(link_sel)
            .iter()
            .filter_map(|link| {
                let href = link.value().attr("href")?;
                let code = link.select(&code_matcher).next()?;
                Some((href.trim().to_string(), full_text(&code)))
            })
            .collect()
    }

    fn select(&self, selector: &str) -> Vec<ElementRef<'_>> {
        match Selector::parse(selector) {
            Ok(selector) => self.html.select(&selector).collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// All descendant text of an element, outer whitespace trimmed.
pub fn full_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Texts of all anchors nested under an element, empties dropped.
pub(crate) fn anchor_texts(element: &ElementRef<'_>) -> Vec<String> {
    match Selector::parse("a") {
        Ok(anchor) => element
            .select(&anchor)
            .map(|nested| full_text(&nested))
            .filter(|text| !text.is_empty())
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Only the element's own text nodes, skipping nested elements.
pub fn direct_text(element: &ElementRef<'_>) -> String {
    let mut out = String::new();
    for child in element.children() {
        if let Node::Text(text) = child.value() {
            out.push_str(text);
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expr_splits_attr_suffix() {
        let expr = Expr::parse("img#jacket@src");
        assert_eq!(expr.selector, "img#jacket");
        assert_eq!(expr.attr, Some("src"));

        let plain = Expr::parse("div.id");
        assert_eq!(plain.selector, "div.id");
        assert_eq!(plain.attr, None);
    }

    #[test]
    fn unparsable_selector_matches_nothing() {
        let doc = Document::parse("<p>x</p>");
        assert_eq!(doc.find_text("p:::"), "");
        assert!(doc.find_all_text("p:::").is_empty());
    }
}
