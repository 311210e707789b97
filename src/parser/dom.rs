use scraper::{ElementRef, Html, Selector};

/// The lookups the parsers need from a markup tree.
pub trait Markup {
    /// Attribute `attr` of the first element matching `selector`.
    fn first_attr(&self, selector: &Selector, attr: &str) -> Option<String>;

    /// Non-blank, trimmed attribute `attr` of every matching element, in
    /// document order.
    fn all_attrs(&self, selector: &Selector, attr: &str) -> Vec<String>;

    /// Trimmed text of the first matching element; `None` if missing or blank.
    fn first_text(&self, selector: &Selector) -> Option<String>;

    /// Trimmed, non-blank text of every matching element, in document order.
    fn all_texts(&self, selector: &Selector) -> Vec<String>;

    /// All text nodes of the tree concatenated.
    fn full_text(&self) -> String;
}

impl Markup for Html {
    fn first_attr(&self, selector: &Selector, attr: &str) -> Option<String> {
        self.root_element().first_attr(selector, attr)
    }

    fn all_attrs(&self, selector: &Selector, attr: &str) -> Vec<String> {
        self.root_element().all_attrs(selector, attr)
    }

    fn first_text(&self, selector: &Selector) -> Option<String> {
        self.root_element().first_text(selector)
    }

    fn all_texts(&self, selector: &Selector) -> Vec<String> {
        self.root_element().all_texts(selector)
    }

    fn full_text(&self) -> String {
        self.root_element().full_text()
    }
}

impl Markup for ElementRef<'_> {
    fn first_attr(&self, selector: &Selector, attr: &str) -> Option<String> {
        self.select(selector)
            .next()
            .and_then(|el| el.value().attr(attr))
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn all_attrs(&self, selector: &Selector, attr: &str) -> Vec<String> {
        self.select(selector)
            .filter_map(|el| el.value().attr(attr))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn first_text(&self, selector: &Selector) -> Option<String> {
        self.select(selector).next().and_then(|el| element_text(&el))
    }

    fn all_texts(&self, selector: &Selector) -> Vec<String> {
        self.select(selector)
            .filter_map(|el| element_text(&el))
            .collect()
    }

    fn full_text(&self) -> String {
        self.text().collect()
    }
}

fn element_text(element: &ElementRef<'_>) -> Option<String> {
    let text = element.text().collect::<String>();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
