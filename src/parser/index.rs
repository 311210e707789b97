use std::sync::LazyLock;

use reqwest::Url;
use scraper::{Html, Selector};
use tracing::{info, warn};

use super::dom::Markup;

static DETAIL_LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a.name").unwrap());

/// Detail-page links of an index page, resolved lazily against the base URL.
///
/// Single pass: once drained it stays empty.
pub struct DetailUrls {
    base: Url,
    hrefs: std::vec::IntoIter<String>,
}

impl Iterator for DetailUrls {
    type Item = Url;

    fn next(&mut self) -> Option<Url> {
        for href in self.hrefs.by_ref() {
            match self.base.join(&href) {
                Ok(url) => {
                    info!("get detail url {}", url);
                    return Some(url);
                }
                Err(e) => warn!("skipping unresolvable link {:?}: {}", href, e),
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.hrefs.size_hint().1)
    }
}

pub fn parse_index(html: Option<&str>, base: &Url) -> DetailUrls {
    let hrefs = html
        .map(|html| Html::parse_document(html).all_attrs(&DETAIL_LINK, "href"))
        .unwrap_or_default();
    DetailUrls {
        base: base.clone(),
        hrefs: hrefs.into_iter(),
    }
}
