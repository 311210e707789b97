use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};

use super::dom::Markup;
use crate::record::DetailRecord;

static COVER: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img.cover").unwrap());
static NAME: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());
static CATEGORY: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("button.category span").unwrap());
static DRAMA: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.drama p").unwrap());
static SCORE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p.score").unwrap());

// "上映" marks the release date on the detail page.
static RELEASED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4}-\d{2}-\d{2})\s?上映").unwrap());
static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").unwrap());

pub fn parse_detail(html: &str) -> DetailRecord {
    extract(&Html::parse_document(html))
}

/// Each field is looked up on its own; a miss leaves it empty.
pub fn extract<M: Markup>(doc: &M) -> DetailRecord {
    DetailRecord {
        cover: doc.first_attr(&COVER, "src"),
        name: doc.first_text(&NAME),
        categories: doc.all_texts(&CATEGORY),
        published_at: published_at(&doc.full_text()),
        drama: doc.first_text(&DRAMA),
        score: doc.first_text(&SCORE).as_deref().and_then(parse_score),
    }
}

fn published_at(text: &str) -> Option<NaiveDate> {
    let caps = RELEASED_RE.captures(text)?;
    NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()
}

fn parse_score(text: &str) -> Option<f64> {
    NUMBER_RE.find(text)?.as_str().parse().ok()
}
