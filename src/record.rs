use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One movie extracted from a detail page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub cover: Option<String>,
    pub name: Option<String>,
    pub categories: Vec<String>,
    pub published_at: Option<NaiveDate>,
    pub drama: Option<String>,
    pub score: Option<f64>,
}
