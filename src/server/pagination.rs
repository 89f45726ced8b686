use serde::Deserialize;

use super::deserializers::{default_page, deserialize_page};

pub const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page", deserialize_with = "deserialize_page")]
    pub page: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
        }
    }
}

/// Returns the 1-based `page` of `items`. Pages past the end, and pages
/// below 1, are empty.
pub fn paginate<T: Clone>(page: i64, items: &[T]) -> Vec<T> {
    let Ok(page) = usize::try_from(page) else {
        return Vec::new();
    };
    if page == 0 {
        return Vec::new();
    }
    let start = (page - 1).saturating_mul(QUESTIONS_PER_PAGE);
    let end = start.saturating_add(QUESTIONS_PER_PAGE).min(items.len());
    if start >= end {
        return Vec::new();
    }
    items[start..end].to_vec()
}
