mod categories;
mod questions;
mod quizzes;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quizzes_router;

use rand::Rng;

use crate::db::Category;

use super::app::ApiOptions;

impl ApiOptions {
    /// `currentCategory` for responses that are not tied to one category.
    fn current_category(&self, categories: &[Category]) -> Option<String> {
        if self.legacy_current_category {
            random_current_category(categories)
        } else {
            None
        }
    }
}

/// A uniformly random id in `[1, number of categories]`, resolved to its type.
///
/// Unrelated to whatever questions the response carries. Ids missing from
/// the table resolve to `None`.
fn random_current_category(categories: &[Category]) -> Option<String> {
    if categories.is_empty() {
        return None;
    }
    let id = rand::rng().random_range(1..=categories.len() as i64);
    categories
        .iter()
        .find(|category| category.id == id)
        .map(|category| category.kind.clone())
}
