use std::collections::BTreeMap;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::{
    db::{
        queries::{
            categories::{get_all_categories, get_category},
            questions::get_questions_for_category,
        },
        Category, Question,
    },
    server::{
        app::{ApiOptions, AppState},
        error::{ApiError, ApiResponse},
        extract::{DbConn, Page},
        pagination::paginate,
    },
};

#[derive(Serialize)]
struct CategoriesBody {
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryQuestionsBody {
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<String>,
}

pub(super) fn categories_map(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

async fn get_categories(DbConn(mut conn): DbConn) -> ApiResponse<Json<CategoriesBody>> {
    let categories = get_all_categories(&mut conn).await?;
    Ok(Json(CategoriesBody {
        categories: categories_map(categories),
    }))
}

async fn questions_for_category(
    DbConn(mut conn): DbConn,
    State(options): State<ApiOptions>,
    Page(page): Page,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<CategoryQuestionsBody>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let questions = get_questions_for_category(&mut conn, id).await?;
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    let current_category = if options.legacy_current_category {
        let categories = get_all_categories(&mut conn).await?;
        super::random_current_category(&categories)
    } else {
        get_category(&mut conn, id).await?.map(|c| c.kind)
    };

    Ok(Json(CategoryQuestionsBody {
        questions: paginate(page, &questions),
        total_questions: questions.len(),
        current_category,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(questions_for_category))
        .with_state(state)
}
