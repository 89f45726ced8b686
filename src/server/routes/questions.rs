use std::collections::BTreeMap;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqliteConnection;

use crate::{
    db::{
        queries::{
            categories::get_all_categories,
            questions::{
                count_questions, create_question, delete_question, get_all_questions,
                get_question, search_questions,
            },
        },
        NewQuestion, Question,
    },
    server::{
        app::{ApiOptions, AppState},
        deserializers::{int_from_json, text_from_json},
        error::{ApiError, ApiResponse},
        extract::{ApiJson, DbConn, Page},
        pagination::paginate,
    },
    telemetry::{CREATED_QUESTIONS_CNTR, DELETED_QUESTIONS_CNTR},
};

use super::categories::categories_map;

// One body type serves both branches of `POST /questions`.
#[derive(Deserialize)]
struct QuestionsBody {
    #[serde(rename = "searchTerm", default)]
    search_term: Option<String>,
    #[serde(default)]
    question: Option<Value>,
    #[serde(default)]
    answer: Option<Value>,
    #[serde(default)]
    category: Option<Value>,
    #[serde(default)]
    difficulty: Option<Value>,
}

#[derive(Deserialize)]
struct SearchBody {
    #[serde(rename = "searchTerm")]
    search_term: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionsPage {
    questions: Vec<Question>,
    total_questions: usize,
    categories: BTreeMap<i64, String>,
    current_category: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResults {
    questions: Vec<Question>,
    total_questions: usize,
    current_category: Option<String>,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    question_id: i64,
}

#[derive(Serialize)]
struct Created {
    success: bool,
    created: i64,
    questions: Vec<Question>,
    total_questions: i64,
}

#[derive(Serialize)]
#[serde(untagged)]
enum PostQuestionsResponse {
    Search(SearchResults),
    Created(Created),
}

async fn list_questions(
    DbConn(mut conn): DbConn,
    State(options): State<ApiOptions>,
    Page(page): Page,
) -> ApiResponse<Json<QuestionsPage>> {
    let categories = get_all_categories(&mut conn).await?;
    let questions = get_all_questions(&mut conn).await?;

    let current_questions = paginate(page, &questions);
    if current_questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    let current_category = options.current_category(&categories);
    Ok(Json(QuestionsPage {
        questions: current_questions,
        total_questions: questions.len(),
        categories: categories_map(categories),
        current_category,
    }))
}

async fn remove_question(
    DbConn(mut conn): DbConn,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<Deleted>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;

    let question = get_question(&mut conn, id)
        .await
        .map_err(|e| ApiError::Unprocessable(e.to_string()))?;
    if question.is_none() {
        return Err(ApiError::NotFound);
    }

    let deleted = delete_question(&mut conn, id)
        .await
        .map_err(|e| ApiError::Unprocessable(e.to_string()))?;
    if deleted == 0 {
        return Err(ApiError::NotFound);
    }

    DELETED_QUESTIONS_CNTR.inc();
    tracing::info!(question_id = id, "Question deleted");
    Ok(Json(Deleted {
        success: true,
        question_id: id,
    }))
}

/// Searches when the body has a non-empty `searchTerm`, creates otherwise.
async fn post_questions(
    DbConn(mut conn): DbConn,
    State(options): State<ApiOptions>,
    Page(page): Page,
    ApiJson(body): ApiJson<QuestionsBody>,
) -> ApiResponse<Json<PostQuestionsResponse>> {
    match body.search_term.clone().filter(|term| !term.is_empty()) {
        Some(term) => {
            let results = search(&mut conn, options, &term).await?;
            Ok(Json(PostQuestionsResponse::Search(results)))
        }
        None => {
            let created = add_question(&mut conn, page, body).await?;
            Ok(Json(PostQuestionsResponse::Created(created)))
        }
    }
}

async fn search_route(
    DbConn(mut conn): DbConn,
    State(options): State<ApiOptions>,
    ApiJson(body): ApiJson<SearchBody>,
) -> ApiResponse<Json<SearchResults>> {
    if body.search_term.is_empty() {
        return Err(ApiError::BadRequest("searchTerm must not be empty".to_owned()));
    }
    Ok(Json(search(&mut conn, options, &body.search_term).await?))
}

async fn search(
    conn: &mut SqliteConnection,
    options: ApiOptions,
    term: &str,
) -> ApiResponse<SearchResults> {
    let found = search_questions(conn, term).await?;
    if found.is_empty() {
        return Err(ApiError::NotFound);
    }

    let categories = get_all_categories(conn).await?;
    Ok(SearchResults {
        total_questions: found.len(),
        questions: found,
        current_category: options.current_category(&categories),
    })
}

async fn add_question(
    conn: &mut SqliteConnection,
    page: i64,
    body: QuestionsBody,
) -> ApiResponse<Created> {
    let new_question = NewQuestion {
        question: text_from_json(body.question.as_ref()).map_err(ApiError::Unprocessable)?,
        answer: text_from_json(body.answer.as_ref()).map_err(ApiError::Unprocessable)?,
        category: int_from_json(body.category.as_ref()).map_err(ApiError::Unprocessable)?,
        difficulty: int_from_json(body.difficulty.as_ref()).map_err(ApiError::Unprocessable)?,
    };

    let unprocessable = |e: sqlx::Error| ApiError::Unprocessable(e.to_string());
    let id = create_question(conn, &new_question)
        .await
        .map_err(unprocessable)?;
    let questions = get_all_questions(conn).await.map_err(unprocessable)?;
    let total_questions = count_questions(conn).await.map_err(unprocessable)?;

    CREATED_QUESTIONS_CNTR.inc();
    tracing::info!(question_id = id, "Question created");
    Ok(Created {
        success: true,
        created: id,
        questions: paginate(page, &questions),
        total_questions,
    })
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(post_questions))
        .route("/questions/search", post(search_route))
        .route("/questions/{id}", delete(remove_question))
        .with_state(state)
}
