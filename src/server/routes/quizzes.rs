use axum::{routing::post, Json, Router};
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_option_number_from_string;

use crate::{
    db::{queries::questions::get_quiz_candidates, Question},
    server::{
        app::AppState,
        error::{ApiError, ApiResponse},
        extract::{ApiJson, DbConn},
    },
    telemetry::QUIZ_QUESTIONS_CNTR,
};

/// Category type the web client sends when "All" is selected.
const ALL_CATEGORIES: &str = "click";

#[derive(Deserialize)]
struct QuizBody {
    previous_questions: Vec<i64>,
    quiz_category: QuizCategory,
}

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    id: Option<i64>,
}

#[derive(Serialize)]
struct NextQuestion {
    question: Question,
}

impl QuizCategory {
    fn filter(&self) -> ApiResponse<Option<i64>> {
        if self.kind == ALL_CATEGORIES {
            return Ok(None);
        }
        self.id
            .map(Some)
            .ok_or_else(|| ApiError::BadRequest("quiz_category.id is required".to_owned()))
    }
}

async fn next_question(
    DbConn(mut conn): DbConn,
    ApiJson(body): ApiJson<QuizBody>,
) -> ApiResponse<Json<NextQuestion>> {
    let category = body.quiz_category.filter()?;
    let candidates = get_quiz_candidates(&mut conn, &body.previous_questions, category).await?;

    let question = candidates
        .choose(&mut rand::rng())
        .cloned()
        .ok_or(ApiError::NotFound)?;

    let label = category.map_or_else(|| "all".to_owned(), |id| id.to_string());
    QUIZ_QUESTIONS_CNTR.with_label_values(&[label.as_str()]).inc();
    tracing::debug!(
        question_id = question.id,
        excluded = body.previous_questions.len(),
        "Next quiz question"
    );
    Ok(Json(NextQuestion { question }))
}

pub fn quizzes_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
