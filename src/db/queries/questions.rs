use serde::{Deserialize, Serialize};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<i64>,
    pub difficulty: Option<i64>,
}

pub struct NewQuestion {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub category: Option<i64>,
    pub difficulty: Option<i64>,
}

const SELECT_QUESTIONS: &str = "SELECT id, question, answer, category, difficulty FROM questions";

pub async fn get_all_questions(conn: &mut SqliteConnection) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(&format!("{SELECT_QUESTIONS} ORDER BY id"))
        .fetch_all(conn)
        .await
}

pub async fn count_questions(conn: &mut SqliteConnection) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM questions")
        .fetch_one(conn)
        .await
}

pub async fn get_question(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<Option<Question>> {
    sqlx::query_as::<_, Question>(&format!("{SELECT_QUESTIONS} WHERE questions.id = ?1"))
        .bind(id)
        .fetch_optional(conn)
        .await
}

pub async fn get_questions_for_category(
    conn: &mut SqliteConnection,
    category: i64,
) -> sqlx::Result<Vec<Question>> {
    sqlx::query_as::<_, Question>(&format!(
        "{SELECT_QUESTIONS} WHERE questions.category = ?1 ORDER BY id"
    ))
    .bind(category)
    .fetch_all(conn)
    .await
}

/// Case-insensitive substring match against the question text.
///
/// Folding is done here rather than with `LIKE`, which only folds ASCII.
pub async fn search_questions(
    conn: &mut SqliteConnection,
    term: &str,
) -> sqlx::Result<Vec<Question>> {
    let term = term.to_lowercase();
    let questions = get_all_questions(conn).await?;
    Ok(questions
        .into_iter()
        .filter(|q| matches_term(q, &term))
        .collect())
}

fn matches_term(question: &Question, lowercase_term: &str) -> bool {
    question
        .question
        .as_deref()
        .is_some_and(|text| text.to_lowercase().contains(lowercase_term))
}

pub async fn create_question(
    conn: &mut SqliteConnection,
    question: &NewQuestion,
) -> sqlx::Result<i64> {
    let id = sqlx::query(
        r#"
INSERT INTO questions (question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4)
        "#,
    )
    .bind(question.question.as_deref())
    .bind(question.answer.as_deref())
    .bind(question.category)
    .bind(question.difficulty)
    .execute(conn)
    .await?
    .last_insert_rowid();

    Ok(id)
}

pub async fn delete_question(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<u64> {
    let result = sqlx::query("DELETE FROM questions WHERE questions.id = ?1")
        .bind(id)
        .execute(conn)
        .await?;
    Ok(result.rows_affected())
}

/// Questions not in `previous`, optionally restricted to one category.
pub async fn get_quiz_candidates(
    conn: &mut SqliteConnection,
    previous: &[i64],
    category: Option<i64>,
) -> sqlx::Result<Vec<Question>> {
    // one bound JSON array, whatever the length of the history
    let excluded = serde_json::to_string(previous).map_err(|e| sqlx::Error::Encode(e.into()))?;
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_QUESTIONS);
    query
        .push(" WHERE questions.id NOT IN (SELECT value FROM json_each(")
        .push_bind(excluded)
        .push("))");
    if let Some(category) = category {
        query.push(" AND questions.category = ").push_bind(category);
    }
    query.push(" ORDER BY id");

    query.build_query_as::<Question>().fetch_all(conn).await
}

pub async fn import_questions(
    conn: &mut SqliteConnection,
    questions: Vec<Question>,
) -> anyhow::Result<()> {
    for question in questions {
        sqlx::query(
            r#"
INSERT INTO questions (id, question, answer, category, difficulty) VALUES (?1, ?2, ?3, ?4, ?5)
ON CONFLICT (id) DO UPDATE SET
    question = excluded.question,
    answer = excluded.answer,
    category = excluded.category,
    difficulty = excluded.difficulty
            "#,
        )
        .bind(question.id)
        .bind(question.question)
        .bind(question.answer)
        .bind(question.category)
        .bind(question.difficulty)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(text: Option<&str>) -> Question {
        Question {
            id: 1,
            question: text.map(str::to_owned),
            answer: None,
            category: None,
            difficulty: None,
        }
    }

    #[test]
    fn term_matching_folds_unicode_case() {
        let etude = question(Some("Who painted Étude?"));
        assert!(matches_term(&etude, &"étude".to_lowercase()));
        assert!(matches_term(&etude, &"ÉTUDE".to_lowercase()));
        assert!(!matches_term(&etude, "sonata"));
    }

    #[test]
    fn wildcards_and_missing_text_never_match() {
        assert!(!matches_term(&question(Some("Who painted Étude?")), "%"));
        assert!(!matches_term(&question(None), "a"));
    }
}
