use std::collections::HashSet;

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, Question},
    server::{
        app::AppState,
        extract::AppJson,
        quiz::{pick_unseen, ANY_CATEGORY},
    },
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::{ApiError, ApiResponse};

#[derive(Deserialize)]
struct QuizRequest {
    #[serde(default)]
    previous_questions: Option<Vec<i64>>,
    quiz_category: QuizCategory,
}

#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    id: i64,
}

/// `question` is `null` once every eligible question has been played.
#[derive(Serialize)]
struct QuizResponse {
    success: bool,
    question: Option<Question>,
}

async fn next_question(
    State(pool): State<SqlitePool>,
    AppJson(request): AppJson<QuizRequest>,
) -> ApiResponse<Json<QuizResponse>> {
    let category_id = request.quiz_category.id;
    let category = (category_id != ANY_CATEGORY).then_some(category_id);

    let eligible = questions::get_question_ids(&pool, category).await?;
    if eligible.is_empty() {
        return Err(ApiError::unprocessable(format!(
            "No questions to play in category {category_id}"
        )));
    }

    let seen: HashSet<i64> = request
        .previous_questions
        .unwrap_or_default()
        .into_iter()
        .collect();
    let picked = pick_unseen(&eligible, &seen, &mut rand::thread_rng());

    let question = match picked {
        Some(id) => {
            let label = category.map_or_else(|| "all".to_owned(), |c| c.to_string());
            Some(serve_question(&pool, id, &label).await?)
        }
        None => {
            tracing::debug!(category_id, played = seen.len(), "Quiz exhausted");
            None
        }
    };

    Ok(Json(QuizResponse {
        success: true,
        question,
    }))
}

/// Loads the picked question and counts it as served. A question deleted since it was
/// picked fails the quiz request like any other quiz failure.
async fn serve_question(pool: &SqlitePool, id: i64, label: &str) -> Result<Question, ApiError> {
    let question = questions::get_question_by_id(pool, id)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                ApiError::unprocessable(format!("Question {id} disappeared before serving"))
            }
            other => other.into(),
        })?;
    QUIZ_QUESTIONS_SERVED.with_label_values(&[label]).inc();
    Ok(question)
}

pub fn quizzes_router() -> Router<AppState> {
    Router::new().route("/quizzes", post(next_question))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{self, queries::questions::create_question, NewQuestion};

    async fn pool_with_one_question() -> SqlitePool {
        let pool = db::in_memory().await.unwrap();
        db::run_migrations(&pool).await.unwrap();
        let new = NewQuestion {
            question: "What is the largest lake in Africa?".to_owned(),
            answer: "Lake Victoria".to_owned(),
            category: 3,
            difficulty: 2,
        };
        create_question(&pool, &new).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn serving_counts_the_question() {
        let pool = pool_with_one_question().await;
        let served = QUIZ_QUESTIONS_SERVED.with_label_values(&["serve-ok"]);

        let question = serve_question(&pool, 1, "serve-ok").await.unwrap();
        assert_eq!(question.answer, "Lake Victoria");
        assert_eq!(served.get(), 1.0);
    }

    #[tokio::test]
    async fn vanished_question_is_unprocessable_and_not_counted() {
        let pool = pool_with_one_question().await;
        let served = QUIZ_QUESTIONS_SERVED.with_label_values(&["serve-vanished"]);
        questions::delete_question(&pool, 1).await.unwrap();

        let result = serve_question(&pool, 1, "serve-vanished").await;
        assert!(matches!(result, Err(ApiError::Unprocessable(_))));
        assert_eq!(served.get(), 0.0);
    }
}
