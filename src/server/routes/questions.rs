use std::collections::BTreeMap;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions},
        NewQuestion, Question,
    },
    server::{
        app::AppState,
        deserializers::{deserialize_page, first_page},
        extract::{AppJson, AppPath, AppQuery},
        pagination::paginate,
    },
    telemetry::{QUESTIONS_CREATED, QUESTIONS_DELETED},
};

use super::{categories_map, ApiError, ApiResponse};

// the search view always reports this category, whatever matched
const SEARCH_CATEGORY: &str = "Entertainment";

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    page: i64,
    category: Option<i64>,
}

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    page: i64,
}

// The same endpoint creates a question or, when `searchTerm` is set, searches.
// Fields stay loosely typed until the branch is known: a search ignores the create
// fields, and forms post category and difficulty as strings.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionBody {
    #[serde(default)]
    question: Option<Value>,
    #[serde(default)]
    answer: Option<Value>,
    #[serde(default)]
    category: Option<Value>,
    #[serde(default)]
    difficulty: Option<Value>,
    #[serde(default)]
    search_term: Option<Value>,
}

impl QuestionBody {
    /// A non-empty string or a number; anything else means "create".
    fn search_term(&self) -> Option<String> {
        match self.search_term.as_ref()? {
            Value::String(term) if !term.is_empty() => Some(term.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        }
    }

    fn into_new_question(self) -> Result<NewQuestion, ApiError> {
        let fields = (
            text_field(self.question),
            text_field(self.answer),
            integer_field(self.category),
            integer_field(self.difficulty),
        );
        match fields {
            (Some(question), Some(answer), Some(category), Some(difficulty)) => Ok(NewQuestion {
                question,
                answer,
                category,
                difficulty,
            }),
            _ => Err(ApiError::unprocessable(
                "question, answer, category and difficulty are required",
            )),
        }
    }
}

fn text_field(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.trim().is_empty() => Some(text),
        _ => None,
    }
}

fn integer_field(value: Option<Value>) -> Option<i64> {
    match value? {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    categories: BTreeMap<i64, String>,
    current_category: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: &'static str,
}

#[derive(Serialize)]
struct Created {
    success: bool,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    AppQuery(query): AppQuery<ListQuery>,
) -> ApiResponse<Json<QuestionsPage>> {
    let (selection, current_category) = match query.category {
        Some(id) => {
            let category = categories::get_category(&pool, id).await?;
            let selection = questions::get_questions_for_category(&pool, id).await?;
            (selection, Some(category.kind))
        }
        None => (questions::get_all_questions(&pool).await?, None),
    };
    let total_questions = selection.len();
    let questions = paginate(selection, query.page);
    if questions.is_empty() {
        return Err(ApiError::NotFound);
    }

    let categories = categories::get_all_categories(&pool).await?;
    Ok(Json(QuestionsPage {
        success: true,
        questions,
        total_questions,
        categories: categories_map(categories),
        current_category,
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    AppPath(question_id): AppPath<i64>,
) -> ApiResponse<Json<Deleted>> {
    questions::delete_question(&pool, question_id).await?;
    QUESTIONS_DELETED.inc();
    tracing::info!(question_id, "Deleted question");

    Ok(Json(Deleted {
        success: true,
        deleted: question_id,
    }))
}

async fn create_or_search(
    State(pool): State<SqlitePool>,
    AppQuery(query): AppQuery<PageQuery>,
    AppJson(body): AppJson<QuestionBody>,
) -> ApiResponse<Response> {
    match body.search_term() {
        Some(term) => {
            let selection = questions::search_questions(&pool, &term).await?;
            let total_questions = selection.len();
            Ok(Json(SearchResults {
                success: true,
                questions: paginate(selection, query.page),
                total_questions,
                current_category: SEARCH_CATEGORY,
            })
            .into_response())
        }
        None => {
            let new_question = body.into_new_question()?;
            let id = questions::create_question(&pool, &new_question).await?;
            QUESTIONS_CREATED.inc();
            tracing::info!(question_id = id, "Created question");
            Ok(Json(Created { success: true }).into_response())
        }
    }
}

pub fn questions_router() -> Router<AppState> {
    Router::new()
        .route("/questions", get(list_questions).post(create_or_search))
        .route("/questions/{id}", delete(delete_question))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(json: serde_json::Value) -> QuestionBody {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn accepts_numeric_strings_from_forms() {
        let new = body(serde_json::json!({
            "question": "Q", "answer": "A", "category": "3", "difficulty": 2
        }))
        .into_new_question()
        .unwrap();
        assert_eq!((new.category, new.difficulty), (3, 2));
    }

    #[test]
    fn rejects_incomplete_questions() {
        let missing = body(serde_json::json!({"question": "Q", "answer": "A", "category": 1}));
        assert!(matches!(
            missing.into_new_question(),
            Err(ApiError::Unprocessable(_))
        ));

        let blank = body(serde_json::json!({
            "question": "  ", "answer": "A", "category": 1, "difficulty": 1
        }));
        assert!(blank.into_new_question().is_err());

        let named_category = body(serde_json::json!({
            "question": "Q", "answer": "A", "category": "Science", "difficulty": 1
        }));
        assert!(named_category.into_new_question().is_err());
    }

    #[test]
    fn search_term_decides_the_branch() {
        let search = body(serde_json::json!({"searchTerm": "title", "category": "Science"}));
        assert_eq!(search.search_term().as_deref(), Some("title"));

        assert_eq!(body(serde_json::json!({"searchTerm": 5})).search_term().as_deref(), Some("5"));
        assert_eq!(body(serde_json::json!({"searchTerm": ""})).search_term(), None);
        assert_eq!(body(serde_json::json!({"searchTerm": null})).search_term(), None);
        assert_eq!(body(serde_json::json!({})).search_term(), None);
    }
}
